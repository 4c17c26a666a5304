use std::ops::{Index, IndexMut};

use memchr::memchr;

use crate::error::{Error, FormatError, Result};

/// `(row, col)`, both zero-based.
pub type Coord = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn reverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The two directions at a right angle to `self`.
    pub fn turns(self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Distinct bit per direction, for packing visited directions into a byte.
    pub fn bit(self) -> u8 {
        match self {
            Direction::Up => 1,
            Direction::Down => 2,
            Direction::Left => 4,
            Direction::Right => 8,
        }
    }

    /// `(row, col)` offset of a single step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Dense row-major grid. All rows have the same width.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    cells: Vec<T>,
    width: usize,
}

impl<T> Grid<T> {
    /// Decodes a block of text, one byte per cell. `decode` returning `None` rejects the byte.
    pub fn parse(input: &str, mut decode: impl FnMut(u8) -> Option<T>) -> Result<Self> {
        let input = input.trim_end_matches(['\n', '\r']);
        let bytes = input.as_bytes();
        let mut width = memchr(b'\n', bytes).unwrap_or(bytes.len());
        if width > 0 && bytes[width - 1] == b'\r' {
            width -= 1;
        }
        if width == 0 {
            return Err(FormatError::Empty.into());
        }

        let mut cells = Vec::with_capacity(bytes.len());
        for (row, line) in input.lines().enumerate() {
            if line.len() != width {
                return Err(FormatError::RaggedRow {
                    row,
                    expected: width,
                    found: line.len(),
                }
                .into());
            }
            for (col, &b) in line.as_bytes().iter().enumerate() {
                let cell = decode(b).ok_or(FormatError::InvalidCell {
                    row,
                    col,
                    found: b as char,
                })?;
                cells.push(cell);
            }
        }
        Ok(Self { cells, width })
    }

    pub fn from_rows<R: IntoIterator<Item = T>>(rows: impl IntoIterator<Item = R>) -> Result<Self> {
        let mut cells = Vec::new();
        let mut width = None;
        for (row, cells_in_row) in rows.into_iter().enumerate() {
            let before = cells.len();
            cells.extend(cells_in_row);
            let found = cells.len() - before;
            match width {
                None => width = Some(found),
                Some(expected) if expected != found => {
                    return Err(FormatError::RaggedRow {
                        row,
                        expected,
                        found,
                    }
                    .into())
                }
                Some(_) => {}
            }
        }
        match width {
            Some(width) if width > 0 => Ok(Self { cells, width }),
            _ => Err(FormatError::Empty.into()),
        }
    }

    pub fn height(&self) -> usize {
        self.cells.len() / self.width
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, (row, col): Coord) -> bool {
        row < self.height() && col < self.width
    }

    /// Row-major offset of `coord`. Only meaningful for in-bounds coordinates.
    pub fn offset(&self, (row, col): Coord) -> usize {
        row * self.width + col
    }

    pub fn get(&self, coord: Coord) -> Option<&T> {
        self.contains(coord).then(|| &self.cells[self.offset(coord)])
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut T> {
        if self.contains(coord) {
            let offset = self.offset(coord);
            Some(&mut self.cells[offset])
        } else {
            None
        }
    }

    pub fn cell_at(&self, coord: Coord) -> Result<&T> {
        self.get(coord).ok_or(Error::OutOfBounds {
            coord,
            height: self.height(),
            width: self.width,
        })
    }

    pub fn set(&mut self, coord: Coord, value: T) -> Result<()> {
        let (height, width) = (self.height(), self.width);
        let cell = self.get_mut(coord).ok_or(Error::OutOfBounds {
            coord,
            height,
            width,
        })?;
        *cell = value;
        Ok(())
    }

    pub fn with_cell(mut self, coord: Coord, value: T) -> Result<Self> {
        self.set(coord, value)?;
        Ok(self)
    }

    /// The neighbour of `coord` one step towards `dir`, if it is on the grid.
    pub fn step(&self, (row, col): Coord, dir: Direction) -> Option<Coord> {
        let (dr, dc) = dir.delta();
        let next = (row.checked_add_signed(dr)?, col.checked_add_signed(dc)?);
        self.contains(next).then_some(next)
    }

    pub fn neighbors4(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.neighbors4_with_dir(coord).map(|(_, next)| next)
    }

    pub fn neighbors4_with_dir(
        &self,
        coord: Coord,
    ) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.step(coord, dir).map(|next| (dir, next)))
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let width = self.width;
        (0..self.cells.len()).map(move |i| (i / width, i % width))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, &T)> {
        self.coords().zip(self.cells.iter())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks_exact(self.width)
    }

    pub fn position(&self, mut pred: impl FnMut(&T) -> bool) -> Option<Coord> {
        let i = self.cells.iter().position(|cell| pred(cell))?;
        Some((i / self.width, i % self.width))
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            cells: self.cells.iter().map(f).collect(),
            width: self.width,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }
}

impl<T> Index<Coord> for Grid<T> {
    type Output = T;

    fn index(&self, coord: Coord) -> &T {
        assert!(self.contains(coord), "{coord:?} out of bounds");
        &self.cells[self.offset(coord)]
    }
}

impl<T> IndexMut<Coord> for Grid<T> {
    fn index_mut(&mut self, coord: Coord) -> &mut T {
        assert!(self.contains(coord), "{coord:?} out of bounds");
        let offset = self.offset(coord);
        &mut self.cells[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    fn bytes(input: &str) -> Result<Grid<u8>> {
        Grid::parse(input, Some)
    }

    #[test]
    fn parse_rectangular() -> Result<()> {
        let grid = bytes(indoc! {"
            abc
            def
        "})?;
        assert_eq!((grid.height(), grid.width()), (2, 3));
        assert_eq!(grid[(1, 2)], b'f');
        assert_eq!(grid.rows().collect::<Vec<_>>(), [b"abc", b"def"]);
        Ok(())
    }

    #[test]
    fn parse_crlf() -> Result<()> {
        let grid = bytes("ab\r\ncd\r\n")?;
        assert_eq!((grid.height(), grid.width()), (2, 2));
        assert_eq!(grid[(1, 0)], b'c');
        Ok(())
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert_eq!(
            bytes("abc\nde\n"),
            Err(FormatError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
            .into())
        );
        assert_eq!(
            Grid::from_rows([vec![1, 2], vec![3]]),
            Err(FormatError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
            .into())
        );
        assert_eq!(bytes("\n"), Err(FormatError::Empty.into()));
    }

    #[test]
    fn invalid_cells_are_rejected() {
        let err = Grid::parse("..\n.x\n", |b| (b == b'.').then_some(())).unwrap_err();
        assert_eq!(
            err,
            FormatError::InvalidCell {
                row: 1,
                col: 1,
                found: 'x'
            }
            .into()
        );
    }

    #[test]
    fn neighbors_stay_in_bounds() -> Result<()> {
        let grid = Grid::from_rows([[0; 3], [0; 3], [0; 3]])?;
        let mut corner = grid.neighbors4((0, 0)).collect::<Vec<_>>();
        corner.sort();
        assert_eq!(corner, [(0, 1), (1, 0)]);
        assert_eq!(grid.neighbors4((2, 1)).count(), 3);
        assert_eq!(grid.neighbors4((1, 1)).count(), 4);
        assert_eq!(grid.step((0, 2), Direction::Right), None);
        assert_eq!(grid.step((0, 2), Direction::Down), Some((1, 2)));
        Ok(())
    }

    #[test]
    fn cell_access() -> Result<()> {
        let grid = Grid::from_rows([[1, 2], [3, 4]])?;
        assert_eq!(grid.cell_at((1, 0)), Ok(&3));
        assert_eq!(
            grid.cell_at((2, 0)),
            Err(Error::OutOfBounds {
                coord: (2, 0),
                height: 2,
                width: 2
            })
        );
        let grid = grid.with_cell((0, 1), 9)?;
        assert_eq!(grid.as_slice(), [1, 9, 3, 4]);
        assert_eq!(grid.position(|&v| v == 4), Some((1, 1)));
        Ok(())
    }
}
