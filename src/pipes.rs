//! Pipe maze: start-piece inference and loop tracing.

use std::str::FromStr;

use crate::error::{Error, FormatError, Result};
use crate::grid::{Coord, Direction, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipe {
    /// `|`
    Vertical,
    /// `-`
    Horizontal,
    /// `L`
    NorthEast,
    /// `J`
    NorthWest,
    /// `7`
    SouthWest,
    /// `F`
    SouthEast,
}

impl Pipe {
    /// Candidates tried for the start tile, in order.
    pub const ALL: [Pipe; 6] = [
        Pipe::Horizontal,
        Pipe::Vertical,
        Pipe::NorthEast,
        Pipe::SouthWest,
        Pipe::NorthWest,
        Pipe::SouthEast,
    ];

    pub fn openings(self) -> [Direction; 2] {
        use Direction::*;
        match self {
            Pipe::Vertical => [Up, Down],
            Pipe::Horizontal => [Left, Right],
            Pipe::NorthEast => [Up, Right],
            Pipe::NorthWest => [Up, Left],
            Pipe::SouthWest => [Down, Left],
            Pipe::SouthEast => [Down, Right],
        }
    }

    pub fn opens(self, dir: Direction) -> bool {
        self.openings().contains(&dir)
    }

    fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            b'|' => Pipe::Vertical,
            b'-' => Pipe::Horizontal,
            b'L' => Pipe::NorthEast,
            b'J' => Pipe::NorthWest,
            b'7' => Pipe::SouthWest,
            b'F' => Pipe::SouthEast,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Ground,
    Start,
    Pipe(Pipe),
}

impl Tile {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'.' => Some(Tile::Ground),
            b'S' => Some(Tile::Start),
            b => Pipe::from_byte(b).map(Tile::Pipe),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipeMaze {
    pub grid: Grid<Tile>,
    pub start: Coord,
}

impl FromStr for PipeMaze {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let grid = Grid::parse(s, Tile::from_byte)?;
        let start = grid
            .position(|&tile| tile == Tile::Start)
            .ok_or(FormatError::MissingStart)?;
        Ok(PipeMaze { grid, start })
    }
}

impl PipeMaze {
    pub fn trace(&self) -> Result<Vec<Coord>> {
        trace_loop(&self.grid, self.start)
    }
}

/// Whether the tile at `coord` has an opening pointing `dir`. The start tile never does.
fn opens_towards(grid: &Grid<Tile>, coord: Coord, dir: Direction) -> bool {
    matches!(grid.get(coord), Some(Tile::Pipe(pipe)) if pipe.opens(dir))
}

/// Picks the first pipe shape whose two openings both face a pipe leading back to `start`.
pub fn infer_start_pipe(grid: &Grid<Tile>, start: Coord) -> Result<Pipe> {
    Pipe::ALL
        .into_iter()
        .find(|pipe| {
            pipe.openings().into_iter().all(|dir| {
                grid.step(start, dir)
                    .is_some_and(|next| opens_towards(grid, next, dir.reverse()))
            })
        })
        .ok_or(Error::NoLoopFound(start))
}

/// Walks the loop through `start` and returns its cells in order, beginning with `start`.
pub fn trace_loop(grid: &Grid<Tile>, start: Coord) -> Result<Vec<Coord>> {
    let start_pipe = infer_start_pipe(grid, start)?;
    let broken = Error::NoLoopFound(start);

    let mut path = vec![start];
    let mut heading = start_pipe.openings()[0];
    let mut current = start;
    loop {
        let next = grid.step(current, heading).ok_or(broken.clone())?;
        if next == start {
            break;
        }
        let Some(Tile::Pipe(pipe)) = grid.get(next) else {
            return Err(broken);
        };
        let entered_from = heading.reverse();
        if !pipe.opens(entered_from) || path.len() >= grid.len() {
            return Err(broken);
        }
        path.push(next);
        current = next;
        heading = pipe
            .openings()
            .into_iter()
            .find(|&dir| dir != entered_from)
            .ok_or(broken.clone())?;
    }

    // The walk only returns to start through the start pipe's second opening.
    if heading.reverse() != start_pipe.openings()[1] || path.len() < 4 {
        return Err(broken);
    }
    Ok(path)
}
