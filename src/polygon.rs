//! Lattice polygon measurement: shoelace area and Pick's theorem.

use nalgebra::Point2;

use crate::error::{Error, Result};
use crate::grid::Coord;

pub type Vertex = Point2<i64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measure {
    pub area: i64,
    /// Lattice points on the perimeter.
    pub boundary: i64,
    /// Lattice points strictly inside.
    pub interior: i64,
}

impl Measure {
    /// Lattice points on or inside the perimeter.
    pub fn enclosed(&self) -> Result<i64> {
        self.interior
            .checked_add(self.boundary)
            .ok_or(Error::Overflow)
    }
}

pub fn from_coords(coords: &[Coord]) -> Vec<Vertex> {
    coords
        .iter()
        .map(|&(row, col)| Point2::new(col as i64, row as i64))
        .collect()
}

/// Twice the signed area. Each cross term fits in `i128`; their sum may not.
fn double_signed_area(vertices: &[Vertex]) -> Result<i128> {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let (a, b) = (&vertices[i], &vertices[(i + 1) % n]);
            a.x as i128 * b.y as i128 - a.y as i128 * b.x as i128
        })
        .try_fold(0i128, |acc, term| acc.checked_add(term))
        .ok_or(Error::Overflow)
}

fn double_area(vertices: &[Vertex]) -> Result<i128> {
    double_signed_area(vertices)?
        .checked_abs()
        .ok_or(Error::Overflow)
}

pub fn area(vertices: &[Vertex]) -> Result<i64> {
    i64::try_from(double_area(vertices)? / 2).map_err(|_| Error::Overflow)
}

/// Area and lattice point counts of the simple polygon traced by `vertices`.
///
/// `boundary` defaults to the vertex count, which is right when consecutive vertices are one unit
/// apart (a traced loop). Polygons with longer edges must pass the total edge length.
pub fn measure(vertices: &[Vertex], boundary: Option<i64>) -> Result<Measure> {
    let boundary = match boundary {
        Some(boundary) => boundary,
        None => i64::try_from(vertices.len()).map_err(|_| Error::Overflow)?,
    };
    let twice_area = double_area(vertices)?;
    // Pick: 2A = 2I + B - 2
    let interior = (twice_area - boundary as i128 + 2) / 2;
    Ok(Measure {
        area: i64::try_from(twice_area / 2).map_err(|_| Error::Overflow)?,
        boundary,
        interior: i64::try_from(interior).map_err(|_| Error::Overflow)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    /// Unit-step loop around a `width` x `height` rectangle of cells, clockwise from the origin.
    fn rectangle_loop(width: usize, height: usize) -> Vec<Coord> {
        let mut coords = Vec::new();
        coords.extend((0..width).map(|col| (0, col)));
        coords.extend((1..height).map(|row| (row, width - 1)));
        coords.extend((0..width - 1).rev().map(|col| (height - 1, col)));
        coords.extend((1..height - 1).rev().map(|row| (row, 0)));
        coords
    }

    #[test]
    fn unit_square() -> Result<()> {
        let vertices = [(0, 0), (0, 1), (1, 1), (1, 0)].map(|(x, y)| Point2::new(x, y));
        assert_eq!(
            measure(&vertices, None)?,
            Measure {
                area: 1,
                boundary: 4,
                interior: 0
            }
        );
        Ok(())
    }

    #[test]
    fn orientation_does_not_matter() -> Result<()> {
        let mut coords = rectangle_loop(5, 4);
        let forward = measure(&from_coords(&coords), None)?;
        coords.reverse();
        assert_eq!(measure(&from_coords(&coords), None)?, forward);
        assert_eq!(forward.area, 12);
        assert_eq!(forward.interior, 6);
        Ok(())
    }

    #[test]
    fn large_coordinates_do_not_wrap() -> Result<()> {
        let side = 3_000_000_000_i64;
        let vertices = [(0, 0), (side, 0), (side, side), (0, side)].map(|(x, y)| Point2::new(x, y));
        let measure = measure(&vertices, Some(4 * side))?;
        assert_eq!(measure.area, side * side);
        assert_eq!(measure.enclosed()?, (side + 1) * (side + 1));
        Ok(())
    }

    #[test]
    fn overflowing_area_is_reported() {
        let side = i64::MAX / 2;
        let vertices = [(0, 0), (side, 0), (side, side), (0, side)].map(|(x, y)| Point2::new(x, y));
        assert_eq!(area(&vertices), Err(Error::Overflow));
    }

    #[test]
    fn extreme_coordinates_are_reported() {
        let (min, max) = (i64::MIN, i64::MAX);
        let vertices = [(min, min), (max, min), (max, max), (min, max)].map(|(x, y)| Point2::new(x, y));
        assert_eq!(area(&vertices), Err(Error::Overflow));
        assert_eq!(measure(&vertices, Some(0)), Err(Error::Overflow));
    }

    proptest! {
        #[test]
        fn pick_identity_on_rectangles(width in 2usize..40, height in 2usize..40) {
            let coords = rectangle_loop(width, height);
            let len = coords.len() as i64;
            let m = measure(&from_coords(&coords), None).unwrap();
            prop_assert_eq!(m.interior + len, m.area + len / 2 + 1);
            prop_assert_eq!(m.interior, ((width - 2) * (height - 2)) as i64);
        }
    }
}
