//! Light beams bouncing through a contraption of mirrors and splitters.

use std::str::FromStr;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::grid::{Coord, Direction, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optic {
    Empty,
    /// `/`
    MirrorForward,
    /// `\`
    MirrorBackward,
    /// `|`
    SplitterVertical,
    /// `-`
    SplitterHorizontal,
}

impl Optic {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'.' => Some(Optic::Empty),
            b'/' => Some(Optic::MirrorForward),
            b'\\' => Some(Optic::MirrorBackward),
            b'|' => Some(Optic::SplitterVertical),
            b'-' => Some(Optic::SplitterHorizontal),
            _ => None,
        }
    }

    /// Directions a beam leaves in after entering this cell heading `dir`.
    pub fn deflect(self, dir: Direction) -> (Direction, Option<Direction>) {
        use Direction::*;
        match (self, dir) {
            (Optic::MirrorForward, Right) => (Up, None),
            (Optic::MirrorForward, Left) => (Down, None),
            (Optic::MirrorForward, Up) => (Right, None),
            (Optic::MirrorForward, Down) => (Left, None),
            (Optic::MirrorBackward, Right) => (Down, None),
            (Optic::MirrorBackward, Left) => (Up, None),
            (Optic::MirrorBackward, Up) => (Left, None),
            (Optic::MirrorBackward, Down) => (Right, None),
            (Optic::SplitterVertical, Left | Right) => (Up, Some(Down)),
            (Optic::SplitterHorizontal, Up | Down) => (Left, Some(Right)),
            _ => (dir, None),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Contraption {
    pub grid: Grid<Optic>,
}

impl FromStr for Contraption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Contraption {
            grid: Grid::parse(s, Optic::from_byte)?,
        })
    }
}

impl Contraption {
    pub fn energize(&self, start: Coord, dir: Direction) -> usize {
        energize(&self.grid, start, dir)
    }

    /// Best count over every beam entering from an edge.
    pub fn max_energized(&self) -> usize {
        edge_entries(&self.grid)
            .into_par_iter()
            .map(|(start, dir)| energize(&self.grid, start, dir))
            .max()
            .unwrap_or(0)
    }
}

/// Number of distinct cells crossed by a beam entering `start` heading `dir`.
pub fn energize(grid: &Grid<Optic>, start: Coord, dir: Direction) -> usize {
    if !grid.contains(start) {
        return 0;
    }

    // Directions each cell has already been crossed in.
    let mut seen = vec![0u8; grid.len()];
    let mut pending = vec![(start, dir)];
    seen[grid.offset(start)] |= dir.bit();

    while let Some((coord, heading)) = pending.pop() {
        let (out, split) = grid[coord].deflect(heading);
        for out in std::iter::once(out).chain(split) {
            let Some(next) = grid.step(coord, out) else {
                continue;
            };
            let mask = &mut seen[grid.offset(next)];
            if *mask & out.bit() == 0 {
                *mask |= out.bit();
                pending.push((next, out));
            }
        }
    }

    seen.iter().filter(|&&mask| mask != 0).count()
}

/// Every edge cell paired with the inward heading; corners appear once per edge.
pub fn edge_entries<T>(grid: &Grid<T>) -> Vec<(Coord, Direction)> {
    let (height, width) = (grid.height(), grid.width());
    let mut entries = Vec::with_capacity(2 * (height + width));
    for col in 0..width {
        entries.push(((0, col), Direction::Down));
        entries.push(((height - 1, col), Direction::Up));
    }
    for row in 0..height {
        entries.push(((row, 0), Direction::Right));
        entries.push(((row, width - 1), Direction::Left));
    }
    entries
}
