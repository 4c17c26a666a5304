//! Round rocks sliding across a tilted platform.

use std::str::FromStr;

use crate::cycle::{self, Cycle};
use crate::error::{Error, Result};
use crate::grid::{Coord, Direction, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rock {
    Round,
    Cube,
    Empty,
}

impl Rock {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'O' => Some(Rock::Round),
            b'#' => Some(Rock::Cube),
            b'.' => Some(Rock::Empty),
            _ => None,
        }
    }

    fn symbol(self) -> u8 {
        match self {
            Rock::Round => b'O',
            Rock::Cube => b'#',
            Rock::Empty => b'.',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub grid: Grid<Rock>,
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Platform {
            grid: Grid::parse(s, Rock::from_byte)?,
        })
    }
}

/// The spin cycle tilts in this order.
const SPIN: [Direction; 4] = [
    Direction::Up,
    Direction::Left,
    Direction::Down,
    Direction::Right,
];

impl Platform {
    /// Number of lanes rocks slide along and the length of each, for a tilt towards `dir`.
    fn lanes(&self, dir: Direction) -> (usize, usize) {
        let (height, width) = (self.grid.height(), self.grid.width());
        if dir.is_vertical() {
            (width, height)
        } else {
            (height, width)
        }
    }

    /// Cell `k` steps away from the destination edge along `lane`.
    fn lane_coord(&self, dir: Direction, lane: usize, k: usize) -> Coord {
        let (height, width) = (self.grid.height(), self.grid.width());
        match dir {
            Direction::Up => (k, lane),
            Direction::Down => (height - 1 - k, lane),
            Direction::Left => (lane, k),
            Direction::Right => (lane, width - 1 - k),
        }
    }

    /// Slides every round rock towards `dir` until it hits the edge, a cube or a settled rock.
    pub fn tilt(&mut self, dir: Direction) {
        let (lanes, len) = self.lanes(dir);
        for lane in 0..lanes {
            // Scanning from the destination edge, `free` is where the next round rock settles.
            let mut free = 0;
            for k in 0..len {
                let coord = self.lane_coord(dir, lane, k);
                match self.grid[coord] {
                    Rock::Cube => free = k + 1,
                    Rock::Round => {
                        if free != k {
                            self.grid[coord] = Rock::Empty;
                            let dest = self.lane_coord(dir, lane, free);
                            self.grid[dest] = Rock::Round;
                        }
                        free += 1;
                    }
                    Rock::Empty => {}
                }
            }
        }
    }

    pub fn tilted(mut self, dir: Direction) -> Self {
        self.tilt(dir);
        self
    }

    pub fn spin_cycle(&mut self) {
        for dir in SPIN {
            self.tilt(dir);
        }
    }

    /// Each round rock weighs as many rows as separate it from the south edge, inclusive.
    pub fn north_load(&self) -> usize {
        let height = self.grid.height();
        self.grid
            .iter()
            .filter(|&(_, &rock)| rock == Rock::Round)
            .map(|((row, _), _)| height - row)
            .sum()
    }

    /// Row-major symbols, usable as a key for spotting repeated layouts.
    pub fn snapshot(&self) -> Vec<u8> {
        self.grid.as_slice().iter().map(|rock| rock.symbol()).collect()
    }

    /// Layout after `cycles` spin cycles.
    pub fn after_spin_cycles(self, cycles: usize) -> (Self, Option<Cycle>) {
        cycle::fast_forward(self, cycles, Platform::spin_cycle, Platform::snapshot)
    }
}
