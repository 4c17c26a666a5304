pub mod beam;
pub mod crucible;
pub mod cycle;
pub mod error;
pub mod grid;
pub mod lagoon;
pub mod long_walk;
pub mod pipes;
pub mod polygon;
pub mod pulse;
pub mod slabs;
pub mod solutions;
pub mod springs;
pub mod step_counter;
pub mod tilt;

use std::path::Path;

use anyhow::{Context, Result};

pub use error::{Error, FormatError};
pub use grid::{Coord, Direction, Grid};
pub use solutions::{Solution, ALL_SOLUTIONS};

/// Result is only correct if bytes represents a valid positive number without any additional
/// characters!
pub fn parse_decimal(bytes: &[u8]) -> usize {
    let mut ret = 0;
    for b in bytes {
        ret = ret * 10 + (b - b'0') as usize;
    }
    ret
}

pub fn load_input(dir: &Path, day: usize) -> Result<String> {
    let path = dir.join(format!("{day}.txt"));
    std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

pub fn default_input(day: usize) -> Result<String> {
    load_input(Path::new("inputs"), day)
}
