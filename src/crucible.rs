//! Cheapest route for a crucible that must not go straight too long, or turn too early.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::grid::{Coord, Direction, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLimits {
    /// Straight steps required before turning or stopping.
    pub min_before_turning: usize,
    /// Straight steps allowed before a turn is forced.
    pub max_straight: usize,
}

impl RunLimits {
    pub const CRUCIBLE: RunLimits = RunLimits {
        min_before_turning: 0,
        max_straight: 3,
    };

    pub const ULTRA_CRUCIBLE: RunLimits = RunLimits {
        min_before_turning: 4,
        max_straight: 10,
    };
}

/// Grid of single-digit costs.
pub fn parse_heat_map(input: &str) -> Result<Grid<u8>> {
    Grid::parse(input, |b| b.is_ascii_digit().then(|| b - b'0'))
}

/// Identity of a search node; the cost travels beside it in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct State {
    coord: Coord,
    heading: Option<Direction>,
    run: usize,
}

/// Dijkstra over `(coord, heading, run)`. Entering a cell costs that cell's value.
///
/// The start state has no heading, may leave in any direction, and is exempt from both limits.
pub fn min_heat_loss(costs: &Grid<u8>, start: Coord, end: Coord, limits: RunLimits) -> Result<u64> {
    costs.cell_at(start)?;
    costs.cell_at(end)?;
    if start == end {
        return Ok(0);
    }

    let mut visited = FxHashSet::default();
    let mut queue = BinaryHeap::new();
    queue.push(Reverse((
        0u64,
        State {
            coord: start,
            heading: None,
            run: 0,
        },
    )));

    while let Some(Reverse((cost, state))) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }
        if state.coord == end && state.run >= limits.min_before_turning {
            tracing::debug!(cost, explored = visited.len(), "cheapest route found");
            return Ok(cost);
        }

        let mut push = |dir: Direction, run: usize| {
            if let Some(next) = costs.step(state.coord, dir) {
                let next_state = State {
                    coord: next,
                    heading: Some(dir),
                    run,
                };
                if !visited.contains(&next_state) {
                    queue.push(Reverse((cost + u64::from(costs[next]), next_state)));
                }
            }
        };

        match state.heading {
            None => {
                for dir in Direction::ALL {
                    push(dir, 1);
                }
            }
            Some(heading) => {
                if state.run < limits.max_straight {
                    push(heading, state.run + 1);
                }
                if state.run >= limits.min_before_turning {
                    for dir in heading.turns() {
                        push(dir, 1);
                    }
                }
            }
        }
    }

    Err(Error::Unreachable {
        from: start,
        to: end,
    })
}

/// Cheapest route from the top-left to the bottom-right corner.
pub fn corner_to_corner(costs: &Grid<u8>, limits: RunLimits) -> Result<u64> {
    let end = (costs.height() - 1, costs.width() - 1);
    min_heat_loss(costs, (0, 0), end, limits)
}
