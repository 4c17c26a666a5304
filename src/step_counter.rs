//! Garden plots reachable in an exact number of steps, on a bounded or endlessly tiled map.

use std::collections::VecDeque;
use std::str::FromStr;

use num::Integer;
use rustc_hash::FxHashSet;

use crate::error::{Error, FormatError, Result};
use crate::grid::{Coord, Direction, Grid};

#[derive(Debug, Clone)]
pub struct Garden {
    /// `true` for plots, `false` for rocks.
    pub plots: Grid<bool>,
    pub start: Coord,
}

impl FromStr for Garden {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let symbols = Grid::parse(s, |b| matches!(b, b'.' | b'#' | b'S').then_some(b))?;
        let start = symbols
            .position(|&b| b == b'S')
            .ok_or(FormatError::MissingStart)?;
        Ok(Garden {
            plots: symbols.map(|&b| b != b'#'),
            start,
        })
    }
}

/// Direct tiled BFS visits on the order of `steps²` plots, so longer walks must be extrapolated.
pub const MAX_TILED_SEARCH_STEPS: usize = 2_000;

/// Plots at distance `d <= steps` with matching parity can be stood on after exactly `steps`.
fn counts_towards(distance: usize, steps: usize) -> bool {
    distance <= steps && distance.is_even() == steps.is_even()
}

impl Garden {
    /// Plots reachable in exactly `steps` steps without leaving the map.
    pub fn reachable(&self, steps: usize) -> usize {
        let mut distance = vec![None; self.plots.len()];
        let mut queue = VecDeque::from([(self.start, 0)]);
        distance[self.plots.offset(self.start)] = Some(0);

        while let Some((coord, d)) = queue.pop_front() {
            if d == steps {
                continue;
            }
            for next in self.plots.neighbors4(coord) {
                let seen = &mut distance[self.plots.offset(next)];
                if self.plots[next] && seen.is_none() {
                    *seen = Some(d + 1);
                    queue.push_back((next, d + 1));
                }
            }
        }

        distance
            .into_iter()
            .flatten()
            .filter(|&d| counts_towards(d, steps))
            .count()
    }

    fn is_plot_tiled(&self, (row, col): (i64, i64)) -> bool {
        let row = row.mod_floor(&(self.plots.height() as i64)) as usize;
        let col = col.mod_floor(&(self.plots.width() as i64)) as usize;
        self.plots[(row, col)]
    }

    fn tiled_bfs(&self, steps: usize) -> usize {
        let origin = (self.start.0 as i64, self.start.1 as i64);
        let mut visited = FxHashSet::from_iter([origin]);
        let mut frontier = vec![origin];
        let mut count = usize::from(counts_towards(0, steps));

        for d in 1..=steps {
            let mut next_frontier = Vec::new();
            for (row, col) in frontier {
                for dir in Direction::ALL {
                    let (dr, dc) = dir.delta();
                    let next = (row + dr as i64, col + dc as i64);
                    if self.is_plot_tiled(next) && visited.insert(next) {
                        next_frontier.push(next);
                    }
                }
            }
            if counts_towards(d, steps) {
                count += next_frontier.len();
            }
            frontier = next_frontier;
        }
        count
    }

    /// Whether the map is square, the start is centred and its row and column hold no rocks.
    fn has_open_cross(&self) -> bool {
        let size = self.plots.height();
        size == self.plots.width()
            && size.is_odd()
            && self.start == (size / 2, size / 2)
            && (0..size).all(|i| self.plots[(self.start.0, i)] && self.plots[(i, self.start.1)])
    }

    /// On an open-cross map, the count after `half + k * size` steps is quadratic in `k`.
    fn extrapolate(&self, steps: usize) -> Result<Option<u64>> {
        let size = self.plots.height();
        let half = size / 2;
        if !self.has_open_cross() || steps < half || (steps - half) % size != 0 {
            return Ok(None);
        }
        let k = ((steps - half) / size) as i64;
        if k < 3 {
            return Ok(None);
        }

        let [a0, a1, a2] = [0, 1, 2].map(|i| self.tiled_bfs(half + i * size) as i64);
        let (first, second) = (a1 - a0, a2 - 2 * a1 + a0);
        tracing::debug!(a0, a1, a2, k, "extrapolating tiled step count");

        // Newton forward differences: f(k) = a0 + k·Δ + k(k-1)/2·Δ²
        let value = k
            .checked_mul(first)
            .and_then(|linear| {
                let pairs = k.checked_mul(k - 1)? / 2;
                pairs.checked_mul(second)?.checked_add(linear)
            })
            .and_then(|sum| sum.checked_add(a0))
            .ok_or(Error::Overflow)?;
        u64::try_from(value).map(Some).map_err(|_| Error::Overflow)
    }

    /// Plots reachable in exactly `steps` steps when the map repeats forever in every direction.
    ///
    /// Maps with an open cross through a centred start are extrapolated for any step count. Other
    /// maps are searched directly, up to [`MAX_TILED_SEARCH_STEPS`].
    pub fn reachable_tiled(&self, steps: usize) -> Result<u64> {
        if let Some(count) = self.extrapolate(steps)? {
            return Ok(count);
        }
        if steps > MAX_TILED_SEARCH_STEPS {
            return Err(Error::StepLimit {
                steps,
                limit: MAX_TILED_SEARCH_STEPS,
            });
        }
        Ok(self.tiled_bfs(steps) as u64)
    }
}
