//! Falling sand bricks: settling the stack and counting chain reactions.

use std::collections::VecDeque;

use nalgebra::Point3;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction as Edges;
use rayon::prelude::*;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::error::{FormatError, Result};
use crate::parse_decimal;

/// Axis-aligned brick, `min` and `max` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brick {
    pub min: Point3<usize>,
    pub max: Point3<usize>,
}

impl Brick {
    fn footprint(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.min.x..=self.max.x).flat_map(move |x| (self.min.y..=self.max.y).map(move |y| (x, y)))
    }

    fn height(&self) -> usize {
        self.max.z - self.min.z + 1
    }
}

pub fn parse_bricks(input: &str) -> Result<Vec<Brick>> {
    let line_re = Regex::new(concat!(
        r"^([0-9]{1,6}),([0-9]{1,6}),([0-9]{1,6})",
        r"~([0-9]{1,6}),([0-9]{1,6}),([0-9]{1,6})$",
    ))
    .expect("brick pattern is valid");

    let mut bricks = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let malformed = || FormatError::MalformedLine {
            line: i + 1,
            text: line.to_owned(),
        };
        let caps = line_re.captures(line.trim_end()).ok_or_else(malformed)?;
        let [x0, y0, z0, x1, y1, z1] =
            [1, 2, 3, 4, 5, 6].map(|g| parse_decimal(caps[g].as_bytes()));
        if z0.min(z1) == 0 {
            return Err(malformed().into());
        }
        bricks.push(Brick {
            min: Point3::new(x0.min(x1), y0.min(y1), z0.min(z1)),
            max: Point3::new(x0.max(x1), y0.max(y1), z0.max(z1)),
        });
    }
    if bricks.is_empty() {
        return Err(FormatError::Empty.into());
    }
    Ok(bricks)
}

/// Settled bricks with an edge from each brick to every brick resting directly on it.
#[derive(Debug, Clone)]
pub struct Stack {
    graph: DiGraph<Brick, ()>,
}

impl Stack {
    /// Drops every brick straight down until it rests on the ground (z = 1) or another brick.
    pub fn settle(mut bricks: Vec<Brick>) -> Self {
        bricks.sort_by_key(|brick| brick.min.z);

        let mut graph = DiGraph::with_capacity(bricks.len(), bricks.len());
        // Highest occupied z and its brick, per column.
        let mut tops: FxHashMap<(usize, usize), (usize, NodeIndex)> = FxHashMap::default();

        for mut brick in bricks {
            let rest = brick
                .footprint()
                .filter_map(|column| tops.get(&column))
                .map(|&(z, _)| z)
                .max()
                .unwrap_or(0);
            let mut supporters = brick
                .footprint()
                .filter_map(|column| tops.get(&column))
                .filter(|&&(z, _)| z == rest && rest > 0)
                .map(|&(_, node)| node)
                .collect::<Vec<_>>();
            supporters.sort();
            supporters.dedup();

            let height = brick.height();
            brick.min.z = rest + 1;
            brick.max.z = rest + height;
            let node = graph.add_node(brick);
            for supporter in supporters {
                graph.add_edge(supporter, node, ());
            }
            for column in brick.footprint() {
                tops.insert(column, (brick.max.z, node));
            }
        }
        tracing::debug!(
            bricks = graph.node_count(),
            contacts = graph.edge_count(),
            "settled bricks"
        );
        Stack { graph }
    }

    /// Settled bricks in the order they came to rest.
    pub fn bricks(&self) -> impl Iterator<Item = &Brick> {
        self.graph.node_weights()
    }

    fn supporter_count(&self, node: NodeIndex) -> usize {
        self.graph.neighbors_directed(node, Edges::Incoming).count()
    }

    /// Bricks whose removal leaves every brick above them still supported.
    pub fn safe_to_disintegrate(&self) -> usize {
        self.graph
            .node_indices()
            .filter(|&node| {
                self.graph
                    .neighbors_directed(node, Edges::Outgoing)
                    .all(|above| self.supporter_count(above) >= 2)
            })
            .count()
    }

    /// Number of other bricks that fall when `removed` is disintegrated.
    pub fn chain_reaction(&self, removed: usize) -> usize {
        let removed = NodeIndex::new(removed);
        let mut fallen = vec![false; self.graph.node_count()];
        // Supporters of each brick that have not fallen yet.
        let mut standing = self
            .graph
            .node_indices()
            .map(|node| self.supporter_count(node))
            .collect::<Vec<_>>();

        fallen[removed.index()] = true;
        let mut queue = VecDeque::from([removed]);
        let mut count = 0;
        while let Some(node) = queue.pop_front() {
            for above in self.graph.neighbors_directed(node, Edges::Outgoing) {
                let remaining = &mut standing[above.index()];
                *remaining -= 1;
                if *remaining == 0 && !fallen[above.index()] {
                    fallen[above.index()] = true;
                    count += 1;
                    queue.push_back(above);
                }
            }
        }
        count
    }

    /// Sum of [`Stack::chain_reaction`] over every brick.
    pub fn total_chain_reactions(&self) -> usize {
        (0..self.graph.node_count())
            .into_par_iter()
            .map(|removed| self.chain_reaction(removed))
            .sum()
    }
}
