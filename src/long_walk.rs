//! Longest scenic hike: junction graph contraction and exhaustive simple-path search.

use std::str::FromStr;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction as Edges;
use rustc_hash::FxHashMap;

use crate::error::{Error, FormatError, Result};
use crate::grid::{Coord, Direction, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trail {
    Path,
    Forest,
    Slope(Direction),
}

impl Trail {
    fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            b'.' => Trail::Path,
            b'#' => Trail::Forest,
            b'^' => Trail::Slope(Direction::Up),
            b'>' => Trail::Slope(Direction::Right),
            b'v' => Trail::Slope(Direction::Down),
            b'<' => Trail::Slope(Direction::Left),
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Slopes can only be left downhill.
    Slippery,
    /// Slopes are ordinary path.
    Dry,
}

#[derive(Debug, Clone)]
pub struct TrailMap {
    pub grid: Grid<Trail>,
    pub start: Coord,
    pub end: Coord,
}

impl FromStr for TrailMap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let grid = Grid::parse(s, Trail::from_byte)?;
        let opening = |row: usize| {
            (0..grid.width())
                .find(|&col| grid[(row, col)] == Trail::Path)
                .map(|col| (row, col))
                .ok_or(FormatError::MissingStart)
        };
        let start = opening(0)?;
        let end = opening(grid.height() - 1)?;
        Ok(TrailMap { grid, start, end })
    }
}

impl TrailMap {
    /// Cells reachable in one step from `coord`.
    pub fn moves(&self, coord: Coord, movement: Movement) -> impl Iterator<Item = Coord> + '_ {
        let forced = match (movement, self.grid[coord]) {
            (Movement::Slippery, Trail::Slope(dir)) => Some(dir),
            _ => None,
        };
        self.grid
            .neighbors4_with_dir(coord)
            .filter(move |&(dir, next)| {
                forced.map_or(true, |forced| forced == dir) && self.grid[next] != Trail::Forest
            })
            .map(|(_, next)| next)
    }

    fn is_junction(&self, coord: Coord, movement: Movement) -> bool {
        self.grid[coord] != Trail::Forest && self.moves(coord, movement).count() >= 3
    }

    /// Collapses every corridor into one weighted edge between junctions (or the terminals).
    pub fn contract(&self, movement: Movement) -> ContractedGraph {
        let mut graph = ContractedGraph::default();
        graph.add_node(self.start);
        graph.add_node(self.end);
        for coord in self.grid.coords() {
            if self.is_junction(coord, movement) {
                graph.add_node(coord);
            }
        }

        let nodes = graph.graph.node_weights().copied().collect::<Vec<_>>();
        for from in nodes {
            for first in self.moves(from, movement) {
                if let Some((to, length)) = self.walk_corridor(&graph, from, first, movement) {
                    graph.add_corridor(from, to, length);
                }
            }
        }
        tracing::debug!(
            nodes = graph.graph.node_count(),
            edges = graph.graph.edge_count(),
            ?movement,
            "contracted trail map"
        );
        graph
    }

    /// Follows the corridor leaving `from` through `first` until it reaches a node.
    fn walk_corridor(
        &self,
        graph: &ContractedGraph,
        from: Coord,
        first: Coord,
        movement: Movement,
    ) -> Option<(Coord, usize)> {
        let (mut prev, mut current, mut length) = (from, first, 1);
        while !graph.contains(current) {
            if length > self.grid.len() {
                return None;
            }
            let next = self.moves(current, movement).find(|&next| next != prev)?;
            (prev, current) = (current, next);
            length += 1;
        }
        (current != from).then_some((current, length))
    }

    pub fn longest_hike(&self, movement: Movement) -> Option<usize> {
        self.contract(movement).longest_path(self.start, self.end)
    }
}

/// Junctions and terminals joined by directed, weighted corridors.
#[derive(Debug, Clone, Default)]
pub struct ContractedGraph {
    graph: DiGraph<Coord, usize>,
    index: FxHashMap<Coord, NodeIndex>,
}

impl ContractedGraph {
    pub fn add_node(&mut self, coord: Coord) -> NodeIndex {
        if let Some(&node) = self.index.get(&coord) {
            return node;
        }
        let node = self.graph.add_node(coord);
        self.index.insert(coord, node);
        node
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.index.contains_key(&coord)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Adds a one-way corridor. Parallel corridors keep the longest length.
    pub fn add_corridor(&mut self, from: Coord, to: Coord, length: usize) {
        let (a, b) = (self.add_node(from), self.add_node(to));
        match self.graph.find_edge(a, b) {
            Some(edge) => {
                let weight = &mut self.graph[edge];
                *weight = (*weight).max(length);
            }
            None => {
                self.graph.add_edge(a, b, length);
            }
        }
    }

    pub fn add_two_way_corridor(&mut self, a: Coord, b: Coord, length: usize) {
        self.add_corridor(a, b, length);
        self.add_corridor(b, a, length);
    }

    /// Longest simple path from `start` to `end`, or `None` if `end` cannot be reached.
    pub fn longest_path(&self, start: Coord, end: Coord) -> Option<usize> {
        let (&start, &end) = (self.index.get(&start)?, self.index.get(&end)?);

        // With a single way into `end`, standing next to it means the hike must finish there.
        let mut into_end = self.graph.edges_directed(end, Edges::Incoming);
        let gate = match (into_end.next(), into_end.next()) {
            (Some(edge), None) => Some((edge.source(), *edge.weight())),
            _ => None,
        };

        let mut search = Search {
            graph: &self.graph,
            end,
            gate,
            visited: vec![false; self.graph.node_count()],
            best: None,
        };
        search.visited[start.index()] = true;
        search.explore(start, 0);
        search.best
    }
}

struct Search<'a> {
    graph: &'a DiGraph<Coord, usize>,
    end: NodeIndex,
    gate: Option<(NodeIndex, usize)>,
    visited: Vec<bool>,
    best: Option<usize>,
}

impl Search<'_> {
    fn explore(&mut self, node: NodeIndex, length: usize) {
        if node == self.end {
            self.best = self.best.max(Some(length));
            return;
        }
        if let Some((gate, last)) = self.gate {
            if node == gate {
                self.best = self.best.max(Some(length + last));
                return;
            }
        }

        let mut neighbors = self.graph.neighbors_directed(node, Edges::Outgoing).detach();
        while let Some((edge, next)) = neighbors.next(self.graph) {
            if self.visited[next.index()] {
                continue;
            }
            self.visited[next.index()] = true;
            self.explore(next, length + self.graph[edge]);
            self.visited[next.index()] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    const EXAMPLE: &str = indoc! {"
        #.#####################
        #.......#########...###
        #######.#########.#.###
        ###.....#.>.>.###.#.###
        ###v#####.#v#.###.#.###
        ###.>...#.#.#.....#...#
        ###v###.#.#.#########.#
        ###...#.#.#.......#...#
        #####.#.#.#######.#.###
        #.....#.#.#.......#...#
        #.#####.#.#.#########v#
        #.#...#...#...###...>.#
        #.#.#v#######v###.###v#
        #...#.>.#...>.>.#.###.#
        #####v#.#.###v#.#.###.#
        #.....#...#...#.#.#...#
        #.#########.###.#.#.###
        #...###...#...#...#.###
        ###.###.#.###v#####v###
        #...#...#.#.>.>.#.>.###
        #.###.###.#.###.#.#v###
        #.....###...###...#...#
        #####################.#
    "};

    #[test]
    fn example() -> Result<()> {
        let map: TrailMap = EXAMPLE.parse()?;
        assert_eq!((map.start, map.end), ((0, 1), (22, 21)));
        assert_eq!(map.longest_hike(Movement::Slippery), Some(94));
        assert_eq!(map.longest_hike(Movement::Dry), Some(154));
        Ok(())
    }

    #[test]
    fn contraction_keeps_junctions_only() -> Result<()> {
        let map: TrailMap = EXAMPLE.parse()?;
        assert_eq!(map.contract(Movement::Dry).node_count(), 9);
        Ok(())
    }

    #[test]
    fn chain_cannot_revisit_nodes() {
        let (start, a, b, end) = ((0, 0), (0, 1), (0, 2), (0, 3));
        let mut graph = ContractedGraph::default();
        graph.add_two_way_corridor(start, a, 2);
        graph.add_two_way_corridor(a, b, 3);
        graph.add_two_way_corridor(b, end, 4);
        // Bouncing between A and B would only be longer if revisits were allowed.
        assert_eq!(graph.longest_path(start, end), Some(9));
    }

    #[test]
    fn picks_longer_branch() {
        let (start, a, b, c, end) = ((0, 0), (1, 0), (2, 0), (3, 0), (4, 0));
        let mut graph = ContractedGraph::default();
        graph.add_two_way_corridor(start, a, 1);
        graph.add_two_way_corridor(a, b, 10);
        graph.add_two_way_corridor(a, c, 1);
        graph.add_two_way_corridor(b, c, 1);
        graph.add_two_way_corridor(c, end, 1);
        graph.add_two_way_corridor(b, end, 1);
        // start-a-c-b-end (1+1+1+1) loses to start-a-b-c-end (1+10+1+1).
        assert_eq!(graph.longest_path(start, end), Some(13));
    }

    #[test]
    fn one_way_corridors() {
        let mut graph = ContractedGraph::default();
        graph.add_corridor((0, 0), (0, 1), 5);
        assert_eq!(graph.longest_path((0, 1), (0, 0)), None);
        assert_eq!(graph.longest_path((0, 0), (0, 1)), Some(5));
    }

    #[test]
    fn slopes_block_uphill_corridors() -> Result<()> {
        let map: TrailMap = indoc! {"
            #.#
            #^#
            #.#
        "}
        .parse()?;
        assert_eq!(map.longest_hike(Movement::Dry), Some(2));
        assert_eq!(map.longest_hike(Movement::Slippery), None);
        Ok(())
    }
}
