use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::beam::Contraption;
use crate::crucible::{self, RunLimits};
use crate::grid::Direction;
use crate::lagoon::{self, DigPlan};
use crate::long_walk::{Movement, TrailMap};
use crate::pipes::PipeMaze;
use crate::polygon;
use crate::pulse::Network;
use crate::slabs::{self, Stack};
use crate::springs;
use crate::step_counter::Garden;
use crate::tilt::Platform;
use crate::Error;

pub type Solution = fn(&str) -> Result<(u64, u64)>;

pub const ALL_SOLUTIONS: [(usize, Solution); 10] = [
    (10, day10),
    (12, day12),
    (14, day14),
    (16, day16),
    (17, day17),
    (18, day18),
    (20, day20),
    (21, day21),
    (22, day22),
    (23, day23),
];

pub fn day10(input: &str) -> Result<(u64, u64)> {
    let maze: PipeMaze = input.parse()?;
    let path = maze.trace()?;
    let measure = polygon::measure(&polygon::from_coords(&path), None)?;
    Ok((path.len() as u64 / 2, measure.interior.try_into()?))
}

pub fn day12(input: &str) -> Result<(u64, u64)> {
    let records = springs::parse_records(input)?;
    let total = |copies: usize| {
        records
            .par_iter()
            .map(|record| record.unfold(copies).arrangements())
            .try_reduce(|| 0, |a, b| a.checked_add(b).ok_or(Error::Overflow))
    };
    Ok((total(1)?, total(5)?))
}

pub fn day14(input: &str) -> Result<(u64, u64)> {
    let platform: Platform = input.parse()?;
    let part1 = platform.clone().tilted(Direction::Up).north_load();
    let (spun, _) = platform.after_spin_cycles(1_000_000_000);
    Ok((part1 as u64, spun.north_load() as u64))
}

pub fn day16(input: &str) -> Result<(u64, u64)> {
    let contraption: Contraption = input.parse()?;
    let part1 = contraption.energize((0, 0), Direction::Right);
    Ok((part1 as u64, contraption.max_energized() as u64))
}

pub fn day17(input: &str) -> Result<(u64, u64)> {
    let costs = crucible::parse_heat_map(input)?;
    let part1 = crucible::corner_to_corner(&costs, RunLimits::CRUCIBLE)?;
    let part2 = crucible::corner_to_corner(&costs, RunLimits::ULTRA_CRUCIBLE)?;
    Ok((part1, part2))
}

pub fn day18(input: &str) -> Result<(u64, u64)> {
    let plan = DigPlan::parse(input)?;
    let part1 = lagoon::lagoon_volume(&plan.literal)?;
    let part2 = lagoon::lagoon_volume(&plan.decoded)?;
    Ok((part1.try_into()?, part2.try_into()?))
}

pub fn day20(input: &str) -> Result<(u64, u64)> {
    let mut network: Network = input.parse()?;
    let part1 = network.pulse_product(1000);
    let part2 = network
        .presses_until_low("rx")
        .context("presses until rx receives a low pulse")?;
    Ok((part1, part2))
}

/// Part 2 walks 26501365 steps, which only the real puzzle maps support: square, start in the
/// centre, and an open row and column through it. Other maps fail with `Error::StepLimit`.
pub fn day21(input: &str) -> Result<(u64, u64)> {
    let garden: Garden = input.parse()?;
    Ok((
        garden.reachable(64) as u64,
        garden.reachable_tiled(26_501_365)?,
    ))
}

pub fn day22(input: &str) -> Result<(u64, u64)> {
    let stack = Stack::settle(slabs::parse_bricks(input)?);
    Ok((
        stack.safe_to_disintegrate() as u64,
        stack.total_chain_reactions() as u64,
    ))
}

pub fn day23(input: &str) -> Result<(u64, u64)> {
    let map: TrailMap = input.parse()?;
    let unreachable = || Error::Unreachable {
        from: map.start,
        to: map.end,
    };
    let part1 = map
        .longest_hike(Movement::Slippery)
        .ok_or_else(unreachable)
        .context("slippery slopes")?;
    let part2 = map
        .longest_hike(Movement::Dry)
        .ok_or_else(unreachable)
        .context("dry slopes")?;
    Ok((part1 as u64, part2 as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    fn execute_day_input(f: Solution, input: &str) -> Result<(u64, u64)> {
        f(input)
    }

    #[test]
    fn test_day10() -> Result<()> {
        let example_part1 = indoc! {"
            ..F7.
            .FJ|.
            SJ.L7
            |F--J
            LJ...
        "};
        assert_eq!(execute_day_input(day10, example_part1)?.0, 8);

        let example_part2 = indoc! {"
            ...........
            .S-------7.
            .|F-----7|.
            .||.....||.
            .||.....||.
            .|L-7.F-J|.
            .|..|.|..|.
            .L--J.L--J.
            ...........
        "};
        assert_eq!(execute_day_input(day10, example_part2)?.1, 4);

        let example_part2 = indoc! {"
            .F----7F7F7F7F-7....
            .|F--7||||||||FJ....
            .||.FJ||||||||L7....
            FJL7L7LJLJ||LJ.L-7..
            L--J.L7...LJS7F-7L7.
            ....F-J..F7FJ|L7L7L7
            ....L7.F7||L7|.L7L7|
            .....|FJLJ|FJ|F7|.LJ
            ....FJL-7.||.||||...
            ....L---J.LJ.LJLJ...
        "};
        assert_eq!(execute_day_input(day10, example_part2)?.1, 8);
        Ok(())
    }

    #[test]
    fn test_day12() -> Result<()> {
        let example = indoc! {"
            ???.### 1,1,3
            .??..??...?##. 1,1,3
            ?#?#?#?#?#?#?#? 1,3,1,6
            ????.#...#... 4,1,1
            ????.######..#####. 1,6,5
            ?###???????? 3,2,1
        "};
        assert_eq!(execute_day_input(day12, example)?, (21, 525152));
        Ok(())
    }

    #[test]
    fn test_day14() -> Result<()> {
        let example = indoc! {"
            O....#....
            O.OO#....#
            .....##...
            OO.#O....O
            .O.....O#.
            O.#..O.#.#
            ..O..#O..O
            .......O..
            #....###..
            #OO..#....
        "};
        assert_eq!(execute_day_input(day14, example)?, (136, 64));
        Ok(())
    }

    #[test]
    fn test_day16() -> Result<()> {
        let example = indoc! {r"
            .|...\....
            |.-.\.....
            .....|-...
            ........|.
            ..........
            .........\
            ..../.\\..
            .-.-/..|..
            .|....-|.\
            ..//.|....
        "};
        assert_eq!(execute_day_input(day16, example)?, (46, 51));
        Ok(())
    }

    #[test]
    fn test_day17() -> Result<()> {
        let example = indoc! {"
            2413432311323
            3215453535623
            3255245654254
            3446585845452
            4546657867536
            1438598798454
            4457876987766
            3637877979653
            4654967986887
            4564679986453
            1224686865563
            2546548887735
            4322674655533
        "};
        assert_eq!(execute_day_input(day17, example)?, (102, 94));
        Ok(())
    }

    #[test]
    fn test_day18() -> Result<()> {
        let example = indoc! {"
            R 6 (#70c710)
            D 5 (#0dc571)
            L 2 (#5713f0)
            D 2 (#d2c7a2)
            R 2 (#59c680)
            D 2 (#411b91)
            L 5 (#8ceee2)
            U 2 (#caa173)
            L 1 (#1b58a2)
            U 2 (#caa171)
            R 2 (#7807d2)
            U 3 (#a77fa3)
            L 2 (#015232)
            U 2 (#7a21e3)
        "};
        assert_eq!(execute_day_input(day18, example)?, (62, 952408144115));
        Ok(())
    }

    #[test]
    fn test_day20() -> Result<()> {
        let example = indoc! {"
            broadcaster -> a0, b0
            %a0 -> a1, ca
            %a1 -> a2, ca
            &ca -> a0, a2, ia
            &ia -> gate
            %b0 -> b1, cb
            %b1 -> b2
            %b2 -> cb
            &cb -> b0, b1, ib
            &ib -> gate
            &gate -> rx
        "};
        assert_eq!(execute_day_input(day20, example)?, (196730856, 15));

        let without_rx = indoc! {"
            broadcaster -> a, b, c
            %a -> b
            %b -> c
            %c -> inv
            &inv -> a
        "};
        assert!(execute_day_input(day20, without_rx).is_err());
        Ok(())
    }

    #[test]
    fn test_day21_needs_open_cross() {
        let example = indoc! {"
            ...........
            .....###.#.
            .###.##..#.
            ..#.#...#..
            ....#.#....
            .##..S####.
            .##..#...#.
            .......##..
            .##.#.####.
            .##..##.##.
            ...........
        "};
        let err = execute_day_input(day21, example).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::StepLimit { .. })
        ));
    }

    #[test]
    fn test_day22() -> Result<()> {
        let example = indoc! {"
            1,0,1~1,2,1
            0,0,2~2,0,2
            0,2,3~2,2,3
            0,0,4~0,2,4
            2,0,5~2,2,5
            0,1,6~2,1,6
            1,1,8~1,1,9
        "};
        assert_eq!(execute_day_input(day22, example)?, (5, 7));
        Ok(())
    }

    #[test]
    fn test_day23() -> Result<()> {
        let example = indoc! {"
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
        assert_eq!(execute_day_input(day23, example)?, (94, 154));
        Ok(())
    }

    #[test]
    fn malformed_inputs_are_errors() {
        assert!(day10("..\n.S.\n").is_err());
        assert!(day17("12\n3x\n").is_err());
        assert!(day18("R six (#70c710)\n").is_err());
        assert!(day12("???.### 1,x\n").is_err());
        assert!(day22("1,0,1~1,2\n").is_err());
    }
}
