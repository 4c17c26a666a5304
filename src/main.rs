use std::{
    fmt::Display,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::fmt::SubscriberBuilder;

use aoc2023_grids::{load_input, Solution, ALL_SOLUTIONS};

#[derive(Parser)]
#[command(name = "aoc2023-grids")]
#[command(about = "Run the grid puzzle solvers and time them")]
struct Args {
    /// Days to run; all solved days when empty
    days: Vec<usize>,

    /// Directory holding `<day>.txt` puzzle inputs
    #[arg(long, default_value = "inputs")]
    inputs: PathBuf,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let args = Args::parse();

    let mut selected = Vec::new();
    for &day in &args.days {
        match ALL_SOLUTIONS.iter().find(|(n, _)| *n == day) {
            Some(&entry) => selected.push(entry),
            None => bail!("day {day} has no solver"),
        }
    }
    if selected.is_empty() {
        selected.extend(ALL_SOLUTIONS);
    }

    let mut total = Duration::default();
    for (day, solution) in selected {
        total += execute_day(day, solution, &args.inputs)?;
    }
    println!("Total processing time: {}", format_duration(total));
    Ok(())
}

fn format_duration(dur: Duration) -> String {
    if dur.as_millis() != 0 {
        format!("{} ms", dur.as_millis())
    } else {
        format!("{} us", dur.as_micros())
    }
}

fn execute_day(n: usize, f: Solution, inputs: &Path) -> Result<Duration> {
    println!("Day {}:", n);
    let input = load_input(inputs, n)?;

    let start = Instant::now();
    let (part1, part2) = f(&input)?;
    let elapsed = start.elapsed();
    tracing::info!(day = n, elapsed_us = elapsed.as_micros() as u64, "solved");

    print_part(1, part1);
    print_part(2, part2);
    println!("  Finished in {}", format_duration(elapsed));
    println!("---------------------");
    Ok(elapsed)
}

fn print_part(part: usize, answer: impl Display) {
    println!("  Part {}: {}", part, answer);
}
