//! Dig plans: decoding both readings of a plan and measuring the dug lagoon.

use nalgebra::{Point2, Vector2};
use regex::Regex;

use crate::error::{Error, FormatError, Result};
use crate::grid::Direction;
use crate::parse_decimal;
use crate::polygon::{self, Vertex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigStep {
    pub direction: Direction,
    pub meters: i64,
}

/// Each plan line, read as written and read through its colour code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigPlan {
    pub literal: Vec<DigStep>,
    pub decoded: Vec<DigStep>,
}

impl DigPlan {
    pub fn parse(input: &str) -> Result<Self> {
        let line_re = Regex::new(r"^([UDLR]) ([0-9]{1,12}) \(#([0-9a-f]{5})([0-3])\)$")
            .expect("dig plan pattern is valid");

        let mut literal = Vec::new();
        let mut decoded = Vec::new();
        for (i, line) in input.lines().enumerate() {
            let malformed = || FormatError::MalformedLine {
                line: i + 1,
                text: line.to_owned(),
            };
            let caps = line_re.captures(line.trim_end()).ok_or_else(malformed)?;

            let direction = match &caps[1] {
                "U" => Direction::Up,
                "D" => Direction::Down,
                "L" => Direction::Left,
                _ => Direction::Right,
            };
            let meters = i64::try_from(parse_decimal(caps[2].as_bytes()))
                .map_err(|_| malformed())?;
            literal.push(DigStep { direction, meters });

            let meters = i64::from_str_radix(&caps[3], 16).map_err(|_| malformed())?;
            let direction = match &caps[4] {
                "0" => Direction::Right,
                "1" => Direction::Down,
                "2" => Direction::Left,
                _ => Direction::Up,
            };
            decoded.push(DigStep { direction, meters });
        }

        if literal.is_empty() {
            return Err(FormatError::Empty.into());
        }
        Ok(DigPlan { literal, decoded })
    }
}

fn unit(direction: Direction) -> Vector2<i64> {
    let (dr, dc) = direction.delta();
    Vector2::new(dc as i64, dr as i64)
}

/// Corners of the trench and its length, starting and ending at the origin.
pub fn trench(steps: &[DigStep]) -> Result<(Vec<Vertex>, i64)> {
    let mut vertices = Vec::with_capacity(steps.len() + 1);
    let mut at = Point2::new(0i64, 0);
    let mut length = 0i64;
    vertices.push(at);
    for step in steps {
        let offset = unit(step.direction) * step.meters;
        at = Point2::new(
            at.x.checked_add(offset.x).ok_or(Error::Overflow)?,
            at.y.checked_add(offset.y).ok_or(Error::Overflow)?,
        );
        length = length.checked_add(step.meters).ok_or(Error::Overflow)?;
        vertices.push(at);
    }
    Ok((vertices, length))
}

/// Trench plus interior, in cubic meters.
pub fn lagoon_volume(steps: &[DigStep]) -> Result<i64> {
    let (vertices, length) = trench(steps)?;
    polygon::measure(&vertices, Some(length))?.enclosed()
}
