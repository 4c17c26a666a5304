//! Damaged spring records: counting the arrangements that fit the group sizes.

use std::str::FromStr;

use rustc_hash::FxHashMap;

use crate::error::{Error, FormatError, Result};
use crate::parse_decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spring {
    Operational,
    Damaged,
    Unknown,
}

impl Spring {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'.' => Some(Spring::Operational),
            b'#' => Some(Spring::Damaged),
            b'?' => Some(Spring::Unknown),
            _ => None,
        }
    }
}

/// One row of springs and the sizes of its contiguous damaged groups, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub springs: Vec<Spring>,
    pub groups: Vec<usize>,
}

impl FromStr for Record {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, FormatError> {
        let malformed = || FormatError::MalformedLine {
            line: 1,
            text: s.to_owned(),
        };
        let (springs, groups) = s.trim_end().split_once(' ').ok_or_else(malformed)?;
        let springs = springs
            .bytes()
            .map(Spring::from_byte)
            .collect::<Option<Vec<_>>>()
            .filter(|springs| !springs.is_empty())
            .ok_or_else(malformed)?;
        let groups = groups
            .split(',')
            .map(|group| {
                let valid =
                    (1..=3).contains(&group.len()) && group.bytes().all(|b| b.is_ascii_digit());
                valid.then(|| parse_decimal(group.as_bytes()))
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(malformed)?;
        Ok(Record { springs, groups })
    }
}

pub fn parse_records(input: &str) -> Result<Vec<Record>> {
    let records = input
        .lines()
        .enumerate()
        .map(|(i, line)| {
            line.parse::<Record>().map_err(|_| FormatError::MalformedLine {
                line: i + 1,
                text: line.to_owned(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if records.is_empty() {
        return Err(FormatError::Empty.into());
    }
    Ok(records)
}

impl Record {
    /// `copies` copies of the row joined by unknown springs, and the groups repeated as often.
    pub fn unfold(&self, copies: usize) -> Record {
        let mut springs = Vec::with_capacity((self.springs.len() + 1) * copies);
        for copy in 0..copies {
            if copy > 0 {
                springs.push(Spring::Unknown);
            }
            springs.extend_from_slice(&self.springs);
        }
        Record {
            springs,
            groups: self.groups.repeat(copies),
        }
    }

    /// Ways to replace every unknown spring so the damaged groups match `groups` exactly.
    pub fn arrangements(&self) -> Result<u64> {
        let mut memo = FxHashMap::default();
        Arrangements {
            springs: &self.springs,
            groups: &self.groups,
            memo: &mut memo,
        }
        .count(0, 0)
    }
}

struct Arrangements<'a> {
    springs: &'a [Spring],
    groups: &'a [usize],
    /// Keyed by (spring index, group index).
    memo: &'a mut FxHashMap<(usize, usize), u64>,
}

impl Arrangements<'_> {
    fn count(&mut self, at: usize, group: usize) -> Result<u64> {
        if at >= self.springs.len() {
            return Ok(u64::from(group == self.groups.len()));
        }
        if let Some(&known) = self.memo.get(&(at, group)) {
            return Ok(known);
        }

        let mut total = 0u64;
        if self.springs[at] != Spring::Damaged {
            total = self.count(at + 1, group)?;
        }
        if self.springs[at] != Spring::Operational && self.fits(at, group) {
            let placed = self.count(at + self.groups[group] + 1, group + 1)?;
            total = total.checked_add(placed).ok_or(Error::Overflow)?;
        }
        self.memo.insert((at, group), total);
        Ok(total)
    }

    /// Whether the next damaged group can start at `at` and be followed by a gap or the end.
    fn fits(&self, at: usize, group: usize) -> bool {
        let Some(&size) = self.groups.get(group) else {
            return false;
        };
        let end = at + size;
        end <= self.springs.len()
            && self.springs[at..end].iter().all(|&s| s != Spring::Operational)
            && self.springs.get(end) != Some(&Spring::Damaged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use proptest::prelude::*;

    const EXAMPLE: &str = indoc! {"
        ???.### 1,1,3
        .??..??...?##. 1,1,3
        ?#?#?#?#?#?#?#? 1,3,1,6
        ????.#...#... 4,1,1
        ????.######..#####. 1,6,5
        ?###???????? 3,2,1
    "};

    /// Tries every assignment of the unknown springs.
    fn brute_force(record: &Record) -> u64 {
        let unknown = record
            .springs
            .iter()
            .enumerate()
            .filter(|(_, &s)| s == Spring::Unknown)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        (0..1u32 << unknown.len())
            .filter(|mask| {
                let mut springs = record.springs.clone();
                for (bit, &i) in unknown.iter().enumerate() {
                    springs[i] = if mask >> bit & 1 == 1 {
                        Spring::Damaged
                    } else {
                        Spring::Operational
                    };
                }
                let groups = springs
                    .split(|&s| s == Spring::Operational)
                    .filter(|run| !run.is_empty())
                    .map(|run| run.len())
                    .collect::<Vec<_>>();
                groups == record.groups
            })
            .count() as u64
    }

    #[test]
    fn example_rows() -> Result<()> {
        let counts = parse_records(EXAMPLE)?
            .iter()
            .map(Record::arrangements)
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(counts, [1, 4, 1, 1, 4, 10]);
        Ok(())
    }

    #[test]
    fn unfolded_rows() -> Result<()> {
        let counts = parse_records(EXAMPLE)?
            .iter()
            .map(|record| record.unfold(5).arrangements())
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(counts, [1, 16384, 1, 16, 2500, 506250]);
        Ok(())
    }

    #[test]
    fn unfold_joins_with_unknown() -> Result<()> {
        let record: Record = ".# 1".parse()?;
        assert_eq!(record.unfold(2), ".#?.# 1,1".parse::<Record>()?);
        Ok(())
    }

    #[test]
    fn malformed_rows() {
        assert_eq!(
            parse_records("???.### 1,1,3\n??x 1\n"),
            Err(FormatError::MalformedLine {
                line: 2,
                text: "??x 1".to_owned()
            }
            .into())
        );
        assert!("??? ".parse::<Record>().is_err());
        assert!("??? 1,,2".parse::<Record>().is_err());
    }

    proptest! {
        #[test]
        fn agrees_with_brute_force(
            springs in proptest::collection::vec(
                prop_oneof![Just(Spring::Operational), Just(Spring::Damaged), Just(Spring::Unknown)],
                1..12,
            ),
            groups in proptest::collection::vec(1usize..4, 0..4),
        ) {
            let record = Record { springs, groups };
            prop_assert_eq!(record.arrangements().unwrap(), brute_force(&record));
        }
    }
}
