//! Pulse propagation through a network of flip-flops and conjunctions.

use std::collections::VecDeque;
use std::str::FromStr;

use indexmap::IndexMap;
use num::Integer;

use crate::error::{Error, FormatError, Result};

/// Presses tried while waiting for every input of a gate to fire.
pub const MAX_PRESSES: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pulse {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Button,
    Broadcaster,
    /// `%`
    FlipFlop,
    /// `&`
    Conjunction,
    /// Named as a destination but never declared.
    Output,
}

#[derive(Debug, Clone)]
struct Module {
    kind: ModuleKind,
    /// Destination index paired with this module's slot in the destination's inputs.
    outputs: Vec<(usize, usize)>,
    inputs: Vec<usize>,
}

/// A pulse on its way from one module to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub from: usize,
    pub to: usize,
    pub pulse: Pulse,
}

#[derive(Debug, Clone)]
pub struct Network {
    modules: IndexMap<String, Module>,
    button: usize,
    broadcaster: usize,
    /// Flip-flop state, indexed by module.
    on: Vec<bool>,
    /// Last pulse seen on each input slot, indexed by module.
    memory: Vec<Vec<Pulse>>,
}

fn declaration(line: usize, text: &str) -> Result<(ModuleKind, &str, Vec<&str>)> {
    let malformed = || FormatError::MalformedLine {
        line: line + 1,
        text: text.to_owned(),
    };
    let (label, destinations) = text.split_once(" -> ").ok_or_else(malformed)?;
    let (kind, name) = match label.as_bytes().first() {
        Some(b'%') => (ModuleKind::FlipFlop, &label[1..]),
        Some(b'&') => (ModuleKind::Conjunction, &label[1..]),
        _ if label == "broadcaster" => (ModuleKind::Broadcaster, label),
        _ => return Err(malformed().into()),
    };
    let destinations = destinations.split(", ").collect::<Vec<_>>();
    let valid = |name: &str| !name.is_empty() && name.bytes().all(|b| b.is_ascii_lowercase());
    if !valid(name) || !destinations.iter().all(|&d| valid(d)) {
        return Err(malformed().into());
    }
    Ok((kind, name, destinations))
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let declarations = s
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| declaration(i, line.trim_end()))
            .collect::<Result<Vec<_>>>()?;
        if declarations.is_empty() {
            return Err(FormatError::Empty.into());
        }

        let mut modules = IndexMap::new();
        let blank = |kind| Module {
            kind,
            outputs: Vec::new(),
            inputs: Vec::new(),
        };
        modules.insert("button".to_owned(), blank(ModuleKind::Button));
        for (kind, name, _) in &declarations {
            modules.insert((*name).to_owned(), blank(*kind));
        }
        let broadcaster = modules
            .get_index_of("broadcaster")
            .ok_or_else(|| FormatError::MissingModule("broadcaster".to_owned()))?;

        let mut wiring = vec![(0, broadcaster)];
        for (_, name, destinations) in &declarations {
            let from = modules.get_index_of(*name).unwrap_or_default();
            for &to in destinations {
                let to = match modules.get_index_of(to) {
                    Some(index) => index,
                    None => modules.insert_full(to.to_owned(), blank(ModuleKind::Output)).0,
                };
                wiring.push((from, to));
            }
        }
        for (from, to) in wiring {
            let slot = modules[to].inputs.len();
            modules[to].inputs.push(from);
            modules[from].outputs.push((to, slot));
        }

        let memory = modules
            .values()
            .map(|module| vec![Pulse::Low; module.inputs.len()])
            .collect();
        Ok(Network {
            on: vec![false; modules.len()],
            memory,
            modules,
            button: 0,
            broadcaster,
        })
    }
}

impl Network {
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.modules.get_index_of(name)
    }

    pub fn kind(&self, module: usize) -> ModuleKind {
        self.modules[module].kind
    }

    pub fn inputs(&self, module: usize) -> &[usize] {
        &self.modules[module].inputs
    }

    /// Turns every flip-flop off and makes every conjunction remember low pulses.
    pub fn reset(&mut self) {
        self.on.fill(false);
        for memory in &mut self.memory {
            memory.fill(Pulse::Low);
        }
    }

    /// Pushes the button once and delivers pulses in the order they were sent, the button's own
    /// pulse included. `observe` sees every signal as it is delivered.
    pub fn press(&mut self, mut observe: impl FnMut(&Signal)) {
        let mut queue = VecDeque::from([(
            Signal {
                from: self.button,
                to: self.broadcaster,
                pulse: Pulse::Low,
            },
            0,
        )]);

        while let Some((signal, slot)) = queue.pop_front() {
            observe(&signal);
            let to = signal.to;
            let module = &self.modules[to];
            let pulse = match module.kind {
                ModuleKind::Broadcaster => signal.pulse,
                ModuleKind::FlipFlop => {
                    if signal.pulse == Pulse::High {
                        continue;
                    }
                    self.on[to] = !self.on[to];
                    if self.on[to] {
                        Pulse::High
                    } else {
                        Pulse::Low
                    }
                }
                ModuleKind::Conjunction => {
                    let memory = &mut self.memory[to];
                    memory[slot] = signal.pulse;
                    if memory.iter().all(|&p| p == Pulse::High) {
                        Pulse::Low
                    } else {
                        Pulse::High
                    }
                }
                ModuleKind::Button | ModuleKind::Output => continue,
            };
            for &(next, slot) in &module.outputs {
                queue.push_back((
                    Signal {
                        from: to,
                        to: next,
                        pulse,
                    },
                    slot,
                ));
            }
        }
    }

    /// Low pulse count times high pulse count over `presses` button pushes.
    pub fn pulse_product(&mut self, presses: usize) -> u64 {
        let (mut low, mut high) = (0u64, 0u64);
        for _ in 0..presses {
            self.press(|signal| match signal.pulse {
                Pulse::Low => low += 1,
                Pulse::High => high += 1,
            });
        }
        low * high
    }

    /// Fewest presses, starting from the reset state, before `target` receives a low pulse.
    ///
    /// `target` must be fed by a single conjunction whose inputs each fire high periodically,
    /// with the first high pulse marking the period. The answer is the least common multiple of
    /// those periods.
    pub fn presses_until_low(&mut self, target: &str) -> Result<u64> {
        let target_index = self
            .index_of(target)
            .ok_or_else(|| FormatError::MissingModule(target.to_owned()))?;
        let gate = match self.inputs(target_index) {
            &[gate] if self.kind(gate) == ModuleKind::Conjunction => gate,
            _ => {
                return Err(Error::UnsupportedNetwork(format!(
                    "{target} is not fed by exactly one conjunction"
                )))
            }
        };
        let watched = self.inputs(gate).to_vec();
        let mut first_high = vec![None; watched.len()];

        self.reset();
        for presses in 1..=MAX_PRESSES {
            self.press(|signal| {
                if signal.to == gate && signal.pulse == Pulse::High {
                    if let Some(slot) = watched.iter().position(|&m| m == signal.from) {
                        first_high[slot].get_or_insert(presses);
                    }
                }
            });
            if first_high.iter().all(Option::is_some) {
                break;
            }
        }

        let periods = first_high.into_iter().collect::<Option<Vec<u64>>>().ok_or_else(|| {
            Error::UnsupportedNetwork(format!(
                "an input of the gate before {target} stayed low for {MAX_PRESSES} presses"
            ))
        })?;
        tracing::debug!(?periods, "gate input periods");
        periods.into_iter().try_fold(1u64, |acc, period| {
            (acc / acc.gcd(&period))
                .checked_mul(period)
                .ok_or(Error::Overflow)
        })
    }
}
