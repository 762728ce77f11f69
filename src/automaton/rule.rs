//! Rule tables in `survival/spawn/states/neighborhood` notation.
//!
//! `"4/4/5/M"` reads: a live cell with exactly 4 Moore neighbors survives, a
//! dead cell with exactly 4 Moore neighbors spawns, and cells take 5 distinct
//! states. Count lists accept single counts and inclusive ranges separated by
//! commas, e.g. `"13-14,17-19"`, and may be empty.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::automaton::grid::MAX_STATES;
use crate::automaton::neighborhood::{AlivePredicate, Neighborhood};
use crate::error::ConfigError;

/// One entry per possible Moore neighbor count, 0 through 26.
pub const TABLE_LEN: usize = 27;

/// How a live cell's state changes from one generation to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Only a cell at the top state consults the survival table; once it
    /// starts decaying it loses one state per tick regardless of neighbors.
    #[default]
    DecayOnDeath,
    /// Every live cell decrements, then `survival[c]` is added back.
    DecrementThenBoost,
}

/// Named rules from the same notation family.
const PRESETS: &[(&str, &str)] = &[
    ("445", "4/4/5/M"),
    ("amoeba", "9-26/5-7,12-13,15/5/M"),
    ("architecture", "4-6/3/2/M"),
    ("brain", "4/2/3/M"),
    ("builder", "2,6,9/4,6,8-10/10/M"),
    ("builder_2", "5-7/1/2/M"),
    ("clouds_1", "13-26/13-14,17-19/2/M"),
    ("coral", "5-8/6-7,9,12/8/M"),
    ("crystal_growth_1", "0-6/1,3/2/M"),
    ("crystal_growth_2", "1-2/1,3/5/N"),
    ("diamond_growth", "5-6/7-8/10/M"),
    ("expanding_blob", "9-26/5-7,12-13,15/20/M"),
    (
        "fancy_snancy",
        "0-3,7-9,11,13,18,21-22,24,26/4,13,17,20-24,26/4/M",
    ),
    ("pretty_crystals", "5-8/6-7,9/10/M"),
    ("pulse_waves", "3-8/3-7/3/M"),
    ("pyroclastic", "4-7/6-8/10/M"),
    ("shells", "4-5/3/3/M"),
    ("spiky_growth", "5-6/4/3/M"),
];

/// The complete, immutable description of an automaton's behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleTable {
    survival: [u8; TABLE_LEN],
    spawn: [u8; TABLE_LEN],
    state_count: usize,
    neighborhood: Neighborhood,
    alive: AlivePredicate,
    policy: TransitionPolicy,
}

impl RuleTable {
    /// Build from explicit 0/1 tables of exactly 27 entries.
    pub fn new(
        survival: &[u8],
        spawn: &[u8],
        state_count: usize,
        neighborhood: Neighborhood,
    ) -> Result<Self, ConfigError> {
        Ok(RuleTable {
            survival: check_table("survival", survival)?,
            spawn: check_table("spawn", spawn)?,
            state_count: check_states(state_count)?,
            neighborhood,
            alive: AlivePredicate::default(),
            policy: TransitionPolicy::default(),
        })
    }

    /// Build from lists of neighbor counts that survive and spawn.
    pub fn from_counts(
        survival: &[u8],
        spawn: &[u8],
        state_count: usize,
        neighborhood: Neighborhood,
    ) -> Result<Self, ConfigError> {
        Ok(RuleTable {
            survival: counts_to_table(survival)?,
            spawn: counts_to_table(spawn)?,
            state_count: check_states(state_count)?,
            neighborhood,
            alive: AlivePredicate::default(),
            policy: TransitionPolicy::default(),
        })
    }

    /// The 4/4/5/Moore rule.
    pub fn rule_445() -> Self {
        let mut survival = [0; TABLE_LEN];
        let mut spawn = [0; TABLE_LEN];
        survival[4] = 1;
        spawn[4] = 1;
        RuleTable {
            survival,
            spawn,
            state_count: 5,
            neighborhood: Neighborhood::Moore,
            alive: AlivePredicate::default(),
            policy: TransitionPolicy::default(),
        }
    }

    /// Parse `survival/spawn/states/neighborhood` notation.
    pub fn parse(notation: &str) -> Result<Self, ConfigError> {
        let syntax = |reason: &str| ConfigError::RuleSyntax {
            rule: notation.to_string(),
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = notation.split('/').collect();
        if fields.len() != 4 {
            return Err(syntax("expected four '/'-separated fields"));
        }
        let survival = parse_counts(fields[0]).map_err(|reason| syntax(&reason))?;
        let spawn = parse_counts(fields[1]).map_err(|reason| syntax(&reason))?;
        let state_count: usize = fields[2]
            .trim()
            .parse()
            .map_err(|_| syntax("state count is not a number"))?;
        let neighborhood = Neighborhood::parse(fields[3])?;

        Ok(RuleTable {
            survival,
            spawn,
            state_count: check_states(state_count)?,
            neighborhood,
            alive: AlivePredicate::default(),
            policy: TransitionPolicy::default(),
        })
    }

    /// Look up a named preset.
    pub fn preset(name: &str) -> Option<Self> {
        PRESETS
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name.trim()))
            .and_then(|(_, notation)| RuleTable::parse(notation).ok())
    }

    pub fn preset_names() -> impl Iterator<Item = &'static str> {
        PRESETS.iter().map(|(name, _)| *name)
    }

    /// A preset name, or else rule notation.
    pub fn resolve(name_or_notation: &str) -> Result<Self, ConfigError> {
        match RuleTable::preset(name_or_notation) {
            Some(rule) => Ok(rule),
            None => RuleTable::parse(name_or_notation),
        }
    }

    pub fn with_alive_predicate(mut self, alive: AlivePredicate) -> Self {
        self.alive = alive;
        self
    }

    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// `survival[count]`, 0 or 1.
    #[inline]
    pub fn survives(&self, count: u8) -> u8 {
        self.survival[count as usize]
    }

    /// `spawn[count]`, 0 or 1.
    #[inline]
    pub fn spawns(&self, count: u8) -> u8 {
        self.spawn[count as usize]
    }

    pub fn survival(&self) -> &[u8; TABLE_LEN] {
        &self.survival
    }

    pub fn spawn(&self) -> &[u8; TABLE_LEN] {
        &self.spawn
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// State of a freshly spawned cell, `S-1`.
    #[inline]
    pub fn top_state(&self) -> u8 {
        (self.state_count - 1) as u8
    }

    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    pub fn alive_predicate(&self) -> AlivePredicate {
        self.alive
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        RuleTable::rule_445()
    }
}

impl FromStr for RuleTable {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleTable::resolve(s)
    }
}

/// Writes the rule back in notation, collapsing runs into ranges.
impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            format_counts(&self.survival),
            format_counts(&self.spawn),
            self.state_count,
            self.neighborhood.letter()
        )
    }
}

fn check_table(table: &'static str, values: &[u8]) -> Result<[u8; TABLE_LEN], ConfigError> {
    if values.len() != TABLE_LEN {
        return Err(ConfigError::TableLength {
            table,
            len: values.len(),
        });
    }
    let mut out = [0; TABLE_LEN];
    for (index, &value) in values.iter().enumerate() {
        if value > 1 {
            return Err(ConfigError::TableValue {
                table,
                index,
                value,
            });
        }
        out[index] = value;
    }
    Ok(out)
}

fn check_states(state_count: usize) -> Result<usize, ConfigError> {
    if state_count < 2 {
        Err(ConfigError::TooFewStates(state_count))
    } else if state_count > MAX_STATES {
        Err(ConfigError::TooManyStates(state_count))
    } else {
        Ok(state_count)
    }
}

fn counts_to_table(counts: &[u8]) -> Result<[u8; TABLE_LEN], ConfigError> {
    let mut table = [0; TABLE_LEN];
    for &count in counts {
        if count as usize >= TABLE_LEN {
            return Err(ConfigError::NeighborCount(count as u32));
        }
        table[count as usize] = 1;
    }
    Ok(table)
}

fn parse_counts(field: &str) -> Result<[u8; TABLE_LEN], String> {
    let mut table = [0; TABLE_LEN];
    for item in field.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (lo, hi) = match item.split_once('-') {
            Some((lo, hi)) => (parse_count(lo)?, parse_count(hi)?),
            None => {
                let count = parse_count(item)?;
                (count, count)
            }
        };
        if lo > hi {
            return Err(format!("range {item} is reversed"));
        }
        for count in lo..=hi {
            table[count] = 1;
        }
    }
    Ok(table)
}

fn parse_count(s: &str) -> Result<usize, String> {
    let count: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("{:?} is not a neighbor count", s.trim()))?;
    if count >= TABLE_LEN {
        return Err(format!("neighbor count {count} is above the maximum of 26"));
    }
    Ok(count)
}

fn format_counts(table: &[u8; TABLE_LEN]) -> String {
    let mut parts = Vec::new();
    let mut count = 0;
    while count < TABLE_LEN {
        if table[count] == 0 {
            count += 1;
            continue;
        }
        let start = count;
        while count + 1 < TABLE_LEN && table[count + 1] == 1 {
            count += 1;
        }
        if start == count {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{start}-{count}"));
        }
        count += 1;
    }
    parts.join(",")
}
