// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline stage/outcome state machine and its numeric encoding.
//!
//! A project's state is either [`State::None`] (the quiescent state before
//! the first cascade step) or a `(Stage, Outcome)` pair. The pair encodes to
//! a single integer such that, for every stage, `ERROR = RUNNING + 1` and
//! `SUCCESS = RUNNING + 2`. The worker relies on this arithmetic to advance
//! state with `+1`/`+2` rather than a lookup table; preserving it exactly is
//! part of the contract (spec.md §4.1), not an implementation detail.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One stage of the forward pipeline, plus the out-of-band `Delete` stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Create,
    Clean,
    Clone,
    Prepare,
    Pull,
    Build,
    Package,
    Push,
    Delete,
}

impl Stage {
    /// All forward-pipeline stages in cascade order, plus `Delete` last.
    pub const ALL: [Stage; 9] = [
        Stage::Create,
        Stage::Clean,
        Stage::Clone,
        Stage::Prepare,
        Stage::Pull,
        Stage::Build,
        Stage::Package,
        Stage::Push,
        Stage::Delete,
    ];

    fn ordinal(self) -> i32 {
        match self {
            Stage::Create => 0,
            Stage::Clean => 1,
            Stage::Clone => 2,
            Stage::Prepare => 3,
            Stage::Pull => 4,
            Stage::Build => 5,
            Stage::Package => 6,
            Stage::Push => 7,
            Stage::Delete => 8,
        }
    }

    fn from_ordinal(ord: i32) -> Option<Stage> {
        Self::ALL.get(usize::try_from(ord).ok()?).copied()
    }

    /// True if this stage is a valid trigger target (spec.md §3: "Stage ∈
    /// the subset of pipeline states that represent an action to start").
    /// Excludes `Create` (only the reconciler enters it) and `Delete` (never
    /// fired by a trigger).
    pub fn is_trigger_target(self) -> bool {
        !matches!(self, Stage::Create | Stage::Delete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Create => "CREATE",
            Stage::Clean => "CLEAN",
            Stage::Clone => "CLONE",
            Stage::Prepare => "PREPARE",
            Stage::Pull => "PULL",
            Stage::Build => "BUILD",
            Stage::Package => "PACKAGE",
            Stage::Push => "PUSH",
            Stage::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome qualifier of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Running,
    Error,
    Success,
}

impl Outcome {
    /// Offset from the stage's `RUNNING` code. This is the arithmetic the
    /// worker depends on: `+1` on failure, `+2` on success.
    fn offset(self) -> i32 {
        match self {
            Outcome::Running => 0,
            Outcome::Error => 1,
            Outcome::Success => 2,
        }
    }

    fn from_offset(offset: i32) -> Option<Outcome> {
        match offset {
            0 => Some(Outcome::Running),
            1 => Some(Outcome::Error),
            2 => Some(Outcome::Success),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Running => "RUNNING",
            Outcome::Error => "ERROR",
            Outcome::Success => "SUCCESS",
        }
    }
}

/// A project's pipeline state: quiescent, or a stage in progress/concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    /// Before the reconciler or a create handler ever set a stage.
    None,
    Stage(Stage, Outcome),
}

/// Numeric code for [`State::None`]. Stage codes start at 1 so this can
/// never collide with a real `(Stage, Outcome)` pair.
const NONE_CODE: i32 = 0;

impl State {
    pub fn running(stage: Stage) -> Self {
        State::Stage(stage, Outcome::Running)
    }

    pub fn error(stage: Stage) -> Self {
        State::Stage(stage, Outcome::Error)
    }

    pub fn success(stage: Stage) -> Self {
        State::Stage(stage, Outcome::Success)
    }

    /// Encode to the integer form satisfying `ERROR = RUNNING + 1`,
    /// `SUCCESS = RUNNING + 2` for every stage.
    pub fn to_code(self) -> i32 {
        match self {
            State::None => NONE_CODE,
            State::Stage(stage, outcome) => 1 + stage.ordinal() * 3 + outcome.offset(),
        }
    }

    pub fn from_code(code: i32) -> Option<State> {
        if code == NONE_CODE {
            return Some(State::None);
        }
        let zero_based = code - 1;
        let stage = Stage::from_ordinal(zero_based / 3)?;
        let outcome = Outcome::from_offset(zero_based % 3)?;
        Some(State::Stage(stage, outcome))
    }

    /// Advance this state's outcome by the worker's arithmetic rule: `+1` on
    /// failure, `+2` on success. Panics if called on [`State::None`] — only
    /// a running stage can conclude.
    pub fn advance(self, success: bool) -> State {
        match self {
            State::Stage(stage, Outcome::Running) => {
                if success {
                    State::success(stage)
                } else {
                    State::error(stage)
                }
            }
            other => other,
        }
    }

    pub fn stage(self) -> Option<Stage> {
        match self {
            State::None => None,
            State::Stage(stage, _) => Some(stage),
        }
    }

    pub fn outcome(self) -> Option<Outcome> {
        match self {
            State::None => None,
            State::Stage(_, outcome) => Some(outcome),
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, State::Stage(_, Outcome::Error))
    }

    pub fn is_running(self) -> bool {
        matches!(self, State::Stage(_, Outcome::Running))
    }

    /// The persisted string form, e.g. `"CLEAN_SUCCESS"` or `"NONE"`.
    pub fn as_db_string(self) -> String {
        match self {
            State::None => "NONE".to_string(),
            State::Stage(stage, outcome) => format!("{}_{}", stage.as_str(), outcome.as_str()),
        }
    }

    pub fn from_db_string(s: &str) -> Option<State> {
        if s == "NONE" {
            return Some(State::None);
        }
        let (stage_part, outcome_part) = s.rsplit_once('_')?;
        let stage = Stage::ALL.iter().copied().find(|st| st.as_str() == stage_part)?;
        let outcome = match outcome_part {
            "RUNNING" => Outcome::Running,
            "ERROR" => Outcome::Error,
            "SUCCESS" => Outcome::Success,
            _ => return None,
        };
        Some(State::Stage(stage, outcome))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_string())
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
