use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::board::{Token, STACK_COUNT};

/// One per-turn record: the board encoded as small integers plus the
/// pool counts after recycling. Record 0 is captured before turn 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub round: u32,
    pub states: [u8; STACK_COUNT],
    pub pool_counts: [u32; Token::ALL.len()],
    pub pool_total: u32,
}

/// Resource: the ordered list of per-turn records for a run.
#[derive(Resource, Debug, Clone, Default)]
pub struct Timeline {
    pub records: Vec<TurnRecord>,
}

impl Timeline {
    pub fn push(&mut self, record: TurnRecord) {
        self.records.push(record);
    }
}

/// Resource: the current and maximum round numbers.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct RoundCounter {
    pub current: u32,
    pub max: u32,
}

/// Resource: the 11 tokens drawn this turn, in resolution order. Written
/// by the resolve phase, consumed by the recycle phase.
#[derive(Resource, Debug, Clone, Default)]
pub struct TurnDraws(pub Vec<(u8, Token)>);

/// Resource: human-readable notes about the current turn (card draws,
/// empty-pool fallbacks). Cleared when a new turn starts generating.
#[derive(Resource, Debug, Clone, Default)]
pub struct TurnEventLog(pub Vec<String>);
