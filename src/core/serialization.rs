use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::components::board::{TileState, Token, STACK_COUNT};
use crate::simulation::timeline::TurnRecord;

/// The exportable artifact of one run: final board and pool, plus the
/// per-turn timeline. This is the whole surface external reporting and
/// visualization layers consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub version: u32,
    /// State name to timeline code.
    pub legend: BTreeMap<String, u8>,
    pub maximum_tokens: BTreeMap<String, u32>,
    pub board: Board,
    pub game_state: GameState,
    /// Final per-kind pool counts.
    pub tokens: BTreeMap<String, u32>,
    pub timeline: Vec<TimelineRound>,
    pub round_outputs: Vec<RoundOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub hexes: Vec<Hex>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hex {
    pub id: u8,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub current_round: u32,
    pub max_rounds: u32,
    pub bag_total: u32,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineRound {
    pub round: u32,
    pub states: Vec<u8>,
}

/// Board and pool as they stood at the end of a round (round 0 is the
/// pre-run state).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundOutput {
    pub round: u32,
    pub board: Board,
    pub game_state: GameState,
    pub tokens: BTreeMap<String, u32>,
}

fn board_from_codes(states: &[u8]) -> Board {
    let hexes = states
        .iter()
        .enumerate()
        .map(|(i, &code)| {
            let state = TileState::from_code(code).unwrap_or(TileState::Wilds);
            Hex {
                id: i as u8 + 1,
                kind: state.name().to_string(),
                color: state.color().to_string(),
            }
        })
        .collect();
    Board { hexes }
}

fn token_counts(counts: [u32; Token::ALL.len()]) -> BTreeMap<String, u32> {
    Token::ALL
        .iter()
        .map(|token| (token.name().to_string(), counts[token.index()]))
        .collect()
}

/// Assemble the report from the final state and the recorded timeline.
pub fn build_report(
    seed: u64,
    current_round: u32,
    max_rounds: u32,
    pool_limits: [u32; Token::ALL.len()],
    pool_counts: [u32; Token::ALL.len()],
    states: [TileState; STACK_COUNT],
    records: &[TurnRecord],
) -> RunReport {
    let legend = [
        (TileState::Wilds, 1u8),
        (TileState::Wastes, 2),
        (TileState::DevA, 3),
        (TileState::DevB, 4),
    ]
    .into_iter()
    .map(|(state, code)| (state.name().to_string(), code))
    .collect();

    let final_codes: Vec<u8> = states.iter().map(|state| state.code()).collect();
    let timeline = records
        .iter()
        .map(|record| TimelineRound {
            round: record.round,
            states: record.states.to_vec(),
        })
        .collect();
    let round_outputs = records
        .iter()
        .map(|record| RoundOutput {
            round: record.round,
            board: board_from_codes(&record.states),
            game_state: GameState {
                current_round: record.round,
                max_rounds,
                bag_total: record.pool_total,
                seed,
            },
            tokens: token_counts(record.pool_counts),
        })
        .collect();

    RunReport {
        version: 1,
        legend,
        maximum_tokens: token_counts(pool_limits),
        board: board_from_codes(&final_codes),
        game_state: GameState {
            current_round,
            max_rounds,
            bag_total: pool_counts.iter().sum(),
            seed,
        },
        tokens: token_counts(pool_counts),
        timeline,
        round_outputs,
    }
}

/// Write a report as pretty JSON.
pub fn save_report_to_path<P: AsRef<Path>>(report: &RunReport, path: P) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    fs::write(path, json)
}

/// Read a report back from disk.
pub fn load_report_from_path<P: AsRef<Path>>(path: P) -> io::Result<RunReport> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
