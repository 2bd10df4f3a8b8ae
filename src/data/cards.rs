use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::components::board::TileState;

/// Card classification from the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Disrupt,
    Boost,
}

/// Typed card effect. Only the `Turn*` variants change the board; the
/// rest are parsed and recorded but not applied by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    // Tile effects
    TurnWaste,
    TurnWild,
    TurnDevA,
    TurnDevB,
    // Resource effects
    Cohesion,
    HumanRelation,
    Cybernation,
    Technology,
    Environment,
    Resources,
    Token,
    Trade,
    // Rule effects
    CapEnv,
    IgnoreCohesionEffect,
    // Metadata effects
    SwapGoal,
    DrawGoal,
    MovePeople,
}

impl CardEffect {
    /// The board state a tile-change effect writes, if this is one.
    pub fn tile_change(self) -> Option<TileState> {
        match self {
            CardEffect::TurnWaste => Some(TileState::Wastes),
            CardEffect::TurnWild => Some(TileState::Wilds),
            CardEffect::TurnDevA => Some(TileState::DevA),
            CardEffect::TurnDevB => Some(TileState::DevB),
            _ => None,
        }
    }

    /// Parse an effect name from card data. Unknown names fall back to
    /// `Cohesion` rather than rejecting the card; the load is lossy on
    /// purpose so a newer data file still plays.
    pub fn parse(name: &str) -> CardEffect {
        match name {
            "TurnWaste" => CardEffect::TurnWaste,
            "TurnWild" => CardEffect::TurnWild,
            "TurnDevA" => CardEffect::TurnDevA,
            "TurnDevB" => CardEffect::TurnDevB,
            "Co" => CardEffect::Cohesion,
            "HR" => CardEffect::HumanRelation,
            "Cy" => CardEffect::Cybernation,
            "Tech" => CardEffect::Technology,
            "Env" => CardEffect::Environment,
            "Resources" => CardEffect::Resources,
            "Token" => CardEffect::Token,
            "Trade" => CardEffect::Trade,
            "CapEnv" => CardEffect::CapEnv,
            "IgnoreCohesionEffect" => CardEffect::IgnoreCohesionEffect,
            "SwapGoal" => CardEffect::SwapGoal,
            "DrawGoal" => CardEffect::DrawGoal,
            "MovPpl" => CardEffect::MovePeople,
            _ => CardEffect::Cohesion,
        }
    }
}

impl CardKind {
    /// Unknown kind tags fall back to `Disrupt`.
    pub fn parse(tag: &str) -> CardKind {
        match tag {
            "disrupt" => CardKind::Disrupt,
            "boost" => CardKind::Boost,
            _ => CardKind::Disrupt,
        }
    }
}

/// A loaded disruption card. Immutable once loaded; `targets` keeps raw
/// ids from the data file, out-of-range ids are ignored at apply time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisruptionCard {
    pub name: String,
    pub description: String,
    pub kind: CardKind,
    pub targets: Vec<i32>,
    pub effects: Vec<(CardEffect, i32)>,
    pub cancel_cost: Vec<(CardEffect, i32)>,
    pub has_condition: bool,
    pub can_cancel: bool,
}

impl DisruptionCard {
    /// Whether any effect on this card rewrites board tiles.
    pub fn has_tile_change(&self) -> bool {
        self.effects
            .iter()
            .any(|(effect, _)| effect.tile_change().is_some())
    }
}

/// On-disk card record, matching the `disruption.json` file schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCard {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(rename = "stackTarget", default)]
    pub stack_target: Vec<i32>,
    #[serde(default)]
    pub effect: Vec<String>,
    #[serde(default)]
    pub cost: Vec<String>,
    #[serde(default)]
    pub cond: String,
    #[serde(default = "default_cancel")]
    pub cancel: bool,
}

fn default_cancel() -> bool {
    true
}

#[derive(Debug)]
pub enum CardDataError {
    Io { path: String, source: std::io::Error },
    Json { path: String, source: serde_json::Error },
    Validation(String),
}

impl std::fmt::Display for CardDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardDataError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path, source)
            }
            CardDataError::Json { path, source } => {
                write!(f, "failed to parse {}: {}", path, source)
            }
            CardDataError::Validation(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CardDataError {}

/// Parse an `"EffectName"` or `"EffectName:±N"` entry into a typed pair.
fn parse_effect_entry(entry: &str) -> (CardEffect, i32) {
    match entry.split_once(':') {
        Some((name, magnitude)) => {
            let value = magnitude.parse::<i32>().unwrap_or(0);
            (CardEffect::parse(name), value)
        }
        None => (CardEffect::parse(entry), 0),
    }
}

impl DisruptionCard {
    pub fn from_raw(raw: RawCard) -> DisruptionCard {
        DisruptionCard {
            name: raw.name,
            description: raw.description,
            kind: CardKind::parse(raw.kind.as_deref().unwrap_or("disrupt")),
            targets: raw.stack_target,
            effects: raw.effect.iter().map(|e| parse_effect_entry(e)).collect(),
            cancel_cost: raw.cost.iter().map(|e| parse_effect_entry(e)).collect(),
            has_condition: !raw.cond.is_empty(),
            can_cancel: raw.cancel,
        }
    }
}

/// Load and validate the disruption card set from a JSON file.
pub fn load_card_catalog(path: impl AsRef<Path>) -> Result<Vec<DisruptionCard>, CardDataError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CardDataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let raw_cards: Vec<RawCard> =
        serde_json::from_str(&raw).map_err(|source| CardDataError::Json {
            path: path.display().to_string(),
            source,
        })?;
    if raw_cards.is_empty() {
        return Err(CardDataError::Validation(format!(
            "card file {} contains no cards",
            path.display()
        )));
    }
    let cards: Vec<DisruptionCard> = raw_cards
        .into_iter()
        .map(DisruptionCard::from_raw)
        .collect();
    for card in &cards {
        if card.name.trim().is_empty() {
            return Err(CardDataError::Validation(
                "card name cannot be empty".to_string(),
            ));
        }
    }
    Ok(cards)
}
