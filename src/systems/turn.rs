use bevy_ecs::prelude::*;
use rand::Rng;

use crate::components::board::{Ring, Tile, TileState, Token};
use crate::core::ecs::{SimRng, StackIndex};
use crate::data::cards::DisruptionCard;
use crate::rules::resolution::base_outcome;
use crate::simulation::deck::DisruptionDeck;
use crate::simulation::pool::TokenPool;
use crate::simulation::timeline::{RoundCounter, Timeline, TurnDraws, TurnEventLog, TurnRecord};

/// System: each stack emits a token for its current state into the pool,
/// in board order. Full kinds drop the token silently.
pub fn generate_system(
    index: Res<StackIndex>,
    mut pool: ResMut<TokenPool>,
    mut log: ResMut<TurnEventLog>,
    tiles: Query<&Tile>,
) {
    log.0.clear();
    for id in StackIndex::IDS {
        if let Ok(tile) = tiles.get(index.entity(id)) {
            pool.add(Token::from_state(tile.state));
        }
    }
}

/// System: draw one token per stack in board order and resolve it on the
/// spot. An empty pool falls back to a uniformly random kind from the
/// same RNG stream. DevB draws consult the disruption deck when the
/// extension is enabled.
pub fn draw_resolve_system(
    index: Res<StackIndex>,
    mut pool: ResMut<TokenPool>,
    mut rng: ResMut<SimRng>,
    mut deck: ResMut<DisruptionDeck>,
    mut draws: ResMut<TurnDraws>,
    mut log: ResMut<TurnEventLog>,
    mut tiles: Query<&mut Tile>,
) {
    draws.0.clear();
    for id in StackIndex::IDS {
        let token = match pool.draw_one(&mut rng.0) {
            Some(token) => token,
            None => {
                let token = Token::ALL[rng.0.random_range(0..Token::ALL.len())];
                log.0.push(format!(
                    "pool empty, stack {} resolved a random {} token",
                    id,
                    token.name()
                ));
                token
            }
        };
        draws.0.push((id, token));

        if let Some(next) = base_outcome(token) {
            if let Ok(mut tile) = tiles.get_mut(index.entity(id)) {
                tile.state = next;
            }
        } else if token == Token::DevB && deck.is_enabled() {
            match deck.draw(&mut rng.0) {
                Some(card) => {
                    log.0
                        .push(format!("stack {} drew disruption card: {}", id, card.name));
                    apply_card(&card, &index, &mut tiles, &mut log);
                }
                None => {
                    log.0.push(format!(
                        "stack {} drew DevB but the disruption deck is empty",
                        id
                    ));
                }
            }
        }
    }
}

/// Apply a drawn card's tile-change effects to its target stacks, in
/// effect-list order (later effects on the same stack win). Out-of-range
/// target ids and non-tile effects are recorded, not applied.
fn apply_card(
    card: &DisruptionCard,
    index: &StackIndex,
    tiles: &mut Query<&mut Tile>,
    log: &mut TurnEventLog,
) {
    if !card.has_tile_change() {
        log.0.push(format!(
            "card {} has no tile change effects, board untouched",
            card.name
        ));
        for (effect, magnitude) in &card.effects {
            log.0.push(format!(
                "card {} effect {:?}:{} recorded (not applied)",
                card.name, effect, magnitude
            ));
        }
        return;
    }
    for (effect, magnitude) in &card.effects {
        if effect.tile_change().is_none() {
            log.0.push(format!(
                "card {} effect {:?}:{} recorded (not applied)",
                card.name, effect, magnitude
            ));
        }
    }
    for &target in &card.targets {
        if !(1..=StackIndex::IDS.len() as i32).contains(&target) {
            log.0.push(format!(
                "card {} targets stack {} which is off the board, skipped",
                card.name, target
            ));
            continue;
        }
        for (effect, _) in &card.effects {
            if let Some(state) = effect.tile_change() {
                if let Ok(mut tile) = tiles.get_mut(index.entity(target as u8)) {
                    tile.state = state;
                    log.0.push(format!(
                        "card {} turned stack {} to {}",
                        card.name,
                        target,
                        state.name()
                    ));
                }
            }
        }
    }
}

/// System: middle-ring draws return to the pool; inner and outer draws
/// stay out of circulation for the turn.
pub fn recycle_system(draws: Res<TurnDraws>, mut pool: ResMut<TokenPool>) {
    for &(id, token) in &draws.0 {
        if Ring::from_id(id).recycles_token() {
            pool.put_back(token);
        }
    }
}

/// System: advance the round counter and append the turn's record to the
/// timeline.
pub fn record_system(
    index: Res<StackIndex>,
    pool: Res<TokenPool>,
    mut round: ResMut<RoundCounter>,
    mut timeline: ResMut<Timeline>,
    tiles: Query<&Tile>,
) {
    round.current += 1;
    timeline.push(capture_record(round.current, &index, &pool, &tiles));
}

/// Encode the current board and pool into a timeline record.
pub fn capture_record(
    round: u32,
    index: &StackIndex,
    pool: &TokenPool,
    tiles: &Query<&Tile>,
) -> TurnRecord {
    let mut states = [TileState::Wilds.code(); StackIndex::IDS.len()];
    for id in StackIndex::IDS {
        if let Ok(tile) = tiles.get(index.entity(id)) {
            states[id as usize - 1] = tile.state.code();
        }
    }
    TurnRecord {
        round,
        states,
        pool_counts: pool.snapshot(),
        pool_total: pool.total(),
    }
}
