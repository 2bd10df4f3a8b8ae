use std::collections::HashMap;

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::SystemSet;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::components::board::{Ring, StackId, Tile, TileState, Token, STACK_COUNT};
use crate::data::cards::DisruptionCard;
use crate::simulation::deck::DisruptionDeck;
use crate::simulation::parameters::ParameterTrack;
use crate::simulation::pool::TokenPool;
use crate::simulation::timeline::{RoundCounter, Timeline, TurnDraws, TurnEventLog, TurnRecord};
use crate::systems::turn::{draw_resolve_system, generate_system, record_system, recycle_system};

/// Canonical phase ordering for one turn.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum TurnSet {
    Generate,
    Resolve,
    Recycle,
    Record,
}

/// Resource: the single RNG stream for a run. Pool draws, empty-pool
/// fallbacks, and deck shuffles all pull from this one stream; a second
/// stream would break reproducibility.
#[derive(Resource, Debug)]
pub struct SimRng(pub SmallRng);

/// Resource: board-order lookup from stack id to entity.
#[derive(Resource, Debug)]
pub struct StackIndex(Vec<Entity>);

impl StackIndex {
    /// Fixed resolution order: inner, then middle ring, then outer.
    pub const IDS: [u8; STACK_COUNT] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

    pub fn entity(&self, id: u8) -> Entity {
        self.0[id as usize - 1]
    }
}

/// Build the ECS world with baseline resources and the 11 stack entities.
pub fn create_world(
    turns: u32,
    seed: u64,
    initial_states: &HashMap<u8, TileState>,
    pool_limits: [u32; Token::ALL.len()],
    cards: Option<Vec<DisruptionCard>>,
) -> World {
    let mut world = World::new();
    let mut rng = SmallRng::seed_from_u64(seed);

    let deck = match cards {
        Some(cards) => DisruptionDeck::new(cards, &mut rng),
        None => DisruptionDeck::disabled(),
    };

    let mut entities = Vec::with_capacity(STACK_COUNT);
    let mut initial_codes = [TileState::Wilds.code(); STACK_COUNT];
    for id in StackIndex::IDS {
        let state = initial_states
            .get(&id)
            .copied()
            .unwrap_or(TileState::Wilds);
        initial_codes[id as usize - 1] = state.code();
        let entity = world
            .spawn((StackId(id), Ring::from_id(id), Tile { state }))
            .id();
        entities.push(entity);
    }

    let pool = TokenPool::with_limits(pool_limits);
    let mut timeline = Timeline::default();
    timeline.push(TurnRecord {
        round: 0,
        states: initial_codes,
        pool_counts: pool.snapshot(),
        pool_total: pool.total(),
    });

    world.insert_resource(pool);
    world.insert_resource(deck);
    world.insert_resource(SimRng(rng));
    world.insert_resource(StackIndex(entities));
    world.insert_resource(RoundCounter {
        current: 0,
        max: turns,
    });
    world.insert_resource(timeline);
    world.insert_resource(TurnDraws::default());
    world.insert_resource(TurnEventLog::default());
    world.insert_resource(ParameterTrack::default());
    world
}

/// Build the per-turn schedule in the canonical phase order.
pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.configure_sets(
        (
            TurnSet::Generate,
            TurnSet::Resolve,
            TurnSet::Recycle,
            TurnSet::Record,
        )
            .chain(),
    );

    schedule.add_systems((
        generate_system.in_set(TurnSet::Generate),
        draw_resolve_system.in_set(TurnSet::Resolve),
        recycle_system.in_set(TurnSet::Recycle),
        record_system.in_set(TurnSet::Record),
    ));

    schedule
}
