use std::collections::HashMap;
use std::path::PathBuf;

use bevy_ecs::prelude::*;

use crate::components::board::{Tile, TileState, Token, STACK_COUNT};
use crate::core::ecs::{create_schedule, create_world, StackIndex};
use crate::core::serialization::{build_report, RunReport};
use crate::data::cards::{load_card_catalog, DisruptionCard};
use crate::simulation::deck::DisruptionDeck;
use crate::simulation::parameters::ParameterTrack;
use crate::simulation::pool::{TokenPool, DEFAULT_POOL_LIMIT};
use crate::simulation::timeline::{RoundCounter, Timeline, TurnEventLog, TurnRecord};

/// Where the disruption card set comes from, if anywhere.
#[derive(Debug, Clone, Default)]
pub enum CardSource {
    /// Base rules only; DevB tokens stay inert.
    #[default]
    None,
    /// Load the card set from a JSON file. A failed load degrades the
    /// run to base rules instead of aborting it.
    Path(PathBuf),
    /// Use an already-loaded card set.
    Loaded(Vec<DisruptionCard>),
}

/// Construction-time inputs for one run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub turns: u32,
    pub seed: u64,
    /// Initial state per stack id; unspecified stacks start as Wilds.
    pub initial_states: HashMap<u8, TileState>,
    /// Per-kind pool capacity, in `Token::ALL` order.
    pub pool_limits: [u32; Token::ALL.len()],
    pub cards: CardSource,
}

impl SimulationConfig {
    pub fn new(turns: u32, seed: u64) -> Self {
        Self {
            turns,
            seed,
            initial_states: HashMap::new(),
            pool_limits: [DEFAULT_POOL_LIMIT; Token::ALL.len()],
            cards: CardSource::None,
        }
    }

    pub fn with_initial_state(mut self, id: u8, state: TileState) -> Self {
        self.initial_states.insert(id, state);
        self
    }

    pub fn with_pool_limit(mut self, token: Token, limit: u32) -> Self {
        self.pool_limits[token.index()] = limit;
        self
    }

    pub fn with_cards(mut self, cards: CardSource) -> Self {
        self.cards = cards;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.turns < 1 || self.turns > 100 {
            return Err(ConfigError::TurnsOutOfRange(self.turns));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    TurnsOutOfRange(u32),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::TurnsOutOfRange(turns) => {
                write!(f, "turns must be within 1..=100, got {}", turns)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Wrapper around the ECS world and the per-turn schedule.
pub struct Simulation {
    world: World,
    schedule: Schedule,
    seed: u64,
    disruption_active: bool,
}

impl Simulation {
    /// Validate the configuration and build the world. The only fatal
    /// error is an out-of-range turn count; a bad card source degrades
    /// the run to base rules.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let (cards, disruption_active) = match config.cards {
            CardSource::None => (None, false),
            CardSource::Loaded(cards) if cards.is_empty() => {
                eprintln!("Empty disruption card set, falling back to base rules");
                (None, false)
            }
            CardSource::Loaded(cards) => (Some(cards), true),
            CardSource::Path(path) => match load_card_catalog(&path) {
                Ok(cards) => (Some(cards), true),
                Err(err) => {
                    eprintln!(
                        "Failed to load disruption cards, falling back to base rules: {}",
                        err
                    );
                    (None, false)
                }
            },
        };

        let world = create_world(
            config.turns,
            config.seed,
            &config.initial_states,
            config.pool_limits,
            cards,
        );
        let schedule = create_schedule();

        Ok(Self {
            world,
            schedule,
            seed: config.seed,
            disruption_active,
        })
    }

    /// Run one full turn (generate, draw/resolve, recycle, record) and
    /// return the turn's event notes.
    pub fn advance_turn(&mut self) -> Vec<String> {
        self.schedule.run(&mut self.world);
        self.world.resource::<TurnEventLog>().0.clone()
    }

    /// Drive all remaining turns and build the final report.
    pub fn run(&mut self) -> RunReport {
        while self.round() < self.max_rounds() {
            self.advance_turn();
        }
        self.report()
    }

    pub fn round(&self) -> u32 {
        self.world.resource::<RoundCounter>().current
    }

    pub fn max_rounds(&self) -> u32 {
        self.world.resource::<RoundCounter>().max
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether the extension layer survived construction.
    pub fn disruption_active(&self) -> bool {
        self.disruption_active && self.world.resource::<DisruptionDeck>().is_enabled()
    }

    /// Current board, in stack id order.
    pub fn stack_states(&self) -> [TileState; STACK_COUNT] {
        let index = self.world.resource::<StackIndex>();
        let mut states = [TileState::Wilds; STACK_COUNT];
        for id in StackIndex::IDS {
            if let Some(tile) = self.world.get::<Tile>(index.entity(id)) {
                states[id as usize - 1] = tile.state;
            }
        }
        states
    }

    pub fn pool_snapshot(&self) -> [u32; Token::ALL.len()] {
        self.world.resource::<TokenPool>().snapshot()
    }

    pub fn pool_limits(&self) -> [u32; Token::ALL.len()] {
        self.world.resource::<TokenPool>().limits()
    }

    pub fn parameters(&self) -> ParameterTrack {
        *self.world.resource::<ParameterTrack>()
    }

    /// The full per-turn timeline, record 0 included.
    pub fn timeline(&self) -> Vec<TurnRecord> {
        self.world.resource::<Timeline>().records.clone()
    }

    /// Build the exportable run report from the current state.
    pub fn report(&self) -> RunReport {
        build_report(
            self.seed,
            self.round(),
            self.max_rounds(),
            self.pool_limits(),
            self.pool_snapshot(),
            self.stack_states(),
            &self.world.resource::<Timeline>().records,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cards::{CardEffect, CardKind};

    fn all_wastes(turns: u32, seed: u64) -> SimulationConfig {
        let mut config = SimulationConfig::new(turns, seed);
        for id in 1..=11 {
            config = config.with_initial_state(id, TileState::Wastes);
        }
        config
    }

    fn mixed(turns: u32, seed: u64) -> SimulationConfig {
        SimulationConfig::new(turns, seed)
            .with_initial_state(2, TileState::Wastes)
            .with_initial_state(3, TileState::DevA)
            .with_initial_state(5, TileState::DevB)
            .with_initial_state(9, TileState::DevA)
            .with_initial_state(11, TileState::DevB)
    }

    fn tile_card(name: &str, effect: CardEffect, targets: Vec<i32>) -> DisruptionCard {
        DisruptionCard {
            name: name.to_string(),
            description: String::new(),
            kind: CardKind::Disrupt,
            targets,
            effects: vec![(effect, 0)],
            cancel_cost: Vec::new(),
            has_condition: false,
            can_cancel: true,
        }
    }

    #[test]
    fn rejects_out_of_range_turn_counts() {
        assert!(Simulation::new(SimulationConfig::new(0, 1)).is_err());
        assert!(Simulation::new(SimulationConfig::new(101, 1)).is_err());
        assert!(Simulation::new(SimulationConfig::new(1, 1)).is_ok());
        assert!(Simulation::new(SimulationConfig::new(100, 1)).is_ok());
    }

    #[test]
    fn all_wastes_board_is_a_fixed_point() {
        let mut sim = Simulation::new(all_wastes(1, 42)).unwrap();
        sim.advance_turn();
        // Only Wastes tokens circulate and a Wastes token is inert, so
        // the board cannot move.
        assert!(sim
            .stack_states()
            .iter()
            .all(|&state| state == TileState::Wastes));
        // 11 generated, 11 drawn, the 6 middle-ring draws returned.
        assert_eq!(sim.pool_snapshot(), [0, 6, 0, 0]);
    }

    #[test]
    fn one_turn_recycles_exactly_the_middle_ring() {
        let mut sim = Simulation::new(mixed(1, 7)).unwrap();
        sim.advance_turn();
        let total: u32 = sim.pool_snapshot().iter().sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn identical_configs_produce_identical_timelines() {
        let mut a = Simulation::new(mixed(20, 123)).unwrap();
        let mut b = Simulation::new(mixed(20, 123)).unwrap();
        a.run();
        b.run();
        assert_eq!(a.timeline(), b.timeline());
        assert_eq!(a.stack_states(), b.stack_states());
        assert_eq!(a.pool_snapshot(), b.pool_snapshot());
    }

    #[test]
    fn different_seeds_are_allowed_to_diverge() {
        let mut a = Simulation::new(mixed(20, 1)).unwrap();
        let mut b = Simulation::new(mixed(20, 2)).unwrap();
        a.run();
        b.run();
        // Not a hard guarantee for any single pair of seeds, but these
        // two diverge and pin down that the seed actually feeds the run.
        assert_ne!(a.timeline(), b.timeline());
    }

    #[test]
    fn timeline_includes_the_pre_run_record() {
        let mut sim = Simulation::new(mixed(5, 9)).unwrap();
        sim.run();
        let timeline = sim.timeline();
        assert_eq!(timeline.len(), 6);
        assert_eq!(timeline[0].round, 0);
        assert_eq!(timeline[0].pool_total, 0);
        assert_eq!(timeline[0].states[1], TileState::Wastes.code());
        assert_eq!(timeline[0].states[2], TileState::DevA.code());
        assert_eq!(timeline[5].round, 5);
    }

    #[test]
    fn zero_capacity_pool_falls_back_to_random_tokens() {
        let mut config = all_wastes(3, 11);
        for token in Token::ALL {
            config = config.with_pool_limit(token, 0);
        }
        let mut sim = Simulation::new(config).unwrap();
        let events = sim.advance_turn();
        // Nothing could be generated, so all 11 draws fell back.
        let fallbacks = events.iter().filter(|e| e.contains("pool empty")).count();
        assert_eq!(fallbacks, 11);
        // The fallback draws still recycle: put_back ignores the limit.
        let total: u32 = sim.pool_snapshot().iter().sum();
        assert_eq!(total, 6);
        sim.run();
        assert_eq!(sim.timeline().len(), 4);
    }

    #[test]
    fn devb_draw_applies_card_tile_changes_to_targets() {
        let card = tile_card("Rewilding", CardEffect::TurnWild, vec![1, 2, 3]);
        let mut config = SimulationConfig::new(1, 42).with_cards(CardSource::Loaded(vec![card]));
        for id in 1..=11 {
            config = config.with_initial_state(id, TileState::DevB);
        }
        let mut sim = Simulation::new(config).unwrap();
        assert!(sim.disruption_active());
        let events = sim.advance_turn();
        assert!(events.iter().any(|e| e.contains("drew disruption card")));
        let states = sim.stack_states();
        assert_eq!(states[0], TileState::Wilds);
        assert_eq!(states[1], TileState::Wilds);
        assert_eq!(states[2], TileState::Wilds);
        // Untargeted stacks keep DevB: the token itself is inert.
        for state in &states[3..] {
            assert_eq!(*state, TileState::DevB);
        }
    }

    #[test]
    fn later_effects_on_a_card_override_earlier_ones() {
        let card = DisruptionCard {
            name: "Tug of war".to_string(),
            description: String::new(),
            kind: CardKind::Disrupt,
            targets: vec![4],
            effects: vec![(CardEffect::TurnWild, 0), (CardEffect::TurnWaste, 0)],
            cancel_cost: Vec::new(),
            has_condition: false,
            can_cancel: true,
        };
        let mut config = SimulationConfig::new(1, 42).with_cards(CardSource::Loaded(vec![card]));
        for id in 1..=11 {
            config = config.with_initial_state(id, TileState::DevB);
        }
        let mut sim = Simulation::new(config).unwrap();
        sim.advance_turn();
        assert_eq!(sim.stack_states()[3], TileState::Wastes);
    }

    #[test]
    fn out_of_range_card_targets_are_ignored() {
        let card = tile_card("Overreach", CardEffect::TurnWaste, vec![0, 12, -3, 6]);
        let mut config = SimulationConfig::new(1, 42).with_cards(CardSource::Loaded(vec![card]));
        for id in 1..=11 {
            config = config.with_initial_state(id, TileState::DevB);
        }
        let mut sim = Simulation::new(config).unwrap();
        sim.advance_turn();
        let states = sim.stack_states();
        assert_eq!(states[5], TileState::Wastes);
        for (i, state) in states.iter().enumerate() {
            if i != 5 {
                assert_eq!(*state, TileState::DevB);
            }
        }
    }

    #[test]
    fn cards_without_tile_changes_leave_the_board_alone() {
        let card = DisruptionCard {
            name: "Levy".to_string(),
            description: String::new(),
            kind: CardKind::Boost,
            targets: vec![1, 2, 3],
            effects: vec![(CardEffect::Cohesion, -2), (CardEffect::Trade, 1)],
            cancel_cost: Vec::new(),
            has_condition: false,
            can_cancel: true,
        };
        let mut config = SimulationConfig::new(1, 42).with_cards(CardSource::Loaded(vec![card]));
        for id in 1..=11 {
            config = config.with_initial_state(id, TileState::DevB);
        }
        let mut sim = Simulation::new(config).unwrap();
        let events = sim.advance_turn();
        assert!(events.iter().any(|e| e.contains("no tile change effects")));
        assert!(sim
            .stack_states()
            .iter()
            .all(|&state| state == TileState::DevB));
        // Resource effects are recorded but never reach the track.
        assert_eq!(sim.parameters(), ParameterTrack::default());
    }

    #[test]
    fn mixed_effect_cards_note_resource_effects_once_per_draw() {
        let card = DisruptionCard {
            name: "Toll".to_string(),
            description: String::new(),
            kind: CardKind::Disrupt,
            targets: vec![3, 4],
            effects: vec![(CardEffect::TurnWaste, 0), (CardEffect::Cohesion, -2)],
            cancel_cost: Vec::new(),
            has_condition: false,
            can_cancel: true,
        };
        // One DevB stack means exactly one DevB token circulates, so the
        // card is drawn exactly once this turn.
        let config = SimulationConfig::new(1, 42)
            .with_cards(CardSource::Loaded(vec![card]))
            .with_initial_state(1, TileState::DevB);
        let mut sim = Simulation::new(config).unwrap();
        let events = sim.advance_turn();
        let drawn = events
            .iter()
            .filter(|e| e.contains("drew disruption card"))
            .count();
        assert_eq!(drawn, 1);
        // The resource effect is noted once for the card, not once per
        // target stack.
        let notes = events
            .iter()
            .filter(|e| e.contains("recorded (not applied)"))
            .count();
        assert_eq!(notes, 1);
        let turned = events.iter().filter(|e| e.contains("turned stack")).count();
        assert_eq!(turned, 2);
    }

    #[test]
    fn missing_card_file_degrades_to_base_rules() {
        let config = SimulationConfig::new(3, 5)
            .with_cards(CardSource::Path(PathBuf::from("./no-such-cards.json")));
        let mut sim = Simulation::new(config).unwrap();
        assert!(!sim.disruption_active());
        sim.run();
        assert_eq!(sim.timeline().len(), 4);
    }

    #[test]
    fn report_carries_board_pool_and_timeline() {
        let mut sim = Simulation::new(all_wastes(2, 42)).unwrap();
        let report = sim.run();
        assert_eq!(report.game_state.current_round, 2);
        assert_eq!(report.game_state.max_rounds, 2);
        assert_eq!(report.game_state.seed, 42);
        assert_eq!(report.board.hexes.len(), 11);
        assert_eq!(report.timeline.len(), 3);
        assert_eq!(report.legend.get("WASTES"), Some(&2));
        assert_eq!(report.maximum_tokens.get("WILDS"), Some(&20));
    }
}
