// Re-export core modules for use by the binary or other consumers
pub mod components;
pub mod core;
pub mod data;
pub mod rules;
pub mod simulation;
pub mod systems;

// Expose the engine facade and the types needed to configure a run
pub use crate::components::board::{Ring, StackId, Tile, TileState, Token, STACK_COUNT};
pub use crate::core::engine::{CardSource, ConfigError, Simulation, SimulationConfig};
pub use crate::core::serialization::{save_report_to_path, RunReport};
pub use crate::data::cards::{load_card_catalog, CardDataError, DisruptionCard};
