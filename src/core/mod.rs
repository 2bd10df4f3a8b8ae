pub mod ecs;
pub mod engine;
pub mod serialization;
