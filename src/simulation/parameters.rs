use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// The five scalar resource tracks of the commons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parameter {
    Cohesion,
    CybernationLevel,
    HumanRelation,
    Environment,
    Technology,
}

/// Resource: scalar resource counters.
///
/// Resource-type disruption effects are the only thing allowed to write
/// these; the base resolution path never touches them. Today those
/// effects are recorded in the turn event log without being applied, so
/// the track stays at its starting values for a whole run.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterTrack {
    pub cohesion: i32,
    pub cybernation_level: i32,
    pub human_relation: i32,
    pub environment: i32,
    pub technology: i32,
}

impl Default for ParameterTrack {
    fn default() -> Self {
        Self {
            cohesion: 10,
            cybernation_level: 2,
            human_relation: 7,
            environment: 7,
            technology: 7,
        }
    }
}

impl ParameterTrack {
    pub fn get(&self, parameter: Parameter) -> i32 {
        match parameter {
            Parameter::Cohesion => self.cohesion,
            Parameter::CybernationLevel => self.cybernation_level,
            Parameter::HumanRelation => self.human_relation,
            Parameter::Environment => self.environment,
            Parameter::Technology => self.technology,
        }
    }

    pub fn set(&mut self, parameter: Parameter, value: i32) {
        match parameter {
            Parameter::Cohesion => self.cohesion = value,
            Parameter::CybernationLevel => self.cybernation_level = value,
            Parameter::HumanRelation => self.human_relation = value,
            Parameter::Environment => self.environment = value,
            Parameter::Technology => self.technology = value,
        }
    }

    /// Shift a counter by a signed delta, floored at zero.
    pub fn adjust(&mut self, parameter: Parameter, delta: i32) {
        let next = (self.get(parameter) + delta).max(0);
        self.set(parameter, next);
    }
}
