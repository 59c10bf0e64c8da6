//! Error taxonomy
//!
//! Every variant is a programming error caught at the call boundary. None of
//! them is transient, so nothing here is ever retried. A game-ending collision
//! is not an error; it is the `GameOver` phase.

use crate::sim::EntityKind;

/// Simulation errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Thrust or turn value outside {-1, 0, 1}
    #[error("invalid {control} intent {value}: expected -1, 0 or 1")]
    InvalidIntent { control: &'static str, value: i32 },

    /// Pose with a component count other than three
    #[error("malformed pose: expected 3 components, got {0}")]
    MalformedPose(usize),

    /// Arena size that is not two positive finite numbers
    #[error("invalid arena size: {0}")]
    InvalidArenaSize(String),

    /// Asteroid quota that is not a non-negative integer
    #[error("invalid asteroid quota: {0}")]
    InvalidAsteroidQuota(String),

    /// Object admitted into the wrong typed collection
    #[error("wrong entity kind: expected {expected:?}, got {found:?}")]
    WrongEntityKind {
        expected: EntityKind,
        found: EntityKind,
    },

    /// Second ship registered in the same arena
    #[error("arena already holds a ship")]
    DuplicateShip,

    /// Shape that cannot be built (abstract asteroid, degenerate or concave hull)
    #[error("invalid construction: {0}")]
    InvalidConstruction(String),

    /// Ship operation with no ship registered
    #[error("no ship registered")]
    NoShip,

    /// Gameplay mutation after the game ended
    #[error("game is over")]
    GameOver,

    /// Settings document could not be parsed or serialized
    #[error("settings error: {0}")]
    Settings(String),
}

impl SimError {
    /// True for the argument-validation class (intent, pose, arena size, quota)
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            SimError::InvalidIntent { .. }
                | SimError::MalformedPose(_)
                | SimError::InvalidArenaSize(_)
                | SimError::InvalidAsteroidQuota(_)
        )
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Settings(err.to_string())
    }
}
