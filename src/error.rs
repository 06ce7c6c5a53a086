use thiserror::Error;

/// # `WeightedChoiceError` enum
///
/// The ways a weighted choice over a set of options can fail before
/// any randomness is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WeightedChoiceError {
    #[error("no options were supplied")]
    EmptyOptions,
    #[error("total option weight is not positive")]
    NonPositiveWeight,
}

/// # `SimulationError` enum
///
/// Every error the simulator can surface to a caller. Input-validation
/// errors are returned before the game loop starts; during the loop only
/// `InvariantViolation` aborts the simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid seed: {0}")]
    InvalidSeed(String),
    #[error("empty roster: {0}")]
    EmptyRoster(String),
    #[error("weighted choice failed: {0}")]
    WeightedChoice(#[from] WeightedChoiceError),
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    #[error("unsupported game type: {0}")]
    UnsupportedGameType(String),
}
