use thiserror::Error;

/// Illegal workflow stage transitions.
///
/// The workflow is a strictly linear state machine over the configured
/// stage list: no branching, no skipping, no self or backward moves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Unknown stage: '{0}'")]
    UnknownStage(String),

    #[error("Backward transition from '{from}' to '{to}' is not allowed")]
    Backward { from: String, to: String },

    #[error("Transition from '{from}' to '{to}' skips intermediate stages")]
    SkippedStage { from: String, to: String },
}

/// Validate that moving from `from` to `to` is a single forward step
/// through the ordered stage list.
pub fn validate_transition(
    stages: &[String],
    from: &str,
    to: &str,
) -> Result<(), TransitionError> {
    let from_index = stages
        .iter()
        .position(|s| s == from)
        .ok_or_else(|| TransitionError::UnknownStage(from.to_string()))?;
    let to_index = stages
        .iter()
        .position(|s| s == to)
        .ok_or_else(|| TransitionError::UnknownStage(to.to_string()))?;

    if to_index <= from_index {
        return Err(TransitionError::Backward {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    if to_index > from_index + 1 {
        return Err(TransitionError::SkippedStage {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    Ok(())
}
