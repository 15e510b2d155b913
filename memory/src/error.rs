use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    NoCheckpoints,
    CheckpointOutOfRange { handle: usize, saved: usize },
    CheckpointVacated { handle: usize },
}

pub type ArenaResult<T> = Result<T, ArenaError>;

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::NoCheckpoints => {
                write!(f, "cannot restore arena checkpoint: no checkpoints are saved")
            }
            ArenaError::CheckpointOutOfRange { handle, saved } => {
                write!(
                    f,
                    "arena checkpoint out of range (handle: {}, saved checkpoints: {})",
                    handle, saved
                )
            }
            ArenaError::CheckpointVacated { handle } => {
                write!(
                    f,
                    "arena checkpoint was already restored (handle: {})",
                    handle
                )
            }
        }
    }
}

impl std::error::Error for ArenaError {}
