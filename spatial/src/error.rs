use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    InvalidDivider { divider: usize },
    InvalidMaxCount { max_count: usize },
}

pub type TreeResult<T> = Result<T, TreeError>;

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::InvalidDivider { divider } => {
                write!(f, "tree divider must be at least 2 (divider: {})", divider)
            }
            TreeError::InvalidMaxCount { max_count } => {
                write!(
                    f,
                    "tree leaf item threshold must be at least 1 (max_count: {})",
                    max_count
                )
            }
        }
    }
}

impl std::error::Error for TreeError {}
