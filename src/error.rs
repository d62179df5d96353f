use thiserror::Error;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, SwitchError>;

#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("no JDK installations found in the registry or in {prefix}* environment variables")]
    NoVersionsFound { prefix: String },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("failed to read selection: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("failed to read selection: {0}")]
    Input(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SwitchError {
    /// Hint printed under the error for cases the user can fix.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::NoVersionsFound { prefix } => Some(format!(
                "Install a JDK, or register one manually with a system variable named {prefix}<version>."
            )),
            Self::InvalidSelection(_) => {
                Some("Run the program again and choose one of the listed numbers.".to_string())
            }
            Self::Store(StoreError::AccessDenied(_)) => {
                Some("Run from an elevated (Administrator) prompt.".to_string())
            }
            _ => None,
        }
    }
}
