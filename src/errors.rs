use thiserror::Error;

/// Errors that can occur while locating, parsing, resolving or citing
/// family records.
///
/// The type is `Clone` so that a single in-flight resolution can hand the
/// same outcome to every caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FamilyGraphError {
    #[error("invalid family identifier: {family_id}")]
    InvalidIdentifier { family_id: String },

    #[error("no text found for family {family_id}")]
    NotFound { family_id: String },

    #[error("parse error: {message} (family: {family_id})")]
    Parse { family_id: String, message: String },

    #[error("no person named '{name}' in family {family_id}")]
    PersonNotFound { family_id: String, name: String },

    #[error("linked family {family_id} could not be resolved: {reason}")]
    Unresolvable { family_id: String, reason: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {message} (path: {path})")]
    Io { message: String, path: String },

    #[error("json error: {message}")]
    Json { message: String },

    #[error("http error: {message}")]
    Http { message: String },
}

impl From<serde_json::Error> for FamilyGraphError {
    fn from(e: serde_json::Error) -> Self {
        FamilyGraphError::Json {
            message: e.to_string(),
        }
    }
}

impl FamilyGraphError {
    /// Returns the family identifier the error refers to, if any.
    pub fn family_id(&self) -> Option<&str> {
        match self {
            FamilyGraphError::InvalidIdentifier { family_id }
            | FamilyGraphError::NotFound { family_id }
            | FamilyGraphError::Parse { family_id, .. }
            | FamilyGraphError::PersonNotFound { family_id, .. }
            | FamilyGraphError::Unresolvable { family_id, .. } => Some(family_id.as_str()),
            _ => None,
        }
    }

    /// Wraps a primary-load failure as the error recorded for a linked family.
    pub fn into_unresolvable(self) -> FamilyGraphError {
        match self {
            FamilyGraphError::Unresolvable { .. } => self,
            other => FamilyGraphError::Unresolvable {
                family_id: other.family_id().unwrap_or_default().to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Convenience alias for results using `FamilyGraphError`.
pub type Result<T> = std::result::Result<T, FamilyGraphError>;
