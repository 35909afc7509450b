use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use thiserror::Error;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Server code returned when a write breaks the collection validator.
const DOCUMENT_VALIDATION_FAILURE: i32 = 121;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection")]
    InitialPing {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to install validator on collection `{collection}`")]
    EnsureValidator {
        collection: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save player `{player_id}`")]
    SavePlayer {
        player_id: String,
        #[source]
        source: MongoError,
    },
    #[error("upsert of player `{player_id}` returned no document")]
    UpsertReturnedNothing { player_id: String },
    #[error("failed to load player `{player_id}`")]
    LoadPlayer {
        player_id: String,
        #[source]
        source: MongoError,
    },
}

/// Server code returned when the collection to create already exists.
const NAMESPACE_EXISTS: i32 = 48;

/// Error code reported by the server for a failed command or write, if any.
pub fn server_code(err: &MongoError) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => Some(command.code),
        ErrorKind::Write(WriteFailure::WriteError(write)) => Some(write.code),
        _ => None,
    }
}

/// Whether `code` means the write broke the collection validator.
fn is_validation_code(code: Option<i32>) -> bool {
    code == Some(DOCUMENT_VALIDATION_FAILURE)
}

/// Whether `code` means a concurrent instance created the collection first.
pub fn is_namespace_exists_code(code: Option<i32>) -> bool {
    code == Some(NAMESPACE_EXISTS)
}

impl MongoDaoError {
    /// Whether the server refused the write because of the collection validator.
    pub fn is_validation_failure(&self) -> bool {
        match self {
            MongoDaoError::SavePlayer { source, .. } => is_validation_code(server_code(source)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_code_121_is_a_validation_failure() {
        assert!(is_validation_code(Some(121)));
        assert!(!is_validation_code(Some(11000)));
        assert!(!is_validation_code(Some(13)));
        assert!(!is_validation_code(None));
    }

    #[test]
    fn namespace_exists_is_code_48() {
        assert!(is_namespace_exists_code(Some(48)));
        assert!(!is_namespace_exists_code(Some(13)));
        assert!(!is_namespace_exists_code(None));
    }
}
