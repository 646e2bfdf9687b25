use std::path::PathBuf;

use crate::resolver::SelectionSlot;

#[derive(thiserror::Error, Debug)]
pub enum PositionError {
    #[error("unknown election type '{0}'")]
    UnknownElectionType(String),

    #[error("unknown level '{level}' for election type '{election_type}'")]
    UnknownLevel {
        election_type: String,
        level: String,
    },

    #[error("unknown category '{category}' under '{prefix}'")]
    UnknownCategory { prefix: String, category: String },

    #[error("'{key}' is not configured under '{prefix}'")]
    UnknownKey { prefix: String, key: String },

    #[error("'{0}' has no positions configured")]
    EmptyCategory(String),

    #[error("'{path}' is incomplete, a {slot} must be selected")]
    Incomplete { path: String, slot: SelectionSlot },

    #[error("malformed position path '{0}'")]
    MalformedPath(String),

    #[error("invalid position config key '{key}' under '{prefix}'")]
    InvalidKey { prefix: String, key: String },

    #[error("'{0}' nests deeper than category, subcategory, nested category and position")]
    ConfigTooDeep(String),

    #[error("election type '{0}' is configured more than once")]
    DuplicateElectionType(String),

    #[error("failed to read position config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse position config: {0}")]
    Parse(#[from] serde_json::Error),
}
