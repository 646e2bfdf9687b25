//! Ballot Position - position hierarchy resolution
//!
//! Position configuration is a tree per election type and level whose keys are
//! either terminal positions or categories with further children. This crate
//! loads the trees once into an immutable [`PositionCatalog`] and resolves
//! category / subcategory / nested category / position selections into
//! canonical dotted position paths.

pub mod catalog;
pub mod error;
pub mod node;
pub mod resolver;

pub use catalog::PositionCatalog;
pub use error::PositionError;
pub use node::{LevelTree, PositionNode};
pub use resolver::{
    Continuation, PositionOption, PositionSelection, Resolution, ResolvedPosition, SelectionSlot,
    SubtreePath, display_label,
};

/// Maximum number of keys below the level: category, subcategory, nested category, position
pub const MAX_SELECTION_DEPTH: usize = 4;

impl From<PositionError> for ballot_common::BallotError {
    fn from(err: PositionError) -> Self {
        ballot_common::BallotError::Position(err.to_string())
    }
}
