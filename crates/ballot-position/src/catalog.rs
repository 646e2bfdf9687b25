//! Immutable position configuration, loaded once at startup

use std::collections::BTreeMap;
use std::path::Path;

use ballot_common::POSITION_PATH_SEPARATOR;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::MAX_SELECTION_DEPTH;
use crate::error::PositionError;
use crate::node::{LevelTree, PositionNode};

/// Every configured position tree, keyed by election type then level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionCatalog {
    election_types: BTreeMap<String, BTreeMap<String, LevelTree>>,
}

impl PositionCatalog {
    /// Parse one configuration document shaped `{ELECTION_TYPE: {LEVEL: tree}}`.
    pub fn from_json_str(json: &str) -> Result<Self, PositionError> {
        let catalog: PositionCatalog = serde_json::from_str(json)?;
        catalog.validate()?;

        Ok(catalog)
    }

    /// Load and merge several configuration documents.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, PositionError> {
        let mut catalog = PositionCatalog::default();

        for path in paths {
            let path = path.as_ref();
            let json = std::fs::read_to_string(path).map_err(|source| PositionError::Io {
                path: path.to_path_buf(),
                source,
            })?;

            let loaded = PositionCatalog::from_json_str(&json)?;
            info!(
                file = %path.display(),
                election_types = ?loaded.election_types().collect::<Vec<_>>(),
                "Loaded position config"
            );

            catalog.merge(loaded)?;
        }

        Ok(catalog)
    }

    /// Add every election type of `other`; an election type may only be defined once.
    pub fn merge(&mut self, other: PositionCatalog) -> Result<(), PositionError> {
        if let Some(duplicate) = other
            .election_types
            .keys()
            .find(|key| self.election_types.contains_key(*key))
        {
            return Err(PositionError::DuplicateElectionType(duplicate.clone()));
        }

        self.election_types.extend(other.election_types);

        Ok(())
    }

    /// Register the tree of one election type and level.
    pub fn insert_level(
        &mut self,
        election_type: &str,
        level: &str,
        tree: LevelTree,
    ) -> Result<(), PositionError> {
        validate_key("", election_type)?;
        validate_key(election_type, level)?;
        validate_tree(&format!("{}.{}", election_type, level), &tree, 1)?;

        self.election_types
            .entry(election_type.to_string())
            .or_default()
            .insert(level.to_string(), tree);

        Ok(())
    }

    pub fn election_types(&self) -> impl Iterator<Item = &str> {
        self.election_types.keys().map(String::as_str)
    }

    pub fn levels(&self, election_type: &str) -> Result<Vec<&str>, PositionError> {
        self.election_types
            .get(election_type)
            .map(|levels| levels.keys().map(String::as_str).collect())
            .ok_or_else(|| PositionError::UnknownElectionType(election_type.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.election_types.is_empty()
    }

    /// The category tree of one election type and level.
    pub fn level_tree(
        &self,
        election_type: &str,
        level: &str,
    ) -> Result<&LevelTree, PositionError> {
        let levels = self
            .election_types
            .get(election_type)
            .ok_or_else(|| PositionError::UnknownElectionType(election_type.to_string()))?;

        levels.get(level).ok_or_else(|| PositionError::UnknownLevel {
            election_type: election_type.to_string(),
            level: level.to_string(),
        })
    }

    fn validate(&self) -> Result<(), PositionError> {
        for (election_type, levels) in &self.election_types {
            validate_key("", election_type)?;

            for (level, tree) in levels {
                validate_key(election_type, level)?;
                validate_tree(&format!("{}.{}", election_type, level), tree, 1)?;
            }
        }

        Ok(())
    }
}

fn validate_key(prefix: &str, key: &str) -> Result<(), PositionError> {
    if key.is_empty() || key.contains(POSITION_PATH_SEPARATOR) {
        return Err(PositionError::InvalidKey {
            prefix: prefix.to_string(),
            key: key.to_string(),
        });
    }

    Ok(())
}

fn validate_tree(
    prefix: &str,
    children: &BTreeMap<String, PositionNode>,
    depth: usize,
) -> Result<(), PositionError> {
    for (key, node) in children {
        validate_key(prefix, key)?;
        let path = format!("{}{}{}", prefix, POSITION_PATH_SEPARATOR, key);

        match node {
            PositionNode::Terminal => {}
            PositionNode::Category(_) if depth >= MAX_SELECTION_DEPTH => {
                return Err(PositionError::ConfigTooDeep(path));
            }
            PositionNode::Category(grandchildren) if grandchildren.is_empty() => {
                warn!(path = %path, "Position category has no positions and can never be selected");
            }
            PositionNode::Category(grandchildren) => {
                validate_tree(&path, grandchildren, depth + 1)?;
            }
        }
    }

    Ok(())
}
