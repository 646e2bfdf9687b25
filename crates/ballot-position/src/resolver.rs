//! Position path resolution
//!
//! A selection is walked key by key through the level tree. The walk stops at
//! the first terminal node: the walked keys form the position path and the
//! last walked key is the position. Selections left over after a terminal are
//! ignored, so a terminal category wins over any subcategory or position the
//! client also sent. Running out of selections while still inside a category
//! is not an error but a [`Continuation`] naming the slot to fill next.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use ballot_common::POSITION_PATH_SEPARATOR;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::MAX_SELECTION_DEPTH;
use crate::catalog::PositionCatalog;
use crate::error::PositionError;
use crate::node::PositionNode;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSelection {
    pub category: String,
    pub subcategory: Option<String>,
    pub nested_category: Option<String>,
    pub position: Option<String>,
}

impl PositionSelection {
    pub fn category(category: impl Into<String>) -> Self {
        PositionSelection {
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_nested_category(mut self, nested_category: impl Into<String>) -> Self {
        self.nested_category = Some(nested_category.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Keys in walk order. A position without a subcategory is never walked:
    /// the subcategory slot has to be filled first.
    fn keys(&self) -> Vec<&str> {
        let mut keys = vec![self.category.as_str()];

        if let Some(subcategory) = self.subcategory.as_deref() {
            keys.push(subcategory);
            keys.extend(self.nested_category.as_deref());
            keys.extend(self.position.as_deref());
        }

        keys
    }
}

/// A fully resolved, canonical position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPosition {
    pub election_type: String,
    pub level: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub nested_category: Option<String>,
    pub position: String,
    pub path: String,
}

impl ResolvedPosition {
    fn from_walk(election_type: &str, level: &str, walked: &[&str]) -> Self {
        let (subcategory, nested_category) = match walked.len() {
            1 => (None, None),
            2 | 3 => (Some(walked[1].to_string()), None),
            _ => (Some(walked[1].to_string()), Some(walked[2].to_string())),
        };

        ResolvedPosition {
            election_type: election_type.to_string(),
            level: level.to_string(),
            category: walked[0].to_string(),
            subcategory,
            nested_category,
            position: walked[walked.len() - 1].to_string(),
            path: join_path(election_type, level, walked),
        }
    }

    /// The selection that resolves back to this position.
    pub fn selection(&self) -> PositionSelection {
        PositionSelection {
            category: self.category.clone(),
            subcategory: self.subcategory.clone(),
            nested_category: self.nested_category.clone(),
            position: Some(self.position.clone()),
        }
    }
}

/// The selection slot a continuation asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionSlot {
    Subcategory,
    /// A terminal position, or a nested category to be sent as `nestedCategory`
    Position,
}

impl Display for SelectionSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionSlot::Subcategory => write!(f, "subcategory"),
            SelectionSlot::Position => write!(f, "position"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionOption {
    pub key: String,
    pub label: String,
    pub terminal: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Continuation {
    /// Path walked so far
    pub prefix: String,
    pub slot: SelectionSlot,
    pub choices: Vec<PositionOption>,
}

/// A walked prefix of the level tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubtreePath {
    pub path: String,
    /// The walk ended on a terminal position
    pub terminal: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Resolution {
    Resolved(ResolvedPosition),
    Incomplete(Continuation),
}

/// Label shown for a config key: underscores become spaces.
pub fn display_label(key: &str) -> String {
    key.replace('_', " ")
}

fn join_path(election_type: &str, level: &str, keys: &[&str]) -> String {
    let separator = POSITION_PATH_SEPARATOR.to_string();
    let mut segments = vec![election_type, level];
    segments.extend_from_slice(keys);
    segments.join(&separator)
}

fn options(children: &BTreeMap<String, PositionNode>) -> Vec<PositionOption> {
    children
        .iter()
        .map(|(key, node)| PositionOption {
            key: key.clone(),
            label: display_label(key),
            terminal: node.is_terminal(),
        })
        .collect()
}

enum Walk<'a> {
    Terminal(Vec<&'a str>),
    Open(Vec<&'a str>, &'a BTreeMap<String, PositionNode>),
}

impl PositionCatalog {
    /// Resolve a selection into a canonical position path, or the next slot to fill.
    pub fn resolve(
        &self,
        election_type: &str,
        level: &str,
        selection: &PositionSelection,
    ) -> Result<Resolution, PositionError> {
        match self.walk(election_type, level, &selection.keys())? {
            Walk::Terminal(walked) => Ok(Resolution::Resolved(ResolvedPosition::from_walk(
                election_type,
                level,
                &walked,
            ))),
            Walk::Open(walked, children) => {
                let slot = if walked.len() == 1 {
                    SelectionSlot::Subcategory
                } else {
                    SelectionSlot::Position
                };

                Ok(Resolution::Incomplete(Continuation {
                    prefix: join_path(election_type, level, &walked),
                    slot,
                    choices: options(children),
                }))
            }
        }
    }

    /// Resolve a selection that must reach a terminal position.
    pub fn resolve_complete(
        &self,
        election_type: &str,
        level: &str,
        selection: &PositionSelection,
    ) -> Result<ResolvedPosition, PositionError> {
        match self.resolve(election_type, level, selection)? {
            Resolution::Resolved(resolved) => Ok(resolved),
            Resolution::Incomplete(continuation) => Err(PositionError::Incomplete {
                path: continuation.prefix,
                slot: continuation.slot,
            }),
        }
    }

    /// Parse a stored position path back into its selections.
    pub fn parse_path(&self, path: &str) -> Result<ResolvedPosition, PositionError> {
        let segments: Vec<&str> = path.split(POSITION_PATH_SEPARATOR).collect();
        if segments.len() < 3 || segments.len() > MAX_SELECTION_DEPTH + 2 {
            return Err(PositionError::MalformedPath(path.to_string()));
        }

        let (election_type, level, keys) = (segments[0], segments[1], &segments[2..]);
        match self.walk(election_type, level, keys)? {
            Walk::Terminal(walked) if walked.len() == keys.len() => {
                Ok(ResolvedPosition::from_walk(election_type, level, &walked))
            }
            Walk::Terminal(_) => Err(PositionError::MalformedPath(path.to_string())),
            Walk::Open(walked, _) => Err(PositionError::Incomplete {
                path: join_path(election_type, level, &walked),
                slot: if walked.len() == 1 {
                    SelectionSlot::Subcategory
                } else {
                    SelectionSlot::Position
                },
            }),
        }
    }

    /// Recompute the path of stored selections; the recomputed path wins over
    /// the stored one.
    pub fn reconcile(
        &self,
        stored_path: &str,
        election_type: &str,
        level: &str,
        selection: &PositionSelection,
    ) -> Result<ResolvedPosition, PositionError> {
        let resolved = self.resolve_complete(election_type, level, selection)?;

        if resolved.path != stored_path {
            warn!(
                stored = %stored_path,
                recomputed = %resolved.path,
                "Stored position path does not match its selections, using recomputed path"
            );
        }

        Ok(resolved)
    }

    /// Choices available after walking `prefix`; empty once a terminal is reached.
    pub fn options(
        &self,
        election_type: &str,
        level: &str,
        prefix: &[&str],
    ) -> Result<Vec<PositionOption>, PositionError> {
        if prefix.is_empty() {
            return Ok(options(self.level_tree(election_type, level)?));
        }

        match self.walk(election_type, level, prefix)? {
            Walk::Terminal(_) => Ok(Vec::new()),
            Walk::Open(_, children) => Ok(options(children)),
        }
    }

    /// Path of a position subtree: a category prefix, or a terminal reached on
    /// the way. Keys left over after a terminal are ignored, as in [`resolve`].
    ///
    /// [`resolve`]: PositionCatalog::resolve
    pub fn prefix_path(
        &self,
        election_type: &str,
        level: &str,
        keys: &[&str],
    ) -> Result<SubtreePath, PositionError> {
        let (walked, terminal) = match self.walk(election_type, level, keys)? {
            Walk::Terminal(walked) => (walked, true),
            Walk::Open(walked, _) => (walked, false),
        };

        Ok(SubtreePath {
            path: join_path(election_type, level, &walked),
            terminal,
        })
    }

    /// Walk `keys` through the level tree, stopping at the first terminal.
    fn walk<'a>(
        &'a self,
        election_type: &str,
        level: &str,
        keys: &[&'a str],
    ) -> Result<Walk<'a>, PositionError> {
        let mut children = self.level_tree(election_type, level)?;
        let mut walked: Vec<&'a str> = Vec::with_capacity(keys.len());

        for &key in keys {
            let node = children.get(key).ok_or_else(|| {
                let prefix = join_path(election_type, level, &walked);
                if walked.is_empty() {
                    PositionError::UnknownCategory {
                        prefix,
                        category: key.to_string(),
                    }
                } else {
                    PositionError::UnknownKey {
                        prefix,
                        key: key.to_string(),
                    }
                }
            })?;
            walked.push(key);

            match node {
                PositionNode::Terminal => return Ok(Walk::Terminal(walked)),
                PositionNode::Category(next) if next.is_empty() => {
                    return Err(PositionError::EmptyCategory(join_path(
                        election_type,
                        level,
                        &walked,
                    )));
                }
                PositionNode::Category(next) => children = next,
            }
        }

        Ok(Walk::Open(walked, children))
    }
}
