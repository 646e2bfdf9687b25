use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Category keys of one election type and level
pub type LevelTree = BTreeMap<String, PositionNode>;

/// One node of a position configuration tree.
///
/// In the JSON documents a terminal position is written as `null` and a
/// category as an object of its children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PositionNode {
    Terminal,
    Category(BTreeMap<String, PositionNode>),
}

impl PositionNode {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PositionNode::Terminal)
    }

    pub fn children(&self) -> Option<&BTreeMap<String, PositionNode>> {
        match self {
            PositionNode::Terminal => None,
            PositionNode::Category(children) => Some(children),
        }
    }
}

impl<'de> Deserialize<'de> for PositionNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let children = Option::<BTreeMap<String, PositionNode>>::deserialize(deserializer)?;

        Ok(match children {
            None => PositionNode::Terminal,
            Some(children) => PositionNode::Category(children),
        })
    }
}

impl Serialize for PositionNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PositionNode::Terminal => serializer.serialize_none(),
            PositionNode::Category(children) => children.serialize(serializer),
        }
    }
}
