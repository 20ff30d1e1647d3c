use serde::{Deserialize, Serialize};

use super::board::BoardId;

pub type TagId = u64;

/// A label attachable to many tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Payload for creating a tag on a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagForm {
    pub board_id: BoardId,
    pub name: String,
}
