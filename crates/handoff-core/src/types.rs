//! Shared domain types for the handoff between the agent and the application.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Action kinds
// =============================================================================

/// The fixed vocabulary of actions the agent can leave for the application.
///
/// Each kind owns exactly one key in the shared store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Order,
    Search,
    Reorder,
    CheckStatus,
}

impl ActionKind {
    /// Order in which `check()` visits the store keys.
    pub const READ_ORDER: [ActionKind; 4] = [
        ActionKind::Order,
        ActionKind::Search,
        ActionKind::Reorder,
        ActionKind::CheckStatus,
    ];

    /// Resolution precedence, highest first.
    pub const PRECEDENCE: [ActionKind; 4] = [
        ActionKind::Order,
        ActionKind::Search,
        ActionKind::CheckStatus,
        ActionKind::Reorder,
    ];

    /// The well-known shared store key for this kind.
    pub fn store_key(self) -> &'static str {
        match self {
            ActionKind::Order => "pending-order",
            ActionKind::Search => "pending-search",
            ActionKind::Reorder => "pending-reorder",
            ActionKind::CheckStatus => "pending-check-status",
        }
    }

    /// Look a kind up by its store key.
    pub fn from_store_key(key: &str) -> Option<ActionKind> {
        ActionKind::READ_ORDER
            .into_iter()
            .find(|kind| kind.store_key() == key)
    }

    /// Position in [`ActionKind::PRECEDENCE`]; lower wins.
    pub fn rank(self) -> usize {
        match self {
            ActionKind::Order => 0,
            ActionKind::Search => 1,
            ActionKind::CheckStatus => 2,
            ActionKind::Reorder => 3,
        }
    }

    /// Whether the kind is stored as a bare presence flag.
    pub fn is_flag(self) -> bool {
        matches!(self, ActionKind::Reorder | ActionKind::CheckStatus)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Order => write!(f, "order"),
            ActionKind::Search => write!(f, "search"),
            ActionKind::Reorder => write!(f, "reorder"),
            ActionKind::CheckStatus => write!(f, "check_status"),
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order" => Ok(ActionKind::Order),
            "search" => Ok(ActionKind::Search),
            "reorder" => Ok(ActionKind::Reorder),
            "check_status" => Ok(ActionKind::CheckStatus),
            _ => Err(format!("Unknown action kind: {}", s)),
        }
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// A voice-initiated order for a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub food_item: String,
    pub restaurant: String,
    /// Always at least 1 once decoded.
    pub quantity: u32,
}

impl OrderRequest {
    pub fn new(food_item: impl Into<String>, restaurant: impl Into<String>, quantity: u32) -> Self {
        Self {
            food_item: food_item.into(),
            restaurant: restaurant.into(),
            quantity,
        }
    }
}

/// A voice-initiated search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// A single resolved action, ready to hand to the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingAction {
    Order(OrderRequest),
    Search(SearchRequest),
    /// Open the quick-order composer with nothing pre-filled.
    Reorder,
    CheckStatus,
}

impl PendingAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PendingAction::Order(_) => ActionKind::Order,
            PendingAction::Search(_) => ActionKind::Search,
            PendingAction::Reorder => ActionKind::Reorder,
            PendingAction::CheckStatus => ActionKind::CheckStatus,
        }
    }
}

// =============================================================================
// Stored values
// =============================================================================

/// Raw value held under a shared store key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredValue {
    /// Encoded structured payload.
    Blob(Vec<u8>),
    Text(String),
    Flag(bool),
    /// A value of a type no writer of this crate produces, e.g. a float left
    /// by a foreign agent build. Holds the name of what was found. Never
    /// decodes into an action.
    Unrecognized(String),
}

impl StoredValue {
    /// Short name of the variant, used as the persisted type tag.
    pub fn type_tag(&self) -> &'static str {
        match self {
            StoredValue::Blob(_) => "blob",
            StoredValue::Text(_) => "text",
            StoredValue::Flag(_) => "flag",
            StoredValue::Unrecognized(_) => "unrecognized",
        }
    }
}

/// A pending key as seen by an inspector that does not consume it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub kind: ActionKind,
    pub value: StoredValue,
    pub written_at: DateTime<Utc>,
}
