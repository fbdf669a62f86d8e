//! Wire format for values in the shared store.
//!
//! Orders travel as a versioned JSON object:
//!
//! ```json
//! {"version":1,"foodItem":"Burger","restaurant":"Joe's Diner","quantity":2}
//! ```
//!
//! Searches are stored as plain text and the reorder / check-status kinds as
//! boolean flags. Anything that does not decode is a [`DecodeFailure`].

use serde::{Deserialize, Serialize};

use handoff_core::error::Result;
use handoff_core::types::{ActionKind, OrderRequest, PendingAction, SearchRequest, StoredValue};

use crate::error::DecodeFailure;

/// Current order payload schema version.
pub const ORDER_PAYLOAD_VERSION: u64 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderEnvelopeRef<'a> {
    version: u64,
    food_item: &'a str,
    restaurant: &'a str,
    quantity: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderEnvelope {
    food_item: Option<String>,
    restaurant: Option<String>,
    quantity: Option<i64>,
}

/// Encode an order as a versioned JSON payload.
pub fn encode_order(order: &OrderRequest) -> Result<Vec<u8>> {
    let envelope = OrderEnvelopeRef {
        version: ORDER_PAYLOAD_VERSION,
        food_item: &order.food_item,
        restaurant: &order.restaurant,
        quantity: order.quantity,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Decode an order payload written by [`encode_order`].
///
/// A payload without a `version` field is reported as version 0.
pub fn decode_order(payload: &[u8]) -> std::result::Result<OrderRequest, DecodeFailure> {
    let value: serde_json::Value =
        serde_json::from_slice(payload).map_err(|e| DecodeFailure::Malformed(e.to_string()))?;

    if !value.is_object() {
        return Err(DecodeFailure::Malformed("expected a JSON object".to_string()));
    }

    let version = value.get("version").and_then(|v| v.as_u64()).unwrap_or(0);
    if version != ORDER_PAYLOAD_VERSION {
        return Err(DecodeFailure::UnsupportedVersion(version));
    }

    let envelope: OrderEnvelope =
        serde_json::from_value(value).map_err(|e| DecodeFailure::Malformed(e.to_string()))?;

    let food_item = envelope
        .food_item
        .ok_or(DecodeFailure::MissingField("foodItem"))?;
    let restaurant = envelope
        .restaurant
        .ok_or(DecodeFailure::MissingField("restaurant"))?;
    let quantity = envelope
        .quantity
        .ok_or(DecodeFailure::MissingField("quantity"))?;
    let quantity = u32::try_from(quantity)
        .ok()
        .filter(|q| *q >= 1)
        .ok_or(DecodeFailure::InvalidQuantity(quantity))?;

    let order = OrderRequest {
        food_item,
        restaurant,
        quantity,
    };
    validate_order(&order)?;
    Ok(order)
}

/// Check the invariants every routed order must hold.
pub fn validate_order(order: &OrderRequest) -> std::result::Result<(), DecodeFailure> {
    if order.food_item.trim().is_empty() {
        return Err(DecodeFailure::MissingField("foodItem"));
    }
    if order.restaurant.trim().is_empty() {
        return Err(DecodeFailure::MissingField("restaurant"));
    }
    if order.quantity < 1 {
        return Err(DecodeFailure::InvalidQuantity(i64::from(order.quantity)));
    }
    Ok(())
}

/// Turn a pending action into the value stored under its key.
pub fn encode_action(action: &PendingAction) -> Result<StoredValue> {
    match action {
        PendingAction::Order(order) => Ok(StoredValue::Blob(encode_order(order)?)),
        PendingAction::Search(search) => Ok(StoredValue::Text(search.query.clone())),
        PendingAction::Reorder | PendingAction::CheckStatus => Ok(StoredValue::Flag(true)),
    }
}

/// Turn the value found under `kind`'s key back into a pending action.
///
/// `Ok(None)` means the key held a lowered flag: present, but not pending.
pub fn decode_stored(
    kind: ActionKind,
    value: StoredValue,
) -> std::result::Result<Option<PendingAction>, DecodeFailure> {
    match (kind, value) {
        (ActionKind::Order, StoredValue::Blob(bytes)) => {
            decode_order(&bytes).map(|o| Some(PendingAction::Order(o)))
        }
        (ActionKind::Order, StoredValue::Text(text)) => {
            decode_order(text.as_bytes()).map(|o| Some(PendingAction::Order(o)))
        }
        (ActionKind::Search, StoredValue::Text(query)) => {
            let query = query.trim();
            if query.is_empty() {
                return Err(DecodeFailure::EmptyQuery);
            }
            Ok(Some(PendingAction::Search(SearchRequest {
                query: query.to_string(),
            })))
        }
        (ActionKind::Reorder, StoredValue::Flag(raised)) => {
            Ok(raised.then_some(PendingAction::Reorder))
        }
        (ActionKind::CheckStatus, StoredValue::Flag(raised)) => {
            Ok(raised.then_some(PendingAction::CheckStatus))
        }
        (kind, other) => Err(DecodeFailure::WrongValueType {
            kind,
            expected: expected_type(kind),
            found: other.type_tag(),
        }),
    }
}

fn expected_type(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::Order => "blob",
        ActionKind::Search => "text",
        ActionKind::Reorder | ActionKind::CheckStatus => "flag",
    }
}
