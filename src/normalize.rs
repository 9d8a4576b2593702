//! Per-endpoint response normalization
//!
//! The metamob endpoints return heterogeneous shapes; each endpoint gets its
//! own reduction rule so the cache only retains the fields callers use.
//! Normalization is tolerant: an element missing an expected field is passed
//! through (or left untouched) rather than aborting the whole batch.

use serde_json::Value;

use crate::endpoints::Endpoint;

/// Reduces a decoded response payload according to the endpoint it came from
///
/// * `UserMonsters` — drops elements the user neither seeks nor offers
/// * `Monsters` — strips fields redundant with the request context
/// * every other endpoint — identity, listed explicitly so a new endpoint
///   must pick a rule before it compiles
pub fn normalize(endpoint: Endpoint, payload: Value) -> Value {
    match endpoint {
        Endpoint::UserMonsters => drop_unlisted_monsters(payload),
        Endpoint::Monsters => strip_contextual_fields(payload),
        Endpoint::Users
        | Endpoint::User
        | Endpoint::Monster
        | Endpoint::Servers
        | Endpoint::Server
        | Endpoint::Kralas
        | Endpoint::Krala
        | Endpoint::Areas
        | Endpoint::Subareas => payload,
    }
}

/// Removes every element whose "recherche" and "propose" flags are both "0"
///
/// Such a monster is neither sought nor offered by the user and carries no
/// information for trading. Elements missing either flag are retained, since
/// they cannot be shown to be irrelevant. Non-array payloads pass through.
fn drop_unlisted_monsters(payload: Value) -> Value {
    match payload {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|item| !is_unlisted(item))
                .collect(),
        ),
        other => other,
    }
}

fn is_unlisted(item: &Value) -> bool {
    matches!(
        (
            item.get("recherche").and_then(Value::as_str),
            item.get("propose").and_then(Value::as_str),
        ),
        (Some("0"), Some("0"))
    )
}

/// Removes the "zone", "type" and "id" fields from every element
///
/// Those fields repeat what the request already encodes. Removing an absent
/// field is a no-op, and non-object elements are left untouched.
fn strip_contextual_fields(payload: Value) -> Value {
    match payload {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|mut item| {
                    if let Value::Object(ref mut fields) = item {
                        fields.remove("zone");
                        fields.remove("type");
                        fields.remove("id");
                    }
                    item
                })
                .collect(),
        ),
        other => other,
    }
}
