//! Versioned JSON envelope around the item list
//!
//! Current format (version 1):
//! ```json
//! { "version": 1, "items": [ { "id": "...", "name": "Milk", "quantity": 2,
//!                              "purchased": false, "createdAt": 1700000000000 } ] }
//! ```
//! Version 0 is a bare JSON array of items with no envelope; it is migrated on read.
//! Edit mode is never written.

use serde::{Deserialize, Serialize};

use crate::consts::ENVELOPE_VERSION;
use crate::error::{PersistError, Result};
use crate::list::Item;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    items: &'a [Item],
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    #[serde(default)]
    items: Vec<Item>,
}

enum Stored {
    Enveloped(Envelope),
    Bare(Vec<Item>),
}

/// Serialize items into the current envelope
pub fn encode(items: &[Item]) -> Result<String> {
    serde_json::to_string(&EnvelopeRef {
        version: ENVELOPE_VERSION,
        items,
    })
    .map_err(PersistError::Encode)
}

/// Parse a stored envelope (any supported version) back into items
pub fn decode(json: &str) -> Result<Vec<Item>> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(PersistError::Decode)?;
    let stored = if value.is_array() {
        Stored::Bare(serde_json::from_value(value).map_err(PersistError::Decode)?)
    } else {
        Stored::Enveloped(serde_json::from_value(value).map_err(PersistError::Decode)?)
    };
    migrate(stored)
}

fn migrate(stored: Stored) -> Result<Vec<Item>> {
    match stored {
        Stored::Bare(items) => {
            log::info!(
                "Migrating un-enveloped list ({} items) to version {}",
                items.len(),
                ENVELOPE_VERSION
            );
            Ok(items)
        }
        Stored::Enveloped(envelope) if envelope.version > ENVELOPE_VERSION => {
            Err(PersistError::UnsupportedVersion {
                found: envelope.version,
                supported: ENVELOPE_VERSION,
            })
        }
        Stored::Enveloped(envelope) => Ok(envelope.items),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::ItemId;

    fn sample() -> Vec<Item> {
        vec![
            Item {
                id: ItemId::from("1700000000001abcdefghi"),
                name: "Bread".into(),
                quantity: 1,
                purchased: true,
                created_at: 1_700_000_000_001,
            },
            Item {
                id: ItemId::from("1700000000000zyxwvuts0"),
                name: "Milk".into(),
                quantity: 2,
                purchased: false,
                created_at: 1_700_000_000_000,
            },
        ]
    }

    #[test]
    fn test_encode_has_version_and_no_edit_state() {
        let json = encode(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["items"].as_array().unwrap().len(), 2);
        assert!(value.get("editingItemId").is_none());
    }

    #[test]
    fn test_decode_current() {
        let items = sample();
        assert_eq!(decode(&encode(&items).unwrap()).unwrap(), items);
    }

    #[test]
    fn test_decode_bare_array() {
        let json = r#"[{"id":"a1","name":"Eggs","quantity":12,"purchased":false,"createdAt":5}]"#;
        let items = decode(json).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Eggs");
    }

    #[test]
    fn test_decode_rejects_newer_version() {
        let err = decode(r#"{"version":7,"items":[]}"#).unwrap_err();
        assert!(matches!(err, PersistError::UnsupportedVersion { found: 7, supported: 1 }));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode("{not json"), Err(PersistError::Decode(_))));
        assert!(matches!(decode(r#"{"items":[]}"#), Err(PersistError::Decode(_))));
        assert!(matches!(
            decode(r#"{"version":1,"items":[{"id":"x","name":"n","quantity":-1,"createdAt":0}]}"#),
            Err(PersistError::Decode(_))
        ));
    }
}
