//! Inventory items carried by a character.

use std::collections::BTreeMap;

use dnd5e_core::{DndError, DndResult, Value};
use serde::{Deserialize, Serialize};

/// One inventory entry. Items are kept in insertion order and names need
/// not be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Item name.
    pub name: String,
    /// Armor class this item grants while equipped.
    pub armor_class: Option<i32>,
    /// Whether the item is worn or wielded.
    pub equipped: bool,
    /// How many of this item are carried.
    pub quantity: i32,
    /// Weight of a single item.
    pub weight: i32,
}

impl InventoryItem {
    /// An unequipped single item with no armor class and no weight.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            armor_class: None,
            equipped: false,
            quantity: 1,
            weight: 0,
        }
    }

    /// Parse an item from its record representation.
    ///
    /// `path` prefixes field names in validation errors, e.g.
    /// `inventory_item.2`.
    pub fn from_value(value: &Value, path: &str) -> DndResult<Self> {
        let map = value.as_map().ok_or_else(|| {
            DndError::validation(path, format!("expected map, got {}", value.type_name()))
        })?;

        let name = match map.get("name") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(DndError::validation(
                    format!("{path}.name"),
                    format!("expected string, got {}", other.type_name()),
                ));
            }
            None => return Err(DndError::validation(format!("{path}.name"), "required")),
        };

        let equipped = match map.get("equipped") {
            None => false,
            Some(Value::Boolean(b)) => *b,
            Some(other) => {
                return Err(DndError::validation(
                    format!("{path}.equipped"),
                    format!("expected boolean, got {}", other.type_name()),
                ));
            }
        };

        Ok(Self {
            name,
            armor_class: int(map, path, "armor_class")?,
            equipped,
            quantity: int(map, path, "number")?.unwrap_or(1),
            weight: int(map, path, "weight")?.unwrap_or(0),
        })
    }

    /// The record representation, with defaults written out.
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::from(self.name.as_str()));
        if let Some(ac) = self.armor_class {
            map.insert("armor_class".to_string(), Value::from(ac));
        }
        map.insert("equipped".to_string(), Value::from(self.equipped));
        map.insert("number".to_string(), Value::from(self.quantity));
        map.insert("weight".to_string(), Value::from(self.weight));
        Value::Map(map)
    }
}

fn int(map: &BTreeMap<String, Value>, path: &str, key: &str) -> DndResult<Option<i32>> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Integer(n)) => i32::try_from(*n).map(Some).map_err(|_| {
            DndError::validation(format!("{path}.{key}"), format!("{n} is out of range"))
        }),
        Some(other) => Err(DndError::validation(
            format!("{path}.{key}"),
            format!("expected integer, got {}", other.type_name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> DndResult<InventoryItem> {
        let value: Value = serde_json::from_str(json).unwrap();
        InventoryItem::from_value(&value, "inventory_item.0")
    }

    #[test]
    fn defaults_applied() {
        let item = parse(r#"{"name": "Rope"}"#).unwrap();
        assert_eq!(item, InventoryItem::new("Rope"));
    }

    #[test]
    fn all_fields() {
        let json = r#"{"name":"Shield","armor_class":2,"equipped":true,"number":1,"weight":6}"#;
        let item = parse(json).unwrap();
        assert_eq!(item.armor_class, Some(2));
        assert!(item.equipped);
        assert_eq!(item.weight, 6);
    }

    #[test]
    fn missing_name_is_rejected() {
        let err = parse(r#"{"armor_class": 2}"#).unwrap_err();
        assert!(err.to_string().contains("inventory_item.0.name"));
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(parse(r#"{"name": "Shield", "equipped": "yes"}"#).is_err());
        assert!(parse(r#"{"name": "Shield", "armor_class": "2"}"#).is_err());
        assert!(parse(r#""Shield""#).is_err());
    }

    #[test]
    fn to_value_writes_defaults() {
        let value = InventoryItem::new("Torch").to_value();
        let map = value.as_map().unwrap();
        assert_eq!(map["number"], Value::Integer(1));
        assert_eq!(map["equipped"], Value::Boolean(false));
        assert!(!map.contains_key("armor_class"));
        assert_eq!(InventoryItem::from_value(&value, "x").unwrap(), InventoryItem::new("Torch"));
    }
}
