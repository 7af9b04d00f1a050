// ============================================================
// SCHEMA REGISTRY
// ============================================================
// Ordered, read-only set of known CSV types

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashSet;

use super::{BuiltinCsvType, SchemaDefinition, TypeKey};
use crate::domain::error::{AppError, Result};

static BUILTIN_REGISTRY: Lazy<SchemaRegistry> = Lazy::new(|| SchemaRegistry {
    schemas: BuiltinCsvType::ALL.iter().map(|kind| kind.definition()).collect(),
});

/// Registry of CSV schemas.
///
/// Insertion order is part of the contract: identification walks the
/// schemas in this order and the first match wins when several match.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    schemas: Vec<SchemaDefinition>,
}

impl SchemaRegistry {
    /// Build a registry, rejecting duplicate type keys.
    pub fn new(schemas: Vec<SchemaDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for schema in &schemas {
            if !seen.insert(schema.type_key.as_str()) {
                return Err(AppError::ValidationError(format!(
                    "Duplicate schema type key: {}",
                    schema.type_key
                )));
            }
        }

        Ok(Self { schemas })
    }

    /// The shipment and yard schemas, in that order.
    pub fn builtin() -> &'static SchemaRegistry {
        &BUILTIN_REGISTRY
    }

    pub fn get(&self, type_key: &str) -> Option<&SchemaDefinition> {
        self.schemas.iter().find(|s| s.type_key.as_str() == type_key)
    }

    pub fn contains(&self, type_key: &str) -> bool {
        self.get(type_key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaDefinition> {
        self.schemas.iter()
    }

    pub fn type_keys(&self) -> impl Iterator<Item = &TypeKey> {
        self.schemas.iter().map(|s| &s.type_key)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(key: &str, headers: &[&str]) -> SchemaDefinition {
        SchemaDefinition::new(key, headers.iter().map(|h| h.to_string()).collect())
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let result = SchemaRegistry::new(vec![def("a", &["x"]), def("b", &["y"]), def("a", &["z"])]);
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_preserves_insertion_order() {
        let registry = SchemaRegistry::new(vec![def("zeta", &["x"]), def("alpha", &["y"])]).unwrap();
        let keys: Vec<&str> = registry.type_keys().map(TypeKey::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_builtin_registry() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("shipment"));
        assert!(registry.contains("yard"));
        assert!(!registry.contains("receive"));
        assert_eq!(
            registry.get("shipment").map(|s| s.required_headers[1].as_str()),
            Some("出荷番号")
        );
    }
}
