// ============================================================
// SCHEMA DEFINITIONS
// ============================================================
// Named CSV types and the headers each one requires

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a CSV type, e.g. `shipment`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(String);

impl TypeKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for TypeKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<BuiltinCsvType> for TypeKey {
    fn from(kind: BuiltinCsvType) -> Self {
        Self::new(kind.key())
    }
}

/// CSV types shipped with the default registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinCsvType {
    /// Outbound shipment ledger (出荷一覧)
    Shipment,

    /// Yard ledger (ヤード一覧)
    Yard,
}

impl BuiltinCsvType {
    pub const ALL: [BuiltinCsvType; 2] = [BuiltinCsvType::Shipment, BuiltinCsvType::Yard];

    pub fn key(&self) -> &'static str {
        match self {
            BuiltinCsvType::Shipment => "shipment",
            BuiltinCsvType::Yard => "yard",
        }
    }

    pub fn required_headers(&self) -> &'static [&'static str] {
        match self {
            BuiltinCsvType::Shipment => &["伝票日付", "出荷番号", "取引先名", "業者CD", "業者名"],
            BuiltinCsvType::Yard => &["伝票日付", "取引先名", "品名", "正味重量", "数量"],
        }
    }

    pub fn definition(&self) -> SchemaDefinition {
        SchemaDefinition::new(
            *self,
            self.required_headers().iter().map(|h| h.to_string()).collect(),
        )
    }
}

impl fmt::Display for BuiltinCsvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One registered CSV type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub type_key: TypeKey,

    /// Headers a file must contain, in display order
    pub required_headers: Vec<String>,
}

impl SchemaDefinition {
    pub fn new(type_key: impl Into<TypeKey>, required_headers: Vec<String>) -> Self {
        Self {
            type_key: type_key.into(),
            required_headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keys_are_distinct() {
        let keys: Vec<TypeKey> = BuiltinCsvType::ALL.iter().map(|k| TypeKey::from(*k)).collect();
        assert_eq!(keys, vec![TypeKey::from("shipment"), TypeKey::from("yard")]);
    }

    #[test]
    fn test_builtin_definition_carries_headers() {
        let def = BuiltinCsvType::Yard.definition();
        assert_eq!(def.type_key.as_str(), "yard");
        assert_eq!(def.required_headers.len(), 5);
        assert_eq!(def.required_headers[2], "品名");
    }

    #[test]
    fn test_type_key_serializes_as_plain_string() {
        let json = serde_json::to_string(&TypeKey::from("shipment")).unwrap();
        assert_eq!(json, "\"shipment\"");
    }
}
