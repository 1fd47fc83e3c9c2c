//! Field adapters for ids the server may send as JSON numbers or strings

use serde::{Deserialize, Deserializer};

/// Accept `"42"` or `42`, keep it as a string
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "string_or_number")]
        id: String,
    }

    #[test]
    fn test_string_or_number() {
        let row: Row = serde_json::from_value(json!({ "id": 7 })).unwrap();
        assert_eq!(row.id, "7");
        let row: Row = serde_json::from_value(json!({ "id": "abc" })).unwrap();
        assert_eq!(row.id, "abc");
        assert!(serde_json::from_value::<Row>(json!({ "id": null })).is_err());
        assert!(serde_json::from_value::<Row>(json!({ "id": [1] })).is_err());
    }
}
