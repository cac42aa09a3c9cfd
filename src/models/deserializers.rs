use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Custom deserializer for epoch timestamps that accepts integers or numeric strings (seconds)
pub fn deserialize_epoch_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| Error::custom("invalid timestamp")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| Error::custom(format!("invalid timestamp string: {}", e))),
        _ => Err(Error::custom("timestamp must be a number or string")),
    }
}

/// The hub reports `mci: null` for some historical messages; those read as 0
pub fn deserialize_sequence_index<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<u64>::deserialize(deserializer)?;
    Ok(value.unwrap_or(0))
}
