/*!
 * Serde utilities for configuration values that users write in more than
 * one shape.
 */

use serde::{Deserialize, Deserializer};

/// Deserialize a whole number of seconds that may be written as a number or a string.
///
/// ```yaml
/// request_timeout_seconds: 30     # Direct integer
/// request_timeout_seconds: "30"   # Quoted integer
/// ```
///
/// Negative and fractional values are rejected rather than truncated.
pub fn deserialize_seconds<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value = serde_yaml::Value::deserialize(deserializer)?;
    match value {
        serde_yaml::Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("Expected whole seconds, found: {n}"))),
        serde_yaml::Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| D::Error::custom(format!("Cannot parse '{s}' as whole seconds"))),
        other => Err(D::Error::custom(format!(
            "Expected seconds as number or string, found: {other:?}"
        ))),
    }
}
