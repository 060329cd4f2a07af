// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates manifest file name lists.

use nonempty::NonEmpty;
use serde::Deserialize;

pub fn deserialize_manifests<'de, D>(deserializer: D) -> Result<NonEmpty<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    for name in &values {
        if name.trim().is_empty() || name.contains('/') {
            return Err(serde::de::Error::custom(format!(
                "invalid manifest file name: {name:?}"
            )));
        }
    }

    NonEmpty::from_vec(values)
        .ok_or_else(|| serde::de::Error::custom("at least one manifest file name is required"))
}
