use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field (`None`, via `#[serde(default)]`) from an
/// explicit `null` (`Some(None)`).
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
