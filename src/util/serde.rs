use serde::{Deserialize, Deserializer};

/// Deserializes a field that distinguishes between being absent
/// (`None`), explicitly `null` (`Some(None)`) and set (`Some(Some(_))`).
///
/// Must be paired with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
