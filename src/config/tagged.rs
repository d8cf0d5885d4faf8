//! `do`-discriminated (de)serialization for rule entries.
//!
//! A rule entry is a mapping whose `do` key names its variant; the other keys
//! are the variant's parameters. Known kinds deserialize into their payload
//! structs, unknown kinds are kept verbatim.

use serde::de::{self, Deserialize, DeserializeOwned, Deserializer};
use serde::ser::{self, Serialize, Serializer};
use serde_yaml::{Mapping, Value};

/// Discriminator key of every rule entry.
pub const TAG_KEY: &str = "do";

/// A type represented as a `do`-tagged mapping.
pub(crate) trait Tagged: Sized {
    /// The `do` value of this entry.
    fn kind(&self) -> &str;

    /// The entry's parameters, without the `do` key.
    fn params(&self) -> Result<Value, serde_yaml::Error>;

    /// Rebuild an entry from its kind and parameters.
    fn from_parts(kind: String, params: Mapping) -> Result<Self, serde_yaml::Error>;
}

/// Split a tagged entry into its kind and remaining parameters.
pub(crate) fn split(mut entry: Mapping) -> Result<(String, Mapping), String> {
    match entry.remove(TAG_KEY) {
        Some(Value::String(kind)) => Ok((kind, entry)),
        Some(other) => Err(format!("`{}` must be a string, found {:?}", TAG_KEY, other)),
        None => Err(format!("rule entry is missing `{}`", TAG_KEY)),
    }
}

/// Join a kind and its parameters back into one mapping, `do` first.
pub(crate) fn join(kind: &str, params: Value) -> Result<Mapping, String> {
    let mut entry = Mapping::new();
    entry.insert(Value::from(TAG_KEY), Value::from(kind));

    match params {
        Value::Mapping(map) => {
            for (key, value) in map {
                entry.insert(key, value);
            }
        }
        Value::Null => {}
        other => {
            return Err(format!(
                "parameters of `{}` must be a mapping, found {:?}",
                kind, other
            ));
        }
    }

    Ok(entry)
}

/// Deserialize a variant payload from its parameters.
pub(crate) fn payload<T: DeserializeOwned>(params: Mapping) -> Result<T, serde_yaml::Error> {
    serde_yaml::from_value(Value::Mapping(params))
}

pub(crate) fn serialize<T, S>(entry: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Tagged,
    S: Serializer,
{
    let params = entry.params().map_err(ser::Error::custom)?;
    join(entry.kind(), params)
        .map_err(ser::Error::custom)?
        .serialize(serializer)
}

pub(crate) fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Tagged,
    D: Deserializer<'de>,
{
    let entry = Mapping::deserialize(deserializer)?;
    let (kind, params) = split(entry).map_err(de::Error::custom)?;
    T::from_parts(kind, params).map_err(de::Error::custom)
}
