//! Serde adapters for sets persisted as newline-delimited text.
//!
//! Serialization always produces text. Deserialization also accepts a JSON
//! array, which is how header names were stored by earlier releases.

use serde::{Deserialize, Deserializer, Serializer};

use super::normalize_set;

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Text(String),
    Items(Vec<String>),
}

impl Repr {
    fn into_set(self) -> Vec<String> {
        match self {
            Self::Text(text) => normalize_set(text.lines()),
            Self::Items(items) => normalize_set(items),
        }
    }
}

pub fn serialize<S>(items: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&items.join("\n"))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Repr::deserialize(deserializer).map(Repr::into_set)
}

/// Same as the parent module, for optional fields of a partial update.
pub mod option {
    use super::{Deserialize, Deserializer, Repr, Serializer};

    #[allow(clippy::ref_option)] // serde's `with` passes `&Option<T>`
    pub fn serialize<S>(items: &Option<Vec<String>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match items {
            Some(items) => super::serialize(items, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<Repr>::deserialize(deserializer).map(|repr| repr.map(Repr::into_set))
    }
}
