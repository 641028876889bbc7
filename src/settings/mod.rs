//! Key/value settings shared by filters and operations
//!
//! Both `--filter` tokens and operation arguments are written as
//! `key=value`. Repeating a key accumulates values.

mod filters;

pub use filters::{Comparison, Filter, FilterSet, FilterStrategy};

use crate::error::{Error, Result};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Ordered mapping from key to one or more values
///
/// Keys keep the order in which they were first seen, values the order in
/// which they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiValuedKeys {
    entries: Vec<(String, Vec<String>)>,
}

impl MultiValuedKeys {
    /// Create an empty mapping
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse `key=value` tokens
    ///
    /// The token is split at its first `=`, so values may themselves contain
    /// `=`. Empty keys and tokens without `=` are rejected.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let mut keys = Self::new();
        for token in tokens {
            let token = token.as_ref();
            let (key, value) = token.split_once('=').ok_or_else(|| {
                Error::InvalidArgument(format!("expected key=value, got {token:?}"))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "missing key in {token:?}"
                )));
            }
            keys.insert(key, value);
        }
        Ok(keys)
    }

    /// Append `value` under `key`
    pub fn insert(&mut self, key: &str, value: &str) {
        if let Some((_, values)) = self.entries.iter_mut().find(|(k, _)| k == key) {
            values.push(value.to_string());
        } else {
            self.entries
                .push((key.to_string(), vec![value.to_string()]));
        }
    }

    /// Values stored under `key`
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Single value stored under `key`; repeating the key is an error
    pub fn get_single(&self, key: &str) -> Result<Option<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some([value]) => Ok(Some(value.as_str())),
            Some(_) => Err(Error::InvalidArgument(format!(
                "{key} may only be given once"
            ))),
        }
    }

    /// Distinct keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Every `(key, value)` pair in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Call `f` for every pair, stopping at the first error
    pub fn try_for_each<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&str, &str) -> Result<()>,
    {
        self.iter().try_for_each(|(k, v)| f(k, v))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for MultiValuedKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct KeysVisitor;

        impl<'de> Visitor<'de> for KeysVisitor {
            type Value = MultiValuedKeys;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a table of strings or string arrays")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut keys = MultiValuedKeys::new();
                while let Some((key, value)) = map.next_entry::<String, OneOrMany>()? {
                    match value {
                        OneOrMany::One(v) => keys.insert(&key, &v),
                        OneOrMany::Many(values) => {
                            if values.is_empty() {
                                return Err(de::Error::custom(format!(
                                    "{key} has no values"
                                )));
                            }
                            for v in &values {
                                keys.insert(&key, v);
                            }
                        }
                    }
                }
                Ok(keys)
            }
        }

        deserializer.deserialize_map(KeysVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tokens_preserves_order() {
        let keys =
            MultiValuedKeys::from_tokens(&["label=bug=regexA", "label=feature=regexB"]).unwrap();
        let pairs: Vec<_> = keys.iter().collect();
        assert_eq!(
            pairs,
            vec![("label", "bug=regexA"), ("label", "feature=regexB")]
        );
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_from_tokens_accumulates_per_key() {
        let keys = MultiValuedKeys::from_tokens(&["bug=crash", "docs=typo", "bug=panic"]).unwrap();
        assert_eq!(keys.keys().collect::<Vec<_>>(), vec!["bug", "docs"]);
        assert_eq!(keys.get("bug").unwrap(), ["crash", "panic"]);
        assert_eq!(
            keys.iter().collect::<Vec<_>>(),
            vec![("bug", "crash"), ("bug", "panic"), ("docs", "typo")]
        );
    }

    #[test]
    fn test_from_tokens_rejects_malformed() {
        assert!(MultiValuedKeys::from_tokens(&["novalue"]).is_err());
        assert!(MultiValuedKeys::from_tokens(&["=value"]).is_err());
    }

    #[test]
    fn test_from_tokens_allows_empty_value() {
        let keys = MultiValuedKeys::from_tokens(&["comment="]).unwrap();
        assert_eq!(keys.get_single("comment").unwrap(), Some(""));
    }

    #[test]
    fn test_get_single_rejects_repeats() {
        let keys = MultiValuedKeys::from_tokens(&["action=close", "action=ping"]).unwrap();
        assert!(keys.get_single("action").is_err());
        assert_eq!(keys.get_single("missing").unwrap(), None);
    }

    #[test]
    fn test_deserialize_one_or_many() {
        #[derive(Deserialize)]
        struct Wrapper {
            patterns: MultiValuedKeys,
        }

        let wrapper: Wrapper = toml::from_str(
            r#"
            [patterns]
            bug = ["crash", "panic"]
            docs = "typo"
            "#,
        )
        .unwrap();
        assert_eq!(wrapper.patterns.get("bug").unwrap(), ["crash", "panic"]);
        assert_eq!(wrapper.patterns.get("docs").unwrap(), ["typo"]);
    }
}
