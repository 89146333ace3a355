//! Query option mapping and value codec.
//!
//! Accessor parameters are normalized into [`QueryOptions`], an
//! insertion-ordered mapping of option names to string or integer values that
//! is URL-encoded onto every request.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;

/// Upper bound (inclusive) of the random-sort cache buster.
pub const CACHE_BUSTER_MAX: u32 = 1_000_000;

/// A primitive option value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionValue {
    /// String value
    Text(String),
    /// Integer value; booleans are sent as `0`/`1`
    Int(u64),
}

impl OptionValue {
    /// Encodes a boolean as the service expects it.
    #[must_use]
    pub const fn flag(value: bool) -> Self {
        Self::Int(value as u64)
    }

    /// Returns the integer value, if this is one.
    #[must_use]
    pub const fn as_int(&self) -> Option<u64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    /// Returns the string value, if this is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Int(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u64> for OptionValue {
    fn from(value: u64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        Self::Int(u64::from(value))
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::flag(value)
    }
}

/// Insertion-ordered option mapping for a single request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pairs: Vec<(String, OptionValue)>,
}

impl QueryOptions {
    /// Create a new, empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Set an option. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Set a boolean option as `0`/`1`.
    pub fn insert_flag(&mut self, key: impl Into<String>, value: bool) {
        self.insert(key, OptionValue::flag(value));
    }

    /// Set an option when the value is present.
    pub fn insert_opt<T>(&mut self, key: impl Into<String>, value: Option<T>)
    where
        T: Into<OptionValue>,
    {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Set `tags` to the comma-joined tags plus `tags_exclusive`, only when
    /// there is at least one tag.
    pub fn insert_tags(&mut self, tags: &TagList, exclusive: bool) {
        if tags.is_empty() {
            return;
        }
        self.insert("tags", tags.joined());
        self.insert_flag("tags_exclusive", exclusive);
    }

    /// Look up an option.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Returns true if the option is set.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over the options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.pairs.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Option names in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.pairs.iter().map(|(key, _)| key.as_str()).collect()
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if no options have been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// URL-encode the options as a query string (without the leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, &value.to_string());
        }
        serializer.finish()
    }

    /// Consume the builder and return the raw pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, OptionValue)> {
        self.pairs
    }
}

/// Joins any displayable values with `,`.
pub fn join_values<I>(values: I) -> String
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    values
        .into_iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Draws a fresh cache buster for a random-sort request.
///
/// The value is uniform over `1..=CACHE_BUSTER_MAX` and differs per call; it
/// only exists to defeat intermediate caches.
#[must_use]
pub fn cache_buster() -> u32 {
    rand::rng().random_range(1..=CACHE_BUSTER_MAX)
}

/// Generates a "one or many" list type that a bare scalar converts into.
macro_rules! one_or_many {
    ($(#[$meta:meta])* $name:ident, $item:ty, [$($scalar:ty => $convert:expr),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Vec<$item>);

        impl $name {
            /// Create an empty list.
            #[must_use]
            pub const fn new() -> Self {
                Self(Vec::new())
            }

            /// Returns true if the list has no entries.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Number of entries.
            #[must_use]
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Entries in order.
            #[must_use]
            pub fn as_slice(&self) -> &[$item] {
                &self.0
            }

            /// Comma-joined wire form.
            #[must_use]
            pub fn joined(&self) -> String {
                join_values(&self.0)
            }
        }

        $(
            impl From<$scalar> for $name {
                fn from(value: $scalar) -> Self {
                    let convert: fn($scalar) -> $item = $convert;
                    Self(vec![convert(value)])
                }
            }

            impl From<Vec<$scalar>> for $name {
                fn from(values: Vec<$scalar>) -> Self {
                    let convert: fn($scalar) -> $item = $convert;
                    Self(values.into_iter().map(convert).collect())
                }
            }

            impl<const N: usize> From<[$scalar; N]> for $name {
                fn from(values: [$scalar; N]) -> Self {
                    let convert: fn($scalar) -> $item = $convert;
                    Self(values.into_iter().map(convert).collect())
                }
            }
        )+

        impl FromIterator<$item> for $name {
            fn from_iter<I: IntoIterator<Item = $item>>(iter: I) -> Self {
                Self(iter.into_iter().collect())
            }
        }
    };
}

one_or_many! {
    /// One or more tags used to filter a listing.
    TagList, String, [
        String => |tag| tag,
        &'static str => |tag: &'static str| tag.to_string(),
    ]
}

one_or_many! {
    /// One or more numeric ids, e.g. galleries to exclude.
    IdList, u64, [
        u64 => |id| id,
        u32 => |id: u32| u64::from(id),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_order_and_replaces_in_place() {
        let mut options = QueryOptions::new();
        options.insert("limit", 0u32);
        options.insert("order", "display");
        options.insert("limit", 10u32);

        assert_eq!(options.keys(), vec!["limit", "order"]);
        assert_eq!(options.get("limit"), Some(&OptionValue::Int(10)));
    }

    #[test]
    fn booleans_serialize_as_zero_or_one() {
        let mut options = QueryOptions::new();
        options.insert_flag("with_content", true);
        options.insert("only_active", false);

        assert_eq!(options.to_query_string(), "with_content=1&only_active=0");
    }

    #[test]
    fn insert_opt_skips_none() {
        let mut options = QueryOptions::new();
        options.insert_opt("scope_id", Option::<u64>::None);
        assert!(options.is_empty());
    }

    #[test]
    fn query_string_is_form_encoded() {
        let mut options = QueryOptions::new();
        options.insert("size[1]", "thumb,150,120,1,75,1");
        options.insert("tags", "new york");

        assert_eq!(
            options.to_query_string(),
            "size%5B1%5D=thumb%2C150%2C120%2C1%2C75%2C1&tags=new+york"
        );
    }

    #[test]
    fn tags_and_flag_emitted_together() {
        let mut options = QueryOptions::new();
        let tags = TagList::from(vec!["vacation", "summer"]);
        options.insert_tags(&tags, false);

        assert_eq!(
            options.get("tags"),
            Some(&OptionValue::Text("vacation,summer".to_string()))
        );
        assert_eq!(options.get("tags_exclusive"), Some(&OptionValue::Int(0)));
    }

    #[test]
    fn empty_tags_emit_nothing() {
        let mut options = QueryOptions::new();
        options.insert_tags(&TagList::new(), true);
        assert!(options.is_empty());
    }

    #[test]
    fn bare_scalar_becomes_list_of_one() {
        assert_eq!(TagList::from("vacation").as_slice(), ["vacation".to_string()]);
        assert_eq!(IdList::from(81173u64).as_slice(), [81173]);
    }

    #[test]
    fn ids_join_with_commas() {
        assert_eq!(IdList::from([81173u64, 81146]).joined(), "81173,81146");
    }

    #[test]
    fn empty_strings_inside_tags_are_kept() {
        assert_eq!(TagList::from(["a", "b", ""]).joined(), "a,b,");
    }

    #[test]
    fn lists_deserialize_from_plain_arrays() {
        let tags: TagList = serde_json::from_str(r#"["suv","porsche"]"#).unwrap();
        assert_eq!(tags.joined(), "suv,porsche");

        let ids: IdList = serde_json::from_str("[81173,81146]").unwrap();
        assert_eq!(serde_json::to_string(&ids).unwrap(), "[81173,81146]");
    }

    #[test]
    fn cache_buster_stays_in_range() {
        for _ in 0..1000 {
            let buster = cache_buster();
            assert!((1..=CACHE_BUSTER_MAX).contains(&buster));
        }
    }
}
