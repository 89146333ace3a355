//! Closed option enumerations accepted by the Director API.
//!
//! Every enum-typed accessor parameter is a tagged variant with an explicit
//! mapping to its on-wire spelling. Parsing from a string is the validation
//! step: anything outside the allowed set is a configuration error, raised
//! before a request is ever built.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Generates a closed option enum with its wire spelling and parser.
macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $param:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Name of the accessor parameter this enum constrains.
            pub const PARAMETER: &'static str = $param;

            /// Returns the on-wire spelling.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }

            /// Returns every allowed value, in documented order.
            #[must_use]
            pub const fn all() -> &'static [Self] {
                &[ $( Self::$variant, )+ ]
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $( $wire => Ok(Self::$variant), )+
                    _ => Err(invalid_choice(
                        $param,
                        &[ $( $wire, )+ ],
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

option_enum! {
    /// Album ordering override for a single gallery fetch.
    #[derive(Default)]
    GalleryOrder, "order" {
        /// The gallery's own display order
        #[default]
        Display => "display",
        /// Album creation time
        CreatedOn => "created_on",
        /// Album modification time
        ModifiedOn => "modified_on",
    }
}

option_enum! {
    /// Field used to sort a content listing.
    #[derive(Default)]
    ContentSort, "sort_on" {
        /// Upload time
        #[default]
        CreatedOn => "created_on",
        /// Capture time from the file's metadata
        CapturedOn => "captured_on",
        /// Modification time
        ModifiedOn => "modified_on",
        /// File name
        Filename => "filename",
        /// Random order; adds a cache-busting option to the request
        Random => "random",
    }
}

option_enum! {
    /// Direction of a content listing sort.
    #[derive(Default)]
    SortDirection, "sort_direction" {
        /// Descending
        #[default]
        Desc => "desc",
        /// Ascending
        Asc => "asc",
    }
}

option_enum! {
    /// Model used to restrict a listing to members of one gallery or album.
    Scope, "scope" {
        /// Restrict to a gallery
        Gallery => "gallery",
        /// Restrict to an album
        Album => "album",
    }
}

option_enum! {
    /// Ordering of a user listing.
    #[derive(Default)]
    UserSort, "sort" {
        /// Alphabetical by name
        #[default]
        Name => "name",
        /// Most recent activity first
        Activity => "activity",
    }
}

impl SortDirection {
    /// Returns the value sent to the service, which expects upper case.
    #[must_use]
    pub const fn wire_value(&self) -> &'static str {
        match self {
            Self::Desc => "DESC",
            Self::Asc => "ASC",
        }
    }
}

impl Scope {
    /// Parses an optional scope, where an empty string means "unscoped".
    ///
    /// # Errors
    ///
    /// Returns a configuration error for any non-empty value other than
    /// `gallery` or `album`.
    pub fn parse_optional(s: &str) -> Result<Option<Self>> {
        if s.is_empty() {
            return Ok(None);
        }
        s.parse().map(Some)
    }
}

/// Serde adapter for an optional [`Scope`] where `""` means unscoped.
///
/// Use with `#[serde(default, with = "director_core::types::optional_scope")]`.
pub mod optional_scope {
    use super::Scope;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize as the wire spelling, or `null` when unscoped.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        scope: &Option<Scope>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        scope.serialize(serializer)
    }

    /// Deserialize from a string, `null` or `""`.
    ///
    /// # Errors
    ///
    /// Rejects any non-empty value other than `gallery` or `album`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Scope>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => Scope::parse_optional(&raw).map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}

fn invalid_choice(param: &str, allowed: &[&str]) -> Error {
    let quoted: Vec<String> = allowed.iter().map(|v| format!("'{v}'")).collect();
    let choices = match quoted.split_last() {
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
        None => String::new(),
    };
    Error::ConfigError(format!("{param} can only be {choices}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_order_parse() {
        assert_eq!("display".parse::<GalleryOrder>().unwrap(), GalleryOrder::Display);
        assert_eq!(
            "modified_on".parse::<GalleryOrder>().unwrap(),
            GalleryOrder::ModifiedOn
        );
        assert_eq!(GalleryOrder::default(), GalleryOrder::Display);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        assert!(matches!(
            "random".parse::<GalleryOrder>(),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            "size".parse::<ContentSort>(),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            "DESC".parse::<SortDirection>(),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!("photo".parse::<Scope>(), Err(Error::ConfigError(_))));
        assert!(matches!("email".parse::<UserSort>(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_error_message_lists_choices() {
        let err = "newest".parse::<GalleryOrder>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: order can only be 'display', 'created_on' or 'modified_on'"
        );

        let err = "up".parse::<SortDirection>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: sort_direction can only be 'desc' or 'asc'"
        );
    }

    #[test]
    fn test_every_variant_round_trips_through_wire_spelling() {
        for sort in ContentSort::all() {
            assert_eq!(sort.as_str().parse::<ContentSort>().unwrap(), *sort);
        }
        assert_eq!(ContentSort::all().len(), 5);
    }

    #[test]
    fn test_sort_direction_wire_value_is_upper_case() {
        assert_eq!(SortDirection::Desc.wire_value(), "DESC");
        assert_eq!(SortDirection::Asc.wire_value(), "ASC");
        assert_eq!(SortDirection::Asc.to_string(), "asc");
    }

    #[test]
    fn test_scope_parse_optional() {
        assert_eq!(Scope::parse_optional("").unwrap(), None);
        assert_eq!(Scope::parse_optional("album").unwrap(), Some(Scope::Album));
        assert!(Scope::parse_optional("user").is_err());
    }

    #[test]
    fn test_optional_scope_serde_adapter() {
        #[derive(Debug, Default, Serialize, Deserialize)]
        struct Filter {
            #[serde(default, with = "optional_scope")]
            scope: Option<Scope>,
        }

        let filter: Filter = serde_json::from_str(r#"{"scope":""}"#).unwrap();
        assert_eq!(filter.scope, None);

        let filter: Filter = serde_json::from_str(r#"{"scope":null}"#).unwrap();
        assert_eq!(filter.scope, None);

        let filter: Filter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter.scope, None);

        let filter: Filter = serde_json::from_str(r#"{"scope":"gallery"}"#).unwrap();
        assert_eq!(filter.scope, Some(Scope::Gallery));
        assert_eq!(
            serde_json::to_string(&filter).unwrap(),
            r#"{"scope":"gallery"}"#
        );

        let err = serde_json::from_str::<Filter>(r#"{"scope":"user"}"#).unwrap_err();
        assert!(err.to_string().contains("scope can only be 'gallery' or 'album'"));
    }

    #[test]
    fn test_serde_uses_wire_spelling() {
        let json = serde_json::to_string(&ContentSort::CapturedOn).unwrap();
        assert_eq!(json, "\"captured_on\"");

        let sort: UserSort = serde_json::from_str("\"activity\"").unwrap();
        assert_eq!(sort, UserSort::Activity);
    }

    #[test]
    fn test_parameter_names() {
        assert_eq!(GalleryOrder::PARAMETER, "order");
        assert_eq!(ContentSort::PARAMETER, "sort_on");
        assert_eq!(UserSort::PARAMETER, "sort");
    }
}
