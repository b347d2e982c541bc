//! Strongly-typed integer identifiers for Morpheus records.
//!
//! The API identifies records by 64-bit integers. Wrapping each kind in its
//! own type keeps a tenant id from being passed where a blueprint id is
//! expected, while still serializing as a bare JSON number.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Macro to generate strongly-typed id wrapper types.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new id wrapper.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw id.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }

            /// Parses an id from a string.
            ///
            /// # Errors
            ///
            /// Returns an error if the string is not a 64-bit integer.
            pub fn parse_str(input: &str) -> Result<Self> {
                input
                    .trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| Error::InvalidId(input.to_string()))
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(wrapper: $name) -> Self {
                wrapper.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(BlueprintId, "Blueprint id");
id_type!(UserId, "User id");
id_type!(TenantId, "Tenant (account) id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_number() {
        assert_eq!(BlueprintId::new(42).to_string(), "42");
        assert_eq!(TenantId::from(-1).to_string(), "-1");
    }

    #[test]
    fn test_parse() {
        assert_eq!("17".parse::<BlueprintId>().unwrap(), BlueprintId::new(17));
        assert_eq!(UserId::parse_str(" 3 ").unwrap().get(), 3);
        assert!(matches!(
            "abc".parse::<BlueprintId>(),
            Err(Error::InvalidId(_))
        ));
        let err = TenantId::parse_str("12x").unwrap_err();
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_serde_transparent() {
        let id: BlueprintId = serde_json::from_str("9007199254740993").unwrap();
        assert_eq!(id.get(), 9_007_199_254_740_993);
        assert_eq!(serde_json::to_string(&id).unwrap(), "9007199254740993");
    }

    #[test]
    fn test_conversions() {
        let id = UserId::from(5);
        let raw: i64 = id.into();
        assert_eq!(raw, 5);
        assert_eq!(UserId::default().get(), 0);
    }
}
