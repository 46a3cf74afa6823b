use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of hex characters kept from a fresh UUID when minting a tracking ID.
const TRACKING_ID_LEN: usize = 12;

/// Declares an opaque string identifier with the conversions every
/// identifier in the system shares.
macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates the identifier from any string. No format is enforced.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is the empty string ("unspecified").
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Consumes the identifier, returning the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_identifier! {
    /// Tracking ID of a cargo.
    ///
    /// Assigned once at booking and never changed. The only contract is
    /// uniqueness; callers must not rely on the format.
    TrackingId
}

string_identifier! {
    /// UN/LOCODE of a port, e.g. `IDJKT`. Treated as opaque; equality is byte-equal.
    UnLocode
}

string_identifier! {
    /// Number of a scheduled carrier voyage.
    VoyageNumber
}

impl TrackingId {
    /// Mints a fresh, short, uppercase tracking ID from a random UUID.
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(TRACKING_ID_LEN);
        Self(id.to_ascii_uppercase())
    }
}

/// Stored revision of a cargo, used for optimistic concurrency control.
///
/// A cargo that was never stored is at version 0; every successful upsert
/// moves it to the next version.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Version of a cargo that has not been stored yet.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
