//! Newtype IDs for type-safe record references.
//!
//! The hosted backend keys every row by UUID. Use the `define_id!` macro to
//! create wrappers that keep IDs of different tables apart.

use uuid::Uuid;

/// Macro to define a type-safe UUID wrapper.
///
/// Creates a newtype wrapper around [`Uuid`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_uuid()`
/// - `From<Uuid>`, `Into<Uuid>`, `Display` and `FromStr` implementations
///
/// # Example
///
/// ```rust
/// # use portfolio_admin_core::define_id;
/// define_id!(ProjectId);
/// define_id!(PostId);
///
/// let id: ProjectId = "7f1c2b0e-8a8f-4a53-9d3e-0c1b2a3d4e5f".parse().unwrap();
/// assert_eq!(id.to_string(), "7f1c2b0e-8a8f-4a53-9d3e-0c1b2a3d4e5f");
///
/// // These are different types, so this won't compile:
/// // let _: PostId = id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($crate::uuid::Uuid);

        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub const fn new(id: $crate::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> $crate::uuid::Uuid {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::uuid::Error;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                $crate::uuid::Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl From<$crate::uuid::Uuid> for $name {
            fn from(id: $crate::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $crate::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(RecordId);
define_id!(AdminUserId);

impl RecordId {
    /// Generate a fresh random ID (useful for fixtures and optimistic drafts).
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}
