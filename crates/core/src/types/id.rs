//! Newtype IDs for type-safe entity references.
//!
//! The commerce backend owns every entity and hands out opaque string IDs
//! (`reg_01H...`, `prod_01H...`). Use the `define_id!` macro to create wrappers
//! that prevent accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use harbor_core::define_id;
/// define_id!(RegionId);
/// define_id!(ProductId);
///
/// let region_id = RegionId::new("reg_01");
/// let product_id = ProductId::new("reg_01");
///
/// // These are different types, so this won't compile:
/// // let _: RegionId = product_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a backend identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying identifier.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(RegionId);
define_id!(ProductId);
define_id!(VariantId);
define_id!(CollectionId);
define_id!(CategoryId);
define_id!(CartId);
define_id!(LineItemId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = RegionId::new("reg_01");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"reg_01\"");

        let parsed: RegionId = serde_json::from_str("\"reg_02\"").unwrap();
        assert_eq!(parsed.as_str(), "reg_02");
    }

    #[test]
    fn test_id_display() {
        let id = CartId::from("cart_123");
        assert_eq!(id.to_string(), "cart_123");
    }
}
