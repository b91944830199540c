//! Declarative builder for the post port error enums.
//!
//! Every failure a post port reports carries a context field (a post id, an
//! operation name or the adapter's own message), so variants are always
//! struct-like. Each variant gets a snake_case constructor whose parameters
//! take `impl Into<_>` so adapters can pass `&str` or formatted strings:
//!
//! ```ignore
//! define_port_error! {
//!     pub enum PostStoreError {
//!         Timeout { operation: String } => "post store {operation} timed out",
//!     }
//! }
//! let err = PostStoreError::timeout("scan");
//! ```

macro_rules! define_port_error {
    (
        $(#[$enum_attr:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_attr:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $display:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_attr])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_attr])*
                #[error($display)]
                $variant { $($field: $ty),+ },
            )+
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[allow(dead_code)]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                )+
            }
        }
    };
}

pub(crate) use define_port_error;
