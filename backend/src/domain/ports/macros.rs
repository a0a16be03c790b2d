//! Helper macro for declaring port error enums.
//!
//! Each variant gets a `thiserror` message and a snake-case constructor whose
//! arguments accept anything convertible into the field type.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum CataloguePortError {
            Connection { message: String } => "catalogue connection failed: {message}",
            Conflict { id: i32 } => "catalogue conflict on {id}",
            Query { message: String, attempts: u32 } => "catalogue query failed: {message} ({attempts})",
            Closed => "catalogue closed",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = CataloguePortError::connection("refused");
        assert_eq!(err.to_string(), "catalogue connection failed: refused");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = CataloguePortError::conflict(7);
        assert_eq!(err.to_string(), "catalogue conflict on 7");
    }

    #[test]
    fn constructors_support_mixed_and_unit_variants() {
        let err = CataloguePortError::query("timeout", 2_u32);
        assert_eq!(err.to_string(), "catalogue query failed: timeout (2)");
        assert_eq!(CataloguePortError::closed(), CataloguePortError::Closed);
    }
}
