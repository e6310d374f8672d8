//! `define_port_error!` generates a `thiserror` enum plus snake_case
//! constructors accepting `impl Into<T>` for every field.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum ChatRepositoryError {
//!         Connection { message: String } => "chat store unavailable: {message}",
//!     }
//! }
//! let err = ChatRepositoryError::connection("refused");
//! ```

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_args $variant [] [] $( $field : $ty, )*);
    };

    (@ctor_args $variant:ident [$($params:tt)*] [$($inits:tt)*]) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_args $variant:ident [$($params:tt)*] [$($inits:tt)*] $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_args
            $variant
            [$($params)* $field: impl Into<$ty>,]
            [$($inits)* $field: $field.into(),]
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
    define_port_error! {
        pub enum SamplePortError {
            Offline => "store offline",
            Query { message: String } => "query failed: {message}",
            Status { status: u16, message: String } => "status {status}: {message}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SamplePortError::offline().to_string(), "store offline");
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(
            SamplePortError::query("timeout").to_string(),
            "query failed: timeout"
        );
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = SamplePortError::status(503_u16, "busy");
        assert_eq!(
            err,
            SamplePortError::Status {
                status: 503,
                message: "busy".to_owned()
            }
        );
    }
}
