//! model/record.rs
//! `persist_record!`: `Persist` for plain structs whose fields all persist.
//!
//! ```ignore
//! struct Point { x: i64, y: i64 }
//! objio::persist_record!(Point => "point" { x, y });
//! ```
//!
//! Fields are written in the listed order and read back by name.

#[macro_export]
macro_rules! persist_record {
    ($ty:ty => $name:literal { $($field:ident),* $(,)? }) => {
        impl $crate::model::Persist for $ty {
            fn descriptor() -> $crate::model::TypeDescriptor {
                $crate::model::TypeDescriptor::named($name)
            }

            fn encode(
                &self,
                enc: &mut $crate::model::Encoder<'_>,
            ) -> ::std::result::Result<$crate::model::Value, $crate::types::EncodeError> {
                let rec = enc.record();
                $( let rec = rec.field(stringify!($field), &self.$field)?; )*
                Ok(rec.finish())
            }

            #[allow(unused_variables)]
            fn decode<'d>(
                value: &'d $crate::model::Value,
                dec: &mut $crate::model::Decoder<'d>,
            ) -> ::std::result::Result<Self, $crate::types::DecodeError> {
                let fields = dec.record(value)?;
                Ok(Self { $( $field: dec.field(&fields, stringify!($field))?, )* })
            }
        }
    };
}
