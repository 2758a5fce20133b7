//! Canonical string form of values embedded in URLs
//!
//! Path segments and query values go through the same conversion before they
//! are percent-encoded:
//!
//! | value                         | string form                         |
//! |-------------------------------|-------------------------------------|
//! | `None`                        | empty string                        |
//! | enum with a wire name         | the wire name                       |
//! | enum without a wire name      | decimal ordinal                     |
//! | `bool`                        | `true` / `false`                    |
//! | [`Bytes`]                     | standard base64                     |
//! | slice, `Vec`, array           | comma-joined elements               |
//! | numbers, strings, dates       | locale-invariant text               |

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use chrono::NaiveDate;

/// A value that can be placed in a URL path segment or query parameter
pub trait ParamValue {
    /// Canonical string form, before percent-encoding
    fn to_param(&self) -> String;
}

/// An enumeration with an optional explicit wire name per variant
pub trait WireEnum {
    /// Name the API expects for this variant, if it has one
    fn wire_name(&self) -> Option<&'static str>;

    /// Declaration ordinal, used when there is no wire name
    fn ordinal(&self) -> i64;
}

/// String form of an enum variant: its wire name, else its ordinal
pub fn enum_param<E: WireEnum + ?Sized>(value: &E) -> String {
    value
        .wire_name()
        .map(str::to_string)
        .unwrap_or_else(|| value.ordinal().to_string())
}

impl ParamValue for str {
    fn to_param(&self) -> String {
        self.to_string()
    }
}

impl ParamValue for String {
    fn to_param(&self) -> String {
        self.clone()
    }
}

impl ParamValue for char {
    fn to_param(&self) -> String {
        self.to_string()
    }
}

impl ParamValue for bool {
    fn to_param(&self) -> String {
        let text = if *self { "true" } else { "false" };
        text.to_string()
    }
}

macro_rules! display_param {
    ($($ty:ty),*) => {
        $(
            impl ParamValue for $ty {
                fn to_param(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_param!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl ParamValue for Bytes {
    fn to_param(&self) -> String {
        STANDARD.encode(self)
    }
}

impl ParamValue for NaiveDate {
    fn to_param(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl<T: ParamValue> ParamValue for Option<T> {
    fn to_param(&self) -> String {
        self.as_ref().map(ParamValue::to_param).unwrap_or_default()
    }
}

impl<T: ParamValue + ?Sized> ParamValue for &T {
    fn to_param(&self) -> String {
        (**self).to_param()
    }
}

impl<T: ParamValue> ParamValue for [T] {
    fn to_param(&self) -> String {
        self.iter()
            .map(ParamValue::to_param)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl<T: ParamValue> ParamValue for Vec<T> {
    fn to_param(&self) -> String {
        self.as_slice().to_param()
    }
}

impl<T: ParamValue, const N: usize> ParamValue for [T; N] {
    fn to_param(&self) -> String {
        self.as_slice().to_param()
    }
}
