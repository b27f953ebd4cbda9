//! Value types that end up in URLs and request bodies.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Characters left as-is when a literal is placed in a URL.
///
/// This is the `encodeURI` unreserved set, minus `&`, `#` and `+`, which
/// would otherwise end a query parameter early or change its meaning.
const URL_LITERAL: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'=')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub(crate) fn encode_url(text: &str) -> String {
    utf8_percent_encode(text, URL_LITERAL).to_string()
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Types that have a canonical literal form.
pub trait ToLiteral {
    /// The literal text, before URL encoding.
    fn to_literal(&self) -> String;
}

impl<T: ToLiteral + ?Sized> ToLiteral for &T {
    fn to_literal(&self) -> String {
        (**self).to_literal()
    }
}

impl ToLiteral for str {
    fn to_literal(&self) -> String {
        quote(self)
    }
}

impl ToLiteral for String {
    fn to_literal(&self) -> String {
        quote(self)
    }
}

impl ToLiteral for bool {
    fn to_literal(&self) -> String {
        self.to_string()
    }
}

macro_rules! natural_literal {
    ($($ty:ty),*) => {
        $(impl ToLiteral for $ty {
            fn to_literal(&self) -> String {
                self.to_string()
            }
        })*
    };
}

natural_literal!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

macro_rules! float_literal {
    ($($ty:ty),*) => {
        $(impl ToLiteral for $ty {
            fn to_literal(&self) -> String {
                if self.is_nan() {
                    "NaN".to_string()
                } else if self.is_infinite() {
                    let text = if self.is_sign_positive() { "INF" } else { "-INF" };
                    text.to_string()
                } else {
                    self.to_string()
                }
            }
        })*
    };
}

float_literal!(f32, f64);

impl<T: ToLiteral> ToLiteral for Option<T> {
    fn to_literal(&self) -> String {
        match self {
            Some(value) => value.to_literal(),
            None => "null".to_string(),
        }
    }
}

impl ToLiteral for NaiveDate {
    fn to_literal(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl<Tz: TimeZone> ToLiteral for DateTime<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn to_literal(&self) -> String {
        self.to_rfc3339()
    }
}

/// A value rendered in its canonical literal form.
///
/// Every comparison value, key and function parameter goes through this type
/// so there is exactly one encoding path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(String);

impl Literal {
    /// The literal for a value with a known literal form.
    pub fn of(value: impl ToLiteral) -> Self {
        Self(value.to_literal())
    }

    /// The literal for any serializable value.
    ///
    /// Strings are quoted, numbers and booleans are rendered naturally and
    /// objects or arrays become compact JSON.
    pub fn json<V: Serialize + ?Sized>(value: &V) -> Result<Self> {
        let json = serde_json::to_value(value).map_err(|e| Error::UnsupportedLiteral {
            type_name: std::any::type_name::<V>(),
            message: e.to_string(),
        })?;
        Ok(Self::from_json(&json))
    }

    fn from_json(value: &Value) -> Self {
        let text = match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => quote(s),
            other => other.to_string(),
        };
        Self(text)
    }

    /// Use `text` verbatim.
    pub fn raw(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The literal percent-encoded for use in a URL.
    pub fn to_url_string(&self) -> String {
        encode_url(&self.0)
    }
}

impl ToLiteral for Literal {
    fn to_literal(&self) -> String {
        self.0.clone()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A property path such as `Address/City`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path(Vec<String>);

impl Path {
    pub fn new<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(elements.into_iter().map(Into::into).collect())
    }

    /// Append one more segment.
    pub fn then(mut self, element: impl Into<String>) -> Self {
        self.0.push(element.into());
        self
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// The address of an entity, used for `@odata.bind` and `$ref` requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding(String);

impl Binding {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_url_string(&self) -> String {
        encode_url(&self.0)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A qualified type name, as used in `@odata.type` annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    namespace: &'static str,
    name: &'static str,
}

impl TypeName {
    pub const fn new(namespace: &'static str, name: &'static str) -> Self {
        Self { namespace, name }
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The `@odata.type` annotation value, `#Namespace.Name`.
    pub fn annotation(&self) -> String {
        format!("#{self}")
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// A date or date-time value kept in its wire form.
///
/// Holds `Edm.Date` (`2024-05-01`) and `Edm.DateTimeOffset`
/// (`2024-05-01T10:00:00Z`) values alike; the accessors convert to `chrono`
/// types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateValue(String);

impl DateValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.to_literal())
    }

    pub fn from_datetime<Tz: TimeZone>(value: DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self(value.to_rfc3339())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse as a calendar date. Date-times yield their date part.
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d")
            .ok()
            .or_else(|| self.to_datetime().map(|dt| dt.date_naive()))
    }

    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.0).ok()
    }
}

impl ToLiteral for DateValue {
    fn to_literal(&self) -> String {
        self.0.clone()
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_strings_are_quoted() {
        assert_eq!(Literal::of("x").as_str(), "'x'");
        assert_eq!(Literal::of(String::from("O'Neil")).as_str(), "'O''Neil'");
    }

    #[test]
    fn test_numbers_and_booleans_are_natural() {
        assert_eq!(Literal::of(5).as_str(), "5");
        assert_eq!(Literal::of(2.5).as_str(), "2.5");
        assert_eq!(Literal::of(true).as_str(), "true");
        assert_eq!(Literal::of(f64::INFINITY).as_str(), "INF");
        assert_eq!(Literal::of(None::<i32>).as_str(), "null");
    }

    #[test]
    fn test_url_string_escapes_spaces_and_separators() {
        assert_eq!(Literal::of("a b").to_url_string(), "'a%20b'");
        assert_eq!(Literal::of("a&b").to_url_string(), "'a%26b'");
        assert_eq!(Literal::of("x").to_url_string(), "'x'");
    }

    #[test]
    fn test_json_literals() {
        assert_eq!(Literal::json("x").unwrap().as_str(), "'x'");
        assert_eq!(Literal::json(&[1, 2]).unwrap().as_str(), "[1,2]");
    }

    #[test]
    fn test_json_rejects_unrepresentable_values() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1);
        let err = Literal::json(&map).unwrap_err();
        assert!(matches!(err, Error::UnsupportedLiteral { .. }));
    }

    #[test]
    fn test_path_and_type_name() {
        assert_eq!(Path::new(["Address", "City"]).to_string(), "Address/City");
        let ty = TypeName::new("Sales", "Customer");
        assert_eq!(ty.to_string(), "Sales.Customer");
        assert_eq!(ty.annotation(), "#Sales.Customer");
    }

    #[test]
    fn test_date_value_conversions() {
        let date = DateValue::new("2024-05-01");
        assert_eq!(date.to_date(), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(Literal::of(&date).as_str(), "2024-05-01");

        let stamp = DateValue::new("2024-05-01T10:00:00+02:00");
        assert_eq!(stamp.to_date(), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(stamp.to_datetime().is_some());
    }
}
