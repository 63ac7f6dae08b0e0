//! Typed values produced by the population engine and how each Rust type
//! receives them

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};

use crate::populate::descriptor::{FieldKind, TimeKind};

/// A converted configuration value, shaped by the field's [`FieldKind`]
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Instant(Timestamp),
    DateTime(DateTime),
    Date(Date),
    Seq(Vec<ConfigValue>),
    Map(Vec<(String, ConfigValue)>),
    Struct(StructValue),
}

/// Values for the fields of one struct, in descriptor order
///
/// `None` leaves the corresponding field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructValue {
    fields: Vec<Option<ConfigValue>>,
}

impl StructValue {
    pub fn new(fields: Vec<Option<ConfigValue>>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value for the field at `index`, if one was produced
    pub fn get(&self, index: usize) -> Option<&ConfigValue> {
        self.fields.get(index).and_then(Option::as_ref)
    }
}

impl IntoIterator for StructValue {
    type Item = Option<ConfigValue>;
    type IntoIter = std::vec::IntoIter<Option<ConfigValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// A Rust type that can be the target of a configuration field
///
/// `kind` tells the engine how to convert the resolved text; `assign`
/// writes the converted value. Values of the wrong shape or out of range
/// for the type are ignored.
pub trait FieldType {
    fn kind() -> FieldKind;

    fn assign(&mut self, value: ConfigValue);
}

impl FieldType for String {
    fn kind() -> FieldKind {
        FieldKind::String
    }

    fn assign(&mut self, value: ConfigValue) {
        if let ConfigValue::String(s) = value {
            *self = s;
        }
    }
}

macro_rules! integer_field {
    ($kind:ident => $($ty:ty),+) => {
        $(
            impl FieldType for $ty {
                fn kind() -> FieldKind {
                    FieldKind::$kind
                }

                fn assign(&mut self, value: ConfigValue) {
                    let converted = match value {
                        ConfigValue::Int(n) => <$ty>::try_from(n).ok(),
                        ConfigValue::UInt(n) => <$ty>::try_from(n).ok(),
                        _ => None,
                    };
                    if let Some(n) = converted {
                        *self = n;
                    }
                }
            }
        )+
    };
}

integer_field!(Int => i8, i16, i32, i64, i128, isize);
integer_field!(UInt => u8, u16, u32, u64, u128, usize);

impl FieldType for f64 {
    fn kind() -> FieldKind {
        FieldKind::Float
    }

    fn assign(&mut self, value: ConfigValue) {
        if let ConfigValue::Float(f) = value {
            *self = f;
        }
    }
}

impl FieldType for f32 {
    fn kind() -> FieldKind {
        FieldKind::Float
    }

    fn assign(&mut self, value: ConfigValue) {
        if let ConfigValue::Float(f) = value {
            *self = f as f32;
        }
    }
}

impl FieldType for bool {
    fn kind() -> FieldKind {
        FieldKind::Bool
    }

    fn assign(&mut self, value: ConfigValue) {
        if let ConfigValue::Bool(b) = value {
            *self = b;
        }
    }
}

impl FieldType for Duration {
    fn kind() -> FieldKind {
        FieldKind::Duration
    }

    fn assign(&mut self, value: ConfigValue) {
        if let ConfigValue::Duration(d) = value {
            *self = d;
        }
    }
}

impl FieldType for Timestamp {
    fn kind() -> FieldKind {
        FieldKind::Timestamp(TimeKind::Instant)
    }

    fn assign(&mut self, value: ConfigValue) {
        if let ConfigValue::Instant(ts) = value {
            *self = ts;
        }
    }
}

impl FieldType for DateTime {
    fn kind() -> FieldKind {
        FieldKind::Timestamp(TimeKind::DateTime)
    }

    fn assign(&mut self, value: ConfigValue) {
        if let ConfigValue::DateTime(dt) = value {
            *self = dt;
        }
    }
}

impl FieldType for Date {
    fn kind() -> FieldKind {
        FieldKind::Timestamp(TimeKind::Date)
    }

    fn assign(&mut self, value: ConfigValue) {
        if let ConfigValue::Date(date) = value {
            *self = date;
        }
    }
}

fn element<T: FieldType + Default>(value: ConfigValue) -> T {
    let mut item = T::default();
    item.assign(value);
    item
}

impl<T: FieldType + Default> FieldType for Vec<T> {
    fn kind() -> FieldKind {
        FieldKind::Seq(Box::new(T::kind()))
    }

    fn assign(&mut self, value: ConfigValue) {
        if let ConfigValue::Seq(items) = value {
            *self = items.into_iter().map(element::<T>).collect();
        }
    }
}

/// Absent until a value arrives; a nested struct is always allocated
impl<T: FieldType + Default> FieldType for Option<T> {
    fn kind() -> FieldKind {
        T::kind()
    }

    fn assign(&mut self, value: ConfigValue) {
        self.get_or_insert_with(T::default).assign(value);
    }
}

impl<T: FieldType> FieldType for Box<T> {
    fn kind() -> FieldKind {
        T::kind()
    }

    fn assign(&mut self, value: ConfigValue) {
        (**self).assign(value);
    }
}

impl<T: FieldType + Default> FieldType for HashMap<String, T> {
    fn kind() -> FieldKind {
        FieldKind::Map(Box::new(T::kind()))
    }

    fn assign(&mut self, value: ConfigValue) {
        if let ConfigValue::Map(entries) = value {
            *self = entries
                .into_iter()
                .map(|(key, value)| (key, element::<T>(value)))
                .collect();
        }
    }
}

impl<T: FieldType + Default> FieldType for BTreeMap<String, T> {
    fn kind() -> FieldKind {
        FieldKind::Map(Box::new(T::kind()))
    }

    fn assign(&mut self, value: ConfigValue) {
        if let ConfigValue::Map(entries) = value {
            *self = entries
                .into_iter()
                .map(|(key, value)| (key, element::<T>(value)))
                .collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_assign_checks_range() {
        let mut small: u8 = 7;
        small.assign(ConfigValue::Int(300));
        assert_eq!(small, 7);
        small.assign(ConfigValue::Int(200));
        assert_eq!(small, 200);
        small.assign(ConfigValue::Int(-1));
        assert_eq!(small, 200);

        let mut big: i64 = 0;
        big.assign(ConfigValue::UInt(42));
        assert_eq!(big, 42);
    }

    #[test]
    fn test_wrong_shape_is_ignored() {
        let mut name = "kept".to_string();
        name.assign(ConfigValue::Int(1));
        assert_eq!(name, "kept");

        let mut flag = true;
        flag.assign(ConfigValue::String("false".into()));
        assert!(flag);
    }

    #[test]
    fn test_sequence_replaces_contents() {
        let mut items = vec![9u32];
        items.assign(ConfigValue::Seq(vec![ConfigValue::UInt(1), ConfigValue::UInt(2)]));
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn test_map_collects_entries() {
        let mut limits: BTreeMap<String, f64> = BTreeMap::new();
        limits.assign(ConfigValue::Map(vec![
            ("cpu".into(), ConfigValue::Float(1.5)),
            ("mem".into(), ConfigValue::Float(4.0)),
        ]));
        assert_eq!(limits.get("cpu"), Some(&1.5));
        assert_eq!(limits.len(), 2);
    }

    #[test]
    fn test_option_is_filled_on_assign() {
        let mut port: Option<u16> = None;
        assert_eq!(<Option<u16>>::kind(), FieldKind::UInt);
        port.assign(ConfigValue::UInt(8080));
        assert_eq!(port, Some(8080));

        let mut name: Option<String> = Some("kept".into());
        name.assign(ConfigValue::Int(1));
        assert_eq!(name.as_deref(), Some("kept"));
    }

    #[test]
    fn test_box_delegates() {
        let mut timeout = Box::new(Duration::ZERO);
        assert_eq!(<Box<Duration>>::kind(), FieldKind::Duration);
        timeout.assign(ConfigValue::Duration(Duration::from_secs(3)));
        assert_eq!(*timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(<Vec<String>>::kind(), FieldKind::Seq(Box::new(FieldKind::String)));
        assert_eq!(<u16>::kind(), FieldKind::UInt);
        assert_eq!(<Duration>::kind(), FieldKind::Duration);
        assert_eq!(<Date>::kind(), FieldKind::Timestamp(TimeKind::Date));
    }

    #[test]
    fn test_struct_value_access() {
        let values = StructValue::new(vec![None, Some(ConfigValue::Bool(true))]);
        assert_eq!(values.len(), 2);
        assert_eq!(values.get(0), None);
        assert_eq!(values.get(1), Some(&ConfigValue::Bool(true)));
    }
}
