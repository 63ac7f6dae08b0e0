//! Typed population engine
//!
//! The engine walks the descriptor tree of a destination, resolves a raw
//! string for every leaf through a [`Resolve`] implementation and converts
//! it by field kind. Nested structs extend the path of their fields;
//! sequences and maps of structs extend it with an index or key.
//!
//! The whole tree is resolved before anything is written, so a failed call
//! leaves the destination as it was.

pub mod convert;
pub mod descriptor;
pub mod value;

use crate::error::{ConfigError, Result};
use crate::path::ConfigPath;
use crate::source::Resolve;

pub use descriptor::{Configurable, Destination, FieldDescriptor, FieldKind, TimeKind};
pub use value::{ConfigValue, FieldType, StructValue};

/// Fills [`Configurable`] destinations from a resolver
pub struct Populator<'r, R: Resolve + ?Sized> {
    resolver: &'r R,
}

impl<'r, R: Resolve + ?Sized> Populator<'r, R> {
    pub fn new(resolver: &'r R) -> Self {
        Self { resolver }
    }

    /// Populate `destination`, which must be `&mut T`
    ///
    /// A struct passed by value fails with [`ConfigError::NotAPointer`].
    pub fn populate<D: Destination>(&self, destination: D) -> Result<()> {
        destination.populate_with(self)
    }

    /// Resolve every field of `T` and write the results into `target`
    pub fn populate_target<T: Configurable>(&self, target: &mut T) -> Result<()> {
        let fields = T::describe();
        let values = self.resolve_struct(&fields, &ConfigPath::root())?;
        target.apply(values);
        Ok(())
    }

    fn resolve_struct(&self, fields: &[FieldDescriptor], prefix: &ConfigPath) -> Result<StructValue> {
        fields
            .iter()
            .map(|field| self.resolve_field(field, &field.path(prefix)))
            .collect::<Result<Vec<_>>>()
            .map(StructValue::new)
    }

    fn resolve_field(&self, field: &FieldDescriptor, path: &ConfigPath) -> Result<Option<ConfigValue>> {
        if let FieldKind::Struct(fields) = &field.kind {
            return self.resolve_struct(fields, path).map(|s| Some(ConfigValue::Struct(s)));
        }

        let mut raw = self.resolver.get(path);
        if raw.is_empty() {
            if let Some(default) = &field.default {
                raw = default.clone();
            }
        }
        if raw.is_empty() && field.required {
            return Err(ConfigError::missing(path.dotted()));
        }

        let layout = field.layout.as_deref();
        let value = match &field.kind {
            FieldKind::Seq(element) => self.sequence(field, element, path, &raw)?,
            FieldKind::Map(element) => self.map(element, path, &raw, layout)?,
            kind => {
                let value = convert::scalar(kind, &raw, layout);
                if field.required && is_zero(value.as_ref()) {
                    return Err(ConfigError::missing(path.dotted()));
                }
                value
            }
        };

        tracing::trace!(path = %path, kind = field.kind.name(), set = value.is_some(), "Populated field");
        Ok(value)
    }

    fn sequence(
        &self,
        field: &FieldDescriptor,
        element: &FieldKind,
        path: &ConfigPath,
        raw: &str,
    ) -> Result<Option<ConfigValue>> {
        let items = match element {
            FieldKind::Struct(fields) => {
                let count = convert::element_count(raw);
                (0..count)
                    .map(|i| self.resolve_struct(fields, &path.index(i)).map(ConfigValue::Struct))
                    .collect::<Result<Vec<_>>>()?
            }
            FieldKind::Seq(_) | FieldKind::Map(_) => {
                tracing::debug!(path = %path, "Nested collections are not populated");
                return Ok(None);
            }
            scalar => convert::split_sequence(raw)
                .iter()
                .filter_map(|item| convert::element(scalar, item, field.layout.as_deref()))
                .collect(),
        };

        let must_have_items = matches!(element, FieldKind::Struct(_)) || element.is_numeric();
        if field.required && must_have_items && items.is_empty() {
            return Err(ConfigError::missing(path.dotted()));
        }

        Ok(Some(ConfigValue::Seq(items)))
    }

    fn map(
        &self,
        element: &FieldKind,
        path: &ConfigPath,
        raw: &str,
        layout: Option<&str>,
    ) -> Result<Option<ConfigValue>> {
        let entries = match element {
            FieldKind::Struct(fields) => convert::object_keys(raw)
                .into_iter()
                .map(|key| {
                    let value = self.resolve_struct(fields, &path.child(key.as_str()))?;
                    Ok((key, ConfigValue::Struct(value)))
                })
                .collect::<Result<Vec<_>>>()?,
            FieldKind::Seq(_) | FieldKind::Map(_) => {
                tracing::debug!(path = %path, "Nested collections are not populated");
                return Ok(None);
            }
            scalar => convert::pairs(raw)
                .into_iter()
                .filter_map(|(key, text)| {
                    convert::element(scalar, &text, layout).map(|value| (key, value))
                })
                .collect(),
        };

        Ok(Some(ConfigValue::Map(entries)))
    }
}

/// A numeric leaf that counts as absent for a required field
fn is_zero(value: Option<&ConfigValue>) -> bool {
    match value {
        Some(ConfigValue::Int(n)) => *n == 0,
        Some(ConfigValue::UInt(n)) => *n == 0,
        Some(ConfigValue::Float(f)) => *f == 0.0,
        _ => false,
    }
}
