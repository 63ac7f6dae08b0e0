//! Structure descriptors
//!
//! A descriptor tree tells the population engine which fields a target
//! has, what each one expects and which tag metadata applies. Trees are
//! normally produced by `#[derive(Configurable)]` but can be written by
//! hand for types the derive cannot see.

use crate::error::Result;
use crate::path::ConfigPath;
use crate::populate::Populator;
use crate::populate::value::StructValue;
use crate::source::Resolve;

/// Which time representation a timestamp field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeKind {
    /// `jiff::Timestamp`
    Instant,
    /// `jiff::civil::DateTime`
    DateTime,
    /// `jiff::civil::Date`
    Date,
}

/// Semantic kind of a field, deciding how its text is converted
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Int,
    UInt,
    Float,
    Bool,
    Duration,
    Timestamp(TimeKind),
    Struct(Vec<FieldDescriptor>),
    Seq(Box<FieldKind>),
    Map(Box<FieldKind>),
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Int => "int",
            FieldKind::UInt => "uint",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::Duration => "duration",
            FieldKind::Timestamp(_) => "timestamp",
            FieldKind::Struct(_) => "struct",
            FieldKind::Seq(_) => "sequence",
            FieldKind::Map(_) => "map",
        }
    }

    /// Numeric kinds, durations included
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldKind::Int | FieldKind::UInt | FieldKind::Float | FieldKind::Duration
        )
    }
}

/// One field of a target structure
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Key derived from the field name
    pub name: String,
    pub kind: FieldKind,
    /// Literal used when no source has a value
    pub default: Option<String>,
    pub required: bool,
    /// Explicit key replacing `name` in the field's path
    pub source_key: Option<String>,
    /// `strptime` layout for timestamp fields
    pub layout: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            required: false,
            source_key: None,
            layout: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_source_key(mut self, key: impl Into<String>) -> Self {
        self.source_key = Some(key.into());
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Key this field is looked up under
    pub fn key(&self) -> &str {
        self.source_key.as_deref().unwrap_or(&self.name)
    }

    /// Full path of this field below `parent`
    ///
    /// The field name is one segment. A source key is textual path syntax
    /// and contributes one segment per `_`-separated part.
    pub fn path(&self, parent: &ConfigPath) -> ConfigPath {
        match &self.source_key {
            Some(key) => parent.append(&ConfigPath::parse(key)),
            None => parent.child(self.name.as_str()),
        }
    }
}

/// A structure that can be populated from configuration
///
/// Implemented by `#[derive(Configurable)]`. `describe` is the descriptor
/// provider; `apply` writes values back in the same field order.
///
/// A type must not contain itself (directly or through collections):
/// `describe` expands the whole tree eagerly.
///
/// Unknown `#[config(...)]` keys are compile errors:
///
/// ```compile_fail
/// #[derive(Default, layerconf::Configurable)]
/// struct Settings {
///     #[config(unknown = "value")]
///     port: u16,
/// }
/// ```
pub trait Configurable {
    fn describe() -> Vec<FieldDescriptor>;

    fn apply(&mut self, values: StructValue);
}

/// Something handed to `populate`
///
/// Only a mutable reference to a [`Configurable`] is a usable destination.
/// The derive also implements this trait for the struct itself so that
/// passing it by value is rejected with
/// [`ConfigError::NotAPointer`](crate::ConfigError::NotAPointer).
pub trait Destination {
    fn populate_with<R: Resolve + ?Sized>(self, populator: &Populator<'_, R>) -> Result<()>;
}

impl<T: Configurable> Destination for &mut T {
    fn populate_with<R: Resolve + ?Sized>(self, populator: &Populator<'_, R>) -> Result<()> {
        populator.populate_target(self)
    }
}
