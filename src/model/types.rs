//! Model and field descriptors
//!
//! Field kinds form a single-inheritance hierarchy rooted at `Field`
//! (e.g. `image -> file -> field`, `email -> char -> field`). Overrides
//! registered for a kind apply to all of its descendants.

use serde::{Deserialize, Serialize};

use crate::value::ValueValidator;

/// Static type of a model field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Root of the hierarchy
    Field,
    /// Auto-incrementing primary key
    Auto,
    Integer,
    BigInteger,
    SmallInteger,
    PositiveInteger,
    Float,
    Decimal,
    Boolean,
    NullBoolean,
    Char,
    Text,
    Email,
    Slug,
    Url,
    File,
    Image,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Time,
    /// Relation to another model, filtered by primary key
    ForeignKey,
    /// Application-defined kind extending a built-in one
    Custom { name: String, base: Box<FieldKind> },
}

impl FieldKind {
    /// Defines an application-specific kind deriving from `base`
    pub fn custom(name: impl Into<String>, base: FieldKind) -> Self {
        FieldKind::Custom {
            name: name.into(),
            base: Box::new(base),
        }
    }

    /// Returns the kind name for error messages
    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::Field => "field",
            FieldKind::Auto => "auto",
            FieldKind::Integer => "integer",
            FieldKind::BigInteger => "big_integer",
            FieldKind::SmallInteger => "small_integer",
            FieldKind::PositiveInteger => "positive_integer",
            FieldKind::Float => "float",
            FieldKind::Decimal => "decimal",
            FieldKind::Boolean => "boolean",
            FieldKind::NullBoolean => "null_boolean",
            FieldKind::Char => "char",
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Slug => "slug",
            FieldKind::Url => "url",
            FieldKind::File => "file",
            FieldKind::Image => "image",
            FieldKind::Date => "date",
            FieldKind::DateTime => "datetime",
            FieldKind::Time => "time",
            FieldKind::ForeignKey => "foreign_key",
            FieldKind::Custom { name, .. } => name,
        }
    }

    /// Direct parent in the kind hierarchy; `None` only for `Field`
    pub fn parent(&self) -> Option<FieldKind> {
        match self {
            FieldKind::Field => None,
            FieldKind::BigInteger | FieldKind::SmallInteger | FieldKind::PositiveInteger => {
                Some(FieldKind::Integer)
            }
            FieldKind::Email | FieldKind::Slug | FieldKind::Url => Some(FieldKind::Char),
            FieldKind::Image => Some(FieldKind::File),
            FieldKind::DateTime => Some(FieldKind::Date),
            FieldKind::Custom { base, .. } => Some((**base).clone()),
            _ => Some(FieldKind::Field),
        }
    }

    /// This kind followed by its ancestors, nearest first
    pub fn lineage(&self) -> Vec<FieldKind> {
        let mut chain = vec![self.clone()];
        while let Some(parent) = chain.last().and_then(FieldKind::parent) {
            chain.push(parent);
        }
        chain
    }

    /// Returns true if `self` is `other` or descends from it
    pub fn is_a(&self, other: &FieldKind) -> bool {
        self.lineage().iter().any(|kind| kind == other)
    }
}

/// A field of a model, as exposed by the model introspection layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub null: bool,
}

impl ModelField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            max_length: None,
            null: false,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.null = true;
        self
    }

    /// Validator implied by the field's static kind, before any override.
    ///
    /// Custom kinds use the validator of their nearest built-in ancestor.
    pub fn natural_validator(&self) -> ValueValidator {
        natural_validator_for(&self.kind, self.max_length)
    }
}

fn natural_validator_for(kind: &FieldKind, max_length: Option<usize>) -> ValueValidator {
    match kind {
        FieldKind::Auto
        | FieldKind::Integer
        | FieldKind::BigInteger
        | FieldKind::SmallInteger
        | FieldKind::ForeignKey => ValueValidator::integer(),
        FieldKind::PositiveInteger => ValueValidator::integer_between(Some(0), None),
        FieldKind::Float => ValueValidator::Float,
        FieldKind::Decimal => ValueValidator::Decimal,
        FieldKind::Boolean | FieldKind::NullBoolean => ValueValidator::Boolean,
        FieldKind::Char | FieldKind::Text => ValueValidator::Text { max_length },
        FieldKind::Email => ValueValidator::Email { max_length },
        FieldKind::Slug => ValueValidator::Slug { max_length },
        FieldKind::Url => ValueValidator::Url { max_length },
        FieldKind::Field | FieldKind::File | FieldKind::Image => ValueValidator::text(),
        FieldKind::Date => ValueValidator::Date,
        FieldKind::DateTime => ValueValidator::DateTime,
        FieldKind::Time => ValueValidator::Time,
        FieldKind::Custom { base, .. } => natural_validator_for(base, max_length),
    }
}

/// A model: a named, ordered list of fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub fields: Vec<ModelField>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: ModelField) -> Self {
        self.fields.push(field);
        self
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[ModelField] {
        &self.fields
    }

    /// Looks a field up by name
    pub fn field(&self, name: &str) -> Option<&ModelField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Checks model structure: non-empty name, unique field names
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Model name cannot be empty".into());
        }
        for (i, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(format!("Field #{} has an empty name", i));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(format!("Duplicate field '{}'", field.name));
            }
        }
        Ok(())
    }
}
