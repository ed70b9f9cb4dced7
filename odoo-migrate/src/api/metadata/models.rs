//! Odoo field metadata models

use serde::{Deserialize, Serialize};
use std::fmt;

/// A field as reported by `fields_get`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
}

/// Field type tags in Odoo
///
/// The set is open; tags this crate does not know about land in `Other`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FieldType {
    Char,
    Text,
    Html,
    Integer,
    Float,
    Monetary,
    Boolean,
    Date,
    Datetime,
    Binary,
    Selection,
    Reference,
    Many2one,
    One2many,
    Many2many,
    Other(String),
}

impl FieldType {
    /// Default exclusion set for record transfer
    ///
    /// Relational values are database ids and do not resolve on another server.
    pub const RELATIONAL: [FieldType; 3] = [
        FieldType::Many2many,
        FieldType::One2many,
        FieldType::Many2one,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "char" => Self::Char,
            "text" => Self::Text,
            "html" => Self::Html,
            "integer" => Self::Integer,
            "float" => Self::Float,
            "monetary" => Self::Monetary,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "datetime" => Self::Datetime,
            "binary" => Self::Binary,
            "selection" => Self::Selection,
            "reference" => Self::Reference,
            "many2one" => Self::Many2one,
            "one2many" => Self::One2many,
            "many2many" => Self::Many2many,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Char => "char",
            Self::Text => "text",
            Self::Html => "html",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Monetary => "monetary",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Binary => "binary",
            Self::Selection => "selection",
            Self::Reference => "reference",
            Self::Many2one => "many2one",
            Self::One2many => "one2many",
            Self::Many2many => "many2many",
            Self::Other(tag) => tag,
        }
    }

    pub fn is_relational(&self) -> bool {
        Self::RELATIONAL.contains(self)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}
