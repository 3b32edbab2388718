use super::ModelId;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Attribute name, as used in queries.
    pub name: String,

    /// Database column name.
    pub column: String,

    pub ty: Type,

    pub nullable: bool,

    pub primary_key: bool,

    /// Set on foreign-key fields injected or adopted by an association.
    pub references: Option<Reference>,
}

/// Storage type of a field. Injected foreign keys copy the type of the key
/// they reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Integer,
    BigInt,
    String,
    Text,
    Boolean,
    Float,
    Date,
    Uuid,
    Binary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub model: ModelId,

    /// Referenced field on `model`.
    pub key: String,

    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
    NoAction,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Field {
        let name = name.into();
        Field {
            column: name.clone(),
            name,
            ty,
            nullable: true,
            primary_key: false,
            references: None,
        }
    }

    /// Stores the field under a different column name.
    pub fn column(mut self, column: impl Into<String>) -> Field {
        self.column = column.into();
        self
    }

    pub fn not_null(mut self) -> Field {
        self.nullable = false;
        self
    }

    pub fn primary_key(mut self) -> Field {
        self.primary_key = true;
        self.nullable = false;
        self
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::NoAction => "NO ACTION",
        })
    }
}
