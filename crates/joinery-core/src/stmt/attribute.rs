/// One entry of a requested attribute list.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// A model attribute (or a raw table column) selected under its own
    /// name.
    Name(String),

    /// A model attribute selected under a different output name.
    Aliased { name: String, alias: String },

    /// A caller-supplied SQL expression selected under `alias`.
    Raw { sql: String, alias: String },
}

impl Attribute {
    pub fn raw(sql: impl Into<String>, alias: impl Into<String>) -> Attribute {
        Attribute::Raw {
            sql: sql.into(),
            alias: alias.into(),
        }
    }

    /// The name the attribute is exposed under in the result set.
    pub fn output_name(&self) -> &str {
        match self {
            Attribute::Name(name) => name,
            Attribute::Aliased { alias, .. } | Attribute::Raw { alias, .. } => alias,
        }
    }
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Attribute {
        Attribute::Name(value.to_string())
    }
}

impl From<String> for Attribute {
    fn from(value: String) -> Attribute {
        Attribute::Name(value)
    }
}

impl From<(&str, &str)> for Attribute {
    fn from((name, alias): (&str, &str)) -> Attribute {
        Attribute::Aliased {
            name: name.to_string(),
            alias: alias.to_string(),
        }
    }
}
