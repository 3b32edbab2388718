/// Where a many-to-many association keeps its junction rows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum ThroughSpec {
    #[default]
    NoThrough,

    /// A junction model created by the resolver. The name is used as both
    /// the model name and the table name.
    Implicit(String),

    /// A junction model declared by the application, referenced by name.
    Explicit(String),
}

impl ThroughSpec {
    pub fn implicit(name: impl Into<String>) -> ThroughSpec {
        ThroughSpec::Implicit(name.into())
    }

    pub fn explicit(model: impl Into<String>) -> ThroughSpec {
        ThroughSpec::Explicit(model.into())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ThroughSpec::NoThrough => None,
            ThroughSpec::Implicit(name) | ThroughSpec::Explicit(name) => Some(name),
        }
    }
}
