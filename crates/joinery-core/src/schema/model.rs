use super::{Association, Field};
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model. Also the alias the model is queried under.
    pub name: String,

    /// Table name, including any configured prefix
    pub table_name: String,

    /// Fields in declaration order, followed by injected foreign keys
    pub fields: IndexMap<String, Field>,

    /// Names of the primary-key fields
    pub primary_key: Vec<String>,

    /// Associations declared with this model as the source, keyed by alias
    pub associations: IndexMap<String, Association>,

    pub unique_keys: Vec<UniqueKey>,

    /// Created by the resolver to back a many-to-many association
    pub implicit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    pub name: String,
    pub fields: Vec<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

/// A model as declared by the application, before associations are
/// resolved.
#[derive(Debug, Clone)]
pub struct ModelDef {
    pub(crate) name: String,
    pub(crate) table_name: Option<String>,
    pub(crate) fields: Vec<Field>,
}

impl Model {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn association(&self, alias: &str) -> Option<&Association> {
        self.associations.get(alias)
    }

    pub fn primary_key_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.primary_key
            .iter()
            .filter_map(|name| self.fields.get(name))
    }
}

impl ModelDef {
    /// Declares a model. The table name defaults to the snake-cased plural
    /// of the model name (`UserProject` -> `user_projects`).
    pub fn new(name: impl Into<String>) -> ModelDef {
        ModelDef {
            name: name.into(),
            table_name: None,
            fields: vec![],
        }
    }

    pub fn table_name(mut self, table_name: impl Into<String>) -> ModelDef {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn field(mut self, field: Field) -> ModelDef {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
