mod accessors;
pub use accessors::Accessors;

mod association;
pub use association::{
    Association, AssociationKind, AssociationOptions, BelongsTo, BelongsToMany, HasMany, HasOne,
};

mod builder;
pub use builder::Builder;

mod field;
pub use field::{Field, Reference, ReferentialAction, Type};

mod model;
pub use model::{Model, ModelDef, ModelId, UniqueKey};

mod through;
pub use through::ThroughSpec;

use crate::Result;

/// The immutable model registry.
///
/// Built once by [`Builder::build`] after every association has been
/// resolved, then shared by reference with the query compiler.
#[derive(Debug, Default)]
pub struct Schema {
    pub models: Vec<Model>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Get a model by ID
    pub fn model(&self, id: ModelId) -> &Model {
        &self.models[id.0]
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|model| model.name == name)
    }

    /// Like [`Schema::model_by_name`], failing with a query error naming the
    /// model.
    pub fn resolve_model(&self, name: &str) -> Result<&Model> {
        self.model_by_name(name)
            .ok_or_else(|| crate::Error::query(format!("unknown model `{name}`")))
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.iter()
    }
}
