use super::Db;
use crate::{engine::Engine, Options, Result};
use joinery_core::{
    bail,
    driver::{Capability, Dialect},
    schema::{self, AssociationOptions, ModelDef},
};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    /// Schema builder
    core: schema::Builder,

    capability: Option<Capability>,

    options: Options,
}

impl Builder {
    pub fn model(&mut self, model: ModelDef) -> &mut Self {
        self.core.model(model);
        self
    }

    pub fn belongs_to(&mut self, source: &str, target: &str, options: AssociationOptions) -> &mut Self {
        self.core.belongs_to(source, target, options);
        self
    }

    pub fn has_one(&mut self, source: &str, target: &str, options: AssociationOptions) -> &mut Self {
        self.core.has_one(source, target, options);
        self
    }

    pub fn has_many(&mut self, source: &str, target: &str, options: AssociationOptions) -> &mut Self {
        self.core.has_many(source, target, options);
        self
    }

    pub fn belongs_to_many(
        &mut self,
        source: &str,
        target: &str,
        options: AssociationOptions,
    ) -> &mut Self {
        self.core.belongs_to_many(source, target, options);
        self
    }

    /// Compile for one of the built-in dialects.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.capability = Some(Capability::for_dialect(dialect));
        self
    }

    /// Compile for a custom capability set.
    pub fn capability(&mut self, capability: Capability) -> &mut Self {
        self.capability = Some(capability);
        self
    }

    pub fn options(&mut self, options: Options) -> &mut Self {
        if let Some(prefix) = &options.table_name_prefix {
            self.core.table_name_prefix(prefix);
        }

        self.options = options;
        self
    }

    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.core.table_name_prefix(prefix);
        self.options.table_name_prefix = Some(prefix.to_string());
        self
    }

    /// Resolves every association and returns the compiled handle.
    pub fn build(&self) -> Result<Db> {
        let Some(capability) = self.capability else {
            bail!("no dialect configured; call `dialect` before `build`");
        };

        let schema = self.core.build()?;

        tracing::debug!(
            models = schema.models.len(),
            dialect = ?capability.dialect,
            "schema resolved"
        );

        Ok(Db {
            engine: Arc::new(Engine {
                schema,
                capability,
                options: self.options.clone(),
            }),
        })
    }
}
