mod normalize;

use crate::{Fragment, Options, Result};
use joinery_core::{
    driver::Capability,
    err,
    stmt::{FindOptions, FindSource},
    Schema,
};
use joinery_sql::Serializer;

/// Compiles find requests for one schema and dialect.
#[derive(Debug)]
pub(crate) struct Engine {
    pub(crate) schema: Schema,
    pub(crate) capability: Capability,
    pub(crate) options: Options,
}

impl Engine {
    pub(crate) fn compile(&self, find: &FindOptions) -> Result<Fragment> {
        let select = normalize::apply(&self.schema, find).map_err(|e| {
            let source = match &find.source {
                FindSource::Model(name) | FindSource::Table(name) => name,
            };

            e.context(err!("failed to compile query on `{source}`"))
        })?;

        Serializer::new(&self.capability)
            .bind_params(self.options.bind_params)
            .quote_identifiers(self.options.quote_identifiers)
            .serialize(&select)
    }
}
