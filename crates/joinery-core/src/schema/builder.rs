mod patch;
use patch::Patch;

mod resolve;
use resolve::Resolver;

use super::{AssociationOptions, Field, Model, ModelDef, ModelId, Schema, ThroughSpec, Type};
use crate::Result;
use indexmap::IndexMap;
use std_util::str;
use tracing::debug;

/// Collects model and association declarations and resolves them into an
/// immutable [`Schema`].
///
/// Building happens in two phases. The resolver walks the declarations in
/// order and emits patches (injected foreign keys, junction models, unique
/// keys, the associations themselves) without touching any model. Once every
/// declaration resolved, the patches are applied in one pass. A failing
/// declaration therefore never leaves a half-mutated schema behind.
#[derive(Debug, Default)]
pub struct Builder {
    /// If set, prefix all table names with this string
    table_name_prefix: Option<String>,

    models: Vec<ModelDef>,

    declarations: Vec<Declaration>,
}

#[derive(Debug, Clone)]
struct Declaration {
    kind: DeclaredKind,
    source: String,
    target: String,
    options: AssociationOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclaredKind {
    BelongsTo,
    HasOne,
    HasMany,
    BelongsToMany,
}

impl DeclaredKind {
    fn name(self) -> &'static str {
        match self {
            DeclaredKind::BelongsTo => "belongs_to",
            DeclaredKind::HasOne => "has_one",
            DeclaredKind::HasMany => "has_many",
            DeclaredKind::BelongsToMany => "belongs_to_many",
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn model(&mut self, model: ModelDef) -> &mut Self {
        self.models.push(model);
        self
    }

    /// `source` holds a foreign key referencing `target`.
    pub fn belongs_to(&mut self, source: &str, target: &str, options: AssociationOptions) -> &mut Self {
        self.declare(DeclaredKind::BelongsTo, source, target, options)
    }

    pub fn has_one(&mut self, source: &str, target: &str, options: AssociationOptions) -> &mut Self {
        self.declare(DeclaredKind::HasOne, source, target, options)
    }

    pub fn has_many(&mut self, source: &str, target: &str, options: AssociationOptions) -> &mut Self {
        self.declare(DeclaredKind::HasMany, source, target, options)
    }

    pub fn belongs_to_many(
        &mut self,
        source: &str,
        target: &str,
        options: AssociationOptions,
    ) -> &mut Self {
        self.declare(DeclaredKind::BelongsToMany, source, target, options)
    }

    fn declare(
        &mut self,
        kind: DeclaredKind,
        source: &str,
        target: &str,
        options: AssociationOptions,
    ) -> &mut Self {
        self.declarations.push(Declaration {
            kind,
            source: source.to_string(),
            target: target.to_string(),
            options,
        });
        self
    }

    pub fn build(&self) -> Result<Schema> {
        let (models, base_tables) = self.build_models()?;
        let declarations = promote_has_many(&self.declarations, &models, &base_tables);

        let mut resolver = Resolver::new(
            &models,
            &base_tables,
            self.table_name_prefix.as_deref().unwrap_or(""),
        );

        for declaration in &declarations {
            resolver.resolve(declaration)?;
        }

        let (created, patches) = resolver.into_patches();
        Ok(patch::finalize(models, created, patches))
    }

    /// Creates one model per declaration. Returns the models along with
    /// their table names before prefixing, which foreign-key names derive
    /// from.
    fn build_models(&self) -> Result<(Vec<Model>, Vec<String>)> {
        let prefix = self.table_name_prefix.as_deref().unwrap_or("");
        let mut models = vec![];
        let mut base_tables = vec![];

        for (index, def) in self.models.iter().enumerate() {
            if self.models[..index].iter().any(|other| other.name == def.name) {
                bail!("model `{}` is defined more than once", def.name);
            }

            let base_table = def
                .table_name
                .clone()
                .unwrap_or_else(|| str::snake_case(&str::pluralize(&def.name)));

            let mut fields = IndexMap::new();

            // Models without an explicit primary key get an `id` column.
            if !def.fields.iter().any(|field| field.primary_key) {
                fields.insert("id".to_string(), Field::new("id", Type::Integer).primary_key());
            }

            for field in &def.fields {
                if fields.insert(field.name.clone(), field.clone()).is_some() {
                    bail!("attribute `{}.{}` is defined more than once", def.name, field.name);
                }
            }

            let primary_key = fields
                .values()
                .filter(|field| field.primary_key)
                .map(|field| field.name.clone())
                .collect();

            models.push(Model {
                id: ModelId(index),
                name: def.name.clone(),
                table_name: format!("{prefix}{base_table}"),
                fields,
                primary_key,
                associations: IndexMap::new(),
                unique_keys: vec![],
                implicit: false,
            });
            base_tables.push(base_table);
        }

        Ok((models, base_tables))
    }
}

/// Rewrites has-many declarations that must be backed by a junction table
/// into implicit many-to-many declarations: a pair of reciprocal has-many
/// declarations, or a self-referential one that asks for a junction table.
fn promote_has_many(
    declarations: &[Declaration],
    models: &[Model],
    base_tables: &[String],
) -> Vec<Declaration> {
    let table_of = |name: &str| {
        models
            .iter()
            .position(|model| model.name == name)
            .map(|index| base_tables[index].as_str())
    };

    declarations
        .iter()
        .map(|declaration| {
            let mut declaration = declaration.clone();

            if declaration.kind != DeclaredKind::HasMany
                || declaration.options.through != ThroughSpec::NoThrough
            {
                return declaration;
            }

            let is_self = declaration.source == declaration.target;
            let reciprocal = !is_self
                && declarations.iter().any(|other| {
                    other.kind == DeclaredKind::HasMany
                        && other.source == declaration.target
                        && other.target == declaration.source
                });

            if !(reciprocal || is_self && declaration.options.use_junction_table) {
                return declaration;
            }

            let (Some(source_table), Some(target_table)) =
                (table_of(&declaration.source), table_of(&declaration.target))
            else {
                // Unknown models are reported by the resolver
                return declaration;
            };

            let mut tables = [source_table, target_table];
            tables.sort();
            let junction = tables.concat();

            debug!(
                source = %declaration.source,
                target = %declaration.target,
                junction = %junction,
                "promoting has_many to belongs_to_many"
            );

            declaration.kind = DeclaredKind::BelongsToMany;
            declaration.options.through = ThroughSpec::Implicit(junction);
            declaration
        })
        .collect()
}
