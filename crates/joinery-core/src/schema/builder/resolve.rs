use super::{Declaration, DeclaredKind, Patch};
use crate::schema::{
    Accessors, Association, AssociationKind, BelongsTo, BelongsToMany, Field, HasMany, HasOne,
    Model, ModelId, Reference, ReferentialAction, ThroughSpec, UniqueKey,
};
use crate::{Error, Result};
use indexmap::IndexMap;
use std_util::str;
use tracing::debug;

/// Resolves association declarations into patches.
///
/// Lookups see the declared models overlaid with every patch emitted so
/// far, so a declaration observes the foreign keys and junction models of
/// the declarations before it.
pub(super) struct Resolver<'a> {
    models: &'a [Model],

    /// Table names before prefixing, indexed like `models`
    base_tables: &'a [String],

    prefix: &'a str,

    /// Junction models created for implicit through specs
    created: Vec<Model>,

    /// Maps implicit through names to the model created for them
    junctions: IndexMap<String, ModelId>,

    patches: Vec<Patch>,
}

/// The many-to-many association a new declaration pairs with.
struct Pair {
    alias: String,
    foreign_key: String,
    other_key: String,
}

impl<'a> Resolver<'a> {
    pub(super) fn new(models: &'a [Model], base_tables: &'a [String], prefix: &'a str) -> Self {
        Resolver {
            models,
            base_tables,
            prefix,
            created: vec![],
            junctions: IndexMap::new(),
            patches: vec![],
        }
    }

    pub(super) fn into_patches(self) -> (Vec<Model>, Vec<Patch>) {
        (self.created, self.patches)
    }

    pub(super) fn resolve(&mut self, declaration: &Declaration) -> Result<()> {
        self.resolve_declaration(declaration).map_err(|err| {
            err.context(err!(
                "{} `{}` -> `{}`",
                declaration.kind.name(),
                declaration.source,
                declaration.target
            ))
        })
    }

    fn resolve_declaration(&mut self, declaration: &Declaration) -> Result<()> {
        let source = self.model_id(&declaration.source)?;
        let target = self.model_id(&declaration.target)?;
        let is_self_association = source == target;
        let options = &declaration.options;

        let multiple = matches!(
            declaration.kind,
            DeclaredKind::HasMany | DeclaredKind::BelongsToMany
        );

        if declaration.kind == DeclaredKind::BelongsToMany
            && is_self_association
            && options.alias.is_none()
        {
            return Err(Error::association(format!(
                "self-referential many-to-many association on `{}` requires an explicit alias",
                declaration.source
            )));
        }

        let alias = match &options.alias {
            Some(alias) => alias.clone(),
            None if multiple => str::pluralize(&declaration.target),
            None => str::singularize(&declaration.target),
        };

        self.check_alias(source, &alias)?;

        let kind = match declaration.kind {
            DeclaredKind::BelongsTo => self.resolve_belongs_to(declaration, source, target)?,
            DeclaredKind::HasOne | DeclaredKind::HasMany => {
                self.resolve_has(declaration, source, target)?
            }
            DeclaredKind::BelongsToMany => {
                self.resolve_belongs_to_many(declaration, source, target, &alias)?
            }
        };

        let accessors = if multiple {
            Accessors::multiple(&alias)
        } else {
            Accessors::single(&alias)
        };

        debug!(
            source = %declaration.source,
            target = %declaration.target,
            alias = %alias,
            kind = kind.name(),
            foreign_key = %kind.foreign_key(),
            "resolved association"
        );

        self.patches.push(Patch::Association(Box::new(Association {
            alias,
            source,
            target,
            kind,
            scope: options.scope.clone(),
            accessors,
            is_self_association,
        })));

        Ok(())
    }

    fn resolve_belongs_to(
        &mut self,
        declaration: &Declaration,
        source: ModelId,
        target: ModelId,
    ) -> Result<AssociationKind> {
        let options = &declaration.options;
        let target_key = self.key(target, options.target_key.as_deref())?;
        let foreign_key = options
            .foreign_key
            .clone()
            .unwrap_or_else(|| self.derive_foreign_key(target, &target_key.name));

        let reference = self.single_reference(declaration, source, &foreign_key, target, &target_key);
        self.inject_foreign_key(source, &foreign_key, &target_key, reference, None)?;

        Ok(AssociationKind::BelongsTo(BelongsTo {
            foreign_key,
            target_key: target_key.name,
        }))
    }

    fn resolve_has(
        &mut self,
        declaration: &Declaration,
        source: ModelId,
        target: ModelId,
    ) -> Result<AssociationKind> {
        let options = &declaration.options;
        let source_key = self.key(source, options.source_key.as_deref())?;
        let foreign_key = options
            .foreign_key
            .clone()
            .unwrap_or_else(|| self.derive_foreign_key(source, &source_key.name));

        let reference = self.single_reference(declaration, target, &foreign_key, source, &source_key);
        self.inject_foreign_key(target, &foreign_key, &source_key, reference, None)?;

        let source_key = source_key.name;
        Ok(match declaration.kind {
            DeclaredKind::HasOne => AssociationKind::HasOne(HasOne {
                foreign_key,
                source_key,
            }),
            _ => AssociationKind::HasMany(HasMany {
                foreign_key,
                source_key,
            }),
        })
    }

    fn resolve_belongs_to_many(
        &mut self,
        declaration: &Declaration,
        source: ModelId,
        target: ModelId,
        alias: &str,
    ) -> Result<AssociationKind> {
        let options = &declaration.options;
        let source_key = self.key(source, options.source_key.as_deref())?;
        let target_key = self.key(target, options.target_key.as_deref())?;

        let (through, implicit) = match &options.through {
            ThroughSpec::NoThrough => {
                return Err(Error::association(format!(
                    "many-to-many association `{alias}` requires a through table"
                )))
            }
            ThroughSpec::Implicit(name) => (self.junction(name), true),
            ThroughSpec::Explicit(name) => (self.model_id(name)?, false),
        };

        let pair = self.find_pair(source, target, through, alias);

        let foreign_key = options
            .foreign_key
            .clone()
            .or_else(|| pair.as_ref().map(|pair| pair.other_key.clone()))
            .unwrap_or_else(|| self.derive_foreign_key(source, &source_key.name));

        let other_key = options
            .other_key
            .clone()
            .or_else(|| pair.as_ref().map(|pair| pair.foreign_key.clone()))
            .unwrap_or_else(|| {
                if source == target {
                    str::camel_case(&format!("{}_{}", str::singularize(alias), target_key.name))
                } else {
                    self.derive_foreign_key(target, &target_key.name)
                }
            });

        if foreign_key == other_key {
            return Err(Error::association(format!(
                "foreign key and other key of `{alias}` are both `{foreign_key}`"
            )));
        }

        for (column, model, key) in [
            (&foreign_key, source, &source_key),
            (&other_key, target, &target_key),
        ] {
            let reference = self.junction_reference(declaration, through, column, model, key);
            self.inject_foreign_key(through, column, key, reference, Some(false))?;
        }

        if implicit && self.primary_key(through).is_empty() {
            self.patches.push(Patch::PrimaryKey {
                model: through,
                fields: vec![foreign_key.clone(), other_key.clone()],
            });
        }

        if options.unique != Some(false) {
            self.add_unique_key(through, &foreign_key, &other_key);
        }

        let paired = pair.map(|pair| {
            debug!(alias = %alias, paired = %pair.alias, "pairing many-to-many associations");
            self.patches.push(Patch::Pair {
                model: target,
                alias: pair.alias.clone(),
                paired: alias.to_string(),
            });
            pair.alias
        });

        Ok(AssociationKind::BelongsToMany(BelongsToMany {
            through,
            foreign_key,
            other_key,
            source_key: source_key.name,
            target_key: target_key.name,
            paired,
            through_scope: options.through_scope.clone(),
        }))
    }

    /// Reference for the foreign key of a single-table association.
    ///
    /// Referential actions default to `SET NULL` on delete when the column
    /// is nullable (`CASCADE` otherwise) and `CASCADE` on update.
    fn single_reference(
        &self,
        declaration: &Declaration,
        owner: ModelId,
        column: &str,
        model: ModelId,
        key: &Field,
    ) -> Option<Reference> {
        let options = &declaration.options;
        if options.constraints == Some(false) {
            return None;
        }

        let nullable = self
            .field(owner, column)
            .map(|field| field.nullable)
            .unwrap_or(true);

        Some(Reference {
            model,
            key: key.name.clone(),
            on_delete: Some(options.on_delete.unwrap_or(if nullable {
                ReferentialAction::SetNull
            } else {
                ReferentialAction::Cascade
            })),
            on_update: Some(options.on_update.unwrap_or(ReferentialAction::Cascade)),
        })
    }

    /// Reference for a junction column.
    ///
    /// Explicit options win, then whatever the counterpart association
    /// already declared on the same column. `CASCADE` is only assumed when
    /// constraints were explicitly requested.
    fn junction_reference(
        &self,
        declaration: &Declaration,
        through: ModelId,
        column: &str,
        model: ModelId,
        key: &Field,
    ) -> Option<Reference> {
        let options = &declaration.options;
        if options.constraints == Some(false) {
            return None;
        }

        let existing = self
            .field(through, column)
            .and_then(|field| field.references.as_ref());
        let fallback = (options.constraints == Some(true)).then_some(ReferentialAction::Cascade);

        Some(Reference {
            model,
            key: key.name.clone(),
            on_delete: options
                .on_delete
                .or_else(|| existing.and_then(|reference| reference.on_delete))
                .or(fallback),
            on_update: options
                .on_update
                .or_else(|| existing.and_then(|reference| reference.on_update))
                .or(fallback),
        })
    }

    /// Adds `name` to `model`, typed after `key`. An existing field with the
    /// same name is adopted when its type matches.
    fn inject_foreign_key(
        &mut self,
        model: ModelId,
        name: &str,
        key: &Field,
        reference: Option<Reference>,
        nullable: Option<bool>,
    ) -> Result<()> {
        let mut field = match self.field(model, name) {
            Some(existing) if existing.ty != key.ty => {
                return Err(Error::association(format!(
                    "foreign key `{}.{}` has type {:?} but references `{}` of type {:?}",
                    self.model(model).name,
                    name,
                    existing.ty,
                    key.name,
                    key.ty
                )));
            }
            Some(existing) => existing.clone(),
            None => {
                debug!(model = %self.model(model).name, field = %name, "injecting foreign key");
                Field::new(name, key.ty)
            }
        };

        if reference.is_some() {
            field.references = reference;
        }

        if let Some(nullable) = nullable {
            field.nullable = nullable;
        }

        self.patches.push(Patch::UpsertField { model, field });
        Ok(())
    }

    fn add_unique_key(&mut self, model: ModelId, foreign_key: &str, other_key: &str) {
        let exists = self.patches.iter().any(|patch| match patch {
            Patch::UniqueKey { model: m, key } => {
                *m == model
                    && key.fields.len() == 2
                    && key.fields.iter().any(|f| f == foreign_key)
                    && key.fields.iter().any(|f| f == other_key)
            }
            _ => false,
        });

        if exists {
            return;
        }

        let name = format!(
            "{}_{}_{}_unique",
            self.model(model).table_name,
            foreign_key,
            other_key
        );

        self.patches.push(Patch::UniqueKey {
            model,
            key: UniqueKey {
                name,
                fields: vec![foreign_key.to_string(), other_key.to_string()],
            },
        });
    }

    /// Returns the junction model for an implicit through name, creating
    /// it on first use.
    fn junction(&mut self, name: &str) -> ModelId {
        if let Some(id) = self.junctions.get(name) {
            return *id;
        }

        let id = ModelId(self.models.len() + self.created.len());
        debug!(junction = %name, "creating implicit through model");

        self.created.push(Model {
            id,
            name: name.to_string(),
            table_name: format!("{}{}", self.prefix, name),
            fields: IndexMap::new(),
            primary_key: vec![],
            associations: IndexMap::new(),
            unique_keys: vec![],
            implicit: true,
        });
        self.junctions.insert(name.to_string(), id);
        id
    }

    /// Finds an unpaired many-to-many association declared from `target`
    /// to `source` through the same junction model.
    fn find_pair(&self, source: ModelId, target: ModelId, through: ModelId, alias: &str) -> Option<Pair> {
        self.associations().find_map(|association| {
            let btm = association.as_belongs_to_many()?;
            let candidate = association.source == target
                && association.target == source
                && btm.through == through
                && !(association.source == source && association.alias == alias)
                && !self.is_paired(association.source, &association.alias);

            candidate.then(|| Pair {
                alias: association.alias.clone(),
                foreign_key: btm.foreign_key.clone(),
                other_key: btm.other_key.clone(),
            })
        })
    }

    fn is_paired(&self, model: ModelId, alias: &str) -> bool {
        self.patches.iter().any(|patch| {
            matches!(patch, Patch::Pair { model: m, alias: a, .. } if *m == model && a == alias)
        })
    }

    fn check_alias(&self, source: ModelId, alias: &str) -> Result<()> {
        let model = self.model(source);

        if alias.is_empty() {
            return Err(Error::association(format!(
                "association on `{}` has an empty alias",
                model.name
            )));
        }

        if self
            .associations()
            .any(|association| association.source == source && association.alias == alias)
        {
            return Err(Error::association(format!(
                "alias `{alias}` is already used by another association on `{}`",
                model.name
            )));
        }

        if self.field(source, alias).is_some() {
            return Err(Error::association(format!(
                "alias `{alias}` collides with attribute `{alias}` of `{}`",
                model.name
            )));
        }

        Ok(())
    }

    /// The key field an association joins on: the explicit one when given,
    /// else the model's primary key.
    fn key(&self, model: ModelId, explicit: Option<&str>) -> Result<Field> {
        let name = match explicit {
            Some(name) => name.to_string(),
            None => match self.primary_key(model).first() {
                Some(name) => name.clone(),
                None => {
                    return Err(Error::association(format!(
                        "`{}` has no primary key",
                        self.model(model).name
                    )))
                }
            },
        };

        self.field(model, &name).cloned().ok_or_else(|| {
            Error::association(format!(
                "`{}` has no attribute `{name}`",
                self.model(model).name
            ))
        })
    }

    /// `camelCase(singular(table) + "_" + key)`: `users` + `id` -> `userId`.
    fn derive_foreign_key(&self, owner: ModelId, key: &str) -> String {
        let table = match self.base_tables.get(owner.0) {
            Some(table) => table.as_str(),
            None => self.model(owner).name.as_str(),
        };
        str::camel_case(&format!("{}_{}", str::singularize(table), key))
    }

    fn model_id(&self, name: &str) -> Result<ModelId> {
        self.models
            .iter()
            .chain(self.created.iter())
            .find(|model| model.name == name)
            .map(|model| model.id)
            .ok_or_else(|| Error::association(format!("unknown model `{name}`")))
    }

    fn model(&self, id: ModelId) -> &Model {
        match self.models.get(id.0) {
            Some(model) => model,
            None => &self.created[id.0 - self.models.len()],
        }
    }

    fn field(&self, model: ModelId, name: &str) -> Option<&Field> {
        self.patches
            .iter()
            .rev()
            .find_map(|patch| match patch {
                Patch::UpsertField { model: m, field } if *m == model && field.name == name => {
                    Some(field)
                }
                _ => None,
            })
            .or_else(|| self.model(model).fields.get(name))
    }

    fn primary_key(&self, model: ModelId) -> &[String] {
        self.patches
            .iter()
            .rev()
            .find_map(|patch| match patch {
                Patch::PrimaryKey { model: m, fields } if *m == model => Some(&fields[..]),
                _ => None,
            })
            .unwrap_or(self.model(model).primary_key.as_slice())
    }

    fn associations(&self) -> impl Iterator<Item = &Association> + '_ {
        self.patches.iter().filter_map(|patch| match patch {
            Patch::Association(association) => Some(&**association),
            _ => None,
        })
    }
}
