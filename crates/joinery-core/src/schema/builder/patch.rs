use crate::schema::{Association, AssociationKind, Field, Model, ModelId, Schema, UniqueKey};

/// A change to the schema produced by the resolver.
#[derive(Debug)]
pub(super) enum Patch {
    /// Insert or replace a field.
    UpsertField { model: ModelId, field: Field },

    PrimaryKey { model: ModelId, fields: Vec<String> },

    UniqueKey { model: ModelId, key: UniqueKey },

    Association(Box<Association>),

    /// Link an earlier many-to-many association with the one declared in
    /// the opposite direction.
    Pair {
        model: ModelId,
        alias: String,
        paired: String,
    },
}

/// Applies the patches in order, producing the immutable schema.
pub(super) fn finalize(mut models: Vec<Model>, created: Vec<Model>, patches: Vec<Patch>) -> Schema {
    models.extend(created);

    for patch in patches {
        match patch {
            Patch::UpsertField { model, field } => {
                models[model.0].fields.insert(field.name.clone(), field);
            }
            Patch::PrimaryKey { model, fields } => {
                let model = &mut models[model.0];
                for name in &fields {
                    if let Some(field) = model.fields.get_mut(name) {
                        field.primary_key = true;
                        field.nullable = false;
                    }
                }
                model.primary_key = fields;
            }
            Patch::UniqueKey { model, key } => {
                models[model.0].unique_keys.push(key);
            }
            Patch::Association(association) => {
                let source = association.source;
                models[source.0]
                    .associations
                    .insert(association.alias.clone(), *association);
            }
            Patch::Pair {
                model,
                alias,
                paired,
            } => {
                let association = models[model.0].associations.get_mut(&alias);
                if let Some(Association {
                    kind: AssociationKind::BelongsToMany(btm),
                    ..
                }) = association
                {
                    btm.paired = Some(paired);
                }
            }
        }
    }

    Schema { models }
}
