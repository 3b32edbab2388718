//! Models shared by the integration tests.
//!
//! ```text
//! User 1-n Post 1-n Comment
//! User 1-1 Profile
//! User n-m Project (through UserProjects)
//! ```

use joinery::{db, AssociationOptions, Db, Field, ModelDef, ThroughSpec, Type};

pub fn user() -> ModelDef {
    ModelDef::new("User")
        .field(Field::new("id", Type::Integer).primary_key())
        .field(Field::new("email", Type::String))
        .field(Field::new("name", Type::String).column("full_name"))
}

pub fn post() -> ModelDef {
    ModelDef::new("Post")
        .field(Field::new("title", Type::String))
        .field(Field::new("published", Type::Boolean))
}

pub fn comment() -> ModelDef {
    ModelDef::new("Comment").field(Field::new("body", Type::String))
}

pub fn profile() -> ModelDef {
    ModelDef::new("Profile").field(Field::new("bio", Type::String))
}

pub fn project() -> ModelDef {
    ModelDef::new("Project").field(Field::new("name", Type::String))
}

/// Declares every fixture model and association.
pub fn blog() -> db::Builder {
    let mut builder = Db::builder();

    builder
        .model(user())
        .model(post())
        .model(comment())
        .model(profile())
        .model(project())
        .has_many("User", "Post", AssociationOptions::new())
        .belongs_to("Post", "User", AssociationOptions::new())
        .has_many("Post", "Comment", AssociationOptions::new())
        .has_one("User", "Profile", AssociationOptions::new())
        .belongs_to_many(
            "User",
            "Project",
            AssociationOptions::new().through(ThroughSpec::implicit("UserProjects")),
        );

    builder
}
