use joinery::{AssociationOptions, Db, Dialect, Direction, FindOptions, Include, Lock};
use tests::{assert_err, fixtures};

fn blog() -> Db {
    fixtures::blog().dialect(Dialect::Postgres).build().unwrap()
}

#[test]
fn unknown_association() {
    let err = assert_err!(blog().compile(&FindOptions::model("User").include("Nope")));
    assert!(err.is_query());
    assert!(err.to_string().contains("Nope"), "{err}");
}

#[test]
fn unknown_model() {
    let err = assert_err!(blog().compile(&FindOptions::model("Nope")));
    assert!(err.is_query());
}

#[test]
fn include_target_must_be_associated() {
    let err = assert_err!(blog().compile(
        &FindOptions::model("Comment").include(Include::model("Project"))
    ));
    assert!(err.is_query());
}

#[test]
fn unknown_order_column() {
    let err = assert_err!(blog().compile(
        &FindOptions::model("User").order_by(("missing", Direction::Asc))
    ));
    assert!(err.is_query());
}

#[test]
fn duplicate_alias_fails_to_build() {
    let mut builder = fixtures::blog();
    builder.has_many("User", "Comment", AssociationOptions::new().alias("Posts"));

    let err = assert_err!(builder.dialect(Dialect::Postgres).build());
    assert!(err.is_association(), "{err}");
}

#[test]
fn build_needs_a_dialect() {
    assert_err!(fixtures::blog().build());
}

#[test]
fn row_locks_follow_the_dialect() {
    let find = FindOptions::model("User").lock(Lock::Share);

    let fragment = blog().compile(&find).unwrap();
    assert!(fragment.sql.ends_with(" FOR SHARE;"));

    let sqlite = fixtures::blog().dialect(Dialect::Sqlite).build().unwrap();
    let err = assert_err!(sqlite.compile(&find));
    assert!(err.is_unsupported_feature());
}

#[test]
fn right_join_follows_the_dialect() {
    let find = FindOptions::model("User").include(Include::alias("Posts").right());

    let fragment = blog().compile(&find).unwrap();
    assert!(fragment.sql.contains(r#" RIGHT OUTER JOIN "posts" AS "Posts""#), "{}", fragment.sql);

    let sqlite = fixtures::blog().dialect(Dialect::Sqlite).build().unwrap();
    let err = assert_err!(sqlite.compile(&find));
    assert!(err.is_unsupported_feature(), "{err}");
    assert!(err.to_string().contains("Posts"), "{err}");
}
