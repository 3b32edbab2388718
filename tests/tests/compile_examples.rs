use joinery::{
    col, driver::Pagination, Capability, Db, Dialect, Direction, Expr, FindOptions, GroupedLimit,
    Include, Options, Value,
};
use pretty_assertions::assert_eq;
use tests::{assert_ok, fixtures};

fn email_query() -> FindOptions {
    FindOptions::table("User")
        .attributes(["email"])
        .filter(Expr::eq(col("email"), "a@b.com"))
        .order_by(("email", Direction::Desc))
        .limit(10)
}

fn inline(capability: Capability) -> Db {
    assert_ok!(Db::builder()
        .capability(capability)
        .options(Options::new().bind_params(false))
        .build())
}

fn blog(dialect: Dialect) -> Db {
    assert_ok!(fixtures::blog().dialect(dialect).build())
}

#[test]
fn email_lookup_on_limit_dialect() {
    let db = inline(Capability {
        pagination: Pagination::Limit,
        fetch_requires_order: false,
        ..Capability::MSSQL
    });

    let fragment = assert_ok!(db.compile(&email_query()));
    assert_eq!(
        fragment.sql,
        "SELECT [email] FROM [User] WHERE [User].[email] = 'a@b.com' ORDER BY [email] DESC LIMIT 10;"
    );
    assert!(fragment.binds.is_empty());
}

#[test]
fn email_lookup_on_fetch_dialect() {
    let db = inline(Capability::MSSQL);

    let fragment = assert_ok!(db.compile(&email_query()));
    assert_eq!(
        fragment.sql,
        "SELECT [email] FROM [User] WHERE [User].[email] = 'a@b.com' ORDER BY [email] DESC OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY;"
    );
}

#[test]
fn email_lookup_with_bound_values() {
    let db = assert_ok!(Db::builder().dialect(Dialect::Mssql).build());

    let fragment = assert_ok!(db.compile(&email_query()));
    assert_eq!(
        fragment.sql,
        "SELECT [email] FROM [User] WHERE [User].[email] = @1 ORDER BY [email] DESC OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY;"
    );
    assert_eq!(fragment.binds, vec![Value::from("a@b.com")]);
}

#[test]
fn has_many_with_limit_paginates_in_subquery() {
    let find = FindOptions::model("User")
        .attributes(["id", "email"])
        .include(Include::alias("Posts").attributes(["title"]))
        .limit(10);

    let fragment = assert_ok!(blog(Dialect::Postgres).compile(&find));
    assert_eq!(
        fragment.sql,
        r#"SELECT "User".*, "Posts"."title" AS "Posts.title" FROM (SELECT "User"."id", "User"."email" FROM "users" AS "User" LIMIT 10) AS "User" LEFT OUTER JOIN "posts" AS "Posts" ON "User"."id" = "Posts"."userId";"#
    );

    let fragment = assert_ok!(blog(Dialect::Mssql).compile(&find));
    assert_eq!(
        fragment.sql,
        "SELECT [User].*, [Posts].[title] AS [Posts.title] FROM (SELECT [User].[id], [User].[email] FROM [users] AS [User] ORDER BY [User].[id] OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY) AS [User] LEFT OUTER JOIN [posts] AS [Posts] ON [User].[id] = [Posts].[userId] ORDER BY [User].[id];"
    );
}

#[test]
fn grouped_limit_unions_one_branch_per_value() {
    let find = FindOptions::model("Post")
        .attributes(["id", "title"])
        .grouped_limit(GroupedLimit::new(2, "User", "Posts", [1, 2]));

    let fragment = assert_ok!(blog(Dialect::Postgres).compile(&find));
    assert_eq!(
        fragment.sql,
        concat!(
            r#"SELECT "Post".* FROM ("#,
            r#"SELECT * FROM (SELECT "id", "title" FROM "posts" AS "Post" WHERE "Post"."userId" = $1 LIMIT 2) AS "sub""#,
            " UNION ALL ",
            r#"SELECT * FROM (SELECT "id", "title" FROM "posts" AS "Post" WHERE "Post"."userId" = $2 LIMIT 2) AS "sub""#,
            r#") AS "Post" ORDER BY "Post"."id";"#,
        )
    );
    assert_eq!(fragment.binds, vec![Value::I64(1), Value::I64(2)]);
}

#[test]
fn belongs_to_many_joins_through_the_junction() {
    let find = FindOptions::model("User")
        .attributes(["id"])
        .include(Include::alias("Projects").attributes(["name"]));

    let fragment = assert_ok!(blog(Dialect::Postgres).compile(&find));
    assert_eq!(
        fragment.sql,
        concat!(
            r#"SELECT "User"."id", "Projects"."name" AS "Projects.name", "#,
            r#""Projects->UserProjects"."userId" AS "Projects.UserProjects.userId", "#,
            r#""Projects->UserProjects"."projectId" AS "Projects.UserProjects.projectId" "#,
            r#"FROM "users" AS "User" "#,
            r#"LEFT OUTER JOIN ("UserProjects" AS "Projects->UserProjects" "#,
            r#"INNER JOIN "projects" AS "Projects" ON "Projects"."id" = "Projects->UserProjects"."projectId") "#,
            r#"ON "User"."id" = "Projects->UserProjects"."userId";"#,
        )
    );
}

#[test]
fn required_has_many_with_limit_filters_with_exists() {
    let find = FindOptions::model("User")
        .attributes(["id"])
        .include(
            Include::alias("Posts")
                .attributes(["title"])
                .filter(Expr::eq(col("published"), true)),
        )
        .limit(5);

    let fragment = assert_ok!(blog(Dialect::Postgres).compile(&find));
    assert_eq!(
        fragment.sql,
        concat!(
            r#"SELECT "User".*, "Posts"."title" AS "Posts.title" FROM ("#,
            r#"SELECT "User"."id" FROM "users" AS "User" "#,
            r#"WHERE EXISTS (SELECT 1 FROM "posts" AS "Posts" WHERE "User"."id" = "Posts"."userId" AND "Posts"."published" = $1) "#,
            r#"LIMIT 5) AS "User" "#,
            r#"INNER JOIN "posts" AS "Posts" ON "User"."id" = "Posts"."userId" AND "Posts"."published" = $2;"#,
        )
    );
    assert_eq!(fragment.binds, vec![Value::Bool(true), Value::Bool(true)]);
}

#[test]
fn root_filter_on_include_moves_into_the_join() {
    let find = FindOptions::model("User")
        .attributes(["id"])
        .include(Include::alias("Posts").attributes(["title"]))
        .filter(Expr::and(
            Expr::eq(col("email"), "a@b.com"),
            Expr::eq(col("$Posts.title$"), "x"),
        ));

    let fragment = assert_ok!(blog(Dialect::Postgres).compile(&find));
    assert_eq!(
        fragment.sql,
        concat!(
            r#"SELECT "User"."id", "Posts"."title" AS "Posts.title" FROM "users" AS "User" "#,
            r#"INNER JOIN "posts" AS "Posts" ON "User"."id" = "Posts"."userId" AND "Posts"."title" = $1 "#,
            r#"WHERE "User"."email" = $2;"#,
        )
    );
    assert_eq!(fragment.binds, vec![Value::from("x"), Value::from("a@b.com")]);
}

#[test]
fn optional_include_wraps_required_children() {
    let find = FindOptions::model("User")
        .attributes(["id"])
        .include(
            Include::alias("Posts")
                .attributes(["title"])
                .include(Include::alias("Comments").attributes(["body"]).required(true)),
        );

    let fragment = assert_ok!(blog(Dialect::Sqlite).compile(&find));
    assert!(
        fragment.sql.contains(concat!(
            r#"LEFT OUTER JOIN ("posts" AS "Posts" "#,
            r#"INNER JOIN "comments" AS "Posts->Comments" ON "Posts"."id" = "Posts->Comments"."postId") "#,
            r#"ON "User"."id" = "Posts"."userId""#,
        )),
        "{}",
        fragment.sql
    );
}

#[test]
fn unquoted_identifiers_when_disabled() {
    let db = assert_ok!(fixtures::blog()
        .dialect(Dialect::Postgres)
        .options(Options::new().quote_identifiers(false).bind_params(false))
        .build());

    let fragment = assert_ok!(db.compile(
        &FindOptions::model("User")
            .attributes(["id", "email"])
            .filter(Expr::eq(col("email"), "it's"))
    ));

    assert_eq!(
        fragment.sql,
        "SELECT id, email FROM users AS \"User\" WHERE \"User\".email = 'it''s';"
    );
}
