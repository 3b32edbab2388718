use super::Serializer;

use joinery_core::{
    driver::{Capability, Pagination},
    stmt::{
        Direction, Expr, ExprColumn, GroupScope, GroupedLimitPlan, IncludeNode, JoinKind, JoinOn,
        KeyColumn, Lock, Ordering, Select, SelectColumn, TableRef, ThroughNode, Value,
    },
};
use pretty_assertions::assert_eq;
use std_util::{assert_err, assert_ok};

fn column(table: &str, name: &str) -> ExprColumn {
    ExprColumn::qualified(table, name)
}

fn select(table: TableRef, columns: Vec<SelectColumn>) -> Select {
    Select {
        table,
        columns,
        filter: None,
        group_by: vec![],
        having: None,
        order_by: vec![],
        limit: None,
        offset: None,
        grouped_limit: None,
        sub_query: false,
        includes: vec![],
        lock: None,
        primary_key: vec![KeyColumn {
            column: "id".to_string(),
            output: "id".to_string(),
        }],
    }
}

fn users() -> Select {
    select(
        TableRef::aliased("users", "User"),
        vec![
            SelectColumn::new(column("User", "id")),
            SelectColumn::new(column("User", "name")),
        ],
    )
}

fn include(path: &str, table: &str, on: JoinOn, attrs: &[&str]) -> IncludeNode {
    let alias = path.replace('.', "->");

    IncludeNode {
        path: path.to_string(),
        table: TableRef::aliased(table, &alias),
        join: JoinKind::Left,
        required: false,
        multiple: true,
        columns: attrs
            .iter()
            .map(|attr| SelectColumn::aliased(column(&alias, attr), format!("{path}.{attr}")))
            .collect(),
        on,
        filter: None,
        through: None,
        children: vec![],
        in_subquery: false,
        subquery_filter: None,
    }
}

fn posts() -> IncludeNode {
    include(
        "Posts",
        "posts",
        JoinOn {
            lhs: column("User", "id"),
            rhs: column("Posts", "userId"),
        },
        &["id", "title"],
    )
}

fn email_query() -> Select {
    let mut query = select(
        TableRef::new("User"),
        vec![SelectColumn::new(ExprColumn::bare("email"))],
    );
    query.filter = Some(Expr::eq(column("User", "email"), "a@b.com"));
    query.order_by = vec![Ordering {
        expr: ExprColumn::bare("email").into(),
        outer: ExprColumn::bare("email").into(),
        direction: Some(Direction::Desc),
        in_subquery: true,
    }];
    query.limit = Some(10);
    query.primary_key = vec![];
    query
}

#[test]
fn flat_select_on_bracket_limit_dialect() {
    let capability = Capability {
        pagination: Pagination::Limit,
        fetch_requires_order: false,
        ..Capability::MSSQL
    };
    let serializer = Serializer::new(&capability).bind_params(false);

    let fragment = assert_ok!(serializer.serialize(&email_query()));
    assert_eq!(
        fragment.sql,
        "SELECT [email] FROM [User] WHERE [User].[email] = 'a@b.com' ORDER BY [email] DESC LIMIT 10;"
    );
    assert!(fragment.binds.is_empty());
}

#[test]
fn flat_select_on_fetch_dialect() {
    let serializer = Serializer::new(&Capability::MSSQL).bind_params(false);

    let fragment = assert_ok!(serializer.serialize(&email_query()));
    assert_eq!(
        fragment.sql,
        "SELECT [email] FROM [User] WHERE [User].[email] = 'a@b.com' ORDER BY [email] DESC OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY;"
    );
}

#[test]
fn bound_parameters() {
    let fragment = assert_ok!(Serializer::new(&Capability::MSSQL).serialize(&email_query()));
    assert!(fragment.sql.contains("[User].[email] = @1"));
    assert_eq!(fragment.binds, [Value::from("a@b.com")]);

    let fragment = assert_ok!(Serializer::new(&Capability::MYSQL).serialize(&email_query()));
    assert!(fragment.sql.contains("`User`.`email` = ? "));
}

#[test]
fn fetch_without_order_uses_primary_key() {
    let mut query = users();
    query.limit = Some(10);
    query.offset = Some(5);

    let fragment = assert_ok!(Serializer::new(&Capability::MSSQL).serialize(&query));
    assert_eq!(
        fragment.sql,
        "SELECT [User].[id], [User].[name] FROM [users] AS [User] ORDER BY [User].[id] OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY;"
    );

    // Db2 accepts an unordered page
    let fragment = assert_ok!(Serializer::new(&Capability::DB2).serialize(&query));
    assert!(fragment
        .sql
        .ends_with(r#"FROM "users" AS "User" OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY;"#));
}

#[test]
fn offset_without_limit() {
    let mut query = users();
    query.offset = Some(5);

    let sql = |capability: &Capability| assert_ok!(Serializer::new(capability).serialize(&query)).sql;

    assert!(sql(&Capability::SQLITE).ends_with(r#"AS "User" LIMIT -1 OFFSET 5;"#));
    assert!(sql(&Capability::POSTGRESQL).ends_with(r#"AS "User" OFFSET 5;"#));
    assert!(sql(&Capability::MYSQL).ends_with("AS `User` LIMIT 18446744073709551615 OFFSET 5;"));
    assert!(sql(&Capability::SNOWFLAKE).ends_with(r#"AS "User" LIMIT NULL OFFSET 5;"#));
}

#[test]
fn top_pagination_is_unsupported() {
    let capability = Capability {
        pagination: Pagination::Top,
        ..Capability::SQLITE
    };

    let mut query = users();
    query.limit = Some(1);

    let err = assert_err!(Serializer::new(&capability).serialize(&query));
    assert!(err.is_unsupported_feature());
}

#[test]
fn row_locks() {
    let mut query = users();
    query.lock = Some(Lock::Update);

    let fragment = assert_ok!(Serializer::new(&Capability::POSTGRESQL).serialize(&query));
    assert!(fragment.sql.ends_with(r#"FROM "users" AS "User" FOR UPDATE;"#));

    let err = assert_err!(Serializer::new(&Capability::SQLITE).serialize(&query));
    assert!(err.is_unsupported_feature());

    query.lock = Some(Lock::Share);
    let err = assert_err!(Serializer::new(&Capability::ORACLE).serialize(&query));
    assert!(err.is_unsupported_feature());
}

#[test]
fn flat_join() {
    let mut query = users();
    query.includes = vec![posts()];

    let fragment = assert_ok!(Serializer::new(&Capability::SQLITE).serialize(&query));
    assert_eq!(
        fragment.sql,
        r#"SELECT "User"."id", "User"."name", "Posts"."id" AS "Posts.id", "Posts"."title" AS "Posts.title" FROM "users" AS "User" LEFT OUTER JOIN "posts" AS "Posts" ON "User"."id" = "Posts"."userId";"#
    );
}

#[test]
fn right_join_requires_dialect_support() {
    let mut query = users();
    let mut node = posts();
    node.join = JoinKind::Right;
    query.includes = vec![node];

    let err = assert_err!(Serializer::new(&Capability::SQLITE).serialize(&query));
    assert!(err.is_unsupported_feature());
    assert!(err.to_string().contains("`Posts`"), "{err}");

    let fragment = assert_ok!(Serializer::new(&Capability::POSTGRESQL).serialize(&query));
    assert!(fragment.sql.contains(r#" RIGHT OUTER JOIN "posts" AS "Posts""#));
}

#[test]
fn optional_include_wraps_required_children() {
    let mut comments = include(
        "Posts.Comments",
        "comments",
        JoinOn {
            lhs: column("Posts", "id"),
            rhs: column("Posts->Comments", "postId"),
        },
        &["body"],
    );
    comments.join = JoinKind::Inner;
    comments.required = true;

    let mut node = posts();
    node.columns.truncate(1);
    node.children = vec![comments];

    let mut query = users();
    query.columns.truncate(1);
    query.includes = vec![node];

    let fragment = assert_ok!(Serializer::new(&Capability::SQLITE).serialize(&query));
    assert_eq!(
        fragment.sql,
        r#"SELECT "User"."id", "Posts"."id" AS "Posts.id", "Posts->Comments"."body" AS "Posts.Comments.body" FROM "users" AS "User" LEFT OUTER JOIN ("posts" AS "Posts" INNER JOIN "comments" AS "Posts->Comments" ON "Posts"."id" = "Posts->Comments"."postId") ON "User"."id" = "Posts"."userId";"#
    );
}

#[test]
fn many_to_many_join_unit() {
    let mut node = include(
        "Projects",
        "projects",
        JoinOn {
            lhs: column("User", "id"),
            rhs: column("Projects->UserProjects", "userId"),
        },
        &["id"],
    );
    node.through = Some(ThroughNode {
        table: TableRef::aliased("user_projects", "Projects->UserProjects"),
        columns: vec![SelectColumn::aliased(
            column("Projects->UserProjects", "role"),
            "Projects.UserProjects.role",
        )],
        on: JoinOn {
            lhs: column("Projects", "id"),
            rhs: column("Projects->UserProjects", "projectId"),
        },
        filter: Some(Expr::eq(column("Projects->UserProjects", "role"), "owner")),
    });

    let mut query = users();
    query.columns.truncate(1);
    query.includes = vec![node];

    let fragment = assert_ok!(Serializer::new(&Capability::SQLITE).serialize(&query));
    assert_eq!(
        fragment.sql,
        r#"SELECT "User"."id", "Projects"."id" AS "Projects.id", "Projects->UserProjects"."role" AS "Projects.UserProjects.role" FROM "users" AS "User" LEFT OUTER JOIN ("user_projects" AS "Projects->UserProjects" INNER JOIN "projects" AS "Projects" ON "Projects"."id" = "Projects->UserProjects"."projectId" AND "Projects->UserProjects"."role" = $1) ON "User"."id" = "Projects->UserProjects"."userId";"#
    );
    assert_eq!(fragment.binds, [Value::from("owner")]);
}

#[test]
fn subquery_pagination() {
    let mut query = users();
    query.includes = vec![posts()];
    query.sub_query = true;
    query.limit = Some(2);

    let fragment = assert_ok!(Serializer::new(&Capability::POSTGRESQL).serialize(&query));
    assert_eq!(
        fragment.sql,
        r#"SELECT "User".*, "Posts"."id" AS "Posts.id", "Posts"."title" AS "Posts.title" FROM (SELECT "User"."id", "User"."name" FROM "users" AS "User" LIMIT 2) AS "User" LEFT OUTER JOIN "posts" AS "Posts" ON "User"."id" = "Posts"."userId";"#
    );
    assert_eq!(fragment.sql.matches("LIMIT").count(), 1);
}

#[test]
fn subquery_on_fetch_dialect_keeps_key_order_outside() {
    let mut query = users();
    query.includes = vec![posts()];
    query.sub_query = true;
    query.limit = Some(2);

    let fragment = assert_ok!(Serializer::new(&Capability::MSSQL).serialize(&query));
    assert_eq!(
        fragment.sql,
        "SELECT [User].*, [Posts].[id] AS [Posts.id], [Posts].[title] AS [Posts.title] FROM (SELECT [User].[id], [User].[name] FROM [users] AS [User] ORDER BY [User].[id] OFFSET 0 ROWS FETCH NEXT 2 ROWS ONLY) AS [User] LEFT OUTER JOIN [posts] AS [Posts] ON [User].[id] = [Posts].[userId] ORDER BY [User].[id];"
    );
}

#[test]
fn table_aliases_without_as() {
    let mut query = users();
    query.limit = Some(1);

    let fragment = assert_ok!(Serializer::new(&Capability::ORACLE).serialize(&query));
    assert_eq!(
        fragment.sql,
        r#"SELECT "User"."id", "User"."name" FROM "users" "User" ORDER BY "User"."id" OFFSET 0 ROWS FETCH NEXT 1 ROWS ONLY;"#
    );

    let mut query = users();
    query.includes = vec![posts()];
    query.sub_query = true;
    query.limit = Some(1);

    let fragment = assert_ok!(Serializer::new(&Capability::ORACLE).serialize(&query));
    assert!(!fragment.sql.contains(" AS \"User\""), "{}", fragment.sql);
    assert!(fragment.sql.contains(r#") "User" LEFT OUTER JOIN "posts" "Posts" ON"#), "{}", fragment.sql);

    let query = posts_by_user(vec![Value::from(1), Value::from(2)]);
    let fragment = assert_ok!(Serializer::new(&Capability::ORACLE).serialize(&query));
    assert!(fragment.sql.contains(r#") "sub" UNION ALL SELECT"#), "{}", fragment.sql);
    assert!(fragment.sql.ends_with(r#") "Post" ORDER BY "Post"."id";"#), "{}", fragment.sql);
}

#[test]
fn subquery_orders_inside_and_outside() {
    let mut query = users();
    query.includes = vec![posts()];
    query.sub_query = true;
    query.limit = Some(2);
    query.order_by = vec![
        Ordering {
            expr: column("User", "name").into(),
            outer: column("User", "name").into(),
            direction: Some(Direction::Asc),
            in_subquery: true,
        },
        Ordering {
            expr: column("Posts", "title").into(),
            outer: column("Posts", "title").into(),
            direction: None,
            in_subquery: false,
        },
    ];

    let fragment = assert_ok!(Serializer::new(&Capability::SQLITE).serialize(&query));
    assert!(fragment
        .sql
        .contains(r#"FROM "users" AS "User" ORDER BY "User"."name" ASC LIMIT 2) AS "User""#));
    assert!(fragment
        .sql
        .ends_with(r#"ORDER BY "User"."name" ASC, "Posts"."title";"#));
}

#[test]
fn required_multi_row_include_filters_subquery() {
    let mut node = posts();
    node.join = JoinKind::Inner;
    node.required = true;
    node.filter = Some(Expr::eq(column("Posts", "published"), true));
    node.subquery_filter = Some(column("User", "id"));

    let mut query = users();
    query.includes = vec![node];
    query.sub_query = true;
    query.limit = Some(2);
    query.filter = Some(Expr::eq(column("User", "name"), "alice"));

    let fragment = assert_ok!(Serializer::new(&Capability::SQLITE).serialize(&query));
    assert_eq!(
        fragment.sql,
        r#"SELECT "User".*, "Posts"."id" AS "Posts.id", "Posts"."title" AS "Posts.title" FROM (SELECT "User"."id", "User"."name" FROM "users" AS "User" WHERE "User"."name" = $1 AND EXISTS (SELECT 1 FROM "posts" AS "Posts" WHERE "User"."id" = "Posts"."userId" AND "Posts"."published" = $2) LIMIT 2) AS "User" INNER JOIN "posts" AS "Posts" ON "User"."id" = "Posts"."userId" AND "Posts"."published" = $3;"#
    );
    assert_eq!(
        fragment.binds,
        [Value::from("alice"), Value::from(true), Value::from(true)]
    );
}

#[test]
fn subquery_include_joins_inside() {
    let mut profile = include(
        "Profile",
        "profiles",
        JoinOn {
            lhs: column("User", "id"),
            rhs: column("Profile", "userId"),
        },
        &["bio"],
    );
    profile.join = JoinKind::Inner;
    profile.required = true;
    profile.multiple = false;
    profile.in_subquery = true;

    let mut query = users();
    query.columns.truncate(1);
    query.includes = vec![profile, posts()];
    query.sub_query = true;
    query.limit = Some(2);

    let fragment = assert_ok!(Serializer::new(&Capability::SQLITE).serialize(&query));
    assert_eq!(
        fragment.sql,
        r#"SELECT "User".*, "Posts"."id" AS "Posts.id", "Posts"."title" AS "Posts.title" FROM (SELECT "User"."id", "Profile"."bio" AS "Profile.bio" FROM "users" AS "User" INNER JOIN "profiles" AS "Profile" ON "User"."id" = "Profile"."userId" LIMIT 2) AS "User" LEFT OUTER JOIN "posts" AS "Posts" ON "User"."id" = "Posts"."userId";"#
    );
}

fn posts_by_user(values: Vec<Value>) -> Select {
    let mut query = select(
        TableRef::aliased("posts", "Post"),
        vec![
            SelectColumn::new(column("Post", "id")),
            SelectColumn::new(column("Post", "userId")),
        ],
    );
    query.grouped_limit = Some(GroupedLimitPlan {
        limit: 3,
        values,
        scope: GroupScope::Column(column("Post", "userId")),
    });
    query
}

#[test]
fn grouped_limit_unions_branches() {
    let query = posts_by_user(vec![Value::from(1), Value::from(2)]);

    let fragment = assert_ok!(Serializer::new(&Capability::SQLITE)
        .bind_params(false)
        .serialize(&query));
    assert_eq!(
        fragment.sql,
        r#"SELECT "Post".* FROM (SELECT * FROM (SELECT "Post"."id", "Post"."userId" FROM "posts" AS "Post" WHERE "Post"."userId" = 1 LIMIT 3) AS "sub" UNION ALL SELECT * FROM (SELECT "Post"."id", "Post"."userId" FROM "posts" AS "Post" WHERE "Post"."userId" = 2 LIMIT 3) AS "sub") AS "Post" ORDER BY "Post"."id";"#
    );
}

#[test]
fn grouped_limit_numbers_binds_across_branches() {
    let mut query = posts_by_user(vec![Value::from(7), Value::from(8), Value::from(9)]);
    query.filter = Some(Expr::eq(column("Post", "published"), true));

    let fragment = assert_ok!(Serializer::new(&Capability::POSTGRESQL).serialize(&query));
    assert!(fragment
        .sql
        .contains(r#"WHERE "Post"."userId" = $5 AND "Post"."published" = $6 LIMIT 3"#));
    assert_eq!(
        fragment.binds,
        [
            Value::from(7),
            Value::from(true),
            Value::from(8),
            Value::from(true),
            Value::from(9),
            Value::from(true),
        ]
    );
    assert_eq!(fragment.sql.matches(" UNION ALL ").count(), 2);
    assert_eq!(fragment.sql.matches("ORDER BY").count(), 1);
}

#[test]
fn grouped_limit_without_union_all() {
    let capability = Capability {
        union_all: false,
        ..Capability::SQLITE
    };
    let query = posts_by_user(vec![Value::from(1), Value::from(2)]);

    let fragment = assert_ok!(Serializer::new(&capability).serialize(&query));
    assert!(fragment.sql.contains(r#" AS "sub" UNION SELECT * FROM"#));
}

#[test]
fn grouped_limit_requires_values() {
    let query = posts_by_user(vec![]);
    let err = assert_err!(Serializer::new(&Capability::SQLITE).serialize(&query));
    assert!(err.is_query());
}

#[test]
fn serializing_twice_is_identical() {
    let mut query = users();
    query.includes = vec![posts()];
    query.sub_query = true;
    query.limit = Some(5);
    query.filter = Some(Expr::in_list(column("User", "id"), [1, 2, 3]));

    let serializer = Serializer::new(&Capability::POSTGRESQL);
    assert_eq!(
        assert_ok!(serializer.serialize(&query)),
        assert_ok!(serializer.serialize(&query))
    );
}
