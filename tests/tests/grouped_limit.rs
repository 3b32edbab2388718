use joinery::{col, Expr, FindOptions, GroupedLimit, Include, OrderBy, Value};
use tests::{fixtures, tests, DbTest};

async fn one_branch_per_distinct_value(test: &mut DbTest) {
    let db = test.setup_db(&mut fixtures::blog());

    let fragment = db
        .compile(
            &FindOptions::model("Post")
                .filter(Expr::eq(col("published"), true))
                .grouped_limit(GroupedLimit::new(3, "User", "Posts", [4, 5, 4, 6])),
        )
        .unwrap();

    let union = if test.capability().union_all {
        " UNION ALL "
    } else {
        " UNION "
    };

    assert_eq!(fragment.sql.matches(union).count(), 2, "{}", fragment.sql);

    // Each branch binds its partition value and the shared filter
    assert_eq!(fragment.binds.len(), 6);
    assert_eq!(fragment.binds[0], Value::from(4));
    assert_eq!(fragment.binds[2], Value::from(5));
    assert_eq!(fragment.binds[4], Value::from(6));
}

async fn outer_query_orders_once(test: &mut DbTest) {
    let db = test.setup_db(&mut fixtures::blog());

    let fragment = db
        .compile(
            &FindOptions::model("Project")
                .order_by(OrderBy::asc("name"))
                .grouped_limit(GroupedLimit::new(2, "User", "Projects", [1, 2])),
        )
        .unwrap();

    let quote = test.capability().quote;
    let root = format!("{}Project{}", quote.open, quote.close);
    let (_, outer) = fragment
        .sql
        .rsplit_once(&format!("){}", test.table_alias("Project")))
        .unwrap();

    assert_eq!(outer.matches(" ORDER BY ").count(), 1, "{}", fragment.sql);
    assert!(outer.ends_with(&format!(" ORDER BY {root}.{}name{} ASC;", quote.open, quote.close)));

    // Branches join the junction table to scope each partition
    assert_eq!(
        fragment.sql.matches(" INNER JOIN ").count(),
        2,
        "{}",
        fragment.sql
    );
}

tests!(one_branch_per_distinct_value, outer_query_orders_once);

#[test]
fn grouped_limit_rejects_a_row_limit() {
    let db = fixtures::blog()
        .dialect(joinery::Dialect::Postgres)
        .build()
        .unwrap();

    let err = db
        .compile(
            &FindOptions::model("Post")
                .limit(10)
                .grouped_limit(GroupedLimit::new(3, "User", "Posts", [1])),
        )
        .unwrap_err();

    assert!(err.is_query());
}

#[test]
fn grouped_limit_with_include() {
    let db = fixtures::blog()
        .dialect(joinery::Dialect::Postgres)
        .build()
        .unwrap();

    let fragment = db
        .compile(
            &FindOptions::model("Post")
                .attributes(["id"])
                .include(Include::alias("Comments").attributes(["body"]))
                .grouped_limit(GroupedLimit::new(1, "User", "Posts", [1])),
        )
        .unwrap();

    assert!(
        fragment.sql.ends_with(concat!(
            r#") AS "Post" LEFT OUTER JOIN "comments" AS "Comments" "#,
            r#"ON "Post"."id" = "Comments"."postId" ORDER BY "Post"."id";"#,
        )),
        "{}",
        fragment.sql
    );
}
