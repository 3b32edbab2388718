use joinery::{driver::Pagination, Dialect, FindOptions, Include, OrderBy};
use tests::{fixtures, tests, DbTest};

fn quoted(test: &DbTest, name: &str) -> String {
    let quote = test.capability().quote;
    format!("{}{name}{}", quote.open, quote.close)
}

fn count_pages(test: &DbTest, sql: &str) -> usize {
    match test.capability().pagination {
        Pagination::Limit => sql.matches(" LIMIT ").count(),
        Pagination::Fetch => sql.matches("FETCH NEXT").count(),
        Pagination::Top => sql.matches("TOP").count(),
    }
}

async fn limit_applies_to_root_rows_once(test: &mut DbTest) {
    let db = test.setup_db(&mut fixtures::blog());

    let fragment = db
        .compile(
            &FindOptions::model("User")
                .include(Include::alias("Posts").include("Comments"))
                .order_by(OrderBy::desc("email"))
                .limit(10)
                .offset(20),
        )
        .unwrap();

    assert_eq!(count_pages(test, &fragment.sql), 1, "{}", fragment.sql);

    // The page is taken inside the derived root table
    let derived = format!("){}", test.table_alias("User"));
    let (inner, outer) = fragment.sql.split_once(&derived).unwrap();
    assert_eq!(count_pages(test, inner), 1);
    assert!(outer.contains("JOIN"));
    assert!(outer.contains("ORDER BY"));
}

async fn compile_is_deterministic(test: &mut DbTest) {
    let db = test.setup_db(&mut fixtures::blog());

    let find = FindOptions::model("User")
        .include("Posts")
        .include("Projects")
        .include("Profile")
        .order_by("email")
        .limit(3);

    let first = db.compile(&find).unwrap();

    for _ in 0..5 {
        assert_eq!(db.compile(&find).unwrap(), first);
    }
}

async fn offset_without_limit(test: &mut DbTest) {
    let db = test.setup_db(&mut fixtures::blog());

    let fragment = db
        .compile(&FindOptions::model("User").attributes(["id"]).offset(5))
        .unwrap();

    let expected = match test.dialect() {
        Dialect::Sqlite => " LIMIT -1 OFFSET 5;".to_string(),
        Dialect::Postgres => r#""User" OFFSET 5;"#.to_string(),
        Dialect::Mysql | Dialect::Mariadb => " LIMIT 18446744073709551615 OFFSET 5;".to_string(),
        Dialect::Snowflake => " LIMIT NULL OFFSET 5;".to_string(),
        Dialect::Mssql | Dialect::Oracle => format!(
            " ORDER BY {}.{} OFFSET 5 ROWS;",
            quoted(test, "User"),
            quoted(test, "id")
        ),
        Dialect::Db2 => r#""User" OFFSET 5 ROWS;"#.to_string(),
    };

    assert!(fragment.sql.ends_with(&expected), "{}", fragment.sql);
}

async fn fetch_pagination_is_ordered(test: &mut DbTest) {
    let capability = test.capability();
    let db = test.setup_db(&mut fixtures::blog());

    let fragment = db
        .compile(&FindOptions::model("Post").attributes(["title"]).limit(1))
        .unwrap();

    let ordered = fragment.sql.contains(" ORDER BY ");
    assert_eq!(
        ordered,
        capability.pagination == Pagination::Fetch && capability.fetch_requires_order,
        "{}",
        fragment.sql
    );
}

async fn table_aliases_follow_the_dialect(test: &mut DbTest) {
    let db = test.setup_db(&mut fixtures::blog());

    let fragment = db
        .compile(
            &FindOptions::model("User")
                .attributes(["id"])
                .include(Include::alias("Posts").attributes(["title"]))
                .limit(5),
        )
        .unwrap();

    let sql = &fragment.sql;
    let root = format!("FROM {}{}", quoted(test, "users"), test.table_alias("User"));
    let derived = format!("){}", test.table_alias("User"));
    let posts = format!("JOIN {}{}", quoted(test, "posts"), test.table_alias("Posts"));

    assert!(sql.contains(&root), "{sql}");
    assert!(sql.contains(&derived), "{sql}");
    assert!(sql.contains(&posts), "{sql}");

    if test.dialect() == Dialect::Oracle {
        assert!(!sql.contains(&format!(" AS {}", quoted(test, "User"))), "{sql}");
    }
}

tests!(
    table_aliases_follow_the_dialect,
    limit_applies_to_root_rows_once,
    compile_is_deterministic,
    offset_without_limit,
    fetch_pagination_is_ordered,
);
