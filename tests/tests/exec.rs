use joinery::{col, Capability, Connection, Dialect, Expr, FindOptions, Row, Value};
use tests::{assert_err, assert_ok, assert_some, fixtures, tests, DbTest, LoggingConnection};

async fn exec_sends_compiled_statement(test: &mut DbTest) {
    let db = test.setup_db(&mut fixtures::blog());

    let find = FindOptions::model("User")
        .attributes(["id", "email"])
        .filter(Expr::eq(col("email"), "a@b.com"));

    let row: Row = [("id", Value::from(1)), ("email", Value::from("a@b.com"))]
        .into_iter()
        .collect();

    let (mut connection, mut log) = test.connection(vec![row.clone()]);
    let rows = assert_ok!(db.exec(&mut connection, &find).await);

    assert_eq!(rows, vec![row]);
    assert_eq!(log.len(), 1);

    let query = assert_some!(log.pop());
    let fragment = assert_ok!(db.compile(&find));

    assert_eq!(query.sql, fragment.sql);
    assert_eq!(query.binds, vec![Value::from("a@b.com")]);
}

async fn exec_rejects_other_dialects(test: &mut DbTest) {
    let db = test.setup_db(&mut fixtures::blog());

    let other = match test.dialect() {
        Dialect::Sqlite => Capability::POSTGRESQL,
        _ => Capability::SQLITE,
    };

    let (mut connection, log) = LoggingConnection::new(other, vec![]);
    assert_err!(db.exec(&mut connection, &FindOptions::model("User")).await);
    assert!(log.is_empty());
    assert_ne!(connection.capability().dialect, test.dialect());
}

async fn compile_errors_reach_the_caller(test: &mut DbTest) {
    let db = test.setup_db(&mut fixtures::blog());
    let (mut connection, log) = test.connection(vec![]);

    let err = assert_err!(
        db.exec(&mut connection, &FindOptions::model("User").include("Nope"))
            .await
    );

    assert!(err.is_query());
    assert!(log.is_empty());
}

tests!(
    exec_sends_compiled_statement,
    exec_rejects_other_dialects,
    compile_errors_reach_the_caller,
);
