use joinery::{Db, Dialect, FindOptions};
use tests::fixtures;

fn assert_sync_send<T: Send + Sync>(val: T) -> T {
    val
}

fn assert_send<T: Send>(val: T) -> T {
    val
}

#[test]
fn db_is_shareable() {
    let db: Db = assert_sync_send(fixtures::blog().dialect(Dialect::Sqlite).build().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let db = db.clone();
            std::thread::spawn(move || {
                db.compile(&FindOptions::model("User").include("Posts").limit(i + 1))
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().sql.contains("LIMIT"));
    }
}

#[tokio::test]
async fn exec_future_is_send() {
    let db = fixtures::blog().dialect(Dialect::Sqlite).build().unwrap();
    let (mut connection, _log) =
        tests::LoggingConnection::new(*db.capability(), vec![]);

    let find = FindOptions::model("User");
    let rows = assert_send(db.exec(&mut connection, &find)).await.unwrap();
    assert!(rows.is_empty());
}
