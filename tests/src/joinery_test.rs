use crate::DbTest;

/// Owns the Tokio runtime a test runs on.
///
/// Tests use `#[test]` and block on the runtime here so the `tests!` macro
/// can stamp out one test per dialect.
pub struct JoineryTest {
    runtime: tokio::runtime::Runtime,
    test: Option<DbTest>,
}

impl JoineryTest {
    /// Create a new JoineryTest with a current-thread runtime.
    pub fn new(test: DbTest) -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create Tokio runtime");

        Self {
            runtime,
            test: Some(test),
        }
    }

    pub fn run_test<F, Fut>(&mut self, test_fn: F)
    where
        F: FnOnce(DbTest) -> Fut,
        Fut: std::future::Future<Output = ()>,
    {
        let test = self.test.take().expect("DbTest already consumed");
        self.runtime.block_on(async {
            test_fn(test).await;
        });
    }
}
