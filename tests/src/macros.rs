/// Runs each listed test once per built-in dialect.
///
/// Every test is an `async fn(&mut DbTest)`.
#[macro_export]
macro_rules! tests {
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+
    ) => {
        $crate::tests!(@dialect sqlite, Sqlite, $( $( #[$attrs] )* $f ),+);
        $crate::tests!(@dialect postgres, Postgres, $( $( #[$attrs] )* $f ),+);
        $crate::tests!(@dialect mysql, Mysql, $( $( #[$attrs] )* $f ),+);
        $crate::tests!(@dialect mariadb, Mariadb, $( $( #[$attrs] )* $f ),+);
        $crate::tests!(@dialect mssql, Mssql, $( $( #[$attrs] )* $f ),+);
        $crate::tests!(@dialect oracle, Oracle, $( $( #[$attrs] )* $f ),+);
        $crate::tests!(@dialect db2, Db2, $( $( #[$attrs] )* $f ),+);
        $crate::tests!(@dialect snowflake, Snowflake, $( $( #[$attrs] )* $f ),+);
    };
    (
        @dialect $module:ident, $dialect:ident,
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+
    ) => {
        mod $module {
            $(
                #[test]
                $( #[$attrs] )*
                fn $f() {
                    let mut test = $crate::JoineryTest::new(
                        $crate::DbTest::new(joinery::Dialect::$dialect)
                    );

                    test.run_test(|mut db_test| async move {
                        super::$f(&mut db_test).await;
                    });
                }
            )*
        }
    };
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident,
        )+
    ) => {
        $crate::tests!( $(
            $( #[$attrs] )*
            $f
        ),+ );
    }
}
