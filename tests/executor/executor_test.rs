use reveng::executor::{
    ConnectionSource, ExecutorError, RelationalConnection, SqlCommand, SqlExecutor, SqlValue,
    SqliteExecutor,
};
use tempfile::TempDir;

fn file_connection(dir: &TempDir) -> RelationalConnection {
    RelationalConnection::file(dir.path().join("test.db"))
}

fn create_orders(executor: &SqliteExecutor, conn: &mut RelationalConnection) {
    executor
        .execute_non_query(
            conn,
            &[
                SqlCommand::new("CREATE TABLE orders (id INTEGER PRIMARY KEY, customer TEXT, total REAL)"),
                SqlCommand::new("INSERT INTO orders (customer, total) VALUES (?, ?)")
                    .bind("alice")
                    .bind(SqlValue::Real(12.5)),
                SqlCommand::new("INSERT INTO orders (customer, total) VALUES (?, NULL)").bind("bob"),
            ],
        )
        .unwrap();
}

#[test]
fn test_non_query_returns_rows_affected() {
    let dir = TempDir::new().unwrap();
    let executor = SqliteExecutor::new();
    let mut conn = file_connection(&dir);
    create_orders(&executor, &mut conn);

    let affected = executor
        .execute_non_query(
            &mut conn,
            &[SqlCommand::new("UPDATE orders SET total = 0 WHERE total IS NULL")],
        )
        .unwrap();

    assert_eq!(affected, 1);
    assert!(!conn.is_open());
}

#[test]
fn test_scalar() {
    let dir = TempDir::new().unwrap();
    let executor = SqliteExecutor::new();
    let mut conn = file_connection(&dir);
    create_orders(&executor, &mut conn);

    assert_eq!(
        executor.execute_scalar(&mut conn, "SELECT COUNT(*) FROM orders").unwrap(),
        Some(SqlValue::Integer(2))
    );
    assert_eq!(
        executor
            .execute_scalar(&mut conn, "SELECT customer FROM orders WHERE id = 99")
            .unwrap(),
        None
    );
}

#[test]
fn test_reader_returns_named_columns() {
    let dir = TempDir::new().unwrap();
    let executor = SqliteExecutor::new();
    let mut conn = file_connection(&dir);
    create_orders(&executor, &mut conn);

    let rows = executor
        .execute_reader(&mut conn, "SELECT id, customer, total FROM orders ORDER BY id")
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get_i64("id"), Some(1));
    assert_eq!(rows[0].get_str("customer"), Some("alice"));
    assert_eq!(rows[0].get("total"), Some(&SqlValue::Real(12.5)));
    assert_eq!(rows[1].get_str("customer"), Some("bob"));
    assert!(rows[1].get("total").unwrap().is_null());
}

#[test]
fn test_empty_command_is_rejected_before_anything_runs() {
    let dir = TempDir::new().unwrap();
    let executor = SqliteExecutor::new();
    let mut conn = file_connection(&dir);

    let result = executor.execute_non_query(
        &mut conn,
        &[SqlCommand::new("CREATE TABLE t (id INTEGER)"), SqlCommand::new("   ")],
    );
    assert!(matches!(result, Err(ExecutorError::EmptyCommand)));

    let tables = executor
        .execute_scalar(&mut conn, "SELECT COUNT(*) FROM sqlite_master WHERE name = 't'")
        .unwrap();
    assert_eq!(tables, Some(SqlValue::Integer(0)));

    assert!(matches!(
        executor.execute_scalar(&mut conn, ""),
        Err(ExecutorError::EmptyCommand)
    ));
}

#[test]
fn test_failed_batch_rolls_back_and_closes() {
    let dir = TempDir::new().unwrap();
    let executor = SqliteExecutor::new();
    let mut conn = file_connection(&dir);
    create_orders(&executor, &mut conn);

    let result = executor.execute_non_query(
        &mut conn,
        &[
            SqlCommand::new("DELETE FROM orders"),
            SqlCommand::new("INSERT INTO missing_table VALUES (1)"),
        ],
    );

    assert!(matches!(result, Err(ExecutorError::Sqlite(_))));
    assert!(!conn.is_open());
    assert_eq!(
        executor.execute_scalar(&mut conn, "SELECT COUNT(*) FROM orders").unwrap(),
        Some(SqlValue::Integer(2))
    );
}

#[test]
fn test_reader_error_closes_connection() {
    let executor = SqliteExecutor::new();
    let mut conn = RelationalConnection::in_memory();

    let result = executor.execute_reader(&mut conn, "SELECT * FROM nowhere");
    assert!(matches!(result, Err(ExecutorError::Sqlite(_))));
    assert!(!conn.is_open());
}

#[test]
fn test_caller_held_open_survives_execution() {
    let dir = TempDir::new().unwrap();
    let executor = SqliteExecutor::new();
    let mut conn = file_connection(&dir);

    conn.open().unwrap();
    executor
        .execute_non_query(&mut conn, &[SqlCommand::new("CREATE TABLE t (id INTEGER)")])
        .unwrap();
    assert!(conn.is_open());

    conn.close();
    assert!(!conn.is_open());
}

#[test]
fn test_connection_string_forms() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.db");
    let executor = SqliteExecutor::new();

    let mut writer =
        RelationalConnection::from_connection_string(&format!("Data Source={}", path.display()))
            .unwrap();
    executor
        .execute_non_query(&mut writer, &[SqlCommand::new("CREATE TABLE t (id INTEGER)")])
        .unwrap();

    let mut reader = RelationalConnection::from_connection_string(&path.display().to_string()).unwrap();
    assert_eq!(reader.source(), &ConnectionSource::File(path.clone()));
    assert_eq!(
        executor
            .execute_scalar(&mut reader, "SELECT COUNT(*) FROM sqlite_master WHERE name = 't'")
            .unwrap(),
        Some(SqlValue::Integer(1))
    );

    assert!(matches!(
        RelationalConnection::from_connection_string(""),
        Err(ExecutorError::EmptyConnectionString)
    ));
}

#[test]
fn test_parameterless_command_runs_a_whole_script() {
    let executor = SqliteExecutor::new();
    let mut conn = RelationalConnection::in_memory();

    let affected = executor
        .execute_non_query(
            &mut conn,
            &[SqlCommand::new(
                "CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT);
                 -- seed rows
                 INSERT INTO items (name) VALUES ('a'), ('b');
                 PRAGMA user_version;
                 UPDATE items SET name = upper(name);",
            )],
        )
        .unwrap();

    assert_eq!(affected, 4);
    assert_eq!(
        executor
            .execute_scalar(&mut conn, "SELECT name FROM items ORDER BY id LIMIT 1")
            .unwrap(),
        Some(SqlValue::Text("A".to_string()))
    );
}
