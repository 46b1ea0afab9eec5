use reveng::executor::{RelationalConnection, SqlCommand, SqlExecutor, SqliteExecutor};
use reveng::metadata::{DatabaseModel, MetadataModelProvider, SqliteMetadataModelProvider};
use reveng::migrations::{Migration, Migrator};
use reveng::selection::{TableSelection, TableSelectionSet, ANY};
use tempfile::TempDir;

const SHOP_SCHEMA: &[&str] = &[
    "CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT, \
     status TEXT DEFAULT 'active')",
    "CREATE TABLE orders (id INTEGER PRIMARY KEY, \
     customer_id INTEGER NOT NULL REFERENCES customers (id), placed_at TEXT)",
    "CREATE TABLE order_items (order_id INTEGER NOT NULL, line INTEGER NOT NULL, \
     product TEXT, PRIMARY KEY (order_id, line), \
     FOREIGN KEY (order_id) REFERENCES orders)",
    "CREATE TABLE audit_log (id INTEGER PRIMARY KEY AUTOINCREMENT, message TEXT)",
];

fn create_shop(conn: &mut RelationalConnection) {
    let commands: Vec<SqlCommand> = SHOP_SCHEMA.iter().map(|sql| SqlCommand::new(*sql)).collect();
    SqliteExecutor::new().execute_non_query(conn, &commands).unwrap();
}

/// In-memory shop with a second schema `archive` attached.
fn shop_with_archive() -> RelationalConnection {
    let mut conn = RelationalConnection::in_memory();
    create_shop(&mut conn);

    // ATTACH is not allowed inside the executor's transaction
    conn.open().unwrap();
    conn.handle()
        .unwrap()
        .execute_batch(
            "ATTACH DATABASE ':memory:' AS archive;
             CREATE TABLE archive.orders (id INTEGER PRIMARY KEY, closed_at TEXT);
             CREATE TABLE archive.audit_log (id INTEGER PRIMARY KEY);",
        )
        .unwrap();
    conn.close();
    conn
}

fn provider() -> SqliteMetadataModelProvider {
    SqliteMetadataModelProvider::new(SqliteExecutor::new())
}

fn generate(conn: &mut RelationalConnection, selection: Option<&TableSelectionSet>) -> DatabaseModel {
    provider().generate_model(conn, selection).unwrap()
}

#[test]
fn test_no_selection_models_every_table() {
    let mut conn = shop_with_archive();
    let model = generate(&mut conn, None);

    assert_eq!(
        model.qualified_names(),
        vec![
            "main.audit_log",
            "main.customers",
            "main.order_items",
            "main.orders",
            "archive.audit_log",
            "archive.orders",
        ]
    );
}

#[test]
fn test_selection_filters_tables() {
    let mut conn = shop_with_archive();
    let selection = TableSelectionSet::from_rules(["main.*", "archive.orders", "!*.audit_log"]).unwrap();

    let model = generate(&mut conn, Some(&selection));

    assert_eq!(
        model.qualified_names(),
        vec!["main.customers", "main.order_items", "main.orders", "archive.orders"]
    );
}

#[test]
fn test_any_schema_selection_spans_attached_databases() {
    let mut conn = shop_with_archive();
    let mut selection = TableSelectionSet::new();
    selection.add_selections([TableSelection::any_schema("orders", false).unwrap()]);

    let model = generate(&mut conn, Some(&selection));

    assert_eq!(model.qualified_names(), vec!["main.orders", "archive.orders"]);
    assert_eq!(model.table("archive", "orders").unwrap().columns.len(), 2);
}

#[test]
fn test_empty_selection_set_selects_nothing() {
    let mut conn = shop_with_archive();
    let model = generate(&mut conn, Some(&TableSelectionSet::new()));
    assert!(model.tables.is_empty());

    let model = generate(&mut conn, Some(&TableSelectionSet::all()));
    assert_eq!(model.tables.len(), 6);
}

#[test]
fn test_columns_and_keys() {
    let mut conn = RelationalConnection::in_memory();
    create_shop(&mut conn);
    let model = generate(&mut conn, None);

    let customers = model.table("main", "customers").unwrap();
    assert_eq!(customers.entity_name, "Customer");
    assert_eq!(customers.primary_key, vec!["id"]);

    let id = customers.column("id").unwrap();
    assert_eq!(id.position, 0);
    assert_eq!(id.data_type, "INTEGER");
    assert!(!id.is_nullable);

    let name = customers.column("name").unwrap();
    assert!(!name.is_nullable);
    let email = customers.column("email").unwrap();
    assert!(email.is_nullable);
    assert_eq!(email.default_value, None);

    let status = customers.column("status").unwrap();
    assert_eq!(status.default_value.as_deref(), Some("'active'"));
    assert_eq!(status.property_name, "Status");

    let orders = model.table("main", "orders").unwrap();
    assert_eq!(orders.column("customer_id").unwrap().property_name, "CustomerId");
    assert_eq!(orders.foreign_keys.len(), 1);
    assert_eq!(orders.foreign_keys[0].columns, vec!["customer_id"]);
    assert_eq!(orders.foreign_keys[0].principal_schema, "main");
    assert_eq!(orders.foreign_keys[0].principal_table, "customers");
    assert_eq!(orders.foreign_keys[0].principal_columns, vec!["id"]);
}

#[test]
fn test_composite_key_and_implicit_foreign_key_target() {
    let mut conn = RelationalConnection::in_memory();
    create_shop(&mut conn);
    let model = generate(&mut conn, None);

    let items = model.table("main", "order_items").unwrap();
    assert_eq!(items.entity_name, "OrderItem");
    assert_eq!(items.primary_key, vec!["order_id", "line"]);
    assert!(!items.column("line").unwrap().is_nullable);
    assert!(items.column("product").unwrap().is_nullable);

    // REFERENCES orders with no column list targets the primary key
    assert_eq!(items.foreign_keys.len(), 1);
    assert_eq!(items.foreign_keys[0].principal_table, "orders");
    assert_eq!(items.foreign_keys[0].principal_columns, vec!["id"]);
}

#[test]
fn test_internal_and_history_tables_are_skipped() {
    let dir = TempDir::new().unwrap();
    let mut conn = RelationalConnection::file(dir.path().join("shop.db"));

    let migration = Migration::new(
        "0001_shop",
        "CREATE TABLE customers (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT);",
        "DROP TABLE customers;",
    )
    .unwrap();
    Migrator::new(SqliteExecutor::new(), vec![migration])
        .unwrap()
        .migrate(&mut conn, None)
        .unwrap();

    let model = generate(&mut conn, None);

    // AUTOINCREMENT creates sqlite_sequence
    assert_eq!(model.qualified_names(), vec!["main.customers"]);
}

#[test]
fn test_generate_from_connection_string() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shop.db");
    let mut conn = RelationalConnection::file(&path);
    create_shop(&mut conn);

    let mut selection = TableSelectionSet::new();
    selection.add_selections([
        TableSelection::include("main", ANY).unwrap(),
        TableSelection::exclude("main", "audit_log").unwrap(),
        TableSelection::exclude("main", "order_items").unwrap(),
    ]);

    let connection_string = format!("Data Source={}", path.display());
    let model = provider()
        .generate_metadata_model(&connection_string, Some(&selection))
        .unwrap();

    assert_eq!(model.qualified_names(), vec!["main.customers", "main.orders"]);
    assert!(!conn.is_open());
}

#[test]
fn test_model_serializes_to_json() {
    let mut conn = RelationalConnection::in_memory();
    SqliteExecutor::new()
        .execute_non_query(
            &mut conn,
            &[SqlCommand::new("CREATE TABLE tags (id INTEGER PRIMARY KEY, label TEXT)")],
        )
        .unwrap();

    let model = generate(&mut conn, None);
    let json = serde_json::to_string_pretty(&model).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "tables": [
        {
          "schema": "main",
          "name": "tags",
          "entity_name": "Tag",
          "columns": [
            {
              "name": "id",
              "position": 0,
              "data_type": "INTEGER",
              "is_nullable": false,
              "default_value": null,
              "property_name": "Id"
            },
            {
              "name": "label",
              "position": 1,
              "data_type": "TEXT",
              "is_nullable": true,
              "default_value": null,
              "property_name": "Label"
            }
          ],
          "primary_key": [
            "id"
          ],
          "foreign_keys": []
        }
      ]
    }
    "#);

    let parsed: DatabaseModel = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, model);
}

#[test]
fn test_unreachable_database_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no_such_dir").join("shop.db");

    let result = provider().generate_metadata_model(&missing.display().to_string(), None);
    assert!(result.is_err());
}

#[test]
fn test_missing_database_file_is_not_created() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("shpo.db");

    let result = provider().generate_metadata_model(&format!("Data Source={}", missing.display()), None);
    assert!(result.is_err());
    assert!(!missing.exists());
}
