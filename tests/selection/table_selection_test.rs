use reveng::selection::{
    Axis, NamePattern, SelectionError, TableSelection, ANY, EXCLUSIVE_ALL, INCLUSIVE_ALL,
};

#[test]
fn test_specific_selection_matches_only_its_table() {
    let selection = TableSelection::include("sales", "orders").unwrap();

    assert!(selection.matches("sales", "orders").unwrap());
    assert!(!selection.matches("sales", "customers").unwrap());
    assert!(!selection.matches("hr", "orders").unwrap());
}

#[test]
fn test_wildcard_axes_match_any_name() {
    let any_schema = TableSelection::any_schema("orders", false).unwrap();
    let any_table = TableSelection::any_table("sales", false).unwrap();

    assert!(any_schema.matches("sales", "orders").unwrap());
    assert!(any_schema.matches("archive", "orders").unwrap());
    assert!(!any_schema.matches("sales", "customers").unwrap());

    assert!(any_table.matches("sales", "orders").unwrap());
    assert!(any_table.matches("sales", "customers").unwrap());
    assert!(!any_table.matches("hr", "orders").unwrap());
}

#[test]
fn test_sign_does_not_affect_matching() {
    let exclusion = TableSelection::exclude("sales", ANY).unwrap();
    assert!(exclusion.matches("sales", "orders").unwrap());
    assert!(EXCLUSIVE_ALL.matches("any", "thing").unwrap());
}

#[test]
fn test_matching_requires_concrete_names() {
    let selection = TableSelection::any_schema("orders", false).unwrap();

    assert_eq!(
        selection.matches("", "orders"),
        Err(SelectionError::EmptyName(Axis::Schema))
    );
    assert_eq!(
        INCLUSIVE_ALL.matches("sales", ""),
        Err(SelectionError::EmptyName(Axis::Table))
    );
}

#[test]
fn test_construction_rejects_empty_patterns() {
    assert_eq!(
        TableSelection::any_table("", true),
        Err(SelectionError::EmptyName(Axis::Schema))
    );
    assert_eq!(
        TableSelection::any_schema("", false),
        Err(SelectionError::EmptyName(Axis::Table))
    );
}

#[test]
fn test_equality_is_by_value() {
    let a = TableSelection::include("A", ANY).unwrap();
    let b = TableSelection::from_patterns(
        NamePattern::Name("A".to_string()),
        NamePattern::Any,
        false,
    )
    .unwrap();

    assert_eq!(a, b);
    assert_eq!(TableSelection::include(ANY, ANY).unwrap(), INCLUSIVE_ALL);
    assert_ne!(INCLUSIVE_ALL, EXCLUSIVE_ALL);
}

#[test]
fn test_parse_and_display_rules() {
    let cases = [
        ("sales.orders", "sales.orders", false),
        ("orders", "*.orders", false),
        ("!sales.*", "!sales.*", true),
        ("!audit_log", "!*.audit_log", true),
        ("*.*", "*.*", false),
    ];

    for (rule, rendered, exclude) in cases {
        let selection: TableSelection = rule.parse().unwrap();
        assert_eq!(selection.to_string(), rendered, "rule {}", rule);
        assert_eq!(selection.is_exclude(), exclude, "rule {}", rule);
    }
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        "one.two.three".parse::<TableSelection>(),
        Err(SelectionError::Malformed(_))
    ));
    assert_eq!(
        ".orders".parse::<TableSelection>(),
        Err(SelectionError::EmptyName(Axis::Schema))
    );
}

#[test]
fn test_error_messages() {
    insta::assert_snapshot!(
        SelectionError::EmptyName(Axis::Schema).to_string(),
        @"schema name must not be empty"
    );
}

#[test]
fn test_empty_concrete_name_is_rejected() {
    assert_eq!(
        TableSelection::from_patterns(NamePattern::Name(String::new()), NamePattern::Any, false),
        Err(SelectionError::EmptyName(Axis::Schema))
    );
    assert_eq!(
        TableSelection::from_patterns(NamePattern::Any, NamePattern::Name(String::new()), true),
        Err(SelectionError::EmptyName(Axis::Table))
    );
}

#[test]
fn test_quoted_names_survive_display_and_parse() {
    let literal_star = TableSelection::from_patterns(
        NamePattern::Name("*".to_string()),
        NamePattern::Name("orders".to_string()),
        false,
    )
    .unwrap();
    let dotted = TableSelection::exclude("sales.eu", "orders.2024").unwrap();

    assert_eq!(literal_star.to_string(), r#""*".orders"#);
    assert_eq!(dotted.to_string(), r#"!"sales.eu"."orders.2024""#);

    for selection in [literal_star, dotted] {
        let reparsed: TableSelection = selection.to_string().parse().unwrap();
        assert_eq!(reparsed, selection);
    }

    let reparsed: TableSelection = r#""*".orders"#.parse().unwrap();
    assert!(!reparsed.matches("sales", "orders").unwrap());
    assert!(reparsed.matches("*", "orders").unwrap());
}
