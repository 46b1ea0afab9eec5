//! Entity and property names for reverse-engineered tables.
//!
//! Table names become singular PascalCase entity names (`order_items` →
//! `OrderItem`), column names become PascalCase property names
//! (`customer_id` → `CustomerId`).

use inflector::Inflector;

/// Plurals the inflector gets wrong for common table names.
static IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("analysis", "analyses"),
    ("basis", "bases"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("medium", "media"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("status", "statuses"),
];

/// Singularize one word, checking irregular forms before the inflector.
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    for (singular, plural) in IRREGULAR_PLURALS {
        if lower == *plural || lower == *singular {
            return singular.to_string();
        }
    }

    word.to_singular()
}

/// Entity name for a table: last word singularized, then PascalCase.
pub fn entity_name(table: &str) -> String {
    let singular = match table.rsplit_once('_') {
        Some((prefix, last)) if !last.is_empty() => format!("{}_{}", prefix, singularize(last)),
        _ => singularize(table),
    };
    singular.to_pascal_case()
}

/// Property name for a column.
pub fn property_name(column: &str) -> String {
    column.to_pascal_case()
}
