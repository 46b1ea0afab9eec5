//! The selection resolution engine.

use std::fmt;

use super::error::{Axis, SelectionResult};
use super::selector::{require_name, TableSelection, INCLUSIVE_ALL};

/// Ordered include and exclude rules, kept free of duplicates and of rules
/// made redundant by a more general rule of the same sign.
///
/// The two lists never interact while rules are added: an exclusion never
/// removes an inclusion and vice versa. Surviving rules keep their original
/// relative order and each newly accepted rule goes to the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSelectionSet {
    inclusive: Vec<TableSelection>,
    exclusive: Vec<TableSelection>,
}

impl TableSelectionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding only [`INCLUSIVE_ALL`].
    pub fn all() -> Self {
        let mut set = Self::new();
        set.add_selection(INCLUSIVE_ALL);
        set
    }

    /// Build a set from textual rules such as `sales.*` or `!*.audit_log`.
    pub fn from_rules<I, S>(rules: I) -> SelectionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selections = rules
            .into_iter()
            .map(|rule| rule.as_ref().parse::<TableSelection>())
            .collect::<SelectionResult<Vec<_>>>()?;

        let mut set = Self::new();
        set.add_selections(selections);
        Ok(set)
    }

    /// Inclusion rules, in insertion order.
    pub fn inclusive_selections(&self) -> &[TableSelection] {
        &self.inclusive
    }

    /// Exclusion rules, in insertion order.
    pub fn exclusive_selections(&self) -> &[TableSelection] {
        &self.exclusive
    }

    pub fn is_empty(&self) -> bool {
        self.inclusive.is_empty() && self.exclusive.is_empty()
    }

    /// Add a batch of selections, one at a time and in order.
    pub fn add_selections<I>(&mut self, selections: I)
    where
        I: IntoIterator<Item = TableSelection>,
    {
        for selection in selections {
            self.add_selection(selection);
        }
    }

    /// Add one selection to the list matching its sign.
    ///
    /// Returns `false` when an existing rule already covers it, in which case
    /// nothing changes.
    pub fn add_selection(&mut self, selection: TableSelection) -> bool {
        let list = if selection.is_exclude() {
            &mut self.exclusive
        } else {
            &mut self.inclusive
        };
        insert(list, selection)
    }

    /// Is `schema_name`.`table_name` matched by some inclusion rule and by
    /// no exclusion rule?
    ///
    /// An empty set therefore selects nothing; use [`TableSelectionSet::all`]
    /// to start from everything.
    ///
    /// # Errors
    /// Returns [`SelectionError::EmptyName`](super::SelectionError::EmptyName)
    /// if either name is empty.
    pub fn is_selected(&self, schema_name: &str, table_name: &str) -> SelectionResult<bool> {
        require_name(Axis::Schema, schema_name)?;
        require_name(Axis::Table, table_name)?;

        if any_match(&self.exclusive, schema_name, table_name)? {
            return Ok(false);
        }
        any_match(&self.inclusive, schema_name, table_name)
    }
}

fn insert(list: &mut Vec<TableSelection>, selection: TableSelection) -> bool {
    if list.iter().any(|existing| existing.dominates(&selection)) {
        return false;
    }

    list.retain(|existing| !selection.dominates(existing));
    list.push(selection);
    true
}

fn any_match(list: &[TableSelection], schema_name: &str, table_name: &str) -> SelectionResult<bool> {
    for selection in list {
        if selection.matches(schema_name, table_name)? {
            return Ok(true);
        }
    }
    Ok(false)
}

impl fmt::Display for TableSelectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(list: &[TableSelection]) -> String {
            list.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }

        write!(
            f,
            "include=[{}] exclude=[{}]",
            join(&self.inclusive),
            join(&self.exclusive)
        )
    }
}
