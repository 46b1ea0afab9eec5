//! A single include/exclude rule over a (schema, table) pair.

use std::fmt;
use std::str::FromStr;

use super::error::{Axis, SelectionError, SelectionResult};

/// Textual wildcard token meaning "any name on this axis".
pub const ANY: &str = "*";

/// Include every table in every schema.
pub const INCLUSIVE_ALL: TableSelection = TableSelection {
    schema: NamePattern::Any,
    table: NamePattern::Any,
    exclude: false,
};

/// Exclude every table in every schema.
pub const EXCLUSIVE_ALL: TableSelection = TableSelection {
    schema: NamePattern::Any,
    table: NamePattern::Any,
    exclude: true,
};

/// One axis of a selection rule: either the wildcard or a concrete name.
///
/// Keeping the wildcard as its own variant means a concrete catalog name can
/// never be mistaken for it, even a name literally spelled `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NamePattern {
    /// Matches any name.
    Any,
    /// Matches exactly this name.
    Name(String),
}

impl NamePattern {
    /// Parse a pattern, treating [`ANY`] as the wildcard.
    pub fn parse(axis: Axis, s: &str) -> SelectionResult<Self> {
        if s == ANY {
            Ok(NamePattern::Any)
        } else {
            require_name(axis, s)?;
            Ok(NamePattern::Name(s.to_string()))
        }
    }

    /// A concrete name on `axis` must not be empty.
    pub fn validate(&self, axis: Axis) -> SelectionResult<()> {
        match self {
            NamePattern::Any => Ok(()),
            NamePattern::Name(name) => require_name(axis, name),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, NamePattern::Any)
    }

    /// Does this pattern accept the concrete `name`?
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Any => true,
            NamePattern::Name(n) => n == name,
        }
    }

    /// Does every name accepted by `other` also satisfy this pattern?
    pub fn covers(&self, other: &NamePattern) -> bool {
        match (self, other) {
            (NamePattern::Any, _) => true,
            (NamePattern::Name(_), NamePattern::Any) => false,
            (NamePattern::Name(a), NamePattern::Name(b)) => a == b,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NamePattern::Any => ANY,
            NamePattern::Name(n) => n,
        }
    }
}

/// Names that would read back as something else are written in double
/// quotes, embedded quotes doubled.
fn needs_quoting(name: &str) -> bool {
    name == ANY
        || name.is_empty()
        || name.starts_with('!')
        || name.trim() != name
        || name.contains(['.', '"'])
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamePattern::Name(name) if needs_quoting(name) => {
                write!(f, "\"{}\"", name.replace('"', "\"\""))
            }
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Fail when a concrete name is empty.
pub(crate) fn require_name(axis: Axis, name: &str) -> SelectionResult<()> {
    if name.is_empty() {
        Err(SelectionError::EmptyName(axis))
    } else {
        Ok(())
    }
}

/// A schema/table rule and whether it includes or excludes what it matches.
///
/// Selections compare by value over all three fields. They are immutable once
/// built, which is what lets [`TableSelectionSet`](super::TableSelectionSet)
/// reason about them by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableSelection {
    schema: NamePattern,
    table: NamePattern,
    exclude: bool,
}

impl TableSelection {
    /// Build a selection from textual patterns, where [`ANY`] is the wildcard.
    ///
    /// # Errors
    /// Returns [`SelectionError::EmptyName`] if either pattern is empty.
    pub fn new(schema: &str, table: &str, exclude: bool) -> SelectionResult<Self> {
        Ok(Self {
            schema: NamePattern::parse(Axis::Schema, schema)?,
            table: NamePattern::parse(Axis::Table, table)?,
            exclude,
        })
    }

    /// Build a selection from already-parsed patterns.
    ///
    /// # Errors
    /// Returns [`SelectionError::EmptyName`] if a concrete name is empty.
    pub fn from_patterns(
        schema: NamePattern,
        table: NamePattern,
        exclude: bool,
    ) -> SelectionResult<Self> {
        schema.validate(Axis::Schema)?;
        table.validate(Axis::Table)?;
        Ok(Self {
            schema,
            table,
            exclude,
        })
    }

    /// Inclusion rule for `schema`.`table`.
    pub fn include(schema: &str, table: &str) -> SelectionResult<Self> {
        Self::new(schema, table, false)
    }

    /// Exclusion rule for `schema`.`table`.
    pub fn exclude(schema: &str, table: &str) -> SelectionResult<Self> {
        Self::new(schema, table, true)
    }

    /// Rule covering every table of one schema.
    pub fn any_table(schema: &str, exclude: bool) -> SelectionResult<Self> {
        Self::from_patterns(NamePattern::parse(Axis::Schema, schema)?, NamePattern::Any, exclude)
    }

    /// Rule covering one table name in every schema.
    pub fn any_schema(table: &str, exclude: bool) -> SelectionResult<Self> {
        Self::from_patterns(NamePattern::Any, NamePattern::parse(Axis::Table, table)?, exclude)
    }

    pub fn schema(&self) -> &NamePattern {
        &self.schema
    }

    pub fn table(&self) -> &NamePattern {
        &self.table
    }

    pub fn is_exclude(&self) -> bool {
        self.exclude
    }

    /// Specificity class: 0 when both axes are wildcards, 1 when one is,
    /// 2 when both are concrete.
    pub fn rank(&self) -> u8 {
        u8::from(!self.schema.is_any()) + u8::from(!self.table.is_any())
    }

    /// Check whether this rule matches a concrete catalog table.
    ///
    /// # Errors
    /// Returns [`SelectionError::EmptyName`] if either name is empty. Callers
    /// must pass real catalog names here, never patterns.
    pub fn matches(&self, schema_name: &str, table_name: &str) -> SelectionResult<bool> {
        require_name(Axis::Schema, schema_name)?;
        require_name(Axis::Table, table_name)?;

        Ok(self.schema.matches(schema_name) && self.table.matches(table_name))
    }

    /// Does this rule make `other` redundant?
    ///
    /// True when both rules have the same sign and every table `other`
    /// matches is matched by `self`. A rule dominates itself.
    pub fn dominates(&self, other: &TableSelection) -> bool {
        self.exclude == other.exclude
            && self.schema.covers(&other.schema)
            && self.table.covers(&other.table)
    }
}

impl fmt::Display for TableSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exclude {
            f.write_str("!")?;
        }
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// One dot-separated part of a textual rule.
enum Segment {
    /// Written as is; `*` is the wildcard.
    Bare(String),
    /// Written in double quotes; always a concrete name.
    Quoted(String),
}

impl Segment {
    fn into_pattern(self, axis: Axis) -> SelectionResult<NamePattern> {
        match self {
            Segment::Bare(text) => NamePattern::parse(axis, &text),
            Segment::Quoted(name) => {
                require_name(axis, &name)?;
                Ok(NamePattern::Name(name))
            }
        }
    }
}

/// Split a rule on dots outside double quotes.
///
/// `None` when a quote is left open or text follows a closing quote.
fn split_segments(rule: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut chars = rule.chars().peekable();

    loop {
        let segment = if chars.next_if_eq(&'"').is_some() {
            let mut name = String::new();
            loop {
                match chars.next()? {
                    '"' if chars.next_if_eq(&'"').is_some() => name.push('"'),
                    '"' => break,
                    c => name.push(c),
                }
            }
            Segment::Quoted(name)
        } else {
            let mut text = String::new();
            while let Some(c) = chars.next_if(|c| *c != '.') {
                text.push(c);
            }
            Segment::Bare(text)
        };
        segments.push(segment);

        match chars.next() {
            None => return Some(segments),
            Some('.') => {}
            Some(_) => return None,
        }
    }
}

impl FromStr for TableSelection {
    type Err = SelectionError;

    /// Parse `[!]schema.table` or `[!]table` (any schema). A name may be
    /// double-quoted to hold `.`, `"` or a literal `*`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (exclude, rule) = match text.strip_prefix('!') {
            Some(rest) => (true, rest.trim()),
            None => (false, text),
        };

        if rule.is_empty() {
            return Err(SelectionError::Malformed(s.to_string()));
        }

        let segments =
            split_segments(rule).ok_or_else(|| SelectionError::Malformed(s.to_string()))?;
        let mut segments = segments.into_iter();
        match (segments.next(), segments.next(), segments.next()) {
            (Some(table), None, None) => {
                Self::from_patterns(NamePattern::Any, table.into_pattern(Axis::Table)?, exclude)
            }
            (Some(schema), Some(table), None) => Self::from_patterns(
                schema.into_pattern(Axis::Schema)?,
                table.into_pattern(Axis::Table)?,
                exclude,
            ),
            _ => Err(SelectionError::Malformed(s.to_string())),
        }
    }
}
