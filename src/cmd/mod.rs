//! Command modeling for dialog invocations.

use crate::error::DialogError;

/// Dialog variant requested from the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Error,
    Info,
    Warning,
    Question,
    TextInfo,
    Entry,
    Calendar,
    FileSelection,
    List,
    Progress,
}

impl Action {
    pub fn flag(&self) -> &'static str {
        match self {
            Action::Error => "error",
            Action::Info => "info",
            Action::Warning => "warning",
            Action::Question => "question",
            Action::TextInfo => "text-info",
            Action::Entry => "entry",
            Action::Calendar => "calendar",
            Action::FileSelection => "file-selection",
            Action::List => "list",
            Action::Progress => "progress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListKind {
    #[default]
    Plain,
    Radio,
    Checklist,
}

impl ListKind {
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            ListKind::Plain => None,
            ListKind::Radio => Some("radiolist"),
            ListKind::Checklist => Some("checklist"),
        }
    }
}

/// Ordered `--name[=value]` options. A `None` value renders as a bare flag.
///
/// Re-inserting a name replaces the value in place, so the first insertion
/// decides where the option lands on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet(Vec<(String, Option<String>)>);

impl OptionSet {
    pub fn new() -> Self { OptionSet(Vec::new()) }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.insert(name.into(), Some(value.into()));
        self
    }

    pub fn flag(&mut self, name: impl Into<String>) -> &mut Self {
        self.insert(name.into(), None);
        self
    }

    pub fn with(mut self, name: &str, value: &str) -> Self { self.set(name, value); self }
    pub fn with_flag(mut self, name: &str) -> Self { self.flag(name); self }

    pub fn insert(&mut self, name: String, value: Option<String>) {
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Append without replacing, for options the launcher accepts repeatedly.
    pub fn append(&mut self, name: impl Into<String>, value: Option<String>) {
        self.0.push((name.into(), value));
    }

    /// Overlay `other` on top of `self`; entries of `other` win.
    pub fn merge(&mut self, other: OptionSet) {
        for (k, v) in other.0 { self.insert(k, v); }
    }

    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

/// Tabular input for list dialogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from key/value records. Headers are the first record's
    /// keys with their first letter upper-cased; cells are taken in each
    /// record's own order.
    pub fn from_records<K, V>(records: &[Vec<(K, V)>]) -> Result<Self, DialogError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let first = records
            .first()
            .ok_or_else(|| DialogError::InvalidArgument("list data is empty".into()))?;
        let columns = first.iter().map(|(k, _)| title_case(k.as_ref())).collect();
        let rows = records
            .iter()
            .map(|r| r.iter().map(|(_, v)| v.as_ref().to_string()).collect())
            .collect();
        Ok(Table { columns, rows })
    }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    pub program: String,
    pub options: OptionSet,
    /// Positional arguments after the options, grouped by row.
    pub trailing: Vec<Vec<String>>,
    /// Interleave stderr into captured stdout.
    pub merge_stderr: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpec { program: program.into(), ..Default::default() }
    }

    /// Append the table as `--column` options followed by one row of cells per record.
    pub fn push_table(&mut self, table: &Table) {
        for col in &table.columns {
            self.options.append("column", Some(col.clone()));
        }
        self.trailing.extend(table.rows.iter().cloned());
    }
}
