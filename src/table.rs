// src/table.rs
//
// Column model, sorting and pagination state behind every listing screen.
// Rows are any `Serialize` type; cells are looked up by key, where a dotted
// key ("patient.full_name") walks nested objects.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::pagination::{self, PageControls};

pub const DEFAULT_EMPTY_MESSAGE: &str = "No records found.";
pub const DEFAULT_LOADING_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Default)]
pub struct TableColumn {
    pub label: String,
    pub key: String,
    pub sortable: bool,
    pub hidden: bool,
    pub align: Align,
}

impl TableColumn {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortConfig {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: None,
            direction: SortDirection::Ascending,
        }
    }
}

pub type SortCallback = Box<dyn FnMut(&str, SortDirection) + Send>;

/// Fixed at construction. `Controlled` hands sorting to the owner (usually
/// a server-side sort); `SelfManaged` sorts the rows it is given.
pub enum SortMode {
    Controlled(SortCallback),
    SelfManaged,
}

impl std::fmt::Debug for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::Controlled(_) => f.write_str("Controlled"),
            SortMode::SelfManaged => f.write_str("SelfManaged"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_items: u64,
}

#[derive(Debug)]
pub struct DynamicTable {
    columns: Vec<TableColumn>,
    mode: SortMode,
    sort: SortConfig,
    pub page: Option<PageState>,
    pub empty_message: String,
    pub loading_rows: usize,
    pub is_loading: bool,
}

impl DynamicTable {
    pub fn self_managed(columns: Vec<TableColumn>) -> Self {
        Self::with_mode(columns, SortMode::SelfManaged, SortConfig::default())
    }

    /// `sort` is the owner's current sort, shown as the active indicator.
    pub fn controlled(columns: Vec<TableColumn>, sort: SortConfig, on_sort: SortCallback) -> Self {
        Self::with_mode(columns, SortMode::Controlled(on_sort), sort)
    }

    fn with_mode(columns: Vec<TableColumn>, mode: SortMode, sort: SortConfig) -> Self {
        Self {
            columns,
            mode,
            sort,
            page: None,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            loading_rows: DEFAULT_LOADING_ROWS,
            is_loading: false,
        }
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &TableColumn> {
        self.columns.iter().filter(|c| !c.hidden)
    }

    pub fn sort_config(&self) -> &SortConfig {
        &self.sort
    }

    /// Clicking a header: same column flips direction, a new column starts
    /// ascending. Unknown or non-sortable keys are ignored.
    pub fn handle_sort(&mut self, key: &str) {
        let sortable = self.columns.iter().any(|c| c.key == key && c.sortable);
        if !sortable {
            return;
        }
        let direction = match (&self.sort.key, self.sort.direction) {
            (Some(k), SortDirection::Ascending) if k == key => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        self.sort = SortConfig {
            key: Some(key.to_string()),
            direction,
        };
        if let SortMode::Controlled(on_sort) = &mut self.mode {
            on_sort(key, direction);
        }
    }

    /// Owner-side update after a controlled sort round-trip.
    pub fn set_sort(&mut self, sort: SortConfig) {
        self.sort = sort;
    }

    pub fn sort_indicator(&self, column: &TableColumn) -> Option<SortDirection> {
        match &self.sort.key {
            Some(k) if column.sortable && *k == column.key => Some(self.sort.direction),
            _ => None,
        }
    }

    /// Rows in display order. Self-managed tables return a sorted view;
    /// the caller's slice is never reordered.
    pub fn rows<'a, T: Serialize>(&self, data: &'a [T]) -> Vec<&'a T> {
        match (&self.mode, &self.sort.key) {
            (SortMode::SelfManaged, Some(key)) => sorted_by_key(data, key, self.sort.direction),
            _ => data.iter().collect(),
        }
    }

    pub fn pagination(&self) -> Option<PageControls> {
        let p = self.page?;
        pagination::controls(p.current_page, p.total_items, p.items_per_page)
    }
}

/// Stable sort over a borrowed view.
pub fn sorted_by_key<'a, T: Serialize>(data: &'a [T], key: &str, direction: SortDirection) -> Vec<&'a T> {
    let mut keyed: Vec<(Value, &'a T)> = data.iter().map(|row| (cell_value(row, key), row)).collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let ord = compare_values(a, b);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    keyed.into_iter().map(|(_, row)| row).collect()
}

pub fn cell_value<T: Serialize>(row: &T, key: &str) -> Value {
    let Ok(mut value) = serde_json::to_value(row) else {
        return Value::Null;
    };
    for part in key.split('.') {
        value = match value {
            Value::Object(mut map) => map.remove(part).unwrap_or(Value::Null),
            _ => return Value::Null,
        };
        if value.is_null() {
            break;
        }
    }
    value
}

/// Display text; missing values render empty.
pub fn cell_text<T: Serialize>(row: &T, column: &TableColumn) -> String {
    match cell_value(row, &column.key) {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

// null < bool < number < string < anything else
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            _ => 4,
        }
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
