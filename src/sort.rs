use std::cmp::Ordering;

use crate::columns::{is_numeric_column, to_number};
use crate::dataset::Table;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDir {
    Ascending,
    #[default]
    Descending,
}

impl SortDir {
    pub fn flipped(self) -> Self {
        match self {
            SortDir::Ascending => SortDir::Descending,
            SortDir::Descending => SortDir::Ascending,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDir::Ascending => "▲",
            SortDir::Descending => "▼",
        }
    }
}

/// Which column is active and in which direction. Initialized to no active
/// column; mutated only by header activation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortState {
    pub key: Option<String>,
    pub dir: SortDir,
}

impl SortState {
    /// Activating the current column toggles direction. Activating a new one
    /// starts descending for numeric columns and ascending for text columns.
    pub fn activate(&mut self, column: &str) {
        if self.key.as_deref() == Some(column) {
            self.dir = self.dir.flipped();
            return;
        }
        self.key = Some(column.to_string());
        self.dir = if is_numeric_column(column) {
            SortDir::Descending
        } else {
            SortDir::Ascending
        };
    }

    pub fn is_active(&self, column: &str) -> bool {
        self.key.as_deref() == Some(column)
    }
}

/// Ordered view over the table's records for the current sort state; natural
/// (file) order while no column is active. Any column sorts, numeric or not.
pub fn current_order(table: &Table, sort: &SortState) -> Vec<usize> {
    match sort.key.as_deref() {
        Some(key) => sorted_indices(table, key, sort.dir),
        None => (0..table.records.len()).collect(),
    }
}

/// Sort the records by one column without mutating them; the result is a new
/// index view. Numeric columns compare coerced values (blank and unparseable
/// cells become negative infinity), text columns compare ordinally with
/// missing values as empty text. No secondary tie-break is defined: equal
/// keys keep whatever relative order the sort leaves them in.
pub fn sorted_indices(table: &Table, column: &str, dir: SortDir) -> Vec<usize> {
    let mut order: Vec<usize> = (0..table.records.len()).collect();
    let Some(col) = table.header_index(column) else {
        return order;
    };
    let numeric = is_numeric_column(column);
    order.sort_by(|&ia, &ib| {
        let va = table.records[ia].field(col);
        let vb = table.records[ib].field(col);
        let ord = if numeric {
            to_number(va)
                .partial_cmp(&to_number(vb))
                .unwrap_or(Ordering::Equal)
        } else {
            va.cmp(vb)
        };
        match dir {
            SortDir::Ascending => ord,
            SortDir::Descending => ord.reverse(),
        }
    });
    order
}
