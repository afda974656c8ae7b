//! Paging over the rows of a filtered table
//!
//! [`RowPager`] is handed the table it pages over and keeps only its own
//! cursor. It knows nothing about prompts; the caller decides whether to ask
//! for the next page.
//!
//! # Examples
//!
//! ```
//! use bikeshare_core::TabularDataset;
//! use bikeshare_terminal::preview::RowPager;
//!
//! let csv = "Start Station\nA\nB\nC\n";
//! let table = TabularDataset::from_csv_reader(csv.as_bytes()).unwrap();
//!
//! let mut pager = RowPager::new(&table, 2);
//! assert_eq!(pager.next_page().map(|p| p.len()), Some(2));
//! assert_eq!(pager.remaining(), 1);
//! assert_eq!(pager.next_page().map(|p| p.len()), Some(1));
//! assert!(pager.next_page().is_none());
//! ```

use bikeshare_core::dataset::{RowView, TabularDataset};
use std::ops::Range;

/// Rows shown per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Cursor over a table, one page at a time
#[derive(Debug, Clone)]
pub struct RowPager<'a> {
    table: &'a TabularDataset,
    page_size: usize,
    position: usize,
}

impl<'a> RowPager<'a> {
    /// Start at row 0; a page size of zero is treated as one
    pub fn new(table: &'a TabularDataset, page_size: usize) -> Self {
        Self {
            table,
            page_size: page_size.max(1),
            position: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the next row to be shown
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.table.row_count().saturating_sub(self.position)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Size of the page the next call would return
    pub fn next_page_len(&self) -> usize {
        self.remaining().min(self.page_size)
    }

    /// Advance by one page
    pub fn next_page(&mut self) -> Option<Page<'a>> {
        if self.is_exhausted() {
            return None;
        }
        let start = self.position;
        self.position += self.next_page_len();
        Some(Page {
            table: self.table,
            rows: start..self.position,
        })
    }
}

impl<'a> Iterator for RowPager<'a> {
    type Item = Page<'a>;

    fn next(&mut self) -> Option<Page<'a>> {
        self.next_page()
    }
}

/// A contiguous run of rows
#[derive(Debug, Clone)]
pub struct Page<'a> {
    table: &'a TabularDataset,
    rows: Range<usize>,
}

impl<'a> Page<'a> {
    pub fn table(&self) -> &'a TabularDataset {
        self.table
    }

    /// Index of the first row on the page
    pub fn start(&self) -> usize {
        self.rows.start
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'a str> {
        self.table.column_names()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'a>> + use<'a> {
        let table = self.table;
        self.rows.clone().filter_map(move |i| table.row(i))
    }
}
