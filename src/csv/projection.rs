//! Sorted, paginated view over a table
//!
//! The projection never reorders the table itself. It computes a permutation
//! of original row indices and slices one page out of it; every edit made
//! through the view goes back through [`Projection::original_index_of`].

use std::sync::Arc;

use super::model::{Row, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Column + direction. Natural order is `Option::<SortDescriptor>::None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDescriptor {
    pub column: String,
    pub direction: SortDirection,
}

impl SortDescriptor {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Next state after a header click on `column`
    ///
    /// none -> ascending -> descending -> none; clicking another column
    /// starts over at ascending.
    pub fn cycle(current: Option<&SortDescriptor>, column: &str) -> Option<SortDescriptor> {
        match current {
            Some(sort) if sort.column == column => match sort.direction {
                SortDirection::Ascending => Some(Self::descending(column)),
                SortDirection::Descending => None,
            },
            _ => Some(Self::ascending(column)),
        }
    }
}

/// Original row indices in display order
///
/// The sort is stable, so rows with equal keys keep their original relative
/// order in both directions. An unknown sort column sorts every row as the
/// empty string, which leaves the natural order.
pub fn sort_permutation(table: &Table, sort: Option<&SortDescriptor>) -> Vec<usize> {
    let mut permutation: Vec<usize> = (0..table.row_count()).collect();
    let Some(sort) = sort else {
        return permutation;
    };
    let Some(col) = table.column_index(&sort.column) else {
        tracing::debug!(column = %sort.column, "Sort column not in table, keeping natural order");
        return permutation;
    };

    // Lowercase each key once instead of on every comparison
    let keys: Vec<String> = table
        .rows()
        .iter()
        .map(|row| row.cell(col).unwrap_or_default().to_lowercase())
        .collect();

    match sort.direction {
        SortDirection::Ascending => permutation.sort_by(|&a, &b| keys[a].cmp(&keys[b])),
        SortDirection::Descending => permutation.sort_by(|&a, &b| keys[b].cmp(&keys[a])),
    }
    permutation
}

/// Number of pages for `row_count` rows (`page_size` 0 counts as 1)
pub fn page_count(row_count: usize, page_size: usize) -> usize {
    row_count.div_ceil(page_size.max(1))
}

/// Clamp a page request to `[0, page_count - 1]` (0 when there are no rows)
pub fn clamp_page(page_index: usize, row_count: usize, page_size: usize) -> usize {
    page_index.min(page_count(row_count, page_size).saturating_sub(1))
}

/// Move `page_index` by `delta`, clamped to the valid range
pub fn offset_page(page_index: usize, delta: i64, row_count: usize, page_size: usize) -> usize {
    let moved = if delta.is_negative() {
        page_index.saturating_sub(delta.unsigned_abs() as usize)
    } else {
        page_index.saturating_add(delta as usize)
    };
    clamp_page(moved, row_count, page_size)
}

/// One page of the sorted view
#[derive(Debug, Clone)]
pub struct Projection {
    permutation: Arc<[usize]>,
    page_index: usize,
    page_size: usize,
    start: usize,
    end: usize,
}

impl Projection {
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        page_count(self.permutation.len(), self.page_size)
    }

    /// Total rows across all pages
    pub fn total_rows(&self) -> usize {
        self.permutation.len()
    }

    /// Number of rows on this page
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Original row indices shown on this page, in display order
    pub fn page_indices(&self) -> &[usize] {
        &self.permutation[self.start..self.end]
    }

    /// Map a row position on this page to its index in the table
    pub fn original_index_of(&self, row_in_page: usize) -> Option<usize> {
        self.page_indices().get(row_in_page).copied()
    }

    /// Rows on this page, in display order
    pub fn visible_rows<'t>(&'t self, table: &'t Table) -> impl Iterator<Item = &'t Row> + 't {
        self.page_indices()
            .iter()
            .filter_map(move |&index| table.row(index))
    }

    pub fn is_first_page(&self) -> bool {
        self.page_index == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.page_index + 1 >= self.page_count()
    }

    /// "Showing 1 to 100 of 2,500 entries"
    pub fn range_label(&self) -> String {
        let first = if self.is_empty() { 0 } else { self.start + 1 };
        format!(
            "Showing {} to {} of {} entries",
            crate::util::format_count(first),
            crate::util::format_count(self.end),
            crate::util::format_count(self.total_rows())
        )
    }
}

/// Project `table` through `sort` and slice out one page
///
/// Out-of-range page requests are clamped to the nearest valid page.
pub fn project(
    table: &Table,
    sort: Option<&SortDescriptor>,
    page_index: usize,
    page_size: usize,
) -> Projection {
    paginate(sort_permutation(table, sort).into(), page_index, page_size)
}

fn paginate(permutation: Arc<[usize]>, page_index: usize, page_size: usize) -> Projection {
    let page_size = page_size.max(1);
    let total = permutation.len();
    let page_index = clamp_page(page_index, total, page_size);
    let start = (page_index * page_size).min(total);
    let end = (start + page_size).min(total);

    Projection {
        permutation,
        page_index,
        page_size,
        start,
        end,
    }
}

/// Memoized permutation keyed by table revision and sort descriptor
#[derive(Debug, Default)]
pub struct ProjectionCache {
    key: Option<(u64, Option<SortDescriptor>)>,
    permutation: Option<Arc<[usize]>>,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same as [`project`], reusing the last permutation when nothing it
    /// depends on has changed
    pub fn project(
        &mut self,
        table: &Table,
        sort: Option<&SortDescriptor>,
        page_index: usize,
        page_size: usize,
    ) -> Projection {
        let key = (table.revision(), sort.cloned());
        let permutation = match (&self.key, &self.permutation) {
            (Some(cached), Some(permutation)) if *cached == key => Arc::clone(permutation),
            _ => {
                let permutation: Arc<[usize]> = sort_permutation(table, sort).into();
                self.key = Some(key);
                self.permutation = Some(Arc::clone(&permutation));
                permutation
            }
        };
        paginate(permutation, page_index, page_size)
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.permutation = None;
    }
}
