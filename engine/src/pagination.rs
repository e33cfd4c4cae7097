//! Pagination over the filtered sequence and the page-button window.

use serde::Serialize;
use std::num::NonZeroUsize;

/// Widest run of numbered page buttons
const WINDOW: usize = 5;

/// Number of pages needed for `len` items; zero when there are no items
#[must_use]
pub const fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get())
}

/// Clamp a requested page into `[1, max(1, total_pages)]`
#[must_use]
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// One page of a filtered sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on this page, in sequence order
    pub items: &'a [T],
    /// 0-indexed offset of the first item on this page
    pub start_index: usize,
    /// `start_index + page_size`; may run past the end of the sequence
    pub end_index: usize,
    /// Length of the whole sequence
    pub total_items: usize,
    /// Pages in the sequence (zero when empty)
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    /// 1-indexed position of the first row, as shown in "Showing a-b"
    #[must_use]
    pub const fn range_start(&self) -> usize {
        self.start_index + 1
    }

    /// 1-indexed position of the last row, as shown in "Showing a-b"
    #[must_use]
    pub fn range_end(&self) -> usize {
        self.end_index.min(self.total_items)
    }

    /// Page count for display; never less than 1
    #[must_use]
    pub fn display_total_pages(&self) -> usize {
        self.total_pages.max(1)
    }
}

/// Slice page `page` (1-indexed) out of `items`
///
/// A page past the end yields an empty slice rather than an error. Page 0 is
/// treated as page 1.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, page_size: NonZeroUsize) -> Page<'_, T> {
    let size = page_size.get();
    let start_index = page.saturating_sub(1).saturating_mul(size);
    let end_index = start_index.saturating_add(size);
    let slice = items
        .get(start_index..end_index.min(items.len()))
        .unwrap_or_default();

    Page {
        items: slice,
        start_index,
        end_index,
        total_items: items.len(),
        total_pages: total_pages(items.len(), page_size),
    }
}

/// A control in the numbered part of the pager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageButton {
    /// Jump to a page
    Page {
        /// 1-indexed page number
        number: usize,
        /// Whether this is the page being shown
        current: bool,
    },
    /// Gap before the trailing last-page button
    Ellipsis,
}

impl PageButton {
    /// Page number for numbered buttons
    #[must_use]
    pub const fn number(self) -> Option<usize> {
        match self {
            Self::Page { number, .. } => Some(number),
            Self::Ellipsis => None,
        }
    }
}

/// Up to five numbered buttons around the current page, plus `… last` when
/// the current page is more than two pages from the end
#[must_use]
pub fn page_window(current_page: usize, total_pages: usize) -> Vec<PageButton> {
    let first = if total_pages <= WINDOW || current_page <= 3 {
        1
    } else if current_page >= total_pages - 2 {
        total_pages - (WINDOW - 1)
    } else {
        current_page - 2
    };
    let last = (first + WINDOW - 1).min(total_pages);

    let mut buttons: Vec<PageButton> = (first..=last)
        .map(|number| PageButton::Page {
            number,
            current: number == current_page,
        })
        .collect();

    if total_pages > WINDOW && current_page < total_pages - 2 {
        buttons.push(PageButton::Ellipsis);
        buttons.push(PageButton::Page {
            number: total_pages,
            current: false,
        });
    }

    buttons
}
