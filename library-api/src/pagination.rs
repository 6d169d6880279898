//! Offset pagination over materialized collections
//!
//! [`PagedList::create`] slices a filtered, sorted sequence into one page and
//! records the counts clients need to navigate: total items, total pages and
//! whether a previous or next page exists. Asking for a page past the end
//! yields an empty page rather than an error.
//!
//! # Example
//!
//! ```rust
//! use library_api::pagination::PagedList;
//!
//! let page = PagedList::create(1..=25, 3, 10);
//! assert_eq!(page.items(), &[21, 22, 23, 24, 25]);
//! assert_eq!(page.total_pages(), 3);
//! assert!(page.has_previous());
//! assert!(!page.has_next());
//! ```

use serde::{Deserialize, Serialize};

/// One page of a larger sequence plus its navigation metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedList<T> {
    items: Vec<T>,
    current_page: u32,
    page_size: u32,
    total_count: u64,
    total_pages: u32,
}

impl<T> PagedList<T> {
    /// Build the `page_number`-th page of `page_size` items from `source`
    ///
    /// `total_count` covers all of `source`. Page number 0 is treated as 1 and
    /// page size 0 as 1.
    pub fn create(source: impl IntoIterator<Item = T>, page_number: u32, page_size: u32) -> Self {
        let page_number = page_number.max(1);
        let page_size = page_size.max(1);

        let source: Vec<T> = source.into_iter().collect();
        let total_count = source.len() as u64;

        let offset = u64::from(page_number - 1) * u64::from(page_size);
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let items: Vec<T> = source
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect();

        let total_pages = calculate_total_pages(total_count, page_size);

        tracing::debug!(
            page = page_number,
            page_size,
            total_count,
            total_pages,
            returned = items.len(),
            "Created page"
        );

        Self {
            items,
            current_page: page_number,
            page_size,
            total_count,
            total_pages,
        }
    }

    /// Items on this page
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Take ownership of the items on this page
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// 1-indexed page number
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Effective page size
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items across all pages
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of pages, rounded up
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Counts without links
    #[must_use]
    pub fn metadata(&self) -> PaginationMetadata {
        PaginationMetadata {
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
            links: None,
        }
    }

    /// Map each item, keeping the counts
    pub fn map<U, F>(self, f: F) -> PagedList<U>
    where
        F: FnMut(T) -> U,
    {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

/// Shorthand for [`PagedList::create`]
pub fn paginate<T>(
    source: impl IntoIterator<Item = T>,
    page_number: u32,
    page_size: u32,
) -> PagedList<T> {
    PagedList::create(source, page_number, page_size)
}

/// Calculate total pages, rounding up
fn calculate_total_pages(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page);
    let pages = total.saturating_add(per_page).saturating_sub(1) / per_page;
    pages.min(u64::from(u32::MAX)) as u32
}

/// Previous/next page URLs carried by the pagination header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLinks {
    pub previous_page_link: Option<String>,
    pub next_page_link: Option<String>,
}

/// Pagination header payload
///
/// Without links it serializes as
/// `{totalCount, pageSize, currentPage, totalPages}`; with links the
/// `previousPageLink` and `nextPageLink` fields are added and are `null` when
/// there is no such page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: u64,
    pub page_size: u32,
    pub current_page: u32,
    pub total_pages: u32,
    #[serde(flatten)]
    pub links: Option<PageLinks>,
}

impl PaginationMetadata {
    /// Attach previous/next page URLs
    #[must_use]
    pub fn with_links(mut self, links: PageLinks) -> Self {
        self.links = Some(links);
        self
    }
}
