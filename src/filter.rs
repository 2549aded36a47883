use crate::book::BookRecord;
use crate::catalog::CategorySelection;

/// Records whose category equals the selection, ignoring case, in catalog order.
///
/// Always applied to the full catalog, never to what is currently on screen.
pub fn filter_by_category<'a>(
    books: &'a [BookRecord],
    selection: &CategorySelection,
) -> Vec<&'a BookRecord> {
    books
        .iter()
        .filter(|book| matches_category(book, selection))
        .collect()
}

pub fn matches_category(book: &BookRecord, selection: &CategorySelection) -> bool {
    match selection {
        CategorySelection::All => true,
        CategorySelection::Named(name) => book.category.to_lowercase() == name.to_lowercase(),
        CategorySelection::Sentinel => false,
    }
}

/// A normalized free-text search term used for the highlight pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm {
    needle: String,
}

impl SearchTerm {
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// Case-insensitive substring match on a title. An empty term matches nothing.
    pub fn matches(&self, title: &str) -> bool {
        !self.needle.is_empty() && title.to_lowercase().contains(&self.needle)
    }
}
