use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::book::BookRecord;

pub const ALL_CATEGORIES_LABEL: &str = "All Categories";
pub const SENTINEL_CATEGORY_VALUE: &str = "invalid-cat";
pub const SENTINEL_CATEGORY_LABEL: &str = "Comic";

/// What the category selector currently points at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    #[default]
    All,
    Named(String),
    /// Synthetic option that never matches a record.
    Sentinel,
}

/// One entry of the category selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

/// In-memory store, replaced wholesale on every load.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<BookRecord>,
    categories: Vec<String>,
    include_sentinel: bool,
}

impl Catalog {
    pub fn new(include_sentinel: bool) -> Self {
        Self {
            books: Vec::new(),
            categories: Vec::new(),
            include_sentinel,
        }
    }

    /// Replaces the whole catalog. Later duplicates of an id get the first free
    /// `-2`, `-3`, ... suffix, skipping ids other records already carry.
    pub fn set_catalog(&mut self, books: Vec<BookRecord>) {
        let books = disambiguate_ids(books);
        let categories: BTreeSet<String> = books.iter().map(|b| b.category.clone()).collect();

        self.categories = categories.into_iter().collect();
        self.books = books;
        tracing::debug!(
            records = self.books.len(),
            categories = self.categories.len(),
            "catalog replaced"
        );
    }

    pub fn get_all(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Distinct categories, case-sensitive, sorted ascending.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Interprets a selector value. Empty means "all"; the sentinel value only
    /// means the sentinel while that option is actually offered.
    pub fn resolve_selection(&self, value: &str) -> CategorySelection {
        match value {
            "" => CategorySelection::All,
            SENTINEL_CATEGORY_VALUE if self.sentinel_offered() => CategorySelection::Sentinel,
            other => CategorySelection::Named(other.to_owned()),
        }
    }

    /// The sentinel is withheld when a real category would share its value.
    fn sentinel_offered(&self) -> bool {
        self.include_sentinel
            && !self
                .categories
                .iter()
                .any(|category| category.to_lowercase() == SENTINEL_CATEGORY_VALUE)
    }

    /// Selector options: "all", each category, then the sentinel when offered.
    pub fn category_options(&self) -> Vec<CategoryOption> {
        let mut options = Vec::with_capacity(self.categories.len() + 2);
        options.push(CategoryOption {
            value: String::new(),
            label: ALL_CATEGORIES_LABEL.to_owned(),
        });
        options.extend(self.categories.iter().map(|category| CategoryOption {
            value: category.clone(),
            label: category.clone(),
        }));
        if self.sentinel_offered() {
            options.push(CategoryOption {
                value: SENTINEL_CATEGORY_VALUE.to_owned(),
                label: SENTINEL_CATEGORY_LABEL.to_owned(),
            });
        }
        options
    }
}

fn disambiguate_ids(mut books: Vec<BookRecord>) -> Vec<BookRecord> {
    let mut taken: HashSet<String> = books.iter().map(|book| book.id.clone()).collect();
    let mut claimed: HashSet<String> = HashSet::with_capacity(books.len());
    for book in &mut books {
        if claimed.insert(book.id.clone()) {
            continue;
        }

        let mut suffix = 2_usize;
        let renamed = loop {
            let candidate = format!("{}-{suffix}", book.id);
            if !taken.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        tracing::warn!(id = %book.id, renamed = %renamed, "duplicate book id");
        taken.insert(renamed.clone());
        claimed.insert(renamed.clone());
        book.id = renamed;
    }
    books
}
