use crate::book::BookRecord;
use crate::cart::{Cart, CartEntry, ResetOutcome, parse_quantity};
use crate::catalog::{Catalog, CategoryOption, CategorySelection};
use crate::error::{LoadError, ValidationError};
use crate::filter::{SearchTerm, filter_by_category};
use crate::formats::Preferences;
use crate::loader::{CatalogSource, load_catalog};
use crate::prefs::{PreferenceStore, Theme};
use crate::prompt::{Prompter, QUANTITY_DEFAULT, QUANTITY_PROMPT};
use crate::render::{BookRow, RowSink, TableView};

pub const CART_EMPTY_MESSAGE: &str = "Your cart is already empty!";
pub const CART_CLEARED_MESSAGE: &str = "Cart cleared successfully!";

#[derive(Debug, Clone, Copy)]
pub struct BrowserConfig {
    pub include_sentinel_category: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            include_sentinel_category: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(CartEntry),
    Rejected(ValidationError),
}

#[derive(Debug)]
pub struct Browser {
    catalog: Catalog,
    cart: Cart,
    view: TableView,
    selection: CategorySelection,
    search: SearchTerm,
    theme: Theme,
}

impl Browser {
    pub fn new(config: BrowserConfig, prefs: &Preferences) -> Self {
        Self {
            catalog: Catalog::new(config.include_sentinel_category),
            cart: Cart::default(),
            view: TableView::default(),
            selection: CategorySelection::All,
            search: SearchTerm::default(),
            theme: Theme::from_prefs(prefs),
        }
    }

    /// Loads the catalog and renders it in full.
    ///
    /// On failure the catalog is left empty and the table shows the error row.
    pub async fn load(&mut self, source: &CatalogSource) -> Result<usize, LoadError> {
        match load_catalog(source).await {
            Ok(books) => {
                let count = books.len();
                self.install(books);
                tracing::info!(source = %source, records = count, "catalog loaded");
                Ok(count)
            }
            Err(err) => {
                tracing::error!(source = %source, error = %err, "catalog load failed");
                self.catalog.set_catalog(Vec::new());
                self.view.show_error(err.user_message());
                Err(err)
            }
        }
    }

    /// Replaces the catalog and renders every record.
    pub fn install(&mut self, books: Vec<BookRecord>) {
        self.catalog.set_catalog(books);
        self.selection = CategorySelection::All;
        self.rerender();
    }

    /// Re-renders the rows matching the selector `value` (empty means all).
    pub fn apply_category_filter(&mut self, value: &str) -> usize {
        self.selection = self.catalog.resolve_selection(value);
        let visible = self.rerender();
        tracing::debug!(category = value, visible, "category filter applied");
        visible
    }

    /// Back to all categories with an empty search box.
    pub fn reset_filter(&mut self) {
        self.selection = CategorySelection::All;
        self.search = SearchTerm::default();
        self.rerender();
        tracing::debug!("filter reset");
    }

    /// Highlight pass over the rows on screen. Returns the number highlighted.
    pub fn search(&mut self, raw: &str) -> usize {
        self.search = SearchTerm::new(raw);
        let highlighted = self.view.apply_highlight(&self.search);
        tracing::debug!(term = self.search.as_str(), highlighted, "search applied");
        highlighted
    }

    pub fn select(&mut self, index: usize) -> Option<&BookRow> {
        self.view.select(index)
    }

    pub fn clear_selection(&mut self) {
        self.view.clear_selection();
    }

    /// Asks for a quantity and adds the selected row to the cart.
    ///
    /// Validation failures are reported through `prompter` and leave all
    /// state untouched.
    pub fn add_selected_to_cart(
        &mut self,
        prompter: &mut dyn Prompter,
    ) -> anyhow::Result<AddOutcome> {
        let Some(row) = self.view.selected() else {
            return reject(prompter, ValidationError::NoSelection);
        };
        let (id, title, price) = (row.book_id.clone(), row.title.clone(), row.price_value);

        let answer = prompter.ask(QUANTITY_PROMPT, QUANTITY_DEFAULT)?;
        let quantity = match answer.as_deref().map(parse_quantity) {
            Some(Ok(quantity)) => quantity,
            Some(Err(err)) => return reject(prompter, err),
            None => return reject(prompter, ValidationError::InvalidQuantity),
        };

        let entry = match self.cart.add_item(&id, &title, price, quantity) {
            Ok(entry) => entry.clone(),
            Err(err) => return reject(prompter, err),
        };
        self.view.clear_selection();
        tracing::debug!(id = %entry.id, quantity, total = entry.quantity, "added to cart");
        Ok(AddOutcome::Added(entry))
    }

    /// Clears the cart after an explicit confirmation.
    pub fn reset_cart(&mut self, prompter: &mut dyn Prompter) -> anyhow::Result<ResetOutcome> {
        let outcome = self.cart.reset_all(|items, books| {
            prompter.confirm(&format!(
                "Are you sure you want to reset the cart?\n\nCurrently {items} items from {books} different books."
            ))
        })?;

        match outcome {
            ResetOutcome::AlreadyEmpty => prompter.notify(CART_EMPTY_MESSAGE)?,
            ResetOutcome::Cancelled => tracing::info!("cart reset cancelled by user"),
            ResetOutcome::Cleared { items, books } => {
                tracing::info!(items, books, "cart cleared");
                prompter.notify(CART_CLEARED_MESSAGE)?;
            }
        }
        Ok(outcome)
    }

    pub fn toggle_theme(&mut self, store: &mut dyn PreferenceStore) -> anyhow::Result<bool> {
        self.theme.toggle(store)
    }

    pub fn present(&self, sink: &mut dyn RowSink) -> anyhow::Result<()> {
        self.view.present(sink)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn category_options(&self) -> Vec<CategoryOption> {
        self.catalog.category_options()
    }

    pub fn search_term(&self) -> &SearchTerm {
        &self.search
    }

    pub fn view(&self) -> &TableView {
        &self.view
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Value shown on the cart badge.
    pub fn cart_count(&self) -> u32 {
        self.cart.total_item_count()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn rerender(&mut self) -> usize {
        let visible = filter_by_category(self.catalog.get_all(), &self.selection);
        let count = visible.len();
        self.view.render(&visible, &self.search);
        count
    }
}

fn reject(prompter: &mut dyn Prompter, err: ValidationError) -> anyhow::Result<AddOutcome> {
    tracing::debug!(reason = %err, "add to cart rejected");
    prompter.notify(&err.to_string())?;
    Ok(AddOutcome::Rejected(err))
}
