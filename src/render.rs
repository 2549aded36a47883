use serde::Serialize;

use crate::book::{BookRecord, MAX_RATING, format_number};
use crate::filter::SearchTerm;

pub const TABLE_COLUMNS: usize = 9;
pub const NO_RESULTS_MESSAGE: &str = "No books found in this category";
pub const STAR_FILLED_ICON: &str = "images/starfill.ico";
pub const STAR_EMPTY_ICON: &str = "images/starempty.ico";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Star {
    Filled,
    Empty,
}

impl Star {
    pub fn icon(self) -> &'static str {
        match self {
            Star::Filled => STAR_FILLED_ICON,
            Star::Empty => STAR_EMPTY_ICON,
        }
    }

    pub fn alt(self) -> &'static str {
        match self {
            Star::Filled => "Filled Star",
            Star::Empty => "Empty Star",
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Star::Filled => '★',
            Star::Empty => '☆',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverImage {
    pub src: String,
    pub alt: String,
}

/// Visible projection of one `BookRecord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRow {
    pub book_id: String,
    pub selected: bool,
    pub highlighted: bool,
    pub cover: CoverImage,
    pub title: String,
    pub authors: String,
    pub year: String,
    pub stars: Vec<Star>,
    pub price: String,
    #[serde(skip)]
    pub price_value: f64,
    pub publisher: String,
    pub category: String,
}

impl BookRow {
    pub fn project(book: &BookRecord) -> Self {
        Self {
            book_id: book.id.clone(),
            selected: false,
            highlighted: false,
            cover: CoverImage {
                src: book.img.clone(),
                alt: format!("{} cover", book.title),
            },
            title: book.title.clone(),
            authors: book.authors.clone(),
            year: book.year.clone(),
            stars: rating_stars(book.rating),
            price: format_price(book.price),
            price_value: book.price,
            publisher: book.publisher.clone(),
            category: book.category.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Row {
    Book(BookRow),
    NoResults { message: String, colspan: usize },
    Error { message: String, colspan: usize },
}

impl Row {
    pub fn as_book(&self) -> Option<&BookRow> {
        match self {
            Row::Book(row) => Some(row),
            _ => None,
        }
    }

    fn as_book_mut(&mut self) -> Option<&mut BookRow> {
        match self {
            Row::Book(row) => Some(row),
            _ => None,
        }
    }
}

/// Always exactly five glyphs, `rating` of them filled.
pub fn rating_stars(rating: u8) -> Vec<Star> {
    let filled = rating.min(MAX_RATING);
    (0..MAX_RATING)
        .map(|i| if i < filled { Star::Filled } else { Star::Empty })
        .collect()
}

pub fn format_price(price: f64) -> String {
    format!("${}", format_number(price))
}

/// One row per record in input order, or a single placeholder row when empty.
pub fn compute_rows(books: &[&BookRecord]) -> Vec<Row> {
    if books.is_empty() {
        return vec![Row::NoResults {
            message: NO_RESULTS_MESSAGE.to_owned(),
            colspan: TABLE_COLUMNS,
        }];
    }
    books
        .iter()
        .map(|book| Row::Book(BookRow::project(book)))
        .collect()
}

/// Presentation boundary for rendered rows.
pub trait RowSink {
    /// Drops whatever was presented before.
    fn clear(&mut self) -> anyhow::Result<()>;
    fn append(&mut self, row: &Row) -> anyhow::Result<()>;
}

/// In-memory sink, handy for tests and JSON output.
#[derive(Debug, Default)]
pub struct VecSink {
    pub rows: Vec<Row>,
}

impl RowSink for VecSink {
    fn clear(&mut self) -> anyhow::Result<()> {
        self.rows.clear();
        Ok(())
    }

    fn append(&mut self, row: &Row) -> anyhow::Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}

/// Rows currently on screen.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    rows: Vec<Row>,
}

impl TableView {
    /// Clear-then-rebuild, followed by the highlight pass for `search`.
    pub fn render(&mut self, books: &[&BookRecord], search: &SearchTerm) {
        self.rows = compute_rows(books);
        self.apply_highlight(search);
    }

    /// Replaces the table body with a single error row.
    pub fn show_error(&mut self, message: &str) {
        self.rows = vec![Row::Error {
            message: message.to_owned(),
            colspan: TABLE_COLUMNS,
        }];
    }

    /// Flags rows whose title contains `search`. Rows are never removed.
    pub fn apply_highlight(&mut self, search: &SearchTerm) -> usize {
        let mut highlighted = 0;
        for row in self.rows.iter_mut().filter_map(Row::as_book_mut) {
            row.highlighted = search.matches(&row.title);
            if row.highlighted {
                highlighted += 1;
            }
        }
        highlighted
    }

    /// Checks the row at `index` and unchecks every other row.
    pub fn select(&mut self, index: usize) -> Option<&BookRow> {
        if self.rows.get(index).and_then(Row::as_book).is_none() {
            return None;
        }
        for (i, row) in self.rows.iter_mut().enumerate() {
            if let Some(book) = row.as_book_mut() {
                book.selected = i == index;
            }
        }
        self.rows.get(index).and_then(Row::as_book)
    }

    pub fn clear_selection(&mut self) {
        for row in self.rows.iter_mut().filter_map(Row::as_book_mut) {
            row.selected = false;
        }
    }

    pub fn selected(&self) -> Option<&BookRow> {
        self.book_rows().find(|row| row.selected)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn book_rows(&self) -> impl Iterator<Item = &BookRow> {
        self.rows.iter().filter_map(Row::as_book)
    }

    pub fn present(&self, sink: &mut dyn RowSink) -> anyhow::Result<()> {
        sink.clear()?;
        for row in &self.rows {
            sink.append(row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::RawBookRecord;
    use serde_json::json;

    fn book(value: serde_json::Value) -> BookRecord {
        let raw: RawBookRecord = serde_json::from_value(value).expect("raw record");
        BookRecord::normalize(&raw)
    }

    #[test]
    fn stars_always_total_five() {
        for rating in 0..=5 {
            let stars = rating_stars(rating);
            assert_eq!(stars.len(), 5);
            assert_eq!(
                stars.iter().filter(|s| **s == Star::Filled).count(),
                usize::from(rating)
            );
        }
        assert_eq!(rating_stars(9).len(), 5);
    }

    #[test]
    fn empty_subset_renders_one_placeholder_row() {
        let rows = compute_rows(&[]);
        assert_eq!(
            rows,
            vec![Row::NoResults {
                message: "No books found in this category".to_owned(),
                colspan: 9,
            }]
        );
    }

    #[test]
    fn projection_carries_visible_fields() {
        let record = book(json!({
            "title": "Dune",
            "authors": "Frank Herbert",
            "year": 1965,
            "rating": 4,
            "price": 12.5,
            "img": "images/dune.jpg",
        }));
        let row = BookRow::project(&record);

        assert_eq!(row.book_id, "dune-frank-herbert-1965");
        assert_eq!(row.cover.src, "images/dune.jpg");
        assert_eq!(row.cover.alt, "Dune cover");
        assert_eq!(row.price, "$12.5");
        assert_eq!(row.stars[3], Star::Filled);
        assert_eq!(row.stars[4], Star::Empty);
        assert!(!row.selected);
        assert!(!row.highlighted);
    }

    #[test]
    fn render_replaces_rows_and_reapplies_highlight() {
        let books = [
            book(json!({ "title": "Dune" })),
            book(json!({ "title": "Dune Messiah" })),
            book(json!({ "title": "Emma" })),
        ];
        let all: Vec<&BookRecord> = books.iter().collect();
        let mut view = TableView::default();
        let search = SearchTerm::new("dune");

        view.render(&all, &search);
        assert_eq!(view.rows().len(), 3);
        assert_eq!(view.book_rows().filter(|r| r.highlighted).count(), 2);

        view.render(&all[2..], &search);
        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.book_rows().filter(|r| r.highlighted).count(), 0);
    }

    #[test]
    fn highlight_never_removes_rows() {
        let books = [book(json!({ "title": "Dune" })), book(json!({ "title": "Emma" }))];
        let all: Vec<&BookRecord> = books.iter().collect();
        let mut view = TableView::default();
        view.render(&all, &SearchTerm::default());

        assert_eq!(view.apply_highlight(&SearchTerm::new("zzz")), 0);
        assert_eq!(view.rows().len(), 2);

        assert_eq!(view.apply_highlight(&SearchTerm::new("EMM")), 1);
        assert_eq!(view.apply_highlight(&SearchTerm::new("")), 0);
        assert!(view.book_rows().all(|r| !r.highlighted));
    }

    #[test]
    fn selection_is_exclusive() {
        let books = [book(json!({ "title": "Dune" })), book(json!({ "title": "Emma" }))];
        let all: Vec<&BookRecord> = books.iter().collect();
        let mut view = TableView::default();
        view.render(&all, &SearchTerm::default());

        view.select(0);
        view.select(1);
        assert_eq!(view.book_rows().filter(|r| r.selected).count(), 1);
        assert_eq!(view.selected().map(|r| r.title.as_str()), Some("Emma"));

        assert!(view.select(5).is_none());
        assert_eq!(view.selected().map(|r| r.title.as_str()), Some("Emma"));

        view.clear_selection();
        assert!(view.selected().is_none());
    }

    #[test]
    fn placeholder_rows_cannot_be_selected_or_highlighted() {
        let mut view = TableView::default();
        view.render(&[], &SearchTerm::new("anything"));
        assert!(view.select(0).is_none());
        assert_eq!(view.book_rows().count(), 0);
    }

    #[test]
    fn present_replays_rows_into_sink() -> anyhow::Result<()> {
        let mut view = TableView::default();
        view.show_error("Fail, please check connection.");
        let mut sink = VecSink::default();
        sink.rows.push(Row::NoResults {
            message: "stale".to_owned(),
            colspan: 9,
        });

        view.present(&mut sink)?;
        assert_eq!(
            sink.rows,
            vec![Row::Error {
                message: "Fail, please check connection.".to_owned(),
                colspan: 9,
            }]
        );
        Ok(())
    }
}
