use serde::Serialize;
use serde_json::Value;

use crate::formats::RawBookRecord;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_AUTHORS: &str = "Unknown Author";
pub const DEFAULT_YEAR: &str = "N/A";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_PUBLISHER: &str = "Unknown Publisher";
pub const DEFAULT_COVER: &str = "images/default-cover.jpg";
pub const INVALID_BOOK_ID: &str = "invalid-book-id";
pub const MAX_RATING: u8 = 5;

/// A normalized catalog entry. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub authors: String,
    pub year: String,
    pub category: String,
    pub rating: u8,
    pub price: f64,
    pub publisher: String,
    pub img: String,
}

impl BookRecord {
    /// Applies the field defaults and coercions to one raw element.
    ///
    /// Falsy values (missing, `null`, `false`, `0`, `""`) take the default, the
    /// same way the catalog document has always been interpreted.
    pub fn normalize(raw: &RawBookRecord) -> Self {
        let title = truthy_text(raw.title.as_ref());
        let authors = truthy_text(raw.authors.as_ref());
        let year = truthy_text(raw.year.as_ref());

        let id = match (&title, &authors, &year) {
            (Some(title), Some(authors), Some(year)) => generate_id(title, authors, year),
            _ => {
                tracing::warn!(?raw, "book is missing title, authors or year; using invalid id");
                INVALID_BOOK_ID.to_owned()
            }
        };

        let category = truthy_text(raw.category.as_ref())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned())
            .trim()
            .to_owned();

        Self {
            id,
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            authors: authors.unwrap_or_else(|| DEFAULT_AUTHORS.to_owned()),
            year: year.unwrap_or_else(|| DEFAULT_YEAR.to_owned()),
            category,
            rating: clamp_rating(raw.rating.as_ref()),
            price: coerce_price(raw.price.as_ref()),
            publisher: truthy_text(raw.publisher.as_ref())
                .unwrap_or_else(|| DEFAULT_PUBLISHER.to_owned()),
            img: truthy_text(raw.img.as_ref()).unwrap_or_else(|| DEFAULT_COVER.to_owned()),
        }
    }
}

/// Stable id for a (title, authors, year) triple.
#[must_use]
pub fn generate_id(title: &str, authors: &str, year: &str) -> String {
    slugify(&format!("{title}-{authors}-{year}"))
}

/// Lowercases `text`, collapses every run of non `[a-z0-9]` characters into a
/// single hyphen and strips hyphens from both ends.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_owned()),
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => {
            let as_float = number.as_f64()?;
            if as_float == 0.0 || as_float.is_nan() {
                return None;
            }
            Some(number_text(number))
        }
        other => Some(other.to_string()),
    }
}

fn number_text(number: &serde_json::Number) -> String {
    if let Some(int) = number.as_i64() {
        return int.to_string();
    }
    if let Some(uint) = number.as_u64() {
        return uint.to_string();
    }
    number.as_f64().map(format_number).unwrap_or_default()
}

/// Shortest decimal form of `value`: `5.0` prints as `5`, `12.5` as `12.5`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    format!("{value}")
}

/// Numeric coercion for loosely typed inputs. Unparseable input yields `None`.
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Null => Some(0.0),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => numeric_text(text),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads numeric text with the grammar browsers use for `Number(text)`:
/// `Infinity` with an optional sign, unsigned `0x`/`0o`/`0b` integers, and
/// plain decimals. Rust-only spellings such as `inf` or `nan` are rejected.
fn numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let prefixed = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)];
    for (prefix, radix) in prefixed {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|ch| ch.is_digit(radix)) {
                return None;
            }
            return Some(
                digits
                    .chars()
                    .filter_map(|ch| ch.to_digit(radix))
                    .fold(0.0, |acc, digit| acc * f64::from(radix) + f64::from(digit)),
            );
        }
    }

    let decimal_chars = |ch: char| ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E');
    if !trimmed.chars().all(decimal_chars) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn clamp_rating(value: Option<&Value>) -> u8 {
    let rating = coerce_number(value).unwrap_or(0.0);
    let clamped = rating.min(f64::from(MAX_RATING)).max(0.0);
    // Partial ratings draw one extra filled star.
    clamped.ceil() as u8
}

fn coerce_price(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(_)) | Some(Value::String(_)) => {
            coerce_number(value).filter(|n| n.is_finite()).unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawBookRecord {
        serde_json::from_value(value).expect("raw book record")
    }

    #[test]
    fn slug_collapses_case_and_punctuation() {
        assert_eq!(slugify("Foo Bar!"), "foo-bar");
        assert_eq!(slugify("foo-bar"), "foo-bar");
        assert_eq!(slugify("--Foo   ***  Bar--"), "foo-bar");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn id_is_deterministic() {
        let a = generate_id("Dune", "Frank Herbert", "1965");
        let b = generate_id("Dune", "Frank Herbert", "1965");
        assert_eq!(a, b);
        assert_eq!(a, "dune-frank-herbert-1965");
        assert_eq!(generate_id("DUNE!", "frank  herbert", "1965"), a);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let book = BookRecord::normalize(&raw(json!({})));
        assert_eq!(book.id, INVALID_BOOK_ID);
        assert_eq!(book.title, "Untitled");
        assert_eq!(book.authors, "Unknown Author");
        assert_eq!(book.year, "N/A");
        assert_eq!(book.category, "Uncategorized");
        assert_eq!(book.rating, 0);
        assert_eq!(book.price, 0.0);
        assert_eq!(book.publisher, "Unknown Publisher");
        assert_eq!(book.img, "images/default-cover.jpg");
    }

    #[test]
    fn falsy_values_take_defaults() {
        let book = BookRecord::normalize(&raw(json!({
            "title": "",
            "authors": null,
            "year": 0,
            "publisher": false,
        })));
        assert_eq!(book.title, "Untitled");
        assert_eq!(book.authors, "Unknown Author");
        assert_eq!(book.year, "N/A");
        assert_eq!(book.publisher, "Unknown Publisher");
        assert_eq!(book.id, INVALID_BOOK_ID);
    }

    #[test]
    fn numeric_year_becomes_text_and_feeds_the_id() {
        let book = BookRecord::normalize(&raw(json!({
            "title": "A",
            "authors": "X",
            "year": 2000,
        })));
        assert_eq!(book.year, "2000");
        assert_eq!(book.id, "a-x-2000");
    }

    #[test]
    fn category_is_trimmed() {
        let book = BookRecord::normalize(&raw(json!({ "category": "  Sci-Fi \n" })));
        assert_eq!(book.category, "Sci-Fi");
    }

    #[test]
    fn rating_is_clamped_to_zero_through_five() {
        let cases = [
            (json!(-3), 0),
            (json!("abc"), 0),
            (json!(7), 5),
            (json!(10), 5),
            (json!(3), 3),
            (json!("4"), 4),
            (json!(true), 1),
            (json!(null), 0),
            (json!([1, 2]), 0),
            (json!(2.5), 3),
        ];
        for (input, expected) in cases {
            let book = BookRecord::normalize(&raw(json!({ "rating": input.clone() })));
            assert_eq!(book.rating, expected, "rating input {input}");
        }
    }

    #[test]
    fn price_accepts_numbers_and_numeric_text() {
        let book = BookRecord::normalize(&raw(json!({ "price": 12.5 })));
        assert_eq!(book.price, 12.5);
        let book = BookRecord::normalize(&raw(json!({ "price": "8" })));
        assert_eq!(book.price, 8.0);
        let book = BookRecord::normalize(&raw(json!({ "price": "free" })));
        assert_eq!(book.price, 0.0);
        let book = BookRecord::normalize(&raw(json!({ "price": -4 })));
        assert_eq!(book.price, -4.0);
    }

    #[test]
    fn numeric_text_follows_browser_number_grammar() {
        let book = BookRecord::normalize(&raw(json!({ "rating": "0x10", "price": "0x10" })));
        assert_eq!(book.rating, 5);
        assert_eq!(book.price, 16.0);

        let book = BookRecord::normalize(&raw(json!({ "rating": "0b11", "price": " 0o17 " })));
        assert_eq!(book.rating, 3);
        assert_eq!(book.price, 15.0);

        for spelled in ["inf", "nan", "infinity", "NaN", "0x", "0xZZ", "1_000"] {
            let book = BookRecord::normalize(&raw(json!({ "rating": spelled, "price": spelled })));
            assert_eq!(book.rating, 0, "rating input {spelled}");
            assert_eq!(book.price, 0.0, "price input {spelled}");
        }

        let book = BookRecord::normalize(&raw(json!({ "rating": "Infinity", "price": "Infinity" })));
        assert_eq!(book.rating, 5);
        assert_eq!(book.price, 0.0);
        let book = BookRecord::normalize(&raw(json!({ "rating": "-Infinity" })));
        assert_eq!(book.rating, 0);
        let book = BookRecord::normalize(&raw(json!({ "rating": "2e0", "price": ".5" })));
        assert_eq!(book.rating, 2);
        assert_eq!(book.price, 0.5);
    }

    #[test]
    fn format_number_uses_shortest_form() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
    }
}
