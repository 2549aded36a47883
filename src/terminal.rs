use std::io::{BufRead, Write};

use anyhow::Context as _;

use crate::prompt::Prompter;
use crate::render::{Row, RowSink};

const HEADER: &str = "#\tsel\ttitle\tauthors\tyear\trating\tprice\tpublisher\tcategory\tcover";

/// Writes rows as tab-separated lines. Highlighted rows are prefixed with `*`.
pub struct TextTableSink<W: Write> {
    out: W,
    next_index: usize,
}

impl<W: Write> TextTableSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, next_index: 0 }
    }
}

impl<W: Write> RowSink for TextTableSink<W> {
    fn clear(&mut self) -> anyhow::Result<()> {
        self.next_index = 0;
        writeln!(self.out, "{HEADER}").context("write table header")?;
        Ok(())
    }

    fn append(&mut self, row: &Row) -> anyhow::Result<()> {
        match row {
            Row::Book(book) => {
                let index = self.next_index;
                self.next_index += 1;
                let stars: String = book.stars.iter().map(|s| s.glyph()).collect();
                writeln!(
                    self.out,
                    "{marker}{index}\t[{check}]\t{title}\t{authors}\t{year}\t{stars}\t{price}\t{publisher}\t{category}\t{cover}",
                    marker = if book.highlighted { "*" } else { "" },
                    check = if book.selected { "x" } else { " " },
                    title = book.title,
                    authors = book.authors,
                    year = book.year,
                    price = book.price,
                    publisher = book.publisher,
                    category = book.category,
                    cover = book.cover.src,
                )
                .context("write table row")?;
            }
            Row::NoResults { message, .. } | Row::Error { message, .. } => {
                writeln!(self.out, "{message}").context("write table message")?;
            }
        }
        Ok(())
    }
}

/// Asks questions on `out` and reads answers line by line from `input`.
///
/// The interactive shell reads its commands from the same reader so that
/// dialog answers are simply the next input line.
pub struct LinePrompter<R: BufRead, W: Write> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Next input line without the trailing newline, or `None` at end of input.
    pub fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("read input line")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_owned()))
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, message: &str, default: &str) -> anyhow::Result<Option<String>> {
        write!(self.out, "{message} [{default}] ").context("write prompt")?;
        self.out.flush().context("flush prompt")?;
        let Some(line) = self.read_line()? else {
            return Ok(None);
        };
        if line.trim().is_empty() {
            return Ok(Some(default.to_owned()));
        }
        Ok(Some(line))
    }

    fn confirm(&mut self, message: &str) -> anyhow::Result<bool> {
        writeln!(self.out, "{message}").context("write confirmation")?;
        write!(self.out, "[y/N] ").context("write confirmation")?;
        self.out.flush().context("flush confirmation")?;
        let answer = self.read_line()?.unwrap_or_default();
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }

    fn notify(&mut self, message: &str) -> anyhow::Result<()> {
        writeln!(self.out, "{message}").context("write notification")?;
        Ok(())
    }
}
