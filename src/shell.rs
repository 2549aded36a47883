use std::io::{BufRead, Write};

use anyhow::Context as _;

use crate::browser::{AddOutcome, Browser};
use crate::cli::GlobalArgs;
use crate::list::open_browser;
use crate::prefs::PreferenceStore;
use crate::terminal::{LinePrompter, TextTableSink};

const HELP: &str = "\
commands:
  show                 print the table
  categories           list category options
  filter [CATEGORY]    show one category (no argument: all)
  reset                all categories, empty search
  search [TEXT]        highlight titles containing TEXT (no argument: clear)
  select N             check row N (unchecks the others)
  add                  add the checked row to the cart
  cart                 show cart contents
  clear-cart           empty the cart
  theme                toggle dark mode
  quit                 leave";

pub async fn run(global: &GlobalArgs) -> anyhow::Result<()> {
    let source = global.catalog_source().context("parse --source")?;
    let mut store = global.prefs_store();
    let mut browser = open_browser(global);

    // A failed load is shown in the table; the session stays usable.
    if let Err(err) = browser.load(&source).await {
        tracing::debug!(
            transport = err.is_transport(),
            "shell continuing with an empty catalog"
        );
    }

    tokio::task::block_in_place(|| {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut prompter = LinePrompter::new(stdin.lock(), stdout.lock());
        session(&mut browser, &mut prompter, &mut store)
    })
}

/// Command loop over `prompter`'s input until `quit` or end of input.
pub fn session<R: BufRead, W: Write>(
    browser: &mut Browser,
    prompter: &mut LinePrompter<R, W>,
    store: &mut dyn PreferenceStore,
) -> anyhow::Result<()> {
    show(browser, prompter)?;

    loop {
        write!(prompter.out(), "> ").context("write prompt")?;
        prompter.out().flush().context("flush prompt")?;
        let Some(line) = prompter.read_line()? else {
            break;
        };
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => writeln!(prompter.out(), "{HELP}").context("write help")?,
            "show" => show(browser, prompter)?,
            "categories" => {
                for option in browser.category_options() {
                    writeln!(prompter.out(), "{}\t{}", option.value, option.label)
                        .context("write categories")?;
                }
            }
            "filter" => {
                browser.apply_category_filter(arg);
                show(browser, prompter)?;
            }
            "reset" => {
                browser.reset_filter();
                show(browser, prompter)?;
            }
            "search" => {
                let highlighted = browser.search(arg);
                show(browser, prompter)?;
                writeln!(prompter.out(), "{highlighted} highlighted").context("write search")?;
            }
            "select" => {
                let selected = arg
                    .parse::<usize>()
                    .is_ok_and(|index| browser.select(index).is_some());
                if selected {
                    show(browser, prompter)?;
                } else {
                    writeln!(prompter.out(), "no such row: {arg}").context("write select")?;
                }
            }
            "add" => {
                if let AddOutcome::Added(entry) = browser.add_selected_to_cart(prompter)? {
                    writeln!(
                        prompter.out(),
                        "{} x{} in cart; cart: {}",
                        entry.title,
                        entry.quantity,
                        browser.cart_count()
                    )
                    .context("write add")?;
                    show(browser, prompter)?;
                }
            }
            "cart" => {
                for entry in browser.cart().entries() {
                    writeln!(
                        prompter.out(),
                        "{}\t{}\t{}\tx{}",
                        entry.id,
                        entry.title,
                        crate::render::format_price(entry.price),
                        entry.quantity
                    )
                    .context("write cart")?;
                }
                writeln!(prompter.out(), "cart: {}", browser.cart_count()).context("write cart")?;
            }
            "clear-cart" => {
                browser.reset_cart(prompter)?;
                writeln!(prompter.out(), "cart: {}", browser.cart_count()).context("write cart")?;
            }
            "theme" => {
                let dark = browser.toggle_theme(store)?;
                writeln!(
                    prompter.out(),
                    "dark mode: {}; cart icon: {}",
                    if dark { "on" } else { "off" },
                    browser.theme().cart_icon()
                )
                .context("write theme")?;
            }
            other => writeln!(prompter.out(), "unknown command: {other} (try `help`)")
                .context("write error")?,
        }
    }

    Ok(())
}

fn show<R: BufRead, W: Write>(
    browser: &Browser,
    prompter: &mut LinePrompter<R, W>,
) -> anyhow::Result<()> {
    browser.present(&mut TextTableSink::new(prompter.out()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::BrowserConfig;
    use crate::formats::Preferences;
    use crate::loader::parse_catalog;
    use crate::prefs::MemoryPreferenceStore;

    fn run_script(script: &str) -> anyhow::Result<(Browser, String)> {
        let books = parse_catalog(
            br#"[
                {"title":"Dune","authors":"Frank Herbert","year":1965,"category":"Sci-Fi","price":9.5},
                {"title":"Emma","authors":"Jane Austen","year":1815,"category":"Classics","price":4}
            ]"#,
            "test.json",
        )?;
        let mut browser = Browser::new(BrowserConfig::default(), &Preferences::default());
        browser.install(books);

        let mut prompter = LinePrompter::new(script.as_bytes(), Vec::new());
        let mut store = MemoryPreferenceStore::default();
        session(&mut browser, &mut prompter, &mut store)?;
        let output = String::from_utf8(std::mem::take(prompter.out()))?;
        Ok((browser, output))
    }

    #[test]
    fn add_flow_reads_quantity_from_next_line() -> anyhow::Result<()> {
        let (browser, output) = run_script("select 1\nadd\n3\nselect 1\nadd\n2\nquit\n")?;
        assert_eq!(browser.cart_count(), 5);
        assert!(output.contains("Emma x5 in cart; cart: 5"));
        Ok(())
    }

    #[test]
    fn add_without_selection_reports_and_continues() -> anyhow::Result<()> {
        let (browser, output) = run_script("add\ncart\n")?;
        assert_eq!(browser.cart_count(), 0);
        assert!(output.contains("Please select a book first"));
        assert!(output.contains("cart: 0"));
        Ok(())
    }

    #[test]
    fn filter_and_search_update_table() -> anyhow::Result<()> {
        let (browser, output) = run_script("filter classics\nsearch EM\nfilter invalid-cat\n")?;
        assert!(output.contains("*0\t[ ]\tEmma"));
        assert!(output.contains("1 highlighted"));
        assert!(output.contains("No books found in this category"));
        assert_eq!(browser.view().book_rows().count(), 0);
        Ok(())
    }

    #[test]
    fn clear_cart_requires_confirmation() -> anyhow::Result<()> {
        let (browser, output) =
            run_script("clear-cart\nselect 0\nadd\n4\nclear-cart\nn\nclear-cart\ny\n")?;
        assert!(output.contains("Your cart is already empty!"));
        assert!(output.contains("Currently 4 items from 1 different books."));
        assert!(output.contains("Cart cleared successfully!"));
        assert_eq!(browser.cart_count(), 0);
        Ok(())
    }

    #[test]
    fn unknown_commands_do_not_abort() -> anyhow::Result<()> {
        let (_, output) = run_script("frobnicate\nselect 9\n")?;
        assert!(output.contains("unknown command: frobnicate"));
        assert!(output.contains("no such row: 9"));
        Ok(())
    }
}
