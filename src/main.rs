use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    bookshelf::logging::init().context("init logging")?;

    let cli = bookshelf::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        bookshelf::cli::Command::List(args) => {
            bookshelf::list::run(&cli.global, args)
                .await
                .context("list")?;
        }
        bookshelf::cli::Command::Categories(args) => {
            bookshelf::list::categories(&cli.global, args)
                .await
                .context("categories")?;
        }
        bookshelf::cli::Command::Shell => {
            bookshelf::shell::run(&cli.global).await.context("shell")?;
        }
        bookshelf::cli::Command::Theme(args) => {
            bookshelf::theme::run(&cli.global, args).context("theme")?;
        }
    }

    Ok(())
}
