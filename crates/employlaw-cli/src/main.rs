mod app;
mod cli;
mod render;
mod repl;

use anyhow::Context;
use clap::Parser;

use crate::app::App;
use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("employlaw v{}", env!("CARGO_PKG_VERSION"));

    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut app = App::from_cli(&cli);

    match &cli.command {
        None => repl::run(app).await.context("interactive session")?,
        Some(Command::Ask { query, export }) => {
            // Progress goes to stderr so stdout carries only the report.
            eprintln!("Loading...");
            let report = app.ask_for_report(query.join(" ")).await?;
            print!("{}", render::render_markdown(report));
            if *export && let Some(notice) = app.export() {
                println!("{notice}");
            }
        }
    }

    Ok(())
}
