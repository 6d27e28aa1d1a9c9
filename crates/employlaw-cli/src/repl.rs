//! Interactive prompt loop: the terminal rendition of the query form.

use anyhow::{Context, bail};
use colored::Colorize;
use employlaw_core::{Action, REPORT_TITLE, SessionState};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use tracing::debug;

use crate::app::{App, Flow};
use crate::render::render_markdown;

/// Run the form until the user quits or closes input.
pub async fn run(mut app: App) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new().context("initialising line editor")?;
    print_banner();

    // The report is rendered once per response; the menu repeats after each action.
    let mut report_shown = false;

    loop {
        match app.state() {
            SessionState::Idle | SessionState::Failed => {
                report_shown = false;
                if app.state() == SessionState::Failed {
                    println!("{}", app.session().error().red());
                    println!();
                }
                let Some(query) = read_query(&mut rl)? else {
                    println!("Bye!");
                    break;
                };
                println!("{}", "Loading...".dimmed());
                app.ask(query).await;
            }
            SessionState::Ready => {
                if !report_shown {
                    println!();
                    print!("{}", render_markdown(app.session().response()));
                    report_shown = true;
                }
                print_menu();
                let Some(action) = read_action(&mut rl)? else {
                    println!("Bye!");
                    break;
                };
                let (flow, notice) = app.apply(action);
                if let Some(notice) = notice {
                    println!("{notice}");
                    if notice.is_blocking() {
                        wait_for_enter(&mut rl)?;
                    }
                }
                if flow == Flow::Quit {
                    println!("Bye!");
                    break;
                }
            }
            // `ask` only returns once the request settles.
            SessionState::Submitting => bail!("prompt loop resumed with a request in flight"),
        }
    }

    Ok(())
}

fn print_banner() {
    println!();
    println!("{}", REPORT_TITLE.bold());
    println!();
    println!("Please explain your employment law query.");
    println!("{}", "Finish with an empty line; Ctrl-D quits.".dimmed());
    println!();
}

fn print_menu() {
    println!();
    for action in Action::ALL {
        println!("  [{}] {}", action.number(), action.label());
    }
}

/// Read a multi-line query terminated by an empty line.
///
/// Leading empty lines are skipped, so a returned query is never blank.
/// `None` means input was closed before anything was entered.
fn read_query(rl: &mut DefaultEditor) -> anyhow::Result<Option<String>> {
    let mut lines: Vec<String> = Vec::new();
    loop {
        let prompt = if lines.is_empty() { "> " } else { ". " };
        match rl.readline(prompt) {
            Ok(line) if line.trim().is_empty() => {
                if !lines.is_empty() {
                    break;
                }
            }
            Ok(line) => lines.push(line),
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                lines.clear();
            }
            Err(ReadlineError::Eof) if lines.is_empty() => return Ok(None),
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("reading query"),
        }
    }

    let query = lines.join("\n");
    remember_query(rl.history_mut(), &query);
    Ok(Some(query))
}

/// Add `query` to the editor history. History is a convenience, so a
/// failure is only logged.
fn remember_query<H: History>(history: &mut H, query: &str) {
    if let Err(err) = history.add(query) {
        debug!(error = %err, "query not added to history");
    }
}

fn read_action(rl: &mut DefaultEditor) -> anyhow::Result<Option<Action>> {
    loop {
        match rl.readline("choice> ") {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => match line.parse::<Action>() {
                Ok(action) => return Ok(Some(action)),
                Err(err) => println!("{} (enter 1-4)", err.to_string().yellow()),
            },
            Err(ReadlineError::Interrupted) => println!("^C"),
            Err(ReadlineError::Eof) => return Ok(None),
            Err(err) => return Err(err).context("reading action"),
        }
    }
}

fn wait_for_enter(rl: &mut DefaultEditor) -> anyhow::Result<()> {
    match rl.readline("Press Enter to continue") {
        Ok(_) | Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(()),
        Err(err) => Err(err).context("waiting for acknowledgement"),
    }
}
