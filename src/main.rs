//! Terminal front-end for the helpdesk Copilot scripts.
//!
//! Shows the starter menu, then plays the chosen scenario in a chat loop.
//! Plain lines are sent as text, `#id` clicks the button with that id, and
//! `/back`, `/help`, `/suggest`, `/quit` control the session.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use copilot_script::adapters::RandomTicketNumbers;
use copilot_script::application::{AppState, ConversationSession, StarterOutcome};
use copilot_script::config::{AppConfig, LoggingConfig};
use copilot_script::domain::conversation::{ActionId, Message, UserInput};
use copilot_script::domain::scenarios::ScenarioCatalog;

type InputLines = Lines<BufReader<Stdin>>;

enum Flow {
    Continue,
    Quit,
}

enum Command {
    Back,
    Help,
    Suggest,
    Quit,
    Input(UserInput),
    Nothing,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    init_tracing(&config.logging);

    let catalog = ScenarioCatalog::builtin().context("built-in scenarios failed to load")?;
    tracing::info!(
        scenarios = catalog.scenarios().count(),
        starters = catalog.starters().len(),
        speed_factor = config.pacing.speed_factor,
        "catalog loaded"
    );

    let mut app = AppState::new(
        catalog,
        config.pacing.to_pacing(),
        Arc::new(RandomTicketNumbers::new()),
        !config.ui.show_help_on_start,
    );

    if app.take_first_visit_help() {
        print_help();
        app.close_help();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut rendered = 0;

    loop {
        let flow = if app.session().is_some() {
            conversation_step(&mut app, &mut lines, &mut rendered).await?
        } else {
            landing_step(&mut app, &mut lines, &mut rendered).await?
        };
        if let Flow::Quit = flow {
            break;
        }
    }

    app.return_to_landing().await?;
    Ok(())
}

fn init_tracing(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}

async fn landing_step(
    app: &mut AppState,
    lines: &mut InputLines,
    rendered: &mut usize,
) -> anyhow::Result<Flow> {
    println!();
    println!("How can I help you today?");
    for (index, starter) in app.starters().iter().enumerate() {
        println!("  {}. {} - {}", index + 1, starter.title, starter.description);
    }
    println!("Pick a number, or /help, /quit.");

    let Some(line) = lines.next_line().await? else {
        return Ok(Flow::Quit);
    };
    let choice = line.trim();

    match choice {
        "" => return Ok(Flow::Continue),
        "/quit" => return Ok(Flow::Quit),
        "/help" => {
            app.open_help();
            print_help();
            app.close_help();
            return Ok(Flow::Continue);
        }
        _ => {}
    }

    let starter_id = match choice.parse::<usize>() {
        Ok(n) if (1..=app.starters().len()).contains(&n) => app.starters()[n - 1].id.clone(),
        _ => choice.to_string(),
    };

    match app.select_starter(&starter_id).await {
        Ok(StarterOutcome::Opened) => {
            *rendered = 0;
            if let Some(session) = app.session() {
                println!();
                println!("== {} ==", session.scenario().title());
            }
        }
        Ok(StarterOutcome::ExternalLink(link)) => {
            println!("This opens outside the chat: {link}");
        }
        Err(err) => println!("! {err}"),
    }
    Ok(Flow::Continue)
}

async fn conversation_step(
    app: &mut AppState,
    lines: &mut InputLines,
    rendered: &mut usize,
) -> anyhow::Result<Flow> {
    let line = {
        let Some(session) = app.session() else {
            return Ok(Flow::Continue);
        };
        let mut updates = session.updates();
        loop {
            render_new(session, rendered).await;
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break None;
                    }
                }
                line = lines.next_line() => break line?,
            }
        }
    };

    let Some(line) = line else {
        return Ok(Flow::Quit);
    };

    match parse_command(&line) {
        Ok(Command::Quit) => return Ok(Flow::Quit),
        Ok(Command::Back) => app.return_to_landing().await?,
        Ok(Command::Help) => {
            app.open_help();
            print_help();
            app.close_help();
        }
        Ok(Command::Suggest) => {
            if let Some(session) = app.session() {
                let suggestions = session.suggestions().await;
                if suggestions.is_empty() {
                    println!("(no suggestions here)");
                }
                for suggestion in suggestions {
                    println!("  > {suggestion}");
                }
            }
        }
        Ok(Command::Input(input)) => {
            if let Some(session) = app.session() {
                if let Err(err) = session.submit(input).await {
                    println!("! {err}");
                }
            }
        }
        Ok(Command::Nothing) => {}
        Err(err) => println!("! {err}"),
    }
    Ok(Flow::Continue)
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }
    match line {
        "/back" => return Ok(Command::Back),
        "/help" => return Ok(Command::Help),
        "/suggest" => return Ok(Command::Suggest),
        "/quit" => return Ok(Command::Quit),
        _ => {}
    }
    if let Some(id) = line.strip_prefix('#') {
        let id = ActionId::new(id).map_err(|err| err.to_string())?;
        return Ok(Command::Input(UserInput::action(id)));
    }
    if line.starts_with('/') {
        return Err(format!("unknown command '{line}'"));
    }
    Ok(Command::Input(UserInput::text(line)))
}

async fn render_new(session: &ConversationSession, rendered: &mut usize) {
    let fresh = session.messages_since(*rendered).await;
    *rendered += fresh.len();
    for message in &fresh {
        render_message(message);
    }
}

fn render_message(message: &Message) {
    println!();
    println!(
        "[{}] {}:",
        message.created_at().clock_label(),
        message.sender().display_name()
    );
    for line in message.text().replace("**", "").lines() {
        println!("  {line}");
    }
    for action in message.body().actions() {
        println!("  [#{}] {}", action.id, action.label);
    }
}

fn print_help() {
    println!();
    println!("Copilot help");
    println!("  Pick a starter from the menu to begin a conversation.");
    println!("  Type a message and press Enter to send it.");
    println!("  Buttons are shown as [#id]; type #id to click one.");
    println!("  /suggest  show suggested prompts for this step");
    println!("  /back     return to the starter menu");
    println!("  /help     show this help");
    println!("  /quit     exit");
}
