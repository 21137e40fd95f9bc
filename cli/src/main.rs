//! Terminal host for the todo view.
//!
//! Reads commands from stdin and routes them to the view as intents. Each
//! request runs on its own blocking task, so typing continues while earlier
//! requests are in flight; responses are reconciled as they land and the
//! list is printed again after every command or response. Logs go to stderr.

mod command;
mod render;
mod transport;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use todo_sync::{
    ClientConfig, HttpResponse, Intent, Pending, TodoClient, TodoController, TodoView, TransportError,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::command::{Command, HELP};
use crate::render::render;
use crate::transport::UreqTransport;

type InFlight = JoinSet<(Pending, Result<HttpResponse, TransportError>)>;

/// What the main loop does after a command.
enum Step {
    Issue(Pending),
    Render,
    Help,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    info!(api = %config.api_base_url, "starting todo view");
    println!("API URL: {}", config.api_base_url);
    println!("Health check: {}/api/health", config.api_base_url.trim_end_matches('/'));

    let transport = UreqTransport::new();
    let mut view = TodoView::new(TodoController::new(TodoClient::new(&config.api_base_url)));
    let mut in_flight = InFlight::new();

    if let Some(pending) = view.begin_activate() {
        issue(&mut in_flight, &transport, pending);
    }
    print!("{}", render(&view.view_model()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    while stdin_open || !in_flight.is_empty() {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    continue;
                };
                let command = match Command::parse(&line) {
                    Ok(command) => command,
                    Err(err) => {
                        eprintln!("{err:#}");
                        continue;
                    }
                };
                match route(&mut view, command) {
                    Step::Quit => break,
                    Step::Help => {
                        println!("{HELP}");
                        continue;
                    }
                    Step::Issue(pending) => issue(&mut in_flight, &transport, pending),
                    Step::Render => {}
                }
            }
            Some(joined) = in_flight.join_next() => {
                let (pending, response) = joined.context("request task failed")?;
                view.complete(pending, response);
            }
        }
        print!("{}", render(&view.view_model()));
    }

    Ok(())
}

fn route(view: &mut TodoView, command: Command) -> Step {
    let pending = match command {
        Command::Quit => return Step::Quit,
        Command::Help => return Step::Help,
        Command::List => None,
        Command::Add(text) => {
            view.begin(Intent::EditInput(text));
            view.begin(Intent::Submit)
        }
        Command::Input(text) => view.begin(Intent::EditInput(text)),
        Command::Submit => view.begin(Intent::Submit),
        Command::Toggle(id) => {
            let control = view
                .view_model()
                .items
                .into_iter()
                .find(|item| item.id == id)
                .map(|item| item.on_toggle);
            match control {
                Some(intent) => view.begin(intent),
                None => {
                    warn!(id, "no todo with that id on screen");
                    None
                }
            }
        }
        Command::Remove(id) => view.begin(Intent::Remove { id }),
    };
    pending.map_or(Step::Render, Step::Issue)
}

/// Run the round trip on a blocking task; the response comes back with the
/// `Pending` it answers.
fn issue(in_flight: &mut InFlight, transport: &UreqTransport, pending: Pending) {
    let transport = transport.clone();
    in_flight.spawn_blocking(move || {
        let response = transport.execute(pending.request());
        (pending, response)
    });
}
