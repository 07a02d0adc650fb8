// File: ./src/tui/mod.rs
pub mod action;
pub mod controller;
pub mod dispatch;
pub mod input;
pub mod view;
pub mod worker;

use crate::client::ApiClient;
use crate::config::Config;
use crate::logging;
use crate::tui::action::{AppEvent, Request};
use crate::tui::controller::RootController;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{env, io, time::Duration};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

pub async fn run() -> Result<()> {
    let config = Config::load()
        .context("reading config")?
        .with_args(env::args().skip(1));
    logging::init(config.log_path().as_deref());
    info!(base_url = %config.base_url, "starting");
    if let Some(path) = Config::get_path() {
        match Config::write_default_if_missing(&path) {
            Ok(true) => info!(path = %path.display(), "wrote default config"),
            Ok(false) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "could not write default config"),
        }
    }

    let client = ApiClient::from_config(&config).context("setting up the http client")?;

    // Panic Hook: put the terminal back before printing anything
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        error!("panic: {}", panic_info);
        default_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, client).await;

    restore_terminal();
    terminal.show_cursor()?;
    if let Err(e) = &result {
        error!(error = %e, "exiting with error");
    }
    info!("stopped");
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: ApiClient,
) -> Result<()> {
    let mut root = RootController::new();
    let (request_tx, request_rx) = mpsc::channel::<Request>(32);
    let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(32);
    let worker = worker::spawn(client, request_rx, event_tx);

    for request in root.start() {
        request_tx.send(request).await?;
    }

    // UI Loop
    while !root.should_quit() {
        terminal.draw(|f| root.draw(f))?;

        while let Ok(event) = event_rx.try_recv() {
            root.apply_event(event);
        }

        if event::poll(Duration::from_millis(50))? {
            let requests = match event::read()? {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => root.handle_key(key),
                Event::Mouse(mouse) => root.handle_mouse(mouse),
                _ => vec![],
            };
            for request in requests {
                request_tx.send(request).await?;
            }
        }
    }

    drop(request_tx);
    worker.abort();
    Ok(())
}
