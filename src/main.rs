use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEventKind};

use stock_dashboard::config::Config;
use stock_dashboard::dashboard::DashboardState;
use stock_dashboard::data::load_price_table;
use stock_dashboard::input::parse_main_command;
use stock_dashboard::ui;

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists and names the price CSV under [data].path");
            std::process::exit(1);
        }
    };

    // Log to file so it doesn't interfere with the TUI
    let log_file = std::fs::File::create("stock-dashboard.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::try_new(&config.logging.level)
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        data = %config.data.path.display(),
        export_dir = %config.data.export_dir.display(),
        "Starting stock-dashboard"
    );

    // The table is the only fatal dependency
    let table = load_price_table(&config.data.path)
        .with_context(|| format!("failed to load {}", config.data.path.display()))?;
    let price_field = config.ui.price_field()?;
    let mut state = DashboardState::new(Arc::new(table), price_field)?;
    state.table_rows = config.ui.table_rows;
    state.push_log(format!(
        "Loaded {} rows across {} stocks",
        state.table().len(),
        state.series_ids().len()
    ));

    let mut terminal = ratatui::init();
    let outcome = run(&mut terminal, &mut state, &config);
    ratatui::restore();

    tracing::info!("Shutdown complete");
    outcome
}

fn run(
    terminal: &mut ratatui::DefaultTerminal,
    state: &mut DashboardState,
    config: &Config,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, state))?;

        if !crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
            continue;
        }
        let Event::Key(key) = crossterm::event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if let Some(cmd) = parse_main_command(&key.code) {
            tracing::debug!(?cmd, "Key command");
            if !state.apply(cmd, &config.data.export_dir) {
                tracing::info!("User quit");
                return Ok(());
            }
        }
    }
}
