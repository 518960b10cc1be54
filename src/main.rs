// Ban/pick simulator entry point.
//
// Startup sequence:
// 1. Initialize tracing (to stderr; stdout is the command interface)
// 2. Load config (config/draft.toml or built-in defaults)
// 3. Load the hero catalog
// 4. Create channels, spawn the draft loop and the render task
// 5. Read commands from stdin until quit
// 6. Cleanup on exit

use std::path::Path;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use banpick::app::{self, AppState};
use banpick::catalog::HeroCatalog;
use banpick::config;
use banpick::protocol::{DraftSnapshot, UiUpdate, UserCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("banpick starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} bans / {} picks per team, timer {}",
        config.draft.ban_count,
        config.draft.pick_count,
        if config.draft.use_timer {
            format!("{}s", config.draft.timer_duration)
        } else {
            "off".to_string()
        }
    );

    // 3. Load the hero catalog. Failure is not fatal: the app stays in
    // configuration and reports the catalog as unavailable.
    let catalog = match HeroCatalog::load(Path::new(&config.catalog_path)) {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            warn!("Hero catalog unavailable: {e}");
            None
        }
    };

    // 4. Channels and tasks
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, mut ui_rx) = mpsc::channel(256);

    let state = AppState::new(config, catalog);
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, state).await {
            error!("Draft loop error: {e}");
        }
    });

    let render_handle = tokio::spawn(async move {
        while let Some(update) = ui_rx.recv().await {
            match update {
                UiUpdate::Snapshot(snapshot) => print_snapshot(&snapshot),
                UiUpdate::CatalogUnavailable(reason) => {
                    println!("hero catalog unavailable: {reason}");
                }
            }
        }
    });

    // A share code passed as the first argument starts a run immediately,
    // bypassing interactive configuration.
    if let Some(code) = std::env::args().nth(1) {
        let _ = cmd_tx.send(UserCommand::StartWith(code)).await;
    }

    // 5. Read commands from stdin
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match parse_command(line.trim()) {
            Some(UserCommand::Quit) => {
                let _ = cmd_tx.send(UserCommand::Quit).await;
                break;
            }
            Some(cmd) => {
                if cmd_tx.send(cmd).await.is_err() {
                    break;
                }
            }
            None => {
                println!("commands: start [share-code] | select <hero> | confirm | reset | quit");
            }
        }
    }

    // 6. Cleanup: let the draft loop drain, then stop rendering.
    drop(cmd_tx);
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), app_handle).await;
    render_handle.abort();

    info!("banpick shut down cleanly");
    Ok(())
}

/// Parse one input line into a command. Returns None for anything
/// unrecognized, which prompts a usage line.
fn parse_command(line: &str) -> Option<UserCommand> {
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match verb {
        "start" if rest.is_empty() => Some(UserCommand::Start),
        "start" => Some(UserCommand::StartWith(rest.to_string())),
        "select" if !rest.is_empty() => Some(UserCommand::Select(rest.to_string())),
        "confirm" => Some(UserCommand::Confirm),
        "reset" => Some(UserCommand::Reset),
        "quit" | "exit" => Some(UserCommand::Quit),
        _ => None,
    }
}

fn fmt_slots(slots: &[Option<String>]) -> String {
    slots
        .iter()
        .map(|slot| slot.as_deref().unwrap_or("-"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_snapshot(snapshot: &DraftSnapshot) {
    if snapshot.timer_visible {
        println!("== {} ({}s) ==", snapshot.phase_label, snapshot.timer_remaining);
    } else {
        println!("== {} ==", snapshot.phase_label);
    }
    if !snapshot.blue_bans.is_empty() || !snapshot.blue_picks.is_empty() {
        println!("  blue bans:  {}", fmt_slots(&snapshot.blue_bans));
        println!("  red bans:   {}", fmt_slots(&snapshot.red_bans));
        println!("  blue picks: {}", fmt_slots(&snapshot.blue_picks));
        println!("  red picks:  {}", fmt_slots(&snapshot.red_picks));
    }
    if let Some(pending) = &snapshot.pending {
        println!("  pending:    {pending}");
    }
}

/// Initialize tracing to stderr, leaving stdout to the draft display.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("banpick=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
