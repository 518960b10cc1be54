// Application state and event loop: wires user commands and timer ticks
// into the draft state machine and pushes snapshots to the presentation
// layer.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::catalog::HeroCatalog;
use crate::config::{AppConfig, DraftConfig};
use crate::draft::phase::Phase;
use crate::draft::state::{DraftRun, TickOutcome};
use crate::protocol::{DraftSnapshot, UiUpdate, UserCommand};
use crate::timer::TimerController;

/// Picks a uniformly random index below `len`. The default chooser for
/// timeout-forced selections; tests inject a deterministic replacement.
pub fn random_chooser(len: usize) -> usize {
    use rand::Rng;
    rand::rng().random_range(0..len)
}

/// The complete application state.
pub struct AppState {
    pub config: AppConfig,
    /// Loaded hero catalog; `None` while unavailable, which blocks run
    /// start. Retrying a failed load is the caller's business, not ours.
    pub catalog: Option<HeroCatalog>,
    /// The active draft run, if one has been started.
    pub run: Option<DraftRun>,
    /// Random source for forced selections.
    chooser: Box<dyn FnMut(usize) -> usize + Send>,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: Option<HeroCatalog>) -> Self {
        AppState {
            config,
            catalog,
            run: None,
            chooser: Box::new(random_chooser),
        }
    }

    /// Replace the forced-selection chooser (deterministic in tests).
    pub fn with_chooser(
        mut self,
        chooser: impl FnMut(usize) -> usize + Send + 'static,
    ) -> Self {
        self.chooser = Box::new(chooser);
        self
    }

    /// The current render-ready view.
    pub fn snapshot(&self) -> DraftSnapshot {
        match &self.run {
            Some(run) => DraftSnapshot::of(run),
            None => DraftSnapshot::configuring(),
        }
    }

    /// The phase the presentation layer currently sees.
    fn phase(&self) -> Phase {
        self.run.as_ref().map_or(Phase::Config, DraftRun::phase)
    }

    /// Start a run with the loaded configuration. Refused while the catalog
    /// is unavailable.
    fn start_run(&mut self) {
        let Some(catalog) = &self.catalog else {
            warn!("start refused: hero catalog unavailable");
            return;
        };
        let mut draft = self.config.draft.clone();
        if draft.heroes.is_empty() {
            draft = draft.with_heroes(catalog.names());
        }
        match draft.validate() {
            Ok(()) => self.run = Some(DraftRun::start(draft)),
            Err(e) => warn!("start refused: {e}"),
        }
    }

    /// Start a run from a share code. A malformed code leaves us in
    /// configuration.
    fn start_from_share_code(&mut self, code: &str) {
        let Some(catalog) = &self.catalog else {
            warn!("start refused: hero catalog unavailable");
            return;
        };
        match DraftConfig::from_share_code(code) {
            Ok(config) => {
                let config = if config.heroes.is_empty() {
                    config.with_heroes(catalog.names())
                } else {
                    config
                };
                info!("Starting draft from share code");
                self.run = Some(DraftRun::start(config));
            }
            Err(e) => warn!("share code rejected, staying in configuration: {e}"),
        }
    }
}

/// Apply one user command to the state. `Quit` is handled by the loop, not
/// here.
fn handle_command(state: &mut AppState, cmd: UserCommand) {
    match cmd {
        UserCommand::Start => state.start_run(),
        UserCommand::StartWith(code) => state.start_from_share_code(&code),
        UserCommand::Select(hero) => match &mut state.run {
            Some(run) => {
                run.select(&hero);
            }
            None => debug!("select({hero}) ignored: no run in progress"),
        },
        UserCommand::Confirm => match &mut state.run {
            Some(run) => {
                run.confirm();
            }
            None => debug!("confirm ignored: no run in progress"),
        },
        UserCommand::Reset => {
            if let Some(run) = &mut state.run {
                run.reset();
            }
        }
        UserCommand::Quit => {}
    }
}

/// Apply one timer tick to the state.
fn handle_tick(state: &mut AppState) -> TickOutcome {
    // Split borrows: the run mutates while the chooser is called.
    let AppState { run, chooser, .. } = state;
    match run {
        Some(run) => run.tick(chooser.as_mut()),
        None => TickOutcome::Idle,
    }
}

/// Keep the tick task aligned with the run: armed exactly while a timed
/// run has a turn on the clock. Called on every phase change, which also
/// re-aligns the tick boundary with the freshly reset countdown.
fn sync_timer(state: &AppState, timer: &mut TimerController, last_phase: &mut Phase) {
    let phase = state.phase();
    if phase == *last_phase {
        return;
    }
    *last_phase = phase;

    let timed = state
        .run
        .as_ref()
        .is_some_and(|run| run.config().use_timer);
    if phase.is_turn() && timed {
        timer.arm();
    } else {
        timer.disarm();
    }
}

/// Run the draft event loop.
///
/// Listens on the command channel and the countdown tick channel with
/// `tokio::select!`; both funnel into the single `AppState`, so every
/// operation is atomic with respect to the others. Pushes a fresh
/// [`DraftSnapshot`] through `ui_tx` after every observable change.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Draft loop started");

    let (tick_tx, mut tick_rx) = mpsc::channel(8);
    let mut timer = TimerController::new(tick_tx);
    let mut last_phase = state.phase();

    if state.catalog.is_none() {
        let _ = ui_tx
            .send(UiUpdate::CatalogUnavailable(
                "hero catalog not loaded".to_string(),
            ))
            .await;
    }
    let _ = ui_tx.send(UiUpdate::Snapshot(state.snapshot())).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_command(&mut state, cmd);
                        sync_timer(&state, &mut timer, &mut last_phase);
                        let _ = ui_tx.send(UiUpdate::Snapshot(state.snapshot())).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            Some(_tick) = tick_rx.recv() => {
                match handle_tick(&mut state) {
                    // A tick scheduled before a reset or completion; the
                    // run absorbed it, nothing to show.
                    TickOutcome::Idle => {}
                    outcome => {
                        if let TickOutcome::Forced(hero) = &outcome {
                            debug!("tick forced {hero}");
                        }
                        sync_timer(&state, &mut timer, &mut last_phase);
                        let _ = ui_tx.send(UiUpdate::Snapshot(state.snapshot())).await;
                    }
                }
            }
        }
    }

    timer.disarm();
    info!("Draft loop exiting");
    Ok(())
}
