// Message types crossing the presentation boundary.

use serde::Serialize;

use crate::draft::phase::Phase;
use crate::draft::state::DraftRun;

/// Commands the presentation layer sends into the draft loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Start a run with the loaded configuration.
    Start,
    /// Start a run from a share code, bypassing interactive configuration.
    StartWith(String),
    /// Stage a hero for the current turn.
    Select(String),
    /// Commit the staged hero.
    Confirm,
    /// Abandon the run and return to configuration.
    Reset,
    /// Shut the draft loop down.
    Quit,
}

/// Updates pushed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// The draft state changed; here is the fresh view.
    Snapshot(DraftSnapshot),
    /// The hero catalog could not be loaded; no run can start.
    CatalogUnavailable(String),
}

/// A render-ready view of the draft state. Everything the presentation
/// layer may show, nothing it may mutate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftSnapshot {
    pub phase: Phase,
    /// Banner text, e.g. "BLUE TEAM BAN PHASE".
    pub phase_label: String,
    /// Whether a countdown should be shown.
    pub timer_visible: bool,
    pub timer_remaining: u32,
    pub blue_bans: Vec<Option<String>>,
    pub red_bans: Vec<Option<String>>,
    pub blue_picks: Vec<Option<String>>,
    pub red_picks: Vec<Option<String>>,
    pub pending: Option<String>,
}

impl DraftSnapshot {
    /// Snapshot an active run.
    pub fn of(run: &DraftRun) -> Self {
        let phase = run.phase();
        DraftSnapshot {
            phase,
            phase_label: phase.display_name(),
            timer_visible: phase.is_turn() && run.config().use_timer,
            timer_remaining: run.timer_remaining(),
            blue_bans: run.blue_bans().to_vec(),
            red_bans: run.red_bans().to_vec(),
            blue_picks: run.blue_picks().to_vec(),
            red_picks: run.red_picks().to_vec(),
            pending: run.pending().map(str::to_string),
        }
    }

    /// The view before any run has started.
    pub fn configuring() -> Self {
        DraftSnapshot {
            phase: Phase::Config,
            phase_label: Phase::Config.display_name(),
            timer_visible: false,
            timer_remaining: 0,
            blue_bans: Vec::new(),
            red_bans: Vec::new(),
            blue_picks: Vec::new(),
            red_picks: Vec::new(),
            pending: None,
        }
    }
}
