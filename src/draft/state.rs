// Draft run state machine: slot arrays, sequence cursor, pending hero,
// and the countdown the timer controller drives.

use tracing::{debug, info, warn};

use crate::config::DraftConfig;

use super::phase::{Action, Phase, Team, Turn};
use super::validator::{self, SlotGroups};

/// What a single countdown tick did to the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick arrived outside a running turn; nothing happened.
    Idle,
    /// Countdown decremented; carries the new remaining seconds.
    Counting(u32),
    /// Countdown expired and the named hero was force-committed.
    Forced(String),
    /// Countdown expired but the pool had no hero left to commit.
    Exhausted,
}

/// The state of one draft run.
///
/// All mutation goes through `select`/`confirm`/`force_random_selection`/
/// `tick`/`reset`; the slot arrays are append-only for the lifetime of the
/// run and are only emptied by starting a new run.
#[derive(Debug, Clone)]
pub struct DraftRun {
    config: DraftConfig,
    phase: Phase,
    /// Position of `phase` within the configured sequence.
    cursor: usize,
    blue_bans: Vec<Option<String>>,
    red_bans: Vec<Option<String>>,
    blue_picks: Vec<Option<String>>,
    red_picks: Vec<Option<String>>,
    /// Hero chosen but not yet committed to a slot.
    pending: Option<String>,
    /// Seconds left on the current turn's countdown.
    timer_remaining: u32,
}

impl DraftRun {
    /// Start a run from a finalized configuration.
    ///
    /// The configuration is expected to be validated (see
    /// [`DraftConfig::validate`]); an empty sequence degenerates to an
    /// immediately complete run rather than panicking.
    pub fn start(config: DraftConfig) -> Self {
        let ban_slots = usize::from(config.ban_count);
        let pick_slots = usize::from(config.pick_count);
        let phase = config.sequence.first().copied().unwrap_or(Phase::Complete);
        let timer_remaining = config.timer_duration;

        info!(
            "Draft run started: {} bans / {} picks per team, {} heroes in pool",
            config.ban_count,
            config.pick_count,
            config.heroes.len()
        );

        DraftRun {
            config,
            phase,
            cursor: 0,
            blue_bans: vec![None; ban_slots],
            red_bans: vec![None; ban_slots],
            blue_picks: vec![None; pick_slots],
            red_picks: vec![None; pick_slots],
            pending: None,
            timer_remaining,
        }
    }

    // -- queries ------------------------------------------------------------

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The team on the clock, if a turn is in progress.
    pub fn active_team(&self) -> Option<Team> {
        self.phase.active_team()
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn timer_remaining(&self) -> u32 {
        self.timer_remaining
    }

    pub fn blue_bans(&self) -> &[Option<String>] {
        &self.blue_bans
    }

    pub fn red_bans(&self) -> &[Option<String>] {
        &self.red_bans
    }

    pub fn blue_picks(&self) -> &[Option<String>] {
        &self.blue_picks
    }

    pub fn red_picks(&self) -> &[Option<String>] {
        &self.red_picks
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Whether `hero` could currently be selected.
    pub fn is_available(&self, hero: &str) -> bool {
        validator::is_available(hero, &self.config.heroes, self.slot_groups())
    }

    fn slot_groups(&self) -> SlotGroups<'_> {
        [
            &self.blue_bans,
            &self.red_bans,
            &self.blue_picks,
            &self.red_picks,
        ]
    }

    // -- transitions --------------------------------------------------------

    /// Stage `hero` as the pending selection for the current turn.
    ///
    /// Returns false, with no state change, outside a turn or when the hero
    /// is not available. The availability check is repeated here regardless
    /// of what the caller already verified.
    pub fn select(&mut self, hero: &str) -> bool {
        if !self.phase.is_turn() {
            debug!("select({hero}) ignored: phase is {}", self.phase);
            return false;
        }
        if !self.is_available(hero) {
            debug!("select({hero}) rejected: hero not available");
            return false;
        }
        self.pending = Some(hero.to_string());
        true
    }

    /// Commit the pending hero to the current turn's slot and advance to
    /// the next phase, resetting the countdown.
    ///
    /// The single commit path: bans and picks, manual and forced selections
    /// all land here. A no-op (returning false) without a pending hero or
    /// outside a turn.
    pub fn confirm(&mut self) -> bool {
        let Phase::Turn(turn) = self.phase else {
            debug!("confirm ignored: phase is {}", self.phase);
            return false;
        };
        let Some(hero) = self.pending.take() else {
            debug!("confirm ignored: no pending hero");
            return false;
        };

        let slot = self.slot_mut(turn);
        if let Some(previous) = slot.replace(hero) {
            // Cannot happen while the sequence is well formed; keep the
            // evidence in the log if it ever does.
            warn!("slot {turn} already held {previous}, overwritten");
        }

        self.cursor += 1;
        self.phase = self
            .config
            .sequence
            .get(self.cursor)
            .copied()
            .unwrap_or(Phase::Complete);
        self.timer_remaining = self.config.timer_duration;
        true
    }

    /// Commit a uniformly chosen available hero to the current turn.
    ///
    /// Equivalent to one `select` + `confirm` pair with nothing observable
    /// in between. A no-op returning `None` when no turn is active or the
    /// pool is exhausted. `choose` maps a candidate count to an index below
    /// it; the caller injects the random source.
    pub fn force_random_selection(
        &mut self,
        choose: &mut dyn FnMut(usize) -> usize,
    ) -> Option<String> {
        if !self.phase.is_turn() {
            return None;
        }

        let hero = {
            let candidates =
                validator::available_heroes(&self.config.heroes, self.slot_groups());
            if candidates.is_empty() {
                warn!("forced selection skipped: hero pool exhausted");
                return None;
            }
            candidates[choose(candidates.len())].to_string()
        };

        info!("Timer expired, forcing selection of {hero} for {}", self.phase);
        if self.select(&hero) && self.confirm() {
            Some(hero)
        } else {
            None
        }
    }

    /// Advance the countdown by one second. At one second or less the turn
    /// is resolved by a forced selection instead of reaching zero, and the
    /// countdown restarts.
    ///
    /// Ticks arriving outside a running turn (after completion or reset,
    /// from a stale schedule) are absorbed as no-ops.
    pub fn tick(&mut self, choose: &mut dyn FnMut(usize) -> usize) -> TickOutcome {
        if !self.phase.is_turn() {
            return TickOutcome::Idle;
        }
        if self.timer_remaining <= 1 {
            match self.force_random_selection(choose) {
                // confirm() already restarted the countdown.
                Some(hero) => TickOutcome::Forced(hero),
                None => {
                    self.timer_remaining = self.config.timer_duration;
                    TickOutcome::Exhausted
                }
            }
        } else {
            self.timer_remaining -= 1;
            TickOutcome::Counting(self.timer_remaining)
        }
    }

    /// Return to the configuration state. Prior selections stay in place so
    /// the finished board remains inspectable; they are cleared by the next
    /// run start, not here.
    pub fn reset(&mut self) {
        info!("Draft run reset to configuration");
        self.phase = Phase::Config;
        self.pending = None;
    }

    fn slot_mut(&mut self, turn: Turn) -> &mut Option<String> {
        let index = usize::from(turn.index - 1);
        match (turn.team, turn.action) {
            (Team::Blue, Action::Ban) => &mut self.blue_bans[index],
            (Team::Red, Action::Ban) => &mut self.red_bans[index],
            (Team::Blue, Action::Pick) => &mut self.blue_picks[index],
            (Team::Red, Action::Pick) => &mut self.red_picks[index],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DraftConfig;
    use crate::draft::sequence::DraftStyle;

    /// Ten single-letter heroes, A through J.
    fn pool_ten() -> Vec<String> {
        ('A'..='J').map(|c| c.to_string()).collect()
    }

    fn ranked_run(pool: Vec<String>) -> DraftRun {
        let config =
            DraftConfig::new(false, 30, 2, 5, DraftStyle::Ranked, pool).unwrap();
        DraftRun::start(config)
    }

    /// Deterministic chooser: always the first candidate.
    fn first(_len: usize) -> usize {
        0
    }

    fn all_committed(run: &DraftRun) -> Vec<String> {
        [
            run.blue_bans(),
            run.red_bans(),
            run.blue_picks(),
            run.red_picks(),
        ]
        .into_iter()
        .flatten()
        .filter_map(|s| s.clone())
        .collect()
    }

    fn assert_no_duplicates(run: &DraftRun) {
        let mut committed = all_committed(run);
        let before = committed.len();
        committed.sort();
        committed.dedup();
        assert_eq!(committed.len(), before, "duplicate hero across slots");
    }

    #[test]
    fn start_produces_empty_slots_and_first_phase() {
        let run = ranked_run(pool_ten());
        assert_eq!(run.phase().to_string(), "blueBan1");
        assert_eq!(run.blue_bans(), &[None, None]);
        assert_eq!(run.red_bans(), &[None, None]);
        assert_eq!(run.blue_picks().len(), 5);
        assert_eq!(run.red_picks().len(), 5);
        assert!(run.pending().is_none());
        assert_eq!(run.timer_remaining(), 30);
    }

    #[test]
    fn restart_is_idempotent() {
        let config =
            DraftConfig::new(false, 30, 2, 5, DraftStyle::Ranked, pool_ten()).unwrap();
        let mut first_run = DraftRun::start(config.clone());
        first_run.select("A");
        first_run.confirm();
        first_run.reset();

        let second_run = DraftRun::start(config.clone());
        let fresh = DraftRun::start(config);
        assert_eq!(second_run.phase(), fresh.phase());
        assert_eq!(second_run.blue_bans(), fresh.blue_bans());
        assert_eq!(second_run.timer_remaining(), fresh.timer_remaining());
        assert!(all_committed(&second_run).is_empty());
    }

    #[test]
    fn select_stages_without_committing() {
        let mut run = ranked_run(pool_ten());
        assert!(run.select("A"));
        assert_eq!(run.pending(), Some("A"));
        assert_eq!(run.blue_bans(), &[None, None]);
        assert_eq!(run.phase().to_string(), "blueBan1");
    }

    #[test]
    fn select_rejects_unknown_and_used_heroes() {
        let mut run = ranked_run(pool_ten());
        assert!(!run.select("Z"));
        assert!(run.pending().is_none());

        run.select("A");
        run.confirm();
        assert!(!run.select("A"), "committed hero selectable again");
        assert!(run.pending().is_none());
    }

    #[test]
    fn reselect_replaces_pending() {
        let mut run = ranked_run(pool_ten());
        run.select("A");
        run.select("B");
        assert_eq!(run.pending(), Some("B"));
    }

    #[test]
    fn confirm_without_pending_is_a_noop() {
        let mut run = ranked_run(pool_ten());
        assert!(!run.confirm());
        assert_eq!(run.phase().to_string(), "blueBan1");
        assert_eq!(run.blue_bans(), &[None, None]);
    }

    #[test]
    fn confirm_commits_and_advances_one_phase() {
        let mut run = ranked_run(pool_ten());
        run.select("A");
        assert!(run.confirm());
        assert_eq!(run.blue_bans()[0].as_deref(), Some("A"));
        assert_eq!(run.phase().to_string(), "blueBan2");
        assert!(run.pending().is_none());
    }

    #[test]
    fn confirm_resets_countdown() {
        let config =
            DraftConfig::new(true, 10, 2, 5, DraftStyle::Ranked, pool_ten()).unwrap();
        let mut run = DraftRun::start(config);
        run.tick(&mut first);
        run.tick(&mut first);
        assert_eq!(run.timer_remaining(), 8);
        run.select("A");
        run.confirm();
        assert_eq!(run.timer_remaining(), 10);
    }

    #[test]
    fn full_draft_with_exact_pool_completes_without_duplicates() {
        // 2 bans and 5 picks per team need exactly 14 heroes.
        let pool: Vec<String> = ('A'..='N').map(|c| c.to_string()).collect();
        let config =
            DraftConfig::new(false, 30, 2, 5, DraftStyle::Ranked, pool.clone()).unwrap();
        let mut run = DraftRun::start(config);

        let expected_order = [
            "blueBan1", "blueBan2", "redBan1", "redBan2", "bluePick1", "redPick1",
            "redPick2", "bluePick2", "bluePick3", "redPick3", "bluePick4",
            "redPick4", "bluePick5", "redPick5",
        ];
        for (hero, expected) in pool.iter().zip(expected_order) {
            assert_eq!(run.phase().to_string(), expected);
            assert!(run.select(hero));
            assert!(run.confirm());
            assert_no_duplicates(&run);
        }

        assert!(run.is_complete());
        assert_eq!(run.blue_bans()[0].as_deref(), Some("A"));
        assert_eq!(run.blue_bans()[1].as_deref(), Some("B"));
        assert_eq!(run.red_bans()[0].as_deref(), Some("C"));
        assert_eq!(all_committed(&run).len(), 14);
    }

    #[test]
    fn operations_after_complete_are_noops() {
        let pool: Vec<String> = ('A'..='N').map(|c| c.to_string()).collect();
        let config =
            DraftConfig::new(false, 30, 2, 5, DraftStyle::Ranked, pool.clone()).unwrap();
        let mut run = DraftRun::start(config);
        for hero in &pool {
            run.select(hero);
            run.confirm();
        }
        assert!(run.is_complete());

        assert!(!run.select("A"));
        assert!(!run.confirm());
        assert_eq!(run.force_random_selection(&mut first), None);
        assert_eq!(run.tick(&mut first), TickOutcome::Idle);
        assert!(run.is_complete());
    }

    #[test]
    fn forced_selection_commits_and_advances() {
        let mut run = ranked_run(pool_ten());
        let forced = run.force_random_selection(&mut first);
        assert_eq!(forced.as_deref(), Some("A"));
        assert_eq!(run.blue_bans()[0].as_deref(), Some("A"));
        assert_eq!(run.phase().to_string(), "blueBan2");
        assert!(run.pending().is_none());
    }

    #[test]
    fn forced_selection_uses_injected_chooser() {
        let mut run = ranked_run(pool_ten());
        let mut last = |len: usize| len - 1;
        let forced = run.force_random_selection(&mut last);
        assert_eq!(forced.as_deref(), Some("J"));
    }

    #[test]
    fn forced_selection_skips_committed_heroes() {
        let mut run = ranked_run(pool_ten());
        run.select("A");
        run.confirm();
        // First available is now B.
        let forced = run.force_random_selection(&mut first);
        assert_eq!(forced.as_deref(), Some("B"));
        assert_no_duplicates(&run);
    }

    #[test]
    fn forced_selection_on_exhausted_pool_is_a_noop() {
        // Pool of 2 covers only the first two of four ban turns.
        let pool = vec!["A".to_string(), "B".to_string()];
        let config =
            DraftConfig::new(false, 30, 1, 1, DraftStyle::Standard, pool).unwrap();
        let mut run = DraftRun::start(config);
        run.select("A");
        run.confirm();
        run.select("B");
        run.confirm();

        // bluePick1 is on the clock with nothing left to draw.
        assert_eq!(run.phase().to_string(), "bluePick1");
        assert_eq!(run.force_random_selection(&mut first), None);
        assert_eq!(run.phase().to_string(), "bluePick1");
    }

    #[test]
    fn tick_counts_down_then_forces() {
        let config =
            DraftConfig::new(true, 3, 2, 5, DraftStyle::Ranked, pool_ten()).unwrap();
        let mut run = DraftRun::start(config);

        assert_eq!(run.tick(&mut first), TickOutcome::Counting(2));
        assert_eq!(run.tick(&mut first), TickOutcome::Counting(1));
        assert_eq!(run.tick(&mut first), TickOutcome::Forced("A".to_string()));
        assert_eq!(run.phase().to_string(), "blueBan2");
        // Countdown restarted for the next turn, zero never shown.
        assert_eq!(run.timer_remaining(), 3);
    }

    #[test]
    fn tick_forces_through_entire_draft_without_duplicates() {
        let pool: Vec<String> = ('A'..='N').map(|c| c.to_string()).collect();
        let config =
            DraftConfig::new(true, 1, 2, 5, DraftStyle::Ranked, pool).unwrap();
        let mut run = DraftRun::start(config);

        let mut forced = 0;
        while !run.is_complete() {
            match run.tick(&mut first) {
                TickOutcome::Forced(_) => forced += 1,
                other => panic!("expected a forced selection, got {other:?}"),
            }
            assert_no_duplicates(&run);
        }
        assert_eq!(forced, 14);
        assert_eq!(all_committed(&run).len(), 14);
    }

    #[test]
    fn tick_on_exhausted_pool_restarts_countdown() {
        let pool = vec!["A".to_string(), "B".to_string()];
        let config =
            DraftConfig::new(true, 1, 1, 1, DraftStyle::Standard, pool).unwrap();
        let mut run = DraftRun::start(config);
        run.select("A");
        run.confirm();
        run.select("B");
        run.confirm();

        assert_eq!(run.tick(&mut first), TickOutcome::Exhausted);
        assert_eq!(run.timer_remaining(), 1);
        assert_eq!(run.phase().to_string(), "bluePick1");
    }

    #[test]
    fn reset_returns_to_config_but_keeps_slots() {
        let mut run = ranked_run(pool_ten());
        run.select("A");
        run.confirm();
        run.select("B");

        run.reset();
        assert_eq!(run.phase(), Phase::Config);
        assert!(run.pending().is_none());
        // The board stays inspectable until the next run starts.
        assert_eq!(run.blue_bans()[0].as_deref(), Some("A"));

        // Everything is inert from the config state.
        assert!(!run.select("C"));
        assert!(!run.confirm());
        assert_eq!(run.tick(&mut first), TickOutcome::Idle);
    }
}
