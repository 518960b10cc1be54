// Ban/pick sequence generation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::phase::{Action, Phase, Team, Turn};

/// Which ban-ordering convention a draft uses. A generator input only;
/// the style is not part of the persisted configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStyle {
    /// Blue bans twice in a row, then red bans twice in a row.
    Ranked,
    /// Bans alternate blue/red per index.
    Standard,
}

fn turn(team: Team, action: Action, index: u8) -> Phase {
    Phase::Turn(Turn {
        team,
        action,
        index,
    })
}

/// Generate the ordered phase plan for one draft configuration.
///
/// Ban ordering: `Ranked` with at least two bans pairs the opening bans
/// (blue 1-2, then red 1-2); any further ban indices alternate per index.
/// `Standard` (or `Ranked` with fewer than two bans) alternates throughout.
///
/// Pick ordering: five picks per team use the fixed competitive order
/// (blue1, red1, red2, blue2, blue3, red3, blue4, red4, blue5, red5);
/// any other pick count alternates per index.
///
/// The terminal `complete` phase is always appended, exactly once.
pub fn generate(ban_count: u8, pick_count: u8, style: DraftStyle) -> Vec<Phase> {
    let mut sequence =
        Vec::with_capacity(2 * (ban_count as usize + pick_count as usize) + 1);

    if style == DraftStyle::Ranked && ban_count >= 2 {
        for i in 1..=2 {
            sequence.push(turn(Team::Blue, Action::Ban, i));
        }
        for i in 1..=2 {
            sequence.push(turn(Team::Red, Action::Ban, i));
        }
        for i in 3..=ban_count {
            sequence.push(turn(Team::Blue, Action::Ban, i));
            sequence.push(turn(Team::Red, Action::Ban, i));
        }
    } else {
        for i in 1..=ban_count {
            sequence.push(turn(Team::Blue, Action::Ban, i));
            sequence.push(turn(Team::Red, Action::Ban, i));
        }
    }

    if pick_count == 5 {
        const COMPETITIVE_ORDER: [(Team, u8); 10] = [
            (Team::Blue, 1),
            (Team::Red, 1),
            (Team::Red, 2),
            (Team::Blue, 2),
            (Team::Blue, 3),
            (Team::Red, 3),
            (Team::Blue, 4),
            (Team::Red, 4),
            (Team::Blue, 5),
            (Team::Red, 5),
        ];
        for (team, i) in COMPETITIVE_ORDER {
            sequence.push(turn(team, Action::Pick, i));
        }
    } else {
        for i in 1..=pick_count {
            sequence.push(turn(Team::Blue, Action::Pick, i));
            sequence.push(turn(Team::Red, Action::Pick, i));
        }
    }

    sequence.push(Phase::Complete);
    sequence
}

/// Whether `sequence` is a valid plan for the given counts: every implied
/// ban and pick turn exactly once, terminated by a single `complete`.
pub fn is_well_formed(sequence: &[Phase], ban_count: u8, pick_count: u8) -> bool {
    let Some((Phase::Complete, turns)) = sequence.split_last() else {
        return false;
    };
    if turns.len() != 2 * (ban_count as usize + pick_count as usize) {
        return false;
    }

    let mut seen = HashSet::new();
    for phase in turns {
        let Phase::Turn(t) = phase else {
            return false;
        };
        let limit = match t.action {
            Action::Ban => ban_count,
            Action::Pick => pick_count,
        };
        if t.index == 0 || t.index > limit || !seen.insert((t.team, t.action, t.index)) {
            return false;
        }
    }
    true
}
