// Draft phase model: teams, actions, and the ordered phase tokens.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// One of the two drafting sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    /// The side drafting against this one.
    pub fn opponent(&self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }

    /// Wire-token prefix ("blue"/"red").
    pub fn token(&self) -> &'static str {
        match self {
            Team::Blue => "blue",
            Team::Red => "red",
        }
    }

    /// Banner label for the presentation layer.
    pub fn label(&self) -> &'static str {
        match self {
            Team::Blue => "BLUE TEAM",
            Team::Red => "RED TEAM",
        }
    }
}

/// What a turn does with its selected hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Remove the hero from availability without assigning it.
    Ban,
    /// Assign the hero to the acting team's roster.
    Pick,
}

impl Action {
    /// Wire-token segment ("Ban"/"Pick").
    pub fn token(&self) -> &'static str {
        match self {
            Action::Ban => "Ban",
            Action::Pick => "Pick",
        }
    }

    /// Banner label for the presentation layer.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Ban => "BAN",
            Action::Pick => "PICK",
        }
    }
}

/// One ban or pick step, addressing exactly one selection slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Turn {
    pub team: Team,
    pub action: Action,
    /// 1-based slot index within the team's ban or pick list.
    pub index: u8,
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.team.token(),
            self.action.token(),
            self.index
        )
    }
}

/// One discrete step of a draft.
///
/// Phases are totally ordered by their position in a draft's sequence, not
/// by any property of the token itself. The team, action, and slot index are
/// carried as data rather than encoded in a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Interactive configuration; no run is in progress.
    Config,
    /// A single ban or pick step.
    Turn(Turn),
    /// Terminal state; the draft is finished.
    Complete,
}

impl Phase {
    /// The turn data, if this phase is a ban or pick step.
    pub fn turn(&self) -> Option<Turn> {
        match self {
            Phase::Turn(turn) => Some(*turn),
            _ => None,
        }
    }

    /// The team on the clock, if any.
    pub fn active_team(&self) -> Option<Team> {
        self.turn().map(|t| t.team)
    }

    pub fn is_turn(&self) -> bool {
        matches!(self, Phase::Turn(_))
    }

    /// Banner text for the presentation layer, e.g. "BLUE TEAM BAN PHASE".
    pub fn display_name(&self) -> String {
        match self {
            Phase::Config => "CONFIGURATION".to_string(),
            Phase::Complete => "DRAFT COMPLETE".to_string(),
            Phase::Turn(turn) => format!("{} {} PHASE", turn.team.label(), turn.action.label()),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Config => f.write_str("config"),
            Phase::Complete => f.write_str("complete"),
            Phase::Turn(turn) => write!(f, "{turn}"),
        }
    }
}

/// A phase token that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized draft phase token: `{0}`")]
pub struct ParsePhaseError(pub String);

impl FromStr for Phase {
    type Err = ParsePhaseError;

    /// Parse the compact wire-token form: `config`, `complete`,
    /// `blueBan1`, `redPick5`, ... Anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "config" => return Ok(Phase::Config),
            "complete" => return Ok(Phase::Complete),
            _ => {}
        }

        let err = || ParsePhaseError(s.to_string());

        let (team, rest) = if let Some(rest) = s.strip_prefix("blue") {
            (Team::Blue, rest)
        } else if let Some(rest) = s.strip_prefix("red") {
            (Team::Red, rest)
        } else {
            return Err(err());
        };

        let (action, digits) = if let Some(digits) = rest.strip_prefix("Ban") {
            (Action::Ban, digits)
        } else if let Some(digits) = rest.strip_prefix("Pick") {
            (Action::Pick, digits)
        } else {
            return Err(err());
        };

        // Plain decimal digits only; u8::parse alone would also accept "+3".
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let index: u8 = digits.parse().map_err(|_| err())?;
        if index == 0 {
            return Err(err());
        }

        Ok(Phase::Turn(Turn {
            team,
            action,
            index,
        }))
    }
}

// Phases travel as their token strings in share codes and snapshots.

impl Serialize for Phase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Phase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(de::Error::custom)
    }
}
