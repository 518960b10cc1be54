// Draft configuration: validated settings, share codes, and file loading
// (config/draft.toml).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draft::phase::Phase;
use crate::draft::sequence::{self, DraftStyle};

/// Default location of the settings file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/draft.toml";

/// Default location of the hero catalog.
pub const DEFAULT_CATALOG_PATH: &str = "data/heroes.json";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to decode share code: {source}")]
    ShareCode { source: serde_json::Error },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Draft configuration
// ---------------------------------------------------------------------------

/// Settings for a single draft run. Immutable once the run starts; changing
/// anything means returning to configuration and starting over.
///
/// The serde form is the share-code wire shape (camelCase keys, phases as
/// tokens), so a value round-trips through a share URL unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftConfig {
    pub use_timer: bool,
    /// Seconds per turn when the timer is enabled.
    pub timer_duration: u32,
    /// Bans per team; zero disables the ban stage.
    pub ban_count: u8,
    /// Picks per team.
    pub pick_count: u8,
    /// The ordered phase plan, ending in `complete`.
    #[serde(rename = "draftSequence")]
    pub sequence: Vec<Phase>,
    /// The hero pool. May be empty in a share code, in which case the
    /// catalog names are attached at run start.
    #[serde(default)]
    pub heroes: Vec<String>,
}

impl DraftConfig {
    /// Assemble and validate a configuration, generating the sequence from
    /// the counts and style.
    pub fn new(
        use_timer: bool,
        timer_duration: u32,
        ban_count: u8,
        pick_count: u8,
        style: DraftStyle,
        heroes: Vec<String>,
    ) -> Result<Self, ConfigError> {
        let config = DraftConfig {
            use_timer,
            timer_duration,
            ban_count,
            pick_count,
            sequence: sequence::generate(ban_count, pick_count, style),
            heroes,
        };
        config.validate()?;
        Ok(config)
    }

    /// The stock setup: ranked two-ban five-pick with a 30-second timer and
    /// an empty pool (filled from the catalog at run start).
    pub fn default_ranked() -> Self {
        DraftConfig {
            use_timer: true,
            timer_duration: 30,
            ban_count: 2,
            pick_count: 5,
            sequence: sequence::generate(2, 5, DraftStyle::Ranked),
            heroes: Vec::new(),
        }
    }

    /// Replace the hero pool.
    pub fn with_heroes(mut self, heroes: Vec<String>) -> Self {
        self.heroes = heroes;
        self
    }

    /// Check the configuration invariants: a positive pick count and timer
    /// duration, a sequence that covers exactly the configured counts, and
    /// a duplicate-free pool.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pick_count == 0 {
            return Err(ConfigError::ValidationError {
                field: "pickCount".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.timer_duration == 0 {
            return Err(ConfigError::ValidationError {
                field: "timerDuration".into(),
                message: "must be greater than 0".into(),
            });
        }
        if !sequence::is_well_formed(&self.sequence, self.ban_count, self.pick_count) {
            return Err(ConfigError::ValidationError {
                field: "draftSequence".into(),
                message: "does not cover the configured ban and pick counts".into(),
            });
        }
        let mut seen = HashSet::new();
        for hero in &self.heroes {
            if !seen.insert(hero.as_str()) {
                return Err(ConfigError::ValidationError {
                    field: "heroes".into(),
                    message: format!("duplicate hero `{hero}` in pool"),
                });
            }
        }
        Ok(())
    }

    /// Encode this configuration as a URL-embeddable JSON share code.
    pub fn to_share_code(&self) -> String {
        // Serializing a plain data struct to JSON cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode and validate a share code. Malformed or partially valid
    /// payloads fail closed; the caller falls back to interactive
    /// configuration.
    pub fn from_share_code(code: &str) -> Result<Self, ConfigError> {
        let config: DraftConfig =
            serde_json::from_str(code).map_err(|source| ConfigError::ShareCode { source })?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// draft.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the draft.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    draft: DraftSection,
    #[serde(default)]
    catalog: CatalogSection,
}

#[derive(Debug, Clone, Deserialize)]
struct DraftSection {
    use_timer: bool,
    timer_duration: u32,
    ban_count: u8,
    pick_count: u8,
    style: DraftStyle,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogSection {
    path: String,
}

impl Default for CatalogSection {
    fn default() -> Self {
        CatalogSection {
            path: DEFAULT_CATALOG_PATH.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Assembled application config
// ---------------------------------------------------------------------------

/// Runtime settings assembled from draft.toml, or stock defaults when the
/// file is absent.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub draft: DraftConfig,
    pub style: DraftStyle,
    pub catalog_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            draft: DraftConfig::default_ranked(),
            style: DraftStyle::Ranked,
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
        }
    }
}

/// Load and validate configuration from the given draft.toml file.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let file: DraftFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let draft = DraftConfig::new(
        file.draft.use_timer,
        file.draft.timer_duration,
        file.draft.ban_count,
        file.draft.pick_count,
        file.draft.style,
        Vec::new(),
    )?;

    Ok(AppConfig {
        draft,
        style: file.draft.style,
        catalog_path: file.catalog.path,
    })
}

/// Convenience wrapper: loads `config/draft.toml` relative to the working
/// directory, falling back to the stock ranked defaults when it is absent.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = Path::new(DEFAULT_CONFIG_PATH);
    if path.exists() {
        load_config_from(path)
    } else {
        Ok(AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
