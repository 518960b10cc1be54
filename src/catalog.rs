// Hero catalog loading. The draft core only consumes hero names; the other
// fields ride along for the presentation layer.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse catalog file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("duplicate hero name in catalog: {name}")]
    DuplicateHero { name: String },
}

/// One hero record as published in `heroes.json`. The field names mirror
/// the published data set. The rate strings are display-only and never
/// parsed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    #[serde(rename = "Name")]
    pub name: String,
    /// "/"-delimited role tags, e.g. "Fighter/Assassin".
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Image URL")]
    pub image_url: String,
    #[serde(rename = "Tier")]
    pub tier: String,
    #[serde(rename = "Win Rate")]
    pub win_rate: String,
    #[serde(rename = "Pick Rate")]
    pub pick_rate: String,
    #[serde(rename = "Ban Rate")]
    pub ban_rate: String,
}

impl Hero {
    /// The individual role tags.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.role.split('/').filter(|tag| !tag.is_empty())
    }
}

/// The full hero catalog, in published order. Names are unique.
#[derive(Debug, Clone)]
pub struct HeroCatalog {
    heroes: Vec<Hero>,
}

impl HeroCatalog {
    /// Build a catalog, rejecting duplicate names.
    pub fn new(heroes: Vec<Hero>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for hero in &heroes {
            if !seen.insert(hero.name.as_str()) {
                return Err(CatalogError::DuplicateHero {
                    name: hero.name.clone(),
                });
            }
        }
        Ok(HeroCatalog { heroes })
    }

    /// Load the catalog from a `heroes.json` file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|_| CatalogError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        let heroes: Vec<Hero> =
            serde_json::from_str(&text).map_err(|source| CatalogError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog = Self::new(heroes)?;
        info!("Loaded {} heroes from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn heroes(&self) -> &[Hero] {
        &self.heroes
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }

    /// Hero names in catalog order, for seeding a draft pool.
    pub fn names(&self) -> Vec<String> {
        self.heroes.iter().map(|h| h.name.clone()).collect()
    }
}
