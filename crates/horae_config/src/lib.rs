//! Configuration file support for horae.
//!
//! A single TOML file carries the ephemeris table location and the tuning of
//! every search. All sections and fields are optional:
//!
//! ```toml
//! [ephemeris]
//! table = "data/ephemeris_2024.json"
//!
//! [orbs]
//! square = 5.0
//!
//! [void_of_course]
//! step_days = 0.0104166667
//!
//! [electional]
//! max_results = 20
//! avoid_mercury_retrograde = false
//!
//! [progressions]
//! aspect_orb_deg = 1.0
//! ```
//!
//! The shared `[orbs]` table, when present, is applied to the void-of-course
//! and electional searches so one file tunes every aspect check consistently.

pub mod error;

use std::path::{Path, PathBuf};

use horae_core::ProviderConfig;
use horae_search::{
    ElectionalConfig, EclipseSearchConfig, OrbTable, ProgressionConfig, RetrogradeConfig,
    ReturnConfig, VocConfig,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::ConfigError;

/// `[ephemeris]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EphemerisSection {
    /// JSON ephemeris table. Relative paths resolve against the config file.
    pub table: Option<PathBuf>,
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HoraeConfig {
    pub ephemeris: EphemerisSection,
    pub orbs: Option<OrbTable>,
    pub returns: ReturnConfig,
    pub retrograde: RetrogradeConfig,
    pub void_of_course: VocConfig,
    pub electional: ElectionalConfig,
    pub eclipses: EclipseSearchConfig,
    pub progressions: ProgressionConfig,
}

impl HoraeConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if let (Some(table), Some(dir)) = (config.ephemeris.table.as_mut(), path.parent()) {
            *table = resolve_relative(dir, table);
        }
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate TOML text. Relative table paths are kept as written.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(orbs) = &self.orbs {
            orbs.validate().map_err(invalid("orbs"))?;
        }
        self.returns.validate().map_err(invalid("returns"))?;
        self.retrograde.validate().map_err(invalid("retrograde"))?;
        self.void_of_course().validate().map_err(invalid("void_of_course"))?;
        self.electional().validate().map_err(invalid("electional"))?;
        self.eclipses.validate().map_err(invalid("eclipses"))?;
        self.progressions.validate().map_err(invalid("progressions"))?;
        Ok(())
    }

    /// Provider settings, if a table was configured.
    pub fn provider_config(&self) -> Option<ProviderConfig> {
        self.ephemeris.table.clone().map(ProviderConfig::new)
    }

    /// Orbs used for aspect reports.
    pub fn orb_table(&self) -> OrbTable {
        self.orbs.unwrap_or_default()
    }

    pub fn void_of_course(&self) -> VocConfig {
        let mut voc = self.void_of_course.clone();
        if let Some(orbs) = self.orbs {
            voc.orbs = orbs;
        }
        voc
    }

    /// Electional settings. The void-of-course rule uses the
    /// `[void_of_course]` section.
    pub fn electional(&self) -> ElectionalConfig {
        let mut electional = self.electional.clone();
        if let Some(orbs) = self.orbs {
            electional.orbs = orbs;
        }
        electional.voc = self.void_of_course();
        electional
    }
}

fn invalid(section: &'static str) -> impl Fn(&'static str) -> ConfigError {
    move |reason| ConfigError::Invalid { section, reason }
}

fn resolve_relative(dir: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        dir.join(path)
    } else {
        path.to_path_buf()
    }
}
