//! Model configuration files.
//!
//! Priors and CPTs are usually kept in a file owned by whoever maintains the model. A CPT is a map
//! from the parent configuration `"pph,ppr"` to `P(effect = true | pph, ppr)`:
//!
//! ```toml
//! [priors]
//! PPH = 0.1
//! PPR = 0.1
//!
//! [cpts.GPS]
//! "0,0" = 0.05
//! "0,1" = 0.3
//! "1,0" = 0.3
//! "1,1" = 0.6
//! ```
//!
//! JSON files with the same shape are accepted when the path ends in `.json`.

use crate::init::CptEntries;
use crate::model::{build_model, Cpts, Model, Priors};
use crate::util::{Result, ValidationError};
use crate::variable::{Effect, HiddenCause};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Error)]
pub enum ConfigError {

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

}


/// The parameters of a `Model` as written in a configuration file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// ```name -> P(cause = true)``` for each hidden cause
    pub priors: IndexMap<String, f64>,

    /// ```effect name -> ("pph,ppr" -> P(effect = true | pph, ppr))```
    pub cpts: IndexMap<String, IndexMap<String, f64>>,
}


impl ModelConfig {

    /// Load a configuration from ```path```. Files ending in `.json` are read as JSON, anything
    /// else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

        let is_json = path.extension().map_or(false, |ext| ext == "json");
        let config = if is_json {
            Self::from_json(&text)
                .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })?
        } else {
            Self::from_toml(&text)
                .map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })?
        };

        debug!(path = %path.display(), "loaded model configuration");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self).map_err(ConfigError::from)?)
    }


    /// The reference configuration: both causes rare, and every effect more likely the more
    /// causes are present.
    pub fn example() -> Self {
        let table = [[0.05, 0.3], [0.3, 0.6]];

        let priors = HiddenCause::ALL.iter()
                                     .map(|c| (String::from(c.name()), 0.1))
                                     .collect();

        let cpts = Effect::ALL.iter()
                              .map(|e| {
                                  let entries = [(0, 0), (0, 1), (1, 0), (1, 1)]
                                      .iter()
                                      .map(|&(pph, ppr): &(usize, usize)| {
                                          (format!("{},{}", pph, ppr), table[pph][ppr])
                                      })
                                      .collect();
                                  (String::from(e.name()), entries)
                              })
                              .collect();

        ModelConfig { priors, cpts }
    }


    /// Validate the configuration and build the `Model` it describes.
    pub fn to_model(&self) -> Result<Model> {
        let priors: Priors = self.priors.clone();

        let mut cpts = Cpts::new();
        for (effect, entries) in self.cpts.iter() {
            let mut parsed = CptEntries::new();
            for (key, &p) in entries.iter() {
                // "0,1" and " 0, 1" name the same configuration
                if parsed.insert(parse_parent_config(effect, key)?, p).is_some() {
                    let msg = format!("{}: {} given twice", effect, key);
                    return Err(ValidationError::InvalidParentConfig(msg).into());
                }
            }
            cpts.insert(effect.clone(), parsed);
        }

        build_model(&priors, &cpts)
    }

}


/// Parse a parent configuration key of the form `"pph,ppr"`, e.g. `"1,0"`.
fn parse_parent_config(effect: &str, key: &str) -> std::result::Result<(u8, u8), ValidationError> {
    let invalid = || ValidationError::InvalidParentConfig(format!("{}: {}", effect, key));

    let mut states = key.split(',').map(|s| s.trim().parse::<u8>());
    match (states.next(), states.next(), states.next()) {
        (Some(Ok(pph)), Some(Ok(ppr)), None) if pph <= 1 && ppr <= 1 => Ok((pph, ppr)),
        _ => Err(invalid())
    }
}
