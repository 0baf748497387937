//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `TAXOMATCH_*` environment variables. Embedding
//! provider settings live in [`crate::embedding::EmbeddingConfig`].

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants::{DEFAULT_CONCURRENCY, DEFAULT_THRESHOLD_RATIO, DEFAULT_TOP_N};
use crate::mapping::MatchOptions;
use crate::search::MatchPolicy;

/// Default taxonomy input used when `TAXOMATCH_TAXONOMY_PATH` is not set.
pub const DEFAULT_TAXONOMY_PATH: &str = "./data/taxonomy_tree_with_embeddings.json";

/// Default skills input used when `TAXOMATCH_SKILLS_PATH` is not set.
pub const DEFAULT_SKILLS_PATH: &str = "./data/skills.json";

/// Default JSON Lines output used when `TAXOMATCH_OUTPUT_PATH` is not set.
pub const DEFAULT_OUTPUT_PATH: &str = "./data/skill_taxonomy_mapping.jsonl";

/// Mapping run configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Taxonomy JSON (tagged or legacy format).
    pub taxonomy_path: PathBuf,

    /// Skills JSON array.
    pub skills_path: PathBuf,

    /// Where match records are written, one JSON object per line.
    pub output_path: PathBuf,

    /// Top-level branches searched in full. Default: `3`.
    pub top_n: usize,

    /// Match policy. Default: threshold band at `0.90`.
    pub policy: MatchPolicy,

    /// Skills embedded at once. Default: `1`.
    pub concurrency: usize,

    /// Embed taxonomy nodes that lack an embedding before mapping.
    pub precompute: bool,

    /// Where the taxonomy is saved after precomputation. `None` keeps it in memory only.
    pub snapshot_path: Option<PathBuf>,

    /// Attach the ancestor description chain to each record.
    pub include_path: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            taxonomy_path: PathBuf::from(DEFAULT_TAXONOMY_PATH),
            skills_path: PathBuf::from(DEFAULT_SKILLS_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            top_n: DEFAULT_TOP_N,
            policy: MatchPolicy::default(),
            concurrency: DEFAULT_CONCURRENCY,
            precompute: false,
            snapshot_path: None,
            include_path: false,
        }
    }
}

impl Config {
    const ENV_TAXONOMY_PATH: &'static str = "TAXOMATCH_TAXONOMY_PATH";
    const ENV_SKILLS_PATH: &'static str = "TAXOMATCH_SKILLS_PATH";
    const ENV_OUTPUT_PATH: &'static str = "TAXOMATCH_OUTPUT_PATH";
    const ENV_TOP_N: &'static str = "TAXOMATCH_TOP_N";
    const ENV_POLICY: &'static str = "TAXOMATCH_POLICY";
    const ENV_THRESHOLD_RATIO: &'static str = "TAXOMATCH_THRESHOLD_RATIO";
    const ENV_CONCURRENCY: &'static str = "TAXOMATCH_CONCURRENCY";
    const ENV_PRECOMPUTE: &'static str = "TAXOMATCH_PRECOMPUTE";
    const ENV_SNAPSHOT_PATH: &'static str = "TAXOMATCH_SNAPSHOT_PATH";
    const ENV_INCLUDE_PATH: &'static str = "TAXOMATCH_INCLUDE_PATH";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let taxonomy_path = Self::parse_path_from_env(Self::ENV_TAXONOMY_PATH, defaults.taxonomy_path);
        let skills_path = Self::parse_path_from_env(Self::ENV_SKILLS_PATH, defaults.skills_path);
        let output_path = Self::parse_path_from_env(Self::ENV_OUTPUT_PATH, defaults.output_path);
        let top_n = Self::parse_positive_from_env(Self::ENV_TOP_N, defaults.top_n)?;
        let policy = Self::parse_policy_from_env()?;
        let concurrency = Self::parse_positive_from_env(Self::ENV_CONCURRENCY, defaults.concurrency)?;
        let precompute = Self::parse_bool_from_env(Self::ENV_PRECOMPUTE, defaults.precompute)?;
        let snapshot_path = Self::parse_optional_path_from_env(Self::ENV_SNAPSHOT_PATH);
        let include_path = Self::parse_bool_from_env(Self::ENV_INCLUDE_PATH, defaults.include_path)?;

        Ok(Self {
            taxonomy_path,
            skills_path,
            output_path,
            top_n,
            policy,
            concurrency,
            precompute,
            snapshot_path,
            include_path,
        })
    }

    /// Checks that inputs exist and outputs can be created. Does not create directories.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_file(&self.taxonomy_path)?;
        Self::require_file(&self.skills_path)?;
        Self::require_parent_dir(&self.output_path)?;
        if let Some(ref path) = self.snapshot_path {
            Self::require_parent_dir(path)?;
        }
        Ok(())
    }

    /// Search settings for [`crate::SkillMapper`].
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            top_n: self.top_n,
            policy: self.policy,
            include_path: self.include_path,
        }
    }

    fn require_file(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(ConfigError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn require_parent_dir(path: &Path) -> Result<(), ConfigError> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                Err(ConfigError::MissingParentDir {
                    path: path.to_path_buf(),
                })
            }
            _ => Ok(()),
        }
    }

    fn parse_policy_from_env() -> Result<MatchPolicy, ConfigError> {
        let policy = match env::var(Self::ENV_POLICY) {
            Ok(value) => MatchPolicy::from_str(&value).map_err(|e| ConfigError::InvalidValue {
                name: Self::ENV_POLICY,
                value,
                reason: e.to_string(),
            })?,
            Err(_) => MatchPolicy::default(),
        };

        match policy {
            MatchPolicy::BestMatch => Ok(policy),
            MatchPolicy::ThresholdBand { .. } => {
                let ratio = match env::var(Self::ENV_THRESHOLD_RATIO) {
                    Ok(value) => value.trim().parse::<f32>().map_err(|e| ConfigError::InvalidValue {
                        name: Self::ENV_THRESHOLD_RATIO,
                        value: value.clone(),
                        reason: e.to_string(),
                    })?,
                    Err(_) => DEFAULT_THRESHOLD_RATIO,
                };
                MatchPolicy::threshold_band(ratio).map_err(|e| ConfigError::InvalidValue {
                    name: Self::ENV_THRESHOLD_RATIO,
                    value: ratio.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn parse_positive_from_env(name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(name) {
            Ok(value) => {
                let parsed: usize = value.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidValue {
                        name,
                        value: value.clone(),
                        reason: e.to_string(),
                    }
                })?;

                if parsed == 0 {
                    return Err(ConfigError::InvalidValue {
                        name,
                        value,
                        reason: "must be at least 1".to_string(),
                    });
                }

                Ok(parsed)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(name) {
            Ok(value) => match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" | "" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    name,
                    value,
                    reason: "expected a boolean".to_string(),
                }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}
