//! TOML-based configuration for I.R.I.S
//!
//! This module provides the validated, immutable configuration value object
//! consumed by the merge engine and the iteration controller, plus named
//! presets bundling threshold/cap parameter sets (`iris.toml`).
//!
//! # Hot Reloading
//!
//! Configuration changes are detected and applied at runtime through
//! [`ConfigManager`]. A swapped configuration takes effect at the next
//! iteration boundary of a running session, never mid-merge.

use arc_swap::ArcSwap;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::types::ResearchError;

// ============= Merger Configuration =============

/// Parameters governing normalization, grouping, merging, and filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergerConfig {
    /// Similarity above which two contents are considered near-duplicates.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Records with cleaned content shorter than this are dropped during
    /// normalization.
    #[serde(default = "default_min_content_length")]
    pub min_content_length: usize,

    /// Maximum number of merged results kept after ranking.
    #[serde(default = "default_max_merged_results")]
    pub max_merged_results: usize,

    /// Sentence cap applied to synthesized content.
    #[serde(default = "default_max_sentences_per_result")]
    pub max_sentences_per_result: usize,

    /// Key-point cap applied to synthesized content.
    #[serde(default = "default_max_key_points")]
    pub max_key_points: usize,

    /// Merged results scoring below this are discarded when quality
    /// filtering is enabled.
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f32,

    /// Weight of collaborator confidence in the composite quality score.
    #[serde(default = "default_confidence_weight")]
    pub confidence_weight: f32,

    /// Weight of query relevance in the composite quality score.
    #[serde(default = "default_relevance_weight")]
    pub relevance_weight: f32,

    /// Weight of the derived content-quality heuristic in the composite.
    #[serde(default = "default_content_quality_weight")]
    pub content_quality_weight: f32,

    /// Cluster near-duplicates before merging. When disabled every record
    /// forms a singleton group and merging degrades to a filter stage.
    #[serde(default = "default_true")]
    pub enable_semantic_grouping: bool,

    /// Remove near-identical sentences inside merged content.
    #[serde(default = "default_true")]
    pub enable_deduplication: bool,

    /// Drop merged results below `quality_threshold`.
    #[serde(default = "default_true")]
    pub enable_quality_filtering: bool,

    /// Cache pairwise similarity scores.
    #[serde(default = "default_true")]
    pub enable_similarity_cache: bool,

    /// Entry cap for the similarity cache (LRU eviction).
    #[serde(default = "default_max_cache_size")]
    pub max_cache_size: usize,

    /// Carry every member's provenance into the merged result.
    #[serde(default = "default_true")]
    pub preserve_source_info: bool,
}

fn default_similarity_threshold() -> f32 {
    0.7
}

fn default_min_content_length() -> usize {
    50
}

fn default_max_merged_results() -> usize {
    10
}

fn default_max_sentences_per_result() -> usize {
    8
}

fn default_max_key_points() -> usize {
    3
}

fn default_quality_threshold() -> f32 {
    0.6
}

fn default_confidence_weight() -> f32 {
    0.4
}

fn default_relevance_weight() -> f32 {
    0.4
}

fn default_content_quality_weight() -> f32 {
    0.2
}

fn default_true() -> bool {
    true
}

fn default_max_cache_size() -> usize {
    1000
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            min_content_length: default_min_content_length(),
            max_merged_results: default_max_merged_results(),
            max_sentences_per_result: default_max_sentences_per_result(),
            max_key_points: default_max_key_points(),
            quality_threshold: default_quality_threshold(),
            confidence_weight: default_confidence_weight(),
            relevance_weight: default_relevance_weight(),
            content_quality_weight: default_content_quality_weight(),
            enable_semantic_grouping: true,
            enable_deduplication: true,
            enable_quality_filtering: true,
            enable_similarity_cache: true,
            max_cache_size: default_max_cache_size(),
            preserve_source_info: true,
        }
    }
}

// ============= Iteration Configuration =============

/// Parameters bounding the evaluate → query → merge loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationConfig {
    /// Hard cap on follow-up iterations per session.
    #[serde(default = "default_max_follow_up_iterations")]
    pub max_follow_up_iterations: u32,

    /// Follow-up queries issued per iteration, one per priority area.
    #[serde(default = "default_max_queries_per_iteration")]
    pub max_queries_per_iteration: u32,

    /// Hard cap on total queries issued per session, across iterations.
    #[serde(default = "default_max_total_reflections")]
    pub max_total_reflections: u32,

    /// Minimum merged-result quality for a knowledge gap to count as
    /// addressed.
    #[serde(default = "default_sufficiency_threshold")]
    pub sufficiency_threshold: f32,

    /// Pacing delay between sequential follow-up queries. A scheduling
    /// courtesy toward the search collaborator, not a correctness knob.
    #[serde(default = "default_follow_up_delay_seconds")]
    pub follow_up_delay_seconds: f64,

    /// Per-query timeout at the collaborator boundary.
    #[serde(default = "default_query_timeout_seconds")]
    pub query_timeout_seconds: u64,

    /// Result cap requested from the search collaborator per query.
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,

    /// Issue the follow-up queries of one iteration concurrently.
    #[serde(default = "default_true")]
    pub enable_parallel_follow_up: bool,

    /// Zero the iteration counters at the start of every task. When false,
    /// counters carry across tasks run on the same controller.
    #[serde(default = "default_true")]
    pub reset_counter_on_new_task: bool,
}

fn default_max_follow_up_iterations() -> u32 {
    3
}

fn default_max_queries_per_iteration() -> u32 {
    3
}

fn default_max_total_reflections() -> u32 {
    8
}

fn default_sufficiency_threshold() -> f32 {
    0.7
}

fn default_follow_up_delay_seconds() -> f64 {
    1.0
}

fn default_query_timeout_seconds() -> u64 {
    30
}

fn default_max_search_results() -> usize {
    3
}

impl Default for IterationConfig {
    fn default() -> Self {
        Self {
            max_follow_up_iterations: default_max_follow_up_iterations(),
            max_queries_per_iteration: default_max_queries_per_iteration(),
            max_total_reflections: default_max_total_reflections(),
            sufficiency_threshold: default_sufficiency_threshold(),
            follow_up_delay_seconds: default_follow_up_delay_seconds(),
            query_timeout_seconds: default_query_timeout_seconds(),
            max_search_results: default_max_search_results(),
            enable_parallel_follow_up: true,
            reset_counter_on_new_task: true,
        }
    }
}

// ============= Presets =============

/// Named, pre-bundled parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Default trade-off between coverage and cost.
    #[default]
    Balanced,
    /// Stricter thresholds, fewer iterations.
    Conservative,
    /// Looser thresholds, more follow-ups.
    Aggressive,
    /// Trimmed merging and short timeouts for fast sessions.
    Performance,
    /// Strict filtering with richer synthesized results.
    Quality,
}

impl Preset {
    /// All bundled presets.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Balanced,
            Self::Conservative,
            Self::Aggressive,
            Self::Performance,
            Self::Quality,
        ]
    }

    /// The full configuration this preset bundles.
    pub fn config(&self) -> IrisConfig {
        let mut config = IrisConfig::default();
        config.preset = *self;
        match self {
            Self::Balanced => {}
            Self::Conservative => {
                config.merger.similarity_threshold = 0.8;
                config.merger.quality_threshold = 0.7;
                config.merger.max_merged_results = 8;
                config.iteration.max_follow_up_iterations = 2;
                config.iteration.max_queries_per_iteration = 2;
                config.iteration.max_total_reflections = 5;
                config.iteration.sufficiency_threshold = 0.8;
                config.iteration.follow_up_delay_seconds = 2.0;
            }
            Self::Aggressive => {
                config.merger.similarity_threshold = 0.6;
                config.merger.quality_threshold = 0.45;
                config.merger.max_merged_results = 15;
                config.iteration.max_follow_up_iterations = 5;
                config.iteration.max_queries_per_iteration = 4;
                config.iteration.max_total_reflections = 15;
                config.iteration.sufficiency_threshold = 0.6;
                config.iteration.follow_up_delay_seconds = 0.5;
            }
            Self::Performance => {
                config.merger.enable_deduplication = false;
                config.merger.max_sentences_per_result = 5;
                config.merger.max_cache_size = 4096;
                config.iteration.max_follow_up_iterations = 2;
                config.iteration.follow_up_delay_seconds = 0.0;
                config.iteration.query_timeout_seconds = 15;
            }
            Self::Quality => {
                config.merger.quality_threshold = 0.75;
                config.merger.max_sentences_per_result = 12;
                config.merger.max_key_points = 5;
                config.merger.max_cache_size = 2048;
                config.iteration.max_follow_up_iterations = 4;
                config.iteration.sufficiency_threshold = 0.8;
            }
        }
        config
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "balanced" => Ok(Self::Balanced),
            "conservative" => Ok(Self::Conservative),
            "aggressive" => Ok(Self::Aggressive),
            "performance" => Ok(Self::Performance),
            "quality" => Ok(Self::Quality),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Balanced => "balanced",
            Self::Conservative => "conservative",
            Self::Aggressive => "aggressive",
            Self::Performance => "performance",
            Self::Quality => "quality",
        };
        write!(f, "{}", name)
    }
}

// ============= Root Configuration =============

/// Raw on-disk shape: preset plus optional section overrides.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    preset: Option<String>,
    enable_runtime_switching: Option<bool>,
    merger: Option<MergerConfig>,
    iteration: Option<IterationConfig>,
}

/// Root configuration value object.
///
/// Immutable after construction; [`IrisConfig::validate`] runs eagerly on
/// every load path, so a constructed value is always internally consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrisConfig {
    /// The active preset this configuration was derived from.
    #[serde(default)]
    pub preset: Preset,

    /// Re-read the active configuration at each iteration boundary of a
    /// running session.
    #[serde(default)]
    pub enable_runtime_switching: bool,

    /// Merge-engine parameters.
    #[serde(default)]
    pub merger: MergerConfig,

    /// Iteration-loop parameters.
    #[serde(default)]
    pub iteration: IterationConfig,
}

impl Default for IrisConfig {
    fn default() -> Self {
        Self {
            preset: Preset::Balanced,
            enable_runtime_switching: false,
            merger: MergerConfig::default(),
            iteration: IterationConfig::default(),
        }
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// The configuration file could not be read.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file is not valid TOML.
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The named preset is not one of the bundled parameter sets.
    #[error("Unknown preset '{0}'. Use one of: balanced, conservative, aggressive, performance, quality")]
    UnknownPreset(String),

    /// A threshold or weight is outside its allowed range.
    #[error("'{field}' must be in [{min}, {max}], got {value}")]
    OutOfRange {
        /// Offending field name.
        field: &'static str,
        /// Value found in the configuration.
        value: f64,
        /// Lower bound, inclusive.
        min: f64,
        /// Upper bound, inclusive.
        max: f64,
    },

    /// A cap that must be positive is zero.
    #[error("'{0}' must be greater than zero")]
    ZeroCap(&'static str),

    /// The file watcher could not be installed.
    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),
}

impl From<ConfigError> for ResearchError {
    fn from(err: ConfigError) -> Self {
        ResearchError::ConfigurationInvalid(err.to_string())
    }
}

impl IrisConfig {
    /// Load configuration from a TOML file.
    ///
    /// A `preset` key selects the bundled base; `[merger]` / `[iteration]`
    /// tables, when present, replace the corresponding preset section.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "Configuration file {:?} does not exist, using default configuration",
                path
            );
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        Self::load(path)
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        let mut config = match raw.preset.as_deref() {
            Some(name) => name.parse::<Preset>()?.config(),
            None => Self::default(),
        };
        if let Some(merger) = raw.merger {
            config.merger = merger;
        }
        if let Some(iteration) = raw.iteration {
            config.iteration = iteration;
        }
        if let Some(switching) = raw.enable_runtime_switching {
            config.enable_runtime_switching = switching;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate all numeric ranges and cross-field constraints.
    ///
    /// Runs eagerly at session start so a bad configuration fails before any
    /// iteration begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.merger;
        check_unit("merger.similarity_threshold", m.similarity_threshold)?;
        check_unit("merger.quality_threshold", m.quality_threshold)?;
        check_unit("merger.confidence_weight", m.confidence_weight)?;
        check_unit("merger.relevance_weight", m.relevance_weight)?;
        check_unit("merger.content_quality_weight", m.content_quality_weight)?;
        check_cap("merger.min_content_length", m.min_content_length)?;
        check_cap("merger.max_merged_results", m.max_merged_results)?;
        check_cap("merger.max_sentences_per_result", m.max_sentences_per_result)?;
        check_cap("merger.max_key_points", m.max_key_points)?;
        check_cap("merger.max_cache_size", m.max_cache_size)?;

        // The three weights are expected to sum to 1.0 but the contract does
        // not strictly enforce it.
        let weight_sum = m.confidence_weight + m.relevance_weight + m.content_quality_weight;
        if (weight_sum - 1.0).abs() > 0.01 {
            warn!(
                "Quality weights sum to {:.3}, expected 1.0; composite scores will be skewed",
                weight_sum
            );
        }

        let it = &self.iteration;
        check_unit("iteration.sufficiency_threshold", it.sufficiency_threshold)?;
        check_cap(
            "iteration.max_follow_up_iterations",
            it.max_follow_up_iterations as usize,
        )?;
        check_cap(
            "iteration.max_queries_per_iteration",
            it.max_queries_per_iteration as usize,
        )?;
        check_cap(
            "iteration.max_total_reflections",
            it.max_total_reflections as usize,
        )?;
        check_cap(
            "iteration.query_timeout_seconds",
            it.query_timeout_seconds as usize,
        )?;
        check_cap("iteration.max_search_results", it.max_search_results)?;
        if !it.follow_up_delay_seconds.is_finite() || it.follow_up_delay_seconds < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "iteration.follow_up_delay_seconds",
                value: it.follow_up_delay_seconds,
                min: 0.0,
                max: f64::MAX,
            });
        }

        Ok(())
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

fn check_cap(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroCap(field));
    }
    Ok(())
}

// ============= Hot Reloading Configuration Manager =============

/// Thread-safe configuration manager with hot reloading and runtime preset
/// switching.
///
/// Readers take a lockless snapshot via [`ConfigManager::config`]; a running
/// session re-reads the snapshot only at iteration boundaries, so a swap is
/// never observed mid-phase.
pub struct ConfigManager {
    config: Arc<ArcSwap<IrisConfig>>,
    config_path: PathBuf,
    watcher: RwLock<Option<RecommendedWatcher>>,
}

impl ConfigManager {
    /// Create a manager from `iris.toml`, falling back to defaults when the
    /// file is absent.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::ReadError)?
                .join(path)
        };

        let config = IrisConfig::load_or_default(&path)?;

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: path,
            watcher: RwLock::new(None),
        })
    }

    /// Create a manager directly from a config (useful for testing).
    /// This won't have file watching capabilities.
    pub fn from_config(config: IrisConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: PathBuf::from("iris.toml"),
            watcher: RwLock::new(None),
        }
    }

    /// Get the current configuration (lockless read).
    pub fn config(&self) -> Arc<IrisConfig> {
        self.config.load_full()
    }

    /// Manually reload the configuration from disk.
    pub fn reload(&self) -> Result<(), ConfigError> {
        info!("Reloading configuration from {:?}", self.config_path);

        let new_config = IrisConfig::load(&self.config_path)?;
        self.config.store(Arc::new(new_config));

        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Atomically switch to a bundled preset.
    ///
    /// Running sessions pick the new parameters up at their next iteration
    /// boundary.
    pub fn switch_preset(&self, preset: Preset) {
        let current = self.config.load();
        let mut next = preset.config();
        next.enable_runtime_switching = current.enable_runtime_switching;
        info!("Switching active preset: {} -> {}", current.preset, preset);
        self.config.store(Arc::new(next));
    }

    /// Start watching for configuration file changes.
    pub fn start_watching(&self) -> Result<(), ConfigError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();

        let config_path = self.config_path.clone();
        let config_arc = Arc::clone(&self.config);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        let _ = tx.send(());
                    }
                }
                Err(e) => {
                    error!("Config watcher error: {:?}", e);
                }
            }
        })?;

        if let Some(parent) = self.config_path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        *self.watcher.write() = Some(watcher);

        tokio::spawn(async move {
            let mut last_reload = std::time::Instant::now();
            let debounce_duration = Duration::from_millis(500);

            while rx.recv().await.is_some() {
                if last_reload.elapsed() < debounce_duration {
                    continue;
                }

                // Wait a bit for file write to complete
                tokio::time::sleep(Duration::from_millis(100)).await;

                match IrisConfig::load(&config_path) {
                    Ok(new_config) => {
                        config_arc.store(Arc::new(new_config));
                        info!("Configuration hot-reloaded successfully");
                        last_reload = std::time::Instant::now();
                    }
                    Err(e) => {
                        warn!(
                            "Failed to hot-reload config: {}. Keeping previous config.",
                            e
                        );
                    }
                }
            }
        });

        info!("Configuration hot-reload watcher started");
        Ok(())
    }

    /// Stop watching for configuration changes.
    pub fn stop_watching(&self) {
        *self.watcher.write() = None;
        info!("Configuration hot-reload watcher stopped");
    }
}

impl Clone for ConfigManager {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            config_path: self.config_path.clone(),
            watcher: RwLock::new(None), // Watcher is not cloned
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = IrisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.preset, Preset::Balanced);
        assert_eq!(config.merger.similarity_threshold, 0.7);
        assert_eq!(config.iteration.max_follow_up_iterations, 3);
    }

    #[test]
    fn test_all_presets_validate() {
        for preset in Preset::all() {
            let config = preset.config();
            assert!(
                config.validate().is_ok(),
                "preset {} failed validation",
                preset
            );
            assert_eq!(config.preset, preset);
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("aggressive".parse::<Preset>().unwrap(), Preset::Aggressive);
        assert_eq!("Quality".parse::<Preset>().unwrap(), Preset::Quality);
        assert!(matches!(
            "turbo".parse::<Preset>(),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_parse_preset_with_override() {
        let config = IrisConfig::from_toml_str(
            r#"
preset = "conservative"

[merger]
similarity_threshold = 0.9
"#,
        )
        .unwrap();

        assert_eq!(config.preset, Preset::Conservative);
        // The [merger] table replaces the preset's merger section wholesale.
        assert_eq!(config.merger.similarity_threshold, 0.9);
        assert_eq!(config.merger.quality_threshold, 0.6);
        // The untouched iteration section keeps preset values.
        assert_eq!(config.iteration.max_follow_up_iterations, 2);
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let result = IrisConfig::from_toml_str(
            r#"
[merger]
similarity_threshold = 1.4
"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::OutOfRange {
                field: "merger.similarity_threshold",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_cap_rejected() {
        let result = IrisConfig::from_toml_str(
            r#"
[iteration]
max_follow_up_iterations = 0
"#,
        );
        assert!(matches!(result, Err(ConfigError::ZeroCap(_))));
    }

    #[test]
    fn test_negative_delay_rejected() {
        let result = IrisConfig::from_toml_str(
            r#"
[iteration]
follow_up_delay_seconds = -1.0
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_skewed_weights_warn_but_pass() {
        // Weights that do not sum to 1.0 are accepted; the contract only
        // expects the sum, it does not enforce it.
        let config = IrisConfig::from_toml_str(
            r#"
[merger]
confidence_weight = 0.9
relevance_weight = 0.9
content_quality_weight = 0.9
"#,
        );
        assert!(config.is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            IrisConfig::load("/nonexistent/iris.toml"),
            Err(ConfigError::FileNotFound(_))
        ));
        assert!(IrisConfig::load_or_default("/nonexistent/iris.toml").is_ok());
    }

    #[test]
    fn test_manager_from_config() {
        let manager = ConfigManager::from_config(Preset::Quality.config());
        assert_eq!(manager.config().preset, Preset::Quality);
    }

    #[test]
    fn test_manager_switch_preset() {
        let mut initial = IrisConfig::default();
        initial.enable_runtime_switching = true;
        let manager = ConfigManager::from_config(initial);

        manager.switch_preset(Preset::Aggressive);

        let active = manager.config();
        assert_eq!(active.preset, Preset::Aggressive);
        assert_eq!(active.merger.similarity_threshold, 0.6);
        // The switching flag survives the swap.
        assert!(active.enable_runtime_switching);
    }
}
