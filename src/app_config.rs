use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Voice used to speak the other characters' lines
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Rehearsal settings
    #[serde(default)]
    pub rehearsal: RehearsalConfig,

    /// Dialogue segmentation settings
    #[serde(default)]
    pub segmenter: SegmenterConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Speech synthesis voice options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VoiceConfig {
    /// Installed voice to use, or the engine default when unset
    #[serde(default)]
    pub voice_id: Option<String>,

    /// Playback speed multiplier (0.5 to 2.0)
    #[serde(default = "default_rate")]
    pub rate: f32,

    /// Voice pitch (0.0 to 2.0)
    #[serde(default = "default_pitch")]
    pub pitch: f32,

    /// Playback volume (0.0 to 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            voice_id: None,
            rate: default_rate(),
            pitch: default_pitch(),
            volume: default_volume(),
        }
    }
}

/// Rehearsal settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RehearsalConfig {
    /// Minimum similarity (0.0 to 1.0) for a spoken line to count as delivered
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Recognition language tag (e.g., "en-US")
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for RehearsalConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            language: default_language(),
        }
    }
}

/// Dialogue segmentation settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SegmenterConfig {
    /// Cue lines must be shorter than this many characters
    #[serde(default = "default_max_cue_length")]
    pub max_cue_length: usize,

    /// Lines containing any of these substrings are never cues or dialogue
    #[serde(default = "default_boilerplate_markers")]
    pub boilerplate_markers: Vec<String>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_cue_length: default_max_cue_length(),
            boilerplate_markers: default_boilerplate_markers(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_rate() -> f32 {
    1.0
}

fn default_pitch() -> f32 {
    1.0
}

fn default_volume() -> f32 {
    1.0
}

fn default_similarity_threshold() -> f64 {
    crate::similarity::DEFAULT_THRESHOLD
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_max_cue_length() -> usize {
    50
}

fn default_boilerplate_markers() -> Vec<String> {
    vec!["Sides by Breakdown".to_string()]
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let voice = &self.voice;
        if !(0.5..=2.0).contains(&voice.rate) {
            return Err(anyhow!("Voice rate must be between 0.5 and 2.0, got {}", voice.rate));
        }
        if !(0.0..=2.0).contains(&voice.pitch) {
            return Err(anyhow!("Voice pitch must be between 0.0 and 2.0, got {}", voice.pitch));
        }
        if !(0.0..=1.0).contains(&voice.volume) {
            return Err(anyhow!("Voice volume must be between 0.0 and 1.0, got {}", voice.volume));
        }
        if voice.voice_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            return Err(anyhow!("Voice id must not be blank when set"));
        }

        let threshold = self.rehearsal.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(anyhow!("Similarity threshold must be between 0.0 and 1.0, got {}", threshold));
        }

        if self.segmenter.max_cue_length == 0 {
            return Err(anyhow!("max_cue_length must be greater than zero"));
        }

        Ok(())
    }

    /// Load the configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Load the configuration, creating a default file when none exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }
}
