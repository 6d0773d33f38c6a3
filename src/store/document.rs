//! The configuration document: voice profiles, output aliases, history and
//! last-used pointers, plus the schema completion applied on every load.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the protected profile and output alias.
pub const DEFAULT_NAME: &str = "default";

/// Maximum number of history records kept in the document.
pub const HISTORY_LIMIT: usize = 20;

pub const FORMAT_OPTIONS: [&str; 5] = ["mp3", "wav", "ogg", "flac", "pcm"];
pub const BACKEND_OPTIONS: [&str; 3] = ["speech-1.6", "speech-1.5", "s1"];

// ---------------------------------------------------------------------------
// VoiceProfile
// ---------------------------------------------------------------------------

/// A named bundle of synthesis parameters.
///
/// Every field carries a serde default so profiles written by older versions
/// (or edited by hand) are backfilled on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceProfile {
    /// Server-side reference model id, sent as `reference_id`.
    pub voice_id: String,
    pub backend: String,
    /// Audio format requested from the server; also the file extension.
    pub format: String,
    /// Sampling temperature, nominally 0.0 – 1.0.
    pub temperature: f64,
    /// Nucleus sampling, nominally 0.0 – 1.0.
    pub top_p: f64,
    pub chunk_length: u32,
    pub normalize: bool,
    /// Volume adjustment, nominally -1.0 – 1.0. Sent as `volume`.
    pub prosody_volume: f64,
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self {
            voice_id: DEFAULT_NAME.into(),
            backend: "speech-1.6".into(),
            format: "mp3".into(),
            temperature: 0.7,
            top_p: 0.7,
            chunk_length: 200,
            normalize: true,
            prosody_volume: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// HistoryRecord
// ---------------------------------------------------------------------------

/// One past synthesis. Never modified after it is recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryRecord {
    pub text: String,
    /// Profile *name* used, not its `voice_id`.
    pub voice_profile: String,
    pub backend: String,
    /// ISO-8601 time the record was created.
    pub timestamp: String,
    /// Full path of the audio file written.
    pub filename: String,
    pub speed: f64,
}

// ---------------------------------------------------------------------------
// LastUsed
// ---------------------------------------------------------------------------

/// Active profile and output alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastUsed {
    pub voice: String,
    pub output: String,
}

impl Default for LastUsed {
    fn default() -> Self {
        Self {
            voice: DEFAULT_NAME.into(),
            output: DEFAULT_NAME.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigDocument
// ---------------------------------------------------------------------------

/// The single persisted configuration document.
///
/// At rest the document always satisfies:
/// - `voices["default"]` and `output_paths["default"]` exist;
/// - `last_used` points at existing keys;
/// - `history.len() <= HISTORY_LIMIT`, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub api_key: String,
    pub voices: BTreeMap<String, VoiceProfile>,
    pub output_paths: BTreeMap<String, PathBuf>,
    pub format_options: Vec<String>,
    pub backend_options: Vec<String>,
    pub history: Vec<HistoryRecord>,
    pub last_used: LastUsed,
}

impl ConfigDocument {
    /// A fresh first-run document whose `"default"` alias points at
    /// `default_output_dir`.
    pub fn new(default_output_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_key: String::new(),
            voices: BTreeMap::from([(DEFAULT_NAME.to_string(), VoiceProfile::default())]),
            output_paths: BTreeMap::from([(DEFAULT_NAME.to_string(), default_output_dir.into())]),
            format_options: FORMAT_OPTIONS.iter().map(|s| s.to_string()).collect(),
            backend_options: BACKEND_OPTIONS.iter().map(|s| s.to_string()).collect(),
            history: Vec::new(),
            last_used: LastUsed::default(),
        }
    }

    /// Parse a persisted document and complete any missing sections.
    ///
    /// Only a file that is not a JSON object is an error. A section of the
    /// wrong shape falls back to its default, and a mistyped field inside a
    /// profile, history record or `last_used` falls back to the field's
    /// default without discarding its siblings.
    pub fn from_json(json: &str, default_output_dir: &Path) -> Result<Self, serde_json::Error> {
        let mut root: Map<String, Value> = serde_json::from_str(json)?;
        let defaults = Self::new(default_output_dir);

        let api_key = match root.remove("api_key") {
            Some(Value::String(key)) => key,
            None | Some(Value::Null) => String::new(),
            Some(other) => {
                log::warn!("ignoring non-string api_key ({other})");
                String::new()
            }
        };

        let voices = match root.remove("voices") {
            Some(Value::Object(entries)) => entries
                .into_iter()
                .map(|(name, value)| {
                    let profile = lenient(&format!("voice profile '{name}'"), value);
                    (name, profile)
                })
                .collect(),
            None => defaults.voices,
            Some(other) => {
                log::warn!("ignoring malformed voices section ({other})");
                defaults.voices
            }
        };

        let output_paths = match root.remove("output_paths") {
            Some(Value::Object(entries)) => entries
                .into_iter()
                .filter_map(|(name, value)| match value {
                    Value::String(path) => Some((name, PathBuf::from(path))),
                    other => {
                        log::warn!("ignoring output path '{name}' ({other})");
                        None
                    }
                })
                .collect(),
            None => defaults.output_paths,
            Some(other) => {
                log::warn!("ignoring malformed output_paths section ({other})");
                defaults.output_paths
            }
        };

        let history = match root.remove("history") {
            Some(Value::Array(records)) => records
                .into_iter()
                .enumerate()
                .filter_map(|(i, value)| match value {
                    Value::Object(_) => Some(lenient(&format!("history record {i}"), value)),
                    other => {
                        log::warn!("ignoring history record {i} ({other})");
                        None
                    }
                })
                .collect(),
            None => Vec::new(),
            Some(other) => {
                log::warn!("ignoring malformed history section ({other})");
                Vec::new()
            }
        };

        let mut doc = Self {
            api_key,
            voices,
            output_paths,
            format_options: string_list(root.remove("format_options"), defaults.format_options),
            backend_options: string_list(root.remove("backend_options"), defaults.backend_options),
            history,
            last_used: root
                .remove("last_used")
                .map(|value| lenient("last_used", value))
                .unwrap_or_default(),
        };
        doc.repair(default_output_dir);
        Ok(doc)
    }

    /// Restore the at-rest invariants after a load.
    pub fn repair(&mut self, default_output_dir: &Path) {
        self.voices
            .entry(DEFAULT_NAME.to_string())
            .or_default();
        self.output_paths
            .entry(DEFAULT_NAME.to_string())
            .or_insert_with(|| default_output_dir.to_path_buf());

        if !self.voices.contains_key(&self.last_used.voice) {
            log::debug!(
                "active profile '{}' missing; resetting to default",
                self.last_used.voice
            );
            self.last_used.voice = DEFAULT_NAME.into();
        }
        if !self.output_paths.contains_key(&self.last_used.output) {
            log::debug!(
                "active output '{}' missing; resetting to default",
                self.last_used.output
            );
            self.last_used.output = DEFAULT_NAME.into();
        }

        self.history.truncate(HISTORY_LIMIT);
    }

    /// Profile currently selected for synthesis.
    pub fn active_profile(&self) -> &str {
        &self.last_used.voice
    }

    /// Output alias currently selected for synthesis.
    pub fn active_output(&self) -> &str {
        &self.last_used.output
    }
}

// ---------------------------------------------------------------------------
// Lenient decoding
// ---------------------------------------------------------------------------

/// Decode `value` as `T`, keeping every field that parses and using
/// `T::default()` for the rest.
fn lenient<T>(what: &str, value: Value) -> T
where
    T: Default + Serialize + DeserializeOwned,
{
    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            log::warn!("{what}: expected an object, found {other}; using defaults");
            return T::default();
        }
    };
    if let Ok(parsed) = serde_json::from_value(Value::Object(fields.clone())) {
        return parsed;
    }

    let mut merged = match serde_json::to_value(T::default()) {
        Ok(Value::Object(defaults)) => defaults,
        _ => return T::default(),
    };
    for (key, field) in fields {
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), field);
        if serde_json::from_value::<T>(Value::Object(candidate.clone())).is_ok() {
            merged = candidate;
        } else {
            log::warn!("{what}: ignoring invalid field '{key}'");
        }
    }
    serde_json::from_value(Value::Object(merged)).unwrap_or_default()
}

fn string_list(value: Option<Value>, default: Vec<String>) -> Vec<String> {
    match value.map(serde_json::from_value::<Vec<String>>) {
        Some(Ok(list)) => list,
        Some(Err(e)) => {
            log::warn!("ignoring malformed option list ({e})");
            default
        }
        None => default,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
