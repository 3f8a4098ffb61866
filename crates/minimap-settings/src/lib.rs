//! Minimap configuration store.
//!
//! One [`SettingsStore`] exists per host session and is shared read-only
//! between all open editors through [`SharedSettings`]. Every mutation
//! goes through a typed setter that diffs against the current value and
//! emits exactly one [`ConfigChange`] per changed field; persistence is
//! a flat key/value record stored as TOML.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::RwLock;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SETTINGS_DIR: &str = ".minimap";
const SETTINGS_FILE: &str = "settings.toml";

const ENABLED_KEY: &str = "Enabled";
const WIDTH_KEY: &str = "Width";
const LINE_COUNT_THRESHOLD_KEY: &str = "LineCountThreshold";
const ALPHA_KEY: &str = "Alpha";
const CENTER_ON_CLICK_KEY: &str = "CenterOnClick";
const SHOW_LINE_TOOLTIP_KEY: &str = "ShowLineTooltip";
const PIXELS_PER_LINE_KEY: &str = "PixelsPerLine";
const DISPLAY_STYLE_KEY: &str = "DisplayStyle";

pub const WIDTH_DEFAULT: i32 = 80;
pub const LINE_COUNT_THRESHOLD_DEFAULT: usize = 8000;
pub const ALPHA_DEFAULT: u8 = 32;
pub const PIXELS_PER_LINE_DEFAULT: i32 = 2;

/// How the minimap lays out documents taller than the scrollbar track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayStyle {
    /// Shrink the whole document to fit the track.
    #[default]
    Scaling = 0,
    /// Keep a fixed row height and pan a window over the document.
    Scrolling = 1,
}

impl DisplayStyle {
    fn from_int(value: i64) -> Option<Self> {
        match value {
            0 => Some(DisplayStyle::Scaling),
            1 => Some(DisplayStyle::Scrolling),
            _ => None,
        }
    }
}

impl Serialize for DisplayStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(*self as i64)
    }
}

impl<'de> Deserialize<'de> for DisplayStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        DisplayStyle::from_int(value)
            .ok_or_else(|| de::Error::custom(format!("unknown display style {value}")))
    }
}

/// Validated minimap configuration record.
///
/// Numeric fields are clamped to their documented bounds by
/// [`MinimapConfig::normalize`]; every path that accepts external values
/// (setters, persistence) runs it before the record is observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimapConfig {
    #[serde(rename = "Enabled", default = "default_enabled")]
    pub enabled: bool,
    #[serde(rename = "Width", default = "default_width")]
    pub width: i32,
    #[serde(rename = "LineCountThreshold", default = "default_line_count_threshold")]
    pub line_count_threshold: usize,
    #[serde(rename = "Alpha", default = "default_alpha")]
    pub alpha: u8,
    #[serde(rename = "CenterOnClick", default = "default_center_on_click")]
    pub center_on_click: bool,
    #[serde(rename = "ShowLineTooltip", default = "default_show_line_tooltip")]
    pub show_line_tooltip: bool,
    #[serde(rename = "PixelsPerLine", default = "default_pixels_per_line")]
    pub pixels_per_line: i32,
    #[serde(rename = "DisplayStyle", default)]
    pub style: DisplayStyle,
}

fn default_enabled() -> bool {
    true
}

fn default_width() -> i32 {
    WIDTH_DEFAULT
}

fn default_line_count_threshold() -> usize {
    LINE_COUNT_THRESHOLD_DEFAULT
}

fn default_alpha() -> u8 {
    ALPHA_DEFAULT
}

fn default_center_on_click() -> bool {
    true
}

fn default_show_line_tooltip() -> bool {
    true
}

fn default_pixels_per_line() -> i32 {
    PIXELS_PER_LINE_DEFAULT
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            width: default_width(),
            line_count_threshold: default_line_count_threshold(),
            alpha: default_alpha(),
            center_on_click: default_center_on_click(),
            show_line_tooltip: default_show_line_tooltip(),
            pixels_per_line: default_pixels_per_line(),
            style: DisplayStyle::default(),
        }
    }
}

impl MinimapConfig {
    /// Clamps numeric fields to their documented lower bounds.
    pub fn normalize(&mut self) {
        self.width = self.width.max(1);
        self.line_count_threshold = self.line_count_threshold.max(1);
        self.pixels_per_line = self.pixels_per_line.max(1);
    }
}

/// One change notification per mutated configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    Enabled(bool),
    Width(i32),
    LineCountThreshold(usize),
    Alpha(u8),
    CenterOnClick(bool),
    ShowLineTooltip(bool),
    PixelsPerLine(i32),
    Style(DisplayStyle),
}

/// Flat key/value record used by the host settings framework.
pub type SettingsMap = BTreeMap<String, toml::Value>;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse minimap settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize minimap settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Owner of the live configuration.
///
/// Consumers hold a [`SharedSettings`] and read through it; mutation is
/// only possible through the typed setters here, which keeps the
/// one-event-per-field contract airtight.
#[derive(Debug, Default)]
pub struct SettingsStore {
    config: MinimapConfig,
    subscribers: Vec<Sender<ConfigChange>>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut config: MinimapConfig) -> Self {
        config.normalize();
        Self {
            config,
            subscribers: Vec::new(),
        }
    }

    pub fn into_shared(self) -> SharedSettings {
        Arc::new(RwLock::new(self))
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> MinimapConfig {
        self.config
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn width(&self) -> i32 {
        self.config.width
    }

    pub fn line_count_threshold(&self) -> usize {
        self.config.line_count_threshold
    }

    pub fn alpha(&self) -> u8 {
        self.config.alpha
    }

    pub fn center_on_click(&self) -> bool {
        self.config.center_on_click
    }

    pub fn show_line_tooltip(&self) -> bool {
        self.config.show_line_tooltip
    }

    pub fn pixels_per_line(&self) -> i32 {
        self.config.pixels_per_line
    }

    pub fn style(&self) -> DisplayStyle {
        self.config.style
    }

    /// Registers a change listener. Events are queued per subscriber and
    /// drained on the receiver's own schedule; dropped receivers are
    /// pruned on the next notification.
    pub fn subscribe(&mut self) -> Receiver<ConfigChange> {
        let (sender, receiver) = unbounded();
        self.subscribers.push(sender);
        receiver
    }

    fn notify(&mut self, change: ConfigChange) {
        self.subscribers
            .retain(|subscriber| subscriber.send(change).is_ok());
    }

    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.config.enabled == enabled {
            return false;
        }
        self.config.enabled = enabled;
        self.notify(ConfigChange::Enabled(enabled));
        true
    }

    pub fn set_width(&mut self, width: i32) -> bool {
        let width = width.max(1);
        if self.config.width == width {
            return false;
        }
        self.config.width = width;
        self.notify(ConfigChange::Width(width));
        true
    }

    pub fn set_line_count_threshold(&mut self, threshold: usize) -> bool {
        let threshold = threshold.max(1);
        if self.config.line_count_threshold == threshold {
            return false;
        }
        self.config.line_count_threshold = threshold;
        self.notify(ConfigChange::LineCountThreshold(threshold));
        true
    }

    pub fn set_alpha(&mut self, alpha: u8) -> bool {
        if self.config.alpha == alpha {
            return false;
        }
        self.config.alpha = alpha;
        self.notify(ConfigChange::Alpha(alpha));
        true
    }

    pub fn set_center_on_click(&mut self, center_on_click: bool) -> bool {
        if self.config.center_on_click == center_on_click {
            return false;
        }
        self.config.center_on_click = center_on_click;
        self.notify(ConfigChange::CenterOnClick(center_on_click));
        true
    }

    pub fn set_show_line_tooltip(&mut self, show_line_tooltip: bool) -> bool {
        if self.config.show_line_tooltip == show_line_tooltip {
            return false;
        }
        self.config.show_line_tooltip = show_line_tooltip;
        self.notify(ConfigChange::ShowLineTooltip(show_line_tooltip));
        true
    }

    pub fn set_pixels_per_line(&mut self, pixels_per_line: i32) -> bool {
        let pixels_per_line = pixels_per_line.max(1);
        if self.config.pixels_per_line == pixels_per_line {
            return false;
        }
        self.config.pixels_per_line = pixels_per_line;
        self.notify(ConfigChange::PixelsPerLine(pixels_per_line));
        true
    }

    pub fn set_style(&mut self, style: DisplayStyle) -> bool {
        if self.config.style == style {
            return false;
        }
        self.config.style = style;
        self.notify(ConfigChange::Style(style));
        true
    }

    /// Applies an edited configuration the way an options page does:
    /// field-by-field through the diffing setters. Returns true when at
    /// least one field changed, the caller's cue to persist.
    pub fn apply(&mut self, mut edited: MinimapConfig) -> bool {
        edited.normalize();
        let mut changed = self.set_enabled(edited.enabled);
        changed |= self.set_width(edited.width);
        changed |= self.set_line_count_threshold(edited.line_count_threshold);
        changed |= self.set_alpha(edited.alpha);
        changed |= self.set_center_on_click(edited.center_on_click);
        changed |= self.set_show_line_tooltip(edited.show_line_tooltip);
        changed |= self.set_pixels_per_line(edited.pixels_per_line);
        changed |= self.set_style(edited.style);
        changed
    }

    /// Exports the flat key/value record.
    pub fn to_map(&self) -> SettingsMap {
        let mut map = SettingsMap::new();
        map.insert(ENABLED_KEY.into(), toml::Value::Boolean(self.config.enabled));
        map.insert(WIDTH_KEY.into(), toml::Value::Integer(self.config.width as i64));
        map.insert(
            LINE_COUNT_THRESHOLD_KEY.into(),
            toml::Value::Integer(self.config.line_count_threshold as i64),
        );
        map.insert(ALPHA_KEY.into(), toml::Value::Integer(self.config.alpha as i64));
        map.insert(
            CENTER_ON_CLICK_KEY.into(),
            toml::Value::Boolean(self.config.center_on_click),
        );
        map.insert(
            SHOW_LINE_TOOLTIP_KEY.into(),
            toml::Value::Boolean(self.config.show_line_tooltip),
        );
        map.insert(
            PIXELS_PER_LINE_KEY.into(),
            toml::Value::Integer(self.config.pixels_per_line as i64),
        );
        map.insert(
            DISPLAY_STYLE_KEY.into(),
            toml::Value::Integer(self.config.style as i64),
        );
        map
    }

    /// Imports a flat key/value record. Missing keys keep their current
    /// value, unrecognized keys are ignored, and malformed values fail
    /// soft by keeping the current value. Change events fire for fields
    /// that actually change.
    pub fn apply_map(&mut self, map: &SettingsMap) {
        if let Some(enabled) = map.get(ENABLED_KEY).and_then(toml::Value::as_bool) {
            self.set_enabled(enabled);
        }
        if let Some(width) = map.get(WIDTH_KEY).and_then(as_i32) {
            self.set_width(width);
        }
        if let Some(threshold) = map.get(LINE_COUNT_THRESHOLD_KEY).and_then(as_count) {
            self.set_line_count_threshold(threshold);
        }
        if let Some(alpha) = map.get(ALPHA_KEY).and_then(as_alpha) {
            self.set_alpha(alpha);
        }
        if let Some(center) = map.get(CENTER_ON_CLICK_KEY).and_then(toml::Value::as_bool) {
            self.set_center_on_click(center);
        }
        if let Some(tooltip) = map.get(SHOW_LINE_TOOLTIP_KEY).and_then(toml::Value::as_bool) {
            self.set_show_line_tooltip(tooltip);
        }
        if let Some(pixels) = map.get(PIXELS_PER_LINE_KEY).and_then(as_i32) {
            self.set_pixels_per_line(pixels);
        }
        if let Some(style) = map
            .get(DISPLAY_STYLE_KEY)
            .and_then(toml::Value::as_integer)
            .and_then(DisplayStyle::from_int)
        {
            self.set_style(style);
        }
    }

    pub fn load(root: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = settings_path(root);
        let contents = fs::read_to_string(&path)?;
        let mut config: MinimapConfig = toml::from_str(&contents)?;
        config.normalize();
        Ok(Self::with_config(config))
    }

    /// Loads the persisted record, falling back to defaults when the
    /// file is missing or unreadable as a record.
    pub fn load_or_default(root: impl AsRef<Path>) -> Result<Self, SettingsError> {
        match Self::load(root) {
            Ok(store) => Ok(store),
            Err(SettingsError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Ok(Self::new())
            }
            Err(SettingsError::Parse(_)) => Ok(Self::new()),
            Err(err) => Err(err),
        }
    }

    pub fn save(&self, root: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = settings_path(&root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(&self.config)?;
        fs::write(&path, contents)?;
        Ok(())
    }
}

/// Reference-counted settings handle shared between editors.
pub type SharedSettings = Arc<RwLock<SettingsStore>>;

fn settings_path(root: impl AsRef<Path>) -> PathBuf {
    root.as_ref().join(SETTINGS_DIR).join(SETTINGS_FILE)
}

fn as_i32(value: &toml::Value) -> Option<i32> {
    value.as_integer().and_then(|v| i32::try_from(v).ok())
}

fn as_count(value: &toml::Value) -> Option<usize> {
    value.as_integer().and_then(|v| usize::try_from(v).ok())
}

fn as_alpha(value: &toml::Value) -> Option<u8> {
    value.as_integer().and_then(|v| u8::try_from(v).ok())
}
