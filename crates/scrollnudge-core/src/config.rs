//! TOML-based feed configuration.
//!
//! Holds everything `attach()` needs to set up one feed instance:
//! - Feed geometry (item count, segment count)
//! - Nudge timing (randomized delay range, toast display time, breather)
//! - The forced-trigger position
//! - The display style and the message pool
//!
//! Configuration is read-only: it is loaded from a TOML string or file
//! and validated, never written back.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// How the render layer presents a nudge.
///
/// The core only looks at this to decide whether a visible nudge expires
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStyle {
    /// Bottom toast that hides itself after a fixed duration.
    Toast,
    /// Expandable assistant card; stays until the user answers it.
    #[default]
    AssistantCard,
    /// Segmented progress bar. Nudges are not drawn in this mode.
    SegmentedBar,
}

impl DisplayStyle {
    /// Whether a visible nudge in this style hides itself after
    /// `toast_duration_secs`.
    ///
    /// `SegmentedBar` never draws the nudge, so it expires like a toast
    /// rather than holding the scheduler in `Visible` forever.
    pub fn auto_expires(self) -> bool {
        match self {
            DisplayStyle::Toast | DisplayStyle::SegmentedBar => true,
            DisplayStyle::AssistantCard => false,
        }
    }
}

/// Feed configuration passed to `attach()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_item_count")]
    pub item_count: usize,
    #[serde(default = "default_forced_trigger_index")]
    pub forced_trigger_index: usize,
    #[serde(default = "default_segment_count")]
    pub segment_count: usize,
    #[serde(default = "default_min_delay_secs")]
    pub min_delay_secs: f64,
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: f64,
    #[serde(default)]
    pub display_style: DisplayStyle,
    /// Fixed display time for auto-expiring styles.
    #[serde(default = "default_toast_duration_secs")]
    pub toast_duration_secs: f64,
    /// How long the scheduler stays in cooldown after the user accepts a
    /// nudge. Zero makes accepting behave like dismissing.
    #[serde(default = "default_breather_duration_secs")]
    pub breather_duration_secs: f64,
    #[serde(default = "default_messages")]
    pub messages: Vec<String>,
    /// RNG seed for reproducible delays. Entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

// Default functions
fn default_item_count() -> usize {
    13
}
fn default_forced_trigger_index() -> usize {
    4
}
fn default_segment_count() -> usize {
    10
}
fn default_min_delay_secs() -> f64 {
    3.0
}
fn default_max_delay_secs() -> f64 {
    10.0
}
fn default_toast_duration_secs() -> f64 {
    2.0
}
fn default_breather_duration_secs() -> f64 {
    // 5s breathing interlude plus its 1.5s fade-out.
    6.5
}
fn default_messages() -> Vec<String> {
    [
        "How about a quick rest for your eyes?",
        "Based on your interests, try switching to educational content 📚",
        "Your focus seems low - time for some fresh air? 🍃",
        "You've watched 12 videos - maybe try a different category? 🎯",
        "Perhaps some sunlight would be nice? ☀️",
        "Time to water your plants?!🌿",
        "Your eyes might need a rest from the screen 👀",
        "Maybe stretch those fingers and legs? 🤸‍♀️",
        "Any dogs around? Maybe show them some love!",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            item_count: default_item_count(),
            forced_trigger_index: default_forced_trigger_index(),
            segment_count: default_segment_count(),
            min_delay_secs: default_min_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
            display_style: DisplayStyle::default(),
            toast_duration_secs: default_toast_duration_secs(),
            breather_duration_secs: default_breather_duration_secs(),
            messages: default_messages(),
            seed: None,
        }
    }
}

impl FeedConfig {
    /// Parse from TOML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] on malformed TOML, or any
    /// validation error from [`FeedConfig::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: FeedConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LoadFailed`] if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), items = cfg.item_count, "loaded feed config");
        Ok(cfg)
    }

    /// Check every constraint `attach()` relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.item_count == 0 {
            return Err(ConfigError::EmptyItemList);
        }
        if self.forced_trigger_index >= self.item_count {
            return Err(ConfigError::ForcedTriggerOutOfRange {
                index: self.forced_trigger_index,
                item_count: self.item_count,
            });
        }
        if self.segment_count == 0 {
            return Err(ConfigError::InvalidSegmentCount(self.segment_count));
        }
        check_duration("min_delay_secs", self.min_delay_secs)?;
        check_duration("max_delay_secs", self.max_delay_secs)?;
        check_duration("toast_duration_secs", self.toast_duration_secs)?;
        check_duration("breather_duration_secs", self.breather_duration_secs)?;
        if self.min_delay_secs > self.max_delay_secs {
            return Err(ConfigError::DelayRangeInverted {
                min: self.min_delay_secs,
                max: self.max_delay_secs,
            });
        }
        // A zero-length cycle would re-show and expire without time passing.
        check_positive_ms("max_delay_secs", self.max_delay_secs, self.max_delay_ms())?;
        check_positive_ms(
            "toast_duration_secs",
            self.toast_duration_secs,
            self.toast_duration_ms(),
        )?;
        if self.messages.is_empty() {
            return Err(ConfigError::EmptyMessagePool);
        }
        Ok(())
    }

    pub fn min_delay_ms(&self) -> u64 {
        secs_to_ms(self.min_delay_secs)
    }

    pub fn max_delay_ms(&self) -> u64 {
        secs_to_ms(self.max_delay_secs)
    }

    pub fn toast_duration_ms(&self) -> u64 {
        secs_to_ms(self.toast_duration_secs)
    }

    pub fn breather_duration_ms(&self) -> u64 {
        secs_to_ms(self.breather_duration_secs)
    }
}

fn check_duration(key: &str, secs: f64) -> Result<(), ConfigError> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a finite, non-negative number of seconds, got {secs}"),
        });
    }
    Ok(())
}

fn check_positive_ms(key: &str, secs: f64, ms: u64) -> Result<(), ConfigError> {
    if ms == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("must be at least one millisecond, got {secs}"),
        });
    }
    Ok(())
}

fn secs_to_ms(secs: f64) -> u64 {
    (secs * 1000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = FeedConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.item_count, 13);
        assert_eq!(cfg.forced_trigger_index, 4);
        assert_eq!(cfg.segment_count, 10);
        assert_eq!(cfg.min_delay_ms(), 3_000);
        assert_eq!(cfg.max_delay_ms(), 10_000);
        assert_eq!(cfg.toast_duration_ms(), 2_000);
        assert_eq!(cfg.breather_duration_ms(), 6_500);
        assert_eq!(cfg.messages.len(), 9);
        assert_eq!(cfg.display_style, DisplayStyle::AssistantCard);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg = FeedConfig::from_toml_str(
            r#"
            item_count = 12
            display_style = "toast"
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(cfg.item_count, 12);
        assert_eq!(cfg.display_style, DisplayStyle::Toast);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.forced_trigger_index, 4);
        assert_eq!(cfg.messages.len(), 9);
    }

    #[test]
    fn rejects_inverted_delay_range() {
        let cfg = FeedConfig {
            min_delay_secs: 10.0,
            max_delay_secs: 3.0,
            ..FeedConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DelayRangeInverted { min: 10.0, max: 3.0 })
        );
    }

    #[test]
    fn rejects_forced_trigger_outside_feed() {
        let cfg = FeedConfig {
            item_count: 4,
            forced_trigger_index: 4,
            ..FeedConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ForcedTriggerOutOfRange {
                index: 4,
                item_count: 4
            })
        );
    }

    #[test]
    fn rejects_zero_segments_and_empty_feed() {
        let cfg = FeedConfig {
            segment_count: 0,
            ..FeedConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidSegmentCount(0)));

        let cfg = FeedConfig {
            item_count: 0,
            forced_trigger_index: 0,
            ..FeedConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyItemList));
    }

    #[test]
    fn rejects_negative_or_nan_durations() {
        let cfg = FeedConfig {
            toast_duration_secs: -1.0,
            ..FeedConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "toast_duration_secs"
        ));

        let cfg = FeedConfig {
            min_delay_secs: f64::NAN,
            ..FeedConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn rejects_all_zero_timing() {
        let cfg = FeedConfig {
            min_delay_secs: 0.0,
            max_delay_secs: 0.0,
            toast_duration_secs: 0.0,
            ..FeedConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "max_delay_secs"
        ));

        let cfg = FeedConfig {
            toast_duration_secs: 0.0001,
            ..FeedConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "toast_duration_secs"
        ));

        // Zero minimum and zero breather are fine while the cycle still takes time.
        let cfg = FeedConfig {
            min_delay_secs: 0.0,
            breather_duration_secs: 0.0,
            ..FeedConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_empty_message_pool() {
        let cfg = FeedConfig {
            messages: Vec::new(),
            ..FeedConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyMessagePool));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = FeedConfig::from_toml_str("item_count = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
    }

    #[test]
    fn load_reads_file_and_reports_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.toml");
        std::fs::write(&path, "segment_count = 5\nmin_delay_secs = 1.5\n").unwrap();

        let cfg = FeedConfig::load(&path).unwrap();
        assert_eq!(cfg.segment_count, 5);
        assert_eq!(cfg.min_delay_ms(), 1_500);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            FeedConfig::load(&missing),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn only_assistant_card_requires_explicit_dismissal() {
        assert!(DisplayStyle::Toast.auto_expires());
        assert!(DisplayStyle::SegmentedBar.auto_expires());
        assert!(!DisplayStyle::AssistantCard.auto_expires());
    }
}
