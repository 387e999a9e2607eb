//! Engine tuning: every timing and shaping constant in one place.
//!
//! All structs deserialise with `#[serde(default)]`, so a config file only has
//! to mention the values it changes:
//!
//! ```json
//! { "playback": { "attack_rate": 32.0 }, "scheduler": { "segment_pause_ms": 180 } }
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{LipSyncError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// Timeline construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Floor applied to every phoneme slice, in milliseconds.
    pub min_phoneme_ms: f64,
    /// Nominal phoneme durations are divided by this (2.0 = twice as fast).
    pub speech_rate: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { min_phoneme_ms: 30.0, speech_rate: 1.0 }
    }
}

/// Per-tick shaping of the active keyframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Fraction of a keyframe, at its end, spent blending into the next shape.
    pub coarticulation_window: f32,
    /// Fraction of a keyframe used for the attack ramp (and again for release).
    pub envelope_ramp: f32,
    /// Envelope value at the very start and end of a keyframe.
    pub envelope_floor: f32,
    /// Global multiplier on every target weight.
    pub amplitude: f32,
    /// Smoothing rate (1/s) when a channel is opening.
    pub attack_rate: f32,
    /// Smoothing rate (1/s) when a channel is relaxing.
    pub release_rate: f32,
    /// Peak jaw opening of the filler used while no keyframe is due yet.
    pub filler_amplitude: f32,
    /// Filler oscillation frequency in Hz.
    pub filler_hz: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            coarticulation_window: 0.35,
            envelope_ramp: 0.12,
            envelope_floor: 0.2,
            amplitude: 1.0,
            attack_rate: 28.0,
            release_rate: 12.0,
            filler_amplitude: 0.12,
            filler_hz: 3.5,
        }
    }
}

/// Anatomical constraint on the lower lip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClampConfig {
    /// Jaw opening at which lip-raising channels are fully suppressed.
    pub jaw_threshold: f32,
}

impl Default for ClampConfig {
    fn default() -> Self {
        Self { jaw_threshold: 0.15 }
    }
}

/// Utterance scheduling: pauses, grace periods, watchdogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Silence inserted between punctuation-delimited segments.
    pub segment_pause_ms: f64,
    /// Time the last phoneme keeps playing after the engine reports the end.
    pub end_grace_ms: f64,
    /// Largest channel value still considered "neutral".
    pub neutral_threshold: f32,
    /// Upper bound on the returning phase before speech starts anyway.
    pub max_return_ms: f64,
    /// Upper bound on the final decay before the controller goes idle anyway.
    pub max_decay_ms: f64,
    /// A segment with no end callback this long past its timeline is ended.
    pub segment_timeout_ms: f64,
    /// Capacity of the speech-event queue between callbacks and ticks.
    pub event_queue_capacity: usize,
    /// Longest tick delta fed to smoothing (host stalls are not replayed).
    pub max_tick_ms: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            segment_pause_ms: 250.0,
            end_grace_ms: 120.0,
            neutral_threshold: 0.02,
            max_return_ms: 600.0,
            max_decay_ms: 800.0,
            segment_timeout_ms: 3_000.0,
            event_queue_capacity: 256,
            max_tick_ms: 100.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EngineConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Spell out numbers, currency and percentages before segmentation.
    pub expand_numbers: bool,
    pub timing: TimingConfig,
    pub playback: PlaybackConfig,
    pub clamp: ClampConfig,
    pub scheduler: SchedulerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expand_numbers: true,
            timing: TimingConfig::default(),
            playback: PlaybackConfig::default(),
            clamp: ClampConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(LipSyncError::from)
            .with_context(|| format!("Cannot read config: {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Reject values that would make the engine misbehave.
    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, msg: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(LipSyncError::Config(msg.to_string()))
            }
        }

        let t = &self.timing;
        check(t.min_phoneme_ms > 0.0, "timing.min_phoneme_ms must be > 0")?;
        check(t.speech_rate > 0.0, "timing.speech_rate must be > 0")?;

        let p = &self.playback;
        check(
            (0.0..=1.0).contains(&p.coarticulation_window),
            "playback.coarticulation_window must be within [0, 1]",
        )?;
        check(
            p.envelope_ramp > 0.0 && p.envelope_ramp <= 0.5,
            "playback.envelope_ramp must be within (0, 0.5]",
        )?;
        check(
            (0.0..=1.0).contains(&p.envelope_floor),
            "playback.envelope_floor must be within [0, 1]",
        )?;
        check(p.amplitude >= 0.0, "playback.amplitude must be >= 0")?;
        check(
            p.attack_rate > 0.0 && p.release_rate > 0.0,
            "playback smoothing rates must be > 0",
        )?;
        check(p.filler_hz >= 0.0, "playback.filler_hz must be >= 0")?;

        check(self.clamp.jaw_threshold > 0.0, "clamp.jaw_threshold must be > 0")?;

        let s = &self.scheduler;
        check(s.segment_pause_ms >= 0.0, "scheduler.segment_pause_ms must be >= 0")?;
        check(s.end_grace_ms >= 0.0, "scheduler.end_grace_ms must be >= 0")?;
        check(s.event_queue_capacity > 0, "scheduler.event_queue_capacity must be > 0")?;
        check(s.max_tick_ms > 0.0, "scheduler.max_tick_ms must be > 0")?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.timing.min_phoneme_ms, 30.0);
        assert_eq!(cfg.clamp.jaw_threshold, 0.15);
        assert_eq!(cfg.playback.coarticulation_window, 0.35);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{ "playback": { "attack_rate": 40.0 } }"#)
            .expect("valid partial config");
        assert_eq!(cfg.playback.attack_rate, 40.0);
        assert_eq!(cfg.playback.release_rate, PlaybackConfig::default().release_rate);
        assert_eq!(cfg.scheduler, SchedulerConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "timing": { "speech_rate": 0.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, LipSyncError::Config(_)), "got: {}", err);

        let err = EngineConfig::from_json_str(r#"{ "playback": { "coarticulation_window": 1.5 } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("coarticulation_window"), "got: {}", err);
    }

    #[test]
    fn test_malformed_json() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, LipSyncError::Json(_)), "got: {}", err);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("visemer.json");
        let mut f = std::fs::File::create(&path).expect("create");
        writeln!(f, r#"{{ "expand_numbers": false, "clamp": {{ "jaw_threshold": 0.2 }} }}"#)
            .expect("write");

        let cfg = EngineConfig::from_json_file(&path).expect("load");
        assert!(!cfg.expand_numbers);
        assert_eq!(cfg.clamp.jaw_threshold, 0.2);

    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = EngineConfig::from_json_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Cannot read config"), "got: {}", err);
        assert!(
            matches!(err.downcast_ref::<LipSyncError>(), Some(LipSyncError::Io(_))),
            "got: {:?}",
            err
        );
    }
}
