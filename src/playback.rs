//! Playback engine: one timeline sample per render tick.
//!
//! Per tick:
//!
//! 1. advance the keyframe cursor (an index; it never moves backwards, and it
//!    survives timeline rebuilds);
//! 2. before the first keyframe, play a small jaw oscillation instead of
//!    freezing the mouth;
//! 3. otherwise blend the active shape into the next one over the last part
//!    of the active keyframe (coarticulation);
//! 4. shape the result with an attack/hold/release envelope and the global
//!    amplitude;
//! 5. run the safety clamp on the target;
//! 6. move the persistent weights toward the target with asymmetric
//!    exponential smoothing (fast attack, soft release), then clamp again so
//!    the smoothed output honours the same invariant.

use std::f64::consts::TAU;

use crate::clamp::SafetyClamp;
use crate::config::{ClampConfig, PlaybackConfig};
use crate::timeline::Timeline;
use crate::viseme::{BlendShape, ChannelWeights};

#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    config: PlaybackConfig,
    clamp: SafetyClamp,
    /// Number of keyframes whose start time has been reached.
    cursor: usize,
    smoothed: ChannelWeights,
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default(), &ClampConfig::default())
    }
}

impl PlaybackEngine {
    pub fn new(playback: &PlaybackConfig, clamp: &ClampConfig) -> Self {
        Self {
            config: playback.clone(),
            clamp: SafetyClamp::new(clamp),
            cursor: 0,
            smoothed: ChannelWeights::zero(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Start over at the first keyframe (new segment, or re-anchored clock).
    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    /// The current smoothed output.
    pub fn weights(&self) -> &ChannelWeights {
        &self.smoothed
    }

    /// Attack/hold/release amplitude at `progress` through a keyframe.
    ///
    /// Without `release` the envelope stays at full amplitude to the end,
    /// which is what the final keyframe of a timeline uses.
    pub fn envelope(&self, progress: f32, release: bool) -> f32 {
        let ramp = self.config.envelope_ramp;
        let floor = self.config.envelope_floor;
        let p = progress.clamp(0.0, 1.0);
        if p < ramp {
            floor + (1.0 - floor) * (p / ramp)
        } else if release && p > 1.0 - ramp {
            floor + (1.0 - floor) * ((1.0 - p) / ramp)
        } else {
            1.0
        }
    }

    fn filler(&self, elapsed_ms: f64) -> ChannelWeights {
        let phase = TAU * f64::from(self.config.filler_hz) * elapsed_ms / 1000.0;
        let jaw = self.config.filler_amplitude * (0.5 - 0.5 * phase.cos() as f32);
        let mut w = ChannelWeights::zero();
        w.set(BlendShape::JawOpen, (jaw * self.config.amplitude).clamp(0.0, 1.0));
        w
    }

    /// Clamped target weights for `elapsed_ms`, advancing the cursor.
    pub fn target(&mut self, elapsed_ms: f64, timeline: &Timeline) -> ChannelWeights {
        let frames = timeline.keyframes();
        self.cursor = self.cursor.min(frames.len());
        while self.cursor < frames.len() && frames[self.cursor].time_ms <= elapsed_ms {
            self.cursor += 1;
        }

        let Some(active) = self.cursor.checked_sub(1).and_then(|i| frames.get(i)) else {
            return self.filler(elapsed_ms);
        };
        let next = frames.get(self.cursor);

        let progress = if active.duration_ms > 0.0 {
            ((elapsed_ms - active.time_ms) / active.duration_ms).clamp(0.0, 1.0) as f32
        } else {
            1.0
        };

        let window = self.config.coarticulation_window;
        let blend = match next {
            Some(_) if window > 0.0 && progress > 1.0 - window => (progress - (1.0 - window)) / window,
            _ => 0.0,
        };

        let shape_a = active.shape.weights();
        let mixed = match next {
            Some(next) if blend > 0.0 => shape_a.lerp(&next.shape.weights(), blend),
            _ => shape_a,
        };

        let gain = self.envelope(progress, next.is_some()) * self.config.amplitude;
        let mut target = mixed.scaled(gain);
        for ch in BlendShape::ALL {
            target.set(ch, target.get(ch).clamp(0.0, 1.0));
        }
        self.clamp.apply(&mut target);
        target
    }

    fn smooth_toward(&mut self, target: &ChannelWeights, dt_ms: f64) {
        let dt = (dt_ms.max(0.0) / 1000.0) as f32;
        let attack = 1.0 - (-self.config.attack_rate * dt).exp();
        let release = 1.0 - (-self.config.release_rate * dt).exp();
        for ch in BlendShape::ALL {
            let current = self.smoothed.get(ch);
            let goal = target.get(ch);
            let alpha = if goal > current { attack } else { release };
            self.smoothed.set(ch, current + (goal - current) * alpha);
        }
        // Channels move at different rates, so the blend can drift out of
        // compliance even when both endpoints are compliant.
        self.clamp.apply(&mut self.smoothed);
    }

    /// Full playback step for one tick.
    pub fn step(&mut self, elapsed_ms: f64, dt_ms: f64, timeline: &Timeline) -> ChannelWeights {
        let target = self.target(elapsed_ms, timeline);
        self.smooth_toward(&target, dt_ms);
        self.smoothed
    }

    /// Decay every channel toward zero at the release rate.
    pub fn relax(&mut self, dt_ms: f64) -> ChannelWeights {
        self.smooth_toward(&ChannelWeights::zero(), dt_ms);
        self.smoothed
    }

    /// Instant reset, no smoothing.
    pub fn snap_to_neutral(&mut self) {
        self.smoothed = ChannelWeights::zero();
        self.cursor = 0;
    }

    pub fn is_neutral(&self, threshold: f32) -> bool {
        self.smoothed.peak() <= threshold
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
