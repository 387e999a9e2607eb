//! Shared render target: blend-shape name → weight in `[0, 1]`.
//!
//! The renderer decides which channels exist by registering them; writes to
//! anything else are silently ignored and reads return 0.  Within one tick a
//! channel belongs to the first subsystem that writes it, and later writers
//! are refused.

use std::collections::HashMap;

use tracing::warn;

use crate::viseme::{BlendShape, ChannelWeights};

/// Who is writing to the weight set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    /// Idle motion, blinks, expressions.
    Idle,
    /// Lip sync.
    Speech,
    /// Short user-interaction reactions.
    Reaction,
}

#[derive(Debug, Clone, Default)]
pub struct ViewportWeightSet {
    weights: HashMap<String, f32>,
    owners: HashMap<String, Subsystem>,
}

impl ViewportWeightSet {
    /// A weight set with the given channels registered at 0.
    pub fn with_channels<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for name in names {
            set.register(name);
        }
        set
    }

    /// A weight set exposing every channel the lip-sync engine drives.
    pub fn with_managed_channels() -> Self {
        Self::with_channels(BlendShape::ALL.map(BlendShape::name))
    }

    pub fn register(&mut self, name: impl Into<String>) {
        self.weights.entry(name.into()).or_insert(0.0);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.weights.contains_key(name)
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    /// Current weight, 0 for an unknown channel.
    pub fn get_weight(&self, name: &str) -> f32 {
        self.weights.get(name).copied().unwrap_or(0.0)
    }

    /// Write without ownership bookkeeping (renderer side).
    pub fn set_weight(&mut self, name: &str, value: f32) {
        if let Some(slot) = self.weights.get_mut(name) {
            *slot = sanitize(value);
        }
    }

    /// Forget this tick's channel owners.
    pub fn begin_tick(&mut self) {
        self.owners.clear();
    }

    pub fn owner_of(&self, name: &str) -> Option<Subsystem> {
        self.owners.get(name).copied()
    }

    /// Write on behalf of `owner`.
    ///
    /// Returns `false` when the channel is unknown or was already written by
    /// another subsystem this tick.
    pub fn set_weight_as(&mut self, owner: Subsystem, name: &str, value: f32) -> bool {
        let Some(slot) = self.weights.get_mut(name) else {
            return false;
        };
        match self.owners.get(name) {
            Some(&current) if current != owner => {
                warn!(channel = name, ?owner, ?current, "channel already written this tick");
                false
            }
            Some(_) => {
                *slot = sanitize(value);
                true
            }
            None => {
                *slot = sanitize(value);
                self.owners.insert(name.to_string(), owner);
                true
            }
        }
    }

    /// Write every managed channel from `weights`.  Returns how many landed.
    pub fn write_channels(&mut self, owner: Subsystem, weights: &ChannelWeights) -> usize {
        weights
            .iter()
            .filter(|&(ch, value)| self.set_weight_as(owner, ch.name(), value))
            .count()
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
