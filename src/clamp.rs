//! Safety clamp: no lower-lip raise while the jaw is open.
//!
//! Shapes are authored one at a time, so a blend of a closed-lip shape with
//! an open-jaw shape can push the lower lip through the upper teeth.  The
//! permitted sum of the lip-raising channels falls linearly from 1 at a
//! closed jaw to 0 at `jaw_threshold`; anything above the cap is scaled down
//! proportionally, which keeps the ratio between those channels intact.

use crate::config::ClampConfig;
use crate::viseme::{BlendShape, ChannelWeights};

const EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy)]
pub struct SafetyClamp {
    jaw_threshold: f32,
}

impl Default for SafetyClamp {
    fn default() -> Self {
        Self::new(&ClampConfig::default())
    }
}

impl SafetyClamp {
    pub fn new(config: &ClampConfig) -> Self {
        Self { jaw_threshold: config.jaw_threshold }
    }

    /// Largest permitted lip-raise sum for a given jaw opening.
    pub fn lip_raise_cap(&self, jaw_open: f32) -> f32 {
        (1.0 - jaw_open / self.jaw_threshold).clamp(0.0, 1.0)
    }

    /// Enforce the cap in place.  Compliant weights are left untouched.
    pub fn apply(&self, weights: &mut ChannelWeights) {
        let cap = self.lip_raise_cap(weights.get(BlendShape::JawOpen));
        let sum = weights.lip_raise_sum();
        if cap <= 0.0 {
            // Full suppression is exact, not approximate.
            for ch in BlendShape::LIP_RAISING {
                weights.set(ch, 0.0);
            }
            return;
        }
        if sum <= cap + EPSILON {
            return;
        }
        let ratio = cap / sum;
        for ch in BlendShape::LIP_RAISING {
            weights.set(ch, weights.get(ch) * ratio);
        }
    }

    pub fn is_compliant(&self, weights: &ChannelWeights) -> bool {
        weights.lip_raise_sum() <= self.lip_raise_cap(weights.get(BlendShape::JawOpen)) + EPSILON
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viseme::BlendShape::*;
    use crate::viseme::PhonemeClassKey;

    fn weights(pairs: &[(BlendShape, f32)]) -> ChannelWeights {
        ChannelWeights::from_pairs(pairs)
    }

    #[test]
    fn test_cap_is_linear() {
        let c = SafetyClamp::default();
        assert_eq!(c.lip_raise_cap(0.0), 1.0);
        assert!((c.lip_raise_cap(0.075) - 0.5).abs() < 1e-6, "got: {}", c.lip_raise_cap(0.075));
        assert_eq!(c.lip_raise_cap(0.15), 0.0);
        assert_eq!(c.lip_raise_cap(0.9), 0.0);
    }

    #[test]
    fn test_open_jaw_suppresses_lip_raise() {
        let c = SafetyClamp::default();
        let mut w = weights(&[(JawOpen, 0.4), (MouthClose, 0.3), (MouthPressLeft, 0.2), (MouthRollLower, 0.1)]);
        c.apply(&mut w);
        assert_eq!(w.lip_raise_sum(), 0.0);
        assert_eq!(w[JawOpen], 0.4);
    }

    #[test]
    fn test_proportional_scaling() {
        let c = SafetyClamp::default();
        // cap = 0.5
        let mut w = weights(&[(JawOpen, 0.075), (MouthClose, 0.6), (MouthPressLeft, 0.2), (MouthPressRight, 0.2)]);
        c.apply(&mut w);
        assert!((w.lip_raise_sum() - 0.5).abs() < 1e-5, "got: {}", w.lip_raise_sum());
        assert!((w[MouthClose] / w[MouthPressLeft] - 3.0).abs() < 1e-4, "got: {:?}", w);
        assert!((w[MouthPressLeft] - w[MouthPressRight]).abs() < 1e-7);
    }

    #[test]
    fn test_other_channels_untouched() {
        let c = SafetyClamp::default();
        let mut w = weights(&[(JawOpen, 0.5), (MouthClose, 0.5), (MouthFunnel, 0.7), (MouthShrugUpper, 0.3)]);
        c.apply(&mut w);
        assert_eq!(w[MouthFunnel], 0.7);
        assert_eq!(w[MouthShrugUpper], 0.3);
    }

    #[test]
    fn test_idempotent() {
        let c = SafetyClamp::default();
        for jaw in [0.0_f32, 0.03, 0.07, 0.1, 0.14, 0.15, 0.5] {
            let mut once = weights(&[
                (JawOpen, jaw),
                (MouthClose, 0.4),
                (MouthPressLeft, 0.3),
                (MouthPressRight, 0.3),
                (MouthShrugLower, 0.2),
            ]);
            c.apply(&mut once);
            assert!(c.is_compliant(&once), "jaw {} got: {:?}", jaw, once);
            let mut twice = once;
            c.apply(&mut twice);
            assert_eq!(once, twice, "jaw {}", jaw);
        }
    }

    #[test]
    fn test_closed_lip_shape_compliant() {
        let c = SafetyClamp::default();
        let mut pp = PhonemeClassKey::PP.weights();
        let before = pp;
        c.apply(&mut pp);
        assert_eq!(pp, before);
    }
}
