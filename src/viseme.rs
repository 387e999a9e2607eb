//! Phoneme → viseme tables for blend-shape avatars.
//!
//! Every phoneme collapses to a [`PhonemeClassKey`]; voiced/voiceless pairs
//! with the same mouth shape share a key (F and V are both `FF`).  Each key
//! has a partial channel weight set and a nominal articulation length.
//! Channels missing from a shape are target zero.
//!
//! Channel names follow the ARKit face-tracking blend shapes, which is what
//! most VRM/glTF avatars expose.

use std::fmt;
use std::ops::Index;

use serde::Serialize;

use crate::phonemize::PhonemeSymbol;

// ─────────────────────────────────────────────────────────────────────────────
// Channels
// ─────────────────────────────────────────────────────────────────────────────

/// The blend-shape channels this engine writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlendShape {
    JawOpen,
    MouthClose,
    MouthFunnel,
    MouthPucker,
    MouthSmileLeft,
    MouthSmileRight,
    MouthStretchLeft,
    MouthStretchRight,
    MouthPressLeft,
    MouthPressRight,
    MouthRollLower,
    MouthRollUpper,
    MouthShrugLower,
    MouthShrugUpper,
    MouthLowerDownLeft,
    MouthLowerDownRight,
    MouthUpperUpLeft,
    MouthUpperUpRight,
    TongueOut,
}

impl BlendShape {
    pub const COUNT: usize = 19;

    pub const ALL: [BlendShape; Self::COUNT] = [
        BlendShape::JawOpen,
        BlendShape::MouthClose,
        BlendShape::MouthFunnel,
        BlendShape::MouthPucker,
        BlendShape::MouthSmileLeft,
        BlendShape::MouthSmileRight,
        BlendShape::MouthStretchLeft,
        BlendShape::MouthStretchRight,
        BlendShape::MouthPressLeft,
        BlendShape::MouthPressRight,
        BlendShape::MouthRollLower,
        BlendShape::MouthRollUpper,
        BlendShape::MouthShrugLower,
        BlendShape::MouthShrugUpper,
        BlendShape::MouthLowerDownLeft,
        BlendShape::MouthLowerDownRight,
        BlendShape::MouthUpperUpLeft,
        BlendShape::MouthUpperUpRight,
        BlendShape::TongueOut,
    ];

    /// Channels whose positive weight lifts the lower lip.
    pub const LIP_RAISING: [BlendShape; 5] = [
        BlendShape::MouthPressLeft,
        BlendShape::MouthPressRight,
        BlendShape::MouthClose,
        BlendShape::MouthRollLower,
        BlendShape::MouthShrugLower,
    ];

    /// The renderer-facing channel name.
    pub fn name(self) -> &'static str {
        match self {
            BlendShape::JawOpen => "jawOpen",
            BlendShape::MouthClose => "mouthClose",
            BlendShape::MouthFunnel => "mouthFunnel",
            BlendShape::MouthPucker => "mouthPucker",
            BlendShape::MouthSmileLeft => "mouthSmileLeft",
            BlendShape::MouthSmileRight => "mouthSmileRight",
            BlendShape::MouthStretchLeft => "mouthStretchLeft",
            BlendShape::MouthStretchRight => "mouthStretchRight",
            BlendShape::MouthPressLeft => "mouthPressLeft",
            BlendShape::MouthPressRight => "mouthPressRight",
            BlendShape::MouthRollLower => "mouthRollLower",
            BlendShape::MouthRollUpper => "mouthRollUpper",
            BlendShape::MouthShrugLower => "mouthShrugLower",
            BlendShape::MouthShrugUpper => "mouthShrugUpper",
            BlendShape::MouthLowerDownLeft => "mouthLowerDownLeft",
            BlendShape::MouthLowerDownRight => "mouthLowerDownRight",
            BlendShape::MouthUpperUpLeft => "mouthUpperUpLeft",
            BlendShape::MouthUpperUpRight => "mouthUpperUpRight",
            BlendShape::TongueOut => "tongueOut",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ch| ch.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BlendShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dense weight per managed channel.  Absent means zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelWeights([f32; BlendShape::COUNT]);

impl ChannelWeights {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(BlendShape, f32)]) -> Self {
        let mut w = Self::zero();
        for &(ch, v) in pairs {
            w.set(ch, v);
        }
        w
    }

    pub fn get(&self, ch: BlendShape) -> f32 {
        self.0[ch.index()]
    }

    pub fn set(&mut self, ch: BlendShape, value: f32) {
        self.0[ch.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlendShape, f32)> + '_ {
        BlendShape::ALL.into_iter().map(move |ch| (ch, self.get(ch)))
    }

    /// `self·(1−t) + other·t`, channel by channel.
    pub fn lerp(&self, other: &ChannelWeights, t: f32) -> ChannelWeights {
        let mut out = Self::zero();
        for ch in BlendShape::ALL {
            out.set(ch, self.get(ch) * (1.0 - t) + other.get(ch) * t);
        }
        out
    }

    pub fn scaled(&self, factor: f32) -> ChannelWeights {
        let mut out = *self;
        out.0.iter_mut().for_each(|v| *v *= factor);
        out
    }

    /// Largest absolute channel value.
    pub fn peak(&self) -> f32 {
        self.0.iter().fold(0.0_f32, |acc, v| acc.max(v.abs()))
    }

    /// Sum of the lip-raising channels.
    pub fn lip_raise_sum(&self) -> f32 {
        BlendShape::LIP_RAISING.iter().map(|&ch| self.get(ch)).sum()
    }
}

impl Index<BlendShape> for ChannelWeights {
    type Output = f32;

    fn index(&self, ch: BlendShape) -> &f32 {
        &self.0[ch.index()]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Phoneme classes
// ─────────────────────────────────────────────────────────────────────────────

/// Mouth-shape class of a phoneme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PhonemeClassKey {
    // Vowels and diphthongs keep their own shape.
    AA,
    AE,
    AH,
    AO,
    AW,
    AY,
    EH,
    ER,
    EY,
    IH,
    IY,
    OW,
    OY,
    UH,
    UW,
    /// P B M
    PP,
    /// F V
    FF,
    /// TH DH
    TH,
    /// T D
    DD,
    /// K G NG
    KK,
    /// CH JH SH ZH
    CH,
    /// S Z
    SS,
    NN,
    LL,
    RR,
    WW,
    YY,
    HH,
    Sil,
}

use BlendShape::*;

impl PhonemeClassKey {
    /// Target weights for this class.
    pub fn shape(self) -> &'static [(BlendShape, f32)] {
        match self {
            PhonemeClassKey::AA => &[(JawOpen, 0.70), (MouthLowerDownLeft, 0.30), (MouthLowerDownRight, 0.30)],
            PhonemeClassKey::AE => &[
                (JawOpen, 0.55),
                (MouthStretchLeft, 0.30),
                (MouthStretchRight, 0.30),
                (MouthLowerDownLeft, 0.25),
                (MouthLowerDownRight, 0.25),
            ],
            PhonemeClassKey::AH => &[(JawOpen, 0.45), (MouthLowerDownLeft, 0.20), (MouthLowerDownRight, 0.20)],
            PhonemeClassKey::AO => &[(JawOpen, 0.55), (MouthFunnel, 0.35), (MouthPucker, 0.10)],
            PhonemeClassKey::AW => &[(JawOpen, 0.55), (MouthFunnel, 0.30), (MouthPucker, 0.20)],
            PhonemeClassKey::AY => &[
                (JawOpen, 0.55),
                (MouthStretchLeft, 0.25),
                (MouthStretchRight, 0.25),
                (MouthSmileLeft, 0.15),
                (MouthSmileRight, 0.15),
            ],
            PhonemeClassKey::EH => &[(JawOpen, 0.40), (MouthStretchLeft, 0.30), (MouthStretchRight, 0.30)],
            PhonemeClassKey::ER => &[(JawOpen, 0.25), (MouthFunnel, 0.30), (MouthPucker, 0.20)],
            PhonemeClassKey::EY => &[
                (JawOpen, 0.35),
                (MouthStretchLeft, 0.35),
                (MouthStretchRight, 0.35),
                (MouthSmileLeft, 0.20),
                (MouthSmileRight, 0.20),
            ],
            PhonemeClassKey::IH => &[
                (JawOpen, 0.30),
                (MouthStretchLeft, 0.35),
                (MouthStretchRight, 0.35),
                (MouthSmileLeft, 0.15),
                (MouthSmileRight, 0.15),
            ],
            PhonemeClassKey::IY => &[
                (JawOpen, 0.20),
                (MouthStretchLeft, 0.45),
                (MouthStretchRight, 0.45),
                (MouthSmileLeft, 0.30),
                (MouthSmileRight, 0.30),
            ],
            PhonemeClassKey::OW => &[(JawOpen, 0.40), (MouthFunnel, 0.55), (MouthPucker, 0.30)],
            PhonemeClassKey::OY => &[
                (JawOpen, 0.40),
                (MouthFunnel, 0.40),
                (MouthPucker, 0.25),
                (MouthStretchLeft, 0.10),
                (MouthStretchRight, 0.10),
            ],
            PhonemeClassKey::UH => &[(JawOpen, 0.25), (MouthFunnel, 0.35), (MouthPucker, 0.35)],
            PhonemeClassKey::UW => &[(JawOpen, 0.15), (MouthPucker, 0.70), (MouthFunnel, 0.30)],
            PhonemeClassKey::PP => &[(MouthClose, 0.30), (MouthPressLeft, 0.35), (MouthPressRight, 0.35)],
            PhonemeClassKey::FF => &[
                (JawOpen, 0.05),
                (MouthRollLower, 0.50),
                (MouthUpperUpLeft, 0.25),
                (MouthUpperUpRight, 0.25),
            ],
            PhonemeClassKey::TH => &[(JawOpen, 0.20), (TongueOut, 0.40)],
            PhonemeClassKey::DD => &[(JawOpen, 0.20), (MouthStretchLeft, 0.10), (MouthStretchRight, 0.10)],
            PhonemeClassKey::KK => &[(JawOpen, 0.30), (MouthStretchLeft, 0.10), (MouthStretchRight, 0.10)],
            PhonemeClassKey::CH => &[
                (JawOpen, 0.15),
                (MouthFunnel, 0.45),
                (MouthPucker, 0.25),
                (MouthShrugUpper, 0.20),
            ],
            PhonemeClassKey::SS => &[
                (JawOpen, 0.08),
                (MouthStretchLeft, 0.40),
                (MouthStretchRight, 0.40),
                (MouthSmileLeft, 0.10),
                (MouthSmileRight, 0.10),
            ],
            PhonemeClassKey::NN => &[(JawOpen, 0.15)],
            PhonemeClassKey::LL => &[(JawOpen, 0.25), (TongueOut, 0.10)],
            PhonemeClassKey::RR => &[(JawOpen, 0.20), (MouthFunnel, 0.30), (MouthPucker, 0.30)],
            PhonemeClassKey::WW => &[(JawOpen, 0.10), (MouthPucker, 0.65), (MouthFunnel, 0.30)],
            PhonemeClassKey::YY => &[
                (JawOpen, 0.15),
                (MouthStretchLeft, 0.30),
                (MouthStretchRight, 0.30),
                (MouthSmileLeft, 0.15),
                (MouthSmileRight, 0.15),
            ],
            PhonemeClassKey::HH => &[(JawOpen, 0.30)],
            PhonemeClassKey::Sil => &[],
        }
    }

    /// Typical articulation length in milliseconds at speech rate 1.0.
    pub fn nominal_ms(self) -> f64 {
        match self {
            PhonemeClassKey::AA => 120.0,
            PhonemeClassKey::AE => 120.0,
            PhonemeClassKey::AH => 90.0,
            PhonemeClassKey::AO => 120.0,
            PhonemeClassKey::AW => 160.0,
            PhonemeClassKey::AY => 160.0,
            PhonemeClassKey::EH => 100.0,
            PhonemeClassKey::ER => 120.0,
            PhonemeClassKey::EY => 150.0,
            PhonemeClassKey::IH => 90.0,
            PhonemeClassKey::IY => 110.0,
            PhonemeClassKey::OW => 150.0,
            PhonemeClassKey::OY => 170.0,
            PhonemeClassKey::UH => 95.0,
            PhonemeClassKey::UW => 120.0,
            PhonemeClassKey::PP => 65.0,
            PhonemeClassKey::FF => 80.0,
            PhonemeClassKey::TH => 80.0,
            PhonemeClassKey::DD => 55.0,
            PhonemeClassKey::KK => 60.0,
            PhonemeClassKey::CH => 90.0,
            PhonemeClassKey::SS => 85.0,
            PhonemeClassKey::NN => 65.0,
            PhonemeClassKey::LL => 70.0,
            PhonemeClassKey::RR => 75.0,
            PhonemeClassKey::WW => 70.0,
            PhonemeClassKey::YY => 65.0,
            PhonemeClassKey::HH => 60.0,
            PhonemeClassKey::Sil => 100.0,
        }
    }

    pub fn weights(self) -> ChannelWeights {
        ChannelWeights::from_pairs(self.shape())
    }

    pub fn name(self) -> &'static str {
        match self {
            PhonemeClassKey::AA => "AA",
            PhonemeClassKey::AE => "AE",
            PhonemeClassKey::AH => "AH",
            PhonemeClassKey::AO => "AO",
            PhonemeClassKey::AW => "AW",
            PhonemeClassKey::AY => "AY",
            PhonemeClassKey::EH => "EH",
            PhonemeClassKey::ER => "ER",
            PhonemeClassKey::EY => "EY",
            PhonemeClassKey::IH => "IH",
            PhonemeClassKey::IY => "IY",
            PhonemeClassKey::OW => "OW",
            PhonemeClassKey::OY => "OY",
            PhonemeClassKey::UH => "UH",
            PhonemeClassKey::UW => "UW",
            PhonemeClassKey::PP => "PP",
            PhonemeClassKey::FF => "FF",
            PhonemeClassKey::TH => "TH",
            PhonemeClassKey::DD => "DD",
            PhonemeClassKey::KK => "KK",
            PhonemeClassKey::CH => "CH",
            PhonemeClassKey::SS => "SS",
            PhonemeClassKey::NN => "NN",
            PhonemeClassKey::LL => "LL",
            PhonemeClassKey::RR => "RR",
            PhonemeClassKey::WW => "WW",
            PhonemeClassKey::YY => "YY",
            PhonemeClassKey::HH => "HH",
            PhonemeClassKey::Sil => "sil",
        }
    }
}

/// ARPAbet phoneme to class.  Stress digits are ignored; anything unknown
/// gets the slightly-open `DD` shape.
pub fn class_for(phoneme: &PhonemeSymbol) -> PhonemeClassKey {
    match phoneme.base() {
        "" | "_silence_" | "sil" | "sp" | "pau" => PhonemeClassKey::Sil,

        "AA" => PhonemeClassKey::AA,
        "AE" => PhonemeClassKey::AE,
        "AH" | "AX" => PhonemeClassKey::AH,
        "AO" => PhonemeClassKey::AO,
        "AW" => PhonemeClassKey::AW,
        "AY" => PhonemeClassKey::AY,
        "EH" => PhonemeClassKey::EH,
        "ER" | "AXR" => PhonemeClassKey::ER,
        "EY" => PhonemeClassKey::EY,
        "IH" | "IX" => PhonemeClassKey::IH,
        "IY" => PhonemeClassKey::IY,
        "OW" => PhonemeClassKey::OW,
        "OY" => PhonemeClassKey::OY,
        "UH" => PhonemeClassKey::UH,
        "UW" | "UX" => PhonemeClassKey::UW,

        "P" | "B" | "M" | "EM" => PhonemeClassKey::PP,
        "F" | "V" => PhonemeClassKey::FF,
        "TH" | "DH" => PhonemeClassKey::TH,
        "T" | "D" | "DX" => PhonemeClassKey::DD,
        "K" | "G" | "NG" => PhonemeClassKey::KK,
        "CH" | "JH" | "SH" | "ZH" => PhonemeClassKey::CH,
        "S" | "Z" => PhonemeClassKey::SS,
        "N" | "EN" | "NX" => PhonemeClassKey::NN,
        "L" | "EL" => PhonemeClassKey::LL,
        "R" => PhonemeClassKey::RR,
        "W" | "WH" => PhonemeClassKey::WW,
        "Y" => PhonemeClassKey::YY,
        "HH" | "H" => PhonemeClassKey::HH,

        _ => PhonemeClassKey::DD,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KEYS: [PhonemeClassKey; 29] = [
        PhonemeClassKey::AA,
        PhonemeClassKey::AE,
        PhonemeClassKey::AH,
        PhonemeClassKey::AO,
        PhonemeClassKey::AW,
        PhonemeClassKey::AY,
        PhonemeClassKey::EH,
        PhonemeClassKey::ER,
        PhonemeClassKey::EY,
        PhonemeClassKey::IH,
        PhonemeClassKey::IY,
        PhonemeClassKey::OW,
        PhonemeClassKey::OY,
        PhonemeClassKey::UH,
        PhonemeClassKey::UW,
        PhonemeClassKey::PP,
        PhonemeClassKey::FF,
        PhonemeClassKey::TH,
        PhonemeClassKey::DD,
        PhonemeClassKey::KK,
        PhonemeClassKey::CH,
        PhonemeClassKey::SS,
        PhonemeClassKey::NN,
        PhonemeClassKey::LL,
        PhonemeClassKey::RR,
        PhonemeClassKey::WW,
        PhonemeClassKey::YY,
        PhonemeClassKey::HH,
        PhonemeClassKey::Sil,
    ];

    fn sym(s: &'static str) -> PhonemeSymbol {
        PhonemeSymbol::from_static(s)
    }

    #[test]
    fn test_channel_order_matches_index() {
        for (i, ch) in BlendShape::ALL.iter().enumerate() {
            assert_eq!(ch.index(), i, "got: {}", ch);
        }
    }

    #[test]
    fn test_channel_names_roundtrip() {
        for ch in BlendShape::ALL {
            assert_eq!(BlendShape::from_name(ch.name()), Some(ch));
        }
        assert_eq!(BlendShape::from_name("eyeBlinkLeft"), None);
    }

    #[test]
    fn test_voiced_pairs_share_class() {
        assert_eq!(class_for(&sym("F")), class_for(&sym("V")));
        assert_eq!(class_for(&sym("P")), class_for(&sym("B")));
        assert_eq!(class_for(&sym("M")), PhonemeClassKey::PP);
        assert_eq!(class_for(&sym("SH")), class_for(&sym("ZH")));
        assert_eq!(class_for(&sym("TH")), class_for(&sym("DH")));
    }

    #[test]
    fn test_stress_digits_ignored() {
        assert_eq!(class_for(&sym("AH0")), PhonemeClassKey::AH);
        assert_eq!(class_for(&sym("EY1")), PhonemeClassKey::EY);
    }

    #[test]
    fn test_silence_and_unknown() {
        assert_eq!(class_for(&PhonemeSymbol::SILENCE), PhonemeClassKey::Sil);
        assert_eq!(class_for(&sym("QQ")), PhonemeClassKey::DD);
        assert!(PhonemeClassKey::Sil.shape().is_empty());
    }

    #[test]
    fn test_tables_in_range() {
        for key in ALL_KEYS {
            for &(ch, w) in key.shape() {
                assert!((0.0..=1.0).contains(&w), "{:?}.{} = {}", key, ch, w);
            }
            assert!(key.nominal_ms() >= 30.0, "got: {:?}", key);
        }
    }

    #[test]
    fn test_stops_short_diphthongs_long() {
        assert!(PhonemeClassKey::DD.nominal_ms() < PhonemeClassKey::AA.nominal_ms());
        assert!(PhonemeClassKey::PP.nominal_ms() < PhonemeClassKey::OY.nominal_ms());
        assert!(PhonemeClassKey::AY.nominal_ms() > PhonemeClassKey::AH.nominal_ms());
    }

    #[test]
    fn test_lerp_and_omitted_channels() {
        let a = PhonemeClassKey::AA.weights();
        let b = PhonemeClassKey::UW.weights();
        let mid = a.lerp(&b, 0.5);
        assert!((mid[JawOpen] - 0.425).abs() < 1e-6, "got: {}", mid[JawOpen]);
        assert!((mid[MouthPucker] - 0.35).abs() < 1e-6, "got: {}", mid[MouthPucker]);
        assert_eq!(mid[MouthClose], 0.0);
    }

    #[test]
    fn test_lip_raise_sum() {
        let pp = PhonemeClassKey::PP.weights();
        assert!((pp.lip_raise_sum() - 1.0).abs() < 1e-6, "got: {}", pp.lip_raise_sum());
        assert_eq!(PhonemeClassKey::AA.weights().lip_raise_sum(), 0.0);
    }
}
