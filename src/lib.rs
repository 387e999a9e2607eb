//! # visemer
//!
//! Phoneme-driven lip sync for a talking avatar whose voice comes from an
//! outside text-to-speech engine.
//!
//! The engine speaks; visemer predicts what the mouth should be doing.  Text
//! is split into segments, converted to ARPAbet phonemes with a rule-based
//! G2P, and laid out as a viseme timeline.  Word-boundary callbacks from the
//! engine pull that timeline back in sync while it plays, and every render
//! tick produces smoothed ARKit blend-shape weights.
//!
//! ## Quick start
//!
//! ```no_run
//! use visemer::{EngineConfig, LipSyncController, SpeechEngine, SpeechEventSender, SpeechHandle, ViewportWeightSet};
//!
//! // Wrap the platform TTS engine.
//! struct Platform;
//!
//! impl SpeechEngine for Platform {
//!     fn speak(&mut self, _text: &str, events: SpeechEventSender) -> visemer::Result<SpeechHandle> {
//!         // Hand `events` to the TTS callbacks: on_start / on_word_boundary / on_end.
//!         events.on_start();
//!         Ok(SpeechHandle(0))
//!     }
//!     fn cancel(&mut self) {}
//! }
//!
//! let mut lipsync = LipSyncController::new(Platform, EngineConfig::default()).unwrap();
//! let mut weights = ViewportWeightSet::with_managed_channels();
//!
//! lipsync.speak("Hello, world!", 0.0).unwrap();
//! for frame in 0..120 {
//!     lipsync.tick(f64::from(frame) * 16.0, &mut weights);
//!     let _jaw = weights.get_weight("jawOpen");
//! }
//! ```
//!
//! ## Pipeline
//! 1. **Text normalisation**: numbers, currency and percentages → words.
//! 2. **Segmentation**: split at sentence and clause punctuation, strip symbols.
//! 3. **Phonemisation**: exceptions, suffix rules, letter rules, fallback.
//! 4. **Timeline**: per-phoneme durations, re-anchored on word boundaries.
//! 5. **Playback**: coarticulation, envelope, safety clamp, smoothing.
//! 6. **Scheduling**: returning → speaking → idle, with pauses between
//!    segments and cancellation by generation.

pub mod clamp;
pub mod config;
pub mod controller;
pub mod error;

// C FFI for native hosts: exposes visemer_new / speak / tick / on_* / free.
pub mod ffi;

pub mod lexicon;
pub mod normalize;
pub mod phonemize;
pub mod playback;
pub mod segment;
pub mod speech;
pub mod state;
pub mod timeline;
pub mod tokenize;
pub mod viseme;
pub mod weights;

// ─── Re-exports for convenience ─────────────────────────────────────────────

pub use config::EngineConfig;
pub use controller::{ControllerStatus, LipSyncController};
pub use error::{LipSyncError, Result};
pub use phonemize::{G2p, PhonemeSymbol, RuleG2p, WithExternal};
pub use speech::{SegmentToken, SpeechEngine, SpeechEvent, SpeechEventSender, SpeechHandle};
pub use state::AnimationState;
pub use timeline::{Timeline, TimelineBuilder, VisemeKeyframe};
pub use viseme::{BlendShape, ChannelWeights, PhonemeClassKey};
pub use weights::{Subsystem, ViewportWeightSet};
