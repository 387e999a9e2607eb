//! Speech-engine seam and the event queue between its callbacks and ticks.
//!
//! The engine is an outside collaborator: it speaks text and reports back
//! `start`, best-effort word boundaries, `end` or `error`, possibly from
//! another thread.  Callbacks never touch controller state directly; they
//! push [`TaggedEvent`]s onto a bounded queue that the controller drains once
//! per tick.  Each event carries the [`SegmentToken`] of the `speak()` call
//! that produced it, so events from a cancelled utterance are recognised
//! and discarded when drained.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::warn;

use crate::error::Result;

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// A lifecycle notification from the speech engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    /// Audio for the segment has started.
    Start,
    /// A word has started.  `elapsed_ms` is the engine's own segment-relative
    /// timestamp if it has one; otherwise the drain time is used.
    WordBoundary {
        char_index: usize,
        char_length: usize,
        elapsed_ms: Option<f64>,
    },
    /// The segment finished playing.
    End,
    /// The engine failed.
    Error(String),
}

/// Identifies one `speak()` call: utterance generation and segment index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentToken {
    pub generation: u32,
    pub segment: u32,
}

impl SegmentToken {
    /// Pack into an opaque integer for hosts that cannot hold a struct.
    pub fn to_bits(self) -> u64 {
        (u64::from(self.generation) << 32) | u64::from(self.segment)
    }

    pub fn from_bits(bits: u64) -> Self {
        Self { generation: (bits >> 32) as u32, segment: bits as u32 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedEvent {
    pub token: SegmentToken,
    pub event: SpeechEvent,
}

// ─────────────────────────────────────────────────────────────────────────────
// Sender
// ─────────────────────────────────────────────────────────────────────────────

/// Callback endpoint handed to the engine with every `speak()` call.
///
/// Cheap to clone and safe to use from any thread.  Sending never blocks:
/// when the queue is full the event is dropped.
#[derive(Debug, Clone)]
pub struct SpeechEventSender {
    token: SegmentToken,
    tx: Sender<TaggedEvent>,
}

impl SpeechEventSender {
    pub fn token(&self) -> SegmentToken {
        self.token
    }

    /// Queue `event`.  Returns `false` if it was dropped.
    pub fn send(&self, event: SpeechEvent) -> bool {
        match self.tx.try_send(TaggedEvent { token: self.token, event }) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                warn!(token = ?self.token, event = ?dropped.event, "speech event queue full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    pub fn on_start(&self) -> bool {
        self.send(SpeechEvent::Start)
    }

    pub fn on_word_boundary(&self, char_index: usize, char_length: usize) -> bool {
        self.send(SpeechEvent::WordBoundary { char_index, char_length, elapsed_ms: None })
    }

    /// Boundary with an engine-supplied, segment-relative timestamp.
    pub fn on_word_boundary_at(&self, char_index: usize, char_length: usize, elapsed_ms: f64) -> bool {
        self.send(SpeechEvent::WordBoundary { char_index, char_length, elapsed_ms: Some(elapsed_ms) })
    }

    pub fn on_end(&self) -> bool {
        self.send(SpeechEvent::End)
    }

    pub fn on_error(&self, reason: impl Into<String>) -> bool {
        self.send(SpeechEvent::Error(reason.into()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Queue
// ─────────────────────────────────────────────────────────────────────────────

/// Producer side of the queue, for hosts that report events by token.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Sender<TaggedEvent>,
}

impl EventSink {
    pub fn sender(&self, token: SegmentToken) -> SpeechEventSender {
        SpeechEventSender { token, tx: self.tx.clone() }
    }
}

/// Bounded multi-producer queue drained by the controller tick.
#[derive(Debug)]
pub struct EventQueue {
    tx: Sender<TaggedEvent>,
    rx: Receiver<TaggedEvent>,
}

impl EventQueue {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity.max(1));
        Self { tx, rx }
    }

    pub fn sender(&self, token: SegmentToken) -> SpeechEventSender {
        self.sink().sender(token)
    }

    pub fn sink(&self) -> EventSink {
        EventSink { tx: self.tx.clone() }
    }

    /// Everything queued so far, in arrival order.
    pub fn drain(&self) -> Vec<TaggedEvent> {
        self.rx.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine seam
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque value returned by the engine for one `speak()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeechHandle(pub u64);

/// A text-to-speech engine that reports progress through callbacks.
pub trait SpeechEngine {
    /// Start speaking `text`.  Progress is reported through `events`.
    fn speak(&mut self, text: &str, events: SpeechEventSender) -> Result<SpeechHandle>;

    /// Stop whatever is being spoken.  Must be safe to call when idle.
    fn cancel(&mut self);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scripted engine for tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use crate::error::LipSyncError;

    /// Records every call; tests fire callbacks through the stored senders.
    #[derive(Debug, Default)]
    pub struct MockSpeechEngine {
        pub spoken: Vec<String>,
        pub senders: Vec<SpeechEventSender>,
        pub cancels: usize,
        pub fail_next: Option<String>,
    }

    impl MockSpeechEngine {
        /// Sender of the most recent `speak()` call.
        pub fn last(&self) -> &SpeechEventSender {
            self.senders.last().expect("nothing spoken yet")
        }
    }

    impl SpeechEngine for MockSpeechEngine {
        fn speak(&mut self, text: &str, events: SpeechEventSender) -> Result<SpeechHandle> {
            if let Some(reason) = self.fail_next.take() {
                return Err(LipSyncError::Speech(reason));
            }
            self.spoken.push(text.to_string());
            self.senders.push(events);
            Ok(SpeechHandle(self.spoken.len() as u64))
        }

        fn cancel(&mut self) {
            self.cancels += 1;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
