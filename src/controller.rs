//! Lip-sync controller: utterance scheduling around the per-tick pipeline.
//!
//! The host calls [`LipSyncController::tick`] once per rendered frame.  A
//! tick drains queued speech events, runs due deferred tasks, advances the
//! state machine and playback, and writes the mouth channels when speech owns
//! them.  Nothing blocks and nothing runs outside a tick except `speak`,
//! `stop` and `react`, which the host also calls from its own thread.
//!
//! Every utterance gets a new generation number.  Deferred tasks and speech
//! events carry the generation they were created under, so anything left
//! over from a stopped or failed utterance is discarded instead of applied.

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::phonemize::{G2p, RuleG2p};
use crate::playback::PlaybackEngine;
use crate::segment::Segmenter;
use crate::speech::{EventQueue, EventSink, SegmentToken, SpeechEngine, SpeechEvent, TaggedEvent};
use crate::state::{AnimationState, StateMachine};
use crate::timeline::{correlate_boundary, BoundaryRecord, Timeline, TimelineBuilder};
use crate::tokenize::{word_events, WordEvent};
use crate::viseme::{BlendShape, ChannelWeights};
use crate::weights::{Subsystem, ViewportWeightSet};

// ─────────────────────────────────────────────────────────────────────────────
// Session data
// ─────────────────────────────────────────────────────────────────────────────

/// Everything known about the segment currently being spoken.
#[derive(Debug, Clone)]
pub struct SegmentSession {
    index: u32,
    text: String,
    words: Vec<WordEvent>,
    boundaries: Vec<BoundaryRecord>,
    timeline: Timeline,
    /// Host time the segment clock counts from.
    started_ms: f64,
    ended: bool,
}

impl SegmentSession {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[WordEvent] {
        &self.words
    }

    pub fn boundaries(&self) -> &[BoundaryRecord] {
        &self.boundaries
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn started_ms(&self) -> f64 {
        self.started_ms
    }

    /// Whether the engine has reported the end (or the watchdog fired).
    pub fn ended(&self) -> bool {
        self.ended
    }
}

#[derive(Debug)]
enum Phase {
    /// Waiting for the face to reach neutral.
    Returning,
    Playing(SegmentSession),
    /// Silence between two segments.
    Pausing,
    /// Final decay after the last segment (or after a failure).
    Decaying { since_ms: f64 },
}

#[derive(Debug)]
struct Utterance {
    segments: Vec<String>,
    next_segment: usize,
    phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TaskKind {
    StartNextSegment,
    GraceElapsed { segment: u32 },
    ReactionElapsed,
}

#[derive(Debug, Clone, Copy)]
struct DeferredTask {
    due_ms: f64,
    generation: u32,
    kind: TaskKind,
}

/// User-facing summary of what the controller is doing.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerStatus {
    Ready,
    Speaking,
    Finished,
    Stopped,
    Failed(String),
}

impl ControllerStatus {
    pub fn message(&self) -> String {
        match self {
            ControllerStatus::Ready => "ready".to_string(),
            ControllerStatus::Speaking => "speaking".to_string(),
            ControllerStatus::Finished => "finished".to_string(),
            ControllerStatus::Stopped => "stopped".to_string(),
            ControllerStatus::Failed(reason) => format!("speech failed: {}", reason),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Controller
// ─────────────────────────────────────────────────────────────────────────────

pub struct LipSyncController<E: SpeechEngine> {
    config: EngineConfig,
    engine: E,
    segmenter: Segmenter,
    g2p: Box<dyn G2p>,
    builder: TimelineBuilder,
    playback: PlaybackEngine,
    machine: StateMachine,
    queue: EventQueue,
    generation: u32,
    utterance: Option<Utterance>,
    deferred: Vec<DeferredTask>,
    last_tick_ms: Option<f64>,
    status: ControllerStatus,
}

impl<E: SpeechEngine> LipSyncController<E> {
    pub fn new(engine: E, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            segmenter: Segmenter::new(config.expand_numbers),
            g2p: Box::new(RuleG2p),
            builder: TimelineBuilder::new(&config.timing),
            playback: PlaybackEngine::new(&config.playback, &config.clamp),
            machine: StateMachine::default(),
            queue: EventQueue::new(config.scheduler.event_queue_capacity),
            generation: 0,
            utterance: None,
            deferred: Vec::new(),
            last_tick_ms: None,
            status: ControllerStatus::Ready,
            engine,
            config,
        })
    }

    /// Replace the built-in rule G2P (e.g. with [`crate::phonemize::WithExternal`]).
    pub fn with_g2p(mut self, g2p: impl G2p + 'static) -> Self {
        self.g2p = Box::new(g2p);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn state(&self) -> AnimationState {
        self.machine.state()
    }

    pub fn status(&self) -> &ControllerStatus {
        &self.status
    }

    /// Who may write the mouth channels this tick.
    pub fn channel_owner(&self) -> Subsystem {
        self.machine.state().channel_owner()
    }

    /// The smoothed speech weights from the last tick.
    pub fn weights(&self) -> &ChannelWeights {
        self.playback.weights()
    }

    pub fn current_segment(&self) -> Option<&SegmentSession> {
        match self.utterance.as_ref().map(|u| &u.phase) {
            Some(Phase::Playing(session)) => Some(session),
            _ => None,
        }
    }

    /// Producer handle for hosts that cannot keep the [`crate::speech::SpeechEventSender`]
    /// object (FFI) and report events by token instead.  A stale token simply
    /// produces ignored events.
    pub fn event_sink(&self) -> EventSink {
        self.queue.sink()
    }

    // ── Requests ─────────────────────────────────────────────────────────────

    /// Queue `text` for speaking.  Anything currently playing is cancelled.
    ///
    /// Fails with [`crate::LipSyncError::EmptyInput`] before touching any
    /// state when nothing speakable remains after cleaning.
    pub fn speak(&mut self, text: &str, now_ms: f64) -> Result<()> {
        let segments = self.segmenter.segment(text)?;
        self.cancel_utterance();
        self.machine.transition(AnimationState::Idle, now_ms);
        self.machine.transition(AnimationState::Returning, now_ms);
        info!(segments = segments.len(), generation = self.generation, "utterance queued");
        self.utterance = Some(Utterance { segments, next_segment: 0, phase: Phase::Returning });
        self.status = ControllerStatus::Speaking;
        Ok(())
    }

    /// Stop immediately: cancel speech and every pending task, and zero the
    /// speech channels without smoothing.
    pub fn stop(&mut self, now_ms: f64, weights: &mut ViewportWeightSet) {
        self.cancel_utterance();
        self.playback.snap_to_neutral();
        self.machine.transition(AnimationState::Idle, now_ms);
        for ch in BlendShape::ALL {
            weights.set_weight(ch.name(), 0.0);
        }
        self.status = ControllerStatus::Stopped;
        info!(generation = self.generation, "stopped");
    }

    /// Play a short reaction.  Only possible while idle; a reaction already
    /// in progress is not restarted.
    pub fn react(&mut self, duration_ms: f64, now_ms: f64) -> bool {
        if self.utterance.is_some()
            || self.state() == AnimationState::Reacting
            || !self.machine.transition(AnimationState::Reacting, now_ms)
        {
            debug!(state = self.state().as_str(), "reaction ignored");
            return false;
        }
        self.schedule(now_ms + duration_ms.max(0.0), TaskKind::ReactionElapsed);
        true
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    /// Advance everything to host time `now_ms` and write the speech channels.
    ///
    /// Call this first in a frame: it starts a new ownership tick on
    /// `weights`, and other subsystems write after it.
    pub fn tick(&mut self, now_ms: f64, weights: &mut ViewportWeightSet) {
        let dt_ms = match self.last_tick_ms {
            Some(last) => (now_ms - last).clamp(0.0, self.config.scheduler.max_tick_ms),
            None => 0.0,
        };
        self.last_tick_ms = Some(now_ms);
        weights.begin_tick();

        let owner_before = self.channel_owner();
        for tagged in self.queue.drain() {
            self.handle_event(tagged, now_ms);
        }
        self.run_due_tasks(now_ms);
        self.advance(now_ms, dt_ms);

        if owner_before == Subsystem::Speech || self.channel_owner() == Subsystem::Speech {
            weights.write_channels(Subsystem::Speech, self.playback.weights());
        }
    }

    fn advance(&mut self, now_ms: f64, dt_ms: f64) {
        enum Next {
            Stay,
            StartSegment,
            TimedOut,
            Finish,
        }

        let neutral = self.config.scheduler.neutral_threshold;
        let max_return_ms = self.config.scheduler.max_return_ms;
        let max_decay_ms = self.config.scheduler.max_decay_ms;
        let timeout_ms = self.config.scheduler.segment_timeout_ms;

        let next = match self.utterance.as_mut().map(|u| &mut u.phase) {
            None => return,
            Some(Phase::Returning) => {
                self.playback.relax(dt_ms);
                let waited = self.machine.time_in_state(now_ms);
                if self.playback.is_neutral(neutral) || waited >= max_return_ms {
                    self.machine.transition(AnimationState::Speaking, now_ms);
                    Next::StartSegment
                } else {
                    Next::Stay
                }
            }
            Some(Phase::Playing(session)) => {
                let elapsed = now_ms - session.started_ms;
                self.playback.step(elapsed, dt_ms, &session.timeline);
                if !session.ended && elapsed > session.timeline.end_ms() + timeout_ms {
                    warn!(segment = session.index, elapsed, "no end callback, ending segment");
                    Next::TimedOut
                } else {
                    Next::Stay
                }
            }
            Some(Phase::Pausing) => {
                self.playback.relax(dt_ms);
                Next::Stay
            }
            Some(Phase::Decaying { since_ms }) => {
                self.playback.relax(dt_ms);
                if self.playback.is_neutral(neutral) || now_ms - *since_ms >= max_decay_ms {
                    Next::Finish
                } else {
                    Next::Stay
                }
            }
        };

        match next {
            Next::Stay => {}
            Next::StartSegment => self.start_next_segment(now_ms),
            Next::TimedOut => {
                // The engine may still be talking; silence it before the next segment.
                self.engine.cancel();
                self.end_segment(now_ms);
            }
            Next::Finish => self.finish(now_ms),
        }
    }

    // ── Speech events ────────────────────────────────────────────────────────

    fn handle_event(&mut self, tagged: TaggedEvent, now_ms: f64) {
        if tagged.token.generation != self.generation {
            debug!(token = ?tagged.token, "stale speech event dropped");
            return;
        }
        if let SpeechEvent::Error(reason) = tagged.event {
            self.fail(now_ms, reason);
            return;
        }

        let Some(Utterance { phase: Phase::Playing(session), .. }) = self.utterance.as_mut() else {
            debug!(token = ?tagged.token, "speech event with no segment playing");
            return;
        };
        if session.index != tagged.token.segment {
            debug!(token = ?tagged.token, current = session.index, "event for another segment dropped");
            return;
        }

        match tagged.event {
            SpeechEvent::Start => {
                // Boundaries already recorded are relative to the old anchor.
                if session.boundaries.is_empty() {
                    session.started_ms = now_ms;
                    self.playback.reset_cursor();
                    debug!(segment = session.index, "segment clock re-anchored on start");
                }
            }
            SpeechEvent::WordBoundary { char_index, char_length, elapsed_ms } => {
                let Some(word_index) = correlate_boundary(&session.words, char_index, char_length) else {
                    debug!(char_index, char_length, "boundary matches no word");
                    return;
                };
                if session.boundaries.iter().any(|b| b.word_index == word_index) {
                    debug!(word_index, "duplicate boundary ignored");
                    return;
                }
                let elapsed_ms = elapsed_ms.unwrap_or(now_ms - session.started_ms);
                session.boundaries.push(BoundaryRecord { word_index, elapsed_ms });
                session.timeline = self.builder.build(&session.words, &session.boundaries);
                debug!(word_index, elapsed_ms, "boundary recorded");
            }
            SpeechEvent::End => self.end_segment(now_ms),
            SpeechEvent::Error(_) => {}
        }
    }

    fn end_segment(&mut self, now_ms: f64) {
        let Some(Utterance { phase: Phase::Playing(session), .. }) = self.utterance.as_mut() else {
            return;
        };
        if session.ended {
            return;
        }
        session.ended = true;
        let segment = session.index;
        debug!(segment, "segment ended, grace period");
        self.schedule(now_ms + self.config.scheduler.end_grace_ms, TaskKind::GraceElapsed { segment });
    }

    // ── Deferred tasks ───────────────────────────────────────────────────────

    fn schedule(&mut self, due_ms: f64, kind: TaskKind) {
        self.deferred.push(DeferredTask { due_ms, generation: self.generation, kind });
    }

    fn run_due_tasks(&mut self, now_ms: f64) {
        let (mut due, pending): (Vec<DeferredTask>, Vec<DeferredTask>) =
            std::mem::take(&mut self.deferred).into_iter().partition(|t| t.due_ms <= now_ms);
        self.deferred = pending;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));

        for task in due {
            // A task run earlier in this loop may have failed the utterance.
            if task.generation != self.generation {
                debug!(kind = ?task.kind, "stale task dropped");
                continue;
            }
            match task.kind {
                TaskKind::StartNextSegment => self.start_next_segment(now_ms),
                TaskKind::GraceElapsed { segment } => self.finish_segment(segment, now_ms),
                TaskKind::ReactionElapsed => {
                    if self.state() == AnimationState::Reacting {
                        self.machine.transition(AnimationState::Idle, now_ms);
                    }
                }
            }
        }
    }

    fn start_next_segment(&mut self, now_ms: f64) {
        let Some(utt) = self.utterance.as_mut() else {
            return;
        };
        let Some(text) = utt.segments.get(utt.next_segment).cloned() else {
            utt.phase = Phase::Decaying { since_ms: now_ms };
            return;
        };
        let index = utt.next_segment as u32;
        utt.next_segment += 1;

        let words = word_events(&text, self.g2p.as_ref());
        let timeline = self.builder.build(&words, &[]);
        let token = SegmentToken { generation: self.generation, segment: index };

        match self.engine.speak(&text, self.queue.sender(token)) {
            Ok(handle) => {
                debug!(segment = index, words = words.len(), keyframes = timeline.len(), ?handle, "segment started");
                self.playback.reset_cursor();
                utt.phase = Phase::Playing(SegmentSession {
                    index,
                    text,
                    words,
                    boundaries: Vec::new(),
                    timeline,
                    started_ms: now_ms,
                    ended: false,
                });
            }
            Err(e) => self.fail(now_ms, e.to_string()),
        }
    }

    fn finish_segment(&mut self, segment: u32, now_ms: f64) {
        let Some(utt) = self.utterance.as_mut() else {
            return;
        };
        if !matches!(&utt.phase, Phase::Playing(s) if s.index == segment) {
            return;
        }
        if utt.next_segment < utt.segments.len() {
            utt.phase = Phase::Pausing;
            self.schedule(now_ms + self.config.scheduler.segment_pause_ms, TaskKind::StartNextSegment);
        } else {
            utt.phase = Phase::Decaying { since_ms: now_ms };
        }
    }

    // ── Wind-down ────────────────────────────────────────────────────────────

    /// Invalidate the current utterance: engine, tasks and queued events.
    fn cancel_utterance(&mut self) {
        if self.utterance.take().is_some() {
            self.engine.cancel();
        }
        self.generation = self.generation.wrapping_add(1);
        self.deferred.clear();
    }

    fn fail(&mut self, now_ms: f64, reason: String) {
        warn!(%reason, generation = self.generation, "speech engine error, winding down");
        self.engine.cancel();
        self.generation = self.generation.wrapping_add(1);
        self.deferred.clear();
        self.status = ControllerStatus::Failed(reason);
        if let Some(utt) = self.utterance.as_mut() {
            utt.phase = Phase::Decaying { since_ms: now_ms };
        }
    }

    fn finish(&mut self, now_ms: f64) {
        self.utterance = None;
        self.generation = self.generation.wrapping_add(1);
        self.deferred.clear();
        self.playback.snap_to_neutral();
        self.machine.transition(AnimationState::Idle, now_ms);
        if self.status == ControllerStatus::Speaking {
            self.status = ControllerStatus::Finished;
        }
        info!(status = %self.status.message(), "utterance finished");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LipSyncError;
    use crate::speech::mock::MockSpeechEngine;

    type Ctl = LipSyncController<MockSpeechEngine>;

    fn controller() -> Ctl {
        LipSyncController::new(MockSpeechEngine::default(), EngineConfig::default()).expect("valid config")
    }

    fn weight_set() -> ViewportWeightSet {
        ViewportWeightSet::with_managed_channels()
    }

    /// Tick every 16 ms over `[from, to)`; returns the next tick time.
    fn run(ctl: &mut Ctl, w: &mut ViewportWeightSet, from: f64, to: f64) -> f64 {
        let mut t = from;
        while t < to {
            ctl.tick(t, w);
            t += 16.0;
        }
        t
    }

    fn all_zero(w: &ViewportWeightSet) -> bool {
        BlendShape::ALL.iter().all(|ch| w.get_weight(ch.name()) == 0.0)
    }

    #[test]
    fn test_empty_input_creates_no_state() {
        let mut ctl = controller();
        let err = ctl.speak(" ?! ... ", 0.0).unwrap_err();
        assert!(matches!(err, LipSyncError::EmptyInput), "got: {}", err);
        assert_eq!(ctl.state(), AnimationState::Idle);
        assert_eq!(*ctl.status(), ControllerStatus::Ready);
        assert!(ctl.engine().spoken.is_empty());
    }

    #[test]
    fn test_hello_world_two_segments_with_pause() {
        let mut ctl = controller();
        let mut w = weight_set();
        ctl.speak("Hello, world!", 0.0).expect("speakable");
        assert_eq!(ctl.state(), AnimationState::Returning);

        // Already neutral: the first tick starts segment 0.
        ctl.tick(0.0, &mut w);
        assert_eq!(ctl.state(), AnimationState::Speaking);
        assert_eq!(ctl.engine().spoken, vec!["Hello"]);

        run(&mut ctl, &mut w, 16.0, 400.0);
        assert!(w.get_weight("jawOpen") > 0.0);
        ctl.engine().last().on_end();
        ctl.tick(400.0, &mut w);
        assert!(ctl.current_segment().expect("grace period").ended());

        // Grace (120 ms) over: pause between segments.
        ctl.tick(520.0, &mut w);
        assert!(ctl.current_segment().is_none());
        ctl.tick(700.0, &mut w);
        assert_eq!(ctl.engine().spoken.len(), 1);
        assert_eq!(ctl.state(), AnimationState::Speaking);

        // Pause (250 ms) over: second segment.
        ctl.tick(770.0, &mut w);
        assert_eq!(ctl.engine().spoken, vec!["Hello", "world"]);
        assert_eq!(ctl.current_segment().map(SegmentSession::index), Some(1));

        let t = run(&mut ctl, &mut w, 786.0, 1_100.0);
        ctl.engine().last().on_end();
        run(&mut ctl, &mut w, t, 3_000.0);
        assert_eq!(ctl.state(), AnimationState::Idle);
        assert_eq!(*ctl.status(), ControllerStatus::Finished);
        assert!(ctl.weights().peak() == 0.0, "got: {:?}", ctl.weights());
        assert!(all_zero(&w));
    }

    #[test]
    fn test_boundary_repairs_timeline() {
        let mut ctl = controller();
        let mut w = weight_set();
        ctl.speak("hello world again", 0.0).expect("speakable");
        ctl.tick(0.0, &mut w);
        ctl.tick(16.0, &mut w);

        // "again" spans chars 12..17.
        ctl.engine().last().on_word_boundary_at(12, 5, 640.0);
        ctl.tick(32.0, &mut w);

        let session = ctl.current_segment().expect("playing");
        assert_eq!(session.boundaries(), &[BoundaryRecord { word_index: 2, elapsed_ms: 640.0 }]);
        let before: usize = session.words()[..2].iter().map(|w| w.phonemes.len()).sum();
        let frames = session.timeline().keyframes();
        assert_eq!(frames[before].time_ms, 640.0);
        assert!(frames[..before].iter().all(|k| k.time_ms < 640.0), "got: {:?}", frames);
    }

    #[test]
    fn test_boundary_stamped_with_drain_time() {
        let mut ctl = controller();
        let mut w = weight_set();
        ctl.speak("hello world", 0.0).expect("speakable");
        ctl.tick(100.0, &mut w);
        ctl.engine().last().on_word_boundary(6, 5);
        ctl.engine().last().on_word_boundary_at(7, 1, 900.0);
        ctl.tick(400.0, &mut w);
        let session = ctl.current_segment().expect("playing");
        // Second notification hits the same word: first arrival wins.
        assert_eq!(session.boundaries(), &[BoundaryRecord { word_index: 1, elapsed_ms: 300.0 }]);
    }

    #[test]
    fn test_start_reanchors_clock() {
        let mut ctl = controller();
        let mut w = weight_set();
        ctl.speak("hello", 0.0).expect("speakable");
        ctl.tick(0.0, &mut w);
        ctl.engine().last().on_start();
        ctl.tick(80.0, &mut w);
        assert_eq!(ctl.current_segment().expect("playing").started_ms(), 80.0);
    }

    #[test]
    fn test_uncorrelated_boundary_dropped() {
        let mut ctl = controller();
        let mut w = weight_set();
        ctl.speak("hi there", 0.0).expect("speakable");
        ctl.tick(0.0, &mut w);
        ctl.engine().last().on_word_boundary(50, 4);
        ctl.tick(16.0, &mut w);
        assert!(ctl.current_segment().expect("playing").boundaries().is_empty());
    }

    #[test]
    fn test_stop_snaps_and_cancels_everything() {
        let mut ctl = controller();
        let mut w = weight_set();
        ctl.speak("Hello there, how are you?", 0.0).expect("speakable");
        let t = run(&mut ctl, &mut w, 0.0, 200.0);
        assert!(!all_zero(&w));
        let old = ctl.engine().last().clone();
        old.on_end();

        ctl.stop(t, &mut w);
        assert_eq!(ctl.state(), AnimationState::Idle);
        assert_eq!(*ctl.status(), ControllerStatus::Stopped);
        assert!(all_zero(&w));
        assert!(ctl.engine().cancels >= 1);

        // Late callbacks from the cancelled utterance change nothing.
        old.on_word_boundary(0, 5);
        old.on_error("late");
        run(&mut ctl, &mut w, t + 16.0, t + 2_000.0);
        assert_eq!(ctl.state(), AnimationState::Idle);
        assert_eq!(*ctl.status(), ControllerStatus::Stopped);
        assert_eq!(ctl.engine().spoken.len(), 1);
        assert!(all_zero(&w));
    }

    #[test]
    fn test_late_callbacks_after_finish_ignored() {
        let mut ctl = controller();
        let mut w = weight_set();
        ctl.speak("hi", 0.0).expect("speakable");
        let t = run(&mut ctl, &mut w, 0.0, 200.0);
        let sender = ctl.engine().last().clone();
        sender.on_end();
        let t = run(&mut ctl, &mut w, t, t + 2_000.0);
        assert_eq!(ctl.state(), AnimationState::Idle);
        assert_eq!(*ctl.status(), ControllerStatus::Finished);

        sender.on_error("interrupted");
        sender.on_word_boundary(0, 2);
        run(&mut ctl, &mut w, t, t + 500.0);
        assert_eq!(ctl.state(), AnimationState::Idle);
        assert_eq!(*ctl.status(), ControllerStatus::Finished, "got: {:?}", ctl.status());
        assert_eq!(ctl.engine().cancels, 0);
        assert!(all_zero(&w));
    }

    #[test]
    fn test_new_speak_cancels_previous() {
        let mut ctl = controller();
        let mut w = weight_set();
        ctl.speak("first thing", 0.0).expect("speakable");
        let t = run(&mut ctl, &mut w, 0.0, 200.0);
        let old = ctl.engine().last().clone();

        ctl.speak("second thing", t).expect("speakable");
        assert_eq!(ctl.engine().cancels, 1);
        assert_eq!(ctl.state(), AnimationState::Returning);
        let t = run(&mut ctl, &mut w, t, t + 700.0);
        assert_eq!(ctl.state(), AnimationState::Speaking);
        assert_eq!(ctl.engine().spoken, vec!["first thing", "second thing"]);

        old.on_word_boundary(0, 5);
        ctl.tick(t, &mut w);
        assert!(ctl.current_segment().expect("playing").boundaries().is_empty());
    }

    #[test]
    fn test_engine_error_winds_down() {
        let mut ctl = controller();
        let mut w = weight_set();
        ctl.speak("hello world", 0.0).expect("speakable");
        let t = run(&mut ctl, &mut w, 0.0, 150.0);
        let sender = ctl.engine().last().clone();
        sender.on_error("synth crashed");
        let t = run(&mut ctl, &mut w, t, t + 1_000.0);

        assert_eq!(ctl.state(), AnimationState::Idle);
        assert_eq!(*ctl.status(), ControllerStatus::Failed("synth crashed".into()));
        assert!(ctl.status().message().contains("synth crashed"));
        assert_eq!(ctl.engine().cancels, 1);
        assert!(all_zero(&w));

        sender.on_end();
        ctl.tick(t, &mut w);
        assert_eq!(ctl.state(), AnimationState::Idle);
    }

    #[test]
    fn test_engine_refusal_fails_utterance() {
        let mut ctl = controller();
        let mut w = weight_set();
        ctl.engine_mut().fail_next = Some("no voice".into());
        ctl.speak("hello", 0.0).expect("speakable");
        run(&mut ctl, &mut w, 0.0, 1_000.0);
        assert_eq!(ctl.state(), AnimationState::Idle);
        assert!(matches!(ctl.status(), ControllerStatus::Failed(r) if r.contains("no voice")), "got: {:?}", ctl.status());
    }

    #[test]
    fn test_missing_end_times_out() {
        let mut ctl = controller();
        let mut w = weight_set();
        ctl.speak("hi", 0.0).expect("speakable");
        let mut t = 0.0;
        while t < 6_000.0 && ctl.state() != AnimationState::Idle {
            ctl.tick(t, &mut w);
            t += 50.0;
        }
        assert_eq!(ctl.state(), AnimationState::Idle);
        assert_eq!(*ctl.status(), ControllerStatus::Finished);
        assert!(t > 3_000.0, "got: {}", t);
    }

    #[test]
    fn test_timed_out_segment_cancelled_before_next() {
        let mut ctl = controller();
        let mut w = weight_set();
        ctl.speak("Hello, world!", 0.0).expect("speakable");
        let mut t = 0.0;
        while t < 10_000.0 && ctl.engine().spoken.len() < 2 {
            ctl.tick(t, &mut w);
            t += 50.0;
        }
        // No callbacks at all: the watchdog ends segment 0 and silences the engine.
        assert_eq!(ctl.engine().spoken, vec!["Hello", "world"]);
        assert_eq!(ctl.engine().cancels, 1, "got: {}", ctl.engine().cancels);
        assert_eq!(ctl.state(), AnimationState::Speaking);
    }

    #[test]
    fn test_reaction_not_restarted() {
        let mut ctl = controller();
        let mut w = weight_set();
        assert!(ctl.react(1_000.0, 0.0));
        assert!(!ctl.react(300.0, 100.0));
        ctl.tick(400.0, &mut w);
        assert_eq!(ctl.state(), AnimationState::Reacting);
        ctl.tick(1_000.0, &mut w);
        assert_eq!(ctl.state(), AnimationState::Idle);
    }

    #[test]
    fn test_reaction_only_from_idle() {
        let mut ctl = controller();
        let mut w = weight_set();
        assert!(ctl.react(300.0, 0.0));
        assert_eq!(ctl.state(), AnimationState::Reacting);
        assert_eq!(ctl.channel_owner(), Subsystem::Reaction);
        ctl.tick(100.0, &mut w);
        assert_eq!(ctl.state(), AnimationState::Reacting);
        ctl.tick(300.0, &mut w);
        assert_eq!(ctl.state(), AnimationState::Idle);

        ctl.speak("hello", 400.0).expect("speakable");
        ctl.tick(400.0, &mut w);
        assert!(!ctl.react(300.0, 416.0));
        assert_eq!(ctl.state(), AnimationState::Speaking);
    }

    #[test]
    fn test_speak_preempts_reaction() {
        let mut ctl = controller();
        let mut w = weight_set();
        assert!(ctl.react(1_000.0, 0.0));
        ctl.speak("hello", 50.0).expect("speakable");
        assert_eq!(ctl.state(), AnimationState::Returning);
        run(&mut ctl, &mut w, 50.0, 1_200.0);
        // The reaction timer belonged to the old generation.
        assert_ne!(ctl.state(), AnimationState::Reacting);
    }

    #[test]
    fn test_speech_owns_mouth_while_speaking() {
        let mut ctl = controller();
        let mut w = weight_set();
        ctl.speak("hello world", 0.0).expect("speakable");
        run(&mut ctl, &mut w, 0.0, 100.0);
        assert_eq!(ctl.channel_owner(), Subsystem::Speech);
        assert!(!w.set_weight_as(Subsystem::Idle, "jawOpen", 0.9));

        ctl.stop(100.0, &mut w);
        ctl.tick(116.0, &mut w);
        assert!(w.set_weight_as(Subsystem::Idle, "jawOpen", 0.9));
        assert_eq!(w.get_weight("jawOpen"), 0.9);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.scheduler.event_queue_capacity = 0;
        assert!(LipSyncController::new(MockSpeechEngine::default(), config).is_err());
    }
}
