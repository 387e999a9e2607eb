//! C FFI: drives the lip-sync controller from a native host (Swift, Kotlin,
//! C++ game engines).
//!
//! Functions are `#[no_mangle] extern "C"`.  The host supplies two callbacks
//! that wrap its platform speech engine; the engine reports progress back
//! through the `visemer_on_*` functions using the opaque `token` it was given.
//!
//! ## Threading
//!
//! `visemer_on_*` may be called from any thread: they only push onto a
//! bounded queue.  Every other function serialises on an internal lock.
//!
//! The host's speak and cancel callbacks run while that lock is held.  From
//! inside them only `visemer_on_*` may be called; any other `visemer_*`
//! function on the same handle deadlocks.
//!
//! ## Memory contract
//!
//! | Function                 | Caller frees with        |
//! |--------------------------|--------------------------|
//! | [`visemer_new`]          | [`visemer_free`]         |
//! | [`visemer_speak`]        | [`visemer_free_error`]   |

use std::ffi::{c_char, c_void, CStr, CString};
use std::sync::{Mutex, MutexGuard};

use tracing::error;

use crate::config::EngineConfig;
use crate::controller::LipSyncController;
use crate::error::{LipSyncError, Result};
use crate::speech::{EventSink, SegmentToken, SpeechEngine, SpeechEventSender, SpeechHandle};
use crate::state::AnimationState;
use crate::weights::ViewportWeightSet;

// ─────────────────────────────────────────────────────────────────────────────
// Host engine
// ─────────────────────────────────────────────────────────────────────────────

/// Start speaking `text`.  Return 0 on success, anything else on failure.
pub type SpeakCallback = extern "C" fn(user_data: *mut c_void, text: *const c_char, token: u64) -> i32;

/// Stop the current utterance.  Must be safe to call when idle.
pub type CancelCallback = extern "C" fn(user_data: *mut c_void);

/// [`SpeechEngine`] backed by host callbacks.
pub struct HostSpeechEngine {
    speak: SpeakCallback,
    cancel: CancelCallback,
    user_data: *mut c_void,
}

impl SpeechEngine for HostSpeechEngine {
    fn speak(&mut self, text: &str, events: SpeechEventSender) -> Result<SpeechHandle> {
        let c_text = CString::new(text).map_err(|_| LipSyncError::Speech("text contains a nul byte".into()))?;
        let token = events.token().to_bits();
        match (self.speak)(self.user_data, c_text.as_ptr(), token) {
            0 => Ok(SpeechHandle(token)),
            code => Err(LipSyncError::Speech(format!("host speak callback returned {}", code))),
        }
    }

    fn cancel(&mut self) {
        (self.cancel)(self.user_data);
    }
}

/// Opaque handle to a controller and its weight set.
pub struct VisemerHandle {
    inner: Mutex<Inner>,
    sink: EventSink,
}

struct Inner {
    controller: LipSyncController<HostSpeechEngine>,
    weights: ViewportWeightSet,
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

/// Heap-allocate an owned C string.  Returns null on interior nul bytes.
fn to_c_str(s: &str) -> *const c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => std::ptr::null(),
    }
}

unsafe fn handle<'a>(ptr: *const VisemerHandle) -> Option<&'a VisemerHandle> {
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { &*ptr })
    }
}

fn lock(h: &VisemerHandle) -> MutexGuard<'_, Inner> {
    h.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

/// Create a controller.
///
/// @param config_json  UTF-8 JSON config, or `NULL` for defaults.  Missing
///                     keys keep their defaults.
/// @param speak        Host speak callback.
/// @param cancel       Host cancel callback.
/// @param user_data    Passed back to both callbacks unchanged.
/// @return             Handle, or `NULL` on an invalid config (logged).
///                     Free with [`visemer_free`].
#[no_mangle]
pub unsafe extern "C" fn visemer_new(
    config_json: *const c_char,
    speak: SpeakCallback,
    cancel: CancelCallback,
    user_data: *mut c_void,
) -> *mut VisemerHandle {
    let config = match unsafe { cstr_to_string(config_json) } {
        Some(json) => match EngineConfig::from_json_str(&json) {
            Ok(config) => config,
            Err(e) => {
                error!("visemer_new: {e}");
                return std::ptr::null_mut();
            }
        },
        None => EngineConfig::default(),
    };

    let engine = HostSpeechEngine { speak, cancel, user_data };
    match LipSyncController::new(engine, config) {
        Ok(controller) => {
            let sink = controller.event_sink();
            let inner = Inner { controller, weights: ViewportWeightSet::with_managed_channels() };
            Box::into_raw(Box::new(VisemerHandle { inner: Mutex::new(inner), sink }))
        }
        Err(e) => {
            error!("visemer_new: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Destroy a handle.  The host must not invoke callbacks for it afterwards.
#[no_mangle]
pub unsafe extern "C" fn visemer_free(h: *mut VisemerHandle) {
    if !h.is_null() {
        drop(unsafe { Box::from_raw(h) });
    }
}

/// Free an error string returned by [`visemer_speak`].
#[no_mangle]
pub unsafe extern "C" fn visemer_free_error(s: *const c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s as *mut c_char) });
    }
}

// ─── Requests ────────────────────────────────────────────────────────────────

/// Speak `text`, cancelling anything in progress.
///
/// @return  `NULL` on success; otherwise an error message to release with
///          [`visemer_free_error`].
#[no_mangle]
pub unsafe extern "C" fn visemer_speak(h: *const VisemerHandle, text: *const c_char, now_ms: f64) -> *const c_char {
    let Some(h) = (unsafe { handle(h) }) else {
        return to_c_str("null handle");
    };
    let Some(text) = (unsafe { cstr_to_string(text) }) else {
        return to_c_str("null text");
    };
    match lock(h).controller.speak(&text, now_ms) {
        Ok(()) => std::ptr::null(),
        Err(e) => to_c_str(&e.to_string()),
    }
}

/// Stop immediately and zero the mouth channels.
#[no_mangle]
pub unsafe extern "C" fn visemer_stop(h: *const VisemerHandle, now_ms: f64) {
    if let Some(h) = unsafe { handle(h) } {
        let mut guard = lock(h);
        let inner = &mut *guard;
        inner.controller.stop(now_ms, &mut inner.weights);
    }
}

/// Start a reaction of `duration_ms`.  Returns `false` unless idle.
#[no_mangle]
pub unsafe extern "C" fn visemer_react(h: *const VisemerHandle, duration_ms: f64, now_ms: f64) -> bool {
    match unsafe { handle(h) } {
        Some(h) => lock(h).controller.react(duration_ms, now_ms),
        None => false,
    }
}

// ─── Frame loop ──────────────────────────────────────────────────────────────

/// Advance to host time `now_ms`.  Call once per rendered frame.
#[no_mangle]
pub unsafe extern "C" fn visemer_tick(h: *const VisemerHandle, now_ms: f64) {
    if let Some(h) = unsafe { handle(h) } {
        let mut guard = lock(h);
        let inner = &mut *guard;
        inner.controller.tick(now_ms, &mut inner.weights);
    }
}

/// Current weight of an ARKit channel such as `"jawOpen"`; 0 if unknown.
#[no_mangle]
pub unsafe extern "C" fn visemer_get_weight(h: *const VisemerHandle, name: *const c_char) -> f32 {
    let (Some(h), Some(name)) = (unsafe { handle(h) }, unsafe { cstr_to_string(name) }) else {
        return 0.0;
    };
    lock(h).weights.get_weight(&name)
}

/// 0 idle, 1 returning, 2 speaking, 3 reacting; -1 for a null handle.
#[no_mangle]
pub unsafe extern "C" fn visemer_state(h: *const VisemerHandle) -> i32 {
    match unsafe { handle(h) } {
        Some(h) => match lock(h).controller.state() {
            AnimationState::Idle => 0,
            AnimationState::Returning => 1,
            AnimationState::Speaking => 2,
            AnimationState::Reacting => 3,
        },
        None => -1,
    }
}

// ─── Engine callbacks ────────────────────────────────────────────────────────

unsafe fn sender(h: *const VisemerHandle, token: u64) -> Option<SpeechEventSender> {
    unsafe { handle(h) }.map(|h| h.sink.sender(SegmentToken::from_bits(token)))
}

#[no_mangle]
pub unsafe extern "C" fn visemer_on_start(h: *const VisemerHandle, token: u64) {
    if let Some(tx) = unsafe { sender(h, token) } {
        tx.on_start();
    }
}

/// Word boundary at character `char_index` of the text passed to `speak`.
#[no_mangle]
pub unsafe extern "C" fn visemer_on_word_boundary(
    h: *const VisemerHandle,
    token: u64,
    char_index: u32,
    char_length: u32,
) {
    if let Some(tx) = unsafe { sender(h, token) } {
        tx.on_word_boundary(char_index as usize, char_length as usize);
    }
}

/// Same as [`visemer_on_word_boundary`] with the engine's own
/// segment-relative timestamp.
#[no_mangle]
pub unsafe extern "C" fn visemer_on_word_boundary_at(
    h: *const VisemerHandle,
    token: u64,
    char_index: u32,
    char_length: u32,
    elapsed_ms: f64,
) {
    if let Some(tx) = unsafe { sender(h, token) } {
        tx.on_word_boundary_at(char_index as usize, char_length as usize, elapsed_ms);
    }
}

#[no_mangle]
pub unsafe extern "C" fn visemer_on_end(h: *const VisemerHandle, token: u64) {
    if let Some(tx) = unsafe { sender(h, token) } {
        tx.on_end();
    }
}

#[no_mangle]
pub unsafe extern "C" fn visemer_on_error(h: *const VisemerHandle, token: u64, reason: *const c_char) {
    if let Some(tx) = unsafe { sender(h, token) } {
        let reason = unsafe { cstr_to_string(reason) }.unwrap_or_else(|| "unknown error".to_string());
        tx.on_error(reason);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct HostLog {
        spoken: Vec<(String, u64)>,
        cancels: usize,
    }

    extern "C" fn record_speak(user_data: *mut c_void, text: *const c_char, token: u64) -> i32 {
        let log = unsafe { &mut *(user_data as *mut HostLog) };
        let text = unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned();
        log.spoken.push((text, token));
        0
    }

    extern "C" fn refuse_speak(_: *mut c_void, _: *const c_char, _: u64) -> i32 {
        7
    }

    extern "C" fn record_cancel(user_data: *mut c_void) {
        let log = unsafe { &mut *(user_data as *mut HostLog) };
        log.cancels += 1;
    }

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    #[test]
    fn test_round_trip_through_c_api() {
        let mut log = HostLog::default();
        let user = &mut log as *mut HostLog as *mut c_void;
        unsafe {
            let h = visemer_new(std::ptr::null(), record_speak, record_cancel, user);
            assert!(!h.is_null());
            assert_eq!(visemer_state(h), 0);

            let text = c("hello world");
            assert!(visemer_speak(h, text.as_ptr(), 0.0).is_null());
            visemer_tick(h, 0.0);
            assert_eq!(visemer_state(h), 2);

            let (spoken, token) = (&(*(user as *mut HostLog)).spoken)[0].clone();
            assert_eq!(spoken, "hello world");
            visemer_on_start(h, token);
            visemer_on_word_boundary(h, token, 6, 5);
            let mut t = 16.0;
            while t < 200.0 {
                visemer_tick(h, t);
                t += 16.0;
            }
            let jaw = c("jawOpen");
            assert!(visemer_get_weight(h, jaw.as_ptr()) > 0.0);

            visemer_stop(h, t);
            assert_eq!(visemer_get_weight(h, jaw.as_ptr()), 0.0);
            assert_eq!(visemer_state(h), 0);
            assert_eq!((*(user as *mut HostLog)).cancels, 1);
            visemer_free(h);
        }
    }

    struct Reentrant {
        handle: *const VisemerHandle,
        cancels: usize,
    }

    extern "C" fn end_immediately(user_data: *mut c_void, _: *const c_char, token: u64) -> i32 {
        let host = unsafe { &*(user_data as *const Reentrant) };
        unsafe {
            visemer_on_start(host.handle, token);
            visemer_on_end(host.handle, token);
        }
        0
    }

    extern "C" fn count_cancel(user_data: *mut c_void) {
        let host = unsafe { &mut *(user_data as *mut Reentrant) };
        host.cancels += 1;
    }

    #[test]
    fn test_callbacks_may_report_from_inside_speak() {
        let mut host = Reentrant { handle: std::ptr::null(), cancels: 0 };
        let user = &mut host as *mut Reentrant as *mut c_void;
        unsafe {
            let h = visemer_new(std::ptr::null(), end_immediately, count_cancel, user);
            assert!(!h.is_null());
            (*(user as *mut Reentrant)).handle = h;

            let text = c("hi");
            assert!(visemer_speak(h, text.as_ptr(), 0.0).is_null());
            let mut t = 0.0;
            while t < 1_000.0 {
                visemer_tick(h, t);
                t += 16.0;
            }
            // Ended by the queued callback, well before the watchdog.
            assert_eq!(visemer_state(h), 0);
            assert_eq!((*(user as *mut Reentrant)).cancels, 0);
            visemer_free(h);
        }
    }

    #[test]
    fn test_errors_returned_as_strings() {
        let mut log = HostLog::default();
        let user = &mut log as *mut HostLog as *mut c_void;
        unsafe {
            let h = visemer_new(std::ptr::null(), refuse_speak, record_cancel, user);
            let empty = c("?!");
            let err = visemer_speak(h, empty.as_ptr(), 0.0);
            assert!(!err.is_null());
            let msg = CStr::from_ptr(err).to_string_lossy().into_owned();
            assert!(msg.contains("empty input"), "got: {}", msg);
            visemer_free_error(err);

            let text = c("hi");
            assert!(visemer_speak(h, text.as_ptr(), 0.0).is_null());
            visemer_tick(h, 0.0);
            visemer_tick(h, 16.0);
            assert_eq!(visemer_state(h), 0);
            visemer_free(h);
        }
    }

    #[test]
    fn test_bad_config_yields_null() {
        let json = c(r#"{ "clamp": { "jaw_threshold": 0.0 } }"#);
        let h = unsafe { visemer_new(json.as_ptr(), refuse_speak, record_cancel, std::ptr::null_mut()) };
        assert!(h.is_null());
    }

    #[test]
    fn test_null_handles_tolerated() {
        unsafe {
            assert_eq!(visemer_state(std::ptr::null()), -1);
            assert!(!visemer_react(std::ptr::null(), 100.0, 0.0));
            visemer_tick(std::ptr::null(), 0.0);
            visemer_on_end(std::ptr::null(), 0);
            let err = visemer_speak(std::ptr::null(), std::ptr::null(), 0.0);
            assert!(!err.is_null());
            visemer_free_error(err);
        }
    }
}
