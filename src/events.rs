//! Toolkit-agnostic UI event adapters.
//!
//! Two small listener shapes used around an avatar widget:
//!
//! - a seek-bar listener that only reacts to changes the *user* made
//!   ([`on_user_progress_change`]), and
//! - a one-shot callback that runs after the next layout pass
//!   ([`after_layout`]).
//!
//! Nothing here owns a window or an event loop. The host toolkit (or a
//! test) drives [`SeekBar`] and [`ViewTreeObserver`] directly.

use tracing::trace;

// ============================================================================
// Seek bar
// ============================================================================

/// Receives seek-bar notifications.
pub trait SeekBarListener {
    fn on_progress_changed(&mut self, progress: i32, from_user: bool);

    fn on_start_tracking_touch(&mut self) {}

    fn on_stop_tracking_touch(&mut self) {}
}

/// Listener that forwards progress to a closure, but only for user changes.
pub struct UserProgressFilter<F> {
    block: F,
}

impl<F: FnMut(i32)> SeekBarListener for UserProgressFilter<F> {
    fn on_progress_changed(&mut self, progress: i32, from_user: bool) {
        if from_user {
            (self.block)(progress);
        }
    }
}

/// Build a listener that calls `block` with the new progress whenever the
/// user (not the program) moves the seek bar.
pub fn on_user_progress_change<F: FnMut(i32)>(block: F) -> UserProgressFilter<F> {
    UserProgressFilter { block }
}

/// Minimal seek-bar state: progress in `0..=max` and one listener.
pub struct SeekBar {
    progress: i32,
    max: i32,
    listener: Option<Box<dyn SeekBarListener>>,
}

impl SeekBar {
    pub fn new(max: i32) -> Self {
        Self {
            progress: 0,
            max: max.max(0),
            listener: None,
        }
    }

    pub fn progress(&self) -> i32 {
        self.progress
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Replace the listener. Only one listener is attached at a time.
    pub fn set_listener(&mut self, listener: impl SeekBarListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Programmatic change.
    pub fn set_progress(&mut self, progress: i32) {
        self.update(progress, false);
    }

    /// Change caused by a drag or tap.
    pub fn user_set_progress(&mut self, progress: i32) {
        self.update(progress, true);
    }

    pub fn start_tracking_touch(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_start_tracking_touch();
        }
    }

    pub fn stop_tracking_touch(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_stop_tracking_touch();
        }
    }

    /// Clamp, store, and notify only when the value actually changed.
    fn update(&mut self, progress: i32, from_user: bool) {
        let progress = progress.clamp(0, self.max);
        if progress == self.progress {
            return;
        }
        self.progress = progress;
        trace!(progress, from_user, "seek bar progress changed");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_progress_changed(progress, from_user);
        }
    }
}

impl std::fmt::Debug for SeekBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeekBar")
            .field("progress", &self.progress)
            .field("max", &self.max)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

// ============================================================================
// Layout observer
// ============================================================================

/// What a global-layout listener wants after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerControl {
    Keep,
    Remove,
}

type LayoutListener = Box<dyn FnMut() -> ListenerControl>;

/// Registry of global-layout listeners for a view tree.
#[derive(Default)]
pub struct ViewTreeObserver {
    listeners: Vec<LayoutListener>,
}

impl ViewTreeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_on_global_layout_listener(
        &mut self,
        listener: impl FnMut() -> ListenerControl + 'static,
    ) {
        self.listeners.push(Box::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Run one layout pass: call every listener in registration order and
    /// drop those that asked to be removed.
    pub fn dispatch_global_layout(&mut self) {
        self.listeners
            .retain_mut(|listener| listener() == ListenerControl::Keep);
        trace!(remaining = self.listeners.len(), "global layout dispatched");
    }
}

impl std::fmt::Debug for ViewTreeObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewTreeObserver")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Run `block` once, after the next layout pass, then unregister.
pub fn after_layout(observer: &mut ViewTreeObserver, block: impl FnOnce() + 'static) {
    let mut block = Some(block);
    observer.add_on_global_layout_listener(move || {
        if let Some(block) = block.take() {
            block();
        }
        ListenerControl::Remove
    });
}
