use crate::fetch::Progress;
use core::fmt::{Debug, Formatter};
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::JoinHandle;

type MessageCallback = Box<dyn Fn() -> String + Send + Sync>;

/// Refresh rate for spinner updates (10 Hz).
const REFRESH_INTERVAL_MS: u64 = 100;

const TEMPLATE: &str = "{prefix:>12.bold.cyan} {spinner} {msg}";
const TEMPLATE_NO_COLOR: &str = "{prefix:>12} {spinner} {msg}";
const TICK_CHARS: &str = "|/-\\ ";

struct DelayedSpinnerState {
    visible_after: Instant,
    visible: AtomicBool,
    phase_start_time: Mutex<Instant>,
}

impl Debug for DelayedSpinnerState {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DelayedSpinnerState")
            .field("visible_after", &self.visible_after)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

/// A spinner on stderr that stays hidden until a fetch has run longer than a threshold.
#[derive(Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
    state: Arc<DelayedSpinnerState>,
    message_callback: Arc<Mutex<MessageCallback>>,
    refresh_task: Arc<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Create a new progress reporter.
    ///
    /// Must be called from within a tokio runtime, which drives the refresh task.
    #[must_use]
    pub fn new(delay: Duration, use_colors: bool) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_draw_target(ProgressDrawTarget::hidden());

        let template = if use_colors { TEMPLATE } else { TEMPLATE_NO_COLOR };
        bar.set_style(
            ProgressStyle::default_spinner()
                .template(template)
                .expect("could not create progress bar style")
                .tick_chars(TICK_CHARS),
        );

        let state = Arc::new(DelayedSpinnerState {
            visible_after: Instant::now() + delay,
            visible: AtomicBool::new(false),
            phase_start_time: Mutex::new(Instant::now()),
        });

        let message_callback = Arc::new(Mutex::new(Box::new(String::new) as MessageCallback));

        Self {
            refresh_task: Arc::new(tokio::spawn(refresh_task(
                bar.clone(),
                Arc::clone(&state),
                Arc::clone(&message_callback),
            ))),
            bar,
            state,
            message_callback,
        }
    }
}

impl Progress for ProgressReporter {
    fn set_phase(&self, phase: &str) {
        self.bar.set_prefix(phase.to_string());
        *self.state.phase_start_time.lock().expect("lock poisoned") = Instant::now();
    }

    fn set_indeterminate(&self, callback: Box<dyn Fn() -> String + Send + Sync + 'static>) {
        *self.message_callback.lock().expect("lock poisoned") = callback;
        self.bar.enable_steady_tick(Duration::from_millis(REFRESH_INTERVAL_MS));
    }

    fn done(&self) {
        self.refresh_task.abort();
        if self.state.visible.load(Ordering::Relaxed) {
            self.bar.finish_and_clear();
        }
    }
}

impl Debug for ProgressReporter {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("bar", &self.bar)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Background task that reveals the spinner once the delay has passed and refreshes its message.
async fn refresh_task(bar: ProgressBar, state: Arc<DelayedSpinnerState>, callback: Arc<Mutex<MessageCallback>>) {
    let mut interval = tokio::time::interval(Duration::from_millis(REFRESH_INTERVAL_MS));
    #[expect(clippy::infinite_loop, reason = "task runs until aborted")]
    loop {
        let _ = interval.tick().await;

        if !state.visible.load(Ordering::Relaxed) && Instant::now() >= state.visible_after {
            state.visible.store(true, Ordering::Relaxed);
            bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        }

        if state.visible.load(Ordering::Relaxed) {
            let message = {
                let callback_guard = callback.lock().expect("lock poisoned");
                callback_guard()
            };
            let elapsed_secs = state.phase_start_time.lock().expect("lock poisoned").elapsed().as_secs();
            bar.set_message(format!("{elapsed_secs}s: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hidden_reporter_accepts_updates() {
        let reporter = ProgressReporter::new(Duration::from_secs(3600), false);
        reporter.set_phase("Issues");
        reporter.set_indeterminate(Box::new(|| "3 item(s)".to_string()));
        reporter.done();
        assert!(!reporter.state.visible.load(Ordering::Relaxed));
    }
}
