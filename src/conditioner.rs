use crate::{EngineSettings, MotionEvent, RawInstruction, SettingsUpdate};

/// Converts a px delta into an item count via ceiling division.
///
/// `delta_y` and `content_height` are both finite and positive here, so the
/// truncate-and-correct form matches `ceil` without requiring std float intrinsics.
pub(crate) fn items_for_px(delta_y: f64, content_height: f64) -> u64 {
    let ratio = delta_y / content_height;
    let truncated = ratio as u64;
    let ceiled = if (truncated as f64) < ratio {
        truncated.saturating_add(1)
    } else {
        truncated
    };
    ceiled.max(1)
}

/// The raw engine: normalizes scroll/resize motion and buffer growth into a stream of
/// [`RawInstruction`]s.
///
/// This type is headless and caller-driven:
/// - feed it motion events via [`on_motion`](Self::on_motion) with your own `now_ms`
///   (any monotonic millisecond clock, virtual clocks included),
/// - feed it settings via [`apply_settings`](Self::apply_settings) /
///   [`apply_update`](Self::apply_update),
/// - and drive deferred debounce flushes with [`next_deadline`](Self::next_deadline) +
///   [`poll`](Self::poll).
///
/// Shaping pipeline, in order: merge & filter (only finite `delta_y > 0` qualifies),
/// debounce-with-accumulate (deltas within `debounce_ms` of the previous one are summed
/// and the flush is deferred until the window lapses without a new event), leading-edge
/// throttle (emissions inside the post-emission refractory window are dropped), and
/// px→count conversion (`ceil(delta_y / content_height)` when a usable content height is
/// configured, else a signal-only instruction).
///
/// Buffer growth bypasses debounce and throttle: each strictly-positive increase of the
/// `buffer` setting is converted directly into a sized instruction, returned from the
/// settings application itself.
#[derive(Clone, Debug, Default)]
pub struct SignalConditioner {
    settings: EngineSettings,
    /// Last seen `buffer` value; the shortfall signal is the positive diff against it.
    prev_buffer: f64,
    /// Accumulated `delta_y` awaiting a debounce flush.
    pending_delta: f64,
    /// When the pending delta flushes, if a window is armed.
    flush_at_ms: Option<u64>,
    /// Emissions scheduled before this instant are throttled away.
    throttle_open_ms: u64,
}

impl SignalConditioner {
    /// Creates a conditioner with default settings and a buffer baseline of 0, so the
    /// first applied settings value can already produce a shortfall signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a conditioner with `settings` as the baseline.
    ///
    /// Unlike [`apply_settings`](Self::apply_settings), this produces no shortfall
    /// signal: the given buffer value is the starting point to diff against.
    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            prev_buffer: settings.buffer(),
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The accumulated delta of the currently armed debounce window, if any.
    pub fn pending_delta(&self) -> f64 {
        self.pending_delta
    }

    /// When [`poll`](Self::poll) has work to do, if ever.
    pub fn next_deadline(&self) -> Option<u64> {
        self.flush_at_ms
    }

    /// Clears the debounce window and the throttle refractory state.
    ///
    /// Settings and the buffer baseline are kept.
    pub fn reset(&mut self) {
        self.pending_delta = 0.0;
        self.flush_at_ms = None;
        self.throttle_open_ms = 0;
    }

    /// Replaces the settings value and returns the buffer-shortfall instruction, if the
    /// buffer grew and a usable content height is configured.
    pub fn apply_settings(&mut self, settings: EngineSettings) -> Option<RawInstruction> {
        let prev = self.prev_buffer;
        self.settings = settings;
        self.prev_buffer = settings.buffer();

        let increase = settings.buffer() - prev;
        if increase <= 0.0 {
            return None;
        }
        let content_height = settings.effective_content_height()?;
        let quantity = items_for_px(increase, content_height);
        scdebug!(increase, quantity, "buffer shortfall");
        Some(RawInstruction::sized(quantity))
    }

    /// Merges a partial update over the current settings, then applies it.
    pub fn apply_update(&mut self, update: &SettingsUpdate) -> Option<RawInstruction> {
        let merged = self.settings.merge(update);
        self.apply_settings(merged)
    }

    /// Feeds one motion event at `now_ms`.
    ///
    /// A debounce window that lapsed at or before `now_ms` is settled first, so a call
    /// may return the flush of earlier deltas while the new delta arms a fresh window.
    /// Non-qualifying events (`delta_y <= 0`, NaN) only settle overdue work.
    pub fn on_motion(&mut self, event: MotionEvent, now_ms: u64) -> Option<RawInstruction> {
        if !event.qualifies() {
            sctrace!(delta_y = event.delta_y, now_ms, "motion filtered");
            return self.poll(now_ms);
        }

        let debounce = self.settings.debounce_ms();
        if debounce == 0 {
            if self.flush_at_ms.is_some_and(|at| now_ms >= at) {
                // A window armed under an earlier configuration settles at this
                // instant; the new delta joins its flush.
                self.pending_delta += event.delta_y;
                return self.poll(now_ms);
            }
            let flushed = self.poll(now_ms);
            debug_assert!(flushed.is_none());
            return self.emit(event.delta_y, now_ms);
        }

        let flushed = self.poll(now_ms);
        self.pending_delta += event.delta_y;
        self.flush_at_ms = Some(now_ms.saturating_add(debounce));
        sctrace!(
            pending_delta = self.pending_delta,
            flush_at_ms = ?self.flush_at_ms,
            "debounce armed"
        );
        flushed
    }

    /// Settles the debounce window if its deadline has passed.
    ///
    /// The flush is evaluated at the deadline instant, not at `now_ms`, so throttle
    /// bookkeeping is independent of how late the caller polls.
    pub fn poll(&mut self, now_ms: u64) -> Option<RawInstruction> {
        let at = self.flush_at_ms?;
        if now_ms < at {
            return None;
        }
        self.flush_at_ms = None;
        let delta = self.pending_delta;
        self.pending_delta = 0.0;
        self.emit(delta, at)
    }

    fn emit(&mut self, delta_y: f64, at_ms: u64) -> Option<RawInstruction> {
        if at_ms < self.throttle_open_ms {
            scdebug!(
                delta_y,
                at_ms,
                open_ms = self.throttle_open_ms,
                "throttled"
            );
            return None;
        }
        let throttle = self.settings.throttle_ms();
        if throttle > 0 {
            self.throttle_open_ms = at_ms.saturating_add(throttle);
        }

        let instruction = match self.settings.effective_content_height() {
            Some(h) => RawInstruction::sized(items_for_px(delta_y, h)),
            None => RawInstruction::signal_only(),
        };
        sctrace!(delta_y, at_ms, quantity = ?instruction.quantity, "emit");
        Some(instruction)
    }
}
