use crate::{
    EngineSettings, FetchInstruction, MotionEvent, PagerLimits, RawInstruction, SettingsError,
    SettingsUpdate, SignalConditioner, SortKey,
};

/// A lightweight snapshot of the accumulator state, for adapters that want to surface
/// progress (items still owed, cursor position) in a UI.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaginatorState<K = SortKey> {
    pub pending_surplus: i64,
    pub cursor: Option<K>,
    pub awaiting_batch: bool,
}

/// The chained engine: accumulates conditioned fetch signals into gated, floor/ceiling-
/// bounded, cursor-aware [`FetchInstruction`]s.
///
/// A `Paginator` owns a [`SignalConditioner`] and layers the pagination protocol on top:
///
/// - Every sized raw signal adds to a signed pending surplus (quantity-less signals are
///   ignored; they only occur before a content height is configured).
/// - The surplus is not eligible to emit below `min_quantity`; it accumulates silently.
/// - While an emitted instruction has not been answered by a content batch, nothing
///   else is emitted; a candidate identical to the immediately preceding emitted
///   `(quantity, cursor)` pair is suppressed even after a batch, which stops a fetch
///   that advanced nothing from being replayed verbatim.
/// - An emission is bounded by `max_quantity` and the bounded amount is subtracted from
///   the surplus at emission time, so an oversized surplus drains in chunks as the
///   cursor advances.
/// - A non-empty content batch moves the cursor to its last sort key; any batch (empty
///   included) counts as the completion of the outstanding fetch.
///
/// Settings updates are merged then hard-validated; a failed validation is terminal and
/// every later call returns the same [`SettingsError`]. The caller closes the loop: each
/// returned instruction should result in one fetch whose batch is fed back through
/// [`on_content`](Self::on_content).
///
/// The cursor key type `K` defaults to [`SortKey`] but can be anything comparable and
/// cloneable (ids, timestamps, composite tuples).
#[derive(Clone, Debug)]
pub struct Paginator<K = SortKey> {
    conditioner: SignalConditioner,
    settings: EngineSettings,
    limits: Option<PagerLimits>,
    failure: Option<SettingsError>,
    pending_surplus: i64,
    cursor: Option<K>,
    last_emitted: Option<(u64, Option<K>)>,
    awaiting_batch: bool,
}

impl<K> Default for Paginator<K> {
    fn default() -> Self {
        Self {
            conditioner: SignalConditioner::new(),
            settings: EngineSettings::default(),
            limits: None,
            failure: None,
            pending_surplus: 0,
            cursor: None,
            last_emitted: None,
            awaiting_batch: false,
        }
    }
}

impl<K: Clone + PartialEq> Paginator<K> {
    /// Creates an unconfigured paginator.
    ///
    /// Until the first settings update arrives, motion is conditioned under defaults:
    /// without a content height the conditioner produces quantity-less signals, which
    /// the accumulator ignores, so nothing is emitted and nothing fails.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Validated limits of the current settings epoch, once configured.
    pub fn limits(&self) -> Option<PagerLimits> {
        self.limits
    }

    /// Items requested by the UI but not yet covered by an emitted instruction.
    pub fn pending_surplus(&self) -> i64 {
        self.pending_surplus
    }

    /// Last item's sort key of the most recent non-empty batch; `None` initially.
    pub fn cursor(&self) -> Option<&K> {
        self.cursor.as_ref()
    }

    /// Whether an emitted instruction is still waiting for its content batch.
    pub fn awaiting_batch(&self) -> bool {
        self.awaiting_batch
    }

    /// The terminal validation error, if one has occurred.
    pub fn failure(&self) -> Option<SettingsError> {
        self.failure
    }

    pub fn state(&self) -> PaginatorState<K> {
        PaginatorState {
            pending_surplus: self.pending_surplus,
            cursor: self.cursor.clone(),
            awaiting_batch: self.awaiting_batch,
        }
    }

    /// When [`poll`](Self::poll) has work to do, if ever.
    pub fn next_deadline(&self) -> Option<u64> {
        self.conditioner.next_deadline()
    }

    /// Clears accumulation, cursor, gating and conditioner shaping state.
    ///
    /// Settings are kept, and a terminal validation failure stays terminal.
    pub fn reset(&mut self) {
        self.pending_surplus = 0;
        self.cursor = None;
        self.last_emitted = None;
        self.awaiting_batch = false;
        self.conditioner.reset();
    }

    fn guard(&self) -> Result<(), SettingsError> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Merges and hard-validates a settings update.
    ///
    /// On success the new value is committed whole (never partially applied) and the
    /// call returns the instruction the update itself produced, if any: a buffer
    /// increase generates a shortfall signal, and relaxed limits can make the existing
    /// surplus eligible. On failure the paginator is terminally failed and the merged
    /// candidate is discarded.
    pub fn apply_settings(
        &mut self,
        update: &SettingsUpdate,
    ) -> Result<Option<FetchInstruction<K>>, SettingsError> {
        self.guard()?;
        let merged = self.settings.merge(update);
        let limits = match merged.validate() {
            Ok(limits) => limits,
            Err(err) => {
                scwarn!(error = %err, "settings rejected; pagination terminated");
                self.failure = Some(err);
                return Err(err);
            }
        };
        self.settings = merged;
        self.limits = Some(limits);

        let shortfall = self.conditioner.apply_settings(merged);
        if let Some(raw) = shortfall {
            self.absorb(raw);
        }
        Ok(self.try_emit())
    }

    /// Feeds one motion event at `now_ms`.
    pub fn on_motion(
        &mut self,
        event: MotionEvent,
        now_ms: u64,
    ) -> Result<Option<FetchInstruction<K>>, SettingsError> {
        self.guard()?;
        if let Some(raw) = self.conditioner.on_motion(event, now_ms) {
            self.absorb(raw);
        }
        Ok(self.try_emit())
    }

    /// Feeds an already-conditioned raw signal, bypassing the owned conditioner.
    pub fn on_raw(
        &mut self,
        raw: RawInstruction,
    ) -> Result<Option<FetchInstruction<K>>, SettingsError> {
        self.guard()?;
        self.absorb(raw);
        Ok(self.try_emit())
    }

    /// Feeds the content batch produced by a completed fetch.
    ///
    /// `batch` is the ordered sort keys of the fetched items. A non-empty batch moves
    /// the cursor to the last key; an empty batch only closes the outstanding fetch.
    pub fn on_content(&mut self, batch: &[K]) -> Result<Option<FetchInstruction<K>>, SettingsError> {
        self.guard()?;
        if let Some(last) = batch.last() {
            self.cursor = Some(last.clone());
            sctrace!(len = batch.len(), "cursor advanced");
        }
        self.awaiting_batch = false;
        Ok(self.try_emit())
    }

    /// Settles the conditioner's debounce deadline, if due.
    pub fn poll(&mut self, now_ms: u64) -> Result<Option<FetchInstruction<K>>, SettingsError> {
        self.guard()?;
        if let Some(raw) = self.conditioner.poll(now_ms) {
            self.absorb(raw);
        }
        Ok(self.try_emit())
    }

    fn absorb(&mut self, raw: RawInstruction) {
        match raw.quantity {
            Some(q) => {
                self.pending_surplus = self.pending_surplus.saturating_add(q as i64);
                sctrace!(quantity = q, pending_surplus = self.pending_surplus, "absorbed");
            }
            // Unsized signals carry no quantity to accumulate.
            None => sctrace!("quantity-less raw signal ignored"),
        }
    }

    fn try_emit(&mut self) -> Option<FetchInstruction<K>> {
        let limits = self.limits?;
        if self.awaiting_batch {
            return None;
        }
        if self.pending_surplus <= 0 {
            return None;
        }
        let surplus = self.pending_surplus as u64;
        if limits.min_quantity.is_some_and(|min| surplus < min) {
            return None;
        }
        let bounded = limits.max_quantity.map_or(surplus, |max| surplus.min(max));
        if self
            .last_emitted
            .as_ref()
            .is_some_and(|(q, c)| *q == bounded && *c == self.cursor)
        {
            scdebug!(quantity = bounded, "duplicate pair suppressed");
            return None;
        }

        self.pending_surplus -= bounded as i64;
        self.awaiting_batch = true;
        self.last_emitted = Some((bounded, self.cursor.clone()));
        scdebug!(
            quantity = bounded,
            pending_surplus = self.pending_surplus,
            "instruction emitted"
        );
        Some(FetchInstruction {
            quantity: bounded,
            after: self.cursor.clone(),
        })
    }
}
