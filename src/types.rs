use alloc::vec::Vec;

/// A single scroll or resize tick reported by the UI layer.
///
/// Only a finite `delta_y > 0` (scrolling down / window growing taller) qualifies as a
/// fetch trigger; everything else is filtered out, not rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionEvent {
    pub delta_x: f64,
    pub delta_y: f64,
    pub delta_z: f64,
}

impl MotionEvent {
    /// Creates a vertical-only motion event.
    pub fn vertical(delta_y: f64) -> Self {
        Self {
            delta_x: 0.0,
            delta_y,
            delta_z: 0.0,
        }
    }

    /// Whether this event can trigger a fetch.
    pub fn qualifies(&self) -> bool {
        self.delta_y.is_finite() && self.delta_y > 0.0
    }
}

/// A conditioned fetch signal produced by [`crate::SignalConditioner`].
///
/// `quantity: None` means "more content is warranted, amount unspecified" — this is what
/// the conditioner emits when no content height is configured. A present quantity is
/// always ≥ 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawInstruction {
    pub quantity: Option<u64>,
}

impl RawInstruction {
    pub fn sized(quantity: u64) -> Self {
        Self {
            quantity: Some(quantity),
        }
    }

    pub fn signal_only() -> Self {
        Self { quantity: None }
    }
}

/// A cursor-aware fetch instruction produced by [`crate::Paginator`].
///
/// `after: None` is the initial empty cursor; once a non-empty content batch has landed,
/// `after` carries the last item's sort key of the most recent batch.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchInstruction<K = SortKey> {
    /// Number of items to request, ≥ 1 and bounded by `max_quantity` when set.
    pub quantity: u64,
    /// Keyset-pagination cursor: request items after this sort key.
    pub after: Option<K>,
}

/// Default cursor key type: an ordered tuple of sort values, as delivered by backends
/// that paginate over composite sort keys.
pub type SortKey = Vec<f64>;
