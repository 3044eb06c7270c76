//! A headless infinite-scroll fetch engine.
//!
//! This crate decides *when* and *how much* content to fetch for an infinite-scrolling
//! list. It turns raw continuous motion (scroll deltas, window-resize deltas) into
//! discrete, rate-limited, quantity-bounded fetch instructions, and layers a stateful
//! accumulation protocol on top to produce cursor-aware keyset-pagination requests
//! with backpressure against the in-flight fetch.
//!
//! Two engines, each a pure state machine over a caller-supplied millisecond clock:
//! - [`SignalConditioner`]: motion filtering, debounce-with-accumulate, leading-edge
//!   throttle, px→item-count conversion, buffer-shortfall signals.
//! - [`Paginator`]: signed surplus accumulation, floor/ceiling gating, chunking, and
//!   the rolling pagination cursor derived from fetched content.
//!
//! It is UI- and transport-agnostic. An adapter is expected to provide:
//! - scroll/resize events (push-based, any rate)
//! - partial settings updates
//! - the content batch of each completed fetch, fed back in to unblock the next
//!   instruction
//!
//! For callers that already hold a full ordered event log (tests, replays),
//! [`drive_conditioner`] and [`drive_paginator`] run a whole timeline in one go.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod conditioner;
mod driver;
mod error;
mod paginator;
mod settings;
mod types;


pub use conditioner::SignalConditioner;
pub use driver::{DriveOutcome, TimelineEvent, drive_conditioner, drive_paginator};
pub use error::SettingsError;
pub use paginator::{Paginator, PaginatorState};
pub use settings::{EngineSettings, PagerLimits, SettingsUpdate};
pub use types::{FetchInstruction, MotionEvent, RawInstruction, SortKey};
