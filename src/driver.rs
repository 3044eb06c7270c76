use alloc::vec::Vec;

use crate::{
    FetchInstruction, MotionEvent, Paginator, RawInstruction, SettingsError, SettingsUpdate,
    SignalConditioner, SortKey,
};

/// One timestamped input on the engine's single logical timeline.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimelineEvent<K = SortKey> {
    /// A scroll or resize tick.
    Motion { at_ms: u64, event: MotionEvent },
    /// The sort keys of a completed fetch's items, in order.
    Content { at_ms: u64, batch: Vec<K> },
    /// A partial settings update.
    Settings { at_ms: u64, update: SettingsUpdate },
}

impl<K> TimelineEvent<K> {
    pub fn at_ms(&self) -> u64 {
        match self {
            Self::Motion { at_ms, .. } | Self::Content { at_ms, .. } | Self::Settings { at_ms, .. } => {
                *at_ms
            }
        }
    }

    /// Simultaneous events apply settings first, so an event at the exact same
    /// instant never misses a newer setting.
    fn tie_rank(&self) -> u8 {
        match self {
            Self::Settings { .. } => 0,
            Self::Motion { .. } | Self::Content { .. } => 1,
        }
    }
}

/// The result of driving a [`Paginator`] over a timeline.
///
/// Instructions emitted before a terminal settings failure are kept; `error` records
/// the failure that ended the stream, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct DriveOutcome<K = SortKey> {
    pub instructions: Vec<FetchInstruction<K>>,
    pub error: Option<SettingsError>,
}

fn sort_timeline<K>(events: &mut [TimelineEvent<K>]) {
    // Stable, so same-instant events of equal rank keep their input order.
    events.sort_by_key(|e| (e.at_ms(), e.tie_rank()));
}

/// Runs a whole timeline through a [`SignalConditioner`] and collects every raw
/// instruction, firing debounce deadlines at their scheduled instants.
///
/// Content events are not an input of the raw engine and are skipped.
pub fn drive_conditioner<K>(mut events: Vec<TimelineEvent<K>>) -> Vec<RawInstruction> {
    sort_timeline(&mut events);

    let mut conditioner = SignalConditioner::new();
    let mut out = Vec::new();
    for event in &events {
        flush_due(&mut conditioner, event.at_ms(), &mut out);
        let emitted = match event {
            TimelineEvent::Motion { at_ms, event } => conditioner.on_motion(*event, *at_ms),
            TimelineEvent::Settings { update, .. } => conditioner.apply_update(update),
            TimelineEvent::Content { .. } => None,
        };
        out.extend(emitted);
    }
    flush_due(&mut conditioner, u64::MAX, &mut out);
    out
}

fn flush_due(conditioner: &mut SignalConditioner, up_to_ms: u64, out: &mut Vec<RawInstruction>) {
    while let Some(deadline) = conditioner.next_deadline() {
        if deadline > up_to_ms {
            break;
        }
        out.extend(conditioner.poll(deadline));
    }
}

/// Runs a whole timeline through a [`Paginator`].
///
/// The first settings validation failure ends the run; instructions emitted up to that
/// point are returned alongside the error.
pub fn drive_paginator<K: Clone + PartialEq>(mut events: Vec<TimelineEvent<K>>) -> DriveOutcome<K> {
    sort_timeline(&mut events);

    let mut paginator: Paginator<K> = Paginator::new();
    let mut instructions = Vec::new();
    for event in &events {
        while let Some(deadline) = paginator.next_deadline() {
            if deadline > event.at_ms() {
                break;
            }
            match paginator.poll(deadline) {
                Ok(emitted) => instructions.extend(emitted),
                Err(err) => return DriveOutcome { instructions, error: Some(err) },
            }
        }

        let result = match event {
            TimelineEvent::Motion { at_ms, event } => paginator.on_motion(*event, *at_ms),
            TimelineEvent::Content { batch, .. } => paginator.on_content(batch),
            TimelineEvent::Settings { update, .. } => paginator.apply_settings(update),
        };
        match result {
            Ok(emitted) => instructions.extend(emitted),
            Err(err) => return DriveOutcome { instructions, error: Some(err) },
        }
    }

    while let Some(deadline) = paginator.next_deadline() {
        match paginator.poll(deadline) {
            Ok(emitted) => instructions.extend(emitted),
            Err(err) => return DriveOutcome { instructions, error: Some(err) },
        }
    }

    DriveOutcome {
        instructions,
        error: None,
    }
}
