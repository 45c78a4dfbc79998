//! Nearest-in-time state resolution.
//!
//! For every requested field the resolver keeps two candidates while it
//! scans: the `after` value of the latest event at or before the target and
//! the `before` value of the earliest event strictly after it. Both describe
//! the same steady-state value, so when both exist they have to agree.
//!
//! An event stamped exactly at the target has already happened: its `after`
//! counts on the preceding side and its `before` is ignored. Ties on
//! `changeTime` keep the candidate seen first in the stream.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::Serialize;
use time::OffsetDateTime;

use crate::clock::format_seconds;
use crate::error::{DataError, Error, Result};
use crate::event::{values_agree, ChangeEvent, FieldMap, FieldValue};

/// A candidate value together with the event time it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldObservation {
    pub value: FieldValue,
    pub observed_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Preceding,
    Following,
}

impl Side {
    fn as_str(self) -> &'static str {
        match self {
            Side::Preceding => "preceding",
            Side::Following => "following",
        }
    }

    /// Whether an event at `at` lies on this side of `target`.
    fn contains(self, at: OffsetDateTime, target: OffsetDateTime) -> bool {
        match self {
            Side::Preceding => at <= target,
            Side::Following => at > target,
        }
    }

    /// Whether `at` is strictly nearer to the target than `current`.
    fn closer(self, at: OffsetDateTime, current: OffsetDateTime) -> bool {
        match self {
            Side::Preceding => at > current,
            Side::Following => at < current,
        }
    }
}

/// Final per-field values at the query instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedState {
    pub state: BTreeMap<String, FieldValue>,
    pub at: OffsetDateTime,
}

impl ResolvedState {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.state.get(field)
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn to_output(&self) -> StateOutput {
        StateOutput {
            state: self.state.clone(),
            ts: format_seconds(self.at),
        }
    }
}

/// Wire shape of a resolved state: `{"state": {...}, "ts": "YYYY-MM-DDTHH:MM:SS"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateOutput {
    pub state: BTreeMap<String, FieldValue>,
    pub ts: String,
}

/// Single-query accumulator. Memory is bounded by two observations per
/// requested field regardless of how many events are fed in.
#[derive(Debug)]
pub struct StateResolver {
    fields: BTreeSet<String>,
    target: OffsetDateTime,
    preceding: BTreeMap<String, FieldObservation>,
    following: BTreeMap<String, FieldObservation>,
    events_seen: u64,
}

impl StateResolver {
    pub fn new<I, S>(fields: I, target: OffsetDateTime) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut requested = BTreeSet::new();
        for field in fields {
            let field = field.into();
            if field.is_empty() {
                return Err(Error::InvalidInput("field names must not be empty".to_string()));
            }
            requested.insert(field);
        }
        if requested.is_empty() {
            return Err(Error::InvalidInput("at least one field is required".to_string()));
        }

        Ok(Self {
            fields: requested,
            target,
            preceding: BTreeMap::new(),
            following: BTreeMap::new(),
            events_seen: 0,
        })
    }

    pub fn events_seen(&self) -> u64 {
        self.events_seen
    }

    pub fn observe(&mut self, event: &ChangeEvent) {
        self.events_seen += 1;
        let at = event.change_time;
        if Side::Preceding.contains(at, self.target) {
            offer(
                Side::Preceding,
                &self.fields,
                &mut self.preceding,
                &event.after,
                at,
            );
        } else if Side::Following.contains(at, self.target) {
            offer(
                Side::Following,
                &self.fields,
                &mut self.following,
                &event.before,
                at,
            );
        }
    }

    pub fn preceding(&self, field: &str) -> Option<&FieldObservation> {
        self.preceding.get(field)
    }

    pub fn following(&self, field: &str) -> Option<&FieldObservation> {
        self.following.get(field)
    }

    /// Reconciles both sides into the final state.
    pub fn finish(self) -> Result<ResolvedState> {
        let StateResolver {
            fields,
            target,
            preceding,
            mut following,
            ..
        } = self;

        let mut state = BTreeMap::new();
        for (field, earlier) in preceding {
            if let Some(later) = following.remove(&field) {
                if !values_agree(&earlier.value, &later.value) {
                    return Err(DataError::Conflict {
                        field,
                        preceding: earlier.value,
                        following: later.value,
                    }
                    .into());
                }
            }
            state.insert(field, earlier.value);
        }
        for (field, later) in following {
            state.insert(field, later.value);
        }

        if state.is_empty() {
            return Err(DataError::NoData {
                fields: fields.into_iter().collect(),
            }
            .into());
        }

        Ok(ResolvedState { state, at: target })
    }
}

fn offer(
    side: Side,
    fields: &BTreeSet<String>,
    nearest: &mut BTreeMap<String, FieldObservation>,
    values: &FieldMap,
    at: OffsetDateTime,
) {
    for (field, value) in values {
        if !fields.contains(field) {
            continue;
        }
        let replace = match nearest.get(field) {
            None => true,
            Some(current) => side.closer(at, current.observed_at),
        };
        if replace {
            debug!("{} {} => {} (at {})", side.as_str(), field, value, at);
            nearest.insert(
                field.clone(),
                FieldObservation {
                    value: value.clone(),
                    observed_at: at,
                },
            );
        }
    }
}

/// Resolves `fields` at `target` from an in-memory sequence of events.
pub fn resolve_state<I, F, S>(events: I, fields: F, target: OffsetDateTime) -> Result<ResolvedState>
where
    I: IntoIterator<Item = ChangeEvent>,
    F: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut resolver = StateResolver::new(fields, target)?;
    for event in events {
        resolver.observe(&event);
    }
    resolver.finish()
}

/// Like [`resolve_state`], over a fallible stream; the first stream error
/// aborts the scan.
pub fn resolve_stream<I, F, S>(events: I, fields: F, target: OffsetDateTime) -> Result<ResolvedState>
where
    I: IntoIterator<Item = Result<ChangeEvent>>,
    F: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut resolver = StateResolver::new(fields, target)?;
    for event in events {
        resolver.observe(&event?);
    }
    debug!("scanned {} events", resolver.events_seen());
    resolver.finish()
}
