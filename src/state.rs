//! # Per-content-type progress state.
//!
//! The watcher tracks two cursors per content type:
//!
//! - `lastRequestTime`: the upper bound of the most recently satisfied
//!   content-list query.
//! - `lastContentCreated`: the creation time of the newest descriptor
//!   whose records were emitted.
//!
//! Both cursors only ever move forward; concurrent workers read and
//! write them through [`State`]. [`MemoryState`] additionally round-trips
//! the cursors through a JSON blob so a restarted watcher resumes where
//! it left off instead of re-emitting or skipping records.

use std::collections::HashMap;
use std::io;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content_type::ContentType;
use crate::error::StateError;

/// Storage for watcher progress cursors.
///
/// Setters are write-if-later: a timestamp is stored only when it is
/// strictly after the current value, so cursors never move backward.
/// Getters return `None` for content types never seen.
pub trait State: Send + Sync + 'static {
    fn set_last_content_created(&self, ct: ContentType, t: DateTime<Utc>);
    fn last_content_created(&self, ct: ContentType) -> Option<DateTime<Utc>>;
    fn set_last_request_time(&self, ct: ContentType, t: DateTime<Utc>);
    fn last_request_time(&self, ct: ContentType) -> Option<DateTime<Utc>>;
}

/// In-memory [`State`] implementation with JSON persistence.
///
/// One reader-writer lock per mapping, held only across the map access
/// itself; no lock is ever held across a suspension point.
#[derive(Debug, Default)]
pub struct MemoryState {
    created: RwLock<HashMap<ContentType, DateTime<Utc>>>,
    requested: RwLock<HashMap<ContentType, DateTime<Utc>>>,
}

/// Serialized form of [`MemoryState`], keyed by canonical content-type
/// name.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateData {
    #[serde(rename = "LastContentCreated", default)]
    last_content_created: HashMap<ContentType, DateTime<Utc>>,
    #[serde(rename = "LastRequestTime", default)]
    last_request_time: HashMap<ContentType, DateTime<Utc>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a JSON blob and replaces the internal state with it.
    ///
    /// Decoding happens into a staging structure first; the stored maps
    /// are swapped only on success, so a malformed blob leaves the store
    /// at its previous (typically zero) state. Callers treat the error
    /// as "start fresh".
    pub fn read(&self, reader: impl io::Read) -> Result<(), StateError> {
        let blob: StateData = serde_json::from_reader(reader)?;
        *self.created.write().unwrap_or_else(PoisonError::into_inner) = blob.last_content_created;
        *self.requested.write().unwrap_or_else(PoisonError::into_inner) = blob.last_request_time;
        Ok(())
    }

    /// Serializes the internal state as a JSON blob.
    pub fn write(&self, writer: impl io::Write) -> Result<(), StateError> {
        let blob = StateData {
            last_content_created: self
                .created
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            last_request_time: self
                .requested
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        };
        serde_json::to_writer(writer, &blob)?;
        Ok(())
    }
}

impl State for MemoryState {
    fn set_last_content_created(&self, ct: ContentType, t: DateTime<Utc>) {
        set_if_later(&self.created, ct, t);
    }

    fn last_content_created(&self, ct: ContentType) -> Option<DateTime<Utc>> {
        self.created
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&ct)
            .copied()
    }

    fn set_last_request_time(&self, ct: ContentType, t: DateTime<Utc>) {
        set_if_later(&self.requested, ct, t);
    }

    fn last_request_time(&self, ct: ContentType) -> Option<DateTime<Utc>> {
        self.requested
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&ct)
            .copied()
    }
}

fn set_if_later(
    map: &RwLock<HashMap<ContentType, DateTime<Utc>>>,
    ct: ContentType,
    t: DateTime<Utc>,
) {
    let mut map = map.write().unwrap_or_else(PoisonError::into_inner);
    let entry = map.entry(ct).or_insert(t);
    if *entry < t {
        *entry = t;
    }
}
