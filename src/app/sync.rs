use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Broadcast port for the timeline month. Publishing is fire-and-forget and
/// receiving is best-effort; validation and manual-override suppression live
/// in the clock, not here.
pub trait MonthChannel {
    fn publish(&mut self, month: u32);

    /// Next externally-set month, if another process changed it since the
    /// last poll. Values are returned raw; the caller validates range.
    fn poll(&mut self) -> Option<f64>;
}

/// Channel used when no sync transport is configured.
#[derive(Default)]
pub struct NullMonthChannel;

impl MonthChannel for NullMonthChannel {
    fn publish(&mut self, _month: u32) {}

    fn poll(&mut self) -> Option<f64> {
        None
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SyncPayload {
    month: f64,
    seq: u64,
    origin: u64,
}

/// Cross-process month sync over a shared JSON file. Each process tags its
/// writes with a random origin id so it never re-applies its own broadcasts;
/// unreadable or malformed files are treated as silence.
pub struct FileMonthChannel {
    path: PathBuf,
    origin: u64,
    seq: u64,
    last_seen: Option<(u64, u64)>,
}

impl FileMonthChannel {
    pub fn new(path: PathBuf) -> Self {
        Self::with_origin(path, rand::random())
    }

    fn with_origin(path: PathBuf, origin: u64) -> Self {
        Self {
            path,
            origin,
            seq: 0,
            last_seen: None,
        }
    }
}

impl MonthChannel for FileMonthChannel {
    fn publish(&mut self, month: u32) {
        self.seq += 1;
        let payload = SyncPayload {
            month: month as f64,
            seq: self.seq,
            origin: self.origin,
        };
        if let Ok(serialized) = serde_json::to_vec(&payload) {
            let _ = fs::write(&self.path, serialized);
        }
    }

    fn poll(&mut self) -> Option<f64> {
        let raw = fs::read(&self.path).ok()?;
        let payload: SyncPayload = serde_json::from_slice(&raw).ok()?;
        if payload.origin == self.origin {
            return None;
        }

        let stamp = (payload.origin, payload.seq);
        if self.last_seen == Some(stamp) {
            return None;
        }
        self.last_seen = Some(stamp);
        Some(payload.month)
    }
}
