//! Undo/Redo history.
//!
//! A bounded, linear list of full-state snapshots with a cursor. Recording
//! after an undo discards everything past the cursor (no branching). When the
//! list grows past capacity the oldest snapshot is evicted.
//!
//! Restoring a snapshot puts the engine in a replaying state. Records
//! requested while replaying are suppressed so the restore itself is never
//! captured as a new action. How replay ends depends on `ReplayGuard`:
//!
//! - `Observed`: when the store reports a revision newer than the one seen at
//!   the start of the restore.
//! - `Timed { settle_ms }`: on the first `tick` at or after start + settle.
//!
//! Drag gestures record lazily: `schedule` queues a label with a due time and
//! `tick` writes it once due. Any immediate record, undo or redo flushes the
//! queue first so history order matches action order.

use caption_core::config::{EditorConfig, ReplayGuard};
use caption_core::id::LayerId;
use caption_core::model::TextLayer;
use caption_core::store::LayerStore;
use std::collections::VecDeque;

/// One immutable snapshot of the layer store.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState {
    pub layers: Vec<TextLayer>,
    pub selected: Option<LayerId>,
    pub timestamp: u64,
    pub action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplayState {
    Idle,
    Replaying { since_revision: u64, started_ms: u64 },
}

/// A record waiting for its settle delay.
#[derive(Debug, Clone)]
struct PendingRecord {
    action: String,
    due_ms: u64,
    epoch: u64,
}

pub struct HistoryEngine {
    entries: VecDeque<HistoryState>,
    /// Index of the active snapshot; `None` while empty.
    cursor: Option<usize>,
    capacity: usize,
    guard: ReplayGuard,
    replay: ReplayState,
    /// Bumped on every restore. Pending records from an older epoch are stale.
    epoch: u64,
    pending: Vec<PendingRecord>,
}

impl HistoryEngine {
    pub fn new(capacity: usize, guard: ReplayGuard) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            cursor: None,
            capacity,
            guard,
            replay: ReplayState::Idle,
            epoch: 0,
            pending: Vec::new(),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.history_capacity, config.replay_guard)
    }

    // ─── Recording ───────────────────────────────────────────────────────

    /// Snapshot the store under `action`. Returns whether an entry was
    /// written (`false` while replaying).
    pub fn record(&mut self, store: &LayerStore, action: &str, now_ms: u64) -> bool {
        self.flush(store, now_ms);
        self.push(store, action, now_ms)
    }

    /// Queue a record to be written at `due_ms`. Refused while replaying.
    pub fn schedule(&mut self, action: &str, due_ms: u64) -> bool {
        if self.is_replaying() {
            log::warn!("history: not scheduling {action:?} during replay");
            return false;
        }
        log::debug!("history: {action:?} due at {due_ms}");
        self.pending.push(PendingRecord {
            action: action.to_owned(),
            due_ms,
            epoch: self.epoch,
        });
        true
    }

    /// Write every queued record now, in queue order.
    pub fn flush(&mut self, store: &LayerStore, now_ms: u64) {
        for record in std::mem::take(&mut self.pending) {
            self.write_pending(store, record, now_ms);
        }
    }

    /// Advance timers: lift a timed replay guard, then write due records.
    pub fn tick(&mut self, store: &LayerStore, now_ms: u64) {
        if let (ReplayGuard::Timed { settle_ms }, ReplayState::Replaying { started_ms, .. }) =
            (self.guard, self.replay)
            && now_ms >= started_ms.saturating_add(settle_ms)
        {
            log::debug!("history: replay settled after {settle_ms}ms");
            self.replay = ReplayState::Idle;
        }

        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|r| r.due_ms <= now_ms);
        self.pending = later;
        for record in due {
            self.write_pending(store, record, now_ms);
        }
    }

    /// Store-mutation observer: end an `Observed` replay once the store has
    /// moved past the revision seen at the start of the restore.
    pub fn observe(&mut self, revision: u64) {
        if let (ReplayGuard::Observed, ReplayState::Replaying { since_revision, .. }) =
            (self.guard, self.replay)
            && revision > since_revision
        {
            log::debug!("history: replay observed at revision {revision}");
            self.replay = ReplayState::Idle;
        }
    }

    fn write_pending(&mut self, store: &LayerStore, record: PendingRecord, now_ms: u64) {
        if record.epoch != self.epoch {
            log::debug!(
                "history: dropping stale {:?} from epoch {}",
                record.action,
                record.epoch
            );
            return;
        }
        self.push(store, &record.action, now_ms);
    }

    fn push(&mut self, store: &LayerStore, action: &str, now_ms: u64) -> bool {
        if self.is_replaying() {
            log::warn!("history: suppressed {action:?} during replay");
            return false;
        }

        // Drop redo branch
        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
        } else {
            self.entries.clear();
        }

        self.entries.push_back(HistoryState {
            layers: store.layers().to_vec(),
            selected: store.selected(),
            timestamp: now_ms,
            action: action.to_owned(),
        });
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                log::debug!("history: evicted {:?}", evicted.action);
            }
        }
        self.cursor = Some(self.entries.len() - 1);
        log::debug!(
            "history: recorded {action:?} ({}/{})",
            self.entries.len(),
            self.capacity
        );
        true
    }

    // ─── Undo / Redo ─────────────────────────────────────────────────────

    /// Step back one snapshot. Returns the label of the undone action.
    pub fn undo(&mut self, store: &mut LayerStore, now_ms: u64) -> Option<String> {
        self.flush(store, now_ms);
        let cursor = self.cursor.filter(|c| *c > 0)?;
        let undone = self.entries[cursor].action.clone();
        self.restore(store, cursor - 1, now_ms);
        Some(undone)
    }

    /// Step forward one snapshot. Returns the label of the redone action.
    pub fn redo(&mut self, store: &mut LayerStore, now_ms: u64) -> Option<String> {
        self.flush(store, now_ms);
        let next = self.cursor.map(|c| c + 1).filter(|n| *n < self.entries.len())?;
        self.restore(store, next, now_ms);
        Some(self.entries[next].action.clone())
    }

    fn restore(&mut self, store: &mut LayerStore, index: usize, now_ms: u64) {
        let since_revision = store.revision();
        self.replay = ReplayState::Replaying {
            since_revision,
            started_ms: now_ms,
        };
        self.epoch += 1;
        self.cursor = Some(index);

        let entry = &self.entries[index];
        log::debug!("history: restoring #{index} {:?}", entry.action);
        store.restore(entry.layers.clone(), entry.selected);
    }

    /// Forget everything (session reset).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
        self.pending.clear();
        self.replay = ReplayState::Idle;
        self.epoch += 1;
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// How many undos are available.
    pub fn undo_steps(&self) -> usize {
        self.cursor.unwrap_or(0)
    }

    pub fn redo_steps(&self) -> usize {
        self.cursor
            .map_or(0, |c| self.entries.len().saturating_sub(c + 1))
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryState> {
        self.entries.iter()
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> Option<&HistoryState> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn is_replaying(&self) -> bool {
        matches!(self.replay, ReplayState::Replaying { .. })
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Earliest due time among queued records.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.iter().map(|r| r.due_ms).min()
    }
}
