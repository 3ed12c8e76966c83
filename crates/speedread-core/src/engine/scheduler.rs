use core::fmt::Debug;

/// One-shot timer capability injected into the engine.
///
/// When a scheduled delay expires the host hands the handle back through
/// [`ReaderEngine::fire`](super::ReaderEngine::fire). Cancelling a handle that
/// already fired or was already cancelled must be a no-op.
pub trait Scheduler {
    type Handle: Copy + Eq + Debug;

    fn schedule(&mut self, delay_ms: f64) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
    /// Monotonic timestamp in milliseconds.
    fn now(&self) -> f64;
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ManualHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledAdvance {
    pub handle: ManualHandle,
    pub delay_ms: f64,
    pub due_ms: f64,
}

/// Deterministic scheduler driven by hand. Time only moves when the caller
/// advances it.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: f64,
    next_id: u64,
    pending: Vec<ScheduledAdvance>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[ScheduledAdvance] {
        &self.pending
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest outstanding entry.
    pub fn next_due(&self) -> Option<ScheduledAdvance> {
        self.pending
            .iter()
            .copied()
            .min_by(|a, b| a.due_ms.total_cmp(&b.due_ms))
    }

    /// Jump the clock to the earliest entry and pop it.
    pub fn take_next(&mut self) -> Option<ManualHandle> {
        let next = self.next_due()?;
        self.now_ms = self.now_ms.max(next.due_ms);
        self.pending.retain(|entry| entry.handle != next.handle);
        Some(next.handle)
    }

    /// Move the clock forward and pop every entry that became due, earliest
    /// first.
    pub fn advance_by(&mut self, elapsed_ms: f64) -> Vec<ManualHandle> {
        self.now_ms += elapsed_ms;
        let now = self.now_ms;

        let mut due: Vec<ScheduledAdvance> = self
            .pending
            .iter()
            .copied()
            .filter(|entry| entry.due_ms <= now)
            .collect();
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        self.pending.retain(|entry| entry.due_ms > now);

        due.into_iter().map(|entry| entry.handle).collect()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&mut self, delay_ms: f64) -> Self::Handle {
        self.next_id += 1;
        let handle = ManualHandle(self.next_id);
        self.pending.push(ScheduledAdvance {
            handle,
            delay_ms,
            due_ms: self.now_ms + delay_ms,
        });
        handle
    }

    fn cancel(&mut self, handle: Self::Handle) {
        self.pending.retain(|entry| entry.handle != handle);
    }

    fn now(&self) -> f64 {
        self.now_ms
    }
}
