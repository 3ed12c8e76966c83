use std::time::{Duration, Instant};

use speedread_core::Scheduler;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(super) struct TimerHandle(u64);

#[derive(Clone, Copy, Debug)]
struct TimerEntry {
    handle: TimerHandle,
    deadline: Instant,
}

/// Wall-clock timer queue. The main loop pops expired handles and hands them
/// back to the engine.
pub(super) struct InstantScheduler {
    origin: Instant,
    next_id: u64,
    entries: Vec<TimerEntry>,
}

impl InstantScheduler {
    pub(super) fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub(super) fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(super) fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.deadline).min()
    }

    /// Pop handles whose deadline is at or before `now`, earliest first.
    pub(super) fn take_due(&mut self, now: Instant) -> Vec<TimerHandle> {
        let mut due: Vec<TimerEntry> = self
            .entries
            .iter()
            .copied()
            .filter(|entry| entry.deadline <= now)
            .collect();
        if due.is_empty() {
            return Vec::new();
        }

        due.sort_by_key(|entry| entry.deadline);
        self.entries.retain(|entry| entry.deadline > now);
        due.into_iter().map(|entry| entry.handle).collect()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Scheduler for InstantScheduler {
    type Handle = TimerHandle;

    fn schedule(&mut self, delay_ms: f64) -> Self::Handle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let delay = Duration::from_secs_f64(delay_ms.max(0.0) / 1_000.0);
        self.entries.push(TimerEntry {
            handle,
            deadline: Instant::now() + delay,
        });
        handle
    }

    fn cancel(&mut self, handle: Self::Handle) {
        self.entries.retain(|entry| entry.handle != handle);
    }

    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_handles_come_back_in_deadline_order() {
        let mut scheduler = InstantScheduler::new();
        let late = scheduler.schedule(20.0);
        let early = scheduler.schedule(5.0);

        let later = Instant::now() + Duration::from_millis(50);
        assert_eq!(scheduler.take_due(later), [early, late]);
        assert_eq!(scheduler.len(), 0);
    }

    #[test]
    fn nothing_is_due_before_its_deadline() {
        let mut scheduler = InstantScheduler::new();
        scheduler.schedule(60_000.0);
        assert!(scheduler.take_due(Instant::now()).is_empty());
        assert!(scheduler.next_deadline().is_some());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut scheduler = InstantScheduler::new();
        let handle = scheduler.schedule(10.0);
        scheduler.cancel(handle);
        scheduler.cancel(handle);
        assert_eq!(scheduler.len(), 0);
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn clock_is_relative_to_origin() {
        let origin = Instant::now() - Duration::from_millis(250);
        let scheduler = InstantScheduler::starting_at(origin);
        assert!(scheduler.now() >= 250.0);
    }
}
