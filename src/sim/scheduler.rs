//! Cancellable periodic tasks on a virtual clock
//!
//! Rescheduling is always cancel + schedule: the new task waits a full
//! interval from "now", and the old handle can never fire again.

use std::time::Duration;

/// Identifies one scheduled periodic task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(u64);

/// A due firing of a periodic task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    pub handle: TaskHandle,
    pub at: Duration,
}

/// Periodic timer service used by the game loop
pub trait Scheduler {
    /// Current clock time
    fn now(&self) -> Duration;
    /// Start a repeating task; first firing one interval from now
    fn schedule(&mut self, interval: Duration) -> TaskHandle;
    /// Stop a task; unknown or already-cancelled handles are ignored
    fn cancel(&mut self, handle: TaskHandle);
    fn is_active(&self, handle: TaskHandle) -> bool;
    /// Earliest firing at or before `until`, moving the clock to it
    fn poll(&mut self, until: Duration) -> Option<Firing>;
    /// Move the clock forward without firing anything
    fn advance_to(&mut self, time: Duration);
}

#[derive(Debug, Clone)]
struct Task {
    handle: TaskHandle,
    interval: Duration,
    next_fire: Duration,
}

/// Deterministic scheduler driven by explicit clock advances
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    tasks: Vec<Task>,
}

/// Intervals shorter than this are clamped so a task cannot fire forever
const MIN_INTERVAL: Duration = Duration::from_millis(1);

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    /// Interval of an active task
    pub fn interval_of(&self, handle: TaskHandle) -> Option<Duration> {
        self.tasks
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.interval)
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, interval: Duration) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        let interval = interval.max(MIN_INTERVAL);
        self.tasks.push(Task {
            handle,
            interval,
            next_fire: self.now + interval,
        });
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.tasks.retain(|t| t.handle != handle);
    }

    fn is_active(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    fn poll(&mut self, until: Duration) -> Option<Firing> {
        let task = self
            .tasks
            .iter_mut()
            .filter(|t| t.next_fire <= until)
            .min_by_key(|t| (t.next_fire, t.handle))?;

        let firing = Firing {
            handle: task.handle,
            at: task.next_fire,
        };
        task.next_fire += task.interval;
        self.now = self.now.max(firing.at);
        Some(firing)
    }

    fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn drain(s: &mut ManualScheduler, until: Duration) -> Vec<Firing> {
        let mut out = Vec::new();
        while let Some(f) = s.poll(until) {
            out.push(f);
        }
        s.advance_to(until);
        out
    }

    #[test]
    fn test_periodic_firing() {
        let mut s = ManualScheduler::new();
        let h = s.schedule(ms(100));
        let firings = drain(&mut s, ms(350));
        let times: Vec<_> = firings.iter().map(|f| f.at).collect();
        assert_eq!(times, vec![ms(100), ms(200), ms(300)]);
        assert!(firings.iter().all(|f| f.handle == h));
        assert_eq!(s.now(), ms(350));
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut s = ManualScheduler::new();
        let h = s.schedule(ms(100));
        s.cancel(h);
        assert!(!s.is_active(h));
        assert!(drain(&mut s, ms(1000)).is_empty());
    }

    #[test]
    fn test_reschedule_discards_remaining_time() {
        let mut s = ManualScheduler::new();
        let old = s.schedule(ms(100));
        s.advance_to(ms(90));
        s.cancel(old);
        let new = s.schedule(ms(100));
        // The old task would have fired at 100; the new one waits a full interval
        assert_eq!(
            drain(&mut s, ms(195)),
            vec![Firing {
                handle: new,
                at: ms(190)
            }]
        );
    }

    #[test]
    fn test_firings_in_time_order() {
        let mut s = ManualScheduler::new();
        let a = s.schedule(ms(30));
        let b = s.schedule(ms(50));
        let order: Vec<_> = drain(&mut s, ms(100)).iter().map(|f| f.handle).collect();
        assert_eq!(order, vec![a, b, a, a, b]);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut s = ManualScheduler::new();
        let h = s.schedule(Duration::ZERO);
        assert_eq!(s.interval_of(h), Some(MIN_INTERVAL));
    }
}
