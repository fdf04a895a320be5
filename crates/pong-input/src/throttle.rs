//! Leading-and-trailing throttle for side-effecting input callbacks.
//!
//! [`InputThrottler`] is a three-state machine with a single deadline:
//!
//! | state              | on `call(args)`                        | on timer                         |
//! |--------------------|----------------------------------------|----------------------------------|
//! | Idle               | invoke now, arm deadline → Cooling     | n/a                              |
//! | Cooling            | store args → CoolingPending            | → Idle                           |
//! | CoolingPending     | overwrite stored args                  | invoke stored, re-arm → Cooling  |
//!
//! The caller owns the clock: every entry point takes `now`, and the owner of
//! the event loop is expected to call [`InputThrottler::fire`] once
//! [`InputThrottler::deadline`] has passed. The side effect itself is passed
//! per call, so the throttler never holds a borrow of whatever it drives.

use std::time::{Duration, Instant};

/// Observable phase of an [`InputThrottler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottlePhase {
    /// No cooldown running; the next call is forwarded immediately.
    Idle,
    /// Cooldown running with nothing queued.
    Cooling,
    /// Cooldown running and a trailing call is queued.
    CoolingPending,
}

#[derive(Debug)]
enum State<T> {
    Idle,
    Cooling { deadline: Instant },
    CoolingPending { deadline: Instant, pending: T },
}

/// Rate limiter guaranteeing at least `interval` between two invocations
/// while never dropping the most recent call.
#[derive(Debug)]
pub struct InputThrottler<T> {
    interval: Duration,
    state: State<T>,
}

impl<T> InputThrottler<T> {
    /// Creates an idle throttler with the given cooldown.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: State::Idle,
        }
    }

    /// Cooldown between two invocations.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current phase.
    pub fn phase(&self) -> ThrottlePhase {
        match self.state {
            State::Idle => ThrottlePhase::Idle,
            State::Cooling { .. } => ThrottlePhase::Cooling,
            State::CoolingPending { .. } => ThrottlePhase::CoolingPending,
        }
    }

    /// When the running cooldown ends, if one is running.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            State::Idle => None,
            State::Cooling { deadline } | State::CoolingPending { deadline, .. } => Some(deadline),
        }
    }

    /// Arguments queued for the trailing call, if any.
    pub fn pending(&self) -> Option<&T> {
        match &self.state {
            State::CoolingPending { pending, .. } => Some(pending),
            _ => None,
        }
    }

    /// Offer a new call. Invokes `invoke` immediately when no cooldown is
    /// running, otherwise queues `args` as the trailing call, replacing any
    /// earlier queued args. Returns `true` if `invoke` ran.
    ///
    /// A call arriving after the deadline but before [`fire`](Self::fire)
    /// was driven counts as a call after the cooldown: the newer args
    /// supersede anything queued and are sent at once.
    pub fn call(&mut self, args: T, now: Instant, invoke: impl FnOnce(T)) -> bool {
        let expired = self.deadline().is_some_and(|deadline| now >= deadline);
        match &mut self.state {
            State::Idle => {}
            _ if expired => {
                tracing::trace!("throttle deadline passed before timer; sending latest call");
            }
            State::Cooling { deadline } => {
                let deadline = *deadline;
                self.state = State::CoolingPending {
                    deadline,
                    pending: args,
                };
                return false;
            }
            State::CoolingPending { pending, .. } => {
                *pending = args;
                return false;
            }
        }

        invoke(args);
        self.state = State::Cooling {
            deadline: now + self.interval,
        };
        true
    }

    /// Drive the cooldown timer. Before the deadline this is a no-op. At or
    /// after it, a queued call is invoked and a new cooldown armed; with
    /// nothing queued the throttler returns to idle. Returns `true` if
    /// `invoke` ran.
    pub fn fire(&mut self, now: Instant, invoke: impl FnOnce(T)) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {}
            _ => return false,
        }

        match std::mem::replace(&mut self.state, State::Idle) {
            State::CoolingPending { pending, .. } => {
                invoke(pending);
                self.state = State::Cooling {
                    deadline: now + self.interval,
                };
                true
            }
            _ => false,
        }
    }

    /// Drop any queued call and return to idle.
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(8);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_call_is_immediate() {
        let t0 = Instant::now();
        let mut throttle = InputThrottler::new(INTERVAL);
        let mut sent = Vec::new();

        assert!(throttle.call(1.0_f32, t0, |y| sent.push(y)));
        assert_eq!(sent, vec![1.0]);
        assert_eq!(throttle.phase(), ThrottlePhase::Cooling);
        assert_eq!(throttle.deadline(), Some(t0 + INTERVAL));
    }

    #[test]
    fn test_busy_window_yields_leading_and_trailing_call() {
        let t0 = Instant::now();
        let mut throttle = InputThrottler::new(INTERVAL);
        let mut sent: Vec<(u64, u32)> = Vec::new();

        for i in 0..8u64 {
            throttle.call(i as u32, t0 + ms(i), |v| sent.push((i, v)));
        }
        assert_eq!(sent, vec![(0, 0)]);
        assert_eq!(throttle.pending(), Some(&7));

        // Timer fires at the deadline with the latest args.
        let deadline = throttle.deadline().unwrap();
        assert!(throttle.fire(deadline, |v| sent.push((8, v))));
        assert_eq!(sent, vec![(0, 0), (8, 7)]);

        // Silence: the re-armed cooldown expires with nothing queued.
        let deadline = throttle.deadline().unwrap();
        assert!(!throttle.fire(deadline, |v| sent.push((16, v))));
        assert_eq!(throttle.phase(), ThrottlePhase::Idle);
        assert_eq!(sent.len(), 2);
    }

    #[test]
    fn test_fire_before_deadline_is_noop() {
        let t0 = Instant::now();
        let mut throttle = InputThrottler::new(INTERVAL);
        throttle.call(1, t0, |_| {});
        throttle.call(2, t0 + ms(1), |_| panic!("must not send during cooldown"));

        assert!(!throttle.fire(t0 + ms(7), |_| panic!("fired early")));
        assert_eq!(throttle.phase(), ThrottlePhase::CoolingPending);
    }

    #[test]
    fn test_fire_when_idle_is_noop() {
        let mut throttle: InputThrottler<u8> = InputThrottler::new(INTERVAL);
        assert!(!throttle.fire(Instant::now(), |_| panic!("idle throttle fired")));
        assert_eq!(throttle.deadline(), None);
    }

    #[test]
    fn test_invocations_respect_interval() {
        let t0 = Instant::now();
        let mut throttle = InputThrottler::new(INTERVAL);
        let mut sent_at: Vec<Instant> = Vec::new();

        // A call every millisecond for 40 ms, timer driven every millisecond.
        for i in 0..40u64 {
            let now = t0 + ms(i);
            throttle.fire(now, |_| sent_at.push(now));
            throttle.call(i, now, |_| sent_at.push(now));
        }

        assert!(sent_at.len() >= 4);
        for pair in sent_at.windows(2) {
            assert!(pair[1] - pair[0] >= INTERVAL, "{:?}", pair[1] - pair[0]);
        }
    }

    #[test]
    fn test_late_call_after_deadline_supersedes_pending() {
        let t0 = Instant::now();
        let mut throttle = InputThrottler::new(INTERVAL);
        let mut sent = Vec::new();

        throttle.call("a", t0, |v| sent.push(v));
        throttle.call("b", t0 + ms(3), |v| sent.push(v));
        // Timer was not driven; next call lands after the deadline.
        assert!(throttle.call("c", t0 + ms(12), |v| sent.push(v)));

        assert_eq!(sent, vec!["a", "c"]);
        assert_eq!(throttle.deadline(), Some(t0 + ms(12) + INTERVAL));
        assert_eq!(throttle.pending(), None);
    }

    #[test]
    fn test_reset_discards_pending() {
        let t0 = Instant::now();
        let mut throttle = InputThrottler::new(INTERVAL);
        throttle.call(1, t0, |_| {});
        throttle.call(2, t0 + ms(1), |_| {});

        throttle.reset();
        assert_eq!(throttle.phase(), ThrottlePhase::Idle);
        assert!(throttle.call(3, t0 + ms(2), |_| {}));
    }
}
