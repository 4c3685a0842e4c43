use std::{
    collections::{hash_map::Entry, HashMap},
    net::IpAddr,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use chrono::{DateTime, TimeDelta, Utc};
use portfolio_shared_contracts::{
    rate_limit::{RateLimitDecision, RateLimitService},
    time::TimeService,
};
use tracing::debug;

/// Fixed window counter keyed by client IP. A client's first request opens a
/// window; requests beyond `max_requests` within that window are rejected
/// until the window ends.
#[derive(Debug, Clone)]
pub struct FixedWindowRateLimiter<Time> {
    time: Time,
    config: RateLimiterConfig,
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimiterConfig {
    pub window: Duration,
    pub max_requests: u64,
}

impl<Time> FixedWindowRateLimiter<Time> {
    pub fn new(time: Time, config: RateLimiterConfig) -> Self {
        Self {
            time,
            config,
            state: Default::default(),
        }
    }
}

impl<Time> RateLimitService for FixedWindowRateLimiter<Time>
where
    Time: TimeService,
{
    fn check(&self, client: IpAddr) -> RateLimitDecision {
        let now = self.time.now();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.sweep(now, self.config.window);

        match state.clients.entry(client) {
            Entry::Vacant(entry) => {
                entry.insert(ClientRecord {
                    count: 1,
                    window_resets_at: now + self.config.window,
                });
                RateLimitDecision::Admitted
            }
            Entry::Occupied(mut entry) => {
                let record = entry.get_mut();
                if now > record.window_resets_at {
                    record.count = 1;
                    record.window_resets_at = now + self.config.window;
                    RateLimitDecision::Admitted
                } else if record.count < self.config.max_requests {
                    record.count += 1;
                    RateLimitDecision::Admitted
                } else {
                    let retry_after = retry_after(record.window_resets_at - now);
                    debug!(%client, ?retry_after, "rate limit exceeded");
                    RateLimitDecision::Rejected { retry_after }
                }
            }
        }
    }
}

#[derive(Debug, Default)]
struct State {
    clients: HashMap<IpAddr, ClientRecord>,
    next_sweep: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct ClientRecord {
    count: u64,
    window_resets_at: DateTime<Utc>,
}

impl State {
    /// Drops records whose window has already ended, at most once per window
    /// duration, to keep the map bounded over long process lifetimes.
    fn sweep(&mut self, now: DateTime<Utc>, window: Duration) {
        if self.next_sweep.is_some_and(|at| now < at) {
            return;
        }
        self.clients
            .retain(|_, record| now <= record.window_resets_at);
        self.next_sweep = Some(now + window);
    }
}

/// Rounded up to whole seconds; never zero, so a rejected client always backs
/// off for at least a second.
fn retry_after(remaining: TimeDelta) -> Duration {
    Duration::from_secs((remaining.num_milliseconds().max(0) as u64).div_ceil(1000).max(1))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use mockall::Sequence;
    use portfolio_shared_contracts::time::MockTimeService;
    use portfolio_utils::assert_matches;

    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
    }

    fn limiter(
        max_requests: u64,
        times: impl IntoIterator<Item = DateTime<Utc>>,
    ) -> FixedWindowRateLimiter<MockTimeService> {
        let mut time = MockTimeService::new();
        let mut seq = Sequence::new();
        for t in times {
            time.expect_now().once().in_sequence(&mut seq).return_const(t);
        }
        FixedWindowRateLimiter::new(
            time,
            RateLimiterConfig {
                window: WINDOW,
                max_requests,
            },
        )
    }

    fn ip(last: u8) -> IpAddr {
        [127, 0, 0, last].into()
    }

    #[test]
    fn admits_up_to_limit_then_rejects() {
        let t = base();
        let sut = limiter(3, (0..4).map(|i| t + Duration::from_secs(i * 10)));

        for _ in 0..3 {
            assert_eq!(sut.check(ip(1)), RateLimitDecision::Admitted);
        }

        // fourth request arrives 30s into the 60s window
        assert_eq!(
            sut.check(ip(1)),
            RateLimitDecision::Rejected {
                retry_after: Duration::from_secs(30)
            }
        );
    }

    #[test]
    fn elapsed_window_resets_the_counter() {
        let t = base();
        let sut = limiter(
            1,
            [
                t,
                t + Duration::from_secs(30),
                t + Duration::from_secs(61),
                t + Duration::from_secs(62),
            ],
        );

        assert_eq!(sut.check(ip(1)), RateLimitDecision::Admitted);
        assert_matches!(sut.check(ip(1)), RateLimitDecision::Rejected { .. });
        // window ended at t+60, so the counter starts over
        assert_eq!(sut.check(ip(1)), RateLimitDecision::Admitted);
        assert_eq!(
            sut.check(ip(1)),
            RateLimitDecision::Rejected {
                retry_after: Duration::from_secs(59)
            }
        );
    }

    #[test]
    fn clients_do_not_share_state() {
        let t = base();
        let sut = limiter(1, (0..3).map(|i| t + Duration::from_secs(i)));

        assert_eq!(sut.check(ip(1)), RateLimitDecision::Admitted);
        assert_matches!(sut.check(ip(1)), RateLimitDecision::Rejected { .. });
        assert_eq!(sut.check(ip(2)), RateLimitDecision::Admitted);
    }

    #[test]
    fn retry_after_rounds_up_and_is_positive() {
        let t = base();
        let sut = limiter(
            1,
            [
                t,
                t + Duration::from_millis(58_500),
                t + Duration::from_millis(59_999),
            ],
        );

        assert_eq!(sut.check(ip(1)), RateLimitDecision::Admitted);
        assert_eq!(
            sut.check(ip(1)),
            RateLimitDecision::Rejected {
                retry_after: Duration::from_secs(2)
            }
        );
        assert_eq!(
            sut.check(ip(1)),
            RateLimitDecision::Rejected {
                retry_after: Duration::from_secs(1)
            }
        );
    }

    #[test]
    fn sweep_evicts_expired_records() {
        let t = base();
        let sut = limiter(10, [t, t + 3 * WINDOW]);

        assert_eq!(sut.check(ip(1)), RateLimitDecision::Admitted);
        // a later request from another client triggers the sweep
        assert_eq!(sut.check(ip(2)), RateLimitDecision::Admitted);

        let state = sut.state.lock().unwrap();
        assert!(!state.clients.contains_key(&ip(1)));
        assert!(state.clients.contains_key(&ip(2)));
    }
}
