use std::{net::IpAddr, time::Duration};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RateLimitService: Send + Sync + 'static {
    /// Accounts for one request from `client` and decides whether it may
    /// proceed.
    fn check(&self, client: IpAddr) -> RateLimitDecision;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Admitted,
    /// The client has used up its quota for the current window. `retry_after`
    /// is the time until the window resets, rounded up to whole seconds and
    /// never zero.
    Rejected { retry_after: Duration },
}

#[cfg(feature = "mock")]
impl MockRateLimitService {
    pub fn with_check(mut self, client: IpAddr, decision: RateLimitDecision) -> Self {
        self.expect_check()
            .once()
            .with(mockall::predicate::eq(client))
            .return_const(decision);
        self
    }
}
