use chrono::{DateTime, Utc};
use portfolio_shared_contracts::time::TimeService;

#[derive(Debug, Clone, Copy)]
pub struct TimeServiceImpl;

impl TimeService for TimeServiceImpl {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
