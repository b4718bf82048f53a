use crate::error::AppError;
use auction_types::ids::TeamName;
use dashmap::DashMap;
use std::time::Instant;

#[derive(Clone)]
struct Bucket {
    tokens: f64,
    last_update: Instant,
}

impl Bucket {
    fn full(capacity: u32, now: Instant) -> Self {
        Self {
            tokens: capacity as f64,
            last_update: now,
        }
    }

    fn take(&mut self, capacity: u32, refill_rate: f64, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.tokens = f64::min(capacity as f64, self.tokens + elapsed * refill_rate);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Token bucket per bidding team
pub struct BidRateLimiter {
    capacity: u32,
    refill_rate: f64,
    buckets: DashMap<TeamName, Bucket>,
}

impl BidRateLimiter {
    pub fn new(capacity: u32, refill_rate: f64) -> Self {
        Self {
            capacity: capacity.max(1),
            refill_rate: refill_rate.max(0.0),
            buckets: DashMap::new(),
        }
    }

    pub fn check(&self, team: &TeamName) -> Result<(), AppError> {
        self.check_at(team, Instant::now())
    }

    fn check_at(&self, team: &TeamName, now: Instant) -> Result<(), AppError> {
        let mut bucket = self
            .buckets
            .entry(team.clone())
            .or_insert_with(|| Bucket::full(self.capacity, now));

        if bucket.take(self.capacity, self.refill_rate, now) {
            Ok(())
        } else {
            Err(AppError::RateLimitExceeded(format!("Too many bids from {}", team)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn team(name: &str) -> TeamName {
        TeamName::new(name).unwrap()
    }

    #[test]
    fn test_burst_up_to_capacity() {
        let limiter = BidRateLimiter::new(3, 1.0);
        let now = Instant::now();
        for _ in 0..3 {
            assert!(limiter.check_at(&team("A"), now).is_ok());
        }
        assert!(matches!(
            limiter.check_at(&team("A"), now),
            Err(AppError::RateLimitExceeded(_))
        ));
    }

    #[test]
    fn test_teams_are_independent() {
        let limiter = BidRateLimiter::new(1, 0.0);
        let now = Instant::now();
        assert!(limiter.check_at(&team("A"), now).is_ok());
        assert!(limiter.check_at(&team("A"), now).is_err());
        assert!(limiter.check_at(&team("B"), now).is_ok());
    }

    #[test]
    fn test_refill_over_time() {
        let limiter = BidRateLimiter::new(1, 2.0);
        let start = Instant::now();
        assert!(limiter.check_at(&team("A"), start).is_ok());
        assert!(limiter.check_at(&team("A"), start).is_err());
        assert!(limiter
            .check_at(&team("A"), start + Duration::from_millis(600))
            .is_ok());
    }
}
