//! Per-client request throttling with fixed daily and hourly budgets.

use std::{
    net::{IpAddr, Ipv4Addr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};

use actix_web::dev::ServiceRequest;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use crate::error::{Error, Result};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);
const HOUR: Duration = Duration::from_secs(60 * 60);

/// How often client entries that have fully replenished are dropped.
pub const PRUNE_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Request budgets per client. A budget of zero disables that window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitOptions {
    pub per_day: u32,
    pub per_hour: u32,
}

impl Default for RateLimitOptions {
    fn default() -> Self {
        Self {
            per_day: 200,
            per_hour: 50,
        }
    }
}

fn quota(limit: u32, period: Duration) -> Option<Quota> {
    let burst = NonZeroU32::new(limit)?;
    // Budgets finer than the clock resolution replenish once per nanosecond.
    let replenish = (period / limit).max(Duration::from_nanos(1));
    Quota::with_period(replenish).map(|quota| quota.allow_burst(burst))
}

#[derive(Clone)]
pub struct ClientRateLimiter {
    limiters: Arc<Vec<DefaultKeyedRateLimiter<IpAddr>>>,
}

impl ClientRateLimiter {
    pub fn new(opts: RateLimitOptions) -> Self {
        Self::with_windows(&[(opts.per_day, DAY), (opts.per_hour, HOUR)])
    }

    fn with_windows(windows: &[(u32, Duration)]) -> Self {
        let limiters = windows
            .iter()
            .filter_map(|&(limit, period)| quota(limit, period))
            .map(RateLimiter::keyed)
            .collect();
        Self {
            limiters: Arc::new(limiters),
        }
    }

    /// Number of clients with state in the busiest window.
    pub fn tracked_clients(&self) -> usize {
        self.limiters.iter().map(|x| x.len()).max().unwrap_or(0)
    }

    /// Forgets clients whose budget has fully replenished.
    pub fn prune(&self) {
        let before = self.tracked_clients();
        for limiter in self.limiters.iter() {
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
        log::debug!(
            "Pruned rate limiter state: {} -> {} clients",
            before,
            self.tracked_clients()
        );
    }

    /// Prunes every `period` on the current actix runtime.
    pub fn spawn_pruning(&self, period: Duration) {
        let limiter = self.clone();
        actix_web::rt::spawn(async move {
            let mut interval = actix_web::rt::time::interval(period);
            loop {
                interval.tick().await;
                limiter.prune();
            }
        });
    }

    pub fn check(&self, client: IpAddr) -> Result<()> {
        for limiter in self.limiters.iter() {
            if limiter.check_key(&client).is_err() {
                log::warn!("Rate limit exceeded for {}", client);
                return Err(Error::TooManyRequests);
            }
        }
        Ok(())
    }

    pub fn check_request(&self, req: &ServiceRequest) -> Result<()> {
        self.check(client_ip(req))
    }
}

/// Remote address of the caller; requests without one share a single bucket.
pub fn client_ip(req: &ServiceRequest) -> IpAddr {
    req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}
