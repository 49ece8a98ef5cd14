use std::{
    env,
    net::{IpAddr, Ipv4Addr},
    time::{Duration, Instant},
};

use dashmap::DashMap;
use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
};
use tracing::{debug, instrument, warn};

/// Tokens refill to full capacity once per interval.
#[derive(Debug)]
struct TokenBucket {
    last_refill: Instant,
    tokens: u32,
}

impl TokenBucket {
    fn new(capacity: u32) -> Self {
        Self {
            last_refill: Instant::now(),
            tokens: capacity,
        }
    }

    fn try_consume(&mut self, capacity: u32, interval: Duration) -> bool {
        if self.last_refill.elapsed() >= interval {
            debug!("Token bucket refilled: {} -> {} tokens", self.tokens, capacity);
            self.tokens = capacity;
            self.last_refill = Instant::now();
        }

        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }
}

/// Per-client limit on game creation.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<IpAddr, TokenBucket>,
    capacity: u32,
    interval: Duration,
}

impl RateLimiter {
    pub fn new(capacity: u32, interval: Duration) -> Self {
        Self {
            buckets: DashMap::new(),
            capacity,
            interval,
        }
    }

    /// Reads `RATE_LIMIT_GAMES_PER_MINUTE`, defaulting to 10.
    pub fn from_env() -> Self {
        let capacity: u32 = env::var("RATE_LIMIT_GAMES_PER_MINUTE")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);
        Self::new(capacity, Duration::from_secs(60))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn check(&self, ip: IpAddr) -> Result<(), Status> {
        let mut bucket = self
            .buckets
            .entry(ip)
            .or_insert_with(|| TokenBucket::new(self.capacity));

        if bucket.try_consume(self.capacity, self.interval) {
            Ok(())
        } else {
            warn!("Rate limit exceeded for {} - rejecting request", ip);
            Err(Status::TooManyRequests)
        }
    }
}

pub struct ClientIp(pub IpAddr);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientIp {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let ip = req
            .headers()
            .get_one("X-Forwarded-For")
            .and_then(|header| header.split(',').next())
            .and_then(|ip| ip.trim().parse().ok())
            .or_else(|| {
                req.headers()
                    .get_one("X-Real-IP")
                    .and_then(|ip| ip.parse().ok())
            })
            .or_else(|| req.client_ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

        request::Outcome::Success(ClientIp(ip))
    }
}
