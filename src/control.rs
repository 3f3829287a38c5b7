use std::time::Duration;

use anyhow::Result;

use crate::fetch::FetchResponse;

/// What to do with one probed id, decided from the transport result alone.
#[derive(Debug)]
pub enum Disposition {
    /// 200: hand the body to the extractor.
    Success(FetchResponse),
    /// 404: record the id in the not-found set.
    NotFound,
    /// 403: record nothing, cool down, move on. The id stays eligible for a
    /// future run.
    RateLimited,
    /// Any other status: record nothing so a later run retries the id.
    Unexpected(u16),
    /// Network-level failure, same non-recording treatment as Unexpected.
    TransportFailed(anyhow::Error),
}

pub fn classify(result: Result<FetchResponse>) -> Disposition {
    match result {
        Ok(response) => match response.status {
            200 => Disposition::Success(response),
            404 => Disposition::NotFound,
            403 => Disposition::RateLimited,
            status => Disposition::Unexpected(status),
        },
        Err(err) => Disposition::TransportFailed(err),
    }
}

/// Inter-request pacing policy. The 403 cool-down replaces the ordinary
/// delay for that iteration; every other attempted request is followed by
/// the fixed delay regardless of outcome.
#[derive(Debug, Clone)]
pub struct Pacing {
    pub request_delay: Duration,
    pub cooldown: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_millis(500),
            cooldown: Duration::from_secs(600),
        }
    }
}

impl Pacing {
    pub fn delay_after(&self, disposition: &Disposition) -> Duration {
        match disposition {
            Disposition::RateLimited => self.cooldown,
            _ => self.request_delay,
        }
    }
}

// ── Tests ──
