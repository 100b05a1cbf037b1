use canary_core::NetworkActivity;
use std::collections::HashSet;
use std::time::Instant;

/// Tracks in-flight requests of one page from CDP network events.
///
/// Redirects reuse the request id, so a redirect chain counts as one request
/// until it finishes or fails. A finish seen before its start is remembered,
/// and the late start is then ignored.
#[derive(Debug)]
pub struct NetworkTracker {
    in_flight: HashSet<String>,
    settled_early: HashSet<String>,
    last_change: Instant,
    total: usize,
}

impl NetworkTracker {
    pub fn new() -> Self {
        Self {
            in_flight: HashSet::new(),
            settled_early: HashSet::new(),
            last_change: Instant::now(),
            total: 0,
        }
    }

    /// `Network.requestWillBeSent`
    pub fn request_started(&mut self, request_id: &str) {
        if self.settled_early.remove(request_id) {
            self.total += 1;
            self.last_change = Instant::now();
            return;
        }
        if self.in_flight.insert(request_id.to_string()) {
            self.total += 1;
        }
        self.last_change = Instant::now();
    }

    /// `Network.loadingFinished` or `Network.loadingFailed`
    pub fn request_settled(&mut self, request_id: &str) {
        if self.in_flight.remove(request_id) {
            self.last_change = Instant::now();
        } else {
            self.settled_early.insert(request_id.to_string());
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Number of distinct requests seen since the page opened
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn snapshot(&self) -> NetworkActivity {
        NetworkActivity::new(self.in_flight.len(), self.last_change)
    }
}

impl Default for NetworkTracker {
    fn default() -> Self {
        Self::new()
    }
}
