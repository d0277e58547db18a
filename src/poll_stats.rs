use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters for the poll loop, exposed at `/stats/poller`.
#[derive(Debug)]
pub struct PollStats {
    cycles_completed: AtomicU64,
    cycles_failed: AtomicU64,
    blocks_fetched: AtomicU64,
    transactions_seen: AtomicU64,
}

impl Default for PollStats {
    fn default() -> Self {
        Self::new()
    }
}

impl PollStats {
    pub const fn new() -> Self {
        Self {
            cycles_completed: AtomicU64::new(0),
            cycles_failed: AtomicU64::new(0),
            blocks_fetched: AtomicU64::new(0),
            transactions_seen: AtomicU64::new(0),
        }
    }

    pub fn inc_cycles_completed(&self) {
        self.cycles_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cycles_failed(&self) {
        self.cycles_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_blocks_fetched(&self, n: u64) {
        self.blocks_fetched.fetch_add(n, Ordering::Relaxed);
    }

    pub fn inc_transactions_seen(&self, n: u64) {
        self.transactions_seen.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PollSnapshot {
        PollSnapshot {
            cycles_completed: self.cycles_completed.load(Ordering::Relaxed),
            cycles_failed: self.cycles_failed.load(Ordering::Relaxed),
            blocks_fetched: self.blocks_fetched.load(Ordering::Relaxed),
            transactions_seen: self.transactions_seen.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct PollSnapshot {
    pub cycles_completed: u64,
    pub cycles_failed: u64,
    pub blocks_fetched: u64,
    pub transactions_seen: u64,
}

pub static POLL_STATS: PollStats = PollStats::new();
