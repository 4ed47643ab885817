/// In-memory count of consecutive buys without an intervening full exit.
///
/// Process-lifetime state only; a restart resets the counter to zero.
/// Single-threaded by construction, so no locking is needed.
#[derive(Debug, Clone, Copy)]
pub struct PositionTracker {
    total_buys: u32,
    limit_buys: u32,
}

impl PositionTracker {
    pub fn new(limit_buys: u32) -> Self {
        Self {
            total_buys: 0,
            limit_buys,
        }
    }

    pub fn total_buys(&self) -> u32 {
        self.total_buys
    }

    /// True while the consecutive-buy cap has headroom.
    pub fn can_buy(&self) -> bool {
        self.total_buys < self.limit_buys
    }

    pub fn record_buy(&mut self) {
        self.total_buys += 1;
    }

    pub fn record_full_exit(&mut self) {
        self.total_buys = 0;
    }

    pub fn record_partial_exit(&mut self) {
        self.total_buys = self.total_buys.saturating_sub(1);
    }
}
