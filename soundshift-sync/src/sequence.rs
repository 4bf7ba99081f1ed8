//! Fetch sequence numbers
//!
//! Every fetch gets a ticket from a monotonically increasing counter. Only
//! the response carrying the most recently issued ticket may be applied;
//! anything older is stale.

use std::fmt;

/// Sequence number attached to one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FetchTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tickets and answers "is this still the latest?"
#[derive(Debug, Default)]
pub struct SequenceCounter {
    issued: u64,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// The most recently issued ticket, if any
    pub fn latest(&self) -> Option<FetchTicket> {
        (self.issued > 0).then_some(FetchTicket(self.issued))
    }

    pub fn is_latest(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.issued
    }
}
