// Result of one refresh request, distinguishing "we wrote a new set" from
// "the remote gave us nothing" and "another refresh was already running".

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A fresh set was fetched and committed.
    Refreshed { imported: u64 },
    /// The remote returned nothing usable; the local set was left untouched.
    NoData,
    /// Folded into a refresh that was already in flight.
    Coalesced,
}
