use chrono::{DateTime, Utc};

/// Identifying facts about one event, for logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMetadata {
    pub event_type: &'static str,
    pub version: u32,
    pub occurred_at: DateTime<Utc>,
}

/// A fact recorded by an aggregate after accepting a command.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable dotted name, e.g. "banking.ledger.funds_deposited".
    fn event_type(&self) -> &'static str;

    /// Schema version of this event type.
    fn version(&self) -> u32;

    /// Business time of the command that produced the event.
    fn occurred_at(&self) -> DateTime<Utc>;

    fn metadata(&self) -> EventMetadata {
        EventMetadata {
            event_type: self.event_type(),
            version: self.version(),
            occurred_at: self.occurred_at(),
        }
    }
}
