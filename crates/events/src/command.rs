use subledger_core::AggregateId;

/// A command targets a specific aggregate.
///
/// Commands represent **intent** (e.g. "deposit $500 into Checking"). They are
/// validated by the aggregate and either rejected with an error or turned into
/// events describing what happened.
///
/// Commands must be:
/// - **Cloneable**: a caller may keep a copy for reporting
/// - **Send + Sync + 'static**: they own all their data and may cross threads
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn target_aggregate_id(&self) -> AggregateId;
}
