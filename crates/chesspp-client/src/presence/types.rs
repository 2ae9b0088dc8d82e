/// A single roster delta produced by snapshot reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterChange {
    Joined(String),
    Left(String),
}
