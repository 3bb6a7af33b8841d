/// Account identity and balance. Balance changes are decided by handling
/// commands into events and only then applied.
pub mod account;

/// Validated amount carrying commands, executed by [`account`].
pub mod command;

/// Record of a completed transfer.
pub mod transaction;

/// Ledger interface, plus "in memory" implementation.
/// Owns accounts and the transfer log, computes fees and keeps running totals.
///
/// NOTE: the trait is the surface a front end talks to, the in memory
/// ledger is the only implementation for now.
pub mod ledger;

/// Command shell on top of [`ledger`]: parses command lines, prints CSV
/// listings. Kept in the library so integration tests can run whole sessions.
pub mod bin_utils;
