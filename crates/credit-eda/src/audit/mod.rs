//! Missing-data and class-proportion auditing.
//!
//! Both operations are pure reads over the frame they are given: they take
//! it explicitly, never mutate it and keep no state between calls.

mod auditor;

pub use auditor::MissingDataAuditor;
