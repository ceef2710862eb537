//! Report delivery
//!
//! A [`ReportSink`] hands the rendered report to the operator. Delivery
//! errors are returned to the caller, which logs them and carries on.

pub mod sink;
pub mod telegram;

pub use sink::*;
pub use telegram::*;
