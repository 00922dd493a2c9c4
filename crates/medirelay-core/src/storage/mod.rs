//! Records backend port.

pub mod box_sink;
pub mod sink;

pub use box_sink::BoxSummarySink;
pub use sink::SummarySink;
