//! Library side of the `dupescan` command line.

pub mod logging;
pub mod pipeline;
