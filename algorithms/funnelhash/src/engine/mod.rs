//! Execution Engine
//!
//! CPU dispatch and parallel batch processing.

pub mod dispatcher;
pub mod parallel;

pub use dispatcher::active_backend_name;
