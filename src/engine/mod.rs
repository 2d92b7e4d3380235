pub mod borrow;
pub mod clearance;
pub mod error;

pub use borrow::BorrowEngine;
pub use clearance::ClearanceWorkflow;
pub use error::CoreError;
