pub mod borrow;
pub mod clearance;
pub mod employee;
pub mod import;
pub mod material;
pub mod report;

use crate::engine::{BorrowEngine, ClearanceWorkflow};
use crate::store::mysql::MySqlStore;

/// Concrete engine types the handlers are wired to.
pub type Engine = BorrowEngine<MySqlStore>;
pub type Workflow = ClearanceWorkflow<MySqlStore>;
