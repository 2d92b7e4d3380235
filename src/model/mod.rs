pub mod borrow_record;
pub mod employee;
pub mod leave;
pub mod material;
pub mod role;
pub mod waiting;
