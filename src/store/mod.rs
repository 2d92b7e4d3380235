use async_trait::async_trait;
use thiserror::Error;

use crate::model::borrow_record::BorrowRecord;
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::leave::LeaveRecord;
use crate::model::material::{Material, MaterialStatus};
use crate::model::waiting::WaitingEntry;

#[cfg(test)]
pub mod mem;
pub mod mysql;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Transactional access to the entity tables. The engine owns the rules;
/// the store only reads and writes rows inside one transaction.
#[async_trait]
pub trait EntityStore: Clone + Send + Sync + 'static {
    type Tx: StoreTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;
}

/// One open transaction. Dropping without `commit` rolls everything back,
/// so a failed engine operation never leaves partial writes behind.
#[async_trait]
pub trait StoreTx: Send {
    async fn employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError>;

    async fn set_employee_status(
        &mut self,
        id: u64,
        status: EmployeeStatus,
    ) -> Result<(), StoreError>;

    /// Reads the material with a row lock held for the rest of the
    /// transaction, so two concurrent issues of the same material serialize.
    async fn material_for_update(&mut self, id: u64) -> Result<Option<Material>, StoreError>;

    async fn set_material_status(
        &mut self,
        id: u64,
        status: MaterialStatus,
    ) -> Result<(), StoreError>;

    async fn insert_borrow(
        &mut self,
        employee_id: u64,
        material_id: u64,
        purpose: &str,
    ) -> Result<u64, StoreError>;

    /// Open (`is_returned = false`) records for the employee, row-locked.
    async fn open_borrows(&mut self, employee_id: u64) -> Result<Vec<BorrowRecord>, StoreError>;

    async fn mark_returned(&mut self, record_id: u64) -> Result<(), StoreError>;

    async fn waiting_entry(&mut self, employee_id: u64)
    -> Result<Option<WaitingEntry>, StoreError>;

    async fn insert_waiting(&mut self, employee_id: u64) -> Result<(), StoreError>;

    /// Returns whether an entry existed.
    async fn delete_waiting(&mut self, employee_id: u64) -> Result<bool, StoreError>;

    async fn leave_record(&mut self, employee_id: u64) -> Result<Option<LeaveRecord>, StoreError>;

    async fn insert_leave(&mut self, employee_id: u64) -> Result<(), StoreError>;

    /// Returns whether a record existed.
    async fn delete_leave(&mut self, employee_id: u64) -> Result<bool, StoreError>;

    async fn commit(self) -> Result<(), StoreError>
    where
        Self: Sized;
}
