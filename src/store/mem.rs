//! In-memory store used as a test double for the engine and workflow.
//! A transaction stages a full copy of the state and swaps it back in on
//! commit, so dropped transactions roll back just like the real backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::{EntityStore, StoreError, StoreTx};
use crate::model::borrow_record::BorrowRecord;
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::leave::LeaveRecord;
use crate::model::material::{Material, MaterialStatus};
use crate::model::waiting::WaitingEntry;

#[derive(Default, Clone)]
struct State {
    next_id: u64,
    employees: BTreeMap<u64, Employee>,
    materials: BTreeMap<u64, Material>,
    borrows: BTreeMap<u64, BorrowRecord>,
    waiting: BTreeMap<u64, WaitingEntry>,
    leaves: BTreeMap<u64, LeaveRecord>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default, Clone)]
pub struct MemStore {
    state: Arc<Mutex<State>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_employee(&self, name: &str, status: EmployeeStatus) -> u64 {
        let mut state = self.state.lock();
        let id = state.next_id();
        state.employees.insert(
            id,
            Employee {
                id,
                name: name.to_string(),
                father_name: "Kebede".to_string(),
                grand_father_name: "Tesfaye".to_string(),
                sex: "male".to_string(),
                position: "Engineer".to_string(),
                employment_status: "permanent".to_string(),
                phone_number: "+251900000000".to_string(),
                project: None,
                status: status.to_string(),
            },
        );
        id
    }

    pub fn seed_material(&self, name: &str, status: MaterialStatus) -> u64 {
        let mut state = self.state.lock();
        let id = state.next_id();
        state.materials.insert(
            id,
            Material {
                id,
                name: name.to_string(),
                serial_number: format!("SN-{id:04}"),
                status: status.to_string(),
            },
        );
        id
    }

    pub fn material_status(&self, id: u64) -> String {
        self.state.lock().materials[&id].status.clone()
    }

    pub fn employee_status(&self, id: u64) -> String {
        self.state.lock().employees[&id].status.clone()
    }

    pub fn open_borrow_count(&self, employee_id: u64) -> usize {
        self.state
            .lock()
            .borrows
            .values()
            .filter(|b| b.employee_id == employee_id && !b.is_returned)
            .count()
    }

    pub fn borrow_record_count(&self) -> usize {
        self.state.lock().borrows.len()
    }

    pub fn has_waiting(&self, employee_id: u64) -> bool {
        self.state
            .lock()
            .waiting
            .values()
            .any(|w| w.employee_id == employee_id)
    }

    pub fn has_leave(&self, employee_id: u64) -> bool {
        self.state
            .lock()
            .leaves
            .values()
            .any(|l| l.employee_id == employee_id)
    }
}

pub struct MemTx {
    staged: State,
    origin: Arc<Mutex<State>>,
}

#[async_trait]
impl EntityStore for MemStore {
    type Tx = MemTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        Ok(MemTx {
            staged: self.state.lock().clone(),
            origin: Arc::clone(&self.state),
        })
    }
}

#[async_trait]
impl StoreTx for MemTx {
    async fn employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError> {
        Ok(self.staged.employees.get(&id).cloned())
    }

    async fn set_employee_status(
        &mut self,
        id: u64,
        status: EmployeeStatus,
    ) -> Result<(), StoreError> {
        if let Some(emp) = self.staged.employees.get_mut(&id) {
            emp.status = status.to_string();
        }
        Ok(())
    }

    async fn material_for_update(&mut self, id: u64) -> Result<Option<Material>, StoreError> {
        Ok(self.staged.materials.get(&id).cloned())
    }

    async fn set_material_status(
        &mut self,
        id: u64,
        status: MaterialStatus,
    ) -> Result<(), StoreError> {
        if let Some(mat) = self.staged.materials.get_mut(&id) {
            mat.status = status.to_string();
        }
        Ok(())
    }

    async fn insert_borrow(
        &mut self,
        employee_id: u64,
        material_id: u64,
        purpose: &str,
    ) -> Result<u64, StoreError> {
        let id = self.staged.next_id();
        self.staged.borrows.insert(
            id,
            BorrowRecord {
                id,
                employee_id,
                material_id,
                purpose: purpose.to_string(),
                borrow_date: Utc::now(),
                is_returned: false,
            },
        );
        Ok(id)
    }

    async fn open_borrows(&mut self, employee_id: u64) -> Result<Vec<BorrowRecord>, StoreError> {
        Ok(self
            .staged
            .borrows
            .values()
            .filter(|b| b.employee_id == employee_id && !b.is_returned)
            .cloned()
            .collect())
    }

    async fn mark_returned(&mut self, record_id: u64) -> Result<(), StoreError> {
        if let Some(record) = self.staged.borrows.get_mut(&record_id) {
            record.is_returned = true;
        }
        Ok(())
    }

    async fn waiting_entry(
        &mut self,
        employee_id: u64,
    ) -> Result<Option<WaitingEntry>, StoreError> {
        Ok(self
            .staged
            .waiting
            .values()
            .find(|w| w.employee_id == employee_id)
            .cloned())
    }

    async fn insert_waiting(&mut self, employee_id: u64) -> Result<(), StoreError> {
        let id = self.staged.next_id();
        self.staged.waiting.insert(
            id,
            WaitingEntry {
                id,
                employee_id,
                added_date: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete_waiting(&mut self, employee_id: u64) -> Result<bool, StoreError> {
        let before = self.staged.waiting.len();
        self.staged.waiting.retain(|_, w| w.employee_id != employee_id);
        Ok(self.staged.waiting.len() < before)
    }

    async fn leave_record(&mut self, employee_id: u64) -> Result<Option<LeaveRecord>, StoreError> {
        Ok(self
            .staged
            .leaves
            .values()
            .find(|l| l.employee_id == employee_id)
            .cloned())
    }

    async fn insert_leave(&mut self, employee_id: u64) -> Result<(), StoreError> {
        let id = self.staged.next_id();
        self.staged.leaves.insert(
            id,
            LeaveRecord {
                id,
                employee_id,
                leave_date: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete_leave(&mut self, employee_id: u64) -> Result<bool, StoreError> {
        let before = self.staged.leaves.len();
        self.staged.leaves.retain(|_, l| l.employee_id != employee_id);
        Ok(self.staged.leaves.len() < before)
    }

    async fn commit(self) -> Result<(), StoreError> {
        *self.origin.lock() = self.staged;
        Ok(())
    }
}
