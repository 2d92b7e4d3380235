use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::error::CoreError;
use crate::model::material::MaterialStatus;
use crate::store::{EntityStore, StoreTx};

/// Result of a selective return. `remaining = 0` means the employee is
/// fully cleared; the caller decides what to tell the user about that.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReturnOutcome {
    #[schema(example = 2)]
    pub returned: u64,
    #[schema(example = 0)]
    pub remaining: u64,
}

/// Coordinates Employee, Material and BorrowRecord inside one store
/// transaction per operation. Every mutation is all-or-nothing: a failed
/// precondition drops the transaction before anything is committed.
#[derive(Clone)]
pub struct BorrowEngine<S> {
    store: S,
}

impl<S: EntityStore> BorrowEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Issues the given materials to an active employee. Creates one open
    /// BorrowRecord per material and flips each material to borrowed.
    pub async fn issue(
        &self,
        employee_id: u64,
        purpose: &str,
        material_ids: &[u64],
    ) -> Result<Vec<u64>, CoreError> {
        if material_ids.is_empty() {
            return Err(CoreError::Validation(
                "select at least one material".to_string(),
            ));
        }
        let mut deduped = material_ids.to_vec();
        deduped.sort_unstable();
        deduped.dedup();
        if deduped.len() != material_ids.len() {
            return Err(CoreError::Validation(
                "the same material was selected more than once".to_string(),
            ));
        }

        let mut tx = self.store.begin().await?;

        let employee = tx.employee(employee_id).await?.ok_or_else(|| {
            CoreError::Validation(format!("employee {employee_id} does not exist"))
        })?;
        if !employee.is_active() {
            return Err(CoreError::Validation(format!(
                "employee '{} {}' has left the organization",
                employee.name, employee.father_name
            )));
        }

        let mut record_ids = Vec::with_capacity(material_ids.len());
        for &material_id in material_ids {
            let material = tx.material_for_update(material_id).await?.ok_or_else(|| {
                CoreError::Validation(format!("material {material_id} does not exist"))
            })?;
            if !material.is_available() {
                return Err(CoreError::Validation(format!(
                    "material '{}' (SN: {}) is not available",
                    material.name, material.serial_number
                )));
            }
            let record_id = tx.insert_borrow(employee_id, material_id, purpose).await?;
            tx.set_material_status(material_id, MaterialStatus::Borrowed)
                .await?;
            record_ids.push(record_id);
        }

        tx.commit().await?;
        Ok(record_ids)
    }

    /// Marks every open record for the employee returned and frees the
    /// materials. A second call is a successful no-op.
    pub async fn return_all(&self, employee_id: u64) -> Result<u64, CoreError> {
        let mut tx = self.store.begin().await?;

        tx.employee(employee_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("employee {employee_id} not found")))?;

        let open = tx.open_borrows(employee_id).await?;
        for record in &open {
            tx.mark_returned(record.id).await?;
            tx.set_material_status(record.material_id, MaterialStatus::Available)
                .await?;
        }

        tx.commit().await?;
        Ok(open.len() as u64)
    }

    /// Returns only the selected records; everything else stays open.
    /// The whole selection must be open records owned by the employee.
    pub async fn return_selected(
        &self,
        employee_id: u64,
        record_ids: &[u64],
    ) -> Result<ReturnOutcome, CoreError> {
        if record_ids.is_empty() {
            return Err(CoreError::Validation(
                "no items selected for return".to_string(),
            ));
        }
        let mut selected = record_ids.to_vec();
        selected.sort_unstable();
        selected.dedup();

        let mut tx = self.store.begin().await?;

        tx.employee(employee_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("employee {employee_id} not found")))?;

        let open: HashMap<u64, u64> = tx
            .open_borrows(employee_id)
            .await?
            .into_iter()
            .map(|b| (b.id, b.material_id))
            .collect();

        for record_id in &selected {
            let Some(&material_id) = open.get(record_id) else {
                return Err(CoreError::Validation(format!(
                    "record {record_id} is not an open borrow of this employee"
                )));
            };
            tx.mark_returned(*record_id).await?;
            tx.set_material_status(material_id, MaterialStatus::Available)
                .await?;
        }

        tx.commit().await?;
        Ok(ReturnOutcome {
            returned: selected.len() as u64,
            remaining: (open.len() - selected.len()) as u64,
        })
    }

    /// Read-only count of open records; the clearance workflow's gate.
    pub async fn outstanding_count(&self, employee_id: u64) -> Result<u64, CoreError> {
        let mut tx = self.store.begin().await?;
        tx.employee(employee_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("employee {employee_id} not found")))?;
        let open = tx.open_borrows(employee_id).await?;
        Ok(open.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::EmployeeStatus;
    use crate::store::mem::MemStore;

    fn engine(store: &MemStore) -> BorrowEngine<MemStore> {
        BorrowEngine::new(store.clone())
    }

    #[actix_web::test]
    async fn issue_creates_open_records_and_flips_materials() {
        let store = MemStore::new();
        let emp = store.seed_employee("Abebe", EmployeeStatus::Active);
        let m1 = store.seed_material("laptop", MaterialStatus::Available);
        let m2 = store.seed_material("drill", MaterialStatus::Available);

        let records = engine(&store).issue(emp, "site work", &[m1, m2]).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(store.material_status(m1), "borrowed");
        assert_eq!(store.material_status(m2), "borrowed");
        assert_eq!(store.open_borrow_count(emp), 2);
    }

    #[actix_web::test]
    async fn issue_is_all_or_nothing_when_one_material_is_taken() {
        let store = MemStore::new();
        let emp = store.seed_employee("Abebe", EmployeeStatus::Active);
        let m1 = store.seed_material("laptop", MaterialStatus::Available);
        let m2 = store.seed_material("drill", MaterialStatus::Borrowed);

        let err = engine(&store).issue(emp, "site work", &[m1, m2]).await.unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
        // neither material moved and no record was written
        assert_eq!(store.material_status(m1), "available");
        assert_eq!(store.material_status(m2), "borrowed");
        assert_eq!(store.borrow_record_count(), 0);
    }

    #[actix_web::test]
    async fn issue_rejects_empty_and_duplicate_selections() {
        let store = MemStore::new();
        let emp = store.seed_employee("Abebe", EmployeeStatus::Active);
        let m1 = store.seed_material("laptop", MaterialStatus::Available);

        let err = engine(&store).issue(emp, "x", &[]).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = engine(&store).issue(emp, "x", &[m1, m1]).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(store.material_status(m1), "available");
    }

    #[actix_web::test]
    async fn issue_rejects_inactive_employee() {
        let store = MemStore::new();
        let emp = store.seed_employee("Abebe", EmployeeStatus::Left);
        let m1 = store.seed_material("laptop", MaterialStatus::Available);

        let err = engine(&store).issue(emp, "x", &[m1]).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(store.material_status(m1), "available");
    }

    #[actix_web::test]
    async fn return_all_frees_materials_and_is_idempotent() {
        let store = MemStore::new();
        let emp = store.seed_employee("Abebe", EmployeeStatus::Active);
        let m1 = store.seed_material("laptop", MaterialStatus::Available);
        let engine = engine(&store);

        engine.issue(emp, "work", &[m1]).await.unwrap();
        let returned = engine.return_all(emp).await.unwrap();

        assert_eq!(returned, 1);
        assert_eq!(store.material_status(m1), "available");
        assert_eq!(engine.outstanding_count(emp).await.unwrap(), 0);

        // second call is a no-op, not an error
        assert_eq!(engine.return_all(emp).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn return_all_unknown_employee_is_not_found() {
        let store = MemStore::new();
        let err = engine(&store).return_all(999).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[actix_web::test]
    async fn return_selected_keeps_the_rest_open() {
        let store = MemStore::new();
        let emp = store.seed_employee("Abebe", EmployeeStatus::Active);
        let m1 = store.seed_material("laptop", MaterialStatus::Available);
        let m2 = store.seed_material("drill", MaterialStatus::Available);
        let engine = engine(&store);

        let records = engine.issue(emp, "work", &[m1, m2]).await.unwrap();
        let outcome = engine.return_selected(emp, &records[..1]).await.unwrap();

        assert_eq!(outcome.returned, 1);
        assert_eq!(outcome.remaining, 1);
        assert_eq!(store.material_status(m1), "available");
        assert_eq!(store.material_status(m2), "borrowed");
        assert_eq!(engine.outstanding_count(emp).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn return_selected_rejects_foreign_or_closed_records() {
        let store = MemStore::new();
        let emp = store.seed_employee("Abebe", EmployeeStatus::Active);
        let other = store.seed_employee("Mulu", EmployeeStatus::Active);
        let m1 = store.seed_material("laptop", MaterialStatus::Available);
        let m2 = store.seed_material("drill", MaterialStatus::Available);
        let engine = engine(&store);

        let theirs = engine.issue(other, "work", &[m1]).await.unwrap();
        let mine = engine.issue(emp, "work", &[m2]).await.unwrap();

        // someone else's record
        let err = engine.return_selected(emp, &theirs).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(store.material_status(m1), "borrowed");

        // already-returned record
        engine.return_selected(emp, &mine).await.unwrap();
        let err = engine.return_selected(emp, &mine).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        // empty selection
        let err = engine.return_selected(emp, &[]).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[actix_web::test]
    async fn a_material_never_has_two_open_records() {
        let store = MemStore::new();
        let e1 = store.seed_employee("Abebe", EmployeeStatus::Active);
        let e2 = store.seed_employee("Mulu", EmployeeStatus::Active);
        let m1 = store.seed_material("laptop", MaterialStatus::Available);
        let engine = engine(&store);

        engine.issue(e1, "work", &[m1]).await.unwrap();
        let err = engine.issue(e2, "work", &[m1]).await.unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(store.borrow_record_count(), 1);

        // after a return the material can circulate again
        engine.return_all(e1).await.unwrap();
        engine.issue(e2, "work", &[m1]).await.unwrap();
        assert_eq!(store.open_borrow_count(e2), 1);
    }
}
