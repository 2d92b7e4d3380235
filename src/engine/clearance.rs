use super::error::CoreError;
use crate::model::employee::EmployeeStatus;
use crate::store::{EntityStore, StoreTx};

/// State machine over an employee's exit: active -> pending clearance
/// (waiting entry) -> left (leave record), and back on reinstatement.
/// The waiting queue never gates approval; the two paths stay independent.
/// Approval only insists the employee holds no outstanding materials.
#[derive(Clone)]
pub struct ClearanceWorkflow<S> {
    store: S,
}

impl<S: EntityStore> ClearanceWorkflow<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Puts an employee on the waiting-for-return queue. Only employees
    /// who actually hold materials belong there.
    pub async fn enqueue_waiting(&self, employee_id: u64) -> Result<(), CoreError> {
        let mut tx = self.store.begin().await?;

        let employee = tx
            .employee(employee_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("employee {employee_id} not found")))?;

        if tx.open_borrows(employee_id).await?.is_empty() {
            return Err(CoreError::Validation(format!(
                "employee '{} {}' has no borrowed materials",
                employee.name, employee.father_name
            )));
        }
        if tx.waiting_entry(employee_id).await?.is_some() {
            return Err(CoreError::Conflict(format!(
                "employee '{} {}' is already in the waiting list",
                employee.name, employee.father_name
            )));
        }

        tx.insert_waiting(employee_id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Withdraws an employee from the waiting queue.
    pub async fn dequeue_waiting(&self, employee_id: u64) -> Result<(), CoreError> {
        let mut tx = self.store.begin().await?;

        if !tx.delete_waiting(employee_id).await? {
            return Err(CoreError::NotFound(
                "employee is not in the waiting list".to_string(),
            ));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Clears an employee for departure. Creating the leave record is
    /// idempotent; a lingering waiting entry is removed so a departed
    /// employee never sits in the queue.
    pub async fn approve_leave(&self, employee_id: u64) -> Result<(), CoreError> {
        let mut tx = self.store.begin().await?;

        let employee = tx
            .employee(employee_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("employee {employee_id} not found")))?;

        if !tx.open_borrows(employee_id).await?.is_empty() {
            return Err(CoreError::Conflict(format!(
                "employee '{} {}' has borrowed materials",
                employee.name, employee.father_name
            )));
        }

        if tx.leave_record(employee_id).await?.is_none() {
            tx.insert_leave(employee_id).await?;
        }
        tx.delete_waiting(employee_id).await?;
        tx.set_employee_status(employee_id, EmployeeStatus::Left)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Brings a departed employee back: drops the leave record and
    /// reactivates them.
    pub async fn reinstate(&self, employee_id: u64) -> Result<(), CoreError> {
        let mut tx = self.store.begin().await?;

        tx.employee(employee_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("employee {employee_id} not found")))?;

        if !tx.delete_leave(employee_id).await? {
            return Err(CoreError::NotFound(
                "employee is not in the leave-out archive".to_string(),
            ));
        }
        tx.set_employee_status(employee_id, EmployeeStatus::Active)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BorrowEngine;
    use crate::model::material::MaterialStatus;
    use crate::store::mem::MemStore;

    struct Fixture {
        store: MemStore,
        engine: BorrowEngine<MemStore>,
        workflow: ClearanceWorkflow<MemStore>,
    }

    fn fixture() -> Fixture {
        let store = MemStore::new();
        Fixture {
            engine: BorrowEngine::new(store.clone()),
            workflow: ClearanceWorkflow::new(store.clone()),
            store,
        }
    }

    #[actix_web::test]
    async fn enqueue_requires_outstanding_materials() {
        let f = fixture();
        let emp = f.store.seed_employee("Abebe", EmployeeStatus::Active);

        let err = f.workflow.enqueue_waiting(emp).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(!f.store.has_waiting(emp));
    }

    #[actix_web::test]
    async fn enqueue_rejects_double_entry() {
        let f = fixture();
        let emp = f.store.seed_employee("Abebe", EmployeeStatus::Active);
        let mat = f.store.seed_material("laptop", MaterialStatus::Available);
        f.engine.issue(emp, "work", &[mat]).await.unwrap();

        f.workflow.enqueue_waiting(emp).await.unwrap();
        assert!(f.store.has_waiting(emp));

        let err = f.workflow.enqueue_waiting(emp).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[actix_web::test]
    async fn dequeue_removes_entry_or_reports_absence() {
        let f = fixture();
        let emp = f.store.seed_employee("Abebe", EmployeeStatus::Active);
        let mat = f.store.seed_material("laptop", MaterialStatus::Available);
        f.engine.issue(emp, "work", &[mat]).await.unwrap();
        f.workflow.enqueue_waiting(emp).await.unwrap();

        f.workflow.dequeue_waiting(emp).await.unwrap();
        assert!(!f.store.has_waiting(emp));

        let err = f.workflow.dequeue_waiting(emp).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[actix_web::test]
    async fn approve_leave_blocks_on_outstanding_materials() {
        let f = fixture();
        let emp = f.store.seed_employee("Abebe", EmployeeStatus::Active);
        let mat = f.store.seed_material("laptop", MaterialStatus::Available);
        f.engine.issue(emp, "work", &[mat]).await.unwrap();

        let err = f.workflow.approve_leave(emp).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
        assert_eq!(f.store.employee_status(emp), "active");
        assert!(!f.store.has_leave(emp));
    }

    #[actix_web::test]
    async fn approve_leave_archives_and_clears_the_queue() {
        let f = fixture();
        let emp = f.store.seed_employee("Abebe", EmployeeStatus::Active);
        let mat = f.store.seed_material("laptop", MaterialStatus::Available);
        f.engine.issue(emp, "work", &[mat]).await.unwrap();
        f.workflow.enqueue_waiting(emp).await.unwrap();
        f.engine.return_all(emp).await.unwrap();

        f.workflow.approve_leave(emp).await.unwrap();

        assert_eq!(f.store.employee_status(emp), "left");
        assert!(f.store.has_leave(emp));
        // the stale waiting entry is swept up with the approval
        assert!(!f.store.has_waiting(emp));

        // approving again keeps a single leave record
        f.workflow.approve_leave(emp).await.unwrap();
        assert!(f.store.has_leave(emp));
    }

    #[actix_web::test]
    async fn reinstate_reverses_a_departure() {
        let f = fixture();
        let emp = f.store.seed_employee("Abebe", EmployeeStatus::Active);
        f.workflow.approve_leave(emp).await.unwrap();
        assert_eq!(f.store.employee_status(emp), "left");

        f.workflow.reinstate(emp).await.unwrap();

        assert_eq!(f.store.employee_status(emp), "active");
        assert!(!f.store.has_leave(emp));

        let err = f.workflow.reinstate(emp).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }
}
