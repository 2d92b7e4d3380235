use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, Transaction};

use super::{EntityStore, StoreError, StoreTx};
use crate::model::borrow_record::BorrowRecord;
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::leave::LeaveRecord;
use crate::model::material::{Material, MaterialStatus};
use crate::model::waiting::WaitingEntry;

const EMPLOYEE_COLS: &str =
    "id, name, father_name, grand_father_name, sex, position, employment_status, \
     phone_number, project, status";

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

pub struct MySqlTx {
    tx: Transaction<'static, MySql>,
}

#[async_trait]
impl EntityStore for MySqlStore {
    type Tx = MySqlTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(MySqlTx { tx })
    }
}

#[async_trait]
impl StoreTx for MySqlTx {
    async fn employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError> {
        let sql = format!("SELECT {EMPLOYEE_COLS} FROM employees WHERE id = ?");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(employee)
    }

    async fn set_employee_status(
        &mut self,
        id: u64,
        status: EmployeeStatus,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE employees SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn material_for_update(&mut self, id: u64) -> Result<Option<Material>, StoreError> {
        let material = sqlx::query_as::<_, Material>(
            "SELECT id, name, serial_number, status FROM materials WHERE id = ? FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(material)
    }

    async fn set_material_status(
        &mut self,
        id: u64,
        status: MaterialStatus,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE materials SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn insert_borrow(
        &mut self,
        employee_id: u64,
        material_id: u64,
        purpose: &str,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO borrow_records (employee_id, material_id, purpose) VALUES (?, ?, ?)",
        )
        .bind(employee_id)
        .bind(material_id)
        .bind(purpose)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.last_insert_id())
    }

    async fn open_borrows(&mut self, employee_id: u64) -> Result<Vec<BorrowRecord>, StoreError> {
        let records = sqlx::query_as::<_, BorrowRecord>(
            "SELECT id, employee_id, material_id, purpose, borrow_date, is_returned \
             FROM borrow_records \
             WHERE employee_id = ? AND is_returned = FALSE \
             FOR UPDATE",
        )
        .bind(employee_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(records)
    }

    async fn mark_returned(&mut self, record_id: u64) -> Result<(), StoreError> {
        sqlx::query("UPDATE borrow_records SET is_returned = TRUE WHERE id = ?")
            .bind(record_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn waiting_entry(
        &mut self,
        employee_id: u64,
    ) -> Result<Option<WaitingEntry>, StoreError> {
        let entry = sqlx::query_as::<_, WaitingEntry>(
            "SELECT id, employee_id, added_date FROM waiting_entries \
             WHERE employee_id = ? FOR UPDATE",
        )
        .bind(employee_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(entry)
    }

    async fn insert_waiting(&mut self, employee_id: u64) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO waiting_entries (employee_id) VALUES (?)")
            .bind(employee_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_waiting(&mut self, employee_id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM waiting_entries WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn leave_record(&mut self, employee_id: u64) -> Result<Option<LeaveRecord>, StoreError> {
        let record = sqlx::query_as::<_, LeaveRecord>(
            "SELECT id, employee_id, leave_date FROM leave_records \
             WHERE employee_id = ? FOR UPDATE",
        )
        .bind(employee_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(record)
    }

    async fn insert_leave(&mut self, employee_id: u64) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO leave_records (employee_id) VALUES (?)")
            .bind(employee_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_leave(&mut self, employee_id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM leave_records WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
