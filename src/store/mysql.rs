use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};

use crate::errors::StoreError;
use crate::model::attendance::{AttendanceMark, AttendanceRecord, AttendanceStatus};
use crate::model::employee::Employee;
use crate::model::payslip::{Deductions, Earnings, Payslip};
use crate::payroll::period::PayPeriod;
use crate::store::{AttendanceStore, EmployeeStore, PayslipStore};

/// All three collaborator stores backed by one MySQL pool.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn parse_status(raw: &str) -> Result<AttendanceStatus, StoreError> {
    AttendanceStatus::from_str(raw)
        .map_err(|_| StoreError::Corrupt(format!("unknown attendance status {:?}", raw)))
}

const EMPLOYEE_COLUMNS: &str = r#"
    id, name, email, phone, role, department, join_date, pan,
    basic_salary, hra, da, special_allowance,
    bank_account_number, pf_account_number, esi_number
"#;

#[async_trait]
impl EmployeeStore for MySqlStore {
    async fn find_employee(&self, id: &str) -> Result<Option<Employee>, StoreError> {
        let sql = format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS);

        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(employee)
    }

    async fn list_employees(&self, search: Option<&str>) -> Result<Vec<Employee>, StoreError> {
        let pattern = search.map(|s| format!("%{}%", s.to_lowercase()));
        let sql = format!(
            r#"
            SELECT {} FROM employees
            WHERE ? IS NULL
               OR LOWER(id) LIKE ? OR LOWER(name) LIKE ? OR LOWER(department) LIKE ?
            ORDER BY id
            "#,
            EMPLOYEE_COLUMNS
        );

        let employees = sqlx::query_as::<_, Employee>(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(employees)
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn upsert_mark(&self, mark: &AttendanceMark) -> Result<(), StoreError> {
        let status: &str = mark.status.as_ref();

        sqlx::query(
            r#"
            INSERT INTO attendance_records (employee_id, date, status)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE status = VALUES(status)
            "#,
        )
        .bind(&mark.employee_id)
        .bind(mark.date)
        .bind(status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn records_for(
        &self,
        employee_id: &str,
        period: PayPeriod,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let rows = sqlx::query_as::<_, (NaiveDate, String)>(
            r#"
            SELECT date, status
            FROM attendance_records
            WHERE employee_id = ? AND YEAR(date) = ? AND MONTH(date) = ?
            ORDER BY date
            "#,
        )
        .bind(employee_id)
        .bind(period.year())
        .bind(period.month())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(date, status)| {
                Ok(AttendanceRecord {
                    date,
                    status: parse_status(&status)?,
                })
            })
            .collect()
    }

    async fn marks_in(
        &self,
        period: PayPeriod,
        employee_id: Option<&str>,
    ) -> Result<Vec<AttendanceMark>, StoreError> {
        let rows = sqlx::query_as::<_, (String, NaiveDate, String)>(
            r#"
            SELECT employee_id, date, status
            FROM attendance_records
            WHERE YEAR(date) = ? AND MONTH(date) = ?
            AND (? IS NULL OR employee_id = ?)
            ORDER BY date, employee_id
            "#,
        )
        .bind(period.year())
        .bind(period.month())
        .bind(employee_id)
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(employee_id, date, status)| {
                Ok(AttendanceMark {
                    employee_id,
                    date,
                    status: parse_status(&status)?,
                })
            })
            .collect()
    }
}

#[derive(FromRow)]
struct PayslipRow {
    id: String,
    employee_id: String,
    month: String,
    year: i32,
    generated_date: DateTime<Utc>,
    attendance_percentage: Decimal,
    basic: Decimal,
    hra: Decimal,
    da: Decimal,
    special_allowance: Decimal,
    gross: Decimal,
    pf: Decimal,
    esi: Decimal,
    pt: Decimal,
    tax: Decimal,
    total_deductions: Decimal,
    net_salary: Decimal,
    remarks: Option<String>,
}

impl From<PayslipRow> for Payslip {
    fn from(row: PayslipRow) -> Self {
        Payslip {
            id: row.id,
            employee_id: row.employee_id,
            month: row.month,
            year: row.year,
            generated_date: row.generated_date,
            attendance_percentage: row.attendance_percentage,
            earnings: Earnings {
                basic: row.basic,
                hra: row.hra,
                da: row.da,
                special_allowance: row.special_allowance,
                gross: row.gross,
            },
            deductions: Deductions {
                pf: row.pf,
                esi: row.esi,
                pt: row.pt,
                tax: row.tax,
                total_deductions: row.total_deductions,
            },
            net_salary: row.net_salary,
            remarks: row.remarks,
        }
    }
}

const PAYSLIP_COLUMNS: &str = r#"
    id, employee_id, month, year, generated_date, attendance_percentage,
    basic, hra, da, special_allowance, gross,
    pf, esi, pt, tax, total_deductions,
    net_salary, remarks
"#;

#[async_trait]
impl PayslipStore for MySqlStore {
    async fn append_payslip(&self, payslip: &Payslip) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO payslips ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            PAYSLIP_COLUMNS
        );

        sqlx::query(&sql)
            .bind(&payslip.id)
            .bind(&payslip.employee_id)
            .bind(&payslip.month)
            .bind(payslip.year)
            .bind(payslip.generated_date)
            .bind(payslip.attendance_percentage)
            .bind(payslip.earnings.basic)
            .bind(payslip.earnings.hra)
            .bind(payslip.earnings.da)
            .bind(payslip.earnings.special_allowance)
            .bind(payslip.earnings.gross)
            .bind(payslip.deductions.pf)
            .bind(payslip.deductions.esi)
            .bind(payslip.deductions.pt)
            .bind(payslip.deductions.tax)
            .bind(payslip.deductions.total_deductions)
            .bind(payslip.net_salary)
            .bind(&payslip.remarks)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_payslip(&self, id: &str) -> Result<Option<Payslip>, StoreError> {
        let sql = format!("SELECT {} FROM payslips WHERE id = ?", PAYSLIP_COLUMNS);

        let row = sqlx::query_as::<_, PayslipRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Payslip::from))
    }

    async fn history(&self, employee_id: &str) -> Result<Vec<Payslip>, StoreError> {
        // seq breaks ties between payslips generated within the same instant
        let sql = format!(
            "SELECT {} FROM payslips WHERE employee_id = ? ORDER BY generated_date DESC, seq DESC",
            PAYSLIP_COLUMNS
        );

        let rows = sqlx::query_as::<_, PayslipRow>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Payslip::from).collect())
    }
}
