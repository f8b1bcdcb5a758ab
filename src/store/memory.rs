use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::StoreError;
use crate::model::attendance::{AttendanceMark, AttendanceRecord, AttendanceStatus};
use crate::model::employee::Employee;
use crate::model::payslip::Payslip;
use crate::payroll::period::PayPeriod;
use crate::store::{AttendanceStore, EmployeeStore, PayslipStore};

/// In-process stand-in for the MySQL stores.
#[derive(Default)]
pub struct MemoryStore {
    employees: Mutex<HashMap<String, Employee>>,
    attendance: Mutex<BTreeMap<(String, NaiveDate), AttendanceStatus>>,
    payslips: Mutex<Vec<Payslip>>,
}

impl MemoryStore {
    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let store = Self::default();
        store
            .employees
            .lock()
            .unwrap()
            .extend(employees.into_iter().map(|e| (e.id.clone(), e)));
        store
    }

    pub fn payslip_count(&self) -> usize {
        self.payslips.lock().unwrap().len()
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn find_employee(&self, id: &str) -> Result<Option<Employee>, StoreError> {
        Ok(self.employees.lock().unwrap().get(id).cloned())
    }

    async fn list_employees(&self, search: Option<&str>) -> Result<Vec<Employee>, StoreError> {
        let needle = search.map(str::to_lowercase);
        let mut employees: Vec<Employee> = self
            .employees
            .lock()
            .unwrap()
            .values()
            .filter(|e| {
                needle.as_deref().map_or(true, |n| {
                    [&e.id, &e.name, &e.department]
                        .iter()
                        .any(|field| field.to_lowercase().contains(n))
                })
            })
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(employees)
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn upsert_mark(&self, mark: &AttendanceMark) -> Result<(), StoreError> {
        self.attendance
            .lock()
            .unwrap()
            .insert((mark.employee_id.clone(), mark.date), mark.status);
        Ok(())
    }

    async fn records_for(
        &self,
        employee_id: &str,
        period: PayPeriod,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let marks = self.marks_in(period, Some(employee_id)).await?;
        Ok(marks.iter().map(AttendanceRecord::from).collect())
    }

    async fn marks_in(
        &self,
        period: PayPeriod,
        employee_id: Option<&str>,
    ) -> Result<Vec<AttendanceMark>, StoreError> {
        let attendance = self.attendance.lock().unwrap();
        let mut marks: Vec<AttendanceMark> = attendance
            .iter()
            .filter(|((emp, date), _)| {
                period.contains(*date) && employee_id.map_or(true, |id| id == emp.as_str())
            })
            .map(|((emp, date), status)| AttendanceMark {
                employee_id: emp.clone(),
                date: *date,
                status: *status,
            })
            .collect();
        marks.sort_by(|a, b| (a.date, &a.employee_id).cmp(&(b.date, &b.employee_id)));
        Ok(marks)
    }
}

#[async_trait]
impl PayslipStore for MemoryStore {
    async fn append_payslip(&self, payslip: &Payslip) -> Result<(), StoreError> {
        self.payslips.lock().unwrap().push(payslip.clone());
        Ok(())
    }

    async fn find_payslip(&self, id: &str) -> Result<Option<Payslip>, StoreError> {
        Ok(self
            .payslips
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn history(&self, employee_id: &str) -> Result<Vec<Payslip>, StoreError> {
        // later appends win ties, like the seq column in MySQL
        Ok(self
            .payslips
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|p| p.employee_id == employee_id)
            .cloned()
            .collect())
    }
}
