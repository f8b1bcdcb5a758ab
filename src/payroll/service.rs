use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::errors::PayrollError;
use crate::model::attendance::{AttendanceMark, AttendanceStatus};
use crate::model::employee::Employee;
use crate::model::payslip::Payslip;
use crate::payroll::assembler::assemble;
use crate::payroll::attendance::attendance_for_period;
use crate::payroll::calculator::PayslipCalculator;
use crate::payroll::period::PayPeriod;
use crate::payroll::remark::{RemarkContext, RemarkGenerator, WithFallback};
use crate::store::{AttendanceStore, EmployeeStore, PayslipStore};

/// Runs the payslip pipeline against the collaborator stores.
pub struct PayrollService {
    employees: Arc<dyn EmployeeStore>,
    attendance: Arc<dyn AttendanceStore>,
    payslips: Arc<dyn PayslipStore>,
    calculator: PayslipCalculator,
    remarks: WithFallback<Arc<dyn RemarkGenerator>>,
}

impl PayrollService {
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        attendance: Arc<dyn AttendanceStore>,
        payslips: Arc<dyn PayslipStore>,
        calculator: PayslipCalculator,
        remarks: Arc<dyn RemarkGenerator>,
    ) -> Self {
        Self {
            employees,
            attendance,
            payslips,
            calculator,
            remarks: WithFallback::new(remarks),
        }
    }

    pub async fn employee(&self, employee_id: &str) -> Result<Employee, PayrollError> {
        self.employees
            .find_employee(employee_id)
            .await?
            .ok_or_else(|| PayrollError::EmployeeNotFound(employee_id.to_string()))
    }

    pub async fn employees(&self, search: Option<&str>) -> Result<Vec<Employee>, PayrollError> {
        Ok(self.employees.list_employees(search).await?)
    }

    /// Computes, assembles and appends a new payslip. Earlier payslips for the
    /// same month are kept.
    #[instrument(name = "generate_payslip", skip(self, period), fields(period = %period))]
    pub async fn generate(
        &self,
        employee_id: &str,
        period: PayPeriod,
    ) -> Result<Payslip, PayrollError> {
        let employee = self.employee(employee_id).await?;
        let records = self.attendance.records_for(employee_id, period).await?;

        let attendance_percentage = attendance_for_period(&records, period)?;
        let computation = self
            .calculator
            .compute(&employee.salary_structure(), attendance_percentage)?;

        if computation.has_negative_net_pay() {
            warn!(
                employee_id,
                net_salary = %computation.net_salary,
                "Deductions exceed gross earnings, payslip needs review"
            );
        }

        let context = RemarkContext::new(&employee, attendance_percentage, computation.net_salary);
        let remark = self.remarks.remark(&context).await;

        let payslip = assemble(
            &employee.id,
            period,
            attendance_percentage,
            computation,
            Some(remark),
        );
        self.payslips.append_payslip(&payslip).await?;

        info!(
            payslip_id = %payslip.id,
            employee_id,
            attendance = %payslip.attendance_percentage,
            net_salary = %payslip.net_salary,
            "Payslip generated"
        );
        Ok(payslip)
    }

    pub async fn history(&self, employee_id: &str) -> Result<Vec<Payslip>, PayrollError> {
        Ok(self.payslips.history(employee_id).await?)
    }

    pub async fn payslip(&self, payslip_id: &str) -> Result<Payslip, PayrollError> {
        self.payslips
            .find_payslip(payslip_id)
            .await?
            .ok_or_else(|| PayrollError::PayslipNotFound(payslip_id.to_string()))
    }

    pub async fn mark_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<AttendanceMark, PayrollError> {
        let employee = self.employee(employee_id).await?;
        let mark = AttendanceMark {
            employee_id: employee.id,
            date,
            status,
        };
        self.attendance.upsert_mark(&mark).await?;
        Ok(mark)
    }

    pub async fn attendance(
        &self,
        period: PayPeriod,
        employee_id: Option<&str>,
    ) -> Result<Vec<AttendanceMark>, PayrollError> {
        Ok(self.attendance.marks_in(period, employee_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::remark::FALLBACK_REMARK;
    use crate::test_support::{StaticRemark, employee, memory_service, rajesh};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn november() -> PayPeriod {
        PayPeriod::new(2025, 11).unwrap()
    }

    #[actix_web::test]
    async fn full_month_of_presence_pays_full_structure() {
        let (service, store) = memory_service(vec![rajesh()], StaticRemark::ok("Great month."));
        for d in 1..=30 {
            service
                .mark_attendance("EMP001", day(d), AttendanceStatus::Present)
                .await
                .unwrap();
        }

        let slip = service.generate("EMP001", november()).await.unwrap();

        assert_eq!(slip.attendance_percentage, dec!(100));
        assert_eq!(slip.earnings.gross, dec!(72500));
        assert_eq!(slip.deductions.total_deductions, dec!(5600));
        assert_eq!(slip.net_salary, dec!(66900));
        assert_eq!(slip.month, "2025-11");
        assert_eq!(slip.remarks.as_deref(), Some("Great month."));
        assert_eq!(store.payslip_count(), 1);
    }

    #[actix_web::test]
    async fn mixed_month_uses_weighted_attendance() {
        let (service, _) = memory_service(vec![rajesh()], StaticRemark::ok("ok"));
        let statuses = (1..=30).map(|d| match d {
            1..=20 => AttendanceStatus::Present,
            21..=24 => AttendanceStatus::HalfDay,
            25..=28 => AttendanceStatus::Absent,
            _ => AttendanceStatus::Leave,
        });
        for (d, status) in (1..=30).zip(statuses) {
            service.mark_attendance("EMP001", day(d), status).await.unwrap();
        }

        let slip = service.generate("EMP001", november()).await.unwrap();
        assert_eq!(slip.attendance_percentage, dec!(73.3));
        assert_eq!(slip.earnings.basic, dec!(32985));
    }

    #[actix_web::test]
    async fn remarking_a_day_replaces_the_earlier_mark() {
        let (service, _) = memory_service(vec![rajesh()], StaticRemark::ok("ok"));
        service
            .mark_attendance("EMP001", day(3), AttendanceStatus::Absent)
            .await
            .unwrap();
        service
            .mark_attendance("EMP001", day(3), AttendanceStatus::Present)
            .await
            .unwrap();

        let marks = service.attendance(november(), Some("EMP001")).await.unwrap();
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].status, AttendanceStatus::Present);
    }

    #[actix_web::test]
    async fn no_attendance_means_zero_pay() {
        let (service, _) = memory_service(vec![rajesh()], StaticRemark::ok("ok"));
        let slip = service.generate("EMP001", november()).await.unwrap();

        assert_eq!(slip.attendance_percentage, Decimal::ZERO);
        assert!(slip.earnings.gross.is_zero());
        assert!(slip.deductions.pt.is_zero());
        assert!(slip.net_salary.is_zero());
    }

    #[actix_web::test]
    async fn regeneration_appends_newest_first() {
        let (service, store) = memory_service(vec![rajesh()], StaticRemark::ok("ok"));
        let first = service.generate("EMP001", november()).await.unwrap();
        service
            .mark_attendance("EMP001", day(1), AttendanceStatus::Present)
            .await
            .unwrap();
        let second = service.generate("EMP001", november()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.payslip_count(), 2);

        let history = service.history("EMP001").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
        assert_eq!(service.payslip(&first.id).await.unwrap(), first);
    }

    #[actix_web::test]
    async fn remark_outage_does_not_fail_generation() {
        let (service, _) = memory_service(vec![rajesh()], StaticRemark::failing());
        let slip = service.generate("EMP001", november()).await.unwrap();
        assert_eq!(slip.remarks.as_deref(), Some(FALLBACK_REMARK));
    }

    #[actix_web::test]
    async fn unknown_employee_is_reported() {
        let (service, store) = memory_service(vec![rajesh()], StaticRemark::ok("ok"));

        assert!(matches!(
            service.generate("EMP404", november()).await,
            Err(PayrollError::EmployeeNotFound(_))
        ));
        assert!(matches!(
            service
                .mark_attendance("EMP404", day(1), AttendanceStatus::Present)
                .await,
            Err(PayrollError::EmployeeNotFound(_))
        ));
        assert!(matches!(
            service.payslip("missing").await,
            Err(PayrollError::PayslipNotFound(_))
        ));
        assert_eq!(store.payslip_count(), 0);
    }

    #[actix_web::test]
    async fn negative_salary_head_is_rejected_without_writing() {
        let mut broken = employee("EMP009", dec!(10000));
        broken.hra = dec!(-500);
        let (service, store) = memory_service(vec![broken], StaticRemark::ok("ok"));

        let err = service.generate("EMP009", november()).await.unwrap_err();
        assert!(err.is_configuration_error());
        assert_eq!(store.payslip_count(), 0);
    }

    #[actix_web::test]
    async fn other_months_do_not_leak_into_the_period() {
        let (service, _) = memory_service(vec![rajesh()], StaticRemark::ok("ok"));
        service
            .mark_attendance(
                "EMP001",
                NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
                AttendanceStatus::Present,
            )
            .await
            .unwrap();

        let slip = service.generate("EMP001", november()).await.unwrap();
        assert_eq!(slip.attendance_percentage, Decimal::ZERO);
    }
}
