//! Payslip pipeline: attendance aggregation, pay computation, remark and assembly.

pub mod assembler;
pub mod attendance;
pub mod calculator;
pub mod period;
pub mod policy;
pub mod remark;
pub mod service;
