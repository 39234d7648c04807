//! Service layer: the workflows that span more than one store.

pub mod order_service;
pub mod sales_service;

pub use order_service::{OrderError, OrderService};
pub use sales_service::{ReportScheduler, ReportSchedulerHandle, SalesError, SalesService};
