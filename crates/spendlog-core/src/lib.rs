//! Core expense tracking: record storage, queries and reports
//!
//! - [`store::RecordStore`] owns the expense list and its storage slot
//! - [`query`] filters, orders and totals record slices
//! - [`reports`] groups spending by category, payment mode and month

pub mod error;
pub mod filter;
pub mod models;
pub mod query;
pub mod reports;
pub mod storage;
pub mod store;
pub mod time;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use filter::FilterSpec;
pub use models::{amount_from_f64, parse_amount, parse_date, ExpenseRecord, NewExpense};
pub use query::{
    current_month_total, filter, records_in_range, render, sort_by_date_descending, total,
    ExpenseView,
};
pub use reports::{category_breakdown, monthly_summaries, payment_mode_breakdown, Breakdown, MonthlySummary};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{RecordStore, RecordValidator, DEFAULT_KEY};
pub use time::TimeContext;
