#![doc = include_str!("../README.md")]

mod groups;
mod month;
mod record;
mod report;
mod sales;
mod usd;

pub use groups::Groups;
pub use month::Month;
pub use record::{parse_line, LineError, Transaction, FIELDS};
pub use report::{reduce, MonthlyReport, PopularItem, RevenueItem, Summary, NOT_AVAILABLE};
pub use sales::{ItemStats, MonthItems, MonthlySales};
pub use usd::{Usd, MAX_AMOUNT};
