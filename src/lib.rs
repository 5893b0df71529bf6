//! # Bill Splitter
//!
//! Computes who owes whom in a group of people sharing expenses.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: `rust_decimal`, inputs and output rounded to
//!   4 decimal places, exact in between
//! - **One-cent tolerance**: balances within 0.01 of zero count as settled
//! - **Tolerant core**: malformed amounts become zero, unknown payers are
//!   ignored, empty groups yield an empty report; strict checks live in
//!   [`validation`]
//! - **Deterministic output**: members keep roster order, ties keep roster
//!   order
//!
//! ## Example
//!
//! ```
//! use bill_splitter::{calculate_balance, Expense, Member, Money};
//! use std::str::FromStr;
//!
//! let members = vec![Member::named("Alice"), Member::named("Bob")];
//! let expenses = vec![Expense::single(Money::from_str("100").unwrap(), "Alice")];
//!
//! let report = calculate_balance(&members, &expenses);
//! assert_eq!(report.settlements[0].from, "Bob");
//! assert_eq!(report.settlements[0].amount.to_string(), "50.0000");
//! ```

pub mod balance;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod model;
pub mod money;
pub mod notify;
pub mod record;
pub mod report;
pub mod settlement;
pub mod validation;

pub use balance::{calculate_balance, BalanceReport, MemberBalance, MemberBalances};
pub use config::{OutputFormat, RunConfig};
pub use engine::{ExpenseId, SplitEngine};
pub use error::{Result, SplitError};
pub use ledger::{Settlement, SettlementLedger, SettlementStatus};
pub use model::{Expense, Funding, Group, Member, Payer};
pub use money::Money;
pub use notify::{DeliveryOutcome, LogNotifier, Notice, Notifier};
pub use record::{ExpenseRecord, GroupRecord, MemberRecord};
pub use settlement::{resolve_settlements, Transfer};
