//! Error types for the bill splitter.
//!
//! The balance and settlement computation itself never fails; these errors
//! come from the layers around it (input, validation, ledger, notifications).

use crate::money::Money;
use thiserror::Error;

/// Result type alias for fallible operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// Errors that can occur outside the core computation.
#[derive(Error, Debug)]
pub enum SplitError {
    /// Failed to open, read or write a file or stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Group file is not valid JSON or has the wrong shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: bill-splitter <group.json> [--csv] [--strict] [--notify]")]
    MissingArgument,

    /// Unrecognized command-line option
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// Two members share a name
    #[error("Duplicate member name: {name}")]
    DuplicateMember { name: String },

    /// A member has an empty name
    #[error("Member at position {position} has no name")]
    EmptyMemberName { position: usize },

    /// A member email does not look like an address
    #[error("Invalid email for {name}: {email}")]
    InvalidEmail { name: String, email: String },

    /// An expense or payer amount is below zero
    #[error("Expense {expense} has a negative amount: {amount}")]
    NegativeAmount { expense: usize, amount: Money },

    /// Payer contributions do not add up to the expense amount
    #[error("Expense {expense} amount {amount} does not match payer total {paid}")]
    PayerSumMismatch {
        expense: usize,
        amount: Money,
        paid: Money,
    },

    /// A payer is not a member of the group
    #[error("Expense {expense} names unknown payer {name}")]
    UnknownPayer { expense: usize, name: String },

    /// Members cannot be notified without an email address
    #[error("The following members are missing email addresses: {}", .names.join(", "))]
    MissingEmails { names: Vec<String> },

    /// No expense with this id
    #[error("Expense {0} not found")]
    ExpenseNotFound(u32),

    /// No settlement with this id
    #[error("Settlement {0} not found")]
    SettlementNotFound(u64),

    /// A notifier could not deliver a notice
    #[error("Delivery to {recipient} failed: {reason}")]
    Delivery { recipient: String, reason: String },
}
