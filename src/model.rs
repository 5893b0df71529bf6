//! Normalized group, member and expense types consumed by the core.
//!
//! Wire-level variations (bare-string members, `payer` vs `payers`, amounts
//! sent as strings) are resolved in [`crate::record`] before values reach
//! these types.

use crate::money::Money;
use serde::Serialize;

/// A group member. The name is the join key for payers and settlements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub name: String,
    pub email: String,
}

impl Member {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Member {
            name: name.into(),
            email: email.into(),
        }
    }

    /// A member known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Member::new(name, String::new())
    }
}

/// One contributor to a multi-payer expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payer {
    pub name: String,
    pub amount: Money,
}

impl Payer {
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        Payer {
            name: name.into(),
            amount,
        }
    }
}

/// Who funded an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Funding {
    /// Several members paid, each their own amount.
    Shared(Vec<Payer>),

    /// One member paid the full amount.
    Sole(String),

    /// No usable payer name. The amount still counts toward the group total.
    Unattributed,
}

/// A shared expense, always split equally across the whole group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub title: String,
    pub amount: Money,
    pub split_equally: bool,
    pub funding: Funding,
}

impl Expense {
    /// An expense paid in full by one member.
    pub fn single(amount: Money, payer: impl Into<String>) -> Self {
        Expense {
            title: String::new(),
            amount,
            split_equally: true,
            funding: Funding::Sole(payer.into()),
        }
    }

    /// An expense funded by several members.
    pub fn shared(amount: Money, payers: Vec<Payer>) -> Self {
        Expense {
            title: String::new(),
            amount,
            split_equally: true,
            funding: Funding::Shared(payers),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn is_multi_payer(&self) -> bool {
        matches!(self.funding, Funding::Shared(_))
    }
}

/// A group with its roster and expenses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub currency: String,
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
}

impl Group {
    pub const DEFAULT_CURRENCY: &'static str = "USD";

    pub fn new(name: impl Into<String>, members: Vec<Member>) -> Self {
        Group {
            name: name.into(),
            currency: Self::DEFAULT_CURRENCY.to_string(),
            members,
            expenses: Vec::new(),
        }
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}
