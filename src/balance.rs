//! Per-member balances for a group.
//!
//! Every member owes an equal share of the group total. A member's balance
//! is what they paid minus that share: positive balances are owed money,
//! negative balances owe money.

use crate::model::{Expense, Funding, Member};
use crate::money::Money;
use crate::settlement::{resolve_settlements, Transfer};
use log::debug;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// What one member paid, owes, and their net position.
///
/// # Invariants
///
/// - `balance == paid - share`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberBalance {
    pub name: String,

    /// Sum of the member's contributions across all expenses.
    pub paid: Money,

    /// The member's equal part of the group total.
    pub share: Money,

    /// `paid - share`. Positive means creditor, negative means debtor.
    pub balance: Money,
}

impl MemberBalance {
    /// Creates a balance with nothing paid yet.
    pub fn new(name: impl Into<String>, share: Money) -> Self {
        MemberBalance {
            name: name.into(),
            paid: Money::ZERO,
            share,
            balance: Money::ZERO,
        }
    }

    fn credit(&mut self, amount: Money) {
        self.paid += amount;
    }

    fn settle_balance(&mut self) {
        self.balance = self.paid - self.share;
    }
}

/// Member balances keyed by name, in roster order.
///
/// Serializes as a JSON object `{ name: { name, paid, share, balance } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberBalances {
    entries: Vec<MemberBalance>,
    index: HashMap<String, usize>,
}

impl MemberBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a balance. An existing entry with the same name is replaced
    /// in place and keeps its position.
    pub fn insert(&mut self, balance: MemberBalance) {
        match self.index.get(&balance.name) {
            Some(&pos) => self.entries[pos] = balance,
            None => {
                self.index.insert(balance.name.clone(), self.entries.len());
                self.entries.push(balance);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&MemberBalance> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut MemberBalance> {
        match self.index.get(name) {
            Some(&pos) => self.entries.get_mut(pos),
            None => None,
        }
    }

    /// Iterates in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &MemberBalance> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<MemberBalance> for MemberBalances {
    fn from_iter<I: IntoIterator<Item = MemberBalance>>(iter: I) -> Self {
        let mut balances = MemberBalances::new();
        for balance in iter {
            balances.insert(balance);
        }
        balances
    }
}

impl Serialize for MemberBalances {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, entry)?;
        }
        map.end()
    }
}

/// The full balance picture for a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    pub total_expense: Money,
    pub per_person_share: Money,
    pub member_balances: MemberBalances,
    pub settlements: Vec<Transfer>,
}

impl BalanceReport {
    /// Transfers in which `name` pays or is paid.
    pub fn settlements_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Transfer> + 'a {
        self.settlements
            .iter()
            .filter(move |t| t.from == name || t.to == name)
    }
}

/// Computes every member's balance and the transfers that settle them.
///
/// Empty members or expenses give an all-zero report. Amounts credited to
/// names outside the roster are dropped, although they still count toward
/// the group total.
pub fn calculate_balance(members: &[Member], expenses: &[Expense]) -> BalanceReport {
    if members.is_empty() || expenses.is_empty() {
        return BalanceReport::default();
    }

    let total_expense: Money = expenses.iter().map(|e| e.amount).sum();
    let per_person_share = total_expense.split(members.len());

    let mut member_balances: MemberBalances = members
        .iter()
        .map(|m| MemberBalance::new(m.name.clone(), per_person_share))
        .collect();

    for expense in expenses {
        match &expense.funding {
            Funding::Shared(payers) => {
                for payer in payers {
                    credit(&mut member_balances, &payer.name, payer.amount);
                }
            }
            Funding::Sole(name) => credit(&mut member_balances, name, expense.amount),
            Funding::Unattributed => {}
        }
    }

    for entry in member_balances.entries.iter_mut() {
        entry.settle_balance();
    }

    let settlements = resolve_settlements(&member_balances);

    BalanceReport {
        total_expense,
        per_person_share,
        member_balances,
        settlements,
    }
}

fn credit(balances: &mut MemberBalances, name: &str, amount: Money) {
    match balances.get_mut(name) {
        Some(entry) => entry.credit(amount),
        None => debug!("Ignoring payment of {} by non-member {}", amount, name),
    }
}
