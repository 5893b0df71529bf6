//! In-memory group state.
//!
//! The engine owns a group's roster, expenses and settlement ledger. Every
//! expense mutation recomputes balances from the full expense list and
//! regenerates the pending settlements, so the ledger never reflects a
//! stale expense set.

use crate::balance::{calculate_balance, BalanceReport};
use crate::error::{Result, SplitError};
use crate::ledger::{Settlement, SettlementLedger};
use crate::model::{Expense, Group, Member};
use crate::notify::{self, DeliveryOutcome, Notifier};
use crate::record::GroupRecord;
use crate::validation::validate_group;
use log::debug;
use std::collections::BTreeMap;
use std::io::Read;

/// Identifier of an expense within one engine.
pub type ExpenseId = u32;

/// A single group with its expenses and settlements.
pub struct SplitEngine {
    name: String,
    currency: String,
    members: Vec<Member>,

    /// Expenses indexed by id, in creation order.
    expenses: BTreeMap<ExpenseId, Expense>,

    next_expense_id: ExpenseId,

    ledger: SettlementLedger,
}

impl SplitEngine {
    /// Creates an engine for `group` and computes its initial settlements.
    pub fn new(group: Group) -> Self {
        let mut engine = SplitEngine {
            name: group.name,
            currency: group.currency,
            members: group.members,
            expenses: BTreeMap::new(),
            next_expense_id: 1,
            ledger: SettlementLedger::new(),
        };
        for expense in group.expenses {
            let id = engine.allocate_expense_id();
            engine.expenses.insert(id, expense);
        }
        engine.regenerate_settlements();
        engine
    }

    /// Creates an engine from a group, rejecting invalid input first.
    pub fn new_strict(group: Group) -> Result<Self> {
        validate_group(&group)?;
        Ok(Self::new(group))
    }

    /// Reads a JSON group file.
    pub fn from_json<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::new(GroupRecord::from_reader(reader)?.normalize()))
    }

    fn allocate_expense_id(&mut self) -> ExpenseId {
        let id = self.next_expense_id;
        self.next_expense_id += 1;
        id
    }

    /// A snapshot of the group as currently held.
    pub fn group(&self) -> Group {
        Group {
            name: self.name.clone(),
            currency: self.currency.clone(),
            members: self.members.clone(),
            expenses: self.expenses.values().cloned().collect(),
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.get(&id)
    }

    /// Expenses with their ids, in creation order.
    pub fn expenses(&self) -> impl Iterator<Item = (ExpenseId, &Expense)> {
        self.expenses.iter().map(|(id, e)| (*id, e))
    }

    /// Current balances and transfers. Does not touch the ledger.
    pub fn balance(&self) -> BalanceReport {
        let expenses: Vec<Expense> = self.expenses.values().cloned().collect();
        calculate_balance(&self.members, &expenses)
    }

    pub fn add_expense(&mut self, expense: Expense) -> ExpenseId {
        let id = self.allocate_expense_id();
        debug!("Adding expense {} '{}'", id, expense.title);
        self.expenses.insert(id, expense);
        self.regenerate_settlements();
        id
    }

    pub fn update_expense(&mut self, id: ExpenseId, expense: Expense) -> Result<()> {
        let slot = self
            .expenses
            .get_mut(&id)
            .ok_or(SplitError::ExpenseNotFound(id))?;
        debug!("Updating expense {} '{}'", id, expense.title);
        *slot = expense;
        self.regenerate_settlements();
        Ok(())
    }

    pub fn remove_expense(&mut self, id: ExpenseId) -> Result<Expense> {
        let removed = self
            .expenses
            .remove(&id)
            .ok_or(SplitError::ExpenseNotFound(id))?;
        debug!("Removed expense {} '{}'", id, removed.title);
        self.regenerate_settlements();
        Ok(removed)
    }

    /// Recomputes balances and replaces pending settlements. Returns the
    /// number of pending settlements created.
    pub fn regenerate_settlements(&mut self) -> usize {
        let report = self.balance();
        let created = self.ledger.regenerate(&report.settlements);
        debug!("{} pending settlements for {}", created, self.name);
        created
    }

    pub fn settlements(&self) -> &SettlementLedger {
        &self.ledger
    }

    /// Marks a settlement paid. Retrying is harmless.
    pub fn complete_settlement(&mut self, id: u64) -> Result<&Settlement> {
        self.ledger.complete(id)
    }

    /// Sends payment-due notices for the current transfers.
    pub fn notify_settlements<N: Notifier + ?Sized>(
        &mut self,
        notifier: &mut N,
    ) -> Result<Vec<DeliveryOutcome>> {
        let report = self.balance();
        let group = self.group();
        notify::notify_settlements(&group, &report, &mut self.ledger, notifier)
    }

    /// Sends every member a summary of their open transfers.
    pub fn notify_balance_summaries<N: Notifier + ?Sized>(
        &self,
        notifier: &mut N,
    ) -> Vec<DeliveryOutcome> {
        notify::notify_balance_summaries(&self.group(), &self.balance(), notifier)
    }
}
