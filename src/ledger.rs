//! Settlement records and their lifecycle.
//!
//! A settlement starts out pending. Whenever a group's expenses change, all
//! pending settlements are dropped and replaced by freshly computed ones,
//! while completed settlements are kept as history. A settlement moves from
//! pending to completed once; completing it again changes nothing.

use crate::error::{Result, SplitError};
use crate::money::Money;
use crate::settlement::Transfer;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Pending,
    Completed,
}

/// A stored transfer with delivery and completion state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub id: u64,
    pub from: String,
    pub to: String,
    pub amount: Money,
    pub status: SettlementStatus,
    pub email_sent: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Settlement {
    fn pending(id: u64, transfer: &Transfer, now: DateTime<Utc>) -> Self {
        Settlement {
            id,
            from: transfer.from.clone(),
            to: transfer.to.clone(),
            amount: transfer.amount,
            status: SettlementStatus::Pending,
            email_sent: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SettlementStatus::Pending
    }
}

/// All settlements of one group, oldest first.
#[derive(Debug, Clone, Default)]
pub struct SettlementLedger {
    settlements: Vec<Settlement>,
    next_id: u64,
}

impl SettlementLedger {
    pub fn new() -> Self {
        SettlementLedger {
            settlements: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Replaces every pending settlement with one per transfer.
    ///
    /// Completed settlements are untouched. Returns the number of new
    /// pending settlements.
    pub fn regenerate(&mut self, transfers: &[Transfer]) -> usize {
        let before = self.settlements.len();
        self.settlements.retain(|s| !s.is_pending());
        debug!(
            "Cleared {} pending settlements",
            before - self.settlements.len()
        );

        let now = Utc::now();
        for transfer in transfers {
            let id = self.allocate_id();
            self.settlements.push(Settlement::pending(id, transfer, now));
        }
        transfers.len()
    }

    /// Marks a settlement completed.
    ///
    /// Completing an already completed settlement succeeds and keeps the
    /// original completion time.
    pub fn complete(&mut self, id: u64) -> Result<&Settlement> {
        let settlement = self
            .settlements
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SplitError::SettlementNotFound(id))?;

        if settlement.is_pending() {
            let now = Utc::now();
            settlement.status = SettlementStatus::Completed;
            settlement.completed_at = Some(now);
            settlement.updated_at = now;
            debug!(
                "Settlement {} ({} -> {}) completed",
                id, settlement.from, settlement.to
            );
        }

        Ok(&*settlement)
    }

    /// Records a payment-due notice for `transfer`.
    ///
    /// Updates the amount and delivery flag of the pending settlement between
    /// the same two members, or creates a pending one if none exists.
    /// Completed settlements are never modified.
    pub fn record_notice(&mut self, transfer: &Transfer, email_sent: bool) -> &Settlement {
        let now = Utc::now();
        let existing = self
            .settlements
            .iter()
            .position(|s| s.is_pending() && s.from == transfer.from && s.to == transfer.to);

        let pos = match existing {
            Some(pos) => {
                let settlement = &mut self.settlements[pos];
                settlement.amount = transfer.amount;
                settlement.email_sent = email_sent;
                settlement.updated_at = now;
                pos
            }
            None => {
                let id = self.allocate_id();
                let mut settlement = Settlement::pending(id, transfer, now);
                settlement.email_sent = email_sent;
                self.settlements.push(settlement);
                self.settlements.len() - 1
            }
        };

        &self.settlements[pos]
    }

    pub fn get(&self, id: u64) -> Option<&Settlement> {
        self.settlements.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Settlement> {
        self.settlements.iter()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Settlement> {
        self.settlements.iter().filter(|s| s.is_pending())
    }

    pub fn completed(&self) -> impl Iterator<Item = &Settlement> {
        self.settlements.iter().filter(|s| !s.is_pending())
    }

    pub fn len(&self) -> usize {
        self.settlements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settlements.is_empty()
    }
}
