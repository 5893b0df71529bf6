//! Greedy debt netting.
//!
//! # Algorithm
//!
//! 1. Members more than one cent below zero are debtors, members more than
//!    one cent above zero are creditors. Everyone else is settled.
//! 2. Both lists are sorted largest first. Ties keep roster order.
//! 3. Each debtor in turn pays the current largest creditor as much as
//!    either side allows, moving to the next creditor once one is paid off.
//!
//! ```text
//! Balances:  A +50   B -10   C -40
//!
//! Debtors:   C 40, B 10
//! Creditors: A 50
//!
//! Transfers: C pays A 40
//!            B pays A 10
//! ```
//!
//! The matching is not guaranteed to produce the fewest possible transfers,
//! and the order never changes after the initial sort.

use crate::balance::MemberBalances;
use crate::money::Money;
use log::debug;
use serde::Serialize;
use std::collections::VecDeque;

/// A payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: Money,
}

impl Transfer {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Money) -> Self {
        Transfer {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// A member's outstanding amount while matching, always positive.
#[derive(Debug)]
struct Position<'a> {
    name: &'a str,
    amount: Money,
}

/// Produces the transfers that bring every member's balance to zero.
///
/// Every emitted amount is at least [`Money::EPSILON`]. If total debt and
/// total credit do not match, matching stops quietly once creditors run out.
pub fn resolve_settlements(balances: &MemberBalances) -> Vec<Transfer> {
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();

    for entry in balances.iter() {
        if entry.balance < -Money::EPSILON {
            debtors.push(Position {
                name: &entry.name,
                amount: entry.balance.abs(),
            });
        } else if entry.balance > Money::EPSILON {
            creditors.push(Position {
                name: &entry.name,
                amount: entry.balance,
            });
        }
    }

    // stable: equal amounts keep roster order
    debtors.sort_by(|a, b| b.amount.cmp(&a.amount));
    creditors.sort_by(|a, b| b.amount.cmp(&a.amount));
    let mut creditors = VecDeque::from(creditors);

    let mut transfers = Vec::new();

    for debtor in debtors {
        let mut remaining = debtor.amount;

        while remaining > Money::EPSILON {
            let Some(creditor) = creditors.front_mut() else {
                debug!(
                    "{} still owes {} but no creditors remain",
                    debtor.name, remaining
                );
                break;
            };

            if creditor.amount >= remaining {
                debug!("{} pays {} {}", debtor.name, creditor.name, remaining);
                transfers.push(Transfer::new(debtor.name, creditor.name, remaining));
                creditor.amount -= remaining;
                remaining = Money::ZERO;

                if creditor.amount < Money::EPSILON {
                    creditors.pop_front();
                }
            } else {
                debug!(
                    "{} pays {} {} (creditor settled)",
                    debtor.name, creditor.name, creditor.amount
                );
                transfers.push(Transfer::new(debtor.name, creditor.name, creditor.amount));
                remaining -= creditor.amount;
                creditors.pop_front();
            }
        }
    }

    transfers
}
