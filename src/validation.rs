//! Strict input checks that can run in front of the balance computation.
//!
//! The computation itself accepts anything. Callers that want hard failures
//! for duplicate names, negative amounts or payer totals that do not add up
//! run [`validate_group`] first.

use crate::error::{Result, SplitError};
use crate::model::{Expense, Funding, Group, Member};
use crate::money::Money;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Checks the roster and every expense, returning the first problem found.
pub fn validate_group(group: &Group) -> Result<()> {
    validate_members(&group.members)?;

    let names: HashSet<&str> = group.members.iter().map(|m| m.name.as_str()).collect();
    for (idx, expense) in group.expenses.iter().enumerate() {
        validate_expense(idx + 1, expense, &names)?;
    }
    Ok(())
}

/// Names must be present and unique. Emails, when given, must look valid.
pub fn validate_members(members: &[Member]) -> Result<()> {
    let mut seen = HashSet::new();

    for (idx, member) in members.iter().enumerate() {
        if member.name.trim().is_empty() {
            return Err(SplitError::EmptyMemberName { position: idx + 1 });
        }
        if !seen.insert(member.name.as_str()) {
            return Err(SplitError::DuplicateMember {
                name: member.name.clone(),
            });
        }
        if !member.email.is_empty() && !is_valid_email(&member.email) {
            return Err(SplitError::InvalidEmail {
                name: member.name.clone(),
                email: member.email.clone(),
            });
        }
    }
    Ok(())
}

/// `expense` is the 1-based position used in error messages.
fn validate_expense(expense: usize, item: &Expense, members: &HashSet<&str>) -> Result<()> {
    if item.amount.is_negative() {
        return Err(SplitError::NegativeAmount {
            expense,
            amount: item.amount,
        });
    }

    match &item.funding {
        Funding::Shared(payers) => {
            for payer in payers {
                if payer.amount.is_negative() {
                    return Err(SplitError::NegativeAmount {
                        expense,
                        amount: payer.amount,
                    });
                }
                check_member(expense, &payer.name, members)?;
            }

            let paid: Money = payers.iter().map(|p| p.amount).sum();
            if (paid - item.amount).abs() > Money::EPSILON {
                return Err(SplitError::PayerSumMismatch {
                    expense,
                    amount: item.amount,
                    paid,
                });
            }
        }
        Funding::Sole(name) => check_member(expense, name, members)?,
        Funding::Unattributed => {}
    }
    Ok(())
}

fn check_member(expense: usize, name: &str, members: &HashSet<&str>) -> Result<()> {
    if members.contains(name) {
        Ok(())
    } else {
        Err(SplitError::UnknownPayer {
            expense,
            name: name.to_string(),
        })
    }
}

/// `local@domain.tld`: word characters optionally joined by single dots or
/// dashes, ending in one or more 2-3 character domain labels.
const EMAIL_PATTERN: &str =
    r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_some_and(|re| re.is_match(email))
}
