//! Wire records for group files and their normalization into the core model.
//!
//! Records accept every shape existing clients send: members as bare names or
//! objects, the legacy singular `payer` field next to the `payers` array, and
//! amounts as numbers or strings. Normalization resolves these into
//! [`Member`], [`Expense`] and [`Group`] so the core never inspects raw input.

use crate::error::Result;
use crate::model::{Expense, Funding, Group, Member, Payer};
use crate::money::Money;
use log::{debug, warn};
use serde::Deserialize;
use std::io::Read;

/// A member as sent by clients: a bare name or a full record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MemberRecord {
    Name(String),
    Detailed {
        #[serde(default)]
        name: String,
        #[serde(default)]
        email: Option<String>,
    },
}

impl MemberRecord {
    /// Trims the name; emails are trimmed and lowercased.
    pub fn normalize(self) -> Member {
        match self {
            MemberRecord::Name(name) => Member::named(name.trim()),
            MemberRecord::Detailed { name, email } => Member::new(
                name.trim(),
                email.unwrap_or_default().trim().to_lowercase(),
            ),
        }
    }
}

/// One entry of an expense's `payers` array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PayerRecord {
    pub name: Option<String>,
    pub amount: Money,
}

/// Raw expense as read from a group file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseRecord {
    /// Name given in the expense form
    pub expense_name: Option<String>,

    /// Display title, falls back to `expenseName`
    pub title: Option<String>,

    /// Total amount; unparseable values are zero
    pub amount: Money,

    pub split_equally: Option<bool>,

    pub multi_payer: Option<bool>,

    /// Legacy single-payer field
    pub payer: Option<String>,

    pub payers: Option<Vec<PayerRecord>>,
}

impl ExpenseRecord {
    pub const UNTITLED: &'static str = "Untitled Expense";

    /// Resolves the record into a core expense.
    ///
    /// A multi-payer record with at least one payer keeps every payer. Any
    /// other record is credited in full to `payer`, or else to the first
    /// entry of `payers`; with neither it is unattributed. Any non-empty
    /// `payer` wins, even one that is only whitespace and so matches nobody.
    pub fn normalize(self) -> Expense {
        let title = non_empty(self.expense_name)
            .or_else(|| non_empty(self.title))
            .unwrap_or_else(|| Self::UNTITLED.to_string());
        let payers = self.payers.unwrap_or_default();

        let funding = if self.multi_payer.unwrap_or(false) && !payers.is_empty() {
            Funding::Shared(
                payers
                    .into_iter()
                    .map(|p| Payer::new(p.name.unwrap_or_default().trim(), p.amount))
                    .collect(),
            )
        } else {
            let first = payers.into_iter().next().and_then(|p| p.name);
            match present(self.payer).or_else(|| present(first)) {
                Some(name) => Funding::Sole(name.trim().to_string()),
                None => {
                    warn!("Expense '{}' has no payer; nobody is credited", title);
                    Funding::Unattributed
                }
            }
        };

        debug!("Normalized expense '{}' of {}", title, self.amount);

        Expense {
            title,
            amount: self.amount,
            split_equally: self.split_equally.unwrap_or(true),
            funding,
        }
    }
}

/// The value as given, or `None` when missing or empty.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Trimmed value, or `None` when missing or blank.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A group file: name, optional currency, roster and expenses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GroupRecord {
    pub name: String,
    pub currency: Option<String>,
    pub members: Vec<MemberRecord>,
    pub expenses: Vec<ExpenseRecord>,
}

impl GroupRecord {
    /// Reads a group file from JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn normalize(self) -> Group {
        Group {
            name: self.name.trim().to_string(),
            currency: non_empty(self.currency).unwrap_or_else(|| Group::DEFAULT_CURRENCY.to_string()),
            members: self.members.into_iter().map(MemberRecord::normalize).collect(),
            expenses: self
                .expenses
                .into_iter()
                .map(ExpenseRecord::normalize)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn expense(json: &str) -> Expense {
        serde_json::from_str::<ExpenseRecord>(json)
            .unwrap()
            .normalize()
    }

    #[test]
    fn test_parse_single_payer_from_payers_array() {
        let parsed = expense(r#"{"amount": 100, "payers": [{"name": "Alice", "amount": 100}]}"#);
        assert_eq!(parsed.amount, money("100"));
        assert_eq!(parsed.funding, Funding::Sole("Alice".to_string()));
        assert!(!parsed.is_multi_payer());
    }

    #[test]
    fn test_parse_legacy_payer_field_wins() {
        let parsed = expense(r#"{"amount": "40", "payer": "Bob", "payers": [{"name": "Alice"}]}"#);
        assert_eq!(parsed.amount, money("40"));
        assert_eq!(parsed.funding, Funding::Sole("Bob".to_string()));
    }

    #[test]
    fn test_parse_multi_payer() {
        let parsed = expense(
            r#"{"amount": 90, "multiPayer": true,
                "payers": [{"name": "A", "amount": 60}, {"name": " B ", "amount": "30"}]}"#,
        );
        assert!(parsed.is_multi_payer());
        assert_eq!(
            parsed.funding,
            Funding::Shared(vec![
                Payer::new("A", money("60")),
                Payer::new("B", money("30")),
            ])
        );
    }

    #[test]
    fn test_parse_multi_payer_without_payers_falls_back() {
        let parsed = expense(r#"{"amount": 10, "multiPayer": true, "payer": "C", "payers": []}"#);
        assert_eq!(parsed.funding, Funding::Sole("C".to_string()));
    }

    #[test]
    fn test_parse_without_payer_is_unattributed() {
        let parsed = expense(r#"{"amount": 10, "payer": ""}"#);
        assert_eq!(parsed.funding, Funding::Unattributed);
    }

    #[test]
    fn test_parse_blank_payer_still_beats_payers_array() {
        let parsed = expense(r#"{"amount": 10, "payer": "  ", "payers": [{"name": "Alice"}]}"#);
        assert_eq!(parsed.funding, Funding::Sole(String::new()));

        let report = crate::balance::calculate_balance(
            &[Member::named("Alice"), Member::named("Bob")],
            &[parsed],
        );
        assert_eq!(report.member_balances.get("Alice").unwrap().paid, Money::ZERO);
    }

    #[test]
    fn test_parse_tolerates_bad_and_missing_fields() {
        let parsed = expense(r#"{"amount": "lots", "multiPayer": null, "payers": null, "extra": 1}"#);
        assert_eq!(parsed.amount, Money::ZERO);
        assert_eq!(parsed.funding, Funding::Unattributed);
        assert!(parsed.split_equally);
        assert_eq!(parsed.title, ExpenseRecord::UNTITLED);
    }

    #[test]
    fn test_title_prefers_expense_name() {
        let parsed = expense(r#"{"expenseName": "Dinner", "title": "Other", "payer": "A"}"#);
        assert_eq!(parsed.title, "Dinner");
    }

    #[test]
    fn test_members_as_names_or_objects() {
        let record: GroupRecord = serde_json::from_str(
            r#"{"name": " Trip ", "members": ["Alice", {"name": "Bob", "email": " BOB@Example.com "}]}"#,
        )
        .unwrap();
        let group = record.normalize();

        assert_eq!(group.name, "Trip");
        assert_eq!(group.currency, "USD");
        assert_eq!(group.members[0], Member::named("Alice"));
        assert_eq!(group.members[1], Member::new("Bob", "bob@example.com"));
    }

    #[test]
    fn test_group_from_reader_rejects_malformed_json() {
        assert!(GroupRecord::from_reader("{not json".as_bytes()).is_err());
    }
}
