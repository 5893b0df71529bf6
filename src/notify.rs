//! Member notifications.
//!
//! Two kinds of notice exist: a payment-due notice sent to each debtor for
//! each transfer, and a balance summary sent to every member. Rendering and
//! transport belong to the [`Notifier`] implementation; this module decides
//! who gets what and records the outcome.

use crate::balance::BalanceReport;
use crate::error::{Result, SplitError};
use crate::ledger::SettlementLedger;
use crate::model::Group;
use crate::money::Money;
use log::{info, warn};
use serde::Serialize;

/// One line of a balance summary. A negative amount means the member owes
/// `with_person`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    pub with_person: String,
    pub amount: Money,
}

/// A message to one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Tells a debtor what they owe a creditor.
    PaymentDue {
        email: String,
        group: String,
        from: String,
        to: String,
        amount: Money,
    },

    /// Tells a member everyone they owe or are owed by.
    BalanceSummary {
        email: String,
        group: String,
        member: String,
        lines: Vec<SummaryLine>,
    },
}

impl Notice {
    pub fn email(&self) -> &str {
        match self {
            Notice::PaymentDue { email, .. } | Notice::BalanceSummary { email, .. } => email,
        }
    }

    pub fn subject(&self) -> String {
        match self {
            Notice::PaymentDue { group, .. } => {
                format!("Bill Splitter - Payment Due for {}", group)
            }
            Notice::BalanceSummary { group, .. } => {
                format!("Bill Splitter - Balance Summary for {}", group)
            }
        }
    }
}

/// Delivers notices. Returns a message id on success.
pub trait Notifier {
    fn deliver(&mut self, notice: &Notice) -> Result<String>;
}

/// Writes notices to the log instead of sending them.
#[derive(Debug, Default)]
pub struct LogNotifier {
    sent: u64,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl Notifier for LogNotifier {
    fn deliver(&mut self, notice: &Notice) -> Result<String> {
        self.sent += 1;
        let id = format!("log-{}", self.sent);
        match notice {
            Notice::PaymentDue {
                from, to, amount, ..
            } => info!(
                "[{}] {} <{}>: pay {} to {}",
                id,
                from,
                notice.email(),
                amount,
                to
            ),
            Notice::BalanceSummary { member, lines, .. } => info!(
                "[{}] {} <{}>: {} open balances",
                id,
                member,
                notice.email(),
                lines.len()
            ),
        }
        Ok(id)
    }
}

/// What happened to one notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcome {
    pub recipient: String,
    pub email: String,
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl DeliveryOutcome {
    fn from_result(recipient: &str, email: &str, result: Result<String>) -> Self {
        match result {
            Ok(message_id) => DeliveryOutcome {
                recipient: recipient.to_string(),
                email: email.to_string(),
                success: true,
                message_id: Some(message_id),
                error: None,
            },
            Err(e) => {
                warn!("Notification to {} failed: {}", recipient, e);
                DeliveryOutcome {
                    recipient: recipient.to_string(),
                    email: email.to_string(),
                    success: false,
                    message_id: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Names of members without an email address, in roster order.
fn missing_emails(group: &Group) -> Vec<String> {
    group
        .members
        .iter()
        .filter(|m| m.email.trim().is_empty())
        .map(|m| m.name.clone())
        .collect()
}

/// Sends a payment-due notice to the debtor of every transfer in `report`
/// and records each one in `ledger` with its delivery result.
///
/// Fails before sending anything if any member lacks an email address.
pub fn notify_settlements<N: Notifier + ?Sized>(
    group: &Group,
    report: &BalanceReport,
    ledger: &mut SettlementLedger,
    notifier: &mut N,
) -> Result<Vec<DeliveryOutcome>> {
    let names = missing_emails(group);
    if !names.is_empty() {
        return Err(SplitError::MissingEmails { names });
    }

    let mut outcomes = Vec::with_capacity(report.settlements.len());

    for transfer in &report.settlements {
        let Some(debtor) = group.member(&transfer.from) else {
            outcomes.push(DeliveryOutcome::from_result(
                &transfer.from,
                "",
                Err(SplitError::Delivery {
                    recipient: transfer.from.clone(),
                    reason: "Email address not found for sender".to_string(),
                }),
            ));
            continue;
        };

        let notice = Notice::PaymentDue {
            email: debtor.email.clone(),
            group: group.name.clone(),
            from: transfer.from.clone(),
            to: transfer.to.clone(),
            amount: transfer.amount,
        };
        let outcome =
            DeliveryOutcome::from_result(&transfer.from, &debtor.email, notifier.deliver(&notice));
        ledger.record_notice(transfer, outcome.success);
        outcomes.push(outcome);
    }

    info!(
        "Sent {} of {} payment notices for {}",
        outcomes.iter().filter(|o| o.success).count(),
        outcomes.len(),
        group.name
    );
    Ok(outcomes)
}

/// Logs every failed delivery in `outcomes` and a closing tally. Returns the
/// number of failures.
pub fn log_outcomes(outcomes: &[DeliveryOutcome]) -> usize {
    let failed: Vec<&DeliveryOutcome> = outcomes.iter().filter(|o| !o.success).collect();
    for outcome in &failed {
        warn!(
            "Undelivered notice for {} <{}>: {}",
            outcome.recipient,
            outcome.email,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
    info!(
        "{} notices delivered, {} failed",
        outcomes.len() - failed.len(),
        failed.len()
    );
    failed.len()
}

/// Sends every member a summary of the transfers they take part in.
pub fn notify_balance_summaries<N: Notifier + ?Sized>(
    group: &Group,
    report: &BalanceReport,
    notifier: &mut N,
) -> Vec<DeliveryOutcome> {
    group
        .members
        .iter()
        .map(|member| {
            let lines = summary_lines(report, &member.name);
            let notice = Notice::BalanceSummary {
                email: member.email.clone(),
                group: group.name.clone(),
                member: member.name.clone(),
                lines,
            };
            DeliveryOutcome::from_result(&member.name, &member.email, notifier.deliver(&notice))
        })
        .collect()
}

/// Transfers involving `name`, negative where `name` pays.
pub fn summary_lines(report: &BalanceReport, name: &str) -> Vec<SummaryLine> {
    report
        .settlements_for(name)
        .map(|t| {
            if t.from == name {
                SummaryLine {
                    with_person: t.to.clone(),
                    amount: -t.amount,
                }
            } else {
                SummaryLine {
                    with_person: t.from.clone(),
                    amount: t.amount,
                }
            }
        })
        .collect()
}
