//! Property tests for balances and settlements.
//!
//! Verified invariants:
//! - Conservation: balances sum to zero within a cent
//! - Every transfer is at least a cent, and only moves money from debtors
//!   to creditors
//! - Applying the transfers leaves every member close to zero

use bill_splitter::{calculate_balance, Expense, Member, Money, Payer};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Amounts in whole cents, up to 10 000.00
fn amount_strategy() -> impl Strategy<Value = Money> {
    (0i64..=1_000_000).prop_map(|cents| Money::new(Decimal::new(cents, 2)))
}

fn roster(count: usize) -> Vec<Member> {
    (0..count).map(|i| Member::named(format!("M{}", i))).collect()
}

/// Expenses paid by one member, or split between two payers whose
/// contributions add up to the amount.
fn expense_strategy(member_count: usize) -> impl Strategy<Value = Expense> {
    (
        amount_strategy(),
        0..member_count,
        0..member_count,
        0u32..=100,
        any::<bool>(),
    )
        .prop_map(move |(amount, first, second, percent, shared)| {
            if shared {
                let first_part = Money::new(amount.as_decimal() * Decimal::new(percent as i64, 2));
                let payers = vec![
                    Payer::new(format!("M{}", first), first_part),
                    Payer::new(format!("M{}", second), amount - first_part),
                ];
                Expense::shared(amount, payers)
            } else {
                Expense::single(amount, format!("M{}", first))
            }
        })
}

fn group_strategy() -> impl Strategy<Value = (Vec<Member>, Vec<Expense>)> {
    (1usize..=40).prop_flat_map(|count| {
        (
            Just(roster(count)),
            prop::collection::vec(expense_strategy(count), 0..=20),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn balances_sum_to_zero((members, expenses) in group_strategy()) {
        let report = calculate_balance(&members, &expenses);
        let total: Money = report.member_balances.iter().map(|b| b.balance).sum();
        prop_assert!(total.abs() <= Money::EPSILON, "sum of balances {}", total);
    }

    #[test]
    fn transfers_are_at_least_a_cent((members, expenses) in group_strategy()) {
        let report = calculate_balance(&members, &expenses);
        for transfer in &report.settlements {
            prop_assert!(transfer.amount >= Money::EPSILON);
            prop_assert_ne!(&transfer.from, &transfer.to);
        }
    }

    #[test]
    fn transfers_run_from_debtors_to_creditors((members, expenses) in group_strategy()) {
        let report = calculate_balance(&members, &expenses);
        for transfer in &report.settlements {
            let from = report.member_balances.get(&transfer.from).unwrap();
            let to = report.member_balances.get(&transfer.to).unwrap();
            prop_assert!(from.balance < -Money::EPSILON);
            prop_assert!(to.balance > Money::EPSILON);
        }
    }

    #[test]
    fn applying_transfers_settles_everyone((members, expenses) in group_strategy()) {
        let report = calculate_balance(&members, &expenses);

        let mut remaining: HashMap<&str, Money> = report
            .member_balances
            .iter()
            .map(|b| (b.name.as_str(), b.balance))
            .collect();
        for transfer in &report.settlements {
            *remaining.get_mut(transfer.from.as_str()).unwrap() += transfer.amount;
            *remaining.get_mut(transfer.to.as_str()).unwrap() -= transfer.amount;
        }

        // residues below a cent per member can pile up on one counterparty
        let tolerance = Money::new(Money::EPSILON.as_decimal() * Decimal::from(members.len() as u64));
        for (name, left) in remaining {
            prop_assert!(left.abs() <= tolerance, "{} left with {}", name, left);
        }
    }

    #[test]
    fn debtors_pay_at_most_their_debt((members, expenses) in group_strategy()) {
        let report = calculate_balance(&members, &expenses);

        let mut paid: HashMap<&str, Money> = HashMap::new();
        for transfer in &report.settlements {
            *paid.entry(transfer.from.as_str()).or_default() += transfer.amount;
        }
        for (name, total) in paid {
            let debt = report.member_balances.get(name).unwrap().balance.abs();
            prop_assert!(total <= debt, "{} paid {} owing {}", name, total, debt);
        }
    }
}
