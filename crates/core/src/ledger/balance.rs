//! Book balance algebra.
//!
//! The invariant: `balance == Σ(signed amounts of live entries)`. Creation
//! applies an entry's signed amount, deletion reverts it (the reversal sign
//! is the opposite of the creation sign), and an update is the two discrete
//! steps revert-then-apply — never a single delta, because the entry type
//! may flip between IN and OUT.

use rust_decimal::Decimal;

use super::types::EntryKind;

/// Returns the signed contribution of an entry to its book's balance.
#[must_use]
pub fn signed_amount(kind: EntryKind, amount: Decimal) -> Decimal {
    match kind {
        EntryKind::In => amount,
        EntryKind::Out => -amount,
    }
}

/// Applies an entry's effect to a balance (entry creation).
#[must_use]
pub fn apply(balance: Decimal, kind: EntryKind, amount: Decimal) -> Decimal {
    balance + signed_amount(kind, amount)
}

/// Reverts an entry's effect from a balance (entry deletion).
#[must_use]
pub fn revert(balance: Decimal, kind: EntryKind, amount: Decimal) -> Decimal {
    balance - signed_amount(kind, amount)
}

/// Computes the balance after an entry update: revert the old effect, then
/// apply the new one.
#[must_use]
pub fn updated(
    balance: Decimal,
    old: (EntryKind, Decimal),
    new: (EntryKind, Decimal),
) -> Decimal {
    let reverted = revert(balance, old.0, old.1);
    apply(reverted, new.0, new.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_amount() {
        assert_eq!(signed_amount(EntryKind::In, dec!(500)), dec!(500));
        assert_eq!(signed_amount(EntryKind::Out, dec!(500)), dec!(-500));
    }

    #[test]
    fn test_create_then_delete_restores_balance() {
        let balance = apply(Decimal::ZERO, EntryKind::In, dec!(500));
        assert_eq!(balance, dec!(500));
        assert_eq!(revert(balance, EntryKind::In, dec!(500)), Decimal::ZERO);
    }

    #[test]
    fn test_update_with_type_flip() {
        // IN 100 becomes OUT 40: 100 -> 0 -> -40.
        let balance = apply(Decimal::ZERO, EntryKind::In, dec!(100));
        let updated = updated(balance, (EntryKind::In, dec!(100)), (EntryKind::Out, dec!(40)));
        assert_eq!(updated, dec!(-40));
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000_00i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn kind_strategy() -> impl Strategy<Value = EntryKind> {
        prop_oneof![Just(EntryKind::In), Just(EntryKind::Out)]
    }

    proptest! {
        /// Applying a sequence of entries always lands on the sum of their
        /// signed amounts, and reverting them in any order restores zero.
        #[test]
        fn prop_balance_is_sum_of_signed_amounts(
            entries in proptest::collection::vec((kind_strategy(), amount_strategy()), 0..32),
        ) {
            let balance = entries
                .iter()
                .fold(Decimal::ZERO, |b, &(kind, amount)| apply(b, kind, amount));
            let expected: Decimal = entries
                .iter()
                .map(|&(kind, amount)| signed_amount(kind, amount))
                .sum();
            prop_assert_eq!(balance, expected);

            let drained = entries
                .iter()
                .fold(balance, |b, &(kind, amount)| revert(b, kind, amount));
            prop_assert_eq!(drained, Decimal::ZERO);
        }

        /// revert is the inverse of apply for any single entry.
        #[test]
        fn prop_revert_inverts_apply(
            start in amount_strategy(),
            kind in kind_strategy(),
            amount in amount_strategy(),
        ) {
            prop_assert_eq!(revert(apply(start, kind, amount), kind, amount), start);
        }

        /// An update is equivalent to deleting the old entry and creating
        /// the new one.
        #[test]
        fn prop_update_equals_delete_then_create(
            start in amount_strategy(),
            old_kind in kind_strategy(),
            old_amount in amount_strategy(),
            new_kind in kind_strategy(),
            new_amount in amount_strategy(),
        ) {
            let via_update = updated(start, (old_kind, old_amount), (new_kind, new_amount));
            let via_steps = apply(revert(start, old_kind, old_amount), new_kind, new_amount);
            prop_assert_eq!(via_update, via_steps);
        }
    }
}
