//! Resource ledger backing defender placement costs.

/// The player's spendable balance. Never goes negative: a debit either
/// covers the full amount or leaves the balance untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Purse {
    balance: u32,
}

impl Purse {
    pub(crate) fn new(initial_balance: u32) -> Self {
        Self {
            balance: initial_balance,
        }
    }

    pub(crate) fn balance(&self) -> u32 {
        self.balance
    }

    /// Adds to the balance unconditionally.
    pub(crate) fn credit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Removes `amount` from the balance, all or nothing.
    #[must_use]
    pub(crate) fn debit(&mut self, amount: u32) -> bool {
        if amount > self.balance {
            return false;
        }
        self.balance -= amount;
        true
    }

    /// Pure affordability predicate with no side effects.
    pub(crate) fn can_afford(&self, amount: u32) -> bool {
        amount <= self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::Purse;

    #[test]
    fn debit_is_all_or_nothing() {
        let mut purse = Purse::new(100);
        assert!(!purse.debit(101));
        assert_eq!(purse.balance(), 100);
        assert!(purse.debit(100));
        assert_eq!(purse.balance(), 0);
    }

    #[test]
    fn debit_then_credit_restores_the_original_balance() {
        let mut purse = Purse::new(250);
        assert!(purse.debit(75));
        purse.credit(75);
        assert_eq!(purse.balance(), 250);
    }

    #[test]
    fn can_afford_has_no_side_effects() {
        let purse = Purse::new(50);
        assert!(purse.can_afford(50));
        assert!(!purse.can_afford(51));
        assert_eq!(purse.balance(), 50);
    }

    #[test]
    fn credit_saturates_instead_of_wrapping() {
        let mut purse = Purse::new(u32::MAX - 1);
        purse.credit(10);
        assert_eq!(purse.balance(), u32::MAX);
    }
}
