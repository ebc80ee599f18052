//! Gold ledger with atomic check-then-spend semantics.

use lane_defence_core::Rejection;

/// Player gold balance. The balance is unsigned, so it can never go negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ledger {
    gold: u32,
}

impl Ledger {
    pub(crate) const fn new(gold: u32) -> Self {
        Self { gold }
    }

    pub(crate) const fn gold(&self) -> u32 {
        self.gold
    }

    /// Verifies that `cost` is affordable without touching the balance.
    pub(crate) fn ensure(&self, cost: u32) -> Result<(), Rejection> {
        if self.gold < cost {
            return Err(Rejection::InsufficientGold {
                cost,
                available: self.gold,
            });
        }
        Ok(())
    }

    /// Debits `cost`, or leaves the balance untouched when unaffordable.
    pub(crate) fn spend(&mut self, cost: u32) -> Result<(), Rejection> {
        self.ensure(cost)?;
        self.gold -= cost;
        Ok(())
    }

    pub(crate) fn credit(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_debits_affordable_costs() {
        let mut ledger = Ledger::new(120);
        assert_eq!(ledger.spend(80), Ok(()));
        assert_eq!(ledger.gold(), 40);
    }

    #[test]
    fn failed_spend_leaves_balance_untouched() {
        let mut ledger = Ledger::new(70);
        assert_eq!(
            ledger.spend(100),
            Err(Rejection::InsufficientGold {
                cost: 100,
                available: 70
            })
        );
        assert_eq!(ledger.gold(), 70);
    }

    #[test]
    fn exact_balance_is_spendable() {
        let mut ledger = Ledger::new(90);
        assert_eq!(ledger.spend(90), Ok(()));
        assert_eq!(ledger.gold(), 0);
        ledger.credit(7);
        assert_eq!(ledger.gold(), 7);
    }
}
