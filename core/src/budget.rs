use std::fmt;
use std::time::Duration;

/// Whole seconds left for every stage that has not run yet.
///
/// The counter only ever goes down. Each stage is charged its wall-clock
/// time rounded to the nearest second, and the charge saturates at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutBudget {
    remaining: u64,
}

impl TimeoutBudget {
    pub fn from_secs(secs: u64) -> Self {
        Self { remaining: secs }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining
    }

    pub fn remaining(&self) -> Duration {
        Duration::from_secs(self.remaining)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Charges `elapsed` against the budget and returns the seconds charged.
    pub fn consume(&mut self, elapsed: Duration) -> u64 {
        let charged = round_secs(elapsed).min(self.remaining);
        self.remaining -= charged;
        charged
    }

    pub fn exhaust(&mut self) {
        self.remaining = 0;
    }
}

impl fmt::Display for TimeoutBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.remaining)
    }
}

// Half a second rounds up.
fn round_secs(elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs();
    if elapsed.subsec_millis() >= 500 {
        secs.saturating_add(1)
    } else {
        secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_rounds_to_nearest_second() {
        let mut budget = TimeoutBudget::from_secs(10);

        assert_eq!(budget.consume(Duration::from_millis(2_400)), 2);
        assert_eq!(budget.remaining_secs(), 8);

        assert_eq!(budget.consume(Duration::from_millis(2_500)), 3);
        assert_eq!(budget.remaining_secs(), 5);

        assert_eq!(budget.consume(Duration::from_millis(300)), 0);
        assert_eq!(budget.remaining_secs(), 5);
    }

    #[test]
    fn test_consume_floors_at_zero() {
        let mut budget = TimeoutBudget::from_secs(5);

        assert_eq!(budget.consume(Duration::from_millis(5_600)), 5);
        assert!(budget.is_exhausted());

        assert_eq!(budget.consume(Duration::from_secs(3)), 0);
        assert_eq!(budget.remaining_secs(), 0);
    }

    #[test]
    fn test_exhaust() {
        let mut budget = TimeoutBudget::from_secs(42);
        budget.exhaust();
        assert!(budget.is_exhausted());
        assert_eq!(budget.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_zero_budget_is_exhausted() {
        assert!(TimeoutBudget::from_secs(0).is_exhausted());
        assert_eq!(format!("{}", TimeoutBudget::from_secs(7)), "7s");
    }
}
