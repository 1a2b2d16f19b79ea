use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BillingPeriod {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let period = match self {
            BillingPeriod::Monthly => "MONTHLY",
            BillingPeriod::Quarterly => "QUARTERLY",
            BillingPeriod::Yearly => "YEARLY",
        };
        write!(f, "{}", period)
    }
}

impl BillingPeriod {
    /// Unrecognized values fall back to Monthly.
    pub fn from_str(value: &str) -> Self {
        match value {
            "QUARTERLY" => BillingPeriod::Quarterly,
            "YEARLY" => BillingPeriod::Yearly,
            _ => BillingPeriod::Monthly,
        }
    }

    /// Fixed-day approximation of the billing cycle, not calendar-accurate.
    pub fn period_days(&self) -> i64 {
        match self {
            BillingPeriod::Monthly => 30,
            BillingPeriod::Quarterly => 90,
            BillingPeriod::Yearly => 365,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_days_per_billing_period() {
        assert_eq!(BillingPeriod::Monthly.period_days(), 30);
        assert_eq!(BillingPeriod::Quarterly.period_days(), 90);
        assert_eq!(BillingPeriod::Yearly.period_days(), 365);
    }

    #[test]
    fn unrecognized_period_defaults_to_monthly() {
        assert_eq!(BillingPeriod::from_str("WEEKLY"), BillingPeriod::Monthly);
        assert_eq!(BillingPeriod::from_str("WEEKLY").period_days(), 30);
    }
}
