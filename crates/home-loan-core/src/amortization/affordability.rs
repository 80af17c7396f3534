use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::time_value::checked_mul;
use crate::types::{Money, Rate};
use crate::HomeLoanResult;

/// Share of monthly capacity a loan payment may consume and still be viable.
pub const DEFAULT_MAX_PAYMENT_RATIO: Rate = dec!(0.35);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affordability {
    /// Largest payment the capacity supports under the ratio.
    pub max_affordable_payment: Money,
    pub is_viable: bool,
}

/// Apply the payment-to-capacity rule.
///
/// A negative capacity yields a negative ceiling, so any positive payment is
/// not viable.
pub fn assess_affordability(
    monthly_payment: Money,
    capacity: Money,
    ratio: Rate,
) -> HomeLoanResult<Affordability> {
    let max_affordable_payment = checked_mul(capacity, ratio, "affordable payment ceiling")?;
    Ok(Affordability {
        max_affordable_payment,
        is_viable: monthly_payment <= max_affordable_payment,
    })
}
