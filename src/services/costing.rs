//! Pure cost-accounting math shared by the lifecycle services.
//!
//! No I/O and no failure modes: callers validate inputs, these functions
//! only compute. Money values round to 2 decimal places, quantities to 3.

use rust_decimal::{Decimal, RoundingStrategy};

const MONEY_DP: u32 = 2;
const QTY_DP: u32 = 3;

/// Round a monetary amount to the money precision.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a quantity to the quantity precision.
pub fn round_qty(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(QTY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Moving weighted-average cost after an incoming, cost-bearing movement.
///
/// `(old_qty * old_wac + incoming_qty * incoming_unit_cost) / (old_qty +
/// incoming_qty)`; when the combined quantity is zero the incoming unit
/// cost wins.
pub fn weighted_average_cost(
    old_qty: Decimal,
    old_wac: Decimal,
    incoming_qty: Decimal,
    incoming_unit_cost: Decimal,
) -> Decimal {
    let total_qty = old_qty + incoming_qty;
    if total_qty.is_zero() {
        return round_money(incoming_unit_cost);
    }
    let total_value = old_qty * old_wac + incoming_qty * incoming_unit_cost;
    round_money(total_value / total_qty)
}

/// Monetary total of one invoice line.
pub fn line_total(qty: Decimal, unit_price: Decimal) -> Decimal {
    round_money(qty * unit_price)
}

/// Tax on the discounted sub-total at the given percent rate.
pub fn tax_amount(sub_total: Decimal, discount: Decimal, tax_rate_percent: Decimal) -> Decimal {
    round_money((sub_total - discount) * tax_rate_percent / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn wac_blends_incoming_cost_into_existing_stock() {
        // 10 on hand at 5.00, buy 10 more at 7.00 -> 6.00
        assert_eq!(
            weighted_average_cost(dec!(10), dec!(5.00), dec!(10), dec!(7.00)),
            dec!(6.00)
        );
    }

    #[test]
    fn wac_of_empty_position_is_the_incoming_cost() {
        assert_eq!(
            weighted_average_cost(dec!(0), dec!(0), dec!(10), dec!(5.00)),
            dec!(5.00)
        );
    }

    #[test]
    fn wac_degenerate_zero_total_resolves_to_incoming_cost() {
        assert_eq!(
            weighted_average_cost(dec!(-4), dec!(3.00), dec!(4), dec!(9.50)),
            dec!(9.50)
        );
    }

    #[test]
    fn wac_rounds_to_money_precision() {
        // (3 * 1.00 + 3 * 2.00) / 6 = 1.50; (1 * 1.00 + 2 * 2.00) / 3 = 1.666..
        assert_eq!(
            weighted_average_cost(dec!(1), dec!(1.00), dec!(2), dec!(2.00)),
            dec!(1.67)
        );
    }

    #[test]
    fn line_total_is_qty_times_price_money_rounded() {
        assert_eq!(line_total(dec!(5), dec!(19.99)), dec!(99.95));
        assert_eq!(line_total(dec!(0.333), dec!(10.00)), dec!(3.33));
    }

    #[test]
    fn tax_applies_after_discount() {
        assert_eq!(tax_amount(dec!(200.00), dec!(20.00), dec!(10)), dec!(18.00));
        assert_eq!(tax_amount(dec!(100.00), dec!(0), dec!(0)), dec!(0.00));
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_qty(dec!(2.0005)), dec!(2.001));
    }
}
