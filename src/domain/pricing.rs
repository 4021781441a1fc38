//! Order pricing: subtotal over the captured line prices, plus conditional
//! shipping. Computed identically on create and update.

use bigdecimal::{BigDecimal, Zero};

use super::order::NewOrderLineRecord;

/// Subtotals strictly above this amount ship for free.
pub fn free_shipping_threshold() -> BigDecimal {
    BigDecimal::from(10)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub subtotal: BigDecimal,
    pub shipping_costs: BigDecimal,
    pub total: BigDecimal,
}

/// Price a validated line set against a restaurant's default shipping cost.
///
/// subtotal = Σ quantity × unit_price; shipping is waived when the subtotal
/// exceeds [`free_shipping_threshold`], otherwise the restaurant default
/// applies; total = subtotal + shipping.
pub fn quote_order(lines: &[NewOrderLineRecord], default_shipping: &BigDecimal) -> Quote {
    let subtotal = lines.iter().fold(BigDecimal::zero(), |acc, line| {
        acc + BigDecimal::from(line.quantity) * &line.unit_price
    });

    let shipping_costs = if subtotal > free_shipping_threshold() {
        BigDecimal::zero()
    } else {
        default_shipping.clone()
    };

    let total = &subtotal + &shipping_costs;
    Quote {
        subtotal,
        shipping_costs,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn line(quantity: i32, unit_price: &str) -> NewOrderLineRecord {
        NewOrderLineRecord {
            product_id: Uuid::new_v4(),
            quantity,
            unit_price: dec(unit_price),
        }
    }

    #[test]
    fn small_order_pays_the_restaurant_default() {
        // 2 × 4.00 = 8.00 ≤ 10.00, so the 2.50 default applies.
        let quote = quote_order(&[line(2, "4.00")], &dec("2.50"));
        assert_eq!(quote.subtotal, dec("8.00"));
        assert_eq!(quote.shipping_costs, dec("2.50"));
        assert_eq!(quote.total, dec("10.50"));
    }

    #[test]
    fn large_order_ships_free() {
        let quote = quote_order(&[line(3, "5.00")], &dec("2.50"));
        assert_eq!(quote.subtotal, dec("15.00"));
        assert_eq!(quote.shipping_costs, BigDecimal::zero());
        assert_eq!(quote.total, dec("15.00"));
    }

    #[test]
    fn threshold_is_exclusive_at_exactly_ten() {
        // Exactly 10.00 still pays shipping; only strictly greater is free.
        let quote = quote_order(&[line(4, "2.50")], &dec("1.75"));
        assert_eq!(quote.subtotal, dec("10.00"));
        assert_eq!(quote.shipping_costs, dec("1.75"));
        assert_eq!(quote.total, dec("11.75"));
    }

    #[test]
    fn one_cent_over_the_threshold_ships_free() {
        let quote = quote_order(&[line(1, "10.01")], &dec("2.50"));
        assert_eq!(quote.shipping_costs, BigDecimal::zero());
        assert_eq!(quote.total, dec("10.01"));
    }

    #[test]
    fn subtotal_sums_across_lines() {
        let quote = quote_order(&[line(1, "3.20"), line(2, "2.10")], &dec("0.90"));
        assert_eq!(quote.subtotal, dec("7.40"));
        assert_eq!(quote.total, dec("8.30"));
    }

    #[test]
    fn empty_line_set_prices_to_the_shipping_cost_alone() {
        // Validation rejects empty line sets upstream.
        let quote = quote_order(&[], &dec("2.50"));
        assert_eq!(quote.subtotal, BigDecimal::zero());
        assert_eq!(quote.shipping_costs, dec("2.50"));
        assert_eq!(quote.total, dec("2.50"));
    }

    #[test]
    fn zero_default_shipping_stays_zero_below_threshold() {
        let quote = quote_order(&[line(1, "5.00")], &BigDecimal::zero());
        assert_eq!(quote.shipping_costs, BigDecimal::zero());
        assert_eq!(quote.total, dec("5.00"));
    }
}
