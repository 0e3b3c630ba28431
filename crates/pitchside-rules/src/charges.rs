use rust_decimal::Decimal;

/// Platform service charge on the transfer fee, in percent.
pub const SERVICE_CHARGE_PERCENT: i64 = 15;

fn rate() -> Decimal {
    Decimal::new(SERVICE_CHARGE_PERCENT, 2)
}

/// The platform's cut of a transfer fee, rounded to two decimal places
/// (banker's rounding). Applied when a contract document is drawn up.
pub fn service_charge(fee: Decimal) -> Decimal {
    (fee * rate()).round_dp(2)
}

/// What the selling team receives after the service charge. Always equals
/// `fee - service_charge(fee)` exactly, so the two lines sum to the fee.
pub fn net_to_team(fee: Decimal) -> Decimal {
    fee - service_charge(fee)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn fifteen_percent_of_round_fee() {
        assert_eq!(service_charge(dec!(1_000_000)), dec!(150_000));
        assert_eq!(net_to_team(dec!(1_000_000)), dec!(850_000));
    }

    #[test]
    fn charge_and_net_sum_to_fee() {
        for fee in [dec!(333_333.33), dec!(99.99), dec!(0.01), dec!(7_250_000)] {
            assert_eq!(service_charge(fee) + net_to_team(fee), fee);
        }
    }

    #[test]
    fn midpoints_round_half_even() {
        assert_eq!(service_charge(dec!(0.10)), dec!(0.02));
        assert_eq!(service_charge(dec!(0.30)), dec!(0.04));
    }

    #[test]
    fn zero_fee() {
        assert_eq!(service_charge(dec!(0)), dec!(0));
        assert_eq!(net_to_team(dec!(0)), dec!(0));
    }
}
