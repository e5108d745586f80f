//! Rupiah amount bounds and overflow-checked arithmetic.

use crate::errors::ServiceError;
use rust_decimal::Decimal;
use validator::ValidationError;

/// Largest single price or payment accepted, Rp 1 trillion.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

fn out_of_range(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Prices: zero up to [`MAX_AMOUNT`].
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(out_of_range("non_negative", "Price must not be negative"));
    }
    if *value > Decimal::from(MAX_AMOUNT) {
        return Err(out_of_range("max_amount", "Price exceeds the allowed maximum"));
    }
    Ok(())
}

/// Payments: above zero up to [`MAX_AMOUNT`].
pub fn validate_payment(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(out_of_range(
            "positive",
            "Payment amount must be greater than zero",
        ));
    }
    if *value > Decimal::from(MAX_AMOUNT) {
        return Err(out_of_range(
            "max_amount",
            "Payment amount exceeds the allowed maximum",
        ));
    }
    Ok(())
}

/// `price * quantity`, or a validation error when the product does not fit.
pub fn line_total(price: Decimal, quantity: i32) -> Result<Decimal, ServiceError> {
    price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| ServiceError::ValidationError("Line total is out of range".to_string()))
}

/// `a + b`, or a validation error naming `what` on overflow.
pub fn checked_sum(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, ServiceError> {
    a.checked_add(b)
        .ok_or_else(|| ServiceError::ValidationError(format!("{what} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), true)]
    #[case(dec!(16000), true)]
    #[case(dec!(1000000000000), true)]
    #[case(dec!(1000000000000.01), false)]
    #[case(dec!(-1), false)]
    fn price_bounds(#[case] price: Decimal, #[case] ok: bool) {
        assert_eq!(validate_price(&price).is_ok(), ok);
    }

    #[test]
    fn payment_must_be_positive_and_bounded() {
        assert!(validate_payment(&dec!(0.01)).is_ok());
        assert!(validate_payment(&dec!(0)).is_err());
        assert!(validate_payment(&Decimal::from(MAX_AMOUNT + 1)).is_err());
    }

    #[test]
    fn overflow_is_a_validation_error() {
        assert_matches!(
            line_total(Decimal::MAX, 2),
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            checked_sum(Decimal::MAX, Decimal::MAX, "amount_paid"),
            Err(ServiceError::ValidationError(msg)) if msg.contains("amount_paid")
        );
        assert_eq!(line_total(dec!(16000), 10).unwrap(), dec!(160000));
    }

    #[test]
    fn bounded_inputs_cannot_overflow_a_line() {
        assert!(line_total(Decimal::from(MAX_AMOUNT), i32::MAX).is_ok());
    }
}
