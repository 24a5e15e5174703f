// src/common/money.rs

//! Aritmética de valores vindos das requisições. Estouro vira erro 400,
//! nunca pânico.

use rust_decimal::Decimal;

use crate::common::error::AppError;

fn overflow() -> AppError {
    AppError::InvalidInput("Valor fora do limite permitido.".into())
}

/// Preço unitário x quantidade.
pub fn line_total(unit_price: Decimal, quantity: i32) -> Result<Decimal, AppError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(overflow)
}

pub fn checked_sum<I>(values: I) -> Result<Decimal, AppError>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v).ok_or_else(overflow))
}

pub fn checked_sub(a: Decimal, b: Decimal) -> Result<Decimal, AppError> {
    a.checked_sub(b).ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_total_multiplies() {
        assert_eq!(line_total(dec!(19.90), 3).unwrap(), dec!(59.70));
    }

    #[test]
    fn overflow_is_invalid_input() {
        assert!(matches!(line_total(Decimal::MAX, 2), Err(AppError::InvalidInput(_))));
        assert!(matches!(
            checked_sum([Decimal::MAX, dec!(1)]),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            checked_sub(Decimal::MIN, dec!(1)),
            Err(AppError::InvalidInput(_))
        ));
    }
}
