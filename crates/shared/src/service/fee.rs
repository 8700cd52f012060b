use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::{config::FeeConfig, utils::AppError};

/// Service fee and GST deducted from a requested payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FeeBreakdown {
    #[schema(value_type = String, example = "1000.00")]
    pub amount: Decimal,
    #[schema(value_type = String, example = "1.80")]
    pub fee_rate: Decimal,
    #[schema(value_type = String, example = "18")]
    pub tax_rate: Decimal,
    #[schema(value_type = String, example = "18.00")]
    pub service_fee: Decimal,
    #[schema(value_type = String, example = "3.24")]
    pub tax: Decimal,
    #[schema(value_type = String, example = "978.76")]
    pub receive_amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct FeeCalculator {
    config: FeeConfig,
}

/// Two decimal places, always carried at scale 2 so amounts render as
/// `18.00` rather than `18`.
fn round_currency(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

impl FeeCalculator {
    pub fn new(config: FeeConfig) -> Self {
        Self { config }
    }

    pub fn minimum_amount(&self) -> Decimal {
        self.config.minimum_amount
    }

    /// Parses user input before quoting. Blank, non-numeric, zero and
    /// negative input is rejected.
    pub fn quote_str(&self, raw: &str) -> Result<FeeBreakdown, AppError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::InvalidAmount("Amount is required".into()));
        }

        let amount = Decimal::from_str(raw)
            .map_err(|_| AppError::InvalidAmount(format!("'{raw}' is not a number")))?;

        self.quote(amount)
    }

    pub fn quote(&self, amount: Decimal) -> Result<FeeBreakdown, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidAmount(
                "Amount must be greater than zero".into(),
            ));
        }
        if amount < self.config.minimum_amount {
            return Err(AppError::InvalidAmount(format!(
                "Amount cannot be less than ₹{}",
                self.config.minimum_amount
            )));
        }

        let too_large = || AppError::InvalidAmount("Amount is too large".into());
        let percent = |value: Decimal, rate: Decimal| {
            value
                .checked_mul(rate)
                .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        };

        let fee_exact = percent(amount, self.config.fee_rate).ok_or_else(too_large)?;
        let tax_exact = percent(fee_exact, self.config.tax_rate).ok_or_else(too_large)?;

        let amount = round_currency(amount);
        let service_fee = round_currency(fee_exact);
        let tax = round_currency(tax_exact);
        let receive_amount = amount
            .checked_sub(service_fee)
            .and_then(|v| v.checked_sub(tax))
            .ok_or_else(too_large)?;

        Ok(FeeBreakdown {
            amount,
            fee_rate: self.config.fee_rate,
            tax_rate: self.config.tax_rate,
            service_fee,
            tax,
            receive_amount,
        })
    }
}
