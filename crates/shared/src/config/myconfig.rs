use anyhow::{Context, Result, anyhow};
use chrono::{FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use std::{collections::BTreeSet, str::FromStr, time::Duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeConfig {
    /// Service fee, percent of the requested amount.
    pub fee_rate: Decimal,
    /// GST, percent of the service fee.
    pub tax_rate: Decimal,
    pub minimum_amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_url: String,
    pub otel_endpoint: String,
    pub fee: FeeConfig,
    pub bank_holidays: BTreeSet<NaiveDate>,
    pub settlement_offset: FixedOffset,
    pub payment_link_ttl: chrono::Duration,
    pub session_idle_ttl: chrono::Duration,
    pub status_lookup_timeout: Duration,
    pub backend_timeout: Duration,
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key).ok_or_else(|| anyhow!("Missing environment variable: {key}"))
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_string())
        };

        let port = required("PORT")?
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let backend_url = required("BACKEND_URL")?.trim_end_matches('/').to_string();

        let otel_endpoint = optional("OTEL_EXPORTER_OTLP_ENDPOINT", "http://otel-collector:4317");

        let fee_rate = parse_rate("FEE_RATE", &required("FEE_RATE")?)?;
        let tax_rate = parse_rate("TAX_RATE", &optional("TAX_RATE", "18"))?;

        let minimum_amount = Decimal::from_str(optional("MIN_PAYMENT_AMOUNT", "50").trim())
            .context("MIN_PAYMENT_AMOUNT must be a decimal number")?;
        if minimum_amount <= Decimal::ZERO {
            return Err(anyhow!("MIN_PAYMENT_AMOUNT must be positive"));
        }

        let bank_holidays = parse_holidays(&optional("BANK_HOLIDAYS", ""))?;

        let offset_minutes = optional("SETTLEMENT_UTC_OFFSET_MINUTES", "330")
            .parse::<i32>()
            .context("SETTLEMENT_UTC_OFFSET_MINUTES must be an integer")?;
        let settlement_offset = FixedOffset::east_opt(offset_minutes * 60)
            .ok_or_else(|| anyhow!("SETTLEMENT_UTC_OFFSET_MINUTES out of range: {offset_minutes}"))?;

        let link_ttl_hours = optional("PAYMENT_LINK_TTL_HOURS", "24")
            .parse::<u32>()
            .context("PAYMENT_LINK_TTL_HOURS must be a valid u32 integer")?;

        let session_idle_minutes = optional("SESSION_IDLE_TTL_MINUTES", "60")
            .parse::<u32>()
            .context("SESSION_IDLE_TTL_MINUTES must be a valid u32 integer")?;

        let status_lookup_secs = optional("STATUS_LOOKUP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .context("STATUS_LOOKUP_TIMEOUT_SECS must be a valid u64 integer")?;

        let backend_secs = optional("BACKEND_TIMEOUT_SECS", "15")
            .parse::<u64>()
            .context("BACKEND_TIMEOUT_SECS must be a valid u64 integer")?;

        Ok(Self {
            port,
            backend_url,
            otel_endpoint,
            fee: FeeConfig {
                fee_rate,
                tax_rate,
                minimum_amount,
            },
            bank_holidays,
            settlement_offset,
            payment_link_ttl: chrono::Duration::hours(i64::from(link_ttl_hours)),
            session_idle_ttl: chrono::Duration::minutes(i64::from(session_idle_minutes)),
            status_lookup_timeout: Duration::from_secs(status_lookup_secs),
            backend_timeout: Duration::from_secs(backend_secs),
        })
    }
}

fn parse_rate(key: &str, raw: &str) -> Result<Decimal> {
    let rate = Decimal::from_str(raw.trim())
        .with_context(|| format!("{key} must be a decimal percentage, got '{raw}'"))?;

    if rate < Decimal::ZERO || rate >= Decimal::ONE_HUNDRED {
        return Err(anyhow!("{key} must be within [0, 100), got {rate}"));
    }

    Ok(rate)
}

fn parse_holidays(raw: &str) -> Result<BTreeSet<NaiveDate>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("BANK_HOLIDAYS entry '{s}' is not YYYY-MM-DD"))
        })
        .collect()
}
