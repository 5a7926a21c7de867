use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::decimal::Rate;
use crate::errors::{LedgerError, Result};

pub const ENV_MIN_ADVANCE_PCT: &str = "PAYMENT_PLAN_MIN_ADVANCE_PCT";
pub const ENV_FIRST_SHARE_PCT: &str = "PAYMENT_PLAN_FIRST_SHARE_PCT";
pub const ENV_PAGE_SIZE: &str = "PAYMENT_PLAN_PAGE_SIZE";

/// ledger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// minimum share of the total due for the first flexible payment
    pub flexible_minimum_advance: Rate,
    /// share of the total due the first of two installments must equal
    pub two_installment_first_share: Rate,
    /// payments per dashboard page
    pub dashboard_page_size: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            flexible_minimum_advance: Rate::from_decimal(dec!(0.10)),
            two_installment_first_share: Rate::from_decimal(dec!(0.50)),
            dashboard_page_size: 5,
        }
    }
}

impl LedgerConfig {
    /// defaults overridden by any `PAYMENT_PLAN_*` variables that are set
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(pct) = env_parsed::<Decimal>(ENV_MIN_ADVANCE_PCT)? {
            config.flexible_minimum_advance = Rate::from_percentage_decimal(pct);
        }

        if let Some(pct) = env_parsed::<Decimal>(ENV_FIRST_SHARE_PCT)? {
            config.two_installment_first_share = Rate::from_percentage_decimal(pct);
        }

        if let Some(size) = env_parsed::<usize>(ENV_PAGE_SIZE)? {
            config.dashboard_page_size = size;
        }

        config.validate()?;
        Ok(config)
    }

    /// parse from json; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| LedgerError::InvalidConfiguration {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let unit = |rate: Rate| rate > Rate::ZERO && rate <= Rate::ONE;

        if !unit(self.flexible_minimum_advance) {
            return Err(LedgerError::InvalidConfiguration {
                message: format!("minimum advance must be in (0%, 100%], got {}", self.flexible_minimum_advance),
            });
        }

        if !unit(self.two_installment_first_share) {
            return Err(LedgerError::InvalidConfiguration {
                message: format!("first installment share must be in (0%, 100%], got {}", self.two_installment_first_share),
            });
        }

        if self.dashboard_page_size == 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: "dashboard page size cannot be 0".to_string(),
            });
        }

        Ok(())
    }
}

fn env_parsed<T: FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| LedgerError::InvalidConfiguration {
                message: format!("{} is not a valid value: {:?}", key, raw),
            }),
        Err(_) => Ok(None),
    }
}
