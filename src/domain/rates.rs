//! Exchange rate table: currency code to multiplier over the base currency.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::error::ConfigError;

/// Read-only mapping from currency code to a positive decimal multiplier.
///
/// Built once at startup and shared behind an `Arc`; there is no way to
/// mutate it afterwards. Codes are case-sensitive and kept sorted so that
/// error messages list them deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRates {
    rates: BTreeMap<String, Decimal>,
}

impl ExchangeRates {
    /// Builds a table from `(code, rate)` pairs.
    ///
    /// # Errors
    ///
    /// Fails on an empty table, an empty or duplicated code, or a rate that
    /// is not strictly positive.
    pub fn new<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        let mut rates = BTreeMap::new();
        for (code, rate) in pairs {
            let code = code.into();
            if code.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "EXCHANGE_RATES".to_string(),
                    message: "currency code must not be empty".to_string(),
                });
            }
            if rate <= Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    key: "EXCHANGE_RATES".to_string(),
                    message: format!("rate for '{code}' must be positive"),
                });
            }
            if rates.insert(code.clone(), rate).is_some() {
                return Err(ConfigError::InvalidValue {
                    key: "EXCHANGE_RATES".to_string(),
                    message: format!("currency '{code}' is listed twice"),
                });
            }
        }

        if rates.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "EXCHANGE_RATES".to_string(),
                message: "at least one currency is required".to_string(),
            });
        }

        Ok(Self { rates })
    }

    /// Parses `code=rate` entries separated by commas, e.g. `rub=1,usd=70`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for malformed entries and everything `new` rejects.
    pub fn parse(table: &str) -> Result<Self, ConfigError> {
        let pairs = table
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (code, rate) = entry.split_once('=').ok_or_else(|| {
                    ConfigError::ParseError(format!("expected 'code=rate', got '{entry}'"))
                })?;
                let rate = Decimal::from_str(rate.trim()).map_err(|e| {
                    ConfigError::ParseError(format!("invalid rate in '{entry}': {e}"))
                })?;
                Ok::<_, ConfigError>((code.trim().to_string(), rate))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Self::new(pairs)
    }

    /// Multiplier for `currency`, if the table knows it.
    #[must_use]
    pub fn rate(&self, currency: &str) -> Option<Decimal> {
        self.rates.get(currency).copied()
    }

    #[must_use]
    pub fn contains(&self, currency: &str) -> bool {
        self.rates.contains_key(currency)
    }

    /// Known currency codes in ascending order.
    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for ExchangeRates {
    /// Rates relative to the rouble.
    fn default() -> Self {
        let rates = BTreeMap::from([
            ("rub".to_string(), Decimal::ONE),
            ("usd".to_string(), Decimal::from(70)),
            ("eur".to_string(), Decimal::from(80)),
        ]);
        Self { rates }
    }
}
