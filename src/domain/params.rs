//! Query parameter validation for each endpoint.
//!
//! Everything here is synchronous and never touches the store, so a request
//! that fails validation cannot cause a write.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::ValidationError;
use super::rates::ExchangeRates;
use super::types::{NewItem, UserId};

/// Decoded query string, kept as ordered `(key, value)` pairs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// First value supplied for `key`.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parameters of `PUT /user`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserParams {
    pub currency: Option<String>,
}

impl CreateUserParams {
    pub const CURRENCY: &'static str = "currency";

    pub fn from_query(query: &QueryParams) -> Self {
        Self {
            currency: query.first(Self::CURRENCY).map(str::to_owned),
        }
    }

    /// Returns the currency code once it is known to be in `rates`.
    ///
    /// # Errors
    ///
    /// `ValidationError::NotOneOf` listing every accepted code.
    pub fn validate(&self, rates: &ExchangeRates) -> Result<String, ValidationError> {
        match self.currency.as_deref() {
            Some(code) if rates.contains(code) => Ok(code.to_string()),
            _ => Err(ValidationError::NotOneOf {
                field: Self::CURRENCY,
                accepted: rates.currencies().collect::<Vec<_>>().join(", "),
            }),
        }
    }
}

/// Parameters of `PUT /item`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateItemParams {
    pub name: Option<String>,
    pub price: Option<String>,
}

impl CreateItemParams {
    pub const NAME: &'static str = "name";
    pub const PRICE: &'static str = "price";

    pub fn from_query(query: &QueryParams) -> Self {
        Self {
            name: query.first(Self::NAME).map(str::to_owned),
            price: query.first(Self::PRICE).map(str::to_owned),
        }
    }

    /// Checks `name` first, then `price`; the first failure is reported.
    ///
    /// # Errors
    ///
    /// `Missing` for an absent name, `NotDecimal` for an absent or
    /// unparsable price, `Negative` for a price below zero.
    pub fn validate(&self) -> Result<NewItem, ValidationError> {
        let name = self
            .name
            .as_deref()
            .ok_or(ValidationError::Missing(Self::NAME))?;

        let price = self
            .price
            .as_deref()
            .and_then(parse_exact_decimal)
            .ok_or(ValidationError::NotDecimal(Self::PRICE))?;

        if price.is_sign_negative() && !price.is_zero() {
            return Err(ValidationError::Negative(Self::PRICE));
        }

        Ok(NewItem::new(name, price))
    }
}

/// Plain `[+-]digits[.digits]` notation only, and only when `Decimal` holds
/// every fractional digit; anything it would round is rejected.
fn parse_exact_decimal(raw: &str) -> Option<Decimal> {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.len() + fraction.len() == 0 || !all_digits(whole) || !all_digits(fraction) {
        return None;
    }

    let price = Decimal::from_str(raw).ok()?;
    (price.scale() as usize == fraction.len()).then_some(price)
}

/// Parameters of `GET /list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItemsParams {
    pub user_id: Option<String>,
}

impl ListItemsParams {
    pub const USER_ID: &'static str = "userId";

    pub fn from_query(query: &QueryParams) -> Self {
        Self {
            user_id: query.first(Self::USER_ID).map(str::to_owned),
        }
    }

    /// Returns the user id to list items for.
    ///
    /// # Errors
    ///
    /// `NotInteger` when the id is absent or does not fit an `i32`.
    pub fn validate(&self) -> Result<UserId, ValidationError> {
        self.user_id
            .as_deref()
            .and_then(|raw| raw.parse::<UserId>().ok())
            .ok_or(ValidationError::NotInteger(Self::USER_ID))
    }
}
