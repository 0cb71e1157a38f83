//! Core domain types: users, items and the converted price listing.

use std::fmt;

use rust_decimal::Decimal;

use super::error::AppError;

/// Store-assigned user identifier.
pub type UserId = i32;

/// Store-assigned item identifier.
pub type ItemId = i32;

/// A registered user and the currency prices are shown to them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub currency: String,
}

/// An item as stored, priced in the base currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price: Decimal,
}

/// A validated item waiting to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub price: Decimal,
}

impl NewItem {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// One `<name>: <converted price>` line of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLine {
    pub name: String,
    pub price: Decimal,
}

impl fmt::Display for ListingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.price)
    }
}

/// Items with their prices converted into one user's currency.
///
/// Rendered as newline-joined lines in the order the items were read.
/// Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingReport {
    pub lines: Vec<ListingLine>,
}

impl ListingReport {
    /// Multiplies every item's price by `rate`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if a product does not fit in a `Decimal`.
    pub fn convert(items: &[Item], rate: Decimal) -> Result<Self, AppError> {
        let lines = items
            .iter()
            .map(|item| {
                let price = item.price.checked_mul(rate).ok_or_else(|| {
                    AppError::Internal(format!(
                        "price of item {} overflows after conversion",
                        item.id
                    ))
                })?;
                Ok::<_, AppError>(ListingLine {
                    name: item.name.clone(),
                    price,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(Self { lines })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for ListingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = self.lines.iter();
        if let Some(first) = lines.next() {
            write!(f, "{first}")?;
        }
        for line in lines {
            write!(f, "\n{line}")?;
        }
        Ok(())
    }
}
