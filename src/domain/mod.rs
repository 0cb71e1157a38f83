//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod params;
pub mod rates;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, DatabaseError, ValidationError};
pub use params::{CreateItemParams, CreateUserParams, ListItemsParams, QueryParams};
pub use rates::ExchangeRates;
pub use traits::{ItemRepository, UserRepository};
pub use types::{Item, ItemId, ListingLine, ListingReport, NewItem, User, UserId};
