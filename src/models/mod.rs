// Re-export all model types
pub use self::account::*;
pub use self::booking::*;
pub use self::cart::*;
pub use self::catalog::*;
pub use self::enums::*;
pub use self::errors::*;
pub use self::filter::*;
pub use self::validation::*;

mod account;
mod booking;
mod cart;
mod catalog;
mod enums;
mod errors;
mod filter;
mod validation;
