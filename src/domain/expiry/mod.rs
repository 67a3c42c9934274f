//! Expiration date recognition and normalization.

mod errors;
mod expiration_date;
mod normalizer;

pub use errors::DateError;
pub use expiration_date::ExpirationDate;
pub use normalizer::DateNormalizer;
