pub use crate::pkg::internal::errors::Error;

pub type Result<T> = core::result::Result<T, Error>;
