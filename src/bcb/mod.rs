pub mod client;
pub mod types;

pub use client::{BcbClient, BcbError};
pub use types::{SeriesPoint, SgsSeries};
