//! Query pipeline
//!
//! Resolver, providers and report builder run in a fixed order for each
//! query; the result is a [`QueryPage`] ready for a formatter.

pub mod pipeline;
pub mod result;

pub use pipeline::DividendChecker;
pub use result::QueryPage;
