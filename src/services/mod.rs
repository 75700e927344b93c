//! Scrape pipeline services

pub mod artwork;
pub mod catalog;
pub mod code_matcher;
pub mod ledger;
pub mod nfo;
pub mod runner;

pub use catalog::CatalogClient;
pub use ledger::Ledger;
