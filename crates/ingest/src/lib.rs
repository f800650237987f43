//! Problemset ingestion: fetch listing pages, parse them, upsert the tasks
//! into the catalog, and repeat on a cron schedule.

pub mod error;
pub mod fetch;
pub mod parser;
pub mod refresh;
pub mod schedule;
pub mod service;

pub use {
    error::{Error, Result},
    fetch::{PageSource, ProblemsetClient},
    refresh::{CatalogRefresher, RefreshOptions, RefreshReport},
    service::RefreshService,
};
