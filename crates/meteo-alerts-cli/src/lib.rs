//! Meteo Alerts CLI — fetch a meteorological alert feed, extract each
//! alert's table and print the records.

pub mod config;
pub mod feed;
pub mod filter;
pub mod pipeline;
pub mod present;

pub use config::{resolve_feed_url, resolve_strategy, resolve_timeout_ms};
pub use feed::{parse_feed, Feed, FeedClient, FeedError};
pub use filter::{Cutoff, FilterError};
pub use pipeline::{process, Summary};
pub use present::{render, OutputFormat};
