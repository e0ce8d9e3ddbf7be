//! # Gridtariff - Ontario Energy Board tariff feed client
//!
//! A small polling client and field-mapping layer for the OEB electricity
//! and natural-gas tariff feeds. It periodically fetches the XML feed for a
//! configured company, renames the feed's terse tariff tags to descriptive
//! field names, and classifies the currently active time-of-use or
//! ultra-low-overnight pricing period.
//!
//! ## Architecture
//!
//! The application follows a modular architecture with clear separation of concerns:
//!
//! - `config`: Configuration management and validation
//! - `logging`: Structured logging and tracing
//! - `sector`: Energy sectors and compiled-in feed metadata
//! - `fields`: Raw-tag to descriptive-name tables and coverage diffing
//! - `feed`: Feed fetching, row matching and value mapping
//! - `holidays`: Ontario statutory holiday calendar
//! - `peak`: Active pricing-period classification
//! - `poller`: Snapshot lifecycle and the read interface

pub mod config;
pub mod error;
pub mod feed;
pub mod fields;
pub mod holidays;
pub mod logging;
pub mod peak;
pub mod poller;
pub mod sector;

// Re-export commonly used types
pub use config::Config;
pub use error::{GridTariffError, Result};
pub use feed::{CompanyData, FeedClient, FieldValue, RateSource};
pub use peak::{PeakState, Season, TariffPlan, classify};
pub use poller::{RateReading, RatesPoller, RatesSnapshot};
pub use sector::Sector;
