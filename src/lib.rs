//! scrooge - command-line tracker for personal expenses
//!
//! Expenses are booked into monthly logs, sorted into a fixed set of buckets
//! and labelled with tags that can contain other tags. A monthly analysis
//! compares the spending per bucket against guideline shares of the
//! available income.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, application settings and the YAML user configuration
//! - `error`: Custom error types
//! - `models`: Core data models (tags, expenses, monthly logs, buckets, etc.)
//! - `filter`: Tag and date filters over expenses
//! - `reports`: Monthly analysis and expense grouping
//! - `storage`: Repository trait, JSON file storage and an in-memory store
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `backup`: Backup documents, creation and restore
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use scrooge::config::{ScroogePaths, UserConfig};
//! use scrooge::services::MonthlyLogService;
//! use scrooge::storage::Storage;
//!
//! let paths = ScroogePaths::new()?;
//! let storage = Storage::open(paths.clone())?;
//! let config = UserConfig::load(&paths)?;
//! let created = MonthlyLogService::new(&storage).create_from_config(5, 2024, &config)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{ScroogeError, ScroogeResult};
