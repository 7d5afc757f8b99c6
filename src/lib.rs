//! fintrack - personal finance tracker
//!
//! This library provides the core of the fintrack application: accounts,
//! income and expense transactions, scheduled bills and fixed expense
//! templates, with balance aggregation and a month calendar on top.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, transactions, fixed expenses, money)
//! - `storage`: JSON file storage layer and the `FinanceStore` trait
//! - `services`: Business logic, balance aggregation and calendar grids
//! - `audit`: Audit logging system
//! - `display`: Plain-text rendering for the terminal
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::services::aggregate::aggregate;
//!
//! let summary = aggregate(&accounts, &transactions);
//! println!("{}", summary.total_balance);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{FinanceError, FinanceResult, RecordKind};
