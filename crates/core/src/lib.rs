//! Core report engine for Tally.
//!
//! This crate contains the report pipeline with ZERO web or database dependencies.
//! Entities are read through [`reports::ReportSource`]; rendered PDFs are kept
//! in a [`storage::ReportStore`].
//!
//! # Modules
//!
//! - `account` - Accounts and account groups
//! - `budget` - Budget periods and per-account allocations
//! - `reports` - Selection, aggregation, assembly and rendering of reports
//! - `storage` - Object storage for rendered reports

pub mod account;
pub mod budget;
pub mod reports;
pub mod storage;
