//! Registry Sheet Gateway Library
//!
//! Publishes registry items kept in a spreadsheet-style workbook and lets
//! visitors claim them over a small JSON API.

pub mod api;
pub mod config;
pub mod error;
pub mod registry;
pub mod sheet;
