//! sql_query_input library - SQL query to metrics input
//!
//! Runs a configured SQL query against a MySQL server on every collection
//! cycle and turns each result row into a metric, with selected columns
//! promoted to tags.

pub mod accumulator;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod metric;
pub mod output;
pub mod plugin;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod test_utils;
