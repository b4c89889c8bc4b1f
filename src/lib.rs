#![warn(rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub(crate) mod api;
pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod ingest;
pub mod listing;
pub mod observability;
pub mod server;
pub mod store;
