//! Subway line topology server.
//!
//! Tracks each line's path as a chain of directed segments between
//! stations, and serves the operations that grow, split, and shrink
//! that chain over HTTP.

pub mod config;
pub mod domain;
pub mod service;
pub mod stations;
pub mod store;
pub mod web;
