//! Station board server.
//!
//! A small backend in front of a db-rest transit API that answers two
//! questions: "which train stations match this name?" and "what arrives and
//! departs at this station in the next few minutes?"

pub mod board;
pub mod config;
pub mod dbrest;
pub mod web;
