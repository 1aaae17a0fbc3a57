//! Station search and station boards.
//!
//! The board pipeline fetches departures and arrivals concurrently, cuts
//! each list down to the requested time window and normalizes every entry
//! into a [`BoardEntry`] with no missing fields. Station search keeps only
//! stations served by trains.

mod duration;
mod error;
mod normalize;
mod products;
mod service;


pub use duration::{Timestamped, filter_by_duration, filter_by_duration_at};
pub use error::{Cause, ErrorKind, ServiceError};
pub use normalize::{BoardEntry, normalize};
pub use products::{serves_trains, train_products};
pub use service::{BoardResponse, ServiceConfig, Station, StationService};
