//! Preparation of HYPE model input files from watershed attribute tables.
//!
//! - [`resolve`] matches columns against logical-name mappings.
//! - [`align`] aligns per-subbasin tables on their identifiers and writes
//!   `GeoData.txt`.
//! - [`geoclass`] writes the soil-landcover class table `GeoClass.txt`.
//! - [`params`] appends default parameter dictionaries to `par.txt`.

pub mod align;
pub mod config;
pub mod error;
pub mod geoclass;
pub mod io;
pub mod params;
pub mod resolve;
pub mod table;

pub use error::{HypeError, Result};
pub use table::{Column, Table, Value};
