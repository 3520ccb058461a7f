//! savstream: row-streaming reader for SPSS .sav and .zsav files.
//!
//! This library decodes SPSS system files natively in Rust: the full
//! dictionary (variables, value labels, display attributes, encoding,
//! extended metadata) plus case data as a lazy sequence of rows. Numeric
//! cells are `f64` with system-missing mapped to NaN; string cells are
//! trimmed `String`s. Both the simple bytecode compression and the
//! zlib-framed variant used by .zsav files are handled transparently.
//!
//! # Quick Start
//!
//! ```no_run
//! use savstream::SavReader;
//!
//! let file = std::fs::File::open("survey.sav").unwrap();
//! let mut reader = SavReader::new(std::io::BufReader::new(file)).unwrap();
//!
//! for var in reader.logical_variables() {
//!     println!("{} (width {})", var.name, var.width);
//! }
//! while let Some(row) = reader.read_row().unwrap() {
//!     println!("{row:?}");
//! }
//! ```

pub mod cases;
pub mod constants;
pub mod dictionary;
pub mod document;
pub mod encoding;
pub mod error;
pub mod header;
pub mod info_records;
pub mod io_utils;
pub mod reader;
pub mod reconcile;
pub mod value_labels;
pub mod variable;
pub mod zlib;

// Re-export key public types
pub use crate::cases::{Cell, Row};
pub use crate::constants::{Alignment, Compression, Measure, Role, VarFormat};
pub use crate::dictionary::RawHeader;
pub use crate::error::{Result, SavError};
pub use crate::header::FileHeader;
pub use crate::io_utils::Endian;
pub use crate::reader::SavReader;
pub use crate::reconcile::{LogicalVariable, MissingValue};
