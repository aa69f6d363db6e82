//! Detection and conversion of N64 ROM image byte orderings (`.z64`, `.n64`, `.v64`).

mod config;
mod error;
mod file;
mod ordering;
mod stream;
mod swap;

pub use config::Config;
pub use error::{Error, ParseOrderingError, Result};
pub use file::{create_sink, open_source};
pub use ordering::{detect, RomOrdering, UnrecognizedIdent};
pub use swap::{convert, Conversion, Converter, DataNotWordAligned, Swap, CHUNK_SIZE};
