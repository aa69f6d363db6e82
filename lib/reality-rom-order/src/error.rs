use crate::ordering::UnrecognizedIdent;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The header matched none of the three ROM orderings.
    #[error("not a recognized N64 ROM image")]
    InvalidFormat(#[from] UnrecognizedIdent),

    #[error("couldn't open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't create {}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Read, write or seek failure while detecting or converting.
    #[error("I/O error")]
    Io(#[from] io::Error),

    #[error("chunk size {0} is not a non-zero multiple of 4")]
    BadChunkSize(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown ROM format {0:?}, expected one of z64, n64, v64")]
pub struct ParseOrderingError(pub(crate) String);
