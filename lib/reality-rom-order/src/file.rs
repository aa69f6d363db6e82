use crate::error::Error;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Opens an existing ROM image for reading.
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<File, Error> {
    let path = path.as_ref();

    debug!(path = %path.display(), "opening source");

    File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Creates (or truncates) the file a converted image is written to.
pub fn create_sink<P: AsRef<Path>>(path: P) -> Result<File, Error> {
    let path = path.as_ref();

    debug!(path = %path.display(), "creating sink");

    File::create(path).map_err(|source| Error::Create {
        path: path.to_path_buf(),
        source,
    })
}
