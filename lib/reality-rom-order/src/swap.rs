use crate::config::Config;
use crate::error::Error;
use crate::ordering::RomOrdering;
use crate::stream;
use byteorder::{ByteOrder, BE};
use std::fmt;
use std::io::{Read, Write};
use tracing::debug;

/// Default number of bytes read, permuted and written per step.
pub const CHUNK_SIZE: usize = 1024;

#[derive(Debug, PartialEq)]
pub struct DataNotWordAligned(usize);

impl DataNotWordAligned {
    pub fn data_len(&self) -> usize {
        self.0
    }
}

impl fmt::Display for DataNotWordAligned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes is not a whole number of 32-bit words", self.0)
    }
}

impl std::error::Error for DataNotWordAligned {}

/// A byte permutation applied to every 32-bit word. Each one is its own
/// inverse, so one swap covers both directions between a pair of orderings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Swap {
    /// `[1, 0, 3, 2]`, between z64 and v64.
    SwapBytes,
    /// `[3, 2, 1, 0]`, between z64 and n64.
    ReverseWord,
    /// `[2, 3, 0, 1]`, between n64 and v64.
    SwapHalves,
}

impl Swap {
    /// The swap taking `from` to `to`, or `None` when they are the same.
    pub fn between(from: RomOrdering, to: RomOrdering) -> Option<Swap> {
        use RomOrdering::*;

        match (from, to) {
            (BigEndian, ByteSwapped) | (ByteSwapped, BigEndian) => Some(Swap::SwapBytes),
            (BigEndian, LittleEndian) | (LittleEndian, BigEndian) => Some(Swap::ReverseWord),
            (LittleEndian, ByteSwapped) | (ByteSwapped, LittleEndian) => Some(Swap::SwapHalves),
            (BigEndian, BigEndian) | (LittleEndian, LittleEndian) | (ByteSwapped, ByteSwapped) => {
                None
            }
        }
    }

    /// `output[i] = input[permutation()[i]]` within each word.
    pub fn permutation(self) -> [usize; 4] {
        match self {
            Swap::SwapBytes => [1, 0, 3, 2],
            Swap::ReverseWord => [3, 2, 1, 0],
            Swap::SwapHalves => [2, 3, 0, 1],
        }
    }

    pub fn apply(self, data: &mut [u8]) -> Result<(), DataNotWordAligned> {
        if data.len() % 4 != 0 {
            Err(DataNotWordAligned(data.len()))?;
        }

        self.apply_words(data);

        Ok(())
    }

    fn apply_words(self, data: &mut [u8]) {
        for word in data.chunks_exact_mut(4) {
            let copy = BE::read_u32(word);

            let swapped = match self {
                Swap::SwapBytes => ((copy << 8) & 0xFF00FF00) | ((copy >> 8) & 0x00FF00FF),
                Swap::ReverseWord => copy.swap_bytes(),
                Swap::SwapHalves => copy.rotate_left(16),
            };

            BE::write_u32(word, swapped);
        }
    }
}

/// What a conversion did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    pub swap: Swap,
    pub bytes_written: u64,
    /// Length of the trailing partial chunk, which is neither swapped nor written.
    pub bytes_dropped: usize,
}

/// Streams a ROM image from one ordering to another one chunk at a time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Converter {
    chunk_size: usize,
}

impl Default for Converter {
    fn default() -> Self {
        Converter {
            chunk_size: CHUNK_SIZE,
        }
    }
}

impl Converter {
    pub fn new(chunk_size: usize) -> Result<Converter, Error> {
        if chunk_size == 0 || chunk_size % 4 != 0 {
            Err(Error::BadChunkSize(chunk_size))?;
        }

        Ok(Converter { chunk_size })
    }

    pub fn from_config(config: &Config) -> Result<Converter, Error> {
        Converter::new(config.chunk_size)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Reads `input` from its current position to EOF and writes the
    /// reordered bytes to `output`.
    ///
    /// Only whole chunks are converted. Once a full chunk can't be read the
    /// conversion stops, and whatever was read of the last chunk is dropped
    /// and reported in [`Conversion::bytes_dropped`].
    ///
    /// # Panics
    ///
    /// Panics if `from == to`.
    pub fn convert<R, W>(
        &self,
        from: RomOrdering,
        to: RomOrdering,
        input: &mut R,
        output: &mut W,
    ) -> Result<Conversion, Error>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let swap = match Swap::between(from, to) {
            Some(swap) => swap,
            None => panic!("can't convert {} to itself", from),
        };

        debug!(%from, %to, ?swap, chunk_size = self.chunk_size, "converting");

        let mut chunk = vec![0u8; self.chunk_size];
        let mut bytes_written = 0u64;

        let bytes_dropped = loop {
            let len = stream::fill(input, &mut chunk)?;

            if len < chunk.len() {
                break len;
            }

            swap.apply_words(&mut chunk);
            output.write_all(&chunk)?;

            bytes_written += chunk.len() as u64;
        };

        output.flush()?;

        debug!(bytes_written, bytes_dropped, "conversion done");

        Ok(Conversion {
            swap,
            bytes_written,
            bytes_dropped,
        })
    }
}

/// [`Converter::convert`] with the default chunk size.
pub fn convert<R, W>(
    from: RomOrdering,
    to: RomOrdering,
    input: &mut R,
    output: &mut W,
) -> Result<Conversion, Error>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    Converter::default().convert(from, to, input, output)
}
