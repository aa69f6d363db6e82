use crate::error::{Error, ParseOrderingError};
use crate::stream;
use byteorder::{BigEndian, ByteOrder};
use std::fmt;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Header bytes that matched none of the known orderings. Holds fewer than
/// four bytes when the source ended early.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnrecognizedIdent {
    ident: [u8; 4],
    len: usize,
}

impl UnrecognizedIdent {
    fn new(bytes: &[u8]) -> UnrecognizedIdent {
        let len = bytes.len().min(4);
        let mut ident = [0; 4];

        ident[..len].copy_from_slice(&bytes[..len]);

        UnrecognizedIdent { ident, len }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.ident[..self.len]
    }

    pub fn is_truncated(&self) -> bool {
        self.len < 4
    }
}

impl fmt::Display for UnrecognizedIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_truncated() {
            write!(f, "header is only {} of 4 bytes", self.len)?;

            if self.len == 0 {
                return Ok(());
            }

            write!(f, ":")?;
        } else {
            write!(f, "unknown ident")?;
        }

        for b in self.bytes() {
            write!(f, " {:02X}", b)?;
        }

        Ok(())
    }
}

impl std::error::Error for UnrecognizedIdent {}

/// On-disk byte ordering of an N64 ROM image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RomOrdering {
    /// Native cartridge order, `.z64`.
    BigEndian,
    /// Every 32-bit word reversed, `.n64`.
    LittleEndian,
    /// Every 16-bit half-word swapped, `.v64`.
    ByteSwapped,
}

impl RomOrdering {
    /// Detection order.
    pub const ALL: [RomOrdering; 3] = [
        RomOrdering::BigEndian,
        RomOrdering::LittleEndian,
        RomOrdering::ByteSwapped,
    ];

    pub fn from_ident(ident: u32) -> Result<RomOrdering, UnrecognizedIdent> {
        Ok(match ident {
            0x80371240 => RomOrdering::BigEndian,
            0x40123780 => RomOrdering::LittleEndian,
            0x37804012 => RomOrdering::ByteSwapped,
            x => Err(UnrecognizedIdent::new(&x.to_be_bytes()))?,
        })
    }

    pub fn from_ident_bytes(ident: &[u8]) -> Result<RomOrdering, UnrecognizedIdent> {
        if ident.len() < 4 {
            Err(UnrecognizedIdent::new(ident))?;
        }

        RomOrdering::from_ident(BigEndian::read_u32(ident))
    }

    /// The boot header signature as it appears at offset 0 in this ordering.
    pub fn ident(self) -> u32 {
        match self {
            RomOrdering::BigEndian => 0x80371240,
            RomOrdering::LittleEndian => 0x40123780,
            RomOrdering::ByteSwapped => 0x37804012,
        }
    }

    pub fn magic(self) -> [u8; 4] {
        self.ident().to_be_bytes()
    }

    pub fn from_code(code: char) -> Option<RomOrdering> {
        match code {
            'z' => Some(RomOrdering::BigEndian),
            'n' => Some(RomOrdering::LittleEndian),
            'v' => Some(RomOrdering::ByteSwapped),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            RomOrdering::BigEndian => 'z',
            RomOrdering::LittleEndian => 'n',
            RomOrdering::ByteSwapped => 'v',
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            RomOrdering::BigEndian => "z64",
            RomOrdering::LittleEndian => "n64",
            RomOrdering::ByteSwapped => "v64",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RomOrdering::BigEndian => "big-endian",
            RomOrdering::LittleEndian => "little-endian",
            RomOrdering::ByteSwapped => "byte-swapped",
        }
    }

    /// Guesses the ordering from the first letter of a file extension,
    /// so `out.v64` (or `OUT.V64`) gives `ByteSwapped`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<RomOrdering> {
        let code = path.as_ref().extension()?.to_str()?.chars().next()?;

        RomOrdering::from_code(code.to_ascii_lowercase())
    }
}

impl fmt::Display for RomOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.extension())
    }
}

impl FromStr for RomOrdering {
    type Err = ParseOrderingError;

    fn from_str(s: &str) -> Result<RomOrdering, ParseOrderingError> {
        let key = s.trim_start_matches('.').to_ascii_lowercase();

        let found = match key.as_str() {
            "big" | "big-endian" | "be" => Some(RomOrdering::BigEndian),
            "little" | "little-endian" | "le" => Some(RomOrdering::LittleEndian),
            "swapped" | "byte-swapped" | "bs" => Some(RomOrdering::ByteSwapped),
            "z" | "n" | "v" | "z64" | "n64" | "v64" => {
                key.chars().next().and_then(RomOrdering::from_code)
            }
            _ => None,
        };

        found.ok_or_else(|| ParseOrderingError(s.to_owned()))
    }
}

/// Identifies the ordering of a ROM image from its first four bytes.
///
/// The source is rewound to offset 0 first and is left just past the header.
pub fn detect<R: Read + Seek + ?Sized>(source: &mut R) -> Result<RomOrdering, Error> {
    let mut header = [0u8; 4];

    source.seek(SeekFrom::Start(0))?;

    let len = stream::fill(source, &mut header)?;
    let ordering = RomOrdering::from_ident_bytes(&header[..len])?;

    debug!(%ordering, "detected ROM ordering");

    Ok(ordering)
}
