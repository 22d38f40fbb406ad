//! TON account address codec.
//!
//! tonapi reports addresses in raw `workchain:hex` form while wallets and
//! explorers display the 48-character user-friendly form. Both are parsed
//! here; [`TonAddress`]'s `Display` renders the canonical user-friendly one.

use std::{fmt, str::FromStr};

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE},
    Engine as _,
};
use thiserror::Error;

const HASH_LEN: usize = 32;
const FRIENDLY_LEN: usize = 48;
const FRIENDLY_BYTES: usize = 36;

const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const FLAG_TEST_ONLY: u8 = 0x80;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("invalid workchain in raw address: {0}")]
    InvalidWorkchain(String),
    #[error("raw address hash must be 64 hex characters")]
    InvalidHash,
    #[error("user-friendly address must be 48 characters, got {0}")]
    InvalidLength(usize),
    #[error("user-friendly address is not valid base64")]
    InvalidBase64,
    #[error("unknown address tag 0x{0:02x}")]
    InvalidTag(u8),
    #[error("address checksum mismatch")]
    ChecksumMismatch,
}

/// Flags controlling the user-friendly rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FriendlyFormat {
    pub url_safe: bool,
    pub bounceable: bool,
    pub test_only: bool,
}

impl Default for FriendlyFormat {
    fn default() -> Self {
        Self {
            url_safe: true,
            bounceable: true,
            test_only: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TonAddress {
    workchain: i8,
    hash: [u8; HASH_LEN],
}

impl TonAddress {
    pub fn new(workchain: i8, hash: [u8; HASH_LEN]) -> Self {
        Self { workchain, hash }
    }

    pub fn workchain(&self) -> i8 {
        self.workchain
    }

    pub fn hash(&self) -> &[u8; HASH_LEN] {
        &self.hash
    }

    /// Accepts either the raw or the user-friendly form.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AddressError::Empty);
        }
        if input.contains(':') {
            Self::parse_raw(input)
        } else {
            Self::parse_friendly(input).map(|(address, _)| address)
        }
    }

    pub fn parse_raw(input: &str) -> Result<Self, AddressError> {
        let (workchain, hex) = input
            .trim()
            .split_once(':')
            .ok_or_else(|| AddressError::InvalidWorkchain(input.to_string()))?;
        let workchain = workchain
            .parse::<i8>()
            .map_err(|_| AddressError::InvalidWorkchain(workchain.to_string()))?;

        let digits = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()
            .ok_or(AddressError::InvalidHash)?;
        if digits.len() != HASH_LEN * 2 {
            return Err(AddressError::InvalidHash);
        }
        let mut hash = [0u8; HASH_LEN];
        for (slot, pair) in hash.iter_mut().zip(digits.chunks(2)) {
            *slot = (pair[0] << 4) | pair[1];
        }

        Ok(Self { workchain, hash })
    }

    /// Parses the 48-character form, returning the flags it was encoded with.
    pub fn parse_friendly(input: &str) -> Result<(Self, FriendlyFormat), AddressError> {
        let input = input.trim();
        if input.len() != FRIENDLY_LEN {
            return Err(AddressError::InvalidLength(input.len()));
        }

        let url_safe = input.contains(['-', '_']);
        let engine = if url_safe { &URL_SAFE } else { &STANDARD };
        let bytes = engine
            .decode(input)
            .map_err(|_| AddressError::InvalidBase64)?;
        if bytes.len() != FRIENDLY_BYTES {
            return Err(AddressError::InvalidBase64);
        }

        let expected = crc16(&bytes[..34]);
        let actual = u16::from_be_bytes([bytes[34], bytes[35]]);
        if expected != actual {
            return Err(AddressError::ChecksumMismatch);
        }

        let test_only = bytes[0] & FLAG_TEST_ONLY != 0;
        let bounceable = match bytes[0] & !FLAG_TEST_ONLY {
            TAG_BOUNCEABLE => true,
            TAG_NON_BOUNCEABLE => false,
            _ => return Err(AddressError::InvalidTag(bytes[0])),
        };

        let mut hash = [0u8; HASH_LEN];
        hash.copy_from_slice(&bytes[2..34]);

        Ok((
            Self {
                workchain: bytes[1] as i8,
                hash,
            },
            FriendlyFormat {
                url_safe,
                bounceable,
                test_only,
            },
        ))
    }

    pub fn to_raw(&self) -> String {
        let hex: String = self.hash.iter().map(|byte| format!("{byte:02x}")).collect();
        format!("{}:{hex}", self.workchain)
    }

    pub fn to_friendly(&self, format: FriendlyFormat) -> String {
        let mut tag = if format.bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };
        if format.test_only {
            tag |= FLAG_TEST_ONLY;
        }

        let mut bytes = Vec::with_capacity(FRIENDLY_BYTES);
        bytes.push(tag);
        bytes.push(self.workchain as u8);
        bytes.extend_from_slice(&self.hash);
        let checksum = crc16(&bytes);
        bytes.extend_from_slice(&checksum.to_be_bytes());

        if format.url_safe {
            URL_SAFE.encode(bytes)
        } else {
            STANDARD.encode(bytes)
        }
    }

    /// Bounceable, mainnet, URL-safe.
    pub fn to_canonical(&self) -> String {
        self.to_friendly(FriendlyFormat::default())
    }
}

impl fmt::Display for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

impl FromStr for TonAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// CRC16/XMODEM (poly 0x1021, init 0).
fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}
