use std::net::Ipv4Addr;

use super::error::ArtNetError;
use super::layout;
use crate::protocols::common::reader::nul_padded_string;

pub struct ArtNetReader<'a> {
    payload: &'a [u8],
}

impl<'a> ArtNetReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), ArtNetError> {
        if self.payload.len() < needed {
            return Err(ArtNetError::TooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, ArtNetError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(ArtNetError::TooShort {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_le(&self, range: std::ops::Range<usize>) -> Result<u16, ArtNetError> {
        let bytes = self.read_array::<2>(range)?;
        Ok(u16::from_le_bytes(bytes))
    }

    /// Reads a high/low byte pair, as used for the ArtDmx length field.
    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, ArtNetError> {
        let bytes = self.read_array::<2>(range)?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn read_ipv4(&self, range: std::ops::Range<usize>) -> Result<Ipv4Addr, ArtNetError> {
        let bytes = self.read_array::<4>(range)?;
        Ok(Ipv4Addr::from(bytes))
    }

    pub fn read_array<const N: usize>(
        &self,
        range: std::ops::Range<usize>,
    ) -> Result<[u8; N], ArtNetError> {
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| ArtNetError::TooShort {
            needed: N,
            actual: bytes.len(),
        })
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], ArtNetError> {
        self.payload
            .get(range.clone())
            .ok_or(ArtNetError::TooShort {
                needed: range.end,
                actual: self.payload.len(),
            })
    }

    pub fn read_string(&self, range: std::ops::Range<usize>) -> Result<String, ArtNetError> {
        let bytes = self.read_slice(range)?;
        Ok(nul_padded_string(bytes))
    }

    pub fn read_signature(&self) -> Result<&'a [u8], ArtNetError> {
        self.read_slice(layout::ID_RANGE)
    }
}
