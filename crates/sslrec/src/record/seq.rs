//! 64-bit record sequence numbers.

use crate::RecordError;

/// A per-direction record sequence number.
///
/// Kept as two 32-bit words; when the low word wraps the high word is
/// incremented. The value is never reused: incrementing past the maximum
/// is an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceNumber {
    high: u32,
    low: u32,
}

impl SequenceNumber {
    pub const fn new(value: u64) -> Self {
        Self {
            high: (value >> 32) as u32,
            low: value as u32,
        }
    }

    pub const fn from_parts(high: u32, low: u32) -> Self {
        Self { high, low }
    }

    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self::new(u64::from_be_bytes(bytes))
    }

    pub const fn as_u64(self) -> u64 {
        ((self.high as u64) << 32) | self.low as u64
    }

    pub const fn high(self) -> u32 {
        self.high
    }

    pub const fn low(self) -> u32 {
        self.low
    }

    /// Big-endian wire form, as covered by the MAC.
    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.as_u64().to_be_bytes()
    }

    /// The successor of this sequence number.
    pub fn next(self) -> Result<Self, RecordError> {
        let (low, carry) = self.low.overflowing_add(1);
        let high = if carry {
            self.high
                .checked_add(1)
                .ok_or(RecordError::SequenceOverflow)?
        } else {
            self.high
        };
        Ok(Self { high, low })
    }

    pub fn increment(&mut self) -> Result<(), RecordError> {
        *self = self.next()?;
        Ok(())
    }
}
