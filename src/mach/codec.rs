use super::Address;
use crate::lang::{Number, ProgramText};

/// Bytes taken by a number in the arena.
pub const NUM_SIZE: usize = 4;

/// ## Fixed width little-endian values
///
/// Addresses are two bytes when the arena fits in 64K and four bytes
/// otherwise. Line numbers, lengths and dimensions are stored as
/// addresses.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    addr_size: usize,
}

impl Codec {
    pub fn for_memsize(memsize: usize) -> Codec {
        let addr_size = if memsize <= 0x1_0000 { 2 } else { 4 };
        Codec { addr_size }
    }

    pub fn addr_size(&self) -> usize {
        self.addr_size
    }

    pub fn max_address(&self) -> Address {
        if self.addr_size == 2 {
            0xFFFF
        } else {
            0xFFFF_FFFF
        }
    }

    pub fn put_address(&self, buf: &mut [u8], value: Address) {
        let bytes = (value as u32).to_le_bytes();
        buf[..self.addr_size].copy_from_slice(&bytes[..self.addr_size]);
    }

    pub fn address(&self, buf: &[u8]) -> Address {
        let mut bytes = [0u8; 4];
        bytes[..self.addr_size].copy_from_slice(&buf[..self.addr_size]);
        u32::from_le_bytes(bytes) as Address
    }

    pub fn put_number(&self, buf: &mut [u8], value: Number) {
        buf[..NUM_SIZE].copy_from_slice(&value.to_le_bytes());
    }

    pub fn number(&self, buf: &[u8]) -> Number {
        let mut bytes = [0u8; NUM_SIZE];
        bytes.copy_from_slice(&buf[..NUM_SIZE]);
        Number::from_le_bytes(bytes)
    }

    pub fn address_in(&self, text: &dyn ProgramText, at: Address) -> Address {
        let mut bytes = [0u8; 4];
        for (i, b) in bytes.iter_mut().take(self.addr_size).enumerate() {
            *b = text.byte(at + i);
        }
        self.address(&bytes)
    }

    pub fn number_in(&self, text: &dyn ProgramText, at: Address) -> Number {
        let mut bytes = [0u8; NUM_SIZE];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = text.byte(at + i);
        }
        self.number(&bytes)
    }
}
