use super::heap::FindCache;
use super::program::LineCache;
use super::{Address, Codec};
use crate::error;
use crate::lang::{Error, Number};

type Result<T> = std::result::Result<T, Error>;

/// ## The memory arena
///
/// One byte vector holds everything. The program grows up from 0 to
/// `top`, the heap grows down from the end to `himem`. The free space is
/// `[top, himem)` and nothing is ever moved across it.

pub struct Arena {
    pub(crate) bytes: Vec<u8>,
    pub(crate) top: Address,
    pub(crate) himem: Address,
    pub(crate) codec: Codec,
    pub(crate) objects: usize,
    pub(crate) cache: FindCache,
    pub(crate) line_cache: LineCache,
}

impl Arena {
    pub fn new(memsize: usize) -> Arena {
        Arena {
            bytes: vec![0; memsize],
            top: 0,
            himem: memsize,
            codec: Codec::for_memsize(memsize),
            objects: 0,
            cache: FindCache::default(),
            line_cache: LineCache::default(),
        }
    }

    pub fn memsize(&self) -> usize {
        self.bytes.len()
    }

    pub fn top(&self) -> Address {
        self.top
    }

    pub fn himem(&self) -> Address {
        self.himem
    }

    pub fn free(&self) -> usize {
        self.himem - self.top
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// The stored program.
    pub fn program(&self) -> &[u8] {
        &self.bytes[..self.top]
    }

    pub fn peek(&self, at: Address) -> Option<u8> {
        self.bytes.get(at).copied()
    }

    pub fn poke(&mut self, at: Address, value: u8) -> bool {
        match self.bytes.get_mut(at) {
            Some(b) => {
                *b = value;
                true
            }
            None => false,
        }
    }

    pub(crate) fn number_at(&self, at: Address) -> Number {
        self.codec.number(&self.bytes[at..])
    }

    pub(crate) fn set_number_at(&mut self, at: Address, value: Number) {
        let codec = self.codec;
        codec.put_number(&mut self.bytes[at..], value)
    }

    pub(crate) fn address_at(&self, at: Address) -> Address {
        self.codec.address(&self.bytes[at..])
    }

    pub(crate) fn set_address_at(&mut self, at: Address, value: Address) {
        let codec = self.codec;
        codec.put_address(&mut self.bytes[at..], value)
    }

    pub(crate) fn zero(&mut self, from: Address, to: Address) {
        for b in &mut self.bytes[from..to] {
            *b = 0;
        }
    }

    /// Moves `len` bytes from `src` to `dst`. The ranges may overlap in
    /// either direction; `copy_within` picks the copy order.
    pub fn move_block(&mut self, src: Address, len: usize, dst: Address) -> Result<()> {
        if dst + len > self.himem || src + len > self.himem {
            return Err(error!(OutOfMemory));
        }
        if len > 0 && src != dst {
            self.bytes.copy_within(src..src + len, dst);
        }
        Ok(())
    }

    /// Drops every heap object.
    pub fn clear_heap(&mut self) {
        let end = self.memsize();
        let himem = self.himem;
        self.zero(himem, end);
        self.himem = end;
        self.objects = 0;
        self.cache.clear();
    }

    /// Drops the program, leaving the heap alone.
    pub fn clear_program(&mut self) {
        let top = self.top;
        self.zero(0, top);
        self.top = 0;
        self.line_cache.clear();
    }
}
