use super::codec::NUM_SIZE;
use super::{Address, Arena, Codec};
use crate::error;
use crate::lang::{Error, Name};

type Result<T> = std::result::Result<T, Error>;

/// ## Heap objects
///
/// Each object is a header followed by its payload:
/// `kind, name[0], name[1], [length], payload...`.
/// Scalars have no length field, their payload is one number.
/// New objects go below the lowest one, so a scan from `himem` meets
/// the newest object first.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Kind {
    Scalar = 1,
    Array = 2,
    String = 3,
    Function = 4,
    Buffer = 5,
}

impl Kind {
    fn from_byte(b: u8) -> Option<Kind> {
        use Kind::*;
        match b {
            1 => Some(Scalar),
            2 => Some(Array),
            3 => Some(String),
            4 => Some(Function),
            5 => Some(Buffer),
            _ => None,
        }
    }

    /// Payload bytes for a size hint. Arrays take an element count and
    /// keep their second dimension in a trailing address. Strings take
    /// their element bytes and keep the element count the same way.
    /// `None` when the size does not fit in an address.
    pub fn payload_len(self, size: usize, codec: Codec) -> Option<usize> {
        let len = match self {
            Kind::Scalar => NUM_SIZE,
            Kind::Array => size.checked_mul(NUM_SIZE)?.checked_add(codec.addr_size())?,
            Kind::String => size.checked_add(codec.addr_size())?,
            Kind::Function => codec.addr_size() + 2,
            Kind::Buffer => size,
        };
        if len > codec.max_address() {
            return None;
        }
        Some(len)
    }

    fn header_len(self, codec: Codec) -> usize {
        match self {
            Kind::Scalar => 3,
            _ => 3 + codec.addr_size(),
        }
    }
}

/// Payload address and length of a heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Found {
    pub at: Address,
    pub len: usize,
}

/// The most recently located object.
#[derive(Debug, Default)]
pub struct FindCache {
    entry: Option<(Kind, Name, Found)>,
}

impl FindCache {
    pub fn clear(&mut self) {
        self.entry = None;
    }

    fn get(&self, kind: Kind, name: Name) -> Option<Found> {
        match self.entry {
            Some((k, n, found)) if k == kind && n == name => Some(found),
            _ => None,
        }
    }

    fn set(&mut self, kind: Kind, name: Name, found: Found) {
        self.entry = Some((kind, name, found));
    }
}

impl Arena {
    pub fn objects(&self) -> usize {
        self.objects
    }

    pub fn allocate(&mut self, kind: Kind, name: Name, size: usize) -> Result<Address> {
        if self.find(kind, name).is_some() {
            return Err(error!(DuplicateVariable));
        }
        let len = kind
            .payload_len(size, self.codec)
            .ok_or_else(|| error!(OutOfMemory))?;
        let total = kind.header_len(self.codec) + len;
        match self.top.checked_add(total) {
            Some(end) if end <= self.himem => {}
            _ => return Err(error!(OutOfMemory)),
        }
        let start = self.himem - total;
        self.bytes[start] = kind as u8;
        self.bytes[start + 1] = name[0];
        self.bytes[start + 2] = name[1];
        if kind != Kind::Scalar {
            self.set_address_at(start + 3, len);
        }
        let at = start + kind.header_len(self.codec);
        self.zero(at, at + len);
        self.himem = start;
        self.objects += 1;
        let found = Found { at, len };
        self.cache.set(kind, name, found);
        Ok(at)
    }

    pub fn find(&mut self, kind: Kind, name: Name) -> Option<Found> {
        if let Some(found) = self.cache.get(kind, name) {
            return Some(found);
        }
        let found = self.scan(kind, name).map(|(_, f)| f)?;
        self.cache.set(kind, name, found);
        Some(found)
    }

    /// Discards the object and everything allocated after it.
    /// Returns the new `himem`.
    pub fn delete(&mut self, kind: Kind, name: Name) -> Option<Address> {
        let (_, found) = self.scan(kind, name)?;
        let end = found.at + found.len;
        let himem = self.himem;
        self.zero(himem, end);
        self.himem = end;
        self.cache.clear();
        self.objects = self.count();
        Some(end)
    }

    pub fn length(&mut self, kind: Kind, name: Name) -> Option<usize> {
        self.find(kind, name).map(|f| f.len)
    }

    /// Header start and payload of a matching object, newest first.
    fn scan(&self, kind: Kind, name: Name) -> Option<(Address, Found)> {
        let end = self.memsize();
        let mut b = self.himem;
        while b + 3 <= end {
            let k = Kind::from_byte(self.bytes[b])?;
            let header = k.header_len(self.codec);
            if b + header > end {
                return None;
            }
            let len = match k {
                Kind::Scalar => NUM_SIZE,
                _ => self.address_at(b + 3),
            };
            if k == kind && self.bytes[b + 1] == name[0] && self.bytes[b + 2] == name[1] {
                return Some((b, Found { at: b + header, len }));
            }
            b = b.saturating_add(header + len);
        }
        None
    }

    fn count(&self) -> usize {
        let end = self.memsize();
        let mut b = self.himem;
        let mut n = 0;
        while b + 3 <= end {
            let k = match Kind::from_byte(self.bytes[b]) {
                Some(k) => k,
                None => break,
            };
            let header = k.header_len(self.codec);
            if b + header > end {
                break;
            }
            let len = match k {
                Kind::Scalar => NUM_SIZE,
                _ => self.address_at(b + 3),
            };
            n += 1;
            b = b.saturating_add(header + len);
        }
        n
    }
}
