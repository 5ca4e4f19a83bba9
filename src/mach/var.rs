use super::codec::NUM_SIZE;
use super::device::ClockField;
use super::{Address, Kind, Runtime};
use crate::error;
use crate::lang::{Error, Name, Number, Token};
use rand::SeedableRng;

type Result<T> = std::result::Result<T, Error>;

/// Substring bounds and element index following a string name,
/// as in `A$(2,4)(3)`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Selector {
    pub lower: Option<Number>,
    pub upper: Option<Number>,
    pub index: Option<Number>,
}

/// Something a statement can assign to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Scalar(Name),
    Element(Name, Number, Option<Number>),
    Text(Name, Selector),
}

/// Length byte of one string element.
struct Slot {
    at: Address,
    dim: usize,
}

/// ## Variable memory
///
/// Variables live in the arena heap. Names starting with `@` are views
/// of machine state instead.

impl Runtime {
    fn base(&self) -> Number {
        self.config.array_base as Number
    }

    /// Zero-based offset of a subscript.
    fn offset(&self, i: Number, count: usize) -> Result<usize> {
        let i = i.trunc() - self.base();
        if i < 0.0 || i >= count as Number {
            return Err(error!(SubscriptOutOfRange));
        }
        Ok(i as usize)
    }

    /// Element count for a `DIM` bound.
    pub(crate) fn dim_count(&self, n: Number) -> Result<usize> {
        let count = n.trunc() + 1.0 - self.base();
        if !(count >= 1.0) || count > self.config.memsize as Number {
            return Err(error!(SubscriptOutOfRange));
        }
        Ok(count as usize)
    }

    pub(crate) fn get_var(&mut self, name: Name) -> Result<Number> {
        if name[0] == b'@' {
            return self.get_special(name[1]);
        }
        Ok(match self.arena.find(Kind::Scalar, name) {
            Some(found) => self.arena.number_at(found.at),
            None => 0.0,
        })
    }

    pub(crate) fn set_var(&mut self, name: Name, value: Number) -> Result<()> {
        if name[0] == b'@' {
            return self.set_special(name[1], value);
        }
        let at = match self.arena.find(Kind::Scalar, name) {
            Some(found) => found.at,
            None => self.arena.allocate(Kind::Scalar, name, 0)?,
        };
        self.arena.set_number_at(at, value);
        Ok(())
    }

    /// The previous value of a variable, or `None` if it had none.
    pub(crate) fn var_exists(&mut self, name: Name) -> Option<Number> {
        let found = self.arena.find(Kind::Scalar, name)?;
        Some(self.arena.number_at(found.at))
    }

    pub(crate) fn create_array(&mut self, name: Name, rows: usize, cols: usize) -> Result<()> {
        let count = rows.checked_mul(cols).ok_or_else(|| error!(OutOfMemory))?;
        let at = self.arena.allocate(Kind::Array, name, count)?;
        self.arena.set_address_at(at + count * NUM_SIZE, cols);
        Ok(())
    }

    fn element_at(&mut self, name: Name, i: Number, j: Option<Number>) -> Result<Address> {
        let found = match self.arena.find(Kind::Array, name) {
            Some(found) => found,
            None => {
                let size = self.config.array_size;
                self.create_array(name, size, 1)?;
                self.arena
                    .find(Kind::Array, name)
                    .ok_or_else(|| error!(InternalError))?
            }
        };
        let addr = self.arena.codec().addr_size();
        let cols = self.arena.address_at(found.at + found.len - addr);
        if cols == 0 {
            return Err(error!(InternalError; "ARRAY HEADER"));
        }
        let rows = (found.len - addr) / NUM_SIZE / cols;
        let i = self.offset(i, rows)?;
        let j = match j {
            Some(j) => self.offset(j, cols)?,
            None => 0,
        };
        Ok(found.at + (i * cols + j) * NUM_SIZE)
    }

    pub(crate) fn get_element(&mut self, name: Name, i: Number, j: Option<Number>) -> Result<Number> {
        if name[0] == b'@' {
            return self.get_special_element(name[1], i);
        }
        let at = self.element_at(name, i, j)?;
        Ok(self.arena.number_at(at))
    }

    pub(crate) fn set_element(
        &mut self,
        name: Name,
        i: Number,
        j: Option<Number>,
        value: Number,
    ) -> Result<()> {
        if name[0] == b'@' {
            return self.set_special_element(name[1], i, value);
        }
        let at = self.element_at(name, i, j)?;
        self.arena.set_number_at(at, value);
        Ok(())
    }

    pub(crate) fn create_string(&mut self, name: Name, dim: usize, count: usize) -> Result<()> {
        if dim > 255 {
            return Err(error!(StringTooLong));
        }
        let size = (dim + 1)
            .checked_mul(count)
            .ok_or_else(|| error!(OutOfMemory))?;
        let at = self.arena.allocate(Kind::String, name, size)?;
        self.arena.set_address_at(at + size, count);
        Ok(())
    }

    fn slot(&mut self, name: Name, index: Option<Number>, create: bool) -> Result<Option<Slot>> {
        let found = match self.arena.find(Kind::String, name) {
            Some(found) => found,
            None if create => {
                let dim = self.config.string_size;
                self.create_string(name, dim, 1)?;
                self.arena
                    .find(Kind::String, name)
                    .ok_or_else(|| error!(InternalError))?
            }
            None => return Ok(None),
        };
        let addr = self.arena.codec().addr_size();
        let count = self.arena.address_at(found.at + found.len - addr);
        if count == 0 {
            return Err(error!(InternalError; "STRING HEADER"));
        }
        let dim = (found.len - addr) / count - 1;
        let j = match index {
            Some(j) => self.offset(j, count)?,
            None => 0,
        };
        Ok(Some(Slot {
            at: found.at + j * (dim + 1),
            dim,
        }))
    }

    pub(crate) fn read_string(&mut self, name: Name, selector: Selector) -> Result<Vec<u8>> {
        if name[0] == b'@' {
            return self.get_special_string(name[1]);
        }
        let slot = match self.slot(name, selector.index, false)? {
            Some(slot) => slot,
            None => return Ok(vec![]),
        };
        let len = (self.arena.bytes[slot.at] as usize).min(slot.dim);
        let lower = match selector.lower {
            Some(n) if !(n >= 1.0) => return Err(error!(SubscriptOutOfRange)),
            Some(n) => (n as usize - 1).min(len),
            None => 0,
        };
        let upper = match selector.upper {
            Some(n) => (n.max(0.0) as usize).min(len).max(lower),
            None => len,
        };
        let start = slot.at + 1;
        Ok(self.arena.bytes[start + lower..start + upper].to_vec())
    }

    pub(crate) fn write_string(&mut self, name: Name, selector: Selector, src: &[u8]) -> Result<()> {
        if name[0] == b'@' {
            return Err(error!(UnknownVariable));
        }
        let slot = match self.slot(name, selector.index, true)? {
            Some(slot) => slot,
            None => return Err(error!(InternalError)),
        };
        let len = (self.arena.bytes[slot.at] as usize).min(slot.dim);
        let (from, count, new_len) = match (selector.lower, selector.upper) {
            (None, _) => (0, src.len(), src.len()),
            (Some(i), upper) => {
                if !(i >= 1.0) || i as usize > len + 1 {
                    return Err(error!(SubscriptOutOfRange));
                }
                let from = i as usize - 1;
                match upper {
                    None => (from, src.len(), from + src.len()),
                    Some(k) => {
                        if k < i {
                            return Err(error!(SubscriptOutOfRange));
                        }
                        let count = src.len().min(k as usize - from);
                        (from, count, len.max(from + count))
                    }
                }
            }
        };
        if from + count > slot.dim {
            return Err(error!(StringTooLong));
        }
        let start = slot.at + 1 + from;
        self.arena.bytes[start..start + count].copy_from_slice(&src[..count]);
        self.arena.bytes[slot.at] = new_len as u8;
        Ok(())
    }

    /// Parses `(i[,j])` and leaves the cursor after the `)`.
    pub(crate) fn subscripts(&mut self) -> Result<(Number, Option<Number>)> {
        self.expect_char(b'(')?;
        let i = self.value()?;
        let j = if self.token.is_char(b',') {
            self.next_token();
            Some(self.value()?)
        } else {
            None
        };
        self.expect_char(b')')?;
        Ok((i, j))
    }

    /// Parses what follows a string name.
    pub(crate) fn selector(&mut self) -> Result<Selector> {
        let mut selector = Selector::default();
        if !self.token.is_char(b'(') {
            return Ok(selector);
        }
        self.next_token();
        if !self.token.is_char(b')') {
            selector.lower = Some(self.value()?);
            if self.token.is_char(b',') {
                self.next_token();
                selector.upper = Some(self.value()?);
            }
        }
        self.expect_char(b')')?;
        if self.token.is_char(b'(') {
            self.next_token();
            selector.index = Some(self.value()?);
            self.expect_char(b')')?;
        }
        Ok(selector)
    }

    pub(crate) fn target(&mut self) -> Result<Target> {
        match self.token {
            Token::Var(name) => {
                self.next_token();
                Ok(Target::Scalar(name))
            }
            Token::ArrayVar(name) => {
                self.next_token();
                let (i, j) = self.subscripts()?;
                Ok(Target::Element(name, i, j))
            }
            Token::StrVar(name) => {
                self.next_token();
                let selector = self.selector()?;
                Ok(Target::Text(name, selector))
            }
            _ => Err(error!(SyntaxError)),
        }
    }

    pub(crate) fn assign_number(&mut self, target: Target, value: Number) -> Result<()> {
        match target {
            Target::Scalar(name) => self.set_var(name, value),
            Target::Element(name, i, j) => self.set_element(name, i, j, value),
            Target::Text(..) => Err(error!(TypeMismatch)),
        }
    }

    pub(crate) fn assign_text(&mut self, target: Target, text: &[u8]) -> Result<()> {
        match target {
            Target::Text(name, selector) => self.write_string(name, selector, text),
            _ => Err(error!(TypeMismatch)),
        }
    }

    fn get_special(&mut self, c: u8) -> Result<Number> {
        let n = match c {
            0 => (self.arena.free() / NUM_SIZE) as Number,
            b'S' => {
                if self.io_error {
                    1.0
                } else {
                    0.0
                }
            }
            b'I' => self.input as Number,
            b'O' => self.output as Number,
            b'A' => self.devices.available(self.input) as Number,
            b'C' => self.devices.read(self.input).map_or(0.0, Number::from),
            b'E' => self.devices.store_ref().map_or(0, |s| s.len()) as Number,
            b'R' => self.seed,
            _ => return Err(error!(UnknownVariable)),
        };
        Ok(n)
    }

    fn set_special(&mut self, c: u8, value: Number) -> Result<()> {
        match c {
            b'S' => self.io_error = value != 0.0,
            b'I' => self.input = channel_number(value)?,
            b'O' => self.output = channel_number(value)?,
            b'C' => self.out_byte(value as u8),
            b'R' => {
                self.seed = value;
                self.rng = rand::rngs::StdRng::seed_from_u64(value.to_bits() as u64);
            }
            _ => return Err(error!(UnknownVariable)),
        }
        Ok(())
    }

    /// `@(i)` counts down from `himem` through free memory.
    fn free_cell(&self, i: Number) -> Result<Address> {
        let i = i.trunc();
        let n = (self.arena.free() / NUM_SIZE) as Number;
        if !(i >= 1.0) || i > n {
            return Err(error!(SubscriptOutOfRange));
        }
        Ok(self.arena.himem() - NUM_SIZE * i as usize)
    }

    /// `@E(i)` counts down from the end of the persistent store.
    fn store_cell(&self, i: Number) -> Result<usize> {
        let len = match self.devices.store_ref() {
            Some(store) => store.len(),
            None => return Err(error!(StoreError; "NO STORE")),
        };
        let i = i.trunc();
        if !(i >= 1.0) || i > (len / NUM_SIZE) as Number {
            return Err(error!(SubscriptOutOfRange));
        }
        Ok(len - NUM_SIZE * i as usize)
    }

    fn clock_field(i: Number) -> Result<ClockField> {
        if i < 0.0 {
            return Err(error!(SubscriptOutOfRange));
        }
        ClockField::from_index(i as usize).ok_or_else(|| error!(SubscriptOutOfRange))
    }

    fn get_special_element(&mut self, c: u8, i: Number) -> Result<Number> {
        match c {
            0 => {
                let at = self.free_cell(i)?;
                Ok(self.arena.number_at(at))
            }
            b'E' => {
                let at = self.store_cell(i)?;
                let mut bytes = [0u8; NUM_SIZE];
                if let Some(store) = self.devices.store_ref() {
                    for (k, b) in bytes.iter_mut().enumerate() {
                        *b = store.read(at + k);
                    }
                }
                Ok(Number::from_le_bytes(bytes))
            }
            b'T' => {
                let field = Runtime::clock_field(i)?;
                Ok(self.devices.clock_mut().map_or(0, |c| c.get(field)) as Number)
            }
            _ => Err(error!(UnknownVariable)),
        }
    }

    fn set_special_element(&mut self, c: u8, i: Number, value: Number) -> Result<()> {
        match c {
            0 => {
                let at = self.free_cell(i)?;
                self.arena.set_number_at(at, value);
            }
            b'E' => {
                let at = self.store_cell(i)?;
                if let Some(store) = self.devices.store_mut() {
                    for (k, b) in value.to_le_bytes().iter().enumerate() {
                        store.write(at + k, *b);
                    }
                    store.commit();
                }
            }
            b'T' => {
                let field = Runtime::clock_field(i)?;
                if let Some(clock) = self.devices.clock_mut() {
                    clock.set(field, value as i32);
                }
            }
            _ => return Err(error!(UnknownVariable)),
        }
        Ok(())
    }

    /// `@T$` is the time of day.
    fn get_special_string(&mut self, c: u8) -> Result<Vec<u8>> {
        if c != b'T' {
            return Err(error!(UnknownVariable));
        }
        let clock = match self.devices.clock_mut() {
            Some(clock) => clock,
            None => return Ok(vec![]),
        };
        let h = clock.get(ClockField::Hours);
        let m = clock.get(ClockField::Minutes);
        let s = clock.get(ClockField::Seconds);
        Ok(format!("{:02}:{:02}:{:02}", h, m, s).into_bytes())
    }
}

pub(crate) fn channel_number(n: Number) -> Result<u8> {
    if n < 0.0 || n > 255.0 {
        return Err(error!(BadFileNumber));
    }
    Ok(n as u8)
}
