/*!
## Host collaborators

The machine talks to the outside world one byte at a time through
these traits. None of them may call back into the `Runtime`; a host that
needs the machine's attention raises a flag in `Signals`, which the
machine polls between statements.

*/

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Channel ids for `&` selectors and `@I`/`@O`.
pub mod channel {
    pub const CONSOLE: u8 = 1;
    pub const DISPLAY: u8 = 2;
    pub const PRINTER: u8 = 4;
    pub const WIRE: u8 = 7;
    pub const RADIO: u8 = 8;
    pub const MQTT: u8 = 9;
    pub const FILE: u8 = 16;
}

pub trait Stream {
    /// The next byte, if one is ready. A stream with a natural way to
    /// wait for input (a terminal) may block here.
    fn read_byte(&mut self) -> Option<u8>;
    /// False when the byte could not be delivered.
    fn write_byte(&mut self, byte: u8) -> bool;
    fn available(&mut self) -> usize;
    fn peek_byte(&mut self) -> Option<u8>;
    /// A closed stream will never produce more input.
    fn is_open(&self) -> bool {
        true
    }
}

/// EEPROM-like byte store.
pub trait ByteStore {
    fn read(&self, offset: usize) -> u8;
    fn write(&mut self, offset: usize, byte: u8);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn commit(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirEntry {
    pub name: String,
    pub size: usize,
    pub regular: bool,
}

/// Named files. At most one file is open for reading and one for writing.
pub trait FileSystem {
    fn open_read(&mut self, name: &str) -> bool;
    fn open_write(&mut self, name: &str, append: bool) -> bool;
    fn close_read(&mut self);
    fn close_write(&mut self);
    fn read_byte(&mut self) -> Option<u8>;
    fn write_byte(&mut self, byte: u8) -> bool;
    fn available(&mut self) -> usize;
    fn catalog(&mut self) -> Vec<DirEntry>;
    fn delete(&mut self, name: &str) -> bool;
    fn format(&mut self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockField {
    Seconds,
    Minutes,
    Hours,
    Weekday,
    Day,
    Month,
    Year,
}

impl ClockField {
    pub fn from_index(i: usize) -> Option<ClockField> {
        use ClockField::*;
        [Seconds, Minutes, Hours, Weekday, Day, Month, Year]
            .get(i)
            .copied()
    }
}

pub trait Clock {
    fn get(&mut self, field: ClockField) -> i32;
    fn set(&mut self, field: ClockField, value: i32);
}

/// Cooperative multitasking. `yield_now` is called after every statement
/// and every byte of output.
pub trait Scheduler {
    fn yield_now(&mut self);
    fn millis(&mut self) -> u64;
}

pub struct SystemScheduler {
    start: Instant,
}

impl Default for SystemScheduler {
    fn default() -> SystemScheduler {
        SystemScheduler {
            start: Instant::now(),
        }
    }
}

impl Scheduler for SystemScheduler {
    fn yield_now(&mut self) {}
    fn millis(&mut self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Flags a host may raise from anywhere, including other threads.
#[derive(Debug, Default)]
pub struct Signals {
    interrupt: AtomicBool,
    pins: AtomicU64,
}

impl Signals {
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::SeqCst);
    }

    pub fn take_interrupt(&self) -> bool {
        self.interrupt.swap(false, Ordering::SeqCst)
    }

    /// Marks an event pin active. Pins above 63 are ignored.
    pub fn raise(&self, pin: u8) {
        if pin < 64 {
            self.pins.fetch_or(1 << pin, Ordering::SeqCst);
        }
    }

    pub fn take(&self, pin: u8) -> bool {
        if pin >= 64 {
            return false;
        }
        let bit = 1u64 << pin;
        self.pins.fetch_and(!bit, Ordering::SeqCst) & bit != 0
    }
}

/// Everything the machine can reach outside the arena.
pub struct Devices {
    streams: Vec<(u8, Box<dyn Stream>)>,
    store: Option<Box<dyn ByteStore>>,
    files: Option<Box<dyn FileSystem>>,
    clock: Option<Box<dyn Clock>>,
    scheduler: Box<dyn Scheduler>,
    signals: Arc<Signals>,
}

impl Default for Devices {
    fn default() -> Devices {
        Devices {
            streams: vec![],
            store: None,
            files: None,
            clock: None,
            scheduler: Box::new(SystemScheduler::default()),
            signals: Arc::new(Signals::default()),
        }
    }
}

impl Devices {
    pub fn stream<S: Stream + 'static>(mut self, channel: u8, stream: S) -> Devices {
        self.streams.retain(|(c, _)| *c != channel);
        self.streams.push((channel, Box::new(stream)));
        self
    }

    pub fn store<S: ByteStore + 'static>(mut self, store: S) -> Devices {
        self.store = Some(Box::new(store));
        self
    }

    pub fn files<F: FileSystem + 'static>(mut self, files: F) -> Devices {
        self.files = Some(Box::new(files));
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Devices {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn scheduler<S: Scheduler + 'static>(mut self, scheduler: S) -> Devices {
        self.scheduler = Box::new(scheduler);
        self
    }

    pub fn signals(&self) -> Arc<Signals> {
        self.signals.clone()
    }

    fn find(&mut self, channel: u8) -> Option<&mut Box<dyn Stream>> {
        self.streams
            .iter_mut()
            .find(|(c, _)| *c == channel)
            .map(|(_, s)| s)
    }

    pub(crate) fn has(&self, channel: u8) -> bool {
        if channel == channel::FILE {
            return self.files.is_some();
        }
        self.streams.iter().any(|(c, _)| *c == channel)
    }

    pub(crate) fn write(&mut self, channel: u8, byte: u8) -> bool {
        if channel == channel::FILE {
            return match self.files.as_mut() {
                Some(f) => f.write_byte(byte),
                None => false,
            };
        }
        match self.find(channel) {
            Some(s) => s.write_byte(byte),
            None => false,
        }
    }

    pub(crate) fn read(&mut self, channel: u8) -> Option<u8> {
        if channel == channel::FILE {
            return self.files.as_mut()?.read_byte();
        }
        self.find(channel)?.read_byte()
    }

    pub(crate) fn available(&mut self, channel: u8) -> usize {
        if channel == channel::FILE {
            return self.files.as_mut().map_or(0, |f| f.available());
        }
        self.find(channel).map_or(0, |s| s.available())
    }

    pub(crate) fn peek(&mut self, channel: u8) -> Option<u8> {
        if channel == channel::FILE {
            return None;
        }
        self.find(channel)?.peek_byte()
    }

    /// Whether waiting on the channel could ever produce input.
    pub(crate) fn is_open(&mut self, channel: u8) -> bool {
        if channel == channel::FILE {
            return false;
        }
        self.find(channel).map_or(false, |s| s.is_open())
    }

    pub(crate) fn yield_now(&mut self) {
        self.scheduler.yield_now()
    }

    pub(crate) fn millis(&mut self) -> u64 {
        self.scheduler.millis()
    }

    pub(crate) fn store_ref(&self) -> Option<&dyn ByteStore> {
        self.store.as_deref()
    }

    pub(crate) fn store_mut(&mut self) -> Option<&mut (dyn ByteStore + 'static)> {
        self.store.as_deref_mut()
    }

    pub(crate) fn files_mut(&mut self) -> Option<&mut (dyn FileSystem + 'static)> {
        self.files.as_deref_mut()
    }

    pub(crate) fn clock_mut(&mut self) -> Option<&mut (dyn Clock + 'static)> {
        self.clock.as_deref_mut()
    }
}

#[derive(Debug, Default)]
struct Buffers {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

/// In-memory stream. Clones share the same buffers, so a host keeps one
/// clone to feed input and collect output. Reading an empty input never
/// waits.
#[derive(Debug, Default, Clone)]
pub struct MemoryStream {
    buffers: Rc<RefCell<Buffers>>,
}

impl MemoryStream {
    pub fn feed(&self, s: &str) {
        self.buffers.borrow_mut().input.extend(s.bytes());
    }

    pub fn take_output(&self) -> String {
        let bytes = std::mem::take(&mut self.buffers.borrow_mut().output);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Stream for MemoryStream {
    fn read_byte(&mut self) -> Option<u8> {
        self.buffers.borrow_mut().input.pop_front()
    }
    fn write_byte(&mut self, byte: u8) -> bool {
        self.buffers.borrow_mut().output.push(byte);
        true
    }
    fn available(&mut self) -> usize {
        self.buffers.borrow().input.len()
    }
    fn peek_byte(&mut self) -> Option<u8> {
        self.buffers.borrow().input.front().copied()
    }
    fn is_open(&self) -> bool {
        !self.buffers.borrow().input.is_empty()
    }
}

/// A byte store in RAM, erased to 0xFF like fresh EEPROM.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    bytes: Vec<u8>,
}

impl MemoryStore {
    pub fn new(len: usize) -> MemoryStore {
        MemoryStore {
            bytes: vec![0xFF; len],
        }
    }
}

impl ByteStore for MemoryStore {
    fn read(&self, offset: usize) -> u8 {
        self.bytes.get(offset).copied().unwrap_or(0xFF)
    }
    fn write(&mut self, offset: usize, byte: u8) {
        if let Some(b) = self.bytes.get_mut(offset) {
            *b = byte;
        }
    }
    fn len(&self) -> usize {
        self.bytes.len()
    }
}
