#![allow(dead_code)]

use basic::mach::device::{channel, ByteStore, DirEntry, FileSystem, Scheduler};
use basic::mach::{Config, Devices, Event, MemoryStore, MemoryStream, Runtime};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

/// Counts yields. Every yield advances the clock one millisecond.
#[derive(Debug, Default, Clone)]
pub struct Ticks {
    yields: Rc<Cell<usize>>,
    millis: Rc<Cell<u64>>,
}

impl Ticks {
    pub fn yields(&self) -> usize {
        self.yields.get()
    }

    pub fn reset(&self) {
        self.yields.set(0);
    }

    pub fn advance(&self, ms: u64) {
        self.millis.set(self.millis.get() + ms);
    }
}

impl Scheduler for Ticks {
    fn yield_now(&mut self) {
        self.yields.set(self.yields.get() + 1);
        self.millis.set(self.millis.get() + 1);
    }
    fn millis(&mut self) -> u64 {
        self.millis.get()
    }
}

/// Files in a map shared with the test.
#[derive(Debug, Default, Clone)]
pub struct MemoryFiles {
    pub files: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
    reader: Option<VecDeque<u8>>,
    writer: Option<String>,
}

impl FileSystem for MemoryFiles {
    fn open_read(&mut self, name: &str) -> bool {
        match self.files.borrow().get(name) {
            Some(bytes) => {
                self.reader = Some(bytes.iter().copied().collect());
                true
            }
            None => false,
        }
    }
    fn open_write(&mut self, name: &str, append: bool) -> bool {
        let mut files = self.files.borrow_mut();
        let file = files.entry(name.to_string()).or_default();
        if !append {
            file.clear();
        }
        self.writer = Some(name.to_string());
        true
    }
    fn close_read(&mut self) {
        self.reader = None;
    }
    fn close_write(&mut self) {
        self.writer = None;
    }
    fn read_byte(&mut self) -> Option<u8> {
        self.reader.as_mut()?.pop_front()
    }
    fn write_byte(&mut self, byte: u8) -> bool {
        match &self.writer {
            Some(name) => {
                if let Some(file) = self.files.borrow_mut().get_mut(name) {
                    file.push(byte);
                }
                true
            }
            None => false,
        }
    }
    fn available(&mut self) -> usize {
        self.reader.as_ref().map_or(0, |r| r.len())
    }
    fn catalog(&mut self) -> Vec<DirEntry> {
        self.files
            .borrow()
            .iter()
            .map(|(name, bytes)| DirEntry {
                name: name.clone(),
                size: bytes.len(),
                regular: true,
            })
            .collect()
    }
    fn delete(&mut self, name: &str) -> bool {
        self.files.borrow_mut().remove(name).is_some()
    }
    fn format(&mut self) -> bool {
        self.files.borrow_mut().clear();
        true
    }
}

/// A byte store the test can look into while the runtime owns a clone.
#[derive(Debug, Clone)]
pub struct SharedStore {
    pub bytes: Rc<RefCell<Vec<u8>>>,
}

impl SharedStore {
    pub fn new(len: usize) -> SharedStore {
        SharedStore {
            bytes: Rc::new(RefCell::new(vec![0xFF; len])),
        }
    }
}

impl ByteStore for SharedStore {
    fn read(&self, offset: usize) -> u8 {
        self.bytes.borrow().get(offset).copied().unwrap_or(0xFF)
    }
    fn write(&mut self, offset: usize, byte: u8) {
        if let Some(b) = self.bytes.borrow_mut().get_mut(offset) {
            *b = byte;
        }
    }
    fn len(&self) -> usize {
        self.bytes.borrow().len()
    }
}

/// A runtime wired to in-memory devices, with handles kept for the test.
pub struct Host {
    pub runtime: Runtime,
    pub console: MemoryStream,
    pub ticks: Ticks,
    pub files: MemoryFiles,
}

impl Host {
    pub fn new() -> Host {
        Host::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Host {
        Host::with_store(config, MemoryStore::new(1024))
    }

    pub fn with_store<S: ByteStore + 'static>(config: Config, store: S) -> Host {
        let console = MemoryStream::default();
        let ticks = Ticks::default();
        let files = MemoryFiles::default();
        let devices = Devices::default()
            .stream(channel::CONSOLE, console.clone())
            .store(store)
            .files(files.clone())
            .scheduler(ticks.clone());
        Host {
            runtime: Runtime::new(config, devices),
            console,
            ticks,
            files,
        }
    }

    pub fn enter(&mut self, line: &str) -> bool {
        self.runtime.enter(line)
    }

    /// Enters every line, numbered or not, without running anything.
    pub fn program(&mut self, lines: &[&str]) {
        for line in lines {
            self.runtime.enter(line);
        }
    }
}

pub fn exec(host: &mut Host) -> String {
    exec_n(host, 5000)
}

/// Runs until the machine stops, collecting output and error reports.
pub fn exec_n(host: &mut Host, cycles: usize) -> String {
    let mut s = String::new();
    let mut prev_running = false;
    loop {
        let event = host.runtime.execute(cycles);
        s.push_str(&host.console.take_output());
        match event {
            Event::Stopped => break,
            Event::Errors(error) => {
                s.push_str(&format!("?{}\n", error));
                prev_running = false;
            }
            Event::Running => {
                if prev_running {
                    s.push_str(&format!("\n{} Execution cycles exceeded.\n", cycles));
                    break;
                }
                prev_running = true;
            }
        }
    }
    s
}

/// Enters one direct line and runs it.
pub fn run_line(host: &mut Host, line: &str) -> String {
    host.enter(line);
    exec(host)
}
