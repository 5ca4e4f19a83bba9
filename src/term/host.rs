use basic::mach::device::{ByteStore, Clock, ClockField, DirEntry, FileSystem};
use chrono::{Datelike, Duration, Local, Timelike};
use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;

/// Local time shifted by whatever the program set.
#[derive(Default)]
pub struct HostClock {
    offset: i64,
}

impl Clock for HostClock {
    fn get(&mut self, field: ClockField) -> i32 {
        let now = Local::now() + Duration::seconds(self.offset);
        match field {
            ClockField::Seconds => now.second() as i32,
            ClockField::Minutes => now.minute() as i32,
            ClockField::Hours => now.hour() as i32,
            ClockField::Weekday => now.weekday().number_from_sunday() as i32,
            ClockField::Day => now.day() as i32,
            ClockField::Month => now.month() as i32,
            ClockField::Year => now.year(),
        }
    }

    fn set(&mut self, field: ClockField, value: i32) {
        let now = Local::now() + Duration::seconds(self.offset);
        let v = value.max(0) as u32;
        let then = match field {
            ClockField::Seconds => now.with_second(v),
            ClockField::Minutes => now.with_minute(v),
            ClockField::Hours => now.with_hour(v),
            ClockField::Weekday => {
                let days = value as i64 - now.weekday().number_from_sunday() as i64;
                Some(now + Duration::days(days))
            }
            ClockField::Day => now.with_day(v),
            ClockField::Month => now.with_month(v),
            ClockField::Year => now.with_year(value),
        };
        if let Some(then) = then {
            self.offset += (then - now).num_seconds();
        }
    }
}

/// Files in one directory of the host.
pub struct DiskFiles {
    root: PathBuf,
    reader: Option<VecDeque<u8>>,
    writer: Option<BufWriter<File>>,
}

impl DiskFiles {
    pub fn new<P: Into<PathBuf>>(root: P) -> DiskFiles {
        DiskFiles {
            root: root.into(),
            reader: None,
            writer: None,
        }
    }
}

impl FileSystem for DiskFiles {
    fn open_read(&mut self, name: &str) -> bool {
        let mut bytes = vec![];
        match File::open(self.root.join(name)).and_then(|mut f| f.read_to_end(&mut bytes)) {
            Ok(_) => {
                self.reader = Some(bytes.into());
                true
            }
            Err(_) => false,
        }
    }

    fn open_write(&mut self, name: &str, append: bool) -> bool {
        self.close_write();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(append)
            .truncate(!append)
            .open(self.root.join(name));
        match file {
            Ok(f) => {
                self.writer = Some(BufWriter::new(f));
                true
            }
            Err(_) => false,
        }
    }

    fn close_read(&mut self) {
        self.reader = None;
    }

    fn close_write(&mut self) {
        if let Some(mut w) = self.writer.take() {
            let _ = w.flush();
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.reader.as_mut()?.pop_front()
    }

    fn write_byte(&mut self, byte: u8) -> bool {
        match self.writer.as_mut() {
            Some(w) => w.write_all(&[byte]).is_ok(),
            None => false,
        }
    }

    fn available(&mut self) -> usize {
        self.reader.as_ref().map_or(0, |r| r.len())
    }

    fn catalog(&mut self) -> Vec<DirEntry> {
        let mut entries: Vec<DirEntry> = match fs::read_dir(&self.root) {
            Ok(dir) => dir
                .flatten()
                .filter_map(|e| {
                    let meta = e.metadata().ok()?;
                    Some(DirEntry {
                        name: e.file_name().to_string_lossy().into_owned(),
                        size: meta.len() as usize,
                        regular: meta.is_file(),
                    })
                })
                .collect(),
            Err(_) => vec![],
        };
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    fn delete(&mut self, name: &str) -> bool {
        fs::remove_file(self.root.join(name)).is_ok()
    }

    /// The host's own directories are never wiped.
    fn format(&mut self) -> bool {
        false
    }
}

/// A byte store kept in a host file, written back on commit.
pub struct FileStore {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl FileStore {
    pub fn open<P: Into<PathBuf>>(path: P, len: usize) -> FileStore {
        let path = path.into();
        let mut bytes = fs::read(&path).unwrap_or_default();
        bytes.resize(len, 0xFF);
        FileStore { path, bytes }
    }
}

impl ByteStore for FileStore {
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

    fn commit(&mut self) {
        if let Err(error) = fs::write(&self.path, &self.bytes) {
            eprintln!("{}: {}", self.path.display(), error);
        }
    }
}
