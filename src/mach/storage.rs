use super::device::{channel, ByteStore};
use super::listing::Listing;
use super::runtime::{DataCursor, Location, Mode};
use super::{Address, Arena, Codec, Runtime};
use crate::error;
use crate::lang::{Error, LineNumber, LiveLine, ProgramText, Token};

type Result<T> = std::result::Result<T, Error>;

/// ## Persistent program image
///
/// The store begins with a header: one flag byte, the program length
/// as an address, and a CRC-16/X25 of the program bytes, little endian.
/// The program bytes follow, encoded exactly as in the arena.

const FLAG_PROGRAM: u8 = 0;
const FLAG_AUTORUN: u8 = 1;
const FLAG_EMPTY: u8 = 0xFF;

fn header_len(codec: Codec) -> usize {
    1 + codec.addr_size() + 2
}

/// Program bytes in a store, read in place.
#[derive(Clone, Copy)]
pub(crate) struct StoreText<'a> {
    store: &'a dyn ByteStore,
    base: Address,
    len: usize,
}

impl<'a> StoreText<'a> {
    /// `None` when the store holds no program.
    pub(crate) fn new(store: &'a dyn ByteStore, codec: Codec) -> Option<StoreText<'a>> {
        let base = header_len(codec);
        if store.len() < base || store.read(0) == FLAG_EMPTY {
            return None;
        }
        let mut raw = [0u8; 4];
        for (k, b) in raw.iter_mut().take(codec.addr_size()).enumerate() {
            *b = store.read(1 + k);
        }
        let len = codec.address(&raw);
        if base + len > store.len() {
            return None;
        }
        Some(StoreText { store, base, len })
    }

    fn flag(&self) -> u8 {
        self.store.read(0)
    }

    fn stored_crc(&self) -> u16 {
        let at = self.base - 2;
        u16::from_le_bytes([self.store.read(at), self.store.read(at + 1)])
    }

    fn bytes(&self) -> Vec<u8> {
        (0..self.len).map(|i| self.store.read(self.base + i)).collect()
    }

    fn is_valid(&self) -> bool {
        crc::crc16::checksum_x25(&self.bytes()) == self.stored_crc()
    }
}

impl<'a> ProgramText for StoreText<'a> {
    fn len(&self) -> usize {
        self.len
    }
    fn byte(&self, at: usize) -> u8 {
        if at < self.len {
            self.store.read(self.base + at)
        } else {
            0
        }
    }
}

fn write_image(store: &mut dyn ByteStore, codec: Codec, flag: u8, program: &[u8]) -> Result<()> {
    let base = header_len(codec);
    if base + program.len() > store.len() {
        return Err(error!(StoreError; "PROGRAM TOO BIG"));
    }
    let mut header = vec![0u8; base];
    header[0] = flag;
    codec.put_address(&mut header[1..], program.len());
    let crc = crc::crc16::checksum_x25(program).to_le_bytes();
    header[base - 2] = crc[0];
    header[base - 1] = crc[1];
    for (i, b) in header.iter().chain(program.iter()).enumerate() {
        store.write(i, *b);
    }
    store.commit();
    Ok(())
}

impl Arena {
    /// Replaces the program with already encoded bytes.
    pub(crate) fn load_image(&mut self, image: &[u8]) -> Result<()> {
        if image.len() > self.himem {
            return Err(error!(OutOfMemory));
        }
        self.clear_program();
        self.bytes[..image.len()].copy_from_slice(image);
        self.top = image.len();
        Ok(())
    }
}

/// ## Storage statements

impl Runtime {
    /// Whether the store holds a sound program flagged to run at power on.
    pub(crate) fn store_autorun(&self) -> bool {
        let codec = self.arena.codec();
        match self.devices.store_ref().and_then(|s| StoreText::new(s, codec)) {
            Some(text) => text.flag() == FLAG_AUTORUN && text.is_valid(),
            None => false,
        }
    }

    fn file_name(&mut self) -> Result<String> {
        let name = self.text().map_err(|_| error!(SyntaxError))?;
        Ok(String::from_utf8_lossy(&name).into_owned())
    }

    /// `SET 1, flag` marks the stored program to run at power on.
    pub(crate) fn r#set(&mut self) -> Result<()> {
        self.next_token();
        let what = self.value()?;
        self.expect_char(b',')?;
        let value = self.value()?;
        if what != 1.0 {
            return Err(error!(IllegalFunctionCall));
        }
        let codec = self.arena.codec();
        let store = match self.devices.store_mut() {
            Some(store) => store,
            None => return Err(error!(StoreError; "NO STORE")),
        };
        if store.len() < header_len(codec) || store.read(0) == FLAG_EMPTY {
            return Err(error!(StoreError; "NO PROGRAM"));
        }
        store.write(0, if value != 0.0 { FLAG_AUTORUN } else { FLAG_PROGRAM });
        store.commit();
        Ok(())
    }

    /// `SAVE "!"` writes the program image to the store, `SAVE "name"`
    /// writes a listing to a file.
    pub(crate) fn r#save(&mut self) -> Result<()> {
        self.next_token();
        let name = self.file_name()?;
        if name == "!" {
            let codec = self.arena.codec();
            let store = match self.devices.store_mut() {
                Some(store) => store,
                None => return Err(error!(StoreError; "NO STORE")),
            };
            let flag = match store.read(0) {
                FLAG_AUTORUN => FLAG_AUTORUN,
                _ => FLAG_PROGRAM,
            };
            return write_image(store, codec, flag, self.arena.program());
        }
        let listing = Listing::new(self.arena.codec()).lines(self.arena.program(), 0..=LineNumber::max_value());
        let files = match self.devices.files_mut() {
            Some(files) => files,
            None => return Err(error!(BadFileNumber)),
        };
        if !files.open_write(&name, false) {
            return Err(error!(DiskIoError));
        }
        let mut ok = true;
        for line in listing {
            for b in line.bytes().chain(std::iter::once(b'\n')) {
                ok &= files.write_byte(b);
            }
        }
        files.close_write();
        if ok {
            Ok(())
        } else {
            Err(error!(DiskIoError))
        }
    }

    /// Replaces the program from the store or a file.
    pub(crate) fn load_program(&mut self, name: &str) -> Result<()> {
        if name == "!" {
            let codec = self.arena.codec();
            let image = match self.devices.store_ref() {
                None => return Err(error!(StoreError; "NO STORE")),
                Some(store) => match StoreText::new(store, codec) {
                    None => return Err(error!(StoreError; "NO PROGRAM")),
                    Some(text) if !text.is_valid() => return Err(error!(StoreError; "CHECKSUM")),
                    Some(text) => text.bytes(),
                },
            };
            return self.arena.load_image(&image);
        }
        let files = match self.devices.files_mut() {
            Some(files) => files,
            None => return Err(error!(BadFileNumber)),
        };
        if !files.open_read(name) {
            return Err(error!(FileNotFound));
        }
        let mut text = vec![];
        while let Some(b) = files.read_byte() {
            text.push(b);
        }
        files.close_read();
        self.arena.clear_program();
        let float = !self.config.integer;
        for line in String::from_utf8_lossy(&text).lines() {
            let mut tokens = LiveLine::new(line, float).tokens();
            if tokens.is_empty() {
                continue;
            }
            let number = match tokens.remove(0) {
                Token::Number(n) => super::runtime::line_number(n)?,
                _ => return Err(error!(SyntaxError; "DIRECT STATEMENT IN FILE")),
            };
            self.arena.store_line(number, &tokens)?;
        }
        Ok(())
    }

    /// `LOAD name`. In a running program the new one starts at its
    /// first line with the variables kept.
    pub(crate) fn r#load(&mut self) -> Result<()> {
        self.next_token();
        let name = self.file_name()?;
        let chain = self.mode != Mode::Interactive;
        self.load_program(&name)?;
        self.cont = None;
        self.data = DataCursor::Search(0);
        if chain {
            self.stack.clear();
            self.loops.clear();
            self.gosubs.clear();
            self.saved = None;
            self.jump(Location {
                mode: Mode::Run,
                at: 0,
            });
        }
        Ok(())
    }

    /// `CATALOG [prefix]` lists regular files.
    pub(crate) fn r#catalog(&mut self) -> Result<()> {
        self.next_token();
        let prefix = if self.at_end() {
            String::new()
        } else {
            self.file_name()?
        };
        let entries = match self.devices.files_mut() {
            Some(files) => files.catalog(),
            None => return Err(error!(BadFileNumber)),
        };
        for entry in entries.iter().filter(|e| e.name.starts_with(&prefix)) {
            let line = if entry.regular {
                format!("{} {}\n", entry.name, entry.size)
            } else {
                format!("{}/\n", entry.name)
            };
            self.print_str(&line);
        }
        Ok(())
    }

    pub(crate) fn r#delete(&mut self) -> Result<()> {
        self.next_token();
        let name = self.file_name()?;
        match self.devices.files_mut().map(|files| files.delete(&name)) {
            Some(true) => Ok(()),
            Some(false) => Err(error!(FileNotFound)),
            None => Err(error!(BadFileNumber)),
        }
    }

    /// `OPEN name[, mode]`: 0 read, 1 write, 2 append. A file that can't
    /// be opened sets `@S` instead of stopping the program.
    pub(crate) fn r#open(&mut self) -> Result<()> {
        self.next_token();
        let name = self.file_name()?;
        let mode = if self.token.is_char(b',') {
            self.next_token();
            self.value()?
        } else {
            0.0
        };
        let files = match self.devices.files_mut() {
            Some(files) => files,
            None => return Err(error!(BadFileNumber)),
        };
        let opened = match mode as i32 {
            0 => files.open_read(&name),
            1 => files.open_write(&name, false),
            2 => files.open_write(&name, true),
            _ => return Err(error!(IllegalFunctionCall)),
        };
        self.io_error = !opened;
        Ok(())
    }

    /// `CLOSE [mode]` closes the read side (0) or the write side (1 or 2),
    /// both when no mode is given.
    pub(crate) fn r#close(&mut self) -> Result<()> {
        self.next_token();
        let mode = if self.at_end() {
            None
        } else {
            Some(self.value()?)
        };
        let files = match self.devices.files_mut() {
            Some(files) => files,
            None => return Err(error!(BadFileNumber)),
        };
        match mode.map(|m| m as i32) {
            None => {
                files.close_read();
                files.close_write();
            }
            Some(0) => files.close_read(),
            Some(1) | Some(2) => files.close_write(),
            Some(_) => return Err(error!(IllegalFunctionCall)),
        }
        if self.input == channel::FILE {
            self.input = channel::CONSOLE;
        }
        if self.output == channel::FILE {
            self.output = channel::CONSOLE;
        }
        Ok(())
    }

    /// `FDISK` formats the file system.
    pub(crate) fn r#fdisk(&mut self) -> Result<()> {
        self.next_token();
        match self.devices.files_mut().map(|files| files.format()) {
            Some(true) => Ok(()),
            Some(false) => Err(error!(DiskIoError)),
            None => Err(error!(BadFileNumber)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mach::MemoryStore;

    fn program() -> Arena {
        let mut arena = Arena::new(256);
        arena
            .store_line(10, &LiveLine::new("PRINT 1", true).tokens())
            .unwrap();
        arena
            .store_line(20, &LiveLine::new("GOTO 10", true).tokens())
            .unwrap();
        arena
    }

    #[test]
    fn test_image_round_trip() {
        let arena = program();
        let codec = arena.codec();
        let mut store = MemoryStore::new(128);
        assert!(StoreText::new(&store, codec).is_none());
        write_image(&mut store, codec, FLAG_PROGRAM, arena.program()).unwrap();
        let text = StoreText::new(&store, codec).unwrap();
        assert!(text.is_valid());
        assert_eq!(text.bytes(), arena.program());
        assert_eq!(
            crate::mach::program::find_line(text, codec, 20),
            crate::mach::program::find_line(arena.program(), codec, 20)
        );
    }

    #[test]
    fn test_corrupt_image() {
        let arena = program();
        let codec = arena.codec();
        let mut store = MemoryStore::new(128);
        write_image(&mut store, codec, FLAG_AUTORUN, arena.program()).unwrap();
        let last = header_len(codec) + arena.program().len() - 1;
        store.write(last, store.read(last) ^ 0x55);
        assert!(!StoreText::new(&store, codec).unwrap().is_valid());
    }

    #[test]
    fn test_image_too_big() {
        let arena = program();
        let mut store = MemoryStore::new(8);
        assert!(write_image(&mut store, arena.codec(), FLAG_PROGRAM, arena.program()).is_err());
    }
}
