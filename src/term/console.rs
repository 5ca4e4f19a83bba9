use basic::mach::device::Stream;
use basic::mach::Signals;
use linefeed::{DefaultTerminal, Interface, ReadResult, Signal};
use std::collections::VecDeque;
use std::sync::Arc;

/// The terminal as channel 1. Output is held until a newline so an
/// unfinished line can become the prompt of the next read.
pub struct Console {
    interface: Arc<Interface<DefaultTerminal>>,
    signals: Arc<Signals>,
    input: VecDeque<u8>,
    output: Vec<u8>,
    open: bool,
}

impl Console {
    pub fn new(interface: Arc<Interface<DefaultTerminal>>, signals: Arc<Signals>) -> Console {
        interface.set_report_signal(Signal::Interrupt, true);
        Console {
            interface,
            signals,
            input: VecDeque::new(),
            output: vec![],
            open: true,
        }
    }

    fn flush(&mut self) {
        if self.output.is_empty() {
            return;
        }
        let s = String::from_utf8_lossy(&self.output).into_owned();
        self.output.clear();
        if self.interface.write_fmt(format_args!("{}", s)).is_err() {
            self.open = false;
        }
    }

    fn fill(&mut self) {
        let prompt = String::from_utf8_lossy(&self.output).into_owned();
        self.output.clear();
        if self.interface.set_prompt(&prompt).is_err() {
            self.open = false;
            return;
        }
        let result = self.interface.read_line();
        let _ = self.interface.set_prompt("");
        match result {
            Ok(ReadResult::Input(line)) => {
                self.input.extend(line.bytes());
                self.input.push_back(b'\n');
            }
            Ok(ReadResult::Signal(Signal::Interrupt)) => {
                let _ = self.interface.set_buffer("");
                self.signals.interrupt();
            }
            Ok(ReadResult::Signal(_)) | Ok(ReadResult::Eof) | Err(_) => self.open = false,
        }
    }
}

impl Stream for Console {
    fn read_byte(&mut self) -> Option<u8> {
        if self.input.is_empty() && self.open {
            self.fill();
        }
        self.input.pop_front()
    }

    fn write_byte(&mut self, byte: u8) -> bool {
        self.output.push(byte);
        if byte == b'\n' {
            self.flush();
        }
        self.open
    }

    fn available(&mut self) -> usize {
        self.input.len()
    }

    /// Never waits. Runs at every statement, so held output goes out here.
    fn peek_byte(&mut self) -> Option<u8> {
        self.flush();
        self.input.front().copied()
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
