use super::device::{channel, Devices, Signals};
use super::event::{EventTable, Timers};
use super::program::{self, StoredProgram};
use super::storage::StoreText;
use super::{Address, Arena, Stack};
use crate::error;
use crate::lang::{
    Error, ErrorCode, LineNumber, LiveLine, Name, Number, Token, TokenSource, Word,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

type Result<T> = std::result::Result<T, Error>;

/// ## Machine configuration

#[derive(Debug, Clone)]
pub struct Config {
    /// Bytes in the arena shared by program and variables.
    pub memsize: usize,
    /// Integer semantics: no fractions in literals, `/` truncates.
    pub integer: bool,
    /// Lowest array subscript, 0 or 1.
    pub array_base: usize,
    pub stack_size: usize,
    pub loop_depth: usize,
    pub gosub_depth: usize,
    /// Capacity of strings created without `DIM`.
    pub string_size: usize,
    /// Elements of arrays created without `DIM`.
    pub array_size: usize,
    /// Console byte that stops a running program.
    pub break_char: Option<u8>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            memsize: 0x1_0000,
            integer: false,
            array_base: 1,
            stack_size: 32,
            loop_depth: 16,
            gosub_depth: 16,
            string_size: 32,
            array_size: 10,
            break_char: Some(b'#'),
        }
    }
}

/// Which text the cursor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// A typed line.
    Interactive,
    /// The program in the arena.
    Run,
    /// The program image in the persistent store.
    RunStore,
}

/// A cursor position, always the first byte of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub mode: Mode,
    pub at: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    For,
    While,
    Repeat,
}

#[derive(Debug, Clone, Copy)]
pub struct LoopFrame {
    pub kind: LoopKind,
    pub var: Name,
    pub resume: Location,
    pub limit: Number,
    pub step: Number,
}

#[derive(Debug, Clone, Copy)]
pub struct ReturnFrame {
    pub resume: Location,
    pub from_event: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Handler {
    Goto(LineNumber),
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum DataCursor {
    /// Looking for the next `DATA` from here.
    Search(Address),
    /// Inside a `DATA` statement.
    Inside(Address),
}

/// ## Events
///
/// Returned from `Runtime::execute` to tell the host what to do next.

#[derive(Debug, PartialEq)]
pub enum Event {
    /// Waiting for a line from `enter`.
    Stopped,
    /// Cycles ran out; call `execute` again.
    Running,
    /// The machine stopped on an error or a break.
    Errors(Error),
}

/// ## The interpreter
///
/// Owns the arena, the stacks, and the cursor. One statement runs per
/// cycle of `execute`, followed by a checkpoint where the host gets to
/// run and timers and events are dispatched.

pub struct Runtime {
    pub(crate) config: Config,
    pub(crate) arena: Arena,
    pub(crate) devices: Devices,
    pub(crate) signals: Arc<Signals>,
    pub(crate) mode: Mode,
    live: LiveLine,
    stored: StoredProgram,
    pub(crate) token: Token,
    token_at: Address,
    statement_at: Location,
    pub(crate) stack: Stack<Number>,
    pub(crate) loops: Stack<LoopFrame>,
    pub(crate) gosubs: Stack<ReturnFrame>,
    pub(crate) saved: Option<Location>,
    pub(crate) handler: Option<Handler>,
    pub(crate) last_error: u16,
    pub(crate) io_error: bool,
    pub(crate) timers: Timers,
    pub(crate) events: EventTable,
    pub(crate) data: DataCursor,
    pub(crate) input: u8,
    pub(crate) output: u8,
    pub(crate) width: usize,
    pub(crate) rng: StdRng,
    pub(crate) seed: Number,
    pub(crate) cont: Option<Location>,
    pub(crate) trace: bool,
    pub(crate) depth: usize,
    idle: bool,
    pending: Option<Error>,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new(Config::default(), Devices::default())
    }
}

impl Runtime {
    pub fn new(config: Config, devices: Devices) -> Runtime {
        let arena = Arena::new(config.memsize);
        let codec = arena.codec();
        Runtime {
            signals: devices.signals(),
            arena,
            devices,
            mode: Mode::Interactive,
            live: LiveLine::default(),
            stored: StoredProgram::new(codec),
            token: Token::Eol,
            token_at: 0,
            statement_at: Location {
                mode: Mode::Interactive,
                at: 0,
            },
            stack: Stack::new(config.stack_size, "EXPRESSION", ErrorCode::InternalError),
            loops: Stack::new(config.loop_depth, "LOOP", ErrorCode::NextWithoutFor),
            gosubs: Stack::new(config.gosub_depth, "GOSUB", ErrorCode::ReturnWithoutGosub),
            saved: None,
            handler: None,
            last_error: 0,
            io_error: false,
            timers: Timers::default(),
            events: EventTable::default(),
            data: DataCursor::Search(0),
            input: channel::CONSOLE,
            output: channel::CONSOLE,
            width: 0,
            rng: StdRng::seed_from_u64(0),
            seed: 0.0,
            cont: None,
            trace: false,
            depth: 0,
            idle: true,
            pending: None,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn signals(&self) -> Arc<Signals> {
        self.signals.clone()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Stores a numbered line, or prepares an unnumbered one to run.
    /// Returns whether the line is worth keeping in history.
    pub fn enter(&mut self, line: &str) -> bool {
        let mut lexer = LiveLine::new(line, !self.config.integer);
        let mut tokens = lexer.tokens();
        let number = match tokens.first() {
            None => return false,
            Some(Token::Number(n)) => *n,
            Some(_) => {
                self.live = LiveLine::new(line, !self.config.integer);
                self.mode = Mode::Interactive;
                self.idle = false;
                self.next_token();
                return true;
            }
        };
        tokens.remove(0);
        if number.fract() != 0.0 || number < 1.0 || number > LineNumber::max_value() as Number {
            self.pending = Some(error!(UndefinedLine));
            return true;
        }
        if let Err(error) = self.arena.store_line(number as LineNumber, &tokens) {
            self.pending = Some(error);
        }
        self.cont = None;
        self.data = DataCursor::Search(0);
        true
    }

    pub fn execute(&mut self, cycles: usize) -> Event {
        if let Some(error) = self.pending.take() {
            return Event::Errors(error);
        }
        if self.idle {
            return Event::Stopped;
        }
        for _ in 0..cycles {
            match self.step() {
                Ok(true) => {}
                Ok(false) => {
                    if self.mode != Mode::Interactive {
                        self.cont = None;
                    }
                    self.stop();
                    return Event::Stopped;
                }
                Err(error) => {
                    if let Some(event) = self.unwind(error) {
                        return event;
                    }
                }
            }
        }
        Event::Running
    }

    /// Starts the program in the persistent store if it is flagged to
    /// run at power on.
    pub fn autorun(&mut self) -> bool {
        if !self.store_autorun() {
            return false;
        }
        self.clear();
        self.idle = false;
        self.jump(Location {
            mode: Mode::RunStore,
            at: 0,
        });
        true
    }

    fn step(&mut self) -> Result<bool> {
        loop {
            match self.token {
                Token::Char(b':') => self.next_token(),
                Token::LineNumber(n) => {
                    if self.trace {
                        self.print_str(&format!("[{}]", n));
                    }
                    self.next_token()
                }
                Token::Eol => return Ok(false),
                _ => break,
            }
        }
        self.statement_at = self.location();
        self.statement()?;
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        self.checkpoint()?;
        Ok(true)
    }

    /// Runs after every statement.
    fn checkpoint(&mut self) -> Result<()> {
        self.devices.yield_now();
        if self.break_requested() {
            return Err(error!(Break));
        }
        if self.mode != Mode::Interactive && self.token.is_terminator() && self.token != Token::Eol
        {
            self.dispatch()?;
        }
        Ok(())
    }

    pub(crate) fn break_requested(&mut self) -> bool {
        if self.signals.take_interrupt() {
            return true;
        }
        if let Some(c) = self.config.break_char {
            if self.devices.peek(channel::CONSOLE) == Some(c) {
                self.devices.read(channel::CONSOLE);
                return true;
            }
        }
        false
    }

    /// Decides what an error does to the running program. `None` means
    /// a handler took it and execution goes on.
    fn unwind(&mut self, error: Error) -> Option<Event> {
        let running = self.mode != Mode::Interactive;
        let line = if running {
            self.line_of(self.statement_at)
        } else {
            None
        };
        let report = |e: Error| match line {
            Some(n) if e.is_direct() => e.in_line_number(n),
            _ => e,
        };
        if error.is(ErrorCode::Break) {
            if running {
                self.cont = Some(if self.token.is_terminator() {
                    self.location()
                } else {
                    self.statement_at
                });
            }
            self.stack.clear();
            self.depth = 0;
            self.stop();
            return Some(Event::Errors(report(error)));
        }
        self.stack.clear();
        self.loops.clear();
        self.gosubs.clear();
        self.timers.reset();
        self.saved = None;
        self.depth = 0;
        if running {
            match self.handler {
                Some(Handler::Goto(target)) => {
                    self.last_error = error.code();
                    self.handler = None;
                    match self.goto_line(target) {
                        Ok(()) => return None,
                        Err(e) => {
                            self.cont = None;
                            self.stop();
                            return Some(Event::Errors(report(e)));
                        }
                    }
                }
                Some(Handler::Continue) => {
                    self.last_error = error.code();
                    self.jump(self.statement_at);
                    while !self.token.is_terminator() {
                        self.next_token();
                    }
                    return None;
                }
                None => {}
            }
        }
        if running {
            self.cont = None;
        }
        self.stop();
        Some(Event::Errors(report(error)))
    }

    /// Back to waiting for a typed line.
    pub(crate) fn stop(&mut self) {
        self.halt();
        self.idle = true;
        self.input = channel::CONSOLE;
        self.output = channel::CONSOLE;
        self.width = 0;
    }

    /// Ends the current statement sequence without going idle yet.
    pub(crate) fn halt(&mut self) {
        self.mode = Mode::Interactive;
        self.live = LiveLine::default();
        self.token = Token::Eol;
    }

    /// Variables, stacks, data pointer, timers, events and handlers.
    pub(crate) fn clear(&mut self) {
        self.arena.clear_heap();
        self.stack.clear();
        self.loops.clear();
        self.gosubs.clear();
        self.saved = None;
        self.handler = None;
        self.last_error = 0;
        self.io_error = false;
        self.timers.reset();
        self.events.clear();
        self.data = DataCursor::Search(0);
    }

    pub(crate) fn next_token(&mut self) {
        match self.mode {
            Mode::Interactive => {
                self.token_at = self.live.position();
                let empty: &[u8] = &[];
                self.token = self.live.next_token(&empty);
            }
            Mode::Run => {
                self.token_at = self.stored.position();
                let text = self.arena.program();
                self.token = self.stored.next_token(&text);
            }
            Mode::RunStore => {
                self.token_at = self.stored.position();
                let codec = self.arena.codec();
                self.token = match self.devices.store_ref().and_then(|s| StoreText::new(s, codec)) {
                    Some(text) => self.stored.next_token(&text),
                    None => Token::Eol,
                };
            }
        }
    }

    /// Where the current token starts.
    pub(crate) fn location(&self) -> Location {
        Location {
            mode: self.mode,
            at: self.token_at,
        }
    }

    /// Moves the cursor and reads the token there.
    pub(crate) fn jump(&mut self, location: Location) {
        self.mode = location.mode;
        match location.mode {
            Mode::Interactive => self.live.seek(location.at),
            _ => self.stored.seek(location.at),
        }
        self.next_token();
    }

    pub(crate) fn find_line(&mut self, line: LineNumber) -> Result<Location> {
        let codec = self.arena.codec();
        let found = if self.mode == Mode::RunStore {
            self.devices
                .store_ref()
                .and_then(|s| StoreText::new(s, codec))
                .and_then(|text| program::find_line(text, codec, line))
                .map(|at| Location {
                    mode: Mode::RunStore,
                    at,
                })
        } else {
            self.arena.find_line(line).map(|at| Location {
                mode: Mode::Run,
                at,
            })
        };
        found.ok_or_else(|| error!(UndefinedLine))
    }

    pub(crate) fn goto_line(&mut self, line: LineNumber) -> Result<()> {
        let location = self.find_line(line)?;
        self.jump(location);
        Ok(())
    }

    pub(crate) fn goto_number(&mut self, n: Number) -> Result<()> {
        self.goto_line(line_number(n)?)
    }

    /// Line number holding a location, for error reports.
    pub(crate) fn line_of(&self, location: Location) -> Option<LineNumber> {
        let codec = self.arena.codec();
        match location.mode {
            Mode::Interactive => None,
            Mode::Run => program::line_of(self.arena.program(), codec, location.at),
            Mode::RunStore => {
                let text = StoreText::new(self.devices.store_ref()?, codec)?;
                program::line_of(text, codec, location.at)
            }
        }
    }

    /// End of a statement: a terminator, or an `ELSE` ending the
    /// statement after `THEN`.
    pub(crate) fn at_end(&self) -> bool {
        self.token.is_terminator() || self.token.is_word(Word::Else)
    }

    pub(crate) fn expect_char(&mut self, ch: u8) -> Result<()> {
        if self.token.is_char(ch) {
            self.next_token();
            Ok(())
        } else {
            Err(error!(SyntaxError))
        }
    }

    pub(crate) fn push(&mut self, n: Number) -> Result<()> {
        self.stack.push(n)
    }

    pub(crate) fn pop(&mut self) -> Result<Number> {
        self.stack.pop()
    }

    /// Evaluates one expression and takes its value off the stack.
    pub(crate) fn value(&mut self) -> Result<Number> {
        self.expression()?;
        self.pop()
    }

    pub(crate) fn out_byte(&mut self, byte: u8) {
        if !self.devices.write(self.output, byte) {
            self.io_error = true;
        }
        self.devices.yield_now();
    }

    pub(crate) fn print_bytes(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.out_byte(*b);
        }
    }

    pub(crate) fn print_str(&mut self, s: &str) {
        self.print_bytes(s.as_bytes())
    }

    /// Waits for one byte on the input channel. `None` when the channel
    /// can never deliver one.
    pub(crate) fn read_byte(&mut self) -> Result<Option<u8>> {
        loop {
            if let Some(b) = self.devices.read(self.input) {
                return Ok(Some(b));
            }
            if !self.devices.is_open(self.input) {
                return Ok(None);
            }
            self.devices.yield_now();
            if self.signals.take_interrupt() {
                return Err(error!(Break));
            }
        }
    }

    /// Reads up to a newline. Sets the status flag when input ends first.
    pub(crate) fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = vec![];
        loop {
            match self.read_byte()? {
                Some(b'\n') => return Ok(line),
                Some(b'\r') => {}
                Some(b) => line.push(b),
                None => {
                    if line.is_empty() {
                        self.io_error = true;
                    }
                    return Ok(line);
                }
            }
        }
    }
}

/// Checks a computed line number.
pub(crate) fn line_number(n: Number) -> Result<LineNumber> {
    if n.fract() != 0.0 || n < 1.0 || n > LineNumber::max_value() as Number {
        return Err(error!(UndefinedLine));
    }
    Ok(n as LineNumber)
}
