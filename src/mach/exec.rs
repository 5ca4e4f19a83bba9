use super::device::channel;
use super::eval::{buffer_name, parse_number};
use super::listing::Listing;
use super::program::StoredProgram;
use super::runtime::{line_number, DataCursor};
use super::storage::StoreText;
use super::var::{channel_number, Target};
use super::{Address, Codec, Kind, Mode, Runtime};
use crate::error;
use crate::lang::{
    format_number, Error, LineNumber, Number, Operator, ProgramText, Token, TokenSource, Word,
};
use std::collections::VecDeque;

type Result<T> = std::result::Result<T, Error>;

/// A value from a `DATA` statement.
#[derive(Debug, PartialEq)]
enum Datum {
    Number(Number),
    Text(Vec<u8>),
}

/// ## Statements
///
/// On entry the cursor is on the statement's first token. On exit it is
/// on the token ending the statement, or wherever a jump put it.

impl Runtime {
    pub(crate) fn statement(&mut self) -> Result<()> {
        use Word::*;
        let word = match self.token {
            Token::Word(word) => word,
            Token::Var(_) | Token::ArrayVar(_) | Token::StrVar(_) => return self.assignment(),
            Token::Char(b'?') => return self.r#print(),
            _ => return Err(error!(SyntaxError)),
        };
        match word {
            Print => self.r#print(),
            Let => {
                self.next_token();
                self.assignment()
            }
            Input => self.r#input(),
            Get => self.r#get(),
            Put => self.r#put(),
            Goto => self.goto(false),
            Gosub => self.goto(true),
            Return => self.r#return(),
            If => self.r#if(),
            Else => self.r#else(),
            On => self.r#on(),
            For => self.r#for(),
            Next => self.r#next(),
            Break => self.r#break(),
            Cont => self.r#cont(),
            While => self.r#while(),
            Wend => self.r#wend(),
            Repeat => self.r#repeat(),
            Until => self.r#until(),
            Switch => self.r#switch(),
            Case => self.r#case(),
            Swend | Do | Dend => {
                self.next_token();
                Ok(())
            }
            Data => {
                while !self.token.is_terminator() {
                    self.next_token();
                }
                Ok(())
            }
            Read => self.r#read(),
            Restore => self.r#restore(),
            Def => self.r#def(),
            Dim => self.r#dim(),
            Clr => self.r#clr(),
            New => self.r#new_program(),
            Run => self.r#run(),
            End | Stop => self.r#end(),
            Rem => {
                while !matches!(self.token, Token::Eol | Token::LineNumber(_)) {
                    self.next_token();
                }
                Ok(())
            }
            List => self.r#list(),
            Poke => self.r#poke(),
            Tab => {
                self.next_token();
                let n = self.value()?;
                self.tab(n);
                Ok(())
            }
            Cls => {
                self.next_token();
                self.out_byte(12);
                Ok(())
            }
            Delay => self.r#delay(),
            Tron | Troff => {
                self.next_token();
                self.trace = word == Tron;
                Ok(())
            }
            Set => self.r#set(),
            Error => self.r#error_handler(),
            After => self.timer(false),
            Every => self.timer(true),
            Event => self.r#event(),
            Save => self.r#save(),
            Load => self.r#load(),
            Catalog => self.r#catalog(),
            Delete => self.r#delete(),
            Open => self.r#open(),
            Close => self.r#close(),
            Fdisk => self.r#fdisk(),
            _ => Err(error!(SyntaxError)),
        }
    }

    fn assignment(&mut self) -> Result<()> {
        let target = self.target()?;
        if self.token != Token::Operator(Operator::Equal) {
            return Err(error!(SyntaxError));
        }
        self.next_token();
        match target {
            Target::Text(..) => {
                let s = self.concatenation()?;
                self.assign_text(target, &s)
            }
            _ => {
                let n = self.value()?;
                self.assign_number(target, n)
            }
        }
    }

    /// An optional `&channel,` in front of an I/O statement's items.
    fn channel_prefix(&mut self) -> Result<Option<u8>> {
        if !self.token.is_char(b'&') {
            return Ok(None);
        }
        self.next_token();
        let ch = channel_number(self.value()?)?;
        if !self.devices.has(ch) {
            return Err(error!(BadFileNumber));
        }
        if self.token.is_char(b',') {
            self.next_token();
        }
        Ok(Some(ch))
    }

    fn tab(&mut self, n: Number) {
        for _ in 0..(n.max(0.0) as usize) {
            self.out_byte(b' ');
        }
    }

    fn r#print(&mut self) -> Result<()> {
        self.next_token();
        let output = self.output;
        let result = self.print_items();
        self.output = output;
        self.width = 0;
        result
    }

    fn print_items(&mut self) -> Result<()> {
        let mut newline = true;
        while !self.at_end() {
            match self.token {
                Token::Char(b'&') => {
                    if let Some(ch) = self.channel_prefix()? {
                        self.output = ch;
                    }
                    continue;
                }
                Token::Char(b'#') => {
                    self.next_token();
                    self.width = self.value()?.max(0.0) as usize;
                    if self.token.is_char(b',') {
                        self.next_token();
                    }
                    continue;
                }
                Token::Word(Word::Tab) => {
                    self.next_token();
                    let n = self.value()?;
                    self.tab(n);
                }
                _ => match self.string_value()? {
                    Some(s) => self.print_bytes(&s),
                    None => {
                        let n = self.value()?;
                        let s = format_number(n);
                        for _ in s.len()..self.width {
                            self.out_byte(b' ');
                        }
                        self.print_str(&s);
                    }
                },
            }
            newline = true;
            if self.token.is_char(b',') {
                self.out_byte(b' ');
                newline = false;
                self.next_token();
            } else if self.token.is_char(b';') {
                newline = false;
                self.next_token();
            } else if !self.at_end() {
                return Err(error!(SyntaxError));
            }
        }
        if newline {
            self.out_byte(b'\n');
        }
        Ok(())
    }

    fn r#input(&mut self) -> Result<()> {
        self.next_token();
        let input = self.input;
        if let Some(ch) = self.channel_prefix()? {
            self.input = ch;
        }
        let result = self.input_items();
        self.input = input;
        result
    }

    fn input_items(&mut self) -> Result<()> {
        let mut pending: VecDeque<Vec<u8>> = VecDeque::new();
        loop {
            let mut prompted = false;
            if let Token::String(ref s) = self.token {
                let s = s.clone();
                self.print_bytes(&s);
                self.next_token();
                if self.token.is_char(b',') || self.token.is_char(b';') {
                    self.next_token();
                }
                prompted = true;
            }
            let target = self.target()?;
            let fresh = pending.is_empty();
            if fresh {
                if !prompted && self.input == channel::CONSOLE {
                    self.print_str("? ");
                }
                let line = self.read_line()?;
                pending = line.split(|b| *b == b',').map(|p| p.to_vec()).collect();
                if let Target::Text(..) = target {
                    pending = VecDeque::from(vec![line]);
                }
            }
            let item = pending.pop_front().unwrap_or_default();
            match target {
                Target::Text(..) => self.assign_text(target, &item)?,
                _ => {
                    let n = match parse_number(&item, self.config.integer) {
                        Some(n) => n,
                        None => {
                            self.io_error = true;
                            0.0
                        }
                    };
                    self.assign_number(target, n)?;
                }
            }
            if !self.token.is_char(b',') {
                return Ok(());
            }
            self.next_token();
        }
    }

    /// `GET [&ch,] target` takes a byte if one is waiting.
    fn r#get(&mut self) -> Result<()> {
        self.next_token();
        let input = self.input;
        if let Some(ch) = self.channel_prefix()? {
            self.input = ch;
        }
        let result = self.target().and_then(|target| {
            let byte = if self.devices.available(self.input) > 0 {
                self.devices.read(self.input)
            } else {
                None
            };
            match target {
                Target::Text(..) => {
                    let s: Vec<u8> = byte.into_iter().collect();
                    self.assign_text(target, &s)
                }
                _ => self.assign_number(target, byte.map_or(0.0, Number::from)),
            }
        });
        self.input = input;
        result
    }

    /// `PUT [&ch,] item, ...` writes raw bytes.
    fn r#put(&mut self) -> Result<()> {
        self.next_token();
        let output = self.output;
        if let Some(ch) = self.channel_prefix()? {
            self.output = ch;
        }
        let result = self.put_items();
        self.output = output;
        result
    }

    fn put_items(&mut self) -> Result<()> {
        loop {
            match self.string_value()? {
                Some(s) => self.print_bytes(&s),
                None => {
                    let n = self.value()?;
                    if n < 0.0 || n > 255.0 {
                        return Err(error!(IllegalFunctionCall));
                    }
                    self.out_byte(n as u8);
                }
            }
            if !self.token.is_char(b',') {
                return Ok(());
            }
            self.next_token();
        }
    }

    fn r#read(&mut self) -> Result<()> {
        self.next_token();
        loop {
            let target = self.target()?;
            match (self.next_data()?, target) {
                (Datum::Number(n), Target::Text(..)) => {
                    self.assign_text(target, format_number(n).as_bytes())?
                }
                (Datum::Number(n), _) => self.assign_number(target, n)?,
                (Datum::Text(s), Target::Text(..)) => self.assign_text(target, &s)?,
                (Datum::Text(_), _) => return Err(error!(TypeMismatch)),
            }
            if !self.token.is_char(b',') {
                return Ok(());
            }
            self.next_token();
        }
    }

    fn next_data(&mut self) -> Result<Datum> {
        let codec = self.arena.codec();
        let (datum, at) = if self.mode == Mode::RunStore {
            let text = self
                .devices
                .store_ref()
                .and_then(|s| StoreText::new(s, codec))
                .ok_or_else(|| error!(OutOfData))?;
            scan_data(text, codec, self.data)?
        } else {
            scan_data(self.arena.program(), codec, self.data)?
        };
        self.data = DataCursor::Inside(at);
        Ok(datum)
    }

    fn r#restore(&mut self) -> Result<()> {
        self.next_token();
        if self.at_end() {
            self.data = DataCursor::Search(0);
            return Ok(());
        }
        let line = line_number(self.value()?)?;
        let location = self.find_line(line)?;
        self.data = DataCursor::Search(location.at);
        Ok(())
    }

    /// `DEF FN name(param) = expr` records where the expression starts.
    fn r#def(&mut self) -> Result<()> {
        if self.mode == Mode::Interactive {
            return Err(error!(IllegalDirect));
        }
        self.next_token();
        if !self.token.is_word(Word::Fn) {
            return Err(error!(SyntaxError));
        }
        self.next_token();
        let name = match self.token {
            Token::ArrayVar(name) | Token::Var(name) => name,
            _ => return Err(error!(SyntaxError)),
        };
        self.next_token();
        let mut param = [0, 0];
        if self.token.is_char(b'(') {
            self.next_token();
            if let Token::Var(p) = self.token {
                param = p;
                self.next_token();
            }
            self.expect_char(b')')?;
        }
        if self.token != Token::Operator(Operator::Equal) {
            return Err(error!(SyntaxError));
        }
        let entry = self.location().at;
        let at = match self.arena.find(Kind::Function, name) {
            Some(found) => found.at,
            None => self.arena.allocate(Kind::Function, name, 0)?,
        };
        let addr = self.arena.codec().addr_size();
        self.arena.set_address_at(at, entry);
        self.arena.bytes[at + addr] = param[0];
        self.arena.bytes[at + addr + 1] = param[1];
        while !self.token.is_terminator() {
            self.next_token();
        }
        Ok(())
    }

    fn r#dim(&mut self) -> Result<()> {
        self.next_token();
        loop {
            match self.token {
                Token::ArrayVar(name) => {
                    self.next_token();
                    let (i, j) = self.subscripts()?;
                    let rows = self.dim_count(i)?;
                    let cols = match j {
                        Some(j) => self.dim_count(j)?,
                        None => 1,
                    };
                    self.create_array(name, rows, cols)?;
                }
                Token::StrVar(name) => {
                    self.next_token();
                    self.expect_char(b'(')?;
                    let dim = self.value()?;
                    if !(dim >= 1.0) || dim > 255.0 {
                        return Err(error!(StringTooLong));
                    }
                    let count = if self.token.is_char(b',') {
                        self.next_token();
                        let n = self.value()?;
                        self.dim_count(n)?
                    } else {
                        1
                    };
                    self.expect_char(b')')?;
                    self.create_string(name, dim as usize, count)?;
                }
                _ => return Err(error!(SyntaxError)),
            }
            if !self.token.is_char(b',') {
                return Ok(());
            }
            self.next_token();
        }
    }

    /// `CLR` alone clears all variables and stacks. With an argument it
    /// drops one object, one stack or one timer.
    fn r#clr(&mut self) -> Result<()> {
        self.next_token();
        if self.at_end() {
            self.clear();
            return Ok(());
        }
        let (kind, name) = match self.token {
            Token::Word(Word::Gosub) => {
                self.next_token();
                self.gosubs.clear();
                return Ok(());
            }
            Token::Word(Word::For) => {
                self.next_token();
                self.loops.clear();
                return Ok(());
            }
            Token::Word(word @ Word::After) | Token::Word(word @ Word::Every) => {
                self.next_token();
                self.clear_timer(word == Word::Every);
                return Ok(());
            }
            Token::Var(name) => {
                self.next_token();
                (Kind::Scalar, name)
            }
            Token::StrVar(name) => {
                self.next_token();
                (Kind::String, name)
            }
            Token::ArrayVar(name) => {
                self.next_token();
                self.expect_char(b'(')?;
                self.expect_char(b')')?;
                (Kind::Array, name)
            }
            Token::Word(Word::Fn) => {
                self.next_token();
                match self.token {
                    Token::Var(name) | Token::ArrayVar(name) => {
                        self.next_token();
                        (Kind::Function, name)
                    }
                    _ => return Err(error!(SyntaxError)),
                }
            }
            _ => (Kind::Buffer, buffer_name(self.value()?)?),
        };
        self.arena.delete(kind, name);
        Ok(())
    }

    fn r#new_program(&mut self) -> Result<()> {
        self.arena.clear_program();
        self.clear();
        self.cont = None;
        self.halt();
        Ok(())
    }

    fn r#list(&mut self) -> Result<()> {
        self.next_token();
        let mut from: LineNumber = 0;
        let mut to = LineNumber::max_value();
        if !self.at_end() {
            if !self.token.is_char(b',') {
                from = line_number(self.value()?)?;
                to = from;
            }
            if self.token.is_char(b',') {
                self.next_token();
                to = if self.at_end() {
                    LineNumber::max_value()
                } else {
                    line_number(self.value()?)?
                };
            }
        }
        let codec = self.arena.codec();
        let lines = if self.mode == Mode::RunStore {
            match self.devices.store_ref().and_then(|s| StoreText::new(s, codec)) {
                Some(text) => Listing::new(codec).lines(text, from..=to),
                None => vec![],
            }
        } else {
            Listing::new(codec).lines(self.arena.program(), from..=to)
        };
        for line in lines {
            self.print_str(&line);
            self.out_byte(b'\n');
            if self.break_requested() {
                return Err(error!(Break));
            }
        }
        Ok(())
    }

    fn r#poke(&mut self) -> Result<()> {
        self.next_token();
        let at = self.value()?;
        self.expect_char(b',')?;
        let value = self.value()?;
        if at < 0.0 || value < 0.0 || value > 255.0 {
            return Err(error!(IllegalFunctionCall));
        }
        if !self.arena.poke(at as Address, value as u8) {
            return Err(error!(IllegalFunctionCall));
        }
        Ok(())
    }

    /// Waits without blocking the host, checking for a break.
    fn r#delay(&mut self) -> Result<()> {
        self.next_token();
        let ms = self.value()?;
        if ms < 0.0 {
            return Err(error!(IllegalFunctionCall));
        }
        let start = self.devices.millis();
        while self.devices.millis().wrapping_sub(start) < ms as u64 {
            self.devices.yield_now();
            if self.break_requested() {
                return Err(error!(Break));
            }
        }
        Ok(())
    }
}

/// Finds the next value in `DATA` statements from the cursor.
fn scan_data<T: ProgramText>(text: T, codec: Codec, cursor: DataCursor) -> Result<(Datum, Address)> {
    let mut source = StoredProgram::new(codec);
    let (start, mut inside) = match cursor {
        DataCursor::Search(at) => (at, false),
        DataCursor::Inside(at) => (at, true),
    };
    source.seek(start);
    let mut negative = false;
    loop {
        let token = source.next_token(&text);
        if !inside {
            match token {
                Token::Word(Word::Data) => inside = true,
                Token::Eol => return Err(error!(OutOfData)),
                _ => {}
            }
            continue;
        }
        match token {
            Token::Number(n) => {
                let n = if negative { -n } else { n };
                return Ok((Datum::Number(n), source.position()));
            }
            Token::String(s) => return Ok((Datum::Text(s), source.position())),
            Token::Operator(Operator::Minus) => negative = !negative,
            Token::Operator(Operator::Plus) | Token::Char(b',') => {}
            Token::Eol => return Err(error!(OutOfData)),
            t if t.is_terminator() => inside = false,
            _ => return Err(error!(SyntaxError)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::LiveLine;
    use crate::mach::Arena;

    fn program(lines: &[&str]) -> Arena {
        let mut arena = Arena::new(1024);
        for line in lines {
            let mut tokens = LiveLine::new(line, true).tokens();
            let n = match tokens.remove(0) {
                Token::Number(n) => n as LineNumber,
                _ => panic!("unnumbered"),
            };
            arena.store_line(n, &tokens).unwrap();
        }
        arena
    }

    #[test]
    fn test_scan_data_walks_statements() {
        let arena = program(&["10 DATA 1,-2", "20 PRINT 5", "30 DATA \"X\""]);
        let codec = arena.codec();
        let text = arena.program();
        let (d, at) = scan_data(text, codec, DataCursor::Search(0)).unwrap();
        assert_eq!(d, Datum::Number(1.0));
        let (d, at) = scan_data(text, codec, DataCursor::Inside(at)).unwrap();
        assert_eq!(d, Datum::Number(-2.0));
        let (d, at) = scan_data(text, codec, DataCursor::Inside(at)).unwrap();
        assert_eq!(d, Datum::Text(b"X".to_vec()));
        let e = scan_data(text, codec, DataCursor::Inside(at)).unwrap_err();
        assert!(e.is(crate::lang::ErrorCode::OutOfData));
    }
}
