use super::runtime::{line_number, Handler, LoopFrame, LoopKind, ReturnFrame};
use super::{Location, Mode, Runtime};
use crate::error;
use crate::lang::{Error, Operator, Token, Word};

type Result<T> = std::result::Result<T, Error>;

/// ## Flow of control
///
/// Blocks are found by scanning tokens forward and counting nesting,
/// there is no precomputed jump table. Loops remember where their body
/// starts on the loop stack.

impl Runtime {
    /// Leaves the cursor on the `close` word matching an `open` already
    /// passed.
    pub(crate) fn find_bracket(&mut self, open: Word, close: Word) -> Result<()> {
        let mut depth = 0;
        loop {
            match self.token {
                Token::Eol => return Err(error!(MissingBlockEnd)),
                Token::Word(w) if w == open => depth += 1,
                Token::Word(w) if w == close => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.next_token();
        }
    }

    pub(crate) fn goto(&mut self, gosub: bool) -> Result<()> {
        self.next_token();
        let n = self.value()?;
        if gosub {
            self.gosubs.push(ReturnFrame {
                resume: self.location(),
                from_event: false,
            })?;
        }
        self.goto_number(n)
    }

    pub(crate) fn r#return(&mut self) -> Result<()> {
        let frame = self.gosubs.pop()?;
        if frame.from_event {
            self.events.enabled = true;
        }
        self.jump(frame.resume);
        Ok(())
    }

    /// After `THEN` or `ELSE`: a line number jumps, anything else is a
    /// statement.
    fn branch(&mut self) -> Result<()> {
        match self.token {
            Token::Number(n) => {
                self.next_token();
                self.goto_number(n)
            }
            _ if self.token.is_terminator() => Ok(()),
            _ => self.statement(),
        }
    }

    pub(crate) fn r#if(&mut self) -> Result<()> {
        self.next_token();
        let condition = self.value()?;
        if self.token.is_word(Word::Then) {
            self.next_token();
        }
        if condition != 0.0 {
            return self.branch();
        }
        if self.token.is_word(Word::Do) {
            self.next_token();
            self.find_bracket(Word::Do, Word::Dend)?;
            self.next_token();
            if self.token.is_word(Word::Else) {
                self.next_token();
                return self.branch();
            }
            return Ok(());
        }
        loop {
            match self.token {
                Token::Eol | Token::LineNumber(_) => return Ok(()),
                Token::Word(Word::Else) => {
                    self.next_token();
                    return self.branch();
                }
                _ => self.next_token(),
            }
        }
    }

    /// Reached after a taken `THEN` branch: skips the alternative.
    pub(crate) fn r#else(&mut self) -> Result<()> {
        self.next_token();
        if self.token.is_word(Word::Do) {
            self.next_token();
            self.find_bracket(Word::Do, Word::Dend)?;
            self.next_token();
            return Ok(());
        }
        while !matches!(self.token, Token::Eol | Token::LineNumber(_)) {
            self.next_token();
        }
        Ok(())
    }

    /// `ON n GOTO|GOSUB l1, l2, ...`. Out of range falls through.
    pub(crate) fn r#on(&mut self) -> Result<()> {
        self.next_token();
        let n = self.value()?.trunc();
        let gosub = match self.token {
            Token::Word(Word::Goto) => false,
            Token::Word(Word::Gosub) => true,
            _ => return Err(error!(SyntaxError)),
        };
        self.next_token();
        let mut index = 1.0;
        let mut target = None;
        loop {
            let line = self.value()?;
            if index == n {
                target = Some(line);
            }
            index += 1.0;
            if !self.token.is_char(b',') {
                break;
            }
            self.next_token();
        }
        let line = match target {
            Some(line) => line,
            None => return Ok(()),
        };
        if gosub {
            self.gosubs.push(ReturnFrame {
                resume: self.location(),
                from_event: false,
            })?;
        }
        self.goto_number(line)
    }

    pub(crate) fn r#for(&mut self) -> Result<()> {
        self.next_token();
        let var = match self.token {
            Token::Var(name) => name,
            _ => return Err(error!(SyntaxError)),
        };
        self.next_token();
        if self.token == Token::Operator(Operator::Equal) {
            self.next_token();
            let start = self.value()?;
            self.set_var(var, start)?;
        }
        let mut limit = crate::lang::Number::MAX;
        let mut step = 1.0;
        if self.token.is_word(Word::To) {
            self.next_token();
            limit = self.value()?;
        }
        if self.token.is_word(Word::Step) {
            self.next_token();
            step = self.value()?;
        }
        if !self.token.is_terminator() {
            return Err(error!(SyntaxError));
        }
        self.loops
            .unwind_to(|f| f.kind == LoopKind::For && f.var == var);
        let value = self.get_var(var)?;
        if (step > 0.0 && value > limit) || (step < 0.0 && value < limit) {
            self.find_bracket(Word::For, Word::Next)?;
            self.next_token();
            if let Token::Var(_) = self.token {
                self.next_token();
            }
            return Ok(());
        }
        self.loops.push(LoopFrame {
            kind: LoopKind::For,
            var,
            resume: self.location(),
            limit,
            step,
        })
    }

    pub(crate) fn r#next(&mut self) -> Result<()> {
        self.next_token();
        let name = match self.token {
            Token::Var(name) => {
                self.next_token();
                Some(name)
            }
            _ => None,
        };
        let frame = loop {
            let frame = match self.loops.last() {
                Some(frame) if frame.kind == LoopKind::For => *frame,
                _ => return Err(error!(NextWithoutFor)),
            };
            match name {
                Some(name) if name != frame.var => {
                    self.loops.pop()?;
                }
                _ => break frame,
            }
        };
        let value = self.get_var(frame.var)? + frame.step;
        self.set_var(frame.var, value)?;
        if (frame.step > 0.0 && value > frame.limit) || (frame.step < 0.0 && value < frame.limit) {
            self.loops.pop()?;
            return Ok(());
        }
        self.jump(frame.resume);
        Ok(())
    }

    /// Leaves the innermost loop.
    pub(crate) fn r#break(&mut self) -> Result<()> {
        let frame = self.loops.pop()?;
        self.next_token();
        match frame.kind {
            LoopKind::For => {
                self.find_bracket(Word::For, Word::Next)?;
                self.next_token();
                if let Token::Var(_) = self.token {
                    self.next_token();
                }
            }
            LoopKind::While => {
                self.find_bracket(Word::While, Word::Wend)?;
                self.next_token();
            }
            LoopKind::Repeat => {
                self.find_bracket(Word::Repeat, Word::Until)?;
                self.next_token();
                self.value()?;
            }
        }
        Ok(())
    }

    /// In a program, the next iteration of the innermost loop. Typed
    /// alone, resumes a stopped program.
    pub(crate) fn r#cont(&mut self) -> Result<()> {
        if self.mode == Mode::Interactive {
            let location = self.cont.take().ok_or_else(|| error!(CantContinue))?;
            self.jump(location);
            return Ok(());
        }
        let kind = match self.loops.last() {
            Some(frame) => frame.kind,
            None => return Err(error!(NextWithoutFor)),
        };
        self.next_token();
        match kind {
            LoopKind::For => {
                self.find_bracket(Word::For, Word::Next)?;
                self.r#next()
            }
            LoopKind::While => {
                self.find_bracket(Word::While, Word::Wend)?;
                self.r#wend()
            }
            LoopKind::Repeat => {
                self.find_bracket(Word::Repeat, Word::Until)?;
                self.r#until()
            }
        }
    }

    pub(crate) fn r#while(&mut self) -> Result<()> {
        self.next_token();
        let resume = self.location();
        let condition = self.value()?;
        self.loops
            .unwind_to(|f| f.kind == LoopKind::While && f.resume == resume);
        if condition != 0.0 {
            return self.loops.push(LoopFrame {
                kind: LoopKind::While,
                var: [0, 0],
                resume,
                limit: 0.0,
                step: 0.0,
            });
        }
        self.find_bracket(Word::While, Word::Wend)?;
        self.next_token();
        Ok(())
    }

    /// Re-tests the condition at the top of the loop.
    pub(crate) fn r#wend(&mut self) -> Result<()> {
        let frame = match self.loops.last() {
            Some(frame) if frame.kind == LoopKind::While => *frame,
            _ => return Err(error!(WendWithoutWhile)),
        };
        self.next_token();
        self.saved = Some(self.location());
        self.jump(frame.resume);
        let condition = self.value()?;
        let after = self.saved.take();
        if condition != 0.0 {
            return Ok(());
        }
        self.loops.pop()?;
        match after {
            Some(location) => self.jump(location),
            None => return Err(error!(InternalError; "WEND")),
        }
        Ok(())
    }

    pub(crate) fn r#repeat(&mut self) -> Result<()> {
        self.next_token();
        let resume = self.location();
        self.loops
            .unwind_to(|f| f.kind == LoopKind::Repeat && f.resume == resume);
        self.loops.push(LoopFrame {
            kind: LoopKind::Repeat,
            var: [0, 0],
            resume,
            limit: 0.0,
            step: 0.0,
        })
    }

    pub(crate) fn r#until(&mut self) -> Result<()> {
        let frame = match self.loops.last() {
            Some(frame) if frame.kind == LoopKind::Repeat => *frame,
            _ => return Err(error!(UntilWithoutRepeat)),
        };
        self.next_token();
        if self.value()? != 0.0 {
            self.loops.pop()?;
        } else {
            self.jump(frame.resume);
        }
        Ok(())
    }

    /// Jumps to the first `CASE` listing the value, or comes back and
    /// carries on if none does.
    pub(crate) fn r#switch(&mut self) -> Result<()> {
        self.next_token();
        let value = self.value()?;
        self.saved = Some(self.location());
        let mut depth = 0;
        loop {
            match self.token {
                Token::Eol => break,
                Token::Word(Word::Switch) => depth += 1,
                Token::Word(Word::Swend) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Token::Word(Word::Case) if depth == 0 => {
                    self.next_token();
                    loop {
                        if self.value()? == value {
                            while !self.token.is_terminator() {
                                self.next_token();
                            }
                            self.saved = None;
                            return Ok(());
                        }
                        if !self.token.is_char(b',') {
                            break;
                        }
                        self.next_token();
                    }
                    continue;
                }
                _ => {}
            }
            self.next_token();
        }
        match self.saved.take() {
            Some(location) => self.jump(location),
            None => return Err(error!(InternalError; "SWITCH")),
        }
        Ok(())
    }

    /// Reached by falling out of a case body.
    pub(crate) fn r#case(&mut self) -> Result<()> {
        self.next_token();
        self.find_bracket(Word::Switch, Word::Swend)?;
        self.next_token();
        Ok(())
    }

    pub(crate) fn r#run(&mut self) -> Result<()> {
        self.next_token();
        let mut loaded = false;
        if let Token::String(ref name) = self.token {
            let name = String::from_utf8_lossy(name).into_owned();
            self.next_token();
            self.load_program(&name)?;
            loaded = true;
        }
        let start = if self.at_end() {
            None
        } else {
            Some(line_number(self.value()?)?)
        };
        let mode = if self.mode == Mode::RunStore && !loaded {
            Mode::RunStore
        } else {
            Mode::Run
        };
        self.clear();
        self.cont = None;
        self.mode = mode;
        match start {
            Some(line) => self.goto_line(line),
            None => {
                self.jump(Location { mode, at: 0 });
                Ok(())
            }
        }
    }

    /// `END` and `STOP` both leave the program resumable with `CONT`.
    pub(crate) fn r#end(&mut self) -> Result<()> {
        self.next_token();
        if self.mode != Mode::Interactive {
            self.cont = Some(self.location());
        }
        self.halt();
        Ok(())
    }

    /// `ERROR GOTO line`, `ERROR CONT`, `ERROR STOP`.
    pub(crate) fn r#error_handler(&mut self) -> Result<()> {
        self.next_token();
        match self.token {
            Token::Word(Word::Goto) => {
                self.next_token();
                let line = line_number(self.value()?)?;
                self.handler = Some(Handler::Goto(line));
            }
            Token::Word(Word::Cont) => {
                self.next_token();
                self.handler = Some(Handler::Continue);
            }
            Token::Word(Word::Stop) => {
                self.next_token();
                self.handler = None;
            }
            _ => return Err(error!(SyntaxError)),
        }
        Ok(())
    }
}
