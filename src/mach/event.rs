use super::runtime::ReturnFrame;
use super::Runtime;
use crate::error;
use crate::lang::{Error, LineNumber, Number, Token, Word};

type Result<T> = std::result::Result<T, Error>;

/// Pins that can be watched at once.
pub const EVENT_SLOTS: usize = 4;

/// What a timer or event does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Goto(LineNumber),
    Gosub(LineNumber),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Timer {
    interval: u64,
    last: u64,
    action: Option<Action>,
    enabled: bool,
}

impl Timer {
    fn due(&self, now: u64) -> bool {
        self.enabled && self.action.is_some() && now.wrapping_sub(self.last) >= self.interval
    }
}

/// `AFTER` fires once, `EVERY` repeats.
#[derive(Debug, Default)]
pub struct Timers {
    after: Timer,
    every: Timer,
}

impl Timers {
    pub fn reset(&mut self) {
        self.after.enabled = false;
        self.every.enabled = false;
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    pin: u8,
    action: Action,
    active: bool,
}

/// Pin events, served round robin.
#[derive(Debug)]
pub struct EventTable {
    slots: Vec<Slot>,
    next: usize,
    pub(crate) enabled: bool,
}

impl Default for EventTable {
    fn default() -> EventTable {
        EventTable {
            slots: Vec::with_capacity(EVENT_SLOTS),
            next: 0,
            enabled: true,
        }
    }
}

impl EventTable {
    pub fn clear(&mut self) {
        self.slots.clear();
        self.next = 0;
        self.enabled = true;
    }

    fn add(&mut self, pin: u8, action: Action) -> Result<()> {
        self.remove(pin);
        if self.slots.len() >= EVENT_SLOTS {
            return Err(error!(OutOfMemory; "EVENT"));
        }
        self.slots.push(Slot {
            pin,
            action,
            active: false,
        });
        Ok(())
    }

    fn remove(&mut self, pin: u8) {
        self.slots.retain(|s| s.pin != pin);
        self.next = 0;
    }

    /// The next pending action after the last one served.
    fn take(&mut self) -> Option<Action> {
        let len = self.slots.len();
        for k in 0..len {
            let i = (self.next + k) % len;
            if self.slots[i].active {
                self.slots[i].active = false;
                self.next = (i + 1) % len;
                return Some(self.slots[i].action);
            }
        }
        None
    }
}

/// ## Timers and events
///
/// Checked at statement boundaries while a program runs. At most one
/// timer or event fires per boundary, `AFTER` before `EVERY` before pins.

impl Runtime {
    pub(crate) fn dispatch(&mut self) -> Result<()> {
        let now = self.devices.millis();
        if self.timers.after.due(now) {
            self.timers.after.enabled = false;
            if let Some(action) = self.timers.after.action {
                return self.fire(action, false);
            }
        }
        if self.timers.every.due(now) {
            self.timers.every.last = now;
            if let Some(action) = self.timers.every.action {
                return self.fire(action, false);
            }
        }
        if !self.events.enabled || self.events.slots.is_empty() {
            return Ok(());
        }
        for slot in self.events.slots.iter_mut() {
            if self.signals.take(slot.pin) {
                slot.active = true;
            }
        }
        match self.events.take() {
            Some(action) => {
                if let Action::Gosub(_) = action {
                    self.events.enabled = false;
                }
                self.fire(action, true)
            }
            None => Ok(()),
        }
    }

    fn fire(&mut self, action: Action, from_event: bool) -> Result<()> {
        match action {
            Action::Goto(line) => self.goto_line(line),
            Action::Gosub(line) => {
                self.gosubs.push(ReturnFrame {
                    resume: self.location(),
                    from_event,
                })?;
                self.goto_line(line)
            }
        }
    }

    /// `GOTO line` or `GOSUB line` after a timer or event.
    fn action(&mut self) -> Result<Option<Action>> {
        let gosub = match self.token {
            Token::Word(Word::Goto) => false,
            Token::Word(Word::Gosub) => true,
            _ => return Ok(None),
        };
        self.next_token();
        let line = super::runtime::line_number(self.value()?)?;
        Ok(Some(if gosub {
            Action::Gosub(line)
        } else {
            Action::Goto(line)
        }))
    }

    /// `AFTER ms GOTO|GOSUB line`, `EVERY ...`. An interval of 0 turns
    /// the timer off; no action re-arms the previous one.
    pub(crate) fn timer(&mut self, every: bool) -> Result<()> {
        self.next_token();
        let interval = self.value()?;
        if interval < 0.0 {
            return Err(error!(IllegalFunctionCall));
        }
        let action = self.action()?;
        let now = self.devices.millis();
        let timer = if every {
            &mut self.timers.every
        } else {
            &mut self.timers.after
        };
        if action.is_some() {
            timer.action = action;
        }
        timer.interval = interval as u64;
        timer.last = now;
        timer.enabled = interval > 0.0 && timer.action.is_some();
        Ok(())
    }

    /// `EVENT pin, mode GOTO|GOSUB line`, `EVENT pin` to forget a pin,
    /// `EVENT STOP` and `EVENT CONT` to hold and release all events.
    pub(crate) fn event(&mut self) -> Result<()> {
        self.next_token();
        match self.token {
            Token::Word(Word::Stop) => {
                self.next_token();
                self.events.enabled = false;
                return Ok(());
            }
            Token::Word(Word::Cont) => {
                self.next_token();
                self.events.enabled = true;
                return Ok(());
            }
            _ => {}
        }
        let pin = pin_number(self.value()?)?;
        if self.at_end() {
            self.events.remove(pin);
            return Ok(());
        }
        self.expect_char(b',')?;
        // Edge or level selection belongs to the host's pin driver.
        let mode = self.value()?;
        if mode < 0.0 || mode > 3.0 {
            return Err(error!(IllegalFunctionCall));
        }
        let action = self.action()?.ok_or_else(|| error!(SyntaxError))?;
        self.events.add(pin, action)
    }

    /// Clears `AFTER` or `EVERY` outright.
    pub(crate) fn clear_timer(&mut self, every: bool) {
        if every {
            self.timers.every = Timer::default();
        } else {
            self.timers.after = Timer::default();
        }
    }
}

fn pin_number(n: Number) -> Result<u8> {
    if n < 0.0 || n > 63.0 {
        return Err(error!(IllegalFunctionCall));
    }
    Ok(n as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin() {
        let mut table = EventTable::default();
        table.add(1, Action::Goto(10)).unwrap();
        table.add(2, Action::Goto(20)).unwrap();
        for s in table.slots.iter_mut() {
            s.active = true;
        }
        assert_eq!(table.take(), Some(Action::Goto(10)));
        table.slots[0].active = true;
        assert_eq!(table.take(), Some(Action::Goto(20)));
        assert_eq!(table.take(), Some(Action::Goto(10)));
        assert_eq!(table.take(), None);
    }

    #[test]
    fn test_table_is_bounded() {
        let mut table = EventTable::default();
        for pin in 0..EVENT_SLOTS as u8 {
            table.add(pin, Action::Gosub(100)).unwrap();
        }
        assert!(table.add(9, Action::Gosub(100)).is_err());
        table.add(0, Action::Goto(5)).unwrap();
        assert_eq!(table.slots.len(), EVENT_SLOTS);
    }

    #[test]
    fn test_timer_due() {
        let t = Timer {
            interval: 5,
            last: 10,
            action: Some(Action::Goto(1)),
            enabled: true,
        };
        assert!(!t.due(14));
        assert!(t.due(15));
    }
}
