use crate::error;
use crate::lang::{Error, ErrorCode};

type Result<T> = std::result::Result<T, Error>;

/// ## Stack enforced and size limited vector
///
/// A push onto a full stack fails and leaves it as it was.

pub struct Stack<T> {
    overflow_message: &'static str,
    underflow: ErrorCode,
    capacity: usize,
    vec: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.vec)
    }
}

impl<T> Stack<T> {
    pub fn new(capacity: usize, overflow_message: &'static str, underflow: ErrorCode) -> Stack<T> {
        Stack {
            overflow_message,
            underflow,
            capacity,
            vec: Vec::with_capacity(capacity),
        }
    }
    fn underflow_error(&self) -> Error {
        Error::new(self.underflow)
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn clear(&mut self) {
        self.vec.clear()
    }
    pub fn len(&self) -> usize {
        self.vec.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
    pub fn is_full(&self) -> bool {
        self.vec.len() >= self.capacity
    }
    pub fn last(&self) -> Option<&T> {
        self.vec.last()
    }
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.vec.last_mut()
    }
    /// Drops the newest entry matching `f` and everything above it.
    pub fn unwind_to<F: FnMut(&T) -> bool>(&mut self, f: F) -> bool {
        match self.vec.iter().rposition(f) {
            Some(i) => {
                self.vec.truncate(i);
                true
            }
            None => false,
        }
    }
    pub fn push(&mut self, val: T) -> Result<()> {
        if self.is_full() {
            return Err(error!(StackOverflow; self.overflow_message));
        }
        self.vec.push(val);
        Ok(())
    }
    pub fn pop(&mut self) -> Result<T> {
        match self.vec.pop() {
            Some(v) => Ok(v),
            None => Err(self.underflow_error()),
        }
    }
    pub fn pop_2(&mut self) -> Result<(T, T)> {
        let two = self.pop()?;
        let one = self.pop()?;
        Ok((one, two))
    }
    pub fn pop_n(&mut self, len: usize) -> Result<Vec<T>> {
        if len > self.vec.len() {
            Err(self.underflow_error())
        } else {
            let range = (self.vec.len() - len)..;
            Ok(self.vec.drain(range).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_keeps_depth() {
        let mut s: Stack<u8> = Stack::new(2, "", ErrorCode::InternalError);
        s.push(1).unwrap();
        s.push(2).unwrap();
        let e = s.push(3).unwrap_err();
        assert!(e.is(ErrorCode::StackOverflow));
        assert_eq!(s.len(), 2);
        assert_eq!(s.pop_2().unwrap(), (1, 2));
    }

    #[test]
    fn test_underflow_code() {
        let mut s: Stack<u8> = Stack::new(4, "GOSUB", ErrorCode::ReturnWithoutGosub);
        assert!(s.pop().unwrap_err().is(ErrorCode::ReturnWithoutGosub));
        s.push(7).unwrap();
        assert!(s.pop_n(2).is_err());
        assert_eq!(s.pop_n(1).unwrap(), vec![7]);
    }

    #[test]
    fn test_unwind_to() {
        let mut s: Stack<u8> = Stack::new(8, "", ErrorCode::InternalError);
        for n in &[1, 2, 3, 2, 5] {
            s.push(*n).unwrap();
        }
        assert!(s.unwind_to(|n| *n == 2));
        assert_eq!(s.len(), 3);
        assert!(!s.unwind_to(|n| *n == 9));
        assert_eq!(s.len(), 3);
    }
}
