/*!
## Rust Machine Module

This Rust module is the BASIC machine: one memory arena holding the
tokenized program and the variable heap, and an interpreter that walks
the tokens directly.

*/

pub type Address = usize;

mod arena;
mod codec;
mod control;
pub mod device;
mod eval;
mod event;
mod exec;
mod function;
mod heap;
mod listing;
mod operation;
mod program;
mod runtime;
mod stack;
mod storage;
mod var;

pub use arena::Arena;
pub use codec::{Codec, NUM_SIZE};
pub use device::{Devices, MemoryStore, MemoryStream, Signals};
pub use event::{Action, EVENT_SLOTS};
pub use function::Function;
pub use heap::{Found, Kind};
pub use listing::Listing;
pub use operation::Operation;
pub use program::{Lines, StoredProgram};
pub use runtime::{Config, Event, Location, Mode, Runtime};
pub use stack::Stack;
