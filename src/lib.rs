//! # BASIC in one arena
//!
//! A small BASIC interpreter whose program and variables share a single
//! byte arena. Lines are stored as tokens and interpreted in place, one
//! statement per cycle, so a host can interleave the machine with its
//! own work. Programs can be kept in a byte store and started at power
//! on, and timers and pin events call into BASIC between statements.
//!
//! The `basic` executable runs the machine on a terminal.
//! ```text
//! READY.
//! █
//! ```
//!
//! Embedding takes a `Runtime` and a set of `Devices`:
//! ```
//! use basic::mach::{Config, Devices, Event, MemoryStream, Runtime};
//! use basic::mach::device::channel;
//!
//! let console = MemoryStream::default();
//! let devices = Devices::default().stream(channel::CONSOLE, console.clone());
//! let mut runtime = Runtime::new(Config::default(), devices);
//! runtime.enter("PRINT 6*7");
//! while runtime.execute(100) == Event::Running {}
//! assert_eq!(console.take_output(), "42\n");
//! ```

#[path = "doc/introduction.rs"]
#[allow(non_snake_case)]
pub mod _Introduction;

#[path = "doc/chapter_1.rs"]
#[allow(non_snake_case)]
pub mod __Chapter_1;

#[path = "doc/chapter_2.rs"]
#[allow(non_snake_case)]
pub mod __Chapter_2;

#[path = "doc/chapter_3.rs"]
#[allow(non_snake_case)]
pub mod __Chapter_3;

#[path = "doc/appendix_a.rs"]
#[allow(non_snake_case)]
pub mod ___Appendix_A;

pub mod lang;
pub mod mach;
