mod common;
use basic::mach::Event;
use common::*;

#[test]
fn test_every_statement_and_byte_yields() {
    let mut h = Host::new();
    h.enter("PRINT 1:PRINT 2");
    h.ticks.reset();
    assert_eq!(exec(&mut h), "1\n2\n");
    assert_eq!(h.ticks.yields(), 6);
}

#[test]
fn test_after_fires_once() {
    let mut h = Host::new();
    h.program(&[
        "10 AFTER 3 GOSUB 100",
        "20 FOR I=1 TO 20:NEXT",
        "30 PRINT N:END",
        "100 N=N+1:RETURN",
        "RUN",
    ]);
    assert_eq!(exec(&mut h), "1\n");
}

#[test]
fn test_every_repeats_until_cleared() {
    let mut h = Host::new();
    h.program(&[
        "10 EVERY 5 GOSUB 100",
        "20 FOR I=1 TO 40:NEXT",
        "30 EVERY 0:M=N",
        "40 FOR I=1 TO 40:NEXT",
        "50 PRINT N>3;N=M:END",
        "100 N=N+1:RETURN",
        "RUN",
    ]);
    assert_eq!(exec(&mut h), "-1-1\n");
}

#[test]
fn test_after_goto() {
    let mut h = Host::new();
    h.program(&["10 AFTER 10 GOTO 100", "20 GOTO 20", "100 PRINT \"LATE\"", "RUN"]);
    assert_eq!(exec(&mut h), "LATE\n");
}

#[test]
fn test_timers_do_not_fire_in_direct_mode() {
    let mut h = Host::new();
    h.program(&["100 PRINT \"NO\""]);
    assert_eq!(run_line(&mut h, "AFTER 1 GOTO 100:DELAY 5:PRINT \"YES\""), "YES\n");
}

#[test]
fn test_pin_event_gosub() {
    let mut h = Host::new();
    h.program(&[
        "10 EVENT 3,1 GOSUB 100",
        "20 IF N=0 THEN 20",
        "30 PRINT \"DONE\";N:END",
        "100 N=N+1:RETURN",
        "RUN",
    ]);
    assert_eq!(h.runtime.execute(20), Event::Running);
    h.runtime.signals().raise(3);
    assert_eq!(exec(&mut h), "DONE1\n");
}

#[test]
fn test_event_stop_holds_pins() {
    let mut h = Host::new();
    h.program(&[
        "10 EVENT STOP",
        "20 EVENT 3,0 GOTO 100",
        "30 N=N+1:IF N<20 THEN 30",
        "40 PRINT N;:EVENT CONT",
        "50 GOTO 50",
        "100 PRINT \"PIN\":END",
        "RUN",
    ]);
    h.runtime.signals().raise(3);
    assert_eq!(exec(&mut h), "20PIN\n");
}

#[test]
fn test_event_arguments() {
    let mut h = Host::new();
    assert_eq!(run_line(&mut h, "EVENT 64,0 GOTO 10"), "?ILLEGAL FUNCTION CALL\n");
    assert_eq!(run_line(&mut h, "EVENT 1,4 GOTO 10"), "?ILLEGAL FUNCTION CALL\n");
    assert_eq!(run_line(&mut h, "EVENT 1,0"), "?SYNTAX ERROR\n");
    assert_eq!(
        run_line(&mut h, "EVENT 1,0 GOTO 9:EVENT 2,0 GOTO 9:EVENT 3,0 GOTO 9:EVENT 4,0 GOTO 9"),
        ""
    );
    assert_eq!(
        run_line(&mut h, "EVENT 5,0 GOTO 9"),
        "?OUT OF MEMORY; EVENT\n"
    );
    assert_eq!(run_line(&mut h, "EVENT 4:EVENT 5,0 GOTO 9"), "");
}

#[test]
fn test_delay() {
    let mut h = Host::new();
    h.enter("DELAY 10");
    h.ticks.reset();
    assert_eq!(exec(&mut h), "");
    assert_eq!(h.ticks.yields(), 11);
    h.console.feed("#");
    assert_eq!(run_line(&mut h, "DELAY 1000"), "?BREAK\n");
    assert_eq!(run_line(&mut h, "DELAY -1"), "?ILLEGAL FUNCTION CALL\n");
}

/// Raises the break signal from inside the yield hook.
struct Breaker {
    signals: std::sync::Arc<basic::mach::Signals>,
    at: usize,
    count: usize,
}

impl basic::mach::device::Scheduler for Breaker {
    fn yield_now(&mut self) {
        self.count += 1;
        if self.count == self.at {
            self.signals.interrupt();
        }
    }
    fn millis(&mut self) -> u64 {
        0
    }
}

#[test]
fn test_break_from_yield_hook() {
    use basic::mach::device::channel;
    use basic::mach::{Config, Devices, MemoryStream, Runtime};
    let console = MemoryStream::default();
    let devices = Devices::default();
    let breaker = Breaker {
        signals: devices.signals(),
        at: 2,
        count: 0,
    };
    let devices = devices
        .stream(channel::CONSOLE, console.clone())
        .scheduler(breaker);
    let mut runtime = Runtime::new(Config::default(), devices);
    runtime.enter("PRINT 1:PRINT 2:PRINT 3");
    match runtime.execute(100) {
        Event::Errors(e) => assert_eq!(e.to_string(), "BREAK"),
        e => panic!("{:?}", e),
    }
    assert_eq!(console.take_output(), "1\n");
}

#[test]
fn test_clr_timers_and_stacks() {
    let mut h = Host::new();
    h.program(&[
        "10 EVERY 2 GOTO 100",
        "20 CLR EVERY",
        "30 FOR I=1 TO 10:NEXT",
        "40 GOSUB 60",
        "50 END",
        "60 CLR GOSUB:PRINT \"OK\"",
        "70 RETURN",
        "100 PRINT \"FIRED\"",
        "RUN",
    ]);
    assert_eq!(exec(&mut h), "OK\n?RETURN WITHOUT GOSUB IN 70\n");
}
