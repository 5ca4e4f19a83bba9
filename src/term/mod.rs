extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;

mod console;
mod host;

use ansi_term::Style;
use basic::lang::Error;
use basic::mach::device::channel;
use basic::mach::{Config, Devices, Event, Runtime};
use console::Console;
use host::{DiskFiles, FileStore, HostClock};
use linefeed::{DefaultTerminal, Interface, ReadResult};
use std::sync::Arc;

const STORE_FILE: &str = "basic.eep";
const STORE_SIZE: usize = 4096;
const CYCLES: usize = 5000;

pub fn main() {
    let script = std::env::args().nth(1);
    let interface = match Interface::new("BASIC") {
        Ok(interface) => Arc::new(interface),
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    };
    let mut runtime = runtime(interface.clone());
    let signals = runtime.signals();
    if let Err(error) = ctrlc::set_handler(move || signals.interrupt()) {
        eprintln!("Error setting Ctrl-C handler: {}", error);
    }
    let result = match script {
        Some(file) => run_script(&mut runtime, &interface, &file),
        None => main_loop(&mut runtime, &interface),
    };
    if let Err(error) = result {
        eprintln!("{}", error);
    }
}

fn runtime(interface: Arc<Interface<DefaultTerminal>>) -> Runtime {
    let devices = Devices::default();
    let console = Console::new(interface, devices.signals());
    let devices = devices
        .stream(channel::CONSOLE, console)
        .store(FileStore::open(STORE_FILE, STORE_SIZE))
        .files(DiskFiles::new("."))
        .clock(HostClock::default());
    Runtime::new(Config::default(), devices)
}

fn report(interface: &Interface<DefaultTerminal>, error: &Error) -> std::io::Result<()> {
    interface.write_fmt(format_args!(
        "{}\n",
        Style::new().bold().paint(format!("?{}", error))
    ))
}

/// Runs one program file to the end, then exits.
fn run_script(
    runtime: &mut Runtime,
    interface: &Interface<DefaultTerminal>,
    file: &str,
) -> std::io::Result<()> {
    runtime.enter(&format!("RUN \"{}\"", file));
    loop {
        match runtime.execute(CYCLES) {
            Event::Running => {}
            Event::Stopped => return Ok(()),
            Event::Errors(error) => return report(interface, &error),
        }
    }
}

fn main_loop(runtime: &mut Runtime, interface: &Interface<DefaultTerminal>) -> std::io::Result<()> {
    let mut print_ready = !runtime.autorun();
    loop {
        match runtime.execute(CYCLES) {
            Event::Running => {}
            Event::Stopped => {
                if print_ready {
                    print_ready = false;
                    interface.write_fmt(format_args!("READY.\n"))?;
                }
                match interface.read_line()? {
                    ReadResult::Input(input) => {
                        if runtime.enter(&input) {
                            interface.add_history_unique(input);
                        }
                    }
                    ReadResult::Signal(_) | ReadResult::Eof => break,
                }
            }
            Event::Errors(error) => {
                report(interface, &error)?;
                print_ready = true;
            }
        }
    }
    Ok(())
}
