mod common;
use basic::mach::Config;
use common::*;

const LISTING: &str = "10 PRINT \"HI\"\n20 A=A+1\n";

fn with_program(h: &mut Host) {
    h.program(&["10 print \"HI\"", "20 a=a+1"]);
}

#[test]
fn test_save_and_load_store() {
    let mut h = Host::new();
    with_program(&mut h);
    assert_eq!(run_line(&mut h, r#"SAVE "!""#), "");
    assert_eq!(run_line(&mut h, "NEW"), "");
    assert_eq!(run_line(&mut h, "LIST"), "");
    assert_eq!(run_line(&mut h, r#"LOAD "!""#), "");
    assert_eq!(run_line(&mut h, "LIST"), LISTING);
}

#[test]
fn test_store_errors() {
    let mut h = Host::new();
    assert_eq!(run_line(&mut h, r#"LOAD "!""#), "?STORE ERROR; NO PROGRAM\n");
    assert_eq!(run_line(&mut h, "SET 1,1"), "?STORE ERROR; NO PROGRAM\n");
    assert_eq!(run_line(&mut h, "SET 2,1"), "?ILLEGAL FUNCTION CALL\n");
    let mut small = Host::with_store(Config::default(), SharedStore::new(8));
    with_program(&mut small);
    assert_eq!(
        run_line(&mut small, r#"SAVE "!""#),
        "?STORE ERROR; PROGRAM TOO BIG\n"
    );
}

#[test]
fn test_corrupt_store_is_refused() {
    let store = SharedStore::new(256);
    let mut h = Host::with_store(Config::default(), store.clone());
    with_program(&mut h);
    assert_eq!(run_line(&mut h, r#"SAVE "!":SET 1,1"#), "");
    {
        let mut bytes = store.bytes.borrow_mut();
        bytes[6] ^= 0x55;
    }
    assert_eq!(run_line(&mut h, r#"LOAD "!""#), "?STORE ERROR; CHECKSUM\n");
    assert!(!h.runtime.autorun());
}

#[test]
fn test_autorun_from_store() {
    let store = SharedStore::new(256);
    let mut first = Host::with_store(Config::default(), store.clone());
    first.program(&["10 I=I+1:IF I<3 THEN 10", "20 PRINT \"AUTO\";I", "30 PRINT 1/0"]);
    assert_eq!(run_line(&mut first, r#"SAVE "!""#), "");

    let mut second = Host::with_store(Config::default(), store.clone());
    assert!(!second.runtime.autorun());

    assert_eq!(run_line(&mut first, "SET 1,1"), "");
    assert_eq!(run_line(&mut first, r#"SAVE "!""#), "");
    let mut third = Host::with_store(Config::default(), store.clone());
    assert!(third.runtime.autorun());
    assert_eq!(exec(&mut third), "AUTO3\n?DIVISION BY ZERO IN 30\n");
    assert_eq!(run_line(&mut third, "LIST"), "");

    assert_eq!(run_line(&mut first, "SET 1,0"), "");
    let mut fourth = Host::with_store(Config::default(), store);
    assert!(!fourth.runtime.autorun());
}

#[test]
fn test_save_and_load_file() {
    let mut h = Host::new();
    with_program(&mut h);
    assert_eq!(run_line(&mut h, r#"SAVE "PROG""#), "");
    assert_eq!(
        h.files.files.borrow().get("PROG").map(|f| f.as_slice()),
        Some(LISTING.as_bytes())
    );
    assert_eq!(run_line(&mut h, "NEW"), "");
    assert_eq!(run_line(&mut h, r#"LOAD "PROG""#), "");
    assert_eq!(run_line(&mut h, "LIST"), LISTING);
    assert_eq!(run_line(&mut h, r#"LOAD "NONE""#), "?FILE NOT FOUND\n");
}

#[test]
fn test_load_refuses_direct_statements() {
    let mut h = Host::new();
    h.files
        .files
        .borrow_mut()
        .insert("BAD".to_string(), b"10 PRINT 1\nPRINT 2\n".to_vec());
    assert_eq!(
        run_line(&mut h, r#"LOAD "BAD""#),
        "?SYNTAX ERROR; DIRECT STATEMENT IN FILE\n"
    );
}

#[test]
fn test_load_chains_keeping_variables() {
    let mut h = Host::new();
    h.files
        .files
        .borrow_mut()
        .insert("NEXT".to_string(), b"10 PRINT A\n".to_vec());
    h.program(&["10 A=5", "20 LOAD \"NEXT\"", "30 PRINT \"GONE\"", "RUN"]);
    assert_eq!(exec(&mut h), "5\n");
    assert_eq!(run_line(&mut h, "LIST"), "10 PRINT A\n");
}

#[test]
fn test_run_file() {
    let mut h = Host::new();
    h.files
        .files
        .borrow_mut()
        .insert("GO".to_string(), b"10 PRINT A+1\n".to_vec());
    h.enter("A=9");
    exec(&mut h);
    assert_eq!(run_line(&mut h, r#"RUN "GO""#), "1\n");
}

#[test]
fn test_catalog_and_delete() {
    let mut h = Host::new();
    {
        let mut files = h.files.files.borrow_mut();
        files.insert("ALPHA".to_string(), b"abc".to_vec());
        files.insert("BETA".to_string(), vec![]);
    }
    assert_eq!(run_line(&mut h, "CATALOG"), "ALPHA 3\nBETA 0\n");
    assert_eq!(run_line(&mut h, r#"CATALOG "B""#), "BETA 0\n");
    assert_eq!(run_line(&mut h, r#"DELETE "ALPHA":CATALOG"#), "BETA 0\n");
    assert_eq!(run_line(&mut h, r#"DELETE "ALPHA""#), "?FILE NOT FOUND\n");
    assert_eq!(run_line(&mut h, "FDISK:CATALOG"), "");
}

#[test]
fn test_file_channel() {
    let mut h = Host::new();
    assert_eq!(run_line(&mut h, r#"OPEN "OUT",1:PRINT &16,"HI";3:CLOSE"#), "");
    assert_eq!(run_line(&mut h, r#"OPEN "OUT",2:PRINT &16,"X":CLOSE 1"#), "");
    assert_eq!(
        h.files.files.borrow().get("OUT").map(|f| f.as_slice()),
        Some(&b"HI3\nX\n"[..])
    );
    assert_eq!(
        run_line(&mut h, r#"OPEN "OUT":INPUT &16,A$,B$:CLOSE:PRINT A$;B$;@S"#),
        "HI3X0\n"
    );
    assert_eq!(run_line(&mut h, r#"OPEN "NONE":PRINT @S"#), "1\n");
    assert_eq!(run_line(&mut h, r#"OPEN "OUT",3"#), "?ILLEGAL FUNCTION CALL\n");
}

#[test]
fn test_unbound_channel() {
    let mut h = Host::new();
    assert_eq!(run_line(&mut h, r#"PRINT &1,"X""#), "X\n");
    assert_eq!(run_line(&mut h, r#"PRINT &4,"X""#), "?BAD FILE NUMBER\n");
    assert_eq!(run_line(&mut h, "INPUT &9,A"), "?BAD FILE NUMBER\n");
}

#[test]
fn test_file_statements_need_a_file_system() {
    use basic::mach::device::channel;
    use basic::mach::{Devices, MemoryStream, Runtime};
    let console = MemoryStream::default();
    let devices = Devices::default().stream(channel::CONSOLE, console.clone());
    let mut runtime = Runtime::new(Config::default(), devices);
    for line in &[r#"DELETE "A""#, "FDISK", "CATALOG"] {
        runtime.enter(line);
        match runtime.execute(100) {
            basic::mach::Event::Errors(e) => assert_eq!(e.to_string(), "BAD FILE NUMBER"),
            e => panic!("{:?}", e),
        }
    }
}
