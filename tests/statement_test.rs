mod common;
use common::*;

#[test]
fn test_print_separators() {
    let mut h = Host::new();
    assert_eq!(run_line(&mut h, r#"PRINT 1,2;3"#), "1 23\n");
    assert_eq!(run_line(&mut h, r#"?"A";:?"B""#), "AB\n");
    assert_eq!(run_line(&mut h, r#"PRINT #4,12;"|""#), "  12|\n");
    assert_eq!(run_line(&mut h, r#"PRINT "X";TAB(3);"Y""#), "X   Y\n");
}

#[test]
fn test_for_loop() {
    let mut h = Host::new();
    h.program(&["10 FOR I=1 TO 3", "20 PRINT I", "30 NEXT I", "RUN"]);
    assert_eq!(exec(&mut h), "1\n2\n3\n");
}

#[test]
fn test_for_loop_with_step_and_zero_trips() {
    let mut h = Host::new();
    assert_eq!(run_line(&mut h, "FOR I=10 TO 1 STEP -4:PRINT I;:NEXT:PRINT"), "1062\n");
    h.program(&[
        "10 FOR I=5 TO 1",
        "20 PRINT \"NEVER\"",
        "30 NEXT I",
        "40 PRINT \"DONE\";I",
        "RUN",
    ]);
    assert_eq!(exec(&mut h), "DONE5\n");
}

#[test]
fn test_nested_loops_and_goto_out() {
    let mut h = Host::new();
    h.program(&[
        "10 FOR Y=1 TO 2",
        "20 FOR X=8 TO 9",
        "30 PRINT Y;X",
        "40 GOTO 60",
        "50 NEXT X",
        "60 NEXT Y",
        "RUN",
    ]);
    assert_eq!(exec(&mut h), "18\n28\n");
}

#[test]
fn test_break_and_cont_in_loops() {
    let mut h = Host::new();
    h.program(&[
        "10 FOR I=1 TO 9",
        "20 IF I=2 THEN CONT",
        "30 IF I=4 THEN BREAK",
        "40 PRINT I;",
        "50 NEXT",
        "60 PRINT \"/\";I",
        "RUN",
    ]);
    assert_eq!(exec(&mut h), "13/4\n");
}

#[test]
fn test_while_wend() {
    let mut h = Host::new();
    h.program(&[
        "10 I=0",
        "20 WHILE I<3",
        "30 I=I+1:PRINT I;",
        "40 WEND",
        "50 WHILE 0:PRINT \"NO\":WEND",
        "60 PRINT",
        "RUN",
    ]);
    assert_eq!(exec(&mut h), "123\n");
}

#[test]
fn test_repeat_until() {
    let mut h = Host::new();
    h.program(&["10 I=0", "20 REPEAT", "30 I=I+2", "40 UNTIL I>=6", "50 PRINT I", "RUN"]);
    assert_eq!(exec(&mut h), "6\n");
}

#[test]
fn test_switch_case() {
    let mut h = Host::new();
    h.program(&[
        "10 FOR I=1 TO 4",
        "20 SWITCH I",
        "30 CASE 1:PRINT \"ONE\";",
        "40 CASE 2,3:PRINT \"FEW\";",
        "50 SWEND",
        "60 PRINT \".\";",
        "70 NEXT",
        "RUN",
    ]);
    assert_eq!(exec(&mut h), "ONE.FEW.FEW..");
}

#[test]
fn test_if_then_else() {
    let mut h = Host::new();
    assert_eq!(run_line(&mut h, r#"IF 1 THEN PRINT "ONE""#), "ONE\n");
    assert_eq!(run_line(&mut h, r#"IF 0 THEN PRINT "ONE" ELSE PRINT "TWO""#), "TWO\n");
    assert_eq!(run_line(&mut h, r#"IF 1 THEN PRINT "ONE" ELSE PRINT "TWO""#), "ONE\n");
    assert_eq!(run_line(&mut h, r#"IF 0 THEN PRINT "ONE":PRINT 2"#), "");
    h.program(&["10 IF 1 THEN 30", "20 PRINT \"SKIPPED\"", "30 PRINT \"HERE\"", "RUN"]);
    assert_eq!(exec(&mut h), "HERE\n");
}

#[test]
fn test_if_do_block() {
    let mut h = Host::new();
    h.program(&[
        "10 A=0",
        "20 IF A THEN DO",
        "30 PRINT \"YES\"",
        "40 DEND ELSE PRINT \"NO\"",
        "50 PRINT \"END\"",
        "RUN",
    ]);
    assert_eq!(exec(&mut h), "NO\nEND\n");
}

#[test]
fn test_gosub_return_and_on() {
    let mut h = Host::new();
    h.program(&[
        "10 FOR I=1 TO 3",
        "20 ON I GOSUB 100,200",
        "30 NEXT",
        "40 END",
        "100 PRINT \"A\";:RETURN",
        "200 PRINT \"B\";:RETURN",
        "RUN",
    ]);
    assert_eq!(exec(&mut h), "AB");
}

#[test]
fn test_data_read_restore() {
    let mut h = Host::new();
    h.program(&[
        "10 DATA 1,-2",
        "20 DATA \"X\"",
        "30 READ A,B,C$",
        "40 PRINT A;B;C$",
        "50 RESTORE 20",
        "60 READ D$:PRINT D$",
        "70 READ E",
        "RUN",
    ]);
    assert_eq!(exec(&mut h), "1-2X\nX\n?OUT OF DATA IN 70\n");
}

#[test]
fn test_def_fn() {
    let mut h = Host::new();
    h.program(&[
        "10 DEF FN S(X)=X*X+1",
        "20 X=7",
        "30 PRINT FN S(3);X",
        "RUN",
    ]);
    assert_eq!(exec(&mut h), "107\n");
    assert_eq!(run_line(&mut h, "PRINT FN S(2)"), "5\n");
    assert_eq!(run_line(&mut h, "DEF FN Q(X)=1"), "?ILLEGAL DIRECT\n");
}

#[test]
fn test_arrays() {
    let mut h = Host::new();
    assert_eq!(run_line(&mut h, "DIM A(3,2):A(3,2)=5:A(1,1)=1:PRINT A(3,2)+A(1,1)"), "6\n");
    assert_eq!(run_line(&mut h, "PRINT A(4,1)"), "?SUBSCRIPT OUT OF RANGE\n");
    assert_eq!(run_line(&mut h, "B(10)=2:PRINT B(10)"), "2\n");
    assert_eq!(run_line(&mut h, "PRINT B(11)"), "?SUBSCRIPT OUT OF RANGE\n");
    assert_eq!(run_line(&mut h, "DIM A(2)"), "?DUPLICATE VARIABLE\n");
}

#[test]
fn test_strings() {
    let mut h = Host::new();
    assert_eq!(run_line(&mut h, r#"A$="HELLO":PRINT A$;LEN(A$)"#), "HELLO5\n");
    assert_eq!(run_line(&mut h, r#"PRINT A$(2,3);A$(4)"#), "ELLO\n");
    assert_eq!(run_line(&mut h, r#"A$(1,1)="J":PRINT A$"#), "JELLO\n");
    assert_eq!(run_line(&mut h, r#"B$=A$+" "+"WORLD"+33:PRINT B$"#), "JELLO WORLD!\n");
    assert_eq!(run_line(&mut h, r#"DIM C$(3):C$="ABCD""#), "?STRING TOO LONG\n");
}

#[test]
fn test_string_arrays() {
    let mut h = Host::new();
    h.enter(r#"DIM N$(5,3):N$()(1)="AB":N$()(3)="CDE""#);
    assert_eq!(exec(&mut h), "");
    assert_eq!(run_line(&mut h, r#"PRINT N$()(1);N$()(2);N$()(3)"#), "ABCDE\n");
}

#[test]
fn test_string_functions() {
    let mut h = Host::new();
    assert_eq!(
        run_line(&mut h, r#"PRINT LEFT$("ABCD",2);RIGHT$("ABCD",1);MID$("ABCD",2,2)"#),
        "ABDBC\n"
    );
    assert_eq!(run_line(&mut h, r#"PRINT STR$(12);CHR$(65);ASC("B")"#), "12A66\n");
    assert_eq!(run_line(&mut h, r#"PRINT VAL("2.5")*2;INSTR("HELLO","LL")"#), "53\n");
}

#[test]
fn test_input() {
    let mut h = Host::new();
    h.console.feed("3,4\nSAM\n");
    assert_eq!(
        run_line(&mut h, r#"INPUT A,B:INPUT "NAME";N$:PRINT A+B;N$"#),
        "? NAME7SAM\n"
    );
}

#[test]
fn test_get_and_put() {
    let mut h = Host::new();
    h.console.feed("Z");
    assert_eq!(run_line(&mut h, "GET C:PUT C,10"), "Z\n");
    assert_eq!(run_line(&mut h, "GET D:PRINT D"), "0\n");
}

#[test]
fn test_clr() {
    let mut h = Host::new();
    assert_eq!(run_line(&mut h, "B=2:A=1:CLR A:PRINT A;B"), "02\n");
    assert_eq!(run_line(&mut h, "CLR:PRINT B"), "0\n");
    assert_eq!(run_line(&mut h, "X=1:Y=2:CLR X:PRINT X;Y"), "00\n");
}

#[test]
fn test_list() {
    let mut h = Host::new();
    h.program(&["10 for i=1to 3", "20 print i;:next", "30 rem  done"]);
    assert_eq!(
        run_line(&mut h, "LIST"),
        "10 FOR I=1 TO 3\n20 PRINT I;: NEXT\n30 REM  done\n"
    );
    assert_eq!(run_line(&mut h, "LIST 20"), "20 PRINT I;: NEXT\n");
    assert_eq!(run_line(&mut h, "LIST 20,"), "20 PRINT I;: NEXT\n30 REM  done\n");
}

#[test]
fn test_new_and_line_delete() {
    let mut h = Host::new();
    h.program(&["10 PRINT 1", "20 PRINT 2", "10"]);
    assert_eq!(run_line(&mut h, "RUN"), "2\n");
    h.enter("NEW");
    assert_eq!(exec(&mut h), "");
    assert_eq!(run_line(&mut h, "LIST"), "");
}

#[test]
fn test_stop_and_cont() {
    let mut h = Host::new();
    h.program(&["10 PRINT 1", "20 STOP", "30 PRINT 2", "RUN"]);
    assert_eq!(exec(&mut h), "1\n");
    assert_eq!(run_line(&mut h, "CONT"), "2\n");
    assert_eq!(run_line(&mut h, "CONT"), "?CAN'T CONTINUE\n");
}

#[test]
fn test_run_from_line() {
    let mut h = Host::new();
    h.program(&["10 PRINT 1", "20 PRINT 2"]);
    assert_eq!(run_line(&mut h, "RUN 20"), "2\n");
}

#[test]
fn test_trace() {
    let mut h = Host::new();
    h.program(&["10 A=1", "20 PRINT A", "TRON"]);
    assert_eq!(exec(&mut h), "");
    h.enter("RUN");
    assert_eq!(exec(&mut h), "[10][20]1\n");
}

#[test]
fn test_special_variables() {
    let mut h = Host::new();
    assert_eq!(run_line(&mut h, "PRINT @I;@O"), "11\n");
    assert_eq!(run_line(&mut h, "@S=1:PRINT @S;:@S=0:PRINT @S"), "10\n");
    assert_eq!(run_line(&mut h, "PRINT @E"), "1024\n");
    assert_eq!(run_line(&mut h, "@E(1)=2.5:PRINT @E(1)"), "2.5\n");
}

#[test]
fn test_peek_poke() {
    let mut h = Host::new();
    assert_eq!(run_line(&mut h, "POKE 100,7:PRINT PEEK(100)"), "7\n");
    assert_eq!(run_line(&mut h, "POKE 100,256"), "?ILLEGAL FUNCTION CALL\n");
}

#[derive(Default)]
struct FixedClock {
    fields: [i32; 7],
}

impl basic::mach::device::Clock for FixedClock {
    fn get(&mut self, field: basic::mach::device::ClockField) -> i32 {
        self.fields[field as usize]
    }
    fn set(&mut self, field: basic::mach::device::ClockField, value: i32) {
        self.fields[field as usize] = value;
    }
}

#[test]
fn test_clock_variables() {
    use basic::mach::device::channel;
    use basic::mach::{Config, Devices, MemoryStream, Runtime};
    let console = MemoryStream::default();
    let devices = Devices::default()
        .stream(channel::CONSOLE, console.clone())
        .clock(FixedClock::default());
    let mut runtime = Runtime::new(Config::default(), devices);
    runtime.enter("@T(2)=9:@T(1)=5:@T(0)=7:@T(6)=2024:PRINT @T$;@T(6)");
    while runtime.execute(100) == basic::mach::Event::Running {}
    assert_eq!(console.take_output(), "09:05:072024\n");
}

#[test]
fn test_free_memory_cells() {
    let mut h = Host::new();
    assert_eq!(run_line(&mut h, "PRINT @"), "16384\n");
    assert_eq!(run_line(&mut h, "@(1)=3:PRINT @(1);@(1)=PEEK(0)"), "30\n");
    assert_eq!(run_line(&mut h, "PRINT @(0)"), "?SUBSCRIPT OUT OF RANGE\n");
}
