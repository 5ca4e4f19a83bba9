/*!
# Statements

A line holds one or more statements separated by colons. Typed without
a line number, a line runs at once; with one, it is stored in the
program. Typing a line number alone deletes that line.

Besides the pages below, the dialect has these statements.

| Statement | Action |
|---|---|
| `LET v=x` or `v=x` | Assign a variable, array element or string slice |
| `DIM A(n[,m])`, `DIM A$(len[,count])` | Reserve an array or a string |
| `CLR [v]` | Forget all variables, or one variable and everything newer |
| `DATA`, `READ`, `RESTORE [line]` | Constants stored in the program |
| `DEF FN A(X)=x` | A one-line function, program mode only |
| `GOTO line`, `ON n GOTO l1,l2` | Jump |
| `END`, `STOP`, `CONT` | Stop, and resume where stopped |
| `RUN [line]`, `RUN "name"` | Start the program afresh |
| `NEW` | Erase program and variables |
| `LIST [a][,[b]]` | Show program lines |
| `GET [&ch,] v`, `PUT [&ch,] x[,y...]` | Single bytes |
| `POKE a,b` | Write a byte of the arena |
| `DELAY ms` | Wait, yielding to the host |
| `TRON`, `TROFF` | Print each line number as it runs |
| `CATALOG`, `DELETE`, `OPEN`, `CLOSE`, `FDISK` | Files |
| `REM` | The rest of the line is a remark |

*/

#[path = "statements/after.rs"]
#[allow(non_snake_case)]
pub mod AFTER;

#[path = "statements/error.rs"]
#[allow(non_snake_case)]
pub mod ERROR;

#[path = "statements/event.rs"]
#[allow(non_snake_case)]
pub mod EVENT;

#[path = "statements/for.rs"]
#[allow(non_snake_case)]
pub mod FOR;

#[path = "statements/gosub.rs"]
#[allow(non_snake_case)]
pub mod GOSUB;

#[path = "statements/if.rs"]
#[allow(non_snake_case)]
pub mod IF;

#[path = "statements/input.rs"]
#[allow(non_snake_case)]
pub mod INPUT;

#[path = "statements/load.rs"]
#[allow(non_snake_case)]
pub mod LOAD;

#[path = "statements/print.rs"]
#[allow(non_snake_case)]
pub mod PRINT;

#[path = "statements/save.rs"]
#[allow(non_snake_case)]
pub mod SAVE;

#[path = "statements/switch.rs"]
#[allow(non_snake_case)]
pub mod SWITCH;

#[path = "statements/while.rs"]
#[allow(non_snake_case)]
pub mod WHILE;
