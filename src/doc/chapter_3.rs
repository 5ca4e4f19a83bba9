/*!
# Functions and Special Variables

## Numeric functions

| Function | Result |
|---|---|
| `ABS(x)`, `SGN(x)`, `INT(x)` | Magnitude, sign, floor |
| `SQR(x)`, `POW(x,y)`, `EXP(x)`, `LOG(x)` | Roots, powers, logarithms |
| `SIN(x)`, `COS(x)`, `TAN(x)`, `ATAN(x)` | Trigonometry in radians |
| `RND(n)` | A random number from 0 up to n |
| `PEEK(a)` | A byte of the arena |
| `MILLIS(d)` | Milliseconds since start, divided by d |
| `AVAIL(ch)` | Bytes waiting on a channel |
| `SIZE`, `HIMEM` | Free bytes, and the bottom of the heap |
| `MALLOC(n,size)`, `FIND(v)`, `LEN(v)` | Raw buffers and heap objects |
| `ERROR` | Code of the last trapped error |
| `FN A(x)` | A function made with `DEF FN` |

`SQR` and `LOG` outside their domain report `?ILLEGAL FUNCTION CALL`.

## String functions

| Function | Result |
|---|---|
| `LEN(a$)`, `ASC(a$)`, `VAL(a$)` | Length, first byte, value |
| `INSTR(a$,b$)` | Position of b$ in a$, 0 when absent |
| `LEFT$(a$,n)`, `RIGHT$(a$,n)`, `MID$(a$,i,n)` | Parts |
| `STR$(x)`, `CHR$(x)` | Number as text, one byte |

## Special variables

| Name | Meaning |
|---|---|
| `@I`, `@O` | Input and output channels, 1 is the console and 16 files |
| `@S` | I/O status, 1 after a failed read or open |
| `@R` | Assigning reseeds the random generator |
| `@`, `@(i)` | Free numeric cells, and the cells counted down from `HIMEM` |
| `@T(i)`, `@T$` | Clock fields from seconds (0) to year (6), and the time of day |
| `@E`, `@E(i)` | Size of the store, numbers kept at its end |
| `@A` | Bytes waiting on the input channel |
| `@C` | Reading takes a byte from the input channel, assigning writes one |

*/
