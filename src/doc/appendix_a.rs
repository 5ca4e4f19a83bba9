/*!
# Errors

An error stops the program and is reported with `?`, the line it
happened in and sometimes a detail after a semicolon.

```text
?DIVISION BY ZERO IN 20
?STACK OVERFLOW IN 10; GOSUB
?STORE ERROR; CHECKSUM
```

| Code | Message |
|---|---|
| 0 | BREAK |
| 1 | NEXT WITHOUT FOR |
| 2 | SYNTAX ERROR |
| 3 | RETURN WITHOUT GOSUB |
| 4 | OUT OF DATA |
| 5 | ILLEGAL FUNCTION CALL |
| 6 | OVERFLOW |
| 7 | OUT OF MEMORY |
| 8 | UNDEFINED LINE |
| 9 | SUBSCRIPT OUT OF RANGE |
| 10 | DUPLICATE VARIABLE |
| 11 | DIVISION BY ZERO |
| 12 | ILLEGAL DIRECT |
| 13 | TYPE MISMATCH |
| 15 | STRING TOO LONG |
| 16 | STACK OVERFLOW |
| 17 | CAN'T CONTINUE |
| 18 | UNDEFINED USER FUNCTION |
| 19 | UNKNOWN VARIABLE |
| 26 | MISSING BLOCK END |
| 30 | WEND WITHOUT WHILE |
| 31 | UNTIL WITHOUT REPEAT |
| 51 | INTERNAL ERROR |
| 52 | BAD FILE NUMBER |
| 53 | FILE NOT FOUND |
| 57 | DISK I/O ERROR |
| 70 | STORE ERROR |

A `BREAK` leaves the program resumable with `CONT`. Other errors in a
program clear the stacks, stop the timers and forget where to continue.

*/
