/*!
# `GOSUB <line number>`

## Purpose
Call a subroutine. `RETURN` comes back to the statement after the
`GOSUB`.

## Remarks
The line number may be an expression. Return locations are kept on a
bounded stack; nesting too deep stops the program with
`?STACK OVERFLOW; GOSUB`. `ON n GOSUB l1,l2,...` picks a line by
position and falls through when n is out of range.

## Example
```text
10 FOR I=1 TO 3
20 ON I GOSUB 100,200
30 NEXT
40 END
100 PRINT "A";:RETURN
200 PRINT "B";:RETURN
RUN
AB
```

*/
