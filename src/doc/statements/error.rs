/*!
# `ERROR GOTO line`, `ERROR CONT`, `ERROR STOP`

## Purpose
Trap errors in a running program.

## Remarks
`ERROR GOTO` jumps to a handler once; the handler must set it again to
catch the next error. `ERROR CONT` skips the failing statement and
carries on. `ERROR STOP` reports errors again. The function `ERROR`
returns the code of the last trapped error.

## Example
```text
10 ERROR GOTO 100
20 A=1/0
100 PRINT "TRAPPED";ERROR
RUN
TRAPPED11
```

*/
