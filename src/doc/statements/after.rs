/*!
# `AFTER ms GOTO|GOSUB line`, `EVERY ms GOTO|GOSUB line`

## Purpose
Run a handler once after a delay, or every time an interval passes.

## Remarks
Timers are checked between statements of a running program. At most
one timer or event is served at each check. An interval of 0 stops the
timer and leaving out the action re-arms the last one. Errors and `RUN`
stop both timers.

## Example
```text
10 EVERY 1000 GOSUB 100
20 GOTO 20
100 PRINT MILLIS(1):RETURN
```

*/
