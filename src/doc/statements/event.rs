/*!
# `EVENT pin, mode GOTO|GOSUB line`

## Purpose
Run a handler when the host raises an interrupt pin.

## Remarks
Pins run from 0 to 63 and mode from 0 to 3. `EVENT pin` forgets a pin.
Up to four pins are watched and served in turn. While an event
subroutine runs further events wait, `RETURN` releases them.
`EVENT STOP` holds all events and `EVENT CONT` releases them.

## Example
```text
10 EVENT 3,1 GOSUB 100
20 GOTO 20
100 PRINT "PIN":RETURN
```

*/
