/*!
# `FOR <variable>=x [TO y] [STEP z]`

## Purpose
Repeat the statements up to the matching `NEXT` while counting a
variable from x to y.

## Remarks
The variable gets x, then y and z are evaluated once. `STEP` defaults
to 1 and may be negative. When the variable already lies past y the
body is skipped and execution continues after the matching `NEXT`,
so a loop can run zero times.

`NEXT` adds the step and jumps back to the statement after `FOR`
unless the limit has been passed. `NEXT` may name the variable; frames
of inner loops with other variables are discarded until it matches.

Starting a `FOR` on a variable that already has a loop frame replaces
that frame. Leaving a loop with `GOTO` is allowed.

`BREAK` leaves the innermost loop at once. `CONT` inside a loop skips
to its next iteration.

## Example
```text
10 FOR I=10 TO 1 STEP -4
20 PRINT I;
30 NEXT I
RUN
1062
```

*/
