/*!
# `WHILE x` ... `WEND`, `REPEAT` ... `UNTIL x`

## Purpose
Loops tested at the top or at the bottom.

## Remarks
`WHILE` skips past the matching `WEND` when x is zero. `WEND` tests
x again and goes round or falls through. `REPEAT` always runs its body
once and `UNTIL` ends the loop when x is not zero.

Matching is done by scanning forward and counting nested loops of the
same kind. A missing `WEND` reports `?MISSING BLOCK END`.

## Example
```text
10 I=0
20 WHILE I<3
30 I=I+1:PRINT I;
40 WEND
RUN
123
```

*/
