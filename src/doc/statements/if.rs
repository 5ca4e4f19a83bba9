/*!
# `IF x THEN <statement or line> [ELSE <statement or line>]`

## Purpose
Run a statement only when x is not zero.

## Remarks
`THEN` may be left out. A bare line number after `THEN` or `ELSE`
jumps to it. A false condition skips to `ELSE` or the end of the line.

`THEN DO` opens a block that may span lines, closed by `DEND`.
An `ELSE` may follow the `DEND`.

## Example
```text
10 A=0
20 IF A THEN DO
30 PRINT "YES"
40 DEND ELSE PRINT "NO"
RUN
NO
```

*/
