/*!
# `PRINT [&channel,] [#width,] [<list of expressions>]`

## Purpose
Write values to the console or another channel. `?` is short for
`PRINT`.

## Remarks
Items separated by `;` are printed with nothing between them, `,`
prints one space. A trailing separator suppresses the newline.
Numbers are printed without padding unless `#width` asks for right
alignment. `TAB(n)` prints n spaces.

An item starting with a string is printed as a string, so a string
comparison needs parentheses to print its truth value.

## Example
```text
PRINT 1,2;3
1 23
PRINT #4,12;"|"
  12|
```

*/
