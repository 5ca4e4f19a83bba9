/*!
# `SWITCH x` ... `CASE a[,b...]` ... `SWEND`

## Purpose
Pick one of several blocks by value.

## Remarks
Execution continues after the first `CASE` listing the value. Reaching
the next `CASE` leaves the switch. With no match execution continues
after the `SWITCH` line.

## Example
```text
20 SWITCH I
30 CASE 1:PRINT "ONE"
40 CASE 2,3:PRINT "FEW"
50 SWEND
```

*/
