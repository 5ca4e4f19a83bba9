/*!
# `LOAD "name"`, `LOAD "!"`

## Purpose
Replace the program with one from a file or from the persistent store.

## Remarks
Every line of a file must start with a line number. A store image with
a bad checksum is refused with `?STORE ERROR; CHECKSUM`.

In a running program `LOAD` chains: the new program starts at its
first line and keeps the variables. `RUN "name"` loads and starts
afresh.

## Example
```text
10 A=5
20 LOAD "PART2"
```

*/
