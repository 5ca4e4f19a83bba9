/*!
# `SAVE "name"`, `SAVE "!"`

## Purpose
Keep the program in a file, or in the persistent store.

## Remarks
A file gets the program as listed by `LIST`. The name `!` writes the
encoded program to the store with a checksum. `SET 1,1` then marks it
to run when the machine starts and `SET 1,0` clears the mark; saving
again keeps the mark.

## Example
```text
SAVE "!"
SET 1,1
```

*/
