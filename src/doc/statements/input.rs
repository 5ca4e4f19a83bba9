/*!
# `INPUT [&channel,] ["prompt";] <variable>[, ...]`

## Purpose
Read values from the operator, or from an open file on channel 16.

## Remarks
Without a prompt the console shows `? `. One line is read and split
at commas for numeric variables. A string variable takes the whole
line. Text that is not a number stores 0 and sets the status `@S`.

## Example
```text
INPUT "NAME";N$
NAME? SAM
PRINT N$
SAM
```

*/
