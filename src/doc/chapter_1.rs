/*!
# Expressions and Types

There is one numeric type, a 32-bit float. Built with integer mode on,
numbers have no fractions and `/` truncates.

Variable names are a letter and an optional letter or digit. A run of
three or more letters must be a keyword, so `COUNT` is a syntax error.
Keywords are found at the start of a run of letters, `FORI` is `FOR I`.

```text
A=1.5
X1=A*2
```

Strings are byte strings. `A$` holds up to 32 bytes unless `DIM A$(n)`
reserves another size. Parts of a string are addressed with one or two
indices, counted from 1.

```text
A$="HELLO"
PRINT A$(2,3)
EL
A$(1,1)="J"
```

Arrays have one or two dimensions. An array used before `DIM` gets 10
elements. Indices start at 1.

```text
DIM B(3,2)
B(3,2)=5
```

String arrays are dimensioned with the string length first and the
element count second and are addressed as `N$()(i)`.

## Operators

From lowest to highest precedence:

| Operators | Meaning |
|---|---|
| `OR` | Bitwise or of the integer parts |
| `AND` | Bitwise and |
| `NOT` | True (-1) when zero |
| `= <> < <= > >=` | Comparisons, -1 for true and 0 for false |
| `+ -` | Addition, subtraction |
| `* / %` | Multiplication, division, remainder |
| `-` | Negation, so `-2^2` is -4 and `2*-3` is -6 |
| `^` | Power, left to right |

Strings compare with `=` and `<>` inside `IF` and in parenthesized
expressions. Adding a number to a string appends that byte.

Expressions are evaluated on a bounded stack. Very deep nesting reports
`?STACK OVERFLOW; EXPRESSION`.

*/
