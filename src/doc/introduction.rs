/*!
# Introductory Tutorial

Start the executable in a terminal. A program flagged to run at start
in the store file `basic.eep` runs first; otherwise you get the prompt.
Type CTRL-D to leave.
<pre><code>&nbsp;  READY.
&nbsp;> █
</code></pre>

A line typed without a number runs at once.

<pre><code>&nbsp;> print "Hello World"
&nbsp;  Hello World
</code></pre>

A line starting with a number is stored in the program instead. The
number decides the order; typing the number alone deletes the line.

<pre><code>&nbsp;> 10 for i=1to 3:print i;:next
&nbsp;> 20 print
&nbsp;> list
&nbsp;  10 FOR I=1 TO 3: PRINT I;: NEXT
&nbsp;  20 PRINT
&nbsp;> run
&nbsp;  123
</code></pre>

Keywords are stored as single bytes, so `LIST` shows them in capitals
with its own spacing.

A running program stops on CTRL-C or when `#` is typed. `CONT` picks up
where it stopped.

<pre><code>&nbsp;> 10 i=i+1:goto 10
&nbsp;> run
&nbsp;<i>{CTRL-C}</i>
&nbsp;  <b>?BREAK IN 10</b>
&nbsp;  READY.
&nbsp;> print i
&nbsp;  2417
&nbsp;> cont
</code></pre>

Programs are kept two ways. `SAVE "name"` writes the listing to a file
in the current directory, `LOAD "name"` reads it back. `SAVE "!"` puts
the encoded program into the store and `SET 1,1` makes it run at start.

<pre><code>&nbsp;> save "!"
&nbsp;> set 1,1
</code></pre>

Give a file name on the command line to run that program and exit.

*/
