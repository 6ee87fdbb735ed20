use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Index(usize),
    Quit,
}

/// Ask for an index into a list of `len` entries until the answer is valid.
///
/// End of input counts as quitting.
pub fn prompt_selection<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    len: usize,
    allow_quit: bool,
) -> io::Result<Selection> {
    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Selection::Quit);
        }
        let answer = line.trim();

        if allow_quit && answer.eq_ignore_ascii_case("q") {
            return Ok(Selection::Quit);
        }

        if answer.is_empty() || !answer.chars().all(|c| c.is_ascii_digit()) {
            if allow_quit {
                writeln!(output, "Enter a number or 'q'.")?;
            } else {
                writeln!(output, "Enter a number.")?;
            }
            continue;
        }

        match answer.parse::<usize>() {
            Ok(idx) if idx < len => return Ok(Selection::Index(idx)),
            _ => writeln!(output, "Index out of range.")?,
        }
    }
}

/// Block until the operator presses Enter. Returns false when input ended
/// instead.
pub fn wait_for_enter<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<bool> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    let mut line = String::new();
    Ok(input.read_line(&mut line)? > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str, len: usize, allow_quit: bool) -> (Selection, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let selection = prompt_selection(&mut reader, &mut out, "> ", len, allow_quit).unwrap();
        (selection, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_valid_index() {
        let (selection, out) = run("1\n", 2, false);
        assert_eq!(selection, Selection::Index(1));
        assert_eq!(out, "> ");
    }

    #[test]
    fn test_reprompts_on_bad_input() {
        let (selection, out) = run("abc\n5\n0\n", 2, false);
        assert_eq!(selection, Selection::Index(0));
        assert!(out.contains("Enter a number.\n"));
        assert!(out.contains("Index out of range.\n"));
        assert_eq!(out.matches("> ").count(), 3);
    }

    #[test]
    fn test_quit() {
        assert_eq!(run("Q\n", 2, true).0, Selection::Quit);
        let (selection, out) = run("x\nq\n", 2, true);
        assert_eq!(selection, Selection::Quit);
        assert!(out.contains("Enter a number or 'q'."));
    }

    #[test]
    fn test_q_is_not_quit_when_disallowed() {
        let (selection, out) = run("q\n0\n", 1, false);
        assert_eq!(selection, Selection::Index(0));
        assert!(out.contains("Enter a number."));
    }

    #[test]
    fn test_eof_quits() {
        assert_eq!(run("", 3, false).0, Selection::Quit);
    }

    #[test]
    fn test_wait_for_enter() {
        let mut out = Vec::new();
        let mut reader = Cursor::new(b"\n".to_vec());
        assert!(wait_for_enter(&mut reader, &mut out, "Go").unwrap());
        // Input is used up now
        assert!(!wait_for_enter(&mut reader, &mut out, "Go").unwrap());
        assert_eq!(out, b"GoGo");
    }
}
