//! Sanitizing remote strings before they reach the terminal.
//!
//! Record ids, content refs and resolved documents come from third-party
//! services. Escape sequences embedded in them could clear the screen, move the
//! cursor or retitle the window, so everything shown by the TUI or printed by
//! the CLI passes through [`strip_ansi_codes`] first.

/// Remove CSI (`ESC [ ... letter`) and OSC (`ESC ] ... BEL|ESC \`) sequences and
/// control characters other than tab, newline and carriage return.
///
/// ```
/// use snapshot_timeline::utils::terminal::strip_ansi_codes;
///
/// assert_eq!(strip_ansi_codes("\x1b[31malpha.eth\x1b[0m"), "alpha.eth");
/// assert_eq!(strip_ansi_codes("\x1b]0;pwned\x07title"), "title");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    for next in chars.by_ref() {
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '\x07' {
                            break;
                        }
                        if next == '\x1b' && chars.next_if_eq(&'\\').is_some() {
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }
        out.push(ch);
    }

    out
}

/// Sanitize and fold onto one line, for list rows and status text
pub fn single_line(text: &str) -> String {
    strip_ansi_codes(text)
        .split(['\n', '\r', '\t'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_color_and_cursor_sequences() {
        assert_eq!(strip_ansi_codes("\x1b[1m\x1b[31mBold\x1b[0m text"), "Bold text");
        assert_eq!(strip_ansi_codes("\x1b[2J\x1b[H cleared"), " cleared");
    }

    #[test]
    fn test_strips_osc_with_either_terminator() {
        assert_eq!(strip_ansi_codes("a\x1b]2;title\x07b"), "ab");
        assert_eq!(strip_ansi_codes("a\x1b]8;;http://x\x1b\\b"), "ab");
    }

    #[test]
    fn test_drops_bell_and_backspace_keeps_whitespace() {
        assert_eq!(strip_ansi_codes("ring\x07\x08"), "ring");
        assert_eq!(strip_ansi_codes("a\nb\rc\td"), "a\nb\rc\td");
    }

    #[test]
    fn test_unicode_survives() {
        assert_eq!(strip_ansi_codes("gm 👋 \x1b[32mdao\x1b[0m"), "gm 👋 dao");
        assert_eq!(strip_ansi_codes(""), "");
    }

    #[test]
    fn test_single_line_folds_whitespace() {
        assert_eq!(single_line("first\nsecond\r\nthird"), "first second third");
    }
}
