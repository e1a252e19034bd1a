//! Plain-text change line formatting shared by the text renderers.

use std::io::Write;

/// Classic `NcM`-style change line. An end of `-1` (or a one-line range)
/// prints a single line number; otherwise `start,end`. Starts are 0-based
/// here and printed 1-based.
pub fn push_line_numbers(
    buf: &mut Vec<u8>,
    mode: char,
    start1: i64,
    end1: i64,
    start2: i64,
    end2: i64,
) {
    if end1 < 0 || end1 - start1 == 1 {
        let _ = write!(buf, "{}{}", start1 + 1, mode);
    } else {
        let _ = write!(buf, "{},{}{}", start1 + 1, end1, mode);
    }
    if end2 < 0 || end2 - start2 == 1 {
        let _ = writeln!(buf, "{}", start2 + 1);
    } else {
        let _ = writeln!(buf, "{},{}", start2 + 1, end2);
    }
}

/// One content line with a prefix such as `"< "` or `"+ "`.
pub fn push_prefixed(buf: &mut Vec<u8>, prefix: &[u8], line: &[u8]) {
    buf.extend_from_slice(prefix);
    buf.extend_from_slice(line);
    buf.push(b'\n');
}
