use hdiff_common::CompareOptions;

/// Decode one code point from the head of `s`. Malformed UTF-8 yields the
/// replacement character and advances a single byte so callers always make
/// progress.
pub(crate) fn decode_rune(s: &[u8]) -> (char, usize) {
    let take = s.len().min(4);
    let prefix = match std::str::from_utf8(&s[..take]) {
        Ok(text) => text,
        Err(err) => {
            let valid = err.valid_up_to();
            if valid == 0 {
                return (char::REPLACEMENT_CHARACTER, 1);
            }
            // the slice up to valid_up_to re-validates cleanly
            match std::str::from_utf8(&s[..valid]) {
                Ok(text) => text,
                Err(_) => return (char::REPLACEMENT_CHARACTER, 1),
            }
        }
    };
    match prefix.chars().next() {
        Some(c) => (c, c.len_utf8()),
        None => (char::REPLACEMENT_CHARACTER, 1),
    }
}

/// Single-rune lowercase fold; multi-char expansions keep their first char.
pub(crate) fn to_lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Split a line into per-code-point byte offsets and normalized comparison
/// codes. `positions` has one extra trailing entry holding the line length,
/// so `positions[i]..positions[i + 1]` are the bytes of code `i`.
pub fn split_runes(line: &[u8], opts: &CompareOptions) -> (Vec<usize>, Vec<i64>) {
    let mut positions = Vec::with_capacity(line.len() + 1);
    let mut codes = Vec::with_capacity(line.len());

    let mut i = 0;
    while i < line.len() {
        positions.push(i);
        let b = line[i];
        let code = if b < 0x80 {
            i += 1;
            if opts.ignore_case {
                if opts.unicode {
                    to_lower(b as char) as i64
                } else {
                    b.to_ascii_lowercase() as i64
                }
            } else {
                b as i64
            }
        } else {
            let (r, size) = decode_rune(&line[i..]);
            i += size;
            if opts.ignore_case && opts.unicode {
                to_lower(r) as i64
            } else {
                r as i64
            }
        };
        codes.push(code);
    }
    positions.push(i);

    (positions, codes)
}
