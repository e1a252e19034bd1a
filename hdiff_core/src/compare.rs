use crate::runes::{decode_rune, to_lower};
use hdiff_common::CompareOptions;

/// Line equality and hashing under one set of comparison options.
///
/// `lines_equal` and `line_hash` are mutually consistent: equal lines always
/// hash to the same value, because the hash is fed exactly the byte/code
/// point stream the equality walk considers meaningful.
#[derive(Debug, Clone)]
pub struct LineCmp {
    opts: CompareOptions,
}

/// ASCII whitespace as far as line comparison is concerned. Line
/// terminators never appear inside a split line.
pub(crate) fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == 0x0b || b == 0x0c
}

fn push_byte(hash: u32, b: u8) -> u32 {
    crc32c::crc32c_append(hash, &[b])
}

/// Hash a code point byte-by-byte from low to high until zero.
fn push_rune(hash: u32, r: char) -> u32 {
    let mut hash = hash;
    let mut v = r as u32;
    while v != 0 {
        hash = push_byte(hash, v as u8);
        v >>= 8;
    }
    hash
}

fn skip_space_bytes(line: &[u8], mut i: usize) -> usize {
    while i < line.len() {
        if !is_space(line[i]) {
            return i;
        }
        i += 1;
    }
    i
}

/// Next byte plus the position after any whitespace run following it.
fn next_byte_nonspace(line: &[u8], i: usize) -> (u8, usize) {
    (line[i], skip_space_bytes(line, i + 1))
}

/// Next byte, whether a whitespace run follows it, and the position after
/// that run. A run that reaches end-of-line does not count.
fn next_byte_xspace(line: &[u8], i: usize) -> (u8, bool, usize) {
    let b = line[i];
    let mut i = i + 1;
    let mut space_after = false;
    while i < line.len() {
        if !is_space(line[i]) {
            break;
        }
        space_after = true;
        i += 1;
    }
    if space_after && i >= line.len() {
        space_after = false;
    }
    (b, space_after, i)
}

fn skip_space_runes(line: &[u8], mut i: usize) -> usize {
    while i < line.len() {
        let (r, size) = decode_rune(&line[i..]);
        if !r.is_whitespace() {
            return i;
        }
        i += size;
    }
    i
}

fn next_rune_nonspace(line: &[u8], i: usize) -> (char, usize) {
    let (r, size) = decode_rune(&line[i..]);
    (r, skip_space_runes(line, i + size))
}

fn next_rune_xspace(line: &[u8], i: usize) -> (char, bool, usize) {
    let (r, size) = decode_rune(&line[i..]);
    let mut i = i + size;
    let mut space_after = false;
    while i < line.len() {
        let (s, size) = decode_rune(&line[i..]);
        if !s.is_whitespace() {
            break;
        }
        space_after = true;
        i += size;
    }
    if space_after && i >= line.len() {
        space_after = false;
    }
    (r, space_after, i)
}

impl LineCmp {
    pub fn new(opts: CompareOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &CompareOptions {
        &self.opts
    }

    pub fn lines_equal(&self, line1: &[u8], line2: &[u8]) -> bool {
        if self.opts.is_exact() {
            line1 == line2
        } else if self.opts.unicode {
            self.equal_runes(line1, line2)
        } else {
            self.equal_bytes(line1, line2)
        }
    }

    pub fn line_hash(&self, line: &[u8]) -> u32 {
        if self.opts.is_exact() {
            crc32c::crc32c(line)
        } else if self.opts.unicode {
            self.hash_runes(line)
        } else {
            self.hash_bytes(line)
        }
    }

    fn equal_bytes(&self, line1: &[u8], line2: &[u8]) -> bool {
        let (len1, len2) = (line1.len(), line2.len());

        if self.opts.ignore_all_space {
            let mut i = skip_space_bytes(line1, 0);
            let mut j = skip_space_bytes(line2, 0);
            while i < len1 && j < len2 {
                let (mut v1, ni) = next_byte_nonspace(line1, i);
                let (mut v2, nj) = next_byte_nonspace(line2, j);
                i = ni;
                j = nj;
                if self.opts.ignore_case && v1 != v2 {
                    v1 = v1.to_ascii_lowercase();
                    v2 = v2.to_ascii_lowercase();
                }
                if v1 != v2 {
                    return false;
                }
            }
            i >= len1 && j >= len2
        } else if self.opts.ignore_space_change {
            let mut i = skip_space_bytes(line1, 0);
            let mut j = skip_space_bytes(line2, 0);
            while i < len1 && j < len2 {
                let (mut v1, space1, ni) = next_byte_xspace(line1, i);
                let (mut v2, space2, nj) = next_byte_xspace(line2, j);
                i = ni;
                j = nj;
                if self.opts.ignore_case && v1 != v2 {
                    v1 = v1.to_ascii_lowercase();
                    v2 = v2.to_ascii_lowercase();
                }
                if v1 != v2 || space1 != space2 {
                    return false;
                }
            }
            i >= len1 && j >= len2
        } else {
            // ignore_case only: lengths gate first
            if len1 != len2 {
                return false;
            }
            line1
                .iter()
                .zip(line2.iter())
                .all(|(&a, &b)| a.to_ascii_lowercase() == b.to_ascii_lowercase())
        }
    }

    fn equal_runes(&self, line1: &[u8], line2: &[u8]) -> bool {
        let (len1, len2) = (line1.len(), line2.len());

        if self.opts.ignore_all_space {
            let mut i = skip_space_runes(line1, 0);
            let mut j = skip_space_runes(line2, 0);
            while i < len1 && j < len2 {
                let (mut v1, ni) = next_rune_nonspace(line1, i);
                let (mut v2, nj) = next_rune_nonspace(line2, j);
                i = ni;
                j = nj;
                if self.opts.ignore_case && v1 != v2 {
                    v1 = to_lower(v1);
                    v2 = to_lower(v2);
                }
                if v1 != v2 {
                    return false;
                }
            }
            i >= len1 && j >= len2
        } else if self.opts.ignore_space_change {
            let mut i = skip_space_runes(line1, 0);
            let mut j = skip_space_runes(line2, 0);
            while i < len1 && j < len2 {
                let (mut v1, space1, ni) = next_rune_xspace(line1, i);
                let (mut v2, space2, nj) = next_rune_xspace(line2, j);
                i = ni;
                j = nj;
                if self.opts.ignore_case && v1 != v2 {
                    v1 = to_lower(v1);
                    v2 = to_lower(v2);
                }
                if v1 != v2 || space1 != space2 {
                    return false;
                }
            }
            i >= len1 && j >= len2
        } else {
            // byte length gates, code points advance independently
            if len1 != len2 {
                return false;
            }
            let (mut i, mut j) = (0, 0);
            while i < len1 && j < len2 {
                let (v1, size1) = decode_rune(&line1[i..]);
                let (v2, size2) = decode_rune(&line2[j..]);
                if v1 != v2 && to_lower(v1) != to_lower(v2) {
                    return false;
                }
                i += size1;
                j += size2;
            }
            i >= len1 && j >= len2
        }
    }

    fn hash_bytes(&self, line: &[u8]) -> u32 {
        let mut hash = 0u32;

        if self.opts.ignore_all_space {
            for &b in line {
                if !is_space(b) {
                    let v = if self.opts.ignore_case {
                        b.to_ascii_lowercase()
                    } else {
                        b
                    };
                    hash = push_byte(hash, v);
                }
            }
        } else if self.opts.ignore_space_change {
            // A space run contributes one ' ', unless the run turns out to
            // be trailing; then the pre-run state is restored.
            let mut last_hash = hash;
            let mut last_space = true;
            for &b in line {
                if is_space(b) {
                    if !last_space {
                        last_hash = hash;
                        hash = push_byte(hash, b' ');
                    }
                    last_space = true;
                } else {
                    let v = if self.opts.ignore_case {
                        b.to_ascii_lowercase()
                    } else {
                        b
                    };
                    hash = push_byte(hash, v);
                    last_space = false;
                }
            }
            if last_space {
                hash = last_hash;
            }
        } else {
            for &b in line {
                hash = push_byte(hash, b.to_ascii_lowercase());
            }
        }
        hash
    }

    fn hash_runes(&self, line: &[u8]) -> u32 {
        let mut hash = 0u32;
        let mut i = 0;
        let len = line.len();

        if self.opts.ignore_all_space {
            while i < len {
                let (mut v, size) = decode_rune(&line[i..]);
                i += size;
                if !v.is_whitespace() {
                    if self.opts.ignore_case {
                        v = to_lower(v);
                    }
                    hash = push_rune(hash, v);
                }
            }
        } else if self.opts.ignore_space_change {
            let mut last_hash = hash;
            let mut last_space = true;
            while i < len {
                let (mut v, size) = decode_rune(&line[i..]);
                i += size;
                if v.is_whitespace() {
                    if !last_space {
                        last_hash = hash;
                        hash = push_byte(hash, b' ');
                    }
                    last_space = true;
                } else {
                    if self.opts.ignore_case {
                        v = to_lower(v);
                    }
                    hash = push_rune(hash, v);
                    last_space = false;
                }
            }
            if last_space {
                hash = last_hash;
            }
        } else {
            while i < len {
                let (v, size) = decode_rune(&line[i..]);
                i += size;
                hash = push_rune(hash, to_lower(v));
            }
        }
        hash
    }
}
