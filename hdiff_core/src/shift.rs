//! Normalizes change chunks after the LCS pass. Sliding a chunk along a run
//! of equal identifiers keeps the edit script minimal, so chunks are moved
//! to merge with neighbours or to land on the best-scoring boundary.

/// Boundary score for intra-line shifting: prefer cutting at whitespace,
/// then at brackets and quotes.
pub fn rune_boundary_score(r1: i64, r2: i64) -> i32 {
    rune_edge_score(r1) + rune_edge_score(r2)
}

fn rune_edge_score(r: i64) -> i32 {
    match u8::try_from(r) {
        Ok(b' ' | b'\t' | 0x0b | 0x0c) => 100,
        Ok(b'<' | b'>' | b'(' | b')' | b'[' | b']' | b'\'' | b'"') => 40,
        _ => 0,
    }
}

/// Move the chunk `[start, end)` by `offset` elements (negative is up).
fn do_shift(mut start: usize, mut end: usize, offset: isize, change: &mut [bool]) {
    let mut offset = offset;
    if offset < 0 {
        while offset != 0 {
            start -= 1;
            end -= 1;
            offset += 1;
            change[start] = true;
            change[end] = false;
        }
    } else {
        while offset != 0 {
            change[start] = false;
            change[end] = true;
            start += 1;
            end += 1;
            offset -= 1;
        }
    }
}

/// For the chunk starting at `start`, find its end, the legal shift ranges
/// in both directions, and whether a full shift merges the chunk with a
/// neighbour (or runs into the array edge).
fn find_shift(
    start: usize,
    data: &[i64],
    change: &[bool],
) -> (usize, usize, usize, bool, bool) {
    let dlen = data.len();
    let mut end = start + 1;
    while end < dlen && change[end] {
        end += 1;
    }

    let mut up = 0;
    while start > up && !change[start - up - 1] && data[start - up - 1] == data[end - up - 1] {
        up += 1;
    }

    let mut down = 0;
    while end + down < dlen && !change[end + down] && data[end + down] == data[start + down] {
        down += 1;
    }

    let up_merge = start - up == 0 || change[start - up - 1];
    let down_merge = end + down == dlen || change[end + down];

    (end, up, down, up_merge, down_merge)
}

/// Walk all change chunks and shift each one per the merge-first rules;
/// `boundary_score` enables the score-driven placement used at rune level.
pub fn shift_boundaries(
    data: &[i64],
    change: &mut [bool],
    boundary_score: Option<fn(i64, i64) -> i32>,
) {
    let clen = change.len();
    let mut start = 0;

    while start < clen {
        while start < clen && !change[start] {
            start += 1;
        }
        if start >= clen {
            break;
        }

        let (end, mut up, mut down, up_merge, down_merge) = find_shift(start, data, change);

        // a chunk flush against the array start stays put
        if start == 0 {
            up = 0;
            down = 0;
        }

        if up > 0 && up_merge {
            do_shift(start, end, -(up as isize), change);
            // rescan from the top of the merged chunk; it may merge again
            let mut new_start = start - up;
            while new_start > 0 && change[new_start - 1] {
                new_start -= 1;
            }
            if new_start > 0 {
                start = new_start;
            }
        } else if down > 0 && down_merge {
            do_shift(start, end, down as isize, change);
            start += down;
        } else if (up > 0 || down > 0) && boundary_score.is_some() {
            let score_fn = boundary_score.unwrap_or(rune_boundary_score);
            let mut best_offset = 0isize;
            let mut best_score = score_fn(data[start], data[end - 1]);
            let mut i = -(up as isize);
            while i <= down as isize {
                if i != 0 {
                    let s = score_fn(
                        data[(start as isize + i) as usize],
                        data[(end as isize + i - 1) as usize],
                    );
                    if s > best_score {
                        best_offset = i;
                        best_score = s;
                    }
                }
                i += 1;
            }
            if best_offset != 0 {
                do_shift(start, end, best_offset, change);
            }
            start = end;
            if best_offset > 0 {
                start += best_offset as usize;
            }
        } else {
            start = end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_equal_run_no_shift() {
        let data = vec![1, 2, 3, 4];
        let mut change = vec![false, true, false, false];
        shift_boundaries(&data, &mut change, None);
        assert_eq!(change, vec![false, true, false, false]);
    }

    #[test]
    fn test_merge_down() {
        // deleting either of the two equal 2s is minimal; shifting down
        // merges the chunk with the next one
        let data = vec![1, 2, 2, 3, 4];
        let mut change = vec![false, true, false, true, false];
        shift_boundaries(&data, &mut change, None);
        assert_eq!(change, vec![false, false, true, true, false]);
    }

    #[test]
    fn test_merge_up_restarts() {
        let data = vec![1, 3, 2, 2, 4];
        let mut change = vec![false, true, false, true, false];
        shift_boundaries(&data, &mut change, None);
        // the second chunk slides up to join the first
        assert_eq!(change, vec![false, true, true, false, false]);
    }

    #[test]
    fn test_chunk_at_start_stays() {
        let data = vec![2, 2, 3];
        let mut change = vec![true, false, false];
        shift_boundaries(&data, &mut change, None);
        assert_eq!(change, vec![true, false, false]);
    }

    #[test]
    fn test_score_ties_keep_zero_offset() {
        // single char deleted out of an equal run: every offset scores the
        // same, so the chunk stays where the LCS left it
        let data: Vec<i64> = " aab".chars().map(|c| c as i64).collect();
        let mut change = vec![false, true, false, false];
        shift_boundaries(&data, &mut change, Some(rune_boundary_score));
        assert_eq!(change, vec![false, true, false, false]);
    }

    #[test]
    fn test_score_picks_best_offset() {
        // "b c" repeated: the chunk can sit at offsets 0..3; offset 1 puts
        // a space on the chunk edge and wins
        let data: Vec<i64> = "qb cb cw".chars().map(|c| c as i64).collect();
        let mut change = vec![false, true, true, true, false, false, false, false];
        shift_boundaries(&data, &mut change, Some(rune_boundary_score));
        assert_eq!(
            change,
            vec![false, false, true, true, true, false, false, false]
        );
    }
}
