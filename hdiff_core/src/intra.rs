//! Character-level diff of one modified line pair: the same LCS engine run
//! over code points, with the rune boundary score making the change spans
//! land on token edges.

use crate::lcs::diff_ids;
use crate::runes::split_runes;
use crate::shift::{rune_boundary_score, shift_boundaries};
use hdiff_common::CompareOptions;

/// Per-side result: byte offset per code point (plus one trailing entry for
/// the line length) and a change flag per code point.
#[derive(Debug)]
pub struct LineChanges {
    pub positions: Vec<usize>,
    pub change: Vec<bool>,
}

/// Compute within-line change flags for an aligned pair of modified lines.
pub fn line_changes(
    line1: &[u8],
    line2: &[u8],
    opts: &CompareOptions,
) -> (LineChanges, LineChanges) {
    let (pos1, codes1) = split_runes(line1, opts);
    let (pos2, codes2) = split_runes(line2, opts);

    let (mut change1, mut change2) = diff_ids(&codes1, &codes2);

    shift_boundaries(&codes1, &mut change1, Some(rune_boundary_score));
    shift_boundaries(&codes2, &mut change2, Some(rune_boundary_score));

    (
        LineChanges {
            positions: pos1,
            change: change1,
        },
        LineChanges {
            positions: pos2,
            change: change2,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed(flags: &[bool]) -> Vec<usize> {
        flags
            .iter()
            .enumerate()
            .filter(|(_, &c)| c)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_word_replacement() {
        let opts = CompareOptions::default();
        let (c1, c2) = line_changes(b"hello world", b"hello there", &opts);
        // the shared 'r' of world/there stays unchanged
        assert_eq!(changed(&c1.change), vec![6, 7, 9, 10]);
        assert_eq!(changed(&c2.change), vec![6, 7, 8, 10]);
        assert_eq!(c1.positions.len(), 12);
        assert_eq!(c2.positions.len(), 12);
    }

    #[test]
    fn test_equal_lines_no_changes() {
        let opts = CompareOptions::default();
        let (c1, c2) = line_changes(b"same", b"same", &opts);
        assert!(changed(&c1.change).is_empty());
        assert!(changed(&c2.change).is_empty());
    }

    #[test]
    fn test_insertion_hugs_space() {
        let opts = CompareOptions::default();
        // inserting " new" into "a b" vs "a new b": the inserted span can
        // sit at several offsets along the repeated ' '; the boundary score
        // pins it to a whitespace edge
        let (c1, c2) = line_changes(b"a b", b"a new b", &opts);
        assert!(changed(&c1.change).is_empty());
        let ins = changed(&c2.change);
        assert_eq!(ins.len(), 4);
        // span is contiguous
        for w in ins.windows(2) {
            assert_eq!(w[1], w[0] + 1);
        }
    }

    #[test]
    fn test_case_fold_in_codes() {
        let opts = CompareOptions {
            ignore_case: true,
            ..Default::default()
        };
        let (c1, c2) = line_changes(b"ABC", b"abc", &opts);
        assert!(changed(&c1.change).is_empty());
        assert!(changed(&c2.change).is_empty());
    }

    #[test]
    fn test_multibyte_positions_track_bytes() {
        let opts = CompareOptions::default();
        let (c1, _) = line_changes("a\u{e9}z".as_bytes(), b"az", &opts);
        assert_eq!(c1.positions, vec![0, 1, 3, 4]);
        assert_eq!(changed(&c1.change), vec![1]);
    }
}
