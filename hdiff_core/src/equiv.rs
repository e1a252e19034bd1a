//! Assigns each line a numeric equivalence-class identifier, then shrinks
//! the identifier sequences before they reach the LCS engine: common head
//! and tail are trimmed, and runs of lines with no counterpart on the other
//! side collapse into single synthetic entries.

use crate::compare::LineCmp;
use tracing::debug;

const BLANK_LINE: &[u8] = b"";

/// Per-side pipeline state for one comparison.
#[derive(Debug, Default)]
pub struct LinesData {
    /// Identifier per original line; equal ids mean equivalent lines.
    pub ids: Vec<i64>,
    /// Change flag per original line (the pipeline's output).
    pub change: Vec<bool>,
    /// Compressed identifier sequence handed to the LCS engine. Empty when
    /// the trim pass already settled the whole comparison.
    pub z_ids: Vec<i64>,
    /// Original-line count each `z_ids` slot stands for.
    pub z_counts: Vec<usize>,
    /// Range of `ids` the compression applies to; the head and tail outside
    /// it were trimmed.
    pub zids_start: usize,
    pub zids_end: usize,
}

struct EquivNode<'a> {
    id: i64,
    hash: u32,
    line: &'a [u8],
    next: Option<usize>,
}

/// Build identifier arrays for both sides and compress them.
///
/// Lines hash into a bucket array keyed on `hash & (buckets - 1)`; each
/// bucket chains nodes holding the precomputed hash so a lookup only falls
/// back to the (possibly expensive) equality check on a hash match.
pub fn find_equiv_lines(lines1: &[&[u8]], lines2: &[&[u8]], cmp: &LineCmp) -> (LinesData, LinesData) {
    let mut info1 = LinesData {
        ids: vec![0; lines1.len()],
        change: vec![false; lines1.len()],
        ..Default::default()
    };
    let mut info2 = LinesData {
        ids: vec![0; lines2.len()],
        change: vec![false; lines2.len()],
        ..Default::default()
    };

    // power-of-two bucket count, load factor under 0.5
    let mut buckets = 1usize << 9;
    while buckets < (lines1.len() + lines2.len()) * 2 {
        buckets <<= 1;
    }

    let mut table: Vec<Option<usize>> = vec![None; buckets];
    let mut nodes: Vec<EquivNode> = Vec::new();

    // id 0 is reserved for blank lines; change reporting skips them later
    if cmp.options().ignore_blank_lines {
        let hash = cmp.line_hash(BLANK_LINE);
        let slot = (hash as usize) & (buckets - 1);
        nodes.push(EquivNode {
            id: 0,
            hash,
            line: BLANK_LINE,
            next: None,
        });
        table[slot] = Some(0);
    }

    let mut next_id: i64 = 1;
    let mut max_id1 = 0;
    let mut max_id2 = 0;

    for side in 0..2 {
        let (lines, ids) = if side == 0 {
            (lines1, &mut info1.ids)
        } else {
            (lines2, &mut info2.ids)
        };

        for (i, &line) in lines.iter().enumerate() {
            let hash = cmp.line_hash(line);
            let slot = (hash as usize) & (buckets - 1);

            let mut found = None;
            let mut cursor = table[slot];
            while let Some(ix) = cursor {
                let node = &nodes[ix];
                if node.hash == hash && cmp.lines_equal(line, node.line) {
                    found = Some(node.id);
                    break;
                }
                cursor = node.next;
            }

            match found {
                Some(id) => ids[i] = id,
                None => {
                    ids[i] = next_id;
                    nodes.push(EquivNode {
                        id: next_id,
                        hash,
                        line,
                        next: table[slot],
                    });
                    table[slot] = Some(nodes.len() - 1);
                    next_id += 1;
                }
            }
        }

        if side == 0 {
            max_id1 = next_id - 1;
        } else {
            max_id2 = next_id - 1;
        }
    }

    debug!(
        lines1 = lines1.len(),
        lines2 = lines2.len(),
        classes = next_id - 1,
        "assigned equivalence ids"
    );

    compress_equiv_ids(&mut info1, &mut info2, max_id1, max_id2);

    (info1, info2)
}

/// Trim the identifier arrays and collapse one-side-only runs.
///
/// A run of identifiers absent from the other side cannot take part in any
/// LCS match, so replacing it with one synthetic entry preserves the LCS
/// while shrinking the problem. The synthetic entry can never match either,
/// so the LCS pass flags it and the expander spreads the flag back over the
/// collapsed lines.
fn compress_equiv_ids(lines1: &mut LinesData, lines2: &mut LinesData, max_id1: i64, max_id2: i64) {
    let (len1, len2) = (lines1.ids.len(), lines2.ids.len());

    let mut has_ids1 = vec![false; (max_id1 + 1) as usize];
    let mut has_ids2 = vec![false; (max_id2 + 1) as usize];
    for &v in &lines1.ids {
        has_ids1[v as usize] = true;
    }
    for &v in &lines2.ids {
        has_ids2[v as usize] = true;
    }

    // trim matching lines from the front; one-side-only lines are consumed
    // and flagged changed as the cursors move
    let (mut i1, mut i2) = (0, 0);
    while i1 < len1 && i2 < len2 {
        let (v1, v2) = (lines1.ids[i1], lines2.ids[i2]);
        if v1 > max_id2 || !has_ids2[v1 as usize] {
            lines1.change[i1] = true;
            i1 += 1;
        } else if v2 > max_id1 || !has_ids1[v2 as usize] {
            lines2.change[i2] = true;
            i2 += 1;
        } else if v1 == v2 {
            i1 += 1;
            i2 += 1;
        } else {
            break;
        }
    }

    // same from the tail
    let (mut j1, mut j2) = (len1, len2);
    while i1 < j1 && i2 < j2 {
        let (v1, v2) = (lines1.ids[j1 - 1], lines2.ids[j2 - 1]);
        if v1 > max_id2 || !has_ids2[v1 as usize] {
            j1 -= 1;
            lines1.change[j1] = true;
        } else if v2 > max_id1 || !has_ids1[v2 as usize] {
            j2 -= 1;
            lines2.change[j2] = true;
        } else if v1 == v2 {
            j1 -= 1;
            j2 -= 1;
        } else {
            break;
        }
    }

    // one side exhausted: whatever is left on the other side changed, and
    // the LCS engine has nothing to do
    if i1 == j1 {
        for flag in lines2.change[i2..j2].iter_mut() {
            *flag = true;
        }
        return;
    }
    if i2 == j2 {
        for flag in lines1.change[i1..j1].iter_mut() {
            *flag = true;
        }
        return;
    }

    lines1.zids_start = i1;
    lines1.zids_end = j1;
    lines2.zids_start = i2;
    lines2.zids_end = j2;

    // synthetic ids sit above both sides' maxima and are negated so they
    // can never collide with a real id
    let mut synth_id = max_id1.max(max_id2) + 1;

    for side in 0..2 {
        let (info, has_other, max_other) = if side == 0 {
            (&mut *lines1, &has_ids2, max_id2)
        } else {
            (&mut *lines2, &has_ids1, max_id1)
        };

        let range = info.zids_start..info.zids_end;
        let mut z_ids = Vec::with_capacity(range.len());
        let mut z_counts = Vec::with_capacity(range.len());

        let mut last_excluded = false;
        for &v in &info.ids[range.clone()] {
            let excluded = v > max_other || !has_other[v as usize];
            if excluded && last_excluded {
                let last = z_counts.len() - 1;
                z_counts[last] += 1;
                z_ids[last] = -synth_id;
                synth_id += 1;
            } else if excluded {
                z_ids.push(-v);
                z_counts.push(1);
            } else {
                z_ids.push(v);
                z_counts.push(1);
            }
            last_excluded = excluded;
        }

        info.z_ids = z_ids;
        info.z_counts = z_counts;
    }
}

/// Invert the collapse: spread the compressed change flags back over the
/// original lines between `zids_start` and `zids_end`.
pub fn expand_change_list(
    info1: &mut LinesData,
    info2: &mut LinesData,
    z_change1: &[bool],
    z_change2: &[bool],
) {
    for side in 0..2 {
        let (info, z_change) = if side == 0 {
            (&mut *info1, z_change1)
        } else {
            (&mut *info2, z_change2)
        };

        let change = &mut info.change[info.zids_start..];
        let mut n = 0;
        for (i, &count) in info.z_counts.iter().enumerate() {
            if z_change[i] {
                for flag in change[n..n + count].iter_mut() {
                    *flag = true;
                }
            }
            n += count;
        }
    }
}
