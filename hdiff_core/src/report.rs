//! Walks the per-line change flags of both sides and emits grouped edit
//! operations with surrounding context through a caller-supplied callback.

use hdiff_common::{DiffOp, OpKind};

/// Find the end of the change run starting at `start`, and the sub-range
/// that remains after trimming identifier-0 (blank) lines off both ends.
/// Returns `(run_end, trimmed_start, trimmed_end)`.
fn next_change_segment(start: usize, change: &[bool], data: &[i64]) -> (usize, usize, usize) {
    let mut end = start + 1;
    while end < change.len() && change[end] {
        end += 1;
    }

    let mut i = start;
    let mut j = end;
    while i < end && data[i] == 0 {
        i += 1;
    }
    while j > i && data[j - 1] == 0 {
        j -= 1;
    }

    (end, i, j)
}

/// Accumulates operations and flushes them in self-describing groups: each
/// group carries up to `context` leading and trailing unchanged lines, and
/// a gap longer than `2 * context` on both sides starts a new group.
struct OpGrouper<'a, F: FnMut(&[DiffOp])> {
    ops: Vec<DiffOp>,
    context: usize,
    emit: &'a mut F,
}

impl<'a, F: FnMut(&[DiffOp])> OpGrouper<'a, F> {
    fn new(context: usize, emit: &'a mut F) -> Self {
        Self {
            ops: Vec::with_capacity(16),
            context,
            emit,
        }
    }

    fn last_ends(&self) -> (usize, usize) {
        self.ops.last().map_or((0, 0), |op| (op.end1, op.end2))
    }

    fn push(&mut self, op: DiffOp) {
        let (last1, last2) = self.last_ends();

        if !self.ops.is_empty()
            && op.start1 - last1 > self.context * 2
            && op.start2 - last2 > self.context * 2
        {
            self.flush(op.start1, op.start2);
        }

        let (last1, last2) = self.last_ends();
        let c1 = op.start1.saturating_sub(self.context).max(last1);
        let c2 = op.start2.saturating_sub(self.context).max(last2);
        if c1 < op.start1 || c2 < op.start2 {
            self.ops
                .push(DiffOp::new(OpKind::Same, c1, op.start1, c2, op.start2));
        }

        self.ops.push(op);
    }

    /// Emit the pending group with its trailing context, clipped to the
    /// next change (or the end of both sides).
    fn flush(&mut self, limit1: usize, limit2: usize) {
        let (last1, last2) = self.last_ends();
        let e1 = limit1.min(last1 + self.context);
        let e2 = limit2.min(last2 + self.context);
        if e1 > last1 || e2 > last2 {
            self.ops.push(DiffOp::new(OpKind::Same, last1, e1, last2, e2));
        }
        (self.emit)(&self.ops);
        self.ops.clear();
    }

    fn finish(mut self, len1: usize, len2: usize) {
        if !self.ops.is_empty() {
            self.flush(len1, len2);
        }
    }
}

/// Walk both change arrays in lockstep and emit grouped operations.
/// Returns whether any change was reported.
pub fn report_diff<F: FnMut(&[DiffOp])>(
    data1: &[i64],
    data2: &[i64],
    change1: &[bool],
    change2: &[bool],
    context: usize,
    emit: &mut F,
) -> bool {
    let (len1, len2) = (change1.len(), change2.len());
    let (mut i1, mut i2) = (0, 0);
    let mut grouper = OpGrouper::new(context, emit);
    let mut changed = false;

    while i1 < len1 || i2 < len2 {
        if i1 < len1 && i2 < len2 && !change1[i1] && !change2[i2] {
            i1 += 1;
            i2 += 1;
        } else if i1 < len1 && i2 < len2 && change1[i1] && change2[i2] {
            let (n1, m1start, m1end) = next_change_segment(i1, change1, data1);
            let (n2, m2start, m2end) = next_change_segment(i2, change2, data2);
            i1 = n1;
            i2 = n2;

            let kind = if m1start < m1end && m2start < m2end {
                Some(OpKind::Modify)
            } else if m1start < m1end {
                Some(OpKind::Remove)
            } else if m2start < m2end {
                Some(OpKind::Insert)
            } else {
                None
            };
            if let Some(kind) = kind {
                grouper.push(DiffOp::new(kind, m1start, m1end, m2start, m2end));
                changed = true;
            }
        } else if i1 < len1 && change1[i1] {
            let (n1, m1start, m1end) = next_change_segment(i1, change1, data1);
            i1 = n1;
            if m1start < m1end {
                grouper.push(DiffOp::new(OpKind::Remove, m1start, m1end, i2, i2));
                changed = true;
            }
        } else if i2 < len2 && change2[i2] {
            let (n2, m2start, m2end) = next_change_segment(i2, change2, data2);
            i2 = n2;
            if m2start < m2end {
                grouper.push(DiffOp::new(OpKind::Insert, i1, i1, m2start, m2end));
                changed = true;
            }
        } else {
            // one side exhausted and the other unchanged: consume it
            if i1 < len1 {
                i1 += 1;
            } else {
                i2 += 1;
            }
        }
    }

    grouper.finish(len1, len2);
    changed
}
