//! Report rendering. One `PairRenderer` consumes the grouped operation
//! batches for a single file pair and produces that pair's report as a byte
//! buffer; the caller decides when and where the buffer is written.

pub mod html;
pub mod text;

use crate::intra;
use crate::loader::{FileData, NUM_PREVIEW_LINES};
use hdiff_common::{CompareOptions, DiffOp, OpKind, ReportStyle};
use std::io::Write;
use std::time::UNIX_EPOCH;

/// File facts shown in report headers.
#[derive(Debug, Clone, Copy)]
pub struct FileInfoLine {
    pub size: u64,
    pub modified_unix: Option<u64>,
}

impl FileInfoLine {
    pub fn from_file(file: &FileData) -> Self {
        Self {
            size: file.size,
            modified_unix: file
                .modified
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs()),
        }
    }
}

fn push_header_cell(buf: &mut Vec<u8>, name: &str, info: Option<FileInfoLine>, unified: bool) {
    buf.extend_from_slice(b"<span class=\"hdr\">");
    html::push_escaped(buf, name.as_bytes());
    buf.extend_from_slice(b"</span>");
    if let Some(info) = info {
        let sep: &[u8] = if unified { b" " } else { b"<br>" };
        buf.extend_from_slice(sep);
        let _ = write!(buf, "<span class=\"inf\">{} bytes", info.size);
        if let Some(mtime) = info.modified_unix {
            let _ = write!(buf, ", mtime {mtime}");
        }
        buf.extend_from_slice(b"</span>");
    }
}

/// Renders the operation batches of one file pair in one of the four
/// report styles. The header is emitted lazily so a pair without changes
/// produces an empty buffer.
pub struct PairRenderer<'a> {
    style: ReportStyle,
    name1: &'a str,
    name2: &'a str,
    info1: Option<FileInfoLine>,
    info2: Option<FileInfoLine>,
    lines1: &'a [&'a [u8]],
    lines2: &'a [&'a [u8]],
    cmp_opts: CompareOptions,
    suppress_line_changes: bool,
    lineno_width: usize,
    header_printed: bool,
    buf: Vec<u8>,
    scratch1: Vec<u8>,
    scratch2: Vec<u8>,
}

impl<'a> PairRenderer<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        style: ReportStyle,
        name1: &'a str,
        name2: &'a str,
        info1: Option<FileInfoLine>,
        info2: Option<FileInfoLine>,
        lines1: &'a [&'a [u8]],
        lines2: &'a [&'a [u8]],
        cmp_opts: CompareOptions,
        suppress_line_changes: bool,
    ) -> Self {
        let lineno_width = lines1.len().max(lines2.len()).to_string().len();
        Self {
            style,
            name1,
            name2,
            info1,
            info2,
            lines1,
            lines2,
            cmp_opts,
            suppress_line_changes,
            lineno_width,
            header_printed: false,
            buf: Vec::new(),
            scratch1: Vec::new(),
            scratch2: Vec::new(),
        }
    }

    pub fn emit_batch(&mut self, ops: &[DiffOp]) {
        match self.style {
            ReportStyle::Html => self.emit_side_by_side(ops),
            ReportStyle::HtmlUnified => self.emit_unified_html(ops),
            ReportStyle::Text => self.emit_text(ops),
            ReportStyle::TextUnified => self.emit_unified_text(ops),
        }
    }

    /// Close any open structure and hand back the pair's report bytes.
    pub fn finish(mut self) -> Vec<u8> {
        if self.header_printed && self.style.is_html() {
            self.buf.extend_from_slice(b"</table><br>\n");
        }
        self.buf
    }

    fn ensure_header(&mut self) {
        if self.header_printed {
            return;
        }
        self.header_printed = true;
        match self.style {
            ReportStyle::Html => {
                self.buf
                    .extend_from_slice(b"<table class=\"tab\"><tr><td class=\"tth\">");
                push_header_cell(&mut self.buf, self.name1, self.info1, false);
                self.buf.extend_from_slice(b"</td><td class=\"tth\">");
                push_header_cell(&mut self.buf, self.name2, self.info2, false);
                self.buf.extend_from_slice(b"</td></tr>");
            }
            ReportStyle::HtmlUnified => {
                self.buf
                    .extend_from_slice(b"<table class=\"tab\"><tr><td class=\"tth\">");
                push_header_cell(&mut self.buf, self.name1, self.info1, true);
                self.buf.extend_from_slice(b"<br>");
                push_header_cell(&mut self.buf, self.name2, self.info2, true);
                self.buf.extend_from_slice(b"</td></tr>");
            }
            ReportStyle::Text => {
                let _ = writeln!(self.buf, "<<< {}", self.name1);
                let _ = writeln!(self.buf, ">>> {}", self.name2);
            }
            ReportStyle::TextUnified => {
                let _ = writeln!(self.buf, "--- {}", self.name1);
                let _ = writeln!(self.buf, "+++ {}", self.name2);
            }
        }
    }

    fn emit_side_by_side(&mut self, ops: &[DiffOp]) {
        self.ensure_header();

        let mut s1 = std::mem::take(&mut self.scratch1);
        let mut s2 = std::mem::take(&mut self.scratch2);
        s1.clear();
        s2.clear();
        let w = self.lineno_width;

        for op in ops {
            match op.kind {
                OpKind::Insert => {
                    html::push_blanks(&mut s1, op.end2 - op.start2);
                    html::push_lines(
                        &mut s2,
                        "add",
                        &self.lines2[op.start2..op.end2],
                        op.start2,
                        w,
                    );
                }
                OpKind::Remove => {
                    html::push_lines(
                        &mut s1,
                        "del",
                        &self.lines1[op.start1..op.end1],
                        op.start1,
                        w,
                    );
                    html::push_blanks(&mut s2, op.end1 - op.start1);
                }
                OpKind::Modify => {
                    s1.extend_from_slice(b"<span class=\"upd\">");
                    s2.extend_from_slice(b"<span class=\"upd\">");

                    let mut i1 = op.start1;
                    let mut i2 = op.start2;
                    while i1 < op.end1 && i2 < op.end2 {
                        html::push_lineno(&mut s1, i1 + 1, w);
                        html::push_lineno(&mut s2, i2 + 1, w);

                        let (line1, line2) = (self.lines1[i1], self.lines2[i2]);
                        if self.suppress_line_changes {
                            html::push_escaped(&mut s1, line1);
                            html::push_escaped(&mut s2, line2);
                        } else {
                            let (lc1, lc2) =
                                intra::line_changes(line1, line2, &self.cmp_opts);
                            html::push_line_change(&mut s1, line1, &lc1.positions, &lc1.change);
                            html::push_line_change(&mut s2, line2, &lc2.positions, &lc2.change);
                        }

                        s1.push(b'\n');
                        s2.push(b'\n');
                        i1 += 1;
                        i2 += 1;
                    }

                    s1.extend_from_slice(b"</span>");
                    s2.extend_from_slice(b"</span>");

                    // the longer side of an uneven modify renders as plain
                    // removes/inserts
                    if i1 < op.end1 {
                        html::push_lines(&mut s1, "del", &self.lines1[i1..op.end1], i1, w);
                        html::push_blanks(&mut s2, op.end1 - i1);
                    }
                    if i2 < op.end2 {
                        html::push_blanks(&mut s1, op.end2 - i2);
                        html::push_lines(&mut s2, "add", &self.lines2[i2..op.end2], i2, w);
                    }
                }
                OpKind::Same => {
                    let n1 = op.end1 - op.start1;
                    let n2 = op.end2 - op.start2;
                    let max_n = n1.max(n2);

                    if n1 > 0 {
                        html::push_lines(
                            &mut s1,
                            "nop",
                            &self.lines1[op.start1..op.end1],
                            op.start1,
                            w,
                        );
                    }
                    if n1 < max_n {
                        html::push_blanks(&mut s1, max_n - n1);
                    }
                    if n2 > 0 {
                        html::push_lines(
                            &mut s2,
                            "nop",
                            &self.lines2[op.start2..op.end2],
                            op.start2,
                            w,
                        );
                    }
                    if n2 < max_n {
                        html::push_blanks(&mut s2, max_n - n2);
                    }
                }
            }
        }

        self.buf.extend_from_slice(b"<tr><td class=\"ttd\">");
        self.buf.extend_from_slice(&s1);
        self.buf.extend_from_slice(b"</td><td class=\"ttd\">");
        self.buf.extend_from_slice(&s2);
        self.buf.extend_from_slice(b"</td></tr>\n");

        self.scratch1 = s1;
        self.scratch2 = s2;
    }

    fn emit_unified_html(&mut self, ops: &[DiffOp]) {
        self.ensure_header();

        let mut s = std::mem::take(&mut self.scratch1);
        s.clear();
        let w = self.lineno_width;

        for op in ops {
            match op.kind {
                OpKind::Insert => {
                    html::push_lines_unified(
                        &mut s,
                        "add",
                        "+",
                        &self.lines2[op.start2..op.end2],
                        None,
                        Some(op.start2),
                        w,
                    );
                }
                OpKind::Remove => {
                    html::push_lines_unified(
                        &mut s,
                        "del",
                        "-",
                        &self.lines1[op.start1..op.end1],
                        Some(op.start1),
                        None,
                        w,
                    );
                }
                OpKind::Modify => {
                    html::push_lines_unified(
                        &mut s,
                        "del",
                        "-",
                        &self.lines1[op.start1..op.end1],
                        Some(op.start1),
                        None,
                        w,
                    );
                    html::push_lines_unified(
                        &mut s,
                        "add",
                        "+",
                        &self.lines2[op.start2..op.end2],
                        None,
                        Some(op.start2),
                        w,
                    );
                }
                OpKind::Same => {
                    html::push_lines_unified(
                        &mut s,
                        "nop",
                        " ",
                        &self.lines1[op.start1..op.end1],
                        Some(op.start1),
                        Some(op.start2),
                        w,
                    );
                }
            }
        }

        self.buf.extend_from_slice(b"<tr><td class=\"ttd\">");
        self.buf.extend_from_slice(&s);
        self.buf.extend_from_slice(b"</td></tr>\n");

        self.scratch1 = s;
    }

    fn emit_text(&mut self, ops: &[DiffOp]) {
        self.ensure_header();

        for op in ops {
            match op.kind {
                OpKind::Same => continue,
                OpKind::Insert => text::push_line_numbers(
                    &mut self.buf,
                    'a',
                    op.start1 as i64 - 1,
                    -1,
                    op.start2 as i64,
                    op.end2 as i64,
                ),
                OpKind::Remove => text::push_line_numbers(
                    &mut self.buf,
                    'd',
                    op.start1 as i64,
                    op.end1 as i64,
                    op.start2 as i64 - 1,
                    -1,
                ),
                OpKind::Modify => text::push_line_numbers(
                    &mut self.buf,
                    'c',
                    op.start1 as i64,
                    op.end1 as i64,
                    op.start2 as i64,
                    op.end2 as i64,
                ),
            }

            for &line in &self.lines1[op.start1..op.end1] {
                text::push_prefixed(&mut self.buf, b"< ", line);
            }
            if op.end1 > op.start1 && op.end2 > op.start2 {
                self.buf.extend_from_slice(b"---\n");
            }
            for &line in &self.lines2[op.start2..op.end2] {
                text::push_prefixed(&mut self.buf, b"> ", line);
            }
        }
    }

    fn emit_unified_text(&mut self, ops: &[DiffOp]) {
        self.ensure_header();

        let (first, last) = match (ops.first(), ops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return,
        };
        let _ = writeln!(
            self.buf,
            "@@ -{},{} +{},{} @@",
            first.start1 + 1,
            last.end1 - first.start1,
            first.start2 + 1,
            last.end2 - first.start2,
        );

        for op in ops {
            match op.kind {
                OpKind::Insert | OpKind::Remove | OpKind::Modify => {
                    for &line in &self.lines1[op.start1..op.end1] {
                        text::push_prefixed(&mut self.buf, b"- ", line);
                    }
                    for &line in &self.lines2[op.start2..op.end2] {
                        text::push_prefixed(&mut self.buf, b"+ ", line);
                    }
                }
                OpKind::Same => {
                    for &line in &self.lines1[op.start1..op.end1] {
                        text::push_prefixed(&mut self.buf, b"  ", line);
                    }
                }
            }
        }
    }
}

/// A non-diff report for one pair: load errors, identical files, missing
/// counterparts (optionally with a content preview of the side that does
/// exist).
pub struct MessageReport<'a> {
    pub style: ReportStyle,
    pub name1: &'a str,
    pub name2: &'a str,
    pub info1: Option<FileInfoLine>,
    pub info2: Option<FileInfoLine>,
    pub msg1: Option<String>,
    pub msg2: Option<String>,
    pub preview1: Option<&'a [&'a [u8]]>,
    pub preview2: Option<&'a [&'a [u8]]>,
    pub is_error: bool,
}

impl MessageReport<'_> {
    pub fn render(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        if !self.style.is_html() {
            let (head1, head2) = match self.style {
                ReportStyle::TextUnified => ("<<<", ">>>"),
                _ => ("---", "+++"),
            };
            let _ = writeln!(
                buf,
                "{} {}: {}",
                head1,
                self.name1,
                self.msg1.as_deref().unwrap_or("")
            );
            let _ = writeln!(
                buf,
                "{} {}: {}\n",
                head2,
                self.name2,
                self.msg2.as_deref().unwrap_or("")
            );
            return buf;
        }

        let span = if self.is_error {
            "<span class=\"err\">"
        } else {
            "<span class=\"msg\">"
        };

        buf.extend_from_slice(b"<table class=\"tab\"><tr><td class=\"tth\">");
        push_header_cell(&mut buf, self.name1, self.info1, false);
        buf.extend_from_slice(b"</td><td class=\"tth\">");
        push_header_cell(&mut buf, self.name2, self.info2, false);
        buf.extend_from_slice(b"</td></tr>");

        buf.extend_from_slice(b"<tr><td class=\"ttd\">");
        Self::push_cell(&mut buf, span, self.msg1.as_deref(), self.preview1);
        buf.extend_from_slice(b"</td><td class=\"ttd\">");
        Self::push_cell(&mut buf, span, self.msg2.as_deref(), self.preview2);
        buf.extend_from_slice(b"</td></tr>\n</table><br>\n");

        buf
    }

    fn push_cell(buf: &mut Vec<u8>, span: &str, msg: Option<&str>, preview: Option<&[&[u8]]>) {
        match msg {
            Some(msg) if !msg.is_empty() => {
                buf.extend_from_slice(span.as_bytes());
                html::push_escaped(buf, msg.as_bytes());
                buf.extend_from_slice(b"</span><br>");
            }
            _ => {
                if let Some(lines) = preview {
                    if !lines.is_empty() {
                        html::push_preview(buf, lines, NUM_PREVIEW_LINES);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines<'a>(text: &[&'a str]) -> Vec<&'a [u8]> {
        text.iter().map(|s| s.as_bytes()).collect()
    }

    fn renderer<'a>(
        style: ReportStyle,
        lines1: &'a [&'a [u8]],
        lines2: &'a [&'a [u8]],
    ) -> PairRenderer<'a> {
        PairRenderer::new(
            style,
            "left.txt",
            "right.txt",
            None,
            None,
            lines1,
            lines2,
            CompareOptions::default(),
            false,
        )
    }

    #[test]
    fn test_no_batches_empty_report() {
        let l1 = lines(&["a"]);
        let l2 = lines(&["a"]);
        let r = renderer(ReportStyle::Html, &l1, &l2);
        assert!(r.finish().is_empty());
    }

    #[test]
    fn test_text_modify_format() {
        let l1 = lines(&["alpha", "beta"]);
        let l2 = lines(&["alpha", "gamma"]);
        let mut r = renderer(ReportStyle::Text, &l1, &l2);
        r.emit_batch(&[DiffOp::new(OpKind::Modify, 1, 2, 1, 2)]);
        let out = String::from_utf8(r.finish()).unwrap();
        assert_eq!(
            out,
            "<<< left.txt\n>>> right.txt\n2c2\n< beta\n---\n> gamma\n"
        );
    }

    #[test]
    fn test_text_insert_format() {
        let l1 = lines(&["a", "c"]);
        let l2 = lines(&["a", "b", "c"]);
        let mut r = renderer(ReportStyle::Text, &l1, &l2);
        r.emit_batch(&[DiffOp::new(OpKind::Insert, 1, 1, 1, 2)]);
        let out = String::from_utf8(r.finish()).unwrap();
        assert_eq!(out, "<<< left.txt\n>>> right.txt\n1a2\n> b\n");
    }

    #[test]
    fn test_unified_text_hunk() {
        let l1 = lines(&["a", "beta", "c"]);
        let l2 = lines(&["a", "gamma", "c"]);
        let mut r = renderer(ReportStyle::TextUnified, &l1, &l2);
        r.emit_batch(&[
            DiffOp::new(OpKind::Same, 0, 1, 0, 1),
            DiffOp::new(OpKind::Modify, 1, 2, 1, 2),
            DiffOp::new(OpKind::Same, 2, 3, 2, 3),
        ]);
        let out = String::from_utf8(r.finish()).unwrap();
        assert_eq!(
            out,
            "--- left.txt\n+++ right.txt\n@@ -1,3 +1,3 @@\n  a\n- beta\n+ gamma\n  c\n"
        );
    }

    #[test]
    fn test_html_side_by_side_modify() {
        let l1 = lines(&["hello world"]);
        let l2 = lines(&["hello there"]);
        let mut r = renderer(ReportStyle::Html, &l1, &l2);
        r.emit_batch(&[DiffOp::new(OpKind::Modify, 0, 1, 0, 1)]);
        let out = String::from_utf8(r.finish()).unwrap();
        assert!(out.starts_with("<table class=\"tab\">"));
        assert!(out.contains("left.txt"));
        assert!(out.contains("<span class=\"upd\">"));
        assert!(out.contains("<span class=\"chg\">"));
        assert!(out.ends_with("</table><br>\n"));
    }

    #[test]
    fn test_html_insert_pads_left_column() {
        let l1 = lines(&["a"]);
        let l2 = lines(&["a", "b"]);
        let mut r = renderer(ReportStyle::Html, &l1, &l2);
        r.emit_batch(&[DiffOp::new(OpKind::Insert, 1, 1, 1, 2)]);
        let out = String::from_utf8(r.finish()).unwrap();
        assert!(out.contains("<span class=\"add\">"));
        // left column gets an empty placeholder row
        assert!(out.contains("<span class=\"lno\"> </span>\n"));
    }

    #[test]
    fn test_html_unified_marks_modes() {
        let l1 = lines(&["x"]);
        let l2 = lines(&["y"]);
        let mut r = renderer(ReportStyle::HtmlUnified, &l1, &l2);
        r.emit_batch(&[DiffOp::new(OpKind::Modify, 0, 1, 0, 1)]);
        let out = String::from_utf8(r.finish()).unwrap();
        assert!(out.contains("<span class=\"del\">"));
        assert!(out.contains("<span class=\"add\">"));
    }

    #[test]
    fn test_message_report_text() {
        let report = MessageReport {
            style: ReportStyle::Text,
            name1: "a",
            name2: "b",
            info1: None,
            info2: None,
            msg1: Some("File does not exist".to_string()),
            msg2: Some("".to_string()),
            preview1: None,
            preview2: None,
            is_error: true,
        };
        let out = String::from_utf8(report.render()).unwrap();
        assert!(out.contains("--- a: File does not exist"));
    }

    #[test]
    fn test_message_report_html_preview() {
        let preview = lines(&["first", "second"]);
        let report = MessageReport {
            style: ReportStyle::Html,
            name1: "a",
            name2: "b",
            info1: None,
            info2: None,
            msg1: None,
            msg2: Some("File does not exist".to_string()),
            preview1: Some(&preview),
            preview2: None,
            is_error: true,
        };
        let out = String::from_utf8(report.render()).unwrap();
        assert!(out.contains("first"));
        assert!(out.contains("<span class=\"err\">File does not exist</span>"));
    }
}
