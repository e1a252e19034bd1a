//! Byte-level HTML emission. Lines are raw byte slices that may contain
//! invalid UTF-8, so escaping works on bytes and passes everything else
//! through untouched.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

pub const HTML_HEADER: &str = "<!doctype html><html><head>\n\
<meta http-equiv=\"content-type\" content=\"text/html;charset=utf-8\">";

pub const HTML_CSS: &str = r#"<style type="text/css">
.tab {border-color:#808080; border-style:solid; border-width:1px 1px 1px 1px; border-collapse:collapse;}
.tth {border-color:#808080; border-style:solid; border-width:1px 1px 1px 1px; border-collapse:collapse; padding:4px; vertical-align:top; text-align:left; background-color:#E0E0E0;}
.ttd {border-color:#808080; border-style:solid; border-width:1px 1px 1px 1px; border-collapse:collapse; padding:4px; vertical-align:top; text-align:left;}
.hdr {color:black; font-size:85%;}
.inf {color:#C08000; font-size:85%;}
.err {color:red; font-size:85%; font-weight:bold; margin:0;}
.msg {color:#508050; font-size:85%; font-weight:bold; margin:0;}
.lno {color:#C08000; background-color:white; font-style:italic; margin:0;}
.nop {color:black; font-size:75%; font-family:monospace; white-space:pre; margin:0; display:block;}
.upd {color:black; font-size:75%; font-family:monospace; white-space:pre; margin:0; background-color:#CFCFFF; display:block;}
.emp {color:black; font-size:75%; font-family:monospace; white-space:pre; margin:0; background-color:#E0E0E0; display:block;}
.add {color:black; font-size:75%; font-family:monospace; white-space:pre; margin:0; background-color:#CFFFCF; display:block;}
.del {color:black; font-size:75%; font-family:monospace; white-space:pre; margin:0; background-color:#FFCFCF; display:block;}
.chg {color:#C00080; background-color:#AFAFDF;}
</style>"#;

pub const HTML_LEGEND: &str = r#"<br><b>Legend:</b><br><table class="tab">
<tr><td class="tth"><span class="hdr">filename 1</span></td><td class="tth"><span class="hdr">filename 2</span></td></tr>
<tr><td class="ttd">
<span class="del"><span class="lno">1 </span>line deleted</span>
<span class="nop"><span class="lno">2 </span>no change</span>
<span class="upd"><span class="lno">3 </span>line modified</span>
</td>
<td class="ttd">
<span class="add"><span class="lno">1 </span>line added</span>
<span class="nop"><span class="lno">2 </span>no change</span>
<span class="upd"><span class="lno">3 </span><span class="chg">L</span>ine <span class="chg">M</span>modified</span>
</td></tr>
</table>
"#;

/// Append `line` with the five special characters replaced by entities.
pub fn push_escaped(buf: &mut Vec<u8>, line: &[u8]) {
    let mut last = 0;
    for (i, &b) in line.iter().enumerate() {
        let esc: &[u8] = match b {
            b'<' => b"&lt;",
            b'>' => b"&gt;",
            b'&' => b"&amp;",
            b'\'' => b"&#39;",
            b'"' => b"&#34;",
            _ => continue,
        };
        buf.extend_from_slice(&line[last..i]);
        buf.extend_from_slice(esc);
        last = i + 1;
    }
    buf.extend_from_slice(&line[last..]);
}

/// Whole-run HTML prologue: document head, styles and the compared names.
pub fn run_prologue(buf: &mut Vec<u8>, name1: &str, name2: &str) {
    buf.extend_from_slice(HTML_HEADER.as_bytes());
    buf.extend_from_slice(b"<title>Compare ");
    push_escaped(buf, name1.as_bytes());
    buf.extend_from_slice(b" vs ");
    push_escaped(buf, name2.as_bytes());
    buf.extend_from_slice(b"</title>\n");
    buf.extend_from_slice(HTML_CSS.as_bytes());
    buf.extend_from_slice(b"</head><body>\n<p>Compare <strong>");
    push_escaped(buf, name1.as_bytes());
    buf.extend_from_slice(b"</strong> vs <strong>");
    push_escaped(buf, name2.as_bytes());
    buf.extend_from_slice(b"</strong></p>\n");
}

/// Whole-run HTML epilogue: generation stamp, legend, closing tags.
pub fn run_epilogue(buf: &mut Vec<u8>) {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let _ = write!(buf, "Generated at unix time {now}<br>");
    buf.extend_from_slice(HTML_LEGEND.as_bytes());
    buf.extend_from_slice(b"</body></html>\n");
}

/// `<span class="lno">` line number cell; zero means an empty cell.
pub fn push_lineno(buf: &mut Vec<u8>, lineno: usize, width: usize) {
    if lineno > 0 {
        let _ = write!(buf, "<span class=\"lno\">{lineno:<width$} </span>");
    } else {
        buf.extend_from_slice(b"<span class=\"lno\"> </span>");
    }
}

/// Double line number cell for the unified layout, plus the change marker.
pub fn push_lineno_unified(
    buf: &mut Vec<u8>,
    mode: &str,
    lineno1: usize,
    lineno2: usize,
    width: usize,
) {
    buf.extend_from_slice(b"<span class=\"lno\">");
    if lineno1 > 0 {
        let _ = write!(buf, "{lineno1:<width$}");
    } else {
        let _ = write!(buf, "{:<width$}", "");
    }
    if lineno2 > 0 {
        let _ = write!(buf, " {lineno2:<width$} ");
    } else {
        let _ = write!(buf, " {:<width$} ", "");
    }
    buf.extend_from_slice(mode.as_bytes());
    buf.extend_from_slice(b" </span>");
}

/// A run of numbered lines inside one styling span.
pub fn push_lines(
    buf: &mut Vec<u8>,
    class: &str,
    lines: &[&[u8]],
    mut lineno: usize,
    width: usize,
) {
    buf.extend_from_slice(b"<span class=\"");
    buf.extend_from_slice(class.as_bytes());
    buf.extend_from_slice(b"\">");
    for &line in lines {
        lineno += 1;
        push_lineno(buf, lineno, width);
        push_escaped(buf, line);
        buf.push(b'\n');
    }
    buf.extend_from_slice(b"</span>");
}

/// A run of lines in the unified layout; a side passes `None` when it has
/// no numbering for this run.
pub fn push_lines_unified(
    buf: &mut Vec<u8>,
    class: &str,
    mode: &str,
    lines: &[&[u8]],
    start1: Option<usize>,
    start2: Option<usize>,
    width: usize,
) {
    let mut n1 = start1;
    let mut n2 = start2;
    buf.extend_from_slice(b"<span class=\"");
    buf.extend_from_slice(class.as_bytes());
    buf.extend_from_slice(b"\">");
    for &line in lines {
        if let Some(n) = n1.as_mut() {
            *n += 1;
        }
        if let Some(n) = n2.as_mut() {
            *n += 1;
        }
        push_lineno_unified(buf, mode, n1.unwrap_or(0), n2.unwrap_or(0), width);
        push_escaped(buf, line);
        buf.push(b'\n');
    }
    buf.extend_from_slice(b"</span>");
}

/// Empty placeholder rows keeping the two table columns aligned.
pub fn push_blanks(buf: &mut Vec<u8>, n: usize) {
    buf.extend_from_slice(b"<span class=\"nop\">");
    for _ in 0..n {
        buf.extend_from_slice(b"<span class=\"lno\"> </span>\n");
    }
    buf.extend_from_slice(b"</span>");
}

/// One line with its per-code-point change flags: changed runs go inside
/// `<span class="chg">`.
pub fn push_line_change(buf: &mut Vec<u8>, line: &[u8], positions: &[usize], change: &[bool]) {
    let mut in_chg = false;
    let mut i = 0;
    let end = change.len();
    while i < end {
        let c = change[i];
        let mut j = i + 1;
        while j < end && change[j] == c {
            j += 1;
        }
        if c && !in_chg {
            buf.extend_from_slice(b"<span class=\"chg\">");
        } else if !c && in_chg {
            buf.extend_from_slice(b"</span>");
        }
        push_escaped(buf, &line[positions[i]..positions[j]]);
        i = j;
        in_chg = c;
    }
    if in_chg {
        buf.extend_from_slice(b"</span>");
    }
}

/// Numbered plain preview of a file's first lines.
pub fn push_preview(buf: &mut Vec<u8>, lines: &[&[u8]], max_lines: usize) {
    let n = max_lines.min(lines.len());
    let width = n.to_string().len();
    buf.extend_from_slice(b"<span class=\"nop\">");
    for (lineno, &line) in lines[..n].iter().enumerate() {
        push_lineno(buf, lineno + 1, width);
        push_escaped(buf, line);
        buf.push(b'\n');
    }
    buf.extend_from_slice(b"</span>");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(line: &[u8]) -> String {
        let mut buf = Vec::new();
        push_escaped(&mut buf, line);
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escaped(b"a<b>&'\"c"), "a&lt;b&gt;&amp;&#39;&#34;c");
        assert_eq!(escaped(b"plain"), "plain");
        assert_eq!(escaped(b""), "");
    }

    #[test]
    fn test_invalid_utf8_passes_through() {
        let mut buf = Vec::new();
        push_escaped(&mut buf, &[0xff, b'<', 0xfe]);
        assert_eq!(buf, vec![0xff, b'&', b'l', b't', b';', 0xfe]);
    }

    #[test]
    fn test_line_change_spans() {
        let mut buf = Vec::new();
        // "abcd" with "bc" changed
        let positions = vec![0, 1, 2, 3, 4];
        let change = vec![false, true, true, false];
        push_line_change(&mut buf, b"abcd", &positions, &change);
        assert_eq!(
            String::from_utf8_lossy(&buf),
            "a<span class=\"chg\">bc</span>d"
        );
    }

    #[test]
    fn test_line_change_trailing_span_closes() {
        let mut buf = Vec::new();
        let positions = vec![0, 1, 2];
        let change = vec![false, true];
        push_line_change(&mut buf, b"ab", &positions, &change);
        assert_eq!(
            String::from_utf8_lossy(&buf),
            "a<span class=\"chg\">b</span>"
        );
    }

    #[test]
    fn test_lineno_width() {
        let mut buf = Vec::new();
        push_lineno(&mut buf, 7, 3);
        assert_eq!(String::from_utf8_lossy(&buf), "<span class=\"lno\">7   </span>");
    }
}
