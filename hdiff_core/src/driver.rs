//! Per-pair orchestration: load both files, build equivalence classes, run
//! the LCS on the compressed sequences, expand and normalize the change
//! flags, then stream grouped operations into a renderer. The result is the
//! pair's complete report as one byte buffer.

use crate::compare::LineCmp;
use crate::equiv::{expand_change_list, find_equiv_lines};
use crate::lcs::diff_ids;
use crate::loader::FileData;
use crate::render::{FileInfoLine, MessageReport, PairRenderer};
use crate::report::report_diff;
use crate::shift::shift_boundaries;
use hdiff_common::{CompareOptions, DiffOp, ReportOptions};
use std::path::Path;
use tracing::debug;

pub const MSG_FILE_NOT_EXISTS: &str = "File does not exist";
pub const MSG_DIR_NOT_EXISTS: &str = "Directory does not exist";
pub const MSG_FILE_DIFFERS: &str = "File differs";
pub const MSG_BIN_FILE_DIFFERS: &str = "File differs. This is a binary file";
pub const MSG_FILE_IDENTICAL: &str = "Files are the same";

/// Diff one pair of files and render the report. An empty buffer means
/// there was nothing to say about this pair.
pub fn diff_file_pair(
    path1: &Path,
    path2: &Path,
    cmp_opts: &CompareOptions,
    report_opts: &ReportOptions,
) -> Vec<u8> {
    let name1 = path1.display().to_string();
    let name2 = path2.display().to_string();

    let file1 = FileData::open(path1);
    let file2 = FileData::open(path2);

    debug!(file1 = %name1, file2 = %name2, "comparing file pair");

    if file1.error.is_some() || file2.error.is_some() {
        return MessageReport {
            style: report_opts.style,
            name1: &name1,
            name2: &name2,
            info1: Some(FileInfoLine::from_file(&file1)),
            info2: Some(FileInfoLine::from_file(&file2)),
            msg1: file1.error.as_ref().map(|e| e.report_message()),
            msg2: file2.error.as_ref().map(|e| e.report_message()),
            preview1: None,
            preview2: None,
            is_error: true,
        }
        .render();
    }

    if file1.data() == file2.data() {
        if report_opts.show_identical {
            return identical_report(&name1, &name2, &file1, &file2, report_opts);
        }
        return Vec::new();
    }

    let lines1 = file1.split_lines();
    let lines2 = file2.split_lines();

    let (lines1, lines2) = match (lines1, lines2) {
        (Ok(lines1), Ok(lines2)) => (lines1, lines2),
        (split1, split2) => {
            let msg = |is_binary: bool| {
                if is_binary {
                    MSG_BIN_FILE_DIFFERS
                } else {
                    MSG_FILE_DIFFERS
                }
            };
            return MessageReport {
                style: report_opts.style,
                name1: &name1,
                name2: &name2,
                info1: Some(FileInfoLine::from_file(&file1)),
                info2: Some(FileInfoLine::from_file(&file2)),
                msg1: Some(msg(split1.is_err()).to_string()),
                msg2: Some(msg(split2.is_err()).to_string()),
                preview1: None,
                preview2: None,
                is_error: true,
            }
            .render();
        }
    };

    let cmp = LineCmp::new(*cmp_opts);
    let (mut info1, mut info2) = find_equiv_lines(&lines1, &lines2, &cmp);

    // the trim pass may have settled everything without the LCS engine
    if !info1.z_ids.is_empty() && !info2.z_ids.is_empty() {
        let (z_change1, z_change2) = diff_ids(&info1.z_ids, &info2.z_ids);
        expand_change_list(&mut info1, &mut info2, &z_change1, &z_change2);
    }

    shift_boundaries(&info1.ids, &mut info1.change, None);
    shift_boundaries(&info2.ids, &mut info2.change, None);

    let mut renderer = PairRenderer::new(
        report_opts.style,
        &name1,
        &name2,
        Some(FileInfoLine::from_file(&file1)),
        Some(FileInfoLine::from_file(&file2)),
        &lines1,
        &lines2,
        *cmp_opts,
        report_opts.suppress_line_changes,
    );

    let changed = report_diff(
        &info1.ids,
        &info2.ids,
        &info1.change,
        &info2.change,
        report_opts.context_lines,
        &mut |ops: &[DiffOp]| renderer.emit_batch(ops),
    );

    if !changed && report_opts.show_identical {
        return identical_report(&name1, &name2, &file1, &file2, report_opts);
    }

    renderer.finish()
}

fn identical_report(
    name1: &str,
    name2: &str,
    file1: &FileData,
    file2: &FileData,
    report_opts: &ReportOptions,
) -> Vec<u8> {
    MessageReport {
        style: report_opts.style,
        name1,
        name2,
        info1: Some(FileInfoLine::from_file(file1)),
        info2: Some(FileInfoLine::from_file(file2)),
        msg1: Some(MSG_FILE_IDENTICAL.to_string()),
        msg2: Some(MSG_FILE_IDENTICAL.to_string()),
        preview1: None,
        preview2: None,
        is_error: false,
    }
    .render()
}
