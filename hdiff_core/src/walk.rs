//! Directory pairing: read both directories sorted, match entries by name
//! (files first, then subdirectories recursively) and surface file pairs
//! plus missing-counterpart events to the caller.

use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which side of a missing-counterpart event actually exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug)]
pub enum DirEvent {
    /// Two same-named files ready to be diffed.
    Pair { path1: PathBuf, path2: PathBuf },
    /// An entry with no counterpart; `exists` names the side that has it.
    Missing {
        name1: PathBuf,
        name2: PathBuf,
        exists: Side,
        is_dir: bool,
    },
    /// A directory could not be read.
    DirError {
        name1: PathBuf,
        name2: PathBuf,
        msg1: Option<String>,
        msg2: Option<String>,
    },
}

struct WalkEntry {
    name: String,
    is_dir: bool,
}

fn read_sorted_dir(dir: &Path, exclude: Option<&Regex>) -> std::io::Result<Vec<WalkEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if exclude.is_some_and(|re| re.is_match(&name)) {
            continue;
        }
        let is_dir = entry.file_type()?.is_dir();
        entries.push(WalkEntry { name, is_dir });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Walk two directories in lockstep, recursing into paired subdirectories.
/// Dotfiles are skipped; `exclude` filters entries by name on both sides.
pub fn walk_dirs(
    dir1: &Path,
    dir2: &Path,
    exclude: Option<&Regex>,
    on_event: &mut dyn FnMut(DirEvent),
) {
    let entries1 = read_sorted_dir(dir1, exclude);
    let entries2 = read_sorted_dir(dir2, exclude);

    let (entries1, entries2) = match (entries1, entries2) {
        (Ok(entries1), Ok(entries2)) => (entries1, entries2),
        (read1, read2) => {
            on_event(DirEvent::DirError {
                name1: dir1.to_path_buf(),
                name2: dir2.to_path_buf(),
                msg1: read1.err().map(|e| e.to_string()),
                msg2: read2.err().map(|e| e.to_string()),
            });
            return;
        }
    };

    debug!(
        dir1 = %dir1.display(),
        dir2 = %dir2.display(),
        n1 = entries1.len(),
        n2 = entries2.len(),
        "walking directory pair"
    );

    // files first, then subdirectories
    for dir_mode in [false, true] {
        let (mut i1, mut i2) = (0usize, 0usize);
        while i1 < entries1.len() || i2 < entries2.len() {
            if i1 < entries1.len()
                && (entries1[i1].is_dir != dir_mode || entries1[i1].name.starts_with('.'))
            {
                i1 += 1;
                continue;
            }
            if i2 < entries2.len()
                && (entries2[i2].is_dir != dir_mode || entries2[i2].name.starts_with('.'))
            {
                i2 += 1;
                continue;
            }
            let name1 = entries1.get(i1).map(|e| e.name.as_str());
            let name2 = entries2.get(i2).map(|e| e.name.as_str());

            let left_only = match (name1, name2) {
                (Some(name1), Some(name2)) if name1 == name2 => {
                    if dir_mode {
                        walk_dirs(&dir1.join(name1), &dir2.join(name2), exclude, on_event);
                    } else {
                        on_event(DirEvent::Pair {
                            path1: dir1.join(name1),
                            path2: dir2.join(name2),
                        });
                    }
                    i1 += 1;
                    i2 += 1;
                    continue;
                }
                (Some(name1), Some(name2)) => name1 < name2,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };

            if left_only {
                let name = entries1[i1].name.as_str();
                on_event(DirEvent::Missing {
                    name1: dir1.join(name),
                    name2: dir2.join(name),
                    exists: Side::Left,
                    is_dir: dir_mode,
                });
                i1 += 1;
            } else {
                let name = entries2[i2].name.as_str();
                on_event(DirEvent::Missing {
                    name1: dir1.join(name),
                    name2: dir2.join(name),
                    exists: Side::Right,
                    is_dir: dir_mode,
                });
                i2 += 1;
            }
        }
    }
}
