use clap::Parser;
use hdiff_common::{load_config, CompareOptions, ReportOptions, ReportStyle};
use hdiff_core::driver::{diff_file_pair, MSG_DIR_NOT_EXISTS, MSG_FILE_NOT_EXISTS};
use hdiff_core::render::{self, FileInfoLine, MessageReport};
use hdiff_core::walk::{walk_dirs, DirEvent, Side};
use hdiff_core::FileData;
use regex::Regex;
use std::io::{BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

const OUTPUT_BUF_SIZE: usize = 65536;

#[derive(Parser)]
#[command(name = "hdiff")]
#[command(version = "0.1.0")]
#[command(about = "Compare files or directories and report differences as HTML or text")]
struct Cli {
    /// First file or directory
    path1: PathBuf,

    /// Second file or directory
    path2: PathBuf,

    /// Ignore case differences in file contents
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Ignore changes in the amount of white space
    #[arg(short = 'b', long)]
    ignore_space_change: bool,

    /// Ignore all white space
    #[arg(short = 'w', long)]
    ignore_all_space: bool,

    /// Ignore changes whose lines are all blank
    #[arg(short = 'B', long)]
    ignore_blank_lines: bool,

    /// Apply Unicode rules for white space and upper/lower case
    #[arg(long)]
    unicode: bool,

    /// Report when two files are identical
    #[arg(short = 's', long)]
    show_identical: bool,

    /// Do not display changes within lines
    #[arg(short = 'l', long)]
    no_line_changes: bool,

    /// Do not show content when the corresponding file is missing
    #[arg(short = 'm', long)]
    suppress_missing: bool,

    /// Unified output layout
    #[arg(short = 'u', long)]
    unified: bool,

    /// Output in diff text format instead of HTML
    #[arg(short = 'n', long)]
    text: bool,

    /// Lines of context before and after changes
    #[arg(short = 'c', long, value_name = "N")]
    context: Option<usize>,

    /// Number of worker threads for directory comparison
    #[arg(short = 'g', long, value_name = "N")]
    jobs: Option<usize>,

    /// Exclude files and directories matching this regex
    #[arg(short = 'X', long, value_name = "PATTERN")]
    exclude: Option<String>,
}

/// Report sink shared by all workers; one lock acquisition writes one
/// complete pair report.
struct OutputSink {
    out: Mutex<BufWriter<Stdout>>,
}

impl OutputSink {
    fn new() -> Self {
        Self {
            out: Mutex::new(BufWriter::with_capacity(OUTPUT_BUF_SIZE, std::io::stdout())),
        }
    }

    fn write(&self, buf: &[u8]) {
        if buf.is_empty() {
            return;
        }
        let mut guard = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = guard.write_all(buf) {
            error!("failed to write report: {err}");
        }
    }

    fn flush(&self) {
        let mut guard = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = guard.flush() {
            error!("failed to flush output: {err}");
        }
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    std::process::exit(2);
}

fn main() {
    // logs go to stderr so reports stream cleanly to stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let config = match load_config() {
        Ok(loaded) => loaded.config,
        Err(err) => {
            warn!("using default configuration: {err}");
            hdiff_common::AppConfig::default()
        }
    };

    let cmp_opts = CompareOptions {
        ignore_case: cli.ignore_case,
        ignore_space_change: cli.ignore_space_change,
        ignore_all_space: cli.ignore_all_space,
        ignore_blank_lines: cli.ignore_blank_lines,
        unicode: cli.unicode || config.unicode,
    };

    let style = match (cli.text, cli.unified) {
        (true, true) => ReportStyle::TextUnified,
        (true, false) => ReportStyle::Text,
        (false, true) => ReportStyle::HtmlUnified,
        (false, false) => ReportStyle::Html,
    };

    let report_opts = ReportOptions {
        style,
        context_lines: cli.context.unwrap_or(config.context_lines),
        show_identical: cli.show_identical || config.show_identical,
        suppress_line_changes: cli.no_line_changes,
        suppress_missing_content: cli.suppress_missing,
    };

    let jobs = cli.jobs.unwrap_or(config.jobs).max(1);

    let exclude_pattern = cli.exclude.or(config.exclude);
    let exclude = exclude_pattern.as_deref().map(|pattern| {
        Regex::new(pattern)
            .unwrap_or_else(|err| fail(&format!("Invalid exclude regex: {err}")))
    });

    let meta1 = std::fs::metadata(&cli.path1);
    let meta2 = std::fs::metadata(&cli.path2);
    let (meta1, meta2) = match (meta1, meta2) {
        (Ok(meta1), Ok(meta2)) => (meta1, meta2),
        (res1, res2) => {
            if let Err(err) = &res1 {
                eprintln!("{}: {err}", cli.path1.display());
            }
            if let Err(err) = &res2 {
                eprintln!("{}: {err}", cli.path2.display());
            }
            std::process::exit(1);
        }
    };

    if meta1.is_dir() != meta2.is_dir() {
        fail("Unable to compare file and directory");
    }

    let sink = OutputSink::new();

    if style.is_html() {
        let mut prologue = Vec::new();
        render::html::run_prologue(
            &mut prologue,
            &cli.path1.display().to_string(),
            &cli.path2.display().to_string(),
        );
        sink.write(&prologue);
    }

    if meta1.is_dir() {
        diff_directories(
            &cli.path1,
            &cli.path2,
            exclude.as_ref(),
            jobs,
            &cmp_opts,
            &report_opts,
            &sink,
        );
    } else {
        sink.write(&diff_file_pair(
            &cli.path1,
            &cli.path2,
            &cmp_opts,
            &report_opts,
        ));
    }

    if style.is_html() {
        let mut epilogue = Vec::new();
        render::html::run_epilogue(&mut epilogue);
        sink.write(&epilogue);
    }

    sink.flush();
}

fn diff_directories(
    dir1: &Path,
    dir2: &Path,
    exclude: Option<&Regex>,
    jobs: usize,
    cmp_opts: &CompareOptions,
    report_opts: &ReportOptions,
    sink: &OutputSink,
) {
    // messages are rendered as the walk discovers them; file pairs are
    // collected and dispatched to the worker pool afterwards
    let mut pairs: Vec<(PathBuf, PathBuf)> = Vec::new();
    walk_dirs(dir1, dir2, exclude, &mut |event| match event {
        DirEvent::Pair { path1, path2 } => pairs.push((path1, path2)),
        DirEvent::Missing {
            name1,
            name2,
            exists,
            is_dir,
        } => sink.write(&missing_report(
            &name1,
            &name2,
            exists,
            is_dir,
            report_opts,
        )),
        DirEvent::DirError {
            name1,
            name2,
            msg1,
            msg2,
        } => sink.write(
            &MessageReport {
                style: report_opts.style,
                name1: &name1.display().to_string(),
                name2: &name2.display().to_string(),
                info1: None,
                info2: None,
                msg1,
                msg2,
                preview1: None,
                preview2: None,
                is_error: true,
            }
            .render(),
        ),
    });

    if jobs > 1 && pairs.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build();
        match pool {
            Ok(pool) => {
                pool.scope(|scope| {
                    for (path1, path2) in &pairs {
                        scope.spawn(move |_| {
                            sink.write(&diff_file_pair(path1, path2, cmp_opts, report_opts));
                        });
                    }
                });
                return;
            }
            Err(err) => warn!("worker pool unavailable, comparing sequentially: {err}"),
        }
    }

    for (path1, path2) in &pairs {
        sink.write(&diff_file_pair(path1, path2, cmp_opts, report_opts));
    }
}

/// Report for an entry that exists on one side only, previewing the
/// existing file's first lines unless suppressed.
fn missing_report(
    name1: &Path,
    name2: &Path,
    exists: Side,
    is_dir: bool,
    report_opts: &ReportOptions,
) -> Vec<u8> {
    let display1 = name1.display().to_string();
    let display2 = name2.display().to_string();

    let missing_msg = if is_dir {
        MSG_DIR_NOT_EXISTS
    } else {
        MSG_FILE_NOT_EXISTS
    };

    if is_dir || report_opts.suppress_missing_content || !report_opts.style.is_html() {
        let (msg1, msg2) = match exists {
            Side::Left => (None, Some(missing_msg.to_string())),
            Side::Right => (Some(missing_msg.to_string()), None),
        };
        return MessageReport {
            style: report_opts.style,
            name1: &display1,
            name2: &display2,
            info1: None,
            info2: None,
            msg1,
            msg2,
            preview1: None,
            preview2: None,
            is_error: true,
        }
        .render();
    }

    let existing_path = match exists {
        Side::Left => name1,
        Side::Right => name2,
    };
    let mut file = FileData::open(existing_path);
    file.check_binary();
    let preview = file.split_lines().unwrap_or_default();
    let info = Some(FileInfoLine::from_file(&file));
    let existing_msg = file.error.as_ref().map(|e| e.report_message());

    let (msg1, msg2, info1, info2, preview1, preview2) = match exists {
        Side::Left => (
            existing_msg,
            Some(missing_msg.to_string()),
            info,
            None,
            Some(preview.as_slice()),
            None,
        ),
        Side::Right => (
            Some(missing_msg.to_string()),
            existing_msg,
            None,
            info,
            None,
            Some(preview.as_slice()),
        ),
    };

    MessageReport {
        style: report_opts.style,
        name1: &display1,
        name2: &display2,
        info1,
        info2,
        msg1,
        msg2,
        preview1,
        preview2,
        is_error: true,
    }
    .render()
}
