use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn run_cli(args: &[&str]) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_hdiff");
    Command::new(exe)
        .args(args)
        .output()
        .expect("failed to run hdiff")
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_file(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_text_diff_of_two_files() {
    let temp = TempDir::new().unwrap();
    let left = write_file(temp.path(), "left.txt", "alpha\nbeta\ngamma\n");
    let right = write_file(temp.path(), "right.txt", "alpha\nBETA\ngamma\n");

    let output = run_cli(&["-n", &left, &right]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("2c2"), "missing change line in: {stdout}");
    assert!(stdout.contains("< beta"));
    assert!(stdout.contains("> BETA"));
}

#[test]
fn test_identical_files_quiet_without_flag() {
    let temp = TempDir::new().unwrap();
    let left = write_file(temp.path(), "left.txt", "same\n");
    let right = write_file(temp.path(), "right.txt", "same\n");

    let output = run_cli(&["-n", &left, &right]);
    assert!(output.status.success());
    assert!(stdout_of(&output).is_empty());

    let output = run_cli(&["-n", "-s", &left, &right]);
    assert!(stdout_of(&output).contains("Files are the same"));
}

#[test]
fn test_ignore_case_flag() {
    let temp = TempDir::new().unwrap();
    let left = write_file(temp.path(), "left.txt", "Mixed Case\n");
    let right = write_file(temp.path(), "right.txt", "mixed case\n");

    let output = run_cli(&["-n", "-i", &left, &right]);
    assert!(output.status.success());
    assert!(stdout_of(&output).is_empty());

    let output = run_cli(&["-n", &left, &right]);
    assert!(!stdout_of(&output).is_empty());
}

#[test]
fn test_ignore_space_change_flag() {
    let temp = TempDir::new().unwrap();
    let left = write_file(temp.path(), "left.txt", "a  b\n");
    let right = write_file(temp.path(), "right.txt", "a b \n");

    let output = run_cli(&["-n", "-b", &left, &right]);
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn test_ignore_blank_lines_flag() {
    let temp = TempDir::new().unwrap();
    let left = write_file(temp.path(), "left.txt", "a\n\nb\n");
    let right = write_file(temp.path(), "right.txt", "a\nb\n");

    let output = run_cli(&["-n", "-B", &left, &right]);
    assert!(stdout_of(&output).is_empty());

    let output = run_cli(&["-n", &left, &right]);
    assert!(!stdout_of(&output).is_empty());
}

#[test]
fn test_unified_text_output() {
    let temp = TempDir::new().unwrap();
    let left = write_file(temp.path(), "left.txt", "one\ntwo\nthree\n");
    let right = write_file(temp.path(), "right.txt", "one\n2\nthree\n");

    let output = run_cli(&["-n", "-u", &left, &right]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("--- "));
    assert!(stdout.contains("+++ "));
    assert!(stdout.contains("@@ -1,3 +1,3 @@"));
    assert!(stdout.contains("- two"));
    assert!(stdout.contains("+ 2"));
}

#[test]
fn test_html_output_shape() {
    let temp = TempDir::new().unwrap();
    let left = write_file(temp.path(), "left.txt", "hello world\n");
    let right = write_file(temp.path(), "right.txt", "hello there\n");

    let output = run_cli(&[&left, &right]);
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("<!doctype html>"));
    assert!(stdout.contains("<span class=\"chg\">"));
    assert!(stdout.contains("Legend:"));
    assert!(stdout.trim_end().ends_with("</body></html>"));
}

#[test]
fn test_directory_mode() {
    let temp = TempDir::new().unwrap();
    let dir1 = temp.path().join("one");
    let dir2 = temp.path().join("two");
    fs::create_dir(&dir1).unwrap();
    fs::create_dir(&dir2).unwrap();
    fs::write(dir1.join("common.txt"), "x\n").unwrap();
    fs::write(dir2.join("common.txt"), "y\n").unwrap();
    fs::write(dir1.join("only-left.txt"), "gone\n").unwrap();

    let output = run_cli(&["-n", dir1.to_str().unwrap(), dir2.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("1c1"));
    assert!(stdout.contains("File does not exist"));
}

#[test]
fn test_directory_mode_parallel() {
    let temp = TempDir::new().unwrap();
    let dir1 = temp.path().join("one");
    let dir2 = temp.path().join("two");
    fs::create_dir(&dir1).unwrap();
    fs::create_dir(&dir2).unwrap();
    for i in 0..8 {
        fs::write(dir1.join(format!("f{i}.txt")), format!("line {i}\n")).unwrap();
        fs::write(dir2.join(format!("f{i}.txt")), format!("LINE {i}\n")).unwrap();
    }

    let output = run_cli(&["-n", "-g", "4", dir1.to_str().unwrap(), dir2.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    // every pair report arrives exactly once, order unspecified
    for i in 0..8 {
        assert_eq!(
            stdout.matches(&format!("line {i}")).count(),
            1,
            "report for pair {i} in: {stdout}"
        );
    }
}

#[test]
fn test_exclude_pattern() {
    let temp = TempDir::new().unwrap();
    let dir1 = temp.path().join("one");
    let dir2 = temp.path().join("two");
    fs::create_dir(&dir1).unwrap();
    fs::create_dir(&dir2).unwrap();
    fs::write(dir1.join("keep.txt"), "a\n").unwrap();
    fs::write(dir2.join("keep.txt"), "b\n").unwrap();
    fs::write(dir1.join("skip.log"), "a\n").unwrap();

    let output = run_cli(&[
        "-n",
        "-X",
        r"\.log$",
        dir1.to_str().unwrap(),
        dir2.to_str().unwrap(),
    ]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("keep.txt"));
    assert!(!stdout.contains("skip.log"));
}

#[test]
fn test_binary_file_reported() {
    let temp = TempDir::new().unwrap();
    let left = temp.path().join("left.bin");
    let right = temp.path().join("right.bin");
    fs::write(&left, b"plain text\n").unwrap();
    fs::write(&right, b"bin\x00ary\n").unwrap();

    let output = run_cli(&["-n", left.to_str().unwrap(), right.to_str().unwrap()]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("This is a binary file"));
}

#[test]
fn test_mixed_file_and_directory_rejected() {
    let temp = TempDir::new().unwrap();
    let file = write_file(temp.path(), "a.txt", "x\n");
    let dir = temp.path().join("d");
    fs::create_dir(&dir).unwrap();

    let output = run_cli(&["-n", &file, dir.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unable to compare file and directory"));
}

#[test]
fn test_missing_input_fails() {
    let temp = TempDir::new().unwrap();
    let file = write_file(temp.path(), "a.txt", "x\n");
    let missing = temp.path().join("missing.txt");

    let output = run_cli(&["-n", &file, missing.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_context_lines_flag() {
    let temp = TempDir::new().unwrap();
    let body: String = (0..20).map(|i| format!("line{i}\n")).collect();
    let mut changed = body.clone();
    changed = changed.replace("line10\n", "changed\n");
    let left = write_file(temp.path(), "left.txt", &body);
    let right = write_file(temp.path(), "right.txt", &changed);

    let output = run_cli(&["-n", "-u", "-c", "1", &left, &right]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("@@ -10,3 +10,3 @@"), "hunk header in: {stdout}");
    assert!(stdout.contains("  line9"));
    assert!(stdout.contains("- line10"));
    assert!(stdout.contains("+ changed"));
    assert!(stdout.contains("  line11"));
    assert!(!stdout.contains("  line8"));
}
