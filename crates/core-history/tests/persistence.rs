use core_history::{DuplicatePolicy, History};
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn save_then_load_preserves_multiline_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.txt");

    let mut h = History::new(10);
    h.add("echo one");
    h.add("for x in a b\ndo echo $x\ndone");
    h.add("path c:\\tmp\twith tab");
    h.save(&path).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert_eq!(raw.lines().count(), 3, "one line per entry");

    let mut loaded = History::new(10);
    assert_eq!(loaded.load(&path).unwrap(), 3);
    let got: Vec<&str> = loaded.iter().collect();
    assert_eq!(
        got,
        vec![
            "echo one",
            "for x in a b\ndo echo $x\ndone",
            "path c:\\tmp\twith tab"
        ]
    );
}

#[test]
fn load_keeps_most_recent_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.txt");
    fs::write(&path, "one\ntwo\nthree\nfour\n").unwrap();

    let mut h = History::new(2);
    h.load(&path).unwrap();
    let got: Vec<&str> = h.iter().collect();
    assert_eq!(got, vec!["three", "four"]);
}

#[test]
fn missing_file_is_empty_history() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = History::default();
    assert_eq!(h.load(&dir.path().join("absent")).unwrap(), 0);
    assert!(h.is_empty());
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/deeper/history");
    let mut h = History::default();
    h.add("x");
    h.set_path(Some(path.clone()));
    h.persist().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "x\n");
}

#[test]
fn crlf_and_blank_lines_are_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("h");
    fs::write(&path, "a\r\n\r\nb\n\n").unwrap();
    let mut h = History::default().with_policy(DuplicatePolicy::Allow);
    h.load(&path).unwrap();
    let got: Vec<&str> = h.iter().collect();
    assert_eq!(got, vec!["a", "b"]);
}

#[test]
fn bounded_fifo_after_max_plus_one() {
    let max = 5;
    let mut h = History::new(max);
    for i in 0..=max {
        h.add(&format!("cmd {i}"));
    }
    let got: Vec<String> = h.iter().map(str::to_owned).collect();
    let expected: Vec<String> = (1..=max).map(|i| format!("cmd {i}")).collect();
    assert_eq!(got, expected);
}

#[test]
fn invalid_utf8_line_is_replaced_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.txt");
    fs::write(&path, b"first\nbad \xff byte\r\nlast\n").unwrap();

    let mut h = History::new(10);
    assert_eq!(h.load(&path).unwrap(), 3);
    let got: Vec<&str> = h.iter().collect();
    assert_eq!(got, vec!["first", "bad \u{fffd} byte", "last"]);
}

#[cfg(unix)]
#[test]
fn failed_load_leaves_entries_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = History::new(10);
    h.add("kept");
    // a directory opens on unix but fails on the first read
    assert!(h.load(dir.path()).is_err());
    let got: Vec<&str> = h.iter().collect();
    assert_eq!(got, vec!["kept"]);
}
