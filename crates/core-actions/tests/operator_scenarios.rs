mod common;
use common::*;

use core_state::Mode;
use pretty_assertions::assert_eq;

#[test]
fn dd_removes_current_line() {
    let mut e = engine(&numbered(5));
    feed(&mut e, "2jdd");
    assert_eq!(lines(&e), vec!["line0", "line1", "line3", "line4"]);
    assert_eq!(cursor(&e), (2, 0));
    assert_eq!(e.screen().row_text(2), "line3");
    assert_eq!(e.screen().row_text(4), "~");
}

#[test]
fn counted_dd_repeats() {
    let mut e = engine(&numbered(5));
    feed(&mut e, "3dd");
    assert_eq!(lines(&e), vec!["line3", "line4"]);
    assert_eq!(e.state().register.lines().len(), 3);
}

#[test]
fn two_dj_from_first_line_deletes_four() {
    let mut e = engine(&numbered(5));
    feed(&mut e, "2dj");
    assert_eq!(lines(&e), vec!["line4"]);
    assert_eq!(cursor(&e), (0, 0));
}

#[test]
fn count_after_operator_matches_count_before() {
    let mut a = engine(&numbered(5));
    feed(&mut a, "2dj");
    let mut b = engine(&numbered(5));
    feed(&mut b, "d2j");
    assert_eq!(lines(&a), lines(&b));
}

#[test]
fn counts_on_both_sides_multiply() {
    let mut e = engine(&numbered(20));
    feed(&mut e, "2d3j");
    // six repetitions of dj
    let expected: Vec<String> = (12..20).map(|i| format!("line{i}")).collect();
    assert_eq!(lines(&e), expected);
}

#[test]
fn two_dj_from_last_line_deletes_nothing() {
    let mut e = engine(&numbered(5));
    feed(&mut e, "4j2dj");
    assert_eq!(lines(&e).len(), 5);
    assert_eq!(cursor(&e), (4, 0));
    assert!(e.state().operator.is_idle());
}

#[test]
fn dk_from_last_line_deletes_two() {
    let mut e = engine(&numbered(5));
    feed(&mut e, "4jdk");
    assert_eq!(lines(&e), vec!["line0", "line1", "line2"]);
    assert_eq!(cursor(&e), (2, 0));
}

#[test]
fn incompatible_key_warns_once_and_leaves_document() {
    for seq in ["dl", "dh", "d$", "d0", "di", "y:", "cA", "dy"] {
        let mut e = engine(&numbered(3));
        feed(&mut e, seq);
        assert_eq!(lines(&e).len(), 3, "{seq}");
        assert_eq!(message_row(&e), "WARNING: invalid command", "{seq}");
        assert!(e.state().operator.is_idle(), "{seq}");
        assert_eq!(e.state().pending_command(), "", "{seq}");
        assert_eq!(e.state().mode, Mode::Command, "{seq}");
    }
}

#[test]
fn delete_with_page_down() {
    let mut e = engine(&numbered(30));
    feed(&mut e, "d<PageDown>");
    assert_eq!(lines(&e).len(), 20);
    assert_eq!(lines(&e)[0], "line10");
}

#[test]
fn delete_everything_leaves_one_empty_line() {
    let mut e = engine("a\nb\nc");
    feed(&mut e, "5dd");
    assert_eq!(lines(&e), vec![""]);
    assert_eq!(cursor(&e), (0, 0));
    assert_eq!(e.screen().row_text(1), "~");
}

#[test]
fn delete_near_end_pulls_viewport_back() {
    let mut e = engine(&numbered(15));
    feed(&mut e, "14j");
    assert_eq!(e.state().viewport.top_line, 5);
    feed(&mut e, "k9dk");
    // stops once k is blocked on the first line
    assert_eq!(lines(&e).len(), 1);
    assert_eq!(cursor(&e), (0, 0));
    assert_eq!(e.state().viewport.top_line, 0);
    assert_eq!(e.screen().row_text(1), "~");
}

#[test]
fn change_opens_line_and_enters_insert() {
    let mut e = engine(&numbered(4));
    feed(&mut e, "jcjnew<Esc>");
    assert_eq!(lines(&e), vec!["line0", "new", "line3"]);
    assert_eq!(e.state().mode, Mode::Command);
    assert_eq!(cursor(&e), (1, 2));
}

#[test]
fn cc_replaces_current_line() {
    let mut e = engine("a\nb\nc");
    feed(&mut e, "jccx");
    assert_eq!(lines(&e), vec!["a", "x", "c"]);
    assert_eq!(message_row(&e), "-- INSERT --");
}

#[test]
fn yank_reports_and_keeps_document() {
    let mut e = engine(&numbered(5));
    feed(&mut e, "3jyk");
    assert_eq!(lines(&e).len(), 5);
    assert_eq!(cursor(&e), (2, 0));
    assert_eq!(message_row(&e), "2 lines yanked");
    feed(&mut e, "yy");
    assert_eq!(message_row(&e), "1 line yanked");
    assert_eq!(e.state().register.lines(), &["line2".to_string()]);
}
