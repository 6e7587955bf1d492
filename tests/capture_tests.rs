// Work around dead code warnings: rust-lang issue #46379
pub mod common;

use common::*;

#[test]
fn non_matching_captures() {
    let m = compile("aa(b)?aa").find("aaaa").expect("Should have matched");
    assert_eq!(m.captures.len(), 1, "Capture list should have size 1");
    assert!(m.captures[0].is_none(), "Captured value should be missing");
    assert!(m.group(1).is_none());
}

#[test]
fn group_zero_is_the_whole_match() {
    let m = compile("a(b)c").find("xabcy").unwrap();
    assert_eq!(m.group(0).unwrap().bytes, &b"abc"[..]);
    assert_eq!(m.group(0).unwrap().index, 1);
    assert_eq!(m.whole().bytes, &b"abc"[..]);
    assert_eq!(m.whole().index, 1);
}

#[test]
fn groups_iterator_covers_every_group() {
    let m = compile("(a)(b)?(c)").find("ac").unwrap();
    let gs: Vec<_> = m.groups().collect();
    assert_eq!(gs.len(), 3);
    assert_eq!(gs[0].unwrap().bytes, &b"a"[..]);
    assert!(gs[1].is_none());
    assert_eq!(gs[2].unwrap().bytes, &b"c"[..]);
}

#[test]
fn alternation_captures_only_the_taken_branch() {
    let m = compile("(a)|(b)").find("b").unwrap();
    assert!(m.group(1).is_none());
    assert_eq!(m.group(2).unwrap().bytes, &b"b"[..]);
}

#[test]
fn capture_positions() {
    let m = compile(r"\d+(...)").find("12345abc").unwrap();
    let g = m.group(1).unwrap();
    assert_eq!(g.index, 5);
    assert_eq!(g.bytes, &b"abc"[..]);
}

#[test]
fn quantified_group_keeps_the_last_iteration() {
    compile("(ab)+").match1f("zababy").test_eq("abab,ab");
    let m = compile("(ab)+").find("zababy").unwrap();
    assert_eq!(m.group(1).unwrap().index, 3);
}

#[test]
fn capture_slices_point_into_the_input() {
    let input = "say <hello> twice";
    let m = compile(r"<(\w+)>").find(input).unwrap();
    let g = m.group(1).unwrap();
    assert_eq!(
        &input.as_bytes()[g.index..g.index + g.bytes.len()],
        g.bytes
    );
    // The group's span sits inside the whole match's span.
    assert!(g.index >= m.start());
    assert!(g.index + g.bytes.len() <= m.end());
}

#[test]
fn groups_inside_loops_reset_per_attempt() {
    // The failed attempt at offset 0 must not leak captures into the
    // successful attempt at offset 1.
    let m = compile("a(b)c").find("abxabc").unwrap();
    assert_eq!(m.range(), 3..6);
    assert_eq!(m.group(1).unwrap().index, 4);
}

#[test]
fn out_of_range_group_is_none() {
    let m = compile("(a)").find("a").unwrap();
    assert!(m.group(2).is_none());
    assert!(m.group(99).is_none());
}
