use std::io::Cursor;

use listing_index::cli::shell::Shell;
use listing_index::{Listing, ListingTree};

fn run(tree: ListingTree, script: &str) -> (ListingTree, String) {
    let mut out = Vec::new();
    let mut shell = Shell::new(tree, Cursor::new(script.as_bytes()), &mut out);
    shell.run().expect("session");
    let tree = shell.into_tree();
    (tree, String::from_utf8(out).expect("utf8"))
}

fn seeded() -> ListingTree {
    let mut tree = ListingTree::new();
    tree.insert(Listing::new("Bogota", 100.0, 10.0, 1, 1)).unwrap();
    tree.insert(Listing::new("Medellin", 300.0, 10.0, 2, 1)).unwrap();
    tree.insert(Listing::new("Cali", 200.0, 10.0, 3, 2)).unwrap();
    tree
}

#[test]
fn insert_prints_key_and_tree() {
    let (tree, out) = run(ListingTree::new(), "1\nPasto\n500\n10\n2\n1\n6\n");
    assert_eq!(tree.len(), 1);
    assert!(out.contains("inserted with metric 50"));
    assert!(out.contains("50, city=Pasto price=500"));
}

#[test]
fn session_state_is_visible_before_the_tree_is_taken_back() {
    let mut out = Vec::new();
    let mut shell = Shell::new(seeded(), Cursor::new(&b"2\n10\n6\n"[..]), &mut out);
    assert_eq!(shell.tree().len(), 3);
    shell.run().expect("session");
    assert_eq!(shell.tree().len(), 2);
    assert!(shell.tree().find_by_metric(10.0).is_none());
    assert_eq!(shell.into_tree().len(), 2);
}

#[test]
fn malformed_numbers_are_reprompted() {
    let (tree, out) = run(
        ListingTree::new(),
        "1\nPasto\nlots\n500\n10\n-2\n2\n1\n6\n",
    );
    assert_eq!(tree.len(), 1);
    assert!(out.contains("'lots' is not a valid number, try again"));
    assert!(out.contains("'-2' is not a valid number, try again"));
}

#[test]
fn metric_errors_are_reported_not_fatal() {
    let (tree, out) = run(ListingTree::new(), "1\nPasto\n500\n0\n0\n0\n6\n");
    assert!(tree.is_empty());
    assert!(out.contains("error: invalid metric input"));
}

#[test]
fn delete_and_find_by_metric() {
    let (tree, out) = run(seeded(), "2\n20\n3\n20\n3\n10\n6\n");
    assert_eq!(tree.len(), 2);
    assert!(out.contains("removed city=Cali"));
    assert!(out.contains("no listing with metric 20"));
    assert!(out.contains("10, city=Bogota"));
}

#[test]
fn blank_criteria_mean_any() {
    let (_, out) = run(seeded(), "4\n\n\n\n\n\n6\n");
    assert!(out.contains("3 match(es)"));

    let (_, out) = run(seeded(), "4\nBogota\n\n\n\n\n6\n");
    assert!(out.contains("1 match(es)"));

    let (_, out) = run(seeded(), "4\n\n2\n250\n\n\n6\n");
    assert!(out.contains("1 match(es)"));
    assert!(out.contains("20, city=Cali"));
}

#[test]
fn relation_menu_answers_queries_then_returns() {
    let script = "5\na\n30\nb\n20\nc\n30\nd\n30\ne\n10\nf\n30\ng\n6\n";
    let (_, out) = run(seeded(), script);
    assert!(out.contains("├── 10, city=Bogota"));
    assert!(out.contains("level 2"));
    assert!(out.contains("balance factor 0"));
    assert!(out.contains("parent: city=Cali"));
    assert!(out.contains("no grandparent"));
    assert!(out.contains("sibling: city=Medellin"));
    assert!(out.contains("no uncle"));
}

#[test]
fn unknown_options_and_eof_end_cleanly() {
    let (tree, out) = run(seeded(), "9\n5\nz\n");
    assert_eq!(tree.len(), 3);
    assert!(out.contains("unknown option '9'"));
    assert!(out.contains("unknown option 'z'"));
}

#[test]
fn empty_tree_is_announced() {
    let (_, out) = run(ListingTree::new(), "5\ng\n6\n");
    assert!(out.contains("(empty tree)"));
}
