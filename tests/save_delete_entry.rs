//! Deleting an entry removes its line on save.

mod common;

#[test]
fn deleted_line_disappears_from_the_file() {
    let (resource, mut file) = common::memory_hosts(&common::sample_hosts());

    let host1 = file.entries()[0].clone();
    file.delete_entry(&host1);
    assert!(file.is_dirty());
    file.save().unwrap();

    let mut expected = common::sample_lines();
    expected.remove(22);
    assert_eq!(resource.contents(), expected.join("\n") + "\n");

    let entries = file.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].hostname(), "host2.localhost");
    assert_eq!(entries[0].position(), Some(22));
}

#[test]
fn later_lines_shift_up_after_a_deletion() {
    let (resource, mut file) =
        common::memory_hosts("10.0.0.1\tfirst\n# a comment\n10.0.0.2\tsecond\n10.0.0.3\tthird\n");

    let second = file.entries()[1].clone();
    file.delete_entry(&second);
    file.save().unwrap();

    assert_eq!(
        resource.contents(),
        "10.0.0.1\tfirst\n# a comment\n10.0.0.3\tthird\n"
    );
    assert_eq!(file.entries()[1].hostname(), "third");
    assert_eq!(file.entries()[1].position(), Some(2));
}
