//! Toggling entries rewrites only their lines.

mod common;

#[test]
fn toggles_rewrite_their_lines_and_nothing_else() {
    let (resource, mut file) = common::memory_hosts(&common::sample_hosts());

    {
        let [host1, host2] = file.entries_mut() else {
            panic!("expected two entries");
        };
        host1.set_enabled(false);
        host2.set_enabled(true);
    }
    assert!(file.is_dirty());
    file.save().unwrap();

    let mut expected = common::sample_lines();
    expected[22] = "# 127.0.0.1\thost1.localhost".to_string();
    expected[23] = "127.0.0.1\thost2.localhost".to_string();
    assert_eq!(resource.contents(), expected.join("\n") + "\n");
}

#[test]
fn save_reloads_clean_state() {
    let (_, mut file) = common::memory_hosts(&common::sample_hosts());

    file.entries_mut()[0].set_enabled(false);
    file.save().unwrap();

    assert!(!file.is_dirty());
    let entries = file.entries();
    assert!(!entries[0].enabled());
    assert_eq!(entries[0].position(), Some(22));
    assert_eq!(entries[0].original(), Some("# 127.0.0.1\thost1.localhost"));
}

#[test]
fn redundant_toggle_writes_nothing() {
    let (_, mut file) = common::memory_hosts(&common::sample_hosts());

    file.entries_mut()[0].set_enabled(true);
    assert!(!file.is_dirty());
}

#[test]
fn save_normalizes_crlf_to_lf() {
    let (resource, mut file) = common::memory_hosts("127.0.0.1\thost1\r\n# 10.0.0.1\thost2\r\n");

    file.entries_mut()[1].set_enabled(true);
    file.save().unwrap();

    assert_eq!(resource.contents(), "127.0.0.1\thost1\n10.0.0.1\thost2\n");
}
