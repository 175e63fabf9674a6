//! Behaviour of the front matter key upsert on whole documents

use mattertime::upsert_key;
use pretty_assertions::assert_eq;

#[test]
fn test_keeps_other_keys_when_updating() {
    let content = r#"---
some: parameter
toto: oldValue
---

# Hello
 "#;

    let result = upsert_key(content, "toto", "tata");
    assert_eq!(
        result,
        r#"---
some: parameter
toto: tata
---

# Hello
 "#
    );
}

#[test]
fn test_updates_existing_key() {
    let content = "---\nsome: parameter\n---\n\n# Hello\n";
    let result = upsert_key(content, "some", "value");
    assert_eq!(result, "---\nsome: value\n---\n\n# Hello\n");
}

#[test]
fn test_leaves_nested_structures_alone() {
    let content = r#"---
some: parameter
tags: test/🟩
some:
 some:
   some: 5
   some: 6
 some:
   some: 'Important!'
---

# Hello
"#;

    let result = upsert_key(content, "some", "value");
    assert_eq!(
        result,
        r#"---
some: value
tags: test/🟩
some:
 some:
   some: 5
   some: 6
 some:
   some: 'Important!'
---

# Hello
"#
    );
}

#[test]
fn test_unrelated_key_leaves_nested_block_alone() {
    let content = "---\nsome:\n  some: 5\n---\nbody\n";
    let result = upsert_key(content, "updated", "2024-05-01T10:30");
    assert_eq!(
        result,
        "---\nsome:\n  some: 5\nupdated: 2024-05-01T10:30\n---\nbody\n"
    );
}

#[test]
fn test_synthesizes_block_without_front_matter() {
    assert_eq!(
        upsert_key("# Hello", "myKey", "myValue"),
        "---\nmyKey: myValue\n---\n# Hello"
    );
    assert_eq!(upsert_key("# Hello", "k", "v"), "---\nk: v\n---\n# Hello");
}

#[test]
fn test_body_delimiters_are_not_front_matter() {
    let content = "# Hello\n---\nsome: stuff here\n---";
    let result = upsert_key(content, "myKey", "myValue");
    assert_eq!(
        result,
        "---\nmyKey: myValue\n---\n# Hello\n---\nsome: stuff here\n---"
    );
}

#[test]
fn test_appends_missing_key() {
    let content = "---\nold: data\n---\n\n# Hello\n";
    let result = upsert_key(content, "some", "value");
    assert_eq!(result, "---\nold: data\nsome: value\n---\n\n# Hello\n");
}

#[test]
fn test_only_first_block_is_touched() {
    let content = r#"---
old: data
---

# Hello

---
second: block
---
"#;

    let result = upsert_key(content, "some", "value");
    assert_eq!(
        result,
        r#"---
old: data
some: value
---

# Hello

---
second: block
---
"#
    );

    let result = upsert_key(content, "second", "changed");
    assert!(result.ends_with("---\nsecond: block\n---\n"));
    assert!(result.starts_with("---\nold: data\nsecond: changed\n---\n"));
}

#[test]
fn test_empty_document() {
    assert_eq!(upsert_key("", "some", "value"), "---\nsome: value\n---\n");
}

#[test]
fn test_no_trailing_newline_after_closing_delimiter() {
    let content = "---\nold: data\n---";
    assert_eq!(
        upsert_key(content, "some", "value"),
        "---\nold: data\nsome: value\n---"
    );
    assert_eq!(upsert_key(content, "old", "new"), "---\nold: new\n---");
}

#[test]
fn test_front_matter_only_document() {
    let content = "---\ntitle: x\n---\n";
    assert_eq!(
        upsert_key(content, "updated", "now"),
        "---\ntitle: x\nupdated: now\n---\n"
    );
}

#[test]
fn test_unicode_passes_through() {
    let content = "---\ntitre: Été 🌞\n---\nCorps: 日本語\n";
    assert_eq!(
        upsert_key(content, "titre", "Hiver ❄️"),
        "---\ntitre: Hiver ❄️\n---\nCorps: 日本語\n"
    );
}

#[test]
fn test_unclosed_block_is_wrapped_not_corrupted() {
    let content = "---\ntitle: never closed\n\nbody";
    let result = upsert_key(content, "k", "v");
    assert_eq!(result, format!("---\nk: v\n---\n{}", content));
}

#[test]
fn test_same_inputs_same_output() {
    let content = "---\na: 1\n---\nbody";
    let first = upsert_key(content, "b", "2");
    let second = upsert_key(content, "b", "2");
    assert_eq!(first, second);
    assert_eq!(upsert_key(&first, "b", "2"), first);
}
