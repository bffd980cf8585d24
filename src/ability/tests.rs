//! Integration tests for the ability module

use super::*;

#[test]
fn test_ability_hierarchy() {
    let ability = "org.projects.tasks.close";

    let mut current = Some(ability);
    let mut hierarchy = Vec::new();

    while let Some(path) = current {
        hierarchy.push(path);
        current = parent(path);
    }

    assert_eq!(
        hierarchy,
        vec![
            "org.projects.tasks.close",
            "org.projects.tasks",
            "org.projects",
            "org",
        ]
    );
}

#[test]
fn test_ancestors_agrees_with_parent_walk() {
    let ability = "a.b.c.d";

    let via_iterator: Vec<&str> = ancestors(ability).collect();

    let mut via_parent = Vec::new();
    let mut current = Some(ability);
    while let Some(path) = current {
        via_parent.push(path);
        current = parent(path);
    }

    assert_eq!(via_iterator, via_parent);
}

#[test]
fn test_membership_distributes_over_union() {
    let own: AbilitySet = ["user.list"].into_iter().collect();
    let granted: AbilitySet = ["roles"].into_iter().collect();

    let mut union = own.clone();
    union.merge(&granted);

    for ability in ["user.list", "user.list.active", "roles.delete.bulk", "audit"] {
        let split = own.contains(ability) || granted.contains(ability);
        assert_eq!(union.contains(ability), split, "diverged on '{}'", ability);
    }
}

#[test]
fn test_storage_text_normalizes() {
    // Abilities persisted as one newline-joined column, sloppy whitespace
    let stored = "user.list\nroles\n\n   \nuser.update.self\n";
    let set = AbilitySet::from_lines(stored);

    assert_eq!(set.len(), 3);
    assert!(set.contains("roles.delete"));
    assert!(set.contains("user.update.self"));
    assert!(!set.contains("user.update"));
}

#[test]
fn test_owner_suffix_only_on_final_segment() {
    // A numeric segment in the middle is not an owner suffix
    assert_eq!(owner_suffix("user.7.update"), None);
    assert_eq!(owner_suffix("user.7.update.3"), Some(("user.7.update", 3)));
}
