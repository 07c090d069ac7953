//! Property-based tests for bookmark store operations.
//!
//! These tests verify that paging partitions an owner's bookmarks, that
//! owners never see each other's rows, and that a created bookmark is
//! always found by searching for its title.

use std::collections::HashSet;

use linkvault::database::Database;
use linkvault::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use linkvault::types::bookmark::{ListOptions, NewBookmark, SortDirection, SortField};
use proptest::prelude::*;

/// Strategy for generating valid URL strings.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,15}",
        prop_oneof![Just(".com"), Just(".org"), Just(".net"), Just(".io")],
        proptest::option::of("/[a-z0-9]{1,10}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}://{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

/// Strategy for generating non-empty bookmark titles.
fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{1,30}"
}

fn arb_sort() -> impl Strategy<Value = (SortField, SortDirection)> {
    (
        prop_oneof![
            Just(SortField::CreatedAt),
            Just(SortField::UpdatedAt),
            Just(SortField::Title),
        ],
        prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)],
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Walking every page returns each bookmark exactly once.
    #[test]
    fn pages_partition_the_result_set(
        count in 0usize..30,
        limit in 1u32..12,
        (sort, order) in arb_sort(),
    ) {
        let db = Database::open_in_memory()
            .expect("Failed to open in-memory database");
        let mut manager = BookmarkManager::new(db.connection());
        for i in 0..count {
            manager
                .create_bookmark("owner", NewBookmark::new(format!("https://site.example/{i}"), format!("Title {}", i % 4)))
                .expect("create_bookmark should succeed");
        }

        let mut seen = HashSet::new();
        let mut page = 1;
        loop {
            let options = ListOptions { page, limit, search: None, sort, order };
            let result = manager.list_bookmarks("owner", &options).expect("list_bookmarks should succeed");
            prop_assert_eq!(result.total, count as i64);
            prop_assert!(result.items.len() <= limit as usize);
            if result.items.is_empty() {
                break;
            }
            for bm in result.items {
                prop_assert!(seen.insert(bm.id), "bookmark returned on two pages");
            }
            page += 1;
        }
        prop_assert_eq!(seen.len(), count);
    }

    /// One owner's bookmarks are invisible to another owner.
    #[test]
    fn owners_are_isolated(url in arb_url(), title in arb_title()) {
        let db = Database::open_in_memory()
            .expect("Failed to open in-memory database");
        let mut manager = BookmarkManager::new(db.connection());

        let bm = manager
            .create_bookmark("alice", NewBookmark::new(url.clone(), title))
            .expect("create_bookmark should succeed");

        prop_assert!(manager.get_bookmark(&bm.id, "bob").unwrap().is_none());
        prop_assert!(manager.find_existing("bob", &url).unwrap().is_none());
        prop_assert_eq!(manager.list_bookmarks("bob", &ListOptions::default()).unwrap().total, 0);
        prop_assert!(!manager.delete_bookmark(&bm.id, "bob").unwrap());
        prop_assert!(manager.get_bookmark(&bm.id, "alice").unwrap().is_some());

        // The same URL is still free for the other owner.
        prop_assert!(manager.create_bookmark("bob", NewBookmark::new(url, "Copy")).is_ok());
    }

    /// Creating a bookmark then searching by its title finds it.
    #[test]
    fn bookmark_create_then_search_returns_result(
        url in arb_url(),
        title in arb_title(),
    ) {
        let db = Database::open_in_memory()
            .expect("Failed to open in-memory database");
        let mut manager = BookmarkManager::new(db.connection());

        let bm = manager
            .create_bookmark("owner", NewBookmark::new(url, title.clone()))
            .expect("create_bookmark should succeed for valid inputs");

        let options = ListOptions {
            search: Some(title),
            ..ListOptions::default()
        };
        let results = manager
            .list_bookmarks("owner", &options)
            .expect("list_bookmarks should succeed");

        prop_assert!(
            results.items.iter().any(|b| b.id == bm.id),
            "Search by title did not return the created bookmark"
        );
    }
}
