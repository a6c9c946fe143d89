//! Library Merge Integration Tests
//!
//! Ownership union, first-writer-wins backfill, and identity properties of
//! the merge reducer.

use openvalve::domain::{CatalogEntry, Classification, Price, RawEntry};
use openvalve::library::{merge_library, merge_value, sort_by_name};
use serde_json::json;

fn catalog(value: serde_json::Value) -> Vec<RawEntry> {
    RawEntry::parse_list(&value)
}

#[test]
fn test_empty_incoming_is_identity() {
    let library = merge_library(
        &[],
        &catalog(json!([
            { "appid": 1, "name": "A", "tags": ["x"] },
            { "appid": 2, "name": "B", "price": "4.99" }
        ])),
        "Alice",
    );

    assert_eq!(merge_library(&library, &[], "Bob"), library);
    assert_eq!(merge_value(&library, &json!([]), "Bob"), library);
    assert_eq!(merge_value(&library, &json!("garbage"), "Bob"), library);
}

#[test]
fn test_same_owner_twice_does_not_duplicate() {
    let games = catalog(json!([
        { "appid": 1, "name": "A" },
        { "appid": 2, "name": "B" }
    ]));

    let once = merge_library(&[], &games, "Alice");
    let twice = merge_library(&once, &games, "Alice");

    assert_eq!(twice, once);
    assert!(twice.iter().all(|e| e.owners == vec!["Alice"]));
}

#[test]
fn test_owners_in_order_of_first_appearance() {
    let alice = catalog(json!([{ "appid": 620, "name": "Portal 2" }]));
    let bob = catalog(json!([{ "appid": 620, "name": "Portal 2" }, { "appid": 400, "name": "Portal" }]));
    let carol = catalog(json!([{ "appid": 400, "name": "Portal" }, { "appid": 620, "name": "Portal 2" }]));

    let mut library = merge_library(&[], &alice, "Alice");
    library = merge_library(&library, &bob, "Bob");
    library = merge_library(&library, &carol, "Carol");
    library = merge_library(&library, &alice, "Alice");
    sort_by_name(&mut library);

    assert_eq!(library.len(), 2);
    assert_eq!(library[0].name(), "Portal");
    assert_eq!(library[0].owners, vec!["Bob", "Carol"]);
    assert_eq!(library[1].name(), "Portal 2");
    assert_eq!(library[1].owners, vec!["Alice", "Bob", "Carol"]);
}

#[test]
fn test_populated_fields_are_never_overwritten() {
    let first = catalog(json!([{
        "appid": 1,
        "name": "A",
        "description": "Original",
        "release_date": "Oct 10, 2007",
        "userScore": 87,
        "genres": [{ "id": "1", "description": "Action" }]
    }]));
    let second = catalog(json!([{
        "appid": 1,
        "name": "A (renamed)",
        "description": "Replacement",
        "release_date": "Jan 1, 2020",
        "userScore": 12,
        "genres": ["Casual"],
        "categories": ["Single-player"]
    }]));

    let library = merge_library(&merge_library(&[], &first, "Alice"), &second, "Bob");
    let entry = &library[0];

    assert_eq!(entry.name(), "A");
    assert_eq!(entry.game.description, Some(json!("Original")));
    assert_eq!(entry.game.release_date, Some(json!("Oct 10, 2007")));
    assert_eq!(entry.game.user_score, Some(json!(87)));
    assert_eq!(entry.game.genres.as_ref().unwrap().labels(), vec!["Action"]);
    // absent before, so backfilled
    assert_eq!(
        entry.game.categories,
        Some(Classification::from_labels(["Single-player"]))
    );
}

#[test]
fn test_documented_example() {
    let library = merge_value(&[], &json!([{ "appid": 1, "name": "A", "tags": ["x"] }]), "Alice");
    assert_eq!(
        serde_json::to_value(&library).unwrap(),
        json!([{ "appid": 1, "name": "A", "tags": ["x"], "owners": ["Alice"] }])
    );

    let library = merge_value(
        &library,
        &json!([{ "appid": 1, "name": "A", "tags": ["y"], "price": 5 }]),
        "Bob",
    );
    assert_eq!(
        serde_json::to_value(&library).unwrap(),
        json!([{ "appid": 1, "name": "A", "tags": ["x"], "price": 5, "owners": ["Alice", "Bob"] }])
    );
    assert_eq!(library[0].game.price.as_ref().and_then(Price::amount), Some(5.0));
}

#[test]
fn test_unusual_metadata_shapes_are_kept() {
    let library = merge_value(
        &[],
        &json!([{
            "appid": 1,
            "name": "A",
            "userScore": 8.5,
            "release_date": { "coming_soon": false, "date": "Oct 10, 2007" },
            "description": 42
        }]),
        "Alice",
    );

    assert_eq!(
        serde_json::to_value(&library).unwrap(),
        json!([{
            "appid": 1,
            "name": "A",
            "userScore": 8.5,
            "release_date": { "coming_soon": false, "date": "Oct 10, 2007" },
            "description": 42,
            "owners": ["Alice"]
        }])
    );
}

#[test]
fn test_unusual_metadata_shapes_are_backfilled() {
    let library = merge_value(&[], &json!([{ "appid": 1, "name": "A", "userScore": 0 }]), "Alice");
    let library = merge_value(
        &library,
        &json!([{
            "appid": 1,
            "name": "A",
            "userScore": 8.5,
            "release_date": { "coming_soon": true, "date": "" },
            "tags": "Indie"
        }]),
        "Bob",
    );

    let game = &library[0].game;
    assert_eq!(game.user_score, Some(json!(8.5)));
    assert_eq!(game.release_date, Some(json!({ "coming_soon": true, "date": "" })));
    assert_eq!(game.tags, Some(Classification::Other(json!("Indie"))));
}

#[test]
fn test_price_text_is_kept_as_received() {
    let library = merge_value(&[], &json!([{ "appid": 1, "name": "A", "price": "0.00" }]), "Alice");
    let library = merge_value(
        &library,
        &json!([{ "appid": 1, "name": "A", "price": "19.99" }]),
        "Bob",
    );

    assert_eq!(
        serde_json::to_value(&library).unwrap(),
        json!([{ "appid": 1, "name": "A", "price": "0.00", "owners": ["Alice", "Bob"] }])
    );

    // a numeric zero is a placeholder and gets filled
    let library = merge_value(&[], &json!([{ "appid": 2, "name": "B", "price": 0 }]), "Alice");
    let library = merge_value(&library, &json!([{ "appid": 2, "name": "B", "price": "19.99" }]), "Bob");
    assert_eq!(library[0].game.price, Some(Price::from("19.99")));
}

#[test]
fn test_extra_fields_come_from_first_owner() {
    let library = merge_value(
        &[],
        &json!([{ "appid": 70, "name": "Half-Life", "playtime_forever": 120 }]),
        "Alice",
    );
    let library = merge_value(
        &library,
        &json!([{ "appid": 70, "name": "Half-Life", "playtime_forever": 9000 }]),
        "Bob",
    );

    assert_eq!(library[0].game.extra.get("playtime_forever"), Some(&json!(120)));
}

#[test]
fn test_library_round_trips_through_json() {
    let library = merge_value(
        &[],
        &json!([
            { "appid": 1, "name": "A", "tags": { "FPS": 10 }, "price": "9.99" },
            { "appid": 2, "name": "B", "genres": [{ "description": "RPG" }] }
        ]),
        "Alice",
    );

    let text = serde_json::to_string(&library).unwrap();
    let back: Vec<CatalogEntry> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, library);
}
