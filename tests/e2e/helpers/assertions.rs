use serde_json::Value;

/// Ids of the rendered recipes in response order.
pub fn feed_ids(feed: &Value) -> Vec<i64> {
    feed["recipes"]
        .as_array()
        .expect("Missing recipes array")
        .iter()
        .map(|r| r["id"].as_i64().expect("Missing recipe id"))
        .collect()
}

pub fn assert_card_response(card: &Value) {
    assert!(card.get("id").and_then(|v| v.as_i64()).is_some());
    assert!(card.get("title").and_then(|v| v.as_str()).is_some());
    assert!(card.get("servings").and_then(|v| v.as_i64()).is_some());
    assert!(card.get("total_time_minutes").and_then(|v| v.as_i64()).is_some());
    assert!(card.get("time_of_creation").is_some());
    assert!(card.get("users_id").and_then(|v| v.as_str()).is_some());
    assert!(card.get("category_name").and_then(|v| v.as_str()).is_some());

    for flag in ["is_liked", "can_like", "can_manage", "show_author"] {
        assert!(
            card.get(flag).and_then(|v| v.as_bool()).is_some(),
            "Missing {} flag",
            flag
        );
    }
}

pub fn assert_no_matches(feed: &Value) {
    assert_eq!(feed["no_matches"], Value::Bool(true));
    assert!(feed_ids(feed).is_empty());
}
