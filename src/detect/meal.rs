// Meal change detection — rising edges on the three daily meal flags.
//
// A meal record is one member's flags for one day. We notify only when a
// flag goes 0 -> 1 in this write; flips back to 0, no-op rewrites of 1,
// and edits to unrelated fields stay silent. A record created with flags
// already at 1 counts too — there was no literal transition, but the meals
// are new to everyone subscribed.

use std::collections::BTreeMap;

use crate::notify::NotificationMessage;
use crate::store::{as_num, as_str, ChangeEvent};

/// Field key and human-readable label for each meal, in announcement order.
const MEALS: [(&str, &str); 3] = [
    ("breakfast", "Breakfast"),
    ("lunch", "Lunch"),
    ("dinner", "Dinner"),
];

/// Decide whether this write to a meal record warrants a notification.
///
/// Returns at most one message per write, aggregating every flag that rose
/// in it ("Alice added: Breakfast, Lunch"). Deletions never notify.
pub fn detect(event: &ChangeEvent, topic: &str) -> Option<NotificationMessage> {
    let after = event.after.as_ref()?;
    let before = event.before.as_ref();

    let member_name = as_str(Some(after), "memberName");
    let date = as_str(Some(after), "date");

    let mut added: Vec<&str> = Vec::new();
    for (key, label) in MEALS {
        let was = as_num(before, key);
        let now = as_num(Some(after), key);
        if was == 0 && now == 1 {
            added.push(label);
        }
    }

    // First-time creation: count initial 1s even if the rising-edge pass
    // somehow missed them (a created doc has no before to transition from).
    if before.is_none() {
        for (key, label) in MEALS {
            if as_num(Some(after), key) == 1 && !added.contains(&label) {
                added.push(label);
            }
        }
    }

    if added.is_empty() {
        return None;
    }

    let who = if member_name.is_empty() {
        "Someone"
    } else {
        member_name.as_str()
    };
    let when = if date.is_empty() {
        String::new()
    } else {
        format!(" ({date})")
    };
    let body = format!("{who} added: {}{when}", added.join(", "));

    let mut data = BTreeMap::new();
    data.insert("type".to_string(), "meal".to_string());
    data.insert("memberName".to_string(), member_name.clone());
    data.insert("date".to_string(), date);
    data.insert("added".to_string(), added.join(","));

    Some(NotificationMessage {
        topic: topic.to_string(),
        title: "Meal Updated".to_string(),
        body,
        data,
    })
}
