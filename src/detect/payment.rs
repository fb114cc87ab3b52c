// Payment detection — the transition INTO the PAYMENT category.
//
// Expense records carry a free-form category; the one special value is
// PAYMENT (a member settling their dues). We notify when a record lands in
// that category — created as one, or recategorized into it — and stay
// silent on every later edit of an already-payment record, so bumping the
// amount or fixing a typo doesn't re-announce the payment.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::notify::NotificationMessage;
use crate::store::{as_str, ChangeEvent};

/// Category value that marks a settlement. Comparison is case-insensitive;
/// clients store whatever casing they like.
pub const CATEGORY_PAYMENT: &str = "PAYMENT";

/// Decide whether this write to an expense record warrants a notification.
pub fn detect(event: &ChangeEvent, topic: &str) -> Option<NotificationMessage> {
    let after = event.after.as_ref()?;

    let cat_after = as_str(Some(after), "category").to_uppercase();
    if cat_after != CATEGORY_PAYMENT {
        return None;
    }

    // Only the transition counts: if the record already was a payment,
    // this write is an edit, not a new settlement.
    let cat_before = as_str(event.before.as_ref(), "category").to_uppercase();
    if event.before.is_some() && cat_before == CATEGORY_PAYMENT {
        return None;
    }

    let paid_by = as_str(Some(after), "paidBy");
    // Amount keeps its raw string form (0 stays "0", floats keep their
    // decimals); only missing/null normalizes to "0".
    let amount = raw_amount(after.get("amount"));
    let date = as_str(Some(after), "date");
    let note_title = as_str(Some(after), "title");

    let who = if paid_by.is_empty() {
        "Someone"
    } else {
        paid_by.as_str()
    };
    let note = if note_title.is_empty() {
        String::new()
    } else {
        format!(" - {note_title}")
    };
    let when = if date.is_empty() {
        String::new()
    } else {
        format!(" ({date})")
    };
    let body = format!("{who} paid {amount}৳{note}{when}");

    let mut data = BTreeMap::new();
    data.insert("type".to_string(), "payment".to_string());
    data.insert("paidBy".to_string(), paid_by.clone());
    data.insert("amount".to_string(), amount);
    data.insert("date".to_string(), date);

    Some(NotificationMessage {
        topic: topic.to_string(),
        title: "Payment Received".to_string(),
        body,
        data,
    })
}

/// Amount uses its own coercion, not the falsy-to-"" rule: a recorded
/// amount of 0 must still read "0" in the body, and only a missing or
/// null value normalizes to "0".
fn raw_amount(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "0".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}
