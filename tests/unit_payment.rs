// Unit tests for the payment change detector.
//
// Exercises the transition-into-PAYMENT rule: creations, recategorizations,
// case-insensitive matching, silence on edits of existing payments, and
// the exact body format including the taka sign.

use serde_json::json;
use tiffin::detect::payment;
use tiffin::notify::TOPIC_ALL;
use tiffin::store::{ChangeEvent, DocumentSnapshot};

fn snapshot(v: serde_json::Value) -> Option<DocumentSnapshot> {
    match v {
        serde_json::Value::Object(map) => Some(DocumentSnapshot::from(map)),
        serde_json::Value::Null => None,
        _ => panic!("snapshot fixtures must be objects or null"),
    }
}

fn event(before: serde_json::Value, after: serde_json::Value) -> ChangeEvent {
    ChangeEvent {
        path: "expenses/e1".to_string(),
        before: snapshot(before),
        after: snapshot(after),
    }
}

// ============================================================
// Transitions into PAYMENT
// ============================================================

#[test]
fn created_payment_notifies_with_full_body() {
    let e = event(
        json!(null),
        json!({"category": "payment", "paidBy": "Carol", "amount": 500, "date": "2024-05-03", "title": "Rent"}),
    );
    let message = payment::detect(&e, TOPIC_ALL).expect("expected a notification");
    assert_eq!(message.title, "Payment Received");
    assert_eq!(message.body, "Carol paid 500৳ - Rent (2024-05-03)");
    assert_eq!(message.data["type"], "payment");
    assert_eq!(message.data["paidBy"], "Carol");
    assert_eq!(message.data["amount"], "500");
    assert_eq!(message.data["date"], "2024-05-03");
}

#[test]
fn recategorized_expense_notifies() {
    let e = event(
        json!({"category": "groceries", "paidBy": "Dan", "amount": 250}),
        json!({"category": "PAYMENT", "paidBy": "Dan", "amount": 250, "date": "2024-05-06"}),
    );
    let message = payment::detect(&e, TOPIC_ALL).unwrap();
    assert_eq!(message.body, "Dan paid 250৳ (2024-05-06)");
}

#[test]
fn category_match_is_case_insensitive_both_sides() {
    // before "Payment" already counts as payment — no re-announcement
    let e = event(
        json!({"category": "Payment"}),
        json!({"category": "PAYMENT", "amount": 100}),
    );
    assert!(payment::detect(&e, TOPIC_ALL).is_none());
}

// ============================================================
// Silence — non-payments, edits of existing payments, deletions
// ============================================================

#[test]
fn non_payment_category_is_silent() {
    let e = event(
        json!(null),
        json!({"category": "groceries", "paidBy": "Eve", "amount": 90}),
    );
    assert!(payment::detect(&e, TOPIC_ALL).is_none());
}

#[test]
fn editing_an_existing_payment_is_silent() {
    let e = event(
        json!({"category": "PAYMENT"}),
        json!({"category": "payment", "amount": 600}),
    );
    assert!(payment::detect(&e, TOPIC_ALL).is_none());
}

#[test]
fn missing_category_is_silent() {
    let e = event(json!(null), json!({"paidBy": "Eve", "amount": 90}));
    assert!(payment::detect(&e, TOPIC_ALL).is_none());
}

#[test]
fn deletion_is_always_silent() {
    let e = ChangeEvent {
        path: "expenses/e1".to_string(),
        before: snapshot(json!({"category": "PAYMENT", "amount": 500})),
        after: None,
    };
    assert!(payment::detect(&e, TOPIC_ALL).is_none());
}

// ============================================================
// Normalization — names, amounts, optional note and date
// ============================================================

#[test]
fn empty_payer_and_null_amount_normalize() {
    let e = event(
        json!({"category": "expense"}),
        json!({"category": "PAYMENT", "paidBy": "", "amount": null}),
    );
    let message = payment::detect(&e, TOPIC_ALL).unwrap();
    assert_eq!(message.body, "Someone paid 0৳");
    assert_eq!(message.data["paidBy"], "");
    assert_eq!(message.data["amount"], "0");
    assert_eq!(message.data["date"], "");
}

#[test]
fn zero_amount_stays_zero_not_empty() {
    // amount uses raw coercion, not the falsy-to-"" rule
    let e = event(
        json!(null),
        json!({"category": "payment", "paidBy": "Frank", "amount": 0}),
    );
    let message = payment::detect(&e, TOPIC_ALL).unwrap();
    assert_eq!(message.body, "Frank paid 0৳");
    assert_eq!(message.data["amount"], "0");
}

#[test]
fn string_and_float_amounts_keep_their_form() {
    let e = event(
        json!(null),
        json!({"category": "payment", "paidBy": "Gia", "amount": "1200.50"}),
    );
    let message = payment::detect(&e, TOPIC_ALL).unwrap();
    assert_eq!(message.body, "Gia paid 1200.50৳");

    let e = event(
        json!(null),
        json!({"category": "payment", "paidBy": "Gia", "amount": 99.5}),
    );
    let message = payment::detect(&e, TOPIC_ALL).unwrap();
    assert_eq!(message.body, "Gia paid 99.5৳");
}

#[test]
fn note_without_date_and_date_without_note() {
    let e = event(
        json!(null),
        json!({"category": "payment", "paidBy": "Hal", "amount": 300, "title": "April dues"}),
    );
    let message = payment::detect(&e, TOPIC_ALL).unwrap();
    assert_eq!(message.body, "Hal paid 300৳ - April dues");

    let e = event(
        json!(null),
        json!({"category": "payment", "paidBy": "Hal", "amount": 300, "date": "2024-05-07"}),
    );
    let message = payment::detect(&e, TOPIC_ALL).unwrap();
    assert_eq!(message.body, "Hal paid 300৳ (2024-05-07)");
}

// ============================================================
// Idempotence
// ============================================================

#[test]
fn redelivered_event_recomputes_the_same_message() {
    let e = event(
        json!(null),
        json!({"category": "payment", "paidBy": "Carol", "amount": 500, "date": "2024-05-03", "title": "Rent"}),
    );
    let first = payment::detect(&e, TOPIC_ALL).unwrap();
    let second = payment::detect(&e, TOPIC_ALL).unwrap();
    assert_eq!(first, second);
}
