// Change detectors — the decision logic of the whole system.
//
// Each detector is a pure function from a ChangeEvent to zero or one
// NotificationMessage. Keeping them free of I/O is what makes every
// scenario directly unit-testable; the pipeline module owns dispatch.

pub mod meal;
pub mod payment;
