use chrono::NaiveDateTime;

/// Anything that exposes an optional textual due date can be ranked.
pub trait Dated {
    /// The raw due-date text, exactly as stored. `None` when the field is absent.
    fn due_date(&self) -> Option<&str>;
}

/// A JSON object is ranked by its `due_date` member when that member is a string.
///
/// Any other shape (missing member, `null`, number) counts as absent.
impl Dated for serde_json::Value {
    fn due_date(&self) -> Option<&str> {
        self.get("due_date").and_then(|v| v.as_str())
    }
}

/// The rank key computed once per record.
///
/// Variant order matters: the derived `Ord` places every `Scheduled` value before any
/// `Unparseable` one, and every `Unparseable` before `Blank`. Values inside the last two
/// buckets compare equal so a stable sort keeps their input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DueDate {
    /// A parsed instant, normalized to UTC.
    Scheduled(NaiveDateTime),
    /// Non-blank text that matches none of the accepted formats.
    Unparseable,
    /// One of the blank sentinels, or an absent field.
    Blank,
}
