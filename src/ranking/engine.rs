use super::parser::classify;
use super::types::Dated;

/// Rank records by due date: scheduled records first (earliest first), then those with
/// unparseable dates, then blank or absent ones. Equal keys keep their input order.
pub fn rank<T: Dated>(records: Vec<T>) -> Vec<T> {
    rank_by(records, |record| record.due_date())
}

/// Same ordering as [`rank`], reading the due date through `due_date` instead of the
/// `Dated` trait. Record contents are never touched, only moved.
pub fn rank_by<T, F>(mut records: Vec<T>, due_date: F) -> Vec<T>
where
    F: Fn(&T) -> Option<&str>,
{
    // sort_by_cached_key is stable and calls `classify` once per record.
    records.sort_by_cached_key(|record| classify(due_date(record)));
    records
}
