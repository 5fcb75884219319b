use crate::model::Leave;
use chrono::NaiveDate;

/// Premier congé couvrant la date, en ordre de liste : c'est son motif qui
/// est rapporté. Granularité jour civil, bornes incluses.
pub(super) fn leave_on(leaves: &[Leave], date: NaiveDate) -> Option<&Leave> {
    leaves.iter().find(|l| l.covers(date))
}
