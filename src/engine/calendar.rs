use super::leave;
use super::types::{DayCell, DayStatus, SlotError};
use crate::model::Doctor;
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Classe une case par rapport à un mois affiché : hors-mois d'abord, puis
/// aujourd'hui, sélection, congé, et enfin travaillé/chômé.
pub(super) fn classify(
    doctor: &Doctor,
    date: NaiveDate,
    today: NaiveDate,
    selected: NaiveDate,
    focus: (i32, u32),
) -> DayStatus {
    if (date.year(), date.month()) != focus {
        return DayStatus::OutsideMonth;
    }
    if date == today {
        return DayStatus::Today;
    }
    if date == selected {
        return DayStatus::Selected;
    }
    if leave::leave_on(&doctor.leaves, date).is_some() {
        return DayStatus::OnLeave;
    }
    if doctor.schedule.is_open_on(date.weekday()) {
        DayStatus::Working
    } else {
        DayStatus::NonWorking
    }
}

/// Le mois de référence est celui de la date sélectionnée (le mois que le
/// calendrier affiche).
pub(super) fn day_status(
    doctor: &Doctor,
    date: NaiveDate,
    today: NaiveDate,
    selected: NaiveDate,
) -> DayStatus {
    classify(
        doctor,
        date,
        today,
        selected,
        (selected.year(), selected.month()),
    )
}

/// Grille 6×7 commençant le lundi, telle que consommée par une vue mensuelle.
pub(super) fn month_grid(
    doctor: &Doctor,
    year: i32,
    month: u32,
    today: NaiveDate,
    selected: NaiveDate,
) -> Result<Vec<DayCell>, SlotError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(SlotError::InvalidArgument("invalid year/month"))?;

    // pas à pas vérifié : aux bornes du calendrier chrono, la grille déborde
    // du mois affiché et doit échouer proprement, pas paniquer
    let lead = first.weekday().days_since(Weekday::Mon);
    let mut cursor = first
        .checked_sub_days(Days::new(u64::from(lead)))
        .ok_or(SlotError::InvalidArgument("month outside calendar range"))?;

    let mut cells = Vec::with_capacity(42);
    for i in 0..42 {
        cells.push(DayCell {
            date: cursor,
            status: classify(doctor, cursor, today, selected, (year, month)),
        });
        if i < 41 {
            cursor = cursor
                .succ_opt()
                .ok_or(SlotError::InvalidArgument("month outside calendar range"))?;
        }
    }
    Ok(cells)
}
