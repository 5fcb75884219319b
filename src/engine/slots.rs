use super::types::SlotError;
use crate::model::{BreakRule, TimeRange, TimeSlot, WeeklySchedule, MINUTES_PER_DAY};
use chrono::{Datelike, NaiveDate};

/// Candidats d'une journée, avant congés et réservations : pavage strict des
/// demi-journées (matin puis soir), pauses du jour soustraites, ordre
/// croissant garanti.
pub(super) fn candidate_slots(
    schedule: &WeeklySchedule,
    breaks: &[BreakRule],
    slot_minutes: u16,
    date: NaiveDate,
) -> Result<Vec<TimeSlot>, SlotError> {
    if slot_minutes == 0 || slot_minutes > MINUTES_PER_DAY {
        return Err(SlotError::InvalidDuration);
    }

    let weekday = date.weekday();
    if !schedule.is_open_on(weekday) {
        return Ok(Vec::new());
    }

    let day = match schedule.shifts_for(weekday) {
        Some(day) => day,
        None => return Ok(Vec::new()),
    };

    let day_breaks: Vec<&BreakRule> = breaks.iter().filter(|b| b.applies_on(weekday)).collect();

    let mut out = Vec::new();
    for range in [&day.morning, &day.evening].into_iter().flatten() {
        tile_range(range, slot_minutes, date, &day_breaks, &mut out);
    }
    Ok(out)
}

/// Pave `[start, end)` en créneaux consécutifs ; un créneau partiel en fin de
/// plage est abandonné, jamais raccourci.
fn tile_range(
    range: &TimeRange,
    slot_minutes: u16,
    date: NaiveDate,
    day_breaks: &[&BreakRule],
    out: &mut Vec<TimeSlot>,
) {
    let mut cursor = u32::from(range.start);
    let duration = u32::from(slot_minutes);
    let end = u32::from(range.end.min(MINUTES_PER_DAY));

    while cursor + duration <= end {
        let slot = TimeSlot {
            date,
            start_minute: cursor as u16,
            duration_minutes: slot_minutes,
        };
        if !day_breaks.iter().any(|b| overlaps_break(&slot, b)) {
            out.push(slot);
        }
        cursor += duration;
    }
}

/// Chevauchement strict demi-ouvert : un créneau qui touche une pause sans
/// l'entamer reste valide.
fn overlaps_break(slot: &TimeSlot, rule: &BreakRule) -> bool {
    slot.start_minute < rule.end && slot.end_minute() > rule.start
}
