#![forbid(unsafe_code)]
use chrono::{NaiveDate, Weekday};
use creneau::{
    model::{DayShifts, Doctor, TimeRange},
    prepare_reminder, SlotEngine, TextReminder,
};

fn monday_morning_doctor() -> Doctor {
    let mut doctor = Doctor::new("Dr Martin");
    doctor.slot_minutes = 30;
    doctor.schedule.working_days = vec![Weekday::Mon];
    doctor.schedule.shifts = vec![DayShifts {
        day: Weekday::Mon,
        morning: Some(TimeRange::new(540, 780).unwrap()),
        evening: None,
    }];
    doctor
}

#[test]
fn reminder_targets_the_next_active_appointment() {
    let engine = SlotEngine::new();
    let id = engine.add_doctor(monday_morning_doctor());

    let near = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
    let far = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
    let cancelled = engine.reserve(&id, near, 540, "Amina").unwrap();
    engine.reserve(&id, far, 540, "Amina").unwrap();
    engine.release(&cancelled).unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let reminder =
        prepare_reminder(&engine.snapshot(), "Amina", 2, today, &TextReminder).unwrap();

    // le rendez-vous annulé est ignoré, le prochain actif est retenu
    assert_eq!(reminder.notice_on, NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    assert!(reminder.content.contains("Dr Martin"));
    assert!(reminder.content.contains("09:00"));
}

#[test]
fn no_upcoming_appointment_is_an_error() {
    let engine = SlotEngine::new();
    engine.add_doctor(monday_morning_doctor());

    let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let result = prepare_reminder(&engine.snapshot(), "Amina", 2, today, &TextReminder);
    assert!(result.is_err());
}
