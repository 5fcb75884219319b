#![forbid(unsafe_code)]
use chrono::{NaiveDate, Weekday};
use creneau::{
    model::{DayShifts, Doctor, Leave, TimeRange},
    SlotEngine, SlotError,
};
use std::sync::Arc;
use std::thread;

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

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
}

#[test]
fn reserve_removes_the_slot_from_availability() {
    let engine = SlotEngine::new();
    let id = engine.add_doctor(monday_morning_doctor());

    engine.reserve(&id, monday(), 540, "Amina").unwrap();

    let day = engine.available_slots(&id, monday()).unwrap();
    assert!(day.slots.iter().all(|s| s.start_minute != 540));
    assert_eq!(day.slots.len(), 7);
}

#[test]
fn double_booking_fails_without_writing() {
    let engine = SlotEngine::new();
    let id = engine.add_doctor(monday_morning_doctor());

    engine.reserve(&id, monday(), 540, "Amina").unwrap();
    let err = engine.reserve(&id, monday(), 540, "Bruno").unwrap_err();
    assert!(matches!(err, SlotError::SlotAlreadyBooked));

    let agenda = engine.snapshot();
    assert_eq!(agenda.appointments.len(), 1);
    assert_eq!(agenda.appointments[0].patient, "Amina");
}

#[test]
fn off_grid_time_is_not_available_not_already_booked() {
    let engine = SlotEngine::new();
    let id = engine.add_doctor(monday_morning_doctor());

    // 09:10 n'est pas un début de créneau
    let err = engine.reserve(&id, monday(), 550, "Amina").unwrap_err();
    assert!(matches!(err, SlotError::NotAvailable(_)));

    // en dehors des heures de consultation
    let err = engine.reserve(&id, monday(), 900, "Amina").unwrap_err();
    assert!(matches!(err, SlotError::NotAvailable(_)));
}

#[test]
fn reserve_on_leave_day_is_not_available() {
    let mut doctor = monday_morning_doctor();
    doctor.leaves = vec![Leave::new(monday(), monday(), "conference").unwrap()];
    let engine = SlotEngine::new();
    let id = engine.add_doctor(doctor);

    let err = engine.reserve(&id, monday(), 540, "Amina").unwrap_err();
    assert!(matches!(err, SlotError::NotAvailable(_)));
}

#[test]
fn doctor_not_accepting_short_circuits() {
    let mut doctor = monday_morning_doctor();
    doctor.accepting = false;
    let engine = SlotEngine::new();
    let id = engine.add_doctor(doctor);

    let day = engine.available_slots(&id, monday()).unwrap();
    assert!(day.slots.is_empty());
    assert!(day.on_leave.is_none());

    let err = engine.reserve(&id, monday(), 540, "Amina").unwrap_err();
    assert!(matches!(err, SlotError::NotAvailable(_)));
}

#[test]
fn release_reopens_the_slot() {
    let engine = SlotEngine::new();
    let id = engine.add_doctor(monday_morning_doctor());

    let appointment = engine.reserve(&id, monday(), 540, "Amina").unwrap();
    engine.release(&appointment).unwrap();

    let day = engine.available_slots(&id, monday()).unwrap();
    assert!(day.slots.iter().any(|s| s.start_minute == 540));

    // le créneau libéré se réserve à nouveau
    engine.reserve(&id, monday(), 540, "Bruno").unwrap();
}

#[test]
fn completing_frees_the_slot_too() {
    let engine = SlotEngine::new();
    let id = engine.add_doctor(monday_morning_doctor());

    let appointment = engine.reserve(&id, monday(), 540, "Amina").unwrap();
    engine.confirm(&appointment).unwrap();
    engine.begin(&appointment).unwrap();
    engine.complete(&appointment).unwrap();

    let day = engine.available_slots(&id, monday()).unwrap();
    assert_eq!(day.slots.len(), 8);
}

#[test]
fn closed_appointment_cannot_move_again() {
    let engine = SlotEngine::new();
    let id = engine.add_doctor(monday_morning_doctor());

    let appointment = engine.reserve(&id, monday(), 540, "Amina").unwrap();
    engine.release(&appointment).unwrap();

    let err = engine.confirm(&appointment).unwrap_err();
    assert!(matches!(err, SlotError::BadTransition(_)));
    let err = engine.release(&appointment).unwrap_err();
    assert!(matches!(err, SlotError::BadTransition(_)));
}

#[test]
fn unknown_ids_are_reported_as_such() {
    let engine = SlotEngine::new();
    let id = engine.add_doctor(monday_morning_doctor());

    let err = engine
        .release(&creneau::AppointmentId::new("nope"))
        .unwrap_err();
    assert!(matches!(err, SlotError::UnknownAppointment(_)));

    let err = engine
        .reserve(&creneau::DoctorId::new("nope"), monday(), 540, "Amina")
        .unwrap_err();
    assert!(matches!(err, SlotError::UnknownDoctor(_)));

    // le praticien connu reste intact
    assert_eq!(engine.available_slots(&id, monday()).unwrap().slots.len(), 8);
}

#[test]
fn concurrent_reservations_admit_exactly_one_winner() {
    let engine = Arc::new(SlotEngine::new());
    let id = engine.add_doctor(monday_morning_doctor());

    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = Arc::clone(&engine);
        let id = id.clone();
        handles.push(thread::spawn(move || {
            engine.reserve(&id, monday(), 540, &format!("patient-{i}"))
        }));
    }

    let mut won = 0;
    let mut lost = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(_) => won += 1,
            Err(SlotError::SlotAlreadyBooked) => lost += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(won, 1);
    assert_eq!(lost, 7);

    let agenda = engine.snapshot();
    let active = agenda
        .appointments
        .iter()
        .filter(|a| a.start_minute == 540 && a.status.is_active())
        .count();
    assert_eq!(active, 1);
}

#[test]
fn legacy_off_grid_appointment_does_not_hide_slots_but_blocks_its_minute() {
    let engine = SlotEngine::new();
    let id = engine.add_doctor(monday_morning_doctor());

    // rendez-vous hérité posé à 09:10, hors grille de 30 minutes
    {
        let mut agenda = engine.snapshot();
        agenda.appointments.push(creneau::Appointment {
            id: creneau::AppointmentId::new("legacy"),
            doctor: id.clone(),
            patient: "Ancien".to_string(),
            date: monday(),
            start_minute: 550,
            status: creneau::AppointmentStatus::Confirmed,
        });
        let engine = SlotEngine::with_agenda(agenda);

        // il ne retire aucun candidat…
        let day = engine.available_slots(&id, monday()).unwrap();
        assert_eq!(day.slots.len(), 8);

        // …et sa minute reste introuvable côté réservation
        let err = engine.reserve(&id, monday(), 550, "Amina").unwrap_err();
        assert!(matches!(err, SlotError::NotAvailable(_)));
    }
}
