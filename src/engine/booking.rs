use super::types::{DayAvailability, SlotError};
use super::{leave, slots};
use crate::model::{
    Agenda, Appointment, AppointmentId, AppointmentStatus, Doctor, DoctorId, TimeSlot,
};
use chrono::NaiveDate;

/// Créneaux encore libres d'une journée : candidats du jour moins les
/// rendez-vous actifs dont l'heure coïncide avec un début de créneau. Un
/// rendez-vous hors grille n'enlève rien (mais reste protégé à la pose).
pub(super) fn day_availability(
    agenda: &Agenda,
    doctor: &Doctor,
    date: NaiveDate,
) -> Result<DayAvailability, SlotError> {
    super::validate::validate_doctor(doctor)?;

    if !doctor.accepting {
        return Ok(DayAvailability {
            date,
            on_leave: None,
            slots: Vec::new(),
        });
    }

    if let Some(leave) = leave::leave_on(&doctor.leaves, date) {
        return Ok(DayAvailability {
            date,
            on_leave: Some(leave.reason.clone()),
            slots: Vec::new(),
        });
    }

    let candidates = slots::candidate_slots(&doctor.schedule, &doctor.breaks, doctor.slot_minutes, date)?;
    let taken: Vec<u16> = agenda
        .active_appointments(&doctor.id, date)
        .iter()
        .map(|a| a.start_minute)
        .collect();

    let free: Vec<TimeSlot> = candidates
        .into_iter()
        .filter(|s| !taken.contains(&s.start_minute))
        .collect();

    Ok(DayAvailability {
        date,
        on_leave: None,
        slots: free,
    })
}

/// Pose un rendez-vous selon le contrat « vérifier puis écrire » : l'appelant
/// (la façade) détient le verrou d'agenda pendant toute la fonction, ce qui
/// rend la double vérification + insertion atomique pour la clé
/// (praticien, date, minute).
pub(super) fn reserve(
    agenda: &mut Agenda,
    doctor_id: &DoctorId,
    date: NaiveDate,
    start_minute: u16,
    patient: &str,
) -> Result<AppointmentId, SlotError> {
    let doctor = agenda
        .find_doctor(doctor_id)
        .ok_or_else(|| SlotError::UnknownDoctor(doctor_id.as_str().to_string()))?;
    super::validate::validate_doctor(doctor)?;

    if !doctor.accepting {
        return Err(SlotError::NotAvailable("doctor not accepting appointments"));
    }
    if leave::leave_on(&doctor.leaves, date).is_some() {
        return Err(SlotError::NotAvailable("doctor on leave"));
    }

    let candidates =
        slots::candidate_slots(&doctor.schedule, &doctor.breaks, doctor.slot_minutes, date)?;
    if !candidates.iter().any(|s| s.start_minute == start_minute) {
        return Err(SlotError::NotAvailable(
            "time is not on the doctor's slot grid for that day",
        ));
    }

    // Relecture au moment du commit : un actif sur la clé suffit à refuser,
    // y compris un rendez-vous hérité hors grille.
    let occupied = agenda
        .appointments
        .iter()
        .any(|a| {
            &a.doctor == doctor_id
                && a.date == date
                && a.start_minute == start_minute
                && a.status.is_active()
        });
    if occupied {
        return Err(SlotError::SlotAlreadyBooked);
    }

    let appointment = Appointment {
        id: AppointmentId::random(),
        doctor: doctor_id.clone(),
        patient: patient.to_string(),
        date,
        start_minute,
        status: AppointmentStatus::Scheduled,
    };
    let id = appointment.id.clone();
    agenda.appointments.push(appointment);
    Ok(id)
}

/// Transition de statut, uniquement vers l'avant ; libérer ou clore un
/// rendez-vous déjà clos est refusé.
pub(super) fn transition(
    agenda: &mut Agenda,
    id: &AppointmentId,
    to: AppointmentStatus,
) -> Result<(), SlotError> {
    let appointment = agenda
        .find_appointment_mut(id)
        .ok_or_else(|| SlotError::UnknownAppointment(id.as_str().to_string()))?;

    use AppointmentStatus as S;
    let allowed = match (appointment.status, to) {
        (S::Scheduled, S::Confirmed | S::InProgress | S::Completed | S::Cancelled) => true,
        (S::Confirmed, S::InProgress | S::Completed | S::Cancelled) => true,
        (S::InProgress, S::Completed | S::Cancelled) => true,
        _ => false,
    };
    if !allowed {
        return Err(SlotError::BadTransition("status can only move forward"));
    }

    appointment.status = to;
    Ok(())
}
