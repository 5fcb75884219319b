mod booking;
mod calendar;
mod leave;
mod slots;
mod types;
mod validate;

pub use types::{DayAvailability, DayCell, DayStatus, IssueKind, ScheduleIssue, SlotError};

use crate::model::{
    Agenda, AppointmentId, AppointmentStatus, Doctor, DoctorId, TimeSlot,
};
use chrono::NaiveDate;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// SlotEngine : encapsule l'Agenda et sérialise les réservations.
///
/// Les calculs (créneaux, congés, calendrier) sont purs ; la seule ressource
/// disputée est la clé (praticien, date, minute), d'où l'Agenda sous Mutex :
/// `reserve` revalide et écrit sous un seul verrou, sans attente de créneau.
#[derive(Debug, Default)]
pub struct SlotEngine {
    agenda: Mutex<Agenda>,
}

impl SlotEngine {
    pub fn new() -> Self {
        Self {
            agenda: Mutex::new(Agenda::default()),
        }
    }

    pub fn with_agenda(agenda: Agenda) -> Self {
        Self {
            agenda: Mutex::new(agenda),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Agenda> {
        // un poison ne laisse jamais l'agenda dans un état partiel : chaque
        // mutation est une écriture unique en fin de section critique
        self.agenda.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copie de travail de l'agenda (listing, export, persistance).
    pub fn snapshot(&self) -> Agenda {
        self.lock().clone()
    }

    pub fn add_doctor(&self, doctor: Doctor) -> DoctorId {
        let id = doctor.id.clone();
        self.lock().doctors.push(doctor);
        id
    }

    pub fn doctor_id_by_name(&self, name: &str) -> Option<DoctorId> {
        self.lock().find_doctor_by_name(name).map(|d| d.id.clone())
    }

    /// Mutation ciblée d'une fiche praticien (imports, bascule `accepting`…).
    pub fn update_doctor<F>(&self, id: &DoctorId, apply: F) -> Result<(), SlotError>
    where
        F: FnOnce(&mut Doctor),
    {
        let mut agenda = self.lock();
        let doctor = agenda
            .find_doctor_mut(id)
            .ok_or_else(|| SlotError::UnknownDoctor(id.as_str().to_string()))?;
        apply(doctor);
        Ok(())
    }

    /// Validation de la fiche : erreur dure sur toute borne inversée.
    pub fn validate(&self, id: &DoctorId) -> Result<(), SlotError> {
        let agenda = self.lock();
        let doctor = agenda
            .find_doctor(id)
            .ok_or_else(|| SlotError::UnknownDoctor(id.as_str().to_string()))?;
        validate::validate_doctor(doctor)
    }

    /// Toutes les anomalies de toutes les fiches, avertissements compris.
    pub fn check_all(&self) -> Vec<ScheduleIssue> {
        let agenda = self.lock();
        agenda
            .doctors
            .iter()
            .flat_map(validate::collect_issues)
            .collect()
    }

    /// Candidats bruts d'une journée (pavage + pauses), avant congés et
    /// réservations ; l'entrée de la vue calendrier.
    pub fn candidate_slots(
        &self,
        id: &DoctorId,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, SlotError> {
        let agenda = self.lock();
        let doctor = agenda
            .find_doctor(id)
            .ok_or_else(|| SlotError::UnknownDoctor(id.as_str().to_string()))?;
        validate::validate_doctor(doctor)?;
        slots::candidate_slots(&doctor.schedule, &doctor.breaks, doctor.slot_minutes, date)
    }

    /// Créneaux libres d'une journée ; `on_leave` renseigné et liste vide si
    /// un congé couvre la date.
    pub fn available_slots(
        &self,
        id: &DoctorId,
        date: NaiveDate,
    ) -> Result<DayAvailability, SlotError> {
        let agenda = self.lock();
        let doctor = agenda
            .find_doctor(id)
            .ok_or_else(|| SlotError::UnknownDoctor(id.as_str().to_string()))?;
        booking::day_availability(&agenda, doctor, date)
    }

    /// Réservation « comparer puis poser » : une seule tentative gagne pour
    /// une clé (praticien, date, minute), les autres échouent en
    /// `SlotAlreadyBooked` sans écrire.
    pub fn reserve(
        &self,
        id: &DoctorId,
        date: NaiveDate,
        start_minute: u16,
        patient: &str,
    ) -> Result<AppointmentId, SlotError> {
        let mut agenda = self.lock();
        booking::reserve(&mut agenda, id, date, start_minute, patient)
    }

    /// Annule le rendez-vous ; le créneau redevient disponible aussitôt.
    pub fn release(&self, id: &AppointmentId) -> Result<(), SlotError> {
        booking::transition(&mut self.lock(), id, AppointmentStatus::Cancelled)
    }

    pub fn confirm(&self, id: &AppointmentId) -> Result<(), SlotError> {
        booking::transition(&mut self.lock(), id, AppointmentStatus::Confirmed)
    }

    pub fn begin(&self, id: &AppointmentId) -> Result<(), SlotError> {
        booking::transition(&mut self.lock(), id, AppointmentStatus::InProgress)
    }

    /// Clôt le rendez-vous ; libère le créneau comme une annulation.
    pub fn complete(&self, id: &AppointmentId) -> Result<(), SlotError> {
        booking::transition(&mut self.lock(), id, AppointmentStatus::Completed)
    }

    pub fn day_status(
        &self,
        id: &DoctorId,
        date: NaiveDate,
        today: NaiveDate,
        selected: NaiveDate,
    ) -> Result<DayStatus, SlotError> {
        let agenda = self.lock();
        let doctor = agenda
            .find_doctor(id)
            .ok_or_else(|| SlotError::UnknownDoctor(id.as_str().to_string()))?;
        Ok(calendar::day_status(doctor, date, today, selected))
    }

    pub fn month_grid(
        &self,
        id: &DoctorId,
        year: i32,
        month: u32,
        today: NaiveDate,
        selected: NaiveDate,
    ) -> Result<Vec<DayCell>, SlotError> {
        let agenda = self.lock();
        let doctor = agenda
            .find_doctor(id)
            .ok_or_else(|| SlotError::UnknownDoctor(id.as_str().to_string()))?;
        calendar::month_grid(doctor, year, month, today, selected)
    }
}
