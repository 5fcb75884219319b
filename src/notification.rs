use crate::model::{hhmm, Agenda, Appointment, Doctor};
use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate};

/// Représente un rappel généré pour un patient.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub patient: String,
    pub appointment_id: String,
    pub notice_on: NaiveDate,
    pub content: String,
}

/// Permet de customiser le rendu du message (texte, SMS, etc.).
pub trait ReminderRenderer {
    fn render(&self, doctor: &Doctor, appointment: &Appointment, notice_on: NaiveDate) -> String;
}

/// Gabarit texte simple destiné à un futur mail/SMS.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReminder;

impl ReminderRenderer for TextReminder {
    fn render(&self, doctor: &Doctor, appointment: &Appointment, notice_on: NaiveDate) -> String {
        format!(
            "Bonjour {patient},\n\nVous avez rendez-vous avec {doctor} le {date} à {time}.\nCe message est généré le {notice}.\n\nMerci d'arriver quelques minutes en avance avec votre dossier.\n",
            patient = appointment.patient,
            doctor = doctor.name,
            date = appointment.date,
            time = hhmm(appointment.start_minute),
            notice = notice_on
        )
    }
}

/// Prépare un rappel pour le prochain rendez-vous actif d'un patient.
pub fn prepare_reminder(
    agenda: &Agenda,
    patient: &str,
    days_before: i64,
    today: NaiveDate,
    renderer: &dyn ReminderRenderer,
) -> Result<Reminder> {
    if days_before < 0 {
        bail!("days_before must be positive");
    }

    let mut upcoming: Vec<&Appointment> = agenda
        .appointments
        .iter()
        .filter(|a| a.patient == patient && a.status.is_active() && a.date >= today)
        .collect();

    if upcoming.is_empty() {
        bail!("no upcoming appointment found for patient {patient}");
    }

    upcoming.sort_by_key(|a| (a.date, a.start_minute));
    let appointment = upcoming[0];

    let doctor = agenda
        .find_doctor(&appointment.doctor)
        .with_context(|| format!("unknown doctor: {}", appointment.doctor.as_str()))?;

    let notice_on = appointment.date - Duration::days(days_before);

    let content = renderer.render(doctor, appointment, notice_on);
    Ok(Reminder {
        patient: appointment.patient.clone(),
        appointment_id: appointment.id.as_str().to_string(),
        notice_on,
        content,
    })
}
