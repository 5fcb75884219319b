#![forbid(unsafe_code)]
//! Creneau — bibliothèque de créneaux de consultation médicale, locale (sans BD).
//!
//! - Stockage fichiers (JSON/CSV).
//! - Semaine type + pauses récurrentes + congés datés → créneaux réservables.
//! - Réservation atomique par clé (praticien, date, minute), sans file d'attente.
//! - Dates en calendrier civil naïf ; l'affichage local reste hors de la lib.

pub mod engine;
pub mod io;
pub mod model;
pub mod notification;
pub mod storage;
pub mod template;

pub use engine::{
    DayAvailability, DayCell, DayStatus, IssueKind, ScheduleIssue, SlotEngine, SlotError,
};
pub use model::{
    Agenda, Appointment, AppointmentId, AppointmentStatus, BreakRule, DayShifts, Doctor, DoctorId,
    Leave, TimeRange, TimeSlot, WeeklySchedule,
};
pub use notification::{prepare_reminder, Reminder, ReminderRenderer, TextReminder};
pub use storage::{JsonStorage, Storage};
pub use template::{
    load_template_from_file, ScheduleTemplate, TemplateDay, TemplateInfo, TemplateStore,
};
