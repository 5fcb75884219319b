use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minutes dans une journée civile ; aucune borne de créneau ne dépasse cette valeur.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Identifiant fort pour Doctor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoctorId(String);

impl DoctorId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour Appointment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppointmentId(String);

impl AppointmentId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Intervalle intra-journée `[start, end)` en minutes depuis minuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: u16,
    pub end: u16,
}

impl TimeRange {
    pub fn new(start: u16, end: u16) -> Result<Self, String> {
        if start >= end {
            return Err("range end must be after start".to_string());
        }
        if end > MINUTES_PER_DAY {
            return Err("range end exceeds 24:00".to_string());
        }
        Ok(Self { start, end })
    }
}

/// Demi-journées travaillées d'un jour de semaine (matin et/ou soir).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayShifts {
    pub day: Weekday,
    #[serde(default)]
    pub morning: Option<TimeRange>,
    #[serde(default)]
    pub evening: Option<TimeRange>,
}

impl DayShifts {
    pub fn has_shift(&self) -> bool {
        self.morning.is_some() || self.evening.is_some()
    }
}

/// Semaine type récurrente d'un praticien.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WeeklySchedule {
    pub working_days: Vec<Weekday>,
    #[serde(default)]
    pub shifts: Vec<DayShifts>,
}

impl WeeklySchedule {
    pub fn shifts_for(&self, day: Weekday) -> Option<&DayShifts> {
        self.shifts.iter().find(|s| s.day == day)
    }

    /// Jour listé travaillé ET doté d'au moins une demi-journée.
    pub fn is_open_on(&self, day: Weekday) -> bool {
        self.working_days.contains(&day)
            && self
                .shifts_for(day)
                .map(DayShifts::has_shift)
                .unwrap_or(false)
    }
}

/// Pause récurrente (hebdomadaire, non datée) soustraite des créneaux.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakRule {
    pub name: String,
    pub start: u16,
    pub end: u16,
    pub days: Vec<Weekday>,
}

impl BreakRule {
    pub fn new<N: Into<String>>(
        name: N,
        start: u16,
        end: u16,
        days: Vec<Weekday>,
    ) -> Result<Self, String> {
        if start >= end {
            return Err("break end must be after start".to_string());
        }
        Ok(Self {
            name: name.into(),
            start,
            end,
            days,
        })
    }

    pub fn applies_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }
}

/// Congé daté, bornes incluses ; bloque la journée entière, pas seulement
/// les heures de consultation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leave {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub reason: String,
}

impl Leave {
    pub fn new<R: Into<String>>(from: NaiveDate, to: NaiveDate, reason: R) -> Result<Self, String> {
        if from > to {
            return Err("leave end date must not precede start date".to_string());
        }
        Ok(Self {
            from,
            to,
            reason: reason.into(),
        })
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Statut de rendez-vous ; seuls les statuts actifs occupent un créneau.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Rendez-vous posé sur la grille d'un praticien.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub doctor: DoctorId,
    pub patient: String,
    pub date: NaiveDate,
    pub start_minute: u16,
    pub status: AppointmentStatus,
}

/// Créneau réservable, calculé à la demande, jamais persisté.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub start_minute: u16,
    pub duration_minutes: u16,
}

impl TimeSlot {
    pub fn end_minute(&self) -> u16 {
        self.start_minute + self.duration_minutes
    }

    pub fn start_label(&self) -> String {
        hhmm(self.start_minute)
    }
}

/// Formate une minute-du-jour en `HH:MM`.
pub fn hhmm(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

fn default_slot_minutes() -> u16 {
    15
}

fn default_accepting() -> bool {
    true
}

/// Fiche praticien : règles récurrentes + congés + granularité de créneau.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub schedule: WeeklySchedule,
    #[serde(default)]
    pub breaks: Vec<BreakRule>,
    #[serde(default)]
    pub leaves: Vec<Leave>,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u16,
    /// Interrupteur manuel « accepte des rendez-vous » ; court-circuite le
    /// calcul sans en faire partie.
    #[serde(default = "default_accepting")]
    pub accepting: bool,
}

impl Doctor {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            id: DoctorId::random(),
            name: name.into(),
            specialty: None,
            schedule: WeeklySchedule::default(),
            breaks: Vec::new(),
            leaves: Vec::new(),
            slot_minutes: default_slot_minutes(),
            accepting: true,
        }
    }
}

/// Agenda complet : praticiens et rendez-vous.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Agenda {
    pub doctors: Vec<Doctor>,
    pub appointments: Vec<Appointment>,
}

impl Agenda {
    pub fn find_doctor<'a>(&'a self, id: &DoctorId) -> Option<&'a Doctor> {
        self.doctors.iter().find(|d| &d.id == id)
    }
    pub fn find_doctor_mut(&mut self, id: &DoctorId) -> Option<&mut Doctor> {
        self.doctors.iter_mut().find(|d| &d.id == id)
    }
    pub fn find_doctor_by_name<'a>(&'a self, name: &str) -> Option<&'a Doctor> {
        self.doctors.iter().find(|d| d.name == name)
    }
    pub fn find_appointment_mut(&mut self, id: &AppointmentId) -> Option<&mut Appointment> {
        self.appointments.iter_mut().find(|a| &a.id == id)
    }

    /// Rendez-vous actifs d'un praticien pour une date.
    pub fn active_appointments(&self, doctor: &DoctorId, date: NaiveDate) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| &a.doctor == doctor && a.date == date && a.status.is_active())
            .collect()
    }
}
