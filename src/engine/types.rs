use crate::model::{DoctorId, TimeSlot};
use chrono::NaiveDate;
use thiserror::Error;

/// Disponibilité d'une journée : soit des créneaux, soit un motif de congé.
#[derive(Debug, Clone)]
pub struct DayAvailability {
    pub date: NaiveDate,
    /// Motif du premier congé couvrant la date ; `Some` force `slots` vide.
    pub on_leave: Option<String>,
    pub slots: Vec<TimeSlot>,
}

impl DayAvailability {
    pub fn is_bookable(&self) -> bool {
        self.on_leave.is_none() && !self.slots.is_empty()
    }
}

/// Statut d'une case de calendrier, première règle applicable retenue :
/// hors mois affiché, aujourd'hui, sélectionnée, congé, travaillé, chômé.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    OutsideMonth,
    Today,
    Selected,
    OnLeave,
    Working,
    NonWorking,
}

/// Case d'une grille mensuelle 6×7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub status: DayStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    ShiftInverted,
    BreakInverted,
    LeaveInverted,
    BadSlotDuration,
    EmptyWorkingDay,
}

impl IssueKind {
    /// `EmptyWorkingDay` est un avertissement, pas une erreur : le jour est
    /// simplement traité comme chômé.
    pub fn is_error(self) -> bool {
        !matches!(self, Self::EmptyWorkingDay)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ShiftInverted => "shift_inverted",
            Self::BreakInverted => "break_inverted",
            Self::LeaveInverted => "leave_inverted",
            Self::BadSlotDuration => "bad_slot_duration",
            Self::EmptyWorkingDay => "empty_working_day",
        }
    }
}

/// Anomalie relevée sur la fiche d'un praticien.
#[derive(Debug, Clone)]
pub struct ScheduleIssue {
    pub doctor: DoctorId,
    pub kind: IssueKind,
    pub detail: String,
}

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),
    #[error("invalid slot duration: must be between 1 and 1440 minutes")]
    InvalidDuration,
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("unknown doctor: {0}")]
    UnknownDoctor(String),
    #[error("unknown appointment: {0}")]
    UnknownAppointment(String),
    #[error("slot not available: {0}")]
    NotAvailable(&'static str),
    #[error("slot already booked")]
    SlotAlreadyBooked,
    #[error("invalid status transition: {0}")]
    BadTransition(&'static str),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
