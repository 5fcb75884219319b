use super::types::{IssueKind, ScheduleIssue, SlotError};
use crate::model::{hhmm, Doctor, MINUTES_PER_DAY};

/// Valide la fiche d'un praticien. Erreur dure sur toute borne inversée ou
/// granularité absurde ; un jour travaillé sans demi-journée n'est qu'un
/// avertissement (jour traité comme chômé).
pub(super) fn validate_doctor(doctor: &Doctor) -> Result<(), SlotError> {
    let issues = collect_issues(doctor);
    match issues.into_iter().find(|i| i.kind.is_error()) {
        Some(issue) if issue.kind == IssueKind::BadSlotDuration => Err(SlotError::InvalidDuration),
        Some(issue) => Err(SlotError::InvalidSchedule(issue.detail)),
        None => Ok(()),
    }
}

/// Relève toutes les anomalies, avertissements compris, pour le rapport CLI.
pub(super) fn collect_issues(doctor: &Doctor) -> Vec<ScheduleIssue> {
    let mut out = Vec::new();

    if doctor.slot_minutes == 0 || doctor.slot_minutes > MINUTES_PER_DAY {
        push(
            &mut out,
            doctor,
            IssueKind::BadSlotDuration,
            format!("slot duration {} out of range", doctor.slot_minutes),
        );
    }

    for day in &doctor.schedule.shifts {
        for range in [&day.morning, &day.evening].into_iter().flatten() {
            if range.start >= range.end || range.end > MINUTES_PER_DAY {
                push(
                    &mut out,
                    doctor,
                    IssueKind::ShiftInverted,
                    format!(
                        "{:?} shift {}-{} is not a valid range",
                        day.day,
                        hhmm(range.start),
                        hhmm(range.end),
                    ),
                );
            }
        }
    }

    for day in &doctor.schedule.working_days {
        let open = doctor
            .schedule
            .shifts_for(*day)
            .map(|s| s.has_shift())
            .unwrap_or(false);
        if !open {
            push(
                &mut out,
                doctor,
                IssueKind::EmptyWorkingDay,
                format!("{day:?} is listed as working but has no shift"),
            );
        }
    }

    for rule in &doctor.breaks {
        if rule.start >= rule.end {
            push(
                &mut out,
                doctor,
                IssueKind::BreakInverted,
                format!(
                    "break '{}' {}-{} is not a valid range",
                    rule.name,
                    hhmm(rule.start),
                    hhmm(rule.end),
                ),
            );
        }
    }

    for leave in &doctor.leaves {
        if leave.from > leave.to {
            push(
                &mut out,
                doctor,
                IssueKind::LeaveInverted,
                format!("leave {} .. {} is inverted", leave.from, leave.to),
            );
        }
    }

    out
}

fn push(out: &mut Vec<ScheduleIssue>, doctor: &Doctor, kind: IssueKind, detail: String) {
    #[cfg(feature = "logging")]
    if !kind.is_error() {
        tracing::warn!(doctor = doctor.name.as_str(), "{detail}");
    }
    out.push(ScheduleIssue {
        doctor: doctor.id.clone(),
        kind,
        detail,
    });
}
