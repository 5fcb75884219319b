use crate::model::{hhmm, Agenda, BreakRule, Leave, TimeSlot};
use anyhow::{bail, Context};
use chrono::{NaiveDate, Weekday};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Analyse `HH:MM` en minute-du-jour ; `24:00` est accepté comme borne de fin.
pub fn parse_hhmm(raw: &str) -> anyhow::Result<u16> {
    if raw.trim() == "24:00" {
        return Ok(crate::model::MINUTES_PER_DAY);
    }
    let (h, m) = raw
        .trim()
        .split_once(':')
        .with_context(|| format!("invalid time (expected HH:MM): {raw}"))?;
    let h: u16 = h.parse().with_context(|| format!("invalid hour: {raw}"))?;
    let m: u16 = m.parse().with_context(|| format!("invalid minute: {raw}"))?;
    if h > 23 || m > 59 {
        bail!("time out of range: {raw}");
    }
    Ok(h * 60 + m)
}

/// Analyse un jour de semaine, nom anglais court ou long, insensible à la casse.
pub fn parse_weekday(raw: &str) -> anyhow::Result<Weekday> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        other => bail!("invalid weekday: {other}"),
    }
}

/// Liste `mon;wed;fri` → jours typés, doublons refusés.
pub fn parse_weekdays(raw: &str) -> anyhow::Result<Vec<Weekday>> {
    let mut out = Vec::new();
    for chunk in raw.split(';').filter(|c| !c.trim().is_empty()) {
        let day = parse_weekday(chunk)?;
        if out.contains(&day) {
            bail!("duplicate weekday: {chunk}");
        }
        out.push(day);
    }
    Ok(out)
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))
}

/// Import de pauses depuis CSV : header `name,start,end,days`
/// (heures `HH:MM`, jours `mon;tue;...`).
pub fn import_breaks_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<BreakRule>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid break row (empty name)");
        }
        let start = parse_hhmm(rec.get(1).context("missing start")?)?;
        let end = parse_hhmm(rec.get(2).context("missing end")?)?;
        let days = parse_weekdays(rec.get(3).context("missing days")?)
            .with_context(|| format!("invalid days for break {name}"))?;
        let rule = BreakRule::new(name, start, end, days)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid break {name}"))?;
        out.push(rule);
    }
    Ok(out)
}

/// Import de congés depuis CSV : header `from,to,reason` (dates incluses).
pub fn import_leaves_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Leave>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let from = parse_date(rec.get(0).context("missing from")?)?;
        let to = parse_date(rec.get(1).context("missing to")?)?;
        let reason = rec.get(2).map(str::trim).unwrap_or("").to_string();
        let leave = Leave::new(from, to, reason).map_err(anyhow::Error::msg)?;
        out.push(leave);
    }
    Ok(out)
}

/// Export JSON de l'agenda (jolie mise en forme).
pub fn export_agenda_json<P: AsRef<Path>>(path: P, agenda: &Agenda) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(agenda)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV de créneaux : header `date,start,end,duration_minutes`.
pub fn export_slots_csv<P: AsRef<Path>>(path: P, slots: &[TimeSlot]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "start", "end", "duration_minutes"])?;
    for s in slots {
        let date = s.date.to_string();
        let duration = s.duration_minutes.to_string();
        w.write_record([
            date.as_str(),
            s.start_label().as_str(),
            hhmm(s.end_minute()).as_str(),
            duration.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
