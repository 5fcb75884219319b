use crate::model::{BreakRule, DayShifts, Doctor, TimeRange, WeeklySchedule, MINUTES_PER_DAY};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Semaine type réutilisable (« OPD standard », « mi-temps matin »…),
/// appliquée telle quelle sur une fiche praticien.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u16,
    pub days: Vec<TemplateDay>,
    #[serde(default)]
    pub breaks: Vec<BreakRule>,
}

fn default_slot_minutes() -> u16 {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDay {
    pub day: Weekday,
    #[serde(default)]
    pub morning: Option<TimeRange>,
    #[serde(default)]
    pub evening: Option<TimeRange>,
}

impl ScheduleTemplate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            bail!("template id cannot be empty");
        }
        if self.name.trim().is_empty() {
            bail!("template name cannot be empty");
        }
        if self.slot_minutes == 0 || self.slot_minutes > MINUTES_PER_DAY {
            bail!("slot_minutes must be between 1 and 1440");
        }
        if self.days.is_empty() {
            bail!("template must define at least one day");
        }
        for day in &self.days {
            day.validate()?;
            let dupes = self.days.iter().filter(|d| d.day == day.day).count();
            if dupes > 1 {
                bail!("template lists {:?} more than once", day.day);
            }
        }
        for rule in &self.breaks {
            if rule.start >= rule.end {
                bail!("template break '{}' has an inverted range", rule.name);
            }
        }
        Ok(())
    }

    /// Remplace semaine type, pauses et granularité du praticien ; congés et
    /// rendez-vous existants ne sont pas touchés.
    pub fn apply_to(&self, doctor: &mut Doctor) {
        let mut schedule = WeeklySchedule::default();
        for day in &self.days {
            schedule.working_days.push(day.day);
            schedule.shifts.push(DayShifts {
                day: day.day,
                morning: day.morning,
                evening: day.evening,
            });
        }
        doctor.schedule = schedule;
        doctor.breaks = self.breaks.clone();
        doctor.slot_minutes = self.slot_minutes;
    }
}

impl TemplateDay {
    fn validate(&self) -> Result<()> {
        if self.morning.is_none() && self.evening.is_none() {
            bail!("template day {:?} has no shift", self.day);
        }
        for range in [&self.morning, &self.evening].into_iter().flatten() {
            // serde contourne le constructeur, l'invariant est revérifié ici
            if range.start >= range.end || range.end > MINUTES_PER_DAY {
                bail!("template day {:?} has an invalid range", self.day);
            }
        }
        if let (Some(am), Some(pm)) = (&self.morning, &self.evening) {
            if am.end > pm.start {
                bail!(
                    "template day {:?}: morning must end before evening starts",
                    self.day
                );
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TemplateInfo {
    pub template: ScheduleTemplate,
    pub path: PathBuf,
    pub modified: Option<DateTime<Utc>>,
}

/// Gestion simple des semaines types persistées sur disque.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    base_dir: PathBuf,
}

impl TemplateStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            base_dir: dir.as_ref().to_path_buf(),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating template directory {}", self.base_dir.display()))
    }

    pub fn save(&self, template: &ScheduleTemplate) -> Result<PathBuf> {
        template.validate()?;
        self.ensure_dir()?;
        let path = self.base_dir.join(format!("{}.json", template.id));
        let json = serde_json::to_string_pretty(template)?;
        fs::write(&path, json).with_context(|| format!("writing template {}", path.display()))?;
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<ScheduleTemplate> {
        let path = self.base_dir.join(format!("{}.json", id));
        let data =
            fs::read(&path).with_context(|| format!("reading template {}", path.display()))?;
        let template: ScheduleTemplate = serde_json::from_slice(&data)
            .with_context(|| format!("parsing template {}", path.display()))?;
        template.validate()?;
        Ok(template)
    }

    pub fn list(&self) -> Result<Vec<TemplateInfo>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }
        let mut infos = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let data = fs::read(&path)?;
            let template: ScheduleTemplate = match serde_json::from_slice(&data) {
                Ok(t) => t,
                Err(err) => {
                    eprintln!("Warning: could not parse template {}: {err}", path.display());
                    continue;
                }
            };
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            infos.push(TemplateInfo {
                template,
                path,
                modified,
            });
        }
        infos.sort_by(|a, b| a.template.id.cmp(&b.template.id));
        Ok(infos)
    }
}

pub fn load_template_from_file<P: AsRef<Path>>(path: P) -> Result<ScheduleTemplate> {
    let data = fs::read(&path)?;
    let template: ScheduleTemplate = serde_json::from_slice(&data)?;
    template.validate()?;
    Ok(template)
}
