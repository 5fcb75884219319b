#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use creneau::{
    io,
    model::{hhmm, AppointmentId, DayShifts, Doctor, DoctorId, TimeRange},
    storage::{JsonStorage, Storage},
    template::load_template_from_file,
    DayCell, DayStatus, SlotEngine, SlotError,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de créneaux de consultation (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON d'agenda
    #[arg(long, global = true, default_value = "agenda.json")]
    agenda: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer une fiche praticien
    AddDoctor {
        #[arg(long)]
        name: String,
        #[arg(long)]
        specialty: Option<String>,
        /// Granularité des créneaux, en minutes
        #[arg(long, default_value_t = 15)]
        slot_minutes: u16,
    },

    /// Définir les demi-journées d'un jour de semaine
    SetShift {
        #[arg(long)]
        doctor: String,
        /// mon..sun
        #[arg(long)]
        day: String,
        /// plage `HH:MM-HH:MM`
        #[arg(long)]
        morning: Option<String>,
        /// plage `HH:MM-HH:MM`
        #[arg(long)]
        evening: Option<String>,
    },

    /// Appliquer une semaine type depuis un fichier JSON
    ApplyTemplate {
        #[arg(long)]
        doctor: String,
        #[arg(long)]
        file: String,
    },

    /// Importer des pauses récurrentes depuis un CSV
    ImportBreaks {
        #[arg(long)]
        doctor: String,
        #[arg(long)]
        csv: String,
    },

    /// Importer des congés depuis un CSV
    ImportLeaves {
        #[arg(long)]
        doctor: String,
        #[arg(long)]
        csv: String,
    },

    /// Basculer l'interrupteur « accepte des rendez-vous »
    SetAccepting {
        #[arg(long)]
        doctor: String,
        #[arg(long)]
        value: bool,
    },

    /// Lister les créneaux libres d'une journée
    Slots {
        #[arg(long)]
        doctor: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Afficher la grille mensuelle d'un praticien
    Calendar {
        #[arg(long)]
        doctor: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// Date sélectionnée (YYYY-MM-DD), premier du mois par défaut
        #[arg(long)]
        selected: Option<String>,
    },

    /// Réserver un créneau
    Book {
        #[arg(long)]
        doctor: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM, aligné sur la grille du praticien
        #[arg(long)]
        time: String,
        #[arg(long)]
        patient: String,
    },

    /// Annuler un rendez-vous (le créneau redevient libre)
    Cancel {
        #[arg(long)]
        id: String,
    },

    /// Confirmer un rendez-vous
    Confirm {
        #[arg(long)]
        id: String,
    },

    /// Clore un rendez-vous
    Complete {
        #[arg(long)]
        id: String,
    },

    /// Vérifier toutes les fiches praticien
    Check {
        /// Export CSV des anomalies (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Générer un rappel texte pour un patient
    Remind {
        #[arg(long)]
        patient: String,
        #[arg(long, default_value_t = 2)]
        days_before: i64,
        /// Fichier de sortie (texte brut)
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.agenda)?;
    let engine = SlotEngine::with_agenda(storage.load_or_default()?);

    let code = match cli.cmd {
        Commands::AddDoctor {
            name,
            specialty,
            slot_minutes,
        } => {
            let mut doctor = Doctor::new(name);
            doctor.specialty = specialty;
            doctor.slot_minutes = slot_minutes;
            let id = engine.add_doctor(doctor);
            storage.save(&engine.snapshot())?;
            println!("{}", id.as_str());
            0
        }
        Commands::SetShift {
            doctor,
            day,
            morning,
            evening,
        } => {
            let id = doctor_id(&engine, &doctor)?;
            let day = io::parse_weekday(&day)?;
            let morning = morning.as_deref().map(parse_range).transpose()?;
            let evening = evening.as_deref().map(parse_range).transpose()?;
            engine.update_doctor(&id, |d| {
                d.schedule.shifts.retain(|s| s.day != day);
                d.schedule.shifts.push(DayShifts {
                    day,
                    morning,
                    evening,
                });
                if !d.schedule.working_days.contains(&day) {
                    d.schedule.working_days.push(day);
                }
            })?;
            storage.save(&engine.snapshot())?;
            0
        }
        Commands::ApplyTemplate { doctor, file } => {
            let id = doctor_id(&engine, &doctor)?;
            let template = load_template_from_file(&file)?;
            engine.update_doctor(&id, |d| template.apply_to(d))?;
            storage.save(&engine.snapshot())?;
            println!("applied template {} to {}", template.id, doctor);
            0
        }
        Commands::ImportBreaks { doctor, csv } => {
            let id = doctor_id(&engine, &doctor)?;
            let breaks = io::import_breaks_csv(csv)?;
            engine.update_doctor(&id, |d| d.breaks.extend(breaks))?;
            storage.save(&engine.snapshot())?;
            0
        }
        Commands::ImportLeaves { doctor, csv } => {
            let id = doctor_id(&engine, &doctor)?;
            let leaves = io::import_leaves_csv(csv)?;
            engine.update_doctor(&id, |d| d.leaves.extend(leaves))?;
            storage.save(&engine.snapshot())?;
            0
        }
        Commands::SetAccepting { doctor, value } => {
            let id = doctor_id(&engine, &doctor)?;
            engine.update_doctor(&id, |d| d.accepting = value)?;
            storage.save(&engine.snapshot())?;
            0
        }
        Commands::Slots {
            doctor,
            date,
            out_csv,
        } => {
            let id = doctor_id(&engine, &doctor)?;
            let date = parse_date(&date)?;
            let day = engine.available_slots(&id, date)?;
            if let Some(reason) = &day.on_leave {
                println!("on leave: {reason}");
            } else if !day.is_bookable() {
                println!("no open slots");
            }
            for slot in &day.slots {
                println!(
                    "{} | {} → {}",
                    slot.date,
                    slot.start_label(),
                    hhmm(slot.end_minute())
                );
            }
            if let Some(path) = out_csv {
                io::export_slots_csv(path, &day.slots)?;
            }
            0
        }
        Commands::Calendar {
            doctor,
            year,
            month,
            selected,
        } => {
            let id = doctor_id(&engine, &doctor)?;
            let selected = match selected {
                Some(raw) => parse_date(&raw)?,
                None => NaiveDate::from_ymd_opt(year, month, 1).context("invalid year/month")?,
            };
            let today = chrono::Local::now().date_naive();
            let cells = engine.month_grid(&id, year, month, today, selected)?;
            print!("{}", render_grid(&cells));
            0
        }
        Commands::Book {
            doctor,
            date,
            time,
            patient,
        } => {
            let id = doctor_id(&engine, &doctor)?;
            let date = parse_date(&date)?;
            let minute = io::parse_hhmm(&time)?;
            match engine.reserve(&id, date, minute, &patient) {
                Ok(appointment_id) => {
                    storage.save(&engine.snapshot())?;
                    println!("{}", appointment_id.as_str());
                    0
                }
                Err(SlotError::SlotAlreadyBooked) => {
                    eprintln!("slot already booked, re-check availability");
                    2
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Cancel { id } => {
            engine.release(&AppointmentId::new(id))?;
            storage.save(&engine.snapshot())?;
            0
        }
        Commands::Confirm { id } => {
            engine.confirm(&AppointmentId::new(id))?;
            storage.save(&engine.snapshot())?;
            0
        }
        Commands::Complete { id } => {
            engine.complete(&AppointmentId::new(id))?;
            storage.save(&engine.snapshot())?;
            0
        }
        Commands::Check { report } => {
            let issues = engine.check_all();
            if issues.is_empty() {
                println!("OK: no issues");
                0
            } else {
                eprintln!("Found {} issue(s)", issues.len());
                if let Some(path) = report {
                    // CSV simple
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["doctor_id", "kind", "detail"])?;
                    for issue in &issues {
                        w.write_record([
                            issue.doctor.as_str(),
                            issue.kind.as_str(),
                            issue.detail.as_str(),
                        ])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Remind {
            patient,
            days_before,
            out,
        } => {
            let renderer = creneau::TextReminder;
            let today = chrono::Local::now().date_naive();
            let reminder = creneau::prepare_reminder(
                &engine.snapshot(),
                &patient,
                days_before,
                today,
                &renderer,
            )?;
            std::fs::write(&out, reminder.content)?;
            println!(
                "Reminder generated for {} (appointment {}) on {}",
                reminder.patient, reminder.appointment_id, reminder.notice_on
            );
            0
        }
    };

    std::process::exit(code);
}

fn doctor_id(engine: &SlotEngine, name: &str) -> Result<DoctorId> {
    engine
        .doctor_id_by_name(name)
        .ok_or_else(|| anyhow::anyhow!("unknown doctor: {}", name))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    raw.parse::<NaiveDate>()
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))
}

/// Plage `HH:MM-HH:MM`.
fn parse_range(raw: &str) -> Result<TimeRange> {
    let (start, end) = raw
        .split_once('-')
        .with_context(|| format!("invalid range (expected HH:MM-HH:MM): {raw}"))?;
    TimeRange::new(io::parse_hhmm(start)?, io::parse_hhmm(end)?).map_err(anyhow::Error::msg)
}

/// Grille 6×7 : numéro du jour + marqueur d'état par case.
fn render_grid(cells: &[DayCell]) -> String {
    use chrono::Datelike;
    let mut out = String::from("Mo  Tu  We  Th  Fr  Sa  Su\n");
    for (i, cell) in cells.iter().enumerate() {
        let marker = match cell.status {
            DayStatus::OutsideMonth => '.',
            DayStatus::Today => '*',
            DayStatus::Selected => '#',
            DayStatus::OnLeave => 'x',
            DayStatus::Working => ' ',
            DayStatus::NonWorking => '-',
        };
        out.push_str(&format!("{:02}{} ", cell.date.day(), marker));
        if i % 7 == 6 {
            out.pop();
            out.push('\n');
        }
    }
    out
}
