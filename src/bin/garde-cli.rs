#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use garde::{
    io,
    model::{HalfDay, PhysicianId, VacationInterval},
    scheduler::{audit, generate, GenOptions, DEFAULT_SEED},
    storage::{JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste du planning de garde (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON d'état (médecins + planning)
    #[arg(long, global = true, default_value = "garde.json")]
    data: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un médecin
    AddPhysician {
        #[arg(long)]
        name: String,
    },

    /// Ajouter un souhait de congé
    AddVacation {
        #[arg(long)]
        physician: String,
        /// AAAA-MM-JJ
        #[arg(long)]
        start: String,
        /// AAAA-MM-JJ
        #[arg(long)]
        end: String,
        /// Matin ou Midi
        #[arg(long, default_value = "Matin")]
        departure: String,
        /// Midi ou Soir
        #[arg(long = "return", default_value = "Soir")]
        return_: String,
    },

    /// Ajouter une date interdite globale
    AddBlackout {
        /// AAAA-MM-JJ
        #[arg(long)]
        date: String,
    },

    /// Définir le groupe de séparation
    SetSeparation {
        /// liste "nom1,nom2,..."
        #[arg(long)]
        physicians: String,
    },

    /// Importer des médecins depuis un CSV
    ImportPhysicians {
        #[arg(long)]
        csv: String,
    },

    /// Générer le planning (remplace le précédent)
    Generate {
        /// Premier jour (AAAA-MM-JJ), aujourd'hui par défaut
        #[arg(long)]
        start: Option<String>,
        #[arg(long, default_value_t = 52)]
        weeks: u32,
        #[arg(long, default_value_t = 14)]
        block_days: u32,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },

    /// Exporter le planning
    Export {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Lister le planning jour par jour
    Show,

    /// Vérifier les invariants du planning courant
    Check,
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date: {raw}"))
}

fn parse_half_day(raw: &str) -> Result<HalfDay> {
    match raw.to_lowercase().as_str() {
        "matin" => Ok(HalfDay::Morning),
        "midi" => Ok(HalfDay::Noon),
        "soir" => Ok(HalfDay::Evening),
        _ => bail!("invalid half-day: {raw} (expected Matin, Midi or Soir)"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.data)?;
    let mut state = storage.load().unwrap_or_default();

    match cli.cmd {
        Commands::AddPhysician { name } => {
            state.dataset.add_physician(&name)?;
            storage.save(&state)?;
        }
        Commands::AddVacation {
            physician,
            start,
            end,
            departure,
            return_,
        } => {
            let interval = VacationInterval::new(
                parse_date(&start)?,
                parse_date(&end)?,
                parse_half_day(&departure)?,
                parse_half_day(&return_)?,
            )?;
            state
                .dataset
                .add_vacation(&PhysicianId::new(&physician), interval)?;
            storage.save(&state)?;
        }
        Commands::AddBlackout { date } => {
            state.dataset.blackout_dates.insert(parse_date(&date)?);
            storage.save(&state)?;
        }
        Commands::SetSeparation { physicians } => {
            let mut set = std::collections::BTreeSet::new();
            for name in physicians.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                // Graphie canonique : celle enregistrée pour le médecin.
                let Some(physician) = state.dataset.find_physician(&PhysicianId::new(name))
                else {
                    bail!("unknown physician: {name}");
                };
                set.insert(physician.name.clone());
            }
            state.dataset.separation_set = set;
            storage.save(&state)?;
        }
        Commands::ImportPhysicians { csv } => {
            let imported = io::import_physicians_csv(csv)?;
            for physician in &imported {
                if state.dataset.find_physician(&physician.name).is_some() {
                    bail!("physician already exists: {}", physician.name);
                }
            }
            state.dataset.physicians.extend(imported);
            storage.save(&state)?;
        }
        Commands::Generate {
            start,
            weeks,
            block_days,
            seed,
        } => {
            let start = match start {
                Some(raw) => parse_date(&raw)?,
                None => Utc::now().date_naive(),
            };
            let mut opts = GenOptions::new(start);
            opts.weeks = weeks;
            opts.block_days = block_days;
            opts.seed = seed;
            state.roster = generate(&state.dataset, opts)?;
            storage.save(&state)?;
            println!("planning généré : {} jours", state.roster.days.len());
        }
        Commands::Export { out_json, out_csv } => {
            if let Some(path) = out_json {
                io::export_roster_json(path, &state.roster)?;
            }
            if let Some(path) = out_csv {
                io::export_roster_csv(path, &state.roster)?;
            }
        }
        Commands::Show => {
            for (date, roles) in &state.roster.days {
                let mut parts = Vec::new();
                for (role, slot) in roles {
                    let names: Vec<&str> =
                        slot.members().iter().map(|p| p.as_str()).collect();
                    parts.push(format!("{}={}", role.as_str(), names.join("+")));
                }
                println!("{date} | {}", parts.join(" "));
            }
        }
        Commands::Check => {
            let violations = audit(&state.roster, &state.dataset);
            if violations.is_empty() {
                println!("aucune anomalie");
            } else {
                for v in &violations {
                    println!("{} | {} | {:?}", v.date, v.physician, v.kind);
                }
                bail!("{} anomalie(s)", violations.len());
            }
        }
    }

    Ok(())
}
