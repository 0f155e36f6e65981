#![forbid(unsafe_code)]
//! Garde — bibliothèque de génération du planning de garde des médecins (sans BD).
//!
//! - Stockage fichier (JSON), exports CSV/JSON.
//! - Blocs de semaine continus, week-ends espacés, équilibrage par période.
//! - Créneaux insatisfiables laissés vides, jamais fatals.
//! - Une graine, un jeu de données : un seul planning possible.

pub mod io;
pub mod model;
pub mod scheduler;
pub mod storage;

pub use model::{
    Dataset, HalfDay, ModelError, Physician, PhysicianId, Role, RoleCategory, RoleSlot, Roster,
    VacationInterval,
};
pub use scheduler::{audit, generate, GenError, GenOptions, Violation, ViolationKind, DEFAULT_SEED};
pub use storage::{JsonStorage, StateFile, Storage};
