use crate::model::{PhysicianId, Role};
use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Graine par défaut : une génération sans paramètre reste reproductible.
pub const DEFAULT_SEED: u64 = 0x6761_7264_6531;

/// Options d'une génération de planning.
#[derive(Debug, Clone, Copy)]
pub struct GenOptions {
    /// Premier jour de l'horizon.
    pub start: NaiveDate,
    pub weeks: u32,
    /// Longueur nominale d'un bloc de semaine, en jours calendaires.
    pub block_days: u32,
    /// Espacement minimal entre deux week-ends de garde d'un même médecin.
    pub min_weekend_gap_days: i64,
    pub seed: u64,
}

impl GenOptions {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start,
            weeks: 52,
            block_days: 14,
            min_weekend_gap_days: 14,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Error, Debug)]
pub enum GenError {
    #[error("horizon is empty: weeks must be > 0")]
    EmptyHorizon,
}

/// Fenêtre d'équité pour compter les week-ends de garde.
///
/// A : 1er mai – 31 octobre. B : 1er novembre – 20 avril de l'année suivante ;
/// les dates de janvier à avril sont rattachées au B de l'année précédente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    A,
    B,
}

/// Fenêtre d'équité ancrée sur son année de départ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodKey {
    pub year: i32,
    pub period: Period,
}

impl PeriodKey {
    pub fn of(date: NaiveDate) -> Self {
        match date.month() {
            5..=10 => Self {
                year: date.year(),
                period: Period::A,
            },
            11 | 12 => Self {
                year: date.year(),
                period: Period::B,
            },
            _ => Self {
                year: date.year() - 1,
                period: Period::B,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Même médecin sur deux rôles exclusifs le même jour.
    DoubleBooking(Role, Role),
    /// Au moins deux membres du groupe de séparation parmi les rôles exclusifs.
    SeparationConflict,
}

/// Anomalie relevée par l'audit d'un planning.
#[derive(Debug, Clone)]
pub struct Violation {
    pub date: NaiveDate,
    pub physician: PhysicianId,
    pub kind: ViolationKind,
}
