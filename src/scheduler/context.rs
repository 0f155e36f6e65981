use super::types::{GenOptions, PeriodKey};
use crate::model::{Dataset, PhysicianId, RoleCategory, Roster};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Amplitude du bruit de départage : assez petit pour ne jamais inverser
/// deux scores de comptes différents.
const JITTER: f64 = 1e-3;

/// État mutable partagé par toutes les phases d'une génération.
///
/// Le planning en construction, les jeux "déjà affecté ce jour-là", les
/// compteurs de charge par médecin et la source pseudo-aléatoire commune
/// vivent ici ; aucune phase ne garde d'état propre.
pub struct GenContext<'a> {
    pub dataset: &'a Dataset,
    pub opts: GenOptions,
    /// Tous les jours de l'horizon, dans l'ordre.
    pub days: Vec<NaiveDate>,
    /// Jours d'indisponibilité précalculés par médecin (congés + dates
    /// interdites globales).
    pub indisposed: HashMap<PhysicianId, BTreeSet<NaiveDate>>,
    /// Médecins déjà titulaires d'un rôle exclusif, par jour.
    used: HashMap<NaiveDate, HashSet<PhysicianId>>,
    category_counts: HashMap<(PhysicianId, RoleCategory), u32>,
    weekend_counts: HashMap<(PhysicianId, PeriodKey), u32>,
    last_weekend: HashMap<PhysicianId, NaiveDate>,
    consult_counts: HashMap<PhysicianId, u32>,
    rng: SmallRng,
    pub roster: Roster,
}

impl<'a> GenContext<'a> {
    pub fn new(dataset: &'a Dataset, opts: GenOptions) -> Self {
        let days: Vec<NaiveDate> = (0..i64::from(opts.weeks) * 7)
            .map(|i| opts.start + Duration::days(i))
            .collect();
        Self {
            dataset,
            opts,
            days,
            indisposed: HashMap::new(),
            used: HashMap::new(),
            category_counts: HashMap::new(),
            weekend_counts: HashMap::new(),
            last_weekend: HashMap::new(),
            consult_counts: HashMap::new(),
            rng: SmallRng::seed_from_u64(opts.seed),
            roster: Roster::default(),
        }
    }

    /// Jours ouvrés de l'horizon (lundi à vendredi).
    pub fn working_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days
            .iter()
            .copied()
            .filter(|d| is_working_day(*d))
    }

    pub fn is_available(&self, physician: &PhysicianId, date: NaiveDate) -> bool {
        self.indisposed
            .get(physician)
            .map_or(true, |days| !days.contains(&date))
    }

    pub fn is_used(&self, date: NaiveDate, physician: &PhysicianId) -> bool {
        self.used
            .get(&date)
            .is_some_and(|set| set.contains(physician))
    }

    pub fn mark_used(&mut self, date: NaiveDate, physician: PhysicianId) {
        self.used.entry(date).or_default().insert(physician);
    }

    /// Bruit de départage, tiré de la source commune.
    pub fn jitter(&mut self) -> f64 {
        self.rng.random::<f64>() * JITTER
    }

    pub fn category_count(&self, physician: &PhysicianId, category: RoleCategory) -> u32 {
        self.category_counts
            .get(&(physician.clone(), category))
            .copied()
            .unwrap_or(0)
    }

    pub fn bump_category(&mut self, physician: &PhysicianId, category: RoleCategory) {
        *self
            .category_counts
            .entry((physician.clone(), category))
            .or_insert(0) += 1;
    }

    pub fn weekend_count(&self, physician: &PhysicianId, key: PeriodKey) -> u32 {
        self.weekend_counts
            .get(&(physician.clone(), key))
            .copied()
            .unwrap_or(0)
    }

    pub fn record_weekend(&mut self, physician: &PhysicianId, saturday: NaiveDate) {
        let key = PeriodKey::of(saturday);
        *self
            .weekend_counts
            .entry((physician.clone(), key))
            .or_insert(0) += 1;
        self.last_weekend.insert(physician.clone(), saturday);
    }

    pub fn last_weekend(&self, physician: &PhysicianId) -> Option<NaiveDate> {
        self.last_weekend.get(physician).copied()
    }

    /// Charge Consult cumulée d'un médecin sur la génération en cours.
    /// Tenue au même titre que les autres compteurs ; aucune règle de
    /// classement ne la consulte, elle sert au contrôle de répartition.
    pub fn consult_count(&self, physician: &PhysicianId) -> u32 {
        self.consult_counts.get(physician).copied().unwrap_or(0)
    }

    pub fn bump_consult(&mut self, physician: &PhysicianId) {
        *self.consult_counts.entry(physician.clone()).or_insert(0) += 1;
    }
}

pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
