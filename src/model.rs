use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Erreurs de validation du jeu de données (avant toute génération).
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("invalid vacation interval: {0}")]
    InvalidInterval(&'static str),
    #[error("vacation interval overlaps an existing one for {0}")]
    OverlappingVacation(String),
    #[error("vacation interval crosses a global blackout date: {0}")]
    BlackoutCrossed(NaiveDate),
    #[error("physician name cannot be empty")]
    EmptyName,
    #[error("physician already exists: {0}")]
    DuplicatePhysician(String),
    #[error("unknown physician: {0}")]
    UnknownPhysician(String),
}

/// Identifiant fort pour Physician (le nom, unique sans tenir compte de la casse).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhysicianId(String);

impl PhysicianId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// Forme normalisée pour comparer deux noms.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl std::fmt::Display for PhysicianId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Demi-journée de départ ou de retour d'un congé.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HalfDay {
    #[serde(rename = "Matin")]
    Morning,
    #[serde(rename = "Midi")]
    Noon,
    #[serde(rename = "Soir")]
    Evening,
}

/// Congé d'un médecin (bornes incluses).
///
/// Les demi-journées précisent le moment du départ (Matin/Midi) et du retour
/// (Midi/Soir) ; elles sont conservées pour l'affichage mais l'indisponibilité
/// reste à la granularité du jour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub departure: HalfDay,
    #[serde(rename = "return")]
    pub return_: HalfDay,
}

impl VacationInterval {
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        departure: HalfDay,
        return_: HalfDay,
    ) -> Result<Self, ModelError> {
        if end < start {
            return Err(ModelError::InvalidInterval("end must not precede start"));
        }
        if departure == HalfDay::Evening {
            return Err(ModelError::InvalidInterval("departure must be Matin or Midi"));
        }
        if return_ == HalfDay::Morning {
            return Err(ModelError::InvalidInterval("return must be Midi or Soir"));
        }
        Ok(Self {
            start,
            end,
            departure,
            return_,
        })
    }

    /// Journée(s) entière(s), du matin au soir.
    pub fn full_days(start: NaiveDate, end: NaiveDate) -> Result<Self, ModelError> {
        Self::new(start, end, HalfDay::Morning, HalfDay::Evening)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, other: &VacationInterval) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Médecin du pool de garde.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Physician {
    pub name: PhysicianId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vacations: Vec<VacationInterval>,
    /// Samedis où le médecin souhaite être de garde (bonus au classement).
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub weekend_preferred: BTreeSet<NaiveDate>,
    /// Samedis où le médecin refuse la garde de week-end.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub weekend_forbidden: BTreeSet<NaiveDate>,
}

impl Physician {
    pub fn new<S: AsRef<str>>(name: S) -> Self {
        Self {
            name: PhysicianId::new(name),
            vacations: Vec::new(),
            weekend_preferred: BTreeSet::new(),
            weekend_forbidden: BTreeSet::new(),
        }
    }
}

/// Jeu de données complet consommé par une génération.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub physicians: Vec<Physician>,
    /// Dates interdites globales : congés refusés dessus, et indisponibilité
    /// de tout le monde pendant la génération.
    #[serde(default)]
    pub blackout_dates: BTreeSet<NaiveDate>,
    /// Groupe de séparation : au plus un membre parmi les rôles exclusifs
    /// d'une même journée.
    #[serde(default)]
    pub separation_set: BTreeSet<PhysicianId>,
}

impl Dataset {
    pub fn find_physician(&self, name: &PhysicianId) -> Option<&Physician> {
        let norm = name.normalized();
        self.physicians.iter().find(|p| p.name.normalized() == norm)
    }

    fn find_physician_mut(&mut self, name: &PhysicianId) -> Option<&mut Physician> {
        let norm = name.normalized();
        self.physicians
            .iter_mut()
            .find(|p| p.name.normalized() == norm)
    }

    /// Ajoute un médecin ; refuse les doublons (casse ignorée).
    pub fn add_physician<S: AsRef<str>>(&mut self, name: S) -> Result<(), ModelError> {
        let id = PhysicianId::new(name);
        if id.as_str().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if self.find_physician(&id).is_some() {
            return Err(ModelError::DuplicatePhysician(id.as_str().to_string()));
        }
        self.physicians.push(Physician::new(id.as_str()));
        Ok(())
    }

    /// Appartenance au groupe de séparation, casse ignorée comme pour les
    /// noms de médecins.
    pub fn in_separation_set(&self, name: &PhysicianId) -> bool {
        let norm = name.normalized();
        self.separation_set.iter().any(|m| m.normalized() == norm)
    }

    /// Ajoute un congé en validant chevauchement et dates interdites.
    pub fn add_vacation(
        &mut self,
        name: &PhysicianId,
        interval: VacationInterval,
    ) -> Result<(), ModelError> {
        if let Some(blocked) = self.blackout_dates.iter().find(|d| interval.contains(**d)) {
            return Err(ModelError::BlackoutCrossed(*blocked));
        }
        let physician = self
            .find_physician_mut(name)
            .ok_or_else(|| ModelError::UnknownPhysician(name.as_str().to_string()))?;
        if physician.vacations.iter().any(|v| v.overlaps(&interval)) {
            return Err(ModelError::OverlappingVacation(name.as_str().to_string()));
        }
        physician.vacations.push(interval);
        physician.vacations.sort_by_key(|v| v.start);
        Ok(())
    }
}

/// Rôle d'une journée de planning.
///
/// Les noms sérialisés reprennent ceux du fichier historique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Hospit1,
    Hospit2,
    #[serde(rename = "HDL1")]
    Hdl1,
    #[serde(rename = "HDL2")]
    Hdl2,
    #[serde(rename = "HDM1")]
    Hdm1,
    #[serde(rename = "HDM2")]
    Hdm2,
    #[serde(rename = "HDL_Samedi")]
    HdlSaturday,
    #[serde(rename = "Hospit_Samedi")]
    HospitSaturday,
    #[serde(rename = "Hospit_Dimanche")]
    HospitSunday,
    Consult,
}

/// Familles de rôles de semaine, pour l'équilibrage de charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoleCategory {
    Hospit,
    Hdl,
    Hdm,
}

impl Role {
    /// Rôles exclusifs de semaine, dans l'ordre de priorité d'affectation.
    pub const WEEKDAY_CORE: [Role; 6] = [
        Role::Hospit1,
        Role::Hospit2,
        Role::Hdl1,
        Role::Hdl2,
        Role::Hdm1,
        Role::Hdm2,
    ];

    /// Tout sauf Consult : un seul médecin par créneau et par jour.
    pub fn is_exclusive(self) -> bool {
        self != Role::Consult
    }

    pub fn category(self) -> Option<RoleCategory> {
        match self {
            Role::Hospit1 | Role::Hospit2 => Some(RoleCategory::Hospit),
            Role::Hdl1 | Role::Hdl2 => Some(RoleCategory::Hdl),
            Role::Hdm1 | Role::Hdm2 => Some(RoleCategory::Hdm),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Hospit1 => "Hospit1",
            Role::Hospit2 => "Hospit2",
            Role::Hdl1 => "HDL1",
            Role::Hdl2 => "HDL2",
            Role::Hdm1 => "HDM1",
            Role::Hdm2 => "HDM2",
            Role::HdlSaturday => "HDL_Samedi",
            Role::HospitSaturday => "Hospit_Samedi",
            Role::HospitSunday => "Hospit_Dimanche",
            Role::Consult => "Consult",
        }
    }
}

/// Contenu d'un créneau : un médecin, ou une liste ordonnée (Consult).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleSlot {
    Single(PhysicianId),
    Many(Vec<PhysicianId>),
}

impl RoleSlot {
    /// Tous les médecins du créneau, quel que soit le variant.
    pub fn members(&self) -> &[PhysicianId] {
        match self {
            RoleSlot::Single(id) => std::slice::from_ref(id),
            RoleSlot::Many(ids) => ids,
        }
    }
}

/// Planning complet : date -> rôle -> médecin(s). Reconstruit à chaque
/// génération, jamais fusionné avec le précédent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    pub days: BTreeMap<NaiveDate, BTreeMap<Role, RoleSlot>>,
}

impl Roster {
    pub fn slot(&self, date: NaiveDate, role: Role) -> Option<&RoleSlot> {
        self.days.get(&date).and_then(|roles| roles.get(&role))
    }

    /// Affecte un rôle exclusif.
    pub fn assign(&mut self, date: NaiveDate, role: Role, physician: PhysicianId) {
        self.days
            .entry(date)
            .or_default()
            .insert(role, RoleSlot::Single(physician));
    }

    /// Ajoute un médecin en fin de liste Consult.
    pub fn push_consult(&mut self, date: NaiveDate, physician: PhysicianId) {
        let slot = self
            .days
            .entry(date)
            .or_default()
            .entry(Role::Consult)
            .or_insert_with(|| RoleSlot::Many(Vec::new()));
        if let RoleSlot::Many(ids) = slot {
            ids.push(physician);
        }
    }

    /// Médecin titulaire d'un rôle exclusif ce jour-là.
    pub fn holder(&self, date: NaiveDate, role: Role) -> Option<&PhysicianId> {
        match self.slot(date, role) {
            Some(RoleSlot::Single(id)) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn interval_rejects_inverted_bounds() {
        assert!(VacationInterval::full_days(d(2024, 7, 5), d(2024, 7, 1)).is_err());
    }

    #[test]
    fn interval_rejects_bad_half_days() {
        assert!(VacationInterval::new(
            d(2024, 7, 1),
            d(2024, 7, 1),
            HalfDay::Evening,
            HalfDay::Evening
        )
        .is_err());
        assert!(VacationInterval::new(
            d(2024, 7, 1),
            d(2024, 7, 1),
            HalfDay::Morning,
            HalfDay::Morning
        )
        .is_err());
    }

    #[test]
    fn empty_name_gets_its_own_error() {
        let mut ds = Dataset::default();
        assert!(matches!(ds.add_physician("  "), Err(ModelError::EmptyName)));
    }

    #[test]
    fn separation_membership_ignores_case() {
        let mut ds = Dataset::default();
        ds.add_physician("Dupont").unwrap();
        ds.separation_set.insert(PhysicianId::new("dupont"));
        assert!(ds.in_separation_set(&PhysicianId::new("Dupont")));
        assert!(ds.in_separation_set(&PhysicianId::new("DUPONT")));
        assert!(!ds.in_separation_set(&PhysicianId::new("Martin")));
    }

    #[test]
    fn dataset_rejects_duplicate_name_case_insensitive() {
        let mut ds = Dataset::default();
        ds.add_physician("Dupont").unwrap();
        assert!(matches!(
            ds.add_physician("dupont"),
            Err(ModelError::DuplicatePhysician(_))
        ));
    }

    #[test]
    fn dataset_rejects_overlapping_vacations() {
        let mut ds = Dataset::default();
        ds.add_physician("Dupont").unwrap();
        let id = PhysicianId::new("Dupont");
        ds.add_vacation(
            &id,
            VacationInterval::full_days(d(2024, 7, 1), d(2024, 7, 5)).unwrap(),
        )
        .unwrap();
        let overlap = VacationInterval::full_days(d(2024, 7, 5), d(2024, 7, 8)).unwrap();
        assert!(matches!(
            ds.add_vacation(&id, overlap),
            Err(ModelError::OverlappingVacation(_))
        ));
    }

    #[test]
    fn dataset_rejects_vacation_crossing_blackout() {
        let mut ds = Dataset::default();
        ds.add_physician("Dupont").unwrap();
        ds.blackout_dates.insert(d(2024, 7, 3));
        let id = PhysicianId::new("Dupont");
        let crossing = VacationInterval::full_days(d(2024, 7, 1), d(2024, 7, 5)).unwrap();
        assert!(matches!(
            ds.add_vacation(&id, crossing),
            Err(ModelError::BlackoutCrossed(_))
        ));
    }

    #[test]
    fn consult_slot_keeps_insertion_order() {
        let mut roster = Roster::default();
        let day = d(2024, 7, 1);
        roster.push_consult(day, PhysicianId::new("B"));
        roster.push_consult(day, PhysicianId::new("A"));
        let slot = roster.slot(day, Role::Consult).unwrap();
        let names: Vec<&str> = slot.members().iter().map(|p| p.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }
}
