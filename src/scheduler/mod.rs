mod availability;
mod blocks;
mod constraints;
mod context;
mod daily;
mod types;
mod weekend;

pub use context::GenContext;
pub use types::{
    GenError, GenOptions, Period, PeriodKey, Violation, ViolationKind, DEFAULT_SEED,
};

use crate::model::{Dataset, PhysicianId, Role, Roster};

/// Génère un planning complet pour le jeu de données et les options fournis.
///
/// Une seule passe déterministe : indisponibilités précalculées, blocs de
/// semaine (Hospit puis HDM), week-ends, puis complément journalier. Les
/// créneaux insatisfiables restent absents du résultat, jamais d'erreur.
/// Même graine + même jeu de données = même planning.
pub fn generate(dataset: &Dataset, opts: GenOptions) -> Result<Roster, GenError> {
    if opts.weeks == 0 {
        return Err(GenError::EmptyHorizon);
    }

    let mut ctx = GenContext::new(dataset, opts);
    availability::precompute(&mut ctx);
    #[cfg(feature = "logging")]
    tracing::debug!(physicians = dataset.physicians.len(), "availability precomputed");

    blocks::assign_blocks(&mut ctx);
    #[cfg(feature = "logging")]
    tracing::debug!("weekday blocks assigned");

    weekend::assign_weekends(&mut ctx);
    #[cfg(feature = "logging")]
    tracing::debug!("weekends assigned");

    daily::assign_daily(&mut ctx);
    #[cfg(feature = "logging")]
    tracing::debug!(days = ctx.roster.days.len(), "daily fill done");

    Ok(ctx.roster)
}

/// La couverture dérivée par effectif fait porter HDL1 par le titulaire HDM1
/// (et HDL2 par HDM2) : seule double affectation admise un même jour.
fn sanctioned_pair(a: Role, b: Role) -> bool {
    matches!(
        (a, b),
        (Role::Hdm1, Role::Hdl1)
            | (Role::Hdl1, Role::Hdm1)
            | (Role::Hdm2, Role::Hdl2)
            | (Role::Hdl2, Role::Hdm2)
    )
}

/// Audit a posteriori d'un planning : double affectation exclusive et
/// conflits du groupe de séparation.
pub fn audit(roster: &Roster, dataset: &Dataset) -> Vec<Violation> {
    let mut out = Vec::new();

    for (date, roles) in &roster.days {
        let exclusive: Vec<(Role, &PhysicianId)> = roles
            .iter()
            .filter(|(role, _)| role.is_exclusive())
            .filter_map(|(role, slot)| slot.members().first().map(|id| (*role, id)))
            .collect();

        for (idx, (role_a, id_a)) in exclusive.iter().enumerate() {
            for (role_b, id_b) in exclusive.iter().skip(idx + 1) {
                if id_a == id_b && !sanctioned_pair(*role_a, *role_b) {
                    out.push(Violation {
                        date: *date,
                        physician: (*id_a).clone(),
                        kind: ViolationKind::DoubleBooking(*role_a, *role_b),
                    });
                }
            }
        }

        let mut members: Vec<&PhysicianId> = Vec::new();
        for role in Role::WEEKDAY_CORE {
            if let Some(slot) = roles.get(&role) {
                for id in slot.members() {
                    if dataset.in_separation_set(id) && !members.contains(&id) {
                        members.push(id);
                    }
                }
            }
        }
        if members.len() >= 2 {
            for id in members.into_iter().skip(1) {
                out.push(Violation {
                    date: *date,
                    physician: id.clone(),
                    kind: ViolationKind::SeparationConflict,
                });
            }
        }
    }

    out
}
