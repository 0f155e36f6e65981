use super::context::GenContext;
use crate::model::{PhysicianId, Physician, Role};
use chrono::NaiveDate;

/// Nombre de membres du groupe de séparation parmi les rôles exclusifs de
/// semaine déjà affectés ce jour-là.
pub(super) fn separation_members(ctx: &GenContext<'_>, date: NaiveDate) -> usize {
    if ctx.dataset.separation_set.is_empty() {
        return 0;
    }
    let mut seen: Vec<&PhysicianId> = Vec::new();
    for role in Role::WEEKDAY_CORE {
        if let Some(holder) = ctx.roster.holder(date, role) {
            if ctx.dataset.in_separation_set(holder) && !seen.contains(&holder) {
                seen.push(holder);
            }
        }
    }
    seen.len()
}

/// Affecter `candidate` ce jour-là laisserait-il au plus un membre du groupe
/// de séparation parmi les rôles exclusifs ?
pub(super) fn separation_allows(
    ctx: &GenContext<'_>,
    date: NaiveDate,
    candidate: &PhysicianId,
) -> bool {
    if !ctx.dataset.in_separation_set(candidate) {
        return true;
    }
    separation_members(ctx, date) == 0
}

/// Week-end collé à un congé du médecin : congé qui démarre le lendemain du
/// dimanche, ou qui se termine la veille du samedi.
pub(super) fn weekend_adjacent_to_vacation(
    physician: &Physician,
    saturday: NaiveDate,
    sunday: NaiveDate,
) -> bool {
    physician.vacations.iter().any(|v| {
        sunday.succ_opt() == Some(v.start) || saturday.pred_opt() == Some(v.end)
    })
}

/// Éligibilité complète d'un médecin pour un week-end donné.
pub(super) fn weekend_eligible(
    ctx: &GenContext<'_>,
    physician: &Physician,
    saturday: NaiveDate,
    sunday: NaiveDate,
) -> bool {
    let id = &physician.name;
    if !ctx.is_available(id, saturday) || !ctx.is_available(id, sunday) {
        return false;
    }
    if ctx.is_used(saturday, id) || ctx.is_used(sunday, id) {
        return false;
    }
    if let Some(last) = ctx.last_weekend(id) {
        if (saturday - last).num_days() < ctx.opts.min_weekend_gap_days {
            return false;
        }
    }
    if weekend_adjacent_to_vacation(physician, saturday, sunday) {
        return false;
    }
    !physician.weekend_forbidden.contains(&saturday)
}
