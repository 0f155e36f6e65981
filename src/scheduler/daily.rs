use super::constraints;
use super::context::GenContext;
use crate::model::{PhysicianId, Role, RoleCategory};
use chrono::NaiveDate;

/// Complète chaque jour ouvré : dérivation HDL selon l'effectif présent,
/// remplissage des HDL restants, puis Consult pour tous les disponibles
/// encore libres.
pub(super) fn assign_daily(ctx: &mut GenContext<'_>) {
    let working: Vec<NaiveDate> = ctx.working_days().collect();
    for day in working {
        let dataset = ctx.dataset;
        let presents = dataset
            .physicians
            .iter()
            .filter(|p| ctx.is_available(&p.name, day))
            .count();

        // Règle d'effectif : à 5 présents le titulaire HDM1 couvre aussi
        // HDL1 ; à 4, HDM2 couvre HDL2.
        if presents == 5 {
            derive_coverage(ctx, day, Role::Hdm1, Role::Hdl1);
        }
        if presents == 4 {
            derive_coverage(ctx, day, Role::Hdm2, Role::Hdl2);
        }

        for role in [Role::Hdl1, Role::Hdl2] {
            if ctx.roster.slot(day, role).is_none() {
                fill_hdl(ctx, day, role);
            }
        }

        for physician in &dataset.physicians {
            let id = &physician.name;
            if ctx.is_available(id, day) && !ctx.is_used(day, id) {
                ctx.roster.push_consult(day, id.clone());
                ctx.bump_consult(id);
            }
        }
    }
}

fn derive_coverage(ctx: &mut GenContext<'_>, day: NaiveDate, from: Role, to: Role) {
    if ctx.roster.slot(day, to).is_some() {
        return;
    }
    if let Some(holder) = ctx.roster.holder(day, from).cloned() {
        ctx.roster.assign(day, to, holder);
    }
}

fn fill_hdl(ctx: &mut GenContext<'_>, day: NaiveDate, role: Role) {
    let dataset = ctx.dataset;
    let mut best: Option<(f64, PhysicianId)> = None;
    for physician in &dataset.physicians {
        let id = &physician.name;
        if !ctx.is_available(id, day)
            || ctx.is_used(day, id)
            || !constraints::separation_allows(ctx, day, id)
        {
            continue;
        }
        let score = f64::from(ctx.category_count(id, RoleCategory::Hdl)) + ctx.jitter();
        if best
            .as_ref()
            .map_or(true, |(s, _)| score.total_cmp(s).is_lt())
        {
            best = Some((score, id.clone()));
        }
    }
    if let Some((_, chosen)) = best {
        ctx.roster.assign(day, role, chosen.clone());
        ctx.mark_used(day, chosen.clone());
        ctx.bump_category(&chosen, RoleCategory::Hdl);
    }
}
