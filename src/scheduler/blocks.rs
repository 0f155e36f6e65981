use super::constraints;
use super::context::{is_working_day, GenContext};
use crate::model::{PhysicianId, Role, RoleCategory};
use chrono::NaiveDate;

/// Jours ouvrés d'un sous-bloc d'une semaine, pour le second essai HDM.
const SHORT_BLOCK_DAYS: usize = 5;

/// Affecte les blocs continus de semaine, Hospit d'abord puis HDM.
pub(super) fn assign_blocks(ctx: &mut GenContext<'_>) {
    for role in [Role::Hospit1, Role::Hospit2, Role::Hdm1, Role::Hdm2] {
        assign_role(ctx, role);
    }
}

fn assign_role(ctx: &mut GenContext<'_>, role: Role) {
    let Some(category) = role.category() else {
        return;
    };
    let total = ctx.days.len();
    let nominal = ctx.opts.block_days.max(1) as usize;
    let mut index = 0usize;

    while index < total {
        let mut end = (index + nominal).min(total);
        // Queue trop courte pour un bloc entier : le bloc courant l'absorbe
        // (2 semaines nominales, jusqu'à 3 en fin d'horizon).
        if total.saturating_sub(end) < nominal {
            end = total;
        }
        let block: Vec<NaiveDate> = ctx.days[index..end]
            .iter()
            .copied()
            .filter(|d| is_working_day(*d))
            .collect();
        index = end;
        if block.is_empty() {
            continue;
        }

        if try_assign(ctx, role, category, &block) {
            continue;
        }
        // Les rôles HDM retentent une fois sur un sous-bloc d'une semaine.
        if category == RoleCategory::Hdm && block.len() > SHORT_BLOCK_DAYS {
            let short = &block[..SHORT_BLOCK_DAYS];
            try_assign(ctx, role, category, short);
        }
        // Sinon : bloc laissé vide, jamais fatal.
    }
}

/// Cherche le candidat admissible de plus faible charge et l'affecte sur tout
/// le bloc. Renvoie false si personne ne convient.
fn try_assign(
    ctx: &mut GenContext<'_>,
    role: Role,
    category: RoleCategory,
    block: &[NaiveDate],
) -> bool {
    let dataset = ctx.dataset;
    let mut best: Option<(f64, PhysicianId)> = None;

    for physician in &dataset.physicians {
        let id = &physician.name;
        let admissible = block.iter().all(|d| {
            ctx.is_available(id, *d)
                && !ctx.is_used(*d, id)
                && constraints::separation_allows(ctx, *d, id)
        });
        if !admissible {
            continue;
        }
        let score = f64::from(ctx.category_count(id, category)) + ctx.jitter();
        if best
            .as_ref()
            .map_or(true, |(s, _)| score.total_cmp(s).is_lt())
        {
            best = Some((score, id.clone()));
        }
    }

    let Some((_, chosen)) = best else {
        return false;
    };
    for day in block {
        ctx.roster.assign(*day, role, chosen.clone());
        ctx.mark_used(*day, chosen.clone());
    }
    ctx.bump_category(&chosen, category);
    true
}
