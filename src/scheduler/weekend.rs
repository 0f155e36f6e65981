use super::constraints;
use super::context::GenContext;
use super::types::PeriodKey;
use crate::model::{PhysicianId, Role};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashMap;

/// Réduction de score quand le samedi figure dans les souhaits du médecin.
const PREFERENCE_BONUS: f64 = 0.5;

/// Affecte chaque week-end de l'horizon : un titulaire HDL le samedi, un
/// renfort Hospit samedi et dimanche.
pub(super) fn assign_weekends(ctx: &mut GenContext<'_>) {
    let pool = ctx.dataset.physicians.len();
    if pool == 0 {
        return;
    }

    let weekends = weekend_pairs(ctx);
    // Samedis de l'horizon par fenêtre d'équité, pour la cible par médecin.
    let mut per_period: HashMap<PeriodKey, u32> = HashMap::new();
    for (saturday, _) in &weekends {
        *per_period.entry(PeriodKey::of(*saturday)).or_insert(0) += 1;
    }

    for (saturday, sunday) in weekends {
        let key = PeriodKey::of(saturday);
        let target = f64::from(per_period.get(&key).copied().unwrap_or(0)) / pool as f64;
        let dataset = ctx.dataset;

        let mut scored: Vec<(f64, PhysicianId)> = Vec::new();
        for physician in &dataset.physicians {
            if !constraints::weekend_eligible(ctx, physician, saturday, sunday) {
                continue;
            }
            let id = &physician.name;
            let projected = f64::from(ctx.weekend_count(id, key) + 1);
            let mut score = (projected - target).abs();
            if physician.weekend_preferred.contains(&saturday) {
                score -= PREFERENCE_BONUS;
            }
            score += ctx.jitter();
            scored.push((score, id.clone()));
        }
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        // Moins de deux éligibles : on prend ce qu'il y a ; zéro : week-end
        // laissé vide.
        let mut picks = scored.into_iter().map(|(_, id)| id);
        let Some(lead) = picks.next() else {
            continue;
        };
        ctx.roster.assign(saturday, Role::HdlSaturday, lead.clone());
        ctx.mark_used(saturday, lead.clone());
        ctx.record_weekend(&lead, saturday);

        if let Some(backup) = picks.next() {
            ctx.roster
                .assign(saturday, Role::HospitSaturday, backup.clone());
            ctx.roster.assign(sunday, Role::HospitSunday, backup.clone());
            ctx.mark_used(saturday, backup.clone());
            ctx.mark_used(sunday, backup.clone());
            ctx.record_weekend(&backup, saturday);
        }
    }
}

/// Paires (samedi, dimanche) entièrement comprises dans l'horizon.
fn weekend_pairs(ctx: &GenContext<'_>) -> Vec<(NaiveDate, NaiveDate)> {
    let last = match ctx.days.last() {
        Some(d) => *d,
        None => return Vec::new(),
    };
    ctx.days
        .iter()
        .copied()
        .filter(|d| d.weekday() == Weekday::Sat)
        .filter_map(|saturday| {
            let sunday = saturday.succ_opt()?;
            (sunday <= last).then_some((saturday, sunday))
        })
        .collect()
}
