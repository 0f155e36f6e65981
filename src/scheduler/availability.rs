use super::context::GenContext;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Précalcule l'indisponibilité de chaque médecin sur l'horizon.
///
/// Congés (bornes incluses) et dates interdites globales sont fondus dans le
/// même jeu de jours par médecin ; les boucles de blocs et de jours font
/// ensuite des consultations O(1), jamais de reparcours des intervalles.
pub(super) fn precompute(ctx: &mut GenContext<'_>) {
    for physician in &ctx.dataset.physicians {
        let mut days: BTreeSet<NaiveDate> = BTreeSet::new();
        for vacation in &physician.vacations {
            let mut day = vacation.start;
            loop {
                days.insert(day);
                if day >= vacation.end {
                    break;
                }
                match day.succ_opt() {
                    Some(next) => day = next,
                    None => break,
                }
            }
        }
        days.extend(ctx.dataset.blackout_dates.iter().copied());
        ctx.indisposed.insert(physician.name.clone(), days);
    }
}
