#![forbid(unsafe_code)]
use chrono::NaiveDate;
use garde::{
    audit, generate, Dataset, GenOptions, PhysicianId, Role, RoleSlot, VacationInterval,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn pool(n: usize) -> Dataset {
    let mut ds = Dataset::default();
    for i in 0..n {
        ds.add_physician(format!("Med{i}")).unwrap();
    }
    ds
}

/// Rôles exclusifs tenus par un médecin un jour donné, couverture HDM->HDL
/// dérivée comptée comme une seule occupation.
fn exclusive_roles_of(
    roster: &garde::Roster,
    date: NaiveDate,
    physician: &PhysicianId,
) -> Vec<Role> {
    let Some(roles) = roster.days.get(&date) else {
        return Vec::new();
    };
    roles
        .iter()
        .filter(|(role, _)| role.is_exclusive())
        .filter_map(|(role, slot)| match slot {
            RoleSlot::Single(id) if id == physician => Some(*role),
            _ => None,
        })
        .collect()
}

#[test]
fn one_week_six_physicians_full_coverage() {
    let ds = pool(6);
    // Lundi 1er juillet 2024.
    let mut opts = GenOptions::new(d(2024, 7, 1));
    opts.weeks = 1;
    let roster = generate(&ds, opts).unwrap();

    for day in (0..5).map(|i| d(2024, 7, 1 + i)) {
        for role in [Role::Hospit1, Role::Hospit2, Role::Hdm1, Role::Hdm2, Role::Hdl1] {
            assert!(
                roster.holder(day, role).is_some(),
                "{role:?} missing on {day}"
            );
        }
    }
}

#[test]
fn five_present_physicians_derive_hdl1_from_hdm1() {
    let mut ds = pool(6);
    // Un médecin absent toute la semaine : cinq présents chaque jour ouvré.
    let away = ds.physicians[5].name.clone();
    ds.add_vacation(
        &away,
        VacationInterval::full_days(d(2024, 7, 1), d(2024, 7, 7)).unwrap(),
    )
    .unwrap();

    let mut opts = GenOptions::new(d(2024, 7, 1));
    opts.weeks = 1;
    let roster = generate(&ds, opts).unwrap();

    for day in (0..5).map(|i| d(2024, 7, 1 + i)) {
        let hdm1 = roster.holder(day, Role::Hdm1);
        assert!(hdm1.is_some(), "HDM1 missing on {day}");
        assert_eq!(roster.holder(day, Role::Hdl1), hdm1, "on {day}");
    }
}

#[test]
fn exclusive_role_uniqueness_holds() {
    let mut ds = pool(8);
    let id = ds.physicians[2].name.clone();
    ds.add_vacation(
        &id,
        VacationInterval::full_days(d(2024, 7, 15), d(2024, 7, 26)).unwrap(),
    )
    .unwrap();

    let mut opts = GenOptions::new(d(2024, 7, 1));
    opts.weeks = 8;
    let roster = generate(&ds, opts).unwrap();

    assert!(audit(&roster, &ds).is_empty());
    for (date, _) in &roster.days {
        for physician in &ds.physicians {
            let roles = exclusive_roles_of(&roster, *date, &physician.name);
            let sanctioned = roles == [Role::Hdl1, Role::Hdm1] || roles == [Role::Hdl2, Role::Hdm2];
            assert!(
                roles.len() <= 1 || sanctioned,
                "{} holds {roles:?} on {date}",
                physician.name
            );
        }
    }
}

#[test]
fn weekend_assignments_are_spaced_fourteen_days() {
    let ds = pool(5);
    let mut opts = GenOptions::new(d(2024, 7, 1));
    opts.weeks = 20;
    let roster = generate(&ds, opts).unwrap();

    for physician in &ds.physicians {
        let mut saturdays: Vec<NaiveDate> = roster
            .days
            .iter()
            .filter(|(_, roles)| {
                [Role::HdlSaturday, Role::HospitSaturday].iter().any(|r| {
                    roles.get(r).map_or(false, |slot| {
                        slot.members().contains(&physician.name)
                    })
                })
            })
            .map(|(date, _)| *date)
            .collect();
        saturdays.sort();
        for pair in saturdays.windows(2) {
            assert!(
                (pair[1] - pair[0]).num_days() >= 14,
                "{} worked {} then {}",
                physician.name,
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn vacation_days_and_adjacent_weekends_are_protected() {
    let mut ds = pool(6);
    let id = ds.physicians[0].name.clone();
    ds.add_vacation(
        &id,
        VacationInterval::full_days(d(2024, 7, 1), d(2024, 7, 5)).unwrap(),
    )
    .unwrap();

    // Horizon démarrant le lundi 24 juin, couvrant les deux week-ends voisins.
    let mut opts = GenOptions::new(d(2024, 6, 24));
    opts.weeks = 4;
    let roster = generate(&ds, opts).unwrap();

    for offset in 0..5 {
        let day = d(2024, 7, 1 + offset);
        if let Some(roles) = roster.days.get(&day) {
            for slot in roles.values() {
                assert!(
                    !slot.members().contains(&id),
                    "{id} assigned on vacation day {day}"
                );
            }
        }
    }
    for (saturday, sunday) in [(d(2024, 6, 29), d(2024, 6, 30)), (d(2024, 7, 6), d(2024, 7, 7))] {
        for role in [Role::HdlSaturday, Role::HospitSaturday] {
            assert_ne!(roster.holder(saturday, role), Some(&id));
        }
        assert_ne!(roster.holder(sunday, Role::HospitSunday), Some(&id));
    }
}

#[test]
fn separation_set_never_doubles_up_on_core_roles() {
    let mut ds = pool(7);
    for i in [1usize, 3, 5] {
        let name = ds.physicians[i].name.clone();
        ds.separation_set.insert(name);
    }

    let mut opts = GenOptions::new(d(2024, 7, 1));
    opts.weeks = 12;
    let roster = generate(&ds, opts).unwrap();

    assert!(audit(&roster, &ds).is_empty());
    for (date, roles) in &roster.days {
        let members = Role::WEEKDAY_CORE
            .iter()
            .filter_map(|r| roles.get(r))
            .filter_map(|slot| match slot {
                RoleSlot::Single(id) => Some(id),
                RoleSlot::Many(_) => None,
            })
            .filter(|id| ds.separation_set.contains(*id))
            .collect::<std::collections::BTreeSet<_>>();
        assert!(members.len() <= 1, "separation conflict on {date}");
    }
}

#[test]
fn two_separated_physicians_yield_one_core_role_and_one_consult() {
    let mut ds = pool(2);
    for physician in &ds.physicians.clone() {
        ds.separation_set.insert(physician.name.clone());
    }

    let mut opts = GenOptions::new(d(2024, 7, 1));
    opts.weeks = 1;
    let roster = generate(&ds, opts).unwrap();

    for day in (0..5).map(|i| d(2024, 7, 1 + i)) {
        let roles = roster.days.get(&day).unwrap();
        let core_members: Vec<_> = Role::WEEKDAY_CORE
            .iter()
            .filter_map(|r| roles.get(r))
            .flat_map(|slot| slot.members())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        assert_eq!(core_members.len(), 1, "on {day}");
        let consult = roles.get(&Role::Consult).unwrap();
        assert_eq!(consult.members().len(), 1);
        assert_ne!(consult.members()[0], *core_members[0]);
    }
}

#[test]
fn separation_set_applies_regardless_of_name_casing() {
    let mut ds = Dataset::default();
    ds.add_physician("Dupont").unwrap();
    ds.add_physician("Martin").unwrap();
    // Saisie en minuscules : doit viser les mêmes médecins.
    ds.separation_set.insert(PhysicianId::new("dupont"));
    ds.separation_set.insert(PhysicianId::new("martin"));

    let mut opts = GenOptions::new(d(2024, 7, 1));
    opts.weeks = 1;
    let roster = generate(&ds, opts).unwrap();

    for day in (0..5).map(|i| d(2024, 7, 1 + i)) {
        let roles = roster.days.get(&day).unwrap();
        let core_members: std::collections::BTreeSet<_> = Role::WEEKDAY_CORE
            .iter()
            .filter_map(|r| roles.get(r))
            .flat_map(|slot| slot.members())
            .collect();
        assert_eq!(core_members.len(), 1, "on {day}");
    }
}

#[test]
fn audit_flags_separation_conflicts_with_mismatched_casing() {
    let mut ds = Dataset::default();
    ds.add_physician("Dupont").unwrap();
    ds.add_physician("Martin").unwrap();
    ds.separation_set.insert(PhysicianId::new("dupont"));
    ds.separation_set.insert(PhysicianId::new("martin"));

    let mut roster = garde::Roster::default();
    let day = d(2024, 7, 1);
    roster.assign(day, Role::Hospit1, PhysicianId::new("Dupont"));
    roster.assign(day, Role::Hdl1, PhysicianId::new("Martin"));

    let violations = audit(&roster, &ds);
    assert_eq!(violations.len(), 1);
    assert!(matches!(
        violations[0].kind,
        garde::ViolationKind::SeparationConflict
    ));
}

#[test]
fn same_seed_reproduces_identical_roster() {
    let mut ds = pool(9);
    let id = ds.physicians[4].name.clone();
    ds.add_vacation(
        &id,
        VacationInterval::full_days(d(2024, 8, 5), d(2024, 8, 16)).unwrap(),
    )
    .unwrap();

    let mut opts = GenOptions::new(d(2024, 7, 1));
    opts.weeks = 10;
    opts.seed = 1234;
    let first = generate(&ds, opts).unwrap();
    let second = generate(&ds, opts).unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn empty_pool_yields_empty_roster() {
    let ds = Dataset::default();
    let mut opts = GenOptions::new(d(2024, 7, 1));
    opts.weeks = 4;
    let roster = generate(&ds, opts).unwrap();
    assert!(roster.days.is_empty());
}

#[test]
fn zero_weeks_is_an_error() {
    let ds = pool(3);
    let mut opts = GenOptions::new(d(2024, 7, 1));
    opts.weeks = 0;
    assert!(generate(&ds, opts).is_err());
}
