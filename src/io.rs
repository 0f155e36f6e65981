use crate::model::{HalfDay, Physician, Roster, VacationInterval};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de médecins depuis CSV: header `name[,vacations]`.
///
/// `vacations` : blocs `AAAA-MM-JJ..AAAA-MM-JJ[@Depart/Retour]` séparés par
/// `;`, demi-journées en français (`Matin`, `Midi`, `Soir`).
pub fn import_physicians_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Physician>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid physician row (empty name)");
        }
        if out
            .iter()
            .any(|p: &Physician| p.name.normalized() == name.to_lowercase())
        {
            bail!("duplicate physician name: {name}");
        }
        let mut physician = Physician::new(name);
        if let Some(ranges) = rec.get(1) {
            let ranges = ranges.trim();
            if !ranges.is_empty() {
                physician.vacations = parse_vacations(ranges)
                    .with_context(|| format!("invalid vacations value for {name}"))?;
            }
        }
        out.push(physician);
    }
    Ok(out)
}

fn parse_vacations(raw: &str) -> anyhow::Result<Vec<VacationInterval>> {
    let mut intervals: Vec<VacationInterval> = Vec::new();
    for chunk in raw.split(';').filter(|c| !c.trim().is_empty()) {
        let interval = parse_vacation_chunk(chunk.trim())?;
        if intervals.iter().any(|v| v.overlaps(&interval)) {
            bail!("overlapping vacation interval: {chunk}");
        }
        intervals.push(interval);
    }
    intervals.sort_by_key(|v| v.start);
    Ok(intervals)
}

fn parse_vacation_chunk(chunk: &str) -> anyhow::Result<VacationInterval> {
    let (range, half_days) = match chunk.split_once('@') {
        Some((range, tags)) => (range.trim(), Some(tags.trim())),
        None => (chunk, None),
    };
    let (start, end) = if let Some((start_raw, end_raw)) = range.split_once("..") {
        (parse_date(start_raw.trim())?, parse_date(end_raw.trim())?)
    } else {
        let day = parse_date(range)?;
        (day, day)
    };
    let (departure, return_) = match half_days {
        Some(tags) => {
            let (dep, ret) = tags
                .split_once('/')
                .with_context(|| format!("expected Depart/Retour, got: {tags}"))?;
            (parse_half_day(dep.trim())?, parse_half_day(ret.trim())?)
        }
        None => (HalfDay::Morning, HalfDay::Evening),
    };
    VacationInterval::new(start, end, departure, return_).map_err(anyhow::Error::from)
}

fn parse_half_day(s: &str) -> anyhow::Result<HalfDay> {
    match s.to_lowercase().as_str() {
        "matin" => Ok(HalfDay::Morning),
        "midi" => Ok(HalfDay::Noon),
        "soir" => Ok(HalfDay::Evening),
        _ => bail!("invalid half-day tag: {s}"),
    }
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Export JSON du planning (jolie mise en forme).
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(roster)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV à plat du planning: header `date,role,physician`, une ligne
/// par médecin (Consult déplié), trié par date.
pub fn export_roster_csv<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "role", "physician"])?;
    for (date, roles) in &roster.days {
        let date = date.format("%Y-%m-%d").to_string();
        for (role, slot) in roles {
            for physician in slot.members() {
                w.write_record([date.as_str(), role.as_str(), physician.as_str()])?;
            }
        }
    }
    w.flush()?;
    Ok(())
}
