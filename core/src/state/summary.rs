//! Fight summaries
//!
//! Serializable snapshots of completed fights plus the plain text report the
//! CLI prints.

use std::fmt::Write;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::fight::{Fight, Fights};
use super::units::UnitRegistry;

/// ISO 8601 with milliseconds, the resolution of the log.
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Per unit totals within one fight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub guid: String,
    pub name: Option<String>,
    pub friendly: Option<bool>,
    pub damage_done: u64,
    pub damage_taken: u64,
    pub healing_done: u64,
    pub healing_taken: u64,
    pub deaths: usize,
}

/// Summary of a completed fight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightSummary {
    /// 1 based position among completed fights
    pub index: usize,
    pub zone: Option<String>,
    pub instance_id: Option<u32>,
    /// ISO 8601 formatted start time (or None if unknown)
    pub start_time: Option<String>,
    /// ISO 8601 formatted end time (or None if unknown)
    pub end_time: Option<String>,
    pub duration_seconds: i64,
    /// Sorted by damage done, highest first.
    pub participants: Vec<ParticipantSummary>,
}

impl FightSummary {
    pub fn new(index: usize, fight: &Fight, units: &UnitRegistry) -> Self {
        let mut participants: Vec<ParticipantSummary> = fight
            .participants()
            .into_iter()
            .map(|guid| {
                let metrics = fight.metrics().get(&guid).cloned().unwrap_or_default();
                let info = units.get(guid);
                let deaths = fight.lives().get(&guid).map_or(0, |lives| {
                    lives.spans().iter().filter(|life| life.end.is_some()).count()
                });
                ParticipantSummary {
                    guid: guid.to_string(),
                    name: info.map(|i| i.name.clone()),
                    friendly: info.map(|i| i.can_cooperate),
                    damage_done: metrics.damage_done,
                    damage_taken: metrics.damage_taken,
                    healing_done: metrics.healing_done,
                    healing_taken: metrics.healing_taken,
                    deaths,
                }
            })
            .collect();
        participants.sort_by(|a, b| b.damage_done.cmp(&a.damage_done).then_with(|| a.guid.cmp(&b.guid)));

        Self {
            index,
            zone: fight.zone().map(|z| z.name.clone()),
            instance_id: fight.zone().map(|z| z.instance_id),
            start_time: fight.start().map(|ts| ts.format(ISO_FORMAT).to_string()),
            end_time: fight.end().map(|ts| ts.format(ISO_FORMAT).to_string()),
            duration_seconds: fight.duration().map_or(0, |d| d.num_seconds()),
            participants,
        }
    }
}

impl Fights {
    pub fn summaries(&self, units: &UnitRegistry) -> Vec<FightSummary> {
        self.completed()
            .iter()
            .enumerate()
            .map(|(i, fight)| FightSummary::new(i + 1, fight, units))
            .collect()
    }

    /// Plain text report of every completed fight.
    pub fn report(&self, units: &UnitRegistry) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Fight Summary ({} total, {} completed) ===",
            self.len(),
            self.completed().len()
        );

        for (i, fight) in self.completed().iter().enumerate() {
            out.push('\n');
            render_fight(&mut out, i + 1, fight, units);
        }
        out
    }
}

fn render_fight(out: &mut String, index: usize, fight: &Fight, units: &UnitRegistry) {
    let _ = writeln!(out, "--- Fight #{index} ---");
    match fight.zone() {
        Some(zone) => {
            let _ = writeln!(out, "Zone: {} (Instance {})", zone.name, zone.instance_id);
        }
        None => {
            let _ = writeln!(out, "Zone: unknown");
        }
    }
    if let Some(duration) = fight.duration() {
        let _ = writeln!(out, "Duration: {}", format_duration(duration));
    }
    if let (Some(start), Some(end)) = (fight.start(), fight.end()) {
        let _ = writeln!(out, "Start: {}", clock(start));
        let _ = writeln!(out, "End: {}", clock(end));
    }

    let participants = fight.participants();
    let _ = writeln!(out, "Participants: {}", participants.len());
    for guid in &participants {
        let _ = writeln!(out, "  - {} ({guid})", units.name(*guid).unwrap_or("Unknown"));
    }

    let mut damage: Vec<(&str, u64)> = Vec::new();
    let mut healing: Vec<(&str, u64)> = Vec::new();
    for (guid, metrics) in fight.metrics() {
        let name = units.name(*guid).unwrap_or("Unknown");
        if metrics.damage_done > 0 {
            damage.push((name, metrics.damage_done));
        }
        if metrics.healing_done > 0 {
            healing.push((name, metrics.healing_done));
        }
    }

    render_totals(out, "Damage Done", &mut damage);
    render_totals(out, "Healing Done", &mut healing);
}

fn render_totals(out: &mut String, title: &str, totals: &mut [(&str, u64)]) {
    if totals.is_empty() {
        return;
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let _ = writeln!(out, "{title}:");
    for (name, amount) in totals.iter() {
        let _ = writeln!(out, "  - {name}: {amount}");
    }
}

fn clock(ts: NaiveDateTime) -> String {
    ts.format("%H:%M:%S%.3f").to_string()
}

/// `1h2m3s`, `4m0s`, `12s`, rounded to whole seconds.
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.num_milliseconds().max(0);
    let total = (millis + 500) / 1000;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}
