//! Combat state reconstructed from the message stream
//!
//! [`State`] owns everything derived from parsed messages: the unit registry,
//! zone history, player statistics and the fight list. Messages must be fed
//! in log order.

mod fight;
mod life;
mod metrics;
mod participants;
mod summary;
mod units;


pub use fight::{Fight, FightContext, Fights, RemainingUnits};
pub use life::{Life, Lives};
pub use metrics::MetricAccumulator;
pub use participants::{ParticipantStats, Participants};
pub use summary::{FightSummary, ParticipantSummary, format_duration};
pub use units::UnitRegistry;

use std::fmt;

use chrono::{Duration, NaiveDateTime};

use crate::combat_log::records::ZoneRecord;
use crate::combat_log::{Message, MessageKind, Unit};
use chronicle_types::DEFAULT_RECENT_INACTIVITY_MS;

#[derive(Debug, Clone)]
pub struct State {
    me: Unit,
    units: UnitRegistry,
    participants: Participants,
    zone: Option<ZoneRecord>,
    zone_history: Vec<ZoneRecord>,
    fights: Fights,
    recent_inactivity: Duration,
}

impl State {
    /// Fresh state for a session recorded by `me`, first seen at `seen`.
    pub fn new(me: Unit, seen: NaiveDateTime) -> Self {
        Self {
            units: UnitRegistry::with_me(&me, seen),
            me,
            participants: Participants::default(),
            zone: None,
            zone_history: Vec::new(),
            fights: Fights::new(None),
            recent_inactivity: Duration::milliseconds(DEFAULT_RECENT_INACTIVITY_MS),
        }
    }

    pub fn with_recent_inactivity(mut self, window: Duration) -> Self {
        self.recent_inactivity = window;
        self
    }

    pub fn me(&self) -> &Unit {
        &self.me
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    pub fn participants(&self) -> &Participants {
        &self.participants
    }

    pub fn zone(&self) -> Option<&ZoneRecord> {
        self.zone.as_ref()
    }

    /// Distinct zones in the order they were entered.
    pub fn zone_history(&self) -> &[ZoneRecord] {
        &self.zone_history
    }

    pub fn fights(&self) -> &Fights {
        &self.fights
    }

    pub fn summaries(&self) -> Vec<FightSummary> {
        self.fights.summaries(&self.units)
    }

    pub fn process(&mut self, msg: &Message) {
        match &msg.kind {
            MessageKind::Zone(zone) if zone.name.is_empty() => {
                tracing::debug!(instance_id = zone.instance_id, "Ignoring zone without a name");
                return;
            }
            MessageKind::Zone(zone) => self.zone_changed(zone),
            MessageKind::Combatant(combatant) => {
                self.units.update_player(combatant);
                self.participants.combatant(combatant);
            }
            MessageKind::UnitInfo(info) => {
                self.units.update(info.clone());
            }
            MessageKind::Cast(cast) => self.participants.cast(cast),
            MessageKind::SpellDamage(damage) => {
                self.participants.spell_damage(damage.caster, damage.amount);
            }
            _ => {}
        }

        self.fights.process(msg, &self.units, self.zone.as_ref(), self.recent_inactivity);
    }

    fn zone_changed(&mut self, zone: &ZoneRecord) {
        if self.zone.as_ref() == Some(zone) {
            return;
        }

        tracing::info!(
            zone_name = %zone.name,
            instance_id = zone.instance_id,
            old_zone_name = self.zone.as_ref().map_or("", |z| z.name.as_str()),
            old_instance_id = self.zone.as_ref().map_or(0, |z| z.instance_id),
            "Zone changed"
        );
        self.zone_history.push(zone.clone());
        self.zone = Some(zone.clone());
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fights.report(&self.units))?;

        writeln!(f)?;
        writeln!(f, "=== Participants ({}) ===", self.participants.len())?;
        for stats in self.participants.iter() {
            writeln!(f, "{stats}")?;
        }
        Ok(())
    }
}
