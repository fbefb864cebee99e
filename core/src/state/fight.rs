//! Fight boundaries
//!
//! A fight starts on the first direct damage and ends when no hostile unit is
//! left alive while a friendly one is, or when the player changes zone.

use chrono::{Duration, NaiveDateTime};
use hashbrown::HashMap;

use super::life::Lives;
use super::metrics::MetricAccumulator;
use super::units::UnitRegistry;
use crate::combat_log::records::{CastRecord, ZoneRecord};
use crate::combat_log::{CastAction, Guid, HitType, Message, MessageKind, Slain};

/// What a fight may look at besides itself.
#[derive(Debug, Clone, Copy)]
pub struct FightContext<'a> {
    pub units: &'a UnitRegistry,
    pub previous: Option<&'a Fight>,
    /// A unit that died this recently in the previous fight does not restart combat.
    pub recent_inactivity: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemainingUnits {
    pub friendly_active: usize,
    pub hostile_active: usize,
    pub unknown_active: usize,

    pub friendly_inactive: usize,
    pub hostile_inactive: usize,
    pub unknown_inactive: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Fight {
    zone: Option<ZoneRecord>,
    lives: HashMap<Guid, Lives>,
    metrics: HashMap<Guid, MetricAccumulator>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl Fight {
    pub fn new(zone: Option<ZoneRecord>) -> Self {
        Self {
            zone,
            ..Self::default()
        }
    }

    pub fn zone(&self) -> Option<&ZoneRecord> {
        self.zone.as_ref()
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    pub fn is_started(&self) -> bool {
        self.start.is_some()
    }

    pub fn is_done(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn duration(&self) -> Option<Duration> {
        Some(self.end? - self.start?)
    }

    pub fn lives(&self) -> &HashMap<Guid, Lives> {
        &self.lives
    }

    pub fn metrics(&self) -> &HashMap<Guid, MetricAccumulator> {
        &self.metrics
    }

    /// Every unit that took part, ordered by guid.
    pub fn participants(&self) -> Vec<Guid> {
        let mut guids: Vec<Guid> = self.lives.keys().copied().collect();
        guids.sort_unstable();
        guids
    }

    pub fn process(&mut self, msg: &Message, ctx: &FightContext<'_>) {
        if self.is_done() {
            tracing::error!(kind = msg.kind.name(), "Message routed to a finished fight");
            return;
        }

        let ts = msg.timestamp;
        match &msg.kind {
            MessageKind::Zone(zone) => self.zone_changed(ts, zone),
            MessageKind::Damage(d) => self.damage(ts, d.caster, d.target, d.hit_type, d.amount, ctx),
            MessageKind::SpellDamage(d) => self.damage(ts, d.caster, d.target, d.hit_type, d.amount, ctx),
            MessageKind::PeriodicDamage(d) => {
                self.damage(ts, d.caster, d.target, d.hit_type | HitType::PERIODIC, d.amount, ctx)
            }
            MessageKind::Heal(h) => {
                self.bump(h.caster, ts);
                self.bump(h.target, ts);
                self.metrics_for(h.caster).record_heal_done(h.amount, h.hit_type);
                self.metrics_for(h.target).record_heal_taken(h.amount);
            }
            MessageKind::Cast(cast) => self.cast(ts, cast),
            MessageKind::Slain(slain) => self.slain(ts, slain, ctx),
            MessageKind::Skip(_)
            | MessageKind::Unparsed(_)
            | MessageKind::Combatant(_)
            | MessageKind::UnitInfo(_)
            | MessageKind::ResourceChange(_)
            | MessageKind::Aura(_)
            | MessageKind::Interrupt(_)
            | MessageKind::Create(_)
            | MessageKind::FallDamage(_) => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    fn start_fight(&mut self, ts: NaiveDateTime) {
        if self.start.is_some() {
            return;
        }
        self.start = Some(ts);
        tracing::info!(
            date = %ts,
            zone = self.zone.as_ref().map_or("", |z| z.name.as_str()),
            "Fight started"
        );
    }

    fn end_fight(&mut self, ts: NaiveDateTime) {
        let Some(start) = self.start else {
            tracing::warn!("Attempted to end a fight that has not started");
            return;
        };
        if self.end.is_some() {
            tracing::error!("Attempted to end a fight that already ended");
            return;
        }

        self.end = Some(ts);
        tracing::info!(
            duration_secs = (ts - start).num_seconds(),
            date = %ts,
            zone = self.zone.as_ref().map_or("", |z| z.name.as_str()),
            "Fight ended"
        );
    }

    fn zone_changed(&mut self, ts: NaiveDateTime, zone: &ZoneRecord) {
        if self.zone.as_ref() == Some(zone) {
            return;
        }
        if self.is_started() {
            self.end_fight(ts);
        } else {
            self.zone = Some(zone.clone());
        }
    }

    fn damage(
        &mut self,
        ts: NaiveDateTime,
        caster: Guid,
        target: Guid,
        hit_type: HitType,
        amount: u32,
        ctx: &FightContext<'_>,
    ) {
        self.bump(caster, ts);
        self.bump(target, ts);

        // nobody lands a hit while dead, a corpse can still take one
        if hit_type.intersects(HitType::HIT | HitType::CRIT) {
            self.ensure_alive(caster, ts);
        }

        self.metrics_for(caster).record_damage_done(amount, hit_type);
        self.metrics_for(target).record_damage_taken(amount, hit_type);

        // lingering damage over time never starts a fight
        if hit_type.contains(HitType::PERIODIC) {
            return;
        }

        let trailing = ctx.previous.is_some_and(|prev| {
            prev.recently_inactive(caster, ts, ctx.recent_inactivity)
                || prev.recently_inactive(target, ts, ctx.recent_inactivity)
        });
        if !trailing {
            self.start_fight(ts);
        }
    }

    fn cast(&mut self, ts: NaiveDateTime, cast: &CastRecord) {
        let caster = cast.caster.guid;
        if caster.is_zero() {
            return;
        }

        // a failed cast only proves recent activity
        if cast.action != CastAction::FailsCasting {
            self.ensure_alive(caster, ts);
        }
        self.bump(caster, ts);

        if let Some(target) = &cast.target
            && !target.guid.is_zero()
        {
            self.bump(target.guid, ts);
        }
    }

    fn slain(&mut self, ts: NaiveDateTime, slain: &Slain, ctx: &FightContext<'_>) {
        if let Some(killer) = slain.killer {
            self.bump(killer, ts);
        }
        // a victim never seen alive was alive up to now
        let victim = self.bump(slain.victim, ts);
        if victim.spans().is_empty() {
            victim.start_life(ts);
        }
        victim.end_life(ts);

        if !self.is_started() {
            return;
        }

        let remaining = self.remaining_units(ctx.units);
        tracing::debug!(
            victim = %slain.victim,
            friendly_active = remaining.friendly_active,
            hostile_active = remaining.hostile_active,
            friendly_inactive = remaining.friendly_inactive,
            hostile_inactive = remaining.hostile_inactive,
            unknown_active = remaining.unknown_active,
            unknown_inactive = remaining.unknown_inactive,
            "Slain unit"
        );

        if remaining.hostile_active == 0 && remaining.friendly_active != 0 {
            self.end_fight(ts);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Units
    // ─────────────────────────────────────────────────────────────────────────

    fn bump(&mut self, guid: Guid, ts: NaiveDateTime) -> &mut Lives {
        let lives = self.lives.entry(guid).or_insert_with(|| Lives::new(ts));
        lives.bump(ts);
        lives
    }

    fn ensure_alive(&mut self, guid: Guid, ts: NaiveDateTime) {
        self.bump(guid, ts).start_life(ts);
    }

    fn metrics_for(&mut self, guid: Guid) -> &mut MetricAccumulator {
        self.metrics.entry(guid).or_default()
    }

    /// Whether `guid` died less than `window` before `ts` and stayed dead.
    pub fn recently_inactive(&self, guid: Guid, ts: NaiveDateTime, window: Duration) -> bool {
        let Some(lives) = self.lives.get(&guid) else {
            return false;
        };
        if lives.is_active() {
            return false;
        }
        lives.last_inactive().is_some_and(|ended| ts - ended < window)
    }

    pub fn remaining_units(&self, units: &UnitRegistry) -> RemainingUnits {
        let mut remaining = RemainingUnits::default();

        for (guid, lives) in &self.lives {
            let active = lives.is_active();
            match units.get(*guid) {
                None => {
                    tracing::debug!(guid = %guid, "Unknown unit");
                    if active {
                        remaining.unknown_active += 1;
                    } else {
                        remaining.unknown_inactive += 1;
                    }
                }
                Some(info) if info.can_cooperate => {
                    if active {
                        remaining.friendly_active += 1;
                    } else {
                        remaining.friendly_inactive += 1;
                    }
                }
                Some(_) => {
                    if active {
                        remaining.hostile_active += 1;
                    } else {
                        remaining.hostile_inactive += 1;
                    }
                }
            }
        }

        remaining
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fights
// ─────────────────────────────────────────────────────────────────────────────

/// Finished fights plus the one currently collecting messages.
#[derive(Debug, Clone, Default)]
pub struct Fights {
    completed: Vec<Fight>,
    current: Fight,
}

impl Fights {
    pub fn new(zone: Option<ZoneRecord>) -> Self {
        Self {
            completed: Vec::new(),
            current: Fight::new(zone),
        }
    }

    pub fn current(&self) -> &Fight {
        &self.current
    }

    pub fn completed(&self) -> &[Fight] {
        &self.completed
    }

    /// Completed fights plus the pending one.
    pub fn len(&self) -> usize {
        self.completed.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Route `msg` to the current fight, opening a fresh one once it is done.
    pub fn process(
        &mut self,
        msg: &Message,
        units: &UnitRegistry,
        zone: Option<&ZoneRecord>,
        recent_inactivity: Duration,
    ) {
        let ctx = FightContext {
            units,
            previous: self.completed.last(),
            recent_inactivity,
        };
        self.current.process(msg, &ctx);

        if self.current.is_done() {
            let done = std::mem::replace(&mut self.current, Fight::new(zone.cloned()));
            self.completed.push(done);
        }
    }
}
