use crate::combat_log::HitType;

/// Per unit counters of one fight. Reporting only, never read by the
/// fight state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricAccumulator {
    // Damage dealing
    pub damage_done: u64,
    pub hit_count: u32,
    pub crit_count: u32,
    pub miss_count: u32,

    // Damage receiving
    pub damage_taken: u64,
    pub attacks_received: u32,
    pub avoided_count: u32,

    // Healing
    pub healing_done: u64,
    pub heal_count: u32,
    pub heal_crit_count: u32,
    pub healing_taken: u64,
}

impl MetricAccumulator {
    pub fn record_damage_done(&mut self, amount: u32, hit_type: HitType) {
        self.damage_done += u64::from(amount);
        if hit_type.contains(HitType::CRIT) {
            self.crit_count += 1;
        } else if hit_type.contains(HitType::HIT) {
            self.hit_count += 1;
        } else {
            self.miss_count += 1;
        }
    }

    pub fn record_damage_taken(&mut self, amount: u32, hit_type: HitType) {
        self.damage_taken += u64::from(amount);
        self.attacks_received += 1;
        if !hit_type.intersects(HitType::HIT | HitType::CRIT) {
            self.avoided_count += 1;
        }
    }

    pub fn record_heal_done(&mut self, amount: u32, hit_type: HitType) {
        self.healing_done += u64::from(amount);
        self.heal_count += 1;
        if hit_type.contains(HitType::CRIT) {
            self.heal_crit_count += 1;
        }
    }

    pub fn record_heal_taken(&mut self, amount: u32) {
        self.healing_taken += u64::from(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_outcomes() {
        let mut m = MetricAccumulator::default();
        m.record_damage_done(100, HitType::HIT);
        m.record_damage_done(250, HitType::CRIT);
        m.record_damage_done(0, HitType::DODGE);
        assert_eq!(m.damage_done, 350);
        assert_eq!((m.hit_count, m.crit_count, m.miss_count), (1, 1, 1));

        m.record_damage_taken(0, HitType::PARRY);
        m.record_damage_taken(40, HitType::HIT | HitType::PERIODIC);
        assert_eq!(m.damage_taken, 40);
        assert_eq!(m.attacks_received, 2);
        assert_eq!(m.avoided_count, 1);
    }

    #[test]
    fn test_healing() {
        let mut m = MetricAccumulator::default();
        m.record_heal_done(393, HitType::HIT);
        m.record_heal_done(1048, HitType::CRIT);
        m.record_heal_taken(50);
        assert_eq!(m.healing_done, 1441);
        assert_eq!((m.heal_count, m.heal_crit_count), (2, 1));
        assert_eq!(m.healing_taken, 50);
    }
}
