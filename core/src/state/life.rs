//! Life spans of a unit within one fight
//!
//! A unit can die and be revived during a fight, so it carries a list of
//! spans. Only the last one may be open.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Life {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lives {
    spans: Vec<Life>,
    last_activity: NaiveDateTime,
}

impl Lives {
    pub fn new(ts: NaiveDateTime) -> Self {
        Self {
            spans: Vec::new(),
            last_activity: ts,
        }
    }

    pub fn spans(&self) -> &[Life] {
        &self.spans
    }

    pub fn last_activity(&self) -> NaiveDateTime {
        self.last_activity
    }

    pub fn bump(&mut self, ts: NaiveDateTime) {
        self.last_activity = ts;
    }

    /// Open a new span. Returns `false` if one is already open.
    pub fn start_life(&mut self, ts: NaiveDateTime) -> bool {
        if self.is_active() {
            return false;
        }
        self.spans.push(Life { start: ts, end: None });
        true
    }

    /// Close the open span, if any.
    pub fn end_life(&mut self, ts: NaiveDateTime) {
        if let Some(life) = self.spans.last_mut()
            && life.end.is_none()
        {
            life.end = Some(ts);
        }
    }

    /// When the last span closed, `None` while alive or never seen alive.
    pub fn last_inactive(&self) -> Option<NaiveDateTime> {
        self.spans.last().and_then(|life| life.end)
    }

    /// Known to be alive right now.
    pub fn is_active(&self) -> bool {
        self.spans.last().is_some_and(|life| life.end.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 18)
            .unwrap()
            .and_hms_opt(7, 0, sec)
            .unwrap()
    }

    #[test]
    fn test_new_lives_are_inactive() {
        let lives = Lives::new(at(0));
        assert!(!lives.is_active());
        assert_eq!(lives.last_inactive(), None);
        assert_eq!(lives.last_activity(), at(0));
    }

    #[test]
    fn test_start_and_end() {
        let mut lives = Lives::new(at(0));
        assert!(lives.start_life(at(1)));
        assert!(!lives.start_life(at(2)));
        assert!(lives.is_active());

        lives.end_life(at(3));
        assert!(!lives.is_active());
        assert_eq!(lives.last_inactive(), Some(at(3)));

        // ending twice keeps the first end
        lives.end_life(at(4));
        assert_eq!(lives.last_inactive(), Some(at(3)));
    }

    #[test]
    fn test_revive() {
        let mut lives = Lives::new(at(0));
        lives.start_life(at(1));
        lives.end_life(at(2));
        lives.start_life(at(5));
        assert!(lives.is_active());
        assert_eq!(lives.spans().len(), 2);
        assert_eq!(lives.last_inactive(), None);
    }
}
