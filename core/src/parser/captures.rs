//! Positional capture extraction
//!
//! Matchers pop capture groups in the order their grammar declares them.
//! Conversion failures are collected instead of returned one by one so a
//! matcher reads like its grammar, then calls [`Captures::finish`].

use crate::combat_log::{GUID_STR_LEN, Guid, HitType, ParseError, Resource, School, Trailer};

pub(super) struct Captures<'a> {
    matcher: &'static str,
    caps: regex::Captures<'a>,
    index: usize,
    errors: Vec<String>,
}

impl<'a> Captures<'a> {
    pub(super) fn new(matcher: &'static str, caps: regex::Captures<'a>) -> Self {
        Self {
            matcher,
            caps,
            index: 1,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, detail: String) {
        self.errors.push(detail);
    }

    // Optional groups that did not participate read as "".
    fn pop(&mut self) -> &'a str {
        if self.index >= self.caps.len() {
            self.fail(format!("capture {} out of range", self.index));
            return "";
        }
        let value = self.caps.get(self.index).map_or("", |m| m.as_str());
        self.index += 1;
        value
    }

    pub(super) fn str(&mut self) -> String {
        self.pop().to_string()
    }

    pub(super) fn skip(&mut self) {
        self.pop();
    }

    /// A guid prefixed value (`0x…` or `0x…(Name)`) yields its guid, a bare
    /// name yields [`Guid::ZERO`].
    pub(super) fn unit_or_guid(&mut self) -> Guid {
        let value = self.pop();
        if value.len() < GUID_STR_LEN || !value.starts_with("0x") {
            return Guid::ZERO;
        }
        match value.get(..GUID_STR_LEN).map(Guid::parse) {
            Some(Ok(guid)) => guid,
            Some(Err(err)) => {
                self.fail(err.to_string());
                Guid::ZERO
            }
            None => {
                self.fail(format!("invalid guid: {value}"));
                Guid::ZERO
            }
        }
    }

    pub(super) fn u32(&mut self) -> u32 {
        let value = self.pop();
        value.parse().unwrap_or_else(|_| {
            self.fail(format!("invalid number: {value:?}"));
            0
        })
    }

    pub(super) fn school(&mut self) -> School {
        let value = self.pop();
        School::from_name(value).unwrap_or_else(|| {
            self.fail(format!("unknown school: {value:?}"));
            School::default()
        })
    }

    pub(super) fn resource(&mut self) -> Resource {
        let value = self.pop();
        Resource::from_name(value).unwrap_or_else(|| {
            self.fail(format!("unknown resource: {value:?}"));
            Resource::Health
        })
    }

    /// Avoidance verb such as `dodges` or `was parried by`'s `parried`.
    pub(super) fn hit_mask(&mut self) -> HitType {
        let value = self.pop();
        HitType::from_avoidance(value).unwrap_or_else(|| {
            self.fail(format!("unknown hit mask: {value:?}"));
            HitType::NONE
        })
    }

    /// `h` or `cr`.
    pub(super) fn short_hit(&mut self) -> HitType {
        let value = self.pop();
        HitType::from_short(value).unwrap_or_else(|| {
            self.fail(format!("unknown hit type: {value:?}"));
            HitType::NONE
        })
    }

    pub(super) fn trailer(&mut self) -> Trailer {
        let value = self.pop();
        Trailer::parse(value).unwrap_or_else(|err| {
            self.fail(err.to_string());
            Trailer::default()
        })
    }

    pub(super) fn finish(self) -> Result<(), ParseError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(ParseError::InvalidValue {
            matcher: self.matcher,
            detail: self.errors.join("; "),
        })
    }
}
