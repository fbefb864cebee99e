//! Second person to third person rewriting
//!
//! The client narrates the recording player as "You"/"Your". The event grammar
//! only knows third person, so those phrases are rewritten to use the player's
//! guid before parsing. The first matching rule wins; since a line can name the
//! player twice (self damage, self heals) a rewritten line gets a second pass.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::combat_log::Guid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreprocessError {
    #[error("cannot rewrite second person phrasing without a known player")]
    MissingPlayerIdentity,
}

struct Rule {
    pattern: Regex,
    /// `{me}` is replaced by the player guid, `${n}` by capture groups.
    template: &'static str,
}

// Order matters: the specific phrasings must be tried before the generic ones.
const RULES: &[(&str, &str)] = &[
    (r".*You fail to cast.*.", ""),
    (r".*You fail to perform.*.", ""),
    (r" You suffer (.*?) from your", " {me} suffers ${1} from {me} (self damage)'s"),
    (r" Your (.*?) hits you for", " {me} (self damage)'s ${1} hits {me} for"),
    (r" Your (.*?) is parried by", " {me}'s ${1} was parried by"),
    (r" Your (.*?) failed", " {me}'s ${1} fails"),
    (r" failed\. You are immune", " fails. {me} is immune"),
    (r" [Yy]our ", " {me}'s "),
    (r" You gain (.*?) from (.*?)'s", " {me} gains ${1} from ${2}'s"),
    (r" You gain (.*?) from ", " {me} gains ${1} from {me}'s "),
    (r" you gain", " {me} gains"),
    (r" You gain", " {me} gains"),
    (r" You hit", " {me} hits"),
    (r" You crit", " {me} crits"),
    (r" You are", " {me} is"),
    (r" You suffer", " {me} suffers"),
    (r" You lose", " {me} loses"),
    (r" You die", " {me} dies"),
    (r" You cast", " {me} casts"),
    (r" You create", " {me} creates"),
    (r" You perform", " {me} performs"),
    (r" You interrupt", " {me} interrupts"),
    (r" You miss", " {me} misses"),
    (r" You attack", " {me} attacks"),
    (r" You block", " {me} blocks"),
    (r" You parry", " {me} parries"),
    (r" You dodge", " {me} dodges"),
    (r" You resist", " {me} resists"),
    (r" You absorb", " {me} absorbs"),
    (r" You reflect", " {me} reflects"),
    (r" You receive", " {me} receives"),
    (r"&You receive", "&{me} receives"),
    (r" You deflect", " {me} deflects"),
    (r"was dodged\.", "was dodged by {me}."),
    (r"causes you", "causes {me}"),
    (r"heals you", "heals {me}"),
    (r"hits you for", "hits {me} for"),
    (r"crits you for", "crits {me} for"),
    (r" You have slain (.*?)!", " ${1} is slain by {me}."),
    (r"(\S)\s+you\.", "${1} {me}."),
    (r" You fall and lose", " {me} falls and loses"),
];

static COMPILED_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|(pattern, template)| Rule {
            pattern: Regex::new(pattern).expect("valid preprocess regex"),
            template,
        })
        .collect()
});

#[derive(Debug, Clone)]
pub struct Preprocessor {
    me: Guid,
    me_str: String,
}

impl Preprocessor {
    pub fn new(me: Guid) -> Self {
        Self {
            me,
            me_str: me.to_string(),
        }
    }

    pub fn me(&self) -> Guid {
        self.me
    }

    /// Rewrite `content`. Lines matching no rule come back unchanged.
    pub fn process(&self, content: &str) -> Result<String, PreprocessError> {
        match self.rewrite(content)? {
            Some(fixed) => Ok(self.rewrite(&fixed)?.unwrap_or(fixed)),
            None => Ok(content.to_string()),
        }
    }

    // Apply the first matching rule, `None` when nothing matched.
    fn rewrite(&self, content: &str) -> Result<Option<String>, PreprocessError> {
        if content.is_empty() {
            return Ok(None);
        }

        let padded;
        let (line, pad) = if content.starts_with(' ') {
            (content, false)
        } else {
            padded = format!(" {content}");
            (padded.as_str(), true)
        };

        let Some(rule) = COMPILED_RULES.iter().find(|r| r.pattern.is_match(line)) else {
            return Ok(None);
        };

        if self.me.is_zero() {
            return Err(PreprocessError::MissingPlayerIdentity);
        }
        if rule.template.is_empty() {
            return Ok(Some(String::new()));
        }

        let template = rule.template.replace("{me}", &self.me_str);
        let replaced = rule.pattern.replace_all(line, template.as_str());

        let fixed = match (pad, replaced.strip_prefix(' ')) {
            (true, Some(rest)) => rest.to_string(),
            (true, None) => replaced.get(1..).unwrap_or_default().to_string(),
            (false, _) => replaced.into_owned(),
        };
        Ok(Some(fixed))
    }
}
