//! Compilation of blank tokens into a solution table.
//!
//! Each token becomes a [`Slot`] holding the expected answer. Slots that
//! cannot be compiled are kept with their [`ConfigError`] and never match,
//! so one badly written blank does not stop the rest of a prompt from
//! being graded.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, NumberField};
use crate::token::{self, Token, TokenKind};

/// Identifier of a blank, as written in the prompt.
///
/// Ordering is numeric (`"2" < "10"`), falling back to the literal text so
/// that `"1"` and `"01"` stay distinct but adjacent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn significant_digits(&self) -> &str {
        self.0.trim_start_matches('0')
    }
}

impl Ord for SlotId {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.significant_digits(), other.significant_digits());
        a.len()
            .cmp(&b.len())
            .then_with(|| a.cmp(b))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for SlotId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// What a compiled blank expects.
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    /// Any of these variants, compared case-insensitively.
    Text { accepted: Vec<String> },
    /// A number within `tolerance` of `target`.
    Numeric { target: f64, tolerance: f64 },
    /// The author wrote something that cannot be graded.
    Unsatisfiable(ConfigError),
}

/// One compiled blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub id: SlotId,
    pub kind: TokenKind,
    pub expected: Expected,
}

impl Slot {
    /// Compile a single token.
    pub fn compile(token: &Token) -> Self {
        let expected = match token.kind {
            TokenKind::ShortAnswer => compile_text(&token.rhs),
            TokenKind::Numerical => compile_numeric(&token.rhs),
        }
        .unwrap_or_else(Expected::Unsatisfiable);

        Self {
            id: SlotId::new(token.slot_id.as_str()),
            kind: token.kind,
            expected,
        }
    }

    /// The authoring error for this slot, if it could not be compiled.
    pub fn config_error(&self) -> Option<&ConfigError> {
        match &self.expected {
            Expected::Unsatisfiable(err) => Some(err),
            _ => None,
        }
    }

    /// Short description of the expected answer for authoring tools.
    pub fn describe(&self) -> String {
        match &self.expected {
            Expected::Text { accepted } => accepted.join(" | "),
            Expected::Numeric { target, tolerance } if *tolerance == 0.0 => target.to_string(),
            Expected::Numeric { target, tolerance } => format!("{target} ± {tolerance}"),
            Expected::Unsatisfiable(err) => format!("invalid: {err}"),
        }
    }
}

fn compile_text(rhs: &str) -> Result<Expected, ConfigError> {
    let accepted: Vec<String> = rhs
        .split('|')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();

    if accepted.is_empty() {
        return Err(ConfigError::EmptyVariants);
    }
    Ok(Expected::Text { accepted })
}

fn compile_numeric(rhs: &str) -> Result<Expected, ConfigError> {
    let (base, tolerance_text) = rhs.split_once('±').unwrap_or((rhs, "0"));

    let target = parse_decimal(base).ok_or_else(|| ConfigError::InvalidNumber {
        field: NumberField::Target,
        text: base.trim().to_string(),
    })?;
    let tolerance = parse_decimal(tolerance_text).ok_or_else(|| ConfigError::InvalidNumber {
        field: NumberField::Tolerance,
        text: tolerance_text.trim().to_string(),
    })?;

    if tolerance < 0.0 {
        return Err(ConfigError::NegativeTolerance(tolerance));
    }
    Ok(Expected::Numeric { target, tolerance })
}

/// Parse trimmed text as a finite decimal number.
pub(crate) fn parse_decimal(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Compiled blanks of one prompt, keyed and iterated by [`SlotId`] order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolutionTable {
    slots: BTreeMap<SlotId, Slot>,
    duplicates: Vec<SlotId>,
}

impl SolutionTable {
    /// Compile a prompt's text directly.
    pub fn from_prompt(prompt: &str) -> Self {
        compile(&token::parse(prompt))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Slot> {
        self.slots.get(&SlotId::new(id))
    }

    /// Slots in ascending slot id order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SlotId> {
        self.slots.keys()
    }

    /// Slot ids that appeared more than once in the prompt. The last
    /// occurrence is the one kept in the table.
    pub fn duplicates(&self) -> &[SlotId] {
        &self.duplicates
    }

    /// Slots that will never match because of an authoring error.
    pub fn config_errors(&self) -> impl Iterator<Item = (&SlotId, &ConfigError)> {
        self.slots
            .iter()
            .filter_map(|(id, slot)| slot.config_error().map(|err| (id, err)))
    }
}

/// Compile tokens into a solution table. A repeated slot id replaces the
/// earlier definition.
pub fn compile(tokens: &[Token]) -> SolutionTable {
    let mut table = SolutionTable::default();

    for token in tokens {
        let slot = Slot::compile(token);
        if let Some(err) = slot.config_error() {
            tracing::warn!("blank {} ({}) will never match: {}", slot.id, slot.kind, err);
        }
        if let Some(previous) = table.slots.insert(slot.id.clone(), slot) {
            tracing::debug!("blank {} defined again, keeping the later one", previous.id);
            if !table.duplicates.contains(&previous.id) {
                table.duplicates.push(previous.id);
            }
        }
    }

    tracing::debug!("compiled {} blank(s) from {} token(s)", table.len(), tokens.len());
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_slot(prompt: &str) -> Slot {
        let table = SolutionTable::from_prompt(prompt);
        assert_eq!(table.len(), 1);
        let slot = table.slots().next().unwrap().clone();
        slot
    }

    #[test]
    fn text_variants_are_trimmed_and_empty_parts_dropped() {
        let slot = only_slot("{1:SHORTANSWER:= H2O || h2o |}");
        assert_eq!(
            slot.expected,
            Expected::Text {
                accepted: vec!["H2O".into(), "h2o".into()]
            }
        );
    }

    #[test]
    fn text_without_variants_is_unsatisfiable() {
        let slot = only_slot("{1:SHORTANSWER:= | |}");
        assert_eq!(slot.config_error(), Some(&ConfigError::EmptyVariants));
    }

    #[test]
    fn numeric_with_and_without_tolerance() {
        let slot = only_slot("{2:NUMERICAL:=100±0.5}");
        assert_eq!(
            slot.expected,
            Expected::Numeric {
                target: 100.0,
                tolerance: 0.5
            }
        );

        let slot = only_slot("{2:NUMERICAL:= -3.25 }");
        assert_eq!(
            slot.expected,
            Expected::Numeric {
                target: -3.25,
                tolerance: 0.0
            }
        );
    }

    #[test]
    fn numeric_parse_failures_name_the_field() {
        let slot = only_slot("{1:NUMERICAL:=ten}");
        assert!(matches!(
            slot.config_error(),
            Some(ConfigError::InvalidNumber {
                field: NumberField::Target,
                ..
            })
        ));

        let slot = only_slot("{1:NUMERICAL:=10±a bit}");
        assert!(matches!(
            slot.config_error(),
            Some(ConfigError::InvalidNumber {
                field: NumberField::Tolerance,
                ..
            })
        ));

        let slot = only_slot("{1:NUMERICAL:=10±1±2}");
        assert!(slot.config_error().is_some());

        let slot = only_slot("{1:NUMERICAL:=inf}");
        assert!(slot.config_error().is_some());
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let slot = only_slot("{1:NUMERICAL:=10±-1}");
        assert_eq!(slot.config_error(), Some(&ConfigError::NegativeTolerance(-1.0)));
    }

    #[test]
    fn duplicate_slot_id_last_write_wins() {
        let table = SolutionTable::from_prompt("{1:SHORTANSWER:=A} and later {1:SHORTANSWER:=B}");
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get("1").unwrap().expected,
            Expected::Text {
                accepted: vec!["B".into()]
            }
        );
        assert_eq!(table.duplicates(), &[SlotId::from("1")]);
    }

    #[test]
    fn bad_slot_does_not_affect_others() {
        let table = SolutionTable::from_prompt("{1:NUMERICAL:=x} {2:SHORTANSWER:=ok}");
        assert_eq!(table.len(), 2);
        assert_eq!(table.config_errors().count(), 1);
        assert!(table.get("2").unwrap().config_error().is_none());
    }

    #[test]
    fn slot_ids_iterate_in_numeric_order() {
        let table = SolutionTable::from_prompt(
            "{10:SHORTANSWER:=a} {2:SHORTANSWER:=b} {02:SHORTANSWER:=c} {1:SHORTANSWER:=d}",
        );
        let ids: Vec<_> = table.ids().map(SlotId::as_str).collect();
        assert_eq!(ids, vec!["1", "02", "2", "10"]);
    }

    #[test]
    fn describe_expected_answers() {
        let table = SolutionTable::from_prompt(
            "{1:SHORTANSWER:=a|b} {2:NUMERICAL:=4} {3:NUMERICAL:=4±0.5} {4:SHORTANSWER:=|}",
        );
        let described: Vec<_> = table.slots().map(Slot::describe).collect();
        assert_eq!(described[0], "a | b");
        assert_eq!(described[1], "4");
        assert_eq!(described[2], "4 ± 0.5");
        assert!(described[3].starts_with("invalid:"));
    }

    #[test]
    fn empty_prompt_compiles_to_empty_table() {
        assert!(SolutionTable::from_prompt("No blanks here {just braces}").is_empty());
    }
}
