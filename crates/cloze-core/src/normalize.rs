//! Submission normalization.
//!
//! Depending on how a task was submitted, the value for one cloze problem can
//! be a JSON string, a plain string, a mapping keyed by slot id, a list of
//! candidate values, or an envelope carrying the payload under a conventional
//! key. [`Submission`] names each of those shapes once and [`normalize`]
//! resolves any of them into an [`AnswerMap`]. Normalization never fails:
//! anything unrecognisable simply yields no answers.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::solution::SlotId;

/// Envelope keys that carry the real payload, in priority order.
pub const PAYLOAD_KEYS: [&str; 4] = ["value", "answer", "data", "raw"];

/// A raw submission value as it arrives from the transport.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum Submission {
    /// Nothing was submitted (`null` or a missing field).
    #[default]
    Absent,
    /// A string: either JSON text or a bare answer.
    Text(String),
    /// A number or boolean, kept in its textual form.
    Scalar(String),
    /// Candidate values; the first one that mentions an expected slot wins.
    Sequence(Vec<Submission>),
    /// Either an envelope (see [`PAYLOAD_KEYS`]) or answers keyed by slot id.
    Mapping(BTreeMap<String, Submission>),
}

impl Submission {
    fn shape(&self) -> &'static str {
        match self {
            Submission::Absent => "absent",
            Submission::Text(_) => "text",
            Submission::Scalar(_) => "scalar",
            Submission::Sequence(_) => "sequence",
            Submission::Mapping(_) => "mapping",
        }
    }

    /// Reduce a single answer value to text.
    fn to_answer_text(&self) -> String {
        match self {
            Submission::Absent => String::new(),
            Submission::Text(s) | Submission::Scalar(s) => s.clone(),
            Submission::Sequence(items) => items
                .iter()
                .map(Submission::to_answer_text)
                .find(|s| !s.trim().is_empty())
                .unwrap_or_default(),
            Submission::Mapping(map) => payload(map)
                .map(Submission::to_answer_text)
                .unwrap_or_default(),
        }
    }
}

impl From<Value> for Submission {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Submission::Absent,
            Value::Bool(b) => Submission::Scalar(b.to_string()),
            Value::Number(n) => Submission::Scalar(n.to_string()),
            Value::String(s) => Submission::Text(s),
            Value::Array(items) => {
                Submission::Sequence(items.into_iter().map(Submission::from).collect())
            }
            Value::Object(map) => Submission::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, Submission::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Submission {
    fn from(s: &str) -> Self {
        Submission::Text(s.to_string())
    }
}

impl From<String> for Submission {
    fn from(s: String) -> Self {
        Submission::Text(s)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Submission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Submission::Mapping(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Submission::Text(v.into())))
                .collect(),
        )
    }
}

fn payload(map: &BTreeMap<String, Submission>) -> Option<&Submission> {
    PAYLOAD_KEYS.iter().find_map(|key| map.get(*key))
}

/// Trimmed answers for the expected slots that the submission mentioned.
///
/// A slot that is present with an empty value was recorded but left blank;
/// a slot that is absent was not recorded at all. Both read as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerMap {
    answers: BTreeMap<SlotId, String>,
}

impl AnswerMap {
    /// The trimmed answer for `id`, or `""` when none was given.
    pub fn answer(&self, id: &SlotId) -> &str {
        self.get(id).unwrap_or("")
    }

    pub fn get(&self, id: &SlotId) -> Option<&str> {
        self.answers.get(id).map(String::as_str)
    }

    /// True when the submission did not mention any expected slot.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }
}

/// Resolve `raw` into answers for `expected` slots. Keys outside `expected`
/// are ignored.
pub fn normalize<'a>(raw: &Submission, expected: impl IntoIterator<Item = &'a SlotId>) -> AnswerMap {
    let expected: Vec<&SlotId> = expected.into_iter().collect();
    let answers = resolve(raw, &expected);
    tracing::debug!(
        "normalized {} submission into {}/{} answer(s)",
        raw.shape(),
        answers.len(),
        expected.len()
    );
    answers
}

fn resolve(raw: &Submission, expected: &[&SlotId]) -> AnswerMap {
    match raw {
        Submission::Absent => AnswerMap::default(),
        Submission::Text(s) | Submission::Scalar(s) => from_text(s, expected),
        Submission::Sequence(items) => items
            .iter()
            .map(|item| resolve(item, expected))
            .find(|answers| !answers.is_empty())
            .unwrap_or_default(),
        Submission::Mapping(map) => match payload(map) {
            Some(inner) => resolve(inner, expected),
            None => from_mapping(map, expected),
        },
    }
}

fn from_text(text: &str, expected: &[&SlotId]) -> AnswerMap {
    let text = text.trim();
    if text.is_empty() {
        return AnswerMap::default();
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        let map: BTreeMap<String, Submission> = map
            .into_iter()
            .map(|(k, v)| (k, Submission::from(v)))
            .collect();
        return from_mapping(&map, expected);
    }

    // A bare answer only makes sense when there is a single blank to fill.
    match expected {
        [only] => AnswerMap {
            answers: BTreeMap::from([((*only).clone(), text.to_string())]),
        },
        _ => AnswerMap::default(),
    }
}

fn from_mapping(map: &BTreeMap<String, Submission>, expected: &[&SlotId]) -> AnswerMap {
    let answers = expected
        .iter()
        .filter_map(|id| {
            map.get(id.as_str())
                .map(|v| ((*id).clone(), v.to_answer_text().trim().to_string()))
        })
        .collect();
    AnswerMap { answers }
}
