//! Structural checks for the site's JSON data files.
//!
//! Top-level checks stop at the first violation. Per-item checks visit every item and
//! report all violations found, in item order.

use serde_json::Value;

/// A structural checker for one data file.
pub trait SchemaCheck: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;
    fn check(&self, data: &Value) -> Result<(), SchemaError>;
}

/// A structural violation found in a parsed data file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required field: {0}")]
    MissingKey(&'static str),
    #[error("field {0} should be a list")]
    NotAList(&'static str),
    #[error("expected {expected} {noun}, found {found}")]
    WrongCount {
        noun: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{}", join_violations(.0))]
    Items(Vec<ItemViolation>),
}

/// One problem with one list entry. `number` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{item} {number}: {problem}")]
pub struct ItemViolation {
    pub item: &'static str,
    pub number: usize,
    pub problem: ItemProblem,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemProblem {
    #[error("missing required field {0}")]
    MissingField(&'static str),
    #[error("options should be a list")]
    OptionsNotAList,
    #[error("expected {expected} options, found {found}")]
    WrongOptionCount { expected: usize, found: usize },
    #[error("expected exactly 1 correct option, found {found}")]
    WrongCorrectCount { found: usize },
}

fn join_violations(items: &[ItemViolation]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

const COMPARISON_KEYS: &[&str] = &[
    "metadata",
    "subspecies",
    "comparisons",
    "identification_guide",
    "genetic_info",
];
const SUBSPECIES_FIELDS: &[&str] = &["id", "name", "image", "characteristics"];
const SUBSPECIES_COUNT: usize = 2;

const QUIZ_KEYS: &[&str] = &["quiz_info", "questions", "score_feedback", "categories"];
const QUESTION_FIELDS: &[&str] = &["id", "question", "options", "explanation"];
const QUESTION_COUNT: usize = 8;
const OPTION_COUNT: usize = 2;

/// `subspecies.json`: the two-subspecies comparison dataset.
pub struct ComparisonSchema;

impl SchemaCheck for ComparisonSchema {
    fn name(&self) -> &'static str {
        "subspecies comparison"
    }

    fn check(&self, data: &Value) -> Result<(), SchemaError> {
        require_keys(data, COMPARISON_KEYS)?;
        let entries = require_list(data, "subspecies", "subspecies", SUBSPECIES_COUNT)?;

        let violations = entries
            .iter()
            .enumerate()
            .flat_map(|(i, entry)| {
                missing_fields(entry, SUBSPECIES_FIELDS).map(move |field| ItemViolation {
                    item: "subspecies",
                    number: i + 1,
                    problem: ItemProblem::MissingField(field),
                })
            })
            .collect();
        items_result(violations)
    }
}

/// `quiz.json`: eight two-option questions with one correct answer each.
pub struct QuizSchema;

impl SchemaCheck for QuizSchema {
    fn name(&self) -> &'static str {
        "quiz"
    }

    fn check(&self, data: &Value) -> Result<(), SchemaError> {
        require_keys(data, QUIZ_KEYS)?;
        let questions = require_list(data, "questions", "questions", QUESTION_COUNT)?;

        let violations = questions
            .iter()
            .enumerate()
            .flat_map(|(i, question)| question_violations(i + 1, question))
            .collect();
        items_result(violations)
    }
}

fn question_violations(number: usize, question: &Value) -> Vec<ItemViolation> {
    let violation = |problem| ItemViolation {
        item: "question",
        number,
        problem,
    };

    let mut out: Vec<ItemViolation> = missing_fields(question, QUESTION_FIELDS)
        .map(|field| violation(ItemProblem::MissingField(field)))
        .collect();

    let Some(options) = question.get("options") else {
        return out;
    };
    let Some(options) = options.as_array() else {
        out.push(violation(ItemProblem::OptionsNotAList));
        return out;
    };

    if options.len() != OPTION_COUNT {
        out.push(violation(ItemProblem::WrongOptionCount {
            expected: OPTION_COUNT,
            found: options.len(),
        }));
    }
    let correct = options
        .iter()
        .filter(|o| o.get("correct").is_some_and(is_truthy))
        .count();
    if correct != 1 {
        out.push(violation(ItemProblem::WrongCorrectCount { found: correct }));
    }
    out
}

fn require_keys(data: &Value, keys: &[&'static str]) -> Result<(), SchemaError> {
    match keys.iter().find(|key| data.get(**key).is_none()) {
        Some(key) => Err(SchemaError::MissingKey(*key)),
        None => Ok(()),
    }
}

fn require_list<'a>(
    data: &'a Value,
    key: &'static str,
    noun: &'static str,
    expected: usize,
) -> Result<&'a [Value], SchemaError> {
    let list = data
        .get(key)
        .and_then(Value::as_array)
        .ok_or(SchemaError::NotAList(key))?;
    if list.len() != expected {
        return Err(SchemaError::WrongCount {
            noun,
            expected,
            found: list.len(),
        });
    }
    Ok(list)
}

/// Required fields absent from `item`. A non-object item is missing all of them.
fn missing_fields<'a>(
    item: &'a Value,
    fields: &'static [&'static str],
) -> impl Iterator<Item = &'static str> + 'a {
    fields
        .iter()
        .copied()
        .filter(move |field| item.get(*field).is_none())
}

fn items_result(violations: Vec<ItemViolation>) -> Result<(), SchemaError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Items(violations))
    }
}

/// JSON truthiness for the `correct` flag.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
