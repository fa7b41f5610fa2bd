//! Tiered Extractor - ordered fallback chain from raw model text to a
//! schema-valid value.
//!
//! Tiers run in a fixed order and the first value that satisfies the
//! request short-circuits the chain:
//!
//! 1. [`Tier::DirectParse`] - the whole text as JSON
//! 2. [`Tier::BracketedRegion`] - the first balanced `{…}`/`[…]` span that parses
//! 3. [`Tier::Sanitized`] - the same spans after [`sanitize`]
//! 4. [`Tier::ShapeCoercion`] - the first parsed value wrapped/unwrapped to the domain shape
//! 5. [`Tier::TextMining`] - label patterns over plain prose
//!
//! A well-formed payload of the wrong shape is never "repaired" by a later
//! parsing tier; it is carried forward to coercion as-is.

use super::miner::{DefaultTextMiner, TextMiner};
use super::sanitize::sanitize;
use super::scanner::{MAX_CANDIDATE_REGIONS, bracketed_regions};
use super::target::{ExtractionDomain, ExtractionRequest, Shape};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

/// One strategy in the extraction chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    DirectParse,
    BracketedRegion,
    Sanitized,
    ShapeCoercion,
    TextMining,
}

impl Tier {
    /// All tiers in the order they are attempted
    pub const ORDER: [Tier; 5] = [
        Tier::DirectParse,
        Tier::BracketedRegion,
        Tier::Sanitized,
        Tier::ShapeCoercion,
        Tier::TextMining,
    ];

    /// 1-based position in the chain
    pub fn index(&self) -> usize {
        *self as usize + 1
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::DirectParse => "direct_parse",
            Tier::BracketedRegion => "bracketed_region",
            Tier::Sanitized => "sanitized",
            Tier::ShapeCoercion => "shape_coercion",
            Tier::TextMining => "text_mining",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a single tier did not produce a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ExtractionFailure {
    #[error("input is empty")]
    NoInput,

    #[error("not valid JSON: {0}")]
    ParseError(String),

    #[error("no balanced bracketed region found")]
    NoBracketedRegion,

    #[error("no parsed value to coerce")]
    NothingToCoerce,

    #[error("value already has the expected shape")]
    ShapeUnchanged,

    #[error("domain {0} declares no text patterns")]
    MiningUnsupported(ExtractionDomain),

    #[error("no records could be mined from the text")]
    NothingMined,

    #[error("value does not satisfy the schema")]
    SchemaRejected,
}

/// Diagnostic record of one tier attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionAttempt {
    pub tier: Tier,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ExtractionFailure>,
}

impl ExtractionAttempt {
    fn succeeded(tier: Tier) -> Self {
        Self {
            tier,
            success: true,
            failure: None,
        }
    }

    fn failed(tier: Tier, failure: ExtractionFailure) -> Self {
        Self {
            tier,
            success: false,
            failure: Some(failure),
        }
    }
}

/// Result of running the chain: the value (if any) plus the attempt log
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutcome {
    pub value: Option<Value>,
    /// Tier that produced `value`
    pub tier: Option<Tier>,
    pub attempts: Vec<ExtractionAttempt>,
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        self.value.is_some()
    }

    pub fn into_value(self) -> Option<Value> {
        self.value
    }
}

/// Runs the ordered extraction tiers
#[derive(Debug, Clone, Default)]
pub struct TieredExtractor<M: TextMiner = DefaultTextMiner> {
    miner: M,
}

impl TieredExtractor<DefaultTextMiner> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: TextMiner> TieredExtractor<M> {
    /// Use a custom miner for the last tier
    pub fn with_miner(miner: M) -> Self {
        Self { miner }
    }

    pub fn miner(&self) -> &M {
        &self.miner
    }

    /// Run the tiers in order until one yields a value `request` accepts.
    pub fn extract(&self, raw: &str, request: &ExtractionRequest) -> ExtractionOutcome {
        let mut run = Run::default();
        let text = raw.trim();

        debug!(
            domain = %request.domain,
            bytes = text.len(),
            "extraction starting"
        );

        if text.is_empty() {
            run.fail(Tier::DirectParse, ExtractionFailure::NoInput);
            return run.finish(None);
        }

        // Tier 1
        match serde_json::from_str::<Value>(text) {
            Ok(value) => {
                if let Some(done) = run.offer(Tier::DirectParse, value, request) {
                    return done;
                }
            }
            Err(e) => run.fail(Tier::DirectParse, ExtractionFailure::ParseError(e.to_string())),
        }

        let regions: Vec<&str> = bracketed_regions(text).take(MAX_CANDIDATE_REGIONS).collect();
        trace!(count = regions.len(), "bracketed regions located");

        // Tier 2
        let found = first_accepted(&regions, request, |region| serde_json::from_str(region));
        if let Some(done) = run.settle(Tier::BracketedRegion, found, request) {
            return done;
        }

        // Tier 3
        let found = first_accepted(&regions, request, |region| {
            serde_json::from_str(&sanitize(region))
        });
        if let Some(done) = run.settle(Tier::Sanitized, found, request) {
            return done;
        }

        // Tier 4
        match run.first_parsed.take() {
            None => run.fail(Tier::ShapeCoercion, ExtractionFailure::NothingToCoerce),
            Some(value) => match coerce_shape(value, request.domain) {
                Some(coerced) => {
                    if let Some(done) = run.offer(Tier::ShapeCoercion, coerced, request) {
                        return done;
                    }
                }
                None => run.fail(Tier::ShapeCoercion, ExtractionFailure::ShapeUnchanged),
            },
        }

        // Tier 5
        if !request.domain.supports_mining() {
            run.fail(
                Tier::TextMining,
                ExtractionFailure::MiningUnsupported(request.domain),
            );
        } else {
            match self.miner.mine(text, request) {
                Some(value) => {
                    if let Some(done) = run.offer(Tier::TextMining, value, request) {
                        return done;
                    }
                }
                None => run.fail(Tier::TextMining, ExtractionFailure::NothingMined),
            }
        }

        debug!(domain = %request.domain, "all extraction tiers failed");
        run.finish(None)
    }
}

/// Run the default extractor with a plain required-field set.
///
/// Returns `None` when every tier fails; callers fall back to synthesis.
pub fn extract<I, S>(raw: &str, required_fields: I, domain: ExtractionDomain) -> Option<Value>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let request = ExtractionRequest::with_required_fields(domain, required_fields);
    TieredExtractor::new().extract(raw, &request).into_value()
}

#[derive(Default)]
struct Run {
    attempts: Vec<ExtractionAttempt>,
    /// First well-formed value from tiers 1-3, kept for coercion
    first_parsed: Option<Value>,
}

impl Run {
    fn fail(&mut self, tier: Tier, failure: ExtractionFailure) {
        trace!(%tier, %failure, "extraction tier failed");
        self.attempts.push(ExtractionAttempt::failed(tier, failure));
    }

    /// Accept `value` if the request does, otherwise remember it for coercion.
    fn offer(
        &mut self,
        tier: Tier,
        value: Value,
        request: &ExtractionRequest,
    ) -> Option<ExtractionOutcome> {
        if request.accepts(&value) {
            debug!(%tier, "extraction tier succeeded");
            self.attempts.push(ExtractionAttempt::succeeded(tier));
            let mut outcome = std::mem::take(self).finish(Some(value));
            outcome.tier = Some(tier);
            return Some(outcome);
        }
        self.fail(tier, ExtractionFailure::SchemaRejected);
        if tier < Tier::ShapeCoercion && self.first_parsed.is_none() {
            self.first_parsed = Some(value);
        }
        None
    }

    /// Record the result of a region tier; `Some` once a value is accepted.
    fn settle(
        &mut self,
        tier: Tier,
        found: Parsed,
        request: &ExtractionRequest,
    ) -> Option<ExtractionOutcome> {
        match found {
            Parsed::Accepted(value) | Parsed::Rejected(value) => self.offer(tier, value, request),
            Parsed::NoRegion => {
                self.fail(tier, ExtractionFailure::NoBracketedRegion);
                None
            }
            Parsed::Error(e) => {
                self.fail(tier, ExtractionFailure::ParseError(e));
                None
            }
        }
    }

    fn finish(self, value: Option<Value>) -> ExtractionOutcome {
        ExtractionOutcome {
            value,
            tier: None,
            attempts: self.attempts,
        }
    }
}

enum Parsed {
    /// First region the request accepts
    Accepted(Value),
    /// Regions parsed but none was accepted; holds the first one
    Rejected(Value),
    NoRegion,
    Error(String),
}

/// Parse regions in order and stop at the first one `request` accepts.
fn first_accepted<F>(regions: &[&str], request: &ExtractionRequest, parse: F) -> Parsed
where
    F: Fn(&str) -> Result<Value, serde_json::Error>,
{
    let mut first_rejected = None;
    let mut last_error = None;
    for region in regions {
        match parse(region) {
            Ok(value) if request.accepts(&value) => return Parsed::Accepted(value),
            Ok(value) => {
                if first_rejected.is_none() {
                    first_rejected = Some(value);
                }
            }
            Err(e) => last_error = Some(e.to_string()),
        }
    }
    match (first_rejected, last_error) {
        (Some(value), _) => Parsed::Rejected(value),
        (None, Some(e)) => Parsed::Error(e),
        (None, None) => Parsed::NoRegion,
    }
}

/// Wrap or unwrap `value` to match the domain's top-level shape.
///
/// Returns `None` when no coercion applies.
pub fn coerce_shape(value: Value, domain: ExtractionDomain) -> Option<Value> {
    match (domain.shape(), value) {
        (Shape::Array { envelope }, Value::Object(mut object)) => {
            if let Some(field) = envelope
                && object.get(field).is_some_and(Value::is_array)
            {
                return object.remove(field);
            }
            Some(Value::Array(vec![Value::Object(object)]))
        }
        (
            Shape::Object {
                list_field: Some(field),
            },
            Value::Array(items),
        ) => {
            let mut object = serde_json::Map::new();
            object.insert(field.to_string(), Value::Array(items));
            Some(Value::Object(object))
        }
        (Shape::Object { list_field: None }, Value::Array(mut items)) if items.len() == 1 => {
            items.pop()
        }
        _ => None,
    }
}
