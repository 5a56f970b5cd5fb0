//! Filter expressions for selecting documents.
//!
//! This is a deliberately small subset of the host's query language, large enough for node
//! filters and edge namespace filters:
//!
//! ```text
//! [tag[project]] [[Some Title]] -[prefix[$:/]] +[!has[draft.of]]
//! ```
//!
//! An expression is a sequence of *runs*. A run without prefix adds its matches to the
//! result, `+` keeps only results that also match the run, `-` removes results matching the
//! run. A bracketed run is a chain of *steps* that must all match; `!` negates a step.
//!
//! Literal runs and title-only steps (`title`, `prefix`, `suffix`, `is[system]`) are decided
//! from the title alone, so they also match titles that were just deleted. Every other step
//! needs the document and fails for missing titles unless negated.

use regex::{Regex, RegexBuilder};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    collections::BTreeSet,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
    ops::Deref,
};

use crate::{
    error::TmapError,
    wiki::{Tiddler, Wiki, FIELD_TITLE},
};

#[derive(Debug, Clone)]
pub struct WrappedRegex(Regex);

impl WrappedRegex {
    pub fn new(pattern: &str) -> Result<WrappedRegex, TmapError> {
        Ok(WrappedRegex(RegexBuilder::new(pattern).unicode(true).build()?))
    }
}

impl Hash for WrappedRegex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_str().hash(state);
    }
}

impl PartialEq for WrappedRegex {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

impl Eq for WrappedRegex {}

impl Deref for WrappedRegex {
    type Target = Regex;
    fn deref(&self) -> &Regex {
        &self.0
    }
}

/// A single filter step, e.g. `tag[project]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    All,
    Field(String, String),
    Has(String),
    IsMissing,
    IsSystem,
    Prefix(String),
    Regexp(String, WrappedRegex),
    Suffix(String),
    Tag(String),
    Title(String),
}

impl Operator {
    fn parse(name: &str, param: &str, expr: &str) -> Result<Operator, TmapError> {
        let (op, suffix) = match name.split_once(':') {
            Some((op, suffix)) => (op, Some(suffix)),
            None => (name, None),
        };
        let param = param.to_string();
        Ok(match (op, suffix) {
            ("all", None) if param == "tiddlers" => Operator::All,
            ("title", None) => Operator::Title(param),
            ("tag", None) => Operator::Tag(param),
            ("prefix", None) => Operator::Prefix(param),
            ("suffix", None) => Operator::Suffix(param),
            ("has", None) => Operator::Has(param),
            ("field", Some(field)) if !field.is_empty() => {
                Operator::Field(field.to_string(), param)
            }
            ("regexp", field) => {
                let re = WrappedRegex::new(&param)
                    .map_err(|e| TmapError::filter_compile(expr, e))?;
                Operator::Regexp(field.unwrap_or(FIELD_TITLE).to_string(), re)
            }
            ("is", None) if param == "system" => Operator::IsSystem,
            ("is", None) if param == "missing" => Operator::IsMissing,
            _ => {
                return Err(TmapError::filter_compile(
                    expr,
                    format!("unsupported operator '{name}[{param}]'"),
                ))
            }
        })
    }

    /// Whether the step can be decided from the title alone.
    pub fn is_title_only(&self) -> bool {
        match self {
            Operator::Title(_) | Operator::Prefix(_) | Operator::Suffix(_) | Operator::IsSystem => {
                true
            }
            Operator::Regexp(field, _) => field == FIELD_TITLE,
            _ => false,
        }
    }

    fn is_match(&self, title: &str, tiddler: Option<&Tiddler>) -> bool {
        match self {
            Operator::Title(t) => title == t,
            Operator::Prefix(p) => title.starts_with(p.as_str()),
            Operator::Suffix(s) => title.ends_with(s.as_str()),
            Operator::IsSystem => crate::wiki::is_system_title(title),
            Operator::IsMissing => tiddler.is_none(),
            Operator::Regexp(field, re) if field == FIELD_TITLE => re.is_match(title),
            Operator::Regexp(field, re) => tiddler
                .and_then(|t| t.field(field))
                .is_some_and(|v| re.is_match(v)),
            Operator::All => tiddler.is_some(),
            Operator::Tag(tag) => tiddler.is_some_and(|t| t.has_tag(tag)),
            Operator::Has(field) => tiddler.is_some_and(|t| t.has_field(field)),
            Operator::Field(field, value) => tiddler
                .and_then(|t| t.field(field))
                .is_some_and(|v| v == value),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operator::All => write!(f, "all[tiddlers]"),
            Operator::Field(field, value) => write!(f, "field:{field}[{value}]"),
            Operator::Has(field) => write!(f, "has[{field}]"),
            Operator::IsMissing => write!(f, "is[missing]"),
            Operator::IsSystem => write!(f, "is[system]"),
            Operator::Prefix(p) => write!(f, "prefix[{p}]"),
            Operator::Regexp(field, re) if field == FIELD_TITLE => {
                write!(f, "regexp[{}]", re.as_str())
            }
            Operator::Regexp(field, re) => write!(f, "regexp:{field}[{}]", re.as_str()),
            Operator::Suffix(s) => write!(f, "suffix[{s}]"),
            Operator::Tag(t) => write!(f, "tag[{t}]"),
            Operator::Title(t) => write!(f, "title[{t}]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step {
    pub negated: bool,
    pub op: Operator,
}

impl Step {
    fn is_match(&self, title: &str, tiddler: Option<&Tiddler>) -> bool {
        self.op.is_match(title, tiddler) != self.negated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPrefix {
    Union,
    Intersect,
    Exclude,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RunSource {
    Literal(String),
    Steps(Vec<Step>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Run {
    pub prefix: RunPrefix,
    pub source: RunSource,
}

impl Run {
    pub fn literal<T: Into<String>>(prefix: RunPrefix, title: T) -> Run {
        Run {
            prefix,
            source: RunSource::Literal(title.into()),
        }
    }

    pub fn is_literal(&self, title: &str) -> bool {
        matches!(&self.source, RunSource::Literal(t) if t == title)
    }

    fn is_match(&self, title: &str, tiddler: Option<&Tiddler>) -> bool {
        match &self.source {
            RunSource::Literal(t) => t == title,
            RunSource::Steps(steps) => steps.iter().all(|s| s.is_match(title, tiddler)),
        }
    }
}

impl Display for Run {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.prefix {
            RunPrefix::Union => {}
            RunPrefix::Intersect => write!(f, "+")?,
            RunPrefix::Exclude => write!(f, "-")?,
        }
        match &self.source {
            RunSource::Literal(title) => write!(f, "[[{title}]]"),
            RunSource::Steps(steps) => {
                write!(f, "[")?;
                for step in steps {
                    if step.negated {
                        write!(f, "!")?;
                    }
                    write!(f, "{}", step.op)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// A compiled filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Filter {
    expr: String,
    runs: Vec<Run>,
}

impl Filter {
    pub fn compile(expr: &str) -> Result<Filter, TmapError> {
        let runs = Parser::new(expr).parse()?;
        Ok(Filter {
            expr: expr.to_string(),
            runs,
        })
    }

    pub fn from_runs(runs: Vec<Run>) -> Filter {
        let expr = runs
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        Filter { expr, runs }
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Evaluate the filter against `candidates`, keeping their order.
    pub fn apply<'a, I>(&self, wiki: &Wiki, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = BTreeSet::new();
        let candidates = candidates
            .into_iter()
            .filter(|c| seen.insert(*c))
            .map(|c| (c, wiki.get(c)))
            .collect::<Vec<_>>();

        // `in_results` mirrors the titles held in `results`.
        let mut results: Vec<(&str, Option<&Tiddler>)> = Vec::new();
        let mut in_results: BTreeSet<&str> = BTreeSet::new();
        for run in self.runs.iter() {
            match run.prefix {
                RunPrefix::Union => {
                    for (title, tiddler) in candidates.iter() {
                        if !in_results.contains(title) && run.is_match(title, *tiddler) {
                            in_results.insert(*title);
                            results.push((*title, *tiddler));
                        }
                    }
                }
                RunPrefix::Intersect | RunPrefix::Exclude => {
                    let keep = matches!(run.prefix, RunPrefix::Intersect);
                    results.retain(|(t, tiddler)| {
                        let retained = run.is_match(t, *tiddler) == keep;
                        if !retained {
                            in_results.remove(t);
                        }
                        retained
                    });
                }
            }
        }
        results.into_iter().map(|(t, _)| t.to_string()).collect()
    }

    /// Evaluate against every document in the store.
    pub fn select(&self, wiki: &Wiki) -> Vec<String> {
        self.apply(wiki, wiki.titles())
    }

    pub fn matches(&self, wiki: &Wiki, title: &str) -> bool {
        !self.apply(wiki, [title]).is_empty()
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.expr)
    }
}

struct FilterVisitor;

impl<'de> de::Visitor<'de> for FilterVisitor {
    type Value = Filter;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "A filter expression such as '[tag[project]] [[Title]]'")
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Filter::compile(s).map_err(|_e| E::invalid_value(de::Unexpected::Str(s), &self))
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Filter, D::Error> {
        deserializer.deserialize_str(FilterVisitor)
    }
}

/// Which representation of a filter a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Expression,
    Compiled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterRepr {
    Expression(String),
    Compiled(Filter),
}

impl FilterRepr {
    pub fn of(expr: &str, mode: FilterMode) -> Result<FilterRepr, TmapError> {
        Ok(match mode {
            FilterMode::Expression => FilterRepr::Expression(expr.to_string()),
            FilterMode::Compiled => FilterRepr::Compiled(Filter::compile(expr)?),
        })
    }
}

struct Parser<'a> {
    expr: &'a str,
    rest: &'a str,
}

impl<'a> Parser<'a> {
    fn new(expr: &'a str) -> Self {
        Parser { expr, rest: expr }
    }

    fn error<R: Display>(&self, reason: R) -> TmapError {
        TmapError::filter_compile(self.expr, reason)
    }

    fn parse(mut self) -> Result<Vec<Run>, TmapError> {
        let mut runs = Vec::new();
        loop {
            self.rest = self.rest.trim_start();
            if self.rest.is_empty() {
                return Ok(runs);
            }
            let prefix = if let Some(rest) = self.rest.strip_prefix('+') {
                self.rest = rest;
                RunPrefix::Intersect
            } else if let Some(rest) = self.rest.strip_prefix('-') {
                self.rest = rest;
                RunPrefix::Exclude
            } else {
                RunPrefix::Union
            };
            let source = self.parse_source()?;
            runs.push(Run { prefix, source });
        }
    }

    fn parse_source(&mut self) -> Result<RunSource, TmapError> {
        if let Some(rest) = self.rest.strip_prefix("[[") {
            let end = rest
                .find("]]")
                .ok_or_else(|| self.error("unterminated '[[' literal"))?;
            self.rest = &rest[end + 2..];
            return Ok(RunSource::Literal(rest[..end].to_string()));
        }
        if let Some(rest) = self.rest.strip_prefix('"') {
            let end = rest
                .find('"')
                .ok_or_else(|| self.error("unterminated quoted literal"))?;
            self.rest = &rest[end + 1..];
            return Ok(RunSource::Literal(rest[..end].to_string()));
        }
        if let Some(rest) = self.rest.strip_prefix('[') {
            self.rest = rest;
            return self.parse_steps().map(RunSource::Steps);
        }
        let end = self
            .rest
            .find(char::is_whitespace)
            .unwrap_or(self.rest.len());
        let word = &self.rest[..end];
        if word.is_empty() {
            return Err(self.error("run prefix without a run"));
        }
        self.rest = &self.rest[end..];
        Ok(RunSource::Literal(word.to_string()))
    }

    fn parse_steps(&mut self) -> Result<Vec<Step>, TmapError> {
        let mut steps = Vec::new();
        loop {
            if let Some(rest) = self.rest.strip_prefix(']') {
                self.rest = rest;
                if steps.is_empty() {
                    return Err(self.error("empty run"));
                }
                return Ok(steps);
            }
            let negated = if let Some(rest) = self.rest.strip_prefix('!') {
                self.rest = rest;
                true
            } else {
                false
            };
            let name_end = self
                .rest
                .find(['[', '<', '{', ']'])
                .ok_or_else(|| self.error("unterminated run"))?;
            let name = &self.rest[..name_end];
            if name.is_empty() {
                return Err(self.error("missing operator name"));
            }
            let after_name = &self.rest[name_end..];
            let Some(param_start) = after_name.strip_prefix('[') else {
                return Err(self.error(format!(
                    "operator '{name}' needs a literal '[...]' parameter"
                )));
            };
            let param_end = param_start
                .find(']')
                .ok_or_else(|| self.error("unterminated parameter"))?;
            let op = Operator::parse(name, &param_start[..param_end], self.expr)?;
            self.rest = &param_start[param_end + 1..];
            steps.push(Step { negated, op });
        }
    }
}
