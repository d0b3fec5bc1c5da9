//! Atlas Search and vector search stages.

use serde_json::Value;

use aggro_core::document::require_document;
use aggro_core::{Document, DocumentExt, Error, Operator, Result};

use crate::validate::non_empty;

/// `$search` operators. A stage takes exactly one; combine several with
/// [`SearchOperator::Compound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOperator {
    Text,
    Compound,
    Autocomplete,
    Phrase,
    Wildcard,
    Regex,
    Near,
    Range,
    Exists,
    Equals,
    MoreLikeThis,
    QueryString,
}

impl SearchOperator {
    pub fn key(&self) -> &'static str {
        match self {
            SearchOperator::Text => "text",
            SearchOperator::Compound => "compound",
            SearchOperator::Autocomplete => "autocomplete",
            SearchOperator::Phrase => "phrase",
            SearchOperator::Wildcard => "wildcard",
            SearchOperator::Regex => "regex",
            SearchOperator::Near => "near",
            SearchOperator::Range => "range",
            SearchOperator::Exists => "exists",
            SearchOperator::Equals => "equals",
            SearchOperator::MoreLikeThis => "moreLikeThis",
            SearchOperator::QueryString => "queryString",
        }
    }
}

/// `{"$search": {index?, <operator>, highlight?, count?, returnStoredSource?}}`
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    index: Option<String>,
    operator: SearchOperator,
    spec: Document,
    highlight: Option<Document>,
    count: Option<Document>,
    return_stored_source: Option<bool>,
}

impl Search {
    pub fn new(operator: SearchOperator, spec: impl Into<Value>) -> Result<Self> {
        let what = format!("$search {}", operator.key());
        Ok(Self {
            index: None,
            operator,
            spec: require_document(spec.into(), &what)?,
            highlight: None,
            count: None,
            return_stored_source: None,
        })
    }

    /// Defaults to `"default"` on the server when unset.
    pub fn index(mut self, name: impl Into<String>) -> Result<Self> {
        self.index = Some(non_empty(name, "$search index")?);
        Ok(self)
    }

    pub fn highlight(mut self, options: impl Into<Value>) -> Result<Self> {
        self.highlight = Some(require_document(options.into(), "$search highlight")?);
        Ok(self)
    }

    pub fn count(mut self, options: impl Into<Value>) -> Result<Self> {
        self.count = Some(require_document(options.into(), "$search count")?);
        Ok(self)
    }

    pub fn return_stored_source(mut self, on: bool) -> Self {
        self.return_stored_source = Some(on);
        self
    }
}

impl Operator for Search {
    fn name(&self) -> &'static str {
        "$search"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new()
                .with_opt("index", self.index.clone())
                .with(self.operator.key(), self.spec.clone())
                .with_opt("highlight", self.highlight.clone())
                .with_opt("count", self.count.clone())
                .with_opt("returnStoredSource", self.return_stored_source),
        )
    }
}

/// `$searchMeta`: metadata (counts, facets) for a search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchMeta {
    index: Option<String>,
    count: Option<Document>,
    facet: Option<Document>,
}

impl SearchMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(mut self, name: impl Into<String>) -> Result<Self> {
        self.index = Some(non_empty(name, "$searchMeta index")?);
        Ok(self)
    }

    pub fn count(mut self, options: impl Into<Value>) -> Result<Self> {
        self.count = Some(require_document(options.into(), "$searchMeta count")?);
        Ok(self)
    }

    pub fn facet(mut self, collector: impl Into<Value>) -> Result<Self> {
        self.facet = Some(require_document(collector.into(), "$searchMeta facet")?);
        Ok(self)
    }
}

impl Operator for SearchMeta {
    fn name(&self) -> &'static str {
        "$searchMeta"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new()
                .with_opt("index", self.index.clone())
                .with_opt("count", self.count.clone())
                .with_opt("facet", self.facet.clone()),
        )
    }
}

const MAX_NUM_CANDIDATES: u32 = 10_000;

/// `$vectorSearch`: approximate nearest neighbour search.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSearch {
    index: String,
    path: String,
    query_vector: Vec<f64>,
    num_candidates: u32,
    limit: u32,
    filter: Option<Document>,
}

impl VectorSearch {
    pub fn new(
        index: impl Into<String>,
        path: impl Into<String>,
        query_vector: Vec<f64>,
        num_candidates: u32,
        limit: u32,
    ) -> Result<Self> {
        if query_vector.is_empty() {
            return Err(Error::missing("$vectorSearch queryVector"));
        }
        if limit == 0 {
            return Err(Error::invalid("$vectorSearch limit must be positive"));
        }
        if num_candidates < limit {
            return Err(Error::invalid(format!(
                "$vectorSearch numCandidates ({num_candidates}) must be at least limit ({limit})"
            )));
        }
        if num_candidates > MAX_NUM_CANDIDATES {
            return Err(Error::invalid(format!(
                "$vectorSearch numCandidates must not exceed {MAX_NUM_CANDIDATES}"
            )));
        }
        Ok(Self {
            index: non_empty(index, "$vectorSearch index")?,
            path: non_empty(path, "$vectorSearch path")?,
            query_vector,
            num_candidates,
            limit,
            filter: None,
        })
    }

    /// Pre-filter on indexed filter fields, in query syntax.
    pub fn filter(mut self, query: impl Into<Value>) -> Result<Self> {
        self.filter = Some(require_document(query.into(), "$vectorSearch filter")?);
        Ok(self)
    }
}

impl Operator for VectorSearch {
    fn name(&self) -> &'static str {
        "$vectorSearch"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new()
                .with("index", self.index.clone())
                .with("path", self.path.clone())
                .with("queryVector", self.query_vector.clone())
                .with("numCandidates", self.num_candidates)
                .with("limit", self.limit)
                .with_opt("filter", self.filter.clone()),
        )
    }
}

/// `$listSearchIndexes`: all indexes, or one by id or by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSearchIndexes {
    id: Option<String>,
    name: Option<String>,
}

impl ListSearchIndexes {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: Some(non_empty(id, "$listSearchIndexes id")?),
            name: None,
        })
    }

    pub fn by_name(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: None,
            name: Some(non_empty(name, "$listSearchIndexes name")?),
        })
    }
}

impl Operator for ListSearchIndexes {
    fn name(&self) -> &'static str {
        "$listSearchIndexes"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new()
                .with_opt("id", self.id.clone())
                .with_opt("name", self.name.clone()),
        )
    }
}

/// `$rankFusion`: reciprocal rank fusion over named input pipelines.
#[derive(Debug, Clone, PartialEq)]
pub struct RankFusion {
    pipelines: Vec<(String, Vec<Document>)>,
    weights: Option<Vec<(String, f64)>>,
    score_details: Option<bool>,
}

impl RankFusion {
    pub fn new<I, K, P>(pipelines: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<Vec<Document>>,
    {
        let mut out: Vec<(String, Vec<Document>)> = Vec::new();
        for (name, pipeline) in pipelines {
            let name = non_empty(name, "$rankFusion pipeline name")?;
            if out.iter().any(|(n, _)| *n == name) {
                return Err(Error::conflict(format!(
                    "duplicate $rankFusion pipeline: {name}"
                )));
            }
            let pipeline = pipeline.into();
            if pipeline.is_empty() {
                return Err(Error::missing(format!(
                    "$rankFusion pipeline '{name}' has no stages"
                )));
            }
            out.push((name, pipeline));
        }
        if out.is_empty() {
            return Err(Error::missing("$rankFusion needs at least one input pipeline"));
        }
        Ok(Self {
            pipelines: out,
            weights: None,
            score_details: None,
        })
    }

    /// `combination.weights`; every name must refer to an input pipeline.
    pub fn weights<I, K>(mut self, weights: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut out = Vec::new();
        for (name, w) in weights {
            let name = name.into();
            if !self.pipelines.iter().any(|(n, _)| *n == name) {
                return Err(Error::invalid(format!(
                    "weight for unknown $rankFusion pipeline: {name}"
                )));
            }
            if out.iter().any(|(n, _)| *n == name) {
                return Err(Error::conflict(format!(
                    "duplicate weight for $rankFusion pipeline: {name}"
                )));
            }
            if !(w >= 0.0) {
                return Err(Error::invalid(format!(
                    "$rankFusion weight must be non-negative, got {w}"
                )));
            }
            out.push((name, w));
        }
        self.weights = Some(out);
        Ok(self)
    }

    pub fn score_details(mut self, on: bool) -> Self {
        self.score_details = Some(on);
        self
    }
}

impl Operator for RankFusion {
    fn name(&self) -> &'static str {
        "$rankFusion"
    }

    fn arguments(&self) -> Value {
        let pipelines: Document = self
            .pipelines
            .iter()
            .map(|(n, p)| (n.clone(), Value::from(p.clone())))
            .collect();
        let combination = self.weights.as_ref().map(|ws| {
            let weights: Document = ws.iter().map(|(n, w)| (n.clone(), Value::from(*w))).collect();
            Document::new().with("weights", weights)
        });
        Value::Object(
            Document::new()
                .with("input", Document::new().with("pipelines", pipelines))
                .with_opt("combination", combination)
                .with_opt("scoreDetails", self.score_details),
        )
    }
}
