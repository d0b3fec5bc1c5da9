//! Ordered stage list.
//!
//! A `Pipeline` owns its stages; iterating or rendering never consumes it.

use std::ops::Index;

use serde::{Serialize, Serializer};

use aggro_core::hash::hash_serde;
use aggro_core::trace::emit_event;
use aggro_core::{Document, Error, Hash256, Result, SortSpec};

use crate::stage::{RawStage, Stage};

/// Stages that only run as the first stage of a pipeline.
const FIRST_ONLY: &[&str] = &[
    "$changeStream",
    "$documents",
    "$geoNear",
    "$collStats",
    "$indexStats",
    "$currentOp",
    "$listSessions",
    "$listLocalSessions",
    "$listSampledQueries",
    "$listSearchIndexes",
    "$planCacheStats",
    "$search",
    "$searchMeta",
    "$vectorSearch",
    "$querySettings",
    "$listClusterCatalog",
    "$rankFusion",
];

/// Stages that only run as the last stage of a pipeline.
const LAST_ONLY: &[&str] = &["$out", "$merge", "$changeStreamSplitLargeEvent"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stages<I, S>(stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Stage>,
    {
        Self {
            stages: stages.into_iter().map(Into::into).collect(),
        }
    }

    /// Builder-style append for expressions that need an owned pipeline.
    pub fn with_stage(mut self, stage: impl Into<Stage>) -> Self {
        self.add_stage(stage);
        self
    }

    pub fn add_stage(&mut self, stage: impl Into<Stage>) -> &mut Self {
        let stage = stage.into();
        emit_event(
            "pipeline.add_stage",
            &[
                ("stage", stage.name().to_string()),
                ("position", self.stages.len().to_string()),
            ],
        );
        self.stages.push(stage);
        self
    }

    pub fn extend<I, S>(&mut self, stages: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Stage>,
    {
        for stage in stages {
            self.add_stage(stage);
        }
        self
    }

    /// Append hand-written stage documents. Nothing is appended unless
    /// every document is a well-formed stage.
    pub fn extend_raw<I>(&mut self, docs: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Document>,
    {
        let parsed = docs
            .into_iter()
            .enumerate()
            .map(|(i, doc)| {
                RawStage::new(doc).map_err(|e| Error::MalformedStage(format!("stage {i}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.extend(parsed))
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Like [`Pipeline::get`]; `-1` is the last stage.
    pub fn get_signed(&self, index: isize) -> Option<&Stage> {
        let resolved = if index < 0 {
            self.stages.len().checked_sub(index.unsigned_abs())?
        } else {
            index as usize
        };
        self.stages.get(resolved)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stage> {
        self.stages.iter()
    }

    /// Rendered stage documents, in order.
    pub fn documents(&self) -> impl Iterator<Item = Document> + '_ {
        self.stages.iter().map(Stage::to_document)
    }

    /// A fresh `Vec` each call; the pipeline is unchanged.
    pub fn to_list(&self) -> Vec<Document> {
        self.documents().collect()
    }

    /// The stage list paired with a sort for callers that sort outside the
    /// pipeline (e.g. a find cursor).
    pub fn with_sort(&self, sort: SortSpec) -> (Vec<Document>, SortSpec) {
        (self.to_list(), sort)
    }

    /// Check that position-restricted stages sit where MongoDB requires.
    pub fn validate(&self) -> Result<()> {
        let last = self.stages.len().saturating_sub(1);
        for (i, stage) in self.stages.iter().enumerate() {
            let name = stage.name();
            if i != 0 && FIRST_ONLY.contains(&name) {
                return Err(Error::Placement(format!(
                    "{name} must be the first stage, found at position {i}"
                )));
            }
            if i != last && LAST_ONLY.contains(&name) {
                return Err(Error::Placement(format!(
                    "{name} must be the last stage, found at position {i} of {}",
                    self.stages.len()
                )));
            }
        }
        emit_event("pipeline.validate", &[("stages", self.stages.len().to_string())]);
        Ok(())
    }

    /// blake3 over the compact JSON rendering. Equal pipelines hash equal;
    /// key order inside stages matters.
    pub fn fingerprint(&self) -> Result<Hash256> {
        hash_serde(self)
    }

    /// Stage documents in the driver's BSON representation.
    #[cfg(feature = "bson")]
    pub fn to_bson(&self) -> Result<Vec<bson::Document>> {
        self.documents()
            .map(|doc| bson::to_document(&doc).map_err(|e| Error::Serde(e.to_string())))
            .collect()
    }
}

impl Index<usize> for Pipeline {
    type Output = Stage;

    fn index(&self, index: usize) -> &Stage {
        &self.stages[index]
    }
}

impl<'a> IntoIterator for &'a Pipeline {
    type Item = &'a Stage;
    type IntoIter = std::slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}

impl IntoIterator for Pipeline {
    type Item = Stage;
    type IntoIter = std::vec::IntoIter<Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.into_iter()
    }
}

impl FromIterator<Stage> for Pipeline {
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Self {
        Self {
            stages: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Pipeline {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_seq(self.stages.iter())
    }
}

impl From<Pipeline> for Vec<Document> {
    fn from(p: Pipeline) -> Self {
        p.to_list()
    }
}

impl From<&Pipeline> for Vec<Document> {
    fn from(p: &Pipeline) -> Self {
        p.to_list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Limit, Match, Skip, Sort};
    use crate::output::{Documents, Out};
    use aggro_core::DESCENDING;
    use serde_json::{json, Value};

    fn sample() -> Pipeline {
        let mut p = Pipeline::new();
        p.add_stage(Match::new(json!({"status": "active"})).unwrap())
            .add_stage(Skip::new(10).unwrap())
            .add_stage(Limit::new(5).unwrap());
        p
    }

    fn obj(v: Value) -> Document {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_order_is_preserved() {
        let p = sample();
        assert_eq!(p.len(), 3);
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!([{"$match": {"status": "active"}}, {"$skip": 10}, {"$limit": 5}])
        );
    }

    #[test]
    fn test_iteration_is_repeatable() {
        let p = sample();
        let first: Vec<&str> = p.iter().map(Stage::name).collect();
        let second: Vec<&str> = (&p).into_iter().map(Stage::name).collect();
        assert_eq!(first, vec!["$match", "$skip", "$limit"]);
        assert_eq!(first, second);
        assert_eq!(p.documents().count(), 3);
        assert_eq!(p.documents().count(), 3);
    }

    #[test]
    fn test_to_list_returns_fresh_vec() {
        let p = sample();
        let mut a = p.to_list();
        a.clear();
        assert_eq!(p.to_list().len(), 3);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_indexing() {
        let p = sample();
        assert_eq!(p[0].name(), "$match");
        assert_eq!(p.get(2).map(Stage::name), Some("$limit"));
        assert!(p.get(3).is_none());
        assert_eq!(p.get_signed(-1).map(Stage::name), Some("$limit"));
        assert_eq!(p.get_signed(-3).map(Stage::name), Some("$match"));
        assert!(p.get_signed(-4).is_none());
        assert_eq!(p.get_signed(1).map(Stage::name), Some("$skip"));
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range_panics() {
        let p = sample();
        let _ = &p[3];
    }

    #[test]
    fn test_extend_raw_is_atomic() {
        let mut p = sample();
        let bad = vec![obj(json!({"$limit": 1})), obj(json!({"limit": 1}))];
        let err = p.extend_raw(bad).unwrap_err();
        assert!(matches!(err, Error::MalformedStage(_)));
        assert!(err.to_string().contains("stage 1"));
        assert_eq!(p.len(), 3);

        p.extend_raw(vec![obj(json!({"$count": "n"}))]).unwrap();
        assert_eq!(p.len(), 4);
        assert_eq!(Value::Object(p[3].to_document()), json!({"$count": "n"}));
    }

    #[test]
    fn test_with_sort() {
        let p = Pipeline::new().with_stage(Limit::new(1).unwrap());
        let sort = SortSpec::new().field("score", DESCENDING);
        let (stages, s) = p.with_sort(sort.clone());
        assert_eq!(stages.len(), 1);
        assert_eq!(s, sort);
    }

    #[test]
    fn test_validate_placement() {
        assert!(sample().validate().is_ok());
        assert!(Pipeline::new().validate().is_ok());

        let mut p = sample();
        p.add_stage(Out::new("archive").unwrap());
        assert!(p.validate().is_ok());
        p.add_stage(Limit::new(1).unwrap());
        assert!(matches!(p.validate(), Err(Error::Placement(_))));

        let mut p = sample();
        p.add_stage(Documents::new([json!({"a": 1})]).unwrap());
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("$documents must be the first stage"));

        let mut raw = Pipeline::new();
        raw.extend_raw(vec![obj(json!({"$limit": 1})), obj(json!({"$search": {}}))])
            .unwrap();
        assert!(raw.validate().is_err());
    }

    #[test]
    fn test_fingerprint() {
        let a = sample().fingerprint().unwrap();
        let b = sample().fingerprint().unwrap();
        assert_eq!(a, b);
        let c = sample()
            .with_stage(Sort::new(SortSpec::new().asc("a")).unwrap())
            .fingerprint()
            .unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_from_stages_and_collect() {
        let p = Pipeline::from_stages([Limit::new(1).unwrap(), Limit::new(2).unwrap()]);
        let q: Pipeline = p.clone().into_iter().collect();
        assert_eq!(p, q);
        let docs: Vec<Document> = (&p).into();
        assert_eq!(docs.len(), 2);
    }
}
