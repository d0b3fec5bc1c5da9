//! The closed set of stages a [`Pipeline`](crate::Pipeline) can hold.

use serde::{Serialize, Serializer};
use serde_json::Value;

use aggro_core::{Document, Error, Operator, Result};

use crate::array::Unwind;
use crate::change::{ChangeStream, ChangeStreamSplitLargeEvent};
use crate::common::{Count, Group, Limit, Match, Project, Skip, Sort};
use crate::geo::GeoNear;
use crate::group::{Bucket, BucketAuto, Facet, SortByCount};
use crate::join::{GraphLookup, Lookup, UnionWith};
use crate::misc::{ListClusterCatalog, QuerySettings};
use crate::output::{Documents, Merge, Out, Sample};
use crate::search::{ListSearchIndexes, RankFusion, Search, SearchMeta, VectorSearch};
use crate::session::{ListLocalSessions, ListSampledQueries, ListSessions};
use crate::stats::{CollStats, CurrentOp, IndexStats, PlanCacheStats};
use crate::transform::{AddFields, Redact, ReplaceRoot, ReplaceWith, Set, Unset};
use crate::window::{Densify, Fill, SetWindowFields};

/// A hand-written stage document: exactly one key, starting with `$`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStage {
    name: String,
    arguments: Value,
}

impl RawStage {
    pub fn new(doc: Document) -> Result<Self> {
        let mut entries = doc.into_iter();
        let (name, arguments) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            (None, _) => return Err(Error::MalformedStage("stage document is empty".into())),
            (Some((first, _)), Some((second, _))) => {
                return Err(Error::MalformedStage(format!(
                    "stage document must have exactly one key, found '{first}' and '{second}'"
                )))
            }
        };
        if !name.starts_with('$') || name.len() < 2 {
            return Err(Error::MalformedStage(format!(
                "stage name must start with '$', got '{name}'"
            )));
        }
        Ok(Self { name, arguments })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &Value {
        &self.arguments
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(self.name.clone(), self.arguments.clone());
        doc
    }
}

macro_rules! stages {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// One aggregation stage.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Stage {
            $($variant($ty),)+
            Raw(RawStage),
        }

        impl Stage {
            /// Stage key including the `$`, e.g. `"$match"`.
            pub fn name(&self) -> &str {
                match self {
                    $(Stage::$variant(s) => s.name(),)+
                    Stage::Raw(s) => s.name(),
                }
            }

            pub fn to_document(&self) -> Document {
                match self {
                    $(Stage::$variant(s) => s.to_document(),)+
                    Stage::Raw(s) => s.to_document(),
                }
            }
        }

        $(
            impl From<$ty> for Stage {
                fn from(s: $ty) -> Self {
                    Stage::$variant(s)
                }
            }
        )+
    };
}

stages! {
    Match(Match),
    Project(Project),
    Group(Group),
    Sort(Sort),
    Limit(Limit),
    Skip(Skip),
    Count(Count),
    Unwind(Unwind),
    Lookup(Lookup),
    UnionWith(UnionWith),
    GraphLookup(GraphLookup),
    AddFields(AddFields),
    Set(Set),
    Unset(Unset),
    ReplaceRoot(ReplaceRoot),
    ReplaceWith(ReplaceWith),
    Redact(Redact),
    SortByCount(SortByCount),
    Facet(Facet),
    Bucket(Bucket),
    BucketAuto(BucketAuto),
    Sample(Sample),
    Out(Out),
    Merge(Merge),
    Documents(Documents),
    SetWindowFields(SetWindowFields),
    Densify(Densify),
    Fill(Fill),
    GeoNear(GeoNear),
    CollStats(CollStats),
    IndexStats(IndexStats),
    PlanCacheStats(PlanCacheStats),
    CurrentOp(CurrentOp),
    ListSessions(ListSessions),
    ListLocalSessions(ListLocalSessions),
    ListSampledQueries(ListSampledQueries),
    ChangeStream(ChangeStream),
    ChangeStreamSplitLargeEvent(ChangeStreamSplitLargeEvent),
    Search(Search),
    SearchMeta(SearchMeta),
    VectorSearch(VectorSearch),
    ListSearchIndexes(ListSearchIndexes),
    RankFusion(RankFusion),
    ListClusterCatalog(ListClusterCatalog),
    QuerySettings(QuerySettings),
}

impl Stage {
    /// Wrap a hand-written stage document.
    pub fn raw(doc: Document) -> Result<Stage> {
        Ok(Stage::Raw(RawStage::new(doc)?))
    }
}

impl From<RawStage> for Stage {
    fn from(s: RawStage) -> Self {
        Stage::Raw(s)
    }
}

impl From<&Stage> for Document {
    fn from(s: &Stage) -> Self {
        s.to_document()
    }
}

impl Serialize for Stage {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_document().serialize(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Document {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_typed_stage_renders_through_enum() {
        let s: Stage = Limit::new(5).unwrap().into();
        assert_eq!(s.name(), "$limit");
        assert_eq!(Value::Object(s.to_document()), json!({"$limit": 5}));
        assert_eq!(serde_json::to_value(&s).unwrap(), json!({"$limit": 5}));
    }

    #[test]
    fn test_raw_stage() {
        let s = Stage::raw(obj(json!({"$limit": 3}))).unwrap();
        assert_eq!(s.name(), "$limit");
        assert_eq!(Value::Object(s.to_document()), json!({"$limit": 3}));
    }

    #[test]
    fn test_raw_stage_rejects_malformed() {
        let empty = Stage::raw(Document::new());
        assert!(matches!(empty, Err(Error::MalformedStage(_))));

        let two = Stage::raw(obj(json!({"$match": {}, "$limit": 1})));
        assert!(matches!(two, Err(Error::MalformedStage(_))));

        let no_dollar = Stage::raw(obj(json!({"match": {}})));
        assert!(matches!(no_dollar, Err(Error::MalformedStage(_))));

        let bare = Stage::raw(obj(json!({"$": 1})));
        assert!(bare.is_err());
    }

    #[test]
    fn test_unit_stages_convert() {
        let s: Stage = IndexStats.into();
        assert_eq!(serde_json::to_value(&s).unwrap(), json!({"$indexStats": {}}));
        let s: Stage = ChangeStreamSplitLargeEvent.into();
        assert_eq!(s.name(), "$changeStreamSplitLargeEvent");
    }
}
