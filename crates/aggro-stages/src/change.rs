//! Change stream stages.

use serde_json::{json, Value};

use aggro_core::document::require_document;
use aggro_core::{Document, DocumentExt, Error, Operator, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullDocument {
    Default,
    Required,
    UpdateLookup,
    WhenAvailable,
}

impl FullDocument {
    pub fn as_str(&self) -> &'static str {
        match self {
            FullDocument::Default => "default",
            FullDocument::Required => "required",
            FullDocument::UpdateLookup => "updateLookup",
            FullDocument::WhenAvailable => "whenAvailable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullDocumentBeforeChange {
    Off,
    WhenAvailable,
    Required,
}

impl FullDocumentBeforeChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            FullDocumentBeforeChange::Off => "off",
            FullDocumentBeforeChange::WhenAvailable => "whenAvailable",
            FullDocumentBeforeChange::Required => "required",
        }
    }
}

/// Where a change stream starts. Only one starting point can be given.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeFrom {
    /// `resumeAfter`: a resume token.
    After(Document),
    /// `startAfter`: a resume token, also valid after an invalidate event.
    StartAfter(Document),
    /// `startAtOperationTime`: a timestamp.
    OperationTime(Value),
}

impl ResumeFrom {
    pub fn after(token: impl Into<Value>) -> Result<Self> {
        Ok(ResumeFrom::After(require_document(token.into(), "resumeAfter token")?))
    }

    pub fn start_after(token: impl Into<Value>) -> Result<Self> {
        Ok(ResumeFrom::StartAfter(require_document(
            token.into(),
            "startAfter token",
        )?))
    }

    pub fn operation_time(ts: impl Into<Value>) -> Result<Self> {
        let ts = ts.into();
        if ts.is_null() {
            return Err(Error::missing("startAtOperationTime"));
        }
        Ok(ResumeFrom::OperationTime(ts))
    }

    fn entry(&self) -> (&'static str, Value) {
        match self {
            ResumeFrom::After(t) => ("resumeAfter", Value::Object(t.clone())),
            ResumeFrom::StartAfter(t) => ("startAfter", Value::Object(t.clone())),
            ResumeFrom::OperationTime(ts) => ("startAtOperationTime", ts.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeStream {
    full_document: Option<FullDocument>,
    full_document_before_change: Option<FullDocumentBeforeChange>,
    resume: Option<ResumeFrom>,
    all_changes_for_cluster: Option<bool>,
    show_expanded_events: Option<bool>,
}

impl ChangeStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full_document(mut self, mode: FullDocument) -> Self {
        self.full_document = Some(mode);
        self
    }

    pub fn full_document_before_change(mut self, mode: FullDocumentBeforeChange) -> Self {
        self.full_document_before_change = Some(mode);
        self
    }

    pub fn resume(mut self, from: ResumeFrom) -> Self {
        self.resume = Some(from);
        self
    }

    /// Watch every database; only valid on the `admin` database.
    pub fn all_changes_for_cluster(mut self, on: bool) -> Self {
        self.all_changes_for_cluster = Some(on);
        self
    }

    pub fn show_expanded_events(mut self, on: bool) -> Self {
        self.show_expanded_events = Some(on);
        self
    }
}

impl Operator for ChangeStream {
    fn name(&self) -> &'static str {
        "$changeStream"
    }

    fn arguments(&self) -> Value {
        let mut doc = Document::new()
            .with_opt("fullDocument", self.full_document.map(|m| m.as_str()))
            .with_opt(
                "fullDocumentBeforeChange",
                self.full_document_before_change.map(|m| m.as_str()),
            );
        if let Some(resume) = &self.resume {
            let (key, value) = resume.entry();
            doc.insert(key.to_string(), value);
        }
        Value::Object(
            doc.with_opt("allChangesForCluster", self.all_changes_for_cluster)
                .with_opt("showExpandedEvents", self.show_expanded_events),
        )
    }
}

/// Split change events larger than 16MB into fragments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeStreamSplitLargeEvent;

impl Operator for ChangeStreamSplitLargeEvent {
    fn name(&self) -> &'static str {
        "$changeStreamSplitLargeEvent"
    }

    fn arguments(&self) -> Value {
        json!({})
    }
}
