//! In-memory fakes for the coordinator's ports, shared across service tests.

use crate::application::ports::{
    ConfirmationGate, Notifier, QueuePersistence, RemoteError, RemoteResumeService,
};
use crate::domain::entities::{QueuedOperation, Resume};
use crate::domain::value_objects::{OperationId, ResumeId, ResumePayload};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

pub(crate) fn payload(value: Value) -> ResumePayload {
    ResumePayload::new(value).unwrap()
}

pub(crate) fn resume(id: &str, title: &str, version: u32) -> Resume {
    let now = Utc::now();
    Resume {
        id: ResumeId::confirmed(id).unwrap(),
        title: title.to_string(),
        status: "draft".to_string(),
        version,
        is_optimistic: false,
        fields: serde_json::Map::new(),
        created_at: now,
        updated_at: now,
    }
}

#[derive(Debug, Clone)]
pub(crate) enum RemoteCall {
    Create(ResumePayload),
    Update(ResumeId, ResumePayload),
    Delete(ResumeId),
    Duplicate(ResumeId, Option<String>),
}

/// Remote fake that records every call, can be told to fail specific calls,
/// and can hold calls at a gate so tests observe in-flight state.
pub(crate) struct RecordingRemote {
    calls: Mutex<Vec<RemoteCall>>,
    failures: Mutex<HashMap<String, Vec<RemoteError>>>,
    next_id: AtomicU64,
    gated: AtomicBool,
    gate: Semaphore,
}

impl RecordingRemote {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            gated: AtomicBool::new(false),
            gate: Semaphore::new(0),
        }
    }

    /// Fail the next call matching `key` ("create", "update:{id}",
    /// "delete:{id}", "duplicate:{id}") with `err`.
    pub fn fail_next(&self, key: &str, err: RemoteError) {
        self.failures
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push(err);
    }

    /// Make every subsequent call wait for a `release_one` permit.
    pub fn gate_calls(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    pub fn release_one(&self) {
        self.gate.add_permits(1);
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn take_failure(&self, key: &str) -> Option<RemoteError> {
        let mut failures = self.failures.lock().unwrap();
        let queued = failures.get_mut(key)?;
        if queued.is_empty() {
            return None;
        }
        Some(queued.remove(0))
    }

    async fn pass_gate(&self) {
        if self.gated.load(Ordering::SeqCst) {
            let permit = self.gate.acquire().await.expect("gate semaphore closed");
            permit.forget();
        }
    }

    fn fresh_id(&self) -> ResumeId {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        ResumeId::confirmed(format!("srv-{n}")).unwrap()
    }

    fn entity(&self, id: ResumeId, payload: &ResumePayload, version: u32) -> Resume {
        let now = Utc::now();
        Resume {
            id,
            title: payload.title().unwrap_or("Untitled resume").to_string(),
            status: "draft".to_string(),
            version,
            is_optimistic: false,
            fields: payload.as_object().clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl RemoteResumeService for RecordingRemote {
    async fn create(&self, payload: ResumePayload) -> Result<Resume, RemoteError> {
        self.record(RemoteCall::Create(payload.clone()));
        self.pass_gate().await;
        if let Some(err) = self.take_failure("create") {
            return Err(err);
        }
        Ok(self.entity(self.fresh_id(), &payload, 1))
    }

    async fn update(&self, id: &ResumeId, payload: ResumePayload) -> Result<Resume, RemoteError> {
        self.record(RemoteCall::Update(id.clone(), payload.clone()));
        self.pass_gate().await;
        if let Some(err) = self.take_failure(&format!("update:{id}")) {
            return Err(err);
        }
        Ok(self.entity(id.clone(), &payload, 2))
    }

    async fn delete(&self, id: &ResumeId) -> Result<(), RemoteError> {
        self.record(RemoteCall::Delete(id.clone()));
        self.pass_gate().await;
        if let Some(err) = self.take_failure(&format!("delete:{id}")) {
            return Err(err);
        }
        Ok(())
    }

    async fn duplicate(
        &self,
        id: &ResumeId,
        new_title: Option<String>,
    ) -> Result<Resume, RemoteError> {
        self.record(RemoteCall::Duplicate(id.clone(), new_title.clone()));
        self.pass_gate().await;
        if let Some(err) = self.take_failure(&format!("duplicate:{id}")) {
            return Err(err);
        }
        let mut map = serde_json::Map::new();
        if let Some(title) = new_title {
            map.insert("title".to_string(), Value::String(title));
        }
        Ok(self.entity(self.fresh_id(), &ResumePayload::from_map(map), 1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NoteKind {
    Loading,
    Success,
    SuccessUndoable,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub(crate) struct Note {
    pub kind: NoteKind,
    pub message: String,
    pub key: Option<OperationId>,
}

#[derive(Default)]
pub(crate) struct MemoryNotifier {
    notes: Mutex<Vec<Note>>,
}

impl MemoryNotifier {
    pub fn notes(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }

    pub fn count(&self, kind: NoteKind) -> usize {
        self.notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }

    fn push(&self, kind: NoteKind, message: &str, key: Option<&OperationId>) {
        self.notes.lock().unwrap().push(Note {
            kind,
            message: message.to_string(),
            key: key.cloned(),
        });
    }
}

impl Notifier for MemoryNotifier {
    fn loading(&self, message: &str, key: &OperationId) {
        self.push(NoteKind::Loading, message, Some(key));
    }

    fn success(&self, message: &str, key: &OperationId) {
        self.push(NoteKind::Success, message, Some(key));
    }

    fn error(&self, message: &str, key: &OperationId) {
        self.push(NoteKind::Error, message, Some(key));
    }

    fn info(&self, message: &str) {
        self.push(NoteKind::Info, message, None);
    }

    fn success_undoable(&self, message: &str, key: &OperationId) {
        self.push(NoteKind::SuccessUndoable, message, Some(key));
    }
}

#[derive(Default)]
pub(crate) struct MemoryQueueStore {
    entries: Mutex<Vec<QueuedOperation>>,
}

#[async_trait]
impl QueuePersistence for MemoryQueueStore {
    async fn read_queue(&self) -> Result<Vec<QueuedOperation>, AppError> {
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn write_queue(&self, entries: &[QueuedOperation]) -> Result<(), AppError> {
        *self.entries.lock().unwrap() = entries.to_vec();
        Ok(())
    }
}

pub(crate) struct StubGate {
    allow: bool,
    pub asked: AtomicUsize,
}

impl StubGate {
    pub fn allowing() -> Self {
        Self {
            allow: true,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn declining() -> Self {
        Self {
            allow: false,
            asked: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ConfirmationGate for StubGate {
    async fn confirm_delete(&self, _id: &ResumeId) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.allow
    }
}
