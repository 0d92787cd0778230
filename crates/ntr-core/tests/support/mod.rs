//! In-memory host collaborators for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ntr_core::{MessageSink, Terminal, TerminalError, TerminalHost, TerminalId, TerminalOptions};

#[derive(Default)]
struct HostLog {
    next_id: u64,
    created: Vec<(TerminalId, TerminalOptions)>,
    sent: Vec<(TerminalId, String)>,
    shown: Vec<TerminalId>,
    disposed: Vec<TerminalId>,
    fail_create: bool,
    fail_dispose: HashSet<String>,
}

/// A terminal host that records every call.
#[derive(Clone, Default)]
pub struct RecordingHost {
    log: Arc<Mutex<HostLog>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> Vec<TerminalOptions> {
        self.log.lock().unwrap().created.iter().map(|(_, o)| o.clone()).collect()
    }

    pub fn created_ids(&self) -> Vec<TerminalId> {
        self.log.lock().unwrap().created.iter().map(|(id, _)| *id).collect()
    }

    pub fn sent(&self) -> Vec<String> {
        self.log.lock().unwrap().sent.iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn sent_to(&self, id: TerminalId) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .sent
            .iter()
            .filter(|(to, _)| *to == id)
            .map(|(_, t)| t.clone())
            .collect()
    }

    pub fn shown(&self) -> Vec<TerminalId> {
        self.log.lock().unwrap().shown.clone()
    }

    pub fn disposed(&self) -> Vec<TerminalId> {
        self.log.lock().unwrap().disposed.clone()
    }

    /// Make every following `create_terminal` fail.
    pub fn fail_create(&self) {
        self.log.lock().unwrap().fail_create = true;
    }

    /// Make `dispose` fail for terminals with this name.
    pub fn fail_dispose_named(&self, name: &str) {
        self.log.lock().unwrap().fail_dispose.insert(name.to_string());
    }
}

#[async_trait]
impl TerminalHost for RecordingHost {
    type Terminal = RecordingTerminal;

    async fn create_terminal(&self, options: TerminalOptions) -> Result<RecordingTerminal, TerminalError> {
        let mut log = self.log.lock().unwrap();
        if log.fail_create {
            return Err(TerminalError::Host("cannot create terminals".to_string()));
        }

        log.next_id += 1;
        let id = TerminalId(log.next_id);
        log.created.push((id, options.clone()));

        Ok(RecordingTerminal {
            id,
            name: options.name,
            log: Arc::clone(&self.log),
        })
    }
}

pub struct RecordingTerminal {
    id: TerminalId,
    name: String,
    log: Arc<Mutex<HostLog>>,
}

#[async_trait]
impl Terminal for RecordingTerminal {
    fn id(&self) -> TerminalId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn send_text(&self, text: &str, add_newline: bool) -> Result<(), TerminalError> {
        assert!(add_newline, "commands are sent as whole lines");
        self.log.lock().unwrap().sent.push((self.id, text.to_string()));
        Ok(())
    }

    async fn show(&self, _preserve_focus: bool) -> Result<(), TerminalError> {
        self.log.lock().unwrap().shown.push(self.id);
        Ok(())
    }

    async fn dispose(&self) -> Result<(), TerminalError> {
        let mut log = self.log.lock().unwrap();
        if log.fail_dispose.contains(&self.name) {
            return Err(TerminalError::Host(format!("{} refused to close", self.name)));
        }
        log.disposed.push(self.id);
        Ok(())
    }
}

/// Collects messages shown to the user.
#[derive(Default)]
pub struct RecordingMessages {
    pub errors: RefCell<Vec<String>>,
    pub infos: RefCell<Vec<String>>,
}

impl MessageSink for RecordingMessages {
    fn show_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }

    fn show_info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }
}
