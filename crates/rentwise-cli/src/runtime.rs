// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use rentwise_app::{ChatRole, ChatUpdate, SessionId};
use rentwise_chat::Client;
use rentwise_testkit::CatalogFaker;
use rentwise_tui::InternalEvent;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use tracing::{info, warn};

const DEMO_CAR_COUNT: usize = 4;

/// Talks to the booking backend. Chat requests run on a worker thread.
pub struct HttpRuntime {
    client: Client,
    booking_id: String,
    session: Arc<Mutex<Option<SessionId>>>,
}

impl HttpRuntime {
    pub fn new(client: Client, booking_id: &str) -> Self {
        Self {
            client,
            booking_id: booking_id.to_owned(),
            session: Arc::new(Mutex::new(None)),
        }
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.lock().ok().and_then(|guard| guard.clone())
    }
}

fn lock_session(
    session: &Mutex<Option<SessionId>>,
) -> Result<MutexGuard<'_, Option<SessionId>>> {
    session
        .lock()
        .map_err(|_| anyhow!("chat session state is poisoned"))
}

/// Starts the session without holding the lock across the request. If two
/// workers race, the first stored id wins.
fn ensure_session(
    client: &Client,
    booking_id: &str,
    session: &Mutex<Option<SessionId>>,
) -> Result<SessionId> {
    if let Some(existing) = lock_session(session)?.clone() {
        return Ok(existing);
    }
    let started = client.start_session(booking_id)?;

    let mut guard = lock_session(session)?;
    if let Some(existing) = guard.as_ref() {
        return Ok(existing.clone());
    }
    info!(
        booking_id,
        session = started.session_id.as_str(),
        "chat session started"
    );
    *guard = Some(started.session_id.clone());
    Ok(started.session_id)
}

fn exchange(
    client: &Client,
    booking_id: &str,
    session: &Mutex<Option<SessionId>>,
    message: &str,
    history: &[(ChatRole, String)],
) -> Result<ChatUpdate> {
    let session_id = ensure_session(client, booking_id, session)?;
    let reply = client.send(&session_id, message, history)?;
    Ok(reply.into_update())
}

impl rentwise_tui::AppRuntime for HttpRuntime {
    fn title(&self) -> String {
        format!("booking {}", self.booking_id)
    }

    fn start_session(&mut self) -> Result<()> {
        ensure_session(&self.client, &self.booking_id, &self.session).map(|_| ())
    }

    fn send_chat(&mut self, message: &str, history: &[(ChatRole, String)]) -> Result<ChatUpdate> {
        exchange(
            &self.client,
            &self.booking_id,
            &self.session,
            message,
            history,
        )
    }

    fn spawn_chat(
        &mut self,
        request_id: u64,
        message: &str,
        history: &[(ChatRole, String)],
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        let booking_id = self.booking_id.clone();
        let session = Arc::clone(&self.session);
        let message = message.to_owned();
        let history = history.to_vec();

        thread::Builder::new()
            .name(format!("chat-{request_id}"))
            .spawn(move || {
                let outcome = exchange(&client, &booking_id, &session, &message, &history)
                    .map_err(|error| {
                        warn!(request_id, error = %format!("{error:#}"), "chat exchange failed");
                        format!("{error:#}")
                    });
                let _ = tx.send(InternalEvent::ChatFinished {
                    request_id,
                    outcome,
                });
            })
            .map_err(|error| anyhow!("spawn chat worker: {error}"))?;
        Ok(())
    }
}

/// Offline runtime backed by the seeded catalog faker.
pub struct DemoRuntime {
    faker: CatalogFaker,
}

impl DemoRuntime {
    pub fn new(seed: u64) -> Self {
        Self {
            faker: CatalogFaker::new(seed),
        }
    }
}

impl rentwise_tui::AppRuntime for DemoRuntime {
    fn title(&self) -> String {
        format!("demo (seed {})", self.faker.seed())
    }

    fn start_session(&mut self) -> Result<()> {
        Ok(())
    }

    fn send_chat(&mut self, _message: &str, _history: &[(ChatRole, String)]) -> Result<ChatUpdate> {
        Ok(ChatUpdate {
            assistant: Some(self.faker.assistant_reply()),
            catalog: self.faker.catalog(DEMO_CAR_COUNT),
        })
    }
}
