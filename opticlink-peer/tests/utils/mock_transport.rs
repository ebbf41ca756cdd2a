use anyhow::{Result, bail};
use async_trait::async_trait;
use opticlink_core::{IceCandidate, PeerRole, SessionDescription};
use opticlink_peer::{MediaTransport, TransportEvent, TransportFactory, TransportStats};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, mpsc};

/// Remote descriptions containing this marker are refused.
pub const MALFORMED_SDP: &str = "malformed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    CreateOffer,
    CreateAnswer,
    SetRemoteDescription(SessionDescription),
    AddIceCandidate(IceCandidate),
    Close,
}

/// Scripted transport that records what the orchestrator asked of it.
pub struct MockTransport {
    pub role: PeerRole,
    pub generation: u64,
    calls: Mutex<Vec<TransportCall>>,
    stats: Mutex<TransportStats>,
    fail_offer: bool,
    fail_answer: bool,
}

impl MockTransport {
    pub async fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().await.clone()
    }

    pub async fn applied_candidates(&self) -> Vec<String> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|c| match c {
                TransportCall::AddIceCandidate(candidate) => Some(candidate.candidate.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn is_closed(&self) -> bool {
        self.calls.lock().await.contains(&TransportCall::Close)
    }

    pub async fn set_stats(&self, stats: TransportStats) {
        *self.stats.lock().await = stats;
    }

    async fn record(&self, call: TransportCall) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl MediaTransport for MockTransport {
    async fn create_offer(&self) -> Result<String> {
        self.record(TransportCall::CreateOffer).await;
        if self.fail_offer {
            bail!("offer generation failed");
        }
        Ok(format!("offer-{}", self.generation))
    }

    async fn create_answer(&self) -> Result<String> {
        self.record(TransportCall::CreateAnswer).await;
        if self.fail_answer {
            bail!("answer generation failed");
        }
        Ok(format!("answer-{}", self.generation))
    }

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()> {
        let malformed = description.sdp.contains(MALFORMED_SDP);
        self.record(TransportCall::SetRemoteDescription(description))
            .await;
        if malformed {
            bail!("unparseable session description");
        }
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.record(TransportCall::AddIceCandidate(candidate)).await;
        Ok(())
    }

    async fn stats(&self) -> Result<TransportStats> {
        Ok(*self.stats.lock().await)
    }

    async fn close(&self) -> Result<()> {
        self.record(TransportCall::Close).await;
        Ok(())
    }
}

struct Created {
    transport: Arc<MockTransport>,
    events: mpsc::Sender<TransportEvent>,
}

/// Hands out [`MockTransport`]s and keeps them reachable from the test.
#[derive(Clone, Default)]
pub struct MockTransportFactory {
    created: Arc<Mutex<Vec<Created>>>,
    fail_create: Arc<AtomicBool>,
    fail_offer: Arc<AtomicBool>,
    fail_answer: Arc<AtomicBool>,
}

impl MockTransportFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn fail_offer(&self, fail: bool) {
        self.fail_offer.store(fail, Ordering::SeqCst);
    }

    pub fn fail_answer(&self, fail: bool) {
        self.fail_answer.store(fail, Ordering::SeqCst);
    }

    pub async fn created_count(&self) -> usize {
        self.created.lock().await.len()
    }

    pub async fn transport(&self, generation: u64) -> Option<Arc<MockTransport>> {
        self.created
            .lock()
            .await
            .iter()
            .find(|c| c.transport.generation == generation)
            .map(|c| Arc::clone(&c.transport))
    }

    pub async fn latest(&self) -> Option<Arc<MockTransport>> {
        self.created
            .lock()
            .await
            .last()
            .map(|c| Arc::clone(&c.transport))
    }

    /// Injects `event` as if the transport it names had raised it.
    pub async fn emit(&self, event: TransportEvent) {
        let events = self
            .created
            .lock()
            .await
            .iter()
            .find(|c| c.transport.generation == event.generation())
            .map(|c| c.events.clone());

        if let Some(events) = events {
            let _ = events.send(event).await;
        }
    }
}

#[async_trait]
impl TransportFactory for MockTransportFactory {
    async fn create(
        &self,
        role: PeerRole,
        generation: u64,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn MediaTransport>> {
        if self.fail_create.load(Ordering::SeqCst) {
            bail!("no media engine available");
        }

        let transport = Arc::new(MockTransport {
            role,
            generation,
            calls: Mutex::new(Vec::new()),
            stats: Mutex::new(TransportStats::default()),
            fail_offer: self.fail_offer.load(Ordering::SeqCst),
            fail_answer: self.fail_answer.load(Ordering::SeqCst),
        });

        self.created.lock().await.push(Created {
            transport: Arc::clone(&transport),
            events,
        });
        Ok(transport)
    }
}
