//! A `DirectoryView` running as a single tokio task.
//!
//! The HTTP server has many concurrent connections but the view state must
//! only ever be touched by one logical actor, so requests are funneled through
//! an mpsc channel and handled one at a time.  Clock ticks arrive on a second
//! channel in the same loop, which is why the clock never needs a lock either.

use std::time::Duration;

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{info, info_span, trace, Instrument, Span};

use crate::{
    clock::Clock,
    error::{DirectoryError, Result},
    view::{Activation, DirectoryView, InteractionSummary, ViewSnapshot},
};

const REQUEST_QUEUE_DEPTH: usize = 64;

#[derive(Debug)]
pub enum SessionRequest {
    Select {
        category: String,
        reply: oneshot::Sender<Result<InteractionSummary>>,
    },
    HoverEnter {
        id: u32,
        reply: oneshot::Sender<Result<InteractionSummary>>,
    },
    HoverLeave {
        id: u32,
        reply: oneshot::Sender<Result<InteractionSummary>>,
    },
    Activate {
        id: u32,
        reply: oneshot::Sender<Result<Activation>>,
    },
    Snapshot {
        reply: oneshot::Sender<ViewSnapshot>,
    },
    Shutdown,
}

/// A request plus the span it was issued under.  The session handles it
/// inside that span so a caller's `LoggedSpan` sees the work it caused.
#[derive(Debug)]
struct Envelope {
    span: Span,
    request: SessionRequest,
}

/// Cheaply clonable way to talk to the session task.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    tx: mpsc::Sender<Envelope>,
}

/// Move `view` into its own task.  If `clock_period` is provided the session
/// also owns a `Clock` feeding the view; it is stopped when the session ends,
/// which happens on `shutdown` or once every handle has been dropped.
pub fn spawn_session(
    view: DirectoryView,
    clock_period: Option<Duration>,
) -> (SessionHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(REQUEST_QUEUE_DEPTH);
    let handle = tokio::spawn(
        run_session(view, rx, clock_period).instrument(info_span!("session")),
    );
    (SessionHandle { tx }, handle)
}

async fn run_session(
    mut view: DirectoryView,
    mut requests: mpsc::Receiver<Envelope>,
    clock_period: Option<Duration>,
) {
    let (tick_tx, mut ticks) = mpsc::channel(1);
    let clock = clock_period.map(|period| Clock::start(period, tick_tx));
    info!(clock = clock.is_some(), "session started");

    loop {
        tokio::select! {
            envelope = requests.recv() => match envelope {
                Some(Envelope { request: SessionRequest::Shutdown, .. }) | None => break,
                Some(Envelope { span, request }) => {
                    span.in_scope(|| handle_request(&mut view, request))
                }
            },
            Some(reading) = ticks.recv() => {
                trace!(time = %reading.time, "tick");
                view.set_clock(reading);
            }
        }
    }

    if let Some(clock) = clock {
        clock.stop();
    }
    info!("session torn down");
}

// Replies are best effort; the requester may have given up already.
fn handle_request(view: &mut DirectoryView, request: SessionRequest) {
    match request {
        SessionRequest::Select { category, reply } => {
            let _ = reply.send(view.select_category(&category));
        }
        SessionRequest::HoverEnter { id, reply } => {
            let _ = reply.send(view.hover_enter(id));
        }
        SessionRequest::HoverLeave { id, reply } => {
            let _ = reply.send(view.hover_leave(id));
        }
        SessionRequest::Activate { id, reply } => {
            let _ = reply.send(view.activate(id));
        }
        SessionRequest::Snapshot { reply } => {
            let _ = reply.send(view.snapshot());
        }
        SessionRequest::Shutdown => {}
    }
}

impl SessionHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionRequest,
    ) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        let envelope = Envelope {
            span: Span::current(),
            request: make(reply),
        };
        self.tx
            .send(envelope)
            .await
            .map_err(|_| DirectoryError::invariant("directory session is gone"))?;
        rx.await
            .map_err(|_| DirectoryError::invariant("directory session dropped the request"))
    }

    pub async fn select_category(&self, category: &str) -> Result<InteractionSummary> {
        let category = category.to_string();
        self.request(|reply| SessionRequest::Select { category, reply })
            .await?
    }

    pub async fn hover_enter(&self, id: u32) -> Result<InteractionSummary> {
        self.request(|reply| SessionRequest::HoverEnter { id, reply })
            .await?
    }

    pub async fn hover_leave(&self, id: u32) -> Result<InteractionSummary> {
        self.request(|reply| SessionRequest::HoverLeave { id, reply })
            .await?
    }

    pub async fn activate(&self, id: u32) -> Result<Activation> {
        self.request(|reply| SessionRequest::Activate { id, reply })
            .await?
    }

    pub async fn snapshot(&self) -> Result<ViewSnapshot> {
        self.request(|reply| SessionRequest::Snapshot { reply }).await
    }

    pub async fn shutdown(&self) {
        // Already gone is as good as shut down.
        let envelope = Envelope {
            span: Span::current(),
            request: SessionRequest::Shutdown,
        };
        let _ = self.tx.send(envelope).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::test_support::design_ai_design,
        clock::CLOCK_PERIOD,
        error::ErrorLayer,
        interaction::LoggingNavigator,
        view::ViewOptions,
    };

    fn view() -> DirectoryView {
        DirectoryView::new(
            design_ai_design(),
            Box::new(LoggingNavigator),
            ViewOptions::default(),
        )
    }

    #[tokio::test]
    async fn requests_are_applied_in_order() {
        let (session, _task) = spawn_session(view(), None);

        session.hover_enter(2).await.unwrap();
        session.hover_leave(1).await.unwrap();
        let summary = session.select_category("Design").await.unwrap();
        assert_eq!(summary.active_category, "Design");
        assert_eq!(summary.hovered_id, Some(2));

        let summary = session.hover_leave(2).await.unwrap();
        assert_eq!(summary.hovered_id, None);

        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.clock, None);
    }

    #[tokio::test]
    async fn bad_input_comes_back_without_killing_the_session() {
        let (session, _task) = spawn_session(view(), None);
        let err = session.select_category("Cooking").await.unwrap_err();
        assert_eq!(err.layer(), &ErrorLayer::BadInput);

        let activation = session.activate(3).await.unwrap();
        assert_eq!(activation.url, "https://example.com/3");
    }

    #[tokio::test(start_paused = true)]
    async fn clock_feeds_the_view_until_shutdown() {
        let (session, task) = spawn_session(view(), Some(CLOCK_PERIOD));

        tokio::time::sleep(CLOCK_PERIOD * 2).await;
        assert!(session.snapshot().await.unwrap().clock.is_some());

        session.shutdown().await;
        task.await.unwrap();

        let err = session.snapshot().await.unwrap_err();
        assert_eq!(err.layer(), &ErrorLayer::RuntimeInvariantViolation);
    }

    #[tokio::test]
    async fn dropping_every_handle_ends_the_session() {
        let (session, task) = spawn_session(view(), Some(CLOCK_PERIOD));
        drop(session);
        task.await.unwrap();
    }
}
