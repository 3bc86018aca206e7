use std::{collections::HashMap, sync::Mutex, time::Duration};

use serde_json::{json, Map, Value};
use tokio::{
    sync::oneshot::{self, Receiver, Sender},
    task::JoinHandle,
    time::timeout,
};
use tracing::{info, info_span, Span};
use tracing_forest::{processor::from_fn, traits::*, tree::Tree, worker_task};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, Layer, Registry};
use uuid::Uuid;

struct LogGlobal {
    handle: JoinHandle<()>,
}

lazy_static! {
    static ref SPAN_MAP: Mutex<HashMap<Uuid, Sender<Tree>>> = Mutex::new(HashMap::new());
    static ref LOG_GLOBAL: Mutex<Option<LogGlobal>> = Mutex::new(None);
}

/// A root span whose whole subtree of events is captured by tracing-forest so
/// it can be handed back to the requester, e.g. rendered into a page when the
/// request carried `?debug`.
///
/// The span is never entered here; callers `instrument` the futures whose logs
/// they want.  Nothing is captured unless `init_logging()` has been called and
/// its worker is still running; `retrieve` then comes back with `None`.
pub struct LoggedSpan {
    id: Uuid,
    span: Span,
    rx: Receiver<Tree>,
}

/// Upper bound on how long `retrieve` waits for the worker to hand the tree
/// back.
const RETRIEVE_TIMEOUT: Duration = Duration::from_secs(5);

pub fn render_forest_to_value(tree: &Tree) -> Value {
    match tree {
        Tree::Span(span) => {
            json!({
                "name": span.name(),
                "nodes": span.nodes().iter().map(render_forest_to_value).collect::<Vec<Value>>(),
            })
        }
        Tree::Event(event) => {
            let mut obj = Map::new();
            if let Some(msg) = event.message() {
                obj.insert("message".to_string(), json!(msg));
            }
            for field in event.fields() {
                obj.insert(field.key().to_string(), json!(field.value()));
            }
            json!(obj)
        }
    }
}

fn lock_span_map() -> std::sync::MutexGuard<'static, HashMap<Uuid, Sender<Tree>>> {
    match SPAN_MAP.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl LoggedSpan {
    pub fn new_logged_span(name: &str) -> LoggedSpan {
        let id = Uuid::new_v4();

        let span = info_span!(parent: None, "logged_span", name, uuid = %id);
        span.in_scope(|| info!("logged_span_start"));
        let (tx, rx) = oneshot::channel();
        lock_span_map().insert(id, tx);

        LoggedSpan { id, span, rx }
    }

    /// The underlying span, for `Instrument`ing futures that should be
    /// captured too.
    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub async fn retrieve(self) -> Option<Tree> {
        self.span.in_scope(|| info!("logged_span_end"));
        drop(self.span);

        if !forest_worker_running() {
            lock_span_map().remove(&self.id);
            return None;
        }
        match timeout(RETRIEVE_TIMEOUT, self.rx).await {
            Ok(tree) => tree.ok(),
            Err(_) => {
                lock_span_map().remove(&self.id);
                None
            }
        }
    }

    pub async fn retrieve_serde_json(self) -> Value {
        match self.retrieve().await {
            Some(tree) => render_forest_to_value(&tree),
            None => Value::Null,
        }
    }
}

fn lock_log_global() -> std::sync::MutexGuard<'static, Option<LogGlobal>> {
    match LOG_GLOBAL.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Whether finished spans still reach the `SPAN_MAP` router.
pub fn forest_worker_running() -> bool {
    lock_log_global()
        .as_ref()
        .map_or(false, |global| !global.handle.is_finished())
}

/// Initialize logging.  The `LoggedSpan` machinery always sees everything at
/// `resdir=trace`; if the environment variable `RUST_LOG` is set to a
/// non-empty value we additionally print compact logs filtered by it.
///
/// Must be called from within a tokio runtime; calling it again is a no-op.
pub fn init_logging() {
    let mut global_opt = lock_log_global();
    if global_opt.is_some() {
        return;
    }

    let mut layers = Vec::new();
    // An empty RUST_LOG is treated as unset so scripts can always export it.
    if let Ok(rustlog) = std::env::var("RUST_LOG") {
        if !rustlog.is_empty() {
            if let Ok(env_filter) = EnvFilter::try_from_default_env() {
                let layer = tracing_subscriber::fmt::layer()
                    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
                    .compact()
                    .with_ansi(false)
                    .without_time()
                    .with_filter(env_filter)
                    .boxed();
                layers.push(layer);
            }
        }
    }

    let handle = tokio::spawn(
        worker_task()
            .set_global(true)
            // Spans closing after the worker is gone are dropped rather than
            // panicking the thread that closed them.
            .map_sender(|sender| sender.or_none())
            .map_receiver(|_| {
                // Route every finished root span with a UUID we're waiting on
                // back to its `LoggedSpan`.
                from_fn(|tree| {
                    if let Tree::Span(span) = &tree {
                        let id = span.uuid();
                        if let Some(tx) = lock_span_map().remove(&id) {
                            // The LoggedSpan may have been dropped unretrieved.
                            let _ = tx.send(tree);
                        }
                    }
                    Ok(())
                })
            })
            .build_with(|layer| {
                layers.push(layer.boxed());
                Registry::default()
                    .with(layers)
                    .with(EnvFilter::new("resdir=trace"))
            })
            .on(async {
                let _ = tokio::signal::ctrl_c().await;
            }),
    );

    *global_opt = Some(LogGlobal { handle });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn retrieve_returns_without_a_worker() {
        let logged_span = LoggedSpan::new_logged_span("unrouted");
        let id = logged_span.id;

        // Other tests may have started a worker in this process; either way
        // retrieve must come back instead of waiting forever.
        let retrieved = timeout(RETRIEVE_TIMEOUT * 2, logged_span.retrieve()).await;
        assert!(retrieved.is_ok());
        assert!(!lock_span_map().contains_key(&id));
    }

    #[tokio::test]
    async fn uninitialized_logging_gives_null_logs() {
        if forest_worker_running() {
            return;
        }
        let logs = LoggedSpan::new_logged_span("unrouted")
            .retrieve_serde_json()
            .await;
        assert_eq!(logs, Value::Null);
    }
}
