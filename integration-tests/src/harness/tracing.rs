use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, layer::Context};

/// One tracing event with its fields rendered to strings.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub target: String,
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn message(&self) -> Option<&str> {
        self.field("message")
    }
}

/// Process-wide sink every test server logs into.
#[derive(Clone)]
pub struct EventLog(Arc<Mutex<Vec<CapturedEvent>>>);

impl EventLog {
    /// The shared log. Installs the capturing subscriber on first use.
    pub fn global() -> Self {
        static LOG: OnceLock<EventLog> = OnceLock::new();

        LOG.get_or_init(|| {
            let log = EventLog(Arc::new(Mutex::new(Vec::new())));
            init_test_tracing(log.clone());
            log
        })
        .clone()
    }

    /// Poll until an event matching `pred` was recorded.
    pub fn wait_for<F>(&self, timeout: Duration, pred: F) -> Option<CapturedEvent>
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(found) = self.0.lock().unwrap().iter().find(|e| pred(e)) {
                return Some(found.clone());
            }
            if Instant::now() > deadline {
                return None;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

pub fn init_test_tracing(log: EventLog) {
    let subscriber = tracing_subscriber::registry().with(CaptureLayer { log });

    tracing::subscriber::set_global_default(subscriber)
        .expect("failed to set global tracing subscriber");
}

struct CaptureLayer {
    log: EventLog,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Vec::new();
        event.record(&mut FieldVisitor {
            fields: &mut fields,
        });

        self.log.0.lock().unwrap().push(CapturedEvent {
            target: event.metadata().target().to_string(),
            fields,
        });
    }
}

struct FieldVisitor<'a> {
    fields: &'a mut Vec<(String, String)>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields
            .push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields
            .push((field.name().to_string(), format!("{value:?}")));
    }
}
