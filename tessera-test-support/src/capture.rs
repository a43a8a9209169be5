//! A `tracing` layer that captures closed spans and emitted events so tests
//! can assert on instrumentation.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    span::{Attributes, Id, Record},
};
use tracing_subscriber::{Layer, layer::Context, prelude::*, registry::LookupSpan};

/// Structured values keyed by field name, rendered to strings.
pub type Fields = HashMap<String, String>;

/// A closed span with the fields it accumulated over its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedSpan {
    /// Span name from its metadata.
    pub name: String,
    /// Fields recorded at creation or through `Span::record`.
    pub fields: Fields,
}

/// An emitted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// Event target, usually the emitting module path.
    pub target: String,
    /// Event fields, including `message`.
    pub fields: Fields,
}

impl CapturedEvent {
    /// Returns the event's `message` field, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").map(String::as_str)
    }
}

#[derive(Default)]
struct Journal {
    spans: Vec<CapturedSpan>,
    events: Vec<CapturedEvent>,
}

/// Layer recording spans in close order and events in emission order.
///
/// Clones share one journal, so a clone can be installed in a subscriber
/// while the original is kept for assertions.
///
/// # Examples
/// ```
/// use tessera_test_support::capture::CaptureLayer;
///
/// let (value, layer) = CaptureLayer::capture(|| {
///     let _span = tracing::info_span!("demo", answer = 42_u64).entered();
///     tracing::info!(flavour = "plain", "inside");
///     7
/// });
/// assert_eq!(value, 7);
/// assert_eq!(layer.span("demo").and_then(|span| span.fields.get("answer").cloned()),
///     Some("42".to_owned()));
/// assert!(layer.event("inside").is_some());
/// ```
#[derive(Clone, Default)]
pub struct CaptureLayer {
    journal: Arc<Mutex<Journal>>,
}

impl CaptureLayer {
    /// Runs `f` with a fresh capture layer installed as the thread's default
    /// subscriber and returns its output together with the layer.
    pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Self) {
        let layer = Self::default();
        let subscriber = tracing_subscriber::registry().with(layer.clone());
        let output = tracing::subscriber::with_default(subscriber, f);
        (output, layer)
    }

    /// Returns a snapshot of the closed spans.
    #[must_use]
    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.journal().spans.clone()
    }

    /// Returns a snapshot of the emitted events.
    #[must_use]
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.journal().events.clone()
    }

    /// Returns the first closed span called `name`.
    #[must_use]
    pub fn span(&self, name: &str) -> Option<CapturedSpan> {
        self.journal()
            .spans
            .iter()
            .find(|span| span.name == name)
            .cloned()
    }

    /// Returns the first event whose message is `message`.
    #[must_use]
    pub fn event(&self, message: &str) -> Option<CapturedEvent> {
        self.journal()
            .events
            .iter()
            .find(|event| event.message() == Some(message))
            .cloned()
    }

    fn journal(&self) -> MutexGuard<'_, Journal> {
        // Poisoning only means an earlier assertion panicked.
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fields of a span that is still open.
struct OpenSpan(Fields);

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = Fields::new();
        attrs.record(&mut FieldWriter(&mut fields));
        span.extensions_mut().insert(OpenSpan(fields));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        if let Some(OpenSpan(fields)) = span.extensions_mut().get_mut::<OpenSpan>() {
            values.record(&mut FieldWriter(fields));
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::new();
        event.record(&mut FieldWriter(&mut fields));
        let metadata = event.metadata();
        self.journal().events.push(CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_owned(),
            fields,
        });
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };
        let fields = span
            .extensions_mut()
            .remove::<OpenSpan>()
            .map(|OpenSpan(fields)| fields)
            .unwrap_or_default();
        self.journal().spans.push(CapturedSpan {
            name: span.name().to_owned(),
            fields,
        });
    }
}

struct FieldWriter<'a>(&'a mut Fields);

impl FieldWriter<'_> {
    fn put(&mut self, field: &Field, value: impl ToString) {
        self.0.insert(field.name().to_owned(), value.to_string());
    }
}

impl Visit for FieldWriter<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, value);
    }
}
