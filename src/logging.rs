use std::fmt::{self, Write};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Initialize logging
///
/// `RUST_LOG` takes precedence; otherwise `default_level`, or `debug` when
/// verbose. Messages containing any of `suppress` are dropped.
pub fn init_logging(verbose: bool, default_level: &str, suppress: &[String]) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if verbose { "debug" } else { default_level };

    tracing_subscriber::registry()
        .with(SuppressMessages::new(suppress.to_vec()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

/// Drops events whose message contains a known noise pattern
#[derive(Debug, Clone, Default)]
pub struct SuppressMessages {
    patterns: Vec<String>,
}

impl SuppressMessages {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    fn matches(&self, message: &str) -> bool {
        self.patterns.iter().any(|p| message.contains(p.as_str()))
    }
}

impl<S: Subscriber> Layer<S> for SuppressMessages {
    fn event_enabled(&self, event: &Event<'_>, _ctx: Context<'_, S>) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        !self.matches(&visitor.message)
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::prelude::*;

    /// Counts events that reach it
    struct CountingLayer(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for CountingLayer {
        fn on_event(&self, _event: &Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn count_events(patterns: Vec<String>, emit: impl FnOnce()) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry()
            .with(SuppressMessages::new(patterns))
            .with(CountingLayer(count.clone()));
        tracing::subscriber::with_default(subscriber, emit);
        count.load(Ordering::SeqCst)
    }

    #[test]
    fn matching_messages_are_dropped() {
        let patterns = vec!["Permissions policy violation: unload".to_string()];
        let seen = count_events(patterns, || {
            tracing::error!("Permissions policy violation: unload is not allowed in this document.");
            tracing::error!("Something else went wrong");
            tracing::info!(frame = 2, "Refreshing visualization");
        });
        assert_eq!(seen, 2);
    }

    #[test]
    fn formatted_messages_are_matched() {
        let seen = count_events(vec!["noisy".to_string()], || {
            tracing::warn!("{} host", "noisy");
        });
        assert_eq!(seen, 0);
    }

    #[test]
    fn no_patterns_keeps_everything() {
        let seen = count_events(Vec::new(), || {
            tracing::warn!("Permissions policy violation: unload");
        });
        assert_eq!(seen, 1);
    }
}
