//! Forward selected `tracing` spans into Micromegas named scopes.
//!
//! With the `trace` feature, Bevy opens a `tracing` span for each schedule
//! run and each system. [`MicromegasBridgeLayer`] watches for spans with
//! chosen metadata names, reads their `name` field, and mirrors their
//! enter/exit as Micromegas scope events so they land on the same timeline
//! as `span_scope!` and `#[span_fn]`.

use micromegas_tracing::dispatch::{on_begin_named_scope, on_end_named_scope};
use micromegas_tracing::intern_string::intern_string;
use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

micromegas_tracing::static_span_location!(BRIDGE_LOCATION);

/// Bevy's span name for a whole schedule run.
pub const SCHEDULE_SPANS: &[&str] = &["schedule"];
/// Schedule runs plus individual systems. Noisy, but shows which system of
/// a hunt tick dominates.
pub const SCHEDULE_AND_SYSTEM_SPANS: &[&str] = &["schedule", "system"];

/// Interned label stored in a bridged span's extensions.
struct BridgedSpan {
    label: &'static str,
}

#[derive(Default)]
struct NameVisitor {
    name: Option<String>,
}

impl Visit for NameVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "name" {
            self.name = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "name" && self.name.is_none() {
            self.name = Some(format!("{:?}", value));
        }
    }
}

/// A `tracing_subscriber::Layer` bridging chosen spans into Micromegas.
pub struct MicromegasBridgeLayer {
    span_names: &'static [&'static str],
}

impl Default for MicromegasBridgeLayer {
    fn default() -> Self {
        Self::new(SCHEDULE_SPANS)
    }
}

impl MicromegasBridgeLayer {
    pub fn new(span_names: &'static [&'static str]) -> Self {
        Self { span_names }
    }

    pub fn bridges(&self, span_name: &str) -> bool {
        self.span_names.contains(&span_name)
    }
}

impl<S> Layer<S> for MicromegasBridgeLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let kind = attrs.metadata().name();
        if !self.bridges(kind) {
            return;
        }

        let mut visitor = NameVisitor::default();
        attrs.record(&mut visitor);
        let label = intern_string(visitor.name.as_deref().unwrap_or(kind));

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(BridgedSpan { label });
        }
    }

    fn on_enter(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let extensions = span.extensions();
            if let Some(data) = extensions.get::<BridgedSpan>() {
                on_begin_named_scope(&BRIDGE_LOCATION, data.label);
            }
        }
    }

    fn on_exit(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let extensions = span.extensions();
            if let Some(data) = extensions.get::<BridgedSpan>() {
                on_end_named_scope(&BRIDGE_LOCATION, data.label);
            }
        }
    }
}
