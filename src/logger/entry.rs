//! The fluent per-entry builder.

use std::error::Error;
use std::fmt;

use serde_json::{Map, Value};

use crate::context::{walk, Scope};
use crate::logger::payload::{keys, Payload};
use crate::logger::{Level, Logger};
use crate::trace::{self, StackTrace, TraceOptions};

/// Metadata accumulated for the entry in progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PendingEntry {
    code: String,
    domain: String,
    hint: String,
    owner: Value,
    tags: Vec<String>,
    user: Value,
    with: Map<String, Value>,
    causes: Vec<String>,
    message: String,
    trace: Option<StackTrace>,
    trace_requested: bool,
}

impl PendingEntry {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn capture_trace(&mut self, trigger: &str, options: TraceOptions) {
        let (message, trace) = trace::capture_with_causes(trigger, &self.causes, options);
        self.message = message;
        self.trace = Some(trace);
        self.trace_requested = true;
    }

    fn into_payload(self, context: Map<String, Value>) -> Payload {
        let mut payload = Map::new();

        if !self.code.is_empty() {
            payload.insert(keys::CODE.into(), Value::String(self.code));
        }
        if !context.is_empty() {
            payload.insert(keys::CONTEXT.into(), Value::Object(context));
        }
        if !self.domain.is_empty() {
            payload.insert(keys::DOMAIN.into(), Value::String(self.domain));
        }
        if !self.hint.is_empty() {
            payload.insert(keys::HINT.into(), Value::String(self.hint));
        }
        if !self.message.is_empty() {
            payload.insert(keys::MESSAGE.into(), Value::String(self.message));
        }
        if !self.owner.is_null() {
            payload.insert(keys::OWNER.into(), self.owner);
        }
        if self.trace_requested {
            let trace = self.trace.unwrap_or_default();
            payload.insert(keys::STACKTRACE.into(), trace.to_value());
        }
        if !self.tags.is_empty() {
            let tags = self.tags.into_iter().map(Value::String).collect();
            payload.insert(keys::TAGS.into(), Value::Array(tags));
        }
        if !self.user.is_null() {
            payload.insert(keys::USER.into(), self.user);
        }
        if !self.with.is_empty() {
            payload.insert(keys::WITH.into(), Value::Object(self.with));
        }

        Payload::from_map(payload)
    }
}

macro_rules! level_methods {
    ($($level:ident => $plain:ident, $formatted:ident;)*) => {
        $(
            #[doc = concat!("Emit the entry at `", stringify!($level), "` level and reset it.")]
            pub fn $plain(&mut self, message: impl fmt::Display) {
                self.emit(Level::$level, message.to_string());
            }

            #[doc = concat!("Like [`Entry::", stringify!($plain), "`], taking `format_args!` output.")]
            pub fn $formatted(&mut self, args: fmt::Arguments<'_>) {
                self.emit(Level::$level, fmt::format(args));
            }
        )*
    };
}

/// One in-flight entry.
///
/// Decorators mutate the entry and return it for chaining; a terminal level
/// method hands the rendered payload to the logger's sink and leaves the
/// entry empty, so the same handle can be reused for the next entry.
///
/// ```ignore
/// diaglog::logger()
///     .domain("billing")
///     .code("invoice_not_found")
///     .with([("invoice_id", 42)])
///     .error("invoice lookup failed");
/// ```
#[derive(Debug)]
pub struct Entry {
    logger: Logger,
    context: Option<Scope>,
    pending: PendingEntry,
}

impl Entry {
    pub(crate) fn new(logger: Logger) -> Self {
        Self {
            logger,
            context: None,
            pending: PendingEntry::default(),
        }
    }

    /// Machine-readable error code or slug. Meant to be read by machines
    /// and carried across services, unlike the message.
    pub fn code(&mut self, code: impl Into<String>) -> &mut Self {
        self.pending.code = code.into();
        self
    }

    /// Free-text hint for faster debugging.
    pub fn hint(&mut self, hint: impl Into<String>) -> &mut Self {
        self.pending.hint = hint.into();
        self
    }

    /// Feature category or domain the entry belongs to.
    pub fn domain(&mut self, domain: impl Into<String>) -> &mut Self {
        self.pending.domain = domain.into();
        self
    }

    /// Person or team responsible for handling this entry. `Value::Null`
    /// clears it.
    pub fn owner(&mut self, owner: impl Into<Value>) -> &mut Self {
        self.pending.owner = owner.into();
        self
    }

    /// User acting or affected. `Value::Null` clears it.
    pub fn user(&mut self, user: impl Into<Value>) -> &mut Self {
        self.pending.user = user.into();
        self
    }

    /// Append tags. Duplicates are kept.
    pub fn tags<I, T>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.pending.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Merge key/value data; a key given again overwrites the earlier value.
    pub fn with<I, K, V>(&mut self, data: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in data {
            self.pending.with.insert(key.into(), value.into());
        }
        self
    }

    /// Capture a stack trace now, with an empty triggering message.
    pub fn with_trace(&mut self) -> &mut Self {
        let options = self.logger.trace_options();
        self.pending.capture_trace("", options);
        self
    }

    /// Record an error whose `source()` chain is folded into the cause list
    /// and rendered message of the next captured trace.
    pub fn cause<E>(&mut self, err: &E) -> &mut Self
    where
        E: Error + ?Sized,
    {
        let mut causes = vec![err.to_string()];
        let mut source = err.source();
        while let Some(e) = source {
            causes.push(e.to_string());
            source = e.source();
        }
        self.pending.causes = causes;
        self
    }

    /// Walk this scope instead of the ambient one. Unlike the metadata, the
    /// binding survives emission.
    pub fn context(&mut self, scope: Scope) -> &mut Self {
        self.context = Some(scope);
        self
    }

    /// Whether no metadata has been set since the last emission.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    level_methods! {
        Debug => debug, debug_fmt;
        Info => info, info_fmt;
        Warning => warning, warning_fmt;
        Error => error, error_fmt;
        Fatal => fatal, fatal_fmt;
        Panic => panic, panic_fmt;
    }

    fn emit(&mut self, level: Level, message: String) {
        // Taken before the sink runs: fatal exits and panic unwinds must not
        // leave stale metadata behind.
        let mut pending = std::mem::take(&mut self.pending);
        if !self.logger.enabled(level) {
            return;
        }

        if level.captures_trace() {
            pending.capture_trace(&message, self.logger.trace_options());
        }

        let scope = self.resolve_scope();
        let payload = pending.into_payload(walk(scope.as_carrier()));
        self.logger.sink().emit(level, &payload, &message);
    }

    fn resolve_scope(&self) -> Scope {
        self.context
            .clone()
            .or_else(Scope::current)
            .unwrap_or_else(|| self.logger.base_scope().clone())
    }
}
