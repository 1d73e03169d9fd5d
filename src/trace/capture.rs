//! Stack capture and symbol resolution.

use backtrace::SymbolName;
use rustc_demangle::demangle;

use crate::trace::frame::{Frame, StackTrace, TraceOptions};

/// Frames belonging to the capture machinery itself. Only a leading run of
/// these is dropped, so frames further out are kept even if they match.
const INTERNAL_PREFIXES: &[&str] = &[
    "backtrace::",
    "<backtrace::",
    "diaglog::trace::",
    "<diaglog::trace::",
    "diaglog::logger::",
    "<diaglog::logger::",
];

/// Capture the current stack, using `trigger` as the triggering message.
///
/// Returns the rendered message and the structured trace. Never fails: when
/// backtraces are unsupported on the platform the trace has no frames.
pub fn capture(trigger: &str, options: TraceOptions) -> (String, StackTrace) {
    capture_with_causes(trigger, &[], options)
}

/// Like [`capture`], with an additional cause chain (most recent first) that
/// follows the trigger.
pub fn capture_with_causes(
    trigger: &str,
    causes: &[String],
    options: TraceOptions,
) -> (String, StackTrace) {
    let frames = if options.with_trace {
        capture_frames(trigger)
    } else {
        Vec::new()
    };
    assemble(trigger, causes, frames, options)
}

/// Order causes and frames and render the message.
pub(crate) fn assemble(
    trigger: &str,
    causes: &[String],
    mut frames: Vec<Frame>,
    options: TraceOptions,
) -> (String, StackTrace) {
    let mut chain: Vec<String> = Vec::with_capacity(causes.len() + 1);
    if !trigger.is_empty() {
        chain.push(trigger.to_string());
    }
    chain.extend(causes.iter().filter(|c| !c.is_empty()).cloned());

    if options.invert_output {
        chain.reverse();
    }
    if options.invert_trace {
        frames.reverse();
    }

    let message = chain.join(": ");
    (message, StackTrace { causes: chain, frames })
}

fn capture_frames(trigger: &str) -> Vec<Frame> {
    let mut frames = Vec::new();
    backtrace::trace(|raw| {
        backtrace::resolve_frame(raw, |symbol| {
            let Some(name) = symbol.name() else {
                return;
            };
            let mut frame = Frame::new(symbol_name(&name));
            frame.file = symbol.filename().map(|path| path.display().to_string());
            frame.line = symbol.lineno();
            frames.push(frame);
        });
        true
    });

    let internal = frames
        .iter()
        .take_while(|f| is_internal_frame(&f.function))
        .count();
    frames.drain(..internal);

    if let Some(site) = frames.first_mut() {
        site.message = trigger.to_string();
    }
    frames
}

/// Demangled path without the hash suffix or crate disambiguators.
fn symbol_name(name: &SymbolName<'_>) -> String {
    match name.as_str() {
        Some(raw) => demangled(raw),
        None => format!("{:#}", name),
    }
}

fn demangled(raw: &str) -> String {
    format!("{:#}", demangle(raw))
}

fn is_internal_frame(function: &str) -> bool {
    if function.contains("::tests::") {
        return false;
    }
    INTERNAL_PREFIXES
        .iter()
        .any(|prefix| function.starts_with(prefix))
}
