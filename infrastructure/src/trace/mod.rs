//! Transition trace sinks.

mod jsonl_sink;

pub use jsonl_sink::JsonlTransitionSink;
