//! Push-notification adapters for approved plans.

mod pushover;

pub use pushover::PushoverNotifier;
