use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("moneymitra.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("moneymitra.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("moneymitra.client.request_duration_seconds");

pub(crate) static HEALTH_CHECKS: Counter = Counter::new("moneymitra.health.checks");
pub(crate) static HEALTH_FAILURES: Counter = Counter::new("moneymitra.health.failures");

pub(crate) static CHAT_TURNS: Counter = Counter::new("moneymitra.chat.turns");
pub(crate) static CHAT_TURN_FAILURES: Counter = Counter::new("moneymitra.chat.turn_failures");
pub(crate) static CHAT_RESPONSE_TIME: Moments =
    Moments::new("moneymitra.chat.response_time_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&HEALTH_CHECKS);
    collector.register_counter(&HEALTH_FAILURES);

    collector.register_counter(&CHAT_TURNS);
    collector.register_counter(&CHAT_TURN_FAILURES);
    collector.register_moments(&CHAT_RESPONSE_TIME);
}
