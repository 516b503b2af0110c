use biometrics::{Collector, Counter};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("vellum.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("vellum.client.request_errors");
pub(crate) static HEALTH_CHECKS: Counter = Counter::new("vellum.client.health_checks");
pub(crate) static MODEL_LISTS: Counter = Counter::new("vellum.client.model_lists");

pub(crate) static STREAM_EVENTS: Counter = Counter::new("vellum.stream.events");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("vellum.stream.errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&HEALTH_CHECKS);
    collector.register_counter(&MODEL_LISTS);

    collector.register_counter(&STREAM_EVENTS);
    collector.register_counter(&STREAM_ERRORS);
}
