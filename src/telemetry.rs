use prometheus::{register_counter, register_counter_vec, Counter, CounterVec};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUIZZES_CNTR: Counter =
        register_counter!("quizzes_created_total", "Number of created quizzes")
            .expect("quizzes_created_total is registered once");
    pub static ref ANSWERS_CNTR: CounterVec = register_counter_vec!(
        "answers_submitted_total",
        "Number of submitted answers",
        &["outcome"]
    )
    .expect("answers_submitted_total is registered once");
}

pub fn record_answer(is_correct: bool) {
    let outcome = if is_correct { "correct" } else { "incorrect" };
    ANSWERS_CNTR.with_label_values(&[outcome]).inc();
}

pub fn init_tracing() {
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
