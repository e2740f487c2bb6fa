use courier_matrix_providers::travel_matrix_provider::TravelMatrixProvider;
use courier_optimizer::solver::solver_params::Threads;
use jiff::SpanRelativeTo;

pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration);
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration);
    }

    if let Ok(seconds) = input.parse::<i64>() {
        return Ok(jiff::SignedDuration::from_secs(seconds.abs()));
    }

    Err(String::from("Invalid duration"))
}

/// `auto`, or a thread count.
pub fn parse_threads(input: &str) -> Result<Threads, String> {
    if input.eq_ignore_ascii_case("auto") {
        return Ok(Threads::Auto);
    }

    match input.parse::<usize>() {
        Ok(0) => Err(String::from("Thread count must be positive")),
        Ok(1) => Ok(Threads::Single),
        Ok(threads) => Ok(Threads::Multi(threads)),
        Err(_) => Err(format!("Invalid thread count: {input}")),
    }
}

pub fn parse_metric(input: &str) -> Result<TravelMatrixProvider, String> {
    input.parse().map_err(|error| format!("{error}"))
}
