use jiff::{SignedDuration, Span, SpanRelativeTo};
use serde_json::Value;

/// Accepts "30s", "2m", "PT1M30S" or a bare number of seconds.
pub fn parse_timeout(input: &str) -> Result<SignedDuration, String> {
    let duration = input
        .parse::<SignedDuration>()
        .ok()
        .or_else(|| {
            input
                .parse::<Span>()
                .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
                .ok()
        })
        .or_else(|| input.parse::<u64>().ok().map(|secs| SignedDuration::from_secs(secs as i64)))
        .ok_or_else(|| format!("Invalid timeout {:?}", input))?;

    if duration.is_negative() || duration.is_zero() {
        return Err(String::from("Timeout must be positive"));
    }

    Ok(duration)
}

/// Endpoint selection given on the command line as JSON, e.g. `{"orderId": 3}`.
pub fn parse_selection(input: &str) -> Result<Value, String> {
    serde_json::from_str(input).map_err(|err| format!("Invalid selection JSON: {}", err))
}
