use jiff::{SignedDuration, SpanRelativeTo};

/// Accepts "5s", "1m30s", ISO 8601 ("PT5S") or a plain number of seconds.
/// Negative durations are rejected.
pub fn parse_duration(input: &str) -> Result<SignedDuration, String> {
    let duration = parse_signed(input).ok_or_else(|| format!("Invalid duration {input:?}"))?;

    if duration.is_negative() {
        return Err(format!("Duration must not be negative, got {input:?}"));
    }

    Ok(duration)
}

fn parse_signed(input: &str) -> Option<SignedDuration> {
    input
        .parse::<SignedDuration>()
        .ok()
        .or_else(|| {
            input
                .parse::<jiff::Span>()
                .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
                .ok()
        })
        .or_else(|| input.parse::<i64>().ok().map(SignedDuration::from_secs))
}
