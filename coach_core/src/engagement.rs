//! Message-engagement scoring for trainer/client threads.

use crate::Message;

/// Gaps longer than this (in minutes) are not counted as responses
pub const RESPONSE_THRESHOLD_MINUTES: f64 = 120.0;

/// Engagement rate in `[0, 100]`.
///
/// Each consecutive pair of messages whose gap is within the response
/// threshold counts as a response. The rate rewards both answering often and
/// answering quickly:
///
/// `(1 - avg_response / threshold) * responses / (messages - 1) * 100`
///
/// Messages are ordered by `sent_at` before pairing.
pub fn engagement_rate(messages: &[Message]) -> f64 {
    if messages.len() < 2 {
        return 0.0;
    }

    let mut times: Vec<_> = messages.iter().map(|m| m.sent_at).collect();
    times.sort();

    let (responses, total_minutes) = times
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds() as f64 / 60.0)
        .filter(|gap| *gap <= RESPONSE_THRESHOLD_MINUTES)
        .fold((0usize, 0.0), |(count, total), gap| (count + 1, total + gap));

    let average_response = if responses == 0 {
        RESPONSE_THRESHOLD_MINUTES
    } else {
        total_minutes / responses as f64
    };
    let response_rate = responses as f64 / (times.len() - 1) as f64;

    let rate = (1.0 - average_response / RESPONSE_THRESHOLD_MINUTES) * response_rate * 100.0;
    tracing::debug!(
        "Engagement: {} responses, avg {:.1} min, rate {:.2}",
        responses,
        average_response,
        rate
    );
    rate.clamp(0.0, 100.0)
}
