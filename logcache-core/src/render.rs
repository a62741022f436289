//! Recent-logs text rendering
//!
//! Each envelope becomes one line per payload line:
//!
//! ```text
//! \t2023-11-14T22:13:20.12+0000 [APP/PROC/WEB/0] OUT hello
//! ```
//!
//! The layout is consumed by terminals and scripts, so spacing and
//! punctuation are fixed.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};

use crate::domain::envelope::LogEnvelope;

/// strftime layout of the timestamp up to whole seconds
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// strftime layout of the numeric UTC offset, `±HHMM`
pub const LOG_OFFSET_FORMAT: &str = "%z";

/// Format a nanosecond epoch timestamp as `YYYY-MM-DDTHH:MM:SS.ss±HHMM` in `tz`
///
/// The fraction is truncated to hundredths, never rounded.
pub fn format_timestamp<Tz>(nanos: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let at = DateTime::from_timestamp_nanos(nanos).with_timezone(tz);
    // leap seconds report up to 1_999_999_999 nanos
    let centis = (at.timestamp_subsec_nanos() / 10_000_000).min(99);
    format!(
        "{}.{:02}{}",
        at.format(LOG_TIMESTAMP_FORMAT),
        centis,
        at.format(LOG_OFFSET_FORMAT)
    )
}

/// [`format_timestamp`] in the machine's local time zone
pub fn format_local_timestamp(nanos: i64) -> String {
    format_timestamp(nanos, &Local)
}

/// Header prefixed to every rendered line of `envelope`, trailing space included
pub fn header<Tz>(envelope: &LogEnvelope, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{} [{}/{}] {} ",
        format_timestamp(envelope.timestamp, tz),
        envelope.source_type,
        envelope.source_instance,
        envelope.message_type.tag()
    )
}

/// Append the rendered lines of one envelope to `out`
pub fn render_envelope<Tz>(envelope: &LogEnvelope, tz: &Tz, out: &mut String)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let header = header(envelope, tz);
    let message = envelope.payload_lossy();
    let body = message.strip_suffix('\n').unwrap_or(&message);

    for line in body.split('\n') {
        out.push('\t');
        out.push_str(&header);
        out.push_str(line.trim_end_matches(|c: char| c == '\r' || c == '\n'));
        out.push('\n');
    }
}

/// Render a newest-first batch oldest-first, keeping at most `max_lines` envelopes
///
/// Only the `min(max_lines, batch.len())` newest envelopes are kept. When
/// that count is zero the result is empty.
pub fn render_recent<Tz>(batch: &[LogEnvelope], max_lines: usize, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let effective = max_lines.min(batch.len());
    if effective == 0 {
        return String::new();
    }

    let mut out = String::new();
    for envelope in batch[..effective].iter().rev() {
        render_envelope(envelope, tz, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::envelope::MessageType;
    use chrono::{FixedOffset, Utc};

    const BASE_NANOS: i64 = 1_700_000_000_123_456_789;

    fn envelope(offset_secs: i64, message_type: MessageType, payload: &str) -> LogEnvelope {
        LogEnvelope {
            timestamp: BASE_NANOS + offset_secs * 1_000_000_000,
            message_type,
            source_type: "APP/PROC/WEB".to_string(),
            source_instance: "0".to_string(),
            payload: payload.as_bytes().to_vec(),
        }
    }

    /// Newest first, as the store returns them
    fn batch(n: i64) -> Vec<LogEnvelope> {
        (0..n)
            .rev()
            .map(|i| envelope(i, MessageType::Out, &format!("msg-{i}")))
            .collect()
    }

    fn messages(rendered: &str) -> Vec<&str> {
        rendered
            .lines()
            .map(|line| line.rsplit(' ').next().unwrap())
            .collect()
    }

    #[test]
    fn test_format_timestamp_utc() {
        assert_eq!(
            format_timestamp(BASE_NANOS, &Utc),
            "2023-11-14T22:13:20.12+0000"
        );
    }

    #[test]
    fn test_format_timestamp_offsets() {
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            format_timestamp(BASE_NANOS, &east),
            "2023-11-15T00:13:20.12+0200"
        );

        let west = FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap();
        assert_eq!(
            format_timestamp(BASE_NANOS, &west),
            "2023-11-14T16:43:20.12-0530"
        );
    }

    #[test]
    fn test_format_timestamp_truncates_fraction() {
        let nanos = 1_700_000_000_999_999_999;
        assert_eq!(format_timestamp(nanos, &Utc), "2023-11-14T22:13:20.99+0000");
        assert_eq!(
            format_timestamp(1_700_000_000_000_000_000, &Utc),
            "2023-11-14T22:13:20.00+0000"
        );
    }

    #[test]
    fn test_format_timestamp_parses_back() {
        let tz = FixedOffset::east_opt(9 * 3600 + 45 * 60).unwrap();
        let rendered = format_timestamp(BASE_NANOS, &tz);
        let parsed = DateTime::parse_from_str(&rendered, "%Y-%m-%dT%H:%M:%S%.f%z").unwrap();
        let original = DateTime::from_timestamp_nanos(BASE_NANOS);
        let drift = (original - parsed.with_timezone(&Utc)).num_nanoseconds().unwrap();
        assert!((0..10_000_000).contains(&drift), "drift {drift}ns");
        assert_eq!(parsed.offset(), &tz);
    }

    #[test]
    fn test_local_timestamp_has_same_shape() {
        let rendered = format_local_timestamp(BASE_NANOS);
        assert_eq!(rendered.len(), "2023-11-14T22:13:20.12+0000".len());
        assert!(DateTime::parse_from_str(&rendered, "%Y-%m-%dT%H:%M:%S%.f%z").is_ok());
    }

    #[test]
    fn test_header_layout() {
        let env = envelope(0, MessageType::Out, "hi");
        assert_eq!(
            header(&env, &Utc),
            "2023-11-14T22:13:20.12+0000 [APP/PROC/WEB/0] OUT "
        );
    }

    #[test]
    fn test_header_tags_error_stream() {
        let env = envelope(0, MessageType::Err, "boom");
        assert!(header(&env, &Utc).ends_with("] ERR "));
    }

    #[test]
    fn test_multiline_payload_repeats_header() {
        let env = envelope(0, MessageType::Out, "line1\nline2\r\n");
        let mut out = String::new();
        render_envelope(&env, &Utc, &mut out);

        let h = header(&env, &Utc);
        assert_eq!(out, format!("\t{h}line1\n\t{h}line2\n"));
        assert!(!out.contains('\r'));
    }

    #[test]
    fn test_interior_blank_lines_are_kept() {
        let env = envelope(0, MessageType::Out, "a\r\n\r\nb");
        let mut out = String::new();
        render_envelope(&env, &Utc, &mut out);

        let h = header(&env, &Utc);
        assert_eq!(out, format!("\t{h}a\n\t{h}\n\t{h}b\n"));
    }

    #[test]
    fn test_empty_payload_still_renders_a_line() {
        let env = envelope(0, MessageType::Err, "");
        let mut out = String::new();
        render_envelope(&env, &Utc, &mut out);
        assert_eq!(out, format!("\t{}\n", header(&env, &Utc)));
    }

    #[test]
    fn test_render_recent_is_chronological() {
        let rendered = render_recent(&batch(4), 10, &Utc);
        assert_eq!(messages(&rendered), vec!["msg-0", "msg-1", "msg-2", "msg-3"]);
    }

    #[test]
    fn test_render_recent_keeps_newest_when_truncating() {
        let rendered = render_recent(&batch(5), 2, &Utc);
        assert_eq!(messages(&rendered), vec!["msg-3", "msg-4"]);
    }

    #[test]
    fn test_render_recent_count_is_min_of_bounds() {
        for (max, size, expected) in [(3, 10, 3), (10, 3, 3), (4, 4, 4)] {
            let rendered = render_recent(&batch(size), max, &Utc);
            assert_eq!(rendered.lines().count(), expected, "max={max} size={size}");
        }
    }

    #[test]
    fn test_render_recent_degenerate_bounds() {
        assert_eq!(render_recent(&batch(3), 0, &Utc), "");
        assert_eq!(render_recent(&[], 10, &Utc), "");
    }

    #[test]
    fn test_render_recent_is_deterministic() {
        let input = batch(6);
        assert_eq!(render_recent(&input, 4, &Utc), render_recent(&input, 4, &Utc));
    }
}
