use std::time::Duration;

use crate::models::NowPlayingSnapshot;

const STATUS_PAGE: &str = "variables.html";

const FILE_START: &str = "<p id=\"file\">";
const POSITION_STRING_START: &str = "<p id=\"positionstring\">";
const DURATION_STRING_START: &str = "<p id=\"durationstring\">";
const POSITION_START: &str = "<p id=\"position\">";
const DURATION_START: &str = "<p id=\"duration\">";
const TAG_END: &str = "</p>";

/// Where to find the player's web interface. Fixed at construction; the
/// address is not re-read from settings while running.
#[derive(Clone, Debug)]
pub struct PollerConfig {
    pub base_address: String,
    pub timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            base_address: "http://127.0.0.1:13579/".to_string(),
            timeout: Duration::from_millis(500),
        }
    }
}

impl PollerConfig {
    pub fn status_url(&self) -> String {
        if self.base_address.ends_with('/') {
            format!("{}{}", self.base_address, STATUS_PAGE)
        } else {
            format!("{}/{}", self.base_address, STATUS_PAGE)
        }
    }
}

pub fn build_agent(config: &PollerConfig) -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(config.timeout).build()
}

/// One poll cycle: fetch the status page and derive a snapshot. Every
/// failure mode collapses into the default (empty, hidden) snapshot; the
/// player simply reads as not running until the next tick.
pub fn tick(agent: &ureq::Agent, config: &PollerConfig) -> NowPlayingSnapshot {
    match fetch_status(agent, config) {
        Some(body) => parse_status(&body),
        None => NowPlayingSnapshot::default(),
    }
}

fn fetch_status(agent: &ureq::Agent, config: &PollerConfig) -> Option<String> {
    let response = agent.get(&config.status_url()).call().ok()?;
    response.into_string().ok()
}

pub fn parse_status(body: &str) -> NowPlayingSnapshot {
    let file = extract_between(body, FILE_START, TAG_END);
    let position = extract_between(body, POSITION_STRING_START, TAG_END);
    let duration = extract_between(body, DURATION_STRING_START, TAG_END);
    let position_ms = extract_between(body, POSITION_START, TAG_END);
    let duration_ms = extract_between(body, DURATION_START, TAG_END);

    NowPlayingSnapshot {
        video_name: file,
        position_label: format_position_label(&position, &duration),
        percent: progress_percent(&position_ms, &duration_ms),
        bar_visible: true,
    }
}

/// Text between the first occurrence of `start` and the first occurrence of
/// `stop` after it. Either marker absent yields an empty string.
pub fn extract_between(body: &str, start: &str, stop: &str) -> String {
    let from = match body.find(start) {
        Some(i) => i + start.len(),
        None => return String::new(),
    };
    match body[from..].find(stop) {
        Some(len) => body[from..from + len].to_string(),
        None => String::new(),
    }
}

/// Played fraction as 0–100. Both values must parse as integers and the
/// duration must be non-zero; anything else reads as zero progress.
pub fn progress_percent(position: &str, duration: &str) -> f64 {
    match (position.parse::<i64>(), duration.parse::<i64>()) {
        (Ok(pos), Ok(dur)) if dur != 0 => pos as f64 / dur as f64 * 100.0,
        _ => 0.0,
    }
}

fn format_position_label(position: &str, duration: &str) -> String {
    if position.is_empty() {
        String::new()
    } else if duration.is_empty() {
        position.to_string()
    } else {
        format!("{position} / {duration}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "<html><body>",
        "<p id=\"filepath\">C:\\video\\Movie.mkv</p>",
        "<p id=\"file\">Movie.mkv</p>",
        "<p id=\"state\">2</p>",
        "<p id=\"position\">30</p>",
        "<p id=\"positionstring\">00:00:30</p>",
        "<p id=\"duration\">120</p>",
        "<p id=\"durationstring\">00:02:00</p>",
        "</body></html>",
    );

    #[test]
    fn extracts_between_markers() {
        assert_eq!(
            extract_between("<p id=\"file\">Movie.mkv</p>", "<p id=\"file\">", "</p>"),
            "Movie.mkv"
        );
    }

    #[test]
    fn missing_start_marker_yields_empty() {
        assert_eq!(extract_between("no markers here", "<p id=\"file\">", "</p>"), "");
    }

    #[test]
    fn missing_stop_marker_yields_empty() {
        assert_eq!(
            extract_between("<p id=\"file\">Movie.mkv", "<p id=\"file\">", "</p>"),
            ""
        );
    }

    #[test]
    fn position_marker_does_not_match_positionstring() {
        assert_eq!(
            extract_between(SAMPLE, "<p id=\"position\">", "</p>"),
            "30"
        );
    }

    #[test]
    fn percent_basic() {
        assert_eq!(progress_percent("30", "120"), 25.0);
    }

    #[test]
    fn percent_zero_duration() {
        assert_eq!(progress_percent("30", "0"), 0.0);
    }

    #[test]
    fn percent_non_numeric() {
        assert_eq!(progress_percent("abc", "120"), 0.0);
        assert_eq!(progress_percent("30", ""), 0.0);
    }

    #[test]
    fn parses_full_status_page() {
        let snapshot = parse_status(SAMPLE);
        assert_eq!(snapshot.video_name, "Movie.mkv");
        assert_eq!(snapshot.position_label, "00:00:30 / 00:02:00");
        assert_eq!(snapshot.percent, 25.0);
        assert!(snapshot.bar_visible);
    }

    #[test]
    fn empty_body_still_visible_but_blank() {
        let snapshot = parse_status("<html></html>");
        assert_eq!(snapshot.video_name, "");
        assert_eq!(snapshot.position_label, "");
        assert_eq!(snapshot.percent, 0.0);
    }

    #[test]
    fn status_url_joins_base() {
        let config = PollerConfig::default();
        assert_eq!(config.status_url(), "http://127.0.0.1:13579/variables.html");

        let no_slash = PollerConfig {
            base_address: "http://localhost:13579".to_string(),
            ..PollerConfig::default()
        };
        assert_eq!(no_slash.status_url(), "http://localhost:13579/variables.html");
    }
}
