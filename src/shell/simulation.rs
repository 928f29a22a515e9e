/// Intrusion-theater sequence behind the hidden `hack` command, plus the
/// public-IP lookup and the submission log it feeds. The sequence is pure
/// data (delay + line pairs); the session's typing scheduler does the
/// pacing so tests never have to sleep.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::shell::scrollback::{Line, LineKind};

const FALLBACK_IP: &str = "127.0.0.1";

#[cfg(feature = "ip-lookup")]
const IP_ENDPOINT: &str = "https://api.ipify.org";

/// Staged output of the simulation. Each entry waits its delay, then
/// appears as one scrollback record. The encryption progress bar runs
/// eleven 200ms frames in place, so its collapsed line carries the
/// whole 2.2s.
pub fn sequence(ip: &str) -> Vec<(Duration, Line)> {
    let out = |ms: u64, text: &str| {
        (
            Duration::from_millis(ms),
            Line { kind: LineKind::Output, text: text.to_string() },
        )
    };
    let alert = |ms: u64, text: &str| {
        (
            Duration::from_millis(ms),
            Line { kind: LineKind::Error, text: text.to_string() },
        )
    };

    vec![
        out(800, "[*] Initiating secure connection..."),
        out(1000, "[*] Establishing tunnel via anonymous proxies..."),
        out(2200, "[*] Encrypting message: [####################] 100%"),
        out(500, "[\u{2713}] PGP Encryption successful"),
        out(800, "[*] Tracing user session IP..."),
        out(1000, &format!("[*] IP Captured: {ip}")),
        out(1200, "[*] Scanning vulnerabilities on target node..."),
        alert(500, "[!] WARNING: Potential intrusion detected!"),
        out(1000, "[*] Bypassing firewall..."),
        out(1500, "[\u{2713}] ACCESS GRANTED. System compromised."),
        out(1000, "[*] Injecting message payload into master database..."),
        out(1000, "[\u{2713}] SUCCESS: Message delivered securely!"),
        out(2000, "[!] NOTE: This was a simulation. No real systems were harmed."),
    ]
}

/// Resolve the visitor's public IP. Lookup failures of any kind fall
/// back to loopback so the sequence always has something to show.
pub fn lookup_ip(enabled: bool) -> String {
    if !enabled {
        return FALLBACK_IP.to_string();
    }
    fetch_public_ip().unwrap_or_else(|| FALLBACK_IP.to_string())
}

#[cfg(feature = "ip-lookup")]
fn fetch_public_ip() -> Option<String> {
    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(2))
        .build();
    let body = agent.get(IP_ENDPOINT).call().ok()?.into_string().ok()?;
    let ip = body.trim();
    if ip.is_empty() {
        None
    } else {
        Some(ip.to_string())
    }
}

#[cfg(not(feature = "ip-lookup"))]
fn fetch_public_ip() -> Option<String> {
    None
}

#[derive(Serialize)]
struct SubmissionRecord<'a> {
    ip: &'a str,
    timestamp: String,
}

/// Append one `{"ip":..,"timestamp":..}` record per run, one JSON
/// object per line.
pub fn log_submission(path: &Path, ip: &str, timestamp: DateTime<Utc>) -> io::Result<()> {
    let record = SubmissionRecord {
        ip,
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    let json = serde_json::to_string(&record).map_err(io::Error::other)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{json}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sequence_is_staged_like_the_original() {
        let lines = sequence("203.0.113.9");
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0].0, Duration::from_millis(800));
        assert_eq!(lines[0].1.text, "[*] Initiating secure connection...");
        assert_eq!(
            lines[2].1.text,
            "[*] Encrypting message: [####################] 100%"
        );
        assert!(lines[5].1.text.ends_with("203.0.113.9"));
        assert_eq!(lines[7].1.kind, LineKind::Error);
        let total: Duration = lines.iter().map(|(d, _)| *d).sum();
        assert_eq!(total, Duration::from_millis(14_500));
    }

    #[test]
    fn disabled_lookup_falls_back_to_loopback() {
        assert_eq!(lookup_ip(false), "127.0.0.1");
    }

    #[test]
    fn submissions_append_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submissions.jsonl");
        let first = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2025, 3, 14, 9, 5, 0).unwrap();
        log_submission(&path, "203.0.113.9", first).unwrap();
        log_submission(&path, "127.0.0.1", second).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let records: Vec<serde_json::Value> = raw
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["ip"], "203.0.113.9");
        assert_eq!(records[0]["timestamp"], "2025-03-14T09:00:00.000Z");
        assert_eq!(records[1]["ip"], "127.0.0.1");
    }
}
