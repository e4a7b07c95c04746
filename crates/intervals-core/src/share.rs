//! Shareable timer lists.
//!
//! A workout is shared as a compact JSON projection of its timers,
//! percent-encoded so it can sit in a `timers=` URL query parameter.
//! Decoding is lenient: bad fields take defaults, and anything that is not a
//! list of timers decodes to an empty list.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::timer::{TimerDefinition, TimerKind, TimerState};

/// Query parameter carrying the encoded timers.
pub const SHARE_PARAM: &str = "timers";

/// Fixed-shape projection of a timer for sharing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct SharedTimer {
    id: String,
    #[serde(rename = "type")]
    kind: TimerKind,
    duration: u64,
    rounds: u32,
    round_time: u64,
    work_time: u64,
    rest_time: u64,
    name: String,
}

impl From<&TimerDefinition> for SharedTimer {
    fn from(timer: &TimerDefinition) -> Self {
        Self {
            id: timer.id.clone(),
            kind: timer.kind,
            duration: timer.duration,
            rounds: timer.rounds_or_one(),
            round_time: timer.round_time_secs(),
            work_time: timer.work_time_secs(),
            rest_time: timer.rest_time_secs(),
            name: timer.name.clone(),
        }
    }
}

/// Encode `timers` for use as a URL query value.
pub fn encode(timers: &[TimerDefinition]) -> String {
    let projection: Vec<SharedTimer> = timers.iter().map(SharedTimer::from).collect();
    // A Vec of plain structs always serializes.
    let json = serde_json::to_string(&projection).unwrap_or_else(|_| "[]".to_string());
    urlencoding::encode(&json).into_owned()
}

/// `timers=<encoded>`, ready to append after `?`.
pub fn share_query(timers: &[TimerDefinition]) -> String {
    format!("{SHARE_PARAM}={}", encode(timers))
}

/// Decode a value produced by [`encode`]. Never fails; unreadable input
/// yields an empty list.
pub fn decode(encoded: &str) -> Vec<TimerDefinition> {
    let json = match urlencoding::decode(encoded.trim()) {
        Ok(json) => json,
        Err(e) => {
            tracing::debug!("shared timers are not valid percent-encoding: {e}");
            return Vec::new();
        }
    };
    let items = match serde_json::from_str::<Value>(&json) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            tracing::debug!("shared timers are not a list");
            return Vec::new();
        }
        Err(e) => {
            tracing::debug!("shared timers are not valid JSON: {e}");
            return Vec::new();
        }
    };

    let added_at = chrono::Utc::now().timestamp_millis();
    let mut timers: Vec<TimerDefinition> = items
        .iter()
        .enumerate()
        .map(|(i, item)| timer_from_value(item, i, added_at))
        .collect();
    dedupe_names(&mut timers);
    timers
}

/// Suffix repeated names with ` (2)`, ` (3)`, ... so the list can be edited.
fn dedupe_names(timers: &mut [TimerDefinition]) {
    let mut seen = HashSet::new();
    for timer in timers {
        if seen.insert(timer.name.clone()) {
            continue;
        }
        let unique = (2..)
            .map(|n| format!("{} ({n})", timer.name))
            .find(|candidate| !seen.contains(candidate))
            .unwrap_or_else(|| timer.id.clone());
        tracing::debug!(from = %timer.name, to = %unique, "renaming duplicate shared timer");
        seen.insert(unique.clone());
        timer.name = unique;
    }
}

/// Extract and decode the `timers` parameter from a URL or a bare query
/// string. Returns an empty list when the parameter is missing.
pub fn timers_from_url(input: &str) -> Vec<TimerDefinition> {
    let input = input.trim();
    let query = match url::Url::parse(input) {
        Ok(url) => url.query().map(str::to_string),
        // Not an absolute URL: treat as `?a=b&c=d` or `a=b&c=d`.
        Err(_) => Some(input.trim_start_matches('?').to_string()),
    };
    let Some(query) = query else {
        return Vec::new();
    };

    // The raw value is still percent-encoded; decode() undoes that once.
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix(SHARE_PARAM)?.strip_prefix('='))
        .map(decode)
        .unwrap_or_default()
}

fn timer_from_value(item: &Value, position: usize, added_at: i64) -> TimerDefinition {
    let kind = text(item, "type")
        .and_then(|s| s.parse::<TimerKind>().ok())
        .unwrap_or(TimerKind::Stopwatch);
    let rounds = item
        .get("rounds")
        .and_then(Value::as_u64)
        .filter(|&r| r >= 1)
        .map_or(1, |r| u32::try_from(r).unwrap_or(u32::MAX));
    let id = text(item, "id")
        .filter(|s| !s.is_empty())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string);
    let name = text(item, "name")
        .filter(|s| !s.is_empty())
        .map_or_else(|| format!("Timer {}", position + 1), str::to_string);

    let round_based = kind.is_round_based();
    TimerDefinition {
        id,
        kind,
        name,
        duration: secs(item, "duration"),
        round_time: (kind == TimerKind::Xy).then(|| secs(item, "roundTime")),
        work_time: (kind == TimerKind::Tabata).then(|| secs(item, "workTime")),
        rest_time: (kind == TimerKind::Tabata).then(|| secs(item, "restTime")),
        rounds: round_based.then_some(rounds),
        state: TimerState::NotRunning,
        added_at,
    }
}

fn text<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str).map(str::trim)
}

fn secs(item: &Value, key: &str) -> u64 {
    item.get(key).and_then(Value::as_u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::total_duration;

    fn workout() -> Vec<TimerDefinition> {
        vec![
            TimerDefinition::stopwatch("Jog", 120),
            TimerDefinition::countdown("Plank & hold", 60),
            TimerDefinition::xy("EMOM", 5, 60),
            TimerDefinition::tabata("Tabata", 8, 20, 10),
        ]
    }

    #[test]
    fn round_trip_preserves_definitions() {
        let timers = workout();
        let decoded = decode(&encode(&timers));
        assert_eq!(decoded.len(), timers.len());
        for (a, b) in timers.iter().zip(&decoded) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.name, b.name);
            assert_eq!(a.duration, b.duration);
            assert_eq!(a.rounds, b.rounds);
            assert_eq!(a.round_time, b.round_time);
            assert_eq!(a.work_time, b.work_time);
            assert_eq!(a.rest_time, b.rest_time);
            assert_eq!(total_duration(a), total_duration(b));
        }
    }

    #[test]
    fn encoding_is_url_safe() {
        let encoded = encode(&workout());
        assert!(!encoded.contains(['&', '=', ' ', '?', '#', '"']));
    }

    #[test]
    fn garbage_decodes_to_empty() {
        assert!(decode("").is_empty());
        assert!(decode("%E0%A4%A").is_empty());
        assert!(decode("not json").is_empty());
        assert!(decode(&urlencoding::encode(r#"{"id":"x"}"#)).is_empty());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let raw = urlencoding::encode(r#"[{"type":"tabata","workTime":20},{}]"#).into_owned();
        let decoded = decode(&raw);
        assert_eq!(decoded.len(), 2);

        let tabata = &decoded[0];
        assert_eq!(tabata.kind, TimerKind::Tabata);
        assert_eq!(tabata.rounds, Some(1));
        assert_eq!(tabata.work_time, Some(20));
        assert_eq!(tabata.rest_time, Some(0));
        assert_eq!(tabata.name, "Timer 1");
        assert!(!tabata.id.is_empty());

        let blank = &decoded[1];
        assert_eq!(blank.kind, TimerKind::Stopwatch);
        assert_eq!(blank.duration, 0);
        assert_eq!(blank.name, "Timer 2");
        assert_ne!(blank.id, tabata.id);
    }

    #[test]
    fn colliding_names_are_suffixed() {
        let raw = urlencoding::encode(r#"[{"name":"Timer 2"},{},{"name":"Timer 2"}]"#).into_owned();
        let decoded = decode(&raw);
        let names: Vec<&str> = decoded.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Timer 2", "Timer 2 (2)", "Timer 2 (3)"]);

        // Every loaded timer can be edited without renaming first.
        for (i, timer) in decoded.iter().enumerate() {
            let mut draft = crate::timer::TimerDraft::from_timer(timer);
            draft.duration = 30;
            assert!(draft.build(&decoded, Some(i)).is_ok());
        }
    }

    #[test]
    fn share_query_round_trips_through_a_url() {
        let timers = workout();
        let url = format!("https://example.test/workout?theme=dark&{}", share_query(&timers));
        let decoded = timers_from_url(&url);
        assert_eq!(decoded.len(), 4);
        assert_eq!(decoded[1].name, "Plank & hold");

        let bare = format!("?{}", share_query(&timers));
        assert_eq!(timers_from_url(&bare).len(), 4);
    }

    #[test]
    fn url_without_timers_is_empty() {
        assert!(timers_from_url("https://example.test/workout").is_empty());
        assert!(timers_from_url("https://example.test/?other=1").is_empty());
    }
}
