//! Dashboard data and configuration files.
//!
//! Both go through `serde_json::Value` first so malformed fields degrade to
//! defaults instead of rejecting the whole file.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use fridge_core::config::Config;
use fridge_core::state::CalendarEvent;
use fridge_core::state::DashboardModel;
use fridge_core::state::MemoItem;
use fridge_core::state::Reminder;
use fridge_core::state::WeatherDay;
use fridge_core::state::FRIDGE_CATEGORY;
use log::debug;
use log::info;
use log::warn;
use serde_json::json;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

pub const CONFIG_DIR_NAME: &str = "fridge-ink";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_DASHBOARD_PATH: &str = "data/dashboard.json";

const DAY_MS: u64 = 86_400_000;
const HOUR_MS: u64 = 3_600_000;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid TOML in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unsupported config format {} (expected .json, .yaml, .yml or .toml)", .path.display())]
    UnsupportedFormat { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// `<user config dir>/fridge-ink/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads the effective configuration.
///
/// An explicit path must exist and parse. Without one, the default location
/// is tried and silently skipped when absent.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, LoadError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|path| path.is_file()) {
            Some(path) => path,
            None => {
                debug!("no config file; using defaults");
                return Ok(Config::default());
            }
        },
    };

    let value = read_structured(&path)?;
    info!("config loaded from {}", path.display());
    Ok(Config::from_value(&value))
}

fn read_structured(path: &Path) -> Result<Value, LoadError> {
    let format = Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let raw = read_to_string(path)?;
    match format {
        Format::Json => serde_json::from_str(&raw).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Format::Yaml => serde_yaml::from_str(&raw).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        Format::Toml => toml::from_str(&raw).map_err(|source| LoadError::Toml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_to_string(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the dashboard JSON, falling back to the built-in demo when the file
/// does not exist. `now_ms` stamps demo rows and memos lacking a timestamp.
pub fn load_dashboard(path: &Path, now_ms: u64) -> Result<DashboardModel, LoadError> {
    if !path.exists() {
        info!("{} not found; using demo dashboard", path.display());
        return Ok(dashboard_from_value(&demo_dashboard(), now_ms));
    }
    let raw = read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(dashboard_from_value(&value, now_ms))
}

pub fn demo_dashboard() -> Value {
    json!({
        "location": "New York",
        "battery": 84,
        "reminders": [
            { "title": "Doctor Appointment", "time": "14:00" },
            { "title": "Yoghurt Expires", "due": "2 Days" },
            { "title": "Morning Yoga", "time": "08:00" },
            { "title": "Buy Milk" },
        ],
        "weather": [
            { "dow": "MON", "icon": "sun", "hi": 22, "lo": 12, "humidity": 45 },
            { "dow": "TUE", "icon": "cloud", "hi": 20, "lo": 14, "humidity": 52 },
            { "dow": "WED", "icon": "rain", "hi": 18, "lo": 11, "humidity": 68 },
            { "dow": "THU", "icon": "storm", "hi": 19, "lo": 13, "humidity": 73 },
        ],
    })
}

pub fn dashboard_from_value(value: &Value, now_ms: u64) -> DashboardModel {
    let empty = Map::new();
    let doc = value.as_object().unwrap_or(&empty);
    let defaults = DashboardModel::default();

    let tasks = doc
        .get("tasks")
        .and_then(Value::as_array)
        .filter(|tasks| !tasks.is_empty());
    let reminders = match tasks {
        Some(tasks) => unique_rids(tasks.iter().enumerate().map(|(i, t)| task(i, t)).collect()),
        None => legacy_reminders(doc.get("reminders"), now_ms),
    };

    let weather = array(doc.get("weather"))
        .iter()
        .filter_map(weather_day)
        .collect();

    let mut memos: Vec<MemoItem> = array(doc.get("memos"))
        .iter()
        .enumerate()
        .map(|(i, m)| memo(i, m, now_ms))
        .collect();
    if memos.is_empty() {
        memos = demo_memos(now_ms);
    }

    DashboardModel {
        location: text(doc.get("location"))
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.location),
        battery: doc
            .get("battery")
            .and_then(Value::as_u64)
            .filter(|&b| b > 0)
            .map_or(defaults.battery, |b| b.min(100) as u8),
        reminders,
        weather,
        calendar: demo_calendar(),
        memos,
        revision: 0,
    }
}

/// Returns the reminder and whether its id came from the file.
fn task(i: usize, raw: &Value) -> (Reminder, bool) {
    let title = text(raw.get("text"))
        .filter(|s| !s.is_empty())
        .or_else(|| text(raw.get("title")))
        .unwrap_or_default();
    let right = text(raw.get("time"))
        .filter(|s| !s.is_empty())
        .or_else(|| text(raw.get("badge")))
        .unwrap_or_default();
    let explicit = text(raw.get("id")).filter(|s| !s.is_empty());
    let has_id = explicit.is_some();
    let rid = explicit.unwrap_or_else(|| format!("t{i}"));
    let category = text(raw.get("category"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "general".to_string());

    let mut reminder = Reminder::new(rid, title)
        .with_right(right)
        .with_category(category)
        .completed(raw.get("completed").and_then(Value::as_bool).unwrap_or(false));
    reminder.created_at_ms = number(raw.get("createdAt"))
        .or_else(|| number(raw.get("created_at")))
        .map_or(0, |n| n.max(0.0) as u64);
    (reminder, has_id)
}

/// Reminder ids must be unique. Ids from the file are reserved up front, so
/// a generated `t{i}` never takes a real one; repeats get `#2`, `#3`.
fn unique_rids(mut rows: Vec<(Reminder, bool)>) -> Vec<Reminder> {
    let mut taken: HashSet<String> = rows
        .iter()
        .filter(|row| row.1)
        .map(|row| row.0.rid.clone())
        .collect();
    let mut kept = HashSet::new();

    for (reminder, from_file) in &mut rows {
        let first = if *from_file {
            kept.insert(reminder.rid.clone())
        } else {
            taken.insert(reminder.rid.clone())
        };
        if first {
            continue;
        }
        let rid = free_rid(&taken, &reminder.rid);
        if *from_file {
            warn!("duplicate reminder id {}; renamed to {rid}", reminder.rid);
        } else {
            debug!("generated id {} already taken; using {rid}", reminder.rid);
        }
        taken.insert(rid.clone());
        reminder.rid = rid;
    }
    rows.into_iter().map(|(reminder, _)| reminder).collect()
}

fn free_rid(taken: &HashSet<String>, base: &str) -> String {
    let mut n = 2;
    loop {
        let candidate = format!("{base}#{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Legacy `reminders` carry no category: they become shopping rows behind
/// the demo inventory.
fn legacy_reminders(raw: Option<&Value>, now_ms: u64) -> Vec<Reminder> {
    let shopping = array(raw)
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let right = text(r.get("time"))
                .filter(|s| !s.is_empty())
                .or_else(|| text(r.get("due")))
                .unwrap_or_default();
            Reminder::new(format!("s{i}"), text(r.get("title")).unwrap_or_default())
                .with_right(right)
                .with_category("shopping")
        })
        .collect::<Vec<_>>();

    let mut reminders = demo_inventory(now_ms);
    reminders.extend(shopping);
    reminders
}

fn demo_inventory(now_ms: u64) -> Vec<Reminder> {
    [
        ("f1", "Fresh Milk", "EXP: 3 DAYS", now_ms),
        ("f2", "Leftover Pizza", "ADDED YESTERDAY", now_ms.saturating_sub(DAY_MS)),
        ("f3", "Marinated Chicken", "USE TONIGHT", now_ms),
    ]
    .into_iter()
    .map(|(rid, title, right, created_at_ms)| {
        let mut reminder = Reminder::new(rid, title)
            .with_right(right)
            .with_category(FRIDGE_CATEGORY);
        reminder.created_at_ms = created_at_ms;
        reminder
    })
    .collect()
}

fn demo_memos(now_ms: u64) -> Vec<MemoItem> {
    [
        ("m1", "Dinner is in the oven, heat at 180°C.", "Mom", 0, true),
        ("m2", "Don't forget to walk the dog!", "Dad", HOUR_MS, false),
        ("m3", "Can someone pick up packages?", "Alex", 2 * HOUR_MS, true),
    ]
    .into_iter()
    .map(|(mid, text, author, age_ms, is_new)| MemoItem {
        mid: mid.to_string(),
        text: text.to_string(),
        author: author.to_string(),
        timestamp_ms: now_ms.saturating_sub(age_ms),
        is_new,
    })
    .collect()
}

fn demo_calendar() -> Vec<CalendarEvent> {
    [("e0", "Dinner with Alex", "19:00"), ("e1", "Gym Session", "08:00")]
        .into_iter()
        .map(|(eid, title, when)| CalendarEvent {
            eid: eid.to_string(),
            title: title.to_string(),
            when: when.to_string(),
        })
        .collect()
}

fn weather_day(raw: &Value) -> Option<WeatherDay> {
    raw.as_object()?;
    Some(WeatherDay {
        dow: text(raw.get("dow")).unwrap_or_default(),
        icon: text(raw.get("icon")).unwrap_or_else(|| "sun".to_string()),
        hi: integer(raw.get("hi"))?,
        lo: integer(raw.get("lo"))?,
        humidity: humidity(raw.get("humidity")),
    })
}

fn memo(i: usize, raw: &Value, now_ms: u64) -> MemoItem {
    MemoItem {
        mid: text(raw.get("id"))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("m{i}")),
        text: text(raw.get("text")).unwrap_or_default(),
        author: text(raw.get("author")).unwrap_or_default(),
        timestamp_ms: number(raw.get("timestamp"))
            .filter(|&n| n > 0.0)
            .map_or(now_ms, |n| n as u64),
        is_new: raw
            .get("isNew")
            .or_else(|| raw.get("is_new"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

/// Accepts `45`, `45.2` or `"45%"`; anything outside 0..=100 is dropped.
fn humidity(raw: Option<&Value>) -> Option<u8> {
    let n = match raw? {
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        other => other.as_f64()?,
    };
    (0.0..=100.0).contains(&n).then(|| n.round() as u8)
}

fn array(raw: Option<&Value>) -> &[Value] {
    raw.and_then(Value::as_array).map_or(&[], Vec::as_slice)
}

fn text(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(raw: Option<&Value>) -> Option<f64> {
    match raw? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|n: &f64| n.is_finite())
}

fn integer(raw: Option<&Value>) -> Option<i32> {
    match raw {
        None | Some(Value::Null) => Some(0),
        Some(_) => number(raw).map(|n| n.round() as i32),
    }
}
