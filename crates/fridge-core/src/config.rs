use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;
pub const DEFAULT_INVENTORY_MAX_ROWS: usize = 3;
pub const DEFAULT_SHOPPING_MAX_ROWS: usize = 5;
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MEMO_ROTATE_MS: u64 = 6_000;
pub const DEFAULT_TIMER_SECONDS: u64 = 5 * 60;

/// Delay between a completion toggle and the list re-sort.
pub const REORDER_DELAY_MS: u64 = 2_000;
/// How long the voice listening overlay stays up after a long press.
pub const VOICE_OVERLAY_MS: u64 = 2_000;
/// The weather detail page never cycles through more days than this.
pub const MAX_WEATHER_DAYS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeVariant {
    /// Left panel plus fridge/shopping rows, capped per bucket.
    Kitchen,
    /// Clock and weather cards plus the full paged reminder list.
    Classic,
}

impl HomeVariant {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("kitchen") {
            Self::Kitchen
        } else {
            Self::Classic
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Kitchen => "kitchen",
            Self::Classic => "classic",
        }
    }
}

/// Read-only configuration snapshot handed to every reduction.
///
/// Deserialization goes through [`serde_json::Value`] so JSON, YAML and TOML
/// sources all get the same lenient treatment: unknown keys are ignored and
/// malformed values fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Config {
    pub home_variant: HomeVariant,
    pub items_per_page: usize,
    #[serde(rename = "b_inventory_max_rows")]
    pub inventory_max_rows: usize,
    #[serde(rename = "b_shopping_max_rows")]
    pub shopping_max_rows: usize,
    #[serde(rename = "idle_timeout_s", serialize_with = "ms_as_seconds")]
    pub idle_timeout_ms: u64,
    #[serde(rename = "memo_rotate_s", serialize_with = "ms_as_seconds")]
    pub memo_rotate_ms: u64,
    pub timer_default_s: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home_variant: HomeVariant::Kitchen,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            inventory_max_rows: DEFAULT_INVENTORY_MAX_ROWS,
            shopping_max_rows: DEFAULT_SHOPPING_MAX_ROWS,
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            memo_rotate_ms: DEFAULT_MEMO_ROTATE_MS,
            timer_default_s: DEFAULT_TIMER_SECONDS,
        }
    }
}

impl Config {
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(map) = value.as_object() else {
            return defaults;
        };

        Self {
            home_variant: map
                .get("home_variant")
                .and_then(Value::as_str)
                .filter(|raw| !raw.trim().is_empty())
                .map_or(defaults.home_variant, HomeVariant::parse),
            items_per_page: row_count(map.get("items_per_page"), defaults.items_per_page),
            inventory_max_rows: row_count(
                map.get("b_inventory_max_rows"),
                defaults.inventory_max_rows,
            ),
            shopping_max_rows: row_count(
                map.get("b_shopping_max_rows"),
                defaults.shopping_max_rows,
            ),
            idle_timeout_ms: positive_seconds(map.get("idle_timeout_s"))
                .map_or(defaults.idle_timeout_ms, secs_to_ms),
            memo_rotate_ms: positive_seconds(map.get("memo_rotate_s"))
                .map_or(defaults.memo_rotate_ms, secs_to_ms),
            timer_default_s: positive_seconds(map.get("timer_default_s"))
                .map_or(defaults.timer_default_s, |secs| secs as u64)
                .max(1),
        }
    }

    pub fn is_kitchen(&self) -> bool {
        self.home_variant == HomeVariant::Kitchen
    }
}

impl From<Value> for Config {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

fn number(raw: Option<&Value>) -> Option<f64> {
    match raw? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn row_count(raw: Option<&Value>, default: usize) -> usize {
    number(raw).map_or(default, |n| (n as i64).max(1) as usize)
}

fn positive_seconds(raw: Option<&Value>) -> Option<f64> {
    number(raw).filter(|n| *n > 0.0)
}

fn secs_to_ms(secs: f64) -> u64 {
    (secs * 1000.0).round() as u64
}

fn ms_as_seconds<S: Serializer>(ms: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(*ms as f64 / 1000.0)
}
