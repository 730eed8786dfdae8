use pretty_assertions::assert_eq;

pub(super) use super::reduce;
pub(super) use super::replay;
pub(super) use super::replay_with;
pub(super) use crate::clock::ManualClock;
pub(super) use crate::config::Config;
pub(super) use crate::config::HomeVariant;
pub(super) use crate::events::Direction;
pub(super) use crate::events::Event;
pub(super) use crate::focus::focus_target;
pub(super) use crate::focus::home_queue_len;
pub(super) use crate::focus::FocusTarget;
pub(super) use crate::kitchen_queue::kitchen_visible_task_indices;
pub(super) use crate::kitchen_queue::resolve_kitchen_queue;
pub(super) use crate::kitchen_queue::FocusQueueSnapshot;
pub(super) use crate::reducer::DashboardEffect;
pub(super) use crate::state::AppState;
pub(super) use crate::state::CalendarEvent;
pub(super) use crate::state::CalendarMode;
pub(super) use crate::state::DashboardModel;
pub(super) use crate::state::MemoItem;
pub(super) use crate::state::MenuItemId;
pub(super) use crate::state::Reminder;
pub(super) use crate::state::Screen;
pub(super) use crate::state::WeatherDay;
pub(super) use crate::state::WidgetMode;

mod navigation;

/// Session start used by every fixture, in Unix milliseconds.
const T0: u64 = 1_700_000_000_000;

fn kitchen() -> Config {
    Config::default()
}

fn classic() -> Config {
    Config {
        home_variant: HomeVariant::Classic,
        ..Config::default()
    }
}

fn fridge(rid: &str) -> Reminder {
    Reminder::new(rid, rid.to_uppercase()).with_category("fridge")
}

fn shop(rid: &str) -> Reminder {
    Reminder::new(rid, rid.to_uppercase()).with_category("shopping")
}

fn memo(mid: &str) -> MemoItem {
    MemoItem {
        mid: mid.to_string(),
        text: format!("note {mid}"),
        author: "Mom".to_string(),
        timestamp_ms: T0,
        is_new: false,
    }
}

fn weather_days(count: usize) -> Vec<WeatherDay> {
    ["MON", "TUE", "WED", "THU", "FRI", "SAT"]
        .iter()
        .take(count)
        .map(|dow| WeatherDay {
            dow: dow.to_string(),
            icon: "sun".to_string(),
            hi: 20,
            lo: 10,
            humidity: None,
        })
        .collect()
}

fn state_with(reminders: Vec<Reminder>, config: &Config) -> AppState {
    let model = DashboardModel {
        reminders,
        ..DashboardModel::default()
    };
    AppState::new(model, config, T0)
}

fn dispatch(
    state: &mut AppState,
    config: &Config,
    clock: &ManualClock,
    event: Event,
) -> Vec<DashboardEffect> {
    let effects = reduce(state, event, config, clock);
    if !event.is_tick() {
        assert_eq!(effects, vec![DashboardEffect::RequestFrame]);
    }
    effects
}

fn tick(state: &mut AppState, config: &Config, at_ms: u64) -> Vec<DashboardEffect> {
    reduce(state, Event::Tick(at_ms), config, &ManualClock::new(at_ms))
}

fn rids(state: &AppState) -> Vec<&str> {
    state
        .model
        .reminders
        .iter()
        .map(|reminder| reminder.rid.as_str())
        .collect()
}

/// Renderer stand-in: records the freshly resolved kitchen queue as drawn.
fn render_kitchen(state: &mut AppState, config: &Config) {
    let rendered = resolve_kitchen_queue(&state.model, config);
    let snapshot = FocusQueueSnapshot::capture(&state.model, &rendered, config);
    state.record_rendered_queue(snapshot);
}
