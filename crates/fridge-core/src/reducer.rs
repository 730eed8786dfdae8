#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEffect {
    /// Something observable changed; the host should draw a frame.
    RequestFrame,
    /// The countdown reached zero on this tick.
    TimerFinished,
}

use log::debug;

use super::clock::{Clock, ManualClock};
use super::config::{Config, MAX_WEATHER_DAYS, REORDER_DELAY_MS, VOICE_OVERLAY_MS};
use super::events::{Direction, Event};
use super::focus::home_queue_len;
use super::kitchen_queue::kitchen_visible_task_indices;
use super::state::{
    AppState, CalendarMode, MenuItemId, Screen, WidgetMode, CLASSIC_CARD_SLOTS,
    KITCHEN_PANEL_SLOTS,
};

/// Applies one event to the state.
///
/// Total over its input: out-of-range indices are renormalized, stale
/// snapshots are ignored, and nothing here can fail. The clock is read only
/// for non-Tick events.
pub fn reduce<C: Clock + ?Sized>(
    state: &mut AppState,
    event: Event,
    config: &Config,
    clock: &C,
) -> Vec<DashboardEffect> {
    let now_ms = match event {
        Event::Tick(now_ms) => return reduce_tick(state, now_ms, config),
        _ => clock.now_ms(),
    };
    state.ui.presence.idle = false;
    state.ui.presence.last_interaction_ms = now_ms;

    match event {
        Event::Rotate(direction) => reduce_rotate(state, direction, config),
        Event::MemoDelta(direction) => reduce_memo_delta(state, direction, config, now_ms),
        Event::Click => reduce_click(state, config, now_ms),
        Event::LongPress => {
            state.ui.voice.open(now_ms.saturating_add(VOICE_OVERLAY_MS));
        }
        Event::Back => reduce_back(state, config, now_ms),
        Event::Tick(_) => {}
    }

    vec![DashboardEffect::RequestFrame]
}

/// Feeds `(timestamp, event)` pairs through the reducer with a manual clock.
/// Tick payloads are used as given; other events are stamped with their pair's time.
pub fn replay<I>(state: &mut AppState, steps: I, config: &Config) -> Vec<DashboardEffect>
where
    I: IntoIterator<Item = (u64, Event)>,
{
    let mut effects = Vec::new();
    replay_with(state, steps, config, |_, _, step_effects| {
        effects.extend_from_slice(step_effects);
    });
    effects
}

/// Like [`replay`], but hands the state to `after_step` after every event so
/// a renderer can draw and write back its snapshot before the next one.
pub fn replay_with<I, F>(state: &mut AppState, steps: I, config: &Config, mut after_step: F)
where
    I: IntoIterator<Item = (u64, Event)>,
    F: FnMut(&mut AppState, u64, &[DashboardEffect]),
{
    let clock = ManualClock::default();
    for (at_ms, event) in steps {
        clock.set(at_ms);
        let effects = reduce(state, event, config, &clock);
        after_step(state, at_ms, &effects);
    }
}

fn reduce_rotate(state: &mut AppState, direction: Direction, config: &Config) {
    let delta = direction.step();
    match state.ui.routing.screen {
        Screen::Menu => {
            let menu = &mut state.ui.menu;
            menu.focused = match direction {
                Direction::Forward => menu.focused.next(),
                Direction::Backward => menu.focused.prev(),
            };
        }
        Screen::Home => {
            let len = home_queue_len(state, config);
            state.ui.routing.focused_index = wrap(state.ui.routing.focused_index, delta, len);
            normalize_focus(state, config);
        }
        Screen::Weather => {
            let days = state.model.weather.len().clamp(1, MAX_WEATHER_DAYS);
            let detail = &mut state.ui.detail;
            detail.weather_day_index = wrap(detail.weather_day_index, delta, days);
        }
        Screen::Calendar => {
            let agenda_len = state.model.calendar.len() + state.model.reminders.len();
            let nav = &mut state.ui.detail.calendar;
            match nav.mode {
                CalendarMode::Agenda if nav.offset_days != 0 => {
                    nav.selected_index = 0;
                }
                CalendarMode::Agenda if agenda_len == 0 => {
                    nav.selected_index = 0;
                }
                CalendarMode::Agenda => {
                    nav.selected_index = (nav.selected_index as i64 + delta)
                        .clamp(0, agenda_len as i64 - 1)
                        as usize;
                }
                CalendarMode::Date => {
                    nav.offset_days += delta;
                }
            }
        }
        Screen::Placeholder => {}
    }
}

fn reduce_memo_delta(state: &mut AppState, direction: Direction, config: &Config, now_ms: u64) {
    let memo_count = state.model.memos.len();
    if state.ui.routing.screen != Screen::Home
        || !config.is_kitchen()
        || state.ui.routing.focused_index != 0
        || memo_count == 0
    {
        return;
    }
    state.ui.memo.index = wrap(state.ui.memo.index, direction.step(), memo_count);
    state.ui.memo.last_rotated_ms = now_ms;
}

fn reduce_click(state: &mut AppState, config: &Config, now_ms: u64) {
    match state.ui.routing.screen {
        Screen::Menu => commit_menu_item(state, config, now_ms),
        Screen::Home => {
            normalize_focus(state, config);
            if config.is_kitchen() {
                click_kitchen_home(state, config, now_ms);
            } else {
                click_classic_home(state, now_ms);
            }
        }
        Screen::Calendar => click_calendar(state, now_ms),
        Screen::Weather | Screen::Placeholder => {}
    }
}

fn commit_menu_item(state: &mut AppState, config: &Config, now_ms: u64) {
    let picked = state.ui.menu.focused;
    state.ui.menu.active = Some(picked);
    match picked {
        MenuItemId::Calendar => go_to(state, Screen::Calendar),
        MenuItemId::Timer => {
            let widget = &mut state.ui.widget;
            widget.mode = WidgetMode::Timer;
            widget.timer_seconds = config.timer_default_s;
            widget.timer_running = true;
            widget.timer_last_tick_ms = now_ms;
            go_to(state, Screen::Home);
            state.ui.routing.focused_index = 0;
            normalize_focus(state, config);
        }
        MenuItemId::List => {
            go_to(state, Screen::Home);
            normalize_focus(state, config);
        }
        MenuItemId::Memo | MenuItemId::Settings => go_to(state, Screen::Placeholder),
    }
}

fn click_kitchen_home(state: &mut AppState, config: &Config, now_ms: u64) {
    // The last frame may have drawn fewer rows than focus assumed.
    normalize_focus(state, config);
    let focused = state.ui.routing.focused_index;
    if focused < KITCHEN_PANEL_SLOTS {
        click_widget_slot(state, now_ms, Screen::Weather);
        return;
    }

    let queue = kitchen_visible_task_indices(state, config);
    if let Some(&idx) = queue.get(focused - KITCHEN_PANEL_SLOTS) {
        toggle_task(state, idx, now_ms);
        normalize_focus(state, config);
    }
}

fn click_classic_home(state: &mut AppState, now_ms: u64) {
    match state.ui.routing.focused_index {
        0 => click_widget_slot(state, now_ms, Screen::Calendar),
        1 => {
            go_to(state, Screen::Weather);
            state.ui.detail.weather_day_index = 0;
        }
        focused => toggle_task(state, focused - CLASSIC_CARD_SLOTS, now_ms),
    }
}

/// Clock/timer slot: toggles a timer, otherwise opens the slot's detail page.
fn click_widget_slot(state: &mut AppState, now_ms: u64, detail: Screen) {
    let widget = &mut state.ui.widget;
    if widget.mode == WidgetMode::Timer {
        widget.timer_running = !widget.timer_running;
        widget.timer_last_tick_ms = now_ms;
        return;
    }

    go_to(state, detail);
    match detail {
        Screen::Calendar => state.ui.detail.calendar.reset(),
        Screen::Weather => state.ui.detail.weather_day_index = 0,
        _ => {}
    }
}

fn click_calendar(state: &mut AppState, now_ms: u64) {
    let event_count = state.model.calendar.len();
    let nav = &mut state.ui.detail.calendar;
    let toggle = match nav.mode {
        CalendarMode::Date => {
            nav.mode = CalendarMode::Agenda;
            nav.selected_index = 0;
            None
        }
        // Other days have no agenda rows; click returns to date browsing.
        CalendarMode::Agenda if nav.offset_days != 0 => {
            nav.mode = CalendarMode::Date;
            None
        }
        CalendarMode::Agenda => nav.selected_index.checked_sub(event_count),
    };

    if let Some(task_idx) = toggle {
        toggle_task(state, task_idx, now_ms);
    }
}

fn reduce_back(state: &mut AppState, config: &Config, now_ms: u64) {
    if state.ui.voice.is_active() {
        state.ui.voice.dismiss();
        return;
    }

    if state.ui.routing.screen == Screen::Home {
        if state.ui.widget.mode == WidgetMode::Timer && state.ui.routing.focused_index == 0 {
            debug!("timer cancelled with {}s left", state.ui.widget.timer_seconds);
            state.ui.widget.cancel_timer(now_ms);
            return;
        }
        go_to(state, Screen::Menu);
        return;
    }

    go_to(state, Screen::Home);
    normalize_focus(state, config);
}

/// Flips completion and arms the deferred reorder. Never reorders synchronously.
fn toggle_task(state: &mut AppState, idx: usize, now_ms: u64) {
    if state.model.toggle_completed(idx) {
        state
            .ui
            .reorder
            .schedule(now_ms.saturating_add(REORDER_DELAY_MS));
    }
}

fn reduce_tick(state: &mut AppState, now_ms: u64, config: &Config) -> Vec<DashboardEffect> {
    let mut effects = Vec::new();
    let mut changed = update_idle(state, now_ms, config);

    if advance_timer(state, now_ms) {
        changed = true;
        if !state.ui.widget.timer_running {
            debug!("timer finished");
            effects.push(DashboardEffect::TimerFinished);
        }
    }

    if state.ui.reorder.take_due(now_ms) {
        debug!("deferred reorder applied");
        state.model.sort_completed_last();
        normalize_focus(state, config);
        changed = true;
    }

    if state.ui.voice.is_expired(now_ms) {
        debug!("voice overlay expired");
        state.ui.voice.dismiss();
        normalize_focus(state, config);
        changed = true;
    }

    changed |= auto_rotate_memo(state, now_ms, config);

    if changed {
        effects.insert(0, DashboardEffect::RequestFrame);
    }
    effects
}

fn update_idle(state: &mut AppState, now_ms: u64, config: &Config) -> bool {
    let presence = &mut state.ui.presence;
    let idle = if state.ui.voice.is_active() || state.ui.widget.timer_running {
        false
    } else {
        now_ms.saturating_sub(presence.last_interaction_ms) >= config.idle_timeout_ms
    };
    let changed = presence.idle != idle;
    presence.idle = idle;
    changed
}

/// Wall-clock countdown: consumes whole elapsed seconds and carries the
/// remainder by moving the origin forward only by what was consumed.
/// Returns whether the visible countdown changed.
fn advance_timer(state: &mut AppState, now_ms: u64) -> bool {
    let widget = &mut state.ui.widget;
    if widget.mode != WidgetMode::Timer || !widget.timer_running {
        widget.timer_last_tick_ms = now_ms;
        return false;
    }
    if widget.timer_seconds == 0 {
        widget.timer_running = false;
        return true;
    }

    let elapsed_secs = now_ms.saturating_sub(widget.timer_last_tick_ms) / 1000;
    if elapsed_secs == 0 {
        return false;
    }
    widget.timer_seconds = widget.timer_seconds.saturating_sub(elapsed_secs);
    widget.timer_last_tick_ms += elapsed_secs * 1000;
    if widget.timer_seconds == 0 {
        widget.timer_running = false;
    }
    true
}

fn auto_rotate_memo(state: &mut AppState, now_ms: u64, config: &Config) -> bool {
    let memo_count = state.model.memos.len();
    let ui = &mut state.ui;
    if ui.routing.screen != Screen::Home
        || !config.is_kitchen()
        || ui.routing.focused_index == 0
        || ui.presence.idle
        || memo_count == 0
    {
        return false;
    }
    if now_ms.saturating_sub(ui.memo.last_rotated_ms) < config.memo_rotate_ms {
        return false;
    }
    ui.memo.index = (ui.memo.index + 1) % memo_count;
    ui.memo.last_rotated_ms = now_ms;
    true
}

fn go_to(state: &mut AppState, screen: Screen) {
    if state.ui.routing.screen != screen {
        debug!(
            "screen {} -> {}",
            state.ui.routing.screen.label(),
            screen.label()
        );
        state.ui.routing.screen = screen;
    }
}

/// Renormalizes focus against the current queue length for the configured
/// home layout and re-derives the classic page.
fn normalize_focus(state: &mut AppState, config: &Config) {
    let len = home_queue_len(state, config);
    let routing = &mut state.ui.routing;
    routing.focused_index %= len;
    routing.page = if !config.is_kitchen() && routing.focused_index >= CLASSIC_CARD_SLOTS {
        1 + (routing.focused_index - CLASSIC_CARD_SLOTS) / config.items_per_page.max(1)
    } else {
        1
    };
}

fn wrap(current: usize, delta: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as i64 + delta).rem_euclid(len as i64) as usize
}

#[cfg(test)]
mod tests;
