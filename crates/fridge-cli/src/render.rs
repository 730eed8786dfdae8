//! Plain-text frames for the terminal runner and script replay.
//!
//! The renderer never decides navigation: highlight comes from
//! [`focus_target`]. On kitchen Home it is also the authority on which task
//! rows were actually drawn and records them with
//! [`AppState::record_rendered_queue`] before reading focus back.

use chrono::DateTime;
use chrono::Duration;
use chrono::Local;
use chrono::Utc;
use fridge_core::config::Config;
use fridge_core::config::MAX_WEATHER_DAYS;
use fridge_core::focus::focus_target;
use fridge_core::focus::FocusTarget;
use fridge_core::kitchen_queue::resolve_kitchen_queue;
use fridge_core::kitchen_queue::FocusQueueSnapshot;
use fridge_core::state::AppState;
use fridge_core::state::CalendarMode;
use fridge_core::state::Reminder;
use fridge_core::state::Screen;
use fridge_core::state::WeatherDay;
use fridge_core::state::WidgetMode;
use fridge_core::state::MENU_ORDER;

const FOCUS_MARK: &str = "> ";
const NO_MARK: &str = "  ";
const TITLE_WIDTH: usize = 24;

/// Header, left panel, weather line and the two section titles.
const KITCHEN_CHROME_ROWS: usize = 5;

pub fn render_frame(state: &mut AppState, config: &Config, rows: usize, now_ms: u64) -> Vec<String> {
    let now = local_time(now_ms);
    let mut lines = vec![header(state, &now)];

    match state.screen() {
        Screen::Home if config.is_kitchen() => kitchen_home(state, config, rows, &now, &mut lines),
        Screen::Home => classic_home(state, config, &now, &mut lines),
        Screen::Menu => menu(state, config, &mut lines),
        Screen::Calendar => calendar(state, config, &now, &mut lines),
        Screen::Weather => weather(state, config, &mut lines),
        Screen::Placeholder => placeholder(state, &mut lines),
    }

    if state.ui.voice.is_active() {
        lines.push("(( listening... ))".to_string());
    }
    lines
}

fn local_time(now_ms: u64) -> DateTime<Local> {
    i64::try_from(now_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or_default()
        .with_timezone(&Local)
}

fn header(state: &AppState, now: &DateTime<Local>) -> String {
    let idle = if state.ui.presence.idle { "  zZ" } else { "" };
    format!(
        "{}  {}  BAT {}%{}",
        state.model.location,
        now.format("%a %d %b %H:%M"),
        state.model.battery,
        idle
    )
}

fn mark(focused: bool) -> &'static str {
    if focused {
        FOCUS_MARK
    } else {
        NO_MARK
    }
}

fn widget_label(state: &AppState, now: &DateTime<Local>) -> String {
    let widget = &state.ui.widget;
    match widget.mode {
        WidgetMode::Clock => now.format("%H:%M").to_string(),
        WidgetMode::Timer => {
            let paused = if widget.timer_running { "" } else { " (paused)" };
            format!(
                "TIMER {:02}:{:02}{}",
                widget.timer_seconds / 60,
                widget.timer_seconds % 60,
                paused
            )
        }
    }
}

fn weather_summary(day: &WeatherDay) -> String {
    let humidity = day
        .humidity
        .map(|h| format!("  {h}%"))
        .unwrap_or_default();
    format!("{} {} {}°/{}°{}", day.dow, day.icon, day.hi, day.lo, humidity)
}

fn task_row(marker: &str, reminder: &Reminder, checkbox: bool) -> String {
    let check = match (checkbox, reminder.completed) {
        (false, _) => "",
        (true, true) => "[x] ",
        (true, false) => "[ ] ",
    };
    let row = format!(
        "{marker}{check}{:<width$} {}",
        reminder.title,
        reminder.right,
        width = TITLE_WIDTH
    );
    row.trim_end().to_string()
}

fn kitchen_home(
    state: &mut AppState,
    config: &Config,
    rows: usize,
    now: &DateTime<Local>,
    lines: &mut Vec<String>,
) {
    let voice_row = usize::from(state.ui.voice.is_active());
    let budget = rows.saturating_sub(KITCHEN_CHROME_ROWS + voice_row);
    let drawn: Vec<usize> = resolve_kitchen_queue(&state.model, config)
        .into_iter()
        .take(budget)
        .collect();
    state.record_rendered_queue(FocusQueueSnapshot::capture(&state.model, &drawn, config));

    let target = focus_target(state, config);
    let model = &state.model;

    let memo = match model.memos.get(state.ui.memo.index) {
        Some(memo) => format!(
            "  {}{}: {} ({}/{})",
            if memo.is_new { "NEW " } else { "" },
            memo.author,
            memo.text,
            state.ui.memo.index + 1,
            model.memos.len()
        ),
        None => String::new(),
    };
    lines.push(format!(
        "{}[{}]{}",
        mark(target == FocusTarget::LeftPanel),
        widget_label(state, now),
        memo
    ));
    lines.push(match model.weather.first() {
        Some(day) => format!("{NO_MARK}{}", weather_summary(day)),
        None => format!("{NO_MARK}no forecast"),
    });

    let (fridge, shopping): (Vec<usize>, Vec<usize>) = drawn
        .iter()
        .partition(|&&idx| model.reminders[idx].is_fridge());
    let due_in = |want_fridge: bool| {
        model
            .reminders
            .iter()
            .filter(|r| !r.completed && r.is_fridge() == want_fridge)
            .count()
    };

    for (title, section, due) in [
        ("INVENTORY", fridge, due_in(true)),
        ("SHOPPING", shopping, due_in(false)),
    ] {
        lines.push(format!("{title} {due}"));
        for idx in section {
            let focused = matches!(target, FocusTarget::Task { index, .. } if index == idx);
            lines.push(task_row(mark(focused), &model.reminders[idx], false));
        }
    }
}

fn classic_home(state: &AppState, config: &Config, now: &DateTime<Local>, lines: &mut Vec<String>) {
    let target = focus_target(state, config);
    let model = &state.model;
    let per_page = config.items_per_page.max(1);
    let pages = model.reminders.len().div_ceil(per_page).max(1);
    let page = state.ui.routing.page.clamp(1, pages);

    lines.push(format!(
        "{}CLOCK {}",
        mark(target == FocusTarget::Clock),
        widget_label(state, now)
    ));
    lines.push(format!(
        "{}WEATHER {}",
        mark(target == FocusTarget::Weather),
        model
            .weather
            .first()
            .map_or_else(|| "no forecast".to_string(), weather_summary)
    ));
    lines.push(format!(
        "REMINDERS {}/{}  page {page}/{pages}",
        model.due_count(),
        model.reminders.len()
    ));

    for (idx, reminder) in model
        .reminders
        .iter()
        .enumerate()
        .skip((page - 1) * per_page)
        .take(per_page)
    {
        let focused = matches!(target, FocusTarget::Task { index, .. } if index == idx);
        lines.push(task_row(mark(focused), reminder, true));
    }
}

fn menu(state: &AppState, config: &Config, lines: &mut Vec<String>) {
    let target = focus_target(state, config);
    lines.push("MENU".to_string());
    for item in MENU_ORDER {
        let active = if state.ui.menu.active == Some(item) {
            " *"
        } else {
            ""
        };
        let focused = target == FocusTarget::MenuItem { item };
        lines.push(format!("{}{}{}", mark(focused), item.label(), active));
    }
}

fn calendar(state: &AppState, config: &Config, now: &DateTime<Local>, lines: &mut Vec<String>) {
    let target = focus_target(state, config);
    let nav = &state.ui.detail.calendar;
    let day = *now + Duration::days(nav.offset_days);
    lines.push(format!(
        "CALENDAR  {}",
        day.format("%A %d %B %Y")
    ));

    match nav.mode {
        CalendarMode::Date => {
            lines.push(format!(
                "{}< {} >",
                mark(target == FocusTarget::CalendarDate),
                day.format("%a %d")
            ));
        }
        CalendarMode::Agenda if nav.offset_days != 0 => {
            lines.push(format!("{NO_MARK}no agenda for this day"));
        }
        CalendarMode::Agenda => {
            let model = &state.model;
            let focused_row = |row: usize| target == FocusTarget::AgendaRow { index: row };
            for (row, event) in model.calendar.iter().enumerate() {
                lines.push(format!("{}{} {}", mark(focused_row(row)), event.when, event.title));
            }
            let offset = model.calendar.len();
            for (idx, reminder) in model.reminders.iter().enumerate() {
                lines.push(task_row(mark(focused_row(offset + idx)), reminder, true));
            }
        }
    }
}

fn weather(state: &AppState, config: &Config, lines: &mut Vec<String>) {
    let target = focus_target(state, config);
    lines.push(format!("WEATHER  {}", state.model.location));
    if state.model.weather.is_empty() {
        lines.push(format!("{NO_MARK}no forecast"));
        return;
    }
    for (index, day) in state.model.weather.iter().take(MAX_WEATHER_DAYS).enumerate() {
        let focused = target == FocusTarget::WeatherDay { index };
        lines.push(format!("{}{}", mark(focused), weather_summary(day)));
    }
}

fn placeholder(state: &AppState, lines: &mut Vec<String>) {
    let title = state.ui.menu.active.map_or("PLACEHOLDER", |item| item.label());
    lines.push(title.to_string());
    lines.push(format!("{NO_MARK}coming soon; press back"));
}

#[cfg(test)]
mod tests {
    use fridge_core::clock::ManualClock;
    use fridge_core::config::HomeVariant;
    use fridge_core::events::Event;
    use fridge_core::reducer::reduce;
    use fridge_core::state::DashboardModel;
    use fridge_core::state::MemoItem;
    use pretty_assertions::assert_eq;

    use super::*;

    const NOW: u64 = 1_700_000_000_000;

    fn fridge(rid: &str, title: &str) -> Reminder {
        Reminder::new(rid, title).with_category("fridge")
    }

    fn shop(rid: &str, title: &str) -> Reminder {
        Reminder::new(rid, title).with_category("shopping")
    }

    fn state(reminders: Vec<Reminder>, config: &Config) -> AppState {
        let model = DashboardModel {
            reminders,
            memos: vec![MemoItem {
                mid: "m1".to_string(),
                text: "Walk the dog".to_string(),
                author: "Dad".to_string(),
                timestamp_ms: NOW,
                is_new: false,
            }],
            ..DashboardModel::default()
        };
        AppState::new(model, config, NOW)
    }

    /// Frame without the clock header, which depends on the local zone.
    fn body(state: &mut AppState, config: &Config, rows: usize) -> Vec<String> {
        render_frame(state, config, rows, NOW).split_off(1)
    }

    fn focused_lines(lines: &[String]) -> Vec<&str> {
        lines
            .iter()
            .filter(|line| line.starts_with(FOCUS_MARK))
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn kitchen_draws_inventory_before_shopping_and_records_queue() {
        let config = Config::default();
        let mut state = state(
            vec![
                shop("s1", "Bread"),
                fridge("f1", "Milk").with_right("EXP: 3 DAYS"),
                shop("s2", "Eggs").completed(true),
            ],
            &config,
        );

        let lines = body(&mut state, &config, 24);

        assert_eq!(lines[2], "INVENTORY 1");
        assert_eq!(lines[3], format!("> {:<24} EXP: 3 DAYS", "Milk"));
        assert_eq!(lines[4], "SHOPPING 1");
        assert_eq!(lines[5], "  Bread");
        assert_eq!(lines.len(), 6);
        assert_eq!(
            state.ui.focus_queue,
            FocusQueueSnapshot::new("3:5", vec!["f1".to_string(), "s1".to_string()], 0)
        );
    }

    #[test]
    fn row_budget_truncates_and_bounds_focus() {
        let config = Config::default();
        let reminders = vec![
            fridge("f1", "Milk"),
            fridge("f2", "Pizza"),
            shop("s1", "Bread"),
            shop("s2", "Eggs"),
        ];
        let mut state = state(reminders, &config);
        let clock = ManualClock::new(NOW);

        body(&mut state, &config, KITCHEN_CHROME_ROWS + 2);
        assert_eq!(state.ui.focus_queue.rids, vec!["f1", "f2"]);

        for _ in 0..3 {
            reduce(&mut state, Event::rotate(1), &config, &clock);
            body(&mut state, &config, KITCHEN_CHROME_ROWS + 2);
        }
        assert_eq!(state.ui.routing.focused_index, 1);
    }

    #[test]
    fn left_panel_shows_timer_and_memo() {
        let config = Config::default();
        let mut state = state(vec![], &config);
        state.ui.widget.mode = WidgetMode::Timer;
        state.ui.widget.timer_seconds = 299;

        let lines = body(&mut state, &config, 24);

        assert_eq!(lines[0], "> [TIMER 04:59 (paused)]  Dad: Walk the dog (1/1)");
        assert_eq!(lines[1], "  no forecast");
    }

    #[test]
    fn new_memo_is_flagged() {
        let config = Config::default();
        let mut state = state(vec![], &config);
        state.model.memos[0].is_new = true;
        state.ui.widget.mode = WidgetMode::Timer;

        let lines = body(&mut state, &config, 24);

        assert_eq!(lines[0], "> [TIMER 00:00 (paused)]  NEW Dad: Walk the dog (1/1)");
    }

    #[test]
    fn no_room_for_tasks_keeps_click_on_left_panel() {
        let config = Config::default();
        let mut state = state(vec![fridge("f1", "Milk"), shop("s1", "Bread")], &config);
        let clock = ManualClock::new(NOW);

        let lines = body(&mut state, &config, KITCHEN_CHROME_ROWS);

        assert!(state.ui.focus_queue.is_empty());
        assert_eq!(lines[2..].to_vec(), vec!["INVENTORY 1", "SHOPPING 1"]);
        assert!(lines[0].starts_with(FOCUS_MARK));

        reduce(&mut state, Event::Click, &config, &clock);

        assert!(state.model.reminders.iter().all(|r| !r.completed));
        assert_eq!(state.screen(), Screen::Weather);
    }

    #[test]
    fn click_toggles_the_row_focus_landed_on_despite_repeated_ids() {
        let config = Config::default();
        let model = crate::loader::dashboard_from_value(
            &serde_json::json!({
                "tasks": [{ "id": "a", "text": "Eggs" }, { "id": "a", "text": "Bread" }]
            }),
            NOW,
        );
        let mut state = AppState::new(model, &config, NOW);
        let clock = ManualClock::new(NOW);

        body(&mut state, &config, 24);
        reduce(&mut state, Event::rotate(1), &config, &clock);
        let lines = body(&mut state, &config, 24);
        assert_eq!(focused_lines(&lines), vec!["> Bread"]);

        reduce(&mut state, Event::Click, &config, &clock);

        let done: Vec<(&str, bool)> = state
            .model
            .reminders
            .iter()
            .map(|r| (r.title.as_str(), r.completed))
            .collect();
        assert_eq!(done, vec![("Eggs", false), ("Bread", true)]);
    }

    #[test]
    fn idle_frame_has_no_highlight() {
        let config = Config::default();
        let mut state = state(vec![fridge("f1", "Milk")], &config);
        state.ui.presence.idle = true;

        let lines = render_frame(&mut state, &config, 24, NOW);

        assert!(lines[0].ends_with("zZ"));
        assert_eq!(focused_lines(&lines), Vec::<&str>::new());
    }

    #[test]
    fn classic_pages_follow_focus() {
        let config = Config {
            home_variant: HomeVariant::Classic,
            items_per_page: 2,
            ..Config::default()
        };
        let reminders = (0..5).map(|i| shop(&format!("s{i}"), &format!("Item {i}"))).collect();
        let mut state = state(reminders, &config);
        let clock = ManualClock::new(NOW);
        for _ in 0..2 {
            reduce(&mut state, Event::rotate(1), &config, &clock);
        }

        let lines = body(&mut state, &config, 24);

        assert_eq!(lines[2], "REMINDERS 5/5  page 2/3");
        assert_eq!(focused_lines(&lines), vec!["> [ ] Item 2"]);
        assert_eq!(lines.len(), 5);
        assert!(state.ui.focus_queue.is_empty());
    }

    #[test]
    fn menu_marks_focus_and_active_item() {
        let config = Config::default();
        let mut state = state(vec![], &config);
        let clock = ManualClock::new(NOW);
        reduce(&mut state, Event::Back, &config, &clock);
        state.ui.menu.active = Some(fridge_core::state::MenuItemId::Timer);

        let lines = body(&mut state, &config, 24);

        assert_eq!(
            lines,
            vec!["MENU", "  MEMO", "> LIST", "  TIMER *", "  CALENDAR", "  SETTINGS"]
        );
    }

    #[test]
    fn agenda_lists_events_then_tasks() {
        let config = Config::default();
        let mut state = state(vec![shop("s1", "Bread")], &config);
        state.model.calendar = vec![fridge_core::state::CalendarEvent {
            eid: "e0".to_string(),
            title: "Dinner".to_string(),
            when: "19:00".to_string(),
        }];
        state.ui.routing.screen = Screen::Calendar;
        state.ui.detail.calendar.mode = CalendarMode::Agenda;
        state.ui.detail.calendar.selected_index = 1;

        let lines = body(&mut state, &config, 24);

        assert_eq!(lines[1..].to_vec(), vec!["  19:00 Dinner", "> [ ] Bread"]);
    }

    #[test]
    fn voice_overlay_costs_a_task_row() {
        let config = Config::default();
        let mut state = state(vec![fridge("f1", "Milk"), shop("s1", "Bread")], &config);
        let clock = ManualClock::new(NOW);
        reduce(&mut state, Event::LongPress, &config, &clock);

        let lines = body(&mut state, &config, KITCHEN_CHROME_ROWS + 2);

        assert_eq!(lines.last().map(String::as_str), Some("(( listening... ))"));
        assert_eq!(state.ui.focus_queue.rids, vec!["f1"]);
    }
}
