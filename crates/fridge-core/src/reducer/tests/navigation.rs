use super::*;
use pretty_assertions::assert_eq;

fn open_menu(state: &mut AppState, config: &Config, clock: &ManualClock) {
    dispatch(state, config, clock, Event::Back);
    assert_eq!(state.screen(), Screen::Menu);
}

fn pick(state: &mut AppState, config: &Config, clock: &ManualClock, item: MenuItemId) {
    open_menu(state, config, clock);
    while state.ui.menu.focused != item {
        dispatch(state, config, clock, Event::rotate(1));
    }
    dispatch(state, config, clock, Event::Click);
}

#[test]
fn menu_rotation_wraps_both_ways() {
    let config = kitchen();
    let mut state = state_with(vec![shop("s1")], &config);
    let clock = ManualClock::new(T0);
    open_menu(&mut state, &config, &clock);
    assert_eq!(state.ui.menu.focused, MenuItemId::List);

    let mut seen = Vec::new();
    for _ in 0..5 {
        dispatch(&mut state, &config, &clock, Event::rotate(1));
        seen.push(state.ui.menu.focused);
    }
    assert_eq!(
        seen,
        vec![
            MenuItemId::Timer,
            MenuItemId::Calendar,
            MenuItemId::Settings,
            MenuItemId::Memo,
            MenuItemId::List,
        ]
    );

    dispatch(&mut state, &config, &clock, Event::rotate(-1));
    assert_eq!(state.ui.menu.focused, MenuItemId::Memo);
}

#[test]
fn back_from_menu_and_detail_returns_home() {
    let config = classic();
    let mut state = state_with(vec![shop("s1"), shop("s2")], &config);
    let clock = ManualClock::new(T0);

    open_menu(&mut state, &config, &clock);
    dispatch(&mut state, &config, &clock, Event::Back);
    assert_eq!(state.screen(), Screen::Home);

    state.ui.routing.focused_index = 1;
    dispatch(&mut state, &config, &clock, Event::Click);
    assert_eq!(state.screen(), Screen::Weather);
    dispatch(&mut state, &config, &clock, Event::Back);
    assert_eq!(state.screen(), Screen::Home);
    assert_eq!(state.ui.routing.focused_index, 1);
}

#[test]
fn back_on_running_timer_cancels_it_and_stays_home() {
    let config = kitchen();
    let mut state = state_with(vec![fridge("f1"), shop("s1")], &config);
    state.ui.widget.mode = WidgetMode::Timer;
    state.ui.widget.timer_running = true;
    state.ui.widget.timer_seconds = 42;
    state.ui.routing.focused_index = 0;
    let clock = ManualClock::new(T0 + 10);

    dispatch(&mut state, &config, &clock, Event::Back);

    assert_eq!(state.ui.widget.mode, WidgetMode::Clock);
    assert!(!state.ui.widget.timer_running);
    assert_eq!(state.ui.widget.timer_seconds, 0);
    assert_eq!(state.screen(), Screen::Home);
}

#[test]
fn back_with_timer_but_task_focus_opens_menu() {
    let config = kitchen();
    let mut state = state_with(vec![fridge("f1")], &config);
    state.ui.widget.mode = WidgetMode::Timer;
    state.ui.widget.timer_seconds = 42;
    let clock = ManualClock::new(T0);
    assert_eq!(state.ui.routing.focused_index, 1);

    dispatch(&mut state, &config, &clock, Event::Back);

    assert_eq!(state.screen(), Screen::Menu);
    assert_eq!(state.ui.widget.mode, WidgetMode::Timer);
}

#[test]
fn back_while_listening_only_dismisses_overlay() {
    let config = kitchen();
    let mut state = state_with(vec![shop("s1")], &config);
    let clock = ManualClock::new(T0);
    dispatch(&mut state, &config, &clock, Event::LongPress);
    assert_eq!(state.ui.voice.due_ms(), Some(T0 + 2_000));

    dispatch(&mut state, &config, &clock, Event::Back);

    assert!(!state.ui.voice.is_active());
    assert_eq!(state.screen(), Screen::Home);
}

#[test]
fn menu_timer_arms_countdown_and_focuses_widget() {
    let config = Config {
        timer_default_s: 90,
        ..kitchen()
    };
    let mut state = state_with(vec![fridge("f1"), shop("s1")], &config);
    let clock = ManualClock::new(T0 + 500);

    pick(&mut state, &config, &clock, MenuItemId::Timer);

    assert_eq!(state.screen(), Screen::Home);
    assert_eq!(state.ui.routing.focused_index, 0);
    assert_eq!(state.ui.menu.active, Some(MenuItemId::Timer));
    assert_eq!(state.ui.widget.mode, WidgetMode::Timer);
    assert_eq!(state.ui.widget.timer_seconds, 90);
    assert!(state.ui.widget.timer_running);
    assert_eq!(state.ui.widget.timer_last_tick_ms, T0 + 500);
}

#[test]
fn timer_slot_click_pauses_and_resumes() {
    let config = kitchen();
    let mut state = state_with(vec![shop("s1")], &config);
    let clock = ManualClock::new(T0);
    pick(&mut state, &config, &clock, MenuItemId::Timer);

    clock.set(T0 + 3_000);
    dispatch(&mut state, &config, &clock, Event::Click);
    assert!(!state.ui.widget.timer_running);
    assert_eq!(state.screen(), Screen::Home);

    clock.set(T0 + 9_000);
    dispatch(&mut state, &config, &clock, Event::Click);
    assert!(state.ui.widget.timer_running);
    assert_eq!(state.ui.widget.timer_last_tick_ms, T0 + 9_000);
}

#[test]
fn menu_list_returns_home_with_focus_normalized() {
    let config = kitchen();
    let mut state = state_with(vec![fridge("f1"), shop("s1")], &config);
    let clock = ManualClock::new(T0);
    state.ui.routing.focused_index = 2;
    open_menu(&mut state, &config, &clock);
    state.model.remove_reminder("s1");

    dispatch(&mut state, &config, &clock, Event::Click);

    assert_eq!(state.screen(), Screen::Home);
    assert_eq!(state.ui.routing.focused_index, 0);
    assert_eq!(state.ui.menu.active, Some(MenuItemId::List));
}

#[test]
fn menu_calendar_opens_calendar() {
    let config = kitchen();
    let mut state = state_with(vec![], &config);
    let clock = ManualClock::new(T0);
    pick(&mut state, &config, &clock, MenuItemId::Calendar);
    assert_eq!(state.screen(), Screen::Calendar);
    assert_eq!(focus_target(&state, &config), FocusTarget::CalendarDate);
}

#[test]
fn memo_and_settings_open_placeholder() {
    let config = kitchen();
    let clock = ManualClock::new(T0);
    for item in [MenuItemId::Memo, MenuItemId::Settings] {
        let mut state = state_with(vec![shop("s1")], &config);
        pick(&mut state, &config, &clock, item);
        assert_eq!(state.screen(), Screen::Placeholder);
        assert_eq!(state.ui.menu.active, Some(item));

        dispatch(&mut state, &config, &clock, Event::rotate(1));
        dispatch(&mut state, &config, &clock, Event::Click);
        assert_eq!(state.screen(), Screen::Placeholder);

        dispatch(&mut state, &config, &clock, Event::Back);
        assert_eq!(state.screen(), Screen::Home);
    }
}

#[test]
fn kitchen_left_panel_click_opens_weather() {
    let config = kitchen();
    let mut state = state_with(vec![shop("s1")], &config);
    state.model.weather = weather_days(4);
    state.ui.detail.weather_day_index = 3;
    state.ui.routing.focused_index = 0;
    let clock = ManualClock::new(T0);

    dispatch(&mut state, &config, &clock, Event::Click);

    assert_eq!(state.screen(), Screen::Weather);
    assert_eq!(state.ui.detail.weather_day_index, 0);
}

#[test]
fn classic_clock_card_opens_reset_calendar() {
    let config = classic();
    let mut state = state_with(vec![shop("s1")], &config);
    state.ui.detail.calendar.offset_days = 4;
    state.ui.detail.calendar.mode = CalendarMode::Agenda;
    state.ui.routing.focused_index = 0;
    let clock = ManualClock::new(T0);

    dispatch(&mut state, &config, &clock, Event::Click);

    assert_eq!(state.screen(), Screen::Calendar);
    assert_eq!(state.ui.detail.calendar.offset_days, 0);
    assert_eq!(state.ui.detail.calendar.mode, CalendarMode::Date);
}

#[test]
fn classic_rotation_derives_page() {
    let config = Config {
        items_per_page: 2,
        ..classic()
    };
    let reminders = (0..5).map(|i| shop(&format!("s{i}"))).collect();
    let mut state = state_with(reminders, &config);
    let clock = ManualClock::new(T0);
    assert_eq!(state.ui.routing.focused_index, 2);

    let mut pages = Vec::new();
    for _ in 0..6 {
        dispatch(&mut state, &config, &clock, Event::rotate(1));
        pages.push((state.ui.routing.focused_index, state.ui.routing.page));
    }
    assert_eq!(
        pages,
        vec![(3, 1), (4, 2), (5, 2), (6, 3), (0, 1), (1, 1)]
    );
}

#[test]
fn classic_task_click_toggles_by_focus_offset() {
    let config = classic();
    let mut state = state_with(vec![shop("s1"), shop("s2")], &config);
    state.ui.routing.focused_index = 3;
    let clock = ManualClock::new(T0);

    dispatch(&mut state, &config, &clock, Event::Click);

    assert!(!state.model.reminders[0].completed);
    assert!(state.model.reminders[1].completed);
    assert_eq!(state.ui.reorder.due_ms(), Some(T0 + 2_000));
}

#[test]
fn memo_delta_scrolls_only_from_left_panel() {
    let config = kitchen();
    let mut state = state_with(vec![shop("s1")], &config);
    state.model.memos = vec![memo("m1"), memo("m2"), memo("m3")];
    let clock = ManualClock::new(T0 + 1_000);

    dispatch(&mut state, &config, &clock, Event::memo(1));
    assert_eq!(state.ui.memo.index, 0);

    state.ui.routing.focused_index = 0;
    dispatch(&mut state, &config, &clock, Event::memo(-1));
    assert_eq!(state.ui.memo.index, 2);
    assert_eq!(state.ui.memo.last_rotated_ms, T0 + 1_000);
    dispatch(&mut state, &config, &clock, Event::memo(1));
    assert_eq!(state.ui.memo.index, 0);
}

#[test]
fn memo_delta_ignored_on_classic_home() {
    let config = classic();
    let mut state = state_with(vec![], &config);
    state.model.memos = vec![memo("m1"), memo("m2")];
    let clock = ManualClock::new(T0);

    dispatch(&mut state, &config, &clock, Event::memo(1));

    assert_eq!(state.ui.memo.index, 0);
}

#[test]
fn replay_stamps_events_with_step_time() {
    let config = kitchen();
    let mut state = state_with(vec![fridge("f1"), shop("s1")], &config);

    let effects = replay(
        &mut state,
        [(T0 + 100, Event::Click), (T0 + 2_100, Event::Tick(T0 + 2_100))],
        &config,
    );

    assert_eq!(
        effects,
        vec![DashboardEffect::RequestFrame, DashboardEffect::RequestFrame]
    );
    assert_eq!(rids(&state), vec!["s1", "f1"]);
    assert_eq!(state.ui.presence.last_interaction_ms, T0 + 100);
}

#[test]
fn replay_with_sees_state_after_each_step() {
    let config = kitchen();
    let mut state = state_with(vec![fridge("f1"), shop("s1")], &config);
    let mut seen = Vec::new();

    replay_with(
        &mut state,
        [(T0, Event::rotate(1)), (T0 + 500, Event::Click)],
        &config,
        |state, at_ms, effects| {
            seen.push((at_ms, state.ui.routing.focused_index, effects.to_vec()));
        },
    );

    assert_eq!(
        seen,
        vec![
            (T0, 2, vec![DashboardEffect::RequestFrame]),
            (T0 + 500, 0, vec![DashboardEffect::RequestFrame]),
        ]
    );
    assert!(state.model.reminders[1].completed);
}
