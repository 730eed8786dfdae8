//! What the renderer should highlight, derived without re-deriving navigation.

use serde::Serialize;

use super::config::Config;
use super::kitchen_queue::kitchen_visible_task_indices;
use super::state::{
    AppState, CalendarMode, MenuItemId, Screen, CLASSIC_CARD_SLOTS, KITCHEN_PANEL_SLOTS,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FocusTarget {
    None,
    LeftPanel,
    Clock,
    Weather,
    Task { index: usize, rid: String },
    MenuItem { item: MenuItemId },
    CalendarDate,
    AgendaRow { index: usize },
    WeatherDay { index: usize },
}

/// Length of the home focus queue for the configured layout, slots included.
pub fn home_queue_len(state: &AppState, config: &Config) -> usize {
    if config.is_kitchen() {
        KITCHEN_PANEL_SLOTS + kitchen_visible_task_indices(state, config).len()
    } else {
        CLASSIC_CARD_SLOTS + state.model.reminders.len()
    }
}

pub fn focus_target(state: &AppState, config: &Config) -> FocusTarget {
    let ui = &state.ui;
    match ui.routing.screen {
        Screen::Home => {
            if ui.presence.idle {
                FocusTarget::None
            } else {
                home_focus_target(state, config)
            }
        }
        Screen::Menu => FocusTarget::MenuItem {
            item: ui.menu.focused,
        },
        Screen::Calendar => match ui.detail.calendar.mode {
            CalendarMode::Date => FocusTarget::CalendarDate,
            CalendarMode::Agenda => FocusTarget::AgendaRow {
                index: ui.detail.calendar.selected_index,
            },
        },
        Screen::Weather => FocusTarget::WeatherDay {
            index: ui.detail.weather_day_index,
        },
        Screen::Placeholder => FocusTarget::None,
    }
}

/// Reminder id under home focus; empty when focus sits on a card or panel.
pub fn focused_rid(state: &AppState, config: &Config) -> String {
    match home_focus_target(state, config) {
        FocusTarget::Task { rid, .. } => rid,
        _ => String::new(),
    }
}

fn home_focus_target(state: &AppState, config: &Config) -> FocusTarget {
    let focused = state.ui.routing.focused_index;
    let task_index = if config.is_kitchen() {
        let queue = kitchen_visible_task_indices(state, config);
        let position = focused % (KITCHEN_PANEL_SLOTS + queue.len());
        if position < KITCHEN_PANEL_SLOTS {
            return FocusTarget::LeftPanel;
        }
        queue[position - KITCHEN_PANEL_SLOTS]
    } else {
        let position = focused % (CLASSIC_CARD_SLOTS + state.model.reminders.len());
        match position {
            0 => return FocusTarget::Clock,
            1 => return FocusTarget::Weather,
            _ => position - CLASSIC_CARD_SLOTS,
        }
    };

    match state.model.reminders.get(task_index) {
        Some(reminder) => FocusTarget::Task {
            index: task_index,
            rid: reminder.rid.clone(),
        },
        None => FocusTarget::None,
    }
}
