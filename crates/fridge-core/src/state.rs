use serde::{Deserialize, Serialize};

use super::config::Config;
use super::kitchen_queue::{resolve_kitchen_queue, FocusQueueSnapshot};

/// Category tag that routes a reminder into the fridge bucket; anything else is shopping.
pub const FRIDGE_CATEGORY: &str = "fridge";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Stable identifier; focus follows it across reorders.
    pub rid: String,
    pub title: String,
    /// Right-side annotation (time or due text).
    pub right: String,
    pub completed: bool,
    pub category: String,
    pub created_at_ms: u64,
}

impl Reminder {
    pub fn new(rid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            rid: rid.into(),
            title: title.into(),
            right: String::new(),
            completed: false,
            category: "general".to_string(),
            created_at_ms: 0,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_right(mut self, right: impl Into<String>) -> Self {
        self.right = right.into();
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn is_fridge(&self) -> bool {
        self.category == FRIDGE_CATEGORY
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub dow: String,
    pub icon: String,
    pub hi: i32,
    pub lo: i32,
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub eid: String,
    pub title: String,
    pub when: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoItem {
    pub mid: String,
    pub text: String,
    pub author: String,
    pub timestamp_ms: u64,
    pub is_new: bool,
}

/// Domain data for the current frame.
///
/// `revision` moves whenever the reminder list changes shape (completion,
/// order, membership). Renderer snapshots record it so a queue rendered
/// from an older list is never trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardModel {
    pub location: String,
    pub battery: u8,
    pub reminders: Vec<Reminder>,
    pub weather: Vec<WeatherDay>,
    pub calendar: Vec<CalendarEvent>,
    pub memos: Vec<MemoItem>,
    pub revision: u64,
}

impl Default for DashboardModel {
    fn default() -> Self {
        Self {
            location: "New York".to_string(),
            battery: 84,
            reminders: Vec::new(),
            weather: Vec::new(),
            calendar: Vec::new(),
            memos: Vec::new(),
            revision: 0,
        }
    }
}

impl DashboardModel {
    pub fn reminder_index(&self, rid: &str) -> Option<usize> {
        self.reminders.iter().position(|r| r.rid == rid)
    }

    pub fn due_count(&self) -> usize {
        self.reminders.iter().filter(|r| !r.completed).count()
    }

    /// Flips completion of the reminder at `idx`. Out-of-range indices are ignored.
    pub fn toggle_completed(&mut self, idx: usize) -> bool {
        let Some(reminder) = self.reminders.get_mut(idx) else {
            return false;
        };
        reminder.completed = !reminder.completed;
        self.bump_revision();
        true
    }

    /// Stable sort: incomplete first, completed last, group order preserved.
    pub fn sort_completed_last(&mut self) {
        self.reminders.sort_by_key(|r| r.completed);
        self.bump_revision();
    }

    pub fn push_reminder(&mut self, reminder: Reminder) {
        self.reminders.push(reminder);
        self.bump_revision();
    }

    pub fn remove_reminder(&mut self, rid: &str) -> Option<Reminder> {
        let idx = self.reminder_index(rid)?;
        let removed = self.reminders.remove(idx);
        self.bump_revision();
        Some(removed)
    }

    pub fn replace_reminders(&mut self, reminders: Vec<Reminder>) {
        self.reminders = reminders;
        self.bump_revision();
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Home,
    Menu,
    Calendar,
    Weather,
    Placeholder,
}

impl Screen {
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Menu => "menu",
            Self::Calendar => "calendar",
            Self::Weather => "weather",
            Self::Placeholder => "placeholder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetMode {
    Clock,
    Timer,
}

impl WidgetMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Clock => "clock",
            Self::Timer => "timer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuItemId {
    Memo,
    List,
    Timer,
    Calendar,
    Settings,
}

pub const MENU_ORDER: [MenuItemId; 5] = [
    MenuItemId::Memo,
    MenuItemId::List,
    MenuItemId::Timer,
    MenuItemId::Calendar,
    MenuItemId::Settings,
];

impl MenuItemId {
    pub fn next(self) -> Self {
        match self {
            Self::Memo => Self::List,
            Self::List => Self::Timer,
            Self::Timer => Self::Calendar,
            Self::Calendar => Self::Settings,
            Self::Settings => Self::Memo,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Memo => Self::Settings,
            Self::List => Self::Memo,
            Self::Timer => Self::List,
            Self::Calendar => Self::Timer,
            Self::Settings => Self::Calendar,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Memo => "MEMO",
            Self::List => "LIST",
            Self::Timer => "TIMER",
            Self::Calendar => "CALENDAR",
            Self::Settings => "SETTINGS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarMode {
    Date,
    Agenda,
}

impl CalendarMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Agenda => "agenda",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Routing {
    pub screen: Screen,
    /// Position in the home focus queue. Renormalized against the current
    /// queue length before every use.
    pub focused_index: usize,
    /// 1-based page of the classic reminder list, derived from focus.
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuState {
    pub focused: MenuItemId,
    pub active: Option<MenuItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetSlot {
    pub mode: WidgetMode,
    pub timer_seconds: u64,
    pub timer_running: bool,
    /// Countdown origin; only advanced by whole seconds consumed.
    pub timer_last_tick_ms: u64,
}

impl WidgetSlot {
    pub fn cancel_timer(&mut self, now_ms: u64) {
        self.mode = WidgetMode::Clock;
        self.timer_running = false;
        self.timer_seconds = 0;
        self.timer_last_tick_ms = now_ms;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarNav {
    pub offset_days: i64,
    pub mode: CalendarMode,
    pub selected_index: usize,
}

impl CalendarNav {
    pub fn reset(&mut self) {
        self.offset_days = 0;
        self.mode = CalendarMode::Date;
        self.selected_index = 0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailNav {
    pub calendar: CalendarNav,
    pub weather_day_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoSelection {
    pub index: usize,
    /// Shared by auto-rotation and manual scrolling so they never double-fire.
    pub last_rotated_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presence {
    pub idle: bool,
    pub last_interaction_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VoiceOverlay {
    due_ms: Option<u64>,
}

impl VoiceOverlay {
    pub fn open(&mut self, due_ms: u64) {
        self.due_ms = Some(due_ms);
    }

    pub fn dismiss(&mut self) {
        self.due_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.due_ms.is_some()
    }

    pub fn due_ms(&self) -> Option<u64> {
        self.due_ms
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.due_ms.is_some_and(|due| now_ms >= due)
    }
}

/// Pending flag and due time live in one `Option` so they are always set and
/// cleared together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReorderSchedule {
    due_ms: Option<u64>,
}

impl ReorderSchedule {
    pub fn schedule(&mut self, due_ms: u64) {
        self.due_ms = Some(due_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.due_ms.is_some()
    }

    pub fn due_ms(&self) -> Option<u64> {
        self.due_ms
    }

    /// Clears the schedule and reports whether it was due at `now_ms`.
    pub fn take_due(&mut self, now_ms: u64) -> bool {
        match self.due_ms {
            Some(due) if now_ms >= due => {
                self.due_ms = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiState {
    pub routing: Routing,
    pub menu: MenuState,
    pub widget: WidgetSlot,
    pub detail: DetailNav,
    pub memo: MemoSelection,
    pub presence: Presence,
    pub voice: VoiceOverlay,
    pub reorder: ReorderSchedule,
    /// Written back by the renderer after every frame.
    pub focus_queue: FocusQueueSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppState {
    pub model: DashboardModel,
    pub ui: UiState,
}

/// Home focus slots ahead of the first task row.
pub const KITCHEN_PANEL_SLOTS: usize = 1;
pub const CLASSIC_CARD_SLOTS: usize = 2;

impl AppState {
    pub fn new(model: DashboardModel, config: &Config, now_ms: u64) -> Self {
        let focused_index = if config.is_kitchen() {
            if resolve_kitchen_queue(&model, config).is_empty() {
                0
            } else {
                KITCHEN_PANEL_SLOTS
            }
        } else if model.reminders.is_empty() {
            0
        } else {
            CLASSIC_CARD_SLOTS
        };

        Self {
            model,
            ui: UiState {
                routing: Routing {
                    screen: Screen::Home,
                    focused_index,
                    page: 1,
                },
                menu: MenuState {
                    focused: MenuItemId::List,
                    active: None,
                },
                widget: WidgetSlot {
                    mode: WidgetMode::Clock,
                    timer_seconds: 0,
                    timer_running: false,
                    timer_last_tick_ms: now_ms,
                },
                detail: DetailNav {
                    calendar: CalendarNav {
                        offset_days: 0,
                        mode: CalendarMode::Date,
                        selected_index: 0,
                    },
                    weather_day_index: 0,
                },
                memo: MemoSelection {
                    index: 0,
                    last_rotated_ms: now_ms,
                },
                presence: Presence {
                    idle: false,
                    last_interaction_ms: now_ms,
                },
                voice: VoiceOverlay::default(),
                reorder: ReorderSchedule::default(),
                focus_queue: FocusQueueSnapshot::default(),
            },
        }
    }

    /// Renderer write-back: the exact focusable rows drawn in the last frame.
    pub fn record_rendered_queue(&mut self, snapshot: FocusQueueSnapshot) {
        self.ui.focus_queue = snapshot;
    }

    pub fn screen(&self) -> Screen {
        self.ui.routing.screen
    }
}
