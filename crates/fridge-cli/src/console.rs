use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{cursor, execute, queue};
use log::debug;

use fridge_core::clock::{Clock, SystemClock};
use fridge_core::config::Config;
use fridge_core::events::Event;
use fridge_core::reducer::{reduce, DashboardEffect};
use fridge_core::state::AppState;

use crate::render::render_frame;

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    }
}

enum KeyOutcome {
    Dispatch(Event),
    Quit,
    Ignore,
}

/// Maps a terminal key to a dial/button event.
fn map_key(code: KeyCode, modifiers: KeyModifiers) -> KeyOutcome {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }
    match code {
        KeyCode::Char('q') => KeyOutcome::Quit,
        KeyCode::Right | KeyCode::Char('l') => KeyOutcome::Dispatch(Event::rotate(1)),
        KeyCode::Left | KeyCode::Char('h') => KeyOutcome::Dispatch(Event::rotate(-1)),
        KeyCode::Enter => KeyOutcome::Dispatch(Event::Click),
        KeyCode::Char(' ') => KeyOutcome::Dispatch(Event::LongPress),
        KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Esc => KeyOutcome::Dispatch(Event::Back),
        KeyCode::Char(']') => KeyOutcome::Dispatch(Event::memo(1)),
        KeyCode::Char('[') => KeyOutcome::Dispatch(Event::memo(-1)),
        _ => KeyOutcome::Ignore,
    }
}

pub fn run(mut state: AppState, config: &Config, tick_every: Duration) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
    let _guard = TerminalGuard;

    let clock = SystemClock;
    draw(&mut stdout, &mut state, config, clock.now_ms())?;
    let mut next_tick = Instant::now() + tick_every;

    loop {
        let timeout = next_tick.saturating_duration_since(Instant::now());
        let mut effects = Vec::new();

        if event::poll(timeout)? {
            match event::read()? {
                TermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                    match map_key(key.code, key.modifiers) {
                        KeyOutcome::Quit => return Ok(()),
                        KeyOutcome::Dispatch(ev) => {
                            debug!("input {}", ev.label());
                            effects.extend(reduce(&mut state, ev, config, &clock));
                        }
                        KeyOutcome::Ignore => {}
                    }
                }
                TermEvent::Resize(..) => effects.push(DashboardEffect::RequestFrame),
                _ => {}
            }
        }

        if Instant::now() >= next_tick {
            next_tick = Instant::now() + tick_every;
            effects.extend(reduce(&mut state, Event::Tick(clock.now_ms()), config, &clock));
        }

        let mut redraw = false;
        for effect in effects {
            match effect {
                DashboardEffect::RequestFrame => redraw = true,
                DashboardEffect::TimerFinished => {
                    stdout.write_all(b"\x07")?;
                }
            }
        }
        if redraw {
            draw(&mut stdout, &mut state, config, clock.now_ms())?;
        }
    }
}

fn draw(out: &mut impl Write, state: &mut AppState, config: &Config, now_ms: u64) -> io::Result<()> {
    let rows = terminal::size().map_or(24, |(_, rows)| usize::from(rows));
    let lines = render_frame(state, config, rows, now_ms);
    queue!(out, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
    for line in lines.iter().take(rows) {
        write!(out, "{line}\r\n")?;
    }
    out.flush()
}
