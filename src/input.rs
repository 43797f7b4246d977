use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use tracing::trace;

use sparselife::Coord;

use crate::events::AppEvent;
use crate::events::CameraEvent;
use crate::events::EngineEvent;
use crate::events::Event;

/// How many cells a single pan key press moves the camera
pub const PAN_STEP: Coord = 8;

fn pan(dx: Coord, dy: Coord) -> Option<Event> {
    Some(Event::AppEvent(AppEvent::CameraEvent(CameraEvent::Move {
        dx,
        dy,
    })))
}

/// Converts a crossterm event into a sparselife event
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    trace!(?event, "terminal event");

    match event {
        // only presses, some terminals also report releases
        CrossTermEvent::Key(KeyEvent {
            kind: KeyEventKind::Release,
            ..
        }) => None,

        CrossTermEvent::Key(key_event) => match key_event {
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('q'),
                ..
            } => Some(Event::AppEvent(AppEvent::Exit)),

            KeyEvent {
                code: KeyCode::Char(' '),
                ..
            } => Some(Event::EngineEvent(EngineEvent::TogglePause)),
            KeyEvent {
                code: KeyCode::Char('n'),
                ..
            } => Some(Event::EngineEvent(EngineEvent::Advance(1))),
            KeyEvent {
                code: KeyCode::Char('r'),
                ..
            } => Some(Event::EngineEvent(EngineEvent::Reset)),

            // movements
            KeyEvent {
                code: KeyCode::Char('h') | KeyCode::Left,
                ..
            } => pan(-PAN_STEP, 0),
            KeyEvent {
                code: KeyCode::Char('j') | KeyCode::Down,
                ..
            } => pan(0, PAN_STEP),
            KeyEvent {
                code: KeyCode::Char('k') | KeyCode::Up,
                ..
            } => pan(0, -PAN_STEP),
            KeyEvent {
                code: KeyCode::Char('l') | KeyCode::Right,
                ..
            } => pan(PAN_STEP, 0),
            KeyEvent {
                code: KeyCode::Char('0'),
                ..
            } => Some(Event::AppEvent(AppEvent::CameraEvent(CameraEvent::Recenter))),

            _ => None,
        },
        CrossTermEvent::Resize(cols, rows) => Some(Event::AppEvent(AppEvent::Resize { cols, rows })),
        _ => None,
    }
}
