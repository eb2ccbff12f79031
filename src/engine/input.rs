//! Edge-triggered input state.
//!
//! Raw DOM events only stage a pending state; `update` promotes
//! pending -> current -> previous exactly once per tick, so "just pressed"
//! and "just released" stay stable for the whole tick no matter when the
//! browser delivered the event. Keys must be registered to be tracked;
//! mouse buttons and mouse x are registered automatically.

use crate::browser;
use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use web_sys::{KeyboardEvent, MouseEvent};

pub const MOUSE_LEFT: &str = "mouseLeft";
pub const MOUSE_MIDDLE: &str = "mouseMiddle";
pub const MOUSE_RIGHT: &str = "mouseRight";

#[derive(Debug, Default, Clone, Copy)]
struct KeyEntry {
    cur: bool,
    prev: bool,
    pending: bool,
}

#[derive(Debug, Default)]
pub struct KeyState {
    entries: HashMap<String, KeyEntry>,
    cur_mouse_x: i32,
    pending_mouse_x: i32,
}

impl KeyState {
    pub fn new() -> Self {
        let mut state = KeyState::default();
        state.register(MOUSE_LEFT);
        state.register(MOUSE_MIDDLE);
        state.register(MOUSE_RIGHT);
        state
    }

    pub fn register(&mut self, name: &str) {
        self.entries.insert(name.to_string(), KeyEntry::default());
    }

    /// Stage a state change from an event handler. Unregistered names are
    /// dropped; nothing becomes visible to queries until the next `update`.
    pub fn set_pending(&mut self, name: &str, down: bool) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.pending = down;
        }
    }

    pub fn set_pending_mouse_x(&mut self, x: i32) {
        self.pending_mouse_x = x;
    }

    /// Advance the double buffer. Called once per tick, before game logic
    /// reads any of the queries below.
    pub fn update(&mut self) {
        for entry in self.entries.values_mut() {
            entry.prev = entry.cur;
            entry.cur = entry.pending;
        }
        self.cur_mouse_x = self.pending_mouse_x;
    }

    pub fn is_pressed(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|entry| entry.cur)
    }

    pub fn was_pressed(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|entry| entry.prev)
    }

    pub fn just_pressed(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .is_some_and(|entry| entry.cur && !entry.prev)
    }

    pub fn just_released(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .is_some_and(|entry| entry.prev && !entry.cur)
    }

    pub fn mouse_x(&self) -> i32 {
        self.cur_mouse_x
    }
}

pub type SharedInput = Rc<RefCell<KeyState>>;

pub fn new_shared_input() -> SharedInput {
    Rc::new(RefCell::new(KeyState::new()))
}

/// Wire the DOM event sources into the shared state. The listeners live for
/// the page, so their closures are forgotten rather than dropped.
pub fn attach_input(input: &SharedInput) -> Result<()> {
    let state = input.clone();
    let keydown = browser::closure_wrap(Box::new(move |event: KeyboardEvent| {
        state.borrow_mut().set_pending(&event.key(), true);
    }) as Box<dyn FnMut(KeyboardEvent)>);
    browser::add_document_listener("keydown", &keydown)?;
    keydown.forget();

    let state = input.clone();
    let keyup = browser::closure_wrap(Box::new(move |event: KeyboardEvent| {
        state.borrow_mut().set_pending(&event.key(), false);
    }) as Box<dyn FnMut(KeyboardEvent)>);
    browser::add_document_listener("keyup", &keyup)?;
    keyup.forget();

    let state = input.clone();
    let mousemove = browser::closure_wrap(Box::new(move |event: MouseEvent| {
        state.borrow_mut().set_pending_mouse_x(event.client_x());
    }) as Box<dyn FnMut(MouseEvent)>);
    browser::add_document_listener("mousemove", &mousemove)?;
    mousemove.forget();

    let state = input.clone();
    let mousedown = browser::closure_wrap(Box::new(move |event: MouseEvent| {
        if let Some(name) = button_name(event.button()) {
            state.borrow_mut().set_pending(name, true);
        }
    }) as Box<dyn FnMut(MouseEvent)>);
    browser::add_document_listener("mousedown", &mousedown)?;
    mousedown.forget();

    let state = input.clone();
    let mouseup = browser::closure_wrap(Box::new(move |event: MouseEvent| {
        if let Some(name) = button_name(event.button()) {
            state.borrow_mut().set_pending(name, false);
        }
    }) as Box<dyn FnMut(MouseEvent)>);
    browser::add_document_listener("mouseup", &mouseup)?;
    mouseup.forget();

    Ok(())
}

fn button_name(button: i16) -> Option<&'static str> {
    match button {
        0 => Some(MOUSE_LEFT),
        1 => Some(MOUSE_MIDDLE),
        2 => Some(MOUSE_RIGHT),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_becomes_visible_only_after_update() {
        let mut state = KeyState::new();
        state.register("ArrowLeft");
        state.set_pending("ArrowLeft", true);
        assert!(!state.is_pressed("ArrowLeft"));

        state.update();
        assert!(state.is_pressed("ArrowLeft"));
    }

    #[test]
    fn just_pressed_fires_for_one_tick() {
        let mut state = KeyState::new();
        state.register("Space");
        state.set_pending("Space", true);

        state.update();
        assert!(state.just_pressed("Space"));
        assert!(!state.was_pressed("Space"));

        // Key held: still pressed, no longer an edge.
        state.update();
        assert!(state.is_pressed("Space"));
        assert!(state.was_pressed("Space"));
        assert!(!state.just_pressed("Space"));
    }

    #[test]
    fn just_released_fires_for_one_tick() {
        let mut state = KeyState::new();
        state.register("d");
        state.set_pending("d", true);
        state.update();

        state.set_pending("d", false);
        state.update();
        assert!(state.just_released("d"));
        assert!(!state.is_pressed("d"));

        state.update();
        assert!(!state.just_released("d"));
    }

    #[test]
    fn unregistered_names_are_ignored() {
        let mut state = KeyState::new();
        state.set_pending("ArrowUp", true);
        state.update();
        assert!(!state.is_pressed("ArrowUp"));
        assert!(!state.just_pressed("ArrowUp"));
    }

    #[test]
    fn mouse_buttons_are_registered_by_default() {
        let mut state = KeyState::new();
        state.set_pending(MOUSE_LEFT, true);
        state.update();
        assert!(state.is_pressed(MOUSE_LEFT));
        assert!(!state.is_pressed(MOUSE_RIGHT));
    }

    #[test]
    fn mouse_x_follows_the_tick_boundary() {
        let mut state = KeyState::new();
        state.set_pending_mouse_x(42);
        assert_eq!(state.mouse_x(), 0);
        state.update();
        assert_eq!(state.mouse_x(), 42);
    }
}
