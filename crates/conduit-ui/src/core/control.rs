//! Controlled versus uncontrolled value resolution.
//!
//! # Design
//! - A controlled value is never written locally; every mutation goes through
//!   the owner's change handler.
//! - An uncontrolled value lives in a shared cell owned by the component
//!   instance. An optional notifier lets the view layer schedule a re-render.
//! - Mode switches are detected by [`ModeTracker`] and reported; the mode of
//!   the latest render wins.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Change handler invoked with the requested value.
pub type ChangeHandler<T> = Rc<dyn Fn(T)>;

/// Whether a value is owned by the caller or by the component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMode {
    /// The caller supplies the value.
    Controlled,
    /// The component keeps the value internally.
    Uncontrolled,
}

/// A single `{ value, set }` pair resolved from the two ownership modes.
pub enum Controllable<T> {
    /// Value supplied externally.
    Controlled {
        /// External value shown by the component.
        value: T,
        /// Handler receiving requested changes; `None` makes `set` a no-op.
        on_change: Option<ChangeHandler<T>>,
    },
    /// Value held by the component instance.
    Uncontrolled {
        /// Internal cell holding the truth.
        cell: Rc<RefCell<T>>,
        /// Invoked after each internal write.
        notify: Option<Rc<dyn Fn()>>,
    },
}

impl<T: Clone> Controllable<T> {
    /// Controlled value with an optional change handler.
    #[must_use]
    pub fn controlled(value: T, on_change: Option<ChangeHandler<T>>) -> Self {
        Self::Controlled { value, on_change }
    }

    /// Uncontrolled value seeded with `initial`.
    #[must_use]
    pub fn uncontrolled(initial: T) -> Self {
        Self::Uncontrolled {
            cell: Rc::new(RefCell::new(initial)),
            notify: None,
        }
    }

    /// Pick the mode for one render: external value when present, else the
    /// instance-owned cell.
    #[must_use]
    pub fn resolve(
        external: Option<T>,
        on_change: Option<ChangeHandler<T>>,
        cell: &Rc<RefCell<T>>,
        notify: Option<Rc<dyn Fn()>>,
    ) -> Self {
        match external {
            Some(value) => Self::Controlled { value, on_change },
            None => Self::Uncontrolled {
                cell: Rc::clone(cell),
                notify,
            },
        }
    }

    /// Current ownership mode.
    #[must_use]
    pub const fn mode(&self) -> ControlMode {
        match self {
            Self::Controlled { .. } => ControlMode::Controlled,
            Self::Uncontrolled { .. } => ControlMode::Uncontrolled,
        }
    }

    /// Value to display.
    #[must_use]
    pub fn value(&self) -> T {
        match self {
            Self::Controlled { value, .. } => value.clone(),
            Self::Uncontrolled { cell, .. } => cell.borrow().clone(),
        }
    }

    /// Request a new value.
    pub fn set(&self, next: T) {
        match self {
            Self::Controlled { on_change, .. } => {
                if let Some(handler) = on_change {
                    handler(next);
                }
            }
            Self::Uncontrolled { cell, notify } => {
                *cell.borrow_mut() = next;
                if let Some(notify) = notify {
                    notify();
                }
            }
        }
    }

    /// Request a value derived from the current one.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.value());
        self.set(next);
    }
}

impl<T: Clone> Clone for Controllable<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Controlled { value, on_change } => Self::Controlled {
                value: value.clone(),
                on_change: on_change.clone(),
            },
            Self::Uncontrolled { cell, notify } => Self::Uncontrolled {
                cell: Rc::clone(cell),
                notify: notify.clone(),
            },
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Controllable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Controlled { value, on_change } => f
                .debug_struct("Controlled")
                .field("value", value)
                .field("has_handler", &on_change.is_some())
                .finish(),
            Self::Uncontrolled { cell, .. } => {
                f.debug_tuple("Uncontrolled").field(&*cell.borrow()).finish()
            }
        }
    }
}

/// A change of ownership mode between two renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeSwitch {
    /// Mode of the previous render.
    pub from: ControlMode,
    /// Mode of the current render.
    pub to: ControlMode,
}

/// Remembers the mode of the previous render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeTracker {
    last: Option<ControlMode>,
}

impl ModeTracker {
    /// Record the mode of this render, reporting a switch when it changed.
    pub fn observe(&mut self, mode: ControlMode) -> Option<ModeSwitch> {
        let previous = self.last.replace(mode)?;
        (previous != mode).then_some(ModeSwitch {
            from: previous,
            to: mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn controlled_value_never_self_overrides() {
        let requested = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&requested);
        let open = Controllable::controlled(
            false,
            Some(Rc::new(move |value| sink.borrow_mut().push(value)) as ChangeHandler<bool>),
        );
        open.set(true);
        open.update(|value| !value);
        assert!(!open.value());
        assert_eq!(*requested.borrow(), vec![true, true]);
        assert_eq!(open.mode(), ControlMode::Controlled);
    }

    #[test]
    fn controlled_without_handler_ignores_writes() {
        let open = Controllable::controlled(true, None);
        open.set(false);
        assert!(open.value());
    }

    #[test]
    fn uncontrolled_toggle_is_idempotent_in_pairs() {
        let open = Controllable::uncontrolled(false);
        open.update(|value| !value);
        assert!(open.value());
        open.update(|value| !value);
        assert!(!open.value());
    }

    #[test]
    fn uncontrolled_writes_notify_the_view() {
        let renders = Rc::new(Cell::new(0));
        let counter = Rc::clone(&renders);
        let cell = Rc::new(RefCell::new(None::<String>));
        let value = Controllable::resolve(
            None,
            None,
            &cell,
            Some(Rc::new(move || counter.set(counter.get() + 1))),
        );
        value.set(Some("dark".to_string()));
        assert_eq!(renders.get(), 1);
        assert_eq!(cell.borrow().as_deref(), Some("dark"));
    }

    #[test]
    fn tracker_reports_mode_switch_once() {
        let mut tracker = ModeTracker::default();
        assert_eq!(tracker.observe(ControlMode::Uncontrolled), None);
        assert_eq!(tracker.observe(ControlMode::Uncontrolled), None);
        assert_eq!(
            tracker.observe(ControlMode::Controlled),
            Some(ModeSwitch {
                from: ControlMode::Uncontrolled,
                to: ControlMode::Controlled,
            })
        );
        assert_eq!(tracker.observe(ControlMode::Controlled), None);
    }
}
