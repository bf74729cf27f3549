//! Application menus attached to windows.

use std::fmt;
use std::sync::Arc;

/// Label of the item that ends the application.
pub const QUIT_LABEL: &str = "Quit";

type Action = Arc<dyn Fn() + Send + Sync>;

/// One entry of a [`Menu`].
#[derive(Clone, Default)]
pub struct MenuItem {
    /// Text shown for the item.
    pub label: String,
    /// Whether the item only separates groups.
    pub is_separator: bool,
    /// Whether the item quits the application.
    pub is_quit: bool,
    action: Option<Action>,
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("label", &self.label)
            .field("is_separator", &self.is_separator)
            .field("is_quit", &self.is_quit)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

impl MenuItem {
    /// An item running `action` when activated.
    #[must_use]
    pub fn new(label: impl Into<String>, action: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            action: Some(Arc::new(action)),
            ..Self::default()
        }
    }

    /// An item without an action.
    #[must_use]
    pub fn inert(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// A separator line.
    #[must_use]
    pub fn separator() -> Self {
        Self {
            is_separator: true,
            ..Self::default()
        }
    }

    /// Whether an action is attached.
    #[must_use]
    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Replaces the action.
    pub fn set_action(&mut self, action: impl Fn() + Send + Sync + 'static) {
        self.action = Some(Arc::new(action));
    }

    /// Runs the action. Returns `false` when the item has none.
    pub fn activate(&self) -> bool {
        let Some(action) = &self.action else {
            return false;
        };
        action();
        true
    }
}

/// A titled list of items.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    /// Title shown in the menu bar.
    pub label: String,
    /// Items in display order.
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// Creates a menu.
    #[must_use]
    pub fn new(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            label: label.into(),
            items,
        }
    }

    /// Makes sure the menu ends with a quit item.
    ///
    /// A trailing item labelled [`QUIT_LABEL`] is promoted, otherwise a separator and a new quit
    /// item are appended. Quit items without an action receive `quit`.
    pub fn add_missing_quit(&mut self, quit: impl Fn() + Send + Sync + 'static) {
        let has_quit = match self.items.last_mut() {
            Some(last) => {
                if last.label == QUIT_LABEL {
                    last.is_quit = true;
                }
                last.is_quit
            }
            None => false,
        };
        if !has_quit {
            let mut item = MenuItem::inert(QUIT_LABEL);
            item.is_quit = true;
            self.items.push(MenuItem::separator());
            self.items.push(item);
        }

        let quit: Action = Arc::new(quit);
        for item in &mut self.items {
            if item.is_quit && item.action.is_none() {
                item.action = Some(quit.clone());
            }
        }
    }
}

/// The menus of a window, shown as a bar above its content.
#[derive(Debug, Clone, Default)]
pub struct MainMenu {
    /// Menus from left to right.
    pub items: Vec<Menu>,
}

impl MainMenu {
    /// Creates a main menu.
    #[must_use]
    pub const fn new(items: Vec<Menu>) -> Self {
        Self { items }
    }

    /// Titles of the menus.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.items.iter().map(|menu| menu.label.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn trailing_quit_label_is_promoted() {
        let mut menu = Menu::new("File", vec![MenuItem::inert("Open"), MenuItem::inert("Quit")]);
        menu.add_missing_quit(|| {});
        assert_eq!(menu.items.len(), 2);
        assert!(menu.items[1].is_quit);
        assert!(menu.items[1].has_action());
        assert!(!menu.items[0].has_action());
    }

    #[test]
    fn quit_is_appended_after_a_separator() {
        let mut menu = Menu::new("File", vec![MenuItem::inert("Open")]);
        menu.add_missing_quit(|| {});
        let labels: Vec<_> = menu.items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, vec!["Open", "", "Quit"]);
        assert!(menu.items[1].is_separator);

        let mut empty = Menu::new("Empty", Vec::new());
        empty.add_missing_quit(|| {});
        assert_eq!(empty.items.len(), 2);
    }

    #[test]
    fn existing_quit_action_is_kept() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut item = MenuItem::new("Quit", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        item.is_quit = true;
        let mut menu = Menu::new("File", vec![item]);
        menu.add_missing_quit(|| panic!("default quit must not replace a custom one"));
        assert!(menu.items[0].activate());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
