use std::time::Duration;

pub const MOBILE_BREAKPOINT_PX: u32 = 768;
/// Quiet period the host waits after the last `resize` before sending
/// [`MenuEvent::Resized`].
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuEvent {
    ToggleClicked,
    /// A click landed outside both the toggle and the navigation menu.
    OutsideClicked,
    EscapePressed,
    /// Viewport width once resizing has settled. The host sends one event per
    /// burst, after [`RESIZE_DEBOUNCE`] without a further `resize`; the menu
    /// applies every event it receives.
    Resized { width: u32 },
}

/// Side effects the host has to carry out after an event.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MenuEffects {
    pub focus_toggle: bool,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MenuToggle {
    expanded: bool,
}

impl MenuToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: MenuEvent) -> MenuEffects {
        match event {
            MenuEvent::ToggleClicked => {
                self.expanded = !self.expanded;
                MenuEffects::default()
            }
            MenuEvent::OutsideClicked => {
                self.expanded = false;
                MenuEffects::default()
            }
            MenuEvent::EscapePressed if self.expanded => {
                self.expanded = false;
                MenuEffects { focus_toggle: true }
            }
            MenuEvent::EscapePressed => MenuEffects::default(),
            MenuEvent::Resized { width } => {
                if width > MOBILE_BREAKPOINT_PX {
                    self.expanded = false;
                }
                MenuEffects::default()
            }
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn aria_expanded(&self) -> &'static str {
        if self.expanded { "true" } else { "false" }
    }

    /// Class shared by the toggle button and the navigation menu.
    pub fn active_class(&self) -> Option<&'static str> {
        self.expanded.then_some("active")
    }

    pub fn body_class(&self) -> Option<&'static str> {
        self.expanded.then_some("menu-open")
    }

    /// The page behind an open menu must not scroll.
    pub fn locks_body_scroll(&self) -> bool {
        self.expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_and_derives_presentation() {
        let mut menu = MenuToggle::new();
        assert_eq!(menu.aria_expanded(), "false");

        menu.handle(MenuEvent::ToggleClicked);
        assert!(menu.is_expanded());
        assert_eq!(menu.aria_expanded(), "true");
        assert_eq!(menu.active_class(), Some("active"));
        assert_eq!(menu.body_class(), Some("menu-open"));
        assert!(menu.locks_body_scroll());

        menu.handle(MenuEvent::ToggleClicked);
        assert!(!menu.is_expanded());
        assert_eq!(menu.body_class(), None);
    }

    #[test]
    fn escape_closes_only_an_open_menu_and_returns_focus() {
        let mut menu = MenuToggle::new();
        assert_eq!(menu.handle(MenuEvent::EscapePressed), MenuEffects::default());

        menu.handle(MenuEvent::ToggleClicked);
        let effects = menu.handle(MenuEvent::EscapePressed);
        assert!(effects.focus_toggle);
        assert!(!menu.is_expanded());
    }

    #[test]
    fn outside_click_and_wide_resize_close() {
        let mut menu = MenuToggle::new();
        menu.handle(MenuEvent::ToggleClicked);
        menu.handle(MenuEvent::Resized { width: 600 });
        menu.handle(MenuEvent::Resized {
            width: MOBILE_BREAKPOINT_PX,
        });
        assert!(menu.is_expanded());
        menu.handle(MenuEvent::Resized { width: 1024 });
        assert!(!menu.is_expanded());

        menu.handle(MenuEvent::ToggleClicked);
        menu.handle(MenuEvent::OutsideClicked);
        assert!(!menu.is_expanded());
    }
}
