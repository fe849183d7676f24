mod character_counter;
mod file_selector;
mod menu_toggle;
mod theme_toggle;

pub use character_counter::{CharacterCounter, DEFAULT_COUNTER_LIMIT};
pub use file_selector::{
    DEFAULT_MAX_FILE_SIZE, FileSelectionError, FileSelector, SelectedFile, format_size,
};
pub use menu_toggle::{
    MOBILE_BREAKPOINT_PX, MenuEffects, MenuEvent, MenuToggle, RESIZE_DEBOUNCE,
};
pub use theme_toggle::{ColorScheme, THEME_PREFERENCE_KEY, ThemeToggle};
