use tracing::warn;

use crate::i18n::I18nManager;
use crate::preference::PreferenceStore;

pub const THEME_PREFERENCE_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Light => "\u{2600}",
            Self::Dark => "\u{1F319}",
        }
    }
}

/// Owns the page colour scheme and persists it through a [`PreferenceStore`].
pub struct ThemeToggle<S> {
    store: S,
    scheme: ColorScheme,
    announcement: Option<String>,
}

impl<S> ThemeToggle<S>
where
    S: PreferenceStore,
{
    /// Restores the stored scheme. A missing, unknown or unreadable value
    /// starts in light mode.
    pub fn init(store: S) -> Self {
        let scheme = match store.get(THEME_PREFERENCE_KEY) {
            Ok(stored) => stored
                .as_deref()
                .and_then(ColorScheme::parse)
                .unwrap_or_default(),
            Err(error) => {
                warn!(%error, "failed to read stored theme");
                ColorScheme::default()
            }
        };
        Self {
            store,
            scheme,
            announcement: None,
        }
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    /// Value for the root element's `data-theme` attribute.
    pub fn data_theme(&self) -> &'static str {
        self.scheme.as_str()
    }

    pub fn icon(&self) -> &'static str {
        self.scheme.icon()
    }

    pub fn toggle(&mut self, i18n: &I18nManager) -> ColorScheme {
        self.scheme = self.scheme.toggled();
        if let Err(error) = self.store.set(THEME_PREFERENCE_KEY, self.scheme.as_str()) {
            warn!(%error, "failed to persist theme");
        }
        let theme_name = i18n.t(&format!("theme.{}", self.scheme.as_str()));
        self.announcement = Some(i18n.t_with("theme.changed", &[("theme", &theme_name)]));
        self.scheme
    }

    /// Screen-reader announcement queued by the last toggle, if not yet shown.
    pub fn take_announcement(&mut self) -> Option<String> {
        self.announcement.take()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
