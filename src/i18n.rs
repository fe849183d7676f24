use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/folioform_i18n_generated.rs"));
}

#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub enum Locale {
    #[default]
    System,
    Tag(String),
}

impl From<String> for Locale {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("system") {
            return Self::System;
        }
        Self::Tag(value.trim().to_string())
    }
}

impl From<&str> for Locale {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

/// Message catalog shared by every widget on a page.
///
/// Catalog entries are compiled in from `locales/*.toml`. Lookups fall back
/// from the full tag (`de-AT`) to the bare language (`de`) and finally to the
/// default locale; a key missing everywhere renders as the key itself.
#[derive(Clone)]
pub struct I18nManager {
    catalog: Arc<I18nCatalog>,
    locale: Arc<RwLock<Locale>>,
}

impl Default for I18nManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for I18nManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18nManager")
            .field("locale", &self.locale())
            .field("resolved", &self.resolved_locale())
            .finish()
    }
}

impl I18nManager {
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(I18nCatalog::load()),
            locale: Arc::new(RwLock::new(Locale::System)),
        }
    }

    pub fn with_locale(locale: impl Into<Locale>) -> Self {
        let manager = Self::new();
        manager.set_locale(locale);
        manager
    }

    pub fn locale(&self) -> Locale {
        self.locale
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_locale(&self, locale: impl Into<Locale>) {
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = locale.into();
    }

    pub fn default_locale(&self) -> &'static str {
        self.catalog.default_locale
    }

    pub fn resolved_locale(&self) -> &'static str {
        self.catalog
            .resolve_locale(self.requested_locale().as_deref())
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    pub fn t(&self, key: &str) -> String {
        self.lookup(key).unwrap_or(key).to_string()
    }

    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        let raw = self.lookup(key).unwrap_or(key);
        if params.is_empty() {
            return raw.to_string();
        }
        format_template(raw, params)
    }

    fn requested_locale(&self) -> Option<String> {
        match self.locale() {
            Locale::System => system_locale(),
            Locale::Tag(tag) => Some(tag),
        }
    }

    fn lookup(&self, key: &str) -> Option<&'static str> {
        let resolved = self.resolved_locale();
        self.catalog
            .lookup(resolved, key)
            .or_else(|| self.catalog.lookup(self.catalog.default_locale, key))
    }
}

#[cfg(feature = "i18n")]
fn system_locale() -> Option<String> {
    sys_locale::get_locale()
}

#[cfg(not(feature = "i18n"))]
fn system_locale() -> Option<String> {
    None
}

/// Compiled-in messages keyed by locale tag (`en`, `de`).
struct I18nCatalog {
    default_locale: &'static str,
    locales: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nCatalog {
    fn load() -> Self {
        let locales = generated::LOCALES
            .iter()
            .map(|(locale, entries)| (*locale, entries.iter().copied().collect()))
            .collect();
        Self {
            default_locale: generated::DEFAULT_LOCALE,
            locales,
        }
    }

    /// Exact tag first, then the bare language, then the default locale.
    fn resolve_locale(&self, requested: Option<&str>) -> &'static str {
        let Some(requested) = requested.map(language_tag) else {
            return self.default_locale;
        };
        let language = requested.split('-').next().unwrap_or_default();
        [requested.as_str(), language]
            .into_iter()
            .find_map(|candidate| {
                self.locales
                    .keys()
                    .copied()
                    .find(|locale| language_tag(locale) == candidate)
            })
            .unwrap_or(self.default_locale)
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&'static str> {
        self.locales.get(locale)?.get(key).copied()
    }
}

/// Lower-cased BCP 47 style tag from a POSIX or browser locale string:
/// `de_AT.UTF-8@euro` becomes `de-at`.
fn language_tag(raw: &str) -> String {
    let end = raw.find(['.', '@']).unwrap_or(raw.len());
    raw[..end]
        .split(['_', '-'])
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.trim().to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Replaces `{name}` with its value. Unknown or unterminated placeholders are
/// left as written.
fn format_template(template: &str, params: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            rest = &rest[open..];
            break;
        };
        let name = &after[..close];
        match params.iter().find(|(param, _)| *param == name) {
            Some((_, value)) => output.push_str(value),
            None => output.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }
    output.push_str(rest);
    output
}
