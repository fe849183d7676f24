use tracing::{info, warn};

use crate::components::{CharacterCounter, FileSelector, MenuToggle, ThemeToggle};
use crate::form::{
    FieldKey, FieldKind, FormController, FormDecl, FormOptions, FormResult, FormSchema,
};
use crate::i18n::I18nManager;
use crate::preference::PreferenceStore;

/// The rendered page as seen at load time.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PageDecl {
    pub forms: Vec<FormDecl>,
}

impl PageDecl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(mut self, form: FormDecl) -> Self {
        self.forms.push(form);
        self
    }
}

/// Behaviors attached to one `<form>`.
#[derive(Debug)]
pub struct PageForm {
    /// Present only when the form opted into validation and attached cleanly.
    pub controller: Option<FormController>,
    pub counters: Vec<(FieldKey, CharacterCounter)>,
    pub file_selectors: Vec<(FieldKey, FileSelector)>,
}

impl PageForm {
    /// A form whose controller cannot attach keeps its counters and file
    /// inputs; only validation is skipped.
    fn attach(decl: &FormDecl, i18n: &I18nManager) -> Self {
        let schema = FormSchema::from_decl(decl);

        let counters = schema
            .fields
            .iter()
            .filter(|spec| spec.counter && spec.constraints.kind == FieldKind::Textarea)
            .map(|spec| {
                let mut counter = CharacterCounter::for_field(&spec.constraints);
                counter.update(&spec.initial);
                (spec.key.clone(), counter)
            })
            .collect();
        let file_selectors = schema
            .fields
            .iter()
            .filter(|spec| spec.constraints.kind == FieldKind::File)
            .map(|spec| (spec.key.clone(), FileSelector::new()))
            .collect();

        let dom_id = schema.id.clone();
        let controller = if schema.opted_in {
            match FormController::with_i18n(schema, FormOptions::default(), i18n.clone()) {
                Ok(controller) => Some(controller),
                Err(error) => {
                    warn!(form = ?dom_id, %error, "skipping validation for form");
                    None
                }
            }
        } else {
            None
        };

        Self {
            controller,
            counters,
            file_selectors,
        }
    }

    pub fn counter(&self, key: &FieldKey) -> Option<&CharacterCounter> {
        self.counters
            .iter()
            .find(|(field, _)| field == key)
            .map(|(_, counter)| counter)
    }

    pub fn file_selector_mut(&mut self, key: &FieldKey) -> Option<&mut FileSelector> {
        self.file_selectors
            .iter_mut()
            .find(|(field, _)| field == key)
            .map(|(_, selector)| selector)
    }

    /// Routes an `input` event to the form's controller and to the field's
    /// counter, whichever exist.
    pub fn input(&mut self, key: &FieldKey, value: &str) -> FormResult<()> {
        if let Some((_, counter)) = self.counters.iter_mut().find(|(field, _)| field == key) {
            counter.update(value);
        }
        match &self.controller {
            Some(controller) => controller.input(key, value),
            None => Ok(()),
        }
    }
}

/// Every behavior wired up for one page load.
pub struct Page<S> {
    pub forms: Vec<PageForm>,
    pub theme: ThemeToggle<S>,
    pub menu: MenuToggle,
    i18n: I18nManager,
}

impl<S> Page<S>
where
    S: PreferenceStore,
{
    pub fn init(decl: &PageDecl, store: S, i18n: I18nManager) -> Self {
        let forms = decl
            .forms
            .iter()
            .map(|form| PageForm::attach(form, &i18n))
            .collect::<Vec<_>>();
        let theme = ThemeToggle::init(store);

        info!(
            forms = forms.len(),
            validated = forms.iter().filter(|form| form.controller.is_some()).count(),
            counters = forms.iter().map(|form| form.counters.len()).sum::<usize>(),
            file_inputs = forms.iter().map(|form| form.file_selectors.len()).sum::<usize>(),
            theme = theme.data_theme(),
            "page initialized"
        );

        Self {
            forms,
            theme,
            menu: MenuToggle::new(),
            i18n,
        }
    }

    pub fn i18n(&self) -> &I18nManager {
        &self.i18n
    }

    pub fn controllers(&self) -> impl Iterator<Item = &FormController> {
        self.forms.iter().filter_map(|form| form.controller.as_ref())
    }

    pub fn toggle_theme(&mut self) {
        self.theme.toggle(&self.i18n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ColorScheme, SelectedFile};
    use crate::form::ElementDecl;
    use crate::preference::InMemoryPreferenceStore;

    fn contact_page() -> PageDecl {
        PageDecl::new()
            .form(
                FormDecl::new()
                    .attr("id", "contact")
                    .attr("data-validate", "")
                    .element(ElementDecl::input("text", "name").flag("required"))
                    .element(
                        ElementDecl::new("textarea")
                            .attr("name", "message")
                            .attr("maxlength", "20")
                            .flag("data-counter")
                            .text("hi"),
                    )
                    .element(ElementDecl::input("file", "attachment"))
                    .element(ElementDecl::new("button").text("Send")),
            )
            .form(
                FormDecl::new()
                    .element(ElementDecl::input("search", "q"))
                    .element(
                        ElementDecl::new("textarea")
                            .attr("name", "notes")
                            .flag("data-counter"),
                    ),
            )
    }

    #[test]
    fn attaches_behaviors_from_markup() {
        let store = InMemoryPreferenceStore::new();
        store.set("theme", "dark").expect("seed");
        let page = Page::init(&contact_page(), store, I18nManager::with_locale("en"));

        assert_eq!(page.forms.len(), 2);
        assert_eq!(page.controllers().count(), 1);
        assert_eq!(page.theme.scheme(), ColorScheme::Dark);
        assert!(!page.menu.is_expanded());

        let contact = &page.forms[0];
        let counter = contact
            .counter(&FieldKey::new("message"))
            .expect("message counter");
        assert_eq!(counter.label(), "2 / 20");
        assert_eq!(contact.file_selectors.len(), 1);

        let other = &page.forms[1];
        assert!(other.controller.is_none());
        assert_eq!(
            other
                .counter(&FieldKey::new("notes"))
                .expect("notes counter")
                .max_length(),
            500
        );
    }

    #[test]
    fn input_updates_counter_and_controller() {
        let mut page = Page::init(
            &contact_page(),
            InMemoryPreferenceStore::new(),
            I18nManager::with_locale("en"),
        );
        let message = FieldKey::new("message");

        page.forms[0].input(&message, "hello there").expect("input");
        assert_eq!(
            page.forms[0].counter(&message).expect("counter").label(),
            "11 / 20"
        );
        let controller = page.forms[0].controller.as_ref().expect("controller");
        assert_eq!(controller.value(&message).expect("value"), "hello there");

        let selector = page.forms[0]
            .file_selector_mut(&FieldKey::new("attachment"))
            .expect("file input");
        selector
            .select(vec![SelectedFile::new("cv.pdf", 42)])
            .expect("small file");
        assert_eq!(selector.display(), "cv.pdf");
    }

    #[test]
    fn theme_toggle_announces_in_page_locale() {
        let mut page = Page::init(
            &PageDecl::new(),
            InMemoryPreferenceStore::new(),
            I18nManager::with_locale("en"),
        );
        page.toggle_theme();
        assert_eq!(page.theme.data_theme(), "dark");
        assert_eq!(
            page.theme.take_announcement().as_deref(),
            Some("Theme changed to dark mode")
        );
    }

    #[test]
    fn lookahead_pattern_attaches_and_validates() {
        let page = Page::init(
            &PageDecl::new().form(
                FormDecl::new()
                    .attr(crate::form::VALIDATE_MARKER, "")
                    .element(
                        ElementDecl::input("password", "pw").attr("pattern", r"(?=.*\d).{8,}"),
                    ),
            ),
            InMemoryPreferenceStore::new(),
            I18nManager::with_locale("en"),
        );
        let controller = page.controllers().next().expect("form attached");
        let pw = FieldKey::new("pw");

        controller.input(&pw, "abcdefgh").expect("input");
        assert!(!controller.validate_field(&pw).expect("validate"));
        controller.input(&pw, "abcdefg1").expect("input");
        assert!(controller.validate_field(&pw).expect("validate"));
    }

    #[test]
    fn broken_pattern_skips_only_that_form() {
        let decl = PageDecl::new()
            .form(
                FormDecl::new()
                    .attr(crate::form::VALIDATE_MARKER, "")
                    .element(ElementDecl::input("text", "zip").attr("pattern", "("))
                    .element(
                        ElementDecl::new("textarea")
                            .attr("name", "notes")
                            .flag("data-counter"),
                    ),
            )
            .form(
                FormDecl::new()
                    .attr(crate::form::VALIDATE_MARKER, "")
                    .element(ElementDecl::input("email", "email").flag("required")),
            );
        let mut page = Page::init(
            &decl,
            InMemoryPreferenceStore::new(),
            I18nManager::with_locale("en"),
        );

        assert_eq!(page.forms.len(), 2);
        assert!(page.forms[0].controller.is_none());
        assert!(page.forms[0].counter(&FieldKey::new("notes")).is_some());
        assert!(page.forms[1].controller.is_some());

        page.menu.handle(crate::components::MenuEvent::ToggleClicked);
        assert!(page.menu.is_expanded());
    }
}
