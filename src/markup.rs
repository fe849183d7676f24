//! One-way presentation: controller and widget state in, classes, ARIA
//! attributes and HTML fragments out. Nothing here is read back.

use pulldown_cmark_escape::escape_html;

use crate::components::{CharacterCounter, FileSelector};
use crate::form::{
    FieldKey, FieldValidity, FormController, FormResult, FormSnapshot, StatusBanner,
};
use crate::i18n::I18nManager;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let _ = escape_html(&mut out, text);
    out
}

pub fn validity_class(validity: &FieldValidity) -> Option<&'static str> {
    match validity {
        FieldValidity::Unchecked => None,
        FieldValidity::Valid => Some("valid"),
        FieldValidity::Invalid(_) => Some("error"),
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldPresentation {
    pub key: FieldKey,
    pub class: Option<&'static str>,
    pub aria_invalid: bool,
    pub disabled: bool,
    pub error_id: String,
    pub error_message: Option<String>,
}

impl FieldPresentation {
    /// The inline annotation rendered after the field, if it has one.
    pub fn error_html(&self) -> Option<String> {
        self.error_message.as_deref().map(|message| {
            format!(
                r#"<span class="error-message" id="{}" role="alert">{}</span>"#,
                escape(&self.error_id),
                escape(message)
            )
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BannerPresentation {
    pub banner: StatusBanner,
    pub class: String,
    pub message: String,
}

impl BannerPresentation {
    pub fn new(banner: StatusBanner, i18n: &I18nManager) -> Option<Self> {
        let kind = banner.kind()?;
        let message = banner.message(i18n)?;
        Some(Self {
            banner,
            class: format!("form-status {kind}"),
            message,
        })
    }

    pub fn html(&self) -> String {
        let body = if self.banner == StatusBanner::Sending {
            format!(
                r#"<div class="form-loading"></div><span>{}</span>"#,
                escape(&self.message)
            )
        } else {
            escape(&self.message)
        };
        format!(
            r#"<div class="{}" role="status" aria-live="polite">{body}</div>"#,
            escape(&self.class)
        )
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormPresentation {
    pub fields: Vec<FieldPresentation>,
    pub banner: Option<BannerPresentation>,
    pub submit_label: String,
    pub submit_disabled: bool,
}

impl FormPresentation {
    pub fn from_snapshot(snapshot: &FormSnapshot, i18n: &I18nManager) -> Self {
        let form_dom_id = snapshot
            .dom_id
            .clone()
            .unwrap_or_else(|| format!("form-{}", snapshot.id.0));
        let fields = snapshot
            .fields
            .iter()
            .map(|field| FieldPresentation {
                key: field.key.clone(),
                class: validity_class(&field.validity),
                aria_invalid: field.validity.is_invalid(),
                disabled: field.disabled,
                error_id: format!("{form_dom_id}-{}-error", field.key),
                error_message: field
                    .validity
                    .violation()
                    .map(|violation| violation.message(i18n)),
            })
            .collect();

        Self {
            fields,
            banner: BannerPresentation::new(snapshot.banner, i18n),
            submit_label: snapshot.submit_control.label.clone(),
            submit_disabled: snapshot.submit_control.disabled,
        }
    }

    pub fn field(&self, key: &FieldKey) -> Option<&FieldPresentation> {
        self.fields.iter().find(|field| &field.key == key)
    }
}

impl FormController {
    pub fn presentation(&self) -> FormResult<FormPresentation> {
        Ok(FormPresentation::from_snapshot(&self.snapshot()?, self.i18n()))
    }
}

pub fn counter_html(counter: &CharacterCounter) -> String {
    let class = if counter.limit_reached() {
        "form-counter limit-reached"
    } else {
        "form-counter"
    };
    format!(r#"<div class="{class}">{}</div>"#, escape(&counter.label()))
}

pub fn file_names_html(selector: &FileSelector) -> String {
    format!(
        r#"<span class="form-file-name">{}</span>"#,
        escape(&selector.display())
    )
}
