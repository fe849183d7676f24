use tracing::trace;

use super::field::{FieldConstraints, FieldKey, FieldKind};
use super::transport::Payload;

/// Attribute marking a form as opted into client-side validation.
pub const VALIDATE_MARKER: &str = "data-validate";
/// Attribute marking a textarea for a character counter.
pub const COUNTER_MARKER: &str = "data-counter";

/// Declaration of one field: its name, declared constraints and initial value.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub constraints: FieldConstraints,
    pub honeypot: bool,
    pub counter: bool,
    pub initial: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<FieldKey>) -> Self {
        Self {
            key: name.into(),
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.constraints.kind = kind;
        self
    }

    pub fn required(mut self, value: bool) -> Self {
        self.constraints.required = value;
        self
    }

    pub fn min_length(mut self, value: usize) -> Self {
        self.constraints.min_length = Some(value);
        self
    }

    pub fn max_length(mut self, value: usize) -> Self {
        self.constraints.max_length = Some(value);
        self
    }

    pub fn pattern(mut self, source: impl Into<String>) -> Self {
        self.constraints.pattern = Some(source.into());
        self
    }

    pub fn title(mut self, message: impl Into<String>) -> Self {
        self.constraints.title = Some(message.into());
        self
    }

    pub fn honeypot(mut self, value: bool) -> Self {
        self.honeypot = value;
        self
    }

    pub fn counter(mut self, value: bool) -> Self {
        self.counter = value;
        self
    }

    pub fn initial(mut self, value: impl Into<String>) -> Self {
        self.initial = value.into();
        self
    }

    /// Reads a field declaration from rendered markup.
    ///
    /// Returns `None` for elements that never submit a value: unnamed
    /// controls and buttons.
    pub fn from_element(element: &ElementDecl) -> Option<Self> {
        if element.is_submit_control() || element.tag.eq_ignore_ascii_case("button") {
            return None;
        }
        let name = element.attr_value("name").filter(|name| !name.is_empty())?;

        let kind = match element.tag.to_ascii_lowercase().as_str() {
            "textarea" => FieldKind::Textarea,
            "select" => FieldKind::Select,
            _ => FieldKind::from_type_attr(element.attr_value("type").unwrap_or("text")),
        };
        let constraints = FieldConstraints {
            kind,
            required: element.has_attr("required"),
            min_length: length_attr(element, "minlength"),
            max_length: length_attr(element, "maxlength"),
            pattern: element.attr_value("pattern").map(str::to_string),
            title: element.attr_value("title").map(str::to_string),
        };
        let initial = element
            .attr_value("value")
            .map(str::to_string)
            .or_else(|| (kind == FieldKind::Textarea).then(|| element.text.clone()).flatten())
            .unwrap_or_default();

        Some(Self {
            key: FieldKey::new(name),
            constraints,
            honeypot: element.in_honeypot,
            counter: element.has_attr(COUNTER_MARKER),
            initial,
        })
    }
}

fn length_attr(element: &ElementDecl, name: &str) -> Option<usize> {
    let raw = element.attr_value(name)?;
    match raw.trim().parse::<usize>() {
        Ok(value) => Some(value),
        Err(_) => {
            trace!(attribute = name, value = raw, "ignoring unparseable length constraint");
            None
        }
    }
}

/// Everything a `FormController` needs to attach to one form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormSchema {
    pub id: Option<String>,
    pub opted_in: bool,
    pub submit_label: Option<String>,
    pub fields: Vec<FieldSpec>,
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSchema {
    pub fn new() -> Self {
        Self {
            id: None,
            opted_in: true,
            submit_label: None,
            fields: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn opted_in(mut self, value: bool) -> Self {
        self.opted_in = value;
        self
    }

    pub fn submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = Some(label.into());
        self
    }

    /// Adds a field. A repeated name keeps its original position and takes
    /// the newer declaration.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        if let Some(existing) = self.fields.iter_mut().find(|field| field.key == spec.key) {
            *existing = spec;
        } else {
            self.fields.push(spec);
        }
        self
    }

    pub fn from_decl(decl: &FormDecl) -> Self {
        let mut schema = Self::new().opted_in(decl.has_attr(VALIDATE_MARKER));
        schema.id = decl.id().map(str::to_string);
        for element in &decl.elements {
            if element.is_submit_control() {
                schema.submit_label = element
                    .text
                    .clone()
                    .or_else(|| element.attr_value("value").map(str::to_string));
                continue;
            }
            if let Some(spec) = FieldSpec::from_element(element) {
                schema = schema.field(spec);
            }
        }
        schema
    }

    pub fn get(&self, key: &FieldKey) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| &field.key == key)
    }
}

/// A form model whose schema is known at compile time, usually via
/// `#[derive(FormModel)]`.
pub trait FormModel: Sized {
    type Fields;

    fn fields() -> Self::Fields;
    fn schema() -> FormSchema;
    fn from_payload(payload: &Payload) -> Self;
}

/// One rendered element as seen by the page initializer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ElementDecl {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub in_honeypot: bool,
}

impl ElementDecl {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn input(kind: &str, name: &str) -> Self {
        Self::new("input").attr("type", kind).attr("name", name)
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Adds a boolean attribute such as `required`.
    pub fn flag(self, name: impl Into<String>) -> Self {
        self.attr(name, "")
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Marks the element as rendered inside the honeypot container.
    pub fn within_honeypot(mut self) -> Self {
        self.in_honeypot = true;
        self
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr_value(name).is_some()
    }

    pub fn is_submit_control(&self) -> bool {
        let tag = self.tag.to_ascii_lowercase();
        let kind = self.attr_value("type").map(str::to_ascii_lowercase);
        match tag.as_str() {
            "button" => kind.as_deref().is_none_or(|kind| kind == "submit"),
            "input" => kind.as_deref() == Some("submit"),
            _ => false,
        }
    }
}

/// A rendered `<form>` and the elements inside it, in document order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormDecl {
    pub attributes: Vec<(String, String)>,
    pub elements: Vec<ElementDecl>,
}

impl FormDecl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn element(mut self, element: ElementDecl) -> Self {
        self.elements.push(element);
        self
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    fn attr_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_validated(&self) -> bool {
        self.has_attr(VALIDATE_MARKER)
    }

    pub(crate) fn id(&self) -> Option<&str> {
        self.attr_value("id")
    }
}
