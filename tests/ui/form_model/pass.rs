use folioform::form::{FieldKind, FormModel, Payload};

#[derive(Clone, folioform::form::FormModel)]
#[form(id = "newsletter")]
struct NewsletterForm {
    #[field(required, kind = "email")]
    email: String,
    #[field(honeypot, name = "website")]
    trap: String,
}

fn main() {
    let fields = NewsletterForm::fields();
    assert_eq!(fields.email().as_str(), "email");
    assert_eq!(fields.trap().as_str(), "website");

    let schema = NewsletterForm::schema();
    assert_eq!(schema.id.as_deref(), Some("newsletter"));
    let email = schema.get(&fields.email()).expect("email field");
    assert_eq!(email.constraints.kind, FieldKind::Email);

    let mut payload = Payload::new();
    payload.insert("email".to_string(), "ada@example.com".to_string());
    let model = NewsletterForm::from_payload(&payload);
    assert_eq!(model.email, "ada@example.com");
    assert!(model.trap.is_empty());
}
