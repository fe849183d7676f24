pub mod components;
pub mod form;
pub mod i18n;
pub mod markup;
pub mod page;
pub mod preference;
pub mod prelude;

pub use i18n::{I18nManager, Locale};
pub use page::{Page, PageDecl, PageForm};
