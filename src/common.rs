pub mod error;
pub mod form;
pub mod i18n;
pub mod json;
pub mod listing;
pub mod validation;
