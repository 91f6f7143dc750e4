// src/models/contact.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::common::{error::AppError, form::blank_as_none, validation::coded};

// Contato de uma agência ou de um usuário (guardado em lista jsonb)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria Souza")]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@agencia.com.br")]
    pub email: String,

    #[serde(deserialize_with = "blank_as_none")]
    #[schema(example = "(11) 98888-7777")]
    pub phone: Option<String>,

    /// Contato principal. Exatamente um por lista.
    pub primary: bool,
}

/// Gravação só da lista de contatos.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactsPatch {
    pub contacts: Vec<Contact>,
    pub updated_at: DateTime<Utc>,
}

impl ContactsPatch {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self { contacts, updated_at: Utc::now() }
    }
}

/// Regra das listas de contatos: ao menos um, todos válidos e exatamente um
/// principal.
pub fn validate_contacts(contacts: &[Contact]) -> Result<(), ValidationError> {
    validate_contacts_present(contacts)?;
    if contacts.iter().filter(|c| c.primary).count() != 1 {
        return Err(coded("single_primary_contact"));
    }
    Ok(())
}

/// Listas de contato de usuários: ao menos um, todos válidos.
pub fn validate_contacts_present(contacts: &[Contact]) -> Result<(), ValidationError> {
    if contacts.is_empty() {
        return Err(coded("contacts_required"));
    }
    if contacts.iter().any(|c| c.validate().is_err()) {
        return Err(coded("invalid_contact"));
    }
    Ok(())
}

fn rule(code: &'static str) -> AppError {
    AppError::RuleViolation { field: "contacts", code }
}

/// Acrescenta um contato. O primeiro da lista (ou um marcado como principal)
/// assume o posto de principal.
pub fn add_contact(contacts: &mut Vec<Contact>, mut contact: Contact) -> Result<(), AppError> {
    contact.validate().map_err(|_| rule("invalid_contact"))?;

    if contacts.is_empty() {
        contact.primary = true;
    } else if contact.primary {
        contacts.iter_mut().for_each(|c| c.primary = false);
    }
    contacts.push(contact);
    Ok(())
}

/// Remove o contato da posição pedida. Recusa quando ele é o único.
pub fn remove_contact(contacts: &mut Vec<Contact>, index: usize) -> Result<Contact, AppError> {
    if index >= contacts.len() {
        return Err(rule("index_out_of_range"));
    }
    if contacts.len() == 1 {
        return Err(rule("last_contact"));
    }

    let removed = contacts.remove(index);
    if removed.primary {
        if let Some(first) = contacts.first_mut() {
            first.primary = true;
        }
    }
    Ok(removed)
}

pub fn set_primary(contacts: &mut [Contact], index: usize) -> Result<(), AppError> {
    if index >= contacts.len() {
        return Err(rule("index_out_of_range"));
    }
    for (i, contact) in contacts.iter_mut().enumerate() {
        contact.primary = i == index;
    }
    Ok(())
}
