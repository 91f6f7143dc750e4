// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::common::{
    form::blank_as_none,
    listing::Searchable,
    validation::{coded, digits_only, validate_cpf, validate_password},
};
use crate::models::{
    address::Address,
    contact::{validate_contacts_present, Contact},
};

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operator,
    Agent,
}

impl Role {
    /// Só administradores e operadores entram no back-office.
    pub fn is_backoffice(&self) -> bool {
        matches!(self, Role::Admin | Role::Operator)
    }
}

// --- IDENTIDADE (credenciais) ---

// Representa uma identidade vinda do banco de dados
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: Uuid,
    #[schema(example = "admin@agencia.com.br")]
    pub email: String,

    #[serde(skip_serializing)] // nunca sai na API
    #[schema(ignore)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIdentity {
    pub email: String,
    pub password_hash: String,
}

// --- USUÁRIO (perfil) ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub identity_id: Uuid,
    #[schema(example = "Maria Souza")]
    pub name: String,
    #[schema(example = "maria@agencia.com.br")]
    pub email: String,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub role: Role,
    pub agency_id: Option<Uuid>,
    pub contacts: Vec<Contact>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for Client {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.cpf.as_deref().unwrap_or_default(),
        ]
    }
}

// Agente sem agência não pode existir
fn check_agency(role: Option<Role>, agency_id: Option<Uuid>, errors: &mut ValidationErrors) {
    if role == Some(Role::Agent) && agency_id.is_none() {
        errors.add("agency_id", coded("agency_required"));
    }
}

fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

// Dados para cadastrar um usuário (identidade + perfil)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateClientPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria Souza")]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "a@a.com")]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    #[schema(example = "Abcdef1!")]
    pub password: String,

    #[validate(must_match(other = "password", message = "password_mismatch"))]
    #[schema(example = "Abcdef1!")]
    pub confirm_password: String,

    #[serde(deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_cpf"))]
    #[schema(example = "123.456.789-09")]
    pub cpf: Option<String>,

    #[serde(deserialize_with = "blank_as_none")]
    pub phone: Option<String>,

    #[validate(nested)]
    pub address: Option<Address>,

    #[validate(required(message = "required"))]
    pub role: Option<Role>,

    pub agency_id: Option<Uuid>,

    #[validate(custom(function = "validate_contacts_present"))]
    pub contacts: Vec<Contact>,
}

impl CreateClientPayload {
    /// `validate()` mais as regras que cruzam campos.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        check_agency(self.role, self.agency_id, &mut errors);
        into_result(errors)
    }
}

// Edição do perfil: sem senha, a identidade não muda
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateClientPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[serde(deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: Option<String>,

    #[serde(deserialize_with = "blank_as_none")]
    pub phone: Option<String>,

    #[validate(nested)]
    pub address: Option<Address>,

    #[validate(required(message = "required"))]
    pub role: Option<Role>,

    pub agency_id: Option<Uuid>,

    #[validate(custom(function = "validate_contacts_present"))]
    pub contacts: Vec<Contact>,
}

impl UpdateClientPayload {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        check_agency(self.role, self.agency_id, &mut errors);
        into_result(errors)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub name: String,
    pub email: String,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub role: Role,
    pub agency_id: Option<Uuid>,
    pub contacts: Vec<Contact>,
    pub updated_at: DateTime<Utc>,
}

impl ClientRecord {
    #[allow(clippy::too_many_arguments)]
    fn build(
        name: String,
        email: String,
        cpf: Option<String>,
        phone: Option<String>,
        address: Option<Address>,
        role: Role,
        agency_id: Option<Uuid>,
        contacts: Vec<Contact>,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            cpf: cpf.map(|c| digits_only(&c)),
            phone,
            address,
            role,
            agency_id,
            contacts,
            updated_at: Utc::now(),
        }
    }

    /// Perfil do cadastro e a senha em texto puro (para o hash).
    /// `None` se o papel não veio, o que o `check()` já barra.
    pub fn from_create(payload: CreateClientPayload) -> Option<(Self, String)> {
        let role = payload.role?;
        let record = Self::build(
            payload.name,
            payload.email,
            payload.cpf,
            payload.phone,
            payload.address,
            role,
            payload.agency_id,
            payload.contacts,
        );
        Some((record, payload.password))
    }

    pub fn from_update(payload: UpdateClientPayload) -> Option<Self> {
        let role = payload.role?;
        Some(Self::build(
            payload.name,
            payload.email,
            payload.cpf,
            payload.phone,
            payload.address,
            role,
            payload.agency_id,
            payload.contacts,
        ))
    }
}

// --- LOGIN ---

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "admin@agencia.com.br")]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Abcdef1!")]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub identity: Identity,
    pub profile: Option<Client>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // ID da identidade
    pub exp: usize, // expira em
    pub iat: usize, // emitido em
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> serde_json::Value {
        json!({
            "name": "Maria",
            "email": "a@a.com",
            "password": "Abcdef1!",
            "confirmPassword": "Abcdef1!",
            "role": "operator",
            "contacts": [{ "name": "Maria", "email": "a@a.com", "primary": true }]
        })
    }

    #[test]
    fn mismatched_confirmation_is_reported_on_confirm_field() {
        let mut raw = base();
        raw["confirmPassword"] = json!("Abcdef1?");
        let payload: CreateClientPayload = serde_json::from_value(raw).unwrap();
        let errors = payload.check().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
        assert!(!errors.field_errors().contains_key("password"));
    }

    #[test]
    fn agents_need_an_agency() {
        let mut raw = base();
        raw["role"] = json!("agent");
        let payload: CreateClientPayload = serde_json::from_value(raw).unwrap();
        let errors = payload.check().unwrap_err();
        assert!(errors.field_errors().contains_key("agency_id"));

        let ok: CreateClientPayload = serde_json::from_value(base()).unwrap();
        assert!(ok.check().is_ok());
    }

    #[test]
    fn record_normalises_documents() {
        let mut raw = base();
        raw["cpf"] = json!("123.456.789-09");
        raw["email"] = json!(" A@A.com ");
        let payload: CreateClientPayload = serde_json::from_value(raw).unwrap();
        let (record, password) = ClientRecord::from_create(payload).unwrap();
        assert_eq!(record.cpf.as_deref(), Some("12345678909"));
        assert_eq!(record.email, "a@a.com");
        assert_eq!(password, "Abcdef1!");
    }

    #[test]
    fn only_admins_and_operators_enter() {
        assert!(Role::Admin.is_backoffice());
        assert!(Role::Operator.is_backoffice());
        assert!(!Role::Agent.is_backoffice());
    }
}
