// src/common/validation.rs

// Validações customizadas usadas pelos payloads (`#[validate(custom(...))]`).
// Todas devolvem o código do erro como `message`, a tradução fica no I18nStore.

use std::borrow::Cow;

use regex::Regex;
use validator::ValidationError;

lazy_static::lazy_static! {
    static ref BANK_CODE_RE: Regex = Regex::new(r"^[0-9]{3}$").unwrap();
    static ref TEXT_KEY_RE: Regex = Regex::new(r"^[a-z0-9_]+$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
}

/// Erro de validação cujo `message` é o próprio código.
pub fn coded(code: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(code));
    err
}

/// Remove a máscara (pontos, traços, barras) e fica só com os dígitos.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

// Exatamente 3 dígitos, sem máscara
pub fn validate_bank_code(code: &str) -> Result<(), ValidationError> {
    if BANK_CODE_RE.is_match(code) {
        Ok(())
    } else {
        Err(coded("invalid_bank_code"))
    }
}

/// Mínimo de 8 caracteres com minúscula, maiúscula, número e símbolo.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= 8;
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if long_enough && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(coded("weak_password"))
    }
}

fn digit_count(value: &str, expected: usize, code: &'static str) -> Result<(), ValidationError> {
    if digits_only(value).len() == expected {
        Ok(())
    } else {
        Err(coded(code))
    }
}

pub fn validate_cpf(cpf: &str) -> Result<(), ValidationError> {
    digit_count(cpf, 11, "invalid_cpf")
}

pub fn validate_cnpj(cnpj: &str) -> Result<(), ValidationError> {
    digit_count(cnpj, 14, "invalid_cnpj")
}

pub fn validate_cep(cep: &str) -> Result<(), ValidationError> {
    digit_count(cep, 8, "invalid_cep")
}

pub fn validate_text_key(key: &str) -> Result<(), ValidationError> {
    if TEXT_KEY_RE.is_match(key) {
        Ok(())
    } else {
        Err(coded("invalid_text_key"))
    }
}

pub fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(coded("invalid_email"))
    }
}

pub fn validate_non_negative(value: &rust_decimal::Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(coded("negative_value"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn bank_code_needs_exactly_three_digits() {
        assert!(validate_bank_code("123").is_ok());
        assert!(validate_bank_code("001").is_ok());
        assert!(validate_bank_code("12a").is_err());
        assert!(validate_bank_code("12").is_err());
        assert!(validate_bank_code("1234").is_err());
        assert!(validate_bank_code("١٢٣").is_err());
    }

    #[test]
    fn password_composition() {
        assert!(validate_password("Abcdef1!").is_ok());
        assert!(validate_password("abcdefgh").is_err());
        assert!(validate_password("Abcdefg!").is_err());
        assert!(validate_password("ABCDEF1!").is_err());
        assert!(validate_password("Abc1!").is_err());

        let err = validate_password("abcdefgh").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("weak_password"));
    }

    #[test]
    fn documents_are_counted_without_mask() {
        assert!(validate_cpf("123.456.789-09").is_ok());
        assert!(validate_cpf("1234567890").is_err());
        assert!(validate_cnpj("12.345.678/0001-95").is_ok());
        assert!(validate_cnpj("12345678000").is_err());
        assert!(validate_cep("01310-100").is_ok());
        assert!(validate_cep("0131010").is_err());
    }

    #[test]
    fn text_keys_and_emails() {
        assert!(validate_text_key("privacy_policy").is_ok());
        assert!(validate_text_key("Privacy Policy").is_err());
        assert!(validate_text_key("").is_err());

        assert!(is_valid_email("a@a.com"));
        assert!(!is_valid_email("a@a"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(validate_non_negative(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative(&Decimal::new(1050, 2)).is_ok());
        assert!(validate_non_negative(&Decimal::new(-1, 0)).is_err());
    }
}
