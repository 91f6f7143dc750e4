// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "pt";

// Mensagens por código. Os payloads usam códigos (`required`, `invalid_email`)
// e a tradução só acontece na hora de montar a resposta.
const PT: &[(&str, &str)] = &[
    ("invalid_fields", "Um ou mais campos são inválidos."),
    ("invalid_body", "O corpo da requisição não é um JSON válido para esta operação."),
    ("expected_json", "Envie o corpo como application/json."),
    ("required", "Campo obrigatório."),
    ("invalid_email", "E-mail inválido."),
    ("invalid_url", "URL inválida."),
    ("invalid_cpf", "O CPF deve ter 11 dígitos."),
    ("invalid_cnpj", "O CNPJ deve ter 14 dígitos."),
    ("invalid_cep", "O CEP deve ter 8 dígitos."),
    ("invalid_bank_code", "O código do banco deve ter exatamente 3 dígitos."),
    ("weak_password", "A senha deve ter no mínimo 8 caracteres, com letra minúscula, maiúscula, número e símbolo."),
    ("password_mismatch", "As senhas não coincidem."),
    ("contacts_required", "Informe ao menos um contato."),
    ("single_primary_contact", "Exatamente um contato deve ser o principal."),
    ("invalid_contact", "Contato com nome ou e-mail inválido."),
    ("last_contact", "Não é possível remover o único contato."),
    ("index_out_of_range", "Posição inexistente na lista."),
    ("tiers_required", "Informe ao menos uma faixa de milhas."),
    ("tiers_not_contiguous", "As faixas devem ser contínuas: cada início é o fim anterior + 1."),
    ("tier_bounds", "O início da faixa não pode ser maior que o fim."),
    ("last_tier_unbounded", "Somente a última faixa fica sem limite superior."),
    ("tier_start_too_low", "O início da nova faixa deve ser maior que o início da última."),
    ("last_tier", "Não é possível remover a única faixa."),
    ("negative_value", "O valor não pode ser negativo."),
    ("agency_required", "Usuários do tipo agente precisam de uma agência."),
    ("unknown_activity", "Atividade inexistente."),
    ("unknown_profile", "Perfil de agência inexistente."),
    ("unknown_agency", "Agência inexistente."),
    ("invalid_text_key", "A chave deve conter apenas letras minúsculas, números e _."),
    ("unknown_gateway_field", "Campo desconhecido para este gateway."),
    ("gateway_incomplete", "Para ativar o gateway, preencha todos os campos."),
    ("search_id_required", "Informe o identificador da busca."),
    ("already_exists", "Já existe um registro com este valor."),
    ("not_found", "Registro não encontrado."),
    ("invalid_transition", "Mudança de status não permitida."),
    ("referenced", "O registro está em uso por outros cadastros."),
    ("invalid_credentials", "E-mail ou senha inválidos."),
    ("invalid_token", "Token de autenticação inválido ou ausente."),
    ("forbidden", "Você não tem acesso ao back-office."),
    ("unavailable", "Serviço de dados indisponível. Tente novamente."),
    ("internal", "Ocorreu um erro inesperado."),
];

const EN: &[(&str, &str)] = &[
    ("invalid_fields", "One or more fields are invalid."),
    ("invalid_body", "The request body is not valid JSON for this operation."),
    ("expected_json", "Send the body as application/json."),
    ("required", "This field is required."),
    ("invalid_email", "Invalid e-mail."),
    ("invalid_url", "Invalid URL."),
    ("invalid_cpf", "CPF must have 11 digits."),
    ("invalid_cnpj", "CNPJ must have 14 digits."),
    ("invalid_cep", "Postal code must have 8 digits."),
    ("invalid_bank_code", "Bank code must be exactly 3 digits."),
    ("weak_password", "Password needs at least 8 characters with lowercase, uppercase, digit and symbol."),
    ("password_mismatch", "Passwords do not match."),
    ("contacts_required", "At least one contact is required."),
    ("single_primary_contact", "Exactly one contact must be primary."),
    ("invalid_contact", "Contact has an invalid name or e-mail."),
    ("last_contact", "The only contact cannot be removed."),
    ("index_out_of_range", "No entry at this position."),
    ("tiers_required", "At least one mileage tier is required."),
    ("tiers_not_contiguous", "Tiers must be contiguous: each start is the previous end + 1."),
    ("tier_bounds", "Tier start cannot be greater than its end."),
    ("last_tier_unbounded", "Only the last tier is unbounded."),
    ("tier_start_too_low", "The new tier must start after the last tier's start."),
    ("last_tier", "The only tier cannot be removed."),
    ("negative_value", "Value cannot be negative."),
    ("agency_required", "Agent users need an agency."),
    ("unknown_activity", "Unknown activity."),
    ("unknown_profile", "Unknown agency profile."),
    ("unknown_agency", "Unknown agency."),
    ("invalid_text_key", "Key may only contain lowercase letters, digits and _."),
    ("unknown_gateway_field", "Unknown field for this gateway."),
    ("gateway_incomplete", "Fill every field before enabling the gateway."),
    ("search_id_required", "A search id is required."),
    ("already_exists", "A record with this value already exists."),
    ("not_found", "Record not found."),
    ("invalid_transition", "Status change not allowed."),
    ("referenced", "The record is referenced by other records."),
    ("invalid_credentials", "Invalid e-mail or password."),
    ("invalid_token", "Missing or invalid authentication token."),
    ("forbidden", "You do not have back-office access."),
    ("unavailable", "Data service unavailable. Try again."),
    ("internal", "An unexpected error occurred."),
];

#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        let mut messages = HashMap::new();
        messages.insert("pt", PT.iter().copied().collect());
        messages.insert("en", EN.iter().copied().collect());
        Self { messages }
    }
}

impl I18nStore {
    /// Traduz um código para o idioma pedido. Cai para o português e, se
    /// nem assim existir, devolve o próprio código.
    pub fn translate(&self, lang: &str, code: &str) -> String {
        self.messages
            .get(lang)
            .and_then(|m| m.get(code))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|m| m.get(code)))
            .map(|m| m.to_string())
            .unwrap_or_else(|| code.to_string())
    }
}
