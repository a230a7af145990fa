// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

pub const DEFAULT_LANG: &str = "en";

// Catálogos embutidos: (chave, mensagem). "{0}" é substituído pelo parâmetro.
const EN: &[(&str, &str)] = &[
    ("validation", "One or more fields are invalid."),
    ("email_already_exists", "This e-mail is already in use."),
    ("invalid_credentials", "Invalid email or password."),
    ("invalid_token", "Missing or invalid authentication token."),
    ("organization_not_found", "Organization not found."),
    ("region_not_found", "Region '{0}' not found."),
    ("zone_not_found", "Zone '{0}' not found."),
    ("supply_type_not_found", "Supply type '{0}' not found."),
    ("duplicate_supply_type", "Supply type '{0}' appears more than once."),
    ("internal", "An unexpected error occurred."),
    // Mensagens por campo (validator)
    ("validation.quantity_negative", "Quantity cannot be negative."),
    ("validation.need_negative", "Need cannot be negative."),
    ("validation.zone_required", "Select a zone."),
    ("validation.quantity_min", "Quantity must be at least 1."),
    ("validation.quantity_overflow", "Quantity is too large for this zone."),
    ("validation.notes_too_long", "Notes are too long."),
    ("validation.country_code", "Countries must use two-letter codes (e.g. PS)."),
    ("validation.organization_name_required", "Organization name is required."),
    ("validation.email_invalid", "The e-mail provided is invalid."),
    ("validation.password_too_short", "Password must have at least 6 characters."),
    ("validation.password_mismatch", "Passwords do not match."),
    ("validation.website_invalid", "The website provided is invalid."),
    ("validation.scope_required", "Provide 'region' or 'zone'."),
];

const PT: &[(&str, &str)] = &[
    ("validation", "Um ou mais campos são inválidos."),
    ("email_already_exists", "Este e-mail já está em uso."),
    ("invalid_credentials", "E-mail ou senha inválidos."),
    ("invalid_token", "Token de autenticação inválido ou ausente."),
    ("organization_not_found", "Organização não encontrada."),
    ("region_not_found", "Região '{0}' não encontrada."),
    ("zone_not_found", "Zona '{0}' não encontrada."),
    ("supply_type_not_found", "Tipo de suprimento '{0}' não encontrado."),
    ("duplicate_supply_type", "O tipo de suprimento '{0}' aparece mais de uma vez."),
    ("internal", "Ocorreu um erro inesperado."),
    ("validation.quantity_negative", "A quantidade não pode ser negativa."),
    ("validation.need_negative", "A necessidade não pode ser negativa."),
    ("validation.zone_required", "Selecione uma zona."),
    ("validation.quantity_min", "A quantidade deve ser de pelo menos 1."),
    ("validation.quantity_overflow", "A quantidade é grande demais para esta zona."),
    ("validation.notes_too_long", "As observações são longas demais."),
    ("validation.country_code", "Os países devem usar códigos de duas letras (ex: PS)."),
    ("validation.organization_name_required", "O nome da organização é obrigatório."),
    ("validation.email_invalid", "O e-mail fornecido é inválido."),
    ("validation.password_too_short", "A senha deve ter no mínimo 6 caracteres."),
    ("validation.password_mismatch", "As senhas não coincidem."),
    ("validation.website_invalid", "O site informado é inválido."),
    ("validation.scope_required", "Informe 'region' ou 'zone'."),
];

/// Mensagens visíveis ao usuário, por idioma.
#[derive(Clone)]
pub struct I18nStore {
    catalogs: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("en", EN.iter().copied().collect());
        catalogs.insert("pt", PT.iter().copied().collect());
        Self { catalogs: Arc::new(catalogs) }
    }
}

impl I18nStore {
    /// Busca a mensagem no idioma pedido; cai para inglês e, por fim, na própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| {
                self.catalogs
                    .get(DEFAULT_LANG)
                    .and_then(|catalog| catalog.get(key))
            })
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| key.to_string())
    }

    pub fn translate_with(&self, lang: &str, key: &str, param: &str) -> String {
        self.translate(lang, key).replace("{0}", param)
    }
}
