// src/models/settings.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Linha única de configuração da empresa (singleton)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[schema(example = "Assistência Técnica Exemplo")]
    pub company_name: String,

    #[schema(example = "12.345.678/0001-99")]
    pub cnpj: String,

    #[schema(example = "(11) 99999-8888")]
    pub phone: String,

    #[schema(example = "contato@assistencia.com")]
    pub email: String,

    #[schema(example = "Rua das Flores, 123 - Centro")]
    pub address: String,
}
