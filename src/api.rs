//! Blocking HTTP client for the search backend.
//!
//! Endpoints:
//! * `POST /pesquisar`          – normal search
//! * `POST /pesquisar-profundo` – deep search, adds `metadados`
//! * `GET  /historico`          – past searches

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::data::model::StartupRecord;
use crate::data::normalize::normalize_startup;
use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Which search endpoint to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Normal,
    Deep,
}

impl SearchMode {
    pub fn path(self) -> &'static str {
        match self {
            SearchMode::Normal => "/pesquisar",
            SearchMode::Deep => "/pesquisar-profundo",
        }
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vc_list: &'a [String],
}

#[derive(Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    resultado: JsonValue,
    #[serde(default)]
    erro: Option<String>,
    #[serde(default)]
    metadados: Option<DeepMetadata>,
}

/// Extra information returned by a deep search.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeepMetadata {
    #[serde(default)]
    pub total_fontes: Option<u64>,
    #[serde(default)]
    pub total_startups: Option<u64>,
    #[serde(default)]
    pub vcs_pesquisadas: Vec<JsonValue>,
    #[serde(default)]
    pub query_aprofundamento: Option<String>,
}

/// A successful search: the raw `resultado` payload, not yet normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReply {
    pub payload: JsonValue,
    pub metadata: Option<DeepMetadata>,
}

/// One past search as listed by `/historico`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryEntry {
    pub id: JsonValue,
    /// Comma-joined VC names.
    #[serde(default)]
    pub vc_list: String,
    #[serde(default)]
    pub resultado: JsonValue,
    #[serde(default)]
    pub tipo_pesquisa: Option<String>,
}

impl HistoryEntry {
    pub fn mode(&self) -> SearchMode {
        match self.tipo_pesquisa.as_deref() {
            Some("profunda") => SearchMode::Deep,
            _ => SearchMode::Normal,
        }
    }

    pub fn vcs(&self) -> Vec<String> {
        self.vc_list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Startup count shown in the history list; zero unless `resultado` is a list.
    pub fn startup_count(&self) -> usize {
        self.resultado.as_array().map_or(0, Vec::len)
    }

    /// History stores `resultado` as a list; anything else is a single item.
    pub fn records(&self) -> Vec<StartupRecord> {
        match &self.resultado {
            JsonValue::Array(items) => items.iter().map(normalize_startup).collect(),
            other => vec![normalize_startup(other)],
        }
    }
}

// ---------------------------------------------------------------------------
// Backend seam
// ---------------------------------------------------------------------------

/// What the application needs from a search backend.
pub trait SearchBackend: Send + Sync {
    fn search(&self, vcs: &[String], mode: SearchMode) -> Result<SearchReply, ApiError>;
    fn history(&self) -> Result<Vec<HistoryEntry>, ApiError>;
}

/// HTTP implementation of [`SearchBackend`].
pub struct SearchClient {
    client: Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(SearchClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl SearchBackend for SearchClient {
    fn search(&self, vcs: &[String], mode: SearchMode) -> Result<SearchReply, ApiError> {
        log::info!("Searching {:?} via {}", vcs, mode.path());
        let res = self
            .client
            .post(self.url(mode.path()))
            .json(&SearchRequest { vc_list: vcs })
            .send()?;
        let status = res.status().as_u16();
        let body = res.text()?;
        decode_search_body(status, &body)
    }

    fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        let res = self.client.get(self.url("/historico")).send()?;
        let status = res.status().as_u16();
        let body = res.text()?;
        if !(200..300).contains(&status) {
            return Err(ApiError::Backend {
                status,
                message: "Erro ao carregar histórico.".to_string(),
            });
        }
        decode_history_body(&body)
    }
}

// ---------------------------------------------------------------------------
// Body decoding
// ---------------------------------------------------------------------------

/// Interpret a search response. Non-2xx statuses become
/// [`ApiError::Backend`] carrying the backend's `erro` text.
pub fn decode_search_body(status: u16, body: &str) -> Result<SearchReply, ApiError> {
    if !(200..300).contains(&status) {
        // error pages are not always JSON
        let erro = serde_json::from_str::<SearchEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.erro);
        return Err(ApiError::Backend {
            status,
            message: erro.unwrap_or_else(|| "Erro na busca".to_string()),
        });
    }
    let envelope: SearchEnvelope = serde_json::from_str(body)?;
    Ok(SearchReply {
        payload: envelope.resultado,
        metadata: envelope.metadados,
    })
}

/// Interpret a `/historico` body. A non-list body means no history; entries
/// that do not decode are skipped.
pub fn decode_history_body(body: &str) -> Result<Vec<HistoryEntry>, ApiError> {
    let root: JsonValue = serde_json::from_str(body)?;
    let JsonValue::Array(items) = root else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<HistoryEntry>(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping malformed history entry: {e}");
                None
            }
        })
        .collect())
}
