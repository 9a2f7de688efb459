use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::number::parse_human_number;

// ---------------------------------------------------------------------------
// Placeholder labels
// ---------------------------------------------------------------------------

/// Fallback for masculine fields (sector, investor, value).
pub const NOT_INFORMED: &str = "Não informado";
/// Fallback for feminine fields (round, investment date).
pub const NOT_INFORMED_F: &str = "Não informada";
/// Fallback for a missing company name.
pub const NAME_NOT_INFORMED: &str = "Nome não informado";
/// Histogram bucket for records whose sector is [`NOT_INFORMED`].
pub const OTHER_SECTOR: &str = "Outros";

// ---------------------------------------------------------------------------
// InvestmentValue – heterogeneous amount as sent by the backend
// ---------------------------------------------------------------------------

/// The backend sends amounts either as JSON numbers or as free text
/// (`"1.5M"`, `"R$ 500 mil"`, `"Não divulgado"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InvestmentValue {
    Number(f64),
    Text(String),
}

impl InvestmentValue {
    /// Integer amount, if one can be read out of the value.
    ///
    /// Text goes through the human-number parser; numbers are rounded.
    pub fn amount(&self) -> Option<i64> {
        match self {
            InvestmentValue::Number(n) if n.is_finite() => Some(n.round() as i64),
            InvestmentValue::Number(_) => None,
            InvestmentValue::Text(s) => parse_human_number(s),
        }
    }

    /// Whether this is the "not informed" placeholder or an empty string.
    pub fn is_unknown(&self) -> bool {
        match self {
            InvestmentValue::Number(_) => false,
            InvestmentValue::Text(s) => s.is_empty() || s == NOT_INFORMED,
        }
    }
}

impl Default for InvestmentValue {
    fn default() -> Self {
        InvestmentValue::Text(NOT_INFORMED.to_string())
    }
}

impl fmt::Display for InvestmentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvestmentValue::Number(n) => write!(f, "{n}"),
            InvestmentValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// StartupRecord – one normalized search hit
// ---------------------------------------------------------------------------

/// A single investment-target company, normalized from whatever shape the
/// backend produced. Serialized with the backend's Portuguese field names so
/// favorites files stay readable by other tools talking to the same backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupRecord {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub site: String,
    #[serde(rename = "setor")]
    pub sector: String,
    #[serde(rename = "ano_fundacao")]
    pub founding_year: Option<i64>,
    #[serde(rename = "valor_investimento", default)]
    pub investment_value: InvestmentValue,
    #[serde(rename = "rodada")]
    pub round: String,
    #[serde(rename = "data_investimento")]
    pub investment_date: String,
    #[serde(rename = "vc_investidor")]
    pub investor_name: String,
    #[serde(rename = "descricao_breve", default)]
    pub short_description: String,
    #[serde(rename = "linkedin_fundador", default)]
    pub founder_linkedin: String,
    /// The source object exactly as received.
    #[serde(default)]
    pub raw: JsonValue,
}

impl StartupRecord {
    /// Up to two initials of the company name, for the card badge.
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split(' ')
            .take(2)
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            "—".to_string()
        } else {
            initials
        }
    }

    /// Sector and round as tags, skipping placeholders.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags = Vec::with_capacity(2);
        if !self.sector.is_empty() && self.sector != NOT_INFORMED {
            tags.push(self.sector.as_str());
        }
        if !self.round.is_empty() && self.round != NOT_INFORMED_F {
            tags.push(self.round.as_str());
        }
        tags
    }

    pub fn founding_year_label(&self) -> String {
        self.founding_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "—".to_string())
    }

    pub fn has_linkedin(&self) -> bool {
        !self.founder_linkedin.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ResultSet – the complete loaded search result
// ---------------------------------------------------------------------------

/// All records of one search response or history entry, together with the
/// VC names that were queried.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub records: Vec<StartupRecord>,
    /// VC names from the request, not derived from the records.
    pub vcs: Vec<String>,
}

impl ResultSet {
    /// Build a result set, making record ids unique within it.
    ///
    /// Later duplicates get a `-2`, `-3`, … suffix in arrival order.
    pub fn new(mut records: Vec<StartupRecord>, vcs: Vec<String>) -> Self {
        let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
        for rec in &mut records {
            if !seen.contains(&rec.id) {
                seen.insert(rec.id.clone());
                continue;
            }
            let mut n = 2;
            let unique = loop {
                let candidate = format!("{}-{n}", rec.id);
                if !seen.contains(&candidate) {
                    break candidate;
                }
                n += 1;
            };
            log::debug!("Duplicate record id {:?} renamed to {:?}", rec.id, unique);
            seen.insert(unique.clone());
            rec.id = unique;
        }
        ResultSet { records, vcs }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&StartupRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}
