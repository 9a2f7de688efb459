use serde_json::{Map, Value as JsonValue};

use super::model::{
    InvestmentValue, StartupRecord, NAME_NOT_INFORMED, NOT_INFORMED, NOT_INFORMED_F,
};

// ---------------------------------------------------------------------------
// ResultPayload – every response shape the backend is known to produce
// ---------------------------------------------------------------------------

/// The `resultado` field of a search response, decoded into the shapes we
/// accept. The backend forwards whatever JSON its agents produced, so the
/// same endpoint can answer with any of these.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    /// `[ {...}, {...} ]`
    List(Vec<JsonValue>),
    /// `{ "result": [ ... ] }`
    Wrapped(Vec<JsonValue>),
    /// `{ "startups": [ ... ], "outras": [ ... ] }`, arrays flattened in key order.
    Keyed(Vec<JsonValue>),
    /// A lone object describing one startup.
    Single(JsonValue),
    /// `null`, a string, a number: nothing usable.
    Empty,
}

impl ResultPayload {
    pub fn decode(payload: JsonValue) -> Self {
        match payload {
            JsonValue::Array(items) => ResultPayload::List(items),
            JsonValue::Object(mut obj) => {
                if matches!(obj.get("result"), Some(JsonValue::Array(_))) {
                    if let Some(JsonValue::Array(items)) = obj.remove("result") {
                        return ResultPayload::Wrapped(items);
                    }
                }
                if obj.values().any(JsonValue::is_array) {
                    let items = obj
                        .into_iter()
                        .filter_map(|(_, v)| match v {
                            JsonValue::Array(items) => Some(items),
                            _ => None,
                        })
                        .flatten()
                        .collect();
                    return ResultPayload::Keyed(items);
                }
                ResultPayload::Single(JsonValue::Object(obj))
            }
            _ => ResultPayload::Empty,
        }
    }

    pub fn into_items(self) -> Vec<JsonValue> {
        match self {
            ResultPayload::List(items)
            | ResultPayload::Wrapped(items)
            | ResultPayload::Keyed(items) => items,
            ResultPayload::Single(obj) => vec![obj],
            ResultPayload::Empty => Vec::new(),
        }
    }
}

/// Decode a `resultado` payload and normalize every item in it.
pub fn normalize_payload(payload: JsonValue) -> Vec<StartupRecord> {
    ResultPayload::decode(payload)
        .into_items()
        .iter()
        .map(normalize_startup)
        .collect()
}

// ---------------------------------------------------------------------------
// Field fallbacks
// ---------------------------------------------------------------------------

const NAME_KEYS: &[&str] = &["nome", "name", "company"];
const SITE_KEYS: &[&str] = &["site", "url", "website"];
const SECTOR_KEYS: &[&str] = &["setor", "sector", "industry"];
const YEAR_KEYS: &[&str] = &["ano_fundacao", "year", "founded_year", "founded"];
const VALUE_KEYS: &[&str] = &["valor_investimento", "investment_value", "valor", "funding"];
const ROUND_KEYS: &[&str] = &["rodada", "round", "funding_round"];
const DATE_KEYS: &[&str] = &["data_investimento", "investment_date", "date"];
const INVESTOR_KEYS: &[&str] = &["vc_investidor", "vc", "investor"];
const DESCRIPTION_KEYS: &[&str] = &["descricao_breve", "description", "bio", "summary"];
const LINKEDIN_KEYS: &[&str] = &["linkedin_fundador", "linkedin", "founder_linkedin"];

/// Map one source item onto a [`StartupRecord`]. Never fails: anything
/// missing becomes a placeholder, and non-object items become a record of
/// placeholders.
pub fn normalize_startup(raw: &JsonValue) -> StartupRecord {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    StartupRecord {
        id: record_id(obj, raw),
        name: text_or(obj, NAME_KEYS, NAME_NOT_INFORMED),
        site: text_or(obj, SITE_KEYS, ""),
        sector: text_or(obj, SECTOR_KEYS, NOT_INFORMED),
        founding_year: first_present(obj, YEAR_KEYS).and_then(as_year),
        investment_value: first_present(obj, VALUE_KEYS)
            .map(as_investment)
            .unwrap_or_default(),
        round: text_or(obj, ROUND_KEYS, NOT_INFORMED_F),
        investment_date: text_or(obj, DATE_KEYS, NOT_INFORMED_F),
        investor_name: text_or(obj, INVESTOR_KEYS, NOT_INFORMED),
        short_description: text_or(obj, DESCRIPTION_KEYS, ""),
        founder_linkedin: text_or(obj, LINKEDIN_KEYS, ""),
        raw: raw.clone(),
    }
}

/// Empty strings, zero, `false` and `null` count as missing.
fn is_present(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn first_present<'a>(obj: &'a Map<String, JsonValue>, keys: &[&str]) -> Option<&'a JsonValue> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| is_present(value))
}

fn as_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text_or(obj: &Map<String, JsonValue>, keys: &[&str], fallback: &str) -> String {
    first_present(obj, keys)
        .map(as_text)
        .unwrap_or_else(|| fallback.to_string())
}

fn as_year(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_investment(value: &JsonValue) -> InvestmentValue {
    match value {
        JsonValue::Number(n) => n
            .as_f64()
            .map(InvestmentValue::Number)
            .unwrap_or_else(|| InvestmentValue::Text(n.to_string())),
        other => InvestmentValue::Text(as_text(other)),
    }
}

// ---------------------------------------------------------------------------
// Record ids
// ---------------------------------------------------------------------------

const FNV1A64_OFFSET: u64 = 0xcbf29ce484222325;
const FNV1A64_PRIME: u64 = 0x100000001b3;

/// FNV-1a, 64 bit. Fixed algorithm: generated ids key the favorites file and
/// must survive toolchain upgrades.
fn fnv1a_64(input: &str) -> u64 {
    let mut hash = FNV1A64_OFFSET;
    for byte in input.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV1A64_PRIME);
    }
    hash
}

/// The source id when it has one, otherwise a slug of the name plus a hash of
/// the whole source object, so re-normalizing the same object gives the same id.
fn record_id(obj: &Map<String, JsonValue>, raw: &JsonValue) -> String {
    if let Some(id) = obj.get("id").filter(|v| is_present(v)) {
        return as_text(id);
    }

    let name = first_present(obj, &["nome", "name"])
        .map(as_text)
        .unwrap_or_else(|| "unknown".to_string());
    let slug: String = name
        .chars()
        .take(20)
        .filter(char::is_ascii_alphanumeric)
        .collect();

    let suffix = fnv1a_64(&raw.to_string()) & 0xff_ffff;

    format!("{slug}-{suffix:06x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_every_payload_shape() {
        assert_eq!(
            ResultPayload::decode(json!([{"nome": "A"}])),
            ResultPayload::List(vec![json!({"nome": "A"})])
        );
        assert_eq!(
            ResultPayload::decode(json!({"result": [{"nome": "A"}], "extra": [1]})),
            ResultPayload::Wrapped(vec![json!({"nome": "A"})])
        );
        assert_eq!(
            ResultPayload::decode(json!({"b": [{"nome": "B"}], "note": "x", "a": [{"nome": "A"}]})),
            ResultPayload::Keyed(vec![json!({"nome": "B"}), json!({"nome": "A"})])
        );
        assert_eq!(
            ResultPayload::decode(json!({"nome": "A"})),
            ResultPayload::Single(json!({"nome": "A"}))
        );
        assert_eq!(ResultPayload::decode(json!(null)), ResultPayload::Empty);
        assert_eq!(ResultPayload::decode(json!("texto")), ResultPayload::Empty);
    }

    #[test]
    fn non_array_result_field_falls_through_to_keyed_scan() {
        let payload = json!({"result": "ok", "startups": [{"nome": "A"}]});
        assert_eq!(
            ResultPayload::decode(payload),
            ResultPayload::Keyed(vec![json!({"nome": "A"})])
        );
    }

    #[test]
    fn first_non_empty_alias_wins() {
        let rec = normalize_startup(&json!({
            "nome": "",
            "name": "Acme",
            "industry": "Agtech",
            "founded": "2019",
            "funding": "2,5M",
            "round": "Series A",
            "vc": "Kaszek",
            "summary": "Sensores de solo",
            "linkedin": "https://linkedin.com/in/foo"
        }));
        assert_eq!(rec.name, "Acme");
        assert_eq!(rec.sector, "Agtech");
        assert_eq!(rec.founding_year, Some(2019));
        assert_eq!(rec.investment_value, InvestmentValue::Text("2,5M".into()));
        assert_eq!(rec.round, "Series A");
        assert_eq!(rec.investor_name, "Kaszek");
        assert_eq!(rec.short_description, "Sensores de solo");
        assert_eq!(rec.founder_linkedin, "https://linkedin.com/in/foo");
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let rec = normalize_startup(&json!({}));
        assert_eq!(rec.name, NAME_NOT_INFORMED);
        assert_eq!(rec.site, "");
        assert_eq!(rec.sector, NOT_INFORMED);
        assert_eq!(rec.founding_year, None);
        assert_eq!(rec.investment_value, InvestmentValue::Text(NOT_INFORMED.into()));
        assert_eq!(rec.round, NOT_INFORMED_F);
        assert_eq!(rec.investment_date, NOT_INFORMED_F);
        assert_eq!(rec.investor_name, NOT_INFORMED);
        assert!(rec.id.starts_with("unknown-"));
    }

    #[test]
    fn non_object_items_do_not_fail() {
        let rec = normalize_startup(&json!("just a string"));
        assert_eq!(rec.name, NAME_NOT_INFORMED);
        assert_eq!(rec.raw, json!("just a string"));
        let rec = normalize_startup(&JsonValue::Null);
        assert_eq!(rec.raw, JsonValue::Null);
    }

    #[test]
    fn non_numeric_year_is_null() {
        let rec = normalize_startup(&json!({"nome": "A", "ano_fundacao": "c. 2015"}));
        assert_eq!(rec.founding_year, None);
        let rec = normalize_startup(&json!({"nome": "A", "year": 2015.0}));
        assert_eq!(rec.founding_year, Some(2015));
    }

    #[test]
    fn source_id_is_kept() {
        assert_eq!(normalize_startup(&json!({"id": "abc", "nome": "A"})).id, "abc");
        assert_eq!(normalize_startup(&json!({"id": 17, "nome": "A"})).id, "17");
    }

    #[test]
    fn generated_id_is_stable_and_content_derived() {
        let raw = json!({"nome": "Nubank S.A. (Brasil) Ltda extra", "setor": "Fintech"});
        let first = normalize_startup(&raw);
        let second = normalize_startup(&first.raw);
        assert_eq!(first.id, second.id);
        assert!(first.id.starts_with("NubankSABrasil-"));

        let other = normalize_startup(&json!({"nome": "Nubank S.A. (Brasil) Ltda extra", "setor": "Bank"}));
        assert_ne!(first.id, other.id);
    }

    #[test]
    fn generated_id_hash_is_pinned() {
        // favorites saved by earlier builds must still match
        assert_eq!(normalize_startup(&json!({"nome": "A"})).id, "A-e0f821");
    }

    #[test]
    fn renormalizing_raw_keeps_fields() {
        let raw = json!({"company": "Foo", "sector": "Saúde", "valor": 3000, "date": "2023-01"});
        let first = normalize_startup(&raw);
        let second = normalize_startup(&first.raw);
        assert_eq!(first, second);
    }

    #[test]
    fn payload_is_flattened_and_normalized() {
        let records = normalize_payload(json!({"portfolio": [{"nome": "A"}, {"nome": "B"}]}));
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }
}
