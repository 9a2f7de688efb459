use super::model::StartupRecord;
use super::number::parse_human_number;

// ---------------------------------------------------------------------------
// Filter configuration: the raw text of the filter controls
// ---------------------------------------------------------------------------

/// What the user typed into the filter controls. Empty fields mean
/// "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub year_from: String,
    pub year_to: String,
    pub sector: String,
    pub min_value: String,
    pub max_value: String,
}

impl FilterConfig {
    pub fn is_empty(&self) -> bool {
        self.compile().is_unconstrained()
    }

    pub fn compile(&self) -> FilterPredicates {
        FilterPredicates {
            year_from: parse_year(&self.year_from),
            year_to: parse_year(&self.year_to),
            sector: Some(self.sector.trim().to_lowercase()).filter(|s| !s.is_empty()),
            min_value: parse_human_number(&self.min_value),
            max_value: parse_human_number(&self.max_value),
        }
    }
}

/// Year bounds accept anything that reads as a non-zero number.
fn parse_year(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|y| y.is_finite() && *y != 0.0)
}

// ---------------------------------------------------------------------------
// Compiled predicates
// ---------------------------------------------------------------------------

/// Parsed form of a [`FilterConfig`]. `None` means the bound is not set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPredicates {
    pub year_from: Option<f64>,
    pub year_to: Option<f64>,
    /// Lower-cased, trimmed.
    pub sector: Option<String>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
}

impl FilterPredicates {
    pub fn is_unconstrained(&self) -> bool {
        self == &FilterPredicates::default()
    }

    /// Whether a record passes every configured predicate.
    ///
    /// * A record without a founding year is not held to the year bounds.
    /// * A record whose value does not parse is not held to the value bounds.
    pub fn matches(&self, record: &StartupRecord) -> bool {
        if let Some(year) = record.founding_year.filter(|y| *y != 0) {
            let year = year as f64;
            if self.year_from.is_some_and(|from| year < from) {
                return false;
            }
            if self.year_to.is_some_and(|to| year > to) {
                return false;
            }
        }

        if let Some(needle) = &self.sector {
            if !record.sector.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }

        if self.min_value.is_some() || self.max_value.is_some() {
            if let Some(amount) = record.investment_value.amount() {
                if self.min_value.is_some_and(|min| amount < min) {
                    return false;
                }
                if self.max_value.is_some_and(|max| amount > max) {
                    return false;
                }
            }
        }

        true
    }
}

/// Return indices of records that pass all active filters, in input order.
pub fn filtered_indices(records: &[StartupRecord], filters: &FilterPredicates) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| filters.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalize::normalize_startup;
    use serde_json::json;

    fn sample() -> Vec<StartupRecord> {
        [
            json!({"nome": "A", "setor": "Fintech", "ano_fundacao": 2015, "valor_investimento": "1,5M"}),
            json!({"nome": "B", "setor": "HealthTech", "ano_fundacao": 2021, "valor_investimento": 300000}),
            json!({"nome": "C", "setor": "Agro", "valor_investimento": "não divulgado"}),
            json!({"nome": "D", "setor": "Fintech B2B", "ano_fundacao": "2019", "valor_investimento": "20k"}),
        ]
        .iter()
        .map(normalize_startup)
        .collect()
    }

    fn run(config: FilterConfig) -> Vec<usize> {
        filtered_indices(&sample(), &config.compile())
    }

    #[test]
    fn empty_config_keeps_everything_in_order() {
        let config = FilterConfig::default();
        assert!(config.is_empty());
        assert_eq!(run(config), vec![0, 1, 2, 3]);
    }

    #[test]
    fn whitespace_only_inputs_are_no_constraint() {
        let config = FilterConfig {
            sector: "   ".into(),
            year_from: " ".into(),
            min_value: " ".into(),
            ..Default::default()
        };
        assert!(config.is_empty());
        assert_eq!(run(config), vec![0, 1, 2, 3]);
    }

    #[test]
    fn year_bounds_skip_records_without_year() {
        let config = FilterConfig {
            year_from: "2018".into(),
            ..Default::default()
        };
        assert_eq!(run(config), vec![1, 2, 3]);

        let config = FilterConfig {
            year_from: "2016".into(),
            year_to: "2020".into(),
            ..Default::default()
        };
        assert_eq!(run(config), vec![2, 3]);
    }

    #[test]
    fn non_numeric_year_bound_is_ignored() {
        let config = FilterConfig {
            year_from: "recent".into(),
            ..Default::default()
        };
        assert_eq!(run(config), vec![0, 1, 2, 3]);
    }

    #[test]
    fn sector_is_case_insensitive_substring() {
        let config = FilterConfig {
            sector: " FINTECH ".into(),
            ..Default::default()
        };
        assert_eq!(run(config), vec![0, 3]);
    }

    #[test]
    fn value_bounds_use_human_numbers() {
        let config = FilterConfig {
            min_value: "100k".into(),
            ..Default::default()
        };
        assert_eq!(run(config), vec![0, 1, 2]);

        let config = FilterConfig {
            max_value: "500.000".into(),
            ..Default::default()
        };
        assert_eq!(run(config), vec![1, 2, 3]);
    }

    #[test]
    fn unparsable_value_is_never_excluded() {
        for config in [
            FilterConfig { min_value: "1".into(), ..Default::default() },
            FilterConfig { max_value: "1".into(), ..Default::default() },
            FilterConfig { min_value: "10B".into(), max_value: "20B".into(), ..Default::default() },
        ] {
            assert!(run(config).contains(&2));
        }
    }

    #[test]
    fn predicates_combine() {
        let config = FilterConfig {
            sector: "fin".into(),
            year_to: "2018".into(),
            min_value: "1M".into(),
            ..Default::default()
        };
        assert_eq!(run(config), vec![0]);
    }
}
