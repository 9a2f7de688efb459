use std::collections::HashMap;

use super::model::{StartupRecord, NOT_INFORMED, OTHER_SECTOR};

/// How many sectors the chart shows.
pub const CHART_SECTORS: usize = 6;

/// One bar of the sector histogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorCount {
    pub sector: String,
    pub count: usize,
}

/// Summary numbers shown above the result cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total_startups: usize,
    /// Sum of every parseable investment value; unparseable ones add nothing.
    pub total_value: i64,
    /// Number of VC names in the query that produced the results.
    pub total_vcs: usize,
    /// Full histogram, largest first; ties keep first-seen order.
    pub sectors: Vec<SectorCount>,
}

impl Summary {
    /// Aggregate the records at `indices` (the filtered view).
    pub fn compute(records: &[StartupRecord], indices: &[usize], total_vcs: usize) -> Self {
        let visible = || indices.iter().filter_map(|&i| records.get(i));

        let total_value = visible()
            .filter_map(|rec| rec.investment_value.amount())
            .fold(0i64, i64::saturating_add);

        Summary {
            total_startups: visible().count(),
            total_value,
            total_vcs,
            sectors: sector_histogram(visible()),
        }
    }

    /// The bars the chart draws.
    pub fn top_sectors(&self) -> &[SectorCount] {
        &self.sectors[..self.sectors.len().min(CHART_SECTORS)]
    }
}

/// Count records per sector. The "not informed" placeholder is counted as
/// [`OTHER_SECTOR`].
pub fn sector_histogram<'a>(records: impl IntoIterator<Item = &'a StartupRecord>) -> Vec<SectorCount> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut histogram: Vec<SectorCount> = Vec::new();

    for rec in records {
        let sector = if rec.sector == NOT_INFORMED {
            OTHER_SECTOR
        } else {
            rec.sector.as_str()
        };
        match slots.get(sector) {
            Some(&slot) => histogram[slot].count += 1,
            None => {
                slots.insert(sector, histogram.len());
                histogram.push(SectorCount {
                    sector: sector.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable: equal counts stay in first-seen order
    histogram.sort_by(|a, b| b.count.cmp(&a.count));
    histogram
}
