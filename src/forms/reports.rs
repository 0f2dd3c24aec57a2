use serde::Deserialize;

use crate::domain::report::{DateFilter, DateFilterError};

/// Query string shared by the dashboard, the sales report and its download.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
    /// Export format for downloads: `pdf` or `excel`.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default, alias = "limit")]
    pub per_page: Option<usize>,
}

impl ReportQuery {
    pub fn date_filter(&self) -> Result<Option<DateFilter>, DateFilterError> {
        DateFilter::parse(
            self.filter.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_filter_reads_bounds() {
        let query = ReportQuery {
            filter: Some("custom".to_string()),
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-31".to_string()),
            ..ReportQuery::default()
        };

        assert!(matches!(
            query.date_filter(),
            Ok(Some(DateFilter::Custom { .. }))
        ));
    }
}
