//! Indicator catalog: display name -> source-specific identifier.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use crate::domain::{Indicator, Reducer, SeriesId};
use crate::error::AppError;

/// Ordered list of indicators offered to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    indicators: Vec<Indicator>,
}

impl Catalog {
    /// Validate and wrap a list of indicators (names must be unique and non-empty).
    pub fn new(indicators: Vec<Indicator>) -> Result<Self, AppError> {
        if indicators.is_empty() {
            return Err(AppError::usage("Indicator catalog is empty."));
        }
        let mut seen = HashSet::new();
        for ind in &indicators {
            if ind.name.trim().is_empty() {
                return Err(AppError::usage("Indicator catalog contains an entry without a name."));
            }
            if !seen.insert(ind.name.as_str()) {
                return Err(AppError::usage(format!(
                    "Duplicate indicator name in catalog: '{}'.",
                    ind.name
                )));
            }
        }
        Ok(Self { indicators })
    }

    /// Built-in indicators (IMF WEO / PCPS and FRED).
    pub fn builtin() -> Self {
        let indicators = vec![
            Indicator::new("Brent Crude Oil ($ per barrel)", SeriesId::imf("WEO", "G001.POILBRE.A")).with_unit("$"),
            Indicator::new("Real GDP Growth (%) - World", SeriesId::imf("WEO", "G001.NGDP_RPCH.A")).with_unit("%"),
            Indicator::new("Inflation (%) - World", SeriesId::imf("WEO", "G001.PCPIPCH.A")).with_unit("%"),
            Indicator::new("Food Price Index (2016=100)", SeriesId::imf("PCPS", "G001.PFOOD.IX.A")),
            Indicator::new("Fed Funds Rate (%)", SeriesId::fred("FEDFUNDS", Reducer::Mean)).with_unit("%"),
            Indicator::new(
                "Brent Crude Oil, year-end ($ per barrel)",
                SeriesId::fred("DCOILBRENTEU", Reducer::Last),
            )
            .with_unit("$"),
            Indicator::new(
                "WTI Crude Oil, annual avg ($ per barrel)",
                SeriesId::fred("DCOILWTICO", Reducer::Mean),
            )
            .with_unit("$"),
            Indicator::new("CPI All Urban Consumers (index)", SeriesId::fred("CPIAUCSL", Reducer::Mean)),
        ];
        Self { indicators }
    }

    /// Load a JSON catalog (array of indicator entries).
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::usage(format!("Failed to open catalog '{}': {e}", path.display())))?;
        let indicators: Vec<Indicator> = serde_json::from_reader(file)
            .map_err(|e| AppError::usage(format!("Invalid catalog JSON '{}': {e}", path.display())))?;
        Self::new(indicators)
    }

    /// Catalog file if given, otherwise the built-in list.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(p) => Self::from_json_file(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.name == name)
    }

    /// Resolve display names in the given order; unknown names are a usage error.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Indicator>, AppError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name).cloned().ok_or_else(|| {
                    AppError::usage(format!(
                        "Unknown indicator '{name}'. Run `mdash list` to see available indicators."
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceKind;

    #[test]
    fn builtin_catalog_is_valid() {
        let builtin = Catalog::builtin();
        let checked = Catalog::new(builtin.indicators().to_vec()).unwrap();
        assert_eq!(checked, builtin);
        assert_eq!(builtin.indicators()[0].name, "Brent Crude Oil ($ per barrel)");
        assert!(builtin.indicators().iter().any(|i| i.id.source() == SourceKind::Fred));
    }

    #[test]
    fn resolve_keeps_selection_order() {
        let catalog = Catalog::builtin();
        let picked = catalog
            .resolve(&["Fed Funds Rate (%)", "Inflation (%) - World"])
            .unwrap();
        assert_eq!(picked[0].id, SeriesId::fred("FEDFUNDS", Reducer::Mean));
        assert_eq!(picked[1].id, SeriesId::imf("WEO", "G001.PCPIPCH.A"));
    }

    #[test]
    fn unknown_name_is_a_usage_error() {
        let err = Catalog::builtin().resolve(&["Gold"]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
        assert!(err.to_string().contains("Gold"));
    }

    #[test]
    fn duplicates_and_empty_catalogs_are_rejected() {
        let a = Indicator::new("A", SeriesId::imf("WEO", "X"));
        assert!(Catalog::new(vec![a.clone(), a]).is_err());
        assert!(Catalog::new(vec![]).is_err());
    }
}
