//! GRIB2 parameter and level lookup tables.
//!
//! Translates the numeric (discipline, category, number) triple of a
//! product definition into the names records are selected by, and level
//! type codes into readable descriptions for log output.

use std::collections::HashMap;

/// Lookup key for parameter: (discipline, category, number)
pub type ParamKey = (u8, u8, u8);

/// Short and long names of a GRIB2 parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterName {
    /// NCEP abbreviation (e.g., "UGRD")
    pub short_name: String,
    /// Descriptive name records are selected by (e.g., "U component of wind")
    pub long_name: String,
}

/// Level description - either static text or a template with {value} placeholder
#[derive(Debug, Clone)]
pub enum LevelDescription {
    /// Static description (e.g., "surface", "mean sea level")
    Static(String),
    /// Template with {value} placeholder (e.g., "{value} hPa", "{value} m above ground")
    Template(String),
}

impl LevelDescription {
    /// Format the level description, substituting `{value}` if it's a template.
    pub fn format(&self, value: f64) -> String {
        match self {
            LevelDescription::Static(s) => s.clone(),
            LevelDescription::Template(t) => t.replace("{value}", &value.to_string()),
        }
    }
}

/// GRIB2 parameter and level lookup tables.
#[derive(Debug, Clone, Default)]
pub struct Grib2Tables {
    parameters: HashMap<ParamKey, ParameterName>,
    levels: HashMap<u8, LevelDescription>,
}

impl Grib2Tables {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables covering the momentum (wind) parameters of discipline 0 and
    /// the level types wind fields are commonly published on.
    pub fn wind() -> Self {
        let mut tables = Self::new();

        // Discipline 0, category 2: Momentum
        tables.add_parameter(0, 2, 0, "WDIR", "Wind direction (from which blowing)");
        tables.add_parameter(0, 2, 1, "WIND", "Wind speed");
        tables.add_parameter(0, 2, 2, "UGRD", "U component of wind");
        tables.add_parameter(0, 2, 3, "VGRD", "V component of wind");
        tables.add_parameter(0, 2, 8, "VVEL", "Vertical velocity");
        tables.add_parameter(0, 2, 10, "ABSV", "Absolute vorticity");
        tables.add_parameter(0, 2, 22, "GUST", "Wind speed (gust)");
        // NCEP local
        tables.add_parameter(0, 2, 194, "USTM", "U-component storm motion");
        tables.add_parameter(0, 2, 195, "VSTM", "V-component storm motion");

        tables.add_level(1, LevelDescription::Static("surface".to_string()));
        tables.add_level(6, LevelDescription::Static("max wind".to_string()));
        tables.add_level(7, LevelDescription::Static("tropopause".to_string()));
        tables.add_level(100, LevelDescription::Template("{value} hPa".to_string()));
        tables.add_level(101, LevelDescription::Static("mean sea level".to_string()));
        tables.add_level(102, LevelDescription::Template("{value} m above MSL".to_string()));
        tables.add_level(103, LevelDescription::Template("{value} m above ground".to_string()));
        tables.add_level(104, LevelDescription::Template("sigma level {value}".to_string()));
        tables.add_level(220, LevelDescription::Static("planetary boundary layer".to_string()));

        tables
    }

    /// Add a parameter mapping
    pub fn add_parameter(&mut self, discipline: u8, category: u8, number: u8, short: &str, long: &str) {
        self.parameters.insert(
            (discipline, category, number),
            ParameterName {
                short_name: short.to_string(),
                long_name: long.to_string(),
            },
        );
    }

    /// Add a level description mapping
    pub fn add_level(&mut self, level_type: u8, description: LevelDescription) {
        self.levels.insert(level_type, description);
    }

    /// Look up a parameter by its GRIB2 codes.
    pub fn parameter(&self, discipline: u8, category: u8, number: u8) -> Option<&ParameterName> {
        self.parameters.get(&(discipline, category, number))
    }

    /// Short name for a code triple; "P{discipline}_{category}_{number}" if unknown.
    pub fn short_name(&self, discipline: u8, category: u8, number: u8) -> String {
        self.parameter(discipline, category, number)
            .map(|p| p.short_name.clone())
            .unwrap_or_else(|| format!("P{}_{}_{}", discipline, category, number))
    }

    /// Find the code triple for a parameter name.
    ///
    /// Matches the long name exactly or the short name case-insensitively.
    pub fn key_for_name(&self, name: &str) -> Option<ParamKey> {
        self.parameters
            .iter()
            .find(|(_, p)| p.long_name == name || p.short_name.eq_ignore_ascii_case(name))
            .map(|(key, _)| *key)
    }

    /// Look up level description by type code and value.
    ///
    /// Returns "Level type {type} value {value}" if not found.
    pub fn level_description(&self, level_type: u8, level_value: f64) -> String {
        match self.levels.get(&level_type) {
            Some(desc) => desc.format(level_value),
            None => format!("Level type {} value {}", level_type, level_value),
        }
    }
}
