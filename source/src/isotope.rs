use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::spectrum::Photon;
use crate::SourceError;

const BUILTIN: &str = include_str!("../data/isotopes.json");

/// Unit a half-life is tabulated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfLifeUnit {
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    /// 365.25 days.
    Year,
}

impl HalfLifeUnit {
    pub fn seconds(self) -> f64 {
        match self {
            Self::Microsecond => 1e-6,
            Self::Millisecond => 1e-3,
            Self::Second => 1.0,
            Self::Minute => 60.0,
            Self::Hour => 3600.0,
            Self::Day => 86400.0,
            Self::Year => 86400.0 * 365.25,
        }
    }
}

impl FromStr for HalfLifeUnit {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "usecond" => Ok(Self::Microsecond),
            "msecond" => Ok(Self::Millisecond),
            "second" => Ok(Self::Second),
            "minute" => Ok(Self::Minute),
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "year" => Ok(Self::Year),
            _ => Err(SourceError::InvalidHalfLifeUnit(s.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IsotopeRecord {
    half_life: f64,
    half_life_unit: String,
    /// `[energy MeV, photons per decay]` pairs.
    photons: Vec<[f64; 2]>,
    #[serde(default)]
    key_progeny: BTreeMap<String, f64>,
}

/// Decay data of one isotope.
#[derive(Debug, Clone, PartialEq)]
pub struct Isotope {
    pub name: String,
    /// Half-life in seconds.
    pub half_life: f64,
    /// Photon lines, yields per decay.
    pub photons: Vec<Photon>,
    /// Daughters that reach equilibrium with this isotope, with their branching fractions.
    pub key_progeny: Vec<(String, f64)>,
}

/// Read-only isotope library. Lookup is case-insensitive: "co-60", "CO-60" and "Co-60" all find
/// the same record.
#[derive(Debug, Clone, Default)]
pub struct IsotopeLibrary {
    isotopes: HashMap<String, Isotope>,
}

impl IsotopeLibrary {
    pub fn builtin() -> Result<Self, SourceError> {
        Self::from_json_str(BUILTIN)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let library = Self::from_json_str(&text)?;
        log::info!(
            "Loaded {} isotopes from {}",
            library.len(),
            path.as_ref().display()
        );
        Ok(library)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SourceError> {
        let records: BTreeMap<String, IsotopeRecord> = serde_json::from_str(text)?;
        let mut isotopes = HashMap::with_capacity(records.len());
        for (name, record) in records {
            let unit = record.half_life_unit.parse::<HalfLifeUnit>()?;
            let photons = record
                .photons
                .iter()
                .map(|&[energy, intensity]| Photon::new(energy, intensity))
                .collect::<Result<Vec<_>, _>>()?;
            let isotope = Isotope {
                half_life: record.half_life * unit.seconds(),
                photons,
                key_progeny: record.key_progeny.into_iter().collect(),
                name: name.clone(),
            };
            if isotopes.insert(name.to_lowercase(), isotope).is_some() {
                return Err(SourceError::DuplicateIsotope(name));
            }
        }
        Ok(Self { isotopes })
    }

    pub fn get(&self, name: &str) -> Result<&Isotope, SourceError> {
        self.isotopes
            .get(&name.to_lowercase())
            .ok_or_else(|| SourceError::UnknownIsotope(name.to_string()))
    }

    /// Photon lines `(energy, photons per decay)` of an isotope.
    pub fn lookup(&self, name: &str) -> Result<&[Photon], SourceError> {
        Ok(&self.get(name)?.photons)
    }

    pub fn len(&self) -> usize {
        self.isotopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.isotopes.is_empty()
    }
}
