use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use math::interp::{LogLogTable, TableShape};
use serde::Deserialize;

use crate::{GpTable, Material, MaterialError};

const BUILTIN: &str = include_str!("../data/materials.json");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ColumnRecord {
    energies: Vec<f64>,
    values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuildupRecord {
    energies: Vec<f64>,
    /// One `[b, c, a, X, d]` row per energy.
    coefficients: Vec<[f64; 5]>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MaterialRecord {
    density: f64,
    attenuation: ColumnRecord,
    energy_absorption: ColumnRecord,
    #[serde(default)]
    buildup: Option<BuildupRecord>,
}

/// Read-only collection of materials keyed by lowercase name.
///
/// Loaded once from a JSON document of the form
/// ```json
/// { "water": { "density": 1.0,
///              "attenuation": { "energies": [...], "values": [...] },
///              "energy_absorption": { "energies": [...], "values": [...] },
///              "buildup": { "energies": [...], "coefficients": [[b, c, a, X, d], ...] } } }
/// ```
/// Every table is validated on load; lookups never touch the source document again.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    materials: HashMap<String, Material>,
}

impl MaterialLibrary {
    /// The library compiled into the crate: air, water, concrete, iron and lead.
    pub fn builtin() -> Result<Self, MaterialError> {
        Self::from_json_str(BUILTIN)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, MaterialError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let library = Self::from_json_str(&text)?;
        log::info!(
            "Loaded {} materials from {}",
            library.len(),
            path.as_ref().display()
        );
        Ok(library)
    }

    pub fn from_json_str(text: &str) -> Result<Self, MaterialError> {
        let records: BTreeMap<String, MaterialRecord> = serde_json::from_str(text)?;
        let mut materials = HashMap::with_capacity(records.len());
        for (name, record) in records {
            let key = name.to_lowercase();
            let material = build_material(&key, record)?;
            if materials.insert(key.clone(), material).is_some() {
                return Err(MaterialError::MalformedTable {
                    material: key,
                    reason: "defined more than once".to_string(),
                });
            }
        }
        log::debug!("Material library holds {} entries", materials.len());
        Ok(Self { materials })
    }

    /// Looks up a material; names are case-insensitive.
    pub fn get(&self, name: &str) -> Result<&Material, MaterialError> {
        self.materials
            .get(&name.to_lowercase())
            .ok_or_else(|| MaterialError::UnknownMaterial(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(&name.to_lowercase())
    }

    /// Material names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.materials.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn density(&self, material: &str) -> Result<f64, MaterialError> {
        Ok(self.get(material)?.density())
    }

    pub fn attenuation_coefficient(&self, material: &str, energy: f64) -> Result<f64, MaterialError> {
        self.get(material)?.mass_attenuation(energy)
    }

    pub fn energy_absorption_coefficient(&self, material: &str, energy: f64) -> Result<f64, MaterialError> {
        self.get(material)?.mass_energy_absorption(energy)
    }

    pub fn buildup_factor(&self, material: &str, energy: f64, mfp: f64) -> Result<f64, MaterialError> {
        self.get(material)?.buildup(energy, mfp)
    }
}

fn build_material(name: &str, record: MaterialRecord) -> Result<Material, MaterialError> {
    if !(record.density > 0.0 && record.density.is_finite()) {
        return Err(MaterialError::MalformedTable {
            material: name.to_string(),
            reason: format!("density must be positive, got {}", record.density),
        });
    }
    let attenuation = coefficient_table(name, "attenuation", record.attenuation)?;
    let energy_absorption = coefficient_table(name, "energy absorption", record.energy_absorption)?;
    let buildup = record
        .buildup
        .map(|b| buildup_table(name, b))
        .transpose()?;
    Ok(Material {
        name: name.to_string(),
        density: record.density,
        attenuation,
        energy_absorption,
        buildup,
    })
}

/// Cross sections are interpolated in log space, so they must be strictly positive.
fn coefficient_table(
    material: &str, column: &'static str, record: ColumnRecord,
) -> Result<LogLogTable, MaterialError> {
    check_lengths(material, column, record.energies.len(), record.values.len())?;
    if let Some(index) = record.values.iter().position(|&v| !(v > 0.0)) {
        return Err(MaterialError::MalformedTable {
            material: material.to_string(),
            reason: format!("{} coefficient at entry {} is not positive", column, index),
        });
    }
    LogLogTable::new(record.energies, record.values)
        .map_err(|shape| table_error(material, column, shape))
}

fn buildup_table(material: &str, record: BuildupRecord) -> Result<GpTable, MaterialError> {
    let column = "buildup";
    check_lengths(material, column, record.energies.len(), record.coefficients.len())?;
    GpTable::new(&record.energies, &record.coefficients).map_err(|shape| table_error(material, column, shape))
}

fn check_lengths(
    material: &str, column: &'static str, energies: usize, values: usize,
) -> Result<(), MaterialError> {
    if energies == values {
        Ok(())
    } else {
        Err(MaterialError::MalformedTable {
            material: material.to_string(),
            reason: format!("{} has {} energies but {} values", column, energies, values),
        })
    }
}

fn table_error(material: &str, column: &'static str, shape: TableShape) -> MaterialError {
    let material = material.to_string();
    match shape {
        TableShape::Unsorted(index) => MaterialError::UnsortedTable {
            material,
            column,
            index,
        },
        TableShape::TooShort => MaterialError::MalformedTable {
            material,
            reason: format!("{} needs at least two tabulated energies", column),
        },
        TableShape::OutOfDomain(index) => MaterialError::MalformedTable {
            material,
            reason: format!("{} entry {} is not a positive finite energy with a finite value", column, index),
        },
    }
}
