use std::f64::consts::PI;

use geometry::ray::Ray;
use material::{Material, MaterialAssignment};
use math::hcm::Point3;
use rayon::prelude::*;
use source::{Photon, SamplePoint, Source};

use crate::report::LineResult;
use crate::{CalcError, Model};

/// Sample points closer than this to the detector (cm) make the calculation fail.
pub const MIN_DISTANCE: f64 = 1e-6;

/// How a single buildup factor is chosen for a ray that crosses several materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildupPolicy {
    /// No buildup: uncollided flux only.
    Unity,
    /// Buildup of the model's reference material at the total mean free path.
    Reference,
    /// Buildup, at the total mean free path, of the material that contributes the most mean free
    /// paths along the ray, summed over every medium made of it; the reference material stands in
    /// when that one has no buildup data.
    #[default]
    DominantMaterial,
}

/// A material along the ray, resolved against the library once per calculation.
#[derive(Clone, Copy)]
struct Medium<'a> {
    material: &'a Material,
    density: Option<f64>,
}

impl<'a> Medium<'a> {
    fn resolve(assignment: &MaterialAssignment, model: &'a Model) -> Result<Self, CalcError> {
        Ok(Self {
            material: assignment.resolve(&model.materials)?,
            density: assignment.density,
        })
    }

    fn linear_attenuation(&self, energy: f64) -> Result<f64, CalcError> {
        Ok(self.material.linear_attenuation(energy, self.density)?)
    }
}

/// Where the ray from one sample point to the detector spends its length. Energy independent,
/// so it is computed once per sample point.
#[derive(Debug, Clone)]
struct PathLengths {
    distance: f64,
    /// Length in each medium, in traversal order: source body, shields, filler.
    lengths: Vec<f64>,
}

/// Runs the point-kernel integration for one detector over a borrowed model.
pub(crate) struct Engine<'a> {
    model: &'a Model,
    /// Source body of each source, in source order.
    sources: Vec<Option<Medium<'a>>>,
    shields: Vec<Medium<'a>>,
    filler: Option<Medium<'a>>,
    reference: Option<&'a Material>,
    response: &'a Material,
}

impl<'a> Engine<'a> {
    /// Resolves every material the model names; an unknown one fails here, before any ray is
    /// traced.
    pub fn new(model: &'a Model) -> Result<Self, CalcError> {
        let sources = model
            .sources
            .iter()
            .map(|s| s.material().map(|m| Medium::resolve(m, model)).transpose())
            .collect::<Result<Vec<_>, _>>()?;
        let shields = model
            .shields
            .iter()
            .map(|s| Medium::resolve(s.material(), model))
            .collect::<Result<Vec<_>, _>>()?;
        let filler = model
            .filler
            .as_ref()
            .map(|f| Medium::resolve(f, model))
            .transpose()?;
        let reference = model
            .buildup_reference
            .as_deref()
            .map(|name| model.materials.get(name))
            .transpose()?;
        let response = model.materials.get(&model.response_material)?;
        Ok(Self {
            model,
            sources,
            shields,
            filler,
            reference,
            response,
        })
    }

    /// Line results of every source at `detector`, in source order.
    pub fn run(&self, detector: Point3) -> Result<Vec<LineResult>, CalcError> {
        if self.model.sources.is_empty() {
            return Err(CalcError::NoSources);
        }
        let mut results = vec![];
        for (i, (source, medium)) in self.model.sources.iter().zip(self.sources.iter()).enumerate() {
            log::debug!("Source {}: {}", i, source.summary());
            results.extend(self.source_lines(source, *medium, detector)?);
        }
        Ok(results)
    }

    fn source_lines(
        &self, source: &Source, source_medium: Option<Medium<'a>>, detector: Point3,
    ) -> Result<Vec<LineResult>, CalcError> {
        let lines = source.photon_source_list(&self.model.isotopes)?;
        if lines.is_empty() {
            log::warn!("{} emits no photons", source.summary());
            return Ok(vec![]);
        }
        let points = source.sample_points()?;
        let total_weight: f64 = points.iter().map(|p| p.weight).sum();
        let paths = self.map_ordered(&points, |p| self.trace(source, p, detector))?;

        let mut media = Vec::with_capacity(self.shields.len() + 2);
        media.push(source_medium);
        media.extend(self.shields.iter().copied().map(Some));
        media.push(self.filler);

        lines
            .iter()
            .map(|line| self.line_result(line, &media, &points, &paths, total_weight))
            .collect()
    }

    fn trace(&self, source: &Source, point: &SamplePoint, detector: Point3) -> Result<PathLengths, CalcError> {
        let distance = point.position.distance_to(detector);
        if distance < MIN_DISTANCE {
            return Err(CalcError::SingularGeometry {
                point: point.position,
                detector,
            });
        }
        let ray = Ray::between(point.position, detector)?;
        let mut lengths = Vec::with_capacity(self.shields.len() + 2);
        lengths.push(source.crossing_length(&ray));
        lengths.extend(self.model.shields.iter().map(|s| s.crossing_length(&ray)));
        let occupied: f64 = lengths.iter().sum();
        lengths.push(match self.filler {
            Some(_) => (ray.length - occupied).max(0.0),
            None => 0.0,
        });
        log::trace!("{} -> {}: {:?}", point.position, detector, lengths);
        Ok(PathLengths { distance, lengths })
    }

    fn line_result(
        &self, line: &Photon, media: &[Option<Medium<'a>>], points: &[SamplePoint], paths: &[PathLengths],
        total_weight: f64,
    ) -> Result<LineResult, CalcError> {
        let energy = line.energy;
        // Linear attenuation per medium, zero for absent media.
        let mus = media
            .iter()
            .map(|m| m.map_or(Ok(0.0), |m| m.linear_attenuation(energy)))
            .collect::<Result<Vec<_>, _>>()?;

        let indices = (0..points.len()).collect::<Vec<_>>();
        let fluxes = self.map_ordered(&indices, |&i| {
            let path = &paths[i];
            let mfps = path.lengths.iter().zip(mus.iter()).map(|(l, mu)| l * mu).collect::<Vec<_>>();
            let total_mfp: f64 = mfps.iter().sum();
            let buildup = self.buildup(media, &mfps, total_mfp, energy)?;
            let rate = line.intensity * points[i].weight / total_weight;
            let uncollided = rate * (-total_mfp).exp() / (4.0 * PI * path.distance * path.distance);
            Ok((uncollided, uncollided * buildup))
        })?;

        let uncollided_flux: f64 = fluxes.iter().map(|f| f.0).sum();
        let total_flux: f64 = fluxes.iter().map(|f| f.1).sum();
        let exposure = total_flux * energy * self.response.mass_energy_absorption(energy)?;
        log::debug!("  {:.6} MeV at {:.4e}/s: flux {:.4e}, exposure {:.4e}", energy, line.intensity, total_flux, exposure);
        Ok(LineResult {
            energy,
            intensity: line.intensity,
            uncollided_flux,
            total_flux,
            exposure,
        })
    }

    /// Buildup factor for a ray given the mean free paths it spends in each medium.
    fn buildup(&self, media: &[Option<Medium<'a>>], mfps: &[f64], total_mfp: f64, energy: f64) -> Result<f64, CalcError> {
        if !(total_mfp > 0.0) {
            return Ok(1.0);
        }
        let material = match self.model.buildup_policy {
            BuildupPolicy::Unity => return Ok(1.0),
            BuildupPolicy::Reference => self.reference.filter(|m| m.has_buildup()).ok_or_else(|| {
                CalcError::MissingBuildupReference {
                    material: self.model.buildup_reference.clone().unwrap_or_default(),
                }
            })?,
            BuildupPolicy::DominantMaterial => {
                let candidate = dominant_material(media, mfps);
                match candidate.filter(|m| m.has_buildup()).or_else(|| self.reference.filter(|m| m.has_buildup())) {
                    Some(m) => m,
                    None => {
                        return Err(CalcError::MissingBuildupReference {
                            material: candidate.map_or_else(String::new, |m| m.name().to_string()),
                        })
                    }
                }
            }
        };
        Ok(material.buildup(energy, total_mfp)?)
    }

    /// Maps `items` in parallel or sequentially, keeping the item order so that later sums are
    /// reproducible regardless of threading.
    fn map_ordered<I, T, F>(&self, items: &[I], f: F) -> Result<Vec<T>, CalcError>
    where
        I: Sync,
        T: Send,
        F: Fn(&I) -> Result<T, CalcError> + Sync + Send,
    {
        if self.model.use_multi_thread {
            items.par_iter().map(f).collect()
        } else {
            items.iter().map(f).collect()
        }
    }
}

/// The material with the largest mean free path summed over all media made of it. Strictly greater
/// wins, so a tie goes to the material met first in traversal order.
fn dominant_material<'a>(media: &[Option<Medium<'a>>], mfps: &[f64]) -> Option<&'a Material> {
    let mut totals: Vec<(&'a Material, f64)> = Vec::with_capacity(media.len());
    for (medium, &mfp) in media.iter().zip(mfps.iter()) {
        let material = match medium {
            Some(m) => m.material,
            None => continue,
        };
        match totals.iter_mut().find(|(m, _)| m.name() == material.name()) {
            Some((_, total)) => *total += mfp,
            None => totals.push((material, mfp)),
        }
    }
    let mut dominant: Option<(&'a Material, f64)> = None;
    for (material, total) in totals {
        if dominant.map_or(true, |(_, best)| total > best) {
            dominant = Some((material, total));
        }
    }
    dominant.map(|(m, _)| m)
}
