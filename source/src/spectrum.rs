use itertools::Itertools;
use math::float::linspace_inclusive;

use crate::SourceError;

/// A photon line: energy in MeV and an intensity, either photons per decay (isotope data) or
/// photons per second (source spectra).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Photon {
    pub energy: f64,
    pub intensity: f64,
}

impl Photon {
    pub fn new(energy: f64, intensity: f64) -> Result<Self, SourceError> {
        if energy > 0.0 && energy.is_finite() && intensity >= 0.0 && intensity.is_finite() {
            Ok(Self { energy, intensity })
        } else {
            Err(SourceError::InvalidPhoton { energy, intensity })
        }
    }
}

/// How a spectrum with many lines is reduced before exposure is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingOption {
    /// Every distinct energy is its own line.
    Discrete,
    /// Lines are always collected into energy groups.
    Group,
    /// Lines are grouped only when there are more of them than the group count.
    #[default]
    Hybrid,
}

pub const DEFAULT_MAX_PHOTON_ENERGIES: usize = 30;

/// Sums the intensities of lines sharing an energy; the result is sorted by energy.
pub fn merge_lines<I: IntoIterator<Item = Photon>>(lines: I) -> Vec<Photon> {
    lines
        .into_iter()
        .sorted_by(|a, b| a.energy.total_cmp(&b.energy))
        .coalesce(|a, b| {
            if a.energy == b.energy {
                Ok(Photon {
                    energy: a.energy,
                    intensity: a.intensity + b.intensity,
                })
            } else {
                Err((a, b))
            }
        })
        .collect()
}

/// Collects sorted `lines` into at most `groups` equal-width energy bins.
///
/// Bin centers are evenly spaced from the lowest to the highest line energy, each bin reaching
/// half a step to either side. A non-empty bin becomes a single line at the intensity-weighted
/// mean energy carrying the summed intensity; empty bins are dropped.
pub fn group_lines(lines: &[Photon], groups: usize) -> Vec<Photon> {
    let (first, last) = match (lines.first(), lines.last()) {
        (Some(first), Some(last)) => (first.energy, last.energy),
        _ => return vec![],
    };
    let (centers, step) = linspace_inclusive(first, last, groups.max(1));
    let low_edge = centers[0] - step * 0.5;
    let bin_of = |energy: f64| -> usize {
        if step > 0.0 {
            (((energy - low_edge) / step).floor().max(0.0) as usize).min(centers.len() - 1)
        } else {
            0
        }
    };

    let mut sums = vec![(0.0, 0.0); centers.len()];
    for line in lines {
        let (weighted, total) = &mut sums[bin_of(line.energy)];
        *weighted += line.energy * line.intensity;
        *total += line.intensity;
    }
    sums.into_iter()
        .filter(|&(_, total)| total > 0.0)
        .map(|(weighted, total)| Photon {
            energy: weighted / total,
            intensity: total,
        })
        .collect()
}

/// Applies a grouping option to a merged, sorted spectrum.
pub fn apply_grouping(lines: Vec<Photon>, option: GroupingOption, max_energies: usize) -> Vec<Photon> {
    let group = match option {
        GroupingOption::Discrete => false,
        GroupingOption::Group => true,
        GroupingOption::Hybrid => lines.len() > max_energies,
    };
    if group {
        log::debug!("Grouping {} photon lines into {} bins", lines.len(), max_energies);
        group_lines(&lines, max_energies)
    } else {
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(energy: f64, intensity: f64) -> Photon {
        Photon { energy, intensity }
    }

    #[test]
    fn merges_equal_energies() {
        let merged = merge_lines(vec![line(1.0, 2.0), line(0.5, 1.0), line(1.0, 3.0)]);
        assert_eq!(merged, vec![line(0.5, 1.0), line(1.0, 5.0)]);
    }

    #[test]
    fn groups_conserve_intensity() {
        let lines = (1..=100)
            .map(|i| line(0.01 * i as f64, i as f64))
            .collect::<Vec<_>>();
        let grouped = group_lines(&lines, 7);
        assert_eq!(grouped.len(), 7);
        let before: f64 = lines.iter().map(|l| l.intensity).sum();
        let after: f64 = grouped.iter().map(|l| l.intensity).sum();
        assert!((before - after).abs() < 1e-9 * before);
        let energy_before: f64 = lines.iter().map(|l| l.energy * l.intensity).sum();
        let energy_after: f64 = grouped.iter().map(|l| l.energy * l.intensity).sum();
        assert!((energy_before - energy_after).abs() < 1e-9 * energy_before);
        assert!(grouped.windows(2).all(|w| w[0].energy < w[1].energy));
    }

    #[test]
    fn empty_bins_are_dropped() {
        let grouped = group_lines(&[line(0.1, 1.0), line(0.11, 1.0), line(2.0, 4.0)], 10);
        assert_eq!(grouped.len(), 2);
        assert!((grouped[0].energy - 0.105).abs() < 1e-12);
        assert_eq!(grouped[0].intensity, 2.0);
        assert_eq!(grouped[1], line(2.0, 4.0));
    }

    #[test]
    fn single_energy_groups_to_itself() {
        let grouped = group_lines(&[line(0.662, 3.0)], 30);
        assert_eq!(grouped.len(), 1);
        assert!((grouped[0].energy - 0.662).abs() < 1e-12);
        assert_eq!(grouped[0].intensity, 3.0);
        assert!(group_lines(&[], 30).is_empty());
    }

    #[test]
    fn hybrid_only_groups_long_spectra() {
        let lines = (1..=5).map(|i| line(i as f64, 1.0)).collect::<Vec<_>>();
        assert_eq!(apply_grouping(lines.clone(), GroupingOption::Hybrid, 5), lines);
        assert_eq!(apply_grouping(lines.clone(), GroupingOption::Hybrid, 4).len(), 4);
        assert_eq!(apply_grouping(lines.clone(), GroupingOption::Group, 2).len(), 2);
        assert_eq!(apply_grouping(lines.clone(), GroupingOption::Discrete, 2), lines);
    }

    #[test]
    fn rejects_bad_photons() {
        assert!(Photon::new(0.0, 1.0).is_err());
        assert!(Photon::new(1.0, -1.0).is_err());
        assert!(Photon::new(1.0, f64::NAN).is_err());
        assert!(Photon::new(1.0, 0.0).is_ok());
    }
}
