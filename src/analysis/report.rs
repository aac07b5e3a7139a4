//! Per-file depth summaries and the aggregate over all files.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::depth::DepthSeries;
use super::distance::mean_pairwise_distance;
use super::error::{Error, require_positive};
use super::histogram::Histogram;
use crate::model::point::PointSet;

/// Settings of the depth reporting pipeline, lengths in Å.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthConfig {
    /// Height of the reference plane depths are measured from.
    pub surface_z: f64,
    /// Histogram bin width.
    pub bin_width: f64,
    /// Depths beyond this are dropped; `None` keeps everything.
    pub max_depth: Option<f64>,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            surface_z: 125.0,
            bin_width: 5.0,
            max_depth: Some(250.0),
        }
    }
}

impl DepthConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.surface_z.is_finite() {
            return Err(Error::invalid_config(
                "surface_z",
                format!("must be finite, got {}", self.surface_z),
            ));
        }
        require_positive("bin_width", self.bin_width)?;
        if let Some(limit) = self.max_depth {
            require_positive("max_depth", limit)?;
        }
        Ok(())
    }
}

/// Statistics of one file that contributed depths.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    /// Points decoded from the file.
    pub point_count: usize,
    /// Depths kept after range filtering.
    pub depth_count: usize,
    pub mean_depth: f64,
    /// Over all decoded points; `None` with fewer than two.
    pub mean_distance: Option<f64>,
}

/// Why a file contributed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file could not be opened or read.
    Unreadable,
    /// The surface had to be estimated but no substrate atom was found.
    NoSurface,
    NoCoordinates,
    NoDepthsInRange,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable => write!(f, "unreadable"),
            SkipReason::NoSurface => write!(f, "no substrate atoms for surface"),
            SkipReason::NoCoordinates => write!(f, "no coordinates"),
            SkipReason::NoDepthsInRange => write!(f, "no depths in range"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    Summary(FileSummary),
    Skipped { reason: SkipReason },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Aggregate over every input file.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthReport {
    /// One entry per input, in the order they were added.
    pub files: Vec<FileOutcome>,
    /// All kept depths, concatenated in file order.
    pub depths: DepthSeries,
    pub mean_depth: f64,
    /// Limit that was applied, if any.
    pub max_depth: Option<f64>,
    pub histogram: Histogram,
}

impl DepthReport {
    pub fn builder(config: DepthConfig) -> Result<DepthReportBuilder, Error> {
        config.validate()?;
        Ok(DepthReportBuilder {
            config,
            files: Vec::new(),
            depths: DepthSeries::new(),
        })
    }

    pub fn summaries(&self) -> impl Iterator<Item = (&Path, &FileSummary)> {
        self.files.iter().filter_map(|f| match &f.status {
            FileStatus::Summary(s) => Some((f.path.as_path(), s)),
            FileStatus::Skipped { .. } => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&Path, SkipReason)> {
        self.files.iter().filter_map(|f| match f.status {
            FileStatus::Skipped { reason } => Some((f.path.as_path(), reason)),
            FileStatus::Summary(_) => None,
        })
    }
}

/// Accumulates files one at a time; see [`DepthReport::builder`].
#[derive(Debug)]
pub struct DepthReportBuilder {
    config: DepthConfig,
    files: Vec<FileOutcome>,
    depths: DepthSeries,
}

impl DepthReportBuilder {
    pub fn config(&self) -> &DepthConfig {
        &self.config
    }

    /// Adds a file measured against the configured surface.
    pub fn add(&mut self, path: impl Into<PathBuf>, points: &PointSet) -> &FileOutcome {
        let surface_z = self.config.surface_z;
        self.add_with_surface(path, points, surface_z)
    }

    /// Adds a file measured against its own surface height.
    pub fn add_with_surface(
        &mut self,
        path: impl Into<PathBuf>,
        points: &PointSet,
        surface_z: f64,
    ) -> &FileOutcome {
        let path = path.into();
        let status = self.measure(points, surface_z);
        if let FileStatus::Skipped { reason } = &status {
            warn!("skipping {}: {reason}", path.display());
        }
        self.files.push(FileOutcome { path, status });
        &self.files[self.files.len() - 1]
    }

    /// Records a file that failed before it could be measured.
    pub fn skip(&mut self, path: impl Into<PathBuf>, reason: SkipReason) -> &FileOutcome {
        let path = path.into();
        warn!("skipping {}: {reason}", path.display());
        self.files.push(FileOutcome {
            path,
            status: FileStatus::Skipped { reason },
        });
        &self.files[self.files.len() - 1]
    }

    fn measure(&mut self, points: &PointSet, surface_z: f64) -> FileStatus {
        if points.is_empty() {
            return FileStatus::Skipped {
                reason: SkipReason::NoCoordinates,
            };
        }

        let mut depths = DepthSeries::from_points(points, surface_z);
        depths.retain_non_negative();
        if let Some(limit) = self.config.max_depth {
            depths.retain_at_most(limit);
        }

        let Some(mean_depth) = depths.mean() else {
            return FileStatus::Skipped {
                reason: SkipReason::NoDepthsInRange,
            };
        };

        debug!(
            "{} of {} points kept below z = {surface_z}",
            depths.len(),
            points.len()
        );
        self.depths.extend(&depths);

        FileStatus::Summary(FileSummary {
            point_count: points.len(),
            depth_count: depths.len(),
            mean_depth,
            mean_distance: mean_pairwise_distance(points.as_slice()),
        })
    }

    /// Builds the aggregate; [`Error::NoData`] when no depth was kept.
    pub fn finish(self) -> Result<DepthReport, Error> {
        let mean_depth = self.depths.mean().ok_or(Error::NoData)?;
        let histogram = Histogram::build(self.depths.values(), self.config.bin_width)?;
        Ok(DepthReport {
            files: self.files,
            depths: self.depths,
            mean_depth,
            max_depth: self.config.max_depth,
            histogram,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::point::Point;
    use approx::assert_relative_eq;

    fn set(zs: &[f64]) -> PointSet {
        zs.iter()
            .enumerate()
            .map(|(i, &z)| Point::new(i as f64, 0.0, z))
            .collect()
    }

    fn config(surface_z: f64, max_depth: Option<f64>) -> DepthConfig {
        DepthConfig {
            surface_z,
            bin_width: 5.0,
            max_depth,
        }
    }

    #[test]
    fn single_file_summary() {
        let points: PointSet = vec![Point::new(1.0, 2.0, 3.0), Point::new(4.0, 5.0, 6.0)].into();
        let mut builder = DepthReport::builder(config(10.0, None)).unwrap();
        builder.add("a.dump", &points);
        let report = builder.finish().unwrap();

        assert_eq!(report.depths.values(), &[7.0, 4.0]);
        assert_relative_eq!(report.mean_depth, 5.5);

        let (path, summary) = report.summaries().next().unwrap();
        assert_eq!(path, Path::new("a.dump"));
        assert_eq!(summary.point_count, 2);
        assert_eq!(summary.depth_count, 2);
        assert_relative_eq!(summary.mean_distance.unwrap(), 27.0f64.sqrt(), epsilon = 1e-12);
        assert_eq!(report.histogram.counts(), &[1, 1]);
    }

    #[test]
    fn skipped_files_are_labelled() {
        let mut builder = DepthReport::builder(config(100.0, Some(50.0))).unwrap();
        builder.add("empty.dump", &PointSet::new());
        builder.add("above.dump", &set(&[150.0, 120.0]));
        builder.add("too-deep.dump", &set(&[10.0]));
        builder.add("ok.dump", &set(&[90.0, 80.0, 200.0]));
        let report = builder.finish().unwrap();

        let skipped: Vec<(&Path, SkipReason)> = report.skipped().collect();
        assert_eq!(
            skipped,
            vec![
                (Path::new("empty.dump"), SkipReason::NoCoordinates),
                (Path::new("above.dump"), SkipReason::NoDepthsInRange),
                (Path::new("too-deep.dump"), SkipReason::NoDepthsInRange),
            ]
        );
        assert_eq!(report.depths.values(), &[10.0, 20.0]);
        assert_eq!(report.max_depth, Some(50.0));

        let (_, summary) = report.summaries().next().unwrap();
        assert_eq!(summary.point_count, 3);
        assert_eq!(summary.depth_count, 2);
    }

    #[test]
    fn explicit_skips_keep_their_place() {
        let mut builder = DepthReport::builder(config(10.0, None)).unwrap();
        builder.add("a", &set(&[4.0]));
        let outcome = builder.skip("b", SkipReason::NoSurface).clone();
        assert_eq!(
            outcome.status,
            FileStatus::Skipped {
                reason: SkipReason::NoSurface
            }
        );
        builder.skip("c", SkipReason::Unreadable);
        builder.add("d", &set(&[8.0]));
        let report = builder.finish().unwrap();

        let order: Vec<&Path> = report.files.iter().map(|f| f.path.as_path()).collect();
        assert_eq!(
            order,
            vec![Path::new("a"), Path::new("b"), Path::new("c"), Path::new("d")]
        );
        assert_eq!(report.depths.values(), &[6.0, 2.0]);
        assert_eq!(report.skipped().count(), 2);
        assert_eq!(SkipReason::Unreadable.to_string(), "unreadable");
        assert_eq!(
            SkipReason::NoSurface.to_string(),
            "no substrate atoms for surface"
        );
    }

    #[test]
    fn depths_concatenate_in_file_order() {
        let mut builder = DepthReport::builder(config(0.0, None)).unwrap();
        builder.add("b", &set(&[-2.0]));
        builder.add_with_surface("a", &set(&[5.0, 4.0]), 10.0);
        let report = builder.finish().unwrap();
        assert_eq!(report.depths.values(), &[2.0, 5.0, 6.0]);
        assert_relative_eq!(report.mean_depth, 13.0 / 3.0);
        assert_eq!(report.histogram.total(), 3);
    }

    #[test]
    fn nothing_kept_is_no_data() {
        let mut builder = DepthReport::builder(DepthConfig::default()).unwrap();
        builder.add("x", &PointSet::new());
        assert!(matches!(builder.finish(), Err(Error::NoData)));

        let builder = DepthReport::builder(DepthConfig::default()).unwrap();
        assert!(matches!(builder.finish(), Err(Error::NoData)));
    }

    #[test]
    fn single_point_has_no_mean_distance() {
        let mut builder = DepthReport::builder(config(10.0, None)).unwrap();
        let outcome = builder.add("one", &set(&[1.0])).clone();
        match outcome.status {
            FileStatus::Summary(s) => assert!(s.mean_distance.is_none()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn config_validation() {
        assert!(DepthConfig::default().validate().is_ok());
        let bad_width = DepthConfig {
            bin_width: 0.0,
            ..DepthConfig::default()
        };
        assert!(DepthReport::builder(bad_width).is_err());
        let bad_limit = DepthConfig {
            max_depth: Some(-1.0),
            ..DepthConfig::default()
        };
        assert!(matches!(
            bad_limit.validate(),
            Err(Error::InvalidConfig {
                field: "max_depth",
                ..
            })
        ));
        let bad_surface = DepthConfig {
            surface_z: f64::NAN,
            ..DepthConfig::default()
        };
        assert!(bad_surface.validate().is_err());
    }
}
