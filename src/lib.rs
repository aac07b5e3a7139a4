//! Post-processing of ion-implantation simulations: pull implant positions
//! out of LAMMPS and OVITO output, measure how deep they came to rest, and
//! pick out isolated pairs that could form color centers.
//!
//! # Features
//!
//! - **Format-tolerant decoding**: LAMMPS dumps (unscaled, unwrapped or
//!   box-scaled coordinates), LAMMPS data files across `atom_style` layouts,
//!   OVITO table exports and loose XYZ/CSV point lists
//! - **Depth statistics**: depths below a reference plane, per-file means,
//!   mean pairwise distance and fixed-width histograms
//! - **Pair classification**: deep pairs inside a separation window whose
//!   members no other implant approaches
//! - **Surface estimation**: reference-plane height from substrate atoms
//!
//! # Quick Start
//!
//! ```
//! use implant_probe::io::decode_text;
//! use implant_probe::analysis::{DepthConfig, DepthReport, mean_pairwise_distance};
//! use implant_probe::TypeFilter;
//!
//! let dump = "\
//! ITEM: TIMESTEP
//! 0
//! ITEM: ATOMS id type x y z
//! 1 3 1.0 2.0 3.0
//! 2 3 4.0 5.0 6.0
//! 3 1 0.0 0.0 9.0
//! ";
//!
//! let decoded = decode_text(dump, None, &TypeFilter::only(3), false);
//! assert_eq!(decoded.points.len(), 2);
//!
//! let distance = mean_pairwise_distance(decoded.points.as_slice()).unwrap();
//! assert!((distance - 27f64.sqrt()).abs() < 1e-12);
//!
//! let config = DepthConfig { surface_z: 10.0, ..DepthConfig::default() };
//! let mut builder = DepthReport::builder(config)?;
//! builder.add("run.dump", &decoded.points);
//! let report = builder.finish()?;
//! assert_eq!(report.depths.values(), &[7.0, 4.0]);
//! # Ok::<(), implant_probe::analysis::Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`]: decoders, format sniffing and file reading
//! - [`analysis`]: depth reporting, histograms and pair classification

mod model;

pub mod analysis;
pub mod io;

pub use model::bounds::BoxBounds;
pub use model::filter::TypeFilter;
pub use model::point::{Point, PointSet};
