pub mod adapter;
pub mod dcor;
pub mod error;
pub mod factory;
pub mod goodness;
pub mod hics;
pub mod histogram;
pub mod hoeffding;
pub mod jensen_shannon;
pub mod mcde;
pub mod measure;
pub mod mutual_info;
pub mod pearson;
pub mod pvalues;
pub mod random;
pub mod rank;
pub mod slope;
pub mod spearman;
pub mod surfing;
pub mod triangle;

pub use adapter::{Column, NumberArray};
pub use dcor::DistanceCorrelation;
pub use error::{Error, Result};
pub use factory::{make, Measure, MeasureConfig, MeasureKind};
pub use goodness::{GoodnessOfFit, GoodnessOfFitTest};
pub use hics::HiCS;
pub use hoeffding::HoeffdingsD;
pub use jensen_shannon::JensenShannonEquiwidth;
pub use mcde::{MannWhitneyP, Mcde};
pub use measure::{matrix, row_dependence, Dependence};
pub use mutual_info::MutualInformationEquiwidth;
pub use pearson::Pearson;
pub use random::RandomFactory;
pub use slope::{Slope, SlopeInversion};
pub use spearman::Spearman;
pub use surfing::Surfing;
