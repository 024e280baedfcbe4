use strum_macros::{Display, EnumString};

use crate::adapter::NumberArray;
use crate::dcor::DistanceCorrelation;
use crate::error::Result;
use crate::goodness::GoodnessOfFit;
use crate::hics::HiCS;
use crate::hoeffding::HoeffdingsD;
use crate::jensen_shannon::JensenShannonEquiwidth;
use crate::mcde::{MannWhitneyP, Mcde};
use crate::measure::Dependence;
use crate::mutual_info::MutualInformationEquiwidth;
use crate::pearson::Pearson;
use crate::random::RandomFactory;
use crate::slope::{Slope, SlopeInversion};
use crate::spearman::Spearman;
use crate::surfing::Surfing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum MeasureKind {
    #[strum(serialize = "Pearson", serialize = "Correlation", to_string = "Pearson")]
    Pearson,
    #[strum(serialize = "Spearman")]
    Spearman,
    #[strum(
        serialize = "DistanceCorrelation",
        serialize = "dcor",
        serialize = "distance",
        to_string = "DistanceCorrelation"
    )]
    DistanceCorrelation,
    #[strum(serialize = "Hoeffding", serialize = "HoeffdingsD", to_string = "Hoeffding")]
    Hoeffding,
    #[strum(serialize = "MutualInformation", serialize = "mi", to_string = "MutualInformation")]
    MutualInformation,
    #[strum(serialize = "JensenShannon", serialize = "js", to_string = "JensenShannon")]
    JensenShannon,
    #[strum(serialize = "HiCS")]
    HiCS,
    #[strum(serialize = "MCDE")]
    Mcde,
    #[strum(serialize = "SURFING")]
    Surfing,
    #[strum(serialize = "Slope")]
    Slope,
    #[strum(serialize = "SlopeInversion")]
    SlopeInversion,
}

/// Parameters for [`make`]. Fields a measure does not use are ignored.
#[derive(Debug, Clone)]
pub struct MeasureConfig {
    pub kind: MeasureKind,
    /// Monte-Carlo iterations (HiCS, MCDE).
    pub m: usize,
    /// HiCS window share; `None` uses 0.1 for HiCS and 0.5 for MCDE.
    pub alpha: Option<f64>,
    /// MCDE marginal restriction share.
    pub beta: f64,
    pub test: GoodnessOfFit,
    /// Random seed; `None` draws one at construction.
    pub seed: Option<u64>,
}

impl MeasureConfig {
    pub fn new(kind: MeasureKind) -> Self {
        Self {
            kind,
            m: 50,
            alpha: None,
            beta: 0.5,
            test: GoodnessOfFit::default(),
            seed: None,
        }
    }
}

/// A configured measure of any kind.
#[derive(Debug, Clone)]
pub enum Measure {
    Pearson(Pearson),
    Spearman(Spearman),
    DistanceCorrelation(DistanceCorrelation),
    Hoeffding(HoeffdingsD),
    MutualInformation(MutualInformationEquiwidth),
    JensenShannon(JensenShannonEquiwidth),
    HiCS(HiCS<GoodnessOfFit>),
    Mcde(Mcde<MannWhitneyP>),
    Surfing(Surfing),
    Slope(Slope),
    SlopeInversion(SlopeInversion),
}

/// Build a measure from its configuration.
pub fn make(config: &MeasureConfig) -> Result<Measure> {
    let rnd = config
        .seed
        .map_or_else(RandomFactory::from_entropy, RandomFactory::new);
    Ok(match config.kind {
        MeasureKind::Pearson => Measure::Pearson(Pearson),
        MeasureKind::Spearman => Measure::Spearman(Spearman),
        MeasureKind::DistanceCorrelation => Measure::DistanceCorrelation(DistanceCorrelation),
        MeasureKind::Hoeffding => Measure::Hoeffding(HoeffdingsD),
        MeasureKind::MutualInformation => Measure::MutualInformation(MutualInformationEquiwidth),
        MeasureKind::JensenShannon => Measure::JensenShannon(JensenShannonEquiwidth),
        MeasureKind::HiCS => Measure::HiCS(HiCS::new(
            config.m,
            config.alpha.unwrap_or(0.1),
            config.test,
            rnd,
        )?),
        MeasureKind::Mcde => Measure::Mcde(Mcde::new(
            config.m,
            config.alpha.unwrap_or(0.5),
            config.beta,
            MannWhitneyP::new(),
            rnd,
        )?),
        MeasureKind::Surfing => Measure::Surfing(Surfing),
        MeasureKind::Slope => Measure::Slope(Slope),
        MeasureKind::SlopeInversion => Measure::SlopeInversion(SlopeInversion),
    })
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            Measure::Pearson($m) => $body,
            Measure::Spearman($m) => $body,
            Measure::DistanceCorrelation($m) => $body,
            Measure::Hoeffding($m) => $body,
            Measure::MutualInformation($m) => $body,
            Measure::JensenShannon($m) => $body,
            Measure::HiCS($m) => $body,
            Measure::Mcde($m) => $body,
            Measure::Surfing($m) => $body,
            Measure::Slope($m) => $body,
            Measure::SlopeInversion($m) => $body,
        }
    };
}

impl Measure {
    pub fn kind(&self) -> MeasureKind {
        match self {
            Measure::Pearson(_) => MeasureKind::Pearson,
            Measure::Spearman(_) => MeasureKind::Spearman,
            Measure::DistanceCorrelation(_) => MeasureKind::DistanceCorrelation,
            Measure::Hoeffding(_) => MeasureKind::Hoeffding,
            Measure::MutualInformation(_) => MeasureKind::MutualInformation,
            Measure::JensenShannon(_) => MeasureKind::JensenShannon,
            Measure::HiCS(_) => MeasureKind::HiCS,
            Measure::Mcde(_) => MeasureKind::Mcde,
            Measure::Surfing(_) => MeasureKind::Surfing,
            Measure::Slope(_) => MeasureKind::Slope,
            Measure::SlopeInversion(_) => MeasureKind::SlopeInversion,
        }
    }

    /// Diagonal value for full matrices: 1 where a non-constant column
    /// always scores 1 against itself, NaN where it depends on the data.
    pub fn self_dependence(&self) -> f64 {
        match self.kind() {
            MeasureKind::Pearson
            | MeasureKind::Spearman
            | MeasureKind::DistanceCorrelation
            | MeasureKind::Slope
            | MeasureKind::SlopeInversion => 1.0,
            _ => f64::NAN,
        }
    }
}

impl Dependence for Measure {
    fn dependence<A, B>(&self, data1: &A, data2: &B) -> Result<f64>
    where
        A: NumberArray + ?Sized,
        B: NumberArray + ?Sized,
    {
        dispatch!(self, m => m.dependence(data1, data2))
    }

    fn dependence_matrix<C>(&self, columns: &[C]) -> Result<Vec<f64>>
    where
        C: NumberArray + Sync,
    {
        dispatch!(self, m => m.dependence_matrix(columns))
    }
}
