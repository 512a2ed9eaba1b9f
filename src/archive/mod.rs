pub mod memory;
pub mod nemweb;
pub mod report;
pub(crate) mod tables;

pub use memory::InMemoryArchive;
pub use nemweb::NemwebArchive;
pub use report::MmsReport;

use async_trait::async_trait;
use strum::{Display, EnumString};

use crate::domain::Period;
use crate::error::Result;

/// Archive tables read by this crate, displayed under their published names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum MmsTable {
    /// Constraint identifiers and descriptions.
    #[strum(serialize = "GENCONDATA")]
    ConstraintData,
    /// LHS terms scaling connection-point dispatch.
    #[strum(serialize = "SPDCONNECTIONPOINTCONSTRAINT")]
    ConnectionPointConstraint,
    /// LHS terms scaling interconnector flow.
    #[strum(serialize = "SPDINTERCONNECTORCONSTRAINT")]
    InterconnectorConstraint,
    /// LHS terms scaling regional quantities.
    #[strum(serialize = "SPDREGIONCONSTRAINT")]
    RegionConstraint,
    /// Dispatchable-unit registrations, used to resolve connection points.
    #[strum(serialize = "DUDETAIL")]
    UnitDetail,
    /// RHS terms of constraint equations.
    #[strum(serialize = "GENERICCONSTRAINTRHS")]
    ConstraintRhs,
    /// Descriptions of telemetered SPD values.
    #[strum(serialize = "EMSMASTER")]
    EmsMaster,
    /// Generic RHS function identifiers and descriptions.
    #[strum(serialize = "GENERICEQUATIONDESC")]
    GenericEquationDesc,
    /// Defining terms of generic RHS functions.
    #[strum(serialize = "GENERICEQUATIONRHS")]
    GenericEquationRhs,
}

/// The published archive, treated as an opaque read-only collaborator.
///
/// One operation: fetch the raw report text of a table for a month. Every
/// call either returns the complete text or fails; nothing is retried.
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    async fn fetch_table(&self, period: Period, table: MmsTable) -> Result<String>;
}
