//! Lookup helpers for public NEMDE constraint equation formulations.
//!
//! The National Electricity Market dispatch engine publishes its constraint
//! equations in monthly MMSDM archive tables. This crate fetches those
//! tables, parses the MMS report format, and answers read-only queries:
//! which constraints a month lists, the LHS/RHS terms of one constraint,
//! and the definitions of the generic RHS functions constraints reference.
//!
//! ```no_run
//! use nemde_constraints::{ArchiveConfig, ConstraintLookup, Period};
//!
//! # async fn example() -> nemde_constraints::Result<()> {
//! let lookup = ConstraintLookup::nemweb(&ArchiveConfig::default())?;
//! let period = Period::new(2023, 6).expect("valid month");
//!
//! let listing = lookup.constraint_list(period).await?;
//! let details = lookup.constraint_details(period, &listing[0].id).await?;
//! println!("{}: {} LHS terms", details.constraint.id, details.lhs.len());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod config;
pub mod domain;
pub mod error;
pub mod lookup;
pub mod telemetry;

pub use archive::{ArchiveSource, InMemoryArchive, MmsReport, MmsTable, NemwebArchive};
pub use config::{ArchiveConfig, Config};
pub use domain::{
    ConstraintDetails, ConstraintRecord, GenericFunction, LhsTerm, NetworkElement, Period, RhsTerm,
};
pub use error::{ArchiveError, Result};
pub use lookup::{find_constraint, find_generic_function, ConstraintLookup};
