pub mod search;
pub(crate) mod terms;

pub use search::{find_constraint, find_generic_function};

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use itertools::Itertools;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::archive::tables::{
    latest_version, ConnectionPointTermRow, ConstraintDataRow, ConstraintRhsRow, EmsMasterRow,
    GenericEquationDescRow, GenericEquationRhsRow, InterconnectorTermRow, RegionTermRow,
    UnitDetailRow, Versioned,
};
use crate::archive::{ArchiveSource, MmsReport, MmsTable, NemwebArchive};
use crate::config::ArchiveConfig;
use crate::domain::{ConstraintDetails, ConstraintRecord, GenericFunction, LhsTerm, Period, RhsTerm};
use crate::error::{ArchiveError, Result};

use self::search::matches_query;
use self::terms::{assemble_lhs, assemble_rhs};

/// Read-only lookup service over one archive source.
///
/// Every operation is a fresh fetch-parse-filter of the period's published
/// tables and either returns a complete result or fails; nothing is mutated
/// after load.
pub struct ConstraintLookup {
    source: Box<dyn ArchiveSource>,
}

impl ConstraintLookup {
    pub fn new(source: Box<dyn ArchiveSource>) -> Self {
        Self { source }
    }

    /// Lookup over the published nemweb archive with the given configuration.
    pub fn nemweb(config: &ArchiveConfig) -> Result<Self> {
        Ok(Self::new(Box::new(NemwebArchive::new(config)?)))
    }

    async fn table_rows<T: DeserializeOwned>(
        &self,
        period: Period,
        table: MmsTable,
    ) -> Result<Vec<T>> {
        let text = self.source.fetch_table(period, table).await?;
        MmsReport::parse(table, &text)?.rows()
    }

    /// Constraints listed for the period: one record per identifier in
    /// first-occurrence order, content taken from the latest published
    /// version of each.
    pub async fn constraint_list(&self, period: Period) -> Result<Vec<ConstraintRecord>> {
        self.constraint_list_with_prefix(period, None).await
    }

    /// [`constraint_list`](Self::constraint_list) restricted to identifiers
    /// with the given prefix, e.g. `"Q_"`.
    pub async fn constraint_list_with_prefix(
        &self,
        period: Period,
        prefix: Option<&str>,
    ) -> Result<Vec<ConstraintRecord>> {
        let rows: Vec<ConstraintDataRow> =
            self.table_rows(period, MmsTable::ConstraintData).await?;

        let mut order = Vec::new();
        let mut latest: HashMap<String, ConstraintDataRow> = HashMap::new();
        for row in rows {
            if let Some(prefix) = prefix {
                if !row.constraint_id.starts_with(prefix) {
                    continue;
                }
            }
            match latest.entry(row.constraint_id.clone()) {
                Entry::Vacant(slot) => {
                    order.push(slot.key().clone());
                    slot.insert(row);
                }
                Entry::Occupied(mut slot) => {
                    if row.version_key() > slot.get().version_key() {
                        slot.insert(row);
                    }
                }
            }
        }

        debug!(%period, count = order.len(), "constraint listing assembled");
        Ok(order
            .into_iter()
            .filter_map(|id| latest.remove(&id))
            .map(record_from)
            .collect())
    }

    /// Latest published version of one constraint's listing record.
    async fn constraint_record(
        &self,
        period: Period,
        constraint_id: &str,
        operation: &'static str,
    ) -> Result<ConstraintRecord> {
        let rows: Vec<ConstraintDataRow> =
            self.table_rows(period, MmsTable::ConstraintData).await?;
        rows.into_iter()
            .filter(|row| row.constraint_id == constraint_id)
            .max_by_key(Versioned::version_key)
            .map(record_from)
            .ok_or_else(|| ArchiveError::not_found(operation, constraint_id))
    }

    /// LHS terms of one constraint equation, in published order.
    ///
    /// Fails with `NotFound` when the identifier is absent from the period's
    /// constraint table; a listed constraint with no LHS rows yields an
    /// empty vec.
    pub async fn lhs_terms(&self, period: Period, constraint_id: &str) -> Result<Vec<LhsTerm>> {
        self.constraint_record(period, constraint_id, "get_lhs_terms")
            .await?;
        self.lhs_terms_unchecked(period, constraint_id).await
    }

    async fn lhs_terms_unchecked(
        &self,
        period: Period,
        constraint_id: &str,
    ) -> Result<Vec<LhsTerm>> {
        let connection_points: Vec<ConnectionPointTermRow> = self
            .table_rows(period, MmsTable::ConnectionPointConstraint)
            .await?;
        let connection_points = latest_version(
            connection_points
                .into_iter()
                .filter(|row| row.constraint_id == constraint_id)
                .collect(),
        );

        let interconnectors: Vec<InterconnectorTermRow> = self
            .table_rows(period, MmsTable::InterconnectorConstraint)
            .await?;
        let interconnectors = latest_version(
            interconnectors
                .into_iter()
                .filter(|row| row.constraint_id == constraint_id)
                .collect(),
        );

        let regions: Vec<RegionTermRow> =
            self.table_rows(period, MmsTable::RegionConstraint).await?;
        let regions = latest_version(
            regions
                .into_iter()
                .filter(|row| row.constraint_id == constraint_id)
                .collect(),
        );

        // DUDETAIL is only needed to resolve connection points to units.
        let duid_by_connection_point = if connection_points.is_empty() {
            HashMap::new()
        } else {
            let units: Vec<UnitDetailRow> =
                self.table_rows(period, MmsTable::UnitDetail).await?;
            let mut map = HashMap::new();
            for unit in units {
                map.entry(unit.connection_point_id).or_insert(unit.duid);
            }
            map
        };

        debug!(%period, constraint_id, "assembled LHS terms");
        Ok(assemble_lhs(
            connection_points,
            interconnectors,
            regions,
            &duid_by_connection_point,
        ))
    }

    /// RHS terms of one constraint equation, ordered by published `spot`.
    ///
    /// Same `NotFound` contract as [`lhs_terms`](Self::lhs_terms).
    pub async fn rhs_terms(&self, period: Period, constraint_id: &str) -> Result<Vec<RhsTerm>> {
        self.constraint_record(period, constraint_id, "get_rhs_terms")
            .await?;
        self.rhs_terms_unchecked(period, constraint_id).await
    }

    async fn rhs_terms_unchecked(
        &self,
        period: Period,
        constraint_id: &str,
    ) -> Result<Vec<RhsTerm>> {
        let rows: Vec<ConstraintRhsRow> =
            self.table_rows(period, MmsTable::ConstraintRhs).await?;
        let rows = latest_version(
            rows.into_iter()
                .filter(|row| row.constraint_id == constraint_id)
                .collect(),
        );
        let terms: Vec<RhsTerm> = rows.into_iter().map(ConstraintRhsRow::into_term).collect();

        let descriptions = if terms.iter().any(RhsTerm::is_scada_sourced) {
            self.scada_descriptions(period).await?
        } else {
            HashMap::new()
        };

        debug!(%period, constraint_id, "assembled RHS terms");
        Ok(assemble_rhs(terms, &descriptions))
    }

    /// Full formulation of one constraint: listing record plus both term
    /// sides. Pure composition of the listing and term lookups.
    pub async fn constraint_details(
        &self,
        period: Period,
        constraint_id: &str,
    ) -> Result<ConstraintDetails> {
        let constraint = self
            .constraint_record(period, constraint_id, "get_constraint_details")
            .await?;
        let lhs = self.lhs_terms_unchecked(period, constraint_id).await?;
        let rhs = self.rhs_terms_unchecked(period, constraint_id).await?;
        Ok(ConstraintDetails {
            constraint,
            lhs,
            rhs,
        })
    }

    /// Generic RHS functions listed for the period, one record per
    /// identifier in first-occurrence order.
    pub async fn generic_function_list(&self, period: Period) -> Result<Vec<GenericFunction>> {
        let rows: Vec<GenericEquationDescRow> = self
            .table_rows(period, MmsTable::GenericEquationDesc)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| GenericFunction {
                id: row.equation_id,
                description: row.description.unwrap_or_default(),
            })
            .unique_by(|function| function.id.clone())
            .collect())
    }

    /// Search the period's generic functions by identifier or description,
    /// case-insensitive. Empty query returns the full listing.
    pub async fn find_generic_functions(
        &self,
        period: Period,
        query: &str,
    ) -> Result<Vec<GenericFunction>> {
        Ok(self
            .generic_function_list(period)
            .await?
            .into_iter()
            .filter(|function| matches_query(query, &function.id, &function.description))
            .collect())
    }

    /// Defining terms of one generic RHS function, ordered by published
    /// `spot`. Fails with `NotFound` when the identifier is absent.
    pub async fn generic_function_terms(
        &self,
        period: Period,
        function_id: &str,
    ) -> Result<Vec<RhsTerm>> {
        let rows: Vec<GenericEquationRhsRow> = self
            .table_rows(period, MmsTable::GenericEquationRhs)
            .await?;
        let rows: Vec<GenericEquationRhsRow> = rows
            .into_iter()
            .filter(|row| row.equation_id == function_id)
            .collect();
        if rows.is_empty() {
            return Err(ArchiveError::not_found("get_generic_rhs_func", function_id));
        }

        let rows = latest_version(rows);
        let terms: Vec<RhsTerm> = rows
            .into_iter()
            .map(GenericEquationRhsRow::into_term)
            .collect();
        let descriptions = if terms.iter().any(RhsTerm::is_scada_sourced) {
            self.scada_descriptions(period).await?
        } else {
            HashMap::new()
        };
        Ok(assemble_rhs(terms, &descriptions))
    }

    /// Scan monthly archives newest to oldest for the first period listing
    /// constraints whose identifier starts with `prefix`. Unpublished months
    /// are skipped; `None` means the whole range came up empty.
    pub async fn find_latest_constraint(
        &self,
        prefix: &str,
        newest: Period,
        oldest: Period,
    ) -> Result<Option<(Period, Vec<ConstraintRecord>)>> {
        let mut period = newest;
        while period >= oldest {
            debug!(%period, prefix, "searching archive for constraint");
            match self.constraint_list_with_prefix(period, Some(prefix)).await {
                Ok(records) if !records.is_empty() => return Ok(Some((period, records))),
                Ok(_) => {}
                Err(err) if err.is_not_found() => {
                    warn!(%period, "no published archive for period, skipping");
                }
                Err(err) => return Err(err),
            }
            period = period.previous();
        }
        Ok(None)
    }

    /// Walk-back search over generic functions, same contract as
    /// [`find_latest_constraint`](Self::find_latest_constraint).
    pub async fn find_latest_generic_function(
        &self,
        prefix: &str,
        newest: Period,
        oldest: Period,
    ) -> Result<Option<(Period, Vec<GenericFunction>)>> {
        let mut period = newest;
        while period >= oldest {
            debug!(%period, prefix, "searching archive for generic function");
            match self.generic_function_list(period).await {
                Ok(functions) => {
                    let matches: Vec<GenericFunction> = functions
                        .into_iter()
                        .filter(|function| function.id.starts_with(prefix))
                        .collect();
                    if !matches.is_empty() {
                        return Ok(Some((period, matches)));
                    }
                }
                Err(err) if err.is_not_found() => {
                    warn!(%period, "no published archive for period, skipping");
                }
                Err(err) => return Err(err),
            }
            period = period.previous();
        }
        Ok(None)
    }

    async fn scada_descriptions(&self, period: Period) -> Result<HashMap<String, String>> {
        let rows: Vec<EmsMasterRow> = self.table_rows(period, MmsTable::EmsMaster).await?;
        let mut map = HashMap::new();
        for row in rows {
            if let Some(description) = row.description {
                map.entry(row.spd_id).or_insert(description);
            }
        }
        Ok(map)
    }
}

fn record_from(row: ConstraintDataRow) -> ConstraintRecord {
    ConstraintRecord {
        id: row.constraint_id,
        description: row.description.unwrap_or_default(),
        constraint_type: row.constraint_type,
    }
}
