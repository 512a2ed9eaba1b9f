//! Typed rows of the archive tables this crate reads.
//!
//! Field names follow the published all-caps column names via serde renames;
//! columns a row type does not name are ignored by the report parser.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::RhsTerm;

/// `EFFECTIVEDATE`-style timestamps, e.g. `2023/06/01 00:00:00`.
pub(crate) mod mms_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer};

    const FORMAT: &str = "%Y/%m/%d %H:%M:%S";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Rows keyed by `(EFFECTIVEDATE, VERSIONNO)`. One monthly file can carry
/// several published versions of the same definition.
pub(crate) trait Versioned {
    fn version_key(&self) -> (NaiveDateTime, u32);
}

/// Keep only the rows of the latest version present, preserving their order.
pub(crate) fn latest_version<R: Versioned>(rows: Vec<R>) -> Vec<R> {
    let Some(latest) = rows.iter().map(Versioned::version_key).max() else {
        return rows;
    };
    rows.into_iter()
        .filter(|row| row.version_key() == latest)
        .collect()
}

/// One version of one constraint equation in GENCONDATA.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConstraintDataRow {
    #[serde(rename = "EFFECTIVEDATE", deserialize_with = "mms_datetime::deserialize")]
    pub effective_date: NaiveDateTime,
    #[serde(rename = "VERSIONNO")]
    pub version: u32,
    #[serde(rename = "GENCONID")]
    pub constraint_id: String,
    #[serde(rename = "CONSTRAINTTYPE")]
    pub constraint_type: String,
    #[serde(rename = "DESCRIPTION")]
    pub description: Option<String>,
}

impl Versioned for ConstraintDataRow {
    fn version_key(&self) -> (NaiveDateTime, u32) {
        (self.effective_date, self.version)
    }
}

/// SPDCONNECTIONPOINTCONSTRAINT row: a LHS connection-point term.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConnectionPointTermRow {
    #[serde(rename = "EFFECTIVEDATE", deserialize_with = "mms_datetime::deserialize")]
    pub effective_date: NaiveDateTime,
    #[serde(rename = "VERSIONNO")]
    pub version: u32,
    #[serde(rename = "CONNECTIONPOINTID")]
    pub connection_point_id: String,
    #[serde(rename = "GENCONID")]
    pub constraint_id: String,
    #[serde(rename = "FACTOR")]
    pub factor: Decimal,
    #[serde(rename = "BIDTYPE")]
    pub bid_type: String,
}

impl Versioned for ConnectionPointTermRow {
    fn version_key(&self) -> (NaiveDateTime, u32) {
        (self.effective_date, self.version)
    }
}

/// SPDINTERCONNECTORCONSTRAINT row: a LHS interconnector term.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InterconnectorTermRow {
    #[serde(rename = "EFFECTIVEDATE", deserialize_with = "mms_datetime::deserialize")]
    pub effective_date: NaiveDateTime,
    #[serde(rename = "VERSIONNO")]
    pub version: u32,
    #[serde(rename = "INTERCONNECTORID")]
    pub interconnector_id: String,
    #[serde(rename = "GENCONID")]
    pub constraint_id: String,
    #[serde(rename = "FACTOR")]
    pub factor: Decimal,
}

impl Versioned for InterconnectorTermRow {
    fn version_key(&self) -> (NaiveDateTime, u32) {
        (self.effective_date, self.version)
    }
}

/// SPDREGIONCONSTRAINT row: a LHS region term.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RegionTermRow {
    #[serde(rename = "EFFECTIVEDATE", deserialize_with = "mms_datetime::deserialize")]
    pub effective_date: NaiveDateTime,
    #[serde(rename = "VERSIONNO")]
    pub version: u32,
    #[serde(rename = "REGIONID")]
    pub region_id: String,
    #[serde(rename = "GENCONID")]
    pub constraint_id: String,
    #[serde(rename = "FACTOR")]
    pub factor: Decimal,
}

impl Versioned for RegionTermRow {
    fn version_key(&self) -> (NaiveDateTime, u32) {
        (self.effective_date, self.version)
    }
}

/// DUDETAIL row, used to resolve connection points to dispatchable units.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UnitDetailRow {
    #[serde(rename = "DUID")]
    pub duid: String,
    #[serde(rename = "CONNECTIONPOINTID")]
    pub connection_point_id: String,
}

/// GENERICCONSTRAINTRHS row: one RHS term of a constraint equation.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConstraintRhsRow {
    #[serde(rename = "EFFECTIVEDATE", deserialize_with = "mms_datetime::deserialize")]
    pub effective_date: NaiveDateTime,
    #[serde(rename = "VERSIONNO")]
    pub version: u32,
    #[serde(rename = "GENCONID")]
    pub constraint_id: String,
    #[serde(rename = "TERMID")]
    pub spot: i64,
    #[serde(rename = "SPD_TYPE")]
    pub spd_type: String,
    #[serde(rename = "SPD_ID")]
    pub spd_id: String,
    #[serde(rename = "FACTOR")]
    pub factor: Option<Decimal>,
    #[serde(rename = "OPERATION")]
    pub operation: Option<String>,
}

impl Versioned for ConstraintRhsRow {
    fn version_key(&self) -> (NaiveDateTime, u32) {
        (self.effective_date, self.version)
    }
}

impl ConstraintRhsRow {
    pub fn into_term(self) -> RhsTerm {
        RhsTerm {
            spot: self.spot,
            spd_id: self.spd_id,
            spd_type: self.spd_type,
            description: None,
            factor: self.factor,
            operation: self.operation,
        }
    }
}

/// EMSMASTER row: description of one telemetered SPD value.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EmsMasterRow {
    #[serde(rename = "SPD_ID")]
    pub spd_id: String,
    #[serde(rename = "DESCRIPTION")]
    pub description: Option<String>,
}

/// GENERICEQUATIONDESC row: one generic RHS function.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenericEquationDescRow {
    #[serde(rename = "EQUATIONID")]
    pub equation_id: String,
    #[serde(rename = "DESCRIPTION")]
    pub description: Option<String>,
}

/// GENERICEQUATIONRHS row: one defining term of a generic RHS function.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenericEquationRhsRow {
    #[serde(rename = "EFFECTIVEDATE", deserialize_with = "mms_datetime::deserialize")]
    pub effective_date: NaiveDateTime,
    #[serde(rename = "VERSIONNO")]
    pub version: u32,
    #[serde(rename = "EQUATIONID")]
    pub equation_id: String,
    #[serde(rename = "TERMID")]
    pub spot: i64,
    #[serde(rename = "SPD_TYPE")]
    pub spd_type: String,
    #[serde(rename = "SPD_ID")]
    pub spd_id: String,
    #[serde(rename = "FACTOR")]
    pub factor: Option<Decimal>,
    #[serde(rename = "OPERATION")]
    pub operation: Option<String>,
}

impl Versioned for GenericEquationRhsRow {
    fn version_key(&self) -> (NaiveDateTime, u32) {
        (self.effective_date, self.version)
    }
}

impl GenericEquationRhsRow {
    pub fn into_term(self) -> RhsTerm {
        RhsTerm {
            spot: self.spot,
            spd_id: self.spd_id,
            spd_type: self.spd_type,
            description: None,
            factor: self.factor,
            operation: self.operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{MmsReport, MmsTable};

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y/%m/%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_constraint_rhs_row_from_report() {
        let text = "\
C,hdr
I,GENCON,GENERICCONSTRAINTRHS,1,EFFECTIVEDATE,VERSIONNO,GENCONID,SCOPE,TERMID,SPD_TYPE,SPD_ID,FACTOR,OPERATION
D,GENCON,GENERICCONSTRAINTRHS,1,\"2023/06/01 00:00:00\",2,N^^NIL_1,D,1,T,VPGS.P,-0.8232,
D,GENCON,GENERICCONSTRAINTRHS,1,\"2023/06/01 00:00:00\",2,N^^NIL_1,D,2,X,F_AVG_DEMAND,,MAX
C,END OF REPORT,2
";
        let report = MmsReport::parse(MmsTable::ConstraintRhs, text).unwrap();
        let rows: Vec<ConstraintRhsRow> = report.rows().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].effective_date, dt("2023/06/01 00:00:00"));
        assert_eq!(rows[0].version, 2);
        assert_eq!(rows[0].spot, 1);
        assert_eq!(rows[0].factor, Some("-0.8232".parse().unwrap()));
        assert_eq!(rows[0].operation, None);
        // Unnamed columns (SCOPE) are ignored; empty FACTOR maps to None.
        assert_eq!(rows[1].factor, None);
        assert_eq!(rows[1].operation.as_deref(), Some("MAX"));
    }

    #[test]
    fn test_into_term_preserves_published_fields() {
        let row = ConstraintRhsRow {
            effective_date: dt("2023/06/01 00:00:00"),
            version: 1,
            constraint_id: "N^^NIL_1".into(),
            spot: 7,
            spd_type: "T".into(),
            spd_id: "VPGS.P".into(),
            factor: Some("1.5".parse().unwrap()),
            operation: Some("ADD".into()),
        };
        let term = row.into_term();
        assert_eq!(term.spot, 7);
        assert_eq!(term.spd_type, "T");
        assert_eq!(term.spd_id, "VPGS.P");
        assert_eq!(term.description, None);
    }

    #[test]
    fn test_latest_version_filters_older_rows() {
        let rows = vec![
            ConstraintDataRow {
                effective_date: dt("2023/05/02 00:00:00"),
                version: 3,
                constraint_id: "A".into(),
                constraint_type: "<=".into(),
                description: Some("old".into()),
            },
            ConstraintDataRow {
                effective_date: dt("2023/06/01 00:00:00"),
                version: 1,
                constraint_id: "A".into(),
                constraint_type: "<=".into(),
                description: Some("new".into()),
            },
        ];
        let latest = latest_version(rows);
        assert_eq!(latest.len(), 1);
        // Effective date outranks version number.
        assert_eq!(latest[0].description.as_deref(), Some("new"));
    }

    #[test]
    fn test_latest_version_keeps_all_rows_of_that_version() {
        let row = |spot: i64| ConstraintRhsRow {
            effective_date: dt("2023/06/01 00:00:00"),
            version: 2,
            constraint_id: "A".into(),
            spot,
            spd_type: "C".into(),
            spd_id: "X".into(),
            factor: None,
            operation: None,
        };
        let mut rows = vec![row(1), row(2)];
        rows.push(ConstraintRhsRow {
            version: 1,
            ..row(9)
        });
        let latest = latest_version(rows);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].spot, 1);
        assert_eq!(latest[1].spot, 2);
    }

    #[test]
    fn test_bad_datetime_is_parse_error() {
        let text = "\
C,hdr
I,GENCON,GENCONDATA,3,EFFECTIVEDATE,VERSIONNO,GENCONID,CONSTRAINTTYPE,DESCRIPTION
D,GENCON,GENCONDATA,3,01-06-2023,1,A,<=,desc
C,END OF REPORT,1
";
        let report = MmsReport::parse(MmsTable::ConstraintData, text).unwrap();
        let rows: Result<Vec<ConstraintDataRow>, _> = report.rows();
        assert!(rows.is_err());
    }
}
