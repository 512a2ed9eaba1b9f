use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// SPD type codes whose values are telemetered and described in EMSMASTER.
const SCADA_SPD_TYPES: [&str; 5] = ["A", "S", "I", "T", "R"];

/// SPD type code marking a reference to a named generic RHS function.
const GENERIC_FUNCTION_SPD_TYPE: &str = "X";

/// One left-hand-side term of a constraint equation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LhsTerm {
    /// Order index within the equation, 1-based.
    pub spot: usize,
    /// Published coefficient applied to the element's dispatch quantity.
    pub factor: Decimal,
    pub element: NetworkElement,
}

/// The network element a LHS term scales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NetworkElement {
    ConnectionPoint {
        id: String,
        /// Dispatchable unit resolved through DUDETAIL; `None` when the
        /// connection point has no unit entry in the period.
        duid: Option<String>,
        bid_type: String,
    },
    Interconnector {
        id: String,
    },
    Region {
        id: String,
    },
}

impl NetworkElement {
    pub fn id(&self) -> &str {
        match self {
            Self::ConnectionPoint { id, .. } => id,
            Self::Interconnector { id } => id,
            Self::Region { id } => id,
        }
    }
}

/// One right-hand-side term of a constraint equation or generic function.
///
/// Terms sorted by `spot` ascending reproduce the published formula exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RhsTerm {
    /// Published TERMID.
    pub spot: i64,
    pub spd_id: String,
    /// Published single-letter SPD type code, casing preserved.
    pub spd_type: String,
    /// EMSMASTER description for SCADA-sourced terms.
    pub description: Option<String>,
    pub factor: Option<Decimal>,
    /// Operator or operand token, e.g. `ADD`, `MAX`, `PUSH`.
    pub operation: Option<String>,
}

impl RhsTerm {
    /// Term reads a telemetered value described in the EMSMASTER table.
    pub fn is_scada_sourced(&self) -> bool {
        SCADA_SPD_TYPES.contains(&self.spd_type.as_str())
    }

    /// Term references a named generic RHS function rather than a value.
    pub fn is_generic_function_ref(&self) -> bool {
        self.spd_type == GENERIC_FUNCTION_SPD_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn term(spd_type: &str) -> RhsTerm {
        RhsTerm {
            spot: 1,
            spd_id: "X1".to_string(),
            spd_type: spd_type.to_string(),
            description: None,
            factor: Some(Decimal::ONE),
            operation: None,
        }
    }

    #[test]
    fn test_scada_classification() {
        for code in ["A", "S", "I", "T", "R"] {
            assert!(term(code).is_scada_sourced(), "code {code}");
        }
        assert!(!term("X").is_scada_sourced());
        assert!(!term("C").is_scada_sourced());
        // Casing is preserved from the source; a lowercase code is not a
        // SCADA code.
        assert!(!term("a").is_scada_sourced());
    }

    #[test]
    fn test_generic_function_ref() {
        assert!(term("X").is_generic_function_ref());
        assert!(!term("T").is_generic_function_ref());
    }

    #[test]
    fn test_network_element_id() {
        let element = NetworkElement::ConnectionPoint {
            id: "NVIC2".to_string(),
            duid: Some("VPGS".to_string()),
            bid_type: "ENERGY".to_string(),
        };
        assert_eq!(element.id(), "NVIC2");
        assert_eq!(NetworkElement::Region { id: "VIC1".into() }.id(), "VIC1");
    }
}
