use serde::{Deserialize, Serialize};

use super::term::{LhsTerm, RhsTerm};

/// One constraint equation as listed in the GENCONDATA table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintRecord {
    pub id: String,
    pub description: String,
    /// Published inequality sense of the equation: `<=`, `>=` or `=`.
    pub constraint_type: String,
}

/// A named reusable right-hand-side formula referenced by constraints
/// instead of being repeated inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericFunction {
    pub id: String,
    pub description: String,
}

/// Full formulation of one constraint equation for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintDetails {
    pub constraint: ConstraintRecord,
    pub lhs: Vec<LhsTerm>,
    pub rhs: Vec<RhsTerm>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NetworkElement;

    #[test]
    fn test_serialization() {
        let details = ConstraintDetails {
            constraint: ConstraintRecord {
                id: "N^^NIL_1".to_string(),
                description: "Out = NIL, avoid VIC1 overload".to_string(),
                constraint_type: "<=".to_string(),
            },
            lhs: vec![LhsTerm {
                spot: 1,
                factor: "-0.5".parse().unwrap(),
                element: NetworkElement::Region {
                    id: "VIC1".to_string(),
                },
            }],
            rhs: vec![RhsTerm {
                spot: 1,
                spd_id: "VPGS.P".to_string(),
                spd_type: "T".to_string(),
                description: None,
                factor: Some("1".parse().unwrap()),
                operation: None,
            }],
        };

        let json = serde_json::to_string(&details).unwrap();
        let deserialized: ConstraintDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(details, deserialized);
    }
}
