use std::collections::HashMap;

use crate::archive::tables::{ConnectionPointTermRow, InterconnectorTermRow, RegionTermRow};
use crate::domain::{LhsTerm, NetworkElement, RhsTerm};

/// Assemble LHS terms in published order: connection points, then
/// interconnectors, then regions. `spot` is assigned 1-based over the whole
/// sequence.
pub(crate) fn assemble_lhs(
    connection_points: Vec<ConnectionPointTermRow>,
    interconnectors: Vec<InterconnectorTermRow>,
    regions: Vec<RegionTermRow>,
    duid_by_connection_point: &HashMap<String, String>,
) -> Vec<LhsTerm> {
    let mut terms =
        Vec::with_capacity(connection_points.len() + interconnectors.len() + regions.len());

    for row in connection_points {
        let duid = duid_by_connection_point.get(&row.connection_point_id).cloned();
        terms.push(LhsTerm {
            spot: terms.len() + 1,
            factor: row.factor,
            element: NetworkElement::ConnectionPoint {
                id: row.connection_point_id,
                duid,
                bid_type: row.bid_type,
            },
        });
    }
    for row in interconnectors {
        terms.push(LhsTerm {
            spot: terms.len() + 1,
            factor: row.factor,
            element: NetworkElement::Interconnector {
                id: row.interconnector_id,
            },
        });
    }
    for row in regions {
        terms.push(LhsTerm {
            spot: terms.len() + 1,
            factor: row.factor,
            element: NetworkElement::Region { id: row.region_id },
        });
    }

    terms
}

/// Join EMSMASTER descriptions onto SCADA-sourced terms and restore the
/// published order by `spot`. The sort is stable, so equal spots keep their
/// table order.
pub(crate) fn assemble_rhs(
    mut terms: Vec<RhsTerm>,
    descriptions: &HashMap<String, String>,
) -> Vec<RhsTerm> {
    for term in &mut terms {
        if term.is_scada_sourced() {
            term.description = descriptions.get(&term.spd_id).cloned();
        }
    }
    terms.sort_by_key(|term| term.spot);
    terms
}
