//! Placements and point rewards from the elimination order.

use crate::models::{Placement, Player, Side};

/// Points for places 1 to 4.
pub const PLACE_POINTS: [u32; 4] = [3, 2, 1, 1];

/// 1st is the winner, 2nd the last side eliminated, 3rd and 4th the two eliminated just
/// before that. Shorter brackets produce fewer placements.
pub fn compute_placements(winner: &Side, eliminated: &[Side]) -> Vec<Placement> {
    let runners_up = eliminated.iter().rev().take(PLACE_POINTS.len() - 1);
    std::iter::once(winner)
        .chain(runners_up)
        .zip(PLACE_POINTS)
        .enumerate()
        .map(|(i, (side, points))| Placement {
            place: (i + 1) as u8,
            side: side.clone(),
            points,
        })
        .collect()
}

/// Every real member of every placed side with the points they earn. Team members each get
/// the full amount; fillers get nothing.
pub fn awards(placements: &[Placement]) -> Vec<(&Player, u32)> {
    placements
        .iter()
        .flat_map(|p| p.side.players().into_iter().map(move |player| (player, p.points)))
        .collect()
}
