//! Train-service classification.

use crate::dbrest::ProductFlags;

/// Whether a location with these flags is served by trains.
///
/// Only the four long-distance and regional rail classes count. Other
/// classes are ignored, so a combined bus and rail stop still qualifies.
pub fn serves_trains(flags: Option<&ProductFlags>) -> bool {
    flags.is_some_and(|f| f.national_express || f.national || f.regional_express || f.regional)
}

/// Product filter selecting train services only.
pub fn train_products() -> ProductFlags {
    ProductFlags {
        national_express: true,
        national: true,
        regional_express: true,
        regional: true,
        ..ProductFlags::default()
    }
}
