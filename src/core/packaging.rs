//! Box selection for a set of item volumes.

use serde::Serialize;

/// A packaging option with its internal volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackagingType {
    /// Box name, e.g. `"Medium Box"`.
    pub name: String,
    /// Usable volume in cubic centimetres.
    pub volume_cm3: f64,
}

impl PackagingType {
    /// Creates a packaging option.
    #[must_use]
    pub fn new(name: impl Into<String>, volume_cm3: f64) -> Self {
        Self {
            name: name.into(),
            volume_cm3,
        }
    }
}

/// The chosen box and how well the items fill it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackagingRecommendation {
    /// Name of the chosen box.
    pub recommended_box: String,
    /// Volume of the chosen box.
    pub box_volume_cm3: f64,
    /// Sum of the item volumes.
    pub total_items_volume_cm3: f64,
    /// Box volume not occupied by items.
    pub wasted_space_cm3: f64,
    /// `used / box * 100`, rounded to two decimals.
    pub efficiency_percentage: f64,
}

/// Why no box could be recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackagingError {
    /// The item list was empty.
    NoItems,
    /// The item volumes summed to zero or less.
    NonPositiveTotal,
    /// Every available box is smaller than the total.
    NothingFits,
}

impl std::fmt::Display for PackagingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::NoItems => "No item volumes provided.",
            Self::NonPositiveTotal => "Total volume must be positive.",
            Self::NothingFits => "No suitable packaging found. Items may be too large.",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for PackagingError {}

/// Rounds to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Picks the smallest box whose volume is at least the summed item volume.
///
/// Boxes of equal volume are ordered by name.
pub fn recommend(
    item_volumes: &[f64],
    boxes: &[PackagingType],
) -> Result<PackagingRecommendation, PackagingError> {
    if item_volumes.is_empty() {
        return Err(PackagingError::NoItems);
    }
    let total: f64 = item_volumes.iter().sum();
    if total <= 0.0 || total.is_nan() {
        return Err(PackagingError::NonPositiveTotal);
    }

    let chosen = boxes
        .iter()
        .filter(|b| b.volume_cm3 >= total)
        .min_by(|a, b| {
            a.volume_cm3
                .total_cmp(&b.volume_cm3)
                .then_with(|| a.name.cmp(&b.name))
        })
        .ok_or(PackagingError::NothingFits)?;

    Ok(PackagingRecommendation {
        recommended_box: chosen.name.clone(),
        box_volume_cm3: chosen.volume_cm3,
        total_items_volume_cm3: total,
        wasted_space_cm3: chosen.volume_cm3 - total,
        efficiency_percentage: round2(total / chosen.volume_cm3 * 100.0),
    })
}
