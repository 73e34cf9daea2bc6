//! Per-specification comparison strategies.
//!
//! Each well-known specification id maps to one strategy. The wording and the
//! favorable/neutral classification of every insight below is catalog copy shown to shoppers;
//! change it only together with the storefront.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;


use crate::domain::insight::Insight;
use crate::domain::specification::{SpecificationId, SpecificationType};
use crate::domain::specification_value::ProductSpecificationValue;
use crate::errors::DomainError;

pub type StrategyFn =
    fn(&ProductSpecificationValue, &ProductSpecificationValue) -> Result<Vec<Insight>, DomainError>;

/// Specifications the comparison engine knows how to judge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecificationKind {
    PowerInWatts,
    ConsumptionKwh,
    CapacityLiters,
    FrequencyMhz,
    FrequencyGhz,
    Threads,
    TdpWatts,
    UsbC,
    Waterproof,
    NoiseDb,
    CaloriesKcal,
    WidthCm,
    HeightCm,
    DepthCm,
    WeightKg,
    VolumeLiters,
}

impl SpecificationKind {
    pub const ALL: [Self; 16] = [
        Self::PowerInWatts,
        Self::ConsumptionKwh,
        Self::CapacityLiters,
        Self::FrequencyMhz,
        Self::FrequencyGhz,
        Self::Threads,
        Self::TdpWatts,
        Self::UsbC,
        Self::Waterproof,
        Self::NoiseDb,
        Self::CaloriesKcal,
        Self::WidthCm,
        Self::HeightCm,
        Self::DepthCm,
        Self::WeightKg,
        Self::VolumeLiters,
    ];

    /// Fixed internal specification id; seeded rows must use the same ids.
    pub fn id(self) -> SpecificationId {
        SpecificationId(match self {
            Self::PowerInWatts => 1,
            Self::ConsumptionKwh => 2,
            Self::CapacityLiters => 3,
            Self::FrequencyMhz => 4,
            Self::FrequencyGhz => 5,
            Self::Threads => 6,
            Self::TdpWatts => 7,
            Self::UsbC => 8,
            Self::Waterproof => 9,
            Self::NoiseDb => 10,
            Self::CaloriesKcal => 11,
            Self::WidthCm => 12,
            Self::HeightCm => 13,
            Self::DepthCm => 14,
            Self::WeightKg => 15,
            Self::VolumeLiters => 16,
        })
    }

    pub fn from_id(id: SpecificationId) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::PowerInWatts => "Power (W)",
            Self::ConsumptionKwh => "Energy consumption (kWh)",
            Self::CapacityLiters => "Capacity (L)",
            Self::FrequencyMhz => "Frequency (MHz)",
            Self::FrequencyGhz => "Frequency (GHz)",
            Self::Threads => "Threads",
            Self::TdpWatts => "TDP (W)",
            Self::UsbC => "USB-C",
            Self::Waterproof => "Waterproof",
            Self::NoiseDb => "Noise (dB)",
            Self::CaloriesKcal => "Calories (kcal)",
            Self::WidthCm => "Width (cm)",
            Self::HeightCm => "Height (cm)",
            Self::DepthCm => "Depth (cm)",
            Self::WeightKg => "Weight (kg)",
            Self::VolumeLiters => "Volume (L)",
        }
    }

    pub fn value_type(self) -> SpecificationType {
        match self {
            Self::UsbC | Self::Waterproof => SpecificationType::Bool,
            _ => SpecificationType::Int,
        }
    }

    // Exhaustive on purpose: a new kind does not compile until it has a strategy.
    fn strategy(self) -> StrategyFn {
        match self {
            Self::PowerInWatts => power_in_watts,
            Self::ConsumptionKwh => consumption_kwh,
            Self::CapacityLiters => capacity_liters,
            Self::FrequencyMhz => frequency_mhz,
            Self::FrequencyGhz => frequency_ghz,
            Self::Threads => threads,
            Self::TdpWatts => tdp_watts,
            Self::UsbC => usb_c,
            Self::Waterproof => waterproof,
            Self::NoiseDb => noise_db,
            Self::CaloriesKcal => calories_kcal,
            Self::WidthCm => width_cm,
            Self::HeightCm => height_cm,
            Self::DepthCm => depth_cm,
            Self::WeightKg => weight_kg,
            Self::VolumeLiters => volume_liters,
        }
    }
}

/// Immutable map from specification id to comparison strategy.
#[derive(Clone)]
pub struct StrategyTable {
    strategies: HashMap<SpecificationId, StrategyFn>,
}

impl StrategyTable {
    /// Table covering every `SpecificationKind`.
    pub fn standard() -> Self {
        Self {
            strategies: SpecificationKind::ALL
                .into_iter()
                .map(|kind| (kind.id(), kind.strategy()))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self { strategies: HashMap::new() }
    }

    pub fn with_strategy(mut self, id: SpecificationId, strategy: StrategyFn) -> Self {
        self.strategies.insert(id, strategy);
        self
    }

    pub fn get(&self, id: SpecificationId) -> Option<StrategyFn> {
        self.strategies.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Runs the strategy registered for the left value's specification.
    pub fn apply(
        &self,
        left: &ProductSpecificationValue,
        right: &ProductSpecificationValue,
    ) -> Result<Vec<Insight>, DomainError> {
        let strategy = self.get(left.specification_id).ok_or_else(|| {
            DomainError::business(format!(
                "no comparison strategy found for specification {}",
                left.specification_id
            ))
        })?;
        strategy(left, right)
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for StrategyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<i64> = self.strategies.keys().map(|id| id.0).collect();
        ids.sort_unstable();
        f.debug_struct("StrategyTable").field("specification_ids", &ids).finish()
    }
}

type StrategyResult = Result<Vec<Insight>, DomainError>;

fn int_operands(
    left: &ProductSpecificationValue,
    right: &ProductSpecificationValue,
    label: &str,
) -> Result<(i64, i64), DomainError> {
    match (left.value.as_int(), right.value.as_int()) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(DomainError::business(format!("{label} requires int64 values"))),
    }
}

fn bool_operands(
    left: &ProductSpecificationValue,
    right: &ProductSpecificationValue,
    label: &str,
) -> Result<(bool, bool), DomainError> {
    match (left.value.as_bool(), right.value.as_bool()) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(DomainError::business(format!("{label} requires boolean values"))),
    }
}

fn favorable(owner: &ProductSpecificationValue, message: &str) -> Insight {
    Insight::favorable(owner.product_id, message)
}

fn unfavorable(owner: &ProductSpecificationValue, message: &str) -> Insight {
    Insight::unfavorable(owner.product_id, message)
}

fn neutral(owner: &ProductSpecificationValue, message: &str) -> Insight {
    Insight::neutral(owner.product_id, message)
}

fn power_in_watts(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "Power")?;
    Ok(match left.cmp(&right) {
        Ordering::Greater => vec![
            favorable(l, "has higher power output"),
            favorable(l, "may deliver better performance on heavy workloads"),
            neutral(l, "potentially consumes more energy"),
        ],
        Ordering::Less => vec![
            unfavorable(l, "has lower power output"),
            unfavorable(l, "may be less performant in maximum load contexts"),
            neutral(l, "may consume less energy"),
        ],
        Ordering::Equal => vec![
            neutral(l, "both products deliver the same wattage"),
            neutral(l, "no meaningful difference in maximum power"),
        ],
    })
}

fn consumption_kwh(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "Consumption")?;
    Ok(match left.cmp(&right) {
        Ordering::Less => vec![
            favorable(l, "consumes less energy"),
            favorable(l, "may reduce long-term electricity costs"),
            neutral(l, "tends to be more eco-friendly"),
            favorable(l, "better for 24/7 operation scenarios"),
        ],
        // Catalog copy marks the headline as favorable even on the higher side.
        Ordering::Greater => vec![
            favorable(l, "consumes more energy"),
            neutral(l, "may increase electricity costs over time"),
            neutral(l, "less suitable for energy-efficient installations"),
        ],
        Ordering::Equal => vec![
            neutral(l, "both products have identical energy consumption"),
            neutral(l, "no meaningful difference in long-term cost or usage impact"),
        ],
    })
}

fn capacity_liters(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "Capacity")?;
    Ok(match left.cmp(&right) {
        Ordering::Greater => vec![
            favorable(l, "has greater internal capacity"),
            favorable(l, "can store more items simultaneously"),
            favorable(l, "better for families or heavy-duty usage"),
        ],
        Ordering::Less => vec![
            unfavorable(l, "has smaller internal capacity"),
            neutral(l, "less suitable for large storage needs"),
        ],
        Ordering::Equal => vec![neutral(l, "both products offer identical storage capacity")],
    })
}

fn frequency_mhz(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "Frequency MHz")?;
    Ok(match left.cmp(&right) {
        Ordering::Greater => vec![
            favorable(l, "has higher operating frequency (MHz)"),
            favorable(l, "may execute tasks faster depending on architecture"),
        ],
        Ordering::Less => vec![
            unfavorable(l, "has lower operating frequency (MHz)"),
            neutral(l, "may perform slower under computational bursts"),
        ],
        Ordering::Equal => vec![neutral(l, "both operate at the same MHz frequency")],
    })
}

fn frequency_ghz(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "Frequency GHz")?;
    Ok(match left.cmp(&right) {
        Ordering::Greater => vec![
            favorable(l, "operates at higher GHz"),
            favorable(l, "may offer superior single-core performance"),
        ],
        Ordering::Less => vec![
            unfavorable(l, "operates at lower GHz"),
            neutral(l, "may have inferior single-core responsiveness"),
        ],
        Ordering::Equal => vec![neutral(l, "both operate at the same GHz frequency")],
    })
}

fn threads(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "Threads")?;
    Ok(match left.cmp(&right) {
        Ordering::Greater => vec![
            favorable(l, "supports more concurrent execution threads"),
            favorable(l, "may deliver better performance in parallel workloads"),
            favorable(l, "better suited for multitasking and background processing"),
        ],
        Ordering::Less => vec![
            unfavorable(l, "supports fewer threads"),
            neutral(l, "may struggle in multi-threaded applications"),
        ],
        Ordering::Equal => vec![neutral(l, "both support the same thread count")],
    })
}

fn tdp_watts(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "TDP")?;
    Ok(match left.cmp(&right) {
        Ordering::Less => vec![
            favorable(l, "has lower thermal design power"),
            favorable(l, "may operate cooler and more quietly"),
            favorable(l, "likely requires less robust cooling solutions"),
        ],
        Ordering::Greater => vec![
            unfavorable(l, "has higher thermal design power"),
            neutral(l, "may generate more heat under load"),
            neutral(l, "might require better ventilation or cooling"),
        ],
        Ordering::Equal => vec![neutral(l, "both products have identical TDP values")],
    })
}

fn usb_c(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = bool_operands(l, r, "USB-C")?;
    Ok(match (left, right) {
        (true, false) => vec![
            favorable(l, "includes USB-C support"),
            favorable(l, "is compatible with modern charging and connectivity standards"),
        ],
        (false, true) => vec![unfavorable(l, "does not include USB-C support")],
        _ => vec![neutral(l, "both share the same USB-C capability")],
    })
}

fn waterproof(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = bool_operands(l, r, "Waterproof")?;
    Ok(match (left, right) {
        (true, false) => vec![
            favorable(l, "is waterproof"),
            favorable(l, "offers better resistance against accidental liquid exposure"),
            favorable(l, "may be more durable in humid or outdoor conditions"),
        ],
        (false, true) => vec![
            neutral(l, "is not waterproof"),
            neutral(l, "may require extra care in wet environments"),
        ],
        _ => vec![neutral(l, "both products share the same waterproof capability")],
    })
}

fn noise_db(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "Noise (dB)")?;
    Ok(match left.cmp(&right) {
        Ordering::Less => vec![
            favorable(l, "operates more quietly"),
            favorable(l, "more suitable for silent environments"),
        ],
        Ordering::Greater => vec![
            unfavorable(l, "operates louder"),
            neutral(l, "may be less comfortable for long-duration usage"),
        ],
        Ordering::Equal => vec![neutral(l, "both have identical noise levels")],
    })
}

fn calories_kcal(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "Calories")?;
    Ok(match left.cmp(&right) {
        Ordering::Less => vec![
            neutral(l, "contains fewer calories"),
            neutral(l, "more adequate for low-calorie diets"),
            neutral(l, "may support weight management goals"),
        ],
        Ordering::Greater => vec![neutral(l, "contains more calories")],
        Ordering::Equal => vec![neutral(l, "both contain the same caloric value")],
    })
}

// Dimensions are informational only; the "greater" branches keep the published copy as is.

fn width_cm(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "Width")?;
    Ok(match left.cmp(&right) {
        Ordering::Less => {
            vec![neutral(l, "is slimmer"), neutral(l, "may fit better in small spaces")]
        }
        Ordering::Greater => vec![
            neutral(l, "is slimmer"),
            neutral(l, "is wider"),
            neutral(l, "may require more installation space"),
        ],
        Ordering::Equal => vec![neutral(l, "both share the same width")],
    })
}

fn height_cm(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "Height")?;
    Ok(match left.cmp(&right) {
        Ordering::Less => vec![
            neutral(l, "is shorter"),
            neutral(l, "more adequate for compact environments"),
        ],
        Ordering::Greater => vec![
            neutral(l, "is shorter"),
            neutral(l, "is taller"),
            neutral(l, "may offer greater internal capacity depending on design"),
        ],
        Ordering::Equal => vec![neutral(l, "both share the same height")],
    })
}

fn depth_cm(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "Depth")?;
    Ok(match left.cmp(&right) {
        Ordering::Less => vec![
            neutral(l, "is less deep"),
            neutral(l, "easier to accommodate in shallow installations"),
        ],
        Ordering::Greater => vec![
            neutral(l, "is less deep"),
            neutral(l, "is deeper"),
            neutral(l, "requires more installation clearance"),
        ],
        Ordering::Equal => vec![neutral(l, "both share the same depth")],
    })
}

fn weight_kg(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "Weight")?;
    Ok(match left.cmp(&right) {
        Ordering::Less => vec![
            neutral(l, "is lighter"),
            neutral(l, "easier to transport or install"),
            neutral(l, "offers greater portability"),
        ],
        Ordering::Greater => vec![
            neutral(l, "is lighter"),
            neutral(l, "is heavier"),
            neutral(l, "may feel more robust depending on build quality"),
        ],
        Ordering::Equal => vec![neutral(l, "both weigh the same")],
    })
}

fn volume_liters(l: &ProductSpecificationValue, r: &ProductSpecificationValue) -> StrategyResult {
    let (left, right) = int_operands(l, r, "Volume")?;
    Ok(match left.cmp(&right) {
        Ordering::Greater => vec![
            favorable(l, "offers more internal volume"),
            favorable(l, "better for storage, transport or operational space"),
        ],
        Ordering::Less => vec![
            neutral(l, "offers smaller internal volume"),
            neutral(l, "may limit operational or storage capacity"),
        ],
        Ordering::Equal => vec![neutral(l, "both offer the same volume")],
    })
}
