// src/services/zone_aggregator.rs

use uuid::Uuid;

use crate::{
    models::supply::ZoneSupply,
    services::color_scale::{color_scale, Rgb, GREEN},
};

/// Nível de abastecimento de uma zona, já reduzido para a escala de cores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SupplyLevel {
    /// Nada em falta (sem suprimentos, sem necessidade, ou tipo ausente).
    FullyMet,
    /// Par (quantidade, necessidade) que alimenta a escala.
    Measured { quantity: f64, need: f64 },
}

impl SupplyLevel {
    pub fn color(&self) -> Rgb {
        match *self {
            SupplyLevel::FullyMet => GREEN,
            SupplyLevel::Measured { quantity, need } => color_scale(quantity, need),
        }
    }

    pub fn ratio(&self) -> Option<f64> {
        match *self {
            SupplyLevel::FullyMet => None,
            SupplyLevel::Measured { quantity, need } => Some(quantity / need),
        }
    }
}

/// Reduz os suprimentos da zona a um único nível.
///
/// Com filtro, só o tipo selecionado conta. Sem filtro, vale a pior razão
/// entre os tipos com necessidade > 0, normalizada para percentual (x/100).
pub fn aggregate(supplies: &[ZoneSupply], supply_filter: Option<Uuid>) -> SupplyLevel {
    if supplies.is_empty() {
        return SupplyLevel::FullyMet;
    }

    match supply_filter {
        Some(selected) => match supplies.iter().find(|s| s.supply_type_id == selected) {
            Some(supply) if supply.need > 0 => SupplyLevel::Measured {
                quantity: supply.quantity as f64,
                need: supply.need as f64,
            },
            _ => SupplyLevel::FullyMet,
        },
        None => match worst_ratio(supplies) {
            Some(worst) => SupplyLevel::Measured {
                quantity: worst * 100.0,
                need: 100.0,
            },
            None => SupplyLevel::FullyMet,
        },
    }
}

/// Menor razão quantidade/necessidade entre os tipos com necessidade > 0.
pub fn worst_ratio(supplies: &[ZoneSupply]) -> Option<f64> {
    supplies
        .iter()
        .filter(|s| s.need > 0)
        .map(|s| s.quantity as f64 / s.need as f64)
        .min_by(|a, b| a.total_cmp(b))
}

pub fn zone_color(supplies: &[ZoneSupply], supply_filter: Option<Uuid>) -> Rgb {
    aggregate(supplies, supply_filter).color()
}
