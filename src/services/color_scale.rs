// src/services/color_scale.rs

use std::fmt;

/// Cor RGB usada para pintar uma zona no mapa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Formato aceito pelo widget de mapa: "#RRGGBB".
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Interpolação linear canal a canal (t em [0, 1]).
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let channel = |a: u8, b: u8| -> u8 {
            let value = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            value.round().clamp(0.0, 255.0) as u8
        };

        Rgb {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Pontos fixos da escala
pub const RED: Rgb = Rgb::new(0xFF, 0x00, 0x00);
pub const YELLOW: Rgb = Rgb::new(0xFF, 0xFF, 0x00);
pub const GREEN: Rgb = Rgb::new(0x00, 0xFF, 0x00);

/// Abaixo (ou igual) disto a zona está em falta crítica.
pub const CRITICAL_RATIO: f64 = 0.4;
/// Ponto onde a escala passa pelo amarelo.
pub const WARNING_RATIO: f64 = 0.45;
/// A partir disto a necessidade está coberta com folga.
pub const SURPLUS_RATIO: f64 = 1.2;

/// Mapeia (quantidade, necessidade) para a cor da zona.
///
/// - sem necessidade: verde
/// - necessidade sem nenhum estoque: vermelho
/// - razão >= 1.2: verde; razão <= 0.4: vermelho
/// - entre 0.4 e 0.45: vermelho -> amarelo
/// - entre 0.45 e 1.2: amarelo -> verde
pub fn color_scale(quantity: f64, need: f64) -> Rgb {
    if need == 0.0 {
        return GREEN;
    }
    if quantity == 0.0 {
        return RED;
    }

    color_for_ratio(quantity / need)
}

/// A parte da escala que depende só da razão.
pub fn color_for_ratio(ratio: f64) -> Rgb {
    if ratio >= SURPLUS_RATIO {
        return GREEN;
    }
    if ratio <= CRITICAL_RATIO {
        return RED;
    }

    if ratio < WARNING_RATIO {
        let t = (ratio - CRITICAL_RATIO) / (WARNING_RATIO - CRITICAL_RATIO);
        RED.lerp(YELLOW, t)
    } else {
        let t = (ratio - WARNING_RATIO) / (SURPLUS_RATIO - WARNING_RATIO);
        YELLOW.lerp(GREEN, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(120.0, 100.0)]
    #[case(500.0, 100.0)]
    #[case(1.0, 0.5)]
    fn surplus_is_green(#[case] quantity: f64, #[case] need: f64) {
        assert_eq!(color_scale(quantity, need), GREEN);
    }

    #[rstest]
    #[case(40.0, 100.0)]
    #[case(10.0, 100.0)]
    #[case(0.0, 100.0)]
    fn shortage_is_red(#[case] quantity: f64, #[case] need: f64) {
        assert_eq!(color_scale(quantity, need), RED);
    }

    #[test]
    fn forty_percent_is_pure_red_hex() {
        assert_eq!(color_scale(40.0, 100.0).to_hex(), "#FF0000");
    }

    #[test]
    fn no_need_is_green_even_without_stock() {
        assert_eq!(color_scale(0.0, 0.0), GREEN);
        assert_eq!(color_scale(25.0, 0.0), GREEN);
    }

    #[test]
    fn ninety_percent_leans_towards_green() {
        // t = (0.9 - 0.45) / 0.75 = 0.6 -> r = 255 * 0.4 = 102
        let color = color_scale(90.0, 100.0);
        assert_eq!(color, Rgb::new(102, 255, 0));
        assert_eq!(color.to_hex(), "#66FF00");
    }

    #[test]
    fn red_to_yellow_segment_moves_green_channel_only() {
        // t = (0.425 - 0.4) / 0.05 = 0.5
        let color = color_for_ratio(0.425);
        assert_eq!(color.r, 255);
        assert_eq!(color.b, 0);
        assert!((127..=128).contains(&color.g));
    }

    #[test]
    fn continuous_at_yellow_breakpoint() {
        let below = color_for_ratio(WARNING_RATIO - 1e-9);
        let at = color_for_ratio(WARNING_RATIO);
        assert_eq!(at, YELLOW);
        assert_eq!(below, YELLOW);
    }

    #[test]
    fn continuous_at_green_breakpoint() {
        let below = color_for_ratio(SURPLUS_RATIO - 1e-9);
        assert_eq!(below, GREEN);
        assert_eq!(color_for_ratio(SURPLUS_RATIO), GREEN);
    }

    #[test]
    fn continuous_at_red_breakpoint() {
        assert_eq!(color_for_ratio(CRITICAL_RATIO + 1e-9), RED);
    }

    #[test]
    fn display_matches_hex() {
        assert_eq!(YELLOW.to_string(), "#FFFF00");
    }
}
