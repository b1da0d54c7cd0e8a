// src/math/utils.rs

/// Mathematische Konstanten
pub mod constants {
    /// Flächen darunter gelten als "leer" (z.B. A - A).
    pub const AREA_EPSILON: f64 = 1e-12;
    /// Signifikante Stellen für das Zusammenführen von PSLG-Vertices.
    pub const DEFAULT_ROUND_DIGITS: usize = 12;
    /// f64 hat höchstens 17 signifikante Dezimalstellen.
    pub const MAX_ROUND_DIGITS: usize = 17;
    pub const DEFAULT_CIRCLE_SEGMENTS: usize = 64;
    pub const DEFAULT_MIN_ANGLE_DEG: f64 = 25.0;
    /// Obergrenze für den Mindestwinkel der Qualitätstriangulation.
    pub const MAX_MIN_ANGLE_DEG: f64 = 33.0;
    /// Standard-Obergrenze für zusätzlich eingefügte Steiner-Punkte.
    pub const DEFAULT_MAX_STEINER: usize = 200_000;
    pub const TAU: f64 = std::f64::consts::TAU;
}

/// Rundung auf signifikante Stellen
pub mod rounding {
    /// Rundet `value` auf `digits` signifikante Dezimalstellen.
    ///
    /// Läuft über die wissenschaftliche Darstellung, damit sich das Ergebnis
    /// für alle Größenordnungen gleich verhält. `-0.0` wird zu `0.0`.
    ///
    /// Beträge unter `10^-digits` werden auf `0.0` gezogen, sonst bleiben
    /// Rundungsreste wie `1e-17` aus Boolean-Operationen ein eigener Vertex.
    pub fn round_significant(value: f64, digits: usize) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let digits = digits.max(1);
        if value.abs() < 10f64.powi(-(digits as i32)) {
            return 0.0;
        }
        let formatted = format!("{:.*e}", digits - 1, value);
        let rounded = formatted.parse::<f64>().unwrap_or(value);
        if rounded == 0.0 { 0.0 } else { rounded }
    }

    /// Bit-genauer Schlüssel eines gerundeten Punktes, geeignet für HashMaps.
    pub fn point_key(x: f64, y: f64, digits: usize) -> (u64, u64) {
        (
            round_significant(x, digits).to_bits(),
            round_significant(y, digits).to_bits(),
        )
    }
}

/// Winkel-Hilfsfunktionen
pub mod angles {
    /// Konvertiert Radiant zu Grad
    pub fn rad_to_deg(radians: f64) -> f64 {
        radians.to_degrees()
    }
}
