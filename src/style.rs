use crate::types::PenColor;

pub const FILL_OPACITY: f64 = 0.3;

impl PenColor {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            PenColor::Orange => (249, 115, 22),
            PenColor::Green => (34, 197, 94),
            PenColor::Purple => (168, 85, 247),
        }
    }

    pub fn fill(self) -> String {
        color_for(self, FILL_OPACITY)
    }

    pub fn stroke(self) -> String {
        color_for(self, 1.0)
    }
}

/// CSS `rgba()` string for a pen color. `1.0` prints as `1`.
pub fn color_for(pen: PenColor, opacity: f64) -> String {
    let (r, g, b) = pen.rgb();
    format!("rgba({},{},{},{})", r, g, b, opacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_colors() {
        assert_eq!(color_for(PenColor::Orange, 1.0), "rgba(249,115,22,1)");
        assert_eq!(color_for(PenColor::Green, 1.0), "rgba(34,197,94,1)");
        assert_eq!(color_for(PenColor::Purple, 1.0), "rgba(168,85,247,1)");
    }

    #[test]
    fn fill_uses_thirty_percent() {
        assert_eq!(PenColor::Orange.fill(), "rgba(249,115,22,0.3)");
        assert_eq!(PenColor::Purple.stroke(), "rgba(168,85,247,1)");
    }

    #[test]
    fn colors_are_distinct_per_pen_and_opacity() {
        let pens = [PenColor::Orange, PenColor::Green, PenColor::Purple];
        let mut seen = Vec::new();
        for pen in pens {
            for opacity in [1.0, 0.3] {
                let c = color_for(pen, opacity);
                assert_eq!(c, color_for(pen, opacity));
                assert!(!seen.contains(&c));
                seen.push(c);
            }
        }
    }
}
