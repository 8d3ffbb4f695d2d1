//! The closed colour palette items can be painted with.

/// A colour from the supported palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour {
    name: &'static str,
    code: &'static str,
}

/// Every colour the application supports, in display order.
pub const PALETTE: [Colour; 8] = [
    Colour::new("White", "#FFFFFF"),
    Colour::new("Red", "#FF5733"),
    Colour::new("Orange", "#FFC300"),
    Colour::new("Yellow", "#FFFF66"),
    Colour::new("Green", "#CCFF99"),
    Colour::new("Blue", "#6666FF"),
    Colour::new("Purple", "#9966CC"),
    Colour::new("Grey", "#999999"),
];

/// Error returned when a colour code is not part of the palette.
#[derive(Debug, thiserror::Error)]
#[error("Colour \"{0}\" is unsupported")]
pub struct UnsupportedColour(pub String);

impl Colour {
    const fn new(name: &'static str, code: &'static str) -> Self {
        Self { name, code }
    }

    /// Returns the display name of the colour.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the hex code of the colour.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Looks a colour up by its hex code.
    pub fn from_code(code: &str) -> Result<Colour, UnsupportedColour> {
        PALETTE
            .iter()
            .find(|colour| colour.code.eq_ignore_ascii_case(code))
            .copied()
            .ok_or_else(|| UnsupportedColour(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_look_up_colour_by_code() {
        let colour = Colour::from_code("#FF5733").expect("Red should be supported");
        assert_eq!(colour.name(), "Red");
    }

    #[test]
    fn colour_lookup_ignores_case() {
        let colour = Colour::from_code("#ccff99").expect("Green should be supported");
        assert_eq!(colour.name(), "Green");
    }

    #[test]
    fn rejects_unsupported_colour_code() {
        let err = Colour::from_code("#123456").expect_err("code is not in the palette");
        assert_eq!(err.to_string(), "Colour \"#123456\" is unsupported");
    }
}
