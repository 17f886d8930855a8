use std::fmt;

/// The browser surface a search is issued from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchSurface {
    Desktop,
    Mobile,
}

impl SearchSurface {
    /// Both surfaces in the order bursts run
    pub const ALL: [SearchSurface; 2] = [SearchSurface::Desktop, SearchSurface::Mobile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

impl fmt::Display for SearchSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
