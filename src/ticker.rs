use std::{convert::Infallible, fmt::Display, str::FromStr};

/// Symbol as it appears in the input file, kept verbatim
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Ticker {
    pub symbol: String,
}

impl Ticker {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.symbol
    }
}

impl FromStr for Ticker {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, <Self as FromStr>::Err> {
        Ok(Self::new(s))
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
