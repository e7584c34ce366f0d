use super::{Error, MaskToken};

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub enum MaskOperand {
    /// Equality operator, described by '='
    #[default]
    Equals = 0,
    /// Inequality operator, described by "!="
    NotEquals = 1,
    /// Greater than, described by '>'
    GreaterThan = 2,
    /// Greater Equals, described by ">="
    GreaterEquals = 3,
    /// Lower than, described by '<'
    LowerThan = 4,
    /// Lower Equals, described by "<="
    LowerEquals = 5,
}

impl std::fmt::Display for MaskOperand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Equals => write!(f, "="),
            Self::GreaterThan => write!(f, ">"),
            Self::LowerThan => write!(f, "<"),
            Self::NotEquals => write!(f, "!="),
            Self::GreaterEquals => write!(f, ">="),
            Self::LowerEquals => write!(f, "<="),
        }
    }
}

impl std::str::FromStr for MaskOperand {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('=') {
            Ok(Self::Equals)
        } else if s.starts_with(">=") {
            Ok(Self::GreaterEquals)
        } else if s.starts_with("<=") {
            Ok(Self::LowerEquals)
        } else if s.starts_with("!=") {
            Ok(Self::NotEquals)
        } else if s.starts_with('>') {
            Ok(Self::GreaterThan)
        } else if s.starts_with('<') {
            Ok(Self::LowerThan)
        } else {
            Err(Error::InvalidOperand)
        }
    }
}

impl MaskOperand {
    const fn formatted_len(&self) -> usize {
        match &self {
            Self::Equals | Self::GreaterThan | Self::LowerThan => 1,
            Self::NotEquals | Self::LowerEquals | Self::GreaterEquals => 2,
        }
    }
    /// Evaluates `lhs (operand) rhs`.
    pub fn compare<T: PartialOrd>(&self, lhs: &T, rhs: &T) -> bool {
        match self {
            Self::Equals => lhs == rhs,
            Self::NotEquals => lhs != rhs,
            Self::GreaterThan => lhs > rhs,
            Self::GreaterEquals => lhs >= rhs,
            Self::LowerThan => lhs < rhs,
            Self::LowerEquals => lhs <= rhs,
        }
    }
}

impl std::ops::Not for MaskOperand {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::Equals => Self::NotEquals,
            Self::NotEquals => Self::Equals,
            Self::GreaterEquals => Self::LowerThan,
            Self::GreaterThan => Self::LowerEquals,
            Self::LowerThan => Self::GreaterEquals,
            Self::LowerEquals => Self::GreaterThan,
        }
    }
}

/// Mask filter to retain or discard data subsets
#[derive(Debug, Clone, PartialEq)]
pub struct MaskFilter {
    /// [MaskToken] describing the subset
    pub token: MaskToken,
    /// [MaskOperand] to describe how to handle the subset
    pub operand: MaskOperand,
}

impl std::str::FromStr for MaskFilter {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (prefix, parser): (&str, fn(&str) -> Result<MaskToken, Error>) =
            if s.starts_with("sv") {
                ("sv", MaskToken::parse_satellites)
            } else if s.starts_with('t') {
                ("t", MaskToken::parse_epoch)
            } else if s.starts_with('c') {
                ("c", MaskToken::parse_constellations)
            } else if s.starts_with('o') {
                ("o", MaskToken::parse_observables)
            } else {
                return Err(Error::InvalidMask);
            };
        let operand = MaskOperand::from_str(&s[prefix.len()..])?;
        let offset = operand.formatted_len() + prefix.len();
        let token = parser(&s[offset..])?;
        Ok(Self { token, operand })
    }
}

/// Masking Trait, to retain or discard data subsets
pub trait Masking {
    /// Applies [MaskFilter] returning a copied Self.
    fn mask(&self, mask: &MaskFilter) -> Self
    where
        Self: Sized;
    /// Applies [MaskFilter] in place with mutable access.
    fn mask_mut(&mut self, mask: &MaskFilter);
}
