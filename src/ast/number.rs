// Numeric and name leaf values

use super::types::AstType;

/// Payload of a leaf node.
///
/// Which variant is valid is decided by the owning node's [`AstType`];
/// `Constant` carries nothing because the type already names the constant.
#[derive(Debug, Clone)]
pub enum LeafValue {
    Integer(i64),
    Real(f64),
    RealE { mantissa: f64, exponent: i64 },
    Rational { numerator: i64, denominator: i64 },
    Name(String),
    Constant,
}

impl LeafValue {
    /// Zero value for a leaf type.
    pub fn default_for(ty: AstType) -> Self {
        match ty {
            AstType::Integer => LeafValue::Integer(0),
            AstType::Real => LeafValue::Real(0.0),
            AstType::RealE => LeafValue::RealE {
                mantissa: 0.0,
                exponent: 0,
            },
            AstType::Rational => LeafValue::Rational {
                numerator: 0,
                denominator: 1,
            },
            AstType::Name => LeafValue::Name(String::new()),
            _ => LeafValue::Constant,
        }
    }

    /// Re-express this value for another leaf type, keeping the numeric
    /// value or the name where the target can hold it.
    pub fn convert(self, ty: AstType) -> Self {
        match (ty, &self) {
            (AstType::Integer, _) => match self {
                LeafValue::Integer(_) => self,
                LeafValue::Rational {
                    numerator,
                    denominator: 1,
                } => LeafValue::Integer(numerator),
                other => {
                    let v = other.as_f64();
                    LeafValue::Integer(if v.is_finite() { v as i64 } else { 0 })
                },
            },
            (AstType::Real, LeafValue::Real(_)) => self,
            (AstType::Real, _) if self.is_numeric() => LeafValue::Real(self.as_f64()),
            (AstType::RealE, LeafValue::RealE { .. }) => self,
            (AstType::RealE, LeafValue::Integer(v)) => LeafValue::RealE {
                mantissa: *v as f64,
                exponent: 0,
            },
            (AstType::RealE, _) if self.is_numeric() => LeafValue::RealE {
                mantissa: self.as_f64(),
                exponent: 0,
            },
            (AstType::Rational, LeafValue::Rational { .. }) => self,
            (AstType::Rational, LeafValue::Integer(v)) => LeafValue::Rational {
                numerator: *v,
                denominator: 1,
            },
            (AstType::Name, LeafValue::Name(_)) => self,
            _ => LeafValue::default_for(ty),
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        !matches!(self, LeafValue::Name(_) | LeafValue::Constant)
    }

    /// Numeric value, or NaN for names and constants.
    pub fn as_f64(&self) -> f64 {
        match self {
            LeafValue::Integer(v) => *v as f64,
            LeafValue::Real(v) => *v,
            LeafValue::RealE { mantissa, exponent } => {
                let exp = (*exponent).clamp(i32::MIN as i64, i32::MAX as i64) as i32;
                mantissa * 10f64.powi(exp)
            },
            LeafValue::Rational {
                numerator,
                denominator,
            } => *numerator as f64 / *denominator as f64,
            LeafValue::Name(_) | LeafValue::Constant => f64::NAN,
        }
    }

    /// Flip the sign of a numeric value in place. Returns false for names
    /// and constants.
    pub fn negate(&mut self) -> bool {
        match self {
            LeafValue::Integer(v) => *v = v.wrapping_neg(),
            LeafValue::Real(v) => *v = -*v,
            LeafValue::RealE { mantissa, .. } => *mantissa = -*mantissa,
            LeafValue::Rational { numerator, .. } => *numerator = numerator.wrapping_neg(),
            LeafValue::Name(_) | LeafValue::Constant => return false,
        }
        true
    }

    /// Whether the value is a negative number (including `-INF`).
    pub fn is_negative(&self) -> bool {
        match self {
            LeafValue::Integer(v) => *v < 0,
            LeafValue::Real(v) => v.is_sign_negative() && !v.is_nan() && *v != 0.0,
            LeafValue::RealE { mantissa, .. } => *mantissa < 0.0,
            LeafValue::Rational { numerator, .. } => *numerator < 0,
            LeafValue::Name(_) | LeafValue::Constant => false,
        }
    }
}

fn same_float(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

// NaN compares equal to NaN so that structural comparison of trees
// holding `NaN` literals is reflexive.
impl PartialEq for LeafValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LeafValue::Integer(a), LeafValue::Integer(b)) => a == b,
            (LeafValue::Real(a), LeafValue::Real(b)) => same_float(*a, *b),
            (
                LeafValue::RealE {
                    mantissa: m1,
                    exponent: e1,
                },
                LeafValue::RealE {
                    mantissa: m2,
                    exponent: e2,
                },
            ) => same_float(*m1, *m2) && e1 == e2,
            (
                LeafValue::Rational {
                    numerator: n1,
                    denominator: d1,
                },
                LeafValue::Rational {
                    numerator: n2,
                    denominator: d2,
                },
            ) => n1 == n2 && d1 == d2,
            (LeafValue::Name(a), LeafValue::Name(b)) => a == b,
            (LeafValue::Constant, LeafValue::Constant) => true,
            _ => false,
        }
    }
}
