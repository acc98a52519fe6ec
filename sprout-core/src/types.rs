use std::fmt;

/// Identifier for a branch in a [`crate::tree::Tree`].
///
/// This is an index into `Tree::nodes`, and is only meaningful within
/// the lifetime of a given `Tree` instance.
pub type BranchId = usize;

/// Offset added to a user id to derive that user's plant seed.
pub const USER_SEED_OFFSET: i64 = 12345;

/// Integer seed that drives both tree shape and leaf attributes.
///
/// The value is used verbatim in attribute hash keys, so two seeds that
/// print differently always produce different leaf keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Seed(pub i64);

impl Seed {
    /// Normalizes a real-valued seed by truncating toward zero.
    ///
    /// Non-finite input maps to `Seed(0)`. Values beyond the `i64` range
    /// saturate.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Seed(value.trunc() as i64)
        } else {
            Seed(0)
        }
    }

    /// Seed for a given user's plant.
    pub fn for_user(user_id: i64) -> Self {
        Seed(user_id.wrapping_add(USER_SEED_OFFSET))
    }
}

impl From<i64> for Seed {
    fn from(value: i64) -> Self {
        Seed(value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Draw layer of a leaf relative to the branch strokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Behind,
    Front,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_f64_truncates_toward_zero() {
        assert_eq!(Seed::from_f64(12.9), Seed(12));
        assert_eq!(Seed::from_f64(-12.9), Seed(-12));
        assert_eq!(Seed::from_f64(0.4), Seed(0));
    }

    #[test]
    fn from_f64_maps_non_finite_to_zero() {
        assert_eq!(Seed::from_f64(f64::NAN), Seed(0));
        assert_eq!(Seed::from_f64(f64::INFINITY), Seed(0));
        assert_eq!(Seed::from_f64(f64::NEG_INFINITY), Seed(0));
    }

    #[test]
    fn for_user_applies_offset() {
        assert_eq!(Seed::for_user(7), Seed(12352));
        assert_eq!(Seed::for_user(0).to_string(), "12345");
    }
}
