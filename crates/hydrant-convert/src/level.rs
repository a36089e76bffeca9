//! Ordered compatibility between a converter and a request.

/// How well a converter fits a request. Greater is better.
///
/// `TypeMatch` means the converter can handle the shape at all;
/// `ExactProtocolMatch` means the request names one of its media types.
/// Both together make an `ExactMatch`.
///
/// # Example
///
/// ```
/// use hydrant_convert::CompatibilityLevel;
///
/// let level = CompatibilityLevel::TypeMatch.combine(CompatibilityLevel::ExactProtocolMatch);
/// assert_eq!(level, CompatibilityLevel::ExactMatch);
/// assert!(CompatibilityLevel::ExactMatch > CompatibilityLevel::TypeMatch);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum CompatibilityLevel {
    /// Unusable.
    #[default]
    NoMatch,
    /// Handles the shape, media type unspecified or different.
    TypeMatch,
    /// Media type named, shape unsupported.
    ExactProtocolMatch,
    /// Handles the shape and the named media type.
    ExactMatch,
}

impl CompatibilityLevel {
    /// Builds a level from its two components.
    #[must_use]
    pub const fn from_parts(type_match: bool, protocol_match: bool) -> Self {
        match (type_match, protocol_match) {
            (true, true) => Self::ExactMatch,
            (true, false) => Self::TypeMatch,
            (false, true) => Self::ExactProtocolMatch,
            (false, false) => Self::NoMatch,
        }
    }

    /// Joins two levels component-wise.
    #[must_use]
    pub const fn combine(self, other: Self) -> Self {
        Self::from_parts(
            self.has_type_match() || other.has_type_match(),
            self.has_protocol_match() || other.has_protocol_match(),
        )
    }

    /// Whether the shape is supported.
    #[must_use]
    pub const fn has_type_match(self) -> bool {
        matches!(self, Self::TypeMatch | Self::ExactMatch)
    }

    /// Whether the media type was named.
    #[must_use]
    pub const fn has_protocol_match(self) -> bool {
        matches!(self, Self::ExactProtocolMatch | Self::ExactMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(CompatibilityLevel::NoMatch < CompatibilityLevel::TypeMatch);
        assert!(CompatibilityLevel::TypeMatch < CompatibilityLevel::ExactProtocolMatch);
        assert!(CompatibilityLevel::ExactProtocolMatch < CompatibilityLevel::ExactMatch);
    }

    #[test]
    fn test_combine() {
        use CompatibilityLevel::*;
        assert_eq!(NoMatch.combine(NoMatch), NoMatch);
        assert_eq!(TypeMatch.combine(NoMatch), TypeMatch);
        assert_eq!(NoMatch.combine(ExactProtocolMatch), ExactProtocolMatch);
        assert_eq!(TypeMatch.combine(ExactProtocolMatch), ExactMatch);
        assert_eq!(ExactMatch.combine(NoMatch), ExactMatch);
    }

    #[test]
    fn test_components() {
        assert!(CompatibilityLevel::ExactMatch.has_type_match());
        assert!(CompatibilityLevel::ExactMatch.has_protocol_match());
        assert!(!CompatibilityLevel::ExactProtocolMatch.has_type_match());
        assert!(!CompatibilityLevel::TypeMatch.has_protocol_match());
    }
}
