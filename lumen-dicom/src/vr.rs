//! Value representations.

/// A two-character value representation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Vr(pub(crate) [u8; 2]);

impl Vr {
    /// Interpret two bytes as a value representation, if they look like one.
    pub(crate) fn parse(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [a, b] if a.is_ascii_uppercase() && b.is_ascii_uppercase() => Some(Self([*a, *b])),
            _ => None,
        }
    }

    /// Whether the explicit-VR element header has two reserved bytes followed
    /// by a 4-byte length, instead of a 2-byte length.
    pub(crate) fn is_long_form(self) -> bool {
        matches!(
            &self.0,
            b"OB" | b"OD" | b"OF" | b"OL" | b"OW" | b"SQ" | b"UC" | b"UN" | b"UR" | b"UT"
        )
    }
}
