use core::fmt;

/// Where in the input an event was read.
///
/// All three counts are zero based from the start of the stream. Locations
/// are used only for diagnostics: they are copied into [`Error`]s and stamped
/// onto every node a builder materializes, but no builder behavior depends on
/// them.
///
/// [`Error`]: crate::Error
///
/// # Examples
///
/// ```
/// use jsonsink::SourceLocation;
///
/// let loc = SourceLocation::new(12, 1, 4);
/// assert_eq!(loc.to_string(), "byte: 12 line: 1 column: 4");
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Byte offset from the start of the stream.
    pub byte_pos: usize,
    /// Line number.
    pub line: usize,
    /// Column within the line.
    pub column: usize,
}

impl SourceLocation {
    /// Creates a location from its three coordinates.
    #[must_use]
    pub const fn new(byte_pos: usize, line: usize, column: usize) -> Self {
        Self {
            byte_pos,
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "byte: {} line: {} column: {}",
            self.byte_pos, self.line, self.column
        )
    }
}
