//! Byte-range safe source rewriter.
//!
//! Applies edits expressed as byte ranges of the original text, so every byte no edit
//! touches comes out exactly as it went in.
//!
//! # Usage
//!
//! ```
//! use phpunit_migrator::fix::{ByteRangeRewriter, Edit};
//!
//! let source = "<?php\nclass FooTest {}\n";
//! let mut rewriter = ByteRangeRewriter::new(source);
//! rewriter.add_edit(Edit::insert(6, "#[Group('db')]\n"));
//! let fixed = rewriter.apply().expect("should apply");
//! assert_eq!(fixed, "<?php\n#[Group('db')]\nclass FooTest {}\n");
//! ```

/// A single edit operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Start byte offset (inclusive)
    pub start_byte: usize,
    /// End byte offset (exclusive)
    pub end_byte: usize,
    /// Replacement content
    pub replacement: String,
    /// Optional description for logging
    pub description: Option<String>,
}

impl Edit {
    /// Create a new edit
    #[must_use]
    pub fn new(start_byte: usize, end_byte: usize, replacement: impl Into<String>) -> Self {
        Self {
            start_byte,
            end_byte,
            replacement: replacement.into(),
            description: None,
        }
    }

    /// Attach a description, shown in debug logs
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Create a deletion edit
    #[must_use]
    pub fn delete(start_byte: usize, end_byte: usize) -> Self {
        Self::new(start_byte, end_byte, "")
    }

    /// Create an insertion edit (insert before position)
    #[must_use]
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self::new(position, position, content)
    }

    /// Check if this edit overlaps with another
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start_byte < other.end_byte && other.start_byte < self.end_byte
    }
}

/// Error during rewriting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    /// Two edits have overlapping ranges
    #[error("overlapping edits at {first_start}..{first_end} and {second_start}..{second_end}")]
    OverlappingEdits {
        /// Range of the earlier edit
        first_start: usize,
        /// End of the earlier edit
        first_end: usize,
        /// Start of the later edit
        second_start: usize,
        /// End of the later edit
        second_end: usize,
    },
    /// Edit range is out of bounds or splits a character
    #[error("edit {start_byte}..{end_byte} is not a valid range of a {source_len} byte source")]
    OutOfBounds {
        /// Start byte of the edit
        start_byte: usize,
        /// End byte of the edit
        end_byte: usize,
        /// Length of the source
        source_len: usize,
    },
}

/// Safe source rewriter using byte ranges.
///
/// Edits are sorted by `(start, end)` and applied in one forward sweep. Insertions at
/// the same offset come out in the order they were added.
#[derive(Debug, Clone)]
pub struct ByteRangeRewriter {
    source: String,
    edits: Vec<Edit>,
}

impl ByteRangeRewriter {
    /// Create a new rewriter for the given source
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            edits: Vec::new(),
        }
    }

    /// Add an edit to the pending list
    pub fn add_edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Add multiple edits
    pub fn add_edits(&mut self, edits: impl IntoIterator<Item = Edit>) {
        self.edits.extend(edits);
    }

    /// Where byte `position` of the original source lands in the rewritten text.
    ///
    /// Only meaningful for positions no edit covers. An insertion exactly at
    /// `position` goes in front of it.
    #[must_use]
    pub fn map_offset(&self, position: usize) -> usize {
        self.edits
            .iter()
            .filter(|edit| edit.end_byte <= position)
            .fold(position, |mapped, edit| {
                mapped + edit.replacement.len() - (edit.end_byte - edit.start_byte)
            })
    }

    fn sorted(&self) -> Vec<&Edit> {
        let mut sorted: Vec<(usize, &Edit)> = self.edits.iter().enumerate().collect();
        sorted.sort_by_key(|(seq, edit)| (edit.start_byte, edit.end_byte, *seq));
        sorted.into_iter().map(|(_, edit)| edit).collect()
    }

    /// Validate edits without applying them
    ///
    /// # Errors
    /// Returns error if edits overlap or are out of bounds
    pub fn validate(&self) -> Result<(), RewriteError> {
        for edit in &self.edits {
            if edit.start_byte > edit.end_byte
                || edit.end_byte > self.source.len()
                || !self.source.is_char_boundary(edit.start_byte)
                || !self.source.is_char_boundary(edit.end_byte)
            {
                return Err(RewriteError::OutOfBounds {
                    start_byte: edit.start_byte,
                    end_byte: edit.end_byte,
                    source_len: self.source.len(),
                });
            }
        }

        let sorted = self.sorted();
        for pair in sorted.windows(2) {
            let (first, second) = (pair[0], pair[1]);
            if first.overlaps(second) || second.start_byte < first.end_byte {
                return Err(RewriteError::OverlappingEdits {
                    first_start: first.start_byte,
                    first_end: first.end_byte,
                    second_start: second.start_byte,
                    second_end: second.end_byte,
                });
            }
        }

        Ok(())
    }

    /// Apply all edits and return the modified source
    ///
    /// # Errors
    /// Returns error if edits overlap or are out of bounds
    pub fn apply(self) -> Result<String, RewriteError> {
        self.validate()?;

        let growth: usize = self.edits.iter().map(|edit| edit.replacement.len()).sum();
        let mut result = String::with_capacity(self.source.len() + growth);
        let mut cursor = 0;

        for edit in self.sorted() {
            if let Some(description) = &edit.description {
                tracing::trace!(start = edit.start_byte, end = edit.end_byte, "{description}");
            }
            result.push_str(&self.source[cursor..edit.start_byte]);
            result.push_str(&edit.replacement);
            cursor = edit.end_byte;
        }
        result.push_str(&self.source[cursor..]);

        Ok(result)
    }
}
