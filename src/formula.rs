//! The compressed view of a formula that both the validator and the evaluator work on.
//!
//! Compressing a formula drops every [`Symbol::Ignorable`] character while keeping the relative order of everything
//! else. No copy of the text is made: [`Formula::symbols()`] skips the spacing on the fly, so the validator and the
//! evaluator can never disagree on what the compressed formula looks like.

use core::{iter::FusedIterator, str::Chars};

use crate::{symbol::Symbol, validate::ValidationError};

/// Formula text with its spacing removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formula<'a> {
	/// Text as it was given
	raw: &'a str,

	/// Number of non-ignorable characters in [`Self::raw`]
	len: usize,
}

#[allow(clippy::len_without_is_empty, reason = "an empty formula can't be constructed")]
impl<'a> Formula<'a> {
	/// Compresses the given text.
	///
	/// # Errors
	/// If nothing remains after removing the spacing, [`ValidationError::Empty`] is returned.
	pub fn new(raw: &'a str) -> Result<Self, ValidationError> {
		let len = raw.chars().filter(|&c| !is_ignorable(c)).count();
		if len == 0 {
			return Err(ValidationError::Empty);
		}

		Ok(Self { raw, len })
	}

	/// Gets the text the formula was created from, spacing included.
	#[must_use]
	#[inline]
	pub const fn raw(&self) -> &'a str {
		self.raw
	}

	/// Gets the number of characters in the compressed formula.
	#[must_use]
	#[inline]
	pub const fn len(&self) -> usize {
		self.len
	}


	/// Iterates over the compressed characters of the formula along with their character positions in the raw text.
	#[must_use]
	#[inline]
	pub fn chars(&self) -> CompressedChars<'a> {
		CompressedChars {
			chars: self.raw.chars(),
			pos: 0,
		}
	}

	/// Iterates over the classified compressed characters of the formula. Characters outside of the accepted domain
	/// are yielded as `Err(ValidationError::InvalidChar)` so that callers can stop at the first one.
	#[must_use]
	#[inline]
	pub fn symbols(&self) -> Symbols<'a> {
		Symbols(self.chars())
	}
}

impl<'a> TryFrom<&'a str> for Formula<'a> {
	type Error = ValidationError;

	#[inline]
	fn try_from(raw: &'a str) -> Result<Self, Self::Error> {
		Self::new(raw)
	}
}

/// Iterator over the non-ignorable characters of a formula, see [`Formula::chars()`]
#[derive(Debug, Clone)]
pub struct CompressedChars<'a> {
	/// Remaining raw characters
	chars: Chars<'a>,

	/// Character position of the next raw character
	pos: usize,
}

impl Iterator for CompressedChars<'_> {
	type Item = (usize, char);

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let ch = self.chars.next()?;
			let pos = self.pos;
			self.pos = self.pos.saturating_add(1);
			if !is_ignorable(ch) {
				return Some((pos, ch));
			}
		}
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(0, self.chars.size_hint().1)
	}
}

impl FusedIterator for CompressedChars<'_> {}

/// Iterator over the classified non-ignorable characters of a formula, see [`Formula::symbols()`]
#[derive(Debug, Clone)]
pub struct Symbols<'a>(CompressedChars<'a>);

impl Iterator for Symbols<'_> {
	type Item = Result<(usize, Symbol), ValidationError>;

	fn next(&mut self) -> Option<Self::Item> {
		let (pos, ch) = self.0.next()?;
		Some(Symbol::classify(ch).map(|sym| (pos, sym)).ok_or(ValidationError::InvalidChar { ch, pos }))
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.0.size_hint()
	}
}

impl FusedIterator for Symbols<'_> {}

/// Checks whether a character is dropped during compression.
#[inline]
fn is_ignorable(c: char) -> bool {
	matches!(Symbol::classify(c), Some(Symbol::Ignorable))
}
