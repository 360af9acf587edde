//! A two-slot container that spends no storage on zero-sized slots.
//!
//! Rust already lays out zero-sized fields without reserving any bytes for
//! them, so a stateless policy value stored next to a pointer costs nothing.
//! [`CompressedPair`] names that guarantee and gives the owning pointer types
//! a single place to keep their pointer and their policy together.

/// Holds two values of possibly different types.
///
/// When either type is zero-sized the pair is exactly as large as the other
/// slot. Behavior does not depend on which slots are zero-sized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CompressedPair<A, B> {
    first: A,
    second: B,
}

impl<A, B> CompressedPair<A, B> {
    /// Creates a pair from its two values.
    #[inline(always)]
    pub const fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Creates a pair from values that convert into the slot types.
    #[inline(always)]
    pub fn from_parts<U: Into<A>, V: Into<B>>(first: U, second: V) -> Self {
        Self::new(first.into(), second.into())
    }

    #[inline(always)]
    pub fn first(&self) -> &A {
        &self.first
    }

    #[inline(always)]
    pub fn first_mut(&mut self) -> &mut A {
        &mut self.first
    }

    #[inline(always)]
    pub fn second(&self) -> &B {
        &self.second
    }

    #[inline(always)]
    pub fn second_mut(&mut self) -> &mut B {
        &mut self.second
    }

    /// Borrows both slots mutably at once.
    #[inline(always)]
    pub fn parts_mut(&mut self) -> (&mut A, &mut B) {
        (&mut self.first, &mut self.second)
    }

    /// Splits the pair back into its values.
    #[inline(always)]
    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }

    /// Exchanges the contents of two pairs.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other)
    }
}

impl<A, B> From<(A, B)> for CompressedPair<A, B> {
    #[inline(always)]
    fn from((first, second): (A, B)) -> Self {
        Self::new(first, second)
    }
}
