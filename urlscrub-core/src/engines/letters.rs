//! Sources for the `<randomchar>` rewrite placeholder.

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Supplies one lowercase ASCII letter per rule invocation.
pub trait LetterSource: Send + Sync + std::fmt::Debug {
    fn next_letter(&self) -> char;
}

/// Draws letters from the thread-local random generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomLetters;

impl LetterSource for RandomLetters {
    fn next_letter(&self) -> char {
        char::from(rand::rng().random_range(b'a'..=b'z'))
    }
}

/// Cycles through a fixed sequence of letters. Used for reproducible output.
#[derive(Debug)]
pub struct FixedLetters {
    letters: Vec<char>,
    position: AtomicUsize,
}

impl FixedLetters {
    /// Letters outside `a..=z` are dropped; an empty sequence yields `'a'`.
    pub fn new(letters: &str) -> Self {
        let letters: Vec<char> = letters.chars().filter(|c| c.is_ascii_lowercase()).collect();
        Self { letters, position: AtomicUsize::new(0) }
    }
}

impl LetterSource for FixedLetters {
    fn next_letter(&self) -> char {
        if self.letters.is_empty() {
            return 'a';
        }
        let index = self.position.fetch_add(1, Ordering::Relaxed) % self.letters.len();
        self.letters[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_letters_are_lowercase() {
        let source = RandomLetters;
        for _ in 0..200 {
            assert!(source.next_letter().is_ascii_lowercase());
        }
    }

    #[test]
    fn test_fixed_letters_cycle() {
        let source = FixedLetters::new("xY1z");
        let drawn: String = (0..4).map(|_| source.next_letter()).collect();
        assert_eq!(drawn, "xzxz");
    }

    #[test]
    fn test_empty_fixed_letters_fall_back_to_a() {
        assert_eq!(FixedLetters::new("").next_letter(), 'a');
    }
}
