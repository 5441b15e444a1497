//! Nucleotide input sanitization

use bio::alphabets::Alphabet;
use once_cell::sync::Lazy;

/// Largest input the service scores without truncating
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 104;

/// Accepted nucleotide letters (uppercase only, input is uppercased first)
static NUCLEOTIDES: Lazy<Alphabet> = Lazy::new(|| Alphabet::new(b"ACGT"));

/// Uppercase the input and drop everything outside A, C, G, T.
pub fn sanitize_sequence(input: &str) -> String {
    input
        .to_ascii_uppercase()
        .bytes()
        .filter(|&b| NUCLEOTIDES.symbols.contains(b as usize))
        .map(char::from)
        .collect()
}

/// Length readout shown under the sequence field, e.g. `12 / 104`
pub fn length_readout(sequence: &str, max_length: usize) -> String {
    format!("{} / {}", sequence.len(), max_length)
}
