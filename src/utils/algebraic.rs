//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and `Square`
//! values, reused by the notation codec, FEN setup and console input.

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::Square;

/// Convert a file character (`a`..=`h`) to a zero-based file index.
#[inline]
pub fn file_from_char(file: char) -> Result<u8, ChessErrors> {
    if !('a'..='h').contains(&file) {
        return Err(ChessErrors::InvalidAlgebraicChar(file));
    }
    Ok(file as u8 - b'a')
}

/// Convert a rank character (`1`..=`8`) to a zero-based rank index.
#[inline]
pub fn rank_from_char(rank: char) -> Result<u8, ChessErrors> {
    if !('1'..='8').contains(&rank) {
        return Err(ChessErrors::InvalidAlgebraicChar(rank));
    }
    Ok(rank as u8 - b'1')
}

/// Convert algebraic notation (for example: "e4") to a square.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, ChessErrors> {
    let mut chars = square.chars();
    let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(ChessErrors::InvalidAlgebraicString(square.to_owned()));
    };

    Square::new(rank_from_char(rank)?, file_from_char(file)?)
}

/// Convert a square to algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    square.to_string()
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_square, square_to_algebraic};
    use crate::chess_errors::ChessErrors;

    #[test]
    fn round_trip_square_conversions() {
        let a1 = algebraic_to_square("a1").expect("a1 should parse");
        assert_eq!((a1.rank(), a1.file()), (0, 0));
        let h8 = algebraic_to_square("h8").expect("h8 should parse");
        assert_eq!((h8.rank(), h8.file()), (7, 7));
        assert_eq!(square_to_algebraic(a1), "a1");
        assert_eq!(square_to_algebraic(h8), "h8");
    }

    #[test]
    fn rejects_bad_coordinates() {
        assert!(matches!(
            algebraic_to_square("i1"),
            Err(ChessErrors::InvalidAlgebraicChar('i'))
        ));
        assert!(matches!(
            algebraic_to_square("a9"),
            Err(ChessErrors::InvalidAlgebraicChar('9'))
        ));
        assert!(matches!(
            algebraic_to_square("e44"),
            Err(ChessErrors::InvalidAlgebraicString(_))
        ));
    }
}
