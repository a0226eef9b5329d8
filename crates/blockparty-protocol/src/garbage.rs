//! Garbage rows: how the relay builds them and how a client vets them
//! before letting them anywhere near its engine.

use blockparty_engine::{BOARD_HEIGHT, BOARD_WIDTH, Block, Row};

use crate::ProtocolError;

/// A row of garbage with a single empty cell at column `hole`.
///
/// `hole` is reduced modulo `BOARD_WIDTH`.
pub fn garbage_row(hole: usize) -> Row {
    let mut row = [Some(Block::Garbage); BOARD_WIDTH];
    row[hole % BOARD_WIDTH] = None;
    row
}

/// Checks an incoming garbage batch.
///
/// A batch is accepted only if it is non-empty, no taller than the board,
/// and every row holds only garbage with at least one gap. Row width is
/// already fixed by the [`Row`] type.
///
/// # Errors
/// Returns `ProtocolError::InvalidMessage` describing the first problem
/// found. Nothing is partially accepted.
pub fn validate_garbage(rows: &[Row]) -> Result<(), ProtocolError> {
    if rows.is_empty() {
        return Err(ProtocolError::InvalidMessage("empty garbage batch".into()));
    }
    if rows.len() > BOARD_HEIGHT {
        return Err(ProtocolError::InvalidMessage(format!(
            "garbage batch of {} rows exceeds board height {BOARD_HEIGHT}",
            rows.len()
        )));
    }

    for (i, row) in rows.iter().enumerate() {
        if row.iter().all(Option::is_some) {
            return Err(ProtocolError::InvalidMessage(format!(
                "garbage row {i} has no gap"
            )));
        }
        if let Some(block) = row.iter().flatten().find(|b| **b != Block::Garbage) {
            return Err(ProtocolError::InvalidMessage(format!(
                "garbage row {i} contains a {block:?} block"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_row_has_one_gap() {
        for hole in 0..BOARD_WIDTH {
            let row = garbage_row(hole);
            assert_eq!(row.iter().filter(|c| c.is_none()).count(), 1);
            assert_eq!(row[hole], None);
            assert_eq!(
                row.iter().filter(|c| **c == Some(Block::Garbage)).count(),
                BOARD_WIDTH - 1
            );
        }
    }

    #[test]
    fn test_garbage_row_wraps_hole() {
        assert_eq!(garbage_row(BOARD_WIDTH + 3), garbage_row(3));
    }

    #[test]
    fn test_validate_accepts_well_formed_batch() {
        let rows = vec![garbage_row(0), garbage_row(9)];
        assert!(validate_garbage(&rows).is_ok());
    }

    #[test]
    fn test_validate_accepts_sparse_garbage() {
        let mut row = [None; BOARD_WIDTH];
        row[4] = Some(Block::Garbage);
        assert!(validate_garbage(&[row]).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_batch() {
        assert!(matches!(
            validate_garbage(&[]),
            Err(ProtocolError::InvalidMessage(_))
        ));
    }

    #[test]
    fn test_validate_rejects_too_many_rows() {
        let rows = vec![garbage_row(1); BOARD_HEIGHT + 1];
        assert!(validate_garbage(&rows).is_err());
        let rows = vec![garbage_row(1); BOARD_HEIGHT];
        assert!(validate_garbage(&rows).is_ok());
    }

    #[test]
    fn test_validate_rejects_full_row() {
        let full = [Some(Block::Garbage); BOARD_WIDTH];
        let err = validate_garbage(&[garbage_row(2), full]).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_validate_rejects_piece_blocks() {
        let mut row = garbage_row(5);
        row[0] = Some(Block::T);
        assert!(validate_garbage(&[row]).is_err());
    }
}
