//! Area text codec.
//!
//! A grid's fill matrix is written as one decimal number per row, rows joined
//! with `,`. Each number is the row read as a binary string, leftmost column
//! first: a 4-column row `[0, 0, 1, 1]` is `0011`, written `3`.
//!
//! Conversion goes through decimal digit buffers, so rows of any width fit.

use crate::error::{AreaError, AreaResult};
use crate::grid::Grid;

/// Separator between rows.
pub const ROW_SEPARATOR: &str = ",";

/// Encode the fill matrix as area text.
pub fn encode(grid: &Grid) -> String {
    (0..grid.rows())
        .filter_map(|row| grid.row(row))
        .map(bits_to_decimal)
        .collect::<Vec<_>>()
        .join(ROW_SEPARATOR)
}

/// Merge area text into `grid`.
///
/// Decoding is additive: cells set in the text are filled, every other cell
/// keeps its value. Segments past the last grid row are ignored and rows
/// without a segment are untouched.
///
/// The text is rejected when it is blank, when a segment is not an unsigned
/// decimal number (an empty segment included), or when a row value needs more
/// bits than the grid has columns. Validation runs before anything is written,
/// so on error the grid is unchanged.
pub fn decode(grid: &mut Grid, text: &str) -> AreaResult<()> {
    let rows = match parse(text, grid.rows(), grid.columns()) {
        Ok(rows) => rows,
        Err(err) => {
            log::warn!("rejected area text: {err}");
            return Err(err);
        }
    };

    let columns = grid.columns();
    for (row, bits) in rows.iter().enumerate().take(grid.rows()) {
        let offset = columns - bits.len();
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                grid.set(row, offset + i, true);
            }
        }
    }
    Ok(())
}

/// Parse every segment into its significant bits, most significant first.
fn parse(text: &str, rows: usize, columns: usize) -> AreaResult<Vec<Vec<bool>>> {
    if text.trim().is_empty() {
        return Err(AreaError::Empty);
    }

    text.split(ROW_SEPARATOR)
        .enumerate()
        .map(|(index, segment)| {
            let segment = segment.trim();
            let bits = decimal_to_bits(segment).ok_or_else(|| AreaError::InvalidSegment {
                index,
                segment: segment.to_string(),
            })?;
            if index < rows && bits.len() > columns {
                return Err(AreaError::RowOverflow {
                    row: index,
                    bits: bits.len(),
                    columns,
                });
            }
            Ok(bits)
        })
        .collect()
}

/// Read `bits` as a binary number (first bit most significant) and render it
/// in decimal.
fn bits_to_decimal(bits: &[bool]) -> String {
    // Least significant digit first.
    let mut digits: Vec<u8> = vec![0];
    for &bit in bits {
        let mut carry = u8::from(bit);
        for digit in digits.iter_mut() {
            let value = *digit * 2 + carry;
            *digit = value % 10;
            carry = value / 10;
        }
        if carry > 0 {
            digits.push(carry);
        }
    }
    digits.iter().rev().map(|d| char::from(b'0' + d)).collect()
}

/// Convert an unsigned decimal string into its binary digits without leading
/// zeros (`"0"` yields no bits). Returns `None` for anything but ASCII digits.
fn decimal_to_bits(segment: &str) -> Option<Vec<bool>> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    // Most significant digit first.
    let mut digits: Vec<u8> = segment.bytes().map(|b| b - b'0').collect();
    let mut bits = Vec::new();
    while digits.iter().any(|&d| d != 0) {
        let mut remainder = 0u8;
        for digit in digits.iter_mut() {
            let value = remainder * 10 + *digit;
            *digit = value / 2;
            remainder = value % 2;
        }
        bits.push(remainder == 1);
    }
    bits.reverse();
    Some(bits)
}
