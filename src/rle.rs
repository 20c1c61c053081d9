//! PackBits-style run-length codec used for the legacy `is32`/`il32` color
//! planes and their `s8mk`/`l8mk` masks.
//!
//! The compressed stream is a sequence of control bytes.  A control byte
//! below 128 introduces a literal run of `control + 1` bytes copied verbatim;
//! a control byte of 128 or above is followed by a single byte that is
//! repeated `control - 125` times.  The stream has no end marker, so the
//! decoder must be told how many bytes the plane holds.

use crate::error::{Error, Result};

/// The shortest run of identical bytes worth encoding as a repeat run.
pub const MIN_REPEAT_RUN: usize = 3;

/// The longest run a single repeat control byte can describe.
pub const MAX_REPEAT_RUN: usize = 130;

/// The longest run a single literal control byte can describe.
pub const MAX_LITERAL_RUN: usize = 128;

/// Added to a repeat run's length to form its control byte.
const REPEAT_CONTROL_OFFSET: usize = 125;

/// Compresses one plane of 8-bit samples.
///
/// # Examples
/// ```
/// let packed = icnsgen::rle::encode(&[5, 5, 5, 5, 5, 7, 7, 9]);
/// assert_eq!(packed, vec![130, 5, 2, 7, 7, 9]);
/// ```
pub fn encode(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len() + input.len() / 128 + 1);
    let mut literal_start = 0;
    let mut position = 0;
    while position < input.len() {
        let run = repeat_length(&input[position..]);
        if run >= MIN_REPEAT_RUN {
            push_literals(&input[literal_start..position], &mut output);
            output.push((REPEAT_CONTROL_OFFSET + run) as u8);
            output.push(input[position]);
            position += run;
            literal_start = position;
        } else {
            position += run;
        }
    }
    push_literals(&input[literal_start..], &mut output);
    output
}

/// Decompresses a single plane of exactly `length` bytes.  Unlike
/// [`decode_into`], the whole input must be consumed by the plane.
pub fn decode(input: &[u8], length: usize) -> Result<Vec<u8>> {
    let mut output = vec![0u8; length];
    let consumed = decode_into(input, &mut output)?;
    if consumed != input.len() {
        let msg = format!("{} trailing bytes after RLE plane",
                          input.len() - consumed);
        return Err(Error::format(msg));
    }
    Ok(output)
}

/// Decompresses exactly `output.len()` bytes from the start of `input`,
/// returning the number of input bytes consumed.  Planes stored back to back
/// are decoded by calling this repeatedly on the remaining input.
pub fn decode_into(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let mut position = 0;
    let mut written = 0;
    while written < output.len() {
        let control = *input.get(position).ok_or_else(truncated)? as usize;
        position += 1;
        if control >= 128 {
            let count = control - REPEAT_CONTROL_OFFSET;
            let value = *input.get(position).ok_or_else(truncated)?;
            position += 1;
            if written + count > output.len() {
                return Err(overrun(written + count, output.len()));
            }
            for byte in &mut output[written..written + count] {
                *byte = value;
            }
            written += count;
        } else {
            let count = control + 1;
            if position + count > input.len() {
                return Err(truncated());
            }
            if written + count > output.len() {
                return Err(overrun(written + count, output.len()));
            }
            output[written..written + count]
                .copy_from_slice(&input[position..position + count]);
            position += count;
            written += count;
        }
    }
    Ok(position)
}

/// Length of the run of bytes equal to `data[0]`, capped at
/// `MAX_REPEAT_RUN`.
fn repeat_length(data: &[u8]) -> usize {
    let first = data[0];
    data.iter()
        .take(MAX_REPEAT_RUN)
        .take_while(|&&byte| byte == first)
        .count()
}

fn push_literals(literals: &[u8], output: &mut Vec<u8>) {
    for chunk in literals.chunks(MAX_LITERAL_RUN) {
        output.push((chunk.len() - 1) as u8);
        output.extend_from_slice(chunk);
    }
}

fn truncated() -> Error {
    Error::format("truncated RLE-compressed data")
}

fn overrun(needed: usize, length: usize) -> Error {
    Error::format(format!("RLE run overruns plane ({} bytes instead of {})",
                          needed,
                          length))
}
