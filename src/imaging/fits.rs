//! Minimal FITS writer: a single primary HDU of 32-bit floats.

use std::io::Write;

use crate::error::{LauncherError, Result};
use crate::host::HostImage;

const BLOCK_SIZE: usize = 2880;
const CARD_SIZE: usize = 80;

/// Write `image` as a FITS primary HDU.
///
/// Samples are stored as big-endian IEEE floats (`BITPIX = -32`). FITS puts
/// the origin at the lower-left corner, so rows are written bottom-up.
pub fn write_fits<W: Write>(writer: &mut W, image: &HostImage) -> Result<()> {
    if !image.is_consistent() {
        return Err(LauncherError::Image(format!(
            "Pixel buffer of {} samples does not match {}x{}x{}",
            image.data.len(),
            image.width,
            image.height,
            image.channels
        )));
    }

    let mut header = Vec::with_capacity(BLOCK_SIZE);
    push_card(&mut header, "SIMPLE", "T", "conforms to FITS standard");
    push_card(&mut header, "BITPIX", "-32", "32-bit IEEE float");
    if image.channels > 1 {
        push_card(&mut header, "NAXIS", "3", "number of axes");
    } else {
        push_card(&mut header, "NAXIS", "2", "number of axes");
    }
    push_card(&mut header, "NAXIS1", &image.width.to_string(), "width");
    push_card(&mut header, "NAXIS2", &image.height.to_string(), "height");
    if image.channels > 1 {
        push_card(&mut header, "NAXIS3", &image.channels.to_string(), "channels");
    }
    push_card(&mut header, "BZERO", "0.0", "");
    push_card(&mut header, "BSCALE", "1.0", "");
    push_card(&mut header, "ROWORDER", "'BOTTOM-UP'", "");
    push_card(&mut header, "PROGRAM", "'duosplit-launcher'", "");
    push_end(&mut header);
    pad_to_block(&mut header, b' ');
    writer.write_all(&header)?;

    let row_bytes = image.width * 4;
    let mut data_len = 0usize;
    let mut row = vec![0u8; row_bytes];
    for channel in 0..image.channels {
        let plane = image.plane(channel);
        for y in (0..image.height).rev() {
            let src = &plane[y * image.width..(y + 1) * image.width];
            for (dst, value) in row.chunks_exact_mut(4).zip(src) {
                dst.copy_from_slice(&value.to_be_bytes());
            }
            writer.write_all(&row)?;
            data_len += row_bytes;
        }
    }

    let padding = (BLOCK_SIZE - data_len % BLOCK_SIZE) % BLOCK_SIZE;
    writer.write_all(&vec![0u8; padding])?;
    writer.flush()?;
    Ok(())
}

/// Append a fixed-format `KEYWORD = value / comment` card.
fn push_card(buf: &mut Vec<u8>, keyword: &str, value: &str, comment: &str) {
    let mut card = format!("{:<8}= ", keyword);
    if value.starts_with('\'') {
        card.push_str(&format!("{:<20}", value));
    } else {
        // Fixed format: numbers and logicals end at column 30.
        card.push_str(&format!("{:>20}", value));
    }
    if !comment.is_empty() {
        card.push_str(" / ");
        card.push_str(comment);
    }
    push_padded(buf, &card);
}

fn push_end(buf: &mut Vec<u8>) {
    push_padded(buf, "END");
}

fn push_padded(buf: &mut Vec<u8>, card: &str) {
    let bytes = card.as_bytes();
    let len = bytes.len().min(CARD_SIZE);
    buf.extend_from_slice(&bytes[..len]);
    buf.extend(std::iter::repeat(b' ').take(CARD_SIZE - len));
}

fn pad_to_block(buf: &mut Vec<u8>, fill: u8) {
    let padding = (BLOCK_SIZE - buf.len() % BLOCK_SIZE) % BLOCK_SIZE;
    buf.extend(std::iter::repeat(fill).take(padding));
}
