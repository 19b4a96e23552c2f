//! MD5 digests and base64.

use super::strings::bytes;
use super::Args;
use crate::error::EvalResult;
use crate::interpreter::Interpreter;
use crate::value::Value;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt::Write as _;

const SHIFTS: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9,
    14, 20, 5, 9, 14, 20, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 6, 10, 15,
    21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// Lower-case hex MD5 digest of `data`.
pub(crate) fn md5_hex(data: &[u8]) -> String {
    let k: Vec<u32> = (0..64)
        .map(|i| ((f64::from(i + 1)).sin().abs() * 4_294_967_296.0) as u32)
        .collect();
    let mut state: [u32; 4] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476];

    let mut message = data.to_vec();
    let bit_len = (data.len() as u64).wrapping_mul(8);
    message.push(0x80);
    while message.len() % 64 != 56 {
        message.push(0);
    }
    message.extend_from_slice(&bit_len.to_le_bytes());

    for chunk in message.chunks_exact(64) {
        let words: Vec<u32> = chunk
            .chunks_exact(4)
            .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
            .collect();
        let [mut a, mut b, mut c, mut d] = state;
        for i in 0..64 {
            let (f, g) = match i / 16 {
                0 => ((b & c) | (!b & d), i),
                1 => ((d & b) | (!d & c), (5 * i + 1) % 16),
                2 => (b ^ c ^ d, (3 * i + 5) % 16),
                _ => (c ^ (b | !d), (7 * i) % 16),
            };
            let rotated = a
                .wrapping_add(f)
                .wrapping_add(k[i])
                .wrapping_add(words[g])
                .rotate_left(SHIFTS[i]);
            a = d;
            d = c;
            c = b;
            b = b.wrapping_add(rotated);
        }
        state[0] = state[0].wrapping_add(a);
        state[1] = state[1].wrapping_add(b);
        state[2] = state[2].wrapping_add(c);
        state[3] = state[3].wrapping_add(d);
    }

    let mut out = String::with_capacity(32);
    for byte in state.iter().flat_map(|w| w.to_le_bytes()) {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

pub(super) fn md5(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    Ok(Value::string(md5_hex(args.str(0)?.as_bytes())))
}

pub(super) fn base64(interp: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let data = match args.value(0) {
        Value::Str(s) => s.as_bytes().to_vec(),
        Value::Array(_) => bytes(interp, args, 0)?,
        other => {
            return Err(args.error(format!(
                "expected a string or an array of bytes, got {}",
                other.type_name()
            )))
        }
    };
    Ok(Value::string(STANDARD.encode(data)))
}

fn decode(args: &Args) -> EvalResult<Vec<u8>> {
    let text = args.str(0)?;
    STANDARD
        .decode(text.as_bytes())
        .map_err(|err| args.error(format!("invalid base64 input {text:?}: {err}")))
}

pub(super) fn base64_decode(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let data = decode(args)?;
    Ok(Value::string(String::from_utf8_lossy(&data).into_owned()))
}

pub(super) fn base64_decode_bytes(_: &mut Interpreter, args: &Args) -> EvalResult<Value> {
    let data = decode(args)?;
    Ok(Value::array_of(data.into_iter().map(|b| Value::Number(f64::from(b)))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_md5_known_digests() {
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(
            md5_hex(b"The quick brown fox jumps over the lazy dog"),
            "9e107d9d372bb6826bd81d3542a419d6"
        );
    }
}
