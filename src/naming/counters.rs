//! Counter rendering for name patterns.
//!
//! - Radix counters render in any base 2..=36 with lower or upper digits.
//! - Alphabetic counters are bijective base 26: a..z, aa..zz, aaa...

pub const MIN_RADIX: u32 = 2;
pub const MAX_RADIX: u32 = 36;

/// Render `num` in `radix` (clamped to 2..=36).
pub fn to_radix(mut num: u64, radix: u32, upper: bool) -> String {
    let radix = u64::from(radix.clamp(MIN_RADIX, MAX_RADIX));
    let mut digits: Vec<u8> = Vec::new();
    loop {
        digits.push(digit((num % radix) as u8, upper));
        num /= radix;
        if num == 0 {
            break;
        }
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

fn digit(d: u8, upper: bool) -> u8 {
    match d {
        0..=9 => b'0' + d,
        _ if upper => b'A' + d - 10,
        _ => b'a' + d - 10,
    }
}

/// Render `num` as a bijective base-26 letter sequence: 0 -> a, 25 -> z, 26 -> aa.
pub fn to_alpha(num: u64, upper: bool) -> String {
    let base = if upper { b'A' } else { b'a' };
    let mut n = u128::from(num) + 1;
    let mut letters: Vec<u8> = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(base + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}
