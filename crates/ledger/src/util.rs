use crate::LedgerError;

pub fn strip_0x(input: &str) -> &str {
    if let Some(stripped) = input.strip_prefix("0x") {
        stripped
    } else if let Some(stripped) = input.strip_prefix("0X") {
        stripped
    } else {
        input
    }
}

pub fn parse_hex_bytes<const N: usize>(input: &str) -> Result<[u8; N], LedgerError> {
    let raw = strip_0x(input);
    let bytes = hex::decode(raw).map_err(|e| LedgerError::InvalidHex(e.to_string()))?;
    if bytes.len() != N {
        return Err(LedgerError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

pub fn format_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn parse_hex_u64(input: &str) -> Result<u64, LedgerError> {
    let raw = strip_0x(input);
    if raw.is_empty() {
        return Err(LedgerError::InvalidHex("empty hex value".to_string()));
    }
    u64::from_str_radix(raw, 16).map_err(|e| LedgerError::InvalidHex(e.to_string()))
}

pub fn parse_hex_u128(input: &str) -> Result<u128, LedgerError> {
    let raw = strip_0x(input);
    if raw.is_empty() {
        return Err(LedgerError::InvalidHex("empty hex value".to_string()));
    }
    u128::from_str_radix(raw, 16).map_err(|e| LedgerError::InvalidHex(e.to_string()))
}

pub fn format_hex_u64(value: u64) -> String {
    format!("0x{value:x}")
}

pub fn format_hex_u128(value: u128) -> String {
    format!("0x{value:x}")
}

/// Parse a human-denominated decimal string into base units, scaling by
/// `decimals`. Equivalent to scaling "1.5" by 9 into 1_500_000_000.
/// Rejects empty input, non-digit characters, more fractional digits than
/// `decimals`, and values that do not fit in a u128.
pub fn parse_units(input: &str, decimals: u32) -> Result<u128, LedgerError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidAmount("empty value".to_string()));
    }

    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(LedgerError::InvalidAmount(trimmed.to_string()));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(LedgerError::InvalidAmount(trimmed.to_string()));
    }
    if frac.len() > decimals as usize {
        return Err(LedgerError::InvalidAmount(format!(
            "{trimmed}: more than {decimals} fractional digits"
        )));
    }

    let scale = 10u128
        .checked_pow(decimals)
        .ok_or_else(|| LedgerError::InvalidAmount(format!("decimals {decimals} out of range")))?;

    let whole_part = if whole.is_empty() {
        0u128
    } else {
        whole
            .parse::<u128>()
            .map_err(|e| LedgerError::InvalidAmount(e.to_string()))?
    };

    let frac_part = if frac.is_empty() {
        0u128
    } else {
        let padded = 10u128.pow(decimals - frac.len() as u32);
        frac.parse::<u128>()
            .map_err(|e| LedgerError::InvalidAmount(e.to_string()))?
            .checked_mul(padded)
            .ok_or_else(|| LedgerError::InvalidAmount(trimmed.to_string()))?
    };

    whole_part
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac_part))
        .ok_or_else(|| LedgerError::InvalidAmount(format!("{trimmed}: overflows u128")))
}
