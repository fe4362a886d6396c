use cosmwasm_std::{Addr, Api, Binary, CanonicalAddr, Uint128, Uint256};

use crate::{error::PayloadError, msg::ProxyCall};

/// Size of one header word
pub const WORD_LEN: usize = 32;
/// Target word + value word. Anything shorter is a plain deposit
pub const HEADER_LEN: usize = 2 * WORD_LEN;

// Length of a 20 byte canonical address once it is right-aligned inside a word
const SHORT_ADDR_LEN: usize = 20;

/// Call decoded from an invocation payload, ready to be dispatched by the sub-account
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCall {
    pub target: Addr,
    pub value: Uint128,
    pub payload: Binary,
}

/// Encodes `[target: 32][value: 32][payload]`, the target canonical address right-aligned in its
/// word and the value as a big-endian 256 bit integer.
pub fn encode_payload(api: &dyn Api, call: &ProxyCall) -> Result<Binary, PayloadError> {
    let canonical = api.addr_canonicalize(&call.target)?;
    if canonical.len() > WORD_LEN {
        return Err(PayloadError::TargetTooLong {});
    }

    let mut raw = Vec::with_capacity(HEADER_LEN + call.payload.len());
    raw.resize(WORD_LEN - canonical.len(), 0u8);
    raw.extend_from_slice(canonical.as_slice());
    raw.extend_from_slice(&Uint256::from(call.value).to_be_bytes());
    raw.extend_from_slice(call.payload.as_slice());

    Ok(Binary::from(raw))
}

/// Decodes an invocation payload. Returns `None` when the payload is shorter than the header,
/// exactly `HEADER_LEN` bytes decodes to a call with an empty forwarded payload.
pub fn decode_payload(api: &dyn Api, raw: &[u8]) -> Result<Option<DecodedCall>, PayloadError> {
    if raw.len() < HEADER_LEN {
        return Ok(None);
    }

    let (target_word, rest) = raw.split_at(WORD_LEN);
    let (value_word, forwarded) = rest.split_at(WORD_LEN);

    // 20 byte addresses come left padded with zeros, 32 byte ones fill the whole word
    let padding = WORD_LEN - SHORT_ADDR_LEN;
    let canonical = if target_word[..padding].iter().all(|b| *b == 0) {
        &target_word[padding..]
    } else {
        target_word
    };
    let target = api
        .addr_humanize(&CanonicalAddr::from(canonical))
        .map_err(|_| PayloadError::InvalidTarget {})?;

    let mut value_bytes = [0u8; WORD_LEN];
    value_bytes.copy_from_slice(value_word);
    let wide_value = Uint256::from_be_bytes(value_bytes);
    let value = Uint128::try_from(wide_value)
        .map_err(|_| PayloadError::ValueOverflow { value: wide_value })?;

    Ok(Some(DecodedCall {
        target,
        value,
        payload: Binary::from(forwarded),
    }))
}
