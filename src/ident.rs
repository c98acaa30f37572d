//! Tool-call id generation.
//!
//! Three policies coexist and are not interchangeable: a fresh random
//! `call_…` token for formats with no native id concept, the vendor
//! composite id preserved verbatim (section-indexed format, handled at the
//! call site), and a short alphanumeric token matching the Mistral vendor's
//! historical shape. Callers route tool results back by id, so every format
//! keeps exactly its own policy.

/// `call_` followed by `hex_len` lowercase hex chars of a fresh uuid.
pub(crate) fn random_call_id(hex_len: usize) -> String {
    let uuid = uuid::Uuid::from_u128(fastrand::u128(..));
    let hex = uuid.simple().to_string();
    let take = hex_len.min(hex.len());
    format!("call_{}", &hex[..take])
}

/// Random `[A-Za-z0-9]{len}` token.
pub(crate) fn vendor_alnum_id(len: usize) -> String {
    std::iter::repeat_with(fastrand::alphanumeric).take(len).collect()
}
