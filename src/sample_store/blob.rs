// File layout: [version: u8][wincode payload].

pub(super) const FILE_VERSION: u8 = 1;

pub(super) fn with_version_prefix(version: u8, payload: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + payload.len());
    out.push(version);
    out.extend_from_slice(&payload);
    out
}

/// Payload after the version byte; `None` when empty or another version.
pub(super) fn versioned_payload(bytes: &[u8], expected_version: u8) -> Option<&[u8]> {
    match bytes.split_first() {
        Some((v, rest)) if *v == expected_version => Some(rest),
        _ => None,
    }
}

pub(super) fn file_version(bytes: &[u8]) -> u8 {
    bytes.first().copied().unwrap_or(0)
}
