// Binary frame detection and header parsing (spec §4.A).
//
// Two recognized layouts, plus a historical fallback:
//   versioned: [u32 BE version_len][version][u32 BE type_len][type][payload]
//   legacy:    [u32 BE type_len][type][payload]
//   fallback:  oversized leading length + ZIP magic => whole frame is flags_zip

use std::fmt;

pub const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const ZIP_FALLBACK_THRESHOLD: usize = 10 * 1024 * 1024;
const MAX_VERSIONED_PROBE_LEN: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFrameError {
    Truncated,
    ZeroLength,
    InvalidUtf8Type,
}

impl fmt::Display for BinaryFrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryFrameError::Truncated => write!(f, "frame truncated"),
            BinaryFrameError::ZeroLength => write!(f, "zero-length header field"),
            BinaryFrameError::InvalidUtf8Type => write!(f, "type name is not valid UTF-8"),
        }
    }
}

impl std::error::Error for BinaryFrameError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryFrameKind {
    DatabaseZip,
    FlagsZip,
    LogosZip,
    PicturesZip,
    TranslationsZip,
    Unknown(String),
}

impl BinaryFrameKind {
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "database_zip" | "database" => Self::DatabaseZip,
            "flags_zip" | "flags" => Self::FlagsZip,
            "logos_zip" => Self::LogosZip,
            "pictures_zip" | "pictures" => Self::PicturesZip,
            "translations_zip" => Self::TranslationsZip,
            other => Self::Unknown(other.to_owned()),
        }
    }

    #[must_use]
    pub fn resource_subdir(&self) -> Option<&'static str> {
        match self {
            Self::FlagsZip => Some("flags"),
            Self::LogosZip => Some("logos"),
            Self::PicturesZip => Some("pictures"),
            Self::DatabaseZip | Self::TranslationsZip | Self::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBinaryFrame {
    /// `None` for the legacy and ZIP-magic-fallback layouts.
    pub version: Option<String>,
    pub kind: BinaryFrameKind,
    pub payload: Vec<u8>,
}

fn read_u32_be(buf: &[u8], offset: usize) -> Result<u32, BinaryFrameError> {
    let end = offset
        .checked_add(4)
        .ok_or(BinaryFrameError::Truncated)?;
    if buf.len() < end {
        return Err(BinaryFrameError::Truncated);
    }
    Ok(u32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ]))
}

fn read_utf8_field(buf: &[u8], offset: usize, len: usize) -> Result<(&str, usize), BinaryFrameError> {
    let end = offset.checked_add(len).ok_or(BinaryFrameError::Truncated)?;
    if buf.len() < end {
        return Err(BinaryFrameError::Truncated);
    }
    let text = std::str::from_utf8(&buf[offset..end]).map_err(|_| BinaryFrameError::InvalidUtf8Type)?;
    Ok((text, end))
}

fn parse_versioned(buf: &[u8], version: &str, after_version: usize) -> Result<DecodedBinaryFrame, BinaryFrameError> {
    let type_len = read_u32_be(buf, after_version)? as usize;
    if type_len == 0 {
        return Err(BinaryFrameError::ZeroLength);
    }
    let (type_name, payload_start) = read_utf8_field(buf, after_version + 4, type_len)?;
    Ok(DecodedBinaryFrame {
        version: Some(version.to_owned()),
        kind: BinaryFrameKind::from_type_name(type_name),
        payload: buf[payload_start..].to_vec(),
    })
}

fn parse_legacy(buf: &[u8], type_len: usize) -> Result<DecodedBinaryFrame, BinaryFrameError> {
    let (type_name, payload_start) = read_utf8_field(buf, 4, type_len)?;
    Ok(DecodedBinaryFrame {
        version: None,
        kind: BinaryFrameKind::from_type_name(type_name),
        payload: buf[payload_start..].to_vec(),
    })
}

/// Detect and decode a binary frame per the layout rules in spec §4.A.
pub fn detect_binary_frame(buf: &[u8]) -> Result<DecodedBinaryFrame, BinaryFrameError> {
    if buf.len() < 4 {
        return Err(BinaryFrameError::Truncated);
    }
    let len1 = read_u32_be(buf, 0)? as usize;

    if len1 > ZIP_FALLBACK_THRESHOLD {
        if buf[0..4] == ZIP_MAGIC {
            return Ok(DecodedBinaryFrame {
                version: None,
                kind: BinaryFrameKind::FlagsZip,
                payload: buf.to_vec(),
            });
        }
        return Err(BinaryFrameError::Truncated);
    }

    if len1 == 0 {
        return Err(BinaryFrameError::ZeroLength);
    }

    if len1 <= MAX_VERSIONED_PROBE_LEN as usize {
        if let Ok((candidate, after_version)) = read_utf8_field(buf, 4, len1) {
            if semver::Version::parse(candidate).is_ok() {
                return parse_versioned(buf, candidate, after_version);
            }
        }
    }

    parse_legacy(buf, len1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_versioned(version: &str, kind: &str, payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(version.len() as u32).to_be_bytes());
        buf.extend_from_slice(version.as_bytes());
        buf.extend_from_slice(&(kind.len() as u32).to_be_bytes());
        buf.extend_from_slice(kind.as_bytes());
        buf.extend_from_slice(payload);
        buf
    }

    fn encode_legacy(kind: &str, payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(kind.len() as u32).to_be_bytes());
        buf.extend_from_slice(kind.as_bytes());
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn decodes_versioned_layout() {
        let buf = encode_versioned("64.0.0", "flags_zip", b"PAYLOAD");
        let decoded = detect_binary_frame(&buf).unwrap();
        assert_eq!(decoded.version.as_deref(), Some("64.0.0"));
        assert_eq!(decoded.kind, BinaryFrameKind::FlagsZip);
        assert_eq!(decoded.payload, b"PAYLOAD");
    }

    #[test]
    fn decodes_legacy_layout_when_probe_is_not_semver() {
        let buf = encode_legacy("translations_zip", b"{}");
        let decoded = detect_binary_frame(&buf).unwrap();
        assert_eq!(decoded.version, None);
        assert_eq!(decoded.kind, BinaryFrameKind::TranslationsZip);
        assert_eq!(decoded.payload, b"{}");
    }

    #[test]
    fn zip_magic_fallback_wins_over_oversized_length() {
        let mut buf = ZIP_MAGIC.to_vec();
        buf.extend_from_slice(b"rest of zip file bytes");
        let decoded = detect_binary_frame(&buf).unwrap();
        assert_eq!(decoded.version, None);
        assert_eq!(decoded.kind, BinaryFrameKind::FlagsZip);
        assert_eq!(decoded.payload, buf);
    }

    #[test]
    fn zero_length_is_protocol_error() {
        let buf = [0u8, 0, 0, 0, 1, 2, 3];
        assert_eq!(detect_binary_frame(&buf), Err(BinaryFrameError::ZeroLength));
    }

    #[test]
    fn truncated_frame_is_protocol_error() {
        let buf = encode_legacy("database_zip", b"x");
        assert_eq!(
            detect_binary_frame(&buf[..buf.len() - 2]),
            Err(BinaryFrameError::Truncated)
        );
    }

    #[test]
    fn invalid_utf8_type_is_protocol_error() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&4u32.to_be_bytes());
        buf.extend_from_slice(&[0xFF, 0xFE, 0xFD, 0xFC]);
        assert_eq!(detect_binary_frame(&buf), Err(BinaryFrameError::InvalidUtf8Type));
    }

    #[test]
    fn unknown_type_name_is_preserved() {
        let buf = encode_legacy("some_future_type", b"");
        let decoded = detect_binary_frame(&buf).unwrap();
        assert_eq!(decoded.kind, BinaryFrameKind::Unknown("some_future_type".to_owned()));
    }
}
