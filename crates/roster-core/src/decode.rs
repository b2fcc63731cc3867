// Byte-to-text decoding with an ordered fallback chain.
//
// Roster files arrive from several exporters with no declared encoding. Each
// `ByteDecoder` either decodes the whole file strictly or declines; the chain
// tries them in order and the table reader keeps the first that also yields a
// usable table.

use encoding_rs::Encoding;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown encoding label '{0}'")]
    UnknownLabel(String),

    #[error("decoder chain is empty")]
    EmptyChain,
}

/// Text produced by a successful decode, plus the encoding it came from.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
    pub label: String,
}

impl Decoded {
    /// Push a cell back through the source encoding and read the bytes as
    /// UTF-8, dropping sequences that are not valid UTF-8.
    ///
    /// A no-op for UTF-8 sources. For a single-byte source this recovers
    /// UTF-8 text that was mis-decoded as Latin-1 (`JosÃ©` -> `José`) and
    /// drops stray high bytes that never formed a character.
    pub fn recode(&self, cell: &str) -> String {
        recode_cell(self.encoding, cell)
    }
}

/// One strategy for turning raw file bytes into text.
pub trait ByteDecoder {
    /// Short name used in logs and reports.
    fn label(&self) -> String;

    /// Decode without replacement characters. `None` means "not this encoding".
    fn decode(&self, bytes: &[u8]) -> Option<Decoded>;
}

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

/// A fixed WHATWG encoding such as `utf-8` or `ISO-8859-1`.
///
/// Note that `ISO-8859-1` and `latin1` both resolve to windows-1252 under the
/// WHATWG rules, which decodes every byte.
#[derive(Debug, Clone)]
pub struct EncodingDecoder {
    label: String,
    encoding: &'static Encoding,
}

impl EncodingDecoder {
    pub fn for_label(label: &str) -> Result<Self, DecodeError> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| DecodeError::UnknownLabel(label.to_string()))?;
        Ok(EncodingDecoder {
            label: label.trim().to_string(),
            encoding,
        })
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl ByteDecoder for EncodingDecoder {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn decode(&self, bytes: &[u8]) -> Option<Decoded> {
        let text = self
            .encoding
            .decode_without_bom_handling_and_without_replacement(bytes)?;
        Some(Decoded {
            text: text.into_owned(),
            encoding: self.encoding,
            label: self.label.clone(),
        })
    }
}

/// Detector step: honours a UTF-8 or UTF-16 byte-order mark and declines
/// everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct BomSniffer;

impl ByteDecoder for BomSniffer {
    fn label(&self) -> String {
        "bom".to_string()
    }

    fn decode(&self, bytes: &[u8]) -> Option<Decoded> {
        let (encoding, bom_len) = Encoding::for_bom(bytes)?;
        let text = encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])?;
        Some(Decoded {
            text: text.into_owned(),
            encoding,
            label: format!("bom:{}", encoding.name()),
        })
    }
}

// ---------------------------------------------------------------------------
// DecoderChain
// ---------------------------------------------------------------------------

/// Ordered list of decoders, tried front to back.
#[derive(Default)]
pub struct DecoderChain {
    decoders: Vec<Box<dyn ByteDecoder>>,
}

impl std::fmt::Debug for DecoderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

impl DecoderChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decoder to the end of the chain.
    pub fn with(mut self, decoder: impl ByteDecoder + 'static) -> Self {
        self.decoders.push(Box::new(decoder));
        self
    }

    /// Build a chain from encoding labels, optionally led by the BOM sniffer.
    ///
    /// Labels that resolve to an encoding already in the chain are dropped,
    /// since they would decode identically.
    pub fn from_labels<S: AsRef<str>>(labels: &[S], sniff_bom: bool) -> Result<Self, DecodeError> {
        let mut chain = DecoderChain::new();
        if sniff_bom {
            chain = chain.with(BomSniffer);
        }

        let mut seen: Vec<&'static Encoding> = Vec::new();
        for label in labels {
            let decoder = EncodingDecoder::for_label(label.as_ref())?;
            if seen.contains(&decoder.encoding()) {
                debug!(
                    "encoding '{}' duplicates {}; not tried twice",
                    label.as_ref(),
                    decoder.encoding().name()
                );
                continue;
            }
            seen.push(decoder.encoding());
            chain = chain.with(decoder);
        }

        if chain.is_empty() {
            return Err(DecodeError::EmptyChain);
        }
        Ok(chain)
    }

    pub fn decoders(&self) -> &[Box<dyn ByteDecoder>] {
        &self.decoders
    }

    pub fn labels(&self) -> Vec<String> {
        self.decoders.iter().map(|d| d.label()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// See [`Decoded::recode`].
pub fn recode_cell(encoding: &'static Encoding, cell: &str) -> String {
    let (bytes, _, _) = encoding.encode(cell);
    utf8_dropping_invalid(&bytes)
}

/// Lossy UTF-8 decode that skips invalid sequences instead of replacing them.
pub fn utf8_dropping_invalid(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                // `None` means the input ends mid-sequence.
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8() -> EncodingDecoder {
        EncodingDecoder::for_label("utf-8").unwrap()
    }

    fn latin1() -> EncodingDecoder {
        EncodingDecoder::for_label("latin1").unwrap()
    }

    #[test]
    fn utf8_rejects_invalid_bytes() {
        assert!(utf8().decode(b"Jos\xe9").is_none());
        assert_eq!(utf8().decode("José".as_bytes()).unwrap().text, "José");
    }

    #[test]
    fn latin1_accepts_any_bytes() {
        let decoded = latin1().decode(b"Jos\xe9").unwrap();
        assert_eq!(decoded.text, "José");
        assert_eq!(decoded.label, "latin1");
    }

    #[test]
    fn unknown_label_is_an_error() {
        assert_eq!(
            EncodingDecoder::for_label("klingon-7").unwrap_err(),
            DecodeError::UnknownLabel("klingon-7".into())
        );
    }

    #[test]
    fn recode_repairs_utf8_read_as_latin1() {
        let decoded = latin1().decode("José".as_bytes()).unwrap();
        assert_eq!(decoded.text, "JosÃ©");
        assert_eq!(decoded.recode(&decoded.text), "José");
    }

    #[test]
    fn recode_drops_stray_latin1_bytes() {
        let decoded = latin1().decode(b"Jos\xe9 Silva").unwrap();
        assert_eq!(decoded.recode(&decoded.text), "Jos Silva");
    }

    #[test]
    fn recode_is_identity_for_utf8() {
        let decoded = utf8().decode("Müller".as_bytes()).unwrap();
        assert_eq!(decoded.recode("Müller"), "Müller");
    }

    #[test]
    fn bom_sniffer_declines_without_bom() {
        assert!(BomSniffer.decode(b"plain,text").is_none());
    }

    #[test]
    fn bom_sniffer_decodes_utf16le() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Ana".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let decoded = BomSniffer.decode(&bytes).unwrap();
        assert_eq!(decoded.text, "Ana");
        assert_eq!(decoded.label, "bom:UTF-16LE");
    }

    #[test]
    fn bom_sniffer_strips_utf8_bom() {
        let decoded = BomSniffer.decode(b"\xEF\xBB\xBFh,name").unwrap();
        assert_eq!(decoded.text, "h,name");
    }

    #[test]
    fn chain_from_labels_collapses_latin1_aliases() {
        let chain = DecoderChain::from_labels(&["utf-8", "ISO-8859-1", "latin1"], true).unwrap();
        assert_eq!(chain.labels(), vec!["bom", "utf-8", "ISO-8859-1"]);
    }

    #[test]
    fn chain_from_labels_without_sniffer() {
        let chain = DecoderChain::from_labels(&["utf-8"], false).unwrap();
        assert_eq!(chain.labels(), vec!["utf-8"]);
    }

    #[test]
    fn chain_from_no_labels_is_empty_error() {
        let labels: [&str; 0] = [];
        assert_eq!(
            DecoderChain::from_labels(&labels, false).unwrap_err(),
            DecodeError::EmptyChain
        );
    }

    #[test]
    fn utf8_dropping_invalid_handles_truncated_tail() {
        assert_eq!(utf8_dropping_invalid(b"ab\xC3"), "ab");
        assert_eq!(utf8_dropping_invalid(b"\xFFa\xFEb"), "ab");
        assert_eq!(utf8_dropping_invalid(b""), "");
    }
}
