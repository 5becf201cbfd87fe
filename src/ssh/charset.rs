//! Character sets for command text and terminal output

use std::fmt;
use std::str::FromStr;

use encoding_rs::Encoding;

use crate::error::{Result, ShellError};

/// A named text encoding
///
/// Commands are encoded with the session's output charset before being
/// written; drained terminal bytes are decoded with the input charset.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Charset(&'static Encoding);

impl Charset {
    /// UTF-8, the default for both directions
    pub fn utf8() -> Self {
        Charset(encoding_rs::UTF_8)
    }

    /// Resolve a label such as `UTF-8`, `gbk` or `ISO-8859-1`
    ///
    /// # Examples
    /// ```
    /// use ssh_shell::ssh::Charset;
    ///
    /// assert_eq!(Charset::for_label("utf8").unwrap(), Charset::utf8());
    /// assert!(Charset::for_label("no-such-charset").is_err());
    /// ```
    pub fn for_label(label: &str) -> Result<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .map(Charset)
            .ok_or_else(|| ShellError::Charset(label.to_string()))
    }

    /// Canonical name of the encoding
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Encode text; unmappable characters are replaced
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let (bytes, _, _) = self.0.encode(text);
        bytes.into_owned()
    }

    /// Decode bytes; malformed sequences become U+FFFD
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _) = self.0.decode_without_bom_handling(bytes);
        text.into_owned()
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::utf8()
    }
}

impl FromStr for Charset {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self> {
        Self::for_label(s)
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Charset").field(&self.name()).finish()
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_resolve() {
        assert_eq!(Charset::for_label("UTF-8").unwrap().name(), "UTF-8");
        assert_eq!(Charset::for_label(" gbk ").unwrap().name(), "GBK");
        assert_eq!(Charset::default(), Charset::utf8());
    }

    #[test]
    fn test_unknown_label() {
        let err = "klingon".parse::<Charset>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported charset: klingon");
    }

    #[test]
    fn test_decode_gbk() {
        let gbk = Charset::for_label("GBK").unwrap();
        // "中文" in GBK
        assert_eq!(gbk.decode(&[0xD6, 0xD0, 0xCE, 0xC4]), "中文");
        assert_eq!(gbk.encode("中文"), vec![0xD6, 0xD0, 0xCE, 0xC4]);
    }

    #[test]
    fn test_decode_malformed_is_lossy() {
        let text = Charset::utf8().decode(&[b'o', b'k', 0xFF]);
        assert_eq!(text, "ok\u{FFFD}");
    }
}
