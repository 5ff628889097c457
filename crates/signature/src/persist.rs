//! Save and load in the formats the report page stores signatures in

use std::str::FromStr;

use tracing::debug;

use crate::capture::{PendingImport, SignatureCapture};
use crate::constants::PNG_MIME;
use crate::error::SignatureError;

/// How a saved signature is represented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveFormat {
    /// Bare base64 PNG payload
    #[default]
    Base64,
    /// Full `data:image/png;base64,...` URL
    DataUrl,
    /// Raw PNG bytes
    Blob,
}

impl FromStr for SaveFormat {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64" => Ok(Self::Base64),
            "dataurl" => Ok(Self::DataUrl),
            "blob" => Ok(Self::Blob),
            _ => Err(SignatureError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Formats a signature can be loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadFormat {
    #[default]
    Base64,
    DataUrl,
}

impl FromStr for LoadFormat {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64" => Ok(Self::Base64),
            "dataurl" => Ok(Self::DataUrl),
            _ => Err(SignatureError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedSignature {
    Text(String),
    Bytes(Vec<u8>),
}

impl SavedSignature {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bytes(_) => None,
        }
    }
}

/// Export the signature for storage. An empty pad has nothing to save.
pub fn save_signature(
    capture: &SignatureCapture,
    format: SaveFormat,
) -> Result<SavedSignature, SignatureError> {
    if capture.is_empty() {
        return Err(SignatureError::NothingToSave);
    }
    let saved = match format {
        SaveFormat::Base64 => SavedSignature::Text(capture.export_base64()?),
        SaveFormat::DataUrl => SavedSignature::Text(capture.export_data_url()?),
        SaveFormat::Blob => SavedSignature::Bytes(capture.export_blob(PNG_MIME, None)?),
    };
    debug!("Saved signature as {:?}", format);
    Ok(saved)
}

/// Begin restoring a stored signature. Decode and apply the result with
/// [`PendingImport::decode`] and [`SignatureCapture::complete_import`].
pub fn load_signature(
    capture: &mut SignatureCapture,
    data: &str,
    format: LoadFormat,
) -> PendingImport {
    match format {
        LoadFormat::Base64 => capture.import_base64(data),
        LoadFormat::DataUrl => capture.import_image(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::ImportOutcome;
    use crate::capture::tests::{capture, draw, line};

    #[test]
    fn test_format_parsing() {
        assert_eq!("base64".parse::<SaveFormat>().unwrap(), SaveFormat::Base64);
        assert_eq!("dataURL".parse::<SaveFormat>().unwrap(), SaveFormat::DataUrl);
        assert_eq!("Blob".parse::<SaveFormat>().unwrap(), SaveFormat::Blob);
        assert!("svg".parse::<SaveFormat>().is_err());
        assert!("blob".parse::<LoadFormat>().is_err());
    }

    #[test]
    fn test_save_empty_fails() {
        let capture = capture(10.0, 10.0);
        assert!(matches!(
            save_signature(&capture, SaveFormat::Base64),
            Err(SignatureError::NothingToSave)
        ));
    }

    #[test]
    fn test_save_formats() {
        let mut capture = capture(30.0, 20.0);
        draw(&mut capture, &line(6));

        let base64 = save_signature(&capture, SaveFormat::Base64).unwrap();
        let data_url = save_signature(&capture, SaveFormat::DataUrl).unwrap();
        let blob = save_signature(&capture, SaveFormat::Blob).unwrap();

        let base64 = base64.as_text().unwrap();
        assert_eq!(data_url.as_text().unwrap(), format!("data:image/png;base64,{base64}"));
        assert!(matches!(blob, SavedSignature::Bytes(ref b) if b.starts_with(&[0x89, b'P', b'N', b'G'])));
    }

    #[test]
    fn test_save_then_load_restores_pixels() {
        let mut source = capture(30.0, 20.0);
        draw(&mut source, &line(6));
        let saved = save_signature(&source, SaveFormat::Base64).unwrap();

        let mut target = capture(30.0, 20.0);
        let pending = load_signature(&mut target, saved.as_text().unwrap(), LoadFormat::Base64);
        let outcome = target.complete_import(pending.decode()).unwrap();

        assert_eq!(outcome, ImportOutcome::Applied);
        assert_eq!(
            target.surface().unwrap().pixels(),
            source.surface().unwrap().pixels()
        );
    }
}
