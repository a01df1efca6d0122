//! Loading networks from disk
//!
//! `.json` files hold a [`NetworkDefinition`]; everything else is read as the
//! line-oriented description language of [`dsl`].

pub mod definition;
pub mod dsl;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::core::error::Result;
use crate::network::graph::Network;

pub use definition::NetworkDefinition;
pub use dsl::parse_dsl;

/// Source format of a network description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Dsl,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SourceFormat::Json,
            _ => SourceFormat::Dsl,
        }
    }
}

pub fn load_str(text: &str, format: SourceFormat) -> Result<Network> {
    match format {
        SourceFormat::Json => NetworkDefinition::from_json(text)?.to_network(),
        SourceFormat::Dsl => parse_dsl(text),
    }
}

/// Read and build the network stored at `path`
pub fn load_path(path: &Path) -> Result<Network> {
    let format = SourceFormat::from_path(path);
    debug!(path = %path.display(), ?format, "loading network");
    let text = fs::read_to_string(path)?;
    load_str(&text, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FlowError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("a/net.json")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("NET.JSON")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("net.flow")), SourceFormat::Dsl);
        assert_eq!(SourceFormat::from_path(Path::new("net")), SourceFormat::Dsl);
    }

    #[test]
    fn test_load_path_dsl() {
        let mut file = tempfile::Builder::new().suffix(".flow").tempfile().unwrap();
        writeln!(file, "a -> b\nb -> c").unwrap();

        let nw = load_path(file.path()).unwrap();
        assert_eq!(nw.site_count(), 3);
        assert_eq!(nw.channel_count(), 2);
    }

    #[test]
    fn test_load_path_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"chain": ["a", "b"]}}"#).unwrap();

        let nw = load_path(file.path()).unwrap();
        assert_eq!(nw.channel_count(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_path(Path::new("/definitely/not/here.flow")).unwrap_err();
        assert!(matches!(err, FlowError::Io(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let err = load_str("{not json", SourceFormat::Json).unwrap_err();
        assert_eq!(err.code(), "JSON_ERROR");
    }

    #[test]
    fn test_load_file_without_extension_as_dsl() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name plain\nx -> y").unwrap();

        let nw = load_path(file.path()).unwrap();
        assert_eq!(nw.name(), Some("plain"));
    }
}
