use crate::errors::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Address and name the edge node publishes in its address file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    pub address: String,
    pub name: String,
}

impl NodeIdentity {
    /// Parse `"<address> [name]"`; `None` when there is no token at all
    pub fn parse(content: &str) -> Option<Self> {
        let mut tokens = content.split_whitespace();
        let address = tokens.next()?.to_string();
        let name = tokens.next().unwrap_or_default().to_string();
        Some(Self { address, name })
    }

    /// `abcdefgh...stuvwxyz` form used in the info box
    pub fn short_address(&self) -> String {
        let chars: Vec<char> = self.address.chars().collect();
        if chars.len() <= 16 {
            return self.address.clone();
        }
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 8..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

/// Read the address file; `Ok(None)` when it is absent or blank
pub fn read_identity(path: &Path) -> Result<Option<NodeIdentity>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(NodeIdentity::parse(&content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_and_name() {
        let identity = NodeIdentity::parse("0xai_AkyWQ91tdk0QdJfH70nmRG6euFjxwYf1FSC7mAdtiA8g  gts-node-01\n").unwrap();
        assert_eq!(identity.address, "0xai_AkyWQ91tdk0QdJfH70nmRG6euFjxwYf1FSC7mAdtiA8g");
        assert_eq!(identity.name, "gts-node-01");
    }

    #[test]
    fn test_parse_address_only() {
        let identity = NodeIdentity::parse("0xai_abc").unwrap();
        assert_eq!(identity.name, "");
        assert!(NodeIdentity::parse(" \n ").is_none());
    }

    #[test]
    fn test_short_address() {
        let identity = NodeIdentity::parse("0xai_AkyWQ91tdk0QdJfH70nmRG6euFjxwYf1FSC7mAdtiA8g").unwrap();
        assert_eq!(identity.short_address(), "0xai_Aky...mAdtiA8g");

        let short = NodeIdentity::parse("0xai_short").unwrap();
        assert_eq!(short.short_address(), "0xai_short");
    }

    #[test]
    fn test_read_identity_missing_and_blank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_address.txt");
        assert!(read_identity(&path).unwrap().is_none());

        fs::write(&path, "\n").unwrap();
        assert!(read_identity(&path).unwrap().is_none());

        fs::write(&path, "0xai_node my-node").unwrap();
        let identity = read_identity(&path).unwrap().unwrap();
        assert_eq!(identity.name, "my-node");
    }
}
