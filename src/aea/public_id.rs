use crate::error::{Result, TacSetupError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Version marker the registry resolves to the newest available package.
pub const LATEST: &str = "latest";

/// Package or connection identifier in `author/name[:version]` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicId {
    author: String,
    name: String,
    version: Option<String>,
}

impl PublicId {
    pub fn new(author: &str, name: &str, version: Option<&str>) -> Result<Self> {
        validate_name(author, "author")?;
        validate_name(name, "name")?;
        if let Some(v) = version {
            validate_version(v)?;
        }

        Ok(Self {
            author: author.to_string(),
            name: name.to_string(),
            version: version.map(str::to_string),
        })
    }

    /// Unversioned id from names already known to be valid
    pub(crate) fn builtin(author: &str, name: &str) -> Self {
        Self {
            author: author.to_string(),
            name: name.to_string(),
            version: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Identifier without any version suffix
    pub fn without_version(&self) -> Self {
        Self {
            author: self.author.clone(),
            name: self.name.clone(),
            version: None,
        }
    }

    /// Same identifier pinned to `version`, replacing any existing pin
    pub fn with_version(&self, version: &str) -> Result<Self> {
        validate_version(version)?;
        Ok(Self {
            author: self.author.clone(),
            name: self.name.clone(),
            version: Some(version.to_string()),
        })
    }

    /// True when both ids name the same package, ignoring versions
    pub fn same_package(&self, other: &PublicId) -> bool {
        self.author == other.author && self.name == other.name
    }
}

/// Author and name parts follow the registry's package naming rules:
/// ASCII letters, digits and underscores, not starting with a digit.
pub fn validate_name(part: &str, what: &str) -> Result<()> {
    let valid = !part.is_empty()
        && part.len() <= 128
        && !part.starts_with(|c: char| c.is_ascii_digit())
        && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(TacSetupError::InvalidId(format!(
            "invalid {} '{}': use letters, digits and underscores",
            what, part
        )))
    }
}

/// Accept `latest` or a semantic version such as `0.18.0`.
pub fn validate_version(version: &str) -> Result<()> {
    if version == LATEST {
        return Ok(());
    }

    semver::Version::parse(version)
        .map(|_| ())
        .map_err(|e| TacSetupError::InvalidId(format!("invalid version '{}': {}", version, e)))
}

impl FromStr for PublicId {
    type Err = TacSetupError;

    fn from_str(s: &str) -> Result<Self> {
        let (path, version) = match s.split_once(':') {
            Some((path, version)) => (path, Some(version)),
            None => (s, None),
        };

        let (author, name) = path.split_once('/').ok_or_else(|| {
            TacSetupError::InvalidId(format!("'{}' is not in author/name[:version] form", s))
        })?;

        PublicId::new(author, name, version)
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.author, self.name)?;
        if let Some(version) = &self.version {
            write!(f, ":{}", version)?;
        }
        Ok(())
    }
}

impl Serialize for PublicId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublicId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_version() {
        let id: PublicId = "fetchai/tac_controller".parse().unwrap();
        assert_eq!(id.name(), "tac_controller");
        assert_eq!(id.version(), None);
        assert_eq!(id.to_string(), "fetchai/tac_controller");
    }

    #[test]
    fn test_parse_with_version() {
        let id: PublicId = "fetchai/p2p_libp2p_client:0.18.0".parse().unwrap();
        assert_eq!(id.name(), "p2p_libp2p_client");
        assert_eq!(id.version(), Some("0.18.0"));
        assert_eq!(id.to_string(), "fetchai/p2p_libp2p_client:0.18.0");
    }

    #[test]
    fn test_parse_latest() {
        let id: PublicId = "fetchai/tac_participant:latest".parse().unwrap();
        assert_eq!(id.version(), Some(LATEST));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("tac_controller".parse::<PublicId>().is_err());
        assert!("fetchai/".parse::<PublicId>().is_err());
        assert!("/tac_controller".parse::<PublicId>().is_err());
        assert!("fetchai/tac-controller".parse::<PublicId>().is_err());
        assert!("fetchai/1controller".parse::<PublicId>().is_err());
        assert!("fetchai/a/b".parse::<PublicId>().is_err());
    }

    #[test]
    fn test_parse_rejects_bad_version() {
        let err = "fetchai/p2p_libp2p:0.18".parse::<PublicId>().unwrap_err();
        assert!(err.to_string().contains("invalid version '0.18'"));
    }

    #[test]
    fn test_with_version_replaces_pin() {
        let id: PublicId = "fetchai/p2p_libp2p_client:0.17.0".parse().unwrap();
        let pinned = id.with_version("0.18.0").unwrap();
        assert_eq!(pinned.to_string(), "fetchai/p2p_libp2p_client:0.18.0");
        assert_eq!(pinned.without_version().to_string(), "fetchai/p2p_libp2p_client");
    }

    #[test]
    fn test_same_package_ignores_version() {
        let a: PublicId = "fetchai/p2p_libp2p:0.1.0".parse().unwrap();
        let b: PublicId = "fetchai/p2p_libp2p".parse().unwrap();
        let c: PublicId = "fetchai/p2p_libp2p_client".parse().unwrap();
        assert!(a.same_package(&b));
        assert!(!a.same_package(&c));
    }

    #[test]
    fn test_serde_as_string() {
        let id: PublicId = "fetchai/tac_controller:0.1.0".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"fetchai/tac_controller:0.1.0\"");

        let parsed: PublicId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);

        assert!(serde_json::from_str::<PublicId>("\"nope\"").is_err());
    }
}
