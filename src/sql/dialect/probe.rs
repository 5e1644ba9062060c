//! Vendor detection from connection metadata.
//!
//! A [`VendorProbe`] carries what a driver reports about the server: product
//! name, product version and connection URL. Detection is a pure function of
//! those strings; nothing here opens a connection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{db2, oracle, Db2Platform, DialectProfile, Vendor};

static ORACLE_RELEASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Release (\d+)").expect("valid regex"));
static MAJOR_MINOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\.(\d+)").expect("valid regex"));
static ISERIES_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)V(\d+)R(\d+)").expect("valid regex"));
static DB2_LEVEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:SQL|DSN)(\d{2})(\d{2})").expect("valid regex"));

/// Server metadata used to pick a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorProbe {
    pub product_name: String,
    #[serde(default)]
    pub product_version: String,
    #[serde(default)]
    pub url: String,
}

impl VendorProbe {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.product_version = version.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Vendor family: product name first, then the URL protocol.
    ///
    /// MySQL servers that are really MariaDB are still the MySQL family.
    pub fn vendor(&self) -> Vendor {
        let detected = vendor_for(&self.product_name)
            .or_else(|| jdbc_protocol(&self.url).and_then(vendor_for));

        match detected {
            Some(vendor) => {
                debug!(product = %self.product_name, %vendor, "detected vendor");
                vendor
            }
            None => {
                warn!(
                    product = %self.product_name,
                    url = %self.url,
                    "unrecognized database product, using generic profile"
                );
                Vendor::Generic
            }
        }
    }

    /// `(major, minor)` parsed from the product version, when it has one.
    pub fn version(&self) -> Option<(u32, u32)> {
        let v = &self.product_version;
        if let Some(caps) = ORACLE_RELEASE.captures(v) {
            return caps[1].parse().ok().map(|major| (major, 0));
        }
        if let Some(caps) = DB2_LEVEL.captures(v) {
            return parse_pair(&caps[1], &caps[2]);
        }
        if let Some(caps) = MAJOR_MINOR.captures(v) {
            return parse_pair(&caps[1], &caps[2]);
        }
        if let Some(caps) = ISERIES_VERSION.captures(v) {
            return parse_pair(&caps[1], &caps[2]);
        }
        None
    }

    fn iseries_version(&self) -> (u32, u32) {
        ISERIES_VERSION
            .captures(&self.product_version)
            .and_then(|caps| parse_pair(&caps[1], &caps[2]))
            .unwrap_or((5, 4))
    }
}

fn parse_pair(major: &str, minor: &str) -> Option<(u32, u32)> {
    Some((major.parse().ok()?, minor.parse().ok()?))
}

/// Vendor for a product name or protocol string, if it names a known one.
fn vendor_for(product: &str) -> Option<Vendor> {
    let prod = product.to_lowercase();
    if prod.is_empty() {
        return None;
    }
    if prod.contains("oracle") {
        Some(Vendor::Oracle)
    } else if prod.contains("sqlserver")
        || prod.contains("jsqlconnect")
        || prod.contains("sql server")
    {
        Some(Vendor::SqlServer)
    } else if prod.contains("mariadb") || prod.contains("mysql") {
        Some(Vendor::MySql)
    } else if prod.contains("postgres") {
        Some(Vendor::Postgres)
    } else if prod.contains("db2") || prod.contains("as400") {
        Some(Vendor::Db2)
    } else {
        None
    }
}

/// `jdbc:` protocol prefix of a URL: up to the third `:` or the first
/// `@`, `/` or `\`, whichever comes first.
///
/// ```ignore
/// assert_eq!(jdbc_protocol("jdbc:oracle:thin:@db:1521"), Some("jdbc:oracle:thin:"));
/// assert_eq!(jdbc_protocol("jdbc:postgresql://db/app"), Some("jdbc:postgresql:"));
/// ```
pub fn jdbc_protocol(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("jdbc:")?;
    let mut colons = 1;
    let mut end = "jdbc:".len();

    for (i, c) in rest.char_indices() {
        match c {
            ':' => {
                colons += 1;
                end = "jdbc:".len() + i + 1;
                if colons == 3 {
                    break;
                }
            }
            '@' | '/' | '\\' => break,
            _ => {}
        }
    }
    Some(&url[..end])
}

impl DialectProfile {
    /// Profile for a probed server, with version-specific adjustments.
    pub fn detect(probe: &VendorProbe) -> DialectProfile {
        let vendor = probe.vendor();
        let base = vendor.profile().clone();

        match vendor {
            Vendor::Db2 => {
                let (major, minor) = if probe.product_name.contains("AS") {
                    probe.iseries_version()
                } else {
                    probe.version().unwrap_or((9, 7))
                };
                let platform = Db2Platform::classify(
                    &probe.product_name,
                    &probe.product_version,
                    major,
                    minor,
                );
                debug!(?platform, major, minor, "db2 server");
                db2::versioned(base, platform, major, minor)
            }
            Vendor::Oracle => match probe.version() {
                Some((major, _)) if major <= 8 => {
                    debug!(major, "pre-9 oracle, native joins and DATE timestamps");
                    oracle::legacy(base)
                }
                _ => base,
            },
            _ => base,
        }
    }
}
