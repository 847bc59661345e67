//! Bind Provider: zone files on local disk, optionally reloaded through `rndc`.

mod error;
mod provider;
mod zonefile;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::reconcile::normalize_nameservers;
use crate::traits::ProviderErrorMapper;
use crate::types::{MxPriorityStyle, ProviderType};

pub(crate) use zonefile::{ZoneFile, ZoneFileError};

/// Zone file extension.
pub(crate) const ZONE_FILE_SUFFIX: &str = ".zone";

/// Bind Provider
pub struct BindProvider {
    pub(crate) zone_dir: PathBuf,
    pub(crate) rndc: Option<String>,
    pub(crate) nameservers: Vec<String>,
    pub(crate) mx_priority: MxPriorityStyle,
}

/// Bind Provider Builder
pub struct BindProviderBuilder {
    zone_dir: PathBuf,
    rndc: Option<String>,
    nameservers: Vec<String>,
    mx_priority: MxPriorityStyle,
}

impl BindProviderBuilder {
    fn new(zone_dir: impl Into<PathBuf>) -> Self {
        Self {
            zone_dir: zone_dir.into(),
            rndc: None,
            nameservers: Vec::new(),
            mx_priority: ProviderType::Bind.default_mx_priority(),
        }
    }

    /// `rndc` binary to run `rndc reload <zone>` after each write.
    pub fn rndc(mut self, rndc: Option<String>) -> Self {
        self.rndc = rndc;
        self
    }

    pub fn nameservers(mut self, nameservers: Vec<String>) -> Self {
        self.nameservers = nameservers;
        self
    }

    pub fn mx_priority(mut self, style: MxPriorityStyle) -> Self {
        self.mx_priority = style;
        self
    }

    pub fn build(self) -> Result<BindProvider> {
        Ok(BindProvider {
            zone_dir: self.zone_dir,
            rndc: self.rndc,
            nameservers: normalize_nameservers(&self.nameservers),
            mx_priority: self.mx_priority,
        })
    }
}

impl BindProvider {
    pub fn builder(zone_dir: impl Into<PathBuf>) -> BindProviderBuilder {
        BindProviderBuilder::new(zone_dir)
    }

    pub fn zone_dir(&self) -> &Path {
        &self.zone_dir
    }

    /// `<zone_dir>/<domain>.zone`, refusing names that would escape the directory.
    pub(crate) fn zone_path(&self, domain: &str) -> Result<PathBuf> {
        if domain.contains(['/', '\\']) || domain.starts_with('.') {
            return Err(crate::error::ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "domain".to_string(),
                detail: format!("'{domain}' is not a valid zone name"),
            });
        }
        Ok(self.zone_dir.join(format!("{domain}{ZONE_FILE_SUFFIX}")))
    }
}
