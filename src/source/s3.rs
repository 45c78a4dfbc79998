use std::io::{self, Read};

use log::debug;
use reqwest::blocking::Client;
use reqwest::StatusCode;

use super::{PartitionSource, S3Location, SourceConfig};
use crate::error::{Error, Result};

/// Unsigned HTTPS reads from an S3 bucket (or an S3-compatible endpoint).
#[derive(Debug, Clone)]
pub struct S3Source {
    client: Client,
    region: String,
    endpoint: Option<String>,
}

impl S3Source {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| Error::io("build http client", io::Error::other(err)))?;
        Ok(Self {
            client,
            region: config.region.clone(),
            endpoint: config
                .endpoint
                .as_ref()
                .map(|endpoint| endpoint.trim_end_matches('/').to_string()),
        })
    }

    pub fn object_url(&self, location: &S3Location) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{endpoint}/{}/{}", location.bucket, location.key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                location.bucket, self.region, location.key
            ),
        }
    }
}

impl PartitionSource for S3Source {
    fn fetch(&self, path: &str) -> Result<Option<Box<dyn Read>>> {
        let location = S3Location::parse(path)?;
        let url = self.object_url(&location);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| Error::io(format!("GET {url}"), io::Error::other(err)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::io(
                format!("GET {url}"),
                io::Error::other(format!("unexpected status {status}")),
            ));
        }
        Ok(Some(Box::new(response)))
    }

    fn kind(&self) -> &'static str {
        "s3"
    }
}
