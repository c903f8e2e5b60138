use crate::error::Result;
use crate::model::RepoContributorInfo;
use std::time::Duration;

pub const CONTRIBUTORS_PATH: &str = "/repo/contributors";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Receives contributor rosters for upload.
pub trait ContributorSink {
    fn submit(&self, roster: &RepoContributorInfo) -> Result<()>;
}

impl<S: ContributorSink + ?Sized> ContributorSink for &S {
    fn submit(&self, roster: &RepoContributorInfo) -> Result<()> {
        (**self).submit(roster)
    }
}

/// JSON POST to the Code Time API. Non-2xx responses are errors.
#[derive(Debug, Clone)]
pub struct HttpSink {
    api_url: String,
    jwt: Option<String>,
}

impl HttpSink {
    pub fn new(api_url: impl Into<String>, jwt: Option<String>) -> Self {
        Self {
            api_url: api_url.into(),
            jwt,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), CONTRIBUTORS_PATH)
    }
}

impl ContributorSink for HttpSink {
    fn submit(&self, roster: &RepoContributorInfo) -> Result<()> {
        let body = serde_json::to_string(roster)?;
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(TIMEOUT))
            .build()
            .new_agent();
        let mut request = agent
            .post(&self.endpoint())
            .header("Content-Type", "application/json");
        if let Some(jwt) = &self.jwt {
            request = request.header("Authorization", jwt);
        }
        request.send(body)?;
        Ok(())
    }
}
