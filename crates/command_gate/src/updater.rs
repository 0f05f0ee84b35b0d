//! Background update checks.
//!
//! [`UpdateChecker`] compares the host's version against a remote version
//! string obtained from a [`VersionSource`]. The fetch runs on a tokio task so
//! command handling never waits on the network; the latest result is read
//! synchronously through [`UpdateChecker::has_update`].
//!
//! # Example
//!
//! ```rust
//! use command_gate::error::GateError;
//! use command_gate::updater::{UpdateChecker, UpdateCheckerOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), GateError> {
//! let options = UpdateCheckerOptions::builder()
//!     .plugin_name("MyPlugin")
//!     .current_version("1.2.0")
//!     .resource_id(12345)
//!     .download_url("https://example.org/myplugin")
//!     .build();
//!
//! let checker = UpdateChecker::new(options);
//! let source = || async { Ok::<_, GateError>("1.3.0".to_string()) };
//! assert!(checker.check_now(&source).await?);
//! assert!(checker.has_update());
//! # Ok(())
//! # }
//! ```

use crate::color::{ALTERNATE_COLOR_CHAR, translate_color_codes};
use crate::error::GateError;
use crate::user::User;
use async_trait::async_trait;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Prefix used when none is configured
pub const DEFAULT_PREFIX: &str = "&8[&eRocketUpdater&8]";

/// Legacy Spigot endpoint returning the latest version of `resource_id` as plain text
pub fn spigot_update_url(resource_id: u32) -> String {
    format!(
        "https://api.spigotmc.org/legacy/update.php?resource={}",
        resource_id
    )
}

/// Provider of the latest published version string
///
/// Implemented for any async closure, so tests and hosts can plug in their
/// own HTTP client:
///
/// ```
/// use command_gate::error::GateError;
/// use command_gate::updater::VersionSource;
///
/// fn assert_source<S: VersionSource>(_s: S) {}
/// assert_source(|| async { Ok::<_, GateError>("2.0.0".to_string()) });
/// ```
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Fetch the latest version string
    async fn latest_version(&self) -> Result<String, GateError>;
}

#[async_trait]
impl<F, Fut> VersionSource for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, GateError>> + Send,
{
    async fn latest_version(&self) -> Result<String, GateError> {
        self().await
    }
}

/// Update checker configuration
///
/// Deserializable so hosts can keep it in their own configuration file; a
/// missing `prefix` falls back to [`DEFAULT_PREFIX`].
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCheckerOptions {
    /// Display name used in the update notice
    pub plugin_name: String,
    /// Version currently running
    pub current_version: String,
    /// Remote resource identifier
    #[serde(default)]
    pub resource_id: u32,
    /// Where users download updates (not the API endpoint)
    pub download_url: String,
    /// Prefix of the update notice, may contain `&` colour codes
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl UpdateCheckerOptions {
    /// Create a new builder
    pub fn builder() -> UpdateCheckerOptionsBuilder {
        UpdateCheckerOptionsBuilder::default()
    }
}

/// Builder for [`UpdateCheckerOptions`]
#[derive(Debug, Default)]
pub struct UpdateCheckerOptionsBuilder {
    plugin_name: Option<String>,
    current_version: Option<String>,
    resource_id: Option<u32>,
    download_url: Option<String>,
    prefix: Option<String>,
}

impl UpdateCheckerOptionsBuilder {
    /// Set the display name
    pub fn plugin_name(mut self, name: impl Into<String>) -> Self {
        self.plugin_name = Some(name.into());
        self
    }

    /// Set the running version
    pub fn current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = Some(version.into());
        self
    }

    /// Set the remote resource id
    pub fn resource_id(mut self, id: u32) -> Self {
        self.resource_id = Some(id);
        self
    }

    /// Set the download page
    pub fn download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }

    /// Set the notice prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Build the options
    pub fn build(self) -> UpdateCheckerOptions {
        UpdateCheckerOptions {
            plugin_name: self.plugin_name.unwrap_or_default(),
            current_version: self.current_version.unwrap_or_default(),
            resource_id: self.resource_id.unwrap_or_default(),
            download_url: self.download_url.unwrap_or_default(),
            prefix: self.prefix.unwrap_or_else(default_prefix),
        }
    }
}

/// Whether `remote` should be offered as an update over `local`
///
/// Semantic versions are compared by precedence; anything else counts as an
/// update when the strings differ ignoring ASCII case.
pub fn is_update(local: &str, remote: &str) -> bool {
    match (
        semver::Version::parse(local.trim()),
        semver::Version::parse(remote.trim()),
    ) {
        (Ok(local), Ok(remote)) => remote > local,
        _ => !local.trim().eq_ignore_ascii_case(remote.trim()),
    }
}

/// Polls a [`VersionSource`] and remembers whether an update exists
///
/// Clones share the same result.
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    options: Arc<UpdateCheckerOptions>,
    update_available: Arc<AtomicBool>,
}

impl UpdateChecker {
    /// Create a checker with no result yet
    pub fn new(options: UpdateCheckerOptions) -> Self {
        Self {
            options: Arc::new(options),
            update_available: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The checker's configuration
    pub fn options(&self) -> &UpdateCheckerOptions {
        &self.options
    }

    /// Fetch and compare now, returning the stored result
    ///
    /// Only the first whitespace-separated token of the remote answer is used.
    /// An empty answer leaves the previous result unchanged.
    pub async fn check_now<S>(&self, source: &S) -> Result<bool, GateError>
    where
        S: VersionSource + ?Sized,
    {
        let raw = source.latest_version().await?;

        if let Some(remote) = raw.split_whitespace().next() {
            let available = is_update(&self.options.current_version, remote);
            debug!(
                local = %self.options.current_version,
                remote,
                available,
                "update check complete"
            );
            self.update_available.store(available, Ordering::Release);
        }

        Ok(self.has_update())
    }

    /// Run [`check_now`](Self::check_now) on a background tokio task
    ///
    /// Failures are logged and keep the previous result.
    pub fn spawn_check(&self, source: Arc<dyn VersionSource>) -> JoinHandle<()> {
        let checker = self.clone();
        tokio::spawn(async move {
            if let Err(e) = checker.check_now(source.as_ref()).await {
                info!(error = %e, "Cannot look for updates");
            }
        })
    }

    /// Latest comparison result
    pub fn has_update(&self) -> bool {
        self.update_available.load(Ordering::Acquire)
    }

    /// The colour-translated update notice
    pub fn update_message(&self) -> String {
        translate_color_codes(
            ALTERNATE_COLOR_CHAR,
            &format!(
                "{} &7An update of {} is available. Download it from {}",
                self.options.prefix, self.options.plugin_name, self.options.download_url
            ),
        )
    }

    /// Tell `user` about an available update; sends nothing otherwise
    pub fn send_update_check(&self, user: &dyn User) {
        if self.has_update() {
            user.send_message(&self.update_message());
        }
    }
}
