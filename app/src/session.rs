//! 连接会话 - 解析连接参数、打开连接、保证关闭

use log::{debug, warn};
use storage::{ConnectionDescriptor, ObjectStore, S3Storage};
use utils::app_config::AppConfig;

use crate::error::{AppError, Result};
use crate::profiles::{descriptor_from_profile, load_profiles};

/// Connection values supplied on the command line; unset fields fall back to
/// the selected profile or the `[s3]` configuration section.
#[derive(Debug, Clone, Default)]
pub struct ConnectionArgs {
    pub endpoint: Option<String>,
    /// Host used when neither the endpoint nor the profile names one
    pub host: Option<String>,
    pub port: Option<u16>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    /// Saved profile id or name
    pub profile: Option<String>,
}

/// Build the descriptor for this session.
pub async fn resolve_descriptor(
    args: &ConnectionArgs, config: &AppConfig,
) -> Result<ConnectionDescriptor> {
    let region = args.region.clone().unwrap_or_else(|| config.s3.region.clone());

    if let Some(selector) = &args.profile {
        let profiles = load_profiles(&config.profiles).await?;
        let profile = profiles
            .into_iter()
            .find(|p| p.matches(selector))
            .ok_or_else(|| AppError::ProfileNotFound(selector.clone()))?;

        debug!("Using saved profile '{}' ({})", profile.name, profile.id);
        let descriptor = descriptor_from_profile(&profile)?.with_region(region);
        return Ok(fill_host_port(descriptor, args));
    }

    // 显式 --host 优先于配置文件中的默认端点
    let endpoint = match (&args.endpoint, &args.host) {
        (Some(endpoint), _) => Some(endpoint.clone()),
        (None, Some(_)) => None,
        (None, None) => config.s3.endpoint_uri.clone(),
    };
    let descriptor = ConnectionDescriptor::new(
        endpoint.as_deref(),
        args.access_key.clone().unwrap_or_else(|| config.s3.access_key.clone()),
        args.secret_key.clone().unwrap_or_else(|| config.s3.secret_key.clone()),
        args.bucket.clone().unwrap_or_else(|| config.s3.bucket.clone()),
    )?;

    Ok(fill_host_port(descriptor.with_region(region), args))
}

/// 端点未给出主机或端口时，使用 `--host` / `--port`
fn fill_host_port(mut descriptor: ConnectionDescriptor, args: &ConnectionArgs) -> ConnectionDescriptor {
    if descriptor.host().is_none() {
        if let Some(host) = &args.host {
            descriptor = descriptor.with_host(host.clone());
        }
    }
    if descriptor.port().is_none() {
        if let Some(port) = args.port {
            descriptor = descriptor.with_port(port);
        }
    }
    descriptor
}

/// Open an S3 connection for the descriptor.
pub async fn connect(descriptor: &ConnectionDescriptor) -> Result<S3Storage> {
    Ok(S3Storage::connect(descriptor).await?)
}

/// Close `store` whatever `result` holds.
///
/// The operation's own error wins over a failure to close; a close failure
/// after a successful operation is reported.
pub async fn close_after<T>(store: &dyn ObjectStore, result: Result<T>) -> Result<T> {
    let closed = store.close().await;

    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err.into()),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!("Closing bucket '{}' also failed: {}", store.bucket(), close_err);
            Err(err)
        }
    }
}
