//! Device and platform introspection boundary

/// Supplies the platform/model strings attached to submissions.
///
/// The tracker calls `device_model` once and caches the result.
pub trait DeviceInfoProvider: Send + Sync {
    /// Device model string, e.g. a hardware identifier.
    fn device_model(&self) -> String;

    /// Operating system name.
    fn os(&self) -> String;
}

/// Provider backed by the compile-time host target.
#[derive(Debug, Default)]
pub struct HostDeviceInfo;

impl DeviceInfoProvider for HostDeviceInfo {
    fn device_model(&self) -> String {
        format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
    }

    fn os(&self) -> String {
        std::env::consts::OS.to_string()
    }
}
