//! # soffice-auto
//!
//! Locate LibreOffice's `soffice` binary on the host and install LibreOffice
//! through the platform's package manager or installer when it is missing.
//!
//! ## How it works
//!
//! On a call to [`ensure_soffice`]:
//!
//! 1. Checks `SOFFICE_PATH`, then the platform's usual locations
//!    (`Program Files` on Windows, `PATH` elsewhere, the app bundle on macOS).
//! 2. If absent and the [`InstallPolicy`] allows it, runs the platform
//!    [`InstallPlan`]: `apt-get` on Linux, the MSI installer on Windows, the
//!    DMG on macOS. Installers are downloaded to [`installer_cache_dir`] and
//!    removed afterwards.
//! 3. Looks again. A tool that is still missing is an error.
//!
//! The resolved path is memoised for the rest of the process, and concurrent
//! callers share one install.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use soffice_auto::{ensure_soffice, find_soffice, InstallPolicy};
//!
//! // Only look, never install.
//! if let Some(path) = find_soffice() {
//!     println!("soffice at {}", path.display());
//! }
//!
//! // Look, installing LibreOffice when it is missing.
//! let path = ensure_soffice(InstallPolicy::Auto, Some(&|downloaded, total| {
//!     if let Some(t) = total {
//!         eprint!("\rDownloading LibreOffice: {}/{} bytes", downloaded, t);
//!     }
//! })).expect("LibreOffice unavailable");
//! ```
//!
//! ## Environment variable overrides
//!
//! - `SOFFICE_PATH` — path to an existing `soffice` binary; skips lookup.
//! - `SOFFICE_AUTO_CACHE_DIR` — where installers are downloaded.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Mutex, OnceLock, PoisonError};

use thiserror::Error;
use tracing::{debug, info, warn};

// ── Public constants ─────────────────────────────────────────────────────────

/// LibreOffice release installed on Windows and macOS.
pub const LIBREOFFICE_VERSION: &str = "7.6.2";

/// Document Foundation download mirror.
const BASE_URL: &str = "https://download.documentfoundation.org/libreoffice/stable";

/// Placeholder in an [`InstallPlan`] step, replaced with the installer path.
pub const INSTALLER_PLACEHOLDER: &str = "{installer}";

const WINDOWS_CANDIDATES: [&str; 2] = [
    r"C:\Program Files\LibreOffice\program\soffice.exe",
    r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
];

const MACOS_BUNDLE_BINARY: &str = "/Applications/LibreOffice.app/Contents/MacOS/soffice";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by soffice-auto operations.
#[derive(Error, Debug)]
pub enum SofficeAutoError {
    /// The current OS has no install recipe.
    #[error("Unsupported OS: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// LibreOffice is still missing after the install attempt.
    #[error("LibreOffice installation failed or not found.")]
    NotFound,

    /// LibreOffice is missing and installing it is not allowed.
    #[error("LibreOffice not found and automatic installation is disabled")]
    InstallDisabled,

    /// Could not create the installer download directory.
    #[error("Cache directory error: {0}")]
    CacheDir(#[source] std::io::Error),

    /// Installer download failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// An install command could not be started or exited unsuccessfully.
    #[error("Install step `{step}` failed: {detail}")]
    InstallStep { step: String, detail: String },
}

// ── Platform & policy ────────────────────────────────────────────────────────

/// Host operating systems with an install recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
}

/// Whether a missing LibreOffice may be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallPolicy {
    /// Install LibreOffice when it cannot be found. (default)
    #[default]
    Auto,
    /// Fail with [`SofficeAutoError::InstallDisabled`] instead.
    Never,
}

/// Detect the host platform.
pub fn detect_platform() -> Result<Platform, SofficeAutoError> {
    match std::env::consts::OS {
        "windows" => Ok(Platform::Windows),
        "linux" => Ok(Platform::Linux),
        "macos" => Ok(Platform::MacOs),
        os => Err(SofficeAutoError::UnsupportedPlatform {
            os: os.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }),
    }
}

// ── Install plan ─────────────────────────────────────────────────────────────

/// An installer that must be downloaded before the install steps run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerDownload {
    pub url: String,
    /// File name the installer is saved under in [`installer_cache_dir`].
    pub file_name: &'static str,
}

/// Everything needed to install LibreOffice on one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub download: Option<InstallerDownload>,
    /// Commands run in order; each must exit successfully.
    pub steps: Vec<Vec<String>>,
}

impl InstallPlan {
    /// Steps with [`INSTALLER_PLACEHOLDER`] replaced by `installer`.
    pub fn resolved_steps(&self, installer: Option<&Path>) -> Vec<Vec<String>> {
        let installer = installer.map(|p| p.to_string_lossy().into_owned());
        self.steps
            .iter()
            .map(|argv| {
                argv.iter()
                    .map(|arg| match (&installer, arg.as_str()) {
                        (Some(path), INSTALLER_PLACEHOLDER) => path.clone(),
                        _ => arg.clone(),
                    })
                    .collect()
            })
            .collect()
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn privileged(use_sudo: bool, parts: &[&str]) -> Vec<String> {
    let mut cmd = Vec::with_capacity(parts.len() + 1);
    if use_sudo {
        cmd.push("sudo".to_string());
    }
    cmd.extend(argv(parts));
    cmd
}

/// Build the install recipe for `platform`.
///
/// `use_sudo` prefixes privileged steps with `sudo`. It has no effect on
/// Windows, where `msiexec` elevates by itself.
pub fn install_plan(platform: Platform, use_sudo: bool) -> InstallPlan {
    match platform {
        Platform::Windows => InstallPlan {
            download: Some(InstallerDownload {
                url: format!(
                    "{BASE_URL}/{v}/win/x86_64/LibreOffice_{v}_Win_x64.msi",
                    v = LIBREOFFICE_VERSION
                ),
                file_name: "LibreOffice_Installer.msi",
            }),
            steps: vec![argv(&[
                "msiexec",
                "/i",
                INSTALLER_PLACEHOLDER,
                "/quiet",
                "/norestart",
            ])],
        },
        Platform::Linux => InstallPlan {
            download: None,
            steps: vec![
                privileged(use_sudo, &["apt-get", "update"]),
                privileged(use_sudo, &["apt-get", "install", "-y", "libreoffice"]),
            ],
        },
        Platform::MacOs => InstallPlan {
            download: Some(InstallerDownload {
                url: format!(
                    "{BASE_URL}/{v}/mac/x86_64/LibreOffice_{v}_MacOS_x86-64.dmg",
                    v = LIBREOFFICE_VERSION
                ),
                file_name: "LibreOffice_Installer.dmg",
            }),
            steps: vec![
                argv(&["hdiutil", "attach", INSTALLER_PLACEHOLDER]),
                privileged(
                    use_sudo,
                    &[
                        "cp",
                        "-R",
                        "/Volumes/LibreOffice/LibreOffice.app",
                        "/Applications",
                    ],
                ),
                argv(&["hdiutil", "detach", "/Volumes/LibreOffice"]),
            ],
        },
    }
}

// ── Cache directory resolution ───────────────────────────────────────────────

/// Directory installers are downloaded to.
///
/// Default locations:
/// - **macOS**: `~/Library/Caches/office2pdf/installers/`
/// - **Linux**: `~/.cache/office2pdf/installers/`
/// - **Windows**: `%LOCALAPPDATA%\office2pdf\installers\`
///
/// Override by setting `SOFFICE_AUTO_CACHE_DIR`.
pub fn installer_cache_dir() -> PathBuf {
    installer_cache_dir_from(std::env::var_os("SOFFICE_AUTO_CACHE_DIR").map(PathBuf::from))
}

fn installer_cache_dir_from(override_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }

    let base = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir);

    base.join("office2pdf").join("installers")
}

// ── Lookup ───────────────────────────────────────────────────────────────────

/// Find an installed `soffice` without installing anything.
///
/// Honours `SOFFICE_PATH` when it names an existing file.
pub fn find_soffice() -> Option<PathBuf> {
    let platform = detect_platform().ok();
    find_soffice_in(platform, std::env::var_os("SOFFICE_PATH").map(PathBuf::from))
}

fn find_soffice_in(platform: Option<Platform>, env_override: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = env_override {
        if path.is_file() {
            return Some(path);
        }
        warn!(
            "SOFFICE_PATH '{}' does not exist; falling back to lookup",
            path.display()
        );
    }

    if platform == Some(Platform::Windows) {
        return WINDOWS_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists());
    }

    if let Some(path) = which::which("libreoffice")
        .or_else(|_| which::which("soffice"))
        .ok()
    {
        return Some(path);
    }

    if platform == Some(Platform::MacOs) {
        let bundle = PathBuf::from(MACOS_BUNDLE_BINARY);
        if bundle.exists() {
            return Some(bundle);
        }
    }

    None
}

// ── Resolve ──────────────────────────────────────────────────────────────────

static RESOLVER: Resolver = Resolver::new();

/// Memoised find-or-install. Installs are serialised through `install_lock`.
struct Resolver {
    resolved: OnceLock<PathBuf>,
    install_lock: Mutex<()>,
}

impl Resolver {
    const fn new() -> Self {
        Self {
            resolved: OnceLock::new(),
            install_lock: Mutex::new(()),
        }
    }

    fn cached(&self) -> Option<PathBuf> {
        self.resolved.get().filter(|p| p.exists()).cloned()
    }

    fn ensure(
        &self,
        policy: InstallPolicy,
        find: &dyn Fn() -> Option<PathBuf>,
        install: &dyn Fn() -> Result<(), SofficeAutoError>,
    ) -> Result<PathBuf, SofficeAutoError> {
        if let Some(path) = self.cached() {
            return Ok(path);
        }

        // Poisoned only if an earlier install panicked; the lookup re-checks.
        let _guard = self
            .install_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished an install while we waited.
        if let Some(path) = self.cached() {
            return Ok(path);
        }

        let path = resolve_or_install(policy, find, install)?;
        let _ = self.resolved.set(path.clone());
        Ok(path)
    }
}

/// Returns the `soffice` path, installing LibreOffice first if necessary.
///
/// `on_progress` receives `(bytes_downloaded, total_size_option)` while an
/// installer downloads. Pass `None` to suppress progress callbacks.
///
/// Concurrent callers wait for a single install instead of starting their own.
/// Blocks for the whole install; call it from `spawn_blocking` in async code.
pub fn ensure_soffice(
    policy: InstallPolicy,
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<PathBuf, SofficeAutoError> {
    RESOLVER.ensure(policy, &find_soffice, &|| install_libreoffice(on_progress))
}

fn resolve_or_install(
    policy: InstallPolicy,
    find: &dyn Fn() -> Option<PathBuf>,
    install: &dyn Fn() -> Result<(), SofficeAutoError>,
) -> Result<PathBuf, SofficeAutoError> {
    if let Some(path) = find() {
        debug!("Found soffice at {}", path.display());
        return Ok(path);
    }

    if policy == InstallPolicy::Never {
        return Err(SofficeAutoError::InstallDisabled);
    }

    info!("LibreOffice not found; installing");
    install()?;

    find().ok_or(SofficeAutoError::NotFound)
}

// ── Install ──────────────────────────────────────────────────────────────────

/// Install LibreOffice with the host platform's [`InstallPlan`].
///
/// Not serialised on its own; [`ensure_soffice`] is the entry point for
/// concurrent callers.
pub fn install_libreoffice(
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<(), SofficeAutoError> {
    let platform = detect_platform()?;
    let use_sudo = platform != Platform::Windows && which::which("sudo").is_ok();
    let plan = install_plan(platform, use_sudo);

    let installer = match &plan.download {
        Some(download) => {
            let dir = installer_cache_dir();
            std::fs::create_dir_all(&dir).map_err(SofficeAutoError::CacheDir)?;
            let dest = dir.join(download.file_name);
            if let Err(e) = download_to_file(&download.url, &dest, on_progress) {
                remove_installer(&dest);
                return Err(e);
            }
            Some(dest)
        }
        None => None,
    };

    run_plan(&plan, installer.as_deref())?;
    info!("LibreOffice installed");
    Ok(())
}

/// Run every step of `plan`, then delete `installer` whether or not the
/// steps succeeded.
fn run_plan(plan: &InstallPlan, installer: Option<&Path>) -> Result<(), SofficeAutoError> {
    let result = plan
        .resolved_steps(installer)
        .iter()
        .try_for_each(|step| run_step(step));

    if let Some(path) = installer {
        remove_installer(path);
    }
    result
}

fn remove_installer(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Could not remove installer '{}': {}", path.display(), e);
        }
    }
}

fn run_step(step: &[String]) -> Result<(), SofficeAutoError> {
    let cmdline = step.join(" ");
    let (program, args) = step.split_first().ok_or_else(|| SofficeAutoError::InstallStep {
        step: cmdline.clone(),
        detail: "empty command".into(),
    })?;

    info!("Running: {}", cmdline);
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| SofficeAutoError::InstallStep {
            step: cmdline.clone(),
            detail: e.to_string(),
        })?;

    if !status.success() {
        return Err(SofficeAutoError::InstallStep {
            step: cmdline,
            detail: format!("exited with {status}"),
        });
    }
    Ok(())
}

/// Streams a URL into `dest`, calling `on_progress` every 64 KiB.
fn download_to_file(
    url: &str,
    dest: &Path,
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<(), SofficeAutoError> {
    info!("Downloading {}", url);

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("soffice-auto/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(None::<std::time::Duration>)
        .build()
        .map_err(|e| SofficeAutoError::Download(e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| SofficeAutoError::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(SofficeAutoError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length();
    let mut file = std::fs::File::create(dest).map_err(SofficeAutoError::CacheDir)?;
    let mut chunk = vec![0u8; 64 * 1024];
    let mut downloaded: u64 = 0;

    loop {
        match response.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                file.write_all(&chunk[..n])
                    .map_err(|e| SofficeAutoError::Download(format!("Write error: {e}")))?;
                downloaded += n as u64;
                if let Some(cb) = on_progress {
                    cb(downloaded, total);
                }
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(SofficeAutoError::Download(format!("Read error: {e}")));
            }
        }
    }

    file.flush()
        .map_err(|e| SofficeAutoError::Download(format!("Write error: {e}")))?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn detect_platform_is_supported() {
        detect_platform().expect("current platform should be supported");
    }

    #[test]
    fn linux_plan_uses_apt_with_sudo() {
        let plan = install_plan(Platform::Linux, true);
        assert!(plan.download.is_none());
        assert_eq!(
            plan.steps,
            vec![
                argv(&["sudo", "apt-get", "update"]),
                argv(&["sudo", "apt-get", "install", "-y", "libreoffice"]),
            ]
        );
    }

    #[test]
    fn linux_plan_without_sudo() {
        let plan = install_plan(Platform::Linux, false);
        assert_eq!(plan.steps[0], argv(&["apt-get", "update"]));
        assert_eq!(plan.steps[1][0], "apt-get");
    }

    #[test]
    fn windows_plan_downloads_msi() {
        let plan = install_plan(Platform::Windows, true);
        let download = plan.download.as_ref().unwrap();
        assert!(download.url.ends_with("LibreOffice_7.6.2_Win_x64.msi"));
        assert!(download.url.contains("/stable/7.6.2/win/x86_64/"));
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0][0], "msiexec");
        assert!(!plan.steps[0].iter().any(|a| a == "sudo"));
    }

    #[test]
    fn macos_plan_attaches_copies_detaches() {
        let plan = install_plan(Platform::MacOs, true);
        assert!(plan
            .download
            .as_ref()
            .unwrap()
            .url
            .ends_with("LibreOffice_7.6.2_MacOS_x86-64.dmg"));
        let programs: Vec<&str> = plan.steps.iter().map(|s| s[0].as_str()).collect();
        assert_eq!(programs, vec!["hdiutil", "sudo", "hdiutil"]);
        assert_eq!(plan.steps[0][1], "attach");
        assert_eq!(plan.steps[2][1], "detach");
    }

    #[test]
    fn resolved_steps_substitute_installer_path() {
        let plan = install_plan(Platform::Windows, false);
        let steps = plan.resolved_steps(Some(Path::new("/tmp/lo.msi")));
        assert_eq!(steps[0], argv(&["msiexec", "/i", "/tmp/lo.msi", "/quiet", "/norestart"]));
    }

    #[test]
    fn resolved_steps_without_installer_are_unchanged() {
        let plan = install_plan(Platform::Linux, true);
        assert_eq!(plan.resolved_steps(None), plan.steps);
    }

    #[test]
    fn cache_dir_override() {
        let d = installer_cache_dir_from(Some(PathBuf::from("/tmp/office2pdf_override")));
        assert_eq!(d, PathBuf::from("/tmp/office2pdf_override"));
    }

    #[test]
    fn cache_dir_default_is_deterministic() {
        let d1 = installer_cache_dir_from(None);
        let d2 = installer_cache_dir_from(None);
        assert_eq!(d1, d2);
        assert!(d1.ends_with("office2pdf/installers"));
    }

    #[test]
    fn env_override_wins_when_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("soffice");
        std::fs::write(&fake, b"").unwrap();
        let found = find_soffice_in(Some(Platform::Linux), Some(fake.clone()));
        assert_eq!(found, Some(fake));
    }

    #[test]
    fn missing_env_override_is_ignored() {
        let missing = PathBuf::from("/definitely/not/here/soffice");
        let found = find_soffice_in(Some(Platform::Linux), Some(missing.clone()));
        assert_ne!(found, Some(missing));
    }

    #[test]
    fn run_step_rejects_empty_command() {
        let err = run_step(&[]).unwrap_err();
        assert!(matches!(err, SofficeAutoError::InstallStep { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn run_step_reports_non_zero_exit() {
        let err = run_step(&argv(&["false"])).unwrap_err();
        match err {
            SofficeAutoError::InstallStep { step, detail } => {
                assert_eq!(step, "false");
                assert!(detail.starts_with("exited with"), "got: {detail}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn run_step_reports_missing_program() {
        let err = run_step(&argv(&["/definitely/not/here/apt-get", "update"])).unwrap_err();
        assert!(matches!(err, SofficeAutoError::InstallStep { .. }));
    }

    // ── run_plan ─────────────────────────────────────────────────────────────

    fn plan_with(steps: Vec<Vec<String>>) -> InstallPlan {
        InstallPlan {
            download: None,
            steps,
        }
    }

    #[cfg(unix)]
    #[test]
    fn run_plan_removes_installer_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let installer = dir.path().join("LibreOffice_Installer.msi");
        std::fs::write(&installer, b"installer").unwrap();

        let plan = plan_with(vec![argv(&["test", "-f", INSTALLER_PLACEHOLDER])]);
        run_plan(&plan, Some(installer.as_path())).unwrap();
        assert!(!installer.exists());
    }

    #[cfg(unix)]
    #[test]
    fn run_plan_removes_installer_after_failure_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let installer = dir.path().join("LibreOffice_Installer.dmg");
        std::fs::write(&installer, b"installer").unwrap();
        let marker = dir.path().join("ran");
        let marker_arg = marker.to_string_lossy().into_owned();

        let plan = plan_with(vec![argv(&["false"]), argv(&["touch", marker_arg.as_str()])]);
        let err = run_plan(&plan, Some(installer.as_path())).unwrap_err();

        assert!(matches!(err, SofficeAutoError::InstallStep { .. }));
        assert!(!installer.exists());
        assert!(!marker.exists(), "steps after a failure must not run");
    }

    // ── Resolver ─────────────────────────────────────────────────────────────

    fn never_install() -> Result<(), SofficeAutoError> {
        panic!("install must not run")
    }

    #[test]
    fn found_tool_skips_install() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("soffice");
        std::fs::write(&tool, b"").unwrap();

        let resolver = Resolver::new();
        let found = resolver
            .ensure(InstallPolicy::Auto, &|| Some(tool.clone()), &never_install)
            .unwrap();
        assert_eq!(found, tool);
    }

    #[test]
    fn never_policy_without_tool_is_install_disabled() {
        let resolver = Resolver::new();
        let err = resolver
            .ensure(InstallPolicy::Never, &|| None, &never_install)
            .unwrap_err();
        assert!(matches!(err, SofficeAutoError::InstallDisabled));
    }

    #[test]
    fn tool_still_missing_after_install_is_not_found() {
        let installs = AtomicUsize::new(0);
        let resolver = Resolver::new();
        let err = resolver
            .ensure(InstallPolicy::Auto, &|| None, &|| {
                installs.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, SofficeAutoError::NotFound));
        assert_eq!(installs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn install_failure_is_returned() {
        let resolver = Resolver::new();
        let err = resolver
            .ensure(InstallPolicy::Auto, &|| None, &|| {
                Err(SofficeAutoError::InstallStep {
                    step: "apt-get update".into(),
                    detail: "exited with exit status: 100".into(),
                })
            })
            .unwrap_err();
        assert!(matches!(err, SofficeAutoError::InstallStep { .. }));
        // Nothing was memoised; a later call looks again.
        assert!(resolver.cached().is_none());
    }

    #[test]
    fn concurrent_callers_share_one_install() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("soffice");
        let installs = AtomicUsize::new(0);
        let resolver = Resolver::new();

        let find = || tool.exists().then(|| tool.clone());
        let install = || {
            installs.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(100));
            std::fs::write(&tool, b"").map_err(SofficeAutoError::CacheDir)
        };

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| resolver.ensure(InstallPolicy::Auto, &find, &install)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(installs.load(Ordering::SeqCst), 1);
        for result in results {
            assert_eq!(result.unwrap(), tool);
        }
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            SofficeAutoError::NotFound.to_string(),
            "LibreOffice installation failed or not found."
        );
        let e = SofficeAutoError::UnsupportedPlatform {
            os: "freebsd".into(),
            arch: "x86_64".into(),
        };
        assert!(e.to_string().contains("Unsupported OS: freebsd"));
    }
}
