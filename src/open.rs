//! Hand the finished report to the desktop: default handler first, then a
//! named viewer application.

use std::path::Path;
use std::process::Command;

#[cfg(target_os = "macos")]
pub const DEFAULT_VIEWER: &str = "Microsoft Excel";
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_VIEWER: &str = "libreoffice";

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("failed to launch {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
    },
}

pub trait FileOpener {
    fn open(&self, path: &Path) -> Result<(), OpenError>;
    fn open_with(&self, path: &Path, app: &str) -> Result<(), OpenError>;
}

/// Uses `open` on macOS, `cmd /C start` on Windows and `xdg-open` elsewhere.
#[derive(Debug, Clone, Default)]
pub struct SystemOpener;

impl FileOpener for SystemOpener {
    fn open(&self, path: &Path) -> Result<(), OpenError> {
        let mut cmd = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        } else {
            Command::new("xdg-open")
        };
        cmd.arg(path);
        run(cmd)
    }

    fn open_with(&self, path: &Path, app: &str) -> Result<(), OpenError> {
        let mut cmd = if cfg!(target_os = "macos") {
            let mut c = Command::new("open");
            c.arg("-a").arg(app);
            c
        } else if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", "", app]);
            c
        } else {
            Command::new(app)
        };
        cmd.arg(path);
        run(cmd)
    }
}

fn run(mut cmd: Command) -> Result<(), OpenError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let status = cmd.status().map_err(|source| OpenError::Spawn {
        program: program.clone(),
        source,
    })?;
    if status.success() {
        Ok(())
    } else {
        Err(OpenError::Failed { program, status })
    }
}

/// Try the default handler, then `viewer`. Failures are logged, never fatal.
/// Returns whether either attempt succeeded.
pub fn open_report(opener: &dyn FileOpener, path: &Path, viewer: &str) -> bool {
    let Err(err) = opener.open(path) else {
        return true;
    };
    tracing::warn!(error = %err, "default handler could not open {}", path.display());

    match opener.open_with(path, viewer) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, viewer, "could not open {}", path.display());
            false
        }
    }
}
