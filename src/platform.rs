//! Elevation and environment-change notification.

#[cfg(windows)]
pub use self::windows_impl::{broadcast_env_change, is_admin, restart_as_admin};

/// Quotes one argument for a Windows command line.
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        "\"\"".to_string()
    } else if arg.contains(' ') || arg.contains('"') {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

pub fn command_line<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|a| quote_arg(a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(windows)]
mod windows_impl {
    use std::env;
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;

    use anyhow::{bail, Context, Result};
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{LPARAM, WPARAM};
    use windows::Win32::UI::Shell::{IsUserAnAdmin, ShellExecuteW};
    use windows::Win32::UI::WindowsAndMessaging::{
        SendMessageTimeoutW, HWND_BROADCAST, SMTO_ABORTIFHUNG, SW_SHOW, WM_SETTINGCHANGE,
    };

    use super::command_line;

    pub fn is_admin() -> bool {
        unsafe { IsUserAnAdmin().as_bool() }
    }

    /// Starts this executable again through the UAC prompt with the same arguments.
    pub fn restart_as_admin() -> Result<()> {
        let exe = env::current_exe().context("cannot locate the running executable")?;
        let exe_str = exe.to_string_lossy().to_string();
        let args = command_line(env::args().skip(1));

        let op = to_wide("runas");
        let exe_w = to_wide(&exe_str);
        let args_w = to_wide(&args);

        let result = unsafe {
            ShellExecuteW(
                None,
                PCWSTR(op.as_ptr()),
                PCWSTR(exe_w.as_ptr()),
                if args.is_empty() {
                    PCWSTR::null()
                } else {
                    PCWSTR(args_w.as_ptr())
                },
                PCWSTR::null(),
                SW_SHOW,
            )
        };

        if result.0 as isize <= 32 {
            bail!("ShellExecuteW failed with code {}", result.0 as isize);
        }
        Ok(())
    }

    pub fn broadcast_env_change() {
        let env = to_wide("Environment");
        let mut result = 0usize;
        unsafe {
            let _ = SendMessageTimeoutW(
                HWND_BROADCAST,
                WM_SETTINGCHANGE,
                WPARAM(0),
                LPARAM(env.as_ptr() as isize),
                SMTO_ABORTIFHUNG,
                2000,
                Some(&mut result),
            );
        }
        tracing::debug!("broadcast WM_SETTINGCHANGE");
    }

    fn to_wide(s: &str) -> Vec<u16> {
        OsStr::new(s).encode_wide().chain(Some(0)).collect()
    }
}
