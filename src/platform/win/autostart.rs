//! "Start with Windows" as a marked shortcut in the user's Startup folder.
//!
//! The shortcut description doubles as an ownership marker, so only
//! shortcuts created here are ever removed. The enabled state is read back
//! from the folder; it is not part of the persisted config.

use std::{
    ffi::OsStr,
    os::windows::ffi::OsStrExt,
    path::{Path, PathBuf},
};

use windows::{
    Win32::{
        System::Com::{
            CLSCTX_INPROC_SERVER, COINIT_APARTMENTTHREADED, CoCreateInstance, CoInitializeEx,
            CoTaskMemFree, CoUninitialize, IPersistFile, STGM, STGM_READ,
        },
        UI::Shell::{
            FOLDERID_Startup, IShellLinkW, KF_FLAG_DEFAULT, SHGetKnownFolderPath, ShellLink,
        },
    },
    core::{Interface, PCWSTR},
};

const SHORTCUT_MARKER: &str = "kSwitcher Autostart Shortcut";
const SHORTCUT_FILE_NAME: &str = "kSwitcher.lnk";

fn other_error(message: String) -> windows::core::Error {
    windows::core::Error::new(
        windows::core::HRESULT(0x8000_4005_u32.cast_signed()),
        message,
    )
}

pub fn is_enabled() -> windows::core::Result<bool> {
    let _com = ComApartment::init()?;
    let startup_dir = startup_folder_path()?;

    for path in shortcut_paths(&startup_dir)? {
        if shortcut_has_marker(&path)? {
            return Ok(true);
        }
    }

    Ok(false)
}

pub fn apply_startup_shortcut(enabled: bool) -> windows::core::Result<()> {
    let _com = ComApartment::init()?;
    let startup_dir = startup_folder_path()?;

    for path in shortcut_paths(&startup_dir)? {
        if shortcut_has_marker(&path)? {
            let _ = std::fs::remove_file(&path);
        }
    }

    if !enabled {
        return Ok(());
    }

    let exe = std::env::current_exe().map_err(|e| other_error(e.to_string()))?;
    let exe = std::fs::canonicalize(&exe).unwrap_or(exe);

    create_shortcut(&startup_dir.join(SHORTCUT_FILE_NAME), &exe)
}

struct ComApartment;

impl ComApartment {
    fn init() -> windows::core::Result<Self> {
        unsafe {
            CoInitializeEx(None, COINIT_APARTMENTTHREADED).ok()?;
        }
        Ok(Self)
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

fn startup_folder_path() -> windows::core::Result<PathBuf> {
    let raw = unsafe { SHGetKnownFolderPath(&FOLDERID_Startup, KF_FLAG_DEFAULT, None)? };
    let path = unsafe { raw.to_string() };

    unsafe {
        CoTaskMemFree(Some(raw.0 as _));
    }

    path.map(PathBuf::from)
        .map_err(|e| other_error(format!("Startup folder path is not UTF-16: {e}")))
}

fn shortcut_paths(dir: &Path) -> windows::core::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| other_error(format!("Failed to read startup dir: {e}")))?;

    Ok(entries
        .filter_map(Result::ok)
        .map(|ent| ent.path())
        .filter(|path| is_lnk(path))
        .collect())
}

fn is_lnk(p: &Path) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("lnk"))
}

fn shortcut_has_marker(path: &Path) -> windows::core::Result<bool> {
    let shell_link: IShellLinkW =
        unsafe { CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)? };
    let persist: IPersistFile = shell_link.cast()?;

    let wide = to_wide(path.as_os_str());
    unsafe { persist.Load(PCWSTR(wide.as_ptr()), STGM(STGM_READ.0))? };

    let mut buf = [0u16; 512];
    unsafe {
        shell_link.GetDescription(&mut buf)?;
    }

    Ok(wide_to_string(&buf) == SHORTCUT_MARKER)
}

fn create_shortcut(link_path: &Path, exe_path: &Path) -> windows::core::Result<()> {
    let shell_link: IShellLinkW =
        unsafe { CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)? };

    let exe_w = to_wide(exe_path.as_os_str());
    unsafe { shell_link.SetPath(PCWSTR(exe_w.as_ptr()))? };

    if let Some(dir) = exe_path.parent() {
        let dir_w = to_wide(dir.as_os_str());
        unsafe { shell_link.SetWorkingDirectory(PCWSTR(dir_w.as_ptr()))? };
    }

    let desc_w = to_wide(OsStr::new(SHORTCUT_MARKER));
    unsafe { shell_link.SetDescription(PCWSTR(desc_w.as_ptr()))? };

    let persist: IPersistFile = shell_link.cast()?;
    let link_w = to_wide(link_path.as_os_str());
    unsafe { persist.Save(PCWSTR(link_w.as_ptr()), true)? };

    tracing::debug!(msg = "autostart_shortcut_created");
    Ok(())
}

fn to_wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

fn wide_to_string(buf: &[u16]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..end])
}
