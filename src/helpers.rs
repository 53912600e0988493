//! Small Win32 helpers shared by the shell.

use windows::Win32::Foundation::{CloseHandle, ERROR_ALREADY_EXISTS, GetLastError, HANDLE};
use windows::Win32::System::Threading::CreateMutexW;
use windows::core::{Error, HRESULT, Result, w};

/// Retrieve the last OS error as a `windows::core::Error`.
pub fn last_error() -> Error {
    Error::from_hresult(HRESULT::from_win32(unsafe { GetLastError() }.0))
}

/// Holds the named single-instance mutex. Dropping it releases the name.
#[derive(Debug)]
pub struct SingleInstanceGuard(HANDLE);

impl Drop for SingleInstanceGuard {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Acquire the single instance mutex.
///
/// Returns `None` when another instance already owns it.
pub fn single_instance_guard() -> Result<Option<SingleInstanceGuard>> {
    unsafe {
        let h = CreateMutexW(None, false, w!("Local\\kSwitcher_SingleInstance"))?;
        let guard = SingleInstanceGuard(h);

        if GetLastError() == ERROR_ALREADY_EXISTS {
            return Ok(None);
        }

        Ok(Some(guard))
    }
}
