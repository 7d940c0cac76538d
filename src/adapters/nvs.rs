//! NVS-backed emulated EEPROM (ESP-IDF only).
//!
//! Implements [`NvMemoryPort`] by keeping the whole EEPROM image in one NVS
//! blob. `open` loads the blob (an absent blob reads as erased `0xFF`),
//! `commit_and_close` writes it back with `nvs_commit()` when dirty.
//!
//! The write-back replaces the complete image. NVS commits are atomic per
//! blob, but the record is only as consistent as the image that was
//! committed.

use esp_idf_svc::sys::*;
use log::{info, warn};

use crate::app::ports::NvMemoryPort;
use crate::error::MediumError;

use super::eeprom::ERASED;

const NAMESPACE: &[u8] = b"plug\0";
const KEY: &[u8] = b"eeprom\0";

pub struct NvsEeprom {
    capacity: usize,
    image: Option<Vec<u8>>,
    window: usize,
    dirty: bool,
}

impl NvsEeprom {
    /// Initialise NVS flash and create an emulated EEPROM of `capacity` bytes.
    ///
    /// On a full partition or a version mismatch the partition is erased and
    /// re-initialised.
    pub fn new(capacity: usize) -> Result<Self, MediumError> {
        // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
        // single main-task context before any other NVS access.
        let ret = unsafe { nvs_flash_init() };
        if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
            warn!("NvsEeprom: erasing and re-initialising flash partition");
            let ret = unsafe { nvs_flash_erase() };
            if ret != ESP_OK {
                return Err(MediumError::Unavailable(ret));
            }
            let ret = unsafe { nvs_flash_init() };
            if ret != ESP_OK {
                return Err(MediumError::Unavailable(ret));
            }
        } else if ret != ESP_OK {
            return Err(MediumError::Unavailable(ret));
        }
        info!("NvsEeprom: {} bytes on NVS", capacity);

        Ok(Self {
            capacity,
            image: None,
            window: 0,
            dirty: false,
        })
    }

    /// Open the namespace, execute a closure with the handle, then close.
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        // A read-only open of a namespace that was never written yields
        // ESP_ERR_NVS_NOT_FOUND, same as a missing key.
        let ret = unsafe { nvs_open(NAMESPACE.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    fn load_image(&self) -> Result<Vec<u8>, MediumError> {
        let mut image = vec![ERASED; self.capacity];
        let result = Self::with_nvs_handle(false, |handle| {
            let mut size = image.len();
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    KEY.as_ptr() as *const _,
                    image.as_mut_ptr() as *mut _,
                    &mut size,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        });

        match result {
            Ok(()) => Ok(image),
            Err(e) if e == ESP_ERR_NVS_NOT_FOUND => {
                info!("NvsEeprom: no stored image, starting erased");
                Ok(vec![ERASED; self.capacity])
            }
            Err(e) if e == ESP_ERR_NVS_INVALID_LENGTH => {
                warn!("NvsEeprom: stored image size changed, starting erased");
                Ok(vec![ERASED; self.capacity])
            }
            Err(e) => Err(MediumError::Unavailable(e)),
        }
    }

    fn range(&self, offset: usize, width: usize) -> Result<core::ops::Range<usize>, MediumError> {
        let end = offset.checked_add(width).ok_or(MediumError::OutOfBounds)?;
        if end > self.window {
            return Err(MediumError::OutOfBounds);
        }
        Ok(offset..end)
    }
}

impl NvMemoryPort for NvsEeprom {
    fn open(&mut self, size: usize) -> Result<(), MediumError> {
        if self.image.is_some() {
            return Err(MediumError::AlreadyOpen);
        }
        if size > self.capacity {
            return Err(MediumError::OutOfBounds);
        }
        self.image = Some(self.load_image()?);
        self.window = size;
        self.dirty = false;
        Ok(())
    }

    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<(), MediumError> {
        let range = self.range(offset, buf.len())?;
        let image = self.image.as_ref().ok_or(MediumError::NotOpen)?;
        buf.copy_from_slice(&image[range]);
        Ok(())
    }

    fn write_at(&mut self, offset: usize, data: &[u8]) -> Result<(), MediumError> {
        let range = self.range(offset, data.len())?;
        let image = self.image.as_mut().ok_or(MediumError::NotOpen)?;
        if image[range.clone()] != *data {
            image[range].copy_from_slice(data);
            self.dirty = true;
        }
        Ok(())
    }

    fn commit_and_close(&mut self) -> Result<(), MediumError> {
        let image = self.image.take().ok_or(MediumError::NotOpen)?;
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;

        let result = Self::with_nvs_handle(true, |handle| {
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    KEY.as_ptr() as *const _,
                    image.as_ptr() as *const _,
                    image.len(),
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        });
        result.map_err(|e| {
            warn!("NvsEeprom: NVS write error {}", e);
            MediumError::CommitFailed(e)
        })
    }
}
