//! Scoped resource guard and the wizard overlay built on it.

use std::fmt;
use std::io;

use tracing::{info, warn};

/// Something engaged while a scope is active and released when it ends.
pub trait ScopedResource {
    fn engage(&mut self) -> io::Result<()>;
    fn release(&mut self) -> io::Result<()>;
}

/// Holds a [`ScopedResource`] engaged for as long as the guard lives.
///
/// Released exactly once: either by [`release`](Self::release) or on drop,
/// whichever comes first. Drop also covers early returns and unwinding.
pub struct ResourceGuard<R: ScopedResource> {
    resource: Option<R>,
}

impl<R: ScopedResource> ResourceGuard<R> {
    /// Engages `resource` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns the engage error; the resource is not released in that case.
    pub fn acquire(mut resource: R) -> io::Result<Self> {
        resource.engage()?;
        Ok(Self {
            resource: Some(resource),
        })
    }

    pub fn resource(&self) -> &R {
        self.inner()
    }

    pub fn resource_mut(&mut self) -> &mut R {
        match self.resource.as_mut() {
            Some(r) => r,
            None => unreachable!("guard resource taken before drop"),
        }
    }

    /// Releases now and hands the resource back.
    ///
    /// # Errors
    ///
    /// On a release error the resource is dropped with the error.
    pub fn release(mut self) -> io::Result<R> {
        let mut resource = self.take();
        resource.release()?;
        Ok(resource)
    }

    fn inner(&self) -> &R {
        match self.resource.as_ref() {
            Some(r) => r,
            None => unreachable!("guard resource taken before drop"),
        }
    }

    fn take(&mut self) -> R {
        match self.resource.take() {
            Some(r) => r,
            None => unreachable!("guard released twice"),
        }
    }
}

impl<R: ScopedResource> Drop for ResourceGuard<R> {
    fn drop(&mut self) {
        if let Some(mut resource) = self.resource.take() {
            if let Err(e) = resource.release() {
                warn!(error = %e, "failed to release scoped resource");
            }
        }
    }
}

/// Address of the two screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Base,
    Tool,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Base => "/",
            Route::Tool => "/tool",
        }
    }

    /// Anything other than `/tool` resolves to the base page.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/tool" => Route::Tool,
            _ => Route::Base,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Why the overlay closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    CloseButton,
    BackgroundClick,
    Navigation,
}

enum Slot<R: ScopedResource> {
    Closed(R),
    Open(ResourceGuard<R>),
    Broken,
}

/// The wizard overlay: holds `R` engaged while open.
///
/// Dropping an open overlay releases the resource, so leaving the screen by
/// any path restores it.
pub struct Overlay<R: ScopedResource> {
    slot: Slot<R>,
}

impl<R: ScopedResource> Overlay<R> {
    pub fn new(resource: R) -> Self {
        Self {
            slot: Slot::Closed(resource),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.slot, Slot::Open(_))
    }

    pub fn route(&self) -> Route {
        if self.is_open() {
            Route::Tool
        } else {
            Route::Base
        }
    }

    /// The resource, whatever state the overlay is in.
    pub fn resource(&self) -> Option<&R> {
        match &self.slot {
            Slot::Closed(r) => Some(r),
            Slot::Open(g) => Some(g.resource()),
            Slot::Broken => None,
        }
    }

    pub fn resource_mut(&mut self) -> Option<&mut R> {
        match &mut self.slot {
            Slot::Closed(r) => Some(r),
            Slot::Open(g) => Some(g.resource_mut()),
            Slot::Broken => None,
        }
    }

    /// Opens the overlay, engaging the resource.
    ///
    /// Returns `Ok(false)` without touching the resource if already open.
    ///
    /// # Errors
    ///
    /// Returns the engage error; the overlay is unusable afterwards.
    pub fn open(&mut self) -> io::Result<bool> {
        match std::mem::replace(&mut self.slot, Slot::Broken) {
            Slot::Closed(resource) => {
                self.slot = Slot::Open(ResourceGuard::acquire(resource)?);
                info!(route = %Route::Tool, "overlay opened");
                Ok(true)
            }
            other => {
                self.slot = other;
                Ok(false)
            }
        }
    }

    /// Closes the overlay, releasing the resource.
    ///
    /// Returns `Ok(false)` without touching the resource if not open.
    ///
    /// # Errors
    ///
    /// Returns the release error; the overlay is unusable afterwards.
    pub fn close(&mut self, reason: CloseReason) -> io::Result<bool> {
        match std::mem::replace(&mut self.slot, Slot::Broken) {
            Slot::Open(guard) => {
                self.slot = Slot::Closed(guard.release()?);
                info!(?reason, route = %Route::Base, "overlay closed");
                Ok(true)
            }
            other => {
                self.slot = other;
                Ok(false)
            }
        }
    }
}
