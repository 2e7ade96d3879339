//! Navigation location seam.
//!
//! The host routing layer owns the real URL. The engine reads the current
//! location and asks for pushes; `HostNavigator` buffers those pushes until
//! the host collects them.

use crate::types::route::Location;

pub trait Navigator {
    fn location(&self) -> Location;
    fn push(&mut self, full_path: &str);
}

#[derive(Debug, Clone, Default)]
pub struct HostNavigator {
    location: Location,
    pending: Vec<String>,
}

impl HostNavigator {
    pub fn new(initial: &str) -> Self {
        Self {
            location: Location::parse(initial),
            pending: Vec::new(),
        }
    }

    /// Records a location change reported by the host.
    pub fn set_location(&mut self, full_path: &str) {
        self.location = Location::parse(full_path);
    }

    /// Pushes requested since the last call, oldest first.
    pub fn drain_pushes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_pushes(&self) -> &[String] {
        &self.pending
    }
}

impl Navigator for HostNavigator {
    fn location(&self) -> Location {
        self.location.clone()
    }

    fn push(&mut self, full_path: &str) {
        self.location = Location::parse(full_path);
        self.pending.push(full_path.to_string());
    }
}
