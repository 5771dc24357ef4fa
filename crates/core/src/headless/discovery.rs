use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::BackendError;
use crate::hwaddr::HwAddr;
use crate::platform::{ServiceAdvertiser, ServiceKind};

/// Advertiser that tracks registrations without publishing them.
pub struct HeadlessAdvertiser {
    name: String,
    hw_addr: HwAddr,
    services: Mutex<HashMap<ServiceKind, u16>>,
}

impl HeadlessAdvertiser {
    pub fn new(name: &str, hw_addr: &HwAddr) -> Result<Self, BackendError> {
        if name.is_empty() {
            return Err(BackendError::with_code("empty service name", -1));
        }
        Ok(Self {
            name: name.to_string(),
            hw_addr: *hw_addr,
            services: Mutex::new(HashMap::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Port a service is currently registered on.
    pub fn registered_port(&self, kind: ServiceKind) -> Option<u16> {
        self.services.lock().get(&kind).copied()
    }

    /// DNS-SD instance name: `<hex hw addr>@<name>` for RAOP, `<name>` for AirPlay.
    pub fn instance_name(&self, kind: ServiceKind) -> String {
        match kind {
            ServiceKind::Raop => {
                let hex: String = self
                    .hw_addr
                    .as_bytes()
                    .iter()
                    .map(|b| format!("{b:02X}"))
                    .collect();
                format!("{hex}@{}", self.name)
            }
            ServiceKind::AirPlay => self.name.clone(),
        }
    }
}

impl ServiceAdvertiser for HeadlessAdvertiser {
    fn register(&self, kind: ServiceKind, port: u16) {
        self.services.lock().insert(kind, port);
        tracing::info!(
            service = ?kind,
            instance = %self.instance_name(kind),
            port,
            "service registered"
        );
    }

    fn unregister(&self, kind: ServiceKind) {
        if self.services.lock().remove(&kind).is_some() {
            tracing::info!(service = ?kind, "service unregistered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        let err = HeadlessAdvertiser::new("", &HwAddr::FALLBACK).err().unwrap();
        assert_eq!(err.code, Some(-1));
    }

    #[test]
    fn long_names_are_accepted() {
        let name = "x".repeat(100);
        let adv = HeadlessAdvertiser::new(&name, &HwAddr::FALLBACK).unwrap();
        assert_eq!(adv.name(), name);
        assert_eq!(adv.instance_name(ServiceKind::Raop).len(), 12 + 1 + 100);
    }

    #[test]
    fn register_and_unregister() {
        let adv = HeadlessAdvertiser::new("Living Room", &HwAddr::FALLBACK).unwrap();
        adv.register(ServiceKind::Raop, 7000);
        adv.register(ServiceKind::AirPlay, 7001);
        assert_eq!(adv.registered_port(ServiceKind::Raop), Some(7000));
        assert_eq!(adv.registered_port(ServiceKind::AirPlay), Some(7001));

        adv.unregister(ServiceKind::Raop);
        adv.unregister(ServiceKind::Raop);
        assert_eq!(adv.registered_port(ServiceKind::Raop), None);
        assert_eq!(adv.registered_port(ServiceKind::AirPlay), Some(7001));
    }

    #[test]
    fn raop_instance_name_prefixes_hw_addr() {
        let adv = HeadlessAdvertiser::new("Test", &HwAddr::FALLBACK).unwrap();
        assert_eq!(adv.instance_name(ServiceKind::Raop), "485D607CEE22@Test");
        assert_eq!(adv.instance_name(ServiceKind::AirPlay), "Test");
        assert_eq!(adv.name(), "Test");
    }
}
