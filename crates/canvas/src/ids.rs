//! Reference ids for entities.
//!
//! Ids have the form `{device}-{instance}-{random}`. The device id is
//! handed in by the caller so that one process can host several devices'
//! worth of canvases (and tests can pin it).

use rand::Rng;
use std::fmt;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SEGMENT_LEN: usize = 13;

/// Produces reference ids for newly registered entities.
pub trait IdGenerator {
    fn generate(&self) -> String;
}

/// Identifies the device a canvas runs on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn generate() -> Self {
        Self(random_segment(&mut rand::rng(), SEGMENT_LEN))
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Default id generator: device id, a per-instance id, then 26 random
/// base-36 characters.
#[derive(Clone, Debug)]
pub struct RandomIds {
    device_id: DeviceId,
    instance_id: String,
}

impl RandomIds {
    pub fn new(device_id: DeviceId) -> Self {
        Self {
            device_id,
            instance_id: random_segment(&mut rand::rng(), SEGMENT_LEN),
        }
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }
}

impl IdGenerator for RandomIds {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        format!(
            "{}-{}-{}",
            self.device_id,
            self.instance_id,
            random_segment(&mut rng, SEGMENT_LEN * 2)
        )
    }
}

fn random_segment(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_device_and_instance() {
        let ids = RandomIds::new(DeviceId::from_string("device"));
        let id = ids.generate();
        let parts: Vec<&str> = id.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "device");
        assert_eq!(parts[1], ids.instance_id());
        assert_eq!(parts[2].len(), 26);
        assert!(parts[2].bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn generated_ids_differ() {
        let ids = RandomIds::new(DeviceId::generate());
        assert_ne!(ids.generate(), ids.generate());
    }

    #[test]
    fn instances_on_one_device_differ() {
        let device = DeviceId::generate();
        assert_eq!(device.as_str().len(), 13);
        let a = RandomIds::new(device.clone());
        let b = RandomIds::new(device);
        assert_ne!(a.instance_id(), b.instance_id());
    }
}
