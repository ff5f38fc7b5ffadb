use crate::error::{Result, SimError};
use rand::Rng;
use std::collections::HashSet;
use std::net::Ipv4Addr;

/// Attempts before an IP draw is considered exhausted. Collisions this
/// deep mean the caller is asking for more customers than the address
/// space can plausibly hold.
const MAX_IP_ATTEMPTS: u32 = 64;

/// The (ip, user, device) triple that makes a customer distinguishable
/// in the output log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub ip: Ipv4Addr,
    pub user_id: String,
    pub device_id: String,
}

/// Allocator for customer identities. One pool is shared per run so the
/// uniqueness of every issued triple holds across all customers.
#[derive(Debug, Default)]
pub struct IdentityPool {
    issued_ips: HashSet<Ipv4Addr>,
    next_serial: u64,
}

impl IdentityPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identity: a fresh random IP (retrying on
    /// collision) plus sequential zero-padded user and device ids.
    pub fn allocate<R: Rng>(&mut self, rng: &mut R) -> Result<Identity> {
        let ip = self.allocate_ip(rng)?;
        let serial = self.next_serial;
        self.next_serial += 1;
        Ok(Identity {
            ip,
            user_id: format!("user_{:08}", serial),
            device_id: format!("device_{:08}", serial),
        })
    }

    pub fn issued(&self) -> usize {
        self.issued_ips.len()
    }

    fn allocate_ip<R: Rng>(&mut self, rng: &mut R) -> Result<Ipv4Addr> {
        for _ in 0..MAX_IP_ATTEMPTS {
            // First octet stays out of multicast and reserved space.
            let ip = Ipv4Addr::new(
                rng.random_range(1..=223),
                rng.random(),
                rng.random(),
                rng.random_range(1..=254),
            );
            if self.issued_ips.insert(ip) {
                return Ok(ip);
            }
        }
        Err(SimError::IdentityExhausted {
            attempts: MAX_IP_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    #[test]
    fn test_ids_are_sequential_and_padded() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = IdentityPool::new();
        let first = pool.allocate(&mut rng).unwrap();
        let second = pool.allocate(&mut rng).unwrap();
        assert_eq!(first.user_id, "user_00000000");
        assert_eq!(first.device_id, "device_00000000");
        assert_eq!(second.user_id, "user_00000001");
    }

    #[test]
    fn test_identities_are_unique() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pool = IdentityPool::new();
        let mut ips = HashSet::new();
        let mut users = HashSet::new();
        for _ in 0..500 {
            let id = pool.allocate(&mut rng).unwrap();
            assert!(ips.insert(id.ip));
            assert!(users.insert(id.user_id));
        }
        assert_eq!(pool.issued(), 500);
    }

    /// RNG that always emits the same word, so every IP draw collides
    /// with the first one.
    struct SameRng;

    impl RngCore for SameRng {
        fn next_u32(&mut self) -> u32 {
            0x0a0a_0a0a
        }

        fn next_u64(&mut self) -> u64 {
            0x0a0a_0a0a_0a0a_0a0a
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0x0a);
        }
    }

    #[test]
    fn test_exhaustion_is_fatal() {
        let mut rng = SameRng;
        let mut pool = IdentityPool::new();
        pool.allocate(&mut rng).unwrap();
        let err = pool.allocate(&mut rng).unwrap_err();
        assert!(matches!(err, SimError::IdentityExhausted { .. }));
    }
}
