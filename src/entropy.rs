//! Process-wide sources of non-deterministic values.
//!
//! The `uuid` facet and the `/bytes` endpoint are the only outputs that are
//! not a pure function of the request. Both draw from these collaborators,
//! which are shared across all concurrent requests and hold no request state.

use rand::RngCore;
use uuid::Uuid;

/// Generates identifiers for the `uuid` facet.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random (v4) UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomUuid;

impl IdGenerator for RandomUuid {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Fills buffers for the `/bytes` endpoint.
pub trait ByteSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]);
}

/// Thread-local CSPRNG from `rand`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngBytes;

impl ByteSource for ThreadRngBytes {
    fn fill(&self, buf: &mut [u8]) {
        rand::thread_rng().fill_bytes(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_is_v4_and_fresh() {
        let ids = RandomUuid;
        let a = ids.generate();
        let b = ids.generate();
        assert_ne!(a, b);

        let parsed = Uuid::parse_str(&a).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_thread_rng_fills_whole_buffer() {
        let mut buf = [0u8; 64];
        ThreadRngBytes.fill(&mut buf);
        // 64 zero bytes from a CSPRNG is not a realistic outcome.
        assert!(buf.iter().any(|b| *b != 0));
    }
}
