//! Seeded deterministic random data for judgekit test suites.
//!
//! Every generator in the workspace draws from an explicit
//! [`RandomSource`] owned by the caller. There is no process-wide
//! generator: a test context owns one [`TestRng`], reseeds it before each
//! iteration, and threads it through to whatever needs random bytes
//! (including the padding fill of protected buffers).
//!
//! Identical seeds produce identical sequences on every platform.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod rng;

pub use rng::TestRng;

/// A deterministic stream of 64-bit words.
///
/// This is the only interface the protected-buffer allocator needs from a
/// random generator. Implementations must be reproducible for a fixed seed.
pub trait RandomSource {
    /// Draw the next 64-bit word.
    fn next_u64(&mut self) -> u64;

    /// Draw one byte (the low byte of a full 64-bit draw).
    fn next_byte(&mut self) -> u8 {
        self.next_u64() as u8
    }

    /// Fill `dest` one byte per draw.
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for b in dest {
            *b = self.next_byte();
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u64);

    impl RandomSource for Counter {
        fn next_u64(&mut self) -> u64 {
            self.0 += 1;
            self.0 | 0xABCD_0000_0000_0000
        }
    }

    #[test]
    fn next_byte_truncates_one_draw() {
        let mut c = Counter(0x1FF);
        assert_eq!(c.next_byte(), 0x00);
        assert_eq!(c.0, 0x200);
    }

    #[test]
    fn fill_bytes_consumes_one_draw_per_byte() {
        let mut c = Counter(0);
        let mut buf = [0u8; 5];
        c.fill_bytes(&mut buf);
        assert_eq!(buf, [1, 2, 3, 4, 5]);
        assert_eq!(c.0, 5);
    }

    #[test]
    fn mutable_reference_forwards() {
        fn draw<R: RandomSource>(mut source: R) -> u8 {
            source.next_byte()
        }
        let mut c = Counter(0);
        assert_eq!(draw(&mut c), 1);
        assert_eq!(draw(&mut c), 2);
        assert_eq!(c.0, 2);
    }
}
