//! Incremental MD5 digest engine.
//!
//! MD5 is cryptographically broken and is implemented here solely because the
//! `$apr1$` password-hash format is defined in terms of it. Nothing in this
//! module makes MD5 any stronger than it historically is; do not reach for it
//! outside of legacy-format compatibility.
//!
//! The engine is a plain value type: create it, feed it bytes with
//! [`Md5::update`], and either consume it with [`Md5::finalize`] or take a
//! non-destructive snapshot with [`Md5::digest`] / [`Md5::hexdigest`] and keep
//! feeding. Contexts are `Clone`, so two independent streams can fork from a
//! shared prefix.

/// The size of the MD5 digest in bytes (128 bits = 16 bytes).
pub const MD5_DIGEST_SIZE: usize = 16;

/// The internal block size of MD5 in bytes (512 bits = 64 bytes).
pub const MD5_BLOCK_SIZE: usize = 64;

/// Initial state words (A, B, C, D) from RFC 1321.
const INIT_STATE: [u32; 4] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476];

/// The sine table constants: K[i] = floor(2^32 * abs(sin(i+1))) for i=0..63.
static K: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee,
    0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be,
    0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa,
    0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed,
    0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c,
    0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05,
    0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039,
    0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1,
    0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// Per-step left-rotation amounts, grouped by round.
static S: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22,
    5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20,
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23,
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// An MD5 hashing context.
///
/// Cloning yields an independent context with identical state; neither copy
/// observes updates made to the other afterwards.
#[derive(Debug, Clone)]
pub struct Md5 {
    /// Running state words (A, B, C, D).
    state: [u32; 4],
    /// Pending input that has not yet filled a 64-byte block.
    buffer: [u8; MD5_BLOCK_SIZE],
    /// Number of valid bytes in `buffer` (always < 64 between calls).
    buffer_len: usize,
    /// Total message length in bits, modulo 2^64.
    length_bits: u64,
}

impl Md5 {
    /// Creates a fresh MD5 context in the RFC 1321 initial state.
    pub fn new() -> Self {
        Self {
            state: INIT_STATE,
            buffer: [0u8; MD5_BLOCK_SIZE],
            buffer_len: 0,
            length_bits: 0,
        }
    }

    /// Returns this context to its initial state, discarding all input
    /// absorbed so far.
    pub fn reset(&mut self) {
        self.state = INIT_STATE;
        self.buffer = [0u8; MD5_BLOCK_SIZE];
        self.buffer_len = 0;
        self.length_bits = 0;
    }

    /// Absorbs `data` into the running hash.
    ///
    /// May be called any number of times, with chunks of any length
    /// (including empty); `m.update(a); m.update(b)` is equivalent to
    /// `m.update(ab)`.
    pub fn update(&mut self, data: &[u8]) {
        self.length_bits = self.length_bits.wrapping_add((data.len() as u64) << 3);

        let mut input = data;

        // Top up a partially filled buffer first.
        if self.buffer_len > 0 {
            let want = MD5_BLOCK_SIZE - self.buffer_len;
            let take = want.min(input.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&input[..take]);
            self.buffer_len += take;
            input = &input[take..];
            if self.buffer_len < MD5_BLOCK_SIZE {
                return;
            }
            let block = self.buffer;
            self.process_block(&block);
            self.buffer_len = 0;
        }

        // Whole blocks straight from the input.
        let mut chunks = input.chunks_exact(MD5_BLOCK_SIZE);
        for block in &mut chunks {
            // chunks_exact guarantees 64 bytes
            self.process_block(block.try_into().unwrap());
        }

        // Stash the tail.
        let rest = chunks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffer_len = rest.len();
    }

    /// Consumes the context and produces the 16-byte digest.
    ///
    /// Finalization is terminal: the context is gone afterwards, so the
    /// question of what absorbing into a finalized context means does not
    /// arise. Use [`Md5::digest`] to peek without giving up the context.
    pub fn finalize(mut self) -> [u8; MD5_DIGEST_SIZE] {
        let length_le = self.length_bits.to_le_bytes();

        // Padding: a single 0x80 byte, then zeros until 8 bytes remain in the
        // block for the bit-length.
        self.buffer[self.buffer_len] = 0x80;
        self.buffer_len += 1;

        if self.buffer_len > MD5_BLOCK_SIZE - 8 {
            self.buffer[self.buffer_len..].fill(0);
            let block = self.buffer;
            self.process_block(&block);
            self.buffer_len = 0;
        }
        self.buffer[self.buffer_len..MD5_BLOCK_SIZE - 8].fill(0);
        self.buffer[MD5_BLOCK_SIZE - 8..].copy_from_slice(&length_le);

        let block = self.buffer;
        self.process_block(&block);

        let mut output = [0u8; MD5_DIGEST_SIZE];
        for (i, word) in self.state.iter().enumerate() {
            output[4 * i..4 * i + 4].copy_from_slice(&word.to_le_bytes());
        }
        output
    }

    /// Produces the digest of the input absorbed so far, without consuming
    /// the context.
    ///
    /// The context remains usable: further `update` calls continue the same
    /// stream, as if `digest` had never been called.
    pub fn digest(&self) -> [u8; MD5_DIGEST_SIZE] {
        self.clone().finalize()
    }

    /// Like [`Md5::digest`], but renders the digest as a 32-character
    /// lowercase hexadecimal string.
    pub fn hexdigest(&self) -> String {
        hex::encode(self.digest())
    }

    /// Processes one 64-byte block, updating the running state. The block is
    /// read as 16 little-endian 32-bit words.
    fn process_block(&mut self, block: &[u8; MD5_BLOCK_SIZE]) {
        let mut w = [0u32; 16];
        for (i, word) in w.iter_mut().enumerate() {
            *word = u32::from_le_bytes(block[4 * i..4 * i + 4].try_into().unwrap());
        }

        let [mut a, mut b, mut c, mut d] = self.state;

        for i in 0..64 {
            let (f, g) = if i < 16 {
                ((b & c) | (!b & d), i)
            } else if i < 32 {
                ((b & d) | (c & !d), (5 * i + 1) % 16)
            } else if i < 48 {
                (b ^ c ^ d, (3 * i + 5) % 16)
            } else {
                (c ^ (b | !d), (7 * i) % 16)
            };

            let temp = a
                .wrapping_add(f)
                .wrapping_add(w[g])
                .wrapping_add(K[i])
                .rotate_left(S[i])
                .wrapping_add(b);

            a = d;
            d = c;
            c = b;
            b = temp;
        }

        self.state[0] = self.state[0].wrapping_add(a);
        self.state[1] = self.state[1].wrapping_add(b);
        self.state[2] = self.state[2].wrapping_add(c);
        self.state[3] = self.state[3].wrapping_add(d);
    }
}

impl Default for Md5 {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the MD5 digest of `data` in a single shot.
pub fn md5_digest(data: &[u8]) -> [u8; MD5_DIGEST_SIZE] {
    let mut hasher = Md5::new();
    hasher.update(data);
    hasher.finalize()
}

/// Computes the MD5 digest of `data` and returns it as a 32-character
/// lowercase hexadecimal string.
pub fn md5_hex(data: &[u8]) -> String {
    hex::encode(md5_digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Known test vectors from RFC 1321

    #[test]
    fn test_md5_empty() {
        // MD5("") => d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_md5_abc() {
        // MD5("abc") => 900150983cd24fb0d6963f7d28e17f72
        assert_eq!(md5_hex(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_md5_message_digest() {
        // MD5("message digest") => f96b697d7cb7938d525a2f31aaf161d0
        assert_eq!(md5_hex(b"message digest"), "f96b697d7cb7938d525a2f31aaf161d0");
    }

    #[test]
    fn test_md5_foo() {
        assert_eq!(md5_hex(b"foo"), "acbd18db4cc2f85cedef654fccc4a4d8");
    }

    #[test]
    fn test_md5_alphabet() {
        let digest = md5_digest(b"abcdefghijklmnopqrstuvwxyz");
        assert_eq!(hex::encode(digest), "c3fcd3d76192e4007dfb496cca67e13b");
    }

    #[test]
    fn test_update_is_concatenative() {
        // Two updates are equivalent to one concatenated update.
        let mut m = Md5::new();
        m.update(b"foo");
        m.update(b"foo");
        assert_eq!(m.hexdigest(), "fdba98970961edb29f88241b9d99d890");
        assert_eq!(m.hexdigest(), md5_hex(b"foofoo"));
    }

    #[test]
    fn test_update_empty_is_noop() {
        let mut m = Md5::new();
        m.update(b"");
        assert_eq!(m.hexdigest(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_update_spanning_blocks() {
        // Feed input in awkward chunk sizes straddling the 64-byte block
        // boundary and compare against a one-shot digest.
        let data: Vec<u8> = (0u8..=255).collect();
        let mut m = Md5::new();
        m.update(&data[..63]);
        m.update(&data[63..65]);
        m.update(&data[65..200]);
        m.update(&data[200..]);
        assert_eq!(m.digest(), md5_digest(&data));
    }

    #[test]
    fn test_digest_does_not_consume() {
        let mut m = Md5::new();
        m.update(b"foo");
        assert_eq!(m.hexdigest(), "acbd18db4cc2f85cedef654fccc4a4d8");
        // Still usable; the stream continues where it left off.
        m.update(b"foo");
        assert_eq!(m.hexdigest(), "fdba98970961edb29f88241b9d99d890");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut m1 = Md5::new();
        m1.update(b"foo");
        let mut m2 = m1.clone();
        assert_eq!(m1.digest(), m2.digest());

        m2.update(b"foo");
        assert_eq!(m1.hexdigest(), "acbd18db4cc2f85cedef654fccc4a4d8");
        assert_eq!(m2.hexdigest(), "fdba98970961edb29f88241b9d99d890");
    }

    #[test]
    fn test_reset_discards_input() {
        let mut m = Md5::new();
        m.update(b"some stale input");
        m.reset();
        assert_eq!(m.hexdigest(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_million_a() {
        // MD5("a" * 1_000_000) => 7707d6ae4e027c70eea2a935c2296f21
        let mut m = Md5::new();
        let chunk = [b'a'; 1000];
        for _ in 0..1000 {
            m.update(&chunk);
        }
        assert_eq!(m.hexdigest(), "7707d6ae4e027c70eea2a935c2296f21");
    }
}
