/// Ashtech binary message checksums
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Checksum {
    /// 1 byte: XOR of all payload bytes
    Xor8,
    /// 2 bytes: sum of all big endian 16 bit words, a trailing odd
    /// byte being added as is, modulo 2^16.
    Sum16,
}

impl Checksum {
    /// Identifies the checksum from the number of checksum bytes.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            1 => Some(Self::Xor8),
            2 => Some(Self::Sum16),
            _ => None,
        }
    }

    /// Number of checksum bytes
    pub const fn size(&self) -> usize {
        match self {
            Self::Xor8 => 1,
            Self::Sum16 => 2,
        }
    }

    /// Calculates the checksum of this payload
    pub fn calc(&self, payload: &[u8]) -> u16 {
        match self {
            Self::Xor8 => payload.iter().fold(0u8, |acc, b| acc ^ b) as u16,
            Self::Sum16 => {
                let mut chunks = payload.chunks_exact(2);
                let mut sum = chunks
                    .by_ref()
                    .fold(0u16, |acc, w| acc.wrapping_add(u16::from_be_bytes([w[0], w[1]])));
                if let [odd] = chunks.remainder() {
                    sum = sum.wrapping_add(*odd as u16);
                }
                sum
            },
        }
    }

    /// Encodes the checksum of this payload, as streamed by the receiver
    #[cfg(test)]
    pub fn encode(&self, payload: &[u8]) -> Vec<u8> {
        let value = self.calc(payload);
        match self {
            Self::Xor8 => vec![value as u8],
            Self::Sum16 => value.to_be_bytes().to_vec(),
        }
    }
}

/// Verifies `payload` against received `checksum` bytes.
/// Only 1 byte (XOR) and 2 byte (word sum) checksums exist:
/// any other length never verifies.
pub fn verify(payload: &[u8], checksum: &[u8]) -> bool {
    match Checksum::from_len(checksum.len()) {
        Some(Checksum::Xor8) => Checksum::Xor8.calc(payload) == checksum[0] as u16,
        Some(Checksum::Sum16) => {
            Checksum::Sum16.calc(payload) == u16::from_be_bytes([checksum[0], checksum[1]])
        },
        None => false,
    }
}
