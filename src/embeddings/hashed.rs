//! Offline embedder: signed feature hashing of lowercase word tokens

use sha2::Digest;
use sha2::Sha256;

/// Deterministic bag-of-words embedder that needs no network.
///
/// Each token is hashed with SHA-256; the first eight bytes pick a bucket and
/// the ninth byte picks the sign. Vectors are L2-normalised.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dimension: usize,
}

impl HashedEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];

        for token in tokenize(text) {
            let digest = Sha256::digest(token.as_bytes());
            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_deterministic_and_normalised() {
        let embedder = HashedEmbedder::new(64);
        let a = embedder.embed("Block 7 contains 3 transactions");
        let b = embedder.embed("block 7 CONTAINS 3 transactions");
        assert_eq!(a, b);
        assert!((dot(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_shared_words_score_higher() {
        let embedder = HashedEmbedder::new(256);
        let query = embedder.embed("nonce mining");
        let related = embedder.embed("A nonce is used in the mining process");
        let unrelated = embedder.embed("receivers collect transfers");
        assert!(dot(&query, &related) > dot(&query, &unrelated));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashedEmbedder::new(8);
        assert!(embedder.embed("  ...  ").iter().all(|v| *v == 0.0));
    }
}
