//! Byte frequency analysis

/// Occurrence count for every byte value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    pub fn count(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &b in data {
            counts[b as usize] += 1;
        }
        Self { counts }
    }

    pub fn get(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Present bytes with their counts, in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f > 0)
            .map(|(b, &f)| (b as u8, f))
    }

    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&f| f > 0).count()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Shannon entropy in bits per byte
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let len = total as f64;
        let mut entropy = 0.0;
        for (_, f) in self.iter() {
            let p = f as f64 / len;
            entropy -= p * p.log2();
        }
        entropy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count() {
        let table = FrequencyTable::count(b"abracadabra");
        assert_eq!(table.get(b'a'), 5);
        assert_eq!(table.get(b'b'), 2);
        assert_eq!(table.get(b'r'), 2);
        assert_eq!(table.get(b'c'), 1);
        assert_eq!(table.get(b'd'), 1);
        assert_eq!(table.get(b'z'), 0);
        assert_eq!(table.distinct(), 5);
        assert_eq!(table.total(), 11);
    }

    #[test]
    fn test_empty() {
        let table = FrequencyTable::count(b"");
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
        assert_eq!(table.entropy(), 0.0);
    }

    #[test]
    fn test_iter_is_sorted_by_byte() {
        let table = FrequencyTable::count(&[9, 3, 200, 3, 0]);
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![(0, 1), (3, 2), (9, 1), (200, 1)]);
    }

    #[test]
    fn test_entropy() {
        let uniform = FrequencyTable::count(&[42u8; 100]);
        assert!(uniform.entropy() < 0.01, "single symbol should have ~0 entropy");

        let all: Vec<u8> = (0..=255).collect();
        let spread = FrequencyTable::count(&all);
        assert!((spread.entropy() - 8.0).abs() < 1e-9);
    }
}
