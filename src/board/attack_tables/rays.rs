//! Precomputed rays between square pairs.

use once_cell::sync::Lazy;

use crate::board::types::{Bitboard, Square};

/// `RAY_BETWEEN[a][b]`: squares strictly between `a` and `b` when they share
/// a rank, file or diagonal; empty otherwise.
static RAY_BETWEEN: Lazy<Box<[[Bitboard; 64]; 64]>> = Lazy::new(|| {
    let mut rays = Box::new([[Bitboard::EMPTY; 64]; 64]);
    let dirs: [(isize, isize); 8] = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];

    for a in 0..64 {
        let ar = (a / 8) as isize;
        let af = (a % 8) as isize;
        for (dr, df) in dirs {
            let mut between = 0u64;
            let mut nr = ar + dr;
            let mut nf = af + df;
            while (0..8).contains(&nr) && (0..8).contains(&nf) {
                let b = (nr as usize) * 8 + (nf as usize);
                rays[a][b] = Bitboard(between);
                between |= 1u64 << b;
                nr += dr;
                nf += df;
            }
        }
    }

    rays
});

/// Squares strictly between two squares on a shared rank, file or diagonal
#[inline]
#[must_use]
pub fn ray_between(a: Square, b: Square) -> Bitboard {
    RAY_BETWEEN[a.index()][b.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_between_rank() {
        // a1 to h1: b1..g1
        let ray = ray_between(Square::new(0, 0), Square::new(0, 7));
        assert_eq!(ray.popcount(), 6);
        assert!(ray.contains(Square::new(0, 3)));
        assert!(!ray.contains(Square::new(0, 0)));
        assert!(!ray.contains(Square::new(0, 7)));
    }

    #[test]
    fn test_ray_between_diagonal() {
        // a1 to h8
        let ray = ray_between(Square::new(0, 0), Square::new(7, 7));
        assert_eq!(ray.popcount(), 6);
        assert!(ray.contains(Square::new(3, 3)));
    }

    #[test]
    fn test_ray_between_unaligned() {
        // Knight-relationship squares share no ray
        assert!(ray_between(Square::new(0, 0), Square::new(2, 1)).is_empty());
        assert!(ray_between(Square::new(3, 3), Square::new(4, 5)).is_empty());
    }

    #[test]
    fn test_ray_between_adjacent() {
        assert!(ray_between(Square::new(0, 0), Square::new(0, 1)).is_empty());
        assert!(ray_between(Square::new(0, 0), Square::new(1, 1)).is_empty());
    }

    #[test]
    fn test_ray_between_symmetric() {
        for (a, b) in [(0usize, 56usize), (3, 59), (9, 54), (28, 35)] {
            assert_eq!(
                ray_between(Square::from_index(a), Square::from_index(b)),
                ray_between(Square::from_index(b), Square::from_index(a))
            );
        }
    }
}
