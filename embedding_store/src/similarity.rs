// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cosine similarity and the small vector kernels it is built from.
//!
//! Dot products and sums of squares run 8 lanes at a time with scalar
//! handling for the remainder. GloVe corpora are 50 to 300 dimensions, so
//! every vector fills several full lanes.

use wide::f32x8;

use crate::error::{EmbeddingError, Result};

/// Dot product of two equal-length slices.
///
/// Callers check lengths; extra elements of the longer slice are ignored.
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    let (a, b) = (&a[..len], &b[..len]);

    let mut sum = f32x8::ZERO;
    for (ca, cb) in a.chunks_exact(8).zip(b.chunks_exact(8)) {
        sum += lanes(ca) * lanes(cb);
    }

    let total: [f32; 8] = sum.into();
    let mut result: f32 = total.iter().sum();

    let start = len - len % 8;
    for (x, y) in a[start..].iter().zip(&b[start..]) {
        result += x * y;
    }

    result
}

#[inline]
fn lanes(chunk: &[f32]) -> f32x8 {
    let mut arr = [0.0f32; 8];
    arr.copy_from_slice(chunk);
    f32x8::from(arr)
}

#[inline]
fn sum_of_squares(v: &[f32]) -> f32 {
    dot_product(v, v)
}

/// L2 norm of a vector.
#[inline]
pub fn magnitude(v: &[f32]) -> f32 {
    sum_of_squares(v).sqrt()
}

/// Cosine similarity between two vectors of the same dimension.
///
/// Returns `0.0` when either vector has zero magnitude. Vectors of different
/// lengths are rejected with [`EmbeddingError::DimensionMismatch`].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }

    Ok(cosine_with_magnitude(a, b, magnitude(a)))
}

/// Cosine similarity with the magnitude of `a` precomputed.
///
/// Used by scans that compare one query against the whole store. Lengths
/// must already be known to match.
#[inline]
pub(crate) fn cosine_with_magnitude(a: &[f32], b: &[f32], a_magnitude: f32) -> f32 {
    let b_magnitude = magnitude(b);
    if a_magnitude == 0.0 || b_magnitude == 0.0 {
        return 0.0;
    }

    dot_product(a, b) / (a_magnitude * b_magnitude)
}

/// Element-wise mean of a set of equal-length vectors.
///
/// Returns `Ok(None)` for an empty set.
pub fn mean_embedding<'a, I>(vectors: I) -> Result<Option<Vec<f32>>>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut iter = vectors.into_iter();
    let Some(first) = iter.next() else {
        return Ok(None);
    };

    let mut sum = first.to_vec();
    let mut count = 1usize;
    for v in iter {
        if v.len() != sum.len() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: sum.len(),
                got: v.len(),
            });
        }
        for (acc, x) in sum.iter_mut().zip(v) {
            *acc += x;
        }
        count += 1;
    }

    let n = count as f32;
    for acc in &mut sum {
        *acc /= n;
    }

    Ok(Some(sum))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn create_test_vector(dim: usize, seed: usize) -> Vec<f32> {
        (0..dim)
            .map(|i| {
                let x = (seed * 31 + i * 17) as f32;
                (x * 0.01).sin()
            })
            .collect()
    }

    #[test]
    fn test_dot_product_matches_scalar() {
        for dim in [1, 7, 8, 9, 50, 300] {
            let a = create_test_vector(dim, 1);
            let b = create_test_vector(dim, 2);
            let scalar: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
            assert!((dot_product(&a, &b) - scalar).abs() < 1e-3, "dim {dim}");
        }
    }

    #[test]
    fn test_magnitude() {
        assert!((magnitude(&[3.0, 4.0]) - 5.0).abs() < EPS);
        assert_eq!(magnitude(&[]), 0.0);
    }

    #[test]
    fn test_cosine_symmetric() {
        let a = create_test_vector(50, 3);
        let b = create_test_vector(50, 11);
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert!((ab - ba).abs() < EPS);
    }

    #[test]
    fn test_cosine_self_is_one() {
        let a = create_test_vector(50, 5);
        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_cosine_opposite_is_minus_one() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((sim + 1.0).abs() < EPS);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        let zero = vec![0.0; 4];
        let a = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(cosine_similarity(&zero, &a).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&a, &zero).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        let err = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn test_cosine_known_value() {
        // ok = [0.9, 0.1] against good = [1, 0]
        let sim = cosine_similarity(&[0.9, 0.1], &[1.0, 0.0]).unwrap();
        assert!((sim - 0.993_883_7).abs() < 1e-4);
    }

    #[test]
    fn test_mean_embedding() {
        let a = [1.0, 2.0];
        let b = [3.0, 6.0];
        let mean = mean_embedding([&a[..], &b[..]]).unwrap().unwrap();
        assert_eq!(mean, vec![2.0, 4.0]);
    }

    #[test]
    fn test_mean_embedding_empty() {
        let empty: Vec<&[f32]> = Vec::new();
        assert!(mean_embedding(empty).unwrap().is_none());
    }

    #[test]
    fn test_mean_embedding_mismatch() {
        let a = [1.0, 2.0];
        let b = [3.0];
        assert!(matches!(
            mean_embedding([&a[..], &b[..]]),
            Err(EmbeddingError::DimensionMismatch { .. })
        ));
    }
}
