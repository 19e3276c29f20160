//---------------------------------------------------------
// assembly of CSC matrices from unordered (row, col, value)
// triplets, as produced when walking constraint registries
//---------------------------------------------------------

use crate::algebra::{CscMatrix, FloatT, SparseFormatError};
use itertools::izip;

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// Assemble an `m` x `n` matrix from triplet data.
    ///
    /// Entries are placed column by column with rows in increasing
    /// order, independent of the order in which the triplets are given.
    /// Every (row, col) position may appear at most once.
    pub fn new_from_triplets(
        m: usize,
        n: usize,
        I: &[usize],
        J: &[usize],
        V: &[T],
    ) -> Result<Self, SparseFormatError> {
        if I.len() != J.len() || I.len() != V.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if I.iter().any(|&r| r >= m) {
            return Err(SparseFormatError::BadRowval);
        }
        if J.iter().any(|&c| c >= n) {
            return Err(SparseFormatError::BadColval);
        }

        let nnz = V.len();
        let mut A = CscMatrix::spalloc(m, n, nnz);

        // count entries per column, then cumsum into colptr
        // with the usual one-place shift.  spalloc leaves nnz
        // in the last slot, so it is cleared before counting
        A.colptr[n] = 0;
        for &c in J {
            A.colptr[c + 1] += 1;
        }
        for c in 0..n {
            A.colptr[c + 1] += A.colptr[c];
        }

        // scatter into place, using a running write position per column
        let mut next = A.colptr[..n].to_vec();
        for (&r, &c, &v) in izip!(I, J, V) {
            let dest = next[c];
            A.rowval[dest] = r;
            A.nzval[dest] = v;
            next[c] += 1;
        }

        // order rows within each column and reject duplicates
        for c in 0..n {
            let rng = A.colptr[c]..A.colptr[c + 1];
            let mut pairs: Vec<(usize, T)> = A.rowval[rng.clone()]
                .iter()
                .copied()
                .zip(A.nzval[rng.clone()].iter().copied())
                .collect();
            pairs.sort_by_key(|&(r, _)| r);
            if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
                return Err(SparseFormatError::DuplicateEntry(w[0].0, c));
            }
            for (k, (r, v)) in rng.zip(pairs) {
                A.rowval[k] = r;
                A.nzval[k] = v;
            }
        }

        Ok(A)
    }
}

#[test]
fn test_new_from_triplets() {
    // A =
    //[ ⋅   4.0    ⋅ ]
    //[1.0   ⋅   -2.0]
    let I = vec![1, 0, 1];
    let J = vec![2, 1, 0];
    let V = vec![-2., 4., 1.];
    let A = CscMatrix::<f64>::new_from_triplets(2, 3, &I, &J, &V).unwrap();

    assert!(A.check_format().is_ok());
    assert_eq!(A.colptr, vec![0, 1, 2, 3]);
    assert_eq!(A.rowval, vec![1, 0, 1]);
    assert_eq!(A.nzval, vec![1., 4., -2.]);
}

#[test]
fn test_new_from_triplets_shared_columns() {
    // A =
    //[1.0   ⋅   2.0]
    //[ ⋅    ⋅   5.0]
    //[3.0   ⋅    ⋅ ]
    let I = vec![2, 0, 1, 0];
    let J = vec![0, 0, 2, 2];
    let V = vec![3., 1., 5., 2.];
    let A = CscMatrix::<f64>::new_from_triplets(3, 3, &I, &J, &V).unwrap();

    assert!(A.check_format().is_ok());
    assert_eq!(A.nnz(), 4);
    assert_eq!(A.colptr, vec![0, 2, 2, 4]);
    assert_eq!(A.rowval, vec![0, 2, 0, 1]);
    assert_eq!(A.nzval, vec![1., 3., 2., 5.]);

    let Z = CscMatrix::<f64>::new_from_triplets(2, 3, &[], &[], &[]).unwrap();
    assert_eq!(Z.colptr, vec![0, 0, 0, 0]);
}

#[test]
fn test_new_from_triplets_errors() {
    let r = CscMatrix::<f64>::new_from_triplets(2, 2, &[0, 0], &[1, 1], &[1., 2.]);
    assert_eq!(r, Err(SparseFormatError::DuplicateEntry(0, 1)));

    let r = CscMatrix::<f64>::new_from_triplets(2, 2, &[2], &[0], &[1.]);
    assert_eq!(r, Err(SparseFormatError::BadRowval));

    let r = CscMatrix::<f64>::new_from_triplets(2, 2, &[0], &[0, 1], &[1.]);
    assert_eq!(r, Err(SparseFormatError::IncompatibleDimension));
}
