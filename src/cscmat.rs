use clarabel::algebra::{BlockConcatenate, CscMatrix, FloatT};
use crate::QpError;

//

/// Sparse matrix in compressed sparse column format, backed by [`CscMatrix`].
///
/// Row indices within each column are strictly increasing and
/// no explicit zero is stored by the constructors of this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMat<F = f64>(CscMatrix<F>);

impl<F: FloatT> CscMat<F>
{
    /// Creates an instance from raw CSC arrays.
    ///
    /// Returns the [`CscMat`] instance, or [`QpError::Shape`] if the arrays are not a valid CSC structure
    /// (`colptr` of length `ncols + 1` non-decreasing from zero,
    /// strictly increasing row indices less than `nrows` in each column).
    pub fn new(nrows: usize, ncols: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<F>) -> Result<Self, QpError>
    {
        let mat = CscMatrix {m: nrows, n: ncols, colptr, rowval, nzval};

        if let Err(e) = mat.check_format() {
            log::error!("invalid CSC arrays of ({}, {}): {}", nrows, ncols, e);
            return Err(QpError::Shape {
                name: "csc",
                expected: format!("valid CSC arrays of ({}, {})", nrows, ncols),
                found: e.to_string(),
            });
        }
        // check_format lets a leading offset pass
        if mat.colptr[0] != 0 {
            return Err(QpError::Shape {
                name: "colptr",
                expected: "0 at column 0".to_string(),
                found: mat.colptr[0].to_string(),
            });
        }

        Ok(CscMat(mat))
    }

    /// Zero matrix with no stored entry.
    pub fn zeros((nrows, ncols): (usize, usize)) -> Self
    {
        CscMat(CscMatrix {
            m: nrows,
            n: ncols,
            colptr: vec![0; ncols + 1],
            rowval: Vec::new(),
            nzval: Vec::new(),
        })
    }

    /// Identity matrix of size `n`.
    pub fn identity(n: usize) -> Self
    {
        CscMat(CscMatrix::identity(n))
    }

    /// Creates an instance from `(row, column, value)` triplets.
    ///
    /// Duplicated entries are summed up and zero values are dropped.
    /// Every index shall be inside `(nrows, ncols)`.
    pub fn from_triplets<T>(nrows: usize, ncols: usize, triplets: T) -> Self
    where T: IntoIterator<Item=(usize, usize, F)>
    {
        let mut cols: Vec<Vec<(usize, F)>> = vec![Vec::new(); ncols];

        for (r, c, v) in triplets {
            assert!(r < nrows);
            cols[c].push((r, v));
        }

        let mut colptr = Vec::with_capacity(ncols + 1);
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();
        colptr.push(0);

        for mut col in cols {
            col.sort_by_key(|e| e.0);

            let mut iter = col.into_iter().peekable();
            while let Some((r, mut v)) = iter.next() {
                while let Some(&(r_next, v_next)) = iter.peek() {
                    if r_next != r {
                        break;
                    }
                    v += v_next;
                    iter.next();
                }
                if v != F::zero() {
                    rowval.push(r);
                    nzval.push(v);
                }
            }
            colptr.push(rowval.len());
        }

        CscMat(CscMatrix {m: nrows, n: ncols, colptr, rowval, nzval})
    }

    /// Creates an instance from column-major dense data, dropping zeros.
    pub fn from_colmaj(nrows: usize, ncols: usize, array: &[F]) -> Self
    {
        assert_eq!(array.len(), nrows * ncols);

        Self::from_triplets(nrows, ncols,
            array.iter().enumerate().map(|(i, &v)| (i % nrows.max(1), i / nrows.max(1), v))
        )
    }

    /// Size of the matrix.
    ///
    /// Returns a tuple of a number of rows and columns.
    pub fn size(&self) -> (usize, usize)
    {
        (self.0.m, self.0.n)
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize
    {
        self.0.nnz()
    }

    /// Underlying clarabel matrix.
    pub fn as_clarabel(&self) -> &CscMatrix<F>
    {
        &self.0
    }

    pub fn into_clarabel(self) -> CscMatrix<F>
    {
        self.0
    }

    /// Element at `(r, c)`, zero if not stored.
    pub fn get(&self, r: usize, c: usize) -> F
    {
        let a = &self.0;
        assert!(r < a.m);

        let (lo, hi) = (a.colptr[c], a.colptr[c + 1]);
        match a.rowval[lo.. hi].binary_search(&r) {
            Ok(i) => a.nzval[lo + i],
            Err(_) => F::zero(),
        }
    }

    /// Iterates stored entries as `(row, column, value)` in column-major order.
    pub fn iter(&self) -> impl Iterator<Item=(usize, usize, F)> + '_
    {
        let a = &self.0;
        (0.. a.n).flat_map(move |c| {
            (a.colptr[c].. a.colptr[c + 1]).map(move |i| (a.rowval[i], c, a.nzval[i]))
        })
    }

    /// Calculates \\(y = \alpha A x + \beta y\\).
    pub fn mul_add(&self, alpha: F, x: &[F], beta: F, y: &mut [F])
    {
        let a = &self.0;
        assert_eq!(x.len(), a.n);
        assert_eq!(y.len(), a.m);

        y.iter_mut().for_each(|e| *e *= beta);
        for (r, c, v) in self.iter() {
            y[r] += alpha * v * x[c];
        }
    }

    /// Calculates \\(y = \alpha A^T x + \beta y\\).
    pub fn trans_mul_add(&self, alpha: F, x: &[F], beta: F, y: &mut [F])
    {
        let a = &self.0;
        assert_eq!(x.len(), a.m);
        assert_eq!(y.len(), a.n);

        for (c, yc) in y.iter_mut().enumerate() {
            let dot = (a.colptr[c].. a.colptr[c + 1])
                .fold(F::zero(), |s, i| s + a.nzval[i] * x[a.rowval[i]]);
            *yc = beta * *yc + alpha * dot;
        }
    }

    /// Returns \\(A x\\).
    pub fn mul_vec(&self, x: &[F]) -> Vec<F>
    {
        let mut y = vec![F::zero(); self.0.m];
        self.mul_add(F::one(), x, F::zero(), &mut y);
        y
    }

    /// Stacks `other` below `self`.
    ///
    /// Returns [`QpError::Shape`] if the numbers of columns differ.
    pub fn vstack(&self, other: &CscMat<F>) -> Result<Self, QpError>
    {
        CscMatrix::hvcat(&[&[&self.0], &[&other.0]])
            .map(CscMat)
            .map_err(|_| QpError::shape("vstack", (other.0.m, self.0.n), other.size()))
    }

    /// Appends `k` zero columns on the right.
    pub fn pad_cols(&self, k: usize) -> Self
    {
        let mut mat = self.0.clone();
        let nnz = mat.nnz();
        mat.colptr.extend(core::iter::repeat(nnz).take(k));
        mat.n += k;

        CscMat(mat)
    }

    /// Symmetric part \\((A + A^T) / 2\\) of a square matrix.
    pub fn sym_part(&self) -> Self
    {
        assert_eq!(self.0.m, self.0.n);

        let half = F::one() / (F::one() + F::one());
        Self::from_triplets(self.0.m, self.0.n,
            self.iter().flat_map(|(r, c, v)| [(r, c, v * half), (c, r, v * half)])
        )
    }

    /// Upper-triangular part including the diagonal of a square matrix.
    pub fn triu(&self) -> Self
    {
        CscMat(self.0.to_triu())
    }

    /// Largest absolute value of entries, zero if none stored.
    ///
    /// `NaN` entries are not counted; see [`CscMat::find_non_finite`].
    pub fn max_abs(&self) -> F
    {
        self.0.nzval.iter().fold(F::zero(), |m, v| m.max(v.abs()))
    }

    /// Position of the first stored entry which is infinite or `NaN`.
    pub fn find_non_finite(&self) -> Option<(usize, usize)>
    {
        self.iter().find(|e| !e.2.is_finite()).map(|(r, c, _)| (r, c))
    }
}

impl<F> From<CscMat<F>> for CscMatrix<F>
{
    fn from(mat: CscMat<F>) -> Self
    {
        mat.0
    }
}

//

#[test]
fn test_cscmat1()
{
    let a = CscMat::<f64>::from_triplets(3, 2, [
        (2, 0, 1.), (0, 0, 2.), (0, 0, 0.5), (1, 1, 3.), (1, 1, -3.), (2, 1, 4.),
    ]);

    assert_eq!(a.as_clarabel().colptr, vec![0, 2, 3]);
    assert_eq!(a.as_clarabel().rowval, vec![0, 2, 2]);
    assert_eq!(a.as_clarabel().nzval, vec![2.5, 1., 4.]);
    assert_eq!(a.get(1, 1), 0.);

    assert_eq!(a.mul_vec(&[1., 2.]), vec![2.5, 0., 9.]);

    let mut y = vec![1., 1.];
    a.trans_mul_add(2., &[1., 0., 1.], -1., &mut y);
    assert_eq!(y, vec![6., 7.]);

    let b = a.vstack(&CscMat::identity(2)).unwrap().pad_cols(1);
    assert_eq!(b.size(), (5, 3));
    assert_eq!(b.get(4, 1), 1.);
    assert_eq!(b.get(3, 0), 1.);
    assert_eq!(b.get(2, 1), 4.);
    assert_eq!(b.nnz(), 5);

    assert!(matches!(a.vstack(&CscMat::identity(3)), Err(QpError::Shape {name: "vstack", ..})));
}

#[test]
fn test_cscmat_triu()
{
    let a = CscMat::<f64>::from_colmaj(2, 2, &[1., 2., 3., 4.]);

    let s = a.sym_part();
    assert_eq!(s.get(0, 1), 2.5);
    assert_eq!(s.get(1, 0), 2.5);

    let u = s.triu();
    assert_eq!(u.nnz(), 3);
    assert_eq!(u.get(1, 0), 0.);
    assert_eq!(u.get(0, 1), 2.5);
}

#[test]
fn test_cscmat_invalid()
{
    let e = CscMat::<f64>::new(2, 2, vec![0, 2, 3], vec![1, 0, 1], vec![1., 2., 3.]);
    assert!(matches!(e, Err(QpError::Shape {name: "csc", ..})));

    let e = CscMat::<f64>::new(2, 2, vec![0, 1], vec![0], vec![1.]);
    assert!(matches!(e, Err(QpError::Shape {name: "csc", ..})));

    let e = CscMat::<f64>::new(1, 1, vec![1, 1], vec![0], vec![1.]);
    assert!(matches!(e, Err(QpError::Shape {name: "colptr", ..})));
}

#[test]
fn test_cscmat_colptr_overshoot()
{
    // colptr runs past nnz before coming back
    let e = CscMat::<f64>::new(2, 2, vec![0, 5, 1], vec![0], vec![1.]);
    assert!(matches!(e, Err(QpError::Shape {..})));

    let a = CscMat::<f64>::new(2, 2, vec![0, 1, 1], vec![1], vec![1.]).unwrap();
    assert_eq!(a.get(1, 0), 1.);
}
