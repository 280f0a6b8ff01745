use std::ops::{Index, IndexMut, Deref};
use clarabel::algebra::FloatT;
use totsu_core::MatType;
use crate::CscMat;

//

/// Dense matrix builder
///
/// Writes a small matrix element by element and converts it into [`CscMat`].
/// [`MatType::General`] data is held in column-major.
/// [`MatType::SymPack`] holds the upper triangle column-wise, and `(r, c)` and `(c, r)`
/// refer to the same element.
#[derive(Debug, Clone)]
pub struct MatBuild<F>
{
    typ: MatType,
    array: Vec<F>,
}

impl<F: FloatT> MatBuild<F>
{
    /// Creates an instance of zeros.
    pub fn new(typ: MatType) -> Self
    {
        MatBuild {
            typ,
            array: vec![F::zero(); typ.len()],
        }
    }

    pub fn size(&self) -> (usize, usize)
    {
        self.typ.size()
    }

    /// Fills by a function of `(row, column)`.
    ///
    /// Only the upper triangle is evaluated for [`MatType::SymPack`].
    pub fn by_fn<M>(mut self, mut func: M) -> Self
    where M: FnMut(usize, usize) -> F
    {
        let (nr, nc) = self.size();
        let sym = matches!(self.typ, MatType::SymPack(_));

        for c in 0.. nc {
            let rows = if sym {c + 1} else {nr};
            for r in 0.. rows {
                self[(r, c)] = func(r, c);
            }
        }
        self
    }

    /// Fills by values in row-major order.
    ///
    /// Filling stops when `iter` runs out.
    pub fn iter_rowmaj<T, I>(mut self, iter: T) -> Self
    where T: IntoIterator<Item=I>, I: Deref<Target=F>
    {
        let (nr, nc) = self.size();
        let pos = (0.. nr).flat_map(|r| (0.. nc).map(move |c| (r, c)));

        for ((r, c), v) in pos.zip(iter) {
            self[(r, c)] = *v;
        }
        self
    }

    /// Converted into [`CscMat`], dropping zeros.
    ///
    /// A [`MatType::SymPack`] matrix is expanded to both triangles.
    pub fn to_csc(&self) -> CscMat<F>
    {
        match self.typ {
            MatType::General(nr, nc) => CscMat::from_colmaj(nr, nc, &self.array),
            MatType::SymPack(n) => {
                let upper = (0.. n).flat_map(|c| (0..= c).map(move |r| (r, c)));
                let triplets = upper.flat_map(|(r, c)| {
                    let v = self[(r, c)];
                    let lower = if r != c {Some((c, r, v))} else {None};
                    core::iter::once((r, c, v)).chain(lower)
                });
                CscMat::from_triplets(n, n, triplets)
            },
        }
    }

    fn pos(&self, (r, c): (usize, usize)) -> usize
    {
        let (nr, nc) = self.size();
        assert!(r < nr && c < nc);

        match self.typ {
            MatType::General(..) => c * nr + r,
            MatType::SymPack(_) => {
                let (lo, hi) = if r <= c {(r, c)} else {(c, r)};
                hi * (hi + 1) / 2 + lo
            },
        }
    }
}

impl<F: FloatT> Index<(usize, usize)> for MatBuild<F>
{
    type Output = F;
    fn index(&self, index: (usize, usize)) -> &F
    {
        &self.array[self.pos(index)]
    }
}

impl<F: FloatT> IndexMut<(usize, usize)> for MatBuild<F>
{
    fn index_mut(&mut self, index: (usize, usize)) -> &mut F
    {
        let i = self.pos(index);
        &mut self.array[i]
    }
}

impl<F: FloatT> From<MatBuild<F>> for CscMat<F>
{
    fn from(m: MatBuild<F>) -> Self
    {
        m.to_csc()
    }
}

impl<F: FloatT> From<&MatBuild<F>> for CscMat<F>
{
    fn from(m: &MatBuild<F>) -> Self
    {
        m.to_csc()
    }
}

//

#[test]
fn test_matbuild_sympack()
{
    let m = MatBuild::<f64>::new(MatType::SymPack(3))
        .by_fn(|r, c| if r == c {1.} else if c == r + 1 {(r + c) as f64} else {0.});
    assert_eq!(m[(2, 1)], 3.);

    let csc = m.to_csc();
    assert_eq!(csc.size(), (3, 3));
    assert_eq!(csc.nnz(), 7);
    assert_eq!(csc.get(0, 1), 1.);
    assert_eq!(csc.get(1, 0), 1.);
    assert_eq!(csc.get(1, 2), 3.);
    assert_eq!(csc.get(0, 2), 0.);
}

#[test]
fn test_matbuild_general()
{
    let mut m = MatBuild::<f64>::new(MatType::General(2, 3)).iter_rowmaj(&[
        1., 0., 2.,
        0., 3.,
    ]);
    m[(1, 2)] = -1.;
    let csc = CscMat::from(&m);

    assert_eq!(csc.nnz(), 4);
    assert_eq!(csc.get(0, 2), 2.);
    assert_eq!(csc.mul_vec(&[1., 1., 1.]), vec![3., 2.]);
}
